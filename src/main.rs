mod config;
mod input;
mod logging;
mod model;
mod pipeline;
mod report;
mod review;

use std::io::BufReader;
use std::path::{Path, PathBuf};

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use thiserror::Error;

use crate::config::{ConfigError, ReviewConfig};
use crate::input::{InputError, Manifest, load_sample_mutations, load_sample_segments};
use crate::model::session::{ObservedValues, SessionError, SessionState};
use crate::model::store::{AnnotationStore, StoreError};
use crate::pipeline::plots::{
    CNP_HIST_MAX_MU, CNP_HIST_STEP, allele_fraction_points, copy_number_histogram,
    copy_number_profile,
};
use crate::pipeline::project::{FilterSelection, dropdown_options, project};
use crate::report::json::{
    build_view_document, render_annotations_json, render_plot_json, render_view_json,
};
use crate::report::text::{
    render_allele_fraction_tsv, render_annotations_text, render_histogram_tsv,
    render_options_text, render_profile_tsv, render_summary_text, render_view_text,
    render_view_tsv,
};
use crate::report::{OutputFormat, emit, html::render_view_html, style_rules};
use crate::review::ReviewLoop;

#[derive(Debug, Parser)]
#[command(
    name = "kira-mutreview",
    version,
    about = "Page, filter and annotate per-sample mutation tables and copy-number profiles"
)]
struct Cli {
    /// Reviewer config (JSON); defaults to the purity reviewer preset.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Args)]
struct SampleArgs {
    #[arg(long)]
    manifest: PathBuf,
    #[arg(long)]
    sample: String,
}

#[derive(Debug, Args)]
struct FilterArgs {
    /// Extra columns shown after the default ones.
    #[arg(long, value_delimiter = ',')]
    columns: Vec<String>,
    #[arg(long = "gene", value_delimiter = ',')]
    genes: Vec<String>,
    #[arg(long = "classification", value_delimiter = ',')]
    classifications: Vec<String>,
    #[arg(long = "cluster", value_delimiter = ',')]
    clusters: Vec<String>,
    #[arg(long)]
    page_size: Option<usize>,
    /// 1-based page number.
    #[arg(long, default_value_t = 1)]
    page: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PlotKind {
    Mutations,
    Profile,
    Histogram,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the filtered mutation table of one sample.
    View {
        #[command(flatten)]
        sample: SampleArgs,
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// List the column and filter choices for one sample.
    Options {
        #[command(flatten)]
        sample: SampleArgs,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print manifest metadata for one sample.
    Summary {
        #[command(flatten)]
        sample: SampleArgs,
        #[arg(long, value_delimiter = ',')]
        columns: Vec<String>,
    },
    /// Export plot data for one sample.
    Plot {
        #[command(flatten)]
        sample: SampleArgs,
        #[arg(long, value_enum)]
        kind: PlotKind,
        #[command(flatten)]
        filters: FilterArgs,
        #[arg(long, value_enum, default_value_t = OutputFormat::Tsv)]
        format: OutputFormat,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Record annotations for one sample and persist them.
    Annotate {
        #[command(flatten)]
        sample: SampleArgs,
        #[arg(long)]
        store: PathBuf,
        /// FIELD=VALUE
        #[arg(long = "set")]
        sets: Vec<String>,
        /// COMPONENT=VALUE, consumed by --autofill
        #[arg(long = "observe")]
        observed: Vec<String>,
        /// Autofill button to apply before --set values.
        #[arg(long)]
        autofill: Vec<String>,
    },
    /// Print stored annotations.
    Show {
        #[arg(long)]
        store: PathBuf,
        #[arg(long)]
        sample: Option<String>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Interactive review session reading commands from stdin.
    Review {
        #[arg(long)]
        manifest: PathBuf,
        #[arg(long)]
        store: PathBuf,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("failed to render JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Usage(String),
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);
    if let Err(err) = run(cli) {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = ReviewConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Command::View {
            sample,
            filters,
            format,
            out,
        } => run_view(&config, &sample, &filters, format, out.as_deref()),
        Command::Options { sample, format } => {
            let manifest = Manifest::load(&sample.manifest, &config.manifest)?;
            let maf = load_sample_mutations(manifest.require(&sample.sample)?)?;
            let options = dropdown_options(&maf);
            let text = match format {
                OutputFormat::Json => serde_json::to_string_pretty(&options)?,
                _ => render_options_text(&options),
            };
            Ok(emit(&text, None)?)
        }
        Command::Summary { sample, columns } => {
            let manifest = Manifest::load(&sample.manifest, &config.manifest)?;
            let record = manifest.require(&sample.sample)?;
            let columns = if columns.is_empty() {
                &config.sample_info_columns
            } else {
                &columns
            };
            Ok(emit(&render_summary_text(record, columns), None)?)
        }
        Command::Plot {
            sample,
            kind,
            filters,
            format,
            out,
        } => run_plot(&config, &sample, kind, &filters, format, out.as_deref()),
        Command::Annotate {
            sample,
            store,
            sets,
            observed,
            autofill,
        } => run_annotate(&config, &sample, &store, &sets, &observed, &autofill),
        Command::Show {
            store,
            sample,
            format,
        } => {
            let store = AnnotationStore::open(&store, &config.fields)?;
            let text = match format {
                OutputFormat::Json => render_annotations_json(&store, sample.as_deref())?,
                _ => render_annotations_text(&store, sample.as_deref()),
            };
            Ok(emit(&text, None)?)
        }
        Command::Review { manifest, store } => {
            let manifest = Manifest::load(&manifest, &config.manifest)?;
            let store = AnnotationStore::open(&store, &config.fields)?;
            let mut review = ReviewLoop::new(&config, &manifest, store);
            let stdin = std::io::stdin();
            let mut stdout = std::io::stdout();
            review.run(BufReader::new(stdin.lock()), &mut stdout)?;
            tracing::info!(
                "review finished on {}; {} samples annotated",
                review.state().sample_id().unwrap_or("no sample"),
                review.store().len()
            );
            Ok(())
        }
    }
}

fn selection_from(config: &ReviewConfig, filters: &FilterArgs) -> Result<FilterSelection, CliError> {
    let page_size = filters.page_size.unwrap_or(config.page_size);
    if page_size == 0 {
        return Err(CliError::Usage("--page-size must be positive".to_string()));
    }
    if filters.page == 0 {
        return Err(CliError::Usage("--page is 1-based".to_string()));
    }
    Ok(FilterSelection {
        columns: filters.columns.clone(),
        genes: filters.genes.iter().cloned().collect(),
        classifications: filters.classifications.iter().cloned().collect(),
        clusters: filters.clusters.iter().cloned().collect(),
        page_size,
        page: filters.page - 1,
    })
}

fn run_view(
    config: &ReviewConfig,
    sample: &SampleArgs,
    filters: &FilterArgs,
    format: OutputFormat,
    out: Option<&Path>,
) -> Result<(), CliError> {
    let manifest = Manifest::load(&sample.manifest, &config.manifest)?;
    let maf = load_sample_mutations(manifest.require(&sample.sample)?)?;
    let selection = selection_from(config, filters)?;
    let view = project(&maf, &config.default_columns, &selection);
    let page = view.page(selection.page, selection.page_size);

    let text = match format {
        OutputFormat::Text => render_view_text(&sample.sample, &view, &page),
        OutputFormat::Tsv => render_view_tsv(&view),
        OutputFormat::Json => {
            let options = dropdown_options(&maf);
            let styles = style_rules(&view, &config.custom_colors);
            let doc = build_view_document(&sample.sample, &view, &page, &options, &styles);
            render_view_json(&doc)?
        }
        OutputFormat::Html => {
            let styles = style_rules(&view, &config.custom_colors);
            render_view_html(&sample.sample, &view, &page, &styles)
        }
    };
    Ok(emit(&text, out)?)
}

fn run_plot(
    config: &ReviewConfig,
    sample: &SampleArgs,
    kind: PlotKind,
    filters: &FilterArgs,
    format: OutputFormat,
    out: Option<&Path>,
) -> Result<(), CliError> {
    let manifest = Manifest::load(&sample.manifest, &config.manifest)?;
    let record = manifest.require(&sample.sample)?;
    let json = match format {
        OutputFormat::Json => true,
        OutputFormat::Tsv => false,
        other => {
            return Err(CliError::Usage(format!(
                "plot data is written as tsv or json, not {other:?}"
            )));
        }
    };

    let text = match kind {
        PlotKind::Mutations => {
            let maf = load_sample_mutations(record)?;
            let selection = selection_from(config, filters)?;
            let view = project(&maf, &config.default_columns, &selection);
            let points = allele_fraction_points(&maf, &view.rows);
            if json {
                render_plot_json("mutations", &record.id, &points)?
            } else {
                render_allele_fraction_tsv(&points)
            }
        }
        PlotKind::Profile => {
            let segments = load_sample_segments(record)?;
            let profile = copy_number_profile(&segments.segments);
            if json {
                render_plot_json("profile", &record.id, &profile)?
            } else {
                render_profile_tsv(&profile)
            }
        }
        PlotKind::Histogram => {
            let segments = load_sample_segments(record)?;
            let bins = copy_number_histogram(&segments.segments, CNP_HIST_MAX_MU, CNP_HIST_STEP);
            if json {
                render_plot_json("histogram", &record.id, &bins)?
            } else {
                render_histogram_tsv(&bins)
            }
        }
    };
    Ok(emit(&text, out)?)
}

fn split_assignment(raw: &str, flag: &str) -> Result<(String, String), CliError> {
    raw.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| CliError::Usage(format!("{flag} expects KEY=VALUE, got '{raw}'")))
}

fn run_annotate(
    config: &ReviewConfig,
    sample: &SampleArgs,
    store_path: &Path,
    sets: &[String],
    observed: &[String],
    autofill: &[String],
) -> Result<(), CliError> {
    if sets.is_empty() && autofill.is_empty() {
        return Err(CliError::Usage(
            "nothing to annotate: pass --set FIELD=VALUE or --autofill BUTTON".to_string(),
        ));
    }
    let manifest = Manifest::load(&sample.manifest, &config.manifest)?;
    let mut store = AnnotationStore::open(store_path, &config.fields)?;

    let mut observed_values = ObservedValues::new();
    for raw in observed {
        let (component, value) = split_assignment(raw, "--observe")?;
        observed_values.insert(component, value);
    }

    let mut state = SessionState::NoSample.select_sample(&manifest, &sample.sample)?;
    for button in autofill {
        state = state.autofill(&config.autofill, button, &observed_values, &store)?;
    }
    for raw in sets {
        let (field, value) = split_assignment(raw, "--set")?;
        state = state.edit_raw(&store, &field, &value)?;
    }
    state.commit(&mut store)?;

    Ok(emit(
        &render_annotations_text(&store, Some(&sample.sample)),
        None,
    )?)
}

#[cfg(test)]
#[path = "../tests/src_inline/main_inline.rs"]
mod tests;
