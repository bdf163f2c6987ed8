use super::*;

fn parse(args: &[&str]) -> Cli {
    let mut argv = vec!["kira-mutreview"];
    argv.extend_from_slice(args);
    Cli::try_parse_from(argv).unwrap()
}

fn filters(cli: Cli) -> FilterArgs {
    match cli.command {
        Command::View { filters, .. } | Command::Plot { filters, .. } => filters,
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_parse_view_with_filters() {
    let cli = parse(&[
        "view",
        "--manifest",
        "samples.tsv",
        "--sample",
        "P1",
        "--columns",
        "oncogenic,functional_effect",
        "--gene",
        "TP53",
        "--gene",
        "KRAS",
        "--page",
        "2",
        "-vv",
    ]);
    assert_eq!(cli.verbose, 2);
    let filters = filters(cli);
    assert_eq!(filters.columns, vec!["oncogenic", "functional_effect"]);
    assert_eq!(filters.genes, vec!["TP53", "KRAS"]);
    assert_eq!(filters.page, 2);
    assert_eq!(filters.page_size, None);
}

#[test]
fn test_parse_plot_defaults_to_tsv() {
    let cli = parse(&[
        "plot",
        "--manifest",
        "samples.tsv",
        "--sample",
        "P1",
        "--kind",
        "histogram",
    ]);
    match cli.command {
        Command::Plot { kind, format, .. } => {
            assert_eq!(kind, PlotKind::Histogram);
            assert_eq!(format, OutputFormat::Tsv);
        }
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn test_view_requires_sample() {
    assert!(Cli::try_parse_from(["kira-mutreview", "view", "--manifest", "m.tsv"]).is_err());
}

#[test]
fn test_selection_from_filters() {
    let config = ReviewConfig::default();
    let cli = parse(&[
        "view",
        "--manifest",
        "m.tsv",
        "--sample",
        "P1",
        "--cluster",
        "1,2",
        "--page",
        "3",
        "--page-size",
        "20",
    ]);
    let selection = selection_from(&config, &filters(cli)).unwrap();
    assert_eq!(selection.page, 2);
    assert_eq!(selection.page_size, 20);
    assert_eq!(selection.clusters.len(), 2);

    let cli = parse(&["view", "--manifest", "m.tsv", "--sample", "P1"]);
    let selection = selection_from(&config, &filters(cli)).unwrap();
    assert_eq!(selection.page, 0);
    assert_eq!(selection.page_size, config.page_size);

    let cli = parse(&["view", "--manifest", "m.tsv", "--sample", "P1", "--page", "0"]);
    assert!(matches!(
        selection_from(&config, &filters(cli)),
        Err(CliError::Usage(_))
    ));
}

#[test]
fn test_split_assignment() {
    assert_eq!(
        split_assignment("purity = 0.4", "--set").unwrap(),
        ("purity".to_string(), "0.4".to_string())
    );
    assert_eq!(
        split_assignment("notes=a=b", "--set").unwrap(),
        ("notes".to_string(), "a=b".to_string())
    );
    assert!(split_assignment("purity", "--set").is_err());
    assert!(split_assignment("=0.4", "--set").is_err());
}
