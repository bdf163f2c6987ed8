pub mod plots;
pub mod project;
