use crate::dataset::Dataset;
use crate::extract::Solution;
use crate::model::Cohort;
use crate::schema::Schema;
use eyre::WrapErr;
use serde::Deserialize;
use std::path::Path;

pub use self::csv_loader::CsvLoader;
pub use self::json_loader::JsonLoader;

mod csv_loader;
mod json_loader;

/// Source of the input tables and sink of the output tables.
pub trait Loader {
    fn load(&mut self) -> eyre::Result<Dataset>;
    fn save(&self, cohort: &Cohort, solution: &Solution) -> eyre::Result<()>;
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LoaderKind {
    /// A directory of CSV files, one per table
    #[default]
    Csv,
    /// A single JSON document holding every table
    Json,
}

impl LoaderKind {
    pub fn open(self, input: &Path, output: &Path) -> Box<dyn Loader> {
        match self {
            LoaderKind::Csv => Box::new(CsvLoader::new(input, output)),
            LoaderKind::Json => Box::new(JsonLoader::new(input, output)),
        }
    }
}

/// Output tables of `solution`, checked against [`Schema::output`] before anything is
/// written.
fn output_tables(cohort: &Cohort, solution: &Solution) -> eyre::Result<Dataset> {
    let tables = solution.output_tables(cohort);
    crate::checks::validate(&Schema::output(), &tables)
        .wrap_err("refusing to write inconsistent output tables")?;
    Ok(tables)
}
