use super::{Loader, output_tables};
use crate::dataset::Dataset;
use crate::extract::Solution;
use crate::model::Cohort;
use eyre::WrapErr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// Every table stored in a single JSON document mapping table names to arrays of rows.
/// Numbers, booleans and nulls keep their JSON type.
pub struct JsonLoader {
    input: PathBuf,
    output: PathBuf,
}

impl JsonLoader {
    pub fn new(input: &Path, output: &Path) -> Self {
        JsonLoader {
            input: input.to_owned(),
            output: output.to_owned(),
        }
    }
}

impl Loader for JsonLoader {
    fn load(&mut self) -> eyre::Result<Dataset> {
        let file = fs::File::open(&self.input)
            .wrap_err_with(|| format!("cannot open {}", self.input.display()))?;
        let data = read(io::BufReader::new(file))
            .wrap_err_with(|| format!("cannot read {}", self.input.display()))?;
        info!(
            path = %self.input.display(),
            tables = ?data.table_names().collect::<Vec<_>>(),
            "loaded tables"
        );
        Ok(data)
    }

    fn save(&self, cohort: &Cohort, solution: &Solution) -> eyre::Result<()> {
        let tables = output_tables(cohort, solution)?;
        if let Some(parent) = self.output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .wrap_err_with(|| format!("cannot create {}", parent.display()))?;
        }
        let file = fs::File::create(&self.output)
            .wrap_err_with(|| format!("cannot create {}", self.output.display()))?;
        write(io::BufWriter::new(file), &tables)
            .wrap_err_with(|| format!("cannot write {}", self.output.display()))?;
        info!(path = %self.output.display(), "results written");
        Ok(())
    }
}

pub fn read<R: io::Read>(reader: R) -> eyre::Result<Dataset> {
    Ok(serde_json::from_reader(reader)?)
}

pub fn write<W: io::Write>(writer: W, data: &Dataset) -> eyre::Result<()> {
    serde_json::to_writer_pretty(writer, data)?;
    Ok(())
}
