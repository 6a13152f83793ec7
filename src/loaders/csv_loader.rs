use super::{Loader, output_tables};
use crate::dataset::{Cell, Dataset, Row};
use crate::extract::Solution;
use crate::model::Cohort;
use crate::schema::{ASSIGNMENTS, PROJECTS, STUDENTS, Schema};
use eyre::WrapErr;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Tables stored as `<name>.csv` files, the input ones in one directory and the output
/// ones in another (possibly the same).
pub struct CsvLoader {
    input: PathBuf,
    output: PathBuf,
}

impl CsvLoader {
    pub fn new(input: &Path, output: &Path) -> Self {
        CsvLoader {
            input: input.to_owned(),
            output: output.to_owned(),
        }
    }

    fn load_table(&self, name: &str) -> eyre::Result<Vec<Row>> {
        let path = self.input.join(format!("{name}.csv"));
        let file = fs::File::open(&path)
            .wrap_err_with(|| format!("cannot open {}", path.display()))?;
        let rows = read_table(file).wrap_err_with(|| format!("cannot read {}", path.display()))?;
        debug!(table = name, rows = rows.len(), path = %path.display(), "loaded table");
        Ok(rows)
    }
}

impl Loader for CsvLoader {
    fn load(&mut self) -> eyre::Result<Dataset> {
        let mut data = Dataset::new();
        for name in [PROJECTS, STUDENTS] {
            data.insert_table(name, self.load_table(name)?);
        }
        Ok(data)
    }

    fn save(&self, cohort: &Cohort, solution: &Solution) -> eyre::Result<()> {
        let tables = output_tables(cohort, solution)?;
        fs::create_dir_all(&self.output)
            .wrap_err_with(|| format!("cannot create {}", self.output.display()))?;
        let schema = Schema::output();
        for name in [ASSIGNMENTS, PROJECTS] {
            let path = self.output.join(format!("{name}.csv"));
            let file = fs::File::create(&path)
                .wrap_err_with(|| format!("cannot create {}", path.display()))?;
            let columns = schema
                .table(name)
                .map(|t| t.field_names().collect::<Vec<_>>())
                .unwrap_or_default();
            write_table(file, &columns, tables.table(name).unwrap_or_default())
                .wrap_err_with(|| format!("cannot write {}", path.display()))?;
        }
        info!(path = %self.output.display(), "results written");
        Ok(())
    }
}

/// Read a CSV table with a header line. Blank fields become null cells.
pub fn read_table<R: io::Read>(reader: R) -> eyre::Result<Vec<Row>> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let headers = reader.headers()?.clone();
    reader
        .records()
        .map(|record| -> eyre::Result<Row> {
            let record = record?;
            Ok(headers
                .iter()
                .zip(record.iter())
                .map(|(h, v)| (h, Cell::from_text(v)))
                .collect())
        })
        .collect()
}

/// Write `rows` as a CSV table with the given columns. Null cells are written as blank
/// fields.
pub fn write_table<W: io::Write>(writer: W, columns: &[&str], rows: &[Row]) -> eyre::Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(columns)?;
    for row in rows {
        writer.write_record(columns.iter().map(|c| row.get(c).to_string()))?;
    }
    writer.flush()?;
    Ok(())
}
