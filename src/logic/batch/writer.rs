use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::RiskResult;

/// Append-only CSV log. The header is written once, when the file is
/// created (or found empty); later runs only add rows.
pub struct CsvLog {
    path: PathBuf,
    writer: csv::Writer<File>,
    rows: usize,
}

impl CsvLog {
    pub fn open(path: impl AsRef<Path>, header: &[String]) -> RiskResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let is_new = file.metadata()?.len() == 0;

        if !is_new {
            check_header(&path, header);
        }

        let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(file);
        if is_new {
            writer.write_record(header)?;
        }

        Ok(Self {
            path,
            writer,
            rows: 0,
        })
    }

    pub fn append(&mut self, values: &[String]) -> RiskResult<()> {
        self.writer.write_record(values)?;
        self.rows += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> RiskResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows appended through this handle
    pub fn rows(&self) -> usize {
        self.rows
    }
}

/// Warn when an existing log was written with different columns
fn check_header(path: &Path, header: &[String]) {
    let existing = csv::Reader::from_path(path).and_then(|mut r| r.headers().cloned());
    match existing {
        Ok(existing) if existing.iter().eq(header.iter().map(String::as_str)) => {}
        Ok(existing) => log::warn!(
            "{} has columns {:?}, appending rows for {:?}",
            path.display(),
            existing.iter().collect::<Vec<_>>(),
            header
        ),
        Err(e) => log::warn!("Could not read header of {}: {}", path.display(), e),
    }
}
