use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::error::ExportError;
use crate::sim::TickRecord;

/// Create a writer for the target path, `-` meaning stdout.
pub fn writer_for_path(path: &Path) -> io::Result<Box<dyn Write>> {
    if path == Path::new("-") {
        return Ok(Box::new(BufWriter::new(io::stdout())));
    }
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(Box::new(BufWriter::new(File::create(path)?)))
}

/// Write the flight log as CSV, one row per tick.
///
/// Columns follow [`TickRecord`]'s field order, header included.
pub fn write_log<W: Write>(writer: W, records: &[TickRecord]) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    for record in records {
        csv.serialize(record)?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_log_file(path: &Path, records: &[TickRecord]) -> Result<(), ExportError> {
    write_log(writer_for_path(path)?, records)
}
