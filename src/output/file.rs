use crate::extract::Table;
use chrono::{DateTime, TimeZone};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const DATETIME_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// `<mode>_<timestamp>.csv`
pub fn file_name<Tz: TimeZone>(mode_name: &str, now: DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("{}_{}.csv", mode_name, now.format(DATETIME_FORMAT))
}

/// Quotes a field, doubling embedded quotes
fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

/// Writes every record of `table` as a quoted CSV line ending in `\n`
///
/// The parent directory is created when missing.
pub fn write_csv(table: &Table, path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let mut out = BufWriter::new(File::create(path)?);
    for record in table.records() {
        let line: Vec<String> = record.iter().map(|field| quote(field)).collect();
        out.write_all(line.join(",").as_bytes())?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
