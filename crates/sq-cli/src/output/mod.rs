use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::Context;

use crate::exit_codes::CliError;

pub mod issues;
pub mod loc;
pub mod problems;

/// The report destination: the `--file` path when given, else stdout.
pub fn open(file: Option<&Path>) -> anyhow::Result<Box<dyn Write>> {
    match file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(io::stdout().lock())),
    }
}

/// A CSV writer using the configured separator.
pub fn csv_writer<W: Write>(out: W, separator: char) -> anyhow::Result<csv::Writer<W>> {
    let delimiter = u8::try_from(separator)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| CliError::config(format!("CSV separator '{separator}' is not ASCII")))?;
    Ok(csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(out))
}
