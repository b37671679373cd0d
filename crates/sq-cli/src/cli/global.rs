use std::path::PathBuf;

use clap::ValueEnum;

/// Report format.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
}

/// Global flags available before or after subcommands.
#[derive(Clone, Debug)]
pub struct GlobalFlags {
    pub url: Option<String>,
    pub token: Option<String>,
    pub format: Option<OutputFormat>,
    pub file: Option<PathBuf>,
    pub quiet: bool,
    pub verbose: bool,
}

impl GlobalFlags {
    /// The explicit `--format`, else JSON for a `.json` output file, else CSV.
    #[must_use]
    pub fn output_format(&self) -> OutputFormat {
        if let Some(format) = self.format {
            return format;
        }
        let is_json = self
            .file
            .as_ref()
            .and_then(|file| file.extension())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            OutputFormat::Json
        } else {
            OutputFormat::Csv
        }
    }
}
