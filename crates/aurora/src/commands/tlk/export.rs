use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::PathBuf;

use aurora_tlk::StrRef;
use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use tracing::info;

use crate::commands::tlk::{open_table, TextEncoding};

#[derive(Args)]
pub struct ExportArgs {
    /// An input talk table file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A target JSON file, stdout when absent
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Encoding of the stored text
    #[arg(short, long, value_enum)]
    encoding: Option<TextEncoding>,
}

impl ExportArgs {
    pub fn handle(&self) -> Result<()> {
        let table = open_table(&self.file, self.encoding)?;

        // BTreeMap keeps the references in numeric order
        let strings: BTreeMap<StrRef, String> = table
            .str_refs()
            .into_iter()
            .map(|strref| (strref, table.string(strref)))
            .collect();

        info!("exporting {} strings", strings.len());

        match &self.output {
            Some(path) => {
                let out = File::create(path)
                    .into_diagnostic()
                    .context(format!("creating {}", path.display()))?;
                serde_json::to_writer_pretty(out, &strings).into_diagnostic()?;
            }
            None => {
                let mut out = std::io::stdout().lock();
                serde_json::to_writer_pretty(&mut out, &strings).into_diagnostic()?;
                writeln!(out).into_diagnostic()?;
            }
        }

        Ok(())
    }
}
