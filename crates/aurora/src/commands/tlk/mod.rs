pub mod diff;
pub mod export;
pub mod info;
pub mod lookup;

use std::fs::File;
use std::path::Path;

use aurora_tlk::{read_talk_table, Encoding, TalkTable};
use clap::ValueEnum;
use miette::{Context, IntoDiagnostic, Result};

/// Encoding of the stored text
///
/// The files do not record one; well known pairings are UTF-16 for the
/// *Dragon Age* tables and Latin-1 for the older games.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum TextEncoding {
    Utf8,
    Utf16Le,
    Utf16Be,
    Latin1,
}

impl From<TextEncoding> for Encoding {
    fn from(encoding: TextEncoding) -> Encoding {
        match encoding {
            TextEncoding::Utf8 => Encoding::Utf8,
            TextEncoding::Utf16Le => Encoding::Utf16Le,
            TextEncoding::Utf16Be => Encoding::Utf16Be,
            TextEncoding::Latin1 => Encoding::Latin1,
        }
    }
}

/// Open a talk table of either family by file sniffing.
pub(crate) fn open_table(
    path: &Path,
    encoding: Option<TextEncoding>,
) -> Result<Box<dyn TalkTable>> {
    let file = File::open(path)
        .into_diagnostic()
        .context(format!("path: {}", path.display()))?;

    Ok(read_talk_table(file, encoding.map(Encoding::from))?)
}

#[derive(clap::Subcommand)]
pub enum TlkCommands {
    /// Compare the strings of two talk tables
    Diff(diff::DiffArgs),
    /// Export the strings of a talk table as JSON
    Export(export::ExportArgs),
    /// Show the family, version and entry count of a talk table
    Info(info::InfoArgs),
    /// Resolve one string reference
    Lookup(lookup::LookupArgs),
}

impl TlkCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            TlkCommands::Diff(diff) => diff.handle(),
            TlkCommands::Export(export) => export.handle(),
            TlkCommands::Info(info) => info.handle(),
            TlkCommands::Lookup(lookup) => lookup.handle(),
        }
    }
}
