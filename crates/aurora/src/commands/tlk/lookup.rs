use std::path::PathBuf;

use aurora_tlk::StrRef;
use clap::Args;
use miette::{miette, Result};
use tracing::info;

use crate::commands::tlk::{open_table, TextEncoding};

#[derive(Args)]
pub struct LookupArgs {
    /// An input talk table file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// The string reference to resolve
    #[arg(short, long, value_name = "STRREF")]
    strref: u32,

    /// Encoding of the stored text
    #[arg(short, long, value_enum)]
    encoding: Option<TextEncoding>,
}

impl LookupArgs {
    pub fn handle(&self) -> Result<()> {
        let table = open_table(&self.file, self.encoding)?;
        let strref = StrRef::new(self.strref);

        let Some(text) = table.get(strref) else {
            return Err(miette!("talk table has no entry {strref}"));
        };

        if let Some(sound) = table.sound_resref(strref) {
            info!("linked sound: {sound}");
        }

        println!("{text}");

        Ok(())
    }
}
