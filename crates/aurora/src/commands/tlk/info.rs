use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::PathBuf;

use aurora_tlk::{Encoding, GffTalkTable, TalkTable, TlkTalkTable};
use clap::Args;
use miette::{miette, Context, IntoDiagnostic, Result};

use crate::commands::tlk::TextEncoding;

#[derive(Args)]
pub struct InfoArgs {
    /// An input talk table file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Encoding of the stored text
    #[arg(short, long, value_enum)]
    encoding: Option<TextEncoding>,
}

impl InfoArgs {
    pub fn handle(&self) -> Result<()> {
        let mut file = File::open(&self.file)
            .into_diagnostic()
            .context(format!("path: {}", &self.file.display()))?;

        // The families print different headers, so unlike the other commands
        // this one keeps the concrete table types.
        let mut magic = [0u8; 4];
        file.read_exact(&mut magic)
            .into_diagnostic()
            .context(format!("path: {}", &self.file.display()))?;
        file.seek(SeekFrom::Start(0)).into_diagnostic()?;

        let encoding = self.encoding.map(Encoding::from);

        match &magic {
            b"GFF " => self.print_gff(&GffTalkTable::new(file, encoding)?),
            b"TLK " => self.print_tlk(&TlkTalkTable::new(file, encoding)?),
            _ => return Err(miette!("{} is not a talk table", self.file.display())),
        }

        Ok(())
    }

    fn print_gff(&self, table: &GffTalkTable) {
        println!("family:  GFF'd talk table");
        println!("version: {}", table.version());
        println!("entries: {}", table.len());
    }

    fn print_tlk(&self, table: &TlkTalkTable) {
        let sounds = table
            .str_refs()
            .into_iter()
            .filter(|&strref| table.sound_resref(strref).is_some())
            .count();

        println!("family:   plain row talk table");
        println!("version:  V3.0");
        println!("language: {}", table.language_id());
        println!("rows:     {}", table.len());
        println!("sounds:   {}", sounds);
    }
}
