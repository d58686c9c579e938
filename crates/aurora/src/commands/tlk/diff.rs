use std::collections::HashSet;
use std::fmt::Display;
use std::path::PathBuf;

use aurora_tlk::StrRef;
use clap::Args;
use itertools::Itertools;
use miette::Result;
use owo_colors::OwoColorize;

use crate::commands::tlk::{open_table, TextEncoding};

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
enum Change {
    Added(StrRef, String),
    Removed(StrRef, String),
    Changed(StrRef, String, String),
}

impl Display for Change {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Change::Added(strref, text) => {
                write!(f, "✅ {}: {}", strref, text.green())
            }
            Change::Removed(strref, text) => {
                write!(f, "❌ {}: {}", strref, text.red())
            }
            Change::Changed(strref, old, new) => {
                write!(f, "🔃 {}: {} vs {}", strref, old.red(), new.green())
            }
        }
    }
}

#[derive(Args)]
pub struct DiffArgs {
    /// An input talk table file
    #[arg(short, long, value_name = "FILE")]
    left: PathBuf,

    /// An input talk table file
    #[arg(short, long, value_name = "FILE")]
    right: PathBuf,

    /// Encoding of the stored text of both tables
    #[arg(short, long, value_enum)]
    encoding: Option<TextEncoding>,
}

impl DiffArgs {
    pub fn handle(&self) -> Result<()> {
        let left = open_table(&self.left, self.encoding)?;
        let right = open_table(&self.right, self.encoding)?;

        let left_refs: HashSet<StrRef> = left.str_refs().into_iter().collect();
        let right_refs: HashSet<StrRef> = right.str_refs().into_iter().collect();

        let mut changes = Vec::new();

        right_refs
            .difference(&left_refs)
            .map(|&strref| Change::Added(strref, right.string(strref)))
            .for_each(|c| changes.push(c));

        left_refs
            .difference(&right_refs)
            .map(|&strref| Change::Removed(strref, left.string(strref)))
            .for_each(|c| changes.push(c));

        left_refs
            .intersection(&right_refs)
            .filter_map(|&strref| {
                let old = left.string(strref);
                let new = right.string(strref);

                (old != new).then_some(Change::Changed(strref, old, new))
            })
            .for_each(|c| changes.push(c));

        for change in changes.iter().sorted() {
            println!("{change}");
        }

        Ok(())
    }
}
