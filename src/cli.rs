use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use crate::table::LoadOptions;

/// The startup selector: what the tool does first.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum StartupAction {
    /// Print a random sample of rows, then offer further analysis
    Sample,
    /// Print the dataset description, then offer further analysis
    Description,
    /// Go straight to the interactive menu
    Analytics,
    /// Run the guided data tour
    Tour,
    /// Exit immediately
    Exit,
}

#[derive(Parser, Debug)]
#[command(version, about = "A tool for analyzing student data from file")]
pub struct Args {
    /// What to do first
    #[arg(value_enum)]
    pub action: Option<StartupAction>,

    /// Path to the dataset file
    #[arg(long = "data", default_value = "student_data.csv")]
    pub data: PathBuf,

    /// Specify the delimiter to use when reading the file
    #[arg(long = "delimiter")]
    pub delimiter: Option<u8>,

    /// Specify that the file has no header
    #[arg(long = "no-header", action)]
    pub no_header: bool,

    /// Write the default config file and exit
    #[arg(long = "init-config", action)]
    pub init_config: bool,

    /// Overwrite an existing config file when used with --init-config
    #[arg(long = "force", action)]
    pub force: bool,
}

impl From<&Args> for LoadOptions {
    fn from(args: &Args) -> Self {
        let mut opts = LoadOptions::new();
        if let Some(delimiter) = args.delimiter {
            opts = opts.with_delimiter(delimiter);
        }
        if args.no_header {
            opts = opts.with_has_header(false);
        }
        opts
    }
}
