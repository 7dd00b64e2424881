use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Align and check instrument survey CSV files against a declared schema",
    long_about = None
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// List the canonical columns a schema declares
    Columns(ColumnsArgs),
    /// Print header names in canonical schema order
    Sort(SortArgs),
    /// Rewrite a CSV file with its columns in canonical schema order
    Align(AlignArgs),
    /// Read one or more CSV files and convert every value by the schema
    Check(CheckArgs),
}

#[derive(Debug, Args)]
pub struct ColumnsArgs {
    /// Schema YAML file
    #[arg(short, long)]
    pub schema: PathBuf,
}

#[derive(Debug, Args)]
pub struct SortArgs {
    /// Schema YAML file
    #[arg(short, long)]
    pub schema: PathBuf,
    /// Header names to sort (comma-separated values are split)
    #[arg(required = true, value_delimiter = ',')]
    pub headers: Vec<String>,
}

#[derive(Debug, Args)]
pub struct AlignArgs {
    /// Schema YAML file
    #[arg(short, long)]
    pub schema: PathBuf,
    /// Input CSV file (`-` for stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Output CSV file (stdout if omitted)
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input file (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Schema YAML file
    #[arg(short, long)]
    pub schema: PathBuf,
    /// One or more CSV files to check
    #[arg(short = 'i', long = "input", required = true, action = clap::ArgAction::Append)]
    pub inputs: Vec<PathBuf>,
    /// CSV delimiter character (supports ',', 'tab', ';', '|')
    #[arg(long, value_parser = parse_delimiter)]
    pub delimiter: Option<u8>,
    /// Character encoding of the input files (defaults to utf-8)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
    /// Drop rows with unconvertible values instead of failing the file
    #[arg(long = "skip-invalid")]
    pub skip_invalid: bool,
    /// Keep checking remaining files after one fails
    #[arg(long = "keep-going")]
    pub keep_going: bool,
}

pub fn parse_delimiter(value: &str) -> Result<u8, String> {
    match value {
        "tab" | "\t" => Ok(b'\t'),
        "comma" | "," => Ok(b','),
        "|" | "pipe" => Ok(b'|'),
        ";" | "semicolon" => Ok(b';'),
        other => {
            let mut chars = other.chars();
            let first = chars
                .next()
                .ok_or_else(|| "Delimiter cannot be empty".to_string())?;
            if chars.next().is_some() {
                return Err("Delimiter must be a single character".to_string());
            }
            if !first.is_ascii() {
                return Err("Delimiter must be ASCII".to_string());
            }
            Ok(first as u8)
        }
    }
}
