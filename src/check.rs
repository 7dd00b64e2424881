//! Checks survey CSV files by ingesting them against a schema.
//!
//! Each file is read with [`read_survey_file()`](crate::ingest::read_survey_file);
//! failures are reported with the offending file's name. By default the first
//! failing file stops the run.

use anyhow::{Context, Result, bail};
use log::{error, info, warn};

use crate::{
    cli::CheckArgs,
    error::CsvParsingError,
    ingest::{self, ReadOptions, RowPolicy, SurveyFile},
    io_utils,
    schema::SchemaDescription,
};

pub fn execute(args: &CheckArgs) -> Result<()> {
    let schema = SchemaDescription::load(&args.schema)
        .with_context(|| format!("Loading schema from {:?}", args.schema))?;
    let options = ReadOptions {
        delimiter: args.delimiter,
        encoding: io_utils::resolve_encoding(args.input_encoding.as_deref())?,
        policy: if args.skip_invalid {
            RowPolicy::Skip
        } else {
            RowPolicy::Abort
        },
    };

    let mut failures = Vec::new();
    for input in &args.inputs {
        match ingest::read_survey_file(input, &schema, &options) {
            Ok(file) => info!("{}", summarize(&file)),
            Err(err) if args.keep_going => {
                error!("{}", failure_message(&err));
                failures.push(err);
            }
            Err(err) => {
                return Err(anyhow::Error::new(err))
                    .with_context(|| format!("Checking {input:?}"));
            }
        }
    }
    if !failures.is_empty() {
        let names = failures
            .iter()
            .map(CsvParsingError::file_name)
            .collect::<Vec<_>>();
        bail!(
            "{} of {} file(s) failed: {}",
            failures.len(),
            args.inputs.len(),
            names.join(", ")
        );
    }
    Ok(())
}

pub fn summarize(file: &SurveyFile) -> String {
    let name = file
        .path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.path.display().to_string());
    let mut summary = format!("✓ '{name}': {} row(s)", file.row_count());
    if file.skipped > 0 {
        summary.push_str(&format!(", {} skipped", file.skipped));
    }
    if let Some(date) = file.file_date {
        summary.push_str(&format!(", logged {date}"));
    }
    if !file.unknown_headers.is_empty() {
        warn!(
            "'{name}' has column(s) outside the schema: {}",
            file.unknown_headers.join(", ")
        );
    }
    summary
}

pub fn failure_message(err: &CsvParsingError) -> String {
    format!("✗ '{}': {}", err.file_name(), err.message())
}
