//! Typed ingestion of survey CSV files against a schema description.
//!
//! [`read_survey_file()`] resolves each schema field to a header in the file,
//! converts every cell by the field's [`FieldKind`](crate::schema::FieldKind)
//! and returns the rows in schema field order. Any failure comes back as a
//! [`CsvParsingError`] naming the file; whether a bad row aborts the file or
//! is dropped is chosen by [`RowPolicy`].

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use encoding_rs::{Encoding, UTF_8};
use log::{debug, warn};

use crate::{
    convert::{self, Value},
    error::CsvParsingError,
    io_utils,
    order::DeclaredColumnOrder,
    schema::SchemaDescription,
    text,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RowPolicy {
    /// The first unconvertible value fails the whole file.
    #[default]
    Abort,
    /// Rows with unconvertible values are dropped and counted.
    Skip,
}

#[derive(Debug, Clone, Copy)]
pub struct ReadOptions {
    pub delimiter: Option<u8>,
    pub encoding: &'static Encoding,
    pub policy: RowPolicy,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            encoding: UTF_8,
            policy: RowPolicy::Abort,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SurveyFile {
    pub path: PathBuf,
    /// Header row as found in the file.
    pub headers: Vec<String>,
    /// Headers the schema does not know, in file order.
    pub unknown_headers: Vec<String>,
    /// Canonical columns with no matching header.
    pub missing_columns: Vec<String>,
    /// Logging date recovered from the file name, when the schema asks for it.
    pub file_date: Option<NaiveDate>,
    /// One entry per row; cells follow schema field order.
    pub rows: Vec<Vec<Option<Value>>>,
    pub skipped: usize,
}

impl SurveyFile {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Header row rearranged into canonical order.
    pub fn canonical_headers(&self, order: &DeclaredColumnOrder) -> Vec<String> {
        let mut headers = self.headers.clone();
        order.sort_headers(&mut headers);
        headers
    }
}

/// Index of the header bound to each schema field, first match wins.
pub fn bind_headers(schema: &SchemaDescription, headers: &[String]) -> Vec<Option<usize>> {
    let folded = headers
        .iter()
        .map(|h| text::fold_case(h).into_owned())
        .collect::<Vec<_>>();
    schema
        .fields
        .iter()
        .map(|field| {
            let column = text::fold_case(field.resolved_column());
            folded.iter().position(|h| *h == column)
        })
        .collect()
}

/// Decodes one record and converts the cells bound to schema fields.
fn convert_row(
    schema: &SchemaDescription,
    bindings: &[Option<usize>],
    record: &csv::ByteRecord,
    line: usize,
    path: &Path,
    encoding: &'static Encoding,
) -> Result<Vec<Option<Value>>, CsvParsingError> {
    let decoded = io_utils::decode_record(record, encoding)
        .map_err(|err| CsvParsingError::new(path, format!("Row {line}: {err}")))?;
    schema
        .fields
        .iter()
        .zip(bindings)
        .map(|(field, binding)| {
            let raw = binding
                .and_then(|idx| decoded.get(idx))
                .map(String::as_str)
                .unwrap_or("");
            convert::parse_value(raw, &field.kind).map_err(|err| {
                let location = format!("Row {line}, column '{}'", field.resolved_column());
                err.in_file(path, &location)
            })
        })
        .collect()
}

pub fn read_survey_file(
    path: &Path,
    schema: &SchemaDescription,
    options: &ReadOptions,
) -> Result<SurveyFile, CsvParsingError> {
    let order = DeclaredColumnOrder::new(schema)
        .map_err(|err| CsvParsingError::new(path, err.to_string()))?;
    let file_date = match &schema.file_date {
        Some(pattern) => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            Some(
                convert::date_from_file_name(&name, pattern)
                    .map_err(|err| err.in_file(path, ""))?,
            )
        }
        None => None,
    };

    let delimiter = io_utils::resolve_input_delimiter(path, options.delimiter);
    let mut reader = io_utils::open_csv_reader_from_path(path, delimiter)
        .map_err(|err| CsvParsingError::new(path, format!("{err:#}")))?;
    let headers = io_utils::reader_headers(&mut reader, options.encoding)
        .map_err(|err| CsvParsingError::new(path, format!("{err:#}")))?;
    if headers.iter().all(|h| text::is_blank(h)) {
        return Err(CsvParsingError::new(path, "File has no header row"));
    }

    let bindings = bind_headers(schema, &headers);
    let unknown_headers = order
        .unknown_headers(&headers)
        .into_iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    let missing_columns = order
        .missing_columns(&headers)
        .into_iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    if !unknown_headers.is_empty() {
        debug!("{path:?}: ignoring unknown column(s) {unknown_headers:?}");
    }
    if !missing_columns.is_empty() {
        warn!("{path:?}: missing column(s) {missing_columns:?}");
    }

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for (row_idx, record) in reader.byte_records().enumerate() {
        // Header occupies line 1.
        let line = row_idx + 2;
        let converted = match record {
            Ok(record) => convert_row(schema, &bindings, &record, line, path, options.encoding),
            Err(err) if err.is_io_error() => {
                return Err(CsvParsingError::new(
                    path,
                    format!("Reading row {line}: {err}"),
                ));
            }
            Err(err) => Err(CsvParsingError::new(
                path,
                format!("Reading row {line}: {err}"),
            )),
        };

        match (converted, options.policy) {
            (Ok(row), _) => rows.push(row),
            (Err(err), RowPolicy::Abort) => return Err(err),
            (Err(err), RowPolicy::Skip) => {
                debug!("Skipping row: {err}");
                skipped += 1;
            }
        }
    }

    Ok(SurveyFile {
        path: path.to_path_buf(),
        headers,
        unknown_headers,
        missing_columns,
        file_date,
        rows,
        skipped,
    })
}
