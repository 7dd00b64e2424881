//! Rewrites a CSV file with its columns in canonical schema order.

use std::path::Path;

use anyhow::{Context, Result, bail};
use encoding_rs::Encoding;
use log::info;

use crate::{
    cli::AlignArgs,
    io_utils,
    order::DeclaredColumnOrder,
    schema::SchemaDescription,
};

pub fn execute(args: &AlignArgs) -> Result<()> {
    let schema = SchemaDescription::load(&args.schema)
        .with_context(|| format!("Loading schema from {:?}", args.schema))?;
    let order = DeclaredColumnOrder::new(&schema)?;
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let delimiter = io_utils::resolve_input_delimiter(&args.input, args.delimiter);
    let rows = align_file(
        &args.input,
        args.output.as_deref(),
        &order,
        delimiter,
        encoding,
    )
    .with_context(|| format!("Aligning columns of {:?}", args.input))?;
    info!(
        "Aligned {} row(s) from {:?} into canonical column order",
        rows, args.input
    );
    Ok(())
}

/// Copies `input` to `output` (stdout when `None`), permuting every record so
/// its columns follow `order`. Returns the number of data rows written.
pub fn align_file(
    input: &Path,
    output: Option<&Path>,
    order: &DeclaredColumnOrder,
    delimiter: u8,
    encoding: &'static Encoding,
) -> Result<usize> {
    let mut reader = io_utils::open_csv_reader_from_path(input, delimiter)?;
    let headers = io_utils::reader_headers(&mut reader, encoding)?;
    let permutation = order.permutation(&headers);

    let mut writer = io_utils::open_csv_writer(output, delimiter)?;
    writer
        .write_record(permutation.iter().map(|&idx| headers[idx].as_str()))
        .context("Writing header row")?;

    let mut rows = 0usize;
    for (row_idx, record) in reader.byte_records().enumerate() {
        let line = row_idx + 2;
        let record = record.with_context(|| format!("Reading row {line}"))?;
        let decoded = io_utils::decode_record(&record, encoding)
            .with_context(|| format!("Reading row {line}"))?;
        // Cells past the header have no column to move to.
        if decoded.len() > headers.len() {
            bail!(
                "Reading row {line}: record has {} field(s) but header has {}",
                decoded.len(),
                headers.len()
            );
        }
        let aligned = permutation
            .iter()
            .map(|&idx| decoded.get(idx).map(String::as_str).unwrap_or(""));
        writer
            .write_record(aligned)
            .with_context(|| format!("Writing row {line}"))?;
        rows += 1;
    }
    writer.flush().context("Flushing output")?;
    Ok(rows)
}
