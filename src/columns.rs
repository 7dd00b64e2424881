//! Column listing from a schema file.
//!
//! Renders each field's position, identifier, resolved column, canonical
//! (folded) name and conversion kind as a table.

use anyhow::{Context, Result};
use log::info;

use crate::{
    cli::ColumnsArgs,
    order::DeclaredColumnOrder,
    schema::SchemaDescription,
    table,
};

pub fn execute(args: &ColumnsArgs) -> Result<()> {
    let schema = SchemaDescription::load(&args.schema)
        .with_context(|| format!("Loading schema from {:?}", args.schema))?;
    let order = DeclaredColumnOrder::new(&schema)?;
    table::print_table(
        &["#", "field", "column", "canonical", "kind"],
        &column_rows(&schema, &order),
    );
    info!(
        "Listed {} column(s) from {:?}",
        schema.fields.len(),
        args.schema
    );
    Ok(())
}

pub fn column_rows(schema: &SchemaDescription, order: &DeclaredColumnOrder) -> Vec<Vec<String>> {
    schema
        .fields
        .iter()
        .zip(order.columns())
        .enumerate()
        .map(|(idx, (field, canonical))| {
            vec![
                (idx + 1).to_string(),
                field.name.clone(),
                field.resolved_column().to_string(),
                canonical.clone(),
                field.kind.to_string(),
            ]
        })
        .collect()
}
