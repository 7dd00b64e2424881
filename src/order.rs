//! Canonical column ordering derived from a schema description.
//!
//! [`DeclaredColumnOrder`] folds every field's resolved column name and keeps
//! them in declaration order. Comparing two header names compares their first
//! positions in that list. Names the schema does not know take position `-1`,
//! so they sort ahead of every known column and tie with each other. That
//! tie makes the ordering inconsistent with a total order over known and
//! unknown names together; callers that sort rely on a stable sort to keep
//! unknown headers in their original relative order.

use std::cmp::Ordering;

use crate::{
    error::InvalidArgument,
    schema::{SchemaDescription, SurveyRecord},
    text,
};

const NOT_FOUND: isize = -1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredColumnOrder {
    columns: Vec<String>,
}

impl DeclaredColumnOrder {
    pub fn new(schema: &SchemaDescription) -> Result<Self, InvalidArgument> {
        if schema.is_empty() {
            return Err(InvalidArgument(
                "schema description must declare at least one field".to_string(),
            ));
        }
        let columns = schema
            .fields
            .iter()
            .map(|field| text::fold_case(field.resolved_column()).into_owned())
            .collect();
        Ok(Self { columns })
    }

    pub fn for_record<R: SurveyRecord>() -> Result<Self, InvalidArgument> {
        Self::new(R::schema())
    }

    /// Canonical, folded column names in declaration order. Duplicates are
    /// kept; lookups resolve to the first occurrence.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn position(&self, column: &str) -> Option<usize> {
        let folded = text::fold_case(column);
        self.columns.iter().position(|c| *c == folded)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.position(column).is_some()
    }

    fn index_of(&self, column: &str) -> isize {
        self.position(column)
            .map_or(NOT_FOUND, |idx| idx as isize)
    }

    pub fn compare(&self, left: &str, right: &str) -> Ordering {
        self.index_of(left).cmp(&self.index_of(right))
    }

    /// [`compare`](Self::compare) as `-1`, `0` or `1`.
    pub fn compare_signum(&self, left: &str, right: &str) -> i32 {
        match self.compare(left, right) {
            Ordering::Less => -1,
            Ordering::Equal => 0,
            Ordering::Greater => 1,
        }
    }

    /// Stable sort of `headers` into canonical order.
    pub fn sort_headers<S: AsRef<str>>(&self, headers: &mut [S]) {
        headers.sort_by(|a, b| self.compare(a.as_ref(), b.as_ref()));
    }

    /// Permutation that arranges `headers` canonically: `result[i]` is the
    /// index in `headers` of the column that goes to position `i`.
    pub fn permutation<S: AsRef<str>>(&self, headers: &[S]) -> Vec<usize> {
        let mut indices = (0..headers.len()).collect::<Vec<_>>();
        indices.sort_by(|&a, &b| self.compare(headers[a].as_ref(), headers[b].as_ref()));
        indices
    }

    /// Headers that match no canonical column, in their original order.
    pub fn unknown_headers<'a, S: AsRef<str>>(&self, headers: &'a [S]) -> Vec<&'a str> {
        headers
            .iter()
            .map(AsRef::as_ref)
            .filter(|h| !self.contains(h))
            .collect()
    }

    /// Canonical columns absent from `headers`, in declaration order.
    pub fn missing_columns<S: AsRef<str>>(&self, headers: &[S]) -> Vec<&str> {
        let present = headers
            .iter()
            .map(|h| text::fold_case(h.as_ref()).into_owned())
            .collect::<Vec<_>>();
        let mut missing: Vec<&str> = Vec::new();
        for column in &self.columns {
            if !present.contains(column) && !missing.contains(&column.as_str()) {
                missing.push(column);
            }
        }
        missing
    }
}
