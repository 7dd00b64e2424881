//! Schema descriptions for survey record types.
//!
//! A [`SchemaDescription`] is the declaration-ordered list of fields a record
//! type exposes, each optionally bound to an explicit CSV column name. It is
//! either loaded from YAML or declared in code through [`SurveyRecord`].
//!
//! ```yaml
//! fields:
//!   - name: timestamp
//!     kind: { type: date_time, format: "%Y-%m-%d %H:%M:%S%.3f" }
//!   - name: lat
//!     column: Latitude
//!     kind: { type: float }
//! file_date:
//!   pattern: '(\d{4}-\d{2}-\d{2})'
//!   formats: ["%Y-%m-%d"]
//! ```

use std::{
    fmt,
    fs::File,
    io::BufReader,
    path::Path,
};

use anyhow::{Context, Result, anyhow, ensure};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::text;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldKind {
    #[default]
    Text,
    Integer,
    Float,
    Date {
        format: String,
    },
    Time {
        format: String,
    },
    DateTime {
        format: String,
    },
    /// `"<week> <seconds>"` relative to the GPS epoch.
    GpsTime,
    /// Milliseconds since the Unix epoch, UTC.
    EpochMillis,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Text => write!(f, "text"),
            FieldKind::Integer => write!(f, "integer"),
            FieldKind::Float => write!(f, "float"),
            FieldKind::Date { format } => write!(f, "date({format})"),
            FieldKind::Time { format } => write!(f, "time({format})"),
            FieldKind::DateTime { format } => write!(f, "date_time({format})"),
            FieldKind::GpsTime => write!(f, "gps_time"),
            FieldKind::EpochMillis => write!(f, "epoch_millis"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// The field's own identifier; used as the column name when no binding
    /// is declared.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    #[serde(default, skip_serializing_if = "is_text")]
    pub kind: FieldKind,
}

fn is_text(kind: &FieldKind) -> bool {
    *kind == FieldKind::Text
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column: None,
            kind: FieldKind::Text,
        }
    }

    pub fn bound_to(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn with_kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    /// Declared column binding when non-blank, otherwise the identifier.
    pub fn resolved_column(&self) -> &str {
        text::non_blank(self.column.as_deref()).unwrap_or(self.name.as_str())
    }
}

/// Where to find the logging date inside a file name, for files whose rows
/// only carry a time of day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileDatePattern {
    pub pattern: String,
    #[serde(default)]
    pub formats: Vec<String>,
}

impl FileDatePattern {
    pub fn regex(&self) -> Result<Regex> {
        Regex::new(&self.pattern)
            .with_context(|| format!("Compiling file date pattern '{}'", self.pattern))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchemaDescription {
    pub fields: Vec<FieldDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_date: Option<FileDatePattern>,
}

impl SchemaDescription {
    pub fn new(fields: Vec<FieldDescriptor>) -> Self {
        Self {
            fields,
            file_date: None,
        }
    }

    pub fn with_file_date(mut self, file_date: FileDatePattern) -> Self {
        self.file_date = Some(file_date);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(!self.fields.is_empty(), "Schema does not declare any fields");
        for (idx, field) in self.fields.iter().enumerate() {
            ensure!(
                !text::is_blank(&field.name),
                "Field at position {} has an empty name",
                idx + 1
            );
            if let FieldKind::Date { format }
            | FieldKind::Time { format }
            | FieldKind::DateTime { format } = &field.kind
            {
                ensure!(
                    !format.is_empty(),
                    "Field '{}' requires a non-empty format",
                    field.name
                );
            }
        }
        if let Some(file_date) = &self.file_date {
            file_date.regex()?;
            ensure!(
                file_date.formats.iter().any(|f| !text::is_blank(f)),
                "File date pattern '{}' declares no formats",
                file_date.pattern
            );
        }
        Ok(())
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let schema: SchemaDescription =
            serde_yaml::from_str(yaml).context("Parsing schema YAML")?;
        schema.validate()?;
        Ok(schema)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening schema file {path:?}"))?;
        let reader = BufReader::new(file);
        let schema: SchemaDescription = serde_yaml::from_reader(reader)
            .with_context(|| format!("Parsing schema YAML {path:?}"))?;
        schema
            .validate()
            .with_context(|| format!("Validating schema {path:?}"))?;
        Ok(schema)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        self.validate()?;
        let file = File::create(path).with_context(|| format!("Creating schema file {path:?}"))?;
        serde_yaml::to_writer(file, self).context("Writing schema YAML")
    }

    pub fn field(&self, name: &str) -> Result<&FieldDescriptor> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| anyhow!("Schema has no field named '{name}'"))
    }
}

/// A record type whose schema is declared once as a static table.
///
/// ```
/// use std::sync::OnceLock;
/// use survey_csv::schema::{FieldDescriptor, SchemaDescription, SurveyRecord};
///
/// struct GpsPoint;
///
/// impl SurveyRecord for GpsPoint {
///     fn schema() -> &'static SchemaDescription {
///         static SCHEMA: OnceLock<SchemaDescription> = OnceLock::new();
///         SCHEMA.get_or_init(|| {
///             SchemaDescription::new(vec![
///                 FieldDescriptor::new("timestamp"),
///                 FieldDescriptor::new("lat").bound_to("Latitude"),
///             ])
///         })
///     }
/// }
///
/// assert_eq!(GpsPoint::schema().fields[1].resolved_column(), "Latitude");
/// ```
pub trait SurveyRecord {
    fn schema() -> &'static SchemaDescription;
}
