use serde::{Deserialize, Serialize};

use crate::{ColumnSettings, DateTimeUnit};

const TEMPORAL_BASE_TYPES: &[&str] = &[
    "type/Date",
    "type/DateTime",
    "type/DateTimeWithTZ",
    "type/DateTimeWithLocalTZ",
    "type/DateTimeWithZoneID",
    "type/DateTimeWithZoneOffset",
    "type/Time",
    "type/TimeWithTZ",
    "type/Temporal",
    "type/Instant",
];

const IDENTIFIER_SEMANTIC_TYPES: &[&str] = &["type/PK", "type/FK"];

/// Metadata describing a result column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub semantic_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<DateTimeUnit>,
    #[serde(default)]
    pub settings: ColumnSettings,
}

impl Column {
    pub fn new<S: AsRef<str>>(name: S) -> Self {
        Self {
            name: name.as_ref().to_string(),
            ..Default::default()
        }
    }

    pub fn with_base_type<S: AsRef<str>>(mut self, base_type: S) -> Self {
        self.base_type = Some(base_type.as_ref().to_string());
        self
    }

    pub fn with_semantic_type<S: AsRef<str>>(mut self, semantic_type: S) -> Self {
        self.semantic_type = Some(semantic_type.as_ref().to_string());
        self
    }

    pub fn with_unit(mut self, unit: DateTimeUnit) -> Self {
        self.unit = Some(unit);
        self
    }

    pub fn with_settings(mut self, settings: ColumnSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Whether this column holds dates, times or timestamps.
    pub fn is_temporal(&self) -> bool {
        self.base_type
            .as_deref()
            .map(|t| TEMPORAL_BASE_TYPES.contains(&t))
            .unwrap_or(false)
    }

    /// Primary and foreign keys are shown verbatim, without number
    /// formatting.
    pub fn is_identifier(&self) -> bool {
        self.semantic_type
            .as_deref()
            .map(|t| IDENTIFIER_SEMANTIC_TYPES.contains(&t))
            .unwrap_or(false)
    }

    /// Case-insensitive name comparison. `lower_name` must already be
    /// lower-cased.
    pub(crate) fn name_matches(&self, lower_name: &str) -> bool {
        self.name.to_lowercase() == lower_name
    }
}
