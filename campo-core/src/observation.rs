use crate::level::Level;
use crate::normalize::normalize_metric;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Field carrying the campaign year (number, "YYYY" or a date string).
pub const YEAR_FIELD: &str = "año";

/// Sown hectares in a campaign record.
pub const SOWN_HECTARES: &str = "ha_sembradas";

/// Harvested hectares in a campaign record.
pub const HARVESTED_HECTARES: &str = "ha_cosechadas";

/// Percentage of hectares lost in a loss record.
pub const LOST_PERCENTAGE: &str = "pct_ha_perdidas";

/// Average loss percentage in an average record.
pub const AVERAGE_LOST_PERCENTAGE: &str = "prom_pct_ha_perdidas";

/// One record returned by the backend for a location.
///
/// The backend's field set varies per endpoint, so the record is kept as a
/// JSON object and read through the normalizer.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawObservation(pub Map<String, Value>);

impl RawObservation {
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Builder used by tests and fixtures.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.0.insert(key.to_string(), value.into());
        self
    }
}

/// Response envelope: `{ "data": [...] }`.
///
/// A missing or null `data` is an empty collection, not an error.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    #[serde(default)]
    pub data: Option<Vec<T>>,
}

impl<T> Envelope<T> {
    pub fn into_data(self) -> Vec<T> {
        self.data.unwrap_or_default()
    }
}

/// Reference average for one location, used by the threshold classifier.
#[derive(Debug, PartialEq, Clone, Copy, Serialize, Deserialize)]
pub struct AverageReference {
    pub value: f64,
}

impl AverageReference {
    /// Read the average from the first record of a `promHaPerdidas` response.
    /// Numeric strings are accepted; anything unparseable yields `None`.
    pub fn from_records(records: &[RawObservation]) -> Option<AverageReference> {
        let first = records.first()?;
        normalize_metric(first, AVERAGE_LOST_PERCENTAGE).map(|value| AverageReference { value })
    }
}

/// Fallback labels for the two compared locations.
pub const DEFAULT_LOCATION_LABELS: [&str; 2] = ["Ubicacion 1", "Ubicacion 2"];

/// Name of a location as reported by its first record, if any.
pub fn location_name(records: &[RawObservation], level: Level) -> Option<String> {
    records
        .first()?
        .get(level.name_field())
        .and_then(Value::as_str)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

/// Label for location slot `index` (0 or 1), falling back to "Ubicacion N".
pub fn location_label(records: &[RawObservation], level: Level, index: usize) -> String {
    location_name(records, level)
        .unwrap_or_else(|| DEFAULT_LOCATION_LABELS[index.min(1)].to_string())
}
