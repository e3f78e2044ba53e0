use crate::level::Level;
use crate::observation::RawObservation;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A crop the backend reports campaigns for.
///
/// See: `GET /cultivo`
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Crop {
    #[serde(rename = "id_cultivo", deserialize_with = "id_from_value")]
    pub id: String,
    #[serde(rename = "nombre", default, deserialize_with = "name_from_value")]
    pub name: String,
}

/// A country, region or province selectable as a location.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Place {
    pub id: String,
    pub name: String,
}

impl Place {
    /// Read a place from a catalog record. The id lives under `id_pais`,
    /// `id_region` or `id_provincia` depending on the level.
    pub fn from_record(level: Level, record: &RawObservation) -> Option<Place> {
        let id_key = format!("id_{}", level.as_str());
        let id = record.get(&id_key).and_then(value_to_id)?;
        let name = record
            .get("nombre")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Some(Place { id, name })
    }

    /// Convert a whole catalog response, skipping records without an id.
    pub fn from_records(level: Level, records: &[RawObservation]) -> Vec<Place> {
        records
            .iter()
            .filter_map(|record| Place::from_record(level, record))
            .collect()
    }
}

/// Every selectable crop and place, loaded once when the dashboard mounts.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct Catalog {
    pub crops: Vec<Crop>,
    pub countries: Vec<Place>,
    pub regions: Vec<Place>,
    pub provinces: Vec<Place>,
}

impl Catalog {
    /// Places available for the given level.
    pub fn places(&self, level: Level) -> &[Place] {
        match level {
            Level::Country => &self.countries,
            Level::Region => &self.regions,
            Level::Province => &self.provinces,
        }
    }

    pub fn set_places(&mut self, level: Level, places: Vec<Place>) {
        match level {
            Level::Country => self.countries = places,
            Level::Region => self.regions = places,
            Level::Province => self.provinces = places,
        }
    }
}

/// Ids arrive as JSON numbers or strings; keep them as strings.
pub(crate) fn value_to_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn id_from_value<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    value_to_id(&value).ok_or_else(|| serde::de::Error::custom("id must be a number or string"))
}

/// Names may be missing or null; both read as empty.
fn name_from_value<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.as_str().unwrap_or_default().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> RawObservation {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_crop_accepts_numeric_and_string_ids() {
        let crops: Vec<Crop> = serde_json::from_value(json!([
            {"id_cultivo": 3, "nombre": "Soja"},
            {"id_cultivo": "7", "nombre": "Maíz"}
        ]))
        .unwrap();
        assert_eq!(crops[0].id, "3");
        assert_eq!(crops[0].name, "Soja");
        assert_eq!(crops[1].id, "7");
    }

    #[test]
    fn test_crop_without_name_does_not_fail_the_list() {
        let crops: Vec<Crop> = serde_json::from_value(json!([
            {"id_cultivo": 1, "nombre": null},
            {"id_cultivo": 2},
            {"id_cultivo": 3, "nombre": "Trigo"}
        ]))
        .unwrap();
        assert_eq!(crops.len(), 3);
        assert_eq!(crops[0].name, "");
        assert_eq!(crops[1].name, "");
        assert_eq!(crops[2].name, "Trigo");
    }

    #[test]
    fn test_place_from_record_uses_level_id_field() {
        let region = record(json!({"id_region": 4, "nombre": "Pampeana"}));
        let place = Place::from_record(Level::Region, &region).unwrap();
        assert_eq!(place, Place { id: "4".into(), name: "Pampeana".into() });

        // Wrong level: the id field is missing
        assert!(Place::from_record(Level::Province, &region).is_none());
    }

    #[test]
    fn test_catalog_place_lookup() {
        let mut catalog = Catalog::default();
        catalog.set_places(
            Level::Province,
            vec![Place { id: "2".into(), name: "Córdoba".into() }],
        );
        assert_eq!(catalog.places(Level::Province).len(), 1);
        assert!(catalog.places(Level::Region).is_empty());
        assert_eq!(catalog.places(Level::Province)[0].name, "Córdoba");
    }
}
