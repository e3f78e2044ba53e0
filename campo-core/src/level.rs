use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Geographic granularity of a query.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    #[serde(rename = "pais")]
    Country,
    Region,
    #[serde(rename = "provincia")]
    Province,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::Country, Level::Region, Level::Province];

    /// Wire name used by the backend and the level select.
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Country => "pais",
            Level::Region => "region",
            Level::Province => "provincia",
        }
    }

    /// Label shown in the level select.
    pub fn label(&self) -> &'static str {
        match self {
            Level::Country => "País",
            Level::Region => "Región",
            Level::Province => "Provincia",
        }
    }

    /// Suffix of the per-level endpoint family, e.g. `/campana/porRegion`.
    fn endpoint_suffix(&self) -> &'static str {
        match self {
            Level::Country => "Pais",
            Level::Region => "Region",
            Level::Province => "Provincia",
        }
    }

    /// Campaign series (sown / harvested hectares) for one location.
    pub fn campaigns_path(&self, location_id: &str) -> String {
        format!("/campana/por{}/{}", self.endpoint_suffix(), location_id)
    }

    /// Loss percentage series for one location.
    pub fn losses_path(&self, location_id: &str) -> String {
        format!("/campana/haPerdidasPor{}/{}", self.endpoint_suffix(), location_id)
    }

    /// Average loss percentage for one location.
    pub fn average_path(&self, location_id: &str) -> String {
        format!(
            "/campana/promHaPerdidasPor{}/{}",
            self.endpoint_suffix(),
            location_id
        )
    }

    /// Catalog endpoint listing every place at this level.
    pub fn catalog_path(&self) -> &'static str {
        match self {
            Level::Country => "/pais",
            Level::Region => "/region",
            Level::Province => "/provincia",
        }
    }

    /// Record field that carries the location name in series responses.
    pub fn name_field(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pais" => Ok(Level::Country),
            "region" => Ok(Level::Region),
            "provincia" => Ok(Level::Province),
            other => Err(format!("unknown level: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Level;

    #[test]
    fn test_endpoint_paths() {
        assert_eq!(Level::Region.campaigns_path("7"), "/campana/porRegion/7");
        assert_eq!(
            Level::Province.losses_path("12"),
            "/campana/haPerdidasPorProvincia/12"
        );
        assert_eq!(
            Level::Country.average_path("1"),
            "/campana/promHaPerdidasPorPais/1"
        );
        assert_eq!(Level::Province.catalog_path(), "/provincia");
    }

    #[test]
    fn test_parse_round_trip_names() {
        for level in Level::ALL {
            assert_eq!(level.as_str().parse::<Level>(), Ok(level));
        }
        assert!("municipio".parse::<Level>().is_err());
        assert!("".parse::<Level>().is_err());
    }

    #[test]
    fn test_serde_wire_names() {
        assert_eq!(serde_json::to_string(&Level::Country).unwrap(), "\"pais\"");
        let level: Level = serde_json::from_str("\"provincia\"").unwrap();
        assert_eq!(level, Level::Province);
    }
}
