//! Filter panel state: the editable draft and the applied filters that
//! drive fetching.

use crate::level::Level;
use campo_utils::dates::{parse_year, year_end_param, year_start_param};
use serde::{Deserialize, Serialize};

/// Earliest campaign year the year inputs accept.
pub const MIN_YEAR: i32 = 1970;

/// Latest campaign year the year inputs accept.
pub const MAX_YEAR: i32 = 2023;

/// Filters as last submitted. Any change to these triggers a re-fetch.
#[derive(Debug, Default, PartialEq, Eq, Clone, Hash, Serialize, Deserialize)]
pub struct CampaignFilters {
    pub year_from: String,
    pub year_to: String,
    pub crop: String,
    pub level: Option<Level>,
    pub location1: String,
    pub location2: String,
}

impl CampaignFilters {
    /// Location id for slot 0 or 1, `None` when unset.
    pub fn location(&self, index: usize) -> Option<&str> {
        let id = if index == 0 { &self.location1 } else { &self.location2 };
        let id = id.trim();
        (!id.is_empty()).then_some(id)
    }

    /// True when a level and at least one location are selected.
    pub fn is_fetchable(&self) -> bool {
        self.level.is_some() && (self.location(0).is_some() || self.location(1).is_some())
    }

    /// Which location slot the comparison view shows. With a single
    /// location chosen that one wins; with none, slot 0.
    pub fn active_location(&self, requested: usize) -> usize {
        match (self.location(0).is_some(), self.location(1).is_some()) {
            (true, true) => requested.min(1),
            (false, true) => 1,
            _ => 0,
        }
    }

    /// Campaign span for section headers: "Campañas 2019 - 2021",
    /// "Campañas desde 2019", "Campañas hasta 2021" or "Todas las campañas".
    pub fn range_caption(&self) -> String {
        let from = parse_year(&self.year_from);
        let to = parse_year(&self.year_to);
        match (from, to) {
            (Some(from), Some(to)) => format!("Campañas {} - {}", from, to),
            (Some(from), None) => format!("Campañas desde {}", from),
            (None, Some(to)) => format!("Campañas hasta {}", to),
            (None, None) => "Todas las campañas".to_string(),
        }
    }

    /// Query parameters shared by every campaign endpoint. Blank filters are
    /// omitted rather than sent empty.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(from) = year_start_param(&self.year_from) {
            params.push(("añoDesde", from));
        }
        if let Some(to) = year_end_param(&self.year_to) {
            params.push(("añoHasta", to));
        }
        let crop = self.crop.trim();
        if !crop.is_empty() {
            params.push(("cultivo", crop.to_string()));
        }
        params
    }
}

/// The filter form as the user edits it. Submitting copies it into
/// [`CampaignFilters`].
#[derive(Debug, Default, PartialEq, Eq, Clone)]
pub struct FilterDraft {
    filters: CampaignFilters,
}

impl FilterDraft {
    pub fn current(&self) -> &CampaignFilters {
        &self.filters
    }

    /// Setting a start year at or after the end year clears the end year.
    pub fn set_year_from(&mut self, value: &str) {
        self.filters.year_from = value.to_string();
        let from = parse_year(value);
        let to = parse_year(&self.filters.year_to);
        if !self.filters.year_to.is_empty() {
            if let (Some(from), Some(to)) = (from, to) {
                if from >= to {
                    self.filters.year_to.clear();
                }
            }
        }
    }

    pub fn set_year_to(&mut self, value: &str) {
        self.filters.year_to = value.to_string();
    }

    /// The end year input stays disabled until a start year is entered.
    pub fn year_to_enabled(&self) -> bool {
        !self.filters.year_from.trim().is_empty()
    }

    /// Lower bound for the end year input.
    pub fn year_to_min(&self) -> i32 {
        parse_year(&self.filters.year_from)
            .map(|from| from + 1)
            .unwrap_or(MIN_YEAR)
    }

    pub fn set_crop(&mut self, value: &str) {
        self.filters.crop = value.to_string();
    }

    /// Changing the level invalidates both selected locations.
    pub fn set_level(&mut self, level: Option<Level>) {
        self.filters.level = level;
        self.filters.location1.clear();
        self.filters.location2.clear();
    }

    pub fn set_location(&mut self, index: usize, id: &str) {
        if index == 0 {
            self.filters.location1 = id.to_string();
        } else {
            self.filters.location2 = id.to_string();
        }
    }

    /// Snapshot of the draft to apply on submit.
    pub fn submit(&self) -> CampaignFilters {
        self.filters.clone()
    }

    /// The draft, if it differs from the filters already applied.
    /// Resubmitting the same values should not start new fetches.
    pub fn submit_changed(&self, applied: &CampaignFilters) -> Option<CampaignFilters> {
        (self.filters != *applied).then(|| self.submit())
    }
}
