//! `series`: merged sown and harvested hectares for two locations.

use crate::connect::connect;
use crate::{csv_writer, Connection};
use campo_core::fetch::{load_region_series, RegionSeries};
use campo_core::filters::CampaignFilters;
use campo_core::observation::{HARVESTED_HECTARES, SOWN_HECTARES};
use campo_data::merge::{merge_region, series_labels};
use log::info;
use serde::Serialize;

#[derive(Debug, PartialEq, Serialize)]
pub struct SeriesRow {
    #[serde(rename = "año")]
    pub year: i32,
    pub ubicacion: String,
    pub ha_sembradas: Option<f64>,
    pub ha_cosechadas: Option<f64>,
}

/// One row per year and chosen location. Years inside the requested range
/// without data keep empty cells.
pub fn series_rows(filters: &CampaignFilters, series: &RegionSeries) -> Vec<SeriesRow> {
    if filters.level.is_none() {
        return Vec::new();
    }
    let sown = merge_region(filters, series, SOWN_HECTARES);
    let harvested = merge_region(filters, series, HARVESTED_HECTARES);
    let labels = series_labels(filters, series);

    let mut rows = Vec::new();
    // Both merges cover the same years in the same order
    for (s, h) in sown.iter().zip(&harvested) {
        if filters.location(0).is_some() {
            rows.push(SeriesRow {
                year: s.year,
                ubicacion: labels[0].clone(),
                ha_sembradas: s.location1_value,
                ha_cosechadas: h.location1_value,
            });
        }
        if filters.location(1).is_some() {
            rows.push(SeriesRow {
                year: s.year,
                ubicacion: labels[1].clone(),
                ha_sembradas: s.location2_value,
                ha_cosechadas: h.location2_value,
            });
        }
    }
    rows
}

pub async fn run_series(
    connection: &Connection,
    filters: &CampaignFilters,
    output: Option<&str>,
) -> anyhow::Result<()> {
    if !filters.is_fetchable() {
        anyhow::bail!("pass --location1 and/or --location2");
    }
    let (client, session) = connect(connection).await?;
    info!("Loading campaign series for {:?}", filters);
    let series = load_region_series(&client, &session, filters).await?;
    let rows = series_rows(filters, &series);

    let mut writer = csv_writer(output)?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!("Wrote {} series rows", rows.len());
    Ok(())
}
