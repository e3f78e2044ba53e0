//! `losses`: classified lost-hectare table for each chosen location.

use crate::connect::connect;
use crate::{csv_writer, Connection};
use campo_core::fetch::{load_comparison, ComparisonData};
use campo_core::filters::CampaignFilters;
use campo_data::threshold::classify;
use campo_utils::numbers::fixed2;
use log::info;
use serde::Serialize;

#[derive(Debug, PartialEq, Serialize)]
pub struct LossRow {
    pub ubicacion: String,
    #[serde(rename = "año")]
    pub year: Option<i32>,
    pub pct_ha_perdidas: Option<String>,
    pub promedio: Option<String>,
    pub estado: &'static str,
}

/// Classified rows for every chosen location, newest year first within each.
pub fn loss_rows(filters: &CampaignFilters, data: &ComparisonData) -> Vec<LossRow> {
    let mut rows = Vec::new();
    for index in 0..2 {
        if filters.location(index).is_none() {
            continue;
        }
        let average = data.averages[index];
        for observation in classify(&data.losses[index], average) {
            rows.push(LossRow {
                ubicacion: data.labels[index].clone(),
                year: observation.year,
                pct_ha_perdidas: observation.value.map(fixed2),
                promedio: average.map(|a| fixed2(a.value)),
                estado: observation.status.css_class(),
            });
        }
    }
    rows
}

pub async fn run_losses(
    connection: &Connection,
    filters: &CampaignFilters,
    output: Option<&str>,
) -> anyhow::Result<()> {
    if !filters.is_fetchable() {
        anyhow::bail!("pass --location1 and/or --location2");
    }
    let (client, session) = connect(connection).await?;
    info!("Loading losses and averages for {:?}", filters);
    let data = load_comparison(&client, &session, filters).await?;
    let rows = loss_rows(filters, &data);

    let mut writer = csv_writer(output)?;
    for row in &rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    info!("Wrote {} loss rows", rows.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use campo_core::level::Level;
    use campo_core::observation::{AverageReference, RawObservation, LOST_PERCENTAGE, YEAR_FIELD};

    fn loss(year: i32, pct: f64) -> RawObservation {
        RawObservation::default()
            .with(YEAR_FIELD, year)
            .with(LOST_PERCENTAGE, pct)
    }

    #[test]
    fn test_rows_for_chosen_location_only() {
        let filters = CampaignFilters {
            level: Some(Level::Country),
            location2: "32".into(),
            ..Default::default()
        };
        let data = ComparisonData {
            losses: [vec![loss(2020, 50.0)], vec![loss(2020, 13.0), loss(2021, 7.5)]],
            averages: [None, Some(AverageReference { value: 10.0 })],
            labels: ["Ubicacion 1".into(), "Argentina".into()],
        };
        let rows = loss_rows(&filters, &data);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].ubicacion, "Argentina");
        assert_eq!(rows[0].year, Some(2021));
        assert_eq!(rows[0].estado, "bajo");
        assert_eq!(rows[0].pct_ha_perdidas.as_deref(), Some("7.50"));
        assert_eq!(rows[1].estado, "alto");
        assert_eq!(rows[1].promedio.as_deref(), Some("10.00"));
    }
}
