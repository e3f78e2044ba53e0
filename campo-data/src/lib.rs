//! Data processing for campaign observations.
//!
//! This crate turns normalized backend records into the shapes the charts
//! and tables consume: year-aligned series for two locations, and loss
//! observations classified against a reference average. The `chart`
//! module cuts rows into the line runs and ranges the plotters charts use.

/// Year-aligned merging of two per-location series.
pub mod merge {
    use campo_core::fetch::RegionSeries;
    use campo_core::filters::CampaignFilters;
    use campo_core::normalize::{normalize_metric, normalize_year};
    use campo_core::observation::{location_label, RawObservation, DEFAULT_LOCATION_LABELS};
    use campo_utils::dates::parse_year;
    use serde::Serialize;
    use std::collections::BTreeMap;
    use std::ops::RangeInclusive;

    /// One year of a merged two-location series.
    #[derive(Debug, Clone, Copy, Serialize, PartialEq)]
    pub struct SeriesPoint {
        pub year: i32,
        pub location1_value: Option<f64>,
        pub location2_value: Option<f64>,
    }

    impl SeriesPoint {
        fn empty(year: i32) -> Self {
            Self {
                year,
                location1_value: None,
                location2_value: None,
            }
        }
    }

    /// Long-form chart row: one value of one named series in one year.
    #[derive(Debug, Clone, Serialize, PartialEq)]
    pub struct ChartRow {
        pub year: i32,
        pub series_name: String,
        pub value: Option<f64>,
    }

    /// Inclusive year range, if both bounds parse and `end >= start`.
    pub fn year_range(start: Option<&str>, end: Option<&str>) -> Option<RangeInclusive<i32>> {
        let start = parse_year(start?)?;
        let end = parse_year(end?)?;
        (end >= start).then_some(start..=end)
    }

    /// Merge `series_a` and `series_b` on `metric` into one point per year.
    ///
    /// Series A is written first, then B; each only fills its own slot.
    /// Records without a usable year are dropped. With a valid range every
    /// year of it is emitted (gaps as `None`), otherwise only years present
    /// in either series. Output is ascending by year.
    pub fn merge_series(
        series_a: &[RawObservation],
        series_b: &[RawObservation],
        metric: &str,
        range_start: Option<&str>,
        range_end: Option<&str>,
    ) -> Vec<SeriesPoint> {
        let mut by_year: BTreeMap<i32, SeriesPoint> = BTreeMap::new();
        for record in series_a {
            if let Some(year) = normalize_year(record) {
                by_year
                    .entry(year)
                    .or_insert_with(|| SeriesPoint::empty(year))
                    .location1_value = normalize_metric(record, metric);
            }
        }
        for record in series_b {
            if let Some(year) = normalize_year(record) {
                by_year
                    .entry(year)
                    .or_insert_with(|| SeriesPoint::empty(year))
                    .location2_value = normalize_metric(record, metric);
            }
        }

        match year_range(range_start, range_end) {
            Some(range) => range
                .map(|year| {
                    by_year
                        .get(&year)
                        .copied()
                        .unwrap_or_else(|| SeriesPoint::empty(year))
                })
                .collect(),
            None => by_year.into_values().collect(),
        }
    }

    /// Long-form rows for a merged series, two rows per year. Missing values
    /// stay `None` so the chart can break the line there.
    pub fn to_chart_rows(points: &[SeriesPoint], names: [&str; 2]) -> Vec<ChartRow> {
        points
            .iter()
            .flat_map(|point| {
                [
                    ChartRow {
                        year: point.year,
                        series_name: names[0].to_string(),
                        value: point.location1_value,
                    },
                    ChartRow {
                        year: point.year,
                        series_name: names[1].to_string(),
                        value: point.location2_value,
                    },
                ]
            })
            .collect()
    }

    /// Name of each location slot, read from the first record of its
    /// series. Without a level both slots keep their fallback labels.
    pub fn series_labels(filters: &CampaignFilters, series: &RegionSeries) -> [String; 2] {
        match filters.level {
            Some(level) => [
                location_label(&series.location1, level, 0),
                location_label(&series.location2, level, 1),
            ],
            None => DEFAULT_LOCATION_LABELS.map(str::to_string),
        }
    }

    /// [`merge_series`] of both locations over the submitted year range.
    pub fn merge_region(
        filters: &CampaignFilters,
        series: &RegionSeries,
        metric: &str,
    ) -> Vec<SeriesPoint> {
        merge_series(
            &series.location1,
            &series.location2,
            metric,
            Some(filters.year_from.as_str()),
            Some(filters.year_to.as_str()),
        )
    }

    /// Long-form rows for `metric`, with rows only for the location slots
    /// the filters actually chose.
    pub fn chart_rows_for(
        filters: &CampaignFilters,
        series: &RegionSeries,
        metric: &str,
    ) -> Vec<ChartRow> {
        let labels = series_labels(filters, series);
        let chosen = [filters.location(0).is_some(), filters.location(1).is_some()];
        let mut rows = Vec::new();
        for point in merge_region(filters, series, metric) {
            let values = [point.location1_value, point.location2_value];
            for ((label, value), chosen) in labels.iter().zip(values).zip(chosen) {
                if chosen {
                    rows.push(ChartRow {
                        year: point.year,
                        series_name: label.clone(),
                        value,
                    });
                }
            }
        }
        rows
    }

}

/// Tolerance-band classification of loss percentages.
pub mod threshold {
    use campo_core::normalize::{normalize_metric, normalize_year};
    use campo_core::observation::{AverageReference, RawObservation, LOST_PERCENTAGE};
    use campo_utils::numbers::fixed2;
    use serde::Serialize;
    use std::cmp::Ordering;

    /// Half-width of the band around the average, in percentage points.
    pub const TOLERANCE_POINTS: f64 = 2.0;

    /// Where an observation falls relative to the reference band.
    #[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
    pub enum ThresholdStatus {
        Low,
        Medium,
        High,
    }

    impl ThresholdStatus {
        /// CSS class of the status dot.
        pub fn css_class(&self) -> &'static str {
            match self {
                ThresholdStatus::Low => "bajo",
                ThresholdStatus::Medium => "medio",
                ThresholdStatus::High => "alto",
            }
        }

        /// Dot colour: green, yellow, red.
        pub fn color(&self) -> &'static str {
            match self {
                ThresholdStatus::Low => "#4CAF50",
                ThresholdStatus::Medium => "#FFC107",
                ThresholdStatus::High => "#F44336",
            }
        }
    }

    /// `[average - 2, average + 2]`.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct ToleranceBand {
        pub lower: f64,
        pub upper: f64,
    }

    impl ToleranceBand {
        pub fn around(average: f64) -> Self {
            Self {
                lower: average - TOLERANCE_POINTS,
                upper: average + TOLERANCE_POINTS,
            }
        }

        /// High above `upper` (exclusive), low at or below `lower`.
        pub fn classify(&self, value: Option<f64>) -> ThresholdStatus {
            match value {
                Some(v) if v > self.upper => ThresholdStatus::High,
                Some(v) if v <= self.lower => ThresholdStatus::Low,
                _ => ThresholdStatus::Medium,
            }
        }
    }

    /// A loss observation annotated for the comparison table.
    #[derive(Debug, Clone, Serialize, PartialEq)]
    pub struct ClassifiedObservation {
        pub year: Option<i32>,
        pub value: Option<f64>,
        pub status: ThresholdStatus,
    }

    impl ClassifiedObservation {
        /// "12.34%", or "s/d" when the record had no readable value.
        pub fn display_value(&self) -> String {
            match self.value {
                Some(v) => format!("{}%", fixed2(v)),
                None => "s/d".to_string(),
            }
        }
    }

    /// Classify the loss percentage of each record against `average`.
    ///
    /// Without an average everything is medium. The result is ordered
    /// newest year first; records without a year go last.
    pub fn classify(
        records: &[RawObservation],
        average: Option<AverageReference>,
    ) -> Vec<ClassifiedObservation> {
        classify_metric(records, LOST_PERCENTAGE, average)
    }

    /// [`classify`] on an arbitrary metric field.
    pub fn classify_metric(
        records: &[RawObservation],
        metric: &str,
        average: Option<AverageReference>,
    ) -> Vec<ClassifiedObservation> {
        let band = average.map(|avg| ToleranceBand::around(avg.value));
        let mut classified: Vec<ClassifiedObservation> = records
            .iter()
            .map(|record| {
                let value = normalize_metric(record, metric);
                let status = band
                    .map(|band| band.classify(value))
                    .unwrap_or(ThresholdStatus::Medium);
                ClassifiedObservation {
                    year: normalize_year(record),
                    value,
                    status,
                }
            })
            .collect();
        // Newest first, missing years last
        classified.sort_by(|a, b| match (a.year, b.year) {
            (Some(x), Some(y)) => y.cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        log::debug!("classified {} observations", classified.len());
        classified
    }

    /// "Promedio 2019 - 2021" heading and "10.00%" value for the average box.
    pub fn average_caption(
        average: &AverageReference,
        year_from: &str,
        year_to: &str,
    ) -> (String, String) {
        (
            format!("Promedio {} - {}", year_from, year_to),
            format!("{}%", fixed2(average.value)),
        )
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use campo_core::observation::YEAR_FIELD;

        fn loss(year: i32, pct: f64) -> RawObservation {
            RawObservation::default()
                .with(YEAR_FIELD, year)
                .with(LOST_PERCENTAGE, pct)
        }

        #[test]
        fn test_scenario_average_ten() {
            let records: Vec<RawObservation> = [7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0]
                .iter()
                .enumerate()
                .map(|(i, pct)| loss(2000 + i as i32, *pct))
                .collect();
            let classified = classify(&records, Some(AverageReference { value: 10.0 }));
            // Sorted newest first, so reverse to read in input order
            let statuses: Vec<ThresholdStatus> =
                classified.iter().rev().map(|c| c.status).collect();
            use ThresholdStatus::*;
            assert_eq!(statuses, vec![Low, Low, Medium, Medium, Medium, Medium, High]);
        }

        #[test]
        fn test_band_boundaries() {
            let band = ToleranceBand::around(5.0);
            assert_eq!(band.classify(Some(7.0)), ThresholdStatus::Medium);
            assert_eq!(band.classify(Some(7.000001)), ThresholdStatus::High);
            assert_eq!(band.classify(Some(3.0)), ThresholdStatus::Low);
            assert_eq!(band.classify(Some(3.000001)), ThresholdStatus::Medium);
            assert_eq!(band.classify(None), ThresholdStatus::Medium);
        }

        #[test]
        fn test_classification_is_monotonic() {
            let band = ToleranceBand::around(10.0);
            let rank = |s: ThresholdStatus| match s {
                ThresholdStatus::Low => 0,
                ThresholdStatus::Medium => 1,
                ThresholdStatus::High => 2,
            };
            let mut previous = 0;
            for step in 0..=400 {
                let value = step as f64 * 0.05;
                let current = rank(band.classify(Some(value)));
                assert!(current >= previous, "status dropped at {value}");
                previous = current;
            }
        }

        #[test]
        fn test_no_average_is_all_medium() {
            let records = vec![loss(2020, 0.0), loss(2021, 99.0)];
            assert!(classify(&records, None)
                .iter()
                .all(|c| c.status == ThresholdStatus::Medium));
        }

        #[test]
        fn test_sorted_newest_first_with_missing_years_last() {
            let records = vec![
                loss(2019, 1.0),
                RawObservation::default().with(LOST_PERCENTAGE, 2.0),
                loss(2022, 3.0),
                loss(2020, 4.0),
            ];
            let years: Vec<Option<i32>> = classify(&records, None).iter().map(|c| c.year).collect();
            assert_eq!(years, vec![Some(2022), Some(2020), Some(2019), None]);
        }

        #[test]
        fn test_display_strings() {
            let c = ClassifiedObservation {
                year: Some(2020),
                value: Some(12.345),
                status: ThresholdStatus::High,
            };
            assert_eq!(c.display_value(), "12.35%");
            assert_eq!(c.status.css_class(), "alto");
            let (title, value) =
                average_caption(&AverageReference { value: 9.5 }, "2019", "2021");
            assert_eq!(title, "Promedio 2019 - 2021");
            assert_eq!(value, "9.50%");
        }
    }
}

/// Line segments and plot ranges for the long-form line charts.
pub mod chart {
    use crate::merge::ChartRow;
    use std::ops::Range;

    /// Series names in order of first appearance.
    pub fn series_names(rows: &[ChartRow]) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for row in rows {
            if !names.contains(&row.series_name) {
                names.push(row.series_name.clone());
            }
        }
        names
    }

    /// Unbroken runs of `(year, value)` for one series. A missing value
    /// ends the current run so the line shows a gap.
    pub fn segments(rows: &[ChartRow], series_name: &str) -> Vec<Vec<(f64, f64)>> {
        let mut runs = Vec::new();
        let mut current = Vec::new();
        for row in rows.iter().filter(|r| r.series_name == series_name) {
            match row.value {
                Some(value) => current.push((f64::from(row.year), value)),
                None if !current.is_empty() => runs.push(std::mem::take(&mut current)),
                None => {}
            }
        }
        if !current.is_empty() {
            runs.push(current);
        }
        runs
    }

    /// Year and value ranges to build the cartesian plane on.
    ///
    /// Years are widened to `f64` before any arithmetic. A single year is
    /// padded by one on each side, and the value axis starts at zero with
    /// ten percent headroom over the largest value.
    pub fn plot_ranges(rows: &[ChartRow]) -> Option<(Range<f64>, Range<f64>)> {
        let first = f64::from(rows.iter().map(|r| r.year).min()?);
        let last = f64::from(rows.iter().map(|r| r.year).max()?);
        let years = if last > first {
            first..last
        } else {
            first - 1.0..last + 1.0
        };
        let max = rows
            .iter()
            .filter_map(|r| r.value)
            .filter(|v| v.is_finite())
            .fold(0.0_f64, f64::max);
        let top = if max > 0.0 { max * 1.1 } else { 1.0 };
        Some((years, 0.0..top))
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        fn row(year: i32, name: &str, value: Option<f64>) -> ChartRow {
            ChartRow {
                year,
                series_name: name.to_string(),
                value,
            }
        }

        #[test]
        fn test_segments_break_on_missing_values() {
            let rows = vec![
                row(2000, "A", Some(1.0)),
                row(2000, "B", None),
                row(2001, "A", None),
                row(2002, "A", Some(3.0)),
                row(2003, "A", Some(4.0)),
            ];
            assert_eq!(
                segments(&rows, "A"),
                vec![vec![(2000.0, 1.0)], vec![(2002.0, 3.0), (2003.0, 4.0)]]
            );
            assert!(segments(&rows, "B").is_empty());
            assert_eq!(series_names(&rows), vec!["A", "B"]);
        }

        #[test]
        fn test_plot_ranges() {
            let rows = vec![row(2019, "A", Some(50.0)), row(2021, "B", None)];
            let (years, values) = plot_ranges(&rows).unwrap();
            assert_eq!(years, 2019.0..2021.0);
            assert_eq!(values.start, 0.0);
            assert!((values.end - 55.0).abs() < 1e-9);
            assert_eq!(
                plot_ranges(&[row(2020, "A", None)]),
                Some((2019.0..2021.0, 0.0..1.0))
            );
            assert_eq!(plot_ranges(&[]), None);
        }

        #[test]
        fn test_plot_ranges_with_extreme_years() {
            let rows = vec![
                row(-2_000_000_000, "A", Some(1.0)),
                row(2_000_000_000, "A", Some(2.0)),
                row(i32::MIN, "B", None),
                row(i32::MAX, "B", None),
            ];
            let (years, _) = plot_ranges(&rows).unwrap();
            assert_eq!(years.start, f64::from(i32::MIN));
            assert_eq!(years.end, f64::from(i32::MAX));
            assert!(years.end - years.start > 4.0e9);
        }
    }
}
