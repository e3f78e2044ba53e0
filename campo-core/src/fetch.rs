//! Fetch orchestration for one filter submission.
//!
//! Each submission runs as a batch. The requests of a batch are joined with
//! `try_join!`, so the first rejection fails the whole batch and the results
//! its sibling requests already fetched are thrown away. A missing location
//! resolves to an empty result without touching the network.
//!
//! Batches are stamped with a [`Ticket`]. A batch whose ticket is no longer
//! current when it settles is stale and must not be applied.

use crate::error::Result;
use crate::filters::CampaignFilters;
use crate::level::Level;
use crate::observation::{location_label, AverageReference, RawObservation};
use crate::session::Session;
use futures::try_join;
use log::{debug, info};

/// Backend operations the dashboard needs per location.
#[allow(async_fn_in_trait)]
pub trait CampaignSource {
    /// Campaign series (sown and harvested hectares per year).
    async fn campaigns(
        &self,
        session: &Session,
        level: Level,
        location_id: &str,
        filters: &CampaignFilters,
    ) -> Result<Vec<RawObservation>>;

    /// Loss percentage series.
    async fn losses(
        &self,
        session: &Session,
        level: Level,
        location_id: &str,
        filters: &CampaignFilters,
    ) -> Result<Vec<RawObservation>>;

    /// Average loss percentage over the filtered range.
    async fn average(
        &self,
        session: &Session,
        level: Level,
        location_id: &str,
        filters: &CampaignFilters,
    ) -> Result<Option<AverageReference>>;
}

/// Campaign series for both locations, for the line charts.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct RegionSeries {
    pub location1: Vec<RawObservation>,
    pub location2: Vec<RawObservation>,
}

impl RegionSeries {
    pub fn is_empty(&self) -> bool {
        self.location1.is_empty() && self.location2.is_empty()
    }
}

/// Loss series, averages and labels for both locations.
#[derive(Debug, PartialEq, Clone)]
pub struct ComparisonData {
    pub losses: [Vec<RawObservation>; 2],
    pub averages: [Option<AverageReference>; 2],
    pub labels: [String; 2],
}

impl Default for ComparisonData {
    fn default() -> Self {
        Self {
            losses: [Vec::new(), Vec::new()],
            averages: [None, None],
            labels: [
                location_label(&[], Level::Country, 0),
                location_label(&[], Level::Country, 1),
            ],
        }
    }
}

/// Fetch the campaign series for location slot `index`.
pub async fn fetch_campaigns<S: CampaignSource>(
    source: &S,
    session: &Session,
    filters: &CampaignFilters,
    index: usize,
) -> Result<Vec<RawObservation>> {
    let (Some(level), Some(id)) = (filters.level, filters.location(index)) else {
        return Ok(Vec::new());
    };
    session.require_user()?;
    source.campaigns(session, level, id, filters).await
}

/// Fetch the loss series for location slot `index`.
pub async fn fetch_losses<S: CampaignSource>(
    source: &S,
    session: &Session,
    filters: &CampaignFilters,
    index: usize,
) -> Result<Vec<RawObservation>> {
    let (Some(level), Some(id)) = (filters.level, filters.location(index)) else {
        return Ok(Vec::new());
    };
    session.require_user()?;
    source.losses(session, level, id, filters).await
}

/// Fetch the average loss for location slot `index`.
pub async fn fetch_average<S: CampaignSource>(
    source: &S,
    session: &Session,
    filters: &CampaignFilters,
    index: usize,
) -> Result<Option<AverageReference>> {
    let (Some(level), Some(id)) = (filters.level, filters.location(index)) else {
        return Ok(None);
    };
    session.require_user()?;
    source.average(session, level, id, filters).await
}

/// Two-request batch: campaign series for both locations.
pub async fn load_region_series<S: CampaignSource>(
    source: &S,
    session: &Session,
    filters: &CampaignFilters,
) -> Result<RegionSeries> {
    if !filters.is_fetchable() {
        return Ok(RegionSeries::default());
    }
    let (location1, location2) = try_join!(
        fetch_campaigns(source, session, filters, 0),
        fetch_campaigns(source, session, filters, 1),
    )?;
    info!(
        "region series loaded: {} + {} records",
        location1.len(),
        location2.len()
    );
    Ok(RegionSeries {
        location1,
        location2,
    })
}

/// Four-request batch: loss series and averages for both locations.
pub async fn load_comparison<S: CampaignSource>(
    source: &S,
    session: &Session,
    filters: &CampaignFilters,
) -> Result<ComparisonData> {
    let Some(level) = filters.level.filter(|_| filters.is_fetchable()) else {
        return Ok(ComparisonData::default());
    };
    let (losses1, losses2, average1, average2) = try_join!(
        fetch_losses(source, session, filters, 0),
        fetch_losses(source, session, filters, 1),
        fetch_average(source, session, filters, 0),
        fetch_average(source, session, filters, 1),
    )?;
    info!(
        "comparison loaded: {} + {} loss records",
        losses1.len(),
        losses2.len()
    );
    let labels = [
        location_label(&losses1, level, 0),
        location_label(&losses2, level, 1),
    ];
    Ok(ComparisonData {
        losses: [losses1, losses2],
        averages: [average1, average2],
        labels,
    })
}

/// Identifies one batch.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub struct Ticket(u64);

/// Monotonic batch counter used to drop results of superseded batches.
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct Generation {
    latest: u64,
}

impl Generation {
    /// Start a new batch; every earlier ticket becomes stale.
    pub fn begin(&mut self) -> Ticket {
        self.latest += 1;
        Ticket(self.latest)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.latest
    }
}

/// Loading flag, error slot and result holder shared by one view's batch.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct BatchState<T> {
    pub loading: bool,
    pub error: Option<String>,
    pub data: T,
}

impl<T: Default> BatchState<T> {
    /// Mark a batch as in flight.
    pub fn begin(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Apply a settled batch. On failure every holder is reset to empty.
    pub fn finish(&mut self, result: Result<T>) {
        self.loading = false;
        match result {
            Ok(data) => {
                self.data = data;
                self.error = None;
            }
            Err(e) => {
                debug!("batch failed: {e:?}");
                self.data = T::default();
                self.error = Some(e.to_string());
            }
        }
    }

    /// Apply a settled batch only if `ticket` is still current.
    ///
    /// Returns false when the result was dropped as stale.
    pub fn finish_if_current(
        &mut self,
        generation: &Generation,
        ticket: Ticket,
        result: Result<T>,
    ) -> bool {
        if !generation.is_current(ticket) {
            debug!("dropping stale batch {ticket:?}");
            return false;
        }
        self.finish(result);
        true
    }

    /// Clear everything without fetching (no level or no location).
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CampoError;
    use crate::observation::{LOST_PERCENTAGE, YEAR_FIELD};
    use futures::executor::block_on;
    use std::cell::RefCell;

    /// In-memory source that records every call and fails on request.
    #[derive(Default)]
    struct MockSource {
        calls: RefCell<Vec<String>>,
        fail_location: Option<String>,
    }

    impl MockSource {
        fn failing_on(location: &str) -> Self {
            Self {
                fail_location: Some(location.to_string()),
                ..Default::default()
            }
        }

        fn record(&self, kind: &str, level: Level, location_id: &str) -> Result<()> {
            self.calls
                .borrow_mut()
                .push(format!("{kind}:{level}:{location_id}"));
            if self.fail_location.as_deref() == Some(location_id) {
                return Err(CampoError::Status {
                    status: 500,
                    endpoint: format!("{kind}/{location_id}"),
                });
            }
            Ok(())
        }

        fn rows(level: Level, location_id: &str) -> Vec<RawObservation> {
            vec![RawObservation::default()
                .with(YEAR_FIELD, 2020)
                .with(LOST_PERCENTAGE, 10.0)
                .with(level.name_field(), format!("Lugar {location_id}"))]
        }
    }

    impl CampaignSource for MockSource {
        async fn campaigns(
            &self,
            _session: &Session,
            level: Level,
            location_id: &str,
            _filters: &CampaignFilters,
        ) -> Result<Vec<RawObservation>> {
            self.record("campaigns", level, location_id)?;
            Ok(Self::rows(level, location_id))
        }

        async fn losses(
            &self,
            _session: &Session,
            level: Level,
            location_id: &str,
            _filters: &CampaignFilters,
        ) -> Result<Vec<RawObservation>> {
            self.record("losses", level, location_id)?;
            Ok(Self::rows(level, location_id))
        }

        async fn average(
            &self,
            _session: &Session,
            level: Level,
            location_id: &str,
            _filters: &CampaignFilters,
        ) -> Result<Option<AverageReference>> {
            self.record("average", level, location_id)?;
            Ok(Some(AverageReference { value: 10.0 }))
        }
    }

    fn filters(location1: &str, location2: &str) -> CampaignFilters {
        CampaignFilters {
            level: Some(Level::Province),
            location1: location1.into(),
            location2: location2.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_location_short_circuits_without_a_call() {
        let source = MockSource::default();
        let session = Session::signed_in("uid");
        let data = block_on(load_comparison(&source, &session, &filters("1", ""))).unwrap();

        assert_eq!(data.losses[0].len(), 1);
        assert!(data.losses[1].is_empty());
        assert_eq!(data.averages[1], None);
        assert_eq!(data.labels, ["Lugar 1".to_string(), "Ubicacion 2".to_string()]);

        let calls = source.calls.borrow();
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|c| c.ends_with(":provincia:1")));
    }

    #[test]
    fn test_nothing_selected_fetches_nothing() {
        let source = MockSource::default();
        let session = Session::signed_in("uid");
        let series = block_on(load_region_series(&source, &session, &filters("", ""))).unwrap();
        assert!(series.is_empty());

        let no_level = CampaignFilters {
            location1: "1".into(),
            ..Default::default()
        };
        let data = block_on(load_comparison(&source, &session, &no_level)).unwrap();
        assert_eq!(data, ComparisonData::default());
        assert!(source.calls.borrow().is_empty());
    }

    #[test]
    fn test_unauthenticated_fetch_is_an_error() {
        let source = MockSource::default();
        let result = block_on(load_region_series(
            &source,
            &Session::default(),
            &filters("1", "2"),
        ));
        assert!(matches!(result, Err(CampoError::Unauthenticated)));
        assert!(source.calls.borrow().is_empty());
    }

    #[test]
    fn test_any_rejection_empties_every_holder() {
        for failing in ["1", "2"] {
            let source = MockSource::failing_on(failing);
            let session = Session::signed_in("uid");
            let mut state = BatchState::<RegionSeries>::default();
            state.data = RegionSeries {
                location1: MockSource::rows(Level::Province, "old"),
                location2: MockSource::rows(Level::Province, "old"),
            };

            state.begin();
            assert!(state.loading);
            let result = block_on(load_region_series(&source, &session, &filters("1", "2")));
            state.finish(result);

            assert!(!state.loading);
            assert!(state.data.location1.is_empty(), "failing on {failing}");
            assert!(state.data.location2.is_empty(), "failing on {failing}");
            assert!(state.error.as_deref().unwrap().contains("500"));
        }
    }

    #[tokio::test]
    async fn test_comparison_batch_succeeds_with_both_locations() {
        let source = MockSource::default();
        let session = Session::signed_in("uid");
        let data = load_comparison(&source, &session, &filters("1", "2"))
            .await
            .unwrap();
        assert_eq!(data.labels, ["Lugar 1".to_string(), "Lugar 2".to_string()]);
        assert_eq!(data.averages, [Some(AverageReference { value: 10.0 }); 2]);
        assert_eq!(source.calls.borrow().len(), 4);
    }

    #[test]
    fn test_stale_batches_are_dropped() {
        let source = MockSource::default();
        let session = Session::signed_in("uid");
        let mut generation = Generation::default();
        let mut state = BatchState::<RegionSeries>::default();

        let first = generation.begin();
        let second = generation.begin();
        assert!(!generation.is_current(first));

        // The newer batch settles first
        let newer = block_on(load_region_series(&source, &session, &filters("2", "")));
        assert!(state.finish_if_current(&generation, second, newer));

        // The superseded batch settles afterwards and must not overwrite it
        let older = block_on(load_region_series(&source, &session, &filters("1", "")));
        assert!(!state.finish_if_current(&generation, first, older));
        assert_eq!(
            state.data.location1[0].get("provincia").and_then(|v| v.as_str()),
            Some("Lugar 2")
        );
    }

    #[test]
    fn test_reset_clears_error_and_data() {
        let mut state = BatchState::<RegionSeries>::default();
        state.finish(Err(CampoError::Unauthenticated));
        assert_eq!(state.error.as_deref(), Some("El usuario no está autenticado"));
        state.reset();
        assert_eq!(state, BatchState::default());
    }
}
