//! View synchronization
//!
//! Every control change runs one cycle:
//!
//! ```text
//! Idle -> Recomputing -> Dispatching -> Idle
//! ```
//!
//! `Recomputing` captures a [`FilterSnapshot`] and derives every projection
//! from it. `Dispatching` hands them to the sinks in a fixed order: scatter,
//! list, choropleth. Each cycle carries a fresh [`Generation`], so a sink can
//! tell which filter state a projection belongs to.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::aggregator::{aggregate_by_country, CountryNameNormalizer, IdentityNormalizer};
use crate::evaluator::{evaluate, FilterGroup};
use crate::models::{
    ChoroplethProjection, FilterChange, FilterSnapshot, FilterState, ListEntry, RecordStore,
    ScatterProjection,
};

/// Monotonic counter identifying one recomputation cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Generation(pub u64);

impl Generation {
    fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

impl std::fmt::Display for Generation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncPhase {
    Idle,
    Recomputing,
    Dispatching,
}

/// Receives the scatter projection of the general filter group
pub trait ScatterSink {
    fn render_scatter(&mut self, generation: Generation, projection: &ScatterProjection);
}

/// Receives the record list of the general filter group
pub trait ListSink {
    fn render_list(&mut self, generation: Generation, entries: &[ListEntry]);
}

/// Receives the country counts of the quality filter group
pub trait ChoroplethSink {
    fn render_choropleth(&mut self, generation: Generation, projection: &ChoroplethProjection);
}

/// The three views kept in sync
pub struct ViewSinks {
    pub scatter: Box<dyn ScatterSink>,
    pub list: Box<dyn ListSink>,
    pub choropleth: Box<dyn ChoroplethSink>,
}

/// Outcome of one dispatch cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchReport {
    pub generation: Generation,
    /// Records shown on the scatter plot and in the list
    pub general_count: usize,
    /// Records behind the choropleth counts
    pub quality_count: usize,
    /// Countries with at least one record on the map
    pub country_count: usize,
    pub no_data: bool,
}

/// Owns the filter state and keeps the three views consistent with it
pub struct ViewSynchronizer {
    store: Arc<RecordStore>,
    state: FilterState,
    sinks: ViewSinks,
    normalizer: Box<dyn CountryNameNormalizer>,
    phase: SyncPhase,
    generation: Generation,
    showing_no_data: bool,
    last_choropleth: Option<ChoroplethProjection>,
}

impl ViewSynchronizer {
    pub fn new(store: Arc<RecordStore>, sinks: ViewSinks) -> Self {
        Self {
            store,
            state: FilterState::default(),
            sinks,
            normalizer: Box::new(IdentityNormalizer),
            phase: SyncPhase::Idle,
            generation: Generation::default(),
            showing_no_data: false,
            last_choropleth: None,
        }
    }

    /// Start from `state` instead of the default controls
    pub fn with_state(mut self, state: FilterState) -> Self {
        self.state = state.normalized();
        self
    }

    pub fn with_normalizer(mut self, normalizer: Box<dyn CountryNameNormalizer>) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    /// Generation of the last completed dispatch (0 before the first one)
    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn normalizer(&self) -> &dyn CountryNameNormalizer {
        self.normalizer.as_ref()
    }

    /// Choropleth projection of the last dispatch, for geometry lookups
    pub fn last_choropleth(&self) -> Option<&ChoroplethProjection> {
        self.last_choropleth.as_ref()
    }

    /// First render: derive every view from the current state
    pub fn initialize(&mut self) -> DispatchReport {
        self.recompute_and_dispatch()
    }

    /// Handle one control change
    pub fn handle(&mut self, change: FilterChange) -> DispatchReport {
        self.state.apply(change);
        self.recompute_and_dispatch()
    }

    /// Apply several changes and run a single cycle for all of them.
    /// Later changes to the same control win.
    pub fn handle_all<I>(&mut self, changes: I) -> DispatchReport
    where
        I: IntoIterator<Item = FilterChange>,
    {
        for change in changes {
            self.state.apply(change);
        }
        self.recompute_and_dispatch()
    }

    fn recompute_and_dispatch(&mut self) -> DispatchReport {
        debug_assert_eq!(self.phase, SyncPhase::Idle);

        // Recomputing: everything below reads the snapshot only
        self.phase = SyncPhase::Recomputing;
        let generation = self.generation.next();
        let snapshot = FilterSnapshot::capture(&self.state);
        let store = Arc::clone(&self.store);

        let general = evaluate(&store, &snapshot, FilterGroup::General);
        let scatter = ScatterProjection::from_records(general.iter());
        let list: Vec<ListEntry> = general.iter().map(ListEntry::from).collect();

        let quality = evaluate(&store, &snapshot, FilterGroup::Quality);
        let aggregate = aggregate_by_country(&quality, self.normalizer.as_ref());
        let country_count = aggregate.len();
        let choropleth = ChoroplethProjection::from_aggregate(aggregate);

        let report = DispatchReport {
            generation,
            general_count: general.len(),
            quality_count: quality.len(),
            country_count,
            no_data: choropleth.is_no_data(),
        };

        // Dispatching
        self.phase = SyncPhase::Dispatching;
        self.sinks.scatter.render_scatter(generation, &scatter);
        self.sinks.list.render_list(generation, &list);
        self.sinks.choropleth.render_choropleth(generation, &choropleth);

        if report.no_data && !self.showing_no_data {
            tracing::info!(%generation, "Quality filters match no records; choropleth shows no data");
        } else if !report.no_data && self.showing_no_data {
            tracing::info!(%generation, "Choropleth data restored");
        }
        self.showing_no_data = report.no_data;

        tracing::debug!(
            %generation,
            general = report.general_count,
            quality = report.quality_count,
            countries = report.country_count,
            "Dispatched projections"
        );

        self.last_choropleth = Some(choropleth);
        self.generation = generation;
        self.phase = SyncPhase::Idle;
        report
    }
}
