//! Filter state for the dashboard controls
//!
//! `FilterState` is the only place control values live. Widgets report
//! changes as [`FilterChange`] values and [`FilterState::apply`] is the single
//! mutation entry point.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{ScoreDomain, ScoreField, ScoreRange};

/// Widget value meaning "match everything"
pub const WILDCARD: &str = "all";

/// Initial handles of the total cup points slider
pub const DEFAULT_TOTAL_SCORE_MIN: u32 = 20;
pub const DEFAULT_TOTAL_SCORE_MAX: u32 = 90;

/// Multi-select control (processing method, country)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "values")]
pub enum MultiSelect {
    #[default]
    Any,
    OneOf(BTreeSet<String>),
}

impl MultiSelect {
    /// Interpret raw widget values; the `all` token anywhere means wildcard.
    /// An empty selection matches nothing.
    pub fn from_widget_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selected = BTreeSet::new();
        for value in values {
            let value = value.as_ref().trim();
            if value == WILDCARD {
                return MultiSelect::Any;
            }
            selected.insert(value.to_string());
        }
        MultiSelect::OneOf(selected)
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            MultiSelect::Any => true,
            MultiSelect::OneOf(selected) => selected.contains(value),
        }
    }
}

/// Single-select control (harvest year)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum SingleSelect {
    #[default]
    Any,
    Exactly(String),
}

impl SingleSelect {
    pub fn from_widget_value(value: &str) -> Self {
        let value = value.trim();
        if value == WILDCARD {
            SingleSelect::Any
        } else {
            SingleSelect::Exactly(value.to_string())
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            SingleSelect::Any => true,
            SingleSelect::Exactly(selected) => selected == value,
        }
    }
}

/// Categorical controls of the general filter group
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoricalFilters {
    pub processing_methods: MultiSelect,
    pub harvest_year: SingleSelect,
    pub countries: MultiSelect,
}

/// Current value of every dashboard control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterState {
    /// Quality group sliders, one per [`ScoreField`]
    pub quality_ranges: BTreeMap<ScoreField, ScoreRange>,
    /// General group slider over total cup points. Deliberately independent
    /// of `quality_ranges[TotalCupPoints]`.
    pub total_score_range: ScoreRange,
    pub categorical: CategoricalFilters,
}

impl Default for FilterState {
    fn default() -> Self {
        Self::with_total_score_defaults(
            Decimal::from(DEFAULT_TOTAL_SCORE_MIN),
            Decimal::from(DEFAULT_TOTAL_SCORE_MAX),
        )
    }
}

impl FilterState {
    /// Fresh state with the total score slider starting at `[lo, hi]`
    pub fn with_total_score_defaults(lo: Decimal, hi: Decimal) -> Self {
        let quality_ranges = ScoreField::ALL
            .into_iter()
            .map(|field| (field, ScoreRange::full(field.domain())))
            .collect();

        Self {
            quality_ranges,
            total_score_range: ScoreRange::new(lo, hi, ScoreDomain::total()),
            categorical: CategoricalFilters::default(),
        }
    }

    /// Range for `field`; an absent entry reads as the full domain
    pub fn quality_range(&self, field: ScoreField) -> ScoreRange {
        self.quality_ranges
            .get(&field)
            .copied()
            .unwrap_or_else(|| ScoreRange::full(field.domain()))
    }

    /// Apply a control change. Every range is corrected on the way in.
    pub fn apply(&mut self, change: FilterChange) {
        match change {
            FilterChange::QualityRange { field, range } => {
                self.quality_ranges
                    .insert(field, range.corrected(field.domain()));
            }
            FilterChange::TotalScoreRange(range) => {
                self.total_score_range = range.corrected(ScoreDomain::total());
            }
            FilterChange::ProcessingMethods(selection) => {
                self.categorical.processing_methods = selection;
            }
            FilterChange::HarvestYear(selection) => {
                self.categorical.harvest_year = selection;
            }
            FilterChange::Countries(selection) => {
                self.categorical.countries = selection;
            }
            FilterChange::Replace(state) => {
                *self = state.normalized();
            }
        }
    }

    /// Copy with every range clamped into its domain and every quality
    /// field present
    pub fn normalized(&self) -> FilterState {
        let quality_ranges = ScoreField::ALL
            .into_iter()
            .map(|field| (field, self.quality_range(field).corrected(field.domain())))
            .collect();

        FilterState {
            quality_ranges,
            total_score_range: self.total_score_range.corrected(ScoreDomain::total()),
            categorical: self.categorical.clone(),
        }
    }
}

/// A single control change reported by a widget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "control")]
pub enum FilterChange {
    QualityRange { field: ScoreField, range: ScoreRange },
    TotalScoreRange(ScoreRange),
    ProcessingMethods(MultiSelect),
    HarvestYear(SingleSelect),
    Countries(MultiSelect),
    /// All widgets read in one go
    Replace(Box<FilterState>),
}

/// Immutable copy of the filter state taken at the start of a recomputation
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSnapshot {
    state: FilterState,
}

impl FilterSnapshot {
    pub fn capture(state: &FilterState) -> Self {
        Self {
            state: state.normalized(),
        }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }
}
