//! Dashboard settings shared by the dataset server and the browser binding

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::aggregator::AliasNormalizer;
use crate::models::{FilterChange, FilterState, DEFAULT_TOTAL_SCORE_MAX, DEFAULT_TOTAL_SCORE_MIN};
use crate::types::{ScoreDomain, ScoreRange};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    /// Initial lower handle of the total cup points slider
    pub total_score_min: f64,
    /// Initial upper handle of the total cup points slider
    pub total_score_max: f64,
    /// Dataset country spelling → geometry feature name
    pub country_aliases: BTreeMap<String, String>,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            total_score_min: f64::from(DEFAULT_TOTAL_SCORE_MIN),
            total_score_max: f64::from(DEFAULT_TOTAL_SCORE_MAX),
            country_aliases: BTreeMap::new(),
        }
    }
}

impl DashboardSettings {
    /// Filter state the controls start from
    pub fn initial_state(&self) -> FilterState {
        let mut state = FilterState::default();
        state.apply(FilterChange::TotalScoreRange(ScoreRange::from_f64(
            self.total_score_min,
            self.total_score_max,
            ScoreDomain::total(),
        )));
        state
    }

    pub fn normalizer(&self) -> AliasNormalizer {
        AliasNormalizer::new(
            self.country_aliases
                .iter()
                .map(|(from, to)| (from.clone(), to.clone())),
        )
    }
}
