//! Filter evaluation tests
//!
//! Tests for the two independent filter groups including:
//! - Property 1: General Group Soundness and Completeness
//! - Property 2: Quality Group Soundness and Completeness
//! - Property 3: Filter Group Independence
//! - Property 4: Range Correction
//! - Property 5: Wildcard Selections

use proptest::prelude::*;
use rust_decimal::Decimal;
use shared::{
    evaluate, CoffeeRecord, FilterChange, FilterGroup, FilterSnapshot, FilterState, MultiSelect,
    RecordStore, ScoreDomain, ScoreField, ScoreRange, SingleSelect, Species,
};
use std::str::FromStr;

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

const COUNTRIES: &[&str] = &["Brazil", "Ethiopia", "Colombia", "Kenya"];
const METHODS: &[&str] = &["Washed / Wet", "Natural / Dry", "Semi-washed / Semi-pulped"];
const YEARS: &[&str] = &["2013", "2014", "2015"];

/// Store from the dashboard walkthrough: two Brazilian lots
fn brazil_store() -> RecordStore {
    let record = |total: &str, method: &str, year: &str, sub: &str| CoffeeRecord {
        total_cup_points: Some(dec(total)),
        quality_scores: ScoreField::SUB_SCORES
            .into_iter()
            .map(|field| (field, dec(sub)))
            .collect(),
        country_of_origin: "Brazil".to_string(),
        processing_method: method.to_string(),
        harvest_year: year.to_string(),
        ..Default::default()
    };

    RecordStore::from_records(vec![
        record("82.5", "Washed", "2015", "7.5"),
        record("65.0", "Natural", "2014", "6.0"),
    ])
}

fn general_ids(store: &RecordStore, state: &FilterState) -> Vec<usize> {
    evaluate(store, &FilterSnapshot::capture(state), FilterGroup::General).ids()
}

fn quality_ids(store: &RecordStore, state: &FilterState) -> Vec<usize> {
    evaluate(store, &FilterSnapshot::capture(state), FilterGroup::Quality).ids()
}

/// Straightforward restatement of the general group predicate
fn expected_general(record: &CoffeeRecord, state: &FilterState) -> bool {
    let range = state.total_score_range;
    let in_range = match record.total_cup_points {
        Some(total) => total >= range.lo && total <= range.hi,
        None => false,
    };
    let categorical = &state.categorical;
    in_range
        && categorical.processing_methods.matches(&record.processing_method)
        && categorical.harvest_year.matches(&record.harvest_year)
        && categorical.countries.matches(&record.country_of_origin)
}

/// Straightforward restatement of the quality group predicate
fn expected_quality(record: &CoffeeRecord, state: &FilterState) -> bool {
    ScoreField::ALL.iter().all(|field| {
        let range = state.quality_range(*field);
        match record.score(*field) {
            Some(value) => value >= range.lo && value <= range.hi,
            None => false,
        }
    })
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn test_total_score_range_keeps_high_scoring_lot() {
        let store = brazil_store();
        let mut state = FilterState::default();
        state.apply(FilterChange::TotalScoreRange(ScoreRange::new(
            dec("70"),
            dec("100"),
            ScoreDomain::total(),
        )));

        assert_eq!(general_ids(&store, &state), vec![0]);
        assert_eq!(quality_ids(&store, &state), vec![0, 1]);
    }

    #[test]
    fn test_narrowed_sub_score_excludes_low_lot() {
        let store = brazil_store();
        let mut state = FilterState::default();
        state.apply(FilterChange::QualityRange {
            field: ScoreField::Flavor,
            range: ScoreRange::new(dec("7.0"), dec("10.0"), ScoreDomain::sub_score()),
        });

        assert_eq!(quality_ids(&store, &state), vec![0]);
    }

    #[test]
    fn test_total_score_range_excluding_everything() {
        let store = brazil_store();
        let mut state = FilterState::default();
        state.apply(FilterChange::TotalScoreRange(ScoreRange::new(
            dec("90"),
            dec("100"),
            ScoreDomain::total(),
        )));

        assert!(general_ids(&store, &state).is_empty());
        // The quality group does not look at the general slider
        assert_eq!(quality_ids(&store, &state), vec![0, 1]);
    }

    #[test]
    fn test_empty_multi_select_matches_nothing() {
        let store = brazil_store();
        let mut state = FilterState::default();
        state.apply(FilterChange::TotalScoreRange(ScoreRange::full(
            ScoreDomain::total(),
        )));
        state.apply(FilterChange::Countries(MultiSelect::from_widget_values(
            Vec::<String>::new(),
        )));

        assert!(general_ids(&store, &state).is_empty());
    }

    #[test]
    fn test_harvest_year_single_select() {
        let store = brazil_store();
        let mut state = FilterState::default();
        state.apply(FilterChange::TotalScoreRange(ScoreRange::full(
            ScoreDomain::total(),
        )));
        state.apply(FilterChange::HarvestYear(SingleSelect::from_widget_value(
            "2014",
        )));

        assert_eq!(general_ids(&store, &state), vec![1]);
    }

    #[test]
    fn test_missing_sub_score_excluded_from_quality_group() {
        let mut records = vec![CoffeeRecord::default(); 2];
        records[0].total_cup_points = Some(dec("80"));
        records[1].total_cup_points = Some(dec("80"));
        for field in ScoreField::SUB_SCORES {
            records[0].quality_scores.insert(field, dec("8"));
            if field != ScoreField::Balance {
                records[1].quality_scores.insert(field, dec("8"));
            }
        }
        let store = RecordStore::from_records(records);

        assert_eq!(quality_ids(&store, &FilterState::default()), vec![0]);
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let store = brazil_store();
        let mut state = FilterState::default();
        state.apply(FilterChange::TotalScoreRange(ScoreRange::new(
            dec("65.0"),
            dec("82.5"),
            ScoreDomain::total(),
        )));

        assert_eq!(general_ids(&store, &state), vec![0, 1]);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for a score cell on a `[0, max]` scale, sometimes missing
    fn score_strategy(max: i64) -> impl Strategy<Value = Option<Decimal>> {
        prop::option::weighted(0.9, (0i64..=max * 100).prop_map(|cents| Decimal::new(cents, 2)))
    }

    /// Strategy for generating coffee records
    fn record_strategy() -> impl Strategy<Value = CoffeeRecord> {
        (
            prop::sample::select(COUNTRIES),
            prop::sample::select(METHODS),
            prop::sample::select(YEARS),
            score_strategy(100),
            prop::collection::vec(score_strategy(10), ScoreField::SUB_SCORES.len()),
            any::<bool>(),
        )
            .prop_map(|(country, method, year, total, subs, robusta)| CoffeeRecord {
                total_cup_points: total,
                quality_scores: ScoreField::SUB_SCORES
                    .into_iter()
                    .zip(subs)
                    .filter_map(|(field, value)| value.map(|value| (field, value)))
                    .collect(),
                species: if robusta { Species::Robusta } else { Species::Arabica },
                processing_method: method.to_string(),
                harvest_year: year.to_string(),
                country_of_origin: country.to_string(),
                ..Default::default()
            })
    }

    /// Strategy for generating record stores
    fn store_strategy() -> impl Strategy<Value = RecordStore> {
        prop::collection::vec(record_strategy(), 0..40).prop_map(RecordStore::from_records)
    }

    /// Strategy for raw slider handles, possibly crossed or out of domain
    fn raw_range_strategy(max: i64) -> impl Strategy<Value = ScoreRange> {
        (-100i64..=(max + 1) * 100, -100i64..=(max + 1) * 100).prop_map(|(lo, hi)| ScoreRange {
            lo: Decimal::new(lo, 2),
            hi: Decimal::new(hi, 2),
        })
    }

    fn multi_select_strategy(values: &'static [&'static str]) -> impl Strategy<Value = MultiSelect> {
        prop_oneof![
            Just(MultiSelect::Any),
            prop::sample::subsequence(values, 0..=values.len())
                .prop_map(MultiSelect::from_widget_values),
        ]
    }

    fn harvest_year_strategy() -> impl Strategy<Value = SingleSelect> {
        prop_oneof![
            Just(SingleSelect::Any),
            prop::sample::select(YEARS).prop_map(SingleSelect::from_widget_value),
        ]
    }

    /// Strategy for a full filter state built through control changes
    fn state_strategy() -> impl Strategy<Value = FilterState> {
        (
            raw_range_strategy(100),
            prop::collection::vec(raw_range_strategy(10), ScoreField::SUB_SCORES.len()),
            raw_range_strategy(100),
            multi_select_strategy(METHODS),
            harvest_year_strategy(),
            multi_select_strategy(COUNTRIES),
        )
            .prop_map(|(total, subs, quality_total, methods, year, countries)| {
                let mut state = FilterState::default();
                state.apply(FilterChange::TotalScoreRange(total));
                for (field, range) in ScoreField::SUB_SCORES.into_iter().zip(subs) {
                    state.apply(FilterChange::QualityRange { field, range });
                }
                state.apply(FilterChange::QualityRange {
                    field: ScoreField::TotalCupPoints,
                    range: quality_total,
                });
                state.apply(FilterChange::ProcessingMethods(methods));
                state.apply(FilterChange::HarvestYear(year));
                state.apply(FilterChange::Countries(countries));
                state
            })
    }

    proptest! {
        /// Property 1: General Group Soundness and Completeness
        /// A record is in the general subset iff it satisfies every general control
        #[test]
        fn prop_general_group_matches_predicate(
            store in store_strategy(),
            state in state_strategy(),
        ) {
            let expected: Vec<usize> = store
                .iter()
                .filter(|record| expected_general(record, &state))
                .map(|record| record.id)
                .collect();

            prop_assert_eq!(general_ids(&store, &state), expected);
        }

        /// Property 2: Quality Group Soundness and Completeness
        /// A record is in the quality subset iff every score lies in its range
        #[test]
        fn prop_quality_group_matches_predicate(
            store in store_strategy(),
            state in state_strategy(),
        ) {
            let expected: Vec<usize> = store
                .iter()
                .filter(|record| expected_quality(record, &state))
                .map(|record| record.id)
                .collect();

            prop_assert_eq!(quality_ids(&store, &state), expected);
        }

        /// Property 2 (continued): Subsets keep load order
        #[test]
        fn prop_subsets_preserve_load_order(
            store in store_strategy(),
            state in state_strategy(),
        ) {
            for ids in [general_ids(&store, &state), quality_ids(&store, &state)] {
                prop_assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
            }
        }

        /// Property 3: Filter Group Independence
        /// Quality sliders never move the general subset, and the general
        /// controls never move the quality subset
        #[test]
        fn prop_filter_groups_are_independent(
            store in store_strategy(),
            state in state_strategy(),
            other in state_strategy(),
        ) {
            let mut quality_changed = state.clone();
            quality_changed.quality_ranges = other.quality_ranges.clone();
            prop_assert_eq!(general_ids(&store, &state), general_ids(&store, &quality_changed));

            let mut general_changed = state.clone();
            general_changed.total_score_range = other.total_score_range;
            general_changed.categorical = other.categorical.clone();
            prop_assert_eq!(quality_ids(&store, &state), quality_ids(&store, &general_changed));
        }

        /// Property 4: Range Correction
        /// Every applied range lies inside its domain with lo <= hi
        #[test]
        fn prop_applied_ranges_are_corrected(state in state_strategy()) {
            let total = state.total_score_range;
            prop_assert!(total.lo <= total.hi);
            prop_assert!(ScoreDomain::total().contains(total.lo));
            prop_assert!(ScoreDomain::total().contains(total.hi));

            for field in ScoreField::ALL {
                let range = state.quality_range(field);
                prop_assert!(range.lo <= range.hi);
                prop_assert!(field.domain().contains(range.lo));
                prop_assert!(field.domain().contains(range.hi));
            }
        }

        /// Property 4 (continued): Applying the same change twice is idempotent
        #[test]
        fn prop_apply_is_idempotent(state in state_strategy(), range in raw_range_strategy(100)) {
            let mut once = state.clone();
            once.apply(FilterChange::TotalScoreRange(range));
            let mut twice = once.clone();
            twice.apply(FilterChange::TotalScoreRange(range));

            prop_assert_eq!(once, twice);
        }

        /// Property 5: Wildcard Selections
        /// With every categorical control on `all` and the slider fully open,
        /// the general subset is exactly the scored records
        #[test]
        fn prop_wildcards_keep_every_scored_record(store in store_strategy()) {
            let mut state = FilterState::default();
            state.apply(FilterChange::TotalScoreRange(ScoreRange::full(ScoreDomain::total())));
            state.apply(FilterChange::ProcessingMethods(MultiSelect::from_widget_values(["all"])));
            state.apply(FilterChange::HarvestYear(SingleSelect::from_widget_value("all")));
            state.apply(FilterChange::Countries(MultiSelect::from_widget_values(["Brazil", "all"])));

            let expected: Vec<usize> = store
                .iter()
                .filter(|record| record.total_cup_points.is_some())
                .map(|record| record.id)
                .collect();

            prop_assert_eq!(general_ids(&store, &state), expected);
        }
    }
}
