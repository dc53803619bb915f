//! WebAssembly module for the Coffee Quality Dashboard
//!
//! Runs the whole filter pipeline in the browser:
//! - Builds the record store from the dataset CSV
//! - Receives widget changes (sliders, selects)
//! - Pushes scatter, list and choropleth projections to JavaScript callbacks

use std::sync::Arc;

use serde::Serialize;
use wasm_bindgen::prelude::*;

use shared::{
    load_csv_str, ChoroplethProjection, ChoroplethSink, DashboardSettings, DispatchReport,
    FilterChange, FilterOptions, Generation, ListEntry, ListSink, MultiSelect, ScatterProjection,
    ScatterSink, ScoreDomain, ScoreField, ScoreRange, SingleSelect, SyncDriver, ViewSinks,
    ViewSynchronizer,
};

// Re-export shared types for use from Rust callers
pub use shared::models::*;
pub use shared::types::*;

/// Initialize the WASM module
#[wasm_bindgen(start)]
pub fn init() {
    web_sys::console::debug_1(&JsValue::from_str(concat!(
        "coffee quality dashboard engine ",
        env!("CARGO_PKG_VERSION")
    )));
}

/// Forwards one projection type to a JavaScript `(generation, json)` callback
struct JsViewSink {
    view: &'static str,
    callback: js_sys::Function,
}

impl JsViewSink {
    fn emit<T: Serialize + ?Sized>(&self, generation: Generation, payload: &T) {
        let json = match serde_json::to_string(payload) {
            Ok(json) => json,
            Err(e) => {
                web_sys::console::error_1(&JsValue::from_str(&format!(
                    "Failed to serialize {} projection: {}",
                    self.view, e
                )));
                return;
            }
        };

        let result = self.callback.call2(
            &JsValue::NULL,
            &JsValue::from_f64(generation.0 as f64),
            &JsValue::from_str(&json),
        );
        if let Err(err) = result {
            web_sys::console::error_2(
                &JsValue::from_str(&format!("{} view callback failed", self.view)),
                &err,
            );
        }
    }
}

impl ScatterSink for JsViewSink {
    fn render_scatter(&mut self, generation: Generation, projection: &ScatterProjection) {
        self.emit(generation, projection);
    }
}

impl ListSink for JsViewSink {
    fn render_list(&mut self, generation: Generation, entries: &[ListEntry]) {
        self.emit(generation, entries);
    }
}

impl ChoroplethSink for JsViewSink {
    fn render_choropleth(&mut self, generation: Generation, projection: &ChoroplethProjection) {
        self.emit(generation, projection);
    }
}

/// Dashboard state machine driven from the page
#[wasm_bindgen]
pub struct Dashboard {
    driver: SyncDriver,
    options: FilterOptions,
    settings: DashboardSettings,
}

#[wasm_bindgen]
impl Dashboard {
    /// Build a dashboard from the dataset CSV and the settings served by the
    /// backend. Callbacks receive `(generation, json)`.
    #[wasm_bindgen(js_name = fromCsv)]
    pub fn from_csv(
        csv: &str,
        settings_json: &str,
        on_scatter: js_sys::Function,
        on_list: js_sys::Function,
        on_choropleth: js_sys::Function,
    ) -> Result<Dashboard, JsValue> {
        let settings = parse_settings(settings_json).map_err(|e| JsValue::from_str(&e))?;
        let store = load_csv_str(csv)
            .map_err(|e| JsValue::from_str(&format!("Invalid dataset: {}", e)))?;
        let options = FilterOptions::from_store(&store);

        let sinks = ViewSinks {
            scatter: Box::new(JsViewSink {
                view: "scatter",
                callback: on_scatter,
            }),
            list: Box::new(JsViewSink {
                view: "list",
                callback: on_list,
            }),
            choropleth: Box::new(JsViewSink {
                view: "choropleth",
                callback: on_choropleth,
            }),
        };

        let synchronizer = ViewSynchronizer::new(Arc::new(store), sinks)
            .with_state(settings.initial_state())
            .with_normalizer(Box::new(settings.normalizer()));

        Ok(Dashboard {
            driver: SyncDriver::new(synchronizer),
            options,
            settings,
        })
    }

    /// First render of all three views. Returns the dispatch report as JSON.
    pub fn initialize(&self) -> Option<String> {
        self.driver.initialize().map(report_json)
    }

    /// Total cup points slider (general group)
    #[wasm_bindgen(js_name = setTotalScoreRange)]
    pub fn set_total_score_range(&self, lo: f64, hi: f64) -> Option<String> {
        let range = ScoreRange::from_f64(lo, hi, ScoreDomain::total());
        self.submit(FilterChange::TotalScoreRange(range))
    }

    /// One of the quality sliders, addressed by element id or CSV column
    #[wasm_bindgen(js_name = setQualityRange)]
    pub fn set_quality_range(&self, field: &str, lo: f64, hi: f64) -> Result<Option<String>, JsValue> {
        let field = ScoreField::lookup(field)
            .ok_or_else(|| JsValue::from_str(&format!("Unknown quality slider: {}", field)))?;
        let range = ScoreRange::from_f64(lo, hi, field.domain());
        Ok(self.submit(FilterChange::QualityRange { field, range }))
    }

    /// Processing method multi-select; `values_json` is a JSON string array
    #[wasm_bindgen(js_name = setProcessingMethods)]
    pub fn set_processing_methods(&self, values_json: &str) -> Result<Option<String>, JsValue> {
        let selection = parse_multi_select(values_json).map_err(|e| JsValue::from_str(&e))?;
        Ok(self.submit(FilterChange::ProcessingMethods(selection)))
    }

    #[wasm_bindgen(js_name = setHarvestYear)]
    pub fn set_harvest_year(&self, value: &str) -> Option<String> {
        self.submit(FilterChange::HarvestYear(SingleSelect::from_widget_value(value)))
    }

    /// Country multi-select; `values_json` is a JSON string array
    #[wasm_bindgen(js_name = setCountries)]
    pub fn set_countries(&self, values_json: &str) -> Result<Option<String>, JsValue> {
        let selection = parse_multi_select(values_json).map_err(|e| JsValue::from_str(&e))?;
        Ok(self.submit(FilterChange::Countries(selection)))
    }

    /// Put every control back to its initial position
    pub fn reset(&self) -> Option<String> {
        let initial = self.settings.initial_state();
        self.submit(FilterChange::Replace(Box::new(initial)))
    }

    /// Dropdown contents as JSON
    #[wasm_bindgen(js_name = filterOptions)]
    pub fn filter_options(&self) -> String {
        serde_json::to_string(&self.options).unwrap_or_else(|_| "{}".to_string())
    }

    /// Count shown for a geometry feature on the current map
    #[wasm_bindgen(js_name = countryCount)]
    pub fn country_count(&self, geometry_name: &str) -> u32 {
        self.driver
            .with(|sync| {
                sync.last_choropleth()
                    .map(|projection| projection.count_for(geometry_name, sync.normalizer()))
                    .unwrap_or(0)
            })
            .unwrap_or(0) as u32
    }

    #[wasm_bindgen(js_name = recordCount)]
    pub fn record_count(&self) -> usize {
        self.driver.with(|sync| sync.store().len()).unwrap_or(0)
    }

    /// Generation of the views currently on screen
    pub fn generation(&self) -> f64 {
        self.driver
            .with(|sync| sync.generation().0 as f64)
            .unwrap_or(0.0)
    }

    fn submit(&self, change: FilterChange) -> Option<String> {
        self.driver.submit(change).map(report_json)
    }
}

fn parse_settings(settings_json: &str) -> Result<DashboardSettings, String> {
    if settings_json.trim().is_empty() {
        return Ok(DashboardSettings::default());
    }
    serde_json::from_str(settings_json).map_err(|e| format!("Invalid settings JSON: {}", e))
}

fn parse_multi_select(values_json: &str) -> Result<MultiSelect, String> {
    let values: Vec<String> = serde_json::from_str(values_json)
        .map_err(|e| format!("Invalid selection JSON: {}", e))?;
    Ok(MultiSelect::from_widget_values(values))
}

fn report_json(report: DispatchReport) -> String {
    serde_json::to_string(&report).unwrap_or_default()
}
