//! Route definitions for the Coffee Quality Dashboard server

use axum::{routing::get, Router};

use crate::{handlers, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Dataset served to the page
        .nest("/dataset", dataset_routes())
        // Initial control values
        .nest("/dashboard", dashboard_routes())
}

/// Dataset routes
fn dataset_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_dataset_summary))
        .route("/records", get(handlers::list_records))
        .route("/records/:id", get(handlers::get_record))
        .route("/csv", get(handlers::export_dataset_csv))
        .route("/options", get(handlers::get_filter_options))
}

/// Dashboard routes
fn dashboard_routes() -> Router<AppState> {
    Router::new().route("/settings", get(handlers::get_dashboard_settings))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    use crate::config::{CountryAlias, DashboardConfig, DatasetConfig, ServerConfig};
    use crate::services::LoadedDataset;
    use crate::{create_app, AppState, Config};

    const SAMPLE: &str = "\
Species,Country.of.Origin,Mill,Producer,Harvest.Year,Variety,Processing.Method,Total.Cup.Points,altitude_mean_meters
Arabica,Brazil,Fazenda,Joao,2015,Bourbon,Natural / Dry,82.5,1100
Arabica,Ethiopia,Guji,METAD,2014,Heirloom,Washed / Wet,88.83,2000
";

    fn test_state() -> AppState {
        let config = Config {
            environment: "test".to_string(),
            server: ServerConfig::default(),
            dataset: DatasetConfig {
                path: "memory".to_string(),
            },
            dashboard: DashboardConfig {
                country_aliases: vec![CountryAlias {
                    from: "United States (Hawaii)".to_string(),
                    to: "United States of America".to_string(),
                }],
                ..DashboardConfig::default()
            },
        };

        AppState {
            dataset: Arc::new(LoadedDataset::from_csv_str(SAMPLE, "memory").unwrap()),
            config: Arc::new(config),
        }
    }

    async fn get(uri: &str) -> (StatusCode, Vec<u8>) {
        let response = create_app(test_state())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    async fn get_json(uri: &str) -> (StatusCode, Value) {
        let (status, body) = get(uri).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_health() {
        let (status, body) = get_json("/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["records"], 2);
    }

    #[tokio::test]
    async fn test_dataset_summary() {
        let (status, body) = get_json("/api/v1/dataset").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["record_count"], 2);
        assert_eq!(body["country_count"], 2);
        assert_eq!(body["source"], "memory");
    }

    #[tokio::test]
    async fn test_records_in_load_order() {
        let (status, body) = get_json("/api/v1/dataset/records").await;
        assert_eq!(status, StatusCode::OK);
        let records = body.as_array().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["id"], 0);
        assert_eq!(records[1]["country_of_origin"], "Ethiopia");
    }

    #[tokio::test]
    async fn test_single_record_and_not_found() {
        let (status, body) = get_json("/api/v1/dataset/records/1").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["mill"], "Guji");

        let (status, body) = get_json("/api/v1/dataset/records/9").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_filter_options() {
        let (status, body) = get_json("/api/v1/dataset/options").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["harvest_years"], serde_json::json!(["2014", "2015"]));
        assert_eq!(body["countries"], serde_json::json!(["Brazil", "Ethiopia"]));
    }

    #[tokio::test]
    async fn test_csv_export() {
        let (status, body) = get("/api/v1/dataset/csv").await;
        assert_eq!(status, StatusCode::OK);
        let csv = String::from_utf8(body).unwrap();
        assert!(csv.starts_with("id,Total.Cup.Points"));
        assert_eq!(csv.lines().count(), 3);
    }

    #[tokio::test]
    async fn test_dashboard_settings() {
        let (status, body) = get_json("/api/v1/dashboard/settings").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total_score_min"], 20.0);
        assert_eq!(body["total_score_max"], 90.0);
        assert_eq!(
            body["country_aliases"]["United States (Hawaii)"],
            "United States of America"
        );
    }
}
