use crate::catalog::{Catalog, CatalogSpec};
use crate::config::Args;
use crate::data::{GenerateRequest, GenerateResponse};
use crate::error::ScheduleError;
use crate::solver;
use crate::tiebreak::TieBreak;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{info, warn};
use serde::Serialize;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub tie_break: TieBreak,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: self.message })).into_response()
    }
}

impl From<ScheduleError> for HttpError {
    fn from(err: ScheduleError) -> Self {
        let status = match err {
            ScheduleError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ScheduleError::InvalidCatalog(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

async fn generate_handler(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, HttpError> {
    let catalog = Arc::clone(&state.catalog);
    let outcome =
        tokio::task::spawn_blocking(move || solver::solve(&request, &catalog, state.tie_break))
            .await
            .map_err(|e| HttpError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: format!("schedule generation aborted: {e}"),
            })?;

    match outcome {
        Ok(output) => Ok(Json(output)),
        Err(e) => {
            warn!("rejected schedule request: {e}");
            Err(e.into())
        }
    }
}

async fn catalog_handler(State(state): State<AppState>) -> Json<CatalogSpec> {
    Json(state.catalog.spec())
}

async fn health_handler() -> &'static str {
    "ok"
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/generate-schedule", post(generate_handler))
        .route("/api/catalog", get(catalog_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

pub async fn run_server(args: &Args, catalog: Catalog) -> anyhow::Result<()> {
    let state = AppState {
        catalog: Arc::new(catalog),
        tie_break: args.tie_break(),
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(args.bind_addr()).await?;
    info!("Server running at http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    fn test_app() -> Router {
        build_router(AppState {
            catalog: Arc::new(Catalog::default()),
            tie_break: TieBreak::Seeded(42),
        })
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(body).unwrap()))
            .unwrap()
    }

    #[tokio::test]
    async fn generate_returns_three_options() {
        let body = json!({
            "instructors": [{
                "id": 1,
                "name": "Dr. Ahmed",
                "courseCode": "CSE115",
                "maxSections": 2,
                "preferredDays": ["ST"],
                "availableTimes": [],
                "roomPreference": "",
                "hasLab": true,
                "labDays": ["M"],
                "labTimes": []
            }],
            "totalSections": 2
        });

        let (status, json) = send(test_app(), post_json("/api/generate-schedule", &body)).await;

        assert_eq!(status, StatusCode::OK);
        let schedules = json["schedules"].as_array().unwrap();
        assert_eq!(schedules.len(), 3);
        for (n, schedule) in schedules.iter().enumerate() {
            assert_eq!(schedule["option"], n + 1);
            assert_eq!(schedule["conflictCount"], 0);
            assert_eq!(schedule["conflictMessage"], Value::Null);
            assert_eq!(schedule["workload"][0]["count"], 2);
            let classes = schedule["classes"].as_array().unwrap();
            assert_eq!(classes.len(), 4);
            assert_eq!(classes[0]["type"], "theory");
            assert_eq!(classes[0]["days"], "ST");
            assert_eq!(classes[1]["type"], "lab");
            assert_eq!(classes[1]["courseCode"], "CSE115L");
            assert_eq!(classes[1]["days"], "M");
        }
    }

    #[tokio::test]
    async fn empty_instructor_list_is_bad_request() {
        let (status, json) = send(
            test_app(),
            post_json("/api/generate-schedule", &json!({ "instructors": [] })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "invalid input: No instructor data provided");
    }

    #[tokio::test]
    async fn huge_section_count_is_bad_request() {
        let body = json!({
            "instructors": [{ "name": "Dr. Ahmed", "courseCode": "CSE115", "maxSections": 1 }],
            "totalSections": 4294967295u64
        });
        let (status, json) = send(test_app(), post_json("/api/generate-schedule", &body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("totalSections"));
    }

    #[tokio::test]
    async fn unknown_time_slot_is_bad_request() {
        let body = json!({
            "instructors": [{
                "name": "Dr. Ahmed",
                "courseCode": "CSE115",
                "availableTimes": ["07:00 AM - 08:30 AM"]
            }]
        });
        let (status, json) = send(test_app(), post_json("/api/generate-schedule", &body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("07:00 AM - 08:30 AM"));
    }

    #[tokio::test]
    async fn catalog_is_served() {
        let request = Request::builder()
            .uri("/api/catalog")
            .body(Body::empty())
            .unwrap();
        let (status, json) = send(test_app(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["theoryDays"], json!(["ST", "MW", "RA"]));
        assert_eq!(json["labRooms"].as_array().unwrap().len(), 6);
        assert_eq!(json["labTimes"][0], "08:00 AM - 11:10 AM");
    }

    #[tokio::test]
    async fn health_answers() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = test_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
