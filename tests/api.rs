//! HTTP API tests
//!
//! The router runs over an in-memory store and a manual clock.

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

use jury::{
    AppState, Config, build_router,
    constants::{PRINCIPAL_ADMIN_HEADER, PRINCIPAL_ID_HEADER},
    db::MemoryStore,
    utils::ManualClock,
};

struct TestApp {
    router: Router,
    clock: Arc<ManualClock>,
}

impl TestApp {
    fn new() -> Self {
        let clock = Arc::new(ManualClock::new(Utc::now()));
        let state = AppState::new(Arc::new(MemoryStore::new()), clock.clone(), Config::default());
        Self {
            router: build_router(state),
            clock,
        }
    }

    async fn request(
        &self,
        method: Method,
        uri: &str,
        caller: Option<(Uuid, bool)>,
        body: Option<Value>,
    ) -> (StatusCode, Vec<u8>, Option<String>) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some((id, is_admin)) = caller {
            builder = builder
                .header(PRINCIPAL_ID_HEADER, id.to_string())
                .header(PRINCIPAL_ADMIN_HEADER, is_admin.to_string());
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, bytes.to_vec(), content_type)
    }

    async fn json(
        &self,
        method: Method,
        uri: &str,
        caller: Option<(Uuid, bool)>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let (status, bytes, _) = self.request(method, uri, caller, body).await;
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    /// Admin-created rubric: Taste 40, Color 30, Aroma 30
    async fn rubric(&self) -> Value {
        let (status, rubric) = self
            .json(
                Method::POST,
                "/api/v1/rubrics",
                Some((Uuid::new_v4(), true)),
                Some(json!({
                    "name": format!("Tea {}", Uuid::new_v4()),
                    "parameters": [
                        {"name": "Taste", "weight": 40},
                        {"name": "Color", "weight": 30},
                        {"name": "Aroma", "weight": 30}
                    ]
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        rubric
    }

    async fn competition(&self, creator: Uuid, model_id: &Value) -> Value {
        let deadline = self.clock_now() + Duration::days(1);
        let (status, competition) = self
            .json(
                Method::POST,
                "/api/v1/competitions",
                Some((creator, false)),
                Some(json!({
                    "name": "Harvest cup",
                    "model_id": model_id,
                    "deadline": deadline,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
        competition
    }

    fn clock_now(&self) -> chrono::DateTime<Utc> {
        use jury::utils::Clock;
        self.clock.now()
    }
}

fn decimal(value: &Value) -> Decimal {
    value.as_str().unwrap().parse().unwrap()
}

fn param_ids(rubric: &Value) -> Vec<String> {
    rubric["parameters"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let (status, body) = app.json(Method::GET, "/api/v1/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"], "ok");
}

#[tokio::test]
async fn test_missing_principal_is_unauthorized() {
    let app = TestApp::new();
    let (status, body) = app
        .json(
            Method::POST,
            "/api/v1/competitions",
            None,
            Some(json!({"name": "x", "model_id": Uuid::new_v4(), "deadline": Utc::now()})),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_rubric_creation_requires_admin() {
    let app = TestApp::new();
    let (status, body) = app
        .json(
            Method::POST,
            "/api/v1/rubrics",
            Some((Uuid::new_v4(), false)),
            Some(json!({"name": "Tea", "parameters": [{"name": "Taste", "weight": 10}]})),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_judging_flow() {
    let app = TestApp::new();
    let rubric = app.rubric().await;
    let params = param_ids(&rubric);
    let creator = Uuid::new_v4();
    let contestant = Uuid::new_v4();
    let competition = app.competition(creator, &rubric["id"]).await;
    let cid = competition["id"].as_str().unwrap().to_string();

    // Contestant submits an entry
    let (status, entry) = app
        .json(
            Method::POST,
            &format!("/api/v1/competitions/{}/entries", cid),
            Some((contestant, false)),
            Some(json!({"name": "Golden"})),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(entry["display_order"], 1);
    assert_eq!(entry["status"], "PENDING");
    assert_eq!(entry["contestant_id"], contestant.to_string());
    let eid = entry["id"].as_str().unwrap().to_string();

    // Creator approves it
    let (status, entry) = app
        .json(
            Method::PUT,
            &format!("/api/v1/entries/{}/status", eid),
            Some((creator, false)),
            Some(json!({"status": "APPROVED"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(entry["status"], "APPROVED");

    // The creator is the first judge and rates every parameter
    let (status, ratings) = app
        .json(
            Method::POST,
            "/api/v1/ratings",
            Some((creator, false)),
            Some(json!({
                "entry_id": eid,
                "scores": [
                    {"parameter_id": params[0], "score": 90},
                    {"parameter_id": params[1], "score": 80},
                    {"parameter_id": params[2], "score": 70}
                ],
                "note": "Bright"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(ratings["total"], 3);

    // A stranger may not rate
    let (status, _) = app
        .json(
            Method::PUT,
            "/api/v1/ratings/score",
            Some((contestant, false)),
            Some(json!({"entry_id": eid, "parameter_id": params[0], "score": 10})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Resubmission replaces the score
    let (status, rating) = app
        .json(
            Method::PUT,
            "/api/v1/ratings/score",
            Some((creator, false)),
            Some(json!({"entry_id": eid, "parameter_id": params[2], "score": "70.00"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&rating["score"]), Decimal::from(70));

    let (status, completion) = app
        .json(
            Method::GET,
            &format!("/api/v1/entries/{}/completion", eid),
            Some((creator, false)),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(completion["complete"], true);

    let (status, score) = app
        .json(
            Method::GET,
            &format!("/api/v1/entries/{}/scores", eid),
            Some((creator, false)),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&score["weighted_score"]), Decimal::from(81));
    assert_eq!(score["parameters"][0]["name"], "Taste");

    // Scores stay hidden from outsiders while the competition runs
    let (status, _) = app
        .json(
            Method::GET,
            &format!("/api/v1/competitions/{}/summary", cid),
            Some((contestant, false)),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let ratings_uri = format!("/api/v1/competitions/{}/ratings", cid);
    let (status, _) = app
        .json(Method::GET, &ratings_uri, Some((contestant, false)), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, all) = app
        .json(Method::GET, &ratings_uri, Some((creator, false)), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all["total"], 3);
    assert_eq!(all["ratings"][0]["parameter_id"], params[0]);

    let (status, bytes, content_type) = app
        .request(
            Method::GET,
            &format!("/api/v1/competitions/{}/export.csv", cid),
            Some((creator, false)),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/csv"));
    let csv = String::from_utf8(bytes).unwrap();
    assert!(csv.starts_with("Entry,Judge,Taste(40),Color(30),Aroma(30),Weighted,Note"));
    assert_eq!(csv.lines().count(), 2);

    // Ending closes the rating window and opens the summary
    let (status, ended) = app
        .json(
            Method::POST,
            &format!("/api/v1/competitions/{}/end", cid),
            Some((creator, false)),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ended["status"], "ENDED");

    let (status, body) = app
        .json(
            Method::PUT,
            "/api/v1/ratings/score",
            Some((creator, false)),
            Some(json!({"entry_id": eid, "parameter_id": params[0], "score": 50})),
        )
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "INVALID_STATE");

    let (status, summary) = app
        .json(
            Method::GET,
            &format!("/api/v1/competitions/{}/summary", cid),
            Some((contestant, false)),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["total_judges"], 1);
    assert_eq!(summary["entries"][0]["completed_judges"], 1);
}

#[tokio::test]
async fn test_judge_management() {
    let app = TestApp::new();
    let rubric = app.rubric().await;
    let creator = Uuid::new_v4();
    let judge = Uuid::new_v4();
    let competition = app.competition(creator, &rubric["id"]).await;
    let judges_uri = format!("/api/v1/competitions/{}/judges", competition["id"].as_str().unwrap());

    let (status, _) = app
        .json(Method::POST, &judges_uri, Some((creator, false)), Some(json!({"judge_id": judge})))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .json(Method::POST, &judges_uri, Some((creator, false)), Some(json!({"judge_id": judge})))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");

    let (status, list) = app.json(Method::GET, &judges_uri, Some((judge, false)), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["total"], 2);

    let (status, judged) = app
        .json(Method::GET, "/api/v1/competitions/judged", Some((judge, false)), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(judged["total"], 1);

    let (status, _) = app
        .json(
            Method::DELETE,
            &format!("{}/{}", judges_uri, judge),
            Some((creator, false)),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_entries_close_at_deadline() {
    let app = TestApp::new();
    let rubric = app.rubric().await;
    let competition = app.competition(Uuid::new_v4(), &rubric["id"]).await;
    let uri = format!("/api/v1/competitions/{}/entries", competition["id"].as_str().unwrap());

    app.clock.advance(Duration::days(1));
    let (status, body) = app
        .json(Method::POST, &uri, Some((Uuid::new_v4(), false)), Some(json!({"name": "Late"})))
        .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "INVALID_STATE");
}

#[tokio::test]
async fn test_admin_sweep() {
    let app = TestApp::new();
    let rubric = app.rubric().await;
    let competition = app.competition(Uuid::new_v4(), &rubric["id"]).await;

    let (status, _) = app
        .json(Method::POST, "/api/v1/admin/sweep", Some((Uuid::new_v4(), false)), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    app.clock.advance(Duration::days(2));
    let (status, body) = app
        .json(Method::POST, "/api/v1/admin/sweep", Some((Uuid::new_v4(), true)), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ran"], true);
    assert_eq!(body["stats"]["ended"], 1);

    let (status, details) = app
        .json(
            Method::GET,
            &format!("/api/v1/competitions/{}", competition["id"].as_str().unwrap()),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(details["status"], "ENDED");
}
