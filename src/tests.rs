//! Integration tests for the mocked API and the client flows running against it.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use reqwest::Client;
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::client::{AnswersApi, HttpAnswersApi};
use crate::config::Config;
use crate::console::Console;
use crate::flows::{FormFlow, Route, TableFlow, TableView, NO_INFO_MSG};
use crate::hooks::{load_answers, ResetAnswers, UpdateAnswers};
use crate::repo::AnswersRepository;
use crate::store::AnswersStore;
use crate::validation::Field;
use crate::{create_router, AppState};

fn test_state() -> AppState {
    let config = Config {
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        api_url: None,
        log_level: "warn".to_string(),
        api_delay: Duration::ZERO,
        redirect_delay: Duration::ZERO,
    };

    AppState {
        repo: Arc::new(AnswersRepository::new().expect("Failed to init repository")),
        config: Arc::new(config),
    }
}

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
}

impl TestFixture {
    async fn new() -> Self {
        let app = create_router(test_state());

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        TestFixture {
            client: Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn api(&self) -> Arc<HttpAnswersApi> {
        Arc::new(HttpAnswersApi::with_client(
            self.client.clone(),
            &self.base_url,
        ))
    }
}

fn jane_body() -> Value {
    json!({
        "name": "Jane Doe",
        "mail": "jane@x.com",
        "age": 30,
        "interests": [
            { "id": "sports", "label": "Sports", "isChecked": true },
            { "id": "music", "label": "Music", "isChecked": false }
        ]
    })
}

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(resp.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_answers_start_as_defaults() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/answers"))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["revisionId"], 0);
    assert_eq!(body["data"]["name"], "");
    assert!(body["data"]["age"].is_null());
    assert_eq!(body["data"]["interests"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_update_and_reset_bump_revision() {
    let fixture = TestFixture::new().await;

    let update_resp = fixture
        .client
        .put(fixture.url("/api/answers"))
        .json(&jane_body())
        .send()
        .await
        .unwrap();
    assert_eq!(update_resp.status(), 200);
    let update_body: Value = update_resp.json().await.unwrap();
    assert_eq!(update_body["data"], jane_body());
    assert_eq!(update_body["revisionId"], 1);

    let get_body: Value = fixture
        .client
        .get(fixture.url("/api/answers"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(get_body["data"]["name"], "Jane Doe");

    let reset_resp = fixture
        .client
        .delete(fixture.url("/api/answers"))
        .send()
        .await
        .unwrap();
    assert_eq!(reset_resp.status(), 200);
    let reset_body: Value = reset_resp.json().await.unwrap();
    assert_eq!(reset_body["data"]["name"], "");
    assert_eq!(reset_body["revisionId"], 2);
}

#[tokio::test]
async fn test_duplicate_interest_ids_rejected() {
    let fixture = TestFixture::new().await;

    let mut body = jane_body();
    body["interests"][1]["id"] = json!("sports");

    let resp = fixture
        .client
        .put(fixture.url("/api/answers"))
        .json(&body)
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["revisionId"], 0);
}

#[tokio::test]
async fn test_unknown_route_uses_error_envelope() {
    let app = create_router(test_state());

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/profiles")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_malformed_payload_never_reaches_api() {
    let fixture = TestFixture::new().await;
    let api = fixture.api();
    let store = Arc::new(AnswersStore::default());
    let update = UpdateAnswers::new(api, store.clone());

    let mut payload = store.get_answers();
    payload.name = "Jane Doe".to_string();
    payload.interests[1].id = payload.interests[0].id.clone();

    // The converter refuses duplicate ids before anything is sent
    let err = update.mutate(payload).await.unwrap_err();
    assert_eq!(err.error_code(), "DECODE_ERROR");
    assert!(store.get_answers().is_blank());
}

#[tokio::test]
async fn test_malformed_response_is_decode_error() {
    let app = axum::Router::new().route("/api/answers", axum::routing::get(|| async { "{" }));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind");
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let err = HttpAnswersApi::new(base_url).fetch().await.unwrap_err();
    assert_eq!(err.error_code(), "DECODE_ERROR");
}

#[tokio::test]
async fn test_submit_then_table_then_delete() {
    let fixture = TestFixture::new().await;
    let api = fixture.api();
    let store = Arc::new(AnswersStore::default());
    load_answers(api.as_ref(), &store).await.unwrap();

    let update = UpdateAnswers::new(api.clone(), store.clone());
    let reset = ResetAnswers::new(api, store.clone());

    let mut form = FormFlow::mount(&store, Duration::ZERO);
    form.set_name("Jane Doe");
    form.set_mail("jane@x.com");
    form.set_age("17");
    form.toggle_interest("sports");
    assert_eq!(form.field_error(Field::Age), Some("Age must be at least 18"));
    assert!(!form.can_submit());

    form.set_age("30");
    form.submit(&update).await.unwrap();
    assert_eq!(form.redirect().await, Route::Table);

    let answers = store.get_answers();
    assert_eq!(answers.name, "Jane Doe");
    assert_eq!(answers.age, "30");
    assert_eq!(answers.checked_labels(), vec!["Sports"]);

    let mut table = TableFlow::mount(store.clone());
    assert_eq!(
        table.view(),
        TableView::Populated(vec![vec![
            "Jane Doe".to_string(),
            "jane@x.com".to_string(),
            "30".to_string(),
            "Sports".to_string(),
        ]])
    );

    table.delete(&reset).await.unwrap();
    assert_eq!(table.view(), TableView::Empty);
    assert!(table.render().ends_with(NO_INFO_MSG));
}

#[tokio::test]
async fn test_console_session() {
    let fixture = TestFixture::new().await;
    let store = Arc::new(AnswersStore::default());
    let mut console = Console::new(fixture.api(), store.clone(), Duration::ZERO);

    let script = "show\nedit\nname Jane Doe\nmail jane@x.com\nage 30\ntoggle sports\nsubmit\nquit\nname ignored\n";
    let mut output = Vec::new();
    console.run(script.as_bytes(), &mut output).await.unwrap();

    let output = String::from_utf8(output).unwrap();
    assert!(output.contains(NO_INFO_MSG));
    assert!(output.contains("/form\nName: "));
    assert!(output.contains("Jane Doe | jane@x.com | 30 | Sports"));
    assert!(!output.contains("ignored"));
    assert_eq!(console.route(), Route::Table);
    assert_eq!(store.get_answers().name, "Jane Doe");
}
