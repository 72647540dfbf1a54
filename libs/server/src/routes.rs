use axum::{
    Form, Json, Router,
    extract::{FromRequest, Path, Request, State},
    http::{StatusCode, header::CONTENT_TYPE},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use tracing::error;
use uuid::Uuid;

use crate::{
    assets::static_handler,
    contact::{self, ContactForm, FAILED_MESSAGE, INVALID_MESSAGE, RECEIVED_TEXT, SENT_MESSAGE},
    error::{ContactError, FieldError},
    pages, site,
    state::AppState,
};

const NOT_FOUND_TEXT: &str = "Page not found";

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    uptime_seconds: u64,
}

#[derive(Debug, Serialize)]
struct ContactResponse {
    success: bool,
    message: &'static str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<FieldError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    request_id: Option<String>,
}

pub fn router(state: AppState) -> Router {
    public_router()
        .merge(site_router())
        .fallback(fallback_handler)
        .with_state(state)
}

pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/static/{*path}", get(static_handler))
}

pub fn site_router() -> Router<AppState> {
    Router::new()
        .route("/", get(home_handler))
        .route("/projects", get(projects_handler))
        .route("/skills", get(skills_handler))
        .route("/about", get(about_handler))
        .route("/certificates", get(certificates_handler))
        .route(
            "/contact",
            get(contact_page_handler).post(contact_submit_handler),
        )
        .route("/roles/{slug}", get(role_handler))
}

pub(crate) fn not_found() -> Response {
    (StatusCode::NOT_FOUND, NOT_FOUND_TEXT).into_response()
}

async fn fallback_handler() -> Response {
    not_found()
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: state.uptime_seconds(),
    })
}

async fn home_handler(State(state): State<AppState>) -> Response {
    match state.store.list_projects().await {
        Ok(projects) => Html(pages::home_page(&projects, state.nav_options)).into_response(),
        Err(err) => {
            error!(error = %err, "failed to load projects");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error loading projects").into_response()
        }
    }
}

async fn projects_handler(State(state): State<AppState>) -> Response {
    match state.store.list_projects().await {
        Ok(projects) => Html(pages::projects_page(&projects, state.nav_options)).into_response(),
        Err(err) => {
            error!(error = %err, "failed to load projects");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error loading projects").into_response()
        }
    }
}

async fn certificates_handler(State(state): State<AppState>) -> Response {
    match state.store.list_certificates().await {
        Ok(certificates) => {
            Html(pages::certificates_page(&certificates, state.nav_options)).into_response()
        }
        Err(err) => {
            error!(error = %err, "failed to load certificates");
            (StatusCode::INTERNAL_SERVER_ERROR, "Error loading certificates").into_response()
        }
    }
}

async fn skills_handler(State(state): State<AppState>) -> Html<String> {
    Html(pages::skills_page(state.nav_options))
}

async fn about_handler(State(state): State<AppState>) -> Html<String> {
    Html(pages::about_page(state.nav_options))
}

async fn contact_page_handler(State(state): State<AppState>) -> Html<String> {
    Html(pages::contact_page(state.nav_options))
}

async fn role_handler(State(state): State<AppState>, Path(slug): Path<String>) -> Response {
    match site::role(&slug) {
        Some(role) => Html(pages::role_page(role, state.nav_options)).into_response(),
        None => not_found(),
    }
}

async fn contact_submit_handler(State(state): State<AppState>, request: Request) -> Response {
    let json = contact::wants_json(request.headers());
    let form = read_contact_form(request).await;

    match contact::submit(
        state.store.as_ref(),
        state.mailer.as_ref(),
        &state.mail,
        &form,
    )
    .await
    {
        Ok(_) => contact_reply(
            json,
            StatusCode::OK,
            ContactResponse {
                success: true,
                message: SENT_MESSAGE,
                errors: Vec::new(),
                request_id: None,
            },
            RECEIVED_TEXT,
        ),
        Err(err) => contact_error(&err, json),
    }
}

/// Reads a JSON or urlencoded body. An unreadable body is treated as an
/// empty form so it fails validation like any other bad submission.
async fn read_contact_form(request: Request) -> ContactForm {
    let is_json = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.trim_start().starts_with("application/json"));

    if is_json {
        match Json::<ContactForm>::from_request(request, &()).await {
            Ok(Json(form)) => form,
            Err(_) => ContactForm::default(),
        }
    } else {
        match Form::<ContactForm>::from_request(request, &()).await {
            Ok(Form(form)) => form,
            Err(_) => ContactForm::default(),
        }
    }
}

fn contact_error(err: &ContactError, json: bool) -> Response {
    match err {
        ContactError::Invalid(errors) => contact_reply(
            json,
            StatusCode::BAD_REQUEST,
            ContactResponse {
                success: false,
                message: INVALID_MESSAGE,
                errors: errors.clone(),
                request_id: None,
            },
            INVALID_MESSAGE,
        ),
        ContactError::Store(_) | ContactError::Mail(_) => {
            let request_id = format!("req_{}", Uuid::new_v4().simple());
            error!(request_id = %request_id, error = %err, "contact submission failed");
            contact_reply(
                json,
                StatusCode::INTERNAL_SERVER_ERROR,
                ContactResponse {
                    success: false,
                    message: FAILED_MESSAGE,
                    errors: Vec::new(),
                    request_id: Some(request_id),
                },
                FAILED_MESSAGE,
            )
        }
    }
}

fn contact_reply(
    json: bool,
    status: StatusCode,
    body: ContactResponse,
    text: &'static str,
) -> Response {
    if json {
        (status, Json(body)).into_response()
    } else {
        (status, text).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::MailError,
        mailer::{Mailer, OutgoingMail},
    };
    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::{Request, header::ACCEPT},
    };
    use folio_store::{
        Certificate, ContactMessage, LocalStore, NewCertificate, NewContactMessage, NewProject,
        PortfolioStore, Project, RelayStatus, StoreError,
    };
    use std::sync::Arc;
    use tokio::sync::Mutex;
    use tower::ServiceExt;

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<OutgoingMail>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
            self.sent.lock().await.push(mail.clone());
            Ok(())
        }
    }

    struct FailingMailer;

    #[async_trait]
    impl Mailer for FailingMailer {
        async fn send(&self, _mail: &OutgoingMail) -> Result<(), MailError> {
            Err(MailError::Transport("relay unreachable".to_string()))
        }
    }

    struct BrokenStore;

    #[async_trait]
    impl PortfolioStore for BrokenStore {
        async fn list_projects(&self) -> Result<Vec<Project>, StoreError> {
            Err(StoreError::Connection("database is gone".to_string()))
        }
        async fn create_project(&self, _project: &NewProject) -> Result<Project, StoreError> {
            Err(StoreError::Connection("database is gone".to_string()))
        }
        async fn delete_project(&self, _project_id: i64) -> Result<(), StoreError> {
            Err(StoreError::Connection("database is gone".to_string()))
        }
        async fn list_certificates(&self) -> Result<Vec<Certificate>, StoreError> {
            Err(StoreError::Connection("database is gone".to_string()))
        }
        async fn create_certificate(
            &self,
            _certificate: &NewCertificate,
        ) -> Result<Certificate, StoreError> {
            Err(StoreError::Connection("database is gone".to_string()))
        }
        async fn insert_contact(
            &self,
            _message: &NewContactMessage,
        ) -> Result<ContactMessage, StoreError> {
            Err(StoreError::Connection("database is gone".to_string()))
        }
        async fn mark_contact_relay(
            &self,
            _message_id: i64,
            _status: RelayStatus,
        ) -> Result<(), StoreError> {
            Err(StoreError::Connection("database is gone".to_string()))
        }
        async fn list_contacts(&self, _limit: u32) -> Result<Vec<ContactMessage>, StoreError> {
            Err(StoreError::Connection("database is gone".to_string()))
        }
    }

    async fn test_store() -> Arc<LocalStore> {
        match LocalStore::in_memory().await {
            Ok(store) => Arc::new(store),
            Err(error) => panic!("failed to open store: {error}"),
        }
    }

    fn app(store: Arc<dyn PortfolioStore>, mailer: Arc<dyn Mailer>) -> Router {
        router(AppState::new(store, mailer))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
        let response = match app.oneshot(request).await {
            Ok(response) => response,
            Err(error) => panic!("request should succeed: {error}"),
        };
        let status = response.status();
        let body = match to_bytes(response.into_body(), 1024 * 1024).await {
            Ok(body) => body,
            Err(error) => panic!("failed to read body: {error}"),
        };
        (status, String::from_utf8_lossy(&body).to_string())
    }

    fn get(uri: &str) -> Request<Body> {
        match Request::builder().uri(uri).body(Body::empty()) {
            Ok(request) => request,
            Err(error) => panic!("failed to build request: {error}"),
        }
    }

    fn post_json(body: serde_json::Value, accept: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri("/contact")
            .header(CONTENT_TYPE, "application/json");
        if let Some(accept) = accept {
            builder = builder.header(ACCEPT, accept);
        }
        match builder.body(Body::from(body.to_string())) {
            Ok(request) => request,
            Err(error) => panic!("failed to build request: {error}"),
        }
    }

    fn post_form(body: &'static str, accept: &str) -> Request<Body> {
        match Request::builder()
            .method("POST")
            .uri("/contact")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(ACCEPT, accept)
            .body(Body::from(body))
        {
            Ok(request) => request,
            Err(error) => panic!("failed to build request: {error}"),
        }
    }

    fn parse(body: &str) -> serde_json::Value {
        match serde_json::from_str(body) {
            Ok(value) => value,
            Err(error) => panic!("invalid json {body}: {error}"),
        }
    }

    #[tokio::test]
    async fn health_reports_version() {
        let (status, body) = send(
            app(test_store().await, Arc::new(RecordingMailer::default())),
            get("/health"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let json = parse(&body);
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    }

    #[tokio::test]
    async fn every_page_renders_with_navigation() {
        let store = test_store().await;
        let _ = store
            .create_project(&NewProject::new("Portfolio", "This site"))
            .await;

        for uri in [
            "/",
            "/projects",
            "/skills",
            "/about",
            "/certificates",
            "/contact",
            "/roles/siak-cars",
            "/roles/ukhsa",
            "/roles/intuit",
            "/roles/optima-health",
            "/roles/minor-weir-willis",
        ] {
            let (status, body) =
                send(app(store.clone(), Arc::new(RecordingMailer::default())), get(uri)).await;
            assert_eq!(status, StatusCode::OK, "{uri}");
            assert!(body.contains("id=\"burger\""), "{uri} lacks burger");
            assert!(body.contains("data-dropdown=\"experience\""), "{uri} lacks dropdown");
            assert!(body.contains("id=\"imageModal\""), "{uri} lacks modal");
        }
    }

    #[tokio::test]
    async fn projects_page_lists_stored_projects() {
        let store = test_store().await;
        let _ = store
            .create_project(&NewProject::new("Fleet tracker", "Bookings"))
            .await;

        let (status, body) =
            send(app(store, Arc::new(RecordingMailer::default())), get("/projects")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<h3>Fleet tracker</h3>"));
    }

    #[tokio::test]
    async fn unknown_paths_are_not_found() {
        for uri in ["/nope", "/roles/acme", "/static/missing.css"] {
            let (status, body) = send(
                app(test_store().await, Arc::new(RecordingMailer::default())),
                get(uri),
            )
            .await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body, "Page not found");
        }
    }

    #[tokio::test]
    async fn store_failure_on_project_pages_is_500() {
        for uri in ["/", "/projects"] {
            let (status, body) = send(
                app(Arc::new(BrokenStore), Arc::new(RecordingMailer::default())),
                get(uri),
            )
            .await;
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(body, "Error loading projects");
        }

        let (status, body) = send(
            app(Arc::new(BrokenStore), Arc::new(RecordingMailer::default())),
            get("/certificates"),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Error loading certificates");
    }

    #[tokio::test]
    async fn invalid_contact_returns_json_errors() {
        let store = test_store().await;
        let (status, body) = send(
            app(store.clone(), Arc::new(RecordingMailer::default())),
            post_json(
                serde_json::json!({"name": " ", "email": "nope", "message": "hi"}),
                Some("application/json"),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        let json = parse(&body);
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Please fill all fields correctly");
        assert_eq!(json["errors"][0]["field"], "name");
        assert_eq!(json["errors"][1]["field"], "email");

        let stored = match store.list_contacts(10).await {
            Ok(stored) => stored,
            Err(error) => panic!("list_contacts failed: {error}"),
        };
        assert!(stored.is_empty());
    }

    #[tokio::test]
    async fn invalid_contact_returns_text_for_html_clients() {
        let (status, body) = send(
            app(test_store().await, Arc::new(RecordingMailer::default())),
            post_form("name=Ada&email=&message=hello", "text/html"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, "Please fill all fields correctly");
    }

    #[tokio::test]
    async fn malformed_json_body_is_a_validation_failure() {
        let request = match Request::builder()
            .method("POST")
            .uri("/contact")
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
        {
            Ok(request) => request,
            Err(error) => panic!("failed to build request: {error}"),
        };

        let (status, _) = send(
            app(test_store().await, Arc::new(RecordingMailer::default())),
            request,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn successful_contact_persists_and_relays_once() {
        let store = test_store().await;
        let mailer = Arc::new(RecordingMailer::default());

        let (status, body) = send(
            app(store.clone(), mailer.clone()),
            post_json(
                serde_json::json!({
                    "name": "Ada",
                    "email": "Ada@Example.com",
                    "message": "Hello\nthere"
                }),
                None,
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let json = parse(&body);
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Message sent successfully!");
        assert!(json.get("errors").is_none());

        let sent = mailer.sent.lock().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].subject, "New message from Ada via your portfolio");
        assert!(sent[0].html.contains("Hello<br>there"));

        let stored = match store.list_contacts(10).await {
            Ok(stored) => stored,
            Err(error) => panic!("list_contacts failed: {error}"),
        };
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].email, "ada@example.com");
        assert_eq!(stored[0].relay_status, RelayStatus::Sent);
    }

    #[tokio::test]
    async fn form_post_from_text_client_gets_text_reply() {
        let (status, body) = send(
            app(test_store().await, Arc::new(RecordingMailer::default())),
            post_form("name=Ada&email=ada%40example.com&message=hi", "text/html"),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "Message received. Thank you!");
    }

    #[tokio::test]
    async fn relay_failure_is_500_and_marks_row_failed() {
        let store = test_store().await;
        let (status, body) = send(
            app(store.clone(), Arc::new(FailingMailer)),
            post_json(
                serde_json::json!({"name": "Ada", "email": "ada@example.com", "message": "hi"}),
                Some("application/json"),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let json = parse(&body);
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Error sending message");

        let stored = match store.list_contacts(10).await {
            Ok(stored) => stored,
            Err(error) => panic!("list_contacts failed: {error}"),
        };
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].relay_status, RelayStatus::Failed);
    }

    #[tokio::test]
    async fn store_failure_on_contact_is_500_text() {
        let (status, body) = send(
            app(Arc::new(BrokenStore), Arc::new(RecordingMailer::default())),
            post_form("name=Ada&email=ada%40example.com&message=hi", "text/plain"),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, "Error sending message");
    }

    #[tokio::test]
    async fn layout_assets_resolve_with_the_default_static_dir() {
        let store = test_store().await;
        let (_, page) = send(
            app(store.clone(), Arc::new(RecordingMailer::default())),
            get("/"),
        )
        .await;

        for (uri, content_type) in [
            ("/static/js/script.js", "text/javascript; charset=utf-8"),
            ("/static/css/style.css", "text/css; charset=utf-8"),
        ] {
            assert!(page.contains(uri), "layout does not link {uri}");

            let response = match app(store.clone(), Arc::new(RecordingMailer::default()))
                .oneshot(get(uri))
                .await
            {
                Ok(response) => response,
                Err(error) => panic!("request should succeed: {error}"),
            };
            assert_eq!(response.status(), StatusCode::OK, "{uri}");
            assert_eq!(
                response
                    .headers()
                    .get(CONTENT_TYPE)
                    .and_then(|value| value.to_str().ok()),
                Some(content_type)
            );
        }

        let (_, script) = send(
            app(store, Arc::new(RecordingMailer::default())),
            get("/static/js/script.js"),
        )
        .await;
        assert!(script.contains("data-dropdown"));
        assert!(script.contains("data-modal-backdrop"));
    }

    #[tokio::test]
    async fn static_assets_are_served_from_the_configured_dir() {
        let dir = match tempfile::tempdir() {
            Ok(dir) => dir,
            Err(error) => panic!("tempdir failed: {error}"),
        };
        let css_dir = dir.path().join("css");
        if let Err(error) = std::fs::create_dir_all(&css_dir) {
            panic!("mkdir failed: {error}");
        }
        if let Err(error) = std::fs::write(css_dir.join("style.css"), "body{}") {
            panic!("write failed: {error}");
        }

        let state = AppState::new(test_store().await, Arc::new(RecordingMailer::default()))
            .with_static_dir(dir.path());

        let response = match router(state.clone())
            .oneshot(get("/static/css/style.css"))
            .await
        {
            Ok(response) => response,
            Err(error) => panic!("request should succeed: {error}"),
        };
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(CONTENT_TYPE)
                .and_then(|value| value.to_str().ok()),
            Some("text/css; charset=utf-8")
        );

        let (status, _) = send(router(state), get("/static/..%2Fsecret.txt")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
