#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use attendance::config::Config;
use attendance::ezygo::{EzygoClient, RefreshGuard};
use attendance::session::SessionStore;
use attendance::storage::LocalStore;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::sync::Barrier;

pub const USERNAME: &str = "student01";
pub const PASSWORD: &str = "correct-horse";
pub const FRESH_TOKEN: &str = "fresh-token";
pub const STALE_TOKEN: &str = "stale-token";

pub struct MockOptions {
    /// Token the login endpoint hands out.
    pub issued_token: String,
    /// Token the bearer endpoints accept; login replaces it with `issued_token`
    /// unless `accept_issued_token` is false.
    pub accepted_token: String,
    pub accept_issued_token: bool,
    pub login_delay: Duration,
    /// The first N course-list requests wait until all N have arrived.
    pub hold_first_course_requests: usize,
    pub courses: Value,
    pub attendance: HashMap<u64, Value>,
    pub profile: Value,
}

impl Default for MockOptions {
    fn default() -> Self {
        let mut attendance = HashMap::new();
        attendance.insert(
            101,
            json!({"present": 27, "absent": 3, "totel": 30, "persantage": 90.0}),
        );
        attendance.insert(
            102,
            json!({
                "present": 14, "absent": 6, "totel": 20, "persantage": 70.0,
                "course": {"name": "Discrete Mathematics", "code": "MA202"}
            }),
        );
        attendance.insert(
            103,
            json!({"present": 12, "absent": 0, "totel": 12, "persantage": 100.0}),
        );

        Self {
            issued_token: FRESH_TOKEN.to_string(),
            accepted_token: FRESH_TOKEN.to_string(),
            accept_issued_token: true,
            login_delay: Duration::ZERO,
            hold_first_course_requests: 0,
            courses: json!([
                {"id": "101", "name": "Operating Systems", "code": "CS301",
                 "academic_year": "2024-25", "start_year": "2024", "end_year": "2025"},
                {"id": "102", "name": "discrete maths", "code": "",
                 "academic_year": "2024-25", "start_year": "2024", "end_year": "2025"},
                {"id": 103, "name": "Compiler Design", "code": "CS305",
                 "academic_year": "2024-25", "start_year": 2024, "end_year": 2025}
            ]),
            attendance,
            profile: json!({
                "first_name": "Asha", "last_name": "Menon",
                "email": "asha@example.edu", "unused_field": 1
            }),
        }
    }
}

pub struct MockState {
    options: MockOptions,
    accepted_token: Mutex<String>,
    barrier: Option<Barrier>,
    pub login_calls: AtomicUsize,
    pub course_calls: AtomicUsize,
    pub attendance_calls: AtomicUsize,
    pub login_headers: Mutex<Vec<(Option<String>, Option<String>)>>,
    pub accept_headers: Mutex<Vec<Option<String>>>,
    pub settings: Mutex<Vec<Value>>,
}

impl MockState {
    pub fn logins(&self) -> usize {
        self.login_calls.load(Ordering::SeqCst)
    }

    pub fn course_requests(&self) -> usize {
        self.course_calls.load(Ordering::SeqCst)
    }

    pub fn attendance_requests(&self) -> usize {
        self.attendance_calls.load(Ordering::SeqCst)
    }

    fn authorized(&self, headers: &HeaderMap) -> bool {
        self.accept_headers
            .lock()
            .unwrap()
            .push(header(headers, "accept"));
        let expected = format!("Bearer {}", self.accepted_token.lock().unwrap());
        header(headers, "authorization").as_deref() == Some(expected.as_str())
    }
}

pub struct MockUpstream {
    pub base_url: String,
    pub state: Arc<MockState>,
}

impl MockUpstream {
    pub async fn start(options: MockOptions) -> Self {
        let barrier = (options.hold_first_course_requests > 0)
            .then(|| Barrier::new(options.hold_first_course_requests));
        let state = Arc::new(MockState {
            accepted_token: Mutex::new(options.accepted_token.clone()),
            barrier,
            options,
            login_calls: AtomicUsize::new(0),
            course_calls: AtomicUsize::new(0),
            attendance_calls: AtomicUsize::new(0),
            login_headers: Mutex::new(Vec::new()),
            accept_headers: Mutex::new(Vec::new()),
            settings: Mutex::new(Vec::new()),
        });

        let routes = Router::new()
            .route("/login", post(login))
            .route("/institutionuser/courses/withusers", get(courses))
            .route(
                "/attendancereports/institutionuser/courses/{id}/summery",
                get(attendance),
            )
            .route("/myprofile", get(profile))
            .route("/user/setting/default_semester", post(setting))
            .route("/user/setting/default_academic_year", post(setting))
            .with_state(state.clone());
        let app = Router::new().nest("/api/v1", routes);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind mock upstream");
        let addr = listener.local_addr().expect("mock upstream addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("mock upstream crashed");
        });

        Self {
            base_url: format!("http://{}/api/v1", addr),
            state,
        }
    }

    pub fn config(&self) -> Config {
        Config::with_base_url(self.base_url.clone(), std::env::temp_dir().join("unused.json"))
    }

    pub fn client(&self, store: Arc<LocalStore>) -> EzygoClient {
        self.client_with_guard(store, Arc::new(RefreshGuard::new()))
    }

    pub fn client_with_guard(&self, store: Arc<LocalStore>, guard: Arc<RefreshGuard>) -> EzygoClient {
        EzygoClient::with_guard(self.config(), SessionStore::new(store), guard)
            .expect("build client")
    }
}

/// Store already holding a session whose token the upstream will reject.
pub fn store_with_stale_session() -> Arc<LocalStore> {
    let store = Arc::new(LocalStore::in_memory());
    SessionStore::new(store.clone())
        .save(STALE_TOKEN, USERNAME, PASSWORD)
        .expect("seed session");
    store
}

/// A base URL nothing is listening on.
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind probe port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}/api/v1", port)
}

fn header(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn unauthorized() -> (StatusCode, Json<Value>) {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({"message": "Unauthenticated."})),
    )
}

async fn login(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    state.login_calls.fetch_add(1, Ordering::SeqCst);
    state
        .login_headers
        .lock()
        .unwrap()
        .push((header(&headers, "origin"), header(&headers, "referer")));

    if !state.options.login_delay.is_zero() {
        tokio::time::sleep(state.options.login_delay).await;
    }

    if body["username"] == USERNAME && body["password"] == PASSWORD {
        if state.options.accept_issued_token {
            *state.accepted_token.lock().unwrap() = state.options.issued_token.clone();
        }
        (
            StatusCode::OK,
            Json(json!({"access_token": state.options.issued_token})),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid username or password"})),
        )
    }
}

async fn courses(State(state): State<Arc<MockState>>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    let call = state.course_calls.fetch_add(1, Ordering::SeqCst);
    if let Some(barrier) = &state.barrier {
        if call < state.options.hold_first_course_requests {
            barrier.wait().await;
        }
    }
    if !state.authorized(&headers) {
        return unauthorized();
    }
    (StatusCode::OK, Json(state.options.courses.clone()))
}

async fn attendance(
    State(state): State<Arc<MockState>>,
    Path(id): Path<u64>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    state.attendance_calls.fetch_add(1, Ordering::SeqCst);
    if !state.authorized(&headers) {
        return unauthorized();
    }
    match state.options.attendance.get(&id) {
        Some(summary) => (StatusCode::OK, Json(summary.clone())),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"message": "Server Error"})),
        ),
    }
}

async fn profile(State(state): State<Arc<MockState>>, headers: HeaderMap) -> (StatusCode, Json<Value>) {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    (StatusCode::OK, Json(state.options.profile.clone()))
}

async fn setting(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    if !state.authorized(&headers) {
        return unauthorized();
    }
    state.settings.lock().unwrap().push(body);
    (StatusCode::OK, Json(json!({"success": true})))
}
