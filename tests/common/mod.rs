#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use admin_dashboard::session::{MemoryStore, StorageSessionProvider};
use admin_dashboard::ApiClient;
use anyhow::{Context, Result};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::routing::{get, post, put};
use axum::{Json, Router};
use reqwest::StatusCode as ClientStatus;
use serde_json::{json, Value};

/// One request as the mock backend saw it
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: &'static str,
    pub path: String,
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Default)]
pub struct MockState {
    requests: Mutex<Vec<Recorded>>,
    /// Makes `/api/lookups/enums/contract-type` answer 500
    pub fail_contract_type: Mutex<bool>,
}

impl MockState {
    fn record(&self, method: &'static str, path: String, query: HashMap<String, String>, headers: &HeaderMap, body: Value) {
        let authorization = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(Recorded { method, path, query, authorization, body });
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests().into_iter().filter(|r| r.path == path).collect()
    }
}

/// In-process stand-in for the dashboard backend
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub state: Arc<MockState>,
}

impl TestServer {
    /// Client over a fresh in-memory session pointed at this server
    pub fn client(&self) -> Result<(ApiClient, Arc<StorageSessionProvider<MemoryStore>>)> {
        let provider = Arc::new(StorageSessionProvider::in_memory());
        let client = ApiClient::new(&self.base_url, provider.clone())?;
        Ok((client, provider))
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                if resp.status() == ClientStatus::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("mock backend did not become ready on {} within {:?}", self.base_url, timeout)
    }
}

/// Start a mock backend on an unused port inside the current test runtime
pub async fn spawn_backend() -> Result<TestServer> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    let base_url = format!("http://127.0.0.1:{}", port);
    let state = Arc::new(MockState::default());

    let app = Router::new()
        .route("/health", get(|| async { Json(json!({ "status": "ok" })) }))
        .route("/api/auth/login", post(login))
        .route("/api/auth/logout", post(logout))
        .route("/api/companies", get(list_companies).post(create_company))
        .route("/api/companies/:id", put(update_company))
        .route("/api/lookups/enums/:name", get(enumeration))
        .route("/api/users", get(list_users))
        .route("/api/users/:id/reset-password", post(reset_password))
        .route("/api/profile", get(profile).put(update_profile))
        .route("/api/profile/change-password", post(change_password))
        .route("/api/departments", get(fixture).post(echo))
        .route("/api/departments/:id", put(echo))
        .route("/api/job-titles", get(fixture).post(echo))
        .route("/api/job-titles/:id", put(echo))
        .route("/api/positions", get(fixture).post(echo))
        .route("/api/positions/:id", put(echo))
        .route("/api/equipments", get(fixture).post(echo))
        .route("/api/equipments/:id", put(echo))
        .route("/api/devices/equipment-types", get(fixture))
        .route("/api/districts", get(fixture))
        .route("/api/health-centers", get(fixture).post(echo))
        .route("/api/health-centers/:id", put(echo))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
        .await
        .context("failed to bind mock backend")?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    let server = TestServer { port, base_url, state };
    server.wait_ready(Duration::from_secs(5)).await?;
    Ok(server)
}

/// A port with nothing listening on it
pub fn unreachable_base_url() -> Result<String> {
    let port = portpicker::pick_unused_port().context("failed to pick free port")?;
    Ok(format!("http://127.0.0.1:{}", port))
}

type Reply = (StatusCode, Json<Value>);

fn role_for(username: &str) -> &'static str {
    match username {
        "root" => "ADMIN",
        "mia" => "MANAGER",
        _ => "USER",
    }
}

async fn login(State(state): State<Arc<MockState>>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    state.record("POST", "/api/auth/login".into(), HashMap::new(), &headers, body.clone());
    let username = body["username"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default();

    match (username.as_str(), password) {
        ("suspended", _) => (StatusCode::FORBIDDEN, Json(json!({ "message": "Account suspended" }))),
        ("teapot", _) => (StatusCode::IM_A_TEAPOT, Json(json!({}))),
        (_, "secret") => (
            StatusCode::OK,
            Json(json!({
                "token": format!("tok-{}", username),
                "username": username,
                "role": role_for(&username),
                "email": format!("{}@example.com", username),
                "healthCenterId": 4
            })),
        ),
        _ => (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Bad credentials" }))),
    }
}

async fn logout(State(state): State<Arc<MockState>>, headers: HeaderMap) -> StatusCode {
    state.record("POST", "/api/auth/logout".into(), HashMap::new(), &headers, Value::Null);
    StatusCode::OK
}

fn company(id: i64) -> Value {
    json!({
        "id": id,
        "companyName": format!("Company {:02}", id),
        "companyAddress": format!("{} Main St", id),
        "contactPerson": "Ann",
        "phoneNumber": "555-0100",
        "email": format!("c{}@example.com", id)
    })
}

const COMPANY_COUNT: i64 = 23;

async fn list_companies(
    State(state): State<Arc<MockState>>,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Reply {
    state.record("GET", "/api/companies".into(), query.clone(), &headers, Value::Null);
    if !headers.contains_key("authorization") {
        return (StatusCode::UNAUTHORIZED, Json(json!({ "message": "Missing token" })));
    }

    let page: i64 = query.get("page").and_then(|p| p.parse().ok()).unwrap_or(0);
    let size: i64 = query.get("size").and_then(|s| s.parse().ok()).unwrap_or(10);
    let mut ids: Vec<i64> = (1..=COMPANY_COUNT).collect();
    if query.get("sortDir").map(String::as_str) == Some("desc") {
        ids.reverse();
    }
    let content: Vec<Value> = ids.iter().skip((page * size) as usize).take(size as usize).map(|id| company(*id)).collect();
    let total_pages = (COMPANY_COUNT + size - 1) / size;

    (
        StatusCode::OK,
        Json(json!({ "content": content, "totalPages": total_pages, "totalElements": COMPANY_COUNT })),
    )
}

async fn create_company(State(state): State<Arc<MockState>>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    state.record("POST", "/api/companies".into(), HashMap::new(), &headers, body.clone());
    if body["companyName"] == "Duplicate" {
        return (StatusCode::CONFLICT, Json(json!({ "message": "Company name already exists" })));
    }
    (StatusCode::CREATED, Json(body))
}

async fn update_company(
    State(state): State<Arc<MockState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Reply {
    state.record("PUT", format!("/api/companies/{}", id), HashMap::new(), &headers, body.clone());
    (StatusCode::OK, Json(body))
}

async fn enumeration(State(state): State<Arc<MockState>>, Path(name): Path<String>, headers: HeaderMap) -> Reply {
    state.record("GET", format!("/api/lookups/enums/{}", name), HashMap::new(), &headers, Value::Null);
    let failing = state.fail_contract_type.lock().map(|f| *f).unwrap_or(false);
    if failing && name == "contract-type" {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "message": "Enum store offline" })));
    }
    (
        StatusCode::OK,
        Json(json!([
            { "code": format!("{}-A", name), "label": "First" },
            { "code": format!("{}-B", name), "label": "Second" }
        ])),
    )
}

async fn list_users(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Reply {
    state.record("GET", "/api/users".into(), HashMap::new(), &headers, Value::Null);
    (
        StatusCode::OK,
        Json(json!([
            { "id": 1, "username": "root", "email": "root@example.com", "firstName": "Ruth", "lastName": "Oak", "phoneNumber": null, "role": "ADMIN", "status": "ACTIVE", "healthCenterId": null },
            { "id": 2, "username": "mia", "email": "mia@example.com", "firstName": "Mia", "lastName": "Stone", "role": "MANAGER", "status": "ACTIVE", "healthCenterId": 4, "departmentId": 7 }
        ])),
    )
}

async fn reset_password(
    State(state): State<Arc<MockState>>,
    Path(id): Path<i64>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    state.record("POST", format!("/api/users/{}/reset-password", id), HashMap::new(), &headers, body);
    StatusCode::OK
}

async fn profile(State(state): State<Arc<MockState>>, headers: HeaderMap) -> Reply {
    state.record("GET", "/api/profile".into(), HashMap::new(), &headers, Value::Null);
    (
        StatusCode::OK,
        Json(json!({ "username": "mia", "email": null, "phoneNumber": "555-0101", "role": "MANAGER", "departmentName": "Lab" })),
    )
}

async fn update_profile(State(state): State<Arc<MockState>>, headers: HeaderMap, Json(body): Json<Value>) -> StatusCode {
    state.record("PUT", "/api/profile".into(), HashMap::new(), &headers, body);
    StatusCode::NO_CONTENT
}

async fn change_password(State(state): State<Arc<MockState>>, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    state.record("POST", "/api/profile/change-password".into(), HashMap::new(), &headers, body.clone());
    if body["currentPassword"] != "secret" {
        return (StatusCode::BAD_REQUEST, Json(json!({ "message": "Current password is incorrect" })));
    }
    (StatusCode::OK, Json(json!({ "message": "Password changed" })))
}

/// Canned GET answers for the lookup collections, some with explicit nulls
async fn fixture(
    State(state): State<Arc<MockState>>,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Reply {
    let path = uri.path().to_string();
    state.record("GET", path.clone(), query, &headers, Value::Null);

    let body = match path.as_str() {
        "/api/departments" => json!([
            { "id": 1, "code": "HR", "name": "Human Resources", "description": null, "status": "ACTIVE",
              "createdBy": "ruth", "createdAt": "2024-01-01T00:00:00.000Z" },
            { "id": 2, "code": "FIN", "name": "Finance", "description": "Money", "status": null }
        ]),
        "/api/job-titles" => json!([
            { "id": 5, "code": "NUR", "name": "Nurse", "description": null, "status": "ACTIVE" }
        ]),
        "/api/positions" => json!([
            { "id": 1, "name": "Lead", "displayOrder": 3, "isActive": true },
            { "id": 2, "name": "Deputy", "description": null, "displayOrder": 1, "isActive": true },
            { "id": 3, "name": "Intern", "displayOrder": null, "isActive": false }
        ]),
        "/api/equipments" => json!({
            "content": [
                { "id": 1, "equipmentType": "LABORATORY_EQUIPMENT", "equipmentName": "Centrifuge" },
                { "id": 2, "equipmentType": "RADIOLOGY_IMAGING", "equipmentName": "X-Ray",
                  "createdAt": "2024-02-02T00:00:00.000Z" },
                { "id": 3, "equipmentType": "LABORATORY_EQUIPMENT", "equipmentName": "Microscope", "createdAt": null }
            ],
            "totalPages": 1,
            "totalElements": 3
        }),
        "/api/devices/equipment-types" => json!(["LABORATORY_EQUIPMENT", "RADIOLOGY_IMAGING"]),
        "/api/districts" => json!([
            { "id": 2, "name": "North", "code": "N" },
            { "id": 3, "name": "South", "code": null }
        ]),
        "/api/health-centers" => json!([
            { "id": 1, "code": "GEN", "name": "General", "type": "HOSPITAL", "districtId": 2,
              "districtName": "North", "parentCenterId": null, "status": "ACTIVE" },
            { "id": 8, "code": "CL-1", "name": "Clinic", "type": "CLINIC", "description": null, "districtId": 2,
              "districtName": "North", "parentCenterId": 1, "parentCenterName": "General", "status": "INACTIVE" }
        ]),
        _ => return (StatusCode::NOT_FOUND, Json(json!({ "message": "No such collection" }))),
    };
    (StatusCode::OK, Json(body))
}

/// Records a write and answers with the body it was sent
async fn echo(State(state): State<Arc<MockState>>, method: Method, uri: Uri, headers: HeaderMap, Json(body): Json<Value>) -> Reply {
    let verb = if method == Method::POST { "POST" } else { "PUT" };
    state.record(verb, uri.path().to_string(), HashMap::new(), &headers, body.clone());
    let status = if verb == "POST" { StatusCode::CREATED } else { StatusCode::OK };
    (status, Json(body))
}
