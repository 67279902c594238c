//! In-process mock of the portfolio API, shared by the integration suites.

#![allow(dead_code)]

use axum::{
    Json, Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post, put},
};
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};

use folio::portfolio::models::{MediaType, Project, ProjectPayload, ReorderRequest};

pub const PASSWORD: &str = "hunter2";
pub const TOKEN: &str = "test-token";

#[derive(Debug, Default)]
pub struct MockState {
    pub projects: Vec<Project>,
    /// Reject every bearer token with 401
    pub revoked: bool,
    pub fail_reorder: bool,
    /// Answer the list endpoint with a non-JSON body
    pub garbage_list: bool,
    /// Answer a correct login without a token
    pub omit_token: bool,
    /// `METHOD path` of every request seen
    pub log: Vec<String>,
    pub last_reorder: Option<Value>,
    pub last_update: Option<Value>,
}

pub type Shared = Arc<Mutex<MockState>>;

pub fn project(id: &str, title: &str, order: i64) -> Project {
    Project {
        id: id.to_string(),
        title: title.to_string(),
        description: format!("About {}", title),
        tags: vec!["demo".to_string()],
        image: format!("https://cdn.example.com/{}.png", id),
        link: None,
        media_type: MediaType::Image,
        order_index: Some(order),
        created_at: None,
        updated_at: None,
    }
}

pub fn state_with(projects: Vec<Project>) -> Shared {
    Arc::new(Mutex::new(MockState {
        projects,
        ..Default::default()
    }))
}

pub fn abc_state() -> Shared {
    state_with(vec![
        project("a", "Alpha", 0),
        project("b", "Bravo", 1),
        project("c", "Charlie", 2),
    ])
}

fn reject(state: &MockState, headers: &HeaderMap) -> Option<Response> {
    let expected = format!("Bearer {}", TOKEN);
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if !state.revoked && presented == Some(expected.as_str()) {
        return None;
    }
    Some(
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "message": "Token expired"})),
        )
            .into_response(),
    )
}

fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"success": false, "message": "Project not found"})),
    )
        .into_response()
}

async fn login(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = state.lock().unwrap();
    state.log.push("POST /api/auth/login".into());
    if body["password"] != PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"success": false, "message": "Invalid password"})),
        )
            .into_response();
    }
    if state.omit_token {
        return Json(json!({"success": true, "data": {}})).into_response();
    }
    state.revoked = false;
    Json(json!({"success": true, "data": {"token": TOKEN}})).into_response()
}

async fn verify(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    state.log.push("POST /api/auth/verify".into());
    if let Some(rejection) = reject(&state, &headers) {
        return rejection;
    }
    Json(json!({"success": true, "data": {"valid": true}})).into_response()
}

async fn list_projects(State(state): State<Shared>, headers: HeaderMap) -> Response {
    let mut state = state.lock().unwrap();
    state.log.push("GET /api/projects".into());
    if let Some(rejection) = reject(&state, &headers) {
        return rejection;
    }
    if state.garbage_list {
        return (StatusCode::OK, "<html>oops</html>").into_response();
    }
    Json(json!({"success": true, "data": state.projects})).into_response()
}

async fn get_project(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let mut state = state.lock().unwrap();
    state.log.push(format!("GET /api/projects/{}", id));
    if let Some(rejection) = reject(&state, &headers) {
        return rejection;
    }
    match state.projects.iter().find(|p| p.id == id) {
        Some(p) => Json(json!({"success": true, "data": p})).into_response(),
        None => not_found(),
    }
}

async fn create_project(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(payload): Json<ProjectPayload>,
) -> Response {
    let mut state = state.lock().unwrap();
    state.log.push("POST /api/projects".into());
    if let Some(rejection) = reject(&state, &headers) {
        return rejection;
    }
    let project = Project {
        id: uuid::Uuid::new_v4().to_string(),
        title: payload.title,
        description: payload.description,
        tags: payload.tags,
        image: payload.image,
        link: payload.link,
        media_type: payload.media_type,
        order_index: Some(state.projects.len() as i64),
        created_at: None,
        updated_at: None,
    };
    state.projects.push(project.clone());
    (
        StatusCode::CREATED,
        Json(json!({"success": true, "data": project, "message": "Project created"})),
    )
        .into_response()
}

async fn update_project(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    state.log.push(format!("PUT /api/projects/{}", id));
    if let Some(rejection) = reject(&state, &headers) {
        return rejection;
    }
    let Ok(payload) = serde_json::from_value::<ProjectPayload>(body.clone()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "message": "Invalid project"})),
        )
            .into_response();
    };
    state.last_update = Some(body.clone());
    let Some(slot) = state.projects.iter_mut().find(|p| p.id == id) else {
        return not_found();
    };
    slot.title = payload.title;
    slot.description = payload.description;
    slot.tags = payload.tags;
    slot.image = payload.image;
    // Partial update: a missing key keeps the stored link.
    if body.get("link").is_some() {
        slot.link = payload.link;
    }
    slot.media_type = payload.media_type;
    let updated = slot.clone();
    Json(json!({"success": true, "data": updated})).into_response()
}

async fn delete_project(
    State(state): State<Shared>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let mut state = state.lock().unwrap();
    state.log.push(format!("DELETE /api/projects/{}", id));
    if let Some(rejection) = reject(&state, &headers) {
        return rejection;
    }
    let before = state.projects.len();
    state.projects.retain(|p| p.id != id);
    if state.projects.len() == before {
        return not_found();
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn reorder(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    state.log.push("PUT /api/projects/reorder".into());
    if let Some(rejection) = reject(&state, &headers) {
        return rejection;
    }
    state.last_reorder = Some(body.clone());
    if state.fail_reorder {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"success": false, "message": "Reorder failed"})),
        )
            .into_response();
    }
    let Ok(request) = serde_json::from_value::<ReorderRequest>(body) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"success": false, "message": "Bad reorder body"})),
        )
            .into_response();
    };
    for order in request.projects {
        if let Some(p) = state.projects.iter_mut().find(|p| p.id == order.id) {
            p.order_index = Some(order.order as i64);
        }
    }
    state.projects.sort_by_key(|p| p.order_index);
    Json(json!({"success": true, "message": "Order updated"})).into_response()
}

pub fn router(state: Shared) -> Router {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/verify", post(verify))
        .route("/api/projects", get(list_projects).post(create_project))
        .route("/api/projects/reorder", put(reorder))
        .route(
            "/api/projects/{id}",
            get(get_project).put(update_project).delete(delete_project),
        )
        .with_state(state)
}

/// Serve on an ephemeral port from inside a tokio test.
pub async fn spawn(state: Shared) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router(state)).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Serve on an ephemeral port from a plain `#[test]`, on its own runtime thread.
pub fn spawn_blocking(state: Shared) -> String {
    let (tx, rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            tx.send(listener.local_addr().unwrap()).unwrap();
            axum::serve(listener, router(state)).await.unwrap();
        });
    });
    format!("http://{}", rx.recv().unwrap())
}
