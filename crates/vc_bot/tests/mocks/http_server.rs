use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};

#[derive(Debug, Clone)]
pub struct Route {
    pub path: String,
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
    /// Accept the request but never answer it.
    pub hang: bool,
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub target: String,
    pub headers: HeaderMap,
    pub body: String,
}

#[derive(Clone, Default)]
struct ServerState {
    routes: Arc<Mutex<Vec<Route>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Axum app on a random local port. Routes are matched on path-and-query
/// prefix in registration order; anything unmatched gets a 404.
pub struct MockHttpServer {
    pub base_url: String,
    state: ServerState,
}

async fn handle(
    State(state): State<ServerState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let target = uri
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    let route = state
        .routes
        .lock()
        .unwrap()
        .iter()
        .find(|r| target.starts_with(&r.path))
        .cloned();

    state.requests.lock().unwrap().push(RecordedRequest {
        method,
        target,
        headers,
        body,
    });

    let Some(route) = route else {
        return (StatusCode::NOT_FOUND, "not found").into_response();
    };

    if route.hang {
        std::future::pending::<()>().await;
    }

    let status = StatusCode::from_u16(route.status).unwrap();
    (status, [(header::CONTENT_TYPE, route.content_type)], route.body).into_response()
}

impl MockHttpServer {
    pub async fn start() -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let state = ServerState::default();

        let app = Router::new().fallback(handle).with_state(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { base_url, state }
    }

    pub fn route(&self, path: &str, status: u16, content_type: &'static str, body: impl Into<String>) {
        self.state.routes.lock().unwrap().push(Route {
            path: path.to_string(),
            status,
            content_type,
            body: body.into(),
            hang: false,
        });
    }

    pub fn hang(&self, path: &str) {
        self.state.routes.lock().unwrap().push(Route {
            path: path.to_string(),
            status: 200,
            content_type: "text/plain",
            body: String::new(),
            hang: true,
        });
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}
