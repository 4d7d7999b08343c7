//! In-process posts API for exercising the HTTP client.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

/// What the server answers on every route
#[derive(Debug, Clone)]
pub struct MockReply {
    pub status: u16,
    pub body: String,
    pub delay: Duration,
}

impl MockReply {
    pub fn json(body: &str) -> Self {
        Self {
            status: 200,
            body: body.to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn error(status: u16, message: &str) -> Self {
        Self {
            status,
            body: format!(r#"{{"error": "{message}"}}"#),
            delay: Duration::ZERO,
        }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Clone)]
struct MockState {
    reply: Arc<Mutex<MockReply>>,
    paths: Arc<Mutex<Vec<String>>>,
}

pub struct MockApi {
    pub addr: SocketAddr,
    state: MockState,
}

impl MockApi {
    pub async fn start(reply: MockReply) -> Self {
        let state = MockState {
            reply: Arc::new(Mutex::new(reply)),
            paths: Arc::new(Mutex::new(Vec::new())),
        };

        let app = Router::new()
            .route("/posts", get(list_posts))
            .route("/posts/{id}", get(get_post))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, state }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub async fn set_reply(&self, reply: MockReply) {
        *self.state.reply.lock().await = reply;
    }

    pub async fn paths(&self) -> Vec<String> {
        self.state.paths.lock().await.clone()
    }
}

async fn list_posts(State(state): State<MockState>) -> Response {
    state.paths.lock().await.push("/posts".to_string());
    respond(&state).await
}

async fn get_post(State(state): State<MockState>, Path(id): Path<String>) -> Response {
    state.paths.lock().await.push(format!("/posts/{id}"));
    respond(&state).await
}

async fn respond(state: &MockState) -> Response {
    let reply = state.reply.lock().await.clone();
    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }
    let status = StatusCode::from_u16(reply.status).unwrap();
    (status, [(header::CONTENT_TYPE, "application/json")], reply.body).into_response()
}
