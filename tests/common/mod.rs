#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tokio::sync::RwLock;
use tower::ServiceExt;

use csv_importer::models::Event;
use csv_importer::repository::{EventRepository, StoreProbe};
use csv_importer::routes::create_routes;

const BOUNDARY: &str = "integration-boundary";

/// Event store kept in memory. Inserting an id twice fails like a primary
/// key violation would.
#[derive(Default)]
pub struct MemoryEventRepository {
    events: RwLock<Vec<Event>>,
    reject_inserts: bool,
}

impl MemoryEventRepository {
    pub fn rejecting_inserts() -> Self {
        Self {
            events: RwLock::default(),
            reject_inserts: true,
        }
    }

    pub async fn seed(&self, event: Event) {
        self.events.write().await.push(event);
    }
}

#[async_trait]
impl EventRepository for MemoryEventRepository {
    async fn list_events(&self) -> Result<Vec<Event>, sqlx::Error> {
        Ok(self.events.read().await.clone())
    }

    async fn create_event(&self, event: Event) -> Result<Event, sqlx::Error> {
        let mut events = self.events.write().await;
        if self.reject_inserts || events.iter().any(|e| e.id == event.id) {
            return Err(sqlx::Error::Protocol(format!(
                "duplicate key value violates unique constraint \"events_pkey\": {}",
                event.id
            )));
        }
        events.push(event.clone());
        Ok(event)
    }
}

pub struct FixedProbe(pub bool);

#[async_trait]
impl StoreProbe for FixedProbe {
    async fn ping(&self) -> Result<(), sqlx::Error> {
        if self.0 {
            Ok(())
        } else {
            Err(sqlx::Error::PoolTimedOut)
        }
    }
}

pub fn build_test_app(repo: Arc<MemoryEventRepository>, healthy: bool) -> Router {
    create_routes(repo, Arc::new(FixedProbe(healthy)))
}

pub fn upload_request(name: &str, csv: &str) -> Request<Body> {
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"name\"\r\n\r\n\
         {name}\r\n\
         --{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"csvfile\"; filename=\"todos.csv\"\r\n\
         Content-Type: text/csv\r\n\r\n\
         {csv}\r\n\
         --{BOUNDARY}--\r\n"
    );

    Request::post("/api/v1/event")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}
