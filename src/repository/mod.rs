use async_trait::async_trait;
use sqlx::{Connection, PgPool};

use crate::models::Event;

/// Persistence for events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Every stored event, in whatever order the store scans them.
    async fn list_events(&self) -> Result<Vec<Event>, sqlx::Error>;

    /// Inserts a single event and hands it back on success.
    async fn create_event(&self, event: Event) -> Result<Event, sqlx::Error>;
}

/// Liveness check against the backing store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StoreProbe: Send + Sync {
    async fn ping(&self) -> Result<(), sqlx::Error>;
}

#[derive(Clone)]
pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventRepository for PgEventRepository {
    async fn list_events(&self) -> Result<Vec<Event>, sqlx::Error> {
        let events = sqlx::query_as::<_, Event>(
            "SELECT id, name, status, create_date, update_date, delete_date FROM events",
        )
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(count = events.len(), "Listed events");
        Ok(events)
    }

    async fn create_event(&self, event: Event) -> Result<Event, sqlx::Error> {
        sqlx::query(
            "INSERT INTO events (id, name, status, create_date, update_date, delete_date) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&event.id)
        .bind(&event.name)
        .bind(event.status.as_str())
        .bind(event.create_date)
        .bind(event.update_date)
        .bind(event.delete_date)
        .execute(&self.pool)
        .await?;

        tracing::info!(event_id = %event.id, "Created event");
        Ok(event)
    }
}

#[async_trait]
impl StoreProbe for PgPool {
    async fn ping(&self) -> Result<(), sqlx::Error> {
        let mut conn = self.acquire().await?;
        conn.ping().await
    }
}
