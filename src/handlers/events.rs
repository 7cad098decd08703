use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::response::Response;
use axum::routing::{get, post};
use axum::Router;

use crate::importer::decode_todos;
use crate::models::Event;
use crate::repository::EventRepository;
use crate::utils::error::AppError;
use crate::utils::response::success;

const NAME_FIELD: &str = "name";
const FILE_FIELD: &str = "csvfile";

pub fn router(repo: Arc<dyn EventRepository>) -> Router {
    Router::new()
        .route("/events", get(list_events))
        .route("/event", post(create_event))
        .layer(DefaultBodyLimit::disable())
        .with_state(repo)
}

/// GET /api/v1/events
pub async fn list_events(
    State(repo): State<Arc<dyn EventRepository>>,
) -> Result<Response, AppError> {
    let events = repo.list_events().await?;
    Ok(success(events))
}

/// POST /api/v1/event
///
/// Takes a multipart form with a `name` text field and a `csvfile` upload.
/// The decoded rows are only logged; the event itself is stored as a draft.
/// Upload size is not capped. When `csvfile` appears more than once the
/// first part is used.
pub async fn create_event(
    State(repo): State<Arc<dyn EventRepository>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Response, AppError> {
    let upload = Upload::read(multipart?).await?;

    let todos = decode_todos(&upload.csv)?;
    tracing::info!(rows = todos.len(), "Decoded uploaded todo file");
    tracing::debug!(?todos, "Decoded todo rows");

    let event = repo.create_event(Event::draft(upload.name)).await?;
    Ok(success(event))
}

struct Upload {
    name: String,
    csv: Bytes,
}

impl Upload {
    async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut name = String::new();
        let mut csv = None;

        while let Some(field) = multipart.next_field().await? {
            let field_name = field.name().map(str::to_owned);
            match field_name.as_deref() {
                Some(NAME_FIELD) => name = field.text().await?,
                Some(FILE_FIELD) if csv.is_none() => csv = Some(field.bytes().await?),
                _ => {}
            }
        }

        let csv = csv.ok_or_else(|| {
            AppError::BadRequest(format!("no file uploaded in form field '{FILE_FIELD}'"))
        })?;

        Ok(Self { name, csv })
    }
}
