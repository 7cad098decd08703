pub mod events;
pub mod health;

pub use events::{create_event, list_events};
pub use health::health_check;
