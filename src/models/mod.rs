pub mod event;
pub mod todo;

pub use event::{Event, EventStatus, TodoEvent, UnknownStatus};
pub use todo::TodoCsv;
