//! Events domain module.
//!
//! The `Event` resource, its client-facing input shape (`EventDto`) and the
//! business rules applied before an event is written. Deterministic domain
//! logic only (no IO, no HTTP, no storage).

pub mod dto;
pub mod event;
pub mod validator;

pub use dto::EventDto;
pub use event::{Event, EventStatus};
pub use validator::{EventValidator, check_event_dto};
