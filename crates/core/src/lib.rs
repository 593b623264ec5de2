//! `eventdesk-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns):
//! identifiers, the domain error model, the validation error collector and
//! pagination types shared by every other crate.

pub mod entity;
pub mod error;
pub mod id;
pub mod page;
pub mod validation;

pub use entity::Entity;
pub use error::DomainError;
pub use id::{AccountId, EventId};
pub use page::{DEFAULT_PAGE_SIZE, Direction, MAX_PAGE_SIZE, Page, Pageable, Sort};
pub use validation::{FieldError, ValidationErrors};
