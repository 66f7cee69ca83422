//! Common types used across the application.

pub mod id;
pub mod money;
pub mod pagination;

pub use id::*;
pub use money::{CENT, Currency, format_in, round_cents};
pub use pagination::{PageMeta, PageRequest, PageResponse};
