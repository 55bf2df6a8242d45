//! Advisory Service boundary.
//!
//! The board sends `{factoryData, gridData, userMessage, status, message,
//! timestamp}` and receives one of the shapes decoded by
//! [`crate::intake::AdvisoryResponse`]. Service reasoning is never
//! validated; only the structural shape matters.

mod client;
mod request;

pub use client::{AdvisoryError, AdvisoryService, HttpAdvisoryClient};
pub use request::AdvisoryRequest;
