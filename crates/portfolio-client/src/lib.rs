//! Async client for the remote catalog, feedback, action and AI retrieval
//! service.

pub mod client;
pub mod error;
pub(crate) mod retry;
pub mod types;

pub use client::{CatalogClient, REQUEST_ID_HEADER};
pub use error::ClientError;
pub use types::{ActionUpdate, AiAnswer, AiQuery, IngestionJob, JobStatus, NewProduct};
