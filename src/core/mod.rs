pub mod export;
pub mod payload;
pub mod service;

pub use crate::domain::model::{SearchOutcome, SearchPayload, SearchRequest};
pub use crate::domain::ports::PatentApi;
pub use crate::utils::error::Result;
