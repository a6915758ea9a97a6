pub mod api;
pub mod error;
pub mod types;

pub use api::{AnalystApi, AnalystBackend, Timeouts, DEFAULT_BASE_URL};
pub use error::{ApiError, ApiResult};
pub use types::*;
