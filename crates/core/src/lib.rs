//! Client-side orchestration for the upload, visualization and chat workflows.
//!
//! Each controller owns its own state and talks to the backend through
//! [`AnalystBackend`]. Requests run as spawned tasks; their responses are
//! applied only when the owner calls `process_completions` (or awaits
//! `wait_for_completion`), so every state update happens on the owner's thread.

pub mod chat;
mod completion;
pub mod error;
pub mod history;
pub mod upload;
pub mod visualization;

#[cfg(test)]
mod test_support;

pub use chat::{ChatController, ChatState, AI_UNAVAILABLE_MESSAGE, NO_ANSWER_MESSAGE};
pub use completion::ResponseOrdering;
pub use error::ValidationError;
pub use history::{ChatEntry, ChatHistory};
pub use smart_analyst_backend::{AnalystBackend, UploadFile};
pub use upload::{UploadController, UploadState, UPLOAD_FAILED_MESSAGE};
pub use visualization::{GraphNotice, VisualizationController, VisualizationState};
