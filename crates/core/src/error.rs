use thiserror::Error;

/// A precondition that failed before any request was issued. The presentation
/// layer decides how to show it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please select a file first.")]
    NoFileSelected,

    #[error("Please enter a question first.")]
    EmptyQuestion,
}
