//! Error types for the generation client.
//!
//! Transport-level failures are [`HttpError`](crate::traits::HttpError);
//! everything the store surfaces to users goes through
//! [`GenerationError::user_message`].

mod generation;

pub use generation::GenerationError;

/// Result alias for generation client operations.
pub type GenerationResult<T> = Result<T, GenerationError>;
