//! Project-schedule parsing
//!
//! The pipeline only depends on the [`ProjectParser`] capability. A parse
//! failure is opaque: it carries a description and nothing callers can
//! branch on.

pub mod mspdi;

#[cfg(test)]
pub mod fixed;

pub use mspdi::MspdiParser;

use crate::model::Project;
use thiserror::Error;

/// Opaque parse failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParseError {
    message: String,
}

impl ParseError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Turns the bytes of an uploaded file into a [`Project`]
pub trait ProjectParser: Send + Sync {
    /// Short name used in logs
    fn name(&self) -> &str;

    fn parse(&self, bytes: &[u8]) -> Result<Project, ParseError>;
}
