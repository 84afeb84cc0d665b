//! Parser returning a canned result, for unit tests only

#![cfg(test)]

use super::{ParseError, ProjectParser};
use crate::model::Project;
use std::sync::Mutex;

pub struct FixedParser {
    result: Result<Project, ParseError>,
    calls: Mutex<Vec<usize>>,
}

impl FixedParser {
    pub fn returning(project: Project) -> Self {
        Self {
            result: Ok(project),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(ParseError::new(message)),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Byte lengths seen by `parse`, in call order
    pub fn calls(&self) -> Vec<usize> {
        self.calls.lock().unwrap().clone()
    }
}

impl ProjectParser for FixedParser {
    fn name(&self) -> &str {
        "fixed"
    }

    fn parse(&self, bytes: &[u8]) -> Result<Project, ParseError> {
        self.calls.lock().unwrap().push(bytes.len());
        self.result.clone()
    }
}
