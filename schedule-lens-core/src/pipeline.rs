//! Parse-and-extract pipeline with a single error boundary
//!
//! Every failure between the uploaded bytes and the extracted fields
//! collapses into one [`FailureNotice`]. Callers get either a complete
//! [`Extraction`] or the notice, never a partial result.

use crate::extract::{ExtractError, ExtractorConfig, FieldExtractor};
use crate::model::Extraction;
use crate::parser::{ParseError, ProjectParser};
use crate::upload::{RawUpload, UploadPolicy};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{info, info_span, warn};

/// Hint appended to every failure message
pub const FAILURE_HINT: &str = "Il file potrebbe essere corrotto o non supportato.";

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Extract(#[from] ExtractError),
}

/// The one user-visible failure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailureNotice {
    pub message: String,
}

impl FailureNotice {
    pub fn from_error(err: &PipelineError) -> Self {
        Self {
            message: format!("Errore durante l'analisi del file: {err}. {FAILURE_HINT}"),
        }
    }
}

/// Outcome of one analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Analysis {
    Success(Extraction),
    Failed(FailureNotice),
}

impl Analysis {
    pub fn is_success(&self) -> bool {
        matches!(self, Analysis::Success(_))
    }

    pub fn extraction(&self) -> Option<&Extraction> {
        match self {
            Analysis::Success(extraction) => Some(extraction),
            Analysis::Failed(_) => None,
        }
    }
}

/// Parser, extractor and upload policy wired together
#[derive(Clone)]
pub struct Pipeline {
    parser: Arc<dyn ProjectParser>,
    extractor: FieldExtractor,
    policy: UploadPolicy,
}

impl Pipeline {
    pub fn new(parser: Arc<dyn ProjectParser>) -> Self {
        Self {
            parser,
            extractor: FieldExtractor::default(),
            policy: UploadPolicy::default(),
        }
    }

    pub fn with_extractor(mut self, config: &ExtractorConfig) -> Self {
        self.extractor = FieldExtractor::new(config);
        self
    }

    pub fn with_policy(mut self, policy: UploadPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    pub fn parser_name(&self) -> &str {
        self.parser.name()
    }

    /// Parse and extract, keeping the error typed
    pub fn try_run(&self, upload: &RawUpload) -> Result<Extraction, PipelineError> {
        let project = self.parser.parse(&upload.bytes)?;
        let extraction = self.extractor.extract(&project)?;
        Ok(extraction)
    }

    /// Parse and extract behind the error boundary
    pub fn run(&self, upload: &RawUpload) -> Analysis {
        let span = info_span!("analysis", file = %upload.filename, parser = self.parser.name());
        let _guard = span.enter();
        let started = Instant::now();

        match self.try_run(upload) {
            Ok(extraction) => {
                info!(
                    "Analysis succeeded in {:?}: {} milestones",
                    started.elapsed(),
                    extraction.milestones.len()
                );
                Analysis::Success(extraction)
            }
            Err(err) => {
                warn!("Analysis failed in {:?}: {}", started.elapsed(), err);
                Analysis::Failed(FailureNotice::from_error(&err))
            }
        }
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("parser", &self.parser.name())
            .field("extractor", &self.extractor)
            .field("policy", &self.policy)
            .finish()
    }
}

/// Analyze one upload with the default markers
pub fn analyze(parser: Arc<dyn ProjectParser>, upload: &RawUpload) -> Analysis {
    Pipeline::new(parser).run(upload)
}
