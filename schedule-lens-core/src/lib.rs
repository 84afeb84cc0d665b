//! Core functionality for schedule-lens
//!
//! Reads an uploaded project-schedule file, extracts the headline figures
//! and the TUP/TUF contract milestones, and renders them for a browser or
//! a terminal.

pub mod config;
pub mod extract;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod present;
pub mod session;
pub mod upload;

pub use config::{Config, ConfigError, ServerConfig};
pub use extract::{ExtractError, ExtractorConfig, FieldExtractor};
pub use model::{Extraction, MilestoneRow, Project, SummaryView, Task};
pub use parser::{MspdiParser, ParseError, ProjectParser};
pub use pipeline::{Analysis, FailureNotice, Pipeline, PipelineError, analyze};
pub use present::Page;
pub use session::{Session, SessionState};
pub use upload::{RawUpload, UploadError, UploadId, UploadPolicy};
