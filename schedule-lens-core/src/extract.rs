//! Field extraction: the summary metrics and the TUP/TUF milestone rows
//!
//! Two heuristics are kept exactly as the reports have always worked:
//!
//! * the project name is the name of the first task. In MSPDI files the
//!   first task is the project summary task, whose name is the project
//!   title, but nothing guarantees that for other sources.
//! * a milestone qualifies when its uppercased name *contains* one of the
//!   markers. This is plain substring matching, so "Setup Area Lavori"
//!   matches `TUP` through "SETUP". Word-boundary matching would be a
//!   behavior change.

use crate::model::{Extraction, MilestoneRow, Project, SummaryView, Task};
use crate::present::NOT_AVAILABLE;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, trace};

/// Shown when the project has no tasks to take a name from
pub const PROJECT_NAME_PLACEHOLDER: &str = "Nome non trovato";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("task #{index} has no {attribute}")]
    MissingAttribute { index: usize, attribute: &'static str },
}

/// Which task names count as contract milestones
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Substrings looked for in the uppercased task name
    pub markers: Vec<String>,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            markers: vec!["TUP".to_string(), "TUF".to_string()],
        }
    }
}

/// Derives the summary and milestone table from a parsed project
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    markers: Vec<String>,
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new(&ExtractorConfig::default())
    }
}

impl FieldExtractor {
    pub fn new(config: &ExtractorConfig) -> Self {
        Self {
            markers: config.markers.iter().map(|m| m.to_uppercase()).collect(),
        }
    }

    pub fn markers(&self) -> &[String] {
        &self.markers
    }

    /// Walk the task list once and derive everything shown to the user.
    ///
    /// The project is only read. A task the milestone test cannot be
    /// evaluated on is an error for the caller to report.
    pub fn extract(&self, project: &Project) -> Result<Extraction, ExtractError> {
        let summary = SummaryView {
            project_name: project_name(project),
            total_cost: project.total_cost,
        };

        let mut milestones = Vec::new();
        for (index, task) in project.tasks.iter().enumerate() {
            if !task.milestone {
                continue;
            }
            let name = task.name.as_deref().ok_or(ExtractError::MissingAttribute {
                index,
                attribute: "name",
            })?;
            if !self.is_marked(name) {
                trace!("Skipping milestone without marker: {}", name);
                continue;
            }
            milestones.push(milestone_row(index, name, task)?);
        }

        debug!(
            "Extracted {} marked milestones from {} tasks",
            milestones.len(),
            project.tasks.len()
        );

        Ok(Extraction {
            summary,
            milestones,
        })
    }

    /// Substring test on the uppercased name
    pub fn is_marked(&self, name: &str) -> bool {
        let upper = name.to_uppercase();
        self.markers.iter().any(|marker| upper.contains(marker.as_str()))
    }
}

/// Extract with the default TUP/TUF markers
pub fn extract(project: &Project) -> Result<Extraction, ExtractError> {
    FieldExtractor::default().extract(project)
}

fn project_name(project: &Project) -> String {
    project
        .tasks
        .first()
        .and_then(|task| task.name.clone())
        .unwrap_or_else(|| PROJECT_NAME_PLACEHOLDER.to_string())
}

fn milestone_row(index: usize, name: &str, task: &Task) -> Result<MilestoneRow, ExtractError> {
    let duration_days = task.duration_days.ok_or(ExtractError::MissingAttribute {
        index,
        attribute: "duration",
    })?;

    Ok(MilestoneRow {
        name: name.to_string(),
        start_date: date_only(task.start),
        finish_date: date_only(task.finish),
        duration_days,
    })
}

fn date_only(timestamp: Option<NaiveDateTime>) -> String {
    match timestamp {
        Some(ts) => ts.date().format("%Y-%m-%d").to_string(),
        None => NOT_AVAILABLE.to_string(),
    }
}
