//! Data model for parsed schedules and the records derived from them
//!
//! `Project` and `Task` are the read-only view handed over by a parser.
//! Everything else in this module is an owned copy produced per upload.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A parsed project-schedule file
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Project {
    /// Tasks in file order
    pub tasks: Vec<Task>,

    /// Total cost in currency units, when the file carries one
    pub total_cost: Option<f64>,
}

impl Project {
    /// Create a project from its tasks and total cost
    pub fn new(tasks: Vec<Task>, total_cost: Option<f64>) -> Self {
        Self { tasks, total_cost }
    }
}

/// A single task of a project
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Task {
    /// Task name
    pub name: Option<String>,

    /// Whether the schedule flags this task as a milestone
    pub milestone: bool,

    /// Scheduled start
    pub start: Option<NaiveDateTime>,

    /// Scheduled finish
    pub finish: Option<NaiveDateTime>,

    /// Duration in working days
    pub duration_days: Option<f64>,
}

impl Task {
    /// Create a named task with no dates and no duration
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Mark the task as a milestone
    pub fn milestone(mut self) -> Self {
        self.milestone = true;
        self
    }

    /// Set start and finish
    pub fn scheduled(mut self, start: NaiveDateTime, finish: NaiveDateTime) -> Self {
        self.start = Some(start);
        self.finish = Some(finish);
        self
    }

    /// Set the duration in days
    pub fn lasting(mut self, days: f64) -> Self {
        self.duration_days = Some(days);
        self
    }
}

/// One row of the milestone table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneRow {
    pub name: String,
    /// `YYYY-MM-DD` or the not-available placeholder
    pub start_date: String,
    /// `YYYY-MM-DD` or the not-available placeholder
    pub finish_date: String,
    pub duration_days: f64,
}

/// Headline metrics shown above the milestone table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryView {
    pub project_name: String,
    pub total_cost: Option<f64>,
}

impl SummaryView {
    /// Total cost as displayed, e.g. `€ 1.234.567,50`
    pub fn formatted_total_cost(&self) -> String {
        crate::present::format_currency(self.total_cost)
    }
}

/// Everything the extractor derives from one project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Extraction {
    pub summary: SummaryView,
    pub milestones: Vec<MilestoneRow>,
}
