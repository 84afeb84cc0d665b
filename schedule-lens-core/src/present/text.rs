//! Plain-text rendering for the terminal

use super::{
    LABEL_PROJECT_NAME, LABEL_TOTAL_COST, MILESTONE_COLUMNS, MILESTONE_HEADING,
    NO_MILESTONES_NOTICE, format_duration,
};
use crate::model::{Extraction, MilestoneRow};
use crate::pipeline::Analysis;

/// Render an analysis as aligned text
pub fn render_analysis(analysis: &Analysis) -> String {
    match analysis {
        Analysis::Success(extraction) => render_extraction(extraction),
        Analysis::Failed(notice) => format!("{}\n", notice.message),
    }
}

fn render_extraction(extraction: &Extraction) -> String {
    let summary = &extraction.summary;
    let mut out = String::new();
    out.push_str(&format!("{LABEL_PROJECT_NAME}: {}\n", summary.project_name));
    out.push_str(&format!("{LABEL_TOTAL_COST}: {}\n\n", summary.formatted_total_cost()));
    out.push_str(&format!("{MILESTONE_HEADING}\n"));

    if extraction.milestones.is_empty() {
        out.push_str(&format!("{NO_MILESTONES_NOTICE}\n"));
    } else {
        out.push_str(&table(&extraction.milestones));
    }
    out
}

fn table(rows: &[MilestoneRow]) -> String {
    let cells: Vec<[String; 4]> = rows
        .iter()
        .map(|row| {
            [
                row.name.clone(),
                row.start_date.clone(),
                row.finish_date.clone(),
                format_duration(row.duration_days),
            ]
        })
        .collect();

    let mut widths = MILESTONE_COLUMNS.map(|c| c.chars().count());
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |values: [&str; 4]| -> String {
        let padded: Vec<String> = values
            .iter()
            .zip(widths)
            .map(|(value, width)| format!("{value:<width$}"))
            .collect();
        format!("{}\n", padded.join("  ").trim_end())
    };

    let mut out = line(MILESTONE_COLUMNS);
    out.push_str(&line(widths.map(|w| "-".repeat(w)).each_ref().map(String::as_str)));
    for row in &cells {
        out.push_str(&line(row.each_ref().map(String::as_str)));
    }
    out
}
