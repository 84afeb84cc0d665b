//! Single-page HTML rendering

use super::{
    LABEL_PROJECT_NAME, LABEL_TOTAL_COST, MILESTONE_COLUMNS, MILESTONE_HEADING,
    NO_MILESTONES_NOTICE, Page, format_duration,
};
use crate::model::{Extraction, MilestoneRow};
use crate::pipeline::Analysis;
use crate::upload::UploadPolicy;

pub const PAGE_TITLE: &str = "Analisi Milestone Progetto";

const STYLE: &str = "body{font-family:sans-serif;max-width:960px;margin:2rem auto;padding:0 1rem}\
.metrics{display:flex;gap:3rem;margin:1rem 0}.metric .label{color:#555;font-size:.9rem}\
.metric .value{font-size:1.6rem}table{border-collapse:collapse;width:100%}\
th,td{border:1px solid #ccc;padding:.4rem .6rem;text-align:left}\
.notice{padding:.8rem;border-radius:4px;margin:1rem 0}.info{background:#e8f0fe}\
.warning{background:#fff4e5}.error{background:#fdecea;color:#611a15}";

/// Escape text for HTML element content and attribute values
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the whole page for the given state
pub fn render_page(page: Page<'_>, policy: &UploadPolicy) -> String {
    let mut body = String::new();
    body.push_str(&format!("<h1>{}</h1>", escape(PAGE_TITLE)));
    body.push_str(&upload_form(policy));

    match page {
        Page::Idle { notice } => {
            if let Some(notice) = notice {
                body.push_str(&notice_div("warning", notice));
            }
        }
        Page::Analyzed { filename, analysis } => {
            body.push_str(&format!(
                "<p class=\"file\">File: <code>{}</code></p>",
                escape(filename)
            ));
            body.push_str(&render_analysis(analysis));
            body.push_str(
                "<form method=\"post\" action=\"/reset\"><button type=\"submit\">Nuova analisi</button></form>",
            );
        }
    }

    format!(
        "<!doctype html><html lang=\"it\"><head><meta charset=\"utf-8\">\
         <title>{}</title><style>{STYLE}</style></head><body>{body}</body></html>",
        escape(PAGE_TITLE)
    )
}

/// Render an analysis section: metrics and milestones, or the failure notice alone
pub fn render_analysis(analysis: &Analysis) -> String {
    match analysis {
        Analysis::Success(extraction) => render_extraction(extraction),
        Analysis::Failed(notice) => notice_div("error", &notice.message),
    }
}

fn render_extraction(extraction: &Extraction) -> String {
    let summary = &extraction.summary;
    let mut out = String::from("<section class=\"metrics\">");
    out.push_str(&metric(LABEL_PROJECT_NAME, &summary.project_name));
    out.push_str(&metric(LABEL_TOTAL_COST, &summary.formatted_total_cost()));
    out.push_str("</section>");

    out.push_str(&format!("<h2>{}</h2>", escape(MILESTONE_HEADING)));
    if extraction.milestones.is_empty() {
        out.push_str(&notice_div("info", NO_MILESTONES_NOTICE));
    } else {
        out.push_str(&milestone_table(&extraction.milestones));
    }
    out
}

fn milestone_table(rows: &[MilestoneRow]) -> String {
    let mut out = String::from("<table class=\"milestones\"><thead><tr>");
    for column in MILESTONE_COLUMNS {
        out.push_str(&format!("<th>{}</th>", escape(column)));
    }
    out.push_str("</tr></thead><tbody>");
    for row in rows {
        out.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
            escape(&row.name),
            escape(&row.start_date),
            escape(&row.finish_date),
            format_duration(row.duration_days)
        ));
    }
    out.push_str("</tbody></table>");
    out
}

fn metric(label: &str, value: &str) -> String {
    format!(
        "<div class=\"metric\"><div class=\"label\">{}</div><div class=\"value\">{}</div></div>",
        escape(label),
        escape(value)
    )
}

fn notice_div(kind: &str, text: &str) -> String {
    format!("<div class=\"notice {kind}\">{}</div>", escape(text))
}

fn upload_form(policy: &UploadPolicy) -> String {
    format!(
        "<form method=\"post\" action=\"/analyze\" enctype=\"multipart/form-data\">\
         <label>Carica il file di progetto (<code>{accept}</code>) \
         <input type=\"file\" name=\"file\" accept=\"{accept}\"></label> \
         <button type=\"submit\">Analizza</button></form>",
        accept = escape(&policy.accept_attribute())
    )
}
