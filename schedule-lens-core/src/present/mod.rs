//! Presentation of an analysis: number formatting plus HTML and text views
//!
//! Nothing in here can fail. Values that cannot be formatted are shown as
//! [`NOT_AVAILABLE`].

pub mod html;
pub mod text;

use crate::pipeline::Analysis;

pub const NOT_AVAILABLE: &str = "N/D";
pub const CURRENCY_SYMBOL: &str = "€";

pub const LABEL_PROJECT_NAME: &str = "Nome Progetto";
pub const LABEL_TOTAL_COST: &str = "Costo Totale";
pub const MILESTONE_HEADING: &str = "Milestone TUP/TUF";
pub const MILESTONE_COLUMNS: [&str; 4] = ["Nome Completo", "Data Inizio", "Data Fine", "Durata (giorni)"];
pub const NO_MILESTONES_NOTICE: &str = "Nessuna milestone TUP/TUF trovata.";

/// What a page shows, independent of the output format
#[derive(Debug, Clone, Copy)]
pub enum Page<'a> {
    /// No analysis yet, optionally with a notice for the user
    Idle { notice: Option<&'a str> },
    /// One upload has been analyzed
    Analyzed {
        filename: &'a str,
        analysis: &'a Analysis,
    },
}

/// Format an amount as `€ 1.234.567,50`
pub fn format_currency(amount: Option<f64>) -> String {
    let Some(amount) = amount.filter(|a| a.is_finite()) else {
        return NOT_AVAILABLE.to_string();
    };

    let cents = (amount.abs() * 100.0).round();
    if cents >= u128::MAX as f64 {
        return NOT_AVAILABLE.to_string();
    }
    let cents = cents as u128;
    let units = group_thousands(cents / 100);
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };

    format!("{CURRENCY_SYMBOL} {sign}{units},{:02}", cents % 100)
}

/// Format a day count: whole numbers without decimals, others with a comma
pub fn format_duration(days: f64) -> String {
    if !days.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    let rounded = (days * 100.0).round() / 100.0;
    if !rounded.is_finite() {
        return NOT_AVAILABLE.to_string();
    }
    if rounded == 0.0 {
        return "0".to_string();
    }
    if rounded.fract() == 0.0 {
        return format!("{rounded:.0}");
    }

    let fixed = format!("{rounded:.2}");
    fixed.trim_end_matches('0').replace('.', ",")
}

fn group_thousands(mut value: u128) -> String {
    let mut groups = Vec::new();
    loop {
        if value < 1000 {
            groups.push(value.to_string());
            break;
        }
        groups.push(format!("{:03}", value % 1000));
        value /= 1000;
    }
    groups.reverse();
    groups.join(".")
}
