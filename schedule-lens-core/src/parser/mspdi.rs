//! Parser for the XML interchange form of project schedules (MSPDI)
//!
//! Only the handful of elements the extractor needs are read; everything
//! else in the document is skipped. Tasks keep document order, with the
//! project summary task (UID 0) first as the format writes it.

use super::{ParseError, ProjectParser};
use crate::model::{Project, Task};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use quick_xml::Reader;
use quick_xml::events::Event;
use regex_utils::{duration, timestamp};
use tracing::debug;

const ROOT: &str = "Project";
const DEFAULT_MINUTES_PER_DAY: f64 = 480.0;
const SUMMARY_TASK_UID: &str = "0";

/// Streaming MSPDI reader built on `quick-xml`
///
/// A file without a `MinutesPerDay` element is read with 480-minute days.
#[derive(Debug, Clone, Default)]
pub struct MspdiParser;

impl MspdiParser {
    pub fn new() -> Self {
        Self
    }
}

/// Raw text of a `<Task>` before conversion
#[derive(Debug, Default)]
struct TaskDraft {
    uid: Option<String>,
    name: Option<String>,
    milestone: Option<String>,
    start: Option<String>,
    finish: Option<String>,
    duration: Option<String>,
    cost: Option<String>,
}

impl TaskDraft {
    fn set(&mut self, field: &str, value: String) {
        let slot = match field {
            "UID" => &mut self.uid,
            "Name" => &mut self.name,
            "Milestone" => &mut self.milestone,
            "Start" => &mut self.start,
            "Finish" => &mut self.finish,
            "Duration" => &mut self.duration,
            "Cost" => &mut self.cost,
            _ => return,
        };
        *slot = Some(value);
    }

    fn is_summary(&self) -> bool {
        self.uid.as_deref().map(str::trim) == Some(SUMMARY_TASK_UID)
    }

    fn into_task(self, index: usize, minutes_per_day: f64) -> Result<Task, ParseError> {
        let context = |what: &str, value: &str| {
            ParseError::new(format!("task #{index}: invalid {what} '{value}'"))
        };

        let milestone = match self.milestone.as_deref().map(str::trim) {
            None | Some("") | Some("0") | Some("false") => false,
            Some("1") | Some("true") => true,
            Some(other) => return Err(context("Milestone flag", other)),
        };

        let start = self
            .start
            .as_deref()
            .map(|s| parse_timestamp(s).ok_or_else(|| context("Start", s)))
            .transpose()?;
        let finish = self
            .finish
            .as_deref()
            .map(|s| parse_timestamp(s).ok_or_else(|| context("Finish", s)))
            .transpose()?;

        let duration_days = match self.duration.as_deref() {
            Some(raw) => {
                let parsed = duration::parse(raw).ok_or_else(|| context("Duration", raw))?;
                Some(parsed.total_minutes(minutes_per_day) / minutes_per_day)
            }
            None => None,
        };

        Ok(Task {
            name: self.name.filter(|n| !n.is_empty()),
            milestone,
            start,
            finish,
            duration_days,
        })
    }
}

fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    let (date, time) = timestamp::split(text)?;
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
    let time = match time {
        Some(t) => NaiveTime::parse_from_str(t, "%H:%M:%S%.f")
            .or_else(|_| NaiveTime::parse_from_str(t, "%H:%M"))
            .ok()?,
        None => NaiveTime::MIN,
    };
    Some(date.and_time(time))
}

fn parse_cost(text: &str) -> Result<f64, ParseError> {
    let cents = text
        .trim()
        .parse::<f64>()
        .map_err(|_| ParseError::new(format!("invalid project Cost '{text}'")))?;
    Ok(cents / 100.0)
}

fn is_path(path: &[String], expected: &[&str]) -> bool {
    path.len() == expected.len() && path.iter().zip(expected).all(|(a, b)| a == b)
}

impl ProjectParser for MspdiParser {
    fn name(&self) -> &str {
        "mspdi"
    }

    fn parse(&self, bytes: &[u8]) -> Result<Project, ParseError> {
        let mut reader = Reader::from_reader(bytes);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut path: Vec<String> = Vec::new();
        let mut text = String::new();
        let mut saw_root = false;
        let mut minutes_per_day = DEFAULT_MINUTES_PER_DAY;
        let mut drafts: Vec<TaskDraft> = Vec::new();
        let mut current: Option<TaskDraft> = None;

        loop {
            let event = reader.read_event_into(&mut buf).map_err(|e| {
                ParseError::new(format!(
                    "malformed XML at byte {}: {e}",
                    reader.buffer_position()
                ))
            })?;

            match event {
                Event::Start(e) | Event::Empty(e) if path.is_empty() && saw_root => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    return Err(ParseError::new(format!(
                        "unexpected element <{name}> after the {ROOT} root"
                    )));
                }
                Event::Start(e) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    if path.is_empty() {
                        if name != ROOT {
                            return Err(ParseError::new(format!(
                                "expected a <{ROOT}> root element, found <{name}>"
                            )));
                        }
                        saw_root = true;
                    }
                    path.push(name);
                    text.clear();
                    if is_path(&path, &[ROOT, "Tasks", "Task"]) {
                        current = Some(TaskDraft::default());
                    }
                }
                Event::Empty(e) => {
                    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                    if path.is_empty() {
                        if name != ROOT {
                            return Err(ParseError::new(format!(
                                "expected a <{ROOT}> root element, found <{name}>"
                            )));
                        }
                        saw_root = true;
                    } else if is_path(&path, &[ROOT, "Tasks"]) && name == "Task" {
                        drafts.push(TaskDraft::default());
                    }
                }
                Event::Text(t) => {
                    let value = t
                        .unescape()
                        .map_err(|e| ParseError::new(format!("bad text content: {e}")))?;
                    text.push_str(&value);
                }
                Event::CData(c) => {
                    text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
                Event::End(_) => {
                    if path.len() == 4 && is_path(&path[..3], &[ROOT, "Tasks", "Task"]) {
                        if let Some(draft) = current.as_mut() {
                            draft.set(&path[3], std::mem::take(&mut text));
                        }
                    } else if is_path(&path, &[ROOT, "Tasks", "Task"]) {
                        if let Some(draft) = current.take() {
                            drafts.push(draft);
                        }
                    } else if is_path(&path, &[ROOT, "MinutesPerDay"]) {
                        minutes_per_day = text
                            .trim()
                            .parse::<f64>()
                            .ok()
                            .filter(|m| *m > 0.0)
                            .ok_or_else(|| {
                                ParseError::new(format!("invalid MinutesPerDay '{text}'"))
                            })?;
                    }
                    path.pop();
                    text.clear();
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !saw_root {
            return Err(ParseError::new(format!("no <{ROOT}> element found")));
        }
        if !path.is_empty() {
            return Err(ParseError::new(format!(
                "document ends inside <{}>",
                path.join("/")
            )));
        }

        let total_cost = drafts
            .iter()
            .find(|d| d.is_summary())
            .and_then(|d| d.cost.as_deref())
            .map(parse_cost)
            .transpose()?;

        let tasks = drafts
            .into_iter()
            .enumerate()
            .map(|(index, draft)| draft.into_task(index, minutes_per_day))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            "Parsed MSPDI schedule: {} tasks, {} minutes per day",
            tasks.len(),
            minutes_per_day
        );

        Ok(Project::new(tasks, total_cost))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Project xmlns="http://schemas.microsoft.com/project">
    <Name>Variante SS12.xml</Name>
    <MinutesPerDay>480</MinutesPerDay>
    <Tasks>
        <Task>
            <UID>0</UID>
            <Name>Variante SS12 &amp; Svincoli</Name>
            <Milestone>0</Milestone>
            <Start>2024-01-08T08:00:00</Start>
            <Finish>2024-06-28T17:00:00</Finish>
            <Duration>PT1000H0M0S</Duration>
            <Cost>123456750</Cost>
        </Task>
        <Task>
            <UID>1</UID>
            <Name>TUP - Apertura al Traffico</Name>
            <Milestone>1</Milestone>
            <Start>2024-03-01T08:00:00</Start>
            <Finish>2024-03-01T08:00:00</Finish>
            <Duration>PT0H0M0S</Duration>
            <Baseline>
                <Start>2023-12-01T08:00:00</Start>
            </Baseline>
        </Task>
        <Task>
            <UID>2</UID>
            <Name>Scavi</Name>
            <Duration>PT16H0M0S</Duration>
        </Task>
    </Tasks>
</Project>"#;

    #[test]
    fn test_parses_tasks_in_document_order() {
        let project = MspdiParser::new().parse(SAMPLE.as_bytes()).unwrap();

        assert_eq!(project.tasks.len(), 3);
        assert_eq!(
            project.tasks[0].name.as_deref(),
            Some("Variante SS12 & Svincoli")
        );
        assert_eq!(
            project.tasks[1].name.as_deref(),
            Some("TUP - Apertura al Traffico")
        );
        assert!(project.tasks[1].milestone);
        assert!(!project.tasks[2].milestone);
    }

    #[test]
    fn test_reads_summary_cost_in_currency_units() {
        let project = MspdiParser::new().parse(SAMPLE.as_bytes()).unwrap();
        assert_eq!(project.total_cost, Some(1_234_567.5));
    }

    #[test]
    fn test_converts_dates_and_durations() {
        let project = MspdiParser::new().parse(SAMPLE.as_bytes()).unwrap();
        let tup = &project.tasks[1];

        let expected = NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        assert_eq!(tup.start, Some(expected));
        assert_eq!(tup.finish, Some(expected));
        assert_eq!(tup.duration_days, Some(0.0));
        assert_eq!(project.tasks[2].duration_days, Some(2.0));
        assert_eq!(project.tasks[2].start, None);
    }

    #[test]
    fn test_minutes_per_day_from_file() {
        let xml = r#"<Project><MinutesPerDay>420</MinutesPerDay><Tasks>
            <Task><UID>1</UID><Name>A</Name><Duration>PT14H0M0S</Duration></Task>
        </Tasks></Project>"#;
        let project = MspdiParser::new().parse(xml.as_bytes()).unwrap();
        assert_eq!(project.tasks[0].duration_days, Some(2.0));
    }

    #[test]
    fn test_missing_summary_task_means_no_cost() {
        let xml = r#"<Project><Tasks><Task><UID>3</UID><Cost>100</Cost></Task></Tasks></Project>"#;
        let project = MspdiParser::new().parse(xml.as_bytes()).unwrap();
        assert_eq!(project.total_cost, None);
        assert_eq!(project.tasks[0].name, None);
    }

    #[test]
    fn test_rejects_non_positive_minutes_per_day() {
        for value in ["0", "-60", "lots"] {
            let xml = format!(
                "<Project><MinutesPerDay>{value}</MinutesPerDay><Tasks>\
                 <Task><Name>A</Name><Duration>PT8H0M0S</Duration></Task></Tasks></Project>"
            );
            let err = MspdiParser::new().parse(xml.as_bytes()).unwrap_err();
            assert!(err.message().contains("MinutesPerDay"), "{value}: {err}");
        }
    }

    #[test]
    fn test_empty_project() {
        let project = MspdiParser::new().parse(b"<Project/>").unwrap();
        assert!(project.tasks.is_empty());
        assert_eq!(project.total_cost, None);

        let project = MspdiParser::new()
            .parse(b"<Project><Tasks/></Project>")
            .unwrap();
        assert!(project.tasks.is_empty());
    }

    #[test]
    fn test_rejects_wrong_root() {
        let err = MspdiParser::new().parse(b"<Workbook/>").unwrap_err();
        assert!(err.message().contains("<Project>"));
    }

    #[test]
    fn test_rejects_non_xml_input() {
        assert!(MspdiParser::new().parse(b"").is_err());
        assert!(
            MspdiParser::new()
                .parse(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1])
                .is_err()
        );
    }

    #[test]
    fn test_rejects_truncated_document() {
        let truncated = &SAMPLE[..SAMPLE.len() / 2];
        assert!(MspdiParser::new().parse(truncated.as_bytes()).is_err());
    }

    #[test]
    fn test_rejects_bad_field_values() {
        let xml = r#"<Project><Tasks><Task><Start>yesterday</Start></Task></Tasks></Project>"#;
        let err = MspdiParser::new().parse(xml.as_bytes()).unwrap_err();
        assert!(err.message().contains("Start"));

        let xml = r#"<Project><Tasks><Task><Milestone>maybe</Milestone></Task></Tasks></Project>"#;
        assert!(MspdiParser::new().parse(xml.as_bytes()).is_err());

        let xml = r#"<Project><Tasks><Task><Duration>8 hours</Duration></Task></Tasks></Project>"#;
        assert!(MspdiParser::new().parse(xml.as_bytes()).is_err());
    }
}
