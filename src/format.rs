//! Output formatting for markdown and JSON.

use crate::types::{LoadOutcome, LoadSource, SyncReport, TaskRecord};
use chrono::{DateTime, Utc};

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Json,
    Markdown,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "markdown" | "md" => Some(OutputFormat::Markdown),
            _ => None,
        }
    }
}

fn format_timestamp(ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| ms.to_string())
}

/// Format a single task as markdown.
pub fn format_task_markdown(task: &TaskRecord) -> String {
    let mut md = String::new();

    md.push_str(&format!("## Task: {}\n", task.title));
    md.push_str(&format!("- **id**: `{}`\n", task.id));
    md.push_str(&format!(
        "- **status**: {}\n",
        if task.completed { "done" } else { "open" }
    ));
    md.push_str(&format!("- **owner**: {}\n", task.owner_id));
    md.push_str(&format!("- **created**: {}\n", format_timestamp(task.created_at)));

    if !task.description.is_empty() {
        md.push_str("\n### Description\n");
        md.push_str(&task.description);
        md.push('\n');
    }

    md
}

/// One checklist line per task.
pub fn format_tasks_markdown(tasks: &[TaskRecord]) -> String {
    let mut md = format!("# Tasks ({})\n\n", tasks.len());

    if tasks.is_empty() {
        md.push_str("_No tasks._\n");
        return md;
    }

    for task in tasks {
        let mark = if task.completed { 'x' } else { ' ' };
        md.push_str(&format!("- [{}] `{}` {}", mark, task.id, task.title));
        if !task.description.is_empty() {
            md.push_str(&format!(": {}", task.description));
        }
        md.push('\n');
    }

    md
}

pub fn format_load_markdown(outcome: &LoadOutcome, tasks: &[TaskRecord]) -> String {
    let mut md = format_tasks_markdown(tasks);
    if outcome.source == LoadSource::RemoteImport {
        md.push_str(&format!(
            "\n_Imported {} task(s) from remote (remote total: {})._\n",
            outcome.tasks.len(),
            outcome.remote_total.unwrap_or_default()
        ));
    }
    md
}

pub fn format_sync_markdown(report: &SyncReport) -> String {
    format!(
        "# Sync\n\n- **added**: {}\n- **already present**: {}\n- **remote total**: {}\n- **local total**: {}\n",
        report.added,
        report.skipped,
        report.remote_total,
        report.tasks.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: i64, title: &str, completed: bool) -> TaskRecord {
        TaskRecord {
            id,
            title: title.to_string(),
            description: String::new(),
            completed,
            owner_id: 1,
            created_at: 0,
        }
    }

    #[test]
    fn test_output_format_parsing() {
        assert_eq!(OutputFormat::from_str("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("md"), Some(OutputFormat::Markdown));
        assert_eq!(OutputFormat::from_str("xml"), None);
    }

    #[test]
    fn test_tasks_markdown_checklist() {
        let md = format_tasks_markdown(&[task(2, "Clean house", true), task(1, "Buy milk", false)]);
        assert!(md.starts_with("# Tasks (2)"));
        assert!(md.contains("- [x] `2` Clean house\n"));
        assert!(md.contains("- [ ] `1` Buy milk\n"));
    }

    #[test]
    fn test_empty_list() {
        assert!(format_tasks_markdown(&[]).contains("_No tasks._"));
    }

    #[test]
    fn test_single_task_markdown() {
        let mut t = task(7, "X", false);
        t.description = "details".to_string();
        let md = format_task_markdown(&t);
        assert!(md.contains("- **id**: `7`"));
        assert!(md.contains("- **status**: open"));
        assert!(md.contains("- **created**: 1970-01-01 00:00"));
        assert!(md.contains("### Description\ndetails"));
    }
}
