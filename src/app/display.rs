use chrono::{DateTime, FixedOffset, Utc};

use crate::timeline::{Program, ProgramKind};

pub(crate) fn format_timestamp(ms: i64, offset: FixedOffset) -> String {
    DateTime::<Utc>::from_timestamp_millis(ms)
        .map(|dt| {
            dt.with_timezone(&offset)
                .format("%Y-%m-%d %H:%M:%S")
                .to_string()
        })
        .unwrap_or_else(|| ms.to_string())
}

pub(crate) fn format_last_updated(raw: &str, offset: FixedOffset) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&offset).format("%Y-%m-%d %H:%M %:z").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

pub(crate) fn format_duration(ms: i64) -> String {
    let sign = if ms < 0 { "-" } else { "" };
    let total = ms.unsigned_abs() / 1000;
    let (hours, minutes, seconds) = (total / 3600, total / 60 % 60, total % 60);
    if hours >= 24 {
        format!("{sign}{}d {:02}:{minutes:02}:{seconds:02}", hours / 24, hours % 24)
    } else {
        format!("{sign}{hours}:{minutes:02}:{seconds:02}")
    }
}

pub(crate) fn program_label(program: &Program) -> String {
    match &program.kind {
        ProgramKind::Content(meta) => match meta.show_title.as_deref() {
            Some(show) if !meta.title.starts_with(show) => format!("{show} - {}", meta.title),
            _ => meta.title.clone(),
        },
        ProgramKind::Offline => "(offline)".to_string(),
        ProgramKind::Redirect { channel } => format!("(redirect to channel {channel})"),
    }
}

pub(crate) fn truncate(s: &str, max: usize) -> String {
    let mut out = s.to_string();
    if out.chars().count() > max {
        out = out.chars().take(max.saturating_sub(3)).collect::<String>() + "...";
    }
    out
}
