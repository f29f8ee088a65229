use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::models::{DeadlineClass, DeadlineField, DeadlineInfo, Notice};

/// Determine which date column governs a notice's response deadline and
/// classify its urgency relative to `today`.
///
/// `datelimitereponse` takes strict priority over `datefindiffusion`; the
/// first candidate that parses wins. A column that fails to parse is treated
/// as absent, never as an error. When no candidate parses the neutral record
/// is returned.
pub fn classify(notice: &Notice, today: NaiveDate) -> DeadlineInfo {
    let candidates = [
        (
            DeadlineField::DateLimiteReponse,
            notice.datelimitereponse.as_deref(),
        ),
        (
            DeadlineField::DateFinDiffusion,
            notice.datefindiffusion.as_deref(),
        ),
    ];

    let mut target = None;
    for (field, raw) in candidates {
        if let Some(date) = raw.and_then(parse_date) {
            target = Some((field, date));
            break;
        }
    }

    let Some((field, date)) = target else {
        return DeadlineInfo::neutral();
    };

    let days = (date - today).num_days();
    let class = if days < 0 {
        DeadlineClass::Overdue
    } else if days <= 7 {
        DeadlineClass::Urgent
    } else if days <= 30 {
        DeadlineClass::Warning
    } else {
        DeadlineClass::Ok
    };

    DeadlineInfo {
        deadline_date: Some(date),
        deadline_field: Some(field),
        days_remaining: Some(days),
        is_urgent: (0..=7).contains(&days),
        is_overdue: days < 0,
        deadline_text: deadline_text(days),
        deadline_class: class,
    }
}

/// Parse the free-text date formats seen in BOAMP exports: an ISO date, an
/// ISO date-time with `T` or space separator (fractional seconds allowed),
/// or an RFC 3339 timestamp with offset. Only the calendar date is kept.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt.date());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

fn deadline_text(days: i64) -> String {
    if days < 0 {
        return format!("-{}j", days.abs());
    }
    if days == 0 {
        return "Aujourd'hui".to_string();
    }
    if days > 30 {
        let months = days / 30;
        let rest = days % 30;
        if rest == 0 {
            return format!("{months} mois");
        }
        return format!("{months}m {rest}j");
    }
    format!("{days}j")
}
