//! Remaining-time text
//!
//! The site shows things like `ENDS IN: 6 Hours, 30 Minutes` or a bare
//! `15:30`. These are folded into a short form (`6h 30m`, `45m`, `2d`)
//! that [`remaining_minutes`] can read back. The result is still display
//! text; no clock time is derived from it.
use super::or_nothing;
use crate::element::LotElement;
use regex::{Captures, Regex};
use std::sync::LazyLock;

pub const TIME_UNKNOWN: &str = "Time Unknown";

pub const TIME_SELECTOR: &str = ".time, .end-time, .countdown, .timer";

const HOURS: &str = r"(?:hours?|hrs?)\b";
const MINUTES: &str = r"(?:minutes?|mins?)\b";
const DAYS: &str = r"days?\b";

type Format = fn(&Captures) -> Option<String>;

fn num(c: &Captures, i: usize) -> Option<u32> {
    c.get(i)?.as_str().parse().ok()
}

fn days_hours(c: &Captures) -> Option<String> {
    Some(format!("{}d {}h", num(c, 1)?, num(c, 2)?))
}

fn hours_minutes(c: &Captures) -> Option<String> {
    Some(format!("{}h {}m", num(c, 1)?, num(c, 2)?))
}

fn clock(c: &Captures) -> Option<String> {
    match (num(c, 1)?, num(c, 2)?) {
        (0, m) => Some(format!("{m}m")),
        (h, m) => Some(format!("{h}h {m}m")),
    }
}

fn hours(c: &Captures) -> Option<String> {
    Some(format!("{}h", num(c, 1)?))
}

fn minutes(c: &Captures) -> Option<String> {
    Some(format!("{}m", num(c, 1)?))
}

fn days(c: &Captures) -> Option<String> {
    Some(format!("{}d", num(c, 1)?))
}

/// Tried in order: combined forms, then `HH:MM`, then single units.
static PATTERNS: LazyLock<Vec<(Regex, Format)>> = LazyLock::new(|| {
    let patterns: [(String, Format); 7] = [
        (format!(r"(\d+)\s*{DAYS}[^\n\d]*?(\d+)\s*{HOURS}"), days_hours),
        (
            format!(r"ends\s+in[^\n]*?(\d+)\s*{HOURS}[^\n]*?(\d+)\s*{MINUTES}"),
            hours_minutes,
        ),
        (format!(r"(\d+)\s*{HOURS}[^\n]*?(\d+)\s*{MINUTES}"), hours_minutes),
        (r"\b(\d{1,2}):(\d{2})\b".to_owned(), clock),
        (format!(r"(\d+)\s*{HOURS}"), hours),
        (format!(r"(\d+)\s*{MINUTES}"), minutes),
        (format!(r"(\d+)\s*{DAYS}"), days),
    ];
    patterns
        .into_iter()
        .map(|(p, f)| {
            (
                Regex::new(&format!("(?i){p}")).expect("valid end time pattern"),
                f,
            )
        })
        .collect()
});

static SHORT_FORM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d+)([dhm])").expect("valid short form pattern"));

pub fn end_time(element: &dyn LotElement, text: &str) -> String {
    or_nothing(TIME_SELECTOR, element.select_text(TIME_SELECTOR))
        .iter()
        .find_map(|t| normalize(t))
        .or_else(|| normalize(text))
        .unwrap_or_else(|| TIME_UNKNOWN.to_owned())
}

pub fn normalize(text: &str) -> Option<String> {
    PATTERNS
        .iter()
        .find_map(|(re, format)| re.captures(text).and_then(|c| format(&c)))
}

/// Minutes left according to a normalized end time
pub fn remaining_minutes(end_time: &str) -> Option<u32> {
    let mut total: Option<u32> = None;
    for c in SHORT_FORM.captures_iter(end_time) {
        let n: u32 = c[1].parse().ok()?;
        let unit = match &c[2] {
            "d" => 24 * 60,
            "h" => 60,
            _ => 1,
        };
        total = Some(total.unwrap_or(0).saturating_add(n.saturating_mul(unit)));
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_forms() {
        assert_eq!(normalize("ENDS IN: 6 Hours, 30 Minutes").as_deref(), Some("6h 30m"));
        assert_eq!(normalize("1 hour 5 mins left").as_deref(), Some("1h 5m"));
        assert_eq!(normalize("2 Days, 4 Hours").as_deref(), Some("2d 4h"));
    }

    #[test]
    fn clock_and_single_units() {
        assert_eq!(normalize("closes 02:15").as_deref(), Some("2h 15m"));
        assert_eq!(normalize("00:45 remaining").as_deref(), Some("45m"));
        assert_eq!(normalize("6 Hours").as_deref(), Some("6h"));
        assert_eq!(normalize("30 Minutes").as_deref(), Some("30m"));
        assert_eq!(normalize("3 days").as_deref(), Some("3d"));
        assert_eq!(normalize("Friday evening"), None);
    }

    #[test]
    fn reads_short_form_back() {
        assert_eq!(remaining_minutes("6h 30m"), Some(390));
        assert_eq!(remaining_minutes("2d 4h"), Some(3120));
        assert_eq!(remaining_minutes("45m"), Some(45));
        assert_eq!(remaining_minutes(TIME_UNKNOWN), None);
    }
}
