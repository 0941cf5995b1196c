//! Plain-text rendering of post records for sharing.
//!
//! Rendering is pure: the same record always yields the same bytes. A section
//! appears only when its content is non-blank, and repeated items keep their
//! array order, numbered from 1.

mod fraud;
mod rescue;
mod welfare;

pub use fraud::format_blacklist_case;
pub use rescue::format_rescue_post;
pub use welfare::format_welfare_alert;

use chrono::{DateTime, NaiveDate};

use crate::models::{present, present_entries, PostRecord};

/// Render any post variant.
pub fn format_post(post: &PostRecord) -> String {
    match post {
        PostRecord::Rescue(p) => format_rescue_post(p),
        PostRecord::FraudCase(c) => format_blacklist_case(c),
        PostRecord::WelfareAlert(a) => format_welfare_alert(a),
    }
}

/// Long-form date such as "January 5, 2025".
///
/// Empty input renders as an empty string; text that is not a recognizable
/// date is passed through unchanged.
pub fn format_date_for_display(value: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        return String::new();
    }
    parse_date(value)
        .map(|d| d.format("%B %-d, %Y").to_string())
        .unwrap_or_else(|| value.to_string())
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

/// Ordered output lines joined with `\n` on completion.
#[derive(Debug, Default)]
struct Sections {
    lines: Vec<String>,
}

impl Sections {
    fn new() -> Self {
        Self::default()
    }

    fn line(&mut self, text: impl Into<String>) {
        self.lines.push(text.into());
    }

    /// Section header preceded by a blank line.
    fn header(&mut self, title: &str) {
        self.lines.push(format!("\n{title}"));
    }

    /// Numbered item heading inside a repeated section.
    fn item(&mut self, noun: &str, index: usize) {
        self.lines.push(format!("\n▼ {noun} #{}", index + 1));
    }

    /// `Label: value` when the value is non-blank.
    fn field(&mut self, label: &str, value: &Option<String>) {
        if let Some(v) = present(value) {
            self.lines.push(format!("{label}: {v}"));
        }
    }

    /// `Label: value` for a required scalar, skipped only when blank.
    fn required(&mut self, label: &str, value: &str) {
        let value = value.trim();
        if !value.is_empty() {
            self.lines.push(format!("{label}: {value}"));
        }
    }

    fn date_field(&mut self, label: &str, value: &Option<String>) {
        if let Some(v) = present(value) {
            self.lines
                .push(format!("{label}: {}", format_date_for_display(v)));
        }
    }

    /// Non-blank entries joined with ", ".
    fn joined(&mut self, label: &str, values: &[String]) {
        let entries = present_entries(values);
        if !entries.is_empty() {
            self.lines.push(format!("{label}: {}", entries.join(", ")));
        }
    }

    /// A headed block of free text.
    fn text_section(&mut self, title: &str, value: &Option<String>) {
        if let Some(v) = present(value) {
            self.header(title);
            self.lines.push(v.to_string());
        }
    }

    /// Non-blank entries as a bulleted list under `title`.
    fn bullets(&mut self, title: &str, values: &[String]) {
        let entries = present_entries(values);
        if entries.is_empty() {
            return;
        }
        self.header(title);
        for entry in entries {
            self.lines.push(format!("• {entry}"));
        }
    }

    /// Indented bulleted list for a field inside an item.
    fn nested_bullets(&mut self, label: &str, values: &[String]) {
        let entries = present_entries(values);
        if entries.is_empty() {
            return;
        }
        self.lines.push(format!("{label}:"));
        for entry in entries {
            self.lines.push(format!("  • {entry}"));
        }
    }

    fn hashtags(&mut self, tags: &[String]) {
        let tags: Vec<String> = present_entries(tags)
            .into_iter()
            .map(|t| t.trim_start_matches('#'))
            .filter(|t| !t.is_empty())
            .map(|t| format!("#{t}"))
            .collect();
        if !tags.is_empty() {
            self.lines.push(format!("\n{}", tags.join(" ")));
        }
    }

    fn finish(self) -> String {
        self.lines.join("\n")
    }
}

/// Join non-empty parts with single spaces.
fn spaced(parts: &[&str]) -> String {
    parts
        .iter()
        .copied()
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date_for_display() {
        assert_eq!(format_date_for_display("2025-01-05"), "January 5, 2025");
        assert_eq!(format_date_for_display("2024-12-28T15:00:00Z"), "December 28, 2024");
        assert_eq!(format_date_for_display(""), "");
        assert_eq!(format_date_for_display("   "), "");
        assert_eq!(format_date_for_display("last spring"), "last spring");
    }

    #[test]
    fn test_sections_skip_blank_values() {
        let mut s = Sections::new();
        s.field("Phone", &Some("  ".to_string()));
        s.field("Email", &None);
        s.joined("Social Media", &["".to_string(), " ".to_string()]);
        s.bullets("🎭 KNOWN ALIASES", &[]);
        s.text_section("📋 DESCRIPTION", &Some(String::new()));
        assert_eq!(s.finish(), "");
    }

    #[test]
    fn test_hashtags_strip_leading_hash() {
        let mut s = Sections::new();
        s.hashtags(&["#rescue".to_string(), "adoptdontshop".to_string(), " ".to_string()]);
        assert_eq!(s.finish(), "\n#rescue #adoptdontshop");
    }

    #[test]
    fn test_spaced_collapses_empty_parts() {
        assert_eq!(spaced(&["🏠", "", "TITLE", "", "🏠"]), "🏠 TITLE 🏠");
    }
}
