//! Enumerations shared by posts and incidents, together with their display tables.
//!
//! Each enum owns exactly one label table. The formatter and the `/api/labels`
//! endpoint both read from here, so generated text and client previews agree.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Declares a string-backed enum with its wire value, display label and default.
macro_rules! label_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident (default $default:ident) {
            $($variant:ident => $value:literal, $label:literal;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $value)]
                $variant,
            )+
        }

        impl $name {
            /// Every variant in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $value,)+
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }

            /// Parse a wire value, ignoring ASCII case.
            pub fn parse(s: &str) -> Option<Self> {
                let lowered = s.trim().to_ascii_lowercase();
                match lowered.as_str() {
                    $($value => Some($name::$variant),)+
                    _ => None,
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$default
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

label_enum! {
    /// How urgently a rescue post needs attention.
    pub enum Urgency (default Medium) {
        Low => "low", "Low Priority";
        Medium => "medium", "Medium Priority";
        High => "high", "High Priority";
        Critical => "critical", "CRITICAL - URGENT";
    }
}

label_enum! {
    /// What a rescue post is asking for.
    pub enum PostType (default Adoption) {
        Adoption => "adoption", "Adoption";
        Foster => "foster", "Foster Needed";
        Lost => "lost", "Lost Animal";
        Found => "found", "Found Animal";
        Emergency => "emergency", "Emergency Rescue";
        Transport => "transport", "Transport Needed";
        Volunteer => "volunteer", "Volunteers Needed";
    }
}

label_enum! {
    pub enum Gender (default Unknown) {
        Male => "male", "Male";
        Female => "female", "Female";
        Unknown => "unknown", "Unknown";
    }
}

label_enum! {
    /// Status of a fraud blacklist case.
    pub enum CaseStatus (default Investigating) {
        Investigating => "investigating", "Under Investigation";
        Confirmed => "confirmed", "Confirmed Fraud";
        Resolved => "resolved", "Resolved";
    }
}

label_enum! {
    /// Severity used by welfare alerts, incidents and timeline entries.
    pub enum Severity (default Medium) {
        Low => "low", "LOW RISK ADVISORY";
        Medium => "medium", "CAUTION";
        High => "high", "HIGH ALERT";
        Critical => "critical", "CRITICAL WARNING";
    }
}

label_enum! {
    /// Status of a tracked incident or an animal-welfare alert.
    pub enum IncidentStatus (default Investigating) {
        Investigating => "investigating", "Under Investigation";
        Confirmed => "confirmed", "Confirmed";
        Blacklisted => "blacklisted", "Blacklisted";
        Resolved => "resolved", "Resolved";
        Ongoing => "ongoing", "Ongoing";
    }
}

label_enum! {
    pub enum EvidenceType (default Other) {
        Photo => "photo", "Photo";
        Document => "document", "Document";
        Video => "video", "Video";
        Audio => "audio", "Audio";
        Other => "other", "Other";
    }
}

label_enum! {
    /// Role a timeline entry plays in an incident's progression.
    pub enum TimelineEntryType (default Update) {
        Report => "report", "Report";
        Incident => "incident", "Incident";
        ActionTaken => "action_taken", "Action Taken";
        Update => "update", "Update";
        Resolution => "resolution", "Resolution";
    }
}

label_enum! {
    /// How one incident relates to another.
    pub enum Relationship (default Related) {
        SameIndividual => "same_individual", "Same Individual";
        SameOrganization => "same_organization", "Same Organization";
        SameLocation => "same_location", "Same Location";
        FollowUp => "follow_up", "Follow Up";
        Related => "related", "Related";
        Duplicate => "duplicate", "Duplicate";
    }
}

impl Urgency {
    /// Low urgency has no marker.
    pub fn emoji(&self) -> &'static str {
        match self {
            Urgency::Low => "",
            Urgency::Medium => "⚡",
            Urgency::High => "🔥",
            Urgency::Critical => "🆘",
        }
    }
}

impl PostType {
    pub fn emoji(&self) -> &'static str {
        match self {
            PostType::Adoption => "🏠",
            PostType::Foster => "💝",
            PostType::Lost => "🔍",
            PostType::Found => "📍",
            PostType::Emergency => "🚨",
            PostType::Transport => "🚗",
            PostType::Volunteer => "👥",
        }
    }
}

impl Severity {
    pub fn emoji(&self) -> &'static str {
        match self {
            Severity::Low => "ℹ️",
            Severity::Medium => "⚠️",
            Severity::High => "🔴",
            Severity::Critical => "🆘",
        }
    }
}

/// One row of a label table as served to clients.
#[derive(Debug, Clone, Serialize)]
pub struct LabelEntry {
    pub value: &'static str,
    pub label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji: Option<&'static str>,
}

fn table<T>(
    all: &[T],
    value: fn(&T) -> &'static str,
    label: fn(&T) -> &'static str,
    emoji: Option<fn(&T) -> &'static str>,
) -> Vec<LabelEntry> {
    all.iter()
        .map(|item| LabelEntry {
            value: value(item),
            label: label(item),
            emoji: emoji.map(|e| e(item)),
        })
        .collect()
}

/// All label tables keyed by enum name.
pub fn label_tables() -> BTreeMap<&'static str, Vec<LabelEntry>> {
    let mut tables = BTreeMap::new();
    tables.insert(
        "urgency",
        table(Urgency::ALL, Urgency::as_str, Urgency::label, Some(Urgency::emoji)),
    );
    tables.insert(
        "postType",
        table(PostType::ALL, PostType::as_str, PostType::label, Some(PostType::emoji)),
    );
    tables.insert(
        "gender",
        table(Gender::ALL, Gender::as_str, Gender::label, None),
    );
    tables.insert(
        "caseStatus",
        table(CaseStatus::ALL, CaseStatus::as_str, CaseStatus::label, None),
    );
    tables.insert(
        "severity",
        table(Severity::ALL, Severity::as_str, Severity::label, Some(Severity::emoji)),
    );
    tables.insert(
        "incidentStatus",
        table(IncidentStatus::ALL, IncidentStatus::as_str, IncidentStatus::label, None),
    );
    tables.insert(
        "evidenceType",
        table(EvidenceType::ALL, EvidenceType::as_str, EvidenceType::label, None),
    );
    tables.insert(
        "timelineEntryType",
        table(
            TimelineEntryType::ALL,
            TimelineEntryType::as_str,
            TimelineEntryType::label,
            None,
        ),
    );
    tables.insert(
        "relationship",
        table(Relationship::ALL, Relationship::as_str, Relationship::label, None),
    );
    tables
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(Severity::default(), Severity::Medium);
        assert_eq!(Urgency::default(), Urgency::Medium);
        assert_eq!(PostType::default(), PostType::Adoption);
        assert_eq!(CaseStatus::default(), CaseStatus::Investigating);
        assert_eq!(IncidentStatus::default(), IncidentStatus::Investigating);
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(Severity::parse("CRITICAL"), Some(Severity::Critical));
        assert_eq!(
            TimelineEntryType::parse(" action_taken "),
            Some(TimelineEntryType::ActionTaken)
        );
        assert_eq!(IncidentStatus::parse("archived"), None);
    }

    #[test]
    fn test_serde_uses_wire_values() {
        let json = serde_json::to_string(&Relationship::SameIndividual).unwrap();
        assert_eq!(json, "\"same_individual\"");
        let parsed: PostType = serde_json::from_str("\"transport\"").unwrap();
        assert_eq!(parsed, PostType::Transport);
    }

    #[test]
    fn test_label_tables_cover_every_variant() {
        let tables = label_tables();
        assert_eq!(tables["severity"].len(), Severity::ALL.len());
        assert_eq!(tables["incidentStatus"].len(), 5);
        let critical = tables["severity"]
            .iter()
            .find(|e| e.value == "critical")
            .unwrap();
        assert_eq!(critical.label, "CRITICAL WARNING");
        assert_eq!(critical.emoji, Some("🆘"));
        assert!(tables["gender"].iter().all(|e| e.emoji.is_none()));
    }
}
