//! Post records rendered by the formatter and saved in templates.
//!
//! A post is one of three explicit variants, tagged by `kind` on the wire.

use serde::{Deserialize, Serialize};

use super::labels::{CaseStatus, Gender, IncidentStatus, PostType, Severity, Urgency};

/// Generate a fresh sub-record identifier.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// The top-level form document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum PostRecord {
    Rescue(RescuePost),
    FraudCase(BlacklistCase),
    WelfareAlert(WelfareAlert),
}

impl PostRecord {
    pub fn kind(&self) -> &'static str {
        match self {
            PostRecord::Rescue(_) => "rescue",
            PostRecord::FraudCase(_) => "fraudCase",
            PostRecord::WelfareAlert(_) => "welfareAlert",
        }
    }

    pub fn hashtags_mut(&mut self) -> &mut Vec<String> {
        match self {
            PostRecord::Rescue(p) => &mut p.hashtags,
            PostRecord::FraudCase(c) => &mut c.hashtags,
            PostRecord::WelfareAlert(a) => &mut a.hashtags,
        }
    }
}

/// An animal rescue announcement.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RescuePost {
    pub title: String,
    #[serde(default)]
    pub urgency: Urgency,
    #[serde(default)]
    pub post_type: PostType,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub animals: Vec<Animal>,
    #[serde(default)]
    pub contact_persons: Vec<ContactPerson>,
    #[serde(default)]
    pub organizations: Vec<RescueOrganization>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub deadline: Option<String>,
    #[serde(default)]
    pub requirements: Option<String>,
    #[serde(default)]
    pub additional_info: Option<String>,
    #[serde(default)]
    pub hashtags: Vec<String>,
}

/// A fraud-oriented blacklist case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlacklistCase {
    pub case_title: String,
    #[serde(default)]
    pub incident_date: Option<String>,
    #[serde(default)]
    pub case_status: CaseStatus,
    #[serde(default)]
    pub brief_description: Option<String>,
    #[serde(default)]
    pub individuals: Vec<Individual>,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub organizations: Vec<Organization>,
    #[serde(default)]
    pub summary_statement: Option<String>,
    #[serde(default)]
    pub hashtags: Vec<String>,
}

/// An animal-welfare blacklist alert.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WelfareAlert {
    pub title: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub status: IncidentStatus,
    #[serde(default)]
    pub incident_date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub individuals: Vec<FlaggedIndividual>,
    #[serde(default)]
    pub organizations: Vec<Organization>,
    #[serde(default)]
    pub violations: Vec<Violation>,
    #[serde(default)]
    pub animal_welfare_impact: Option<String>,
    #[serde(default)]
    pub recommended_actions: Option<String>,
    #[serde(default)]
    pub hashtags: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Animal {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub species: Option<String>,
    #[serde(default)]
    pub breed: Option<String>,
    #[serde(default)]
    pub age: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub microchip_id: Option<String>,
    #[serde(default)]
    pub medical_conditions: Option<String>,
    #[serde(default)]
    pub special_needs: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactPerson {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub social_media: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RescueOrganization {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub registration: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub social_media: Vec<String>,
    #[serde(default)]
    pub capacity: Option<String>,
    #[serde(default)]
    pub specializations: Vec<String>,
}

/// A person named in a fraud case.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Individual {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub social_media: Vec<String>,
}

/// A person named in a welfare alert.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlaggedIndividual {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub social_media: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Organization {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub registration: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub social_media: Vec<String>,
}

/// A documented welfare violation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub id: String,
    pub description: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub animals_affected: Option<String>,
    #[serde(default)]
    pub evidence: Vec<String>,
}

/// Return the trimmed value if it holds any non-whitespace text.
pub fn present(value: &Option<String>) -> Option<&str> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Drop blank entries, trimming the rest.
pub fn present_entries(values: &[String]) -> Vec<&str> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .collect()
}
