use super::Sections;
use crate::models::WelfareAlert;

const SHARE_PROMPT: &str = "Share this alert to help protect animals in our community";

/// Render an animal-welfare alert.
pub fn format_welfare_alert(alert: &WelfareAlert) -> String {
    let mut s = Sections::new();

    let marker = alert.severity.emoji();
    s.line(format!(
        "{marker} {} {marker}",
        alert.title.trim().to_uppercase()
    ));
    s.line(format!("Severity: {}", alert.severity.label()));
    s.line(format!("Status: {}", alert.status.label()));
    s.date_field("Incident Date", &alert.incident_date);
    s.field("Location", &alert.location);

    s.text_section("📋 INCIDENT SUMMARY", &alert.description);

    if !alert.individuals.is_empty() {
        s.header("👤 FLAGGED INDIVIDUALS");
        for (index, individual) in alert.individuals.iter().enumerate() {
            s.item("Individual", index);
            s.required("Name", &individual.name);
            s.field("Role", &individual.role);
            s.joined("Also Known As", &individual.aliases);
            s.field("Phone", &individual.phone);
            s.field("Email", &individual.email);
            s.field("Address", &individual.address);
            s.joined("Social Media", &individual.social_media);
        }
    }

    if !alert.organizations.is_empty() {
        s.header("🏢 FLAGGED ORGANIZATIONS");
        for (index, org) in alert.organizations.iter().enumerate() {
            s.item("Organization", index);
            s.required("Name", &org.name);
            s.field("Registration", &org.registration);
            s.field("Website", &org.website);
            s.field("Phone", &org.phone);
            s.field("Email", &org.email);
            s.field("Address", &org.address);
            s.joined("Social Media", &org.social_media);
        }
    }

    if !alert.violations.is_empty() {
        s.header("📑 DOCUMENTED VIOLATIONS");
        for (index, violation) in alert.violations.iter().enumerate() {
            s.item("Violation", index);
            s.required("Description", &violation.description);
            s.date_field("Date", &violation.date);
            s.field("Location", &violation.location);
            s.field("Animals Affected", &violation.animals_affected);
            s.nested_bullets("Evidence", &violation.evidence);
        }
    }

    s.text_section("💔 ANIMAL WELFARE IMPACT", &alert.animal_welfare_impact);
    s.text_section("📢 RECOMMENDED ACTIONS", &alert.recommended_actions);
    s.hashtags(&alert.hashtags);

    s.line(format!("\n{SHARE_PROMPT}"));
    s.finish()
}
