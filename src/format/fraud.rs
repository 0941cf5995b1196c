use super::Sections;
use crate::models::BlacklistCase;

const SHARE_PROMPT: &str = "Share this information to protect others from fraud";

/// Render a fraud blacklist case.
pub fn format_blacklist_case(case: &BlacklistCase) -> String {
    let mut s = Sections::new();

    s.line(format!("🚨 {} 🚨", case.case_title.trim().to_uppercase()));
    s.date_field("Case Date", &case.incident_date);
    s.line(format!("Status: {}", case.case_status.label()));

    s.text_section("📋 CASE OVERVIEW", &case.brief_description);

    if !case.individuals.is_empty() {
        s.header("👤 BLACKLISTED INDIVIDUALS");
        for (index, individual) in case.individuals.iter().enumerate() {
            s.item("Individual", index);
            s.required("Name", &individual.name);
            s.date_field("DOB", &individual.dob);
            s.field("Phone", &individual.phone);
            s.field("Email", &individual.email);
            s.field("Address", &individual.address);
            s.joined("Social Media", &individual.social_media);
        }
    }

    s.bullets("🎭 KNOWN ALIASES", &case.aliases);

    if !case.organizations.is_empty() {
        s.header("🏢 ASSOCIATED ORGANIZATIONS");
        for (index, org) in case.organizations.iter().enumerate() {
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

    s.text_section("⚠️ WARNING SUMMARY", &case.summary_statement);
    s.hashtags(&case.hashtags);

    s.line(format!("\n{SHARE_PROMPT}"));
    s.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CaseStatus, Individual};

    #[test]
    fn test_full_case_layout() {
        let case = BlacklistCase {
            case_title: "Fake adoption fees".to_string(),
            incident_date: Some("2024-12-28".to_string()),
            case_status: CaseStatus::Confirmed,
            brief_description: Some("Collected fees for animals that never existed.".to_string()),
            individuals: vec![Individual {
                id: "i1".to_string(),
                name: "John Doe".to_string(),
                dob: Some("1980-03-14".to_string()),
                social_media: vec!["@jdoe".to_string(), "".to_string()],
                ..Default::default()
            }],
            aliases: vec!["Johnny D".to_string(), " ".to_string()],
            summary_statement: Some("Do not send money.".to_string()),
            hashtags: vec!["scamalert".to_string()],
            ..Default::default()
        };

        let expected = "🚨 FAKE ADOPTION FEES 🚨\n\
            Case Date: December 28, 2024\n\
            Status: Confirmed Fraud\n\
            \n📋 CASE OVERVIEW\n\
            Collected fees for animals that never existed.\n\
            \n👤 BLACKLISTED INDIVIDUALS\n\
            \n▼ Individual #1\n\
            Name: John Doe\n\
            DOB: March 14, 1980\n\
            Social Media: @jdoe\n\
            \n🎭 KNOWN ALIASES\n\
            • Johnny D\n\
            \n⚠️ WARNING SUMMARY\n\
            Do not send money.\n\
            \n#scamalert\n\
            \nShare this information to protect others from fraud";

        assert_eq!(format_blacklist_case(&case), expected);
    }

    #[test]
    fn test_blank_aliases_produce_no_section() {
        let case = BlacklistCase {
            case_title: "Case".to_string(),
            aliases: vec!["".to_string(), "   ".to_string()],
            ..Default::default()
        };
        let text = format_blacklist_case(&case);
        assert!(!text.contains("KNOWN ALIASES"));
        assert_eq!(
            text,
            "🚨 CASE 🚨\nStatus: Under Investigation\n\nShare this information to protect others from fraud"
        );
    }
}
