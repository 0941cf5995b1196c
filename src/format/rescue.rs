use super::{spaced, Sections};
use crate::models::RescuePost;

const SHARE_PROMPT: &str = "Please share to help these animals find loving homes! 🐕🐈";

/// Render a rescue post.
pub fn format_rescue_post(post: &RescuePost) -> String {
    let mut s = Sections::new();

    let type_emoji = post.post_type.emoji();
    let urgency_emoji = post.urgency.emoji();
    let title = post.title.trim().to_uppercase();
    s.line(spaced(&[type_emoji, urgency_emoji, &title, urgency_emoji, type_emoji]));
    s.line(format!("Type: {}", post.post_type.label()));
    s.line(format!("Priority: {}", post.urgency.label()));
    s.field("Location", &post.location);
    s.date_field("Deadline", &post.deadline);

    s.text_section("📋 DESCRIPTION", &post.description);

    if !post.animals.is_empty() {
        s.header("🐾 ANIMALS");
        for (index, animal) in post.animals.iter().enumerate() {
            s.item("Animal", index);
            s.required("Name", &animal.name);
            s.field("Species", &animal.species);
            s.field("Breed", &animal.breed);
            s.field("Age", &animal.age);
            s.field("Color", &animal.color);
            if let Some(gender) = animal.gender {
                s.line(format!("Gender: {}", gender.label()));
            }
            s.field("Microchip ID", &animal.microchip_id);
            s.field("Medical Conditions", &animal.medical_conditions);
            s.field("Special Needs", &animal.special_needs);
            s.joined("Photos", &animal.photos);
        }
    }

    if !post.contact_persons.is_empty() {
        s.header("📞 CONTACT INFORMATION");
        for (index, person) in post.contact_persons.iter().enumerate() {
            s.item("Contact", index);
            s.required("Name", &person.name);
            s.field("Role", &person.role);
            s.field("Phone", &person.phone);
            s.field("Email", &person.email);
            s.field("Address", &person.address);
            s.joined("Social Media", &person.social_media);
        }
    }

    if !post.organizations.is_empty() {
        s.header("🏢 RESCUE ORGANIZATIONS");
        for (index, org) in post.organizations.iter().enumerate() {
            s.item("Organization", index);
            s.required("Name", &org.name);
            s.field("Registration", &org.registration);
            s.field("Website", &org.website);
            s.field("Phone", &org.phone);
            s.field("Email", &org.email);
            s.field("Address", &org.address);
            s.field("Capacity", &org.capacity);
            s.joined("Specializations", &org.specializations);
            s.joined("Social Media", &org.social_media);
        }
    }

    s.text_section("✅ REQUIREMENTS", &post.requirements);
    s.text_section("💡 ADDITIONAL INFORMATION", &post.additional_info);
    s.hashtags(&post.hashtags);

    s.line(format!("\n{SHARE_PROMPT}"));
    s.finish()
}
