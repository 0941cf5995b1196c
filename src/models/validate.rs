//! Field-level validation of post records.
//!
//! Violations are collected rather than short-circuited so the API can report
//! every offending field at once.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use super::post::{
    Animal, BlacklistCase, ContactPerson, FlaggedIndividual, Individual, Organization, PostRecord,
    RescueOrganization, RescuePost, Violation, WelfareAlert,
};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

/// A single violated field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Collects field errors under a path prefix.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_errors(self) -> Vec<FieldError> {
        self.errors
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn required(&mut self, field: &str, value: &str, message: &str) {
        if value.trim().is_empty() {
            self.push(field, message);
        }
    }

    /// Empty strings are allowed; anything else must look like an address.
    pub fn email(&mut self, field: &str, value: &Option<String>) {
        if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            if !EMAIL_RE.is_match(v) {
                self.push(field, "Invalid email");
            }
        }
    }

    /// Empty strings are allowed; anything else must be an absolute http(s) URL.
    pub fn url(&mut self, field: &str, value: &Option<String>) {
        if let Some(v) = value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
            match url::Url::parse(v) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
                _ => self.push(field, "Invalid url"),
            }
        }
    }

    fn unique_ids<'a>(&mut self, field: &str, ids: impl Iterator<Item = &'a str>) {
        let mut seen = HashSet::new();
        for (index, id) in ids.enumerate() {
            if id.trim().is_empty() {
                self.push(format!("{field}[{index}].id"), "Identifier is required");
            } else if !seen.insert(id) {
                self.push(format!("{field}[{index}].id"), "Duplicate identifier");
            }
        }
    }
}

/// Validate a post record, prefixing every field path with `prefix`.
pub fn validate_post(prefix: &str, post: &PostRecord) -> Vec<FieldError> {
    let mut v = Validator::new();
    match post {
        PostRecord::Rescue(p) => rescue(&mut v, prefix, p),
        PostRecord::FraudCase(c) => fraud_case(&mut v, prefix, c),
        PostRecord::WelfareAlert(a) => welfare_alert(&mut v, prefix, a),
    }
    v.into_errors()
}

fn path(prefix: &str, field: &str) -> String {
    if prefix.is_empty() {
        field.to_string()
    } else {
        format!("{prefix}.{field}")
    }
}

fn rescue(v: &mut Validator, prefix: &str, post: &RescuePost) {
    v.required(&path(prefix, "title"), &post.title, "Post title is required");

    let animals = path(prefix, "animals");
    v.unique_ids(&animals, post.animals.iter().map(|a| a.id.as_str()));
    for (i, animal) in post.animals.iter().enumerate() {
        animal_fields(v, &format!("{animals}[{i}]"), animal);
    }

    let contacts = path(prefix, "contactPersons");
    v.unique_ids(&contacts, post.contact_persons.iter().map(|c| c.id.as_str()));
    for (i, person) in post.contact_persons.iter().enumerate() {
        contact_fields(v, &format!("{contacts}[{i}]"), person);
    }

    let orgs = path(prefix, "organizations");
    v.unique_ids(&orgs, post.organizations.iter().map(|o| o.id.as_str()));
    for (i, org) in post.organizations.iter().enumerate() {
        rescue_org_fields(v, &format!("{orgs}[{i}]"), org);
    }
}

fn fraud_case(v: &mut Validator, prefix: &str, case: &BlacklistCase) {
    v.required(&path(prefix, "caseTitle"), &case.case_title, "Case title is required");

    let individuals = path(prefix, "individuals");
    v.unique_ids(&individuals, case.individuals.iter().map(|i| i.id.as_str()));
    for (i, individual) in case.individuals.iter().enumerate() {
        individual_fields(v, &format!("{individuals}[{i}]"), individual);
    }

    let orgs = path(prefix, "organizations");
    v.unique_ids(&orgs, case.organizations.iter().map(|o| o.id.as_str()));
    for (i, org) in case.organizations.iter().enumerate() {
        org_fields(v, &format!("{orgs}[{i}]"), org);
    }
}

fn welfare_alert(v: &mut Validator, prefix: &str, alert: &WelfareAlert) {
    v.required(&path(prefix, "title"), &alert.title, "Alert title is required");

    let individuals = path(prefix, "individuals");
    v.unique_ids(&individuals, alert.individuals.iter().map(|i| i.id.as_str()));
    for (i, individual) in alert.individuals.iter().enumerate() {
        flagged_individual_fields(v, &format!("{individuals}[{i}]"), individual);
    }

    let orgs = path(prefix, "organizations");
    v.unique_ids(&orgs, alert.organizations.iter().map(|o| o.id.as_str()));
    for (i, org) in alert.organizations.iter().enumerate() {
        org_fields(v, &format!("{orgs}[{i}]"), org);
    }

    let violations = path(prefix, "violations");
    v.unique_ids(&violations, alert.violations.iter().map(|x| x.id.as_str()));
    for (i, violation) in alert.violations.iter().enumerate() {
        violation_fields(v, &format!("{violations}[{i}]"), violation);
    }
}

fn animal_fields(v: &mut Validator, at: &str, animal: &Animal) {
    v.required(&format!("{at}.name"), &animal.name, "Animal name is required");
}

fn contact_fields(v: &mut Validator, at: &str, person: &ContactPerson) {
    v.required(&format!("{at}.name"), &person.name, "Name is required");
    v.email(&format!("{at}.email"), &person.email);
}

fn rescue_org_fields(v: &mut Validator, at: &str, org: &RescueOrganization) {
    v.required(&format!("{at}.name"), &org.name, "Organization name is required");
    v.url(&format!("{at}.website"), &org.website);
    v.email(&format!("{at}.email"), &org.email);
}

fn individual_fields(v: &mut Validator, at: &str, individual: &Individual) {
    v.required(&format!("{at}.name"), &individual.name, "Name is required");
    v.email(&format!("{at}.email"), &individual.email);
}

fn flagged_individual_fields(v: &mut Validator, at: &str, individual: &FlaggedIndividual) {
    v.required(&format!("{at}.name"), &individual.name, "Name is required");
    v.email(&format!("{at}.email"), &individual.email);
}

fn org_fields(v: &mut Validator, at: &str, org: &Organization) {
    v.required(&format!("{at}.name"), &org.name, "Organization name is required");
    v.url(&format!("{at}.website"), &org.website);
    v.email(&format!("{at}.email"), &org.email);
}

fn violation_fields(v: &mut Validator, at: &str, violation: &Violation) {
    v.required(
        &format!("{at}.description"),
        &violation.description,
        "Violation description is required",
    );
}
