//! Form state reducer.
//!
//! Every edit a user makes is expressed as a [`FormAction`] and applied to a
//! post record with [`apply`], which returns a new record version and leaves
//! the input untouched.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use crate::errors::AppError;
use crate::models::{
    new_id, Animal, BlacklistCase, CaseStatus, ContactPerson, FieldError, FlaggedIndividual,
    IncidentStatus, Individual, Organization, PostRecord, PostType, RescueOrganization,
    RescuePost, Severity, Urgency, Violation, WelfareAlert,
};

/// Repeated sub-record lists a form can edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemList {
    Animals,
    ContactPersons,
    Organizations,
    Individuals,
    Violations,
}

/// Nested string lists inside a sub-record (or, for aliases, on the post).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EntryField {
    Photos,
    SocialMedia,
    Specializations,
    Aliases,
    Evidence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    Up,
    Down,
}

/// Identifies one item in a repeated list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRef {
    pub list: ItemList,
    pub index: usize,
}

/// A nested string list; `item` is absent for lists that live on the post itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryTarget {
    #[serde(default)]
    pub item: Option<ItemRef>,
    pub field: EntryField,
}

/// A single user edit.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum FormAction {
    SetField {
        field: String,
        value: String,
    },
    AddItem {
        list: ItemList,
    },
    RemoveItem {
        list: ItemList,
        index: usize,
    },
    MoveItem {
        list: ItemList,
        index: usize,
        direction: Direction,
    },
    UpdateItem {
        list: ItemList,
        index: usize,
        item: serde_json::Value,
    },
    AddEntry {
        target: EntryTarget,
        #[serde(default)]
        value: String,
    },
    RemoveEntry {
        target: EntryTarget,
        position: usize,
    },
    MoveEntry {
        target: EntryTarget,
        position: usize,
        direction: Direction,
    },
    AddHashtag {
        tag: String,
    },
    RemoveHashtag {
        index: usize,
    },
    Reset {
        record: PostRecord,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("field `{field}` does not exist on a {kind} post")]
    UnknownField { field: String, kind: &'static str },
    #[error("`{value}` is not a valid value for `{field}`")]
    InvalidValue { field: String, value: String },
    #[error("list `{list:?}` does not exist on a {kind} post")]
    UnsupportedList { list: ItemList, kind: &'static str },
    #[error("list `{field:?}` does not exist here")]
    UnsupportedEntryList { field: EntryField },
    #[error("index {index} is out of range for a list of {len}")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("item is malformed: {0}")]
    MalformedItem(String),
}

impl FormError {
    fn field(&self) -> String {
        match self {
            FormError::UnknownField { field, .. } | FormError::InvalidValue { field, .. } => {
                field.clone()
            }
            FormError::UnsupportedList { .. } => "list".to_string(),
            FormError::UnsupportedEntryList { .. } => "target".to_string(),
            FormError::IndexOutOfRange { .. } => "index".to_string(),
            FormError::MalformedItem(_) => "item".to_string(),
        }
    }
}

impl From<FormError> for AppError {
    fn from(err: FormError) -> Self {
        AppError::validation(vec![FieldError::new(
            format!("action.{}", err.field()),
            err.to_string(),
        )])
    }
}

/// Apply one action, producing the next record version.
pub fn apply(state: &PostRecord, action: FormAction) -> Result<PostRecord, FormError> {
    let mut next = state.clone();
    match action {
        FormAction::SetField { field, value } => set_field(&mut next, &field, value)?,
        FormAction::AddItem { list } => edit_items(&mut next, list, ItemEdit::Add)?,
        FormAction::RemoveItem { list, index } => {
            edit_items(&mut next, list, ItemEdit::Remove(index))?
        }
        FormAction::MoveItem {
            list,
            index,
            direction,
        } => edit_items(&mut next, list, ItemEdit::Move(index, direction))?,
        FormAction::UpdateItem { list, index, item } => {
            edit_items(&mut next, list, ItemEdit::Update(index, item))?
        }
        FormAction::AddEntry { target, value } => {
            edit_entries(&mut next, target, EntryEdit::Add(value))?
        }
        FormAction::RemoveEntry { target, position } => {
            edit_entries(&mut next, target, EntryEdit::Remove(position))?
        }
        FormAction::MoveEntry {
            target,
            position,
            direction,
        } => edit_entries(&mut next, target, EntryEdit::Move(position, direction))?,
        FormAction::AddHashtag { tag } => add_hashtag(next.hashtags_mut(), &tag),
        FormAction::RemoveHashtag { index } => remove_at(next.hashtags_mut(), index),
        FormAction::Reset { record } => next = record,
    }
    Ok(next)
}

/// Empty or whitespace-only input clears an optional text field.
fn optional(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn parsed<T>(field: &str, value: &str, parse: fn(&str) -> Option<T>) -> Result<T, FormError> {
    parse(value).ok_or_else(|| FormError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    })
}

fn set_field(post: &mut PostRecord, field: &str, value: String) -> Result<(), FormError> {
    let kind = post.kind();
    let result = match post {
        PostRecord::Rescue(p) => set_rescue_field(p, field, value),
        PostRecord::FraudCase(c) => set_case_field(c, field, value),
        PostRecord::WelfareAlert(a) => set_alert_field(a, field, value),
    };
    result.map_err(|err| match err {
        FormError::UnknownField { field, .. } => FormError::UnknownField { field, kind },
        other => other,
    })
}

fn unknown(field: &str) -> FormError {
    FormError::UnknownField {
        field: field.to_string(),
        kind: "",
    }
}

fn set_rescue_field(p: &mut RescuePost, field: &str, value: String) -> Result<(), FormError> {
    match field {
        "title" => p.title = value,
        "urgency" => p.urgency = parsed(field, &value, Urgency::parse)?,
        "postType" => p.post_type = parsed(field, &value, PostType::parse)?,
        "description" => p.description = optional(value),
        "location" => p.location = optional(value),
        "deadline" => p.deadline = optional(value),
        "requirements" => p.requirements = optional(value),
        "additionalInfo" => p.additional_info = optional(value),
        _ => return Err(unknown(field)),
    }
    Ok(())
}

fn set_case_field(c: &mut BlacklistCase, field: &str, value: String) -> Result<(), FormError> {
    match field {
        "caseTitle" => c.case_title = value,
        "incidentDate" => c.incident_date = optional(value),
        "caseStatus" => c.case_status = parsed(field, &value, CaseStatus::parse)?,
        "briefDescription" => c.brief_description = optional(value),
        "summaryStatement" => c.summary_statement = optional(value),
        _ => return Err(unknown(field)),
    }
    Ok(())
}

fn set_alert_field(a: &mut WelfareAlert, field: &str, value: String) -> Result<(), FormError> {
    match field {
        "title" => a.title = value,
        "severity" => a.severity = parsed(field, &value, Severity::parse)?,
        "status" => a.status = parsed(field, &value, IncidentStatus::parse)?,
        "incidentDate" => a.incident_date = optional(value),
        "location" => a.location = optional(value),
        "description" => a.description = optional(value),
        "animalWelfareImpact" => a.animal_welfare_impact = optional(value),
        "recommendedActions" => a.recommended_actions = optional(value),
        _ => return Err(unknown(field)),
    }
    Ok(())
}

/// Behaviour shared by every repeated sub-record.
trait SubRecord: Clone + DeserializeOwned {
    /// A new item with a fresh identifier.
    fn blank() -> Self;
    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    fn entries_mut(&mut self, field: EntryField) -> Option<&mut Vec<String>>;
}

macro_rules! sub_record {
    ($ty:ty, primary: $primary:ident, entries: { $($field:ident => $member:ident),* $(,)? }) => {
        impl SubRecord for $ty {
            fn blank() -> Self {
                Self {
                    id: new_id(),
                    $primary: vec![String::new()],
                    ..Default::default()
                }
            }

            fn id(&self) -> &str {
                &self.id
            }

            fn set_id(&mut self, id: String) {
                self.id = id;
            }

            fn entries_mut(&mut self, field: EntryField) -> Option<&mut Vec<String>> {
                match field {
                    $(EntryField::$field => Some(&mut self.$member),)*
                    #[allow(unreachable_patterns)]
                    _ => None,
                }
            }
        }
    };
}

sub_record!(Animal, primary: photos, entries: { Photos => photos });
sub_record!(ContactPerson, primary: social_media, entries: { SocialMedia => social_media });
sub_record!(RescueOrganization, primary: social_media, entries: {
    SocialMedia => social_media,
    Specializations => specializations,
});
sub_record!(Individual, primary: social_media, entries: { SocialMedia => social_media });
sub_record!(FlaggedIndividual, primary: social_media, entries: {
    SocialMedia => social_media,
    Aliases => aliases,
});
sub_record!(Organization, primary: social_media, entries: { SocialMedia => social_media });
sub_record!(Violation, primary: evidence, entries: { Evidence => evidence });

/// An edit to a repeated list, applied generically over the item type.
enum ItemEdit {
    Add,
    Remove(usize),
    Move(usize, Direction),
    Update(usize, serde_json::Value),
    Entries(usize, EntryField, EntryEdit),
}

impl ItemEdit {
    fn run<T: SubRecord>(self, items: &mut Vec<T>) -> Result<(), FormError> {
        match self {
            ItemEdit::Add => items.push(T::blank()),
            ItemEdit::Remove(index) => remove_at(items, index),
            ItemEdit::Move(index, direction) => move_within(items, index, direction),
            ItemEdit::Update(index, mut value) => {
                let len = items.len();
                let slot = items
                    .get_mut(index)
                    .ok_or(FormError::IndexOutOfRange { index, len })?;
                if let serde_json::Value::Object(map) = &mut value {
                    map.insert("id".to_string(), slot.id().into());
                }
                let mut item: T = serde_json::from_value(value)
                    .map_err(|e| FormError::MalformedItem(e.to_string()))?;
                item.set_id(slot.id().to_string());
                *slot = item;
            }
            ItemEdit::Entries(index, field, edit) => {
                let len = items.len();
                let item = items
                    .get_mut(index)
                    .ok_or(FormError::IndexOutOfRange { index, len })?;
                let entries = item
                    .entries_mut(field)
                    .ok_or(FormError::UnsupportedEntryList { field })?;
                edit.run(entries);
            }
        }
        Ok(())
    }
}

fn edit_items(post: &mut PostRecord, list: ItemList, edit: ItemEdit) -> Result<(), FormError> {
    let kind = post.kind();
    match (post, list) {
        (PostRecord::Rescue(p), ItemList::Animals) => edit.run(&mut p.animals),
        (PostRecord::Rescue(p), ItemList::ContactPersons) => edit.run(&mut p.contact_persons),
        (PostRecord::Rescue(p), ItemList::Organizations) => edit.run(&mut p.organizations),
        (PostRecord::FraudCase(c), ItemList::Individuals) => edit.run(&mut c.individuals),
        (PostRecord::FraudCase(c), ItemList::Organizations) => edit.run(&mut c.organizations),
        (PostRecord::WelfareAlert(a), ItemList::Individuals) => edit.run(&mut a.individuals),
        (PostRecord::WelfareAlert(a), ItemList::Organizations) => edit.run(&mut a.organizations),
        (PostRecord::WelfareAlert(a), ItemList::Violations) => edit.run(&mut a.violations),
        (_, list) => Err(FormError::UnsupportedList { list, kind }),
    }
}

/// An edit to a list of plain strings.
enum EntryEdit {
    Add(String),
    Remove(usize),
    Move(usize, Direction),
}

impl EntryEdit {
    fn run(self, entries: &mut Vec<String>) {
        match self {
            EntryEdit::Add(value) => entries.push(value),
            EntryEdit::Remove(position) => remove_at(entries, position),
            EntryEdit::Move(position, direction) => move_within(entries, position, direction),
        }
    }
}

fn edit_entries(post: &mut PostRecord, target: EntryTarget, edit: EntryEdit) -> Result<(), FormError> {
    match (target.item, post) {
        (Some(item), post) => {
            edit_items(post, item.list, ItemEdit::Entries(item.index, target.field, edit))
        }
        (None, PostRecord::FraudCase(c)) if target.field == EntryField::Aliases => {
            edit.run(&mut c.aliases);
            Ok(())
        }
        (None, _) => Err(FormError::UnsupportedEntryList {
            field: target.field,
        }),
    }
}

/// Out-of-range removals leave the list unchanged.
fn remove_at<T>(items: &mut Vec<T>, index: usize) {
    if index < items.len() {
        items.remove(index);
    }
}

/// Moves past either end leave the list unchanged.
fn move_within<T>(items: &mut [T], index: usize, direction: Direction) {
    let target = match direction {
        Direction::Up => index.checked_sub(1),
        Direction::Down => index.checked_add(1),
    };
    if let Some(target) = target {
        if index < items.len() && target < items.len() {
            items.swap(index, target);
        }
    }
}

fn add_hashtag(tags: &mut Vec<String>, raw: &str) {
    let tag = raw.trim().trim_start_matches('#').trim();
    if tag.is_empty() || tags.iter().any(|t| t == tag) {
        return;
    }
    tags.push(tag.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn alert() -> PostRecord {
        PostRecord::WelfareAlert(WelfareAlert {
            title: "Alert".to_string(),
            ..Default::default()
        })
    }

    fn as_alert(post: &PostRecord) -> &WelfareAlert {
        match post {
            PostRecord::WelfareAlert(a) => a,
            other => panic!("expected welfare alert, got {}", other.kind()),
        }
    }

    #[test]
    fn test_apply_does_not_mutate_input() {
        let before = alert();
        let after = apply(
            &before,
            FormAction::SetField {
                field: "severity".to_string(),
                value: "critical".to_string(),
            },
        )
        .unwrap();

        assert_eq!(as_alert(&before).severity, Severity::Medium);
        assert_eq!(as_alert(&after).severity, Severity::Critical);
    }

    #[test]
    fn test_add_item_assigns_unique_ids() {
        let mut post = alert();
        for _ in 0..3 {
            post = apply(&post, FormAction::AddItem { list: ItemList::Violations }).unwrap();
        }
        let ids: std::collections::HashSet<_> =
            as_alert(&post).violations.iter().map(|v| v.id.clone()).collect();
        assert_eq!(ids.len(), 3);
        assert_eq!(as_alert(&post).violations[0].evidence, vec![String::new()]);
    }

    #[test]
    fn test_move_and_remove_items() {
        let mut post = alert();
        for _ in 0..3 {
            post = apply(&post, FormAction::AddItem { list: ItemList::Individuals }).unwrap();
        }
        let original: Vec<String> = as_alert(&post).individuals.iter().map(|i| i.id.clone()).collect();

        post = apply(
            &post,
            FormAction::MoveItem {
                list: ItemList::Individuals,
                index: 2,
                direction: Direction::Up,
            },
        )
        .unwrap();
        let moved: Vec<String> = as_alert(&post).individuals.iter().map(|i| i.id.clone()).collect();
        assert_eq!(moved, vec![original[0].clone(), original[2].clone(), original[1].clone()]);

        // Moving the first item up is a no-op.
        let unchanged = apply(
            &post,
            FormAction::MoveItem {
                list: ItemList::Individuals,
                index: 0,
                direction: Direction::Up,
            },
        )
        .unwrap();
        assert_eq!(unchanged, post);

        post = apply(
            &post,
            FormAction::RemoveItem {
                list: ItemList::Individuals,
                index: 0,
            },
        )
        .unwrap();
        assert_eq!(as_alert(&post).individuals.len(), 2);
        assert_eq!(as_alert(&post).individuals[0].id, original[2]);
    }

    #[test]
    fn test_update_item_keeps_identifier() {
        let post = apply(&alert(), FormAction::AddItem { list: ItemList::Organizations }).unwrap();
        let id = as_alert(&post).organizations[0].id.clone();

        let post = apply(
            &post,
            FormAction::UpdateItem {
                list: ItemList::Organizations,
                index: 0,
                item: json!({ "name": "Sunshine Rescue", "phone": "555-0100" }),
            },
        )
        .unwrap();

        let org = &as_alert(&post).organizations[0];
        assert_eq!(org.id, id);
        assert_eq!(org.name, "Sunshine Rescue");
        assert_eq!(org.phone.as_deref(), Some("555-0100"));

        let err = apply(
            &post,
            FormAction::UpdateItem {
                list: ItemList::Organizations,
                index: 4,
                item: json!({ "name": "Nobody" }),
            },
        )
        .unwrap_err();
        assert_eq!(err, FormError::IndexOutOfRange { index: 4, len: 1 });
    }

    #[test]
    fn test_nested_entries() {
        let post = apply(&alert(), FormAction::AddItem { list: ItemList::Individuals }).unwrap();
        let target = EntryTarget {
            item: Some(ItemRef {
                list: ItemList::Individuals,
                index: 0,
            }),
            field: EntryField::Aliases,
        };
        let post = apply(
            &post,
            FormAction::AddEntry {
                target,
                value: "Johnny".to_string(),
            },
        )
        .unwrap();
        assert_eq!(as_alert(&post).individuals[0].aliases, vec!["Johnny"]);

        let err = apply(
            &post,
            FormAction::AddEntry {
                target: EntryTarget {
                    item: target.item,
                    field: EntryField::Photos,
                },
                value: "x".to_string(),
            },
        )
        .unwrap_err();
        assert_eq!(err, FormError::UnsupportedEntryList { field: EntryField::Photos });
    }

    #[test]
    fn test_case_aliases_live_on_the_post() {
        let case = PostRecord::FraudCase(BlacklistCase {
            case_title: "Case".to_string(),
            aliases: vec!["A".to_string(), "B".to_string()],
            ..Default::default()
        });
        let target = EntryTarget {
            item: None,
            field: EntryField::Aliases,
        };
        let next = apply(
            &case,
            FormAction::MoveEntry {
                target,
                position: 0,
                direction: Direction::Down,
            },
        )
        .unwrap();
        match next {
            PostRecord::FraudCase(c) => assert_eq!(c.aliases, vec!["B", "A"]),
            other => panic!("unexpected {}", other.kind()),
        }
    }

    #[test]
    fn test_hashtags_are_cleaned_and_deduplicated() {
        let mut post = alert();
        for tag in ["#rescue", "rescue", "  ", "#", "adopt"] {
            post = apply(&post, FormAction::AddHashtag { tag: tag.to_string() }).unwrap();
        }
        assert_eq!(as_alert(&post).hashtags, vec!["rescue", "adopt"]);

        let post = apply(&post, FormAction::RemoveHashtag { index: 0 }).unwrap();
        assert_eq!(as_alert(&post).hashtags, vec!["adopt"]);
    }

    #[test]
    fn test_rejects_lists_and_fields_the_variant_lacks() {
        let err = apply(&alert(), FormAction::AddItem { list: ItemList::Animals }).unwrap_err();
        assert_eq!(
            err,
            FormError::UnsupportedList {
                list: ItemList::Animals,
                kind: "welfareAlert"
            }
        );

        let err = apply(
            &alert(),
            FormAction::SetField {
                field: "caseTitle".to_string(),
                value: "x".to_string(),
            },
        )
        .unwrap_err();
        assert_eq!(
            err,
            FormError::UnknownField {
                field: "caseTitle".to_string(),
                kind: "welfareAlert"
            }
        );

        let err = apply(
            &alert(),
            FormAction::SetField {
                field: "status".to_string(),
                value: "archived".to_string(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, FormError::InvalidValue { .. }));
    }

    #[test]
    fn test_action_wire_format() {
        let action: FormAction = serde_json::from_value(json!({
            "type": "moveItem",
            "list": "contactPersons",
            "index": 1,
            "direction": "down"
        }))
        .unwrap();
        assert!(matches!(
            action,
            FormAction::MoveItem {
                list: ItemList::ContactPersons,
                index: 1,
                direction: Direction::Down
            }
        ));
    }
}
