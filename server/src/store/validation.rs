//! Field rules for todo payloads.
//!
//! Each rule inspects the decoded fields on its own and appends to a shared
//! message list, so a single request reports every violation it contains.

use protocol::{FieldMap, FieldValue, MAX_DESCRIPTION_LEN, MAX_TITLE_LEN};

pub const FIELD_ID: &str = "id";
pub const FIELD_TITLE: &str = "title";
pub const FIELD_DONE_STATUS: &str = "doneStatus";
pub const FIELD_DESCRIPTION: &str = "description";

const KNOWN_FIELDS: [&str; 4] = [FIELD_ID, FIELD_TITLE, FIELD_DONE_STATUS, FIELD_DESCRIPTION];

/// What the payload is being validated for. It decides which fields are
/// mandatory and how a client supplied `id` is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// `POST /todos`: the server assigns the id.
    Create,
    /// `PUT /todos/{id}` on an existing todo.
    Replace { id: u64 },
    /// `POST /todos/{id}`.
    Amend { id: u64 },
    /// An entry of a bulk database restore, which must carry its id.
    Restore,
}

impl Intent {
    fn requires_title(self) -> bool {
        !matches!(self, Intent::Amend { .. })
    }
}

/// Fields that passed validation. Absent fields stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoDraft {
    pub id: Option<u64>,
    pub title: Option<String>,
    pub done_status: Option<bool>,
    pub description: Option<String>,
}

pub fn validate(fields: &FieldMap, intent: Intent) -> Result<TodoDraft, Vec<String>> {
    let mut errors = Vec::new();
    let mut draft = TodoDraft::default();

    check_unknown_fields(fields, &mut errors);
    draft.id = check_id(fields.get(FIELD_ID), intent, &mut errors);
    draft.title = check_title(fields.get(FIELD_TITLE), intent, &mut errors);
    draft.done_status = check_done_status(fields.get(FIELD_DONE_STATUS), &mut errors);
    draft.description = check_description(fields.get(FIELD_DESCRIPTION), &mut errors);

    if errors.is_empty() {
        Ok(draft)
    } else {
        Err(errors)
    }
}

fn check_unknown_fields(fields: &FieldMap, errors: &mut Vec<String>) {
    for name in fields.names() {
        if !KNOWN_FIELDS.contains(&name) {
            errors.push(format!("Could not find field: {}", name));
        }
    }
}

fn type_mismatch(field: &str, expected: &str, value: &FieldValue) -> String {
    format!(
        "Failed Validation: {} should be {} but was {}",
        field,
        expected,
        value.kind()
    )
}

fn check_id(value: Option<&FieldValue>, intent: Intent, errors: &mut Vec<String>) -> Option<u64> {
    match (intent, value) {
        (Intent::Create, Some(_)) => {
            errors.push("Failed Validation: Not allowed to create with id".to_string());
            None
        }
        (Intent::Create, None) | (Intent::Replace { .. } | Intent::Amend { .. }, None) => None,
        (Intent::Replace { id } | Intent::Amend { id }, Some(value)) => match value.as_id() {
            Some(given) if given == id => Some(given),
            None if !matches!(value, FieldValue::Number(_)) => {
                errors.push(type_mismatch(FIELD_ID, "NUMERIC", value));
                None
            }
            _ => {
                errors.push(format!("Can not amend id from {} to {}", id, value.display()));
                None
            }
        },
        (Intent::Restore, None) => {
            errors.push("id : field is mandatory".to_string());
            None
        }
        (Intent::Restore, Some(value)) => match value.as_id() {
            // The store hands out the id after the highest one it holds.
            Some(id) if id.checked_add(1).is_none() => {
                errors.push(format!(
                    "Failed Validation: id {} leaves no room for further todos",
                    id
                ));
                None
            }
            Some(id) => Some(id),
            None => {
                errors.push(type_mismatch(FIELD_ID, "NUMERIC", value));
                None
            }
        },
    }
}

fn check_length(field: &str, text: &str, max: usize, errors: &mut Vec<String>) -> bool {
    if text.chars().count() > max {
        errors.push(format!(
            "Failed Validation: Maximum allowable length exceeded for {} - maximum allowed is {}",
            field, max
        ));
        false
    } else {
        true
    }
}

fn check_title(value: Option<&FieldValue>, intent: Intent, errors: &mut Vec<String>) -> Option<String> {
    let Some(value) = value else {
        if intent.requires_title() {
            errors.push("title : field is mandatory".to_string());
        }
        return None;
    };

    let Some(title) = value.as_text() else {
        errors.push(type_mismatch(FIELD_TITLE, "STRING", value));
        return None;
    };

    if title.trim().is_empty() {
        errors.push("Failed Validation: title : can not be empty".to_string());
        return None;
    }

    check_length(FIELD_TITLE, title, MAX_TITLE_LEN, errors).then(|| title.to_string())
}

fn check_done_status(value: Option<&FieldValue>, errors: &mut Vec<String>) -> Option<bool> {
    let value = value?;
    let done = value.as_bool();
    if done.is_none() {
        errors.push(type_mismatch(FIELD_DONE_STATUS, "BOOLEAN", value));
    }
    done
}

fn check_description(value: Option<&FieldValue>, errors: &mut Vec<String>) -> Option<String> {
    let value = value?;
    let Some(description) = value.as_text() else {
        errors.push(type_mismatch(FIELD_DESCRIPTION, "STRING", value));
        return None;
    };

    check_length(FIELD_DESCRIPTION, description, MAX_DESCRIPTION_LEN, errors)
        .then(|| description.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> FieldMap {
        match value {
            serde_json::Value::Object(map) => FieldMap::from(map),
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_valid_create() {
        let draft = validate(
            &fields(json!({"title": "a".repeat(50), "doneStatus": false, "description": "b".repeat(200)})),
            Intent::Create,
        )
        .unwrap();
        assert_eq!(draft.title.unwrap().len(), 50);
        assert_eq!(draft.description.unwrap().len(), 200);
        assert_eq!(draft.done_status, Some(false));
    }

    #[test]
    fn test_done_status_type_is_named() {
        let errors =
            validate(&fields(json!({"title": "x", "doneStatus": "not done"})), Intent::Create).unwrap_err();
        assert_eq!(
            errors,
            vec!["Failed Validation: doneStatus should be BOOLEAN but was STRING"]
        );
    }

    #[test]
    fn test_lengths_count_characters_not_bytes() {
        let title = "ж".repeat(50);
        assert!(validate(&fields(json!({"title": title})), Intent::Create).is_ok());

        let errors = validate(&fields(json!({"title": "ж".repeat(51)})), Intent::Create).unwrap_err();
        assert_eq!(
            errors,
            vec!["Failed Validation: Maximum allowable length exceeded for title - maximum allowed is 50"]
        );
    }

    #[test]
    fn test_all_violations_are_reported() {
        let errors = validate(
            &fields(json!({
                "title": "t".repeat(60),
                "description": "d".repeat(201),
                "doneStatus": 1,
                "extraField": "not allowed"
            })),
            Intent::Create,
        )
        .unwrap_err();

        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&"Could not find field: extraField".to_string()));
        assert!(errors.contains(
            &"Failed Validation: Maximum allowable length exceeded for title - maximum allowed is 50".to_string()
        ));
        assert!(errors.contains(
            &"Failed Validation: Maximum allowable length exceeded for description - maximum allowed is 200"
                .to_string()
        ));
        assert!(errors.contains(&"Failed Validation: doneStatus should be BOOLEAN but was NUMERIC".to_string()));
    }

    #[test]
    fn test_replace_requires_title() {
        let errors =
            validate(&fields(json!({"id": 1, "doneStatus": true})), Intent::Replace { id: 1 }).unwrap_err();
        assert_eq!(errors, vec!["title : field is mandatory"]);
    }

    #[test]
    fn test_replace_cannot_amend_id() {
        let errors = validate(
            &fields(json!({"id": 2, "title": "x", "doneStatus": true})),
            Intent::Replace { id: 1 },
        )
        .unwrap_err();
        assert_eq!(errors, vec!["Can not amend id from 1 to 2"]);
    }

    #[test]
    fn test_string_id_is_a_type_violation() {
        let errors =
            validate(&fields(json!({"id": "1", "title": "x"})), Intent::Replace { id: 1 }).unwrap_err();
        assert_eq!(errors, vec!["Failed Validation: id should be NUMERIC but was STRING"]);

        let errors = validate(&fields(json!({"id": "1", "title": "x"})), Intent::Restore).unwrap_err();
        assert_eq!(errors, vec!["Failed Validation: id should be NUMERIC but was STRING"]);
    }

    #[test]
    fn test_restore_rejects_last_possible_id() {
        let errors = validate(&fields(json!({"id": u64::MAX, "title": "edge"})), Intent::Restore).unwrap_err();
        assert_eq!(
            errors,
            vec![format!("Failed Validation: id {} leaves no room for further todos", u64::MAX)]
        );

        let draft = validate(&fields(json!({"id": u64::MAX - 1, "title": "edge"})), Intent::Restore).unwrap();
        assert_eq!(draft.id, Some(u64::MAX - 1));
    }

    #[test]
    fn test_amend_does_not_require_title() {
        let draft = validate(&fields(json!({"doneStatus": true})), Intent::Amend { id: 4 }).unwrap();
        assert_eq!(draft.title, None);
        assert_eq!(draft.done_status, Some(true));
    }

    #[test]
    fn test_create_rejects_client_id() {
        let errors = validate(&fields(json!({"id": 9, "title": "x"})), Intent::Create).unwrap_err();
        assert_eq!(errors, vec!["Failed Validation: Not allowed to create with id"]);
    }

    #[test]
    fn test_empty_title_is_rejected() {
        let errors = validate(&fields(json!({"title": "  "})), Intent::Create).unwrap_err();
        assert_eq!(errors, vec!["Failed Validation: title : can not be empty"]);
    }

    #[test]
    fn test_xml_done_status_is_coerced() {
        let mut map = FieldMap::new();
        map.insert("title", FieldValue::Untyped("scan paperwork".to_string()));
        map.insert("doneStatus", FieldValue::Untyped("true".to_string()));
        let draft = validate(&map, Intent::Create).unwrap();
        assert_eq!(draft.done_status, Some(true));
    }
}
