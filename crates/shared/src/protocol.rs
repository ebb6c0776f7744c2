use serde::{Deserialize, Serialize};

use crate::domain::{ContactType, NewContact, Relation, UserId};

/// A response body that is either a single record or an array of them.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

/// Unwraps `{ "data": ... }` envelopes; any other body is returned as-is.
pub fn strip_data_envelope(body: serde_json::Value) -> serde_json::Value {
    match body {
        serde_json::Value::Object(mut map) if map.contains_key("data") && !map.contains_key("id") => {
            map.remove("data").unwrap_or(serde_json::Value::Null)
        }
        other => other,
    }
}

/// Acknowledgement returned by create and update endpoints.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MutationAck {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateContactRequest {
    pub user_id: UserId,
    pub relation: Relation,
    pub name: String,
    pub value: String,
    pub contact_type: ContactType,
}

impl CreateContactRequest {
    pub fn new(user_id: UserId, draft: &NewContact) -> Self {
        Self {
            user_id,
            relation: draft.relation,
            name: draft.name.clone(),
            value: draft.value.clone(),
            contact_type: draft.contact_type,
        }
    }
}
