use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(UserId);
id_newtype!(ContactId);
id_newtype!(EventGroupId);
id_newtype!(EventId);

impl ContactId {
    /// Placeholder ids handed out before the backend confirms a create are negative.
    pub fn is_placeholder(self) -> bool {
        self.0 < 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Relation {
    #[default]
    #[serde(rename = "SELF", alias = "Self", alias = "self")]
    SelfContact,
    #[serde(rename = "FATHER", alias = "Father", alias = "father")]
    Father,
    #[serde(rename = "OTHER", alias = "Other", alias = "other")]
    Other,
}

impl Relation {
    pub fn as_str(self) -> &'static str {
        match self {
            Relation::SelfContact => "SELF",
            Relation::Father => "FATHER",
            Relation::Other => "OTHER",
        }
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Relation {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SELF" => Ok(Relation::SelfContact),
            "FATHER" => Ok(Relation::Father),
            "OTHER" => Ok(Relation::Other),
            _ => Err(UnknownVariant::new("relation", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ContactType {
    #[default]
    Phone,
    Email,
    #[serde(alias = "WhatsApp")]
    Whatsapp,
    Other,
}

impl ContactType {
    pub fn as_str(self) -> &'static str {
        match self {
            ContactType::Phone => "PHONE",
            ContactType::Email => "EMAIL",
            ContactType::Whatsapp => "WHATSAPP",
            ContactType::Other => "OTHER",
        }
    }

    /// Phone and WhatsApp values share the phone-number format.
    pub fn expects_phone_number(self) -> bool {
        matches!(self, ContactType::Phone | ContactType::Whatsapp)
    }
}

impl fmt::Display for ContactType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ContactType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PHONE" => Ok(ContactType::Phone),
            "EMAIL" => Ok(ContactType::Email),
            "WHATSAPP" => Ok(ContactType::Whatsapp),
            "OTHER" => Ok(ContactType::Other),
            _ => Err(UnknownVariant::new("contact type", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: ContactId,
    pub relation: Relation,
    pub name: String,
    pub value: String,
    pub contact_type: ContactType,
}

/// A contact as entered in the form, before the backend assigns an id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContact {
    pub relation: Relation,
    pub name: String,
    pub value: String,
    pub contact_type: ContactType,
}

impl NewContact {
    pub fn with_id(&self, id: ContactId) -> Contact {
        Contact {
            id,
            relation: self.relation,
            name: self.name.clone(),
            value: self.value.clone(),
            contact_type: self.contact_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventGroup {
    pub id: EventGroupId,
    pub group_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventGroupDraft {
    pub group_name: String,
}

/// Backends report event dates either as text or as epoch milliseconds.
/// Anything else (null, fractional millis, objects) is kept as received so
/// one odd record does not fail the whole listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventDate {
    Millis(i64),
    Text(String),
    Other(serde_json::Value),
}

impl Default for EventDate {
    fn default() -> Self {
        EventDate::Other(serde_json::Value::Null)
    }
}

impl EventDate {
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        match self {
            EventDate::Millis(ms) => DateTime::<Utc>::from_timestamp_millis(*ms).map(|dt| dt.date_naive()),
            EventDate::Text(raw) => {
                let raw = raw.trim();
                DateTime::parse_from_rfc3339(raw)
                    .map(|dt| dt.date_naive())
                    .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map(|dt| dt.date()))
                    .or_else(|_| NaiveDate::parse_from_str(raw, "%Y-%m-%d"))
                    .ok()
            }
            EventDate::Other(value) => value
                .as_f64()
                .filter(|ms| ms.is_finite())
                .and_then(|ms| DateTime::<Utc>::from_timestamp_millis(ms as i64))
                .map(|dt| dt.date_naive()),
        }
    }
}

impl fmt::Display for EventDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.calendar_date(), self) {
            (Some(date), _) => write!(f, "{}", date.format("%Y-%m-%d")),
            (None, EventDate::Text(raw)) => f.write_str(raw),
            (None, EventDate::Millis(ms)) => write!(f, "{ms}"),
            (None, EventDate::Other(serde_json::Value::Null)) => Ok(()),
            (None, EventDate::Other(value)) => write!(f, "{value}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: EventId,
    pub event_name: String,
    #[serde(default)]
    pub date: EventDate,
    /// Fields owned by the event editor; carried through untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
