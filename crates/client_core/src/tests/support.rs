use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use shared::{
    domain::{
        Contact, ContactId, ContactType, Event, EventDate, EventGroup, EventGroupDraft,
        EventGroupId, EventId, NewContact, Relation, UserId,
    },
    protocol::MutationAck,
};
use tokio::sync::Notify;

use crate::{
    error::GatewayError,
    gateway::{ContactsGateway, EventsGateway, GatewayResult},
    notifier::{Notifier, Toast, ToastLevel},
};

#[derive(Default)]
pub struct RecordingNotifier {
    toasts: Mutex<Vec<Toast>>,
}

impl RecordingNotifier {
    pub fn toasts(&self) -> Vec<Toast> {
        self.toasts.lock().expect("toasts lock").clone()
    }

    pub fn failures(&self) -> Vec<String> {
        self.messages(ToastLevel::Failure)
    }

    pub fn successes(&self) -> Vec<String> {
        self.messages(ToastLevel::Success)
    }

    fn messages(&self, level: ToastLevel) -> Vec<String> {
        self.toasts()
            .into_iter()
            .filter(|toast| toast.level == level)
            .map(|toast| toast.message)
            .collect()
    }

    fn push(&self, level: ToastLevel, message: &str) {
        self.toasts.lock().expect("toasts lock").push(Toast {
            level,
            message: message.to_string(),
        });
    }
}

impl Notifier for RecordingNotifier {
    fn notify_success(&self, message: &str) {
        self.push(ToastLevel::Success, message);
    }

    fn notify_failure(&self, message: &str) {
        self.push(ToastLevel::Failure, message);
    }
}

pub fn server_error() -> GatewayError {
    GatewayError::Status {
        status: 500,
        message: None,
    }
}

pub fn contact(id: i64, name: &str, contact_type: ContactType, value: &str) -> Contact {
    Contact {
        id: ContactId(id),
        relation: Relation::SelfContact,
        name: name.to_string(),
        value: value.to_string(),
        contact_type,
    }
}

pub fn group(id: i64, name: &str) -> EventGroup {
    EventGroup {
        id: EventGroupId(id),
        group_name: name.to_string(),
    }
}

pub fn event(id: i64, name: &str, date: &str) -> Event {
    Event {
        id: EventId(id),
        event_name: name.to_string(),
        date: EventDate::Text(date.to_string()),
        extra: serde_json::Map::new(),
    }
}

/// In-memory contacts backend. Assigns ids from 100 upward.
#[derive(Default)]
pub struct FakeContactsGateway {
    pub contacts: Mutex<Vec<Contact>>,
    pub fail_fetch: bool,
    pub fail_create: bool,
    /// Message carried by the error body when `fail_create` is set.
    pub create_rejection: Option<String>,
    pub fetch_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub created: Mutex<Vec<(UserId, NewContact)>>,
    /// When set, `create` waits for a notification before answering.
    pub create_gate: Option<Arc<Notify>>,
}

impl FakeContactsGateway {
    pub fn with_contacts(contacts: Vec<Contact>) -> Self {
        Self {
            contacts: Mutex::new(contacts),
            ..Self::default()
        }
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ContactsGateway for FakeContactsGateway {
    async fn fetch_by_owner(&self, _owner: UserId) -> GatewayResult<Vec<Contact>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_fetch {
            return Err(server_error());
        }
        Ok(self.contacts.lock().expect("contacts lock").clone())
    }

    async fn create(&self, owner: UserId, draft: &NewContact) -> GatewayResult<Contact> {
        let call = self.create_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.create_gate {
            gate.notified().await;
        }
        self.created
            .lock()
            .expect("created lock")
            .push((owner, draft.clone()));
        if self.fail_create {
            return Err(GatewayError::Status {
                status: 422,
                message: self.create_rejection.clone(),
            });
        }
        let contact = draft.with_id(ContactId(100 + call as i64));
        self.contacts
            .lock()
            .expect("contacts lock")
            .push(contact.clone());
        Ok(contact)
    }
}

/// In-memory events backend. New groups get ids from 100 upward.
#[derive(Default)]
pub struct FakeEventsGateway {
    pub groups: Mutex<Vec<EventGroup>>,
    pub events: Mutex<Vec<Event>>,
    pub fail_fetch_events: bool,
    pub fail_create: bool,
    pub fail_update: bool,
    pub fetch_calls: AtomicUsize,
    pub create_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
    pub create_gate: Option<Arc<Notify>>,
}

impl FakeEventsGateway {
    pub fn with_data(groups: Vec<EventGroup>, events: Vec<Event>) -> Self {
        Self {
            groups: Mutex::new(groups),
            events: Mutex::new(events),
            ..Self::default()
        }
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EventsGateway for FakeEventsGateway {
    async fn fetch_all_events(&self) -> GatewayResult<Vec<Event>> {
        if self.fail_fetch_events {
            return Err(server_error());
        }
        Ok(self.events.lock().expect("events lock").clone())
    }

    async fn fetch_all_groups(&self) -> GatewayResult<Vec<EventGroup>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.groups.lock().expect("groups lock").clone())
    }

    async fn create_group(&self, draft: &EventGroupDraft) -> GatewayResult<MutationAck> {
        let call = self.create_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.create_gate {
            gate.notified().await;
        }
        if self.fail_create {
            return Err(server_error());
        }
        self.groups
            .lock()
            .expect("groups lock")
            .push(group(100 + call as i64, &draft.group_name));
        Ok(MutationAck {
            message: "Event group created successfully".to_string(),
            data: None,
        })
    }

    async fn update_group(
        &self,
        id: EventGroupId,
        draft: &EventGroupDraft,
    ) -> GatewayResult<MutationAck> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_update {
            return Err(server_error());
        }
        let mut groups = self.groups.lock().expect("groups lock");
        match groups.iter_mut().find(|group| group.id == id) {
            Some(group) => {
                group.group_name = draft.group_name.clone();
                Ok(MutationAck {
                    message: "Event group updated successfully".to_string(),
                    data: None,
                })
            }
            None => Err(GatewayError::Status {
                status: 404,
                message: Some("Event group not found".to_string()),
            }),
        }
    }
}
