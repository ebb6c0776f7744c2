//! Contacts screen: a user's contact list with an add form.
//!
//! New contacts are merged optimistically. A pending record carrying a
//! negative placeholder id is appended as soon as the draft validates, then
//! swapped for the backend's record on success or dropped on failure.

use std::sync::Arc;

use shared::domain::{Contact, ContactId, NewContact, UserId};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    draft::DraftHolder,
    error::ScreenError,
    gateway::ContactsGateway,
    lifecycle::ScreenScope,
    notifier::Notifier,
    state::LoadState,
    store::CollectionStore,
    validation::{validate_contact, ValidationError},
};

const LOAD_FAILED: &str = "Failed to load contacts";
const CREATE_FAILED: &str = "Failed to create contact";
const CREATE_SUCCEEDED: &str = "Contact saved";

#[derive(Debug, Clone, PartialEq)]
pub struct ContactsSnapshot {
    pub owner: UserId,
    pub load: LoadState,
    pub contacts: Vec<Contact>,
    pub draft: NewContact,
    pub is_adding: bool,
    pub form_error: Option<ValidationError>,
}

struct ContactsState {
    load: LoadState,
    contacts: CollectionStore<Contact>,
    draft: DraftHolder<NewContact>,
    is_adding: bool,
    form_error: Option<ValidationError>,
    next_placeholder: i64,
}

impl ContactsState {
    fn allocate_placeholder(&mut self) -> ContactId {
        let id = ContactId(self.next_placeholder);
        self.next_placeholder -= 1;
        id
    }
}

pub struct ContactsController {
    owner: UserId,
    gateway: Arc<dyn ContactsGateway>,
    notifier: Arc<dyn Notifier>,
    scope: ScreenScope,
    state: Mutex<ContactsState>,
}

impl ContactsController {
    pub fn new(
        owner: UserId,
        gateway: Arc<dyn ContactsGateway>,
        notifier: Arc<dyn Notifier>,
    ) -> Arc<Self> {
        Arc::new(Self {
            owner,
            gateway,
            notifier,
            scope: ScreenScope::new(),
            state: Mutex::new(ContactsState {
                load: LoadState::Idle,
                contacts: CollectionStore::new(),
                draft: DraftHolder::new(),
                is_adding: false,
                form_error: None,
                next_placeholder: -1,
            }),
        })
    }

    /// Populates the store from the backend. Returns the number of contacts loaded.
    pub async fn mount(&self) -> Result<usize, ScreenError> {
        self.state.lock().await.load = LoadState::Loading;

        let fetched = self
            .scope
            .run(self.gateway.fetch_by_owner(self.owner))
            .await;

        let mut state = self.state.lock().await;
        if self.scope.is_unmounted() {
            return Err(ScreenError::Cancelled);
        }
        match fetched {
            Ok(contacts) => {
                let count = contacts.len();
                state.contacts.load(contacts);
                state.load = LoadState::Ready;
                info!(owner = self.owner.0, count, "contacts loaded");
                Ok(count)
            }
            Err(err) => {
                warn!(owner = self.owner.0, error = %err, "failed to load contacts");
                state.load = LoadState::Failed(err.to_string());
                self.notifier.notify_failure(LOAD_FAILED);
                Err(err)
            }
        }
    }

    /// Opens or closes the add form. Returns the new state.
    pub async fn toggle_adding(&self) -> bool {
        let mut state = self.state.lock().await;
        state.is_adding = !state.is_adding;
        state.is_adding
    }

    pub async fn is_adding(&self) -> bool {
        self.state.lock().await.is_adding
    }

    pub async fn edit_draft<F>(&self, change: F)
    where
        F: FnOnce(NewContact) -> NewContact + Send,
    {
        let mut state = self.state.lock().await;
        state.draft.edit(change);
        state.form_error = None;
    }

    /// Validates the draft and creates it.
    ///
    /// Rapid repeated submissions each issue their own create call.
    pub async fn submit(&self) -> Result<Contact, ScreenError> {
        let (draft, placeholder) = {
            let mut state = self.state.lock().await;
            let draft = state.draft.current().clone();
            if let Err(err) = validate_contact(&draft) {
                debug!(error = %err, "contact draft rejected");
                state.form_error = Some(err.clone());
                return Err(err.into());
            }

            let placeholder = state.allocate_placeholder();
            state.contacts.append(draft.with_id(placeholder));
            state.draft.reset();
            state.is_adding = false;
            state.form_error = None;
            (draft, placeholder)
        };

        let created = self
            .scope
            .run(self.gateway.create(self.owner, &draft))
            .await;

        let mut state = self.state.lock().await;
        if self.scope.is_unmounted() {
            return Err(ScreenError::Cancelled);
        }
        match created {
            Ok(contact) => {
                if !state.contacts.replace(placeholder, contact.clone()) {
                    debug!(
                        placeholder = placeholder.0,
                        "pending contact removed before confirmation"
                    );
                }
                info!(id = contact.id.0, "contact created");
                self.notifier.notify_success(CREATE_SUCCEEDED);
                Ok(contact)
            }
            Err(err) => {
                state.contacts.remove(placeholder);
                warn!(error = %err, "failed to create contact");
                let message = match &err {
                    ScreenError::Gateway(gateway) => gateway
                        .server_message()
                        .map(|detail| format!("{CREATE_FAILED}: {detail}")),
                    _ => None,
                };
                self.notifier
                    .notify_failure(message.as_deref().unwrap_or(CREATE_FAILED));
                Err(err)
            }
        }
    }

    /// Drops a contact from the local list only; the backend is not called.
    pub async fn remove(&self, id: ContactId) -> bool {
        let removed = self.state.lock().await.contacts.remove(id);
        debug!(id = id.0, removed, "contact removed locally");
        removed
    }

    pub async fn snapshot(&self) -> ContactsSnapshot {
        let state = self.state.lock().await;
        ContactsSnapshot {
            owner: self.owner,
            load: state.load.clone(),
            contacts: state.contacts.as_slice().to_vec(),
            draft: state.draft.current().clone(),
            is_adding: state.is_adding,
            form_error: state.form_error.clone(),
        }
    }

    pub fn unmount(&self) {
        self.scope.unmount();
    }
}
