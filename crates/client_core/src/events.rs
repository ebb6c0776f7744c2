//! Events screen: the event listing plus event-group management.
//!
//! Every successful mutation is followed by a full re-fetch of both
//! collections instead of a local merge.

use std::sync::Arc;

use futures::future::try_join;
use shared::{
    domain::{Event, EventGroup, EventGroupDraft, EventGroupId, EventId},
    protocol::MutationAck,
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::{
    draft::DraftHolder,
    error::ScreenError,
    gateway::EventsGateway,
    lifecycle::ScreenScope,
    notifier::Notifier,
    state::LoadState,
    store::CollectionStore,
    validation::validate_group_name,
};

const FETCH_FAILED: &str = "Failed to fetch event data";
const CREATE_FAILED: &str = "Failed to create event group";
const UPDATE_FAILED: &str = "Failed to update event group";
const CREATE_SUCCEEDED: &str = "Event group created";
const UPDATE_SUCCEEDED: &str = "Event group updated";

/// What the event detail view is showing.
#[derive(Debug, Clone, PartialEq)]
pub enum EventDetail {
    New,
    Existing(Event),
}

#[derive(Debug, Clone, PartialEq)]
pub enum GroupSubmission {
    Created(MutationAck),
    /// A create was already in flight; nothing was sent.
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupEditView {
    pub id: EventGroupId,
    pub group_name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventsSnapshot {
    pub load: LoadState,
    pub groups: Vec<EventGroup>,
    pub events: Vec<Event>,
    pub new_group_name: String,
    pub editing: Option<GroupEditView>,
    pub is_loading: bool,
    pub detail: Option<EventDetail>,
}

struct EditingGroup {
    id: EventGroupId,
    draft: DraftHolder<EventGroupDraft>,
}

struct EventsState {
    load: LoadState,
    groups: CollectionStore<EventGroup>,
    events: CollectionStore<Event>,
    new_group: DraftHolder<EventGroupDraft>,
    editing: Option<EditingGroup>,
    is_loading: bool,
    detail: Option<EventDetail>,
}

pub struct EventsController {
    gateway: Arc<dyn EventsGateway>,
    notifier: Arc<dyn Notifier>,
    scope: ScreenScope,
    state: Mutex<EventsState>,
}

fn ack_message<'a>(ack: &'a MutationAck, fallback: &'a str) -> &'a str {
    if ack.message.trim().is_empty() {
        fallback
    } else {
        &ack.message
    }
}

impl EventsController {
    pub fn new(gateway: Arc<dyn EventsGateway>, notifier: Arc<dyn Notifier>) -> Arc<Self> {
        Arc::new(Self {
            gateway,
            notifier,
            scope: ScreenScope::new(),
            state: Mutex::new(EventsState {
                load: LoadState::Idle,
                groups: CollectionStore::new(),
                events: CollectionStore::new(),
                new_group: DraftHolder::new(),
                editing: None,
                is_loading: false,
                detail: None,
            }),
        })
    }

    pub async fn mount(&self) -> Result<(), ScreenError> {
        self.refresh().await
    }

    /// Re-fetches groups and events. Both stores are replaced only when both
    /// fetches succeed.
    pub async fn refresh(&self) -> Result<(), ScreenError> {
        self.state.lock().await.load = LoadState::Loading;

        let fetched = self
            .scope
            .run(try_join(
                self.gateway.fetch_all_groups(),
                self.gateway.fetch_all_events(),
            ))
            .await;

        let mut state = self.state.lock().await;
        if self.scope.is_unmounted() {
            return Err(ScreenError::Cancelled);
        }
        match fetched {
            Ok((groups, events)) => {
                info!(groups = groups.len(), events = events.len(), "event data loaded");
                state.groups.load(groups);
                state.events.load(events);
                state.load = LoadState::Ready;
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "failed to fetch event data");
                state.load = LoadState::Failed(err.to_string());
                self.notifier.notify_failure(FETCH_FAILED);
                Err(err)
            }
        }
    }

    pub async fn set_new_group_name(&self, name: impl Into<String>) {
        let name = name.into();
        self.state
            .lock()
            .await
            .new_group
            .edit(|_| EventGroupDraft { group_name: name });
    }

    /// Creates a group from the input field. While a create is in flight
    /// further calls return [`GroupSubmission::Busy`].
    pub async fn add_group(&self) -> Result<GroupSubmission, ScreenError> {
        let draft = {
            let mut state = self.state.lock().await;
            if state.is_loading {
                debug!("event group create already in flight");
                return Ok(GroupSubmission::Busy);
            }
            let draft = state.new_group.current().clone();
            if let Err(err) = validate_group_name(&draft.group_name) {
                self.notifier.notify_failure(&err.to_string());
                return Err(err.into());
            }
            state.is_loading = true;
            draft
        };

        let created = self.scope.run(self.gateway.create_group(&draft)).await;

        {
            let mut state = self.state.lock().await;
            state.is_loading = false;
            if self.scope.is_unmounted() {
                return Err(ScreenError::Cancelled);
            }
            match &created {
                Ok(ack) => {
                    self.notifier
                        .notify_success(ack_message(ack, CREATE_SUCCEEDED));
                    state.new_group.reset();
                }
                Err(err) => {
                    warn!(error = %err, "failed to create event group");
                    self.notifier.notify_failure(CREATE_FAILED);
                }
            }
        }

        let ack = created?;
        info!(group = %draft.group_name, "event group created");
        self.refresh_after_write().await;
        Ok(GroupSubmission::Created(ack))
    }

    /// Opens the single editable row for `id`. Returns `false` if the group is
    /// not in the store.
    pub async fn start_editing(&self, id: EventGroupId) -> bool {
        let mut state = self.state.lock().await;
        let Some(group) = state.groups.get(id) else {
            return false;
        };
        let draft = DraftHolder::seeded(EventGroupDraft {
            group_name: group.group_name.clone(),
        });
        state.editing = Some(EditingGroup { id, draft });
        true
    }

    pub async fn edit_group_name(&self, name: impl Into<String>) -> bool {
        let name = name.into();
        let mut state = self.state.lock().await;
        match state.editing.as_mut() {
            Some(editing) => {
                editing.draft.edit(|_| EventGroupDraft { group_name: name });
                true
            }
            None => false,
        }
    }

    pub async fn cancel_editing(&self) {
        self.state.lock().await.editing = None;
    }

    /// Sends the edited name. Returns `Ok(None)` when no row is being edited.
    pub async fn save_editing(&self) -> Result<Option<MutationAck>, ScreenError> {
        let (id, draft) = {
            let state = self.state.lock().await;
            let Some(editing) = state.editing.as_ref() else {
                return Ok(None);
            };
            let draft = editing.draft.current().clone();
            if let Err(err) = validate_group_name(&draft.group_name) {
                self.notifier.notify_failure(&err.to_string());
                return Err(err.into());
            }
            (editing.id, draft)
        };

        let updated = self
            .scope
            .run(self.gateway.update_group(id, &draft))
            .await;

        {
            let mut state = self.state.lock().await;
            if self.scope.is_unmounted() {
                return Err(ScreenError::Cancelled);
            }
            match &updated {
                Ok(ack) => {
                    self.notifier
                        .notify_success(ack_message(ack, UPDATE_SUCCEEDED));
                    if state.editing.as_ref().is_some_and(|editing| editing.id == id) {
                        state.editing = None;
                    }
                }
                Err(err) => {
                    warn!(id = id.0, error = %err, "failed to update event group");
                    self.notifier.notify_failure(UPDATE_FAILED);
                }
            }
        }

        let ack = updated?;
        info!(id = id.0, "event group updated");
        self.refresh_after_write().await;
        Ok(Some(ack))
    }

    /// Opens the detail view for a stored event.
    pub async fn view_event(&self, id: EventId) -> bool {
        let mut state = self.state.lock().await;
        match state.events.get(id).cloned() {
            Some(event) => {
                state.detail = Some(EventDetail::Existing(event));
                true
            }
            None => false,
        }
    }

    pub async fn open_new_event(&self) {
        self.state.lock().await.detail = Some(EventDetail::New);
    }

    pub async fn close_event(&self) {
        self.state.lock().await.detail = None;
    }

    pub async fn snapshot(&self) -> EventsSnapshot {
        let state = self.state.lock().await;
        EventsSnapshot {
            load: state.load.clone(),
            groups: state.groups.as_slice().to_vec(),
            events: state.events.as_slice().to_vec(),
            new_group_name: state.new_group.current().group_name.clone(),
            editing: state.editing.as_ref().map(|editing| GroupEditView {
                id: editing.id,
                group_name: editing.draft.current().group_name.clone(),
            }),
            is_loading: state.is_loading,
            detail: state.detail.clone(),
        }
    }

    pub fn unmount(&self) {
        self.scope.unmount();
    }

    // The write already succeeded; a failed re-fetch has been reported by `refresh`.
    async fn refresh_after_write(&self) {
        if let Err(err) = self.refresh().await {
            debug!(error = %err, "re-fetch after write failed");
        }
    }
}
