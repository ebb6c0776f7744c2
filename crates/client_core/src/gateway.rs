//! Outbound REST calls to the administrative backend.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Contact, Event, EventGroup, EventGroupDraft, EventGroupId, NewContact, UserId},
    error::ApiError,
    protocol::{strip_data_envelope, CreateContactRequest, MutationAck, OneOrMany},
};
use tracing::debug;
use url::Url;

use crate::error::GatewayError;

pub type GatewayResult<T> = Result<T, GatewayError>;

#[async_trait]
pub trait ContactsGateway: Send + Sync {
    /// Every contact owned by `owner`, whether the backend answers with one
    /// record or many.
    async fn fetch_by_owner(&self, owner: UserId) -> GatewayResult<Vec<Contact>>;
    async fn create(&self, owner: UserId, draft: &NewContact) -> GatewayResult<Contact>;
}

#[async_trait]
pub trait EventsGateway: Send + Sync {
    async fn fetch_all_events(&self) -> GatewayResult<Vec<Event>>;
    async fn fetch_all_groups(&self) -> GatewayResult<Vec<EventGroup>>;
    async fn create_group(&self, draft: &EventGroupDraft) -> GatewayResult<MutationAck>;
    async fn update_group(
        &self,
        id: EventGroupId,
        draft: &EventGroupDraft,
    ) -> GatewayResult<MutationAck>;
}

pub struct RestGateway {
    http: Client,
    base_url: Url,
}

impl RestGateway {
    pub fn new(base_url: &str, timeout: Duration) -> GatewayResult<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(GatewayError::Transport)?;
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> GatewayResult<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> GatewayResult<T> {
        let response = ensure_success(response).await?;
        let body: serde_json::Value = response.json().await?;
        Ok(serde_json::from_value(strip_data_envelope(body))?)
    }
}

/// A successful write may answer with an empty body (e.g. 204).
async fn read_ack(response: Response) -> GatewayResult<MutationAck> {
    let response = ensure_success(response).await?;
    let body = response.bytes().await?;
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(MutationAck::default());
    }
    Ok(serde_json::from_slice(&body)?)
}

/// Ensures the base url ends with `/` so relative joins keep its path.
fn normalize_base_url(raw: &str) -> GatewayResult<Url> {
    let trimmed = raw.trim();
    if trimmed.ends_with('/') {
        Ok(Url::parse(trimmed)?)
    } else {
        Ok(Url::parse(&format!("{trimmed}/"))?)
    }
}

async fn ensure_success(response: Response) -> GatewayResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = response
        .text()
        .await
        .ok()
        .and_then(|body| serde_json::from_str::<ApiError>(&body).ok())
        .map(|err| err.message)
        .filter(|message| !message.is_empty());
    Err(GatewayError::Status {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl ContactsGateway for RestGateway {
    async fn fetch_by_owner(&self, owner: UserId) -> GatewayResult<Vec<Contact>> {
        let url = self.endpoint(&format!("users/{owner}/contacts"))?;
        debug!(%url, "fetching contacts");
        let response = self.http.get(url).send().await?;
        let contacts: OneOrMany<Contact> = Self::read_json(response).await?;
        Ok(contacts.into_vec())
    }

    async fn create(&self, owner: UserId, draft: &NewContact) -> GatewayResult<Contact> {
        let url = self.endpoint("contacts")?;
        debug!(%url, owner = owner.0, "creating contact");
        let response = self
            .http
            .post(url)
            .json(&CreateContactRequest::new(owner, draft))
            .send()
            .await?;
        Self::read_json(response).await
    }
}

#[async_trait]
impl EventsGateway for RestGateway {
    async fn fetch_all_events(&self) -> GatewayResult<Vec<Event>> {
        let url = self.endpoint("events")?;
        debug!(%url, "fetching events");
        let response = self.http.get(url).send().await?;
        Self::read_json(response).await
    }

    async fn fetch_all_groups(&self) -> GatewayResult<Vec<EventGroup>> {
        let url = self.endpoint("event-groups")?;
        debug!(%url, "fetching event groups");
        let response = self.http.get(url).send().await?;
        Self::read_json(response).await
    }

    async fn create_group(&self, draft: &EventGroupDraft) -> GatewayResult<MutationAck> {
        let url = self.endpoint("event-groups")?;
        debug!(%url, "creating event group");
        let response = self.http.post(url).json(draft).send().await?;
        read_ack(response).await
    }

    async fn update_group(
        &self,
        id: EventGroupId,
        draft: &EventGroupDraft,
    ) -> GatewayResult<MutationAck> {
        let url = self.endpoint(&format!("event-groups/{id}"))?;
        debug!(%url, "updating event group");
        let response = self.http.put(url).json(draft).send().await?;
        read_ack(response).await
    }
}
