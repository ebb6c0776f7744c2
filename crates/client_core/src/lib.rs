//! Screen controllers for the admin console: contacts and events/event-groups
//! records backed by a REST gateway.

pub mod contacts;
pub mod draft;
pub mod error;
pub mod events;
pub mod gateway;
pub mod lifecycle;
pub mod notifier;
pub mod state;
pub mod store;
pub mod validation;

pub use contacts::{ContactsController, ContactsSnapshot};
pub use error::{GatewayError, ScreenError};
pub use events::{EventDetail, EventsController, EventsSnapshot, GroupEditView, GroupSubmission};
pub use gateway::{ContactsGateway, EventsGateway, RestGateway};
pub use notifier::{BroadcastNotifier, Notifier, Toast, ToastLevel};
pub use state::LoadState;

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod validation_tests;

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod store_tests;

#[cfg(test)]
#[path = "tests/gateway_tests.rs"]
mod gateway_tests;

#[cfg(test)]
#[path = "tests/contacts_tests.rs"]
mod contacts_tests;

#[cfg(test)]
#[path = "tests/events_tests.rs"]
mod events_tests;

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;
