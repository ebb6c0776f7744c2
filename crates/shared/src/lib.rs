//! Domain records and wire shapes shared by the admin console client crates.

pub mod domain;
pub mod error;
pub mod protocol;
