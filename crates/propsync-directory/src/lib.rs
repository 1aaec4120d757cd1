//! Directory service client.
//!
//! Typed access to the remote directory that holds sites, people, devices and
//! groups. The [`DirectoryClient`] trait is the seam the reconciliation engine
//! depends on; [`HttpDirectoryClient`] is the reqwest-backed implementation
//! used by the CLI.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod traits;

pub use auth::Credentials;
pub use client::HttpDirectoryClient;
pub use config::DirectoryConfig;
pub use error::{DirectoryError, DirectoryResult, ErrorBody};
pub use models::{
    Device, EntityKind, Group, GroupMember, GroupMemberList, NewEmailDevice, NewGroup, NewPerson,
    NewRosterMember, NewSite, Page, Person, Recipient, Reference, Role, RosterMember, Site,
};
pub use traits::DirectoryClient;
