//! Linkfix Rust SDK
//!
//! Blocking client for the items REST API of a requirements-management
//! instance, implementing `linkfix_domain::ItemRepository`.
//!
//! # Example
//!
//! ```no_run
//! use linkfix_domain::{ItemRepository, ProjectId};
//! use linkfix_sdk::{ClientOptions, Credentials, RestClient};
//!
//! let client = RestClient::new(
//!     "https://acme.example.com",
//!     Credentials::Basic {
//!         username: "alice".to_string(),
//!         password: "secret".to_string(),
//!     },
//!     ClientOptions::default(),
//! )
//! .expect("Failed to build client");
//! client.connect().expect("Failed to authenticate");
//!
//! let items = client.list_items(ProjectId::new(7)).expect("Failed to list items");
//! println!("{} items", items.len());
//! ```

#![warn(missing_docs)]

mod client;
mod error;
mod mock;
mod wire;

pub use client::{ClientOptions, Credentials, RestClient, DEFAULT_PAGE_SIZE, DEFAULT_TIMEOUT_SECS};
pub use error::SdkError;
pub use mock::MockRepository;
