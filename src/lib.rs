//! DefectDojo API client library.
//!
//! A Rust binding for the DefectDojo v2 REST API. Every resource method
//! funnels through a single dispatcher and returns a uniform
//! [`DojoResponse`] envelope: HTTP errors, transport failures and decode
//! failures are all reported through the envelope rather than raised, so
//! callers inspect `success` and `message` instead of matching on error
//! types.
//!
//! # Quick Start
//!
//! ```no_run
//! use dojoapi::{DojoClient, NewProduct, UserQuery};
//!
//! #[tokio::main]
//! async fn main() -> dojoapi::Result<()> {
//!     // Create client from environment variables
//!     let client = DojoClient::from_env()?;
//!
//!     // List users
//!     let users = client.list_users(&UserQuery::default()).await;
//!     println!("{} users", users.count().unwrap_or(0));
//!
//!     // Create a product; the id comes from the Location header
//!     let created = client
//!         .create_product(&NewProduct::new("Demo", "A demo product", 1))
//!         .await;
//!     if created.success {
//!         println!("created product {}", created.id()?);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - [`DojoClient`] holds the immutable configuration (base URL,
//!   credentials, network policy) and the connection pool; it is cheaply
//!   cloneable and safe to share across tasks.
//! - [`DojoClient::dispatch`] issues one HTTP request and maps the raw
//!   outcome onto a [`DojoResponse`]; it never fails.
//! - The resource methods (users, products, engagements, tests, findings,
//!   scans, ...) are thin parameter-shaping wrappers over `dispatch`.
//!   Response payloads stay opaque JSON.
//!
//! # Configuration
//!
//! [`DojoClient::from_env`] reads:
//!
//! - `DOJO_HOST` (required) - Server address
//! - `DOJO_API_TOKEN` (required) - API token
//! - `DOJO_USER` (optional) - User tied to the token (legacy v1 scheme)

mod client;
mod error;
mod resources;
mod response;

// Re-export core types
pub use client::{DojoClient, DojoClientBuilder};
pub use error::{DojoError, Result};
pub use response::{DojoResponse, NO_RESPONSE};

// Re-export resource parameter types
pub use resources::*;
