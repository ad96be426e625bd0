//! Client SDK for the game backend's server API.
//!
//! # Overview
//! Every operation (matchmaking, player data, inventory, statistics, title
//! data) is one JSON POST to a fixed path, authenticated by the title's
//! secret key. `ServerClient` exposes each as a typed method; all of them go
//! through a single generic [`Invoker`].
//!
//! # Design
//! - `Invoker` splits each call into `build_request` → `Transport::execute`
//!   → `parse_response`, keeping request building and envelope decoding
//!   free of I/O.
//! - Every call returns `ApiResult<T>`; remote error envelopes are also
//!   reported to an optional handler injected at construction.
//! - Blocking and async call styles share one code path; the async form runs
//!   the blocking call on Tokio's blocking pool.
//!
//! ```no_run
//! use gameserver_core::{GetTitleDataRequest, ServerClient, Settings};
//!
//! # fn main() -> Result<(), gameserver_core::ApiError> {
//! let client = ServerClient::new(Settings::from_env()?)
//!     .with_error_handler(|err| eprintln!("backend error: {err}"));
//! let titles = client.get_title_data(&GetTitleDataRequest {
//!     keys: Some(vec!["motd".to_string()]),
//! })?;
//! println!("{:?}", titles.data.get("motd"));
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod envelope;
pub mod error;
pub mod http;
pub mod invoker;
pub mod models;
pub mod settings;
pub mod transport;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use client::{Operation, ServerClient, OPERATIONS};
pub use error::{ApiError, ApiResult, RemoteError, TransportError};
pub use http::{HttpRequest, HttpResponse};
pub use invoker::{ErrorHandler, Invoker};
pub use models::*;
pub use settings::Settings;
pub use transport::{Transport, UreqTransport};
