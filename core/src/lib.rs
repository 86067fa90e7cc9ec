//! Blocking client for the PayWhirl subscription-billing REST API.
//!
//! # Overview
//! Every endpoint method builds an authenticated request, sends it through a
//! `Transport` and normalizes the outcome into a `Reply`: decoded JSON for a
//! 200 response, the raw status otherwise. Failures that produce no response
//! at all (timeouts, refused connections) are `ApiError`s.
//!
//! ```no_run
//! use paywhirl_core::{ListQuery, PayWhirl, Reply};
//!
//! let client = PayWhirl::new("<api key>", "<api secret>");
//! let query = ListQuery { limit: Some(2), ..Default::default() };
//! match client.get_customers(&query)? {
//!     Reply::Data(customers) => println!("{customers}"),
//!     Reply::Status { code, .. } => eprintln!("PayWhirl answered {code}"),
//! }
//! # Ok::<(), paywhirl_core::ApiError>(())
//! ```
//!
//! # Design
//! - `PayWhirl` is immutable after construction: credentials, base URL and
//!   timeout are fixed, and the transport is shared behind an `Arc`.
//! - Request building and response parsing are pure (`build_request`,
//!   `parse_response`); only `Transport::execute` performs I/O, so tests can
//!   swap in a recording transport.
//! - Endpoints are a declarative table in `endpoint`; client methods only
//!   shape parameters and pick an entry.
//! - Parameters always travel on the query string, POST included, which is
//!   what the remote API expects.

pub mod client;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod params;
pub mod transport;
pub mod types;

pub use client::{
    Credentials, PayWhirl, PayWhirlBuilder, Reply, DEFAULT_BASE_URL, DEFAULT_QUESTION_LIMIT,
    DEFAULT_TIMEOUT,
};
pub use endpoint::{Endpoint, ParamShape, ENDPOINTS};
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use params::Params;
pub use transport::{Transport, UreqTransport};
pub use types::{
    ListQuery, NewCustomer, NewSubscription, OrderDirection, SubscriberOrder, SubscriberQuery,
};
