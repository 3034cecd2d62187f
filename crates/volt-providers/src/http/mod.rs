//! HTTP Transport Stack
//!
//! An HTTP service receives an [`HttpClient`] whose transport is built as an
//! explicit, ordered list of decorators over a reqwest base transport:
//!
//! ```text
//! base (reqwest) -> tracing (host supplied) -> retry -> default headers
//! ```
//!
//! Each decorator is a function from one [`SharedTransport`] to another;
//! [`TransportStack`] applies them in order when the client is materialized.

pub mod base;
pub mod client;
pub mod headers;
pub mod retry;
pub mod transport;

pub use base::ReqwestTransport;
pub use client::HttpClient;
pub use headers::HeaderTransport;
pub use retry::{RetryPolicy, RetryTransport};
pub use transport::{HttpTransport, SharedTransport, TransportLayer, TransportStack};
