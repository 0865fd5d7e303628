//! HTTP transport shared by every remote provider.

mod http;

pub use http::{HttpReply, HttpTransport, TransportError, POOL_MAX_IDLE_ENV, PROXY_URL_ENV};
