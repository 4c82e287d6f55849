//! Control-endpoint transport.

mod http;

pub use http::{CONNECT_TIMEOUT, HttpConnector, HttpTransport};
