//! Blocking HTTP transport.
//!
//! One request per call: the connection is opened for the request and
//! released when the response has been read, on every exit path.

mod http;

pub use http::{
    HttpSend, HttpTransport, Method, OutboundRequest, RawResponse, TransportConfig,
    TransportError,
};
