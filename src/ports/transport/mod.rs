mod http_transport;

pub use http_transport::{AuthEvent, QueryParams, Transport, TransportBody};
