mod in_memory_transport;
mod reqwest_transport;

pub use in_memory_transport::InMemoryTransport;
pub use reqwest_transport::HttpTransport;
