pub mod clock;
pub mod credentials;
pub mod transport;
