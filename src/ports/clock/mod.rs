use std::time::SystemTime;

/// Port for the time source used in TTL arithmetic.
///
/// Injected so tests can drive expiry deterministically instead of sleeping.
pub trait Clock: Send + Sync + 'static {
    fn now(&self) -> SystemTime;
}
