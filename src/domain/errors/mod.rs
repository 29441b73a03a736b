mod store_errors;

pub use store_errors::*;
