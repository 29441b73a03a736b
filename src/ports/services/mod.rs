mod content_store;

pub use content_store::{BatchOutcome, ContentStore, SearchOutcome};
