mod in_memory_credential_store;

pub use in_memory_credential_store::InMemoryCredentialStore;
