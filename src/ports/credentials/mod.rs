mod credential_store;

pub use credential_store::{CredentialStore, USER_ACCOUNT};
