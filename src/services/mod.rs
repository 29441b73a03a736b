mod content_store_impl;

pub use content_store_impl::ContentStoreImpl;
