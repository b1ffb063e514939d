//! Storage adapters - purchased file delivery.

mod local_files;

pub use local_files::LocalBookFileStore;
