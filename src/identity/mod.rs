//! Handle to display identity resolution against the remote people directories.

pub mod resolver;
pub mod scan;
pub mod sources;
pub mod tokenizer;

pub use resolver::IdentityResolver;
