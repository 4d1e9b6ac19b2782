pub mod identity;
pub mod revision;
