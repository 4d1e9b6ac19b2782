pub mod directory;
pub mod history_source;
pub mod identity;

pub use directory::DirectoryService;
pub use history_source::HistorySource;
pub use identity::IdentityService;
