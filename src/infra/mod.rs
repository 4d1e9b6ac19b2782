pub mod http;
pub mod svn;
