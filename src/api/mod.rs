//! HTTP API handlers and their shared error/extractor plumbing.
pub mod error;
pub mod extract;
pub mod listing;
pub mod options;
pub mod surveys;
pub mod system;
pub mod votes;
