//! Repository session state.

pub mod manager;

pub use manager::{InitializeMode, RepoSessionManager};
