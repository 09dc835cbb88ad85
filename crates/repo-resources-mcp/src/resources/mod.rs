//! Repository files exposed as resources.

pub mod registry;

pub use registry::ResourceRegistry;
