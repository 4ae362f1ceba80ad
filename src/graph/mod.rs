//! Dependency graph of infrastructure resources and the read-only query
//! layer strategies consume.

pub mod dependency;
pub mod extractor;

pub use dependency::DependencyGraph;
pub use extractor::RelationshipExtractor;
