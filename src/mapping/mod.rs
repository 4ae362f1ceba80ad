//! Mapping-driven classification of raw resources into OTM component types.

pub mod mapper;
pub mod rules;

pub use mapper::{MappedModel, ResourceMapper, UnmappedPolicy, UnmappedResource};
pub use rules::{AttributePredicate, MappingRule, MappingRuleSet};
