//! Mapping rules: ordered `(type pattern, OTM component type, predicates)`
//! tuples loaded from mapping definition files.
//!
//! Rules are evaluated in declaration order with first-match-wins semantics.
//! When multiple mapping files are supplied, later files' rules are appended
//! after earlier ones, so earlier files take precedence.

use std::path::Path;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::error::{ErrorContext, MappingErrorKind, OtmError, Result};
use crate::model::Resource;

/// Predicate over a resource's configuration attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributePredicate {
    /// The attribute is present, whatever its value
    Exists { attribute: String },
    /// The attribute equals the given value
    Equals {
        attribute: String,
        value: serde_json::Value,
    },
}

impl AttributePredicate {
    /// Evaluate against a resource's attribute map.
    pub fn matches(&self, resource: &Resource) -> bool {
        match self {
            Self::Exists { attribute } => resource.attributes.contains_key(attribute),
            Self::Equals { attribute, value } => {
                resource.attributes.get(attribute) == Some(value)
            }
        }
    }
}

/// One mapping rule as declared in a mapping file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappingRule {
    /// Source type pattern: an exact type tag or a glob with `*`
    #[serde(rename = "type")]
    pub pattern: String,
    /// OTM component type assigned on match
    pub otm_type: String,
    /// All predicates must hold for the rule to match
    #[serde(default, rename = "when", skip_serializing_if = "Vec::is_empty")]
    pub predicates: Vec<AttributePredicate>,
}

impl MappingRule {
    pub fn new(pattern: impl Into<String>, otm_type: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            otm_type: otm_type.into(),
            predicates: Vec::new(),
        }
    }

    /// Attach a predicate.
    #[must_use]
    pub fn with_predicate(mut self, predicate: AttributePredicate) -> Self {
        self.predicates.push(predicate);
        self
    }
}

/// On-disk mapping file shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct MappingFile {
    #[serde(default)]
    components: Vec<MappingRule>,
}

/// A rule with its compiled pattern.
#[derive(Debug)]
struct CompiledRule {
    rule: MappingRule,
    /// Present only for glob patterns; exact patterns compare directly
    regex: Option<Regex>,
}

impl CompiledRule {
    fn compile(rule: MappingRule) -> Result<Self> {
        let regex = if rule.pattern.contains('*') {
            // Glob to anchored regex: escape everything but `*`
            let escaped = rule
                .pattern
                .split('*')
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(".*");
            let compiled = RegexBuilder::new(&format!("^{escaped}$"))
                .case_insensitive(true)
                .build()
                .map_err(|e| {
                    OtmError::mapping(
                        "compiling type pattern",
                        MappingErrorKind::InvalidPattern {
                            pattern: rule.pattern.clone(),
                            reason: e.to_string(),
                        },
                    )
                })?;
            Some(compiled)
        } else {
            None
        };
        Ok(Self { rule, regex })
    }

    fn matches(&self, resource: &Resource) -> bool {
        let type_matches = match &self.regex {
            Some(re) => re.is_match(&resource.resource_type),
            None => self.rule.pattern.eq_ignore_ascii_case(&resource.resource_type),
        };
        type_matches && self.rule.predicates.iter().all(|p| p.matches(resource))
    }
}

/// Ordered, compiled rule list with first-match-wins evaluation.
#[derive(Debug, Default)]
pub struct MappingRuleSet {
    rules: Vec<CompiledRule>,
}

impl MappingRuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile an ordered rule list.
    pub fn from_rules(rules: Vec<MappingRule>) -> Result<Self> {
        let mut set = Self::new();
        set.append(rules)?;
        Ok(set)
    }

    /// Parse one YAML mapping definition.
    pub fn from_yaml(content: &str) -> Result<Self> {
        let mut set = Self::new();
        set.append_yaml(content)?;
        Ok(set)
    }

    /// Load one or more mapping files, appending rules in supply order so
    /// earlier files win ties under first-match evaluation.
    pub fn from_files<P: AsRef<Path>>(paths: &[P]) -> Result<Self> {
        let mut set = Self::new();
        for path in paths {
            let path = path.as_ref();
            let content = std::fs::read_to_string(path)
                .map_err(|e| OtmError::io(path.to_path_buf(), e))?;
            set.append_yaml(&content)
                .with_context(|| format!("loading mapping file {}", path.display()))?;
        }
        Ok(set)
    }

    /// Append rules after the existing ones.
    pub fn append(&mut self, rules: Vec<MappingRule>) -> Result<()> {
        for rule in rules {
            self.rules.push(CompiledRule::compile(rule)?);
        }
        Ok(())
    }

    /// Append rules from a parsed YAML document.
    pub fn append_yaml(&mut self, content: &str) -> Result<()> {
        let de = serde_yaml::Deserializer::from_str(content);
        let file: MappingFile = serde_yaml::with::singleton_map_recursive::deserialize(de)?;
        self.append(file.components)
    }

    /// First rule matching the resource, in declaration order.
    pub fn match_resource(&self, resource: &Resource) -> Option<&MappingRule> {
        self.rules
            .iter()
            .find(|r| r.matches(resource))
            .map(|r| &r.rule)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
