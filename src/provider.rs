//! Provider registry.
//!
//! A closed, versioned table of source-technology descriptors. The
//! surrounding CLI/loader layer uses it to pick a parser and to stamp
//! provenance on the output document; the core only consumes a descriptor's
//! key and category. Adding a provider means adding a descriptor here and a
//! parser/loader pair elsewhere — the transformation logic never changes.

use std::fmt;

/// Category of a source technology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderCategory {
    /// Infrastructure-as-code sources (Terraform, CloudFormation)
    Code,
    /// Architecture diagrams
    Diagram,
    /// Exports from other threat-modeling tools
    ThreatModelExport,
}

impl ProviderCategory {
    /// The OTM representation type tag for this category.
    pub const fn as_otm_str(&self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Diagram => "diagram",
            Self::ThreatModelExport => "threat-model",
        }
    }
}

impl fmt::Display for ProviderCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_otm_str())
    }
}

/// Static descriptor for one source technology.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderDescriptor {
    /// Registry key (uppercase, stable)
    pub key: &'static str,
    /// Human-readable label
    pub label: &'static str,
    pub category: ProviderCategory,
}

/// The closed provider set.
pub const PROVIDERS: &[ProviderDescriptor] = &[
    ProviderDescriptor {
        key: "CLOUDFORMATION",
        label: "CloudFormation",
        category: ProviderCategory::Code,
    },
    ProviderDescriptor {
        key: "TERRAFORM",
        label: "Terraform",
        category: ProviderCategory::Code,
    },
    ProviderDescriptor {
        key: "TFPLAN",
        label: "Terraform Plan",
        category: ProviderCategory::Code,
    },
    ProviderDescriptor {
        key: "VISIO",
        label: "Visio",
        category: ProviderCategory::Diagram,
    },
    ProviderDescriptor {
        key: "MTMT",
        label: "Microsoft Threat Model",
        category: ProviderCategory::ThreatModelExport,
    },
];

/// Look up a descriptor by key, case-insensitively.
pub fn lookup(key: &str) -> Option<&'static ProviderDescriptor> {
    PROVIDERS.iter().find(|p| p.key.eq_ignore_ascii_case(key))
}

/// All descriptors in a category, in registry order.
pub fn by_category(category: ProviderCategory) -> Vec<&'static ProviderDescriptor> {
    PROVIDERS.iter().filter(|p| p.category == category).collect()
}
