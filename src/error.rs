//! Unified error types for otm-tools.
//!
//! This module provides the error hierarchy for the transformation engine,
//! split by the failure categories of the design: structural graph errors are
//! fatal to a run, mapping and strategy conditions are accumulated, and upload
//! failures are kept distinct from transformation failures.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for otm-tools operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum OtmError {
    /// Structural errors while building or querying the dependency graph.
    /// These are fatal to the current transformation run.
    #[error("Graph construction failed: {context}")]
    Graph {
        context: String,
        #[source]
        source: GraphErrorKind,
    },

    /// Errors in mapping rules or escalated unmapped-resource reports
    #[error("Mapping failed: {context}")]
    Mapping {
        context: String,
        #[source]
        source: MappingErrorKind,
    },

    /// Errors while uploading a finished OTM document. Never affects the
    /// already-produced local document.
    #[error("Upload failed: {context}")]
    Upload {
        context: String,
        #[source]
        source: UploadErrorKind,
    },

    /// IO errors with path context
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Configuration errors
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Validation errors
    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Structural graph error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GraphErrorKind {
    #[error("Duplicate resource id: {id}")]
    DuplicateResource { id: String },

    #[error("Edge {source_id} -> {target_id} references unknown resource: {unknown}")]
    UnknownResource {
        unknown: String,
        source_id: String,
        target_id: String,
    },
}

/// Mapping error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum MappingErrorKind {
    #[error("Invalid type pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("Malformed mapping file: {0}")]
    RuleFile(String),

    #[error("{count} resources matched no mapping rule")]
    UnmappedResources { count: usize },
}

/// Upload error kinds
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum UploadErrorKind {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Server rejected import with status {status}")]
    Rejected { status: u16 },

    #[error("Invalid server response: {0}")]
    InvalidResponse(String),
}

// ============================================================================
// Result type alias
// ============================================================================

/// Convenient Result type for otm-tools operations
pub type Result<T> = std::result::Result<T, OtmError>;

// ============================================================================
// Error construction helpers
// ============================================================================

impl OtmError {
    /// Create a graph error with context
    pub fn graph(context: impl Into<String>, source: GraphErrorKind) -> Self {
        Self::Graph {
            context: context.into(),
            source,
        }
    }

    /// Create a mapping error with context
    pub fn mapping(context: impl Into<String>, source: MappingErrorKind) -> Self {
        Self::Mapping {
            context: context.into(),
            source,
        }
    }

    /// Create an upload error with context
    pub fn upload(context: impl Into<String>, source: UploadErrorKind) -> Self {
        Self::Upload {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

// ============================================================================
// Conversions from existing error types
// ============================================================================

impl From<std::io::Error> for OtmError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for OtmError {
    fn from(err: serde_json::Error) -> Self {
        Self::Validation(format!("JSON deserialization: {err}"))
    }
}

impl From<serde_yaml::Error> for OtmError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::mapping(
            "YAML deserialization",
            MappingErrorKind::RuleFile(err.to_string()),
        )
    }
}

// ============================================================================
// Error context extension trait
// ============================================================================

/// Extension trait for adding context to errors.
///
/// The context string is prepended to the error's existing context, creating
/// a chain that shows the path through the code.
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure (lazy evaluation).
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<OtmError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: OtmError, new_ctx: &str) -> OtmError {
    match err {
        OtmError::Graph {
            context: existing,
            source,
        } => OtmError::Graph {
            context: chain_context(new_ctx, &existing),
            source,
        },
        OtmError::Mapping {
            context: existing,
            source,
        } => OtmError::Mapping {
            context: chain_context(new_ctx, &existing),
            source,
        },
        OtmError::Upload {
            context: existing,
            source,
        } => OtmError::Upload {
            context: chain_context(new_ctx, &existing),
            source,
        },
        OtmError::Io {
            path,
            message,
            source,
        } => OtmError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        OtmError::Config(msg) => OtmError::Config(chain_context(new_ctx, &msg)),
        OtmError::Validation(msg) => OtmError::Validation(chain_context(new_ctx, &msg)),
    }
}

/// Chain two context strings together.
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = OtmError::graph(
            "building from snapshot",
            GraphErrorKind::DuplicateResource {
                id: "aws_instance.web".to_string(),
            },
        );
        let display = err.to_string();
        assert!(
            display.contains("Graph"),
            "Error message should mention the graph: {}",
            display
        );

        let err = OtmError::mapping(
            "rule file",
            MappingErrorKind::InvalidPattern {
                pattern: "aws_[".to_string(),
                reason: "unclosed character class".to_string(),
            },
        );
        assert!(err.to_string().contains("Mapping"));
    }

    #[test]
    fn test_structural_errors_carry_identifiers() {
        let err = GraphErrorKind::UnknownResource {
            unknown: "aws_subnet.private".to_string(),
            source_id: "aws_instance.web".to_string(),
            target_id: "aws_subnet.private".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("aws_subnet.private"));
        assert!(display.contains("aws_instance.web"));
    }

    #[test]
    fn test_io_error_keeps_path() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err = OtmError::io("/path/to/plan.json", io_err);

        assert!(err.to_string().contains("/path/to/plan.json"));
    }

    #[test]
    fn test_context_chaining() {
        let initial: Result<()> = Err(OtmError::mapping(
            "initial context",
            MappingErrorKind::RuleFile("bad".to_string()),
        ));

        let with_context = initial.context("outer context");

        match with_context {
            Err(OtmError::Mapping { context, .. }) => {
                assert!(context.contains("outer context"), "{}", context);
                assert!(context.contains("initial context"), "{}", context);
            }
            _ => panic!("Expected Mapping error"),
        }
    }

    #[test]
    fn test_with_context_lazy_evaluation() {
        let mut called = false;

        let ok_result: Result<i32> = Ok(42);
        let _ = ok_result.with_context(|| {
            called = true;
            "should not be called"
        });
        assert!(!called, "Closure should not be called for Ok result");

        let err_result: Result<i32> = Err(OtmError::validation("error"));
        let _ = err_result.with_context(|| {
            called = true;
            "should be called"
        });
        assert!(called, "Closure should be called for Err result");
    }

    #[test]
    fn test_chain_context_helper() {
        assert_eq!(chain_context("new", ""), "new");
        assert_eq!(chain_context("new", "existing"), "new: existing");
        assert_eq!(
            chain_context("outer", "middle: inner"),
            "outer: middle: inner"
        );
    }
}
