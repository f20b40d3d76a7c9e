//! Structured error types shared across mlnet crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`MlnError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (labels, arities, aspect indices).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for multilayer network operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum MlnError {
    /// Index arity does not match the aspect count of the network.
    #[error("shape error: {0}")]
    Shape(ErrorInfo),
    /// Attempt to store an inter-layer edge in a multiplex network.
    #[error("coupling error: {0}")]
    Coupling(ErrorInfo),
    /// Copy between incompatible interconnectivity modes or network kinds.
    #[error("interconnectivity error: {0}")]
    Interconnectivity(ErrorInfo),
    /// Inconsistent subgraph requirement or sampling specification.
    #[error("requirement error: {0}")]
    Requirement(ErrorInfo),
    /// No registered isomorphism backend provides the requested capability.
    #[error("backend missing: {0}")]
    BackendMissing(ErrorInfo),
    /// A metric had a zero denominator and no sentinel was supplied.
    #[error("undefined metric: {0}")]
    UndefinedMetric(ErrorInfo),
    /// The requested regime is not implemented.
    #[error("unsupported: {0}")]
    Unsupported(ErrorInfo),
    /// A caller supplied callback aborted the traversal.
    #[error("cancelled: {0}")]
    Cancelled(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl MlnError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            MlnError::Shape(info)
            | MlnError::Coupling(info)
            | MlnError::Interconnectivity(info)
            | MlnError::Requirement(info)
            | MlnError::BackendMissing(info)
            | MlnError::UndefinedMetric(info)
            | MlnError::Unsupported(info)
            | MlnError::Cancelled(info) => info,
        }
    }

    /// Returns the stable error code of the payload.
    pub fn code(&self) -> &str {
        &self.info().code
    }

    /// Shorthand for a [`MlnError::Shape`] error.
    pub fn shape(code: impl Into<String>, message: impl Into<String>) -> Self {
        MlnError::Shape(ErrorInfo::new(code, message))
    }

    /// Shorthand for a [`MlnError::Coupling`] error.
    pub fn coupling(code: impl Into<String>, message: impl Into<String>) -> Self {
        MlnError::Coupling(ErrorInfo::new(code, message))
    }

    /// Shorthand for a [`MlnError::Interconnectivity`] error.
    pub fn interconnectivity(code: impl Into<String>, message: impl Into<String>) -> Self {
        MlnError::Interconnectivity(ErrorInfo::new(code, message))
    }

    /// Shorthand for a [`MlnError::Requirement`] error.
    pub fn requirement(code: impl Into<String>, message: impl Into<String>) -> Self {
        MlnError::Requirement(ErrorInfo::new(code, message))
    }

    /// Shorthand for a [`MlnError::Unsupported`] error.
    pub fn unsupported(code: impl Into<String>, message: impl Into<String>) -> Self {
        MlnError::Unsupported(ErrorInfo::new(code, message))
    }

    /// Adds a context entry to the payload, keeping the error family.
    pub fn with_context(self, key: impl Into<String>, value: impl ToString) -> Self {
        self.map_info(|info| info.with_context(key, value))
    }

    /// Sets the remediation hint, keeping the error family.
    pub fn with_hint(self, hint: impl Into<String>) -> Self {
        self.map_info(|info| info.with_hint(hint))
    }

    fn map_info(self, f: impl FnOnce(ErrorInfo) -> ErrorInfo) -> Self {
        match self {
            MlnError::Shape(info) => MlnError::Shape(f(info)),
            MlnError::Coupling(info) => MlnError::Coupling(f(info)),
            MlnError::Interconnectivity(info) => MlnError::Interconnectivity(f(info)),
            MlnError::Requirement(info) => MlnError::Requirement(f(info)),
            MlnError::BackendMissing(info) => MlnError::BackendMissing(f(info)),
            MlnError::UndefinedMetric(info) => MlnError::UndefinedMetric(f(info)),
            MlnError::Unsupported(info) => MlnError::Unsupported(f(info)),
            MlnError::Cancelled(info) => MlnError::Cancelled(f(info)),
        }
    }
}
