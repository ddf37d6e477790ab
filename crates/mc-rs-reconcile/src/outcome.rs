//! Results that can succeed with non-fatal warnings attached.

use std::fmt;

use crate::client::ClientError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WarningKind {
    /// A compensating or secondary delete failed.
    Compensation,
    /// A captured previous value could not be re-applied.
    Restore,
    /// The previous value could not be captured before a change.
    Snapshot,
    /// A live read failed; stored state was kept.
    Refresh,
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WarningKind::Compensation => "compensation",
            WarningKind::Restore => "restore",
            WarningKind::Snapshot => "snapshot",
            WarningKind::Refresh => "refresh",
        })
    }
}

/// A failure that was downgraded instead of failing the operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

impl Warning {
    pub fn new(kind: WarningKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn from_error(kind: WarningKind, step: &str, err: &ClientError) -> Self {
        Self::new(kind, format!("{step}: {err}"))
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} warning: {}", self.kind, self.message)
    }
}

/// A successful result plus any warnings produced on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Applied<T> {
    pub value: T,
    pub warnings: Vec<Warning>,
}

impl<T> Applied<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            warnings: Vec::new(),
        }
    }

    pub fn with_warnings(value: T, warnings: Vec<Warning>) -> Self {
        Self { value, warnings }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Applied<U> {
        Applied {
            value: f(self.value),
            warnings: self.warnings,
        }
    }
}
