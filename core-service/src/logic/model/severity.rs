//! Severity Mapper - class code to display label

use std::fmt;

use serde::Serialize;

/// Casualty severity predicted by the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Fatal,
    Serious,
    Slight,
    Unknown,
}

impl Severity {
    /// Map a model class code; anything outside 0..=2 is `Unknown`
    pub fn from_class(code: i64) -> Self {
        match code {
            0 => Severity::Fatal,
            1 => Severity::Serious,
            2 => Severity::Slight,
            _ => Severity::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Severity::Fatal => "Fatal Injury",
            Severity::Serious => "Serious Injury",
            Severity::Slight => "Slight Injury",
            Severity::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Display label for a class code
pub fn severity_label(code: i64) -> &'static str {
    Severity::from_class(code).label()
}
