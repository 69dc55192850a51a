#![forbid(unsafe_code)]

//! Construction-time configuration for observable containers.

use std::fmt;
use std::str::FromStr;

/// What a write does when the new value equals the stored one.
///
/// Equality is the value type's `PartialEq`, which for collections, boxes,
/// `Rc` and derived structs compares contents rather than identity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum EqualWritePolicy {
    /// Fire `on_set` with the written value and keep the stored value.
    #[default]
    Notify,
    /// Overwrite the stored value with the written one and fire no hook.
    ///
    /// The logical value is unchanged; only the instance held is swapped.
    Replace,
}

impl EqualWritePolicy {
    /// All policies, in declaration order.
    pub const ALL: [Self; 2] = [Self::Notify, Self::Replace];

    /// Stable lowercase name, as accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Notify => "notify",
            Self::Replace => "replace",
        }
    }
}

impl fmt::Display for EqualWritePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EqualWritePolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParsePolicyError::Empty);
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "notify" => Ok(Self::Notify),
            "replace" => Ok(Self::Replace),
            _ => Err(ParsePolicyError::Unknown(trimmed.to_string())),
        }
    }
}

/// Errors from parsing an [`EqualWritePolicy`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsePolicyError {
    /// The input was empty or whitespace.
    Empty,
    /// The input named no known policy.
    Unknown(String),
}

impl fmt::Display for ParsePolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty equal-write policy"),
            Self::Unknown(s) => {
                write!(f, "unknown equal-write policy '{s}' (expected 'notify' or 'replace')")
            }
        }
    }
}

impl std::error::Error for ParsePolicyError {}

/// Configuration for an observable container.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservableConfig {
    /// Behavior of writes whose value equals the stored one.
    pub equal_write: EqualWritePolicy,
}

impl ObservableConfig {
    /// Create a configuration with the given equal-write policy.
    #[must_use]
    pub fn new(equal_write: EqualWritePolicy) -> Self {
        Self { equal_write }
    }

    /// Set the equal-write policy.
    #[must_use]
    pub fn with_equal_write(mut self, policy: EqualWritePolicy) -> Self {
        self.equal_write = policy;
        self
    }
}
