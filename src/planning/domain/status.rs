//! Lifecycle states for projects and activities.
//!
//! Both enumerations share one shape: `pending` and `active` may move to each
//! other or to `closed`, and `closed` is terminal. `undefined` is the value an
//! unset wire field decodes to and is never assignable.

use super::{ParseActivityStatusError, ParseProjectStatusError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Project lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum ProjectStatus {
    /// Placeholder for a missing value; never assignable.
    Undefined,
    /// Project has been created but work has not started.
    #[default]
    Pending,
    /// Project is in progress.
    Active,
    /// Project is finished and frozen.
    Closed,
}

impl ProjectStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Closed => "closed",
        }
    }

    /// Returns whether the status may be assigned to a project.
    #[must_use]
    pub const fn is_assignable(self) -> bool {
        !matches!(self, Self::Undefined)
    }

    /// Returns whether no transition leaves this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for ProjectStatus {
    type Error = ParseProjectStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl TryFrom<&str> for ProjectStatus {
    type Error = ParseProjectStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "undefined" => Ok(Self::Undefined),
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "closed" => Ok(Self::Closed),
            _ => Err(ParseProjectStatusError(value.to_owned())),
        }
    }
}

/// Activity lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum ActivityStatus {
    /// Placeholder for a missing value; never assignable.
    Undefined,
    /// Activity has been created but work has not started.
    #[default]
    Pending,
    /// Activity is being worked on by its assignee.
    Active,
    /// Activity is finished and frozen.
    Closed,
}

impl ActivityStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Closed => "closed",
        }
    }

    /// Returns whether the status may be assigned to an activity.
    #[must_use]
    pub const fn is_assignable(self) -> bool {
        !matches!(self, Self::Undefined)
    }

    /// Returns whether no transition leaves this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed)
    }
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<String> for ActivityStatus {
    type Error = ParseActivityStatusError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_from(value.as_str())
    }
}

impl TryFrom<&str> for ActivityStatus {
    type Error = ParseActivityStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "undefined" => Ok(Self::Undefined),
            "pending" => Ok(Self::Pending),
            "active" => Ok(Self::Active),
            "closed" => Ok(Self::Closed),
            _ => Err(ParseActivityStatusError(value.to_owned())),
        }
    }
}
