//! The five call forms every guard is exposed through.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A derived call form of a guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GuardForm {
    /// Returns nothing on success, fails with an assertion error otherwise.
    Assert,
    /// Returns `true` or `false`.
    Check,
    /// Returns the candidate on success, fails otherwise.
    AssertWrap,
    /// Returns the candidate on success, `None` otherwise.
    CheckWrap,
    /// Polls a callback until its value passes or a timeout elapses.
    WaitUntil,
}

impl GuardForm {
    /// Every form, in namespace order.
    pub const ALL: [GuardForm; 5] = [
        GuardForm::Assert,
        GuardForm::Check,
        GuardForm::AssertWrap,
        GuardForm::CheckWrap,
        GuardForm::WaitUntil,
    ];

    /// The namespace name of this form.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Assert => "assert",
            Self::Check => "check",
            Self::AssertWrap => "assertWrap",
            Self::CheckWrap => "checkWrap",
            Self::WaitUntil => "waitUntil",
        }
    }

    /// Parse a form name, accepting camelCase, snake_case and kebab-case spellings.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().replace(['-', '_'], "").as_str() {
            "assert" => Some(Self::Assert),
            "check" => Some(Self::Check),
            "assertwrap" => Some(Self::AssertWrap),
            "checkwrap" => Some(Self::CheckWrap),
            "waituntil" => Some(Self::WaitUntil),
            _ => None,
        }
    }
}

impl fmt::Display for GuardForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
