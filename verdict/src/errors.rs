// Copyright (c) The verdict Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types emitted by this library.

use crate::tester::Setting;
use std::borrow::Cow;
use thiserror::Error;

/// A comparison passed only because both sides rendered as the same identity
/// placeholder, while the alias policy forbids that.
///
/// Identity placeholders embed the value's address, so two equal placeholders
/// mean the comparison degenerated into `&x == &x`. The caller almost
/// certainly compared a value against itself.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error(
    "comparison of `{actual_type}` against `{expected_type}` was decided by \
     identity alone; the two sides are the same storage"
)]
pub struct AliasError {
    /// Type label of the actual value.
    pub actual_type: Cow<'static, str>,
    /// Type label of the expected value.
    pub expected_type: Cow<'static, str>,
}

/// An error that occurred while parsing a [`Setting`] from a string.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error(
    "unrecognized setting: {input}\n(known settings: {})",
    Setting::variants().join(", ")
)]
pub struct SettingParseError {
    /// The input that failed to parse.
    pub input: String,
}

impl SettingParseError {
    pub(crate) fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
        }
    }
}

/// An error that occurred while exporting a session summary.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Serializing the summary to JSON failed.
    #[error("error serializing session summary to JSON")]
    Serialize {
        #[from]
        error: serde_json::Error,
    },

    /// Writing the serialized summary to the output failed.
    #[error("error writing serialized session summary")]
    Write {
        #[from]
        error: std::io::Error,
    },
}

/// Panic payload raised when an escalation setting aborts a test call.
///
/// [`Tester::test`](crate::Tester::test) catches these at the group boundary
/// and records the group as `FailureEarly`. A top-level abort unwinds to the
/// caller, so an escalated failure can never pass silently.
#[derive(Clone, Debug, Error)]
pub enum TestAbort {
    /// A failing assertion was recorded while `ThrowOnFail` was set.
    #[error("test failed when no fails were allowed: {0}")]
    Failed(String),

    /// A callable or comparison panicked while an escalation setting was set.
    #[error("test raised an error when none were allowed: {0}")]
    Errored(String),

    /// An identity-alias pass was detected while `ThrowOnAlias` was set.
    #[error(transparent)]
    Aliased(#[from] AliasError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setting_parse_error_lists_known_settings() {
        let error = SettingParseError::new("fail-fast");
        let text = error.to_string();
        assert!(text.contains("unrecognized setting: fail-fast"), "{text}");
        assert!(text.contains("throw-on-fail"), "{text}");
        assert!(text.contains("print-sync"), "{text}");
    }

    #[test]
    fn alias_error_names_both_types() {
        let error = AliasError {
            actual_type: "Widget".into(),
            expected_type: "Widget".into(),
        };
        assert!(error.to_string().contains("`Widget` against `Widget`"));
    }
}
