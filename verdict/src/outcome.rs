// Copyright (c) The verdict Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Records of individual assertions and the notes attached to them.

use crate::{compare::Comparison, strdiff::StringDiff};
use serde::{Deserialize, Serialize};
use std::{borrow::Cow, fmt, panic::Location, time::Duration};

pub(crate) const NOT_SPECIFIED: &str = "(not specified)";

/// Severity attached to a message note.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Log,
    Warning,
    Severe,
    Fail,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Log => "LOG",
            Severity::Warning => "WARNING",
            Severity::Severe => "SEVERE",
            Severity::Fail => "FAIL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A free-standing annotation, recorded on its own in a group or attached to
/// an [`Outcome`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Note {
    /// An informational message with a severity.
    Message { severity: Severity, text: String },
    /// A structured advisory with a numeric code.
    Error { code: i32, text: String },
}

impl Note {
    pub fn message(severity: Severity, text: impl Into<String>) -> Self {
        Note::Message {
            severity,
            text: text.into(),
        }
    }

    pub fn error(code: i32, text: impl Into<String>) -> Self {
        Note::Error {
            code,
            text: text.into(),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Note::Message { text, .. } | Note::Error { text, .. } => text,
        }
    }
}

/// Where an assertion was made.
///
/// `file` and `line` come from `#[track_caller]`. `function` is free-form
/// caller-reported context and defaults to `"(not specified)"`; `signature`
/// reconstructs the entry-point call with its rendered arguments.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CallSite {
    pub file: Cow<'static, str>,
    pub line: u32,
    pub function: Cow<'static, str>,
    pub signature: String,
}

impl CallSite {
    /// Captures the caller's file and line. Functions between the assertion
    /// entry point and this call opt in with `#[track_caller]`.
    #[track_caller]
    pub fn capture(signature: impl Into<String>) -> Self {
        let location = Location::caller();
        Self {
            file: Cow::Borrowed(location.file()),
            line: location.line(),
            function: Cow::Borrowed(NOT_SPECIFIED),
            signature: signature.into(),
        }
    }

    /// Names the function the assertion ran in.
    pub fn in_function(mut self, function: impl Into<Cow<'static, str>>) -> Self {
        self.function = function.into();
        self
    }
}

/// The record of a single assertion.
///
/// Outcomes are immutable once recorded; the owning tester stamps `elapsed`
/// exactly once before recording.
#[derive(Clone, Debug)]
pub struct Outcome {
    passed: bool,
    group_index: usize,
    test_index: usize,
    elapsed: Duration,
    actual: String,
    expected: String,
    actual_type: Cow<'static, str>,
    expected_type: Cow<'static, str>,
    message: String,
    call_site: CallSite,
    diff: Option<StringDiff>,
    notes: Vec<Note>,
}

impl Outcome {
    pub(crate) fn from_comparison(
        comparison: Comparison,
        group_index: usize,
        test_index: usize,
        actual_type: Cow<'static, str>,
        expected_type: Cow<'static, str>,
        message: String,
        call_site: CallSite,
    ) -> Self {
        Self {
            passed: comparison.passed,
            group_index,
            test_index,
            elapsed: Duration::ZERO,
            actual: comparison.actual.text,
            expected: comparison.expected.text,
            actual_type,
            expected_type,
            message,
            call_site,
            diff: comparison.diff,
            notes: Vec::new(),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        passed: bool,
        group_index: usize,
        test_index: usize,
        actual: String,
        expected: String,
        actual_type: Cow<'static, str>,
        expected_type: Cow<'static, str>,
        message: String,
        call_site: CallSite,
    ) -> Self {
        Self {
            passed,
            group_index,
            test_index,
            elapsed: Duration::ZERO,
            actual,
            expected,
            actual_type,
            expected_type,
            message,
            call_site,
            diff: None,
            notes: Vec::new(),
        }
    }

    pub(crate) fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed = elapsed;
    }

    pub(crate) fn set_diff(&mut self, diff: StringDiff) {
        self.diff = Some(diff);
    }

    pub(crate) fn push_note(&mut self, note: Note) {
        self.notes.push(note);
    }

    /// Whether the assertion passed.
    pub fn passed(&self) -> bool {
        self.passed
    }

    /// 1-based index of the entry-point call that produced this outcome.
    pub fn group_index(&self) -> usize {
        self.group_index
    }

    /// 1-based index of this outcome within its entry-point call.
    pub fn test_index(&self) -> usize {
        self.test_index
    }

    /// Wall-clock duration of the assertion.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Rendering of the actual value.
    pub fn actual(&self) -> &str {
        &self.actual
    }

    /// Rendering of the expected value.
    pub fn expected(&self) -> &str {
        &self.expected
    }

    /// Type label of the actual value.
    pub fn actual_type(&self) -> &str {
        &self.actual_type
    }

    /// Type label of the expected value.
    pub fn expected_type(&self) -> &str {
        &self.expected_type
    }

    /// The caller-supplied message, possibly empty.
    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn call_site(&self) -> &CallSite {
        &self.call_site
    }

    /// Character diff of the renderings, present when a text comparison
    /// failed.
    pub fn diff(&self) -> Option<&StringDiff> {
        self.diff.as_ref()
    }

    /// Notes attached to this outcome.
    pub fn notes(&self) -> &[Note] {
        &self.notes
    }
}
