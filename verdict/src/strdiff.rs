// Copyright (c) The verdict Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Position-by-position character diffs for failed string comparisons.

use serde::{Deserialize, Serialize};

/// Classification of a run of characters in a [`StringDiff`].
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffKind {
    /// Characters equal at this position in both strings.
    Match,
    /// Characters that differ at this position.
    Mismatch,
    /// Characters past the end of the shorter string.
    Extra,
}

/// A maximal run of consecutive characters with one classification.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct DiffRun {
    pub kind: DiffKind,
    pub text: String,
}

/// Character-level diff of two strings.
///
/// Strings are compared index by index with no subsequence alignment; an
/// insertion shifts every following position. Each side is covered completely
/// by its runs, so a marked-up rendering can be rebuilt from them.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StringDiff {
    expected: Vec<DiffRun>,
    actual: Vec<DiffRun>,
    mismatches: usize,
    expected_chars: usize,
    actual_chars: usize,
}

/// Diffs `actual` against `expected`.
pub fn diff(expected: &str, actual: &str) -> StringDiff {
    StringDiff::new(expected, actual)
}

impl StringDiff {
    pub fn new(expected: &str, actual: &str) -> Self {
        let expected: Vec<char> = expected.chars().collect();
        let actual: Vec<char> = actual.chars().collect();
        let common = expected.len().min(actual.len());

        let mut expected_runs = RunBuilder::new();
        let mut actual_runs = RunBuilder::new();
        let mut mismatches = 0;

        for i in 0..common {
            if expected[i] == actual[i] {
                expected_runs.push(DiffKind::Match, expected[i]);
                actual_runs.push(DiffKind::Match, actual[i]);
            } else {
                expected_runs.push(DiffKind::Mismatch, expected[i]);
                actual_runs.push(DiffKind::Mismatch, actual[i]);
                mismatches += 1;
            }
        }
        // The longer side's tail is all extra, and every extra character
        // counts against the total.
        for &ch in &expected[common..] {
            expected_runs.push(DiffKind::Extra, ch);
            mismatches += 1;
        }
        for &ch in &actual[common..] {
            actual_runs.push(DiffKind::Extra, ch);
            mismatches += 1;
        }

        Self {
            expected: expected_runs.finish(),
            actual: actual_runs.finish(),
            mismatches,
            expected_chars: expected.len(),
            actual_chars: actual.len(),
        }
    }

    /// Runs covering the expected string, in order.
    pub fn expected_runs(&self) -> &[DiffRun] {
        &self.expected
    }

    /// Runs covering the actual string, in order.
    pub fn actual_runs(&self) -> &[DiffRun] {
        &self.actual
    }

    /// Differing positions plus unmatched tail characters.
    pub fn mismatches(&self) -> usize {
        self.mismatches
    }

    /// Character count of the expected string.
    pub fn expected_chars(&self) -> usize {
        self.expected_chars
    }

    /// Character count of the actual string.
    pub fn actual_chars(&self) -> usize {
        self.actual_chars
    }

    /// True if the strings matched at every position.
    pub fn is_clean(&self) -> bool {
        self.mismatches == 0
    }
}

struct RunBuilder {
    runs: Vec<DiffRun>,
    kind: Option<DiffKind>,
    text: String,
}

impl RunBuilder {
    fn new() -> Self {
        Self {
            runs: Vec::new(),
            kind: None,
            text: String::new(),
        }
    }

    fn push(&mut self, kind: DiffKind, ch: char) {
        if self.kind != Some(kind) {
            self.flush();
            self.kind = Some(kind);
        }
        self.text.push(ch);
    }

    fn flush(&mut self) {
        if let Some(kind) = self.kind.take() {
            self.runs.push(DiffRun {
                kind,
                text: std::mem::take(&mut self.text),
            });
        }
    }

    fn finish(mut self) -> Vec<DiffRun> {
        self.flush();
        self.runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn run(kind: DiffKind, text: &str) -> DiffRun {
        DiffRun {
            kind,
            text: text.to_owned(),
        }
    }

    #[test]
    fn identical_strings_are_clean() {
        let diff = diff("same", "same");
        assert!(diff.is_clean());
        assert_eq!(diff.mismatches(), 0);
        assert_eq!(diff.expected_runs(), &[run(DiffKind::Match, "same")]);
        assert_eq!(diff.actual_runs(), &[run(DiffKind::Match, "same")]);
    }

    #[test]
    fn longer_actual_marks_the_tail_extra() {
        let diff = diff("ab", "abcd");
        assert_eq!(diff.mismatches(), 2);
        assert_eq!(diff.expected_runs(), &[run(DiffKind::Match, "ab")]);
        assert_eq!(
            diff.actual_runs(),
            &[run(DiffKind::Match, "ab"), run(DiffKind::Extra, "cd")]
        );
    }

    #[test]
    fn longer_expected_marks_its_own_tail() {
        let diff = diff("abcd", "ab");
        assert_eq!(diff.mismatches(), 2);
        assert_eq!(
            diff.expected_runs(),
            &[run(DiffKind::Match, "ab"), run(DiffKind::Extra, "cd")]
        );
        assert_eq!(diff.actual_runs(), &[run(DiffKind::Match, "ab")]);
    }

    #[test]
    fn mismatched_positions_coalesce_into_runs() {
        let diff = diff("aaXYbb", "aaPQbb");
        assert_eq!(diff.mismatches(), 2);
        assert_eq!(
            diff.actual_runs(),
            &[
                run(DiffKind::Match, "aa"),
                run(DiffKind::Mismatch, "PQ"),
                run(DiffKind::Match, "bb"),
            ]
        );
    }

    #[test]
    fn no_alignment_after_an_insertion() {
        // One inserted character shifts the whole tail out of phase.
        let diff = diff("abc", "xabc");
        assert_eq!(diff.mismatches(), 4);
        assert_eq!(
            diff.actual_runs(),
            &[run(DiffKind::Mismatch, "xab"), run(DiffKind::Extra, "c")]
        );
    }

    #[test]
    fn counts_are_in_chars_not_bytes() {
        let diff = diff("héllo", "hallo");
        assert_eq!(diff.expected_chars(), 5);
        assert_eq!(diff.actual_chars(), 5);
        assert_eq!(diff.mismatches(), 1);
        assert_eq!(
            diff.actual_runs(),
            &[
                run(DiffKind::Match, "h"),
                run(DiffKind::Mismatch, "a"),
                run(DiffKind::Match, "llo"),
            ]
        );
    }

    #[test]
    fn empty_sides_are_all_extra() {
        let extras = diff("", "ab");
        assert_eq!(extras.mismatches(), 2);
        assert_eq!(extras.expected_runs(), &[]);
        assert_eq!(extras.actual_runs(), &[run(DiffKind::Extra, "ab")]);

        let empty = diff("", "");
        assert!(empty.is_clean());
        assert_eq!(empty.expected_runs(), &[]);
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let diff = diff("ab", "ax");
        let json = serde_json::to_value(&diff).unwrap();
        assert_eq!(json["expectedChars"], 2);
        assert_eq!(json["mismatches"], 1);
        assert_eq!(json["actual"][1]["kind"], "mismatch");
    }
}
