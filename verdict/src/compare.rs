// Copyright (c) The verdict Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The capability-priority comparator.

use crate::{
    errors::AliasError,
    strdiff::StringDiff,
    stringify::{self, Rendering},
    value::Value,
};
use std::any::Any;

/// Whether a pass produced by two identity placeholders is acceptable.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum AliasPolicy {
    /// Identity matches pass like any other comparison.
    #[default]
    Allow,
    /// Identity matches are reported as an [`AliasError`].
    Forbid,
}

/// Which capability decided a comparison.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ComparePath {
    /// Both values were text and were compared as strings.
    Text,
    /// The actual value's `equals` probe decided.
    UserEquals,
    /// Same-type native equality, or numeric equality after promotion.
    Native,
    /// Rendered strings compared as a last resort.
    Rendering,
}

/// The verdict of one comparison plus everything needed to report it.
#[derive(Clone, Debug)]
pub struct Comparison {
    pub passed: bool,
    pub path: ComparePath,
    /// Rendering of the actual value.
    pub actual: Rendering,
    /// Rendering of the expected value.
    pub expected: Rendering,
    /// Character diff, attached when a text comparison failed.
    pub diff: Option<StringDiff>,
}

/// Compares two values through the capability chain.
///
/// The order is fixed: text against text, then the actual value's `equals`
/// probe, then native or promoted-numeric equality, then rendered strings as
/// a last resort. The first applicable capability decides and later ones are
/// not consulted, so a caller-supplied `equals` overrides native equality.
///
/// With [`AliasPolicy::Forbid`], a pass decided by two identity placeholders
/// comes back as an [`AliasError`] instead of a false positive.
pub fn compare<A: Value, B: Value>(
    actual: &A,
    expected: &B,
    policy: AliasPolicy,
) -> Result<Comparison, AliasError> {
    let comparison = compare_unchecked(actual, expected);
    if policy == AliasPolicy::Forbid
        && comparison.passed
        && comparison.path == ComparePath::Rendering
        && comparison.actual.is_identity()
        && comparison.expected.is_identity()
    {
        return Err(AliasError {
            actual_type: A::label(),
            expected_type: B::label(),
        });
    }
    Ok(comparison)
}

/// Boolean form of [`compare`].
pub fn equal<A: Value, B: Value>(
    actual: &A,
    expected: &B,
    policy: AliasPolicy,
) -> Result<bool, AliasError> {
    compare(actual, expected, policy).map(|comparison| comparison.passed)
}

/// The chain itself, without the alias check. Sequence runners compare this
/// way.
pub(crate) fn compare_unchecked<A: Value, B: Value>(actual: &A, expected: &B) -> Comparison {
    let actual_rendering = stringify::rendering(actual);
    let expected_rendering = stringify::rendering(expected);

    if let (Some(actual_text), Some(expected_text)) = (actual.as_text(), expected.as_text()) {
        let passed = actual_text == expected_text;
        let diff = (!passed).then(|| StringDiff::new(&expected_text, &actual_text));
        return Comparison {
            passed,
            path: ComparePath::Text,
            actual: actual_rendering,
            expected: expected_rendering,
            diff,
        };
    }

    if let Some(passed) = actual.equals(expected as &dyn Any) {
        return Comparison {
            passed,
            path: ComparePath::UserEquals,
            actual: actual_rendering,
            expected: expected_rendering,
            diff: None,
        };
    }

    let native = actual.eq_native(expected as &dyn Any).or_else(|| {
        match (actual.as_number(), expected.as_number()) {
            (Some(a), Some(b)) => Some(a.eq_promoted(b)),
            _ => None,
        }
    });
    if let Some(passed) = native {
        return Comparison {
            passed,
            path: ComparePath::Native,
            actual: actual_rendering,
            expected: expected_rendering,
            diff: None,
        };
    }

    let passed = actual_rendering.text == expected_rendering.text;
    Comparison {
        passed,
        path: ComparePath::Rendering,
        actual: actual_rendering,
        expected: expected_rendering,
        diff: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strdiff::DiffKind;
    use std::borrow::Cow;

    // Non-zero-sized so that distinct locals have distinct addresses.
    struct Opaque(#[allow(dead_code)] u8);

    impl Value for Opaque {
        fn label() -> Cow<'static, str> {
            Cow::Borrowed("Opaque")
        }
    }

    // PartialEq says equal, the equals probe says otherwise; the probe must
    // win.
    #[derive(PartialEq)]
    struct Contrary(i32);

    impl Value for Contrary {
        fn label() -> Cow<'static, str> {
            Cow::Borrowed("Contrary")
        }

        fn equals(&self, _other: &dyn Any) -> Option<bool> {
            Some(false)
        }

        fn eq_native(&self, other: &dyn Any) -> Option<bool> {
            other.downcast_ref::<Self>().map(|other| self == other)
        }
    }

    struct Named(&'static str);

    impl Value for Named {
        fn label() -> Cow<'static, str> {
            Cow::Borrowed("Named")
        }

        fn describe(&self) -> Option<String> {
            Some(format!("Named({})", self.0))
        }
    }

    #[test]
    fn text_pair_compares_across_string_types() {
        let comparison = compare(&String::from("ab"), &"ab", AliasPolicy::Allow).unwrap();
        assert!(comparison.passed);
        assert_eq!(comparison.path, ComparePath::Text);
        assert!(comparison.diff.is_none());
    }

    #[test]
    fn failed_text_pair_attaches_a_diff() {
        let comparison = compare(&"abcd", &"ab", AliasPolicy::Allow).unwrap();
        assert!(!comparison.passed);
        assert_eq!(comparison.path, ComparePath::Text);

        let diff = comparison.diff.unwrap();
        assert_eq!(diff.mismatches(), 2);
        let tail = diff.actual_runs().last().unwrap();
        assert_eq!(tail.kind, DiffKind::Extra);
        assert_eq!(tail.text, "cd");
    }

    #[test]
    fn user_equals_overrides_native_equality() {
        let comparison = compare(&Contrary(1), &Contrary(1), AliasPolicy::Allow).unwrap();
        assert!(!comparison.passed);
        assert_eq!(comparison.path, ComparePath::UserEquals);
    }

    #[test]
    fn native_equality_for_the_same_type() {
        let comparison = compare(&3_i32, &3_i32, AliasPolicy::Allow).unwrap();
        assert!(comparison.passed);
        assert_eq!(comparison.path, ComparePath::Native);

        assert!(!equal(&3_i32, &4_i32, AliasPolicy::Allow).unwrap());
    }

    #[test]
    fn mixed_numeric_types_compare_after_promotion() {
        assert!(equal(&2_i32, &2_u64, AliasPolicy::Allow).unwrap());
        assert!(equal(&2_i32, &2.0_f64, AliasPolicy::Allow).unwrap());
        assert!(!equal(&2_i32, &2.5_f64, AliasPolicy::Allow).unwrap());
        assert_eq!(
            compare(&2_i32, &2_u64, AliasPolicy::Allow).unwrap().path,
            ComparePath::Native
        );
    }

    #[test]
    fn vectors_compare_natively() {
        assert!(equal(&vec![1, 2, 3], &vec![1, 2, 3], AliasPolicy::Allow).unwrap());
        assert!(!equal(&vec![1, 2, 3], &vec![1, 2, 4], AliasPolicy::Allow).unwrap());
    }

    #[test]
    fn capability_less_values_fall_back_to_renderings() {
        let a = Opaque(0);
        let b = Opaque(0);
        let comparison = compare(&a, &b, AliasPolicy::Allow).unwrap();
        assert!(!comparison.passed);
        assert_eq!(comparison.path, ComparePath::Rendering);
    }

    #[test]
    fn comparing_a_value_with_itself_is_an_alias_error() {
        let value = Opaque(0);
        let error = compare(&value, &value, AliasPolicy::Forbid).unwrap_err();
        assert_eq!(error.actual_type, "Opaque");
        assert_eq!(error.expected_type, "Opaque");
    }

    #[test]
    fn alias_passes_are_allowed_by_default() {
        let value = Opaque(0);
        let comparison = compare(&value, &value, AliasPolicy::Allow).unwrap();
        assert!(comparison.passed);
        assert_eq!(comparison.path, ComparePath::Rendering);
    }

    #[test]
    fn described_values_match_by_description_without_alias() {
        let a = Named("left");
        let b = Named("left");
        let comparison = compare(&a, &b, AliasPolicy::Forbid).unwrap();
        assert!(comparison.passed);
        assert_eq!(comparison.path, ComparePath::Rendering);
    }

    #[test]
    fn same_type_identity_never_reaches_the_fallback() {
        let value = 5_i32;
        let comparison = compare(&value, &value, AliasPolicy::Forbid).unwrap();
        assert!(comparison.passed);
        assert_eq!(comparison.path, ComparePath::Native);
    }
}
