// Copyright (c) The verdict Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sequence runners: drive a callable over many inputs, or compare paired
//! vectors, producing one outcome per element.
//!
//! A panic in one element is contained to that element's outcome; the run
//! moves on to the next index unless the owning tester's escalation settings
//! say otherwise.

use crate::{
    compare::{self, AliasPolicy},
    errors::AliasError,
    helpers,
    outcome::{CallSite, Outcome},
    stringify,
    time::Clock,
    value::{self, Value},
};
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::trace;

const NOTHING: &str = "(nothing)";
const NO_TYPE: &str = "(none)";
const PANICKED: &str = "(panicked)";

/// How a run reacts to failing or panicking elements. Taken from the owning
/// tester's escalation settings; standalone runs never stop.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct StopPolicy {
    pub(crate) on_fail: bool,
    pub(crate) on_error: bool,
}

/// Why a run ended before covering every element.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum RunStop {
    /// The last recorded outcome failed while `on_fail` was set.
    Failed,
    /// The last element panicked while `on_error` or `on_fail` was set.
    Errored,
}

#[derive(Debug)]
pub(crate) struct RunOutput {
    pub(crate) outcomes: Vec<Outcome>,
    pub(crate) stopped: Option<RunStop>,
}

impl RunOutput {
    fn new() -> Self {
        Self {
            outcomes: Vec::new(),
            stopped: None,
        }
    }
}

/// Joins the shared message with the per-element message for one offset.
fn message_for(message: &str, messages: &[String], offset: usize) -> String {
    match messages.get(offset) {
        Some(extra) if extra.is_empty() => message.to_owned(),
        Some(extra) if message.is_empty() => extra.clone(),
        Some(extra) => format!("{message}, {extra}"),
        None => message.to_owned(),
    }
}

/// Stamps per-element elapsed time when the run is clocked.
fn stamp(outcome: &mut Outcome, clock: Option<&dyn Clock>, start: Option<std::time::Duration>) {
    if let (Some(clock), Some(start)) = (clock, start) {
        outcome.set_elapsed(clock.now().saturating_sub(start));
    }
}

/// Drives a callable over an inclusive integer range.
///
/// Each return value is compared against the expected sequence, with the last
/// expected value covering any longer tail of the range. With no expected
/// values the run only checks that every invocation completes; a panic still
/// fails that element.
#[derive(Clone, Debug)]
pub struct RangeRunner<E = i64> {
    from: i64,
    to: i64,
    expected: Vec<E>,
    message: String,
    messages: Vec<String>,
}

impl RangeRunner<i64> {
    /// A runner over `from..=to` that records a pass for every invocation
    /// that returns normally.
    pub fn new(from: i64, to: i64) -> Self {
        Self {
            from,
            to,
            expected: Vec::new(),
            message: String::new(),
            messages: Vec::new(),
        }
    }
}

impl<E: Value> RangeRunner<E> {
    /// A runner over `from..=to` checking return values against `expected`.
    pub fn with_expected(from: i64, to: i64, expected: Vec<E>) -> Self {
        Self {
            from,
            to,
            expected,
            message: String::new(),
            messages: Vec::new(),
        }
    }

    /// Message recorded on every outcome.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Per-element messages; element `i` of the range uses `messages[i]`
    /// when present. Unlike expected values, these are not clamped.
    pub fn messages(mut self, messages: Vec<String>) -> Self {
        self.messages = messages;
        self
    }

    /// Runs the callable over the whole range.
    #[track_caller]
    pub fn run<R, F>(&self, callable: F) -> Vec<Outcome>
    where
        R: Value,
        F: FnMut(i64) -> R,
    {
        let site = CallSite::capture(self.signature());
        self.run_with(callable, 0, None, StopPolicy::default(), site)
            .outcomes
    }

    pub(crate) fn signature(&self) -> String {
        format!(
            "test_range(from = {}, to = {}, expected = {}, message = {:?}, messages = {})",
            self.from,
            self.to,
            helpers::ellipsize(&value::display_sequence(self.expected.iter()), 50),
            self.message,
            self.messages.len(),
        )
    }

    pub(crate) fn run_with<R, F>(
        &self,
        mut callable: F,
        group_index: usize,
        clock: Option<&dyn Clock>,
        stop: StopPolicy,
        site: CallSite,
    ) -> RunOutput
    where
        R: Value,
        F: FnMut(i64) -> R,
    {
        let mut output = RunOutput::new();
        for (offset, input) in (self.from..=self.to).enumerate() {
            let test_index = offset + 1;
            let start = clock.map(|clock| clock.now());
            let caught = catch_unwind(AssertUnwindSafe(|| callable(input)));
            let (mut outcome, stopping) = match caught {
                Ok(value) => {
                    let outcome = element_outcome(
                        &value,
                        self.clamped(offset),
                        &self.message,
                        &self.messages,
                        offset,
                        test_index,
                        group_index,
                        &site,
                    );
                    let stopping = (stop.on_fail && !outcome.passed()).then_some(RunStop::Failed);
                    (outcome, stopping)
                }
                Err(payload) => {
                    let text = helpers::panic_message(payload.as_ref());
                    let outcome = panicked_outcome::<R, E>(
                        &text,
                        self.clamped(offset),
                        &self.message,
                        &self.messages,
                        offset,
                        test_index,
                        group_index,
                        &site,
                    );
                    let stopping =
                        (stop.on_fail || stop.on_error).then_some(RunStop::Errored);
                    (outcome, stopping)
                }
            };
            stamp(&mut outcome, clock, start);
            trace!(
                input,
                test_index,
                passed = outcome.passed(),
                "range element finished"
            );
            output.outcomes.push(outcome);
            if stopping.is_some() {
                output.stopped = stopping;
                break;
            }
        }
        output
    }

    fn clamped(&self, offset: usize) -> Option<&E> {
        (!self.expected.is_empty()).then(|| &self.expected[offset.min(self.expected.len() - 1)])
    }
}

/// Drives a callable over a vector of inputs.
///
/// `callable(inputs[i])` is compared against `expected[min(i, len - 1)]`,
/// mirroring [`RangeRunner`]'s clamping. With no expected values the run only
/// checks that every invocation completes.
#[derive(Clone, Debug)]
pub struct PairedRunner<I, E = i64> {
    inputs: Vec<I>,
    expected: Vec<E>,
    message: String,
    messages: Vec<String>,
}

impl<I: Value> PairedRunner<I, i64> {
    /// A runner that records a pass for every input the callable survives.
    pub fn new(inputs: Vec<I>) -> Self {
        Self {
            inputs,
            expected: Vec::new(),
            message: String::new(),
            messages: Vec::new(),
        }
    }
}

impl<I: Value, E: Value> PairedRunner<I, E> {
    /// A runner checking the callable's return values against `expected`.
    pub fn with_expected(inputs: Vec<I>, expected: Vec<E>) -> Self {
        Self {
            inputs,
            expected,
            message: String::new(),
            messages: Vec::new(),
        }
    }

    /// Message recorded on every outcome.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Per-element messages, keyed by input position.
    pub fn messages(mut self, messages: Vec<String>) -> Self {
        self.messages = messages;
        self
    }

    /// Runs the callable over every input.
    #[track_caller]
    pub fn run<R, F>(&self, callable: F) -> Vec<Outcome>
    where
        R: Value,
        F: FnMut(&I) -> R,
    {
        let site = CallSite::capture(self.signature());
        self.run_with(callable, 0, None, StopPolicy::default(), site)
            .outcomes
    }

    pub(crate) fn signature(&self) -> String {
        format!(
            "test_paired(inputs = {}, expected = {}, message = {:?}, messages = {})",
            helpers::ellipsize(&value::display_sequence(self.inputs.iter()), 50),
            helpers::ellipsize(&value::display_sequence(self.expected.iter()), 50),
            self.message,
            self.messages.len(),
        )
    }

    pub(crate) fn run_with<R, F>(
        &self,
        mut callable: F,
        group_index: usize,
        clock: Option<&dyn Clock>,
        stop: StopPolicy,
        site: CallSite,
    ) -> RunOutput
    where
        R: Value,
        F: FnMut(&I) -> R,
    {
        let mut output = RunOutput::new();
        for (offset, input) in self.inputs.iter().enumerate() {
            let test_index = offset + 1;
            let start = clock.map(|clock| clock.now());
            let caught = catch_unwind(AssertUnwindSafe(|| callable(input)));
            let (mut outcome, stopping) = match caught {
                Ok(value) => {
                    let outcome = element_outcome(
                        &value,
                        self.clamped(offset),
                        &self.message,
                        &self.messages,
                        offset,
                        test_index,
                        group_index,
                        &site,
                    );
                    let stopping = (stop.on_fail && !outcome.passed()).then_some(RunStop::Failed);
                    (outcome, stopping)
                }
                Err(payload) => {
                    let text = helpers::panic_message(payload.as_ref());
                    let outcome = panicked_outcome::<R, E>(
                        &text,
                        self.clamped(offset),
                        &self.message,
                        &self.messages,
                        offset,
                        test_index,
                        group_index,
                        &site,
                    );
                    let stopping =
                        (stop.on_fail || stop.on_error).then_some(RunStop::Errored);
                    (outcome, stopping)
                }
            };
            stamp(&mut outcome, clock, start);
            trace!(
                test_index,
                passed = outcome.passed(),
                "paired element finished"
            );
            output.outcomes.push(outcome);
            if stopping.is_some() {
                output.stopped = stopping;
                break;
            }
        }
        output
    }

    fn clamped(&self, offset: usize) -> Option<&E> {
        (!self.expected.is_empty()).then(|| &self.expected[offset.min(self.expected.len() - 1)])
    }
}

/// A growable set of (actual, expected) pairs compared element against
/// element.
///
/// Only indexes present on both sides run; a longer side's tail is ignored.
#[derive(Clone, Debug)]
pub struct PairSet<A, E> {
    actual: Vec<A>,
    expected: Vec<E>,
    message: String,
    messages: Vec<String>,
    alias: AliasPolicy,
}

// Manual impl: an empty set needs no `A: Default` or `E: Default`.
impl<A, E> Default for PairSet<A, E> {
    fn default() -> Self {
        Self {
            actual: Vec::new(),
            expected: Vec::new(),
            message: String::new(),
            messages: Vec::new(),
            alias: AliasPolicy::Allow,
        }
    }
}

impl<A: Value, E: Value> PairSet<A, E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vecs(actual: Vec<A>, expected: Vec<E>) -> Self {
        Self {
            actual,
            expected,
            message: String::new(),
            messages: Vec::new(),
            alias: AliasPolicy::Allow,
        }
    }

    /// Message recorded on every outcome.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Per-element messages, keyed by pair position.
    pub fn messages(mut self, messages: Vec<String>) -> Self {
        self.messages = messages;
        self
    }

    /// Alias policy applied to each element's comparison.
    pub fn alias_policy(mut self, alias: AliasPolicy) -> Self {
        self.alias = alias;
        self
    }

    /// Appends a pair to the end of the set.
    pub fn push(&mut self, actual: A, expected: E) {
        self.actual.push(actual);
        self.expected.push(expected);
        self.messages.push(String::new());
    }

    /// Appends a pair with its own message.
    pub fn push_with_message(&mut self, actual: A, expected: E, message: impl Into<String>) {
        self.actual.push(actual);
        self.expected.push(expected);
        self.messages.push(message.into());
    }

    /// Removes the most recently pushed pair.
    pub fn pop(&mut self) {
        if !self.actual.is_empty() && !self.expected.is_empty() {
            self.actual.pop();
            self.expected.pop();
            self.messages.pop();
        }
    }

    /// Number of runnable pairs.
    pub fn len(&self) -> usize {
        self.actual.len().min(self.expected.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Compares the pair at `i`. Out-of-range indexes report `false` rather
    /// than failing structurally.
    pub fn run_at(&self, i: usize) -> Result<bool, AliasError> {
        match (self.actual.get(i), self.expected.get(i)) {
            (Some(actual), Some(expected)) => compare::equal(actual, expected, self.alias),
            _ => Ok(false),
        }
    }

    /// Compares every pair.
    #[track_caller]
    pub fn run_all(&self) -> Vec<Outcome> {
        let site = CallSite::capture(self.signature());
        self.run_with(0, None, StopPolicy::default(), site).outcomes
    }

    pub(crate) fn signature(&self) -> String {
        format!(
            "test_pairs(actual = {}, expected = {}, message = {:?}, messages = {})",
            helpers::ellipsize(&value::display_sequence(self.actual.iter()), 50),
            helpers::ellipsize(&value::display_sequence(self.expected.iter()), 50),
            self.message,
            self.messages.len(),
        )
    }

    pub(crate) fn run_with(
        &self,
        group_index: usize,
        clock: Option<&dyn Clock>,
        stop: StopPolicy,
        site: CallSite,
    ) -> RunOutput {
        let mut output = RunOutput::new();
        for offset in 0..self.len() {
            let actual = &self.actual[offset];
            let expected = &self.expected[offset];
            let test_index = offset + 1;
            let start = clock.map(|clock| clock.now());
            let message = message_for(&self.message, &self.messages, offset);
            // User equality probes run arbitrary code; contain their panics
            // like any other element error.
            let caught = catch_unwind(AssertUnwindSafe(|| {
                compare::compare(actual, expected, self.alias)
            }));
            let (mut outcome, stopping) = match caught {
                Ok(Ok(comparison)) => {
                    let outcome = Outcome::from_comparison(
                        comparison,
                        group_index,
                        test_index,
                        A::label(),
                        E::label(),
                        message,
                        site.clone(),
                    );
                    let stopping = (stop.on_fail && !outcome.passed()).then_some(RunStop::Failed);
                    (outcome, stopping)
                }
                Ok(Err(alias)) => {
                    let outcome = Outcome::from_parts(
                        false,
                        group_index,
                        test_index,
                        stringify::show(actual),
                        stringify::show(expected),
                        A::label(),
                        E::label(),
                        helpers::join_message(message, &alias.to_string()),
                        site.clone(),
                    );
                    let stopping = (stop.on_fail).then_some(RunStop::Failed);
                    (outcome, stopping)
                }
                Err(payload) => {
                    let text = helpers::panic_message(payload.as_ref());
                    let outcome = Outcome::from_parts(
                        false,
                        group_index,
                        test_index,
                        PANICKED.to_owned(),
                        stringify::show(expected),
                        A::label(),
                        E::label(),
                        helpers::panicked_message(message, &text),
                        site.clone(),
                    );
                    let stopping =
                        (stop.on_fail || stop.on_error).then_some(RunStop::Errored);
                    (outcome, stopping)
                }
            };
            stamp(&mut outcome, clock, start);
            trace!(
                test_index,
                passed = outcome.passed(),
                "pair element finished"
            );
            output.outcomes.push(outcome);
            if stopping.is_some() {
                output.stopped = stopping;
                break;
            }
        }
        output
    }
}

/// Builds the outcome for an element whose callable returned a value.
#[allow(clippy::too_many_arguments)]
fn element_outcome<R: Value, E: Value>(
    value: &R,
    expected: Option<&E>,
    message: &str,
    messages: &[String],
    offset: usize,
    test_index: usize,
    group_index: usize,
    site: &CallSite,
) -> Outcome {
    let message = message_for(message, messages, offset);
    match expected {
        Some(expected) => {
            let comparison = compare::compare_unchecked(value, expected);
            Outcome::from_comparison(
                comparison,
                group_index,
                test_index,
                R::label(),
                E::label(),
                message,
                site.clone(),
            )
        }
        // Exception-only mode: completing at all is the pass.
        None => Outcome::from_parts(
            true,
            group_index,
            test_index,
            stringify::show(value),
            NOTHING.to_owned(),
            R::label(),
            NO_TYPE.into(),
            message,
            site.clone(),
        ),
    }
}

/// Builds the failing outcome for an element whose callable panicked.
#[allow(clippy::too_many_arguments)]
fn panicked_outcome<R: Value, E: Value>(
    text: &str,
    expected: Option<&E>,
    message: &str,
    messages: &[String],
    offset: usize,
    test_index: usize,
    group_index: usize,
    site: &CallSite,
) -> Outcome {
    let message = helpers::panicked_message(message_for(message, messages, offset), text);
    let (expected_text, expected_type) = match expected {
        Some(expected) => (stringify::show(expected), E::label()),
        None => (NOTHING.to_owned(), NO_TYPE.into()),
    };
    Outcome::from_parts(
        false,
        group_index,
        test_index,
        PANICKED.to_owned(),
        expected_text,
        R::label(),
        expected_type,
        message,
        site.clone(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::borrow::Cow;

    fn passes(outcomes: &[Outcome]) -> Vec<bool> {
        outcomes.iter().map(Outcome::passed).collect()
    }

    #[test]
    fn range_covers_the_inclusive_bounds() {
        let outcomes =
            RangeRunner::with_expected(-1, 1, vec![1, 0, 1]).run(|i| i.abs());
        assert_eq!(outcomes.len(), 3);
        assert_eq!(passes(&outcomes), [true, true, true]);
        assert_eq!(outcomes[0].test_index(), 1);
        assert_eq!(outcomes[2].test_index(), 3);
    }

    #[test]
    fn shorter_expected_clamps_to_its_last_value() {
        // 4, 9, 16, 25 against [4, 9, 16]: the tail reuses 16.
        let outcomes =
            RangeRunner::with_expected(2, 5, vec![4, 9, 16]).run(|i| i * i);
        assert_eq!(passes(&outcomes), [true, true, true, false]);
        assert_eq!(outcomes[3].expected(), "16");
        assert_eq!(outcomes[3].actual(), "25");
    }

    #[test]
    fn empty_expected_only_requires_completion() {
        let outcomes = RangeRunner::new(1, 3).run(|i| i * 2);
        assert_eq!(passes(&outcomes), [true, true, true]);
        assert_eq!(outcomes[0].expected(), "(nothing)");
        assert_eq!(outcomes[0].expected_type(), "(none)");
        assert_eq!(outcomes[0].actual(), "2");
    }

    #[test]
    fn a_panicking_element_fails_alone() {
        let outcomes = RangeRunner::with_expected(1, 3, vec![10, 20, 30])
            .run(|i| {
                if i == 2 {
                    panic!("refused {i}");
                }
                i * 10
            });
        assert_eq!(passes(&outcomes), [true, false, true]);
        assert_eq!(outcomes[1].actual(), "(panicked)");
        assert_eq!(outcomes[1].expected(), "20");
        assert!(outcomes[1].message().contains("panicked: refused 2"));
    }

    #[test]
    fn a_panicking_element_fails_even_without_expected_values() {
        let outcomes = RangeRunner::new(1, 2).run(|i| {
            if i == 1 {
                panic!("no");
            }
        });
        assert_eq!(passes(&outcomes), [false, true]);
    }

    #[test]
    fn per_element_messages_are_not_clamped() {
        let outcomes = RangeRunner::with_expected(1, 3, vec![0])
            .message("shared")
            .messages(vec!["first".to_owned()])
            .run(|_| 0);
        assert_eq!(outcomes[0].message(), "shared, first");
        assert_eq!(outcomes[1].message(), "shared");
        assert_eq!(outcomes[2].message(), "shared");
    }

    #[test]
    fn stop_on_fail_cuts_the_run_short() {
        let runner = RangeRunner::with_expected(1, 5, vec![0]);
        let output = runner.run_with(
            |i| i,
            7,
            None,
            StopPolicy {
                on_fail: true,
                on_error: false,
            },
            CallSite::capture("sig"),
        );
        assert_eq!(output.outcomes.len(), 1);
        assert_eq!(output.stopped, Some(RunStop::Failed));
        assert_eq!(output.outcomes[0].group_index(), 7);
    }

    #[test]
    fn stop_on_error_cuts_the_run_short() {
        let runner = RangeRunner::with_expected(1, 5, vec![1, 2, 3]);
        let output = runner.run_with(
            |i| {
                if i == 2 {
                    panic!("torn");
                }
                i
            },
            7,
            None,
            StopPolicy {
                on_fail: false,
                on_error: true,
            },
            CallSite::capture("sig"),
        );
        assert_eq!(output.outcomes.len(), 2);
        assert_eq!(output.stopped, Some(RunStop::Errored));
        assert_eq!(passes(&output.outcomes), [true, false]);
        assert_eq!(output.outcomes[1].actual(), "(panicked)");
    }

    #[test]
    fn paired_runner_feeds_each_input_through() {
        let outcomes =
            PairedRunner::with_expected(vec!["a", "bb", "ccc"], vec![1_usize, 2, 3])
                .run(|s| s.len());
        assert_eq!(passes(&outcomes), [true, true, true]);
    }

    #[test]
    fn paired_runner_clamps_like_the_range_runner() {
        let outcomes = PairedRunner::with_expected(vec![1, 2, 3], vec![2, 4])
            .run(|n| n * 2);
        assert_eq!(passes(&outcomes), [true, true, false]);
        assert_eq!(outcomes[2].expected(), "4");
        assert_eq!(outcomes[2].actual(), "6");
    }

    #[test]
    fn paired_runner_without_expected_checks_completion() {
        let outcomes = PairedRunner::new(vec![1, 2]).run(|n| n + 1);
        assert_eq!(passes(&outcomes), [true, true]);
        assert_eq!(outcomes[0].expected(), "(nothing)");
    }

    #[test]
    fn pair_set_runs_only_shared_indexes() {
        let set = PairSet::from_vecs(vec![1, 2, 3], vec![1, 3]);
        assert_eq!(set.len(), 2);
        let outcomes = set.run_all();
        assert_eq!(passes(&outcomes), [true, false]);
    }

    #[test]
    fn pair_set_push_and_pop_stay_aligned() {
        let mut set = PairSet::new();
        set.push(1, 1);
        set.push_with_message(2, 3, "off by one");
        assert_eq!(set.len(), 2);

        let outcomes = set.run_all();
        assert_eq!(passes(&outcomes), [true, false]);
        assert_eq!(outcomes[1].message(), "off by one");

        set.pop();
        assert_eq!(set.len(), 1);
        assert!(set.run_all().iter().all(Outcome::passed));
    }

    #[test]
    fn a_default_pair_set_is_empty_for_any_element_type() {
        struct Bare;

        impl Value for Bare {
            fn label() -> Cow<'static, str> {
                Cow::Borrowed("Bare")
            }
        }

        let set = PairSet::<Bare, Bare>::default();
        assert!(set.is_empty());
        assert_eq!(set.len(), 0);
    }

    #[test]
    fn pair_set_run_at_is_false_out_of_range() {
        let set = PairSet::from_vecs(vec![5], vec![5]);
        assert_eq!(set.run_at(0), Ok(true));
        assert_eq!(set.run_at(9), Ok(false));
    }

    #[test]
    fn pair_set_mixed_types_compare_through_the_chain() {
        let set = PairSet::from_vecs(vec![1_i32, 2], vec![1.0_f64, 2.5]);
        let outcomes = set.run_all();
        assert_eq!(passes(&outcomes), [true, false]);
        assert_eq!(outcomes[0].actual_type(), "i32");
        assert_eq!(outcomes[0].expected_type(), "f64");
    }

    #[test]
    fn runner_signature_survives_on_every_outcome() {
        let outcomes = RangeRunner::with_expected(1, 2, vec![1, 2]).run(|i| i);
        for outcome in &outcomes {
            assert!(
                outcome.call_site().signature.starts_with("test_range(from = 1, to = 2"),
                "{}",
                outcome.call_site().signature
            );
        }
    }
}
