// Copyright (c) The verdict Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The concurrent aggregator: entry points, settings, and grouped recording.

use crate::{
    compare::{self, AliasPolicy},
    errors::{ExportError, SettingParseError, TestAbort},
    group::{GroupStatus, ResultGroup},
    helpers,
    outcome::{CallSite, Note, Outcome, Severity},
    report::ReportOptions,
    runner::{PairSet, PairedRunner, RangeRunner, RunOutput, RunStop, StopPolicy},
    strdiff::StringDiff,
    summary::SessionSummary,
    time::{Clock, MonotonicClock},
    value::Value,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    io::{self, Write},
    panic::{catch_unwind, panic_any, resume_unwind, AssertUnwindSafe},
    str::FromStr,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
};
use tracing::{debug, trace, warn};

pub(crate) const DEFAULT_GROUP: &str = "(default)";

const RENDERS_IDENTICALLY_CODE: i32 = 1;
const RENDERS_IDENTICALLY_TEXT: &str =
    "the two renderings are identical; the values may share storage or lose detail when rendered";

/// Boolean settings governing escalation and synchronous printing.
///
/// All settings default to off. String forms parse via [`FromStr`], e.g.
/// `"throw-on-fail"`.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Setting {
    /// Abort the current test call on the first failing assertion.
    ThrowOnFail,
    /// Abort the current test call when a callable or comparison panics.
    ThrowOnError,
    /// Treat identity-alias passes as errors.
    ThrowOnAlias,
    /// Mirror each outcome to the sync sink as it is recorded.
    PrintSync,
}

impl Setting {
    pub fn as_str(&self) -> &'static str {
        match self {
            Setting::ThrowOnFail => "throw-on-fail",
            Setting::ThrowOnError => "throw-on-error",
            Setting::ThrowOnAlias => "throw-on-alias",
            Setting::PrintSync => "print-sync",
        }
    }

    /// All string forms, for error messages.
    pub fn variants() -> [&'static str; 4] {
        [
            "throw-on-fail",
            "throw-on-error",
            "throw-on-alias",
            "print-sync",
        ]
    }
}

impl fmt::Display for Setting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Setting {
    type Err = SettingParseError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "throw-on-fail" => Ok(Setting::ThrowOnFail),
            "throw-on-error" => Ok(Setting::ThrowOnError),
            "throw-on-alias" => Ok(Setting::ThrowOnAlias),
            "print-sync" => Ok(Setting::PrintSync),
            other => Err(SettingParseError::new(other)),
        }
    }
}

/// Where synchronous printing goes.
enum SyncSink {
    Stdout,
    Writer(Box<dyn Write + Send>),
}

impl SyncSink {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        match self {
            SyncSink::Stdout => writeln!(io::stdout().lock(), "{line}"),
            SyncSink::Writer(writer) => writeln!(writer, "{line}"),
        }
    }
}

/// The aggregator every assertion reports to.
///
/// A `Tester` owns a list of completed [`ResultGroup`]s plus one current
/// group that plain entry points record into. [`test`](Self::test) runs a
/// callable against a sub-tester and merges the resulting named group in
/// atomically, so concurrent grouped tests never interleave their items.
///
/// All entry points take `&self`; share a tester across threads with `Arc`
/// or scoped threads.
pub struct Tester {
    completed: Mutex<Vec<ResultGroup>>,
    current: Mutex<ResultGroup>,
    settings: Mutex<IndexMap<Setting, bool>>,
    group_counter: AtomicUsize,
    clock: Arc<dyn Clock>,
    sink: Arc<Mutex<SyncSink>>,
}

impl Default for Tester {
    fn default() -> Self {
        Self::new()
    }
}

impl Tester {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(MonotonicClock::new()))
    }

    /// A tester that reads time from `clock` instead of the real monotonic
    /// clock.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            completed: Mutex::new(Vec::new()),
            current: Mutex::new(ResultGroup::new(DEFAULT_GROUP)),
            settings: Mutex::new(IndexMap::new()),
            group_counter: AtomicUsize::new(1),
            clock,
            sink: Arc::new(Mutex::new(SyncSink::Stdout)),
        }
    }

    // Lock discipline: the three state locks are leaf locks, never held
    // while caller code runs and never held two at a time.
    fn completed_lock(&self) -> MutexGuard<'_, Vec<ResultGroup>> {
        self.completed.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn current_lock(&self) -> MutexGuard<'_, ResultGroup> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn settings_lock(&self) -> MutexGuard<'_, IndexMap<Setting, bool>> {
        self.settings.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Turns a setting on or off.
    pub fn update_setting(&self, setting: Setting, enabled: bool) {
        self.settings_lock().insert(setting, enabled);
        debug!(setting = %setting, enabled, "setting updated");
    }

    /// Reads a setting; unset settings read as off.
    pub fn setting(&self, setting: Setting) -> bool {
        self.settings_lock().get(&setting).copied().unwrap_or(false)
    }

    pub(crate) fn settings_snapshot(&self) -> IndexMap<Setting, bool> {
        self.settings_lock().clone()
    }

    fn alias_policy(&self) -> AliasPolicy {
        if self.setting(Setting::ThrowOnAlias) {
            AliasPolicy::Forbid
        } else {
            AliasPolicy::Allow
        }
    }

    fn stop_policy(&self) -> StopPolicy {
        let settings = self.settings_lock();
        StopPolicy {
            on_fail: settings.get(&Setting::ThrowOnFail).copied().unwrap_or(false),
            on_error: settings
                .get(&Setting::ThrowOnError)
                .copied()
                .unwrap_or(false),
        }
    }

    fn any_escalation(&self) -> bool {
        let settings = self.settings_lock();
        [
            Setting::ThrowOnFail,
            Setting::ThrowOnError,
            Setting::ThrowOnAlias,
        ]
        .iter()
        .any(|setting| settings.get(setting).copied().unwrap_or(false))
    }

    /// Redirects synchronous printing (the `PrintSync` setting and
    /// [`print_results`](Self::print_results)) away from stdout.
    pub fn set_sync_writer(&self, writer: impl Write + Send + 'static) {
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        *sink = SyncSink::Writer(Box::new(writer));
    }

    fn print_sync(&self, text: &str) {
        let mut sink = self.sink.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(error) = sink.write_line(text) {
            warn!(%error, "failed to write to sync sink");
        }
    }

    /// Every entry-point call is its own group index.
    fn next_group_index(&self) -> usize {
        self.group_counter.fetch_add(1, Ordering::Relaxed)
    }

    fn record(&self, outcome: Outcome) -> Outcome {
        trace!(
            group_index = outcome.group_index(),
            passed = outcome.passed(),
            "outcome recorded"
        );
        let print = self.setting(Setting::PrintSync);
        {
            self.current_lock().push_outcome(outcome.clone());
        }
        if print {
            self.print_sync(&outcome.to_string());
        }
        outcome
    }

    /// Records a sequence run's outcomes, then aborts if the run was cut
    /// short by an escalation setting.
    fn record_output(&self, output: RunOutput) -> Vec<Outcome> {
        let print = self.setting(Setting::PrintSync);
        {
            let mut current = self.current_lock();
            for outcome in &output.outcomes {
                current.push_outcome(outcome.clone());
            }
        }
        if print {
            for outcome in &output.outcomes {
                self.print_sync(&outcome.to_string());
            }
        }
        match output.stopped {
            None => output.outcomes,
            Some(stop) => {
                debug!(?stop, "sequence run stopped early");
                self.current_lock().set_status(GroupStatus::FailureEarly);
                let last = output
                    .outcomes
                    .last()
                    .map(Outcome::to_string)
                    .unwrap_or_default();
                match stop {
                    RunStop::Failed => panic_any(TestAbort::Failed(last)),
                    RunStop::Errored => panic_any(TestAbort::Errored(last)),
                }
            }
        }
    }

    fn escalate_if_failed(&self, outcome: &Outcome) {
        if !outcome.passed() && self.setting(Setting::ThrowOnFail) {
            debug!(
                group_index = outcome.group_index(),
                "failing outcome escalated"
            );
            self.current_lock().set_status(GroupStatus::FailureEarly);
            panic_any(TestAbort::Failed(outcome.to_string()));
        }
    }

    /// Compares `actual` against `expected` and records one outcome.
    ///
    /// The comparison runs through the capability chain; see
    /// [`compare`](crate::compare). The recorded outcome is also returned.
    #[track_caller]
    pub fn test_one<A: Value, B: Value>(&self, actual: A, expected: B) -> Outcome {
        self.test_one_msg(actual, expected, "")
    }

    /// [`test_one`](Self::test_one) with a message attached to the outcome.
    #[track_caller]
    pub fn test_one_msg<A: Value, B: Value>(
        &self,
        actual: A,
        expected: B,
        message: impl Into<String>,
    ) -> Outcome {
        let message = message.into();
        let group_index = self.next_group_index();
        let start = self.clock.now();
        let caught = catch_unwind(AssertUnwindSafe(|| {
            compare::compare(&actual, &expected, self.alias_policy())
        }));
        let elapsed = self.clock.now().saturating_sub(start);
        match caught {
            Ok(Ok(comparison)) => {
                let renders_identically =
                    !comparison.passed && comparison.actual.text == comparison.expected.text;
                let signature = format!(
                    "test_one({} actual = {}, {} expected = {}, message = {:?})",
                    A::label(),
                    helpers::ellipsize(&comparison.actual.text, 50),
                    B::label(),
                    helpers::ellipsize(&comparison.expected.text, 50),
                    message,
                );
                let mut outcome = Outcome::from_comparison(
                    comparison,
                    group_index,
                    1,
                    A::label(),
                    B::label(),
                    message,
                    CallSite::capture(signature),
                );
                outcome.set_elapsed(elapsed);
                if renders_identically {
                    outcome.push_note(Note::error(
                        RENDERS_IDENTICALLY_CODE,
                        RENDERS_IDENTICALLY_TEXT,
                    ));
                }
                self.escalate_if_failed(&outcome);
                self.record(outcome)
            }
            Ok(Err(alias)) => {
                // Reachable only with ThrowOnAlias set; raised, not recorded.
                panic_any(TestAbort::Aliased(alias));
            }
            Err(payload) => {
                let text = helpers::panic_message(payload.as_ref());
                if self.any_escalation() {
                    panic_any(TestAbort::Errored(text));
                }
                let signature = format!(
                    "test_one({} actual, {} expected, message = {:?})",
                    A::label(),
                    B::label(),
                    message,
                );
                let mut outcome = Outcome::from_parts(
                    false,
                    group_index,
                    1,
                    "(panicked)".to_owned(),
                    "(panicked)".to_owned(),
                    A::label(),
                    B::label(),
                    helpers::panicked_message(message, &text),
                    CallSite::capture(signature),
                );
                outcome.set_elapsed(elapsed);
                self.record(outcome)
            }
        }
    }

    /// Asserts that `actual` is true.
    #[track_caller]
    pub fn test_true(&self, actual: bool) -> Outcome {
        self.test_one(actual, true)
    }

    #[track_caller]
    pub fn test_true_msg(&self, actual: bool, message: impl Into<String>) -> Outcome {
        self.test_one_msg(actual, true, message)
    }

    /// Asserts that `actual` is false.
    #[track_caller]
    pub fn test_false(&self, actual: bool) -> Outcome {
        self.test_one(actual, false)
    }

    #[track_caller]
    pub fn test_false_msg(&self, actual: bool, message: impl Into<String>) -> Outcome {
        self.test_one_msg(actual, false, message)
    }

    /// Compares floats inside a symmetric tolerance around `actual`.
    #[track_caller]
    pub fn test_float(&self, actual: f64, expected: f64, tolerance: f64) -> Outcome {
        self.test_float_bounds_msg(actual, expected, tolerance, tolerance, "")
    }

    #[track_caller]
    pub fn test_float_msg(
        &self,
        actual: f64,
        expected: f64,
        tolerance: f64,
        message: impl Into<String>,
    ) -> Outcome {
        self.test_float_bounds_msg(actual, expected, tolerance, tolerance, message)
    }

    /// Passes when `expected` lies within `[actual - lower, actual + upper]`,
    /// or when the two compare equal outright.
    #[track_caller]
    pub fn test_float_bounds(
        &self,
        actual: f64,
        expected: f64,
        lower: f64,
        upper: f64,
    ) -> Outcome {
        self.test_float_bounds_msg(actual, expected, lower, upper, "")
    }

    #[track_caller]
    pub fn test_float_bounds_msg(
        &self,
        actual: f64,
        expected: f64,
        lower: f64,
        upper: f64,
        message: impl Into<String>,
    ) -> Outcome {
        let message = message.into();
        let group_index = self.next_group_index();
        let start = self.clock.now();
        let within = expected >= actual - lower && expected <= actual + upper;
        let passed =
            within || compare::equal(&actual, &expected, AliasPolicy::Allow).unwrap_or(false);
        let elapsed = self.clock.now().saturating_sub(start);
        let signature = format!(
            "test_float(f64 actual = {actual}, f64 expected = {expected}, \
             lower = {lower}, upper = {upper}, message = {message:?})",
        );
        let mut outcome = Outcome::from_parts(
            passed,
            group_index,
            1,
            actual.to_string(),
            expected.to_string(),
            "f64".into(),
            "f64".into(),
            message,
            CallSite::capture(signature),
        );
        outcome.set_elapsed(elapsed);
        self.escalate_if_failed(&outcome);
        self.record(outcome)
    }

    /// Runs the callable and passes only if it panics with exactly
    /// `expected_message`.
    ///
    /// Matching is by panic text; panic payload types are not inspected.
    #[track_caller]
    pub fn test_panics<F: FnOnce()>(&self, expected_message: &str, callable: F) -> Outcome {
        self.test_panics_msg(expected_message, "", callable)
    }

    #[track_caller]
    pub fn test_panics_msg<F: FnOnce()>(
        &self,
        expected_message: &str,
        message: impl Into<String>,
        callable: F,
    ) -> Outcome {
        let message = message.into();
        let group_index = self.next_group_index();
        let start = self.clock.now();
        let caught = catch_unwind(AssertUnwindSafe(callable));
        let elapsed = self.clock.now().saturating_sub(start);
        let signature = format!(
            "test_panics(expected = {expected_message:?}, message = {message:?})"
        );
        let (passed, actual_text, marker) = match caught {
            Ok(()) => (false, "(no panic)".to_owned(), "did not panic"),
            Err(payload) => {
                let text = helpers::panic_message(payload.as_ref());
                if text == expected_message {
                    (true, text, "matched panic message")
                } else {
                    (false, text, "panic message did not match")
                }
            }
        };
        let failed_text_mismatch = !passed && actual_text != "(no panic)";
        let mut outcome = Outcome::from_parts(
            passed,
            group_index,
            1,
            actual_text,
            expected_message.to_owned(),
            "panic".into(),
            "panic".into(),
            helpers::join_message(message, marker),
            CallSite::capture(signature),
        );
        outcome.set_elapsed(elapsed);
        if failed_text_mismatch {
            outcome.set_diff(StringDiff::new(expected_message, outcome.actual()));
        }
        self.escalate_if_failed(&outcome);
        self.record(outcome)
    }

    /// Drives `callable` over `from..=to`, recording one outcome per index.
    ///
    /// Return values are compared against `expected`, with the last expected
    /// value covering any longer tail of the range.
    #[track_caller]
    pub fn test_range<E, R, F>(
        &self,
        from: i64,
        to: i64,
        expected: Vec<E>,
        callable: F,
    ) -> Vec<Outcome>
    where
        E: Value,
        R: Value,
        F: FnMut(i64) -> R,
    {
        self.run_range(RangeRunner::with_expected(from, to, expected), callable)
    }

    #[track_caller]
    pub fn test_range_msg<E, R, F>(
        &self,
        from: i64,
        to: i64,
        expected: Vec<E>,
        message: impl Into<String>,
        messages: Vec<String>,
        callable: F,
    ) -> Vec<Outcome>
    where
        E: Value,
        R: Value,
        F: FnMut(i64) -> R,
    {
        self.run_range(
            RangeRunner::with_expected(from, to, expected)
                .message(message)
                .messages(messages),
            callable,
        )
    }

    /// Range run with no expected values: each index passes if the callable
    /// completes without panicking.
    #[track_caller]
    pub fn test_range_ok<R, F>(&self, from: i64, to: i64, callable: F) -> Vec<Outcome>
    where
        R: Value,
        F: FnMut(i64) -> R,
    {
        self.run_range(RangeRunner::new(from, to), callable)
    }

    #[track_caller]
    fn run_range<E, R, F>(&self, runner: RangeRunner<E>, callable: F) -> Vec<Outcome>
    where
        E: Value,
        R: Value,
        F: FnMut(i64) -> R,
    {
        let site = CallSite::capture(runner.signature());
        let output = runner.run_with(
            callable,
            self.next_group_index(),
            Some(self.clock.as_ref()),
            self.stop_policy(),
            site,
        );
        self.record_output(output)
    }

    /// Feeds each input to `callable`, comparing `callable(inputs[i])`
    /// against `expected[min(i, len - 1)]`.
    #[track_caller]
    pub fn test_paired<I, E, R, F>(
        &self,
        inputs: Vec<I>,
        expected: Vec<E>,
        callable: F,
    ) -> Vec<Outcome>
    where
        I: Value,
        E: Value,
        R: Value,
        F: FnMut(&I) -> R,
    {
        self.run_paired(PairedRunner::with_expected(inputs, expected), callable)
    }

    #[track_caller]
    pub fn test_paired_msg<I, E, R, F>(
        &self,
        inputs: Vec<I>,
        expected: Vec<E>,
        message: impl Into<String>,
        messages: Vec<String>,
        callable: F,
    ) -> Vec<Outcome>
    where
        I: Value,
        E: Value,
        R: Value,
        F: FnMut(&I) -> R,
    {
        self.run_paired(
            PairedRunner::with_expected(inputs, expected)
                .message(message)
                .messages(messages),
            callable,
        )
    }

    /// Paired run with no expected values: each input passes if the callable
    /// completes without panicking.
    #[track_caller]
    pub fn test_paired_ok<I, R, F>(&self, inputs: Vec<I>, callable: F) -> Vec<Outcome>
    where
        I: Value,
        R: Value,
        F: FnMut(&I) -> R,
    {
        self.run_paired(PairedRunner::new(inputs), callable)
    }

    #[track_caller]
    fn run_paired<I, E, R, F>(&self, runner: PairedRunner<I, E>, callable: F) -> Vec<Outcome>
    where
        I: Value,
        E: Value,
        R: Value,
        F: FnMut(&I) -> R,
    {
        let site = CallSite::capture(runner.signature());
        let output = runner.run_with(
            callable,
            self.next_group_index(),
            Some(self.clock.as_ref()),
            self.stop_policy(),
            site,
        );
        self.record_output(output)
    }

    /// Compares `actual[i]` against `expected[i]` for every index present on
    /// both sides.
    #[track_caller]
    pub fn test_pairs<A, E>(&self, actual: Vec<A>, expected: Vec<E>) -> Vec<Outcome>
    where
        A: Value,
        E: Value,
    {
        self.run_pairs(PairSet::from_vecs(actual, expected))
    }

    #[track_caller]
    pub fn test_pairs_msg<A, E>(
        &self,
        actual: Vec<A>,
        expected: Vec<E>,
        message: impl Into<String>,
        messages: Vec<String>,
    ) -> Vec<Outcome>
    where
        A: Value,
        E: Value,
    {
        self.run_pairs(
            PairSet::from_vecs(actual, expected)
                .message(message)
                .messages(messages),
        )
    }

    /// Runs a [`PairSet`] under this tester as one group.
    ///
    /// With `ThrowOnAlias` set, every element comparison forbids identity
    /// aliases; an aliased element records as a failure.
    #[track_caller]
    pub fn run_pairs<A, E>(&self, set: PairSet<A, E>) -> Vec<Outcome>
    where
        A: Value,
        E: Value,
    {
        let set = if self.setting(Setting::ThrowOnAlias) {
            set.alias_policy(AliasPolicy::Forbid)
        } else {
            set
        };
        let site = CallSite::capture(set.signature());
        let output = set.run_with(
            self.next_group_index(),
            Some(self.clock.as_ref()),
            self.stop_policy(),
            site,
        );
        self.record_output(output)
    }

    /// Adds a free-standing message note to the current group.
    pub fn add_note(&self, severity: Severity, text: impl Into<String>) {
        self.current_lock().push_note(Note::message(severity, text));
    }

    /// Adds a structured advisory with a numeric code to the current group.
    pub fn add_error(&self, code: i32, text: impl Into<String>) {
        self.current_lock().push_note(Note::error(code, text));
    }

    /// Sets the current group's status.
    pub fn set_status(&self, status: GroupStatus) {
        self.current_lock().set_status(status);
    }

    /// Runs `callable` against a fresh sub-tester and merges its groups in
    /// atomically, the callable's own work under `name`.
    ///
    /// The sub-tester starts with a copy of this tester's settings and
    /// shares its clock and sync sink. A panic inside the callable is
    /// caught: the named group records a `FAIL` note and seals as
    /// `FailureEarly`. With `ThrowOnError` or `ThrowOnFail` set, the panic
    /// then resumes to the caller.
    pub fn test<F>(&self, name: impl Into<String>, callable: F)
    where
        F: FnOnce(&Tester),
    {
        let name = name.into();
        let sub = Tester {
            completed: Mutex::new(Vec::new()),
            current: Mutex::new(ResultGroup::new(&name)),
            settings: Mutex::new(self.settings_snapshot()),
            group_counter: AtomicUsize::new(1),
            clock: Arc::clone(&self.clock),
            sink: Arc::clone(&self.sink),
        };

        let start = self.clock.now();
        let result = catch_unwind(AssertUnwindSafe(|| callable(&sub)));
        let elapsed = self.clock.now().saturating_sub(start);

        if let Err(payload) = &result {
            let text = helpers::panic_message(payload.as_ref());
            let mut current = sub.current_lock();
            current.push_note(Note::message(
                Severity::Fail,
                format!("test ended prematurely: {text}"),
            ));
            current.set_status(GroupStatus::FailureEarly);
        }

        let mut groups = std::mem::take(&mut *sub.completed_lock());
        {
            let mut current = sub.current_lock();
            current.set_elapsed(elapsed);
            current.seal();
            groups.push(std::mem::replace(
                &mut *current,
                ResultGroup::new(DEFAULT_GROUP),
            ));
        }

        debug!(name = %name, groups = groups.len(), "merging sub-test groups");
        self.completed_lock().extend(groups);

        if let Err(payload) = result {
            if self.setting(Setting::ThrowOnError) || self.setting(Setting::ThrowOnFail) {
                resume_unwind(payload);
            }
        }
    }

    /// Clones every group: completed groups first, then the current group
    /// with its status pinned as it would seal.
    pub fn snapshot(&self) -> Vec<ResultGroup> {
        let mut groups = self.completed_lock().clone();
        let mut current = self.current_lock().clone();
        current.seal();
        groups.push(current);
        groups
    }

    /// Renders the full report with default options.
    pub fn render(&self) -> String {
        self.render_with(&ReportOptions::default())
    }

    pub fn render_with(&self, options: &ReportOptions) -> String {
        crate::report::render_groups(&self.snapshot(), options)
    }

    /// Prints the report to the sync sink (stdout by default).
    pub fn print_results(&self) {
        self.print_sync(&self.render());
    }

    pub fn print_results_with(&self, options: &ReportOptions) {
        self.print_sync(&self.render_with(options));
    }

    /// Snapshot of the whole session in serializable form.
    pub fn summary(&self) -> SessionSummary {
        SessionSummary::new(self.snapshot(), self.settings_snapshot())
    }

    /// Serializes the session summary to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ExportError> {
        Ok(serde_json::to_string_pretty(&self.summary())?)
    }

    /// Writes the session summary as JSON.
    pub fn write_json<W: Write>(&self, writer: W) -> Result<(), ExportError> {
        serde_json::to_writer_pretty(writer, &self.summary())?;
        Ok(())
    }
}
