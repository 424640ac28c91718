// Copyright (c) The verdict Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Fixture suites: named tests sharing mutable state, re-prepared per test.

use crate::tester::Tester;

/// A fixture with named tests run by [`Tester::run_suite`].
///
/// Each test runs as its own named group, with [`setup`](Suite::setup)
/// called first. Tests are plain functions, so a suite type lists them
/// once:
///
/// ```
/// use verdict::{Suite, Tester};
///
/// struct Stack {
///     items: Vec<i32>,
/// }
///
/// impl Suite for Stack {
///     fn setup(&mut self) {
///         self.items = vec![1, 2, 3];
///     }
///
///     fn tests() -> Vec<(&'static str, fn(&mut Self, &Tester))> {
///         vec![
///             ("pop_returns_the_top", |stack, t| {
///                 t.test_one(stack.items.pop(), Some(3));
///             }),
///             ("len_counts_items", |stack, t| {
///                 t.test_one(stack.items.len(), 3usize);
///             }),
///         ]
///     }
/// }
///
/// let tester = Tester::new();
/// tester.run_suite(&mut Stack { items: Vec::new() });
/// assert_eq!(tester.snapshot()[0].name(), "pop_returns_the_top");
/// ```
pub trait Suite: Sized {
    /// Prepares the fixture. Runs before every test.
    fn setup(&mut self) {}

    /// The suite's tests, in execution order.
    fn tests() -> Vec<(&'static str, fn(&mut Self, &Tester))>;
}

impl Tester {
    /// Runs every test in the suite, each as its own named group.
    ///
    /// A panicking test seals its group and the suite moves on to the next
    /// test, unless an escalation setting resumes the panic.
    pub fn run_suite<S: Suite>(&self, suite: &mut S) {
        for (name, test) in S::tests() {
            suite.setup();
            self.test(name, |tester| test(suite, tester));
        }
    }
}
