// Copyright (c) The verdict Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Named groups of outcomes and notes.

use crate::outcome::{Note, Outcome};
use serde::{Deserialize, Serialize};
use std::{fmt, time::Duration};

/// Lifecycle status of a [`ResultGroup`].
///
/// The status reflects how the group's run ended, not whether its assertions
/// passed; pass and total counts carry that separately.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum GroupStatus {
    /// Completed normally.
    Success,
    /// Marked failed by the caller.
    Failure,
    /// Ended early without failing.
    SuccessEarly,
    /// Aborted by an escalation setting or an unhandled panic.
    FailureEarly,
    /// Never recorded an outcome.
    DidNotFinish,
}

impl GroupStatus {
    /// Report-header form, e.g. `SUCCESS EARLY`.
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupStatus::Success => "SUCCESS",
            GroupStatus::Failure => "FAILURE",
            GroupStatus::SuccessEarly => "SUCCESS EARLY",
            GroupStatus::FailureEarly => "FAILURE EARLY",
            GroupStatus::DidNotFinish => "DID NOT FINISH",
        }
    }
}

impl fmt::Display for GroupStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry in a group: an assertion outcome or a free-standing note.
#[derive(Clone, Debug)]
pub enum Item {
    Outcome(Outcome),
    Note(Note),
}

impl Item {
    /// Whether a report filter counts this item as passing. Notes always do.
    pub(crate) fn counts_as_passing(&self) -> bool {
        match self {
            Item::Outcome(outcome) => outcome.passed(),
            Item::Note(_) => true,
        }
    }
}

/// A named collection of outcomes and notes, in insertion order.
#[derive(Clone, Debug)]
pub struct ResultGroup {
    name: String,
    status: GroupStatus,
    items: Vec<Item>,
    pass_count: usize,
    total_count: usize,
    elapsed: Duration,
}

impl ResultGroup {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: GroupStatus::Success,
            items: Vec::new(),
            pass_count: 0,
            total_count: 0,
            elapsed: Duration::ZERO,
        }
    }

    pub(crate) fn push_outcome(&mut self, outcome: Outcome) {
        self.total_count += 1;
        if outcome.passed() {
            self.pass_count += 1;
        }
        self.items.push(Item::Outcome(outcome));
    }

    pub(crate) fn push_note(&mut self, note: Note) {
        self.items.push(Item::Note(note));
    }

    pub(crate) fn set_status(&mut self, status: GroupStatus) {
        self.status = status;
    }

    pub(crate) fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed = elapsed;
    }

    /// Pins the effective status in place. Called when the group's run is
    /// over and it moves to the completed list.
    pub(crate) fn seal(&mut self) {
        self.status = self.effective_status();
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The stored status, as last set.
    pub fn status(&self) -> GroupStatus {
        self.status
    }

    /// The status as reported: a group that never recorded an outcome and
    /// was never marked otherwise reads [`GroupStatus::DidNotFinish`]. Notes
    /// alone do not finish a group.
    pub fn effective_status(&self) -> GroupStatus {
        if self.total_count == 0 && self.status == GroupStatus::Success {
            GroupStatus::DidNotFinish
        } else {
            self.status
        }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Number of passing outcomes.
    pub fn pass_count(&self) -> usize {
        self.pass_count
    }

    /// Number of recorded outcomes. Notes are not counted.
    pub fn total_count(&self) -> usize {
        self.total_count
    }

    /// Aggregate wall-clock duration, measured by the owning tester for
    /// delegated test calls.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
