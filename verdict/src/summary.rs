// Copyright (c) The verdict Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serializable snapshot of a whole session.
//!
//! The summary tree mirrors the live data model field for field, so a
//! serialized session deserializes back into equivalent groups via
//! [`SessionSummary::into_groups`]. Items are tagged by `kind`, one of
//! `result`, `testMessage` or `error`.

use crate::{
    group::{GroupStatus, Item, ResultGroup},
    outcome::{CallSite, Note, Outcome, Severity},
    strdiff::StringDiff,
    tester::Setting,
};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::{borrow::Cow, time::Duration};

/// Everything a tester has recorded, in serializable form.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub groups: Vec<GroupSummary>,
    pub settings: IndexMap<Setting, bool>,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub name: String,
    pub status: GroupStatus,
    pub pass_count: usize,
    pub total_count: usize,
    #[serde(with = "duration_secs")]
    pub duration_secs: Duration,
    pub items: Vec<ItemSummary>,
}

/// One recorded item, tagged by kind.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(tag = "kind")]
pub enum ItemSummary {
    #[serde(rename = "result")]
    Result(OutcomeSummary),
    #[serde(rename = "testMessage")]
    Message { severity: Severity, message: String },
    #[serde(rename = "error")]
    Error { code: i32, message: String },
}

/// One assertion outcome with its provenance flattened in.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeSummary {
    pub group_index: usize,
    pub test_index: usize,
    pub passed: bool,
    #[serde(with = "duration_secs")]
    pub duration_secs: Duration,
    pub actual: String,
    pub expected: String,
    pub actual_type: String,
    pub expected_type: String,
    pub message: String,
    pub file: String,
    pub line: u32,
    pub function: String,
    pub signature: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diff: Option<StringDiff>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<NoteSummary>,
}

/// An advisory attached to an outcome.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(tag = "kind")]
pub enum NoteSummary {
    #[serde(rename = "testMessage")]
    Message { severity: Severity, message: String },
    #[serde(rename = "error")]
    Error { code: i32, message: String },
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer, de::Error};
    use std::time::Duration;

    pub(super) fn serialize<S: Serializer>(
        duration: &Duration,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(duration.as_secs_f64())
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(D::Error::custom)
    }
}

impl SessionSummary {
    pub(crate) fn new(groups: Vec<ResultGroup>, settings: IndexMap<Setting, bool>) -> Self {
        Self {
            groups: groups.iter().map(GroupSummary::from_group).collect(),
            settings,
        }
    }

    /// Rebuilds live groups from the summary.
    pub fn into_groups(self) -> Vec<ResultGroup> {
        self.groups
            .into_iter()
            .map(GroupSummary::into_group)
            .collect()
    }
}

impl GroupSummary {
    fn from_group(group: &ResultGroup) -> Self {
        Self {
            name: group.name().to_owned(),
            status: group.status(),
            pass_count: group.pass_count(),
            total_count: group.total_count(),
            duration_secs: group.elapsed(),
            items: group.items().iter().map(ItemSummary::from_item).collect(),
        }
    }

    fn into_group(self) -> ResultGroup {
        let mut group = ResultGroup::new(self.name);
        for item in self.items {
            match item {
                ItemSummary::Result(outcome) => group.push_outcome(outcome.into_outcome()),
                ItemSummary::Message { severity, message } => {
                    group.push_note(Note::message(severity, message));
                }
                ItemSummary::Error { code, message } => {
                    group.push_note(Note::error(code, message));
                }
            }
        }
        group.set_status(self.status);
        group.set_elapsed(self.duration_secs);
        group.seal();
        group
    }
}

impl ItemSummary {
    fn from_item(item: &Item) -> Self {
        match item {
            Item::Outcome(outcome) => ItemSummary::Result(OutcomeSummary::from_outcome(outcome)),
            Item::Note(Note::Message { severity, text }) => ItemSummary::Message {
                severity: *severity,
                message: text.clone(),
            },
            Item::Note(Note::Error { code, text }) => ItemSummary::Error {
                code: *code,
                message: text.clone(),
            },
        }
    }
}

impl OutcomeSummary {
    fn from_outcome(outcome: &Outcome) -> Self {
        let site = outcome.call_site();
        Self {
            group_index: outcome.group_index(),
            test_index: outcome.test_index(),
            passed: outcome.passed(),
            duration_secs: outcome.elapsed(),
            actual: outcome.actual().to_owned(),
            expected: outcome.expected().to_owned(),
            actual_type: outcome.actual_type().to_owned(),
            expected_type: outcome.expected_type().to_owned(),
            message: outcome.message().to_owned(),
            file: site.file.clone().into_owned(),
            line: site.line,
            function: site.function.clone().into_owned(),
            signature: site.signature.clone(),
            diff: outcome.diff().cloned(),
            notes: outcome.notes().iter().map(NoteSummary::from_note).collect(),
        }
    }

    fn into_outcome(self) -> Outcome {
        let site = CallSite {
            file: Cow::Owned(self.file),
            line: self.line,
            function: Cow::Owned(self.function),
            signature: self.signature,
        };
        let mut outcome = Outcome::from_parts(
            self.passed,
            self.group_index,
            self.test_index,
            self.actual,
            self.expected,
            Cow::Owned(self.actual_type),
            Cow::Owned(self.expected_type),
            self.message,
            site,
        );
        outcome.set_elapsed(self.duration_secs);
        if let Some(diff) = self.diff {
            outcome.set_diff(diff);
        }
        for note in self.notes {
            outcome.push_note(note.into_note());
        }
        outcome
    }
}

impl NoteSummary {
    fn from_note(note: &Note) -> Self {
        match note {
            Note::Message { severity, text } => NoteSummary::Message {
                severity: *severity,
                message: text.clone(),
            },
            Note::Error { code, text } => NoteSummary::Error {
                code: *code,
                message: text.clone(),
            },
        }
    }

    fn into_note(self) -> Note {
        match self {
            NoteSummary::Message { severity, message } => Note::message(severity, message),
            NoteSummary::Error { code, message } => Note::error(code, message),
        }
    }
}
