// Copyright (c) The verdict Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![forbid(unsafe_code)]

//! In-process assertion engine with grouped, thread-safe result collection.
//!
//! A [`Tester`] collects every assertion's [`Outcome`] into [`ResultGroup`]s,
//! renders them as a plain-text report, and exports the whole session as
//! JSON. Comparisons run through an ordered capability chain (text views,
//! a user `equals` probe, native equality, rendered strings), so values of
//! different types compare sensibly without a shared trait bound beyond
//! [`Value`].
//!
//! Unlike panic-on-failure assertion macros, failures here are recorded and
//! reported; escalation to a panic is opt-in per [`Setting`].
//!
//! ```
//! use verdict::Tester;
//!
//! let tester = Tester::new();
//! tester.test_one(2 + 2, 4);
//! tester.test("parsing", |t| {
//!     t.test_one("4".parse::<i32>().ok(), Some(4));
//!     t.test_true("4".parse::<i32>().is_ok());
//! });
//!
//! let groups = tester.snapshot();
//! assert_eq!(groups.len(), 2);
//! assert_eq!(groups[0].name(), "parsing");
//! assert_eq!(groups[0].pass_count(), 2);
//! ```

mod compare;
mod errors;
mod group;
mod helpers;
mod outcome;
mod report;
mod runner;
mod strdiff;
mod stringify;
mod suite;
mod summary;
mod tester;
mod time;
mod value;

pub use compare::{AliasPolicy, ComparePath, Comparison, compare, equal};
pub use errors::{AliasError, ExportError, SettingParseError, TestAbort};
pub use group::{GroupStatus, Item, ResultGroup};
pub use outcome::{CallSite, Note, Outcome, Severity};
pub use report::{ReportFilter, ReportOptions};
pub use runner::{PairSet, PairedRunner, RangeRunner};
pub use strdiff::{DiffKind, DiffRun, StringDiff, diff};
pub use stringify::{RenderSource, Rendering, rendering, show};
pub use suite::Suite;
pub use summary::{GroupSummary, ItemSummary, NoteSummary, OutcomeSummary, SessionSummary};
pub use tester::{Setting, Tester};
pub use time::{Clock, MonotonicClock};
pub use value::{Number, Value};
