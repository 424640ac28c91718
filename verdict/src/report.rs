// Copyright (c) The verdict Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plain-text rendering of result groups.
//!
//! Outcomes and groups carry structured data only; everything presentational
//! (layout, ANSI styling, diff markers) lives here. Reports are collapsed by
//! default, one line per retained item, and can be expanded to a detail block
//! per outcome.

use crate::{
    group::{GroupStatus, Item, ResultGroup},
    helpers::DisplaySecs,
    outcome::{Note, Outcome, Severity},
    strdiff::{DiffKind, DiffRun, StringDiff},
};
use owo_colors::{OwoColorize, Style};
use std::fmt;
use swrite::{SWrite, swrite};

const SEPARATOR: &str = "----------------------------------------------------------";

/// Which items a rendered report keeps.
///
/// Notes ride with the passing side: they appear under `All` and
/// `PassingOnly` and are dropped by `FailingOnly`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ReportFilter {
    #[default]
    All,
    PassingOnly,
    FailingOnly,
}

impl ReportFilter {
    fn retains(self, item: &Item) -> bool {
        match self {
            ReportFilter::All => true,
            ReportFilter::PassingOnly => item.counts_as_passing(),
            ReportFilter::FailingOnly => !item.counts_as_passing(),
        }
    }
}

/// Options for [`Tester::render_with`](crate::Tester::render_with).
#[derive(Debug, Default)]
pub struct ReportOptions {
    filter: ReportFilter,
    expand: bool,
    styles: Styles,
}

impl ReportOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps only the items the filter retains.
    pub fn filter(mut self, filter: ReportFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Renders a detail block under every outcome line.
    pub fn expand(mut self) -> Self {
        self.expand = true;
        self
    }

    /// Applies ANSI styling. Off by default; diff markers degrade to
    /// `[..]` and `{+..+}` spans when plain.
    pub fn colorize(mut self) -> Self {
        self.styles.colorize();
        self
    }
}

#[derive(Debug, Default)]
struct Styles {
    is_colorized: bool,
    group_name: Style,
    label: Style,
    pass: Style,
    fail: Style,
    skip: Style,
    log: Style,
    warning: Style,
    severe: Style,
    fail_note: Style,
    error_note: Style,
    mismatch: Style,
    extra: Style,
}

impl Styles {
    fn colorize(&mut self) {
        self.is_colorized = true;
        self.group_name = Style::new().bright_green().bold().underline();
        self.label = Style::new().bold();
        self.pass = Style::new().green().bold();
        self.fail = Style::new().red().bold();
        self.skip = Style::new().yellow().bold();
        self.log = Style::new().bright_blue();
        self.warning = Style::new().yellow();
        self.severe = Style::new().bright_magenta();
        self.fail_note = Style::new().red().bold();
        self.error_note = Style::new().red();
        self.mismatch = Style::new().on_red();
        self.extra = Style::new().on_yellow();
    }

    fn status(&self, status: GroupStatus) -> Style {
        match status {
            GroupStatus::Success | GroupStatus::SuccessEarly => self.pass,
            GroupStatus::Failure | GroupStatus::FailureEarly => self.fail,
            GroupStatus::DidNotFinish => self.skip,
        }
    }

    fn severity(&self, severity: Severity) -> Style {
        match severity {
            Severity::Log => self.log,
            Severity::Warning => self.warning,
            Severity::Severe => self.severe,
            Severity::Fail => self.fail_note,
        }
    }
}

pub(crate) fn render_groups(groups: &[ResultGroup], options: &ReportOptions) -> String {
    let mut out = String::new();
    for group in groups {
        render_group(&mut out, group, options);
    }
    out
}

fn render_group(out: &mut String, group: &ResultGroup, options: &ReportOptions) {
    let styles = &options.styles;
    swrite!(
        out,
        "{} | {}/{} passed | status: {} in {}\n{SEPARATOR}\n",
        group.name().style(styles.group_name),
        group.pass_count(),
        group.total_count(),
        group.status().as_str().style(styles.status(group.status())),
        DisplaySecs(group.elapsed()),
    );
    for item in group.items() {
        if !options.filter.retains(item) {
            continue;
        }
        match item {
            Item::Outcome(outcome) => render_outcome(out, outcome, options),
            Item::Note(note) => swrite!(out, "|- {}\n", note_line(note, styles)),
        }
    }
}

fn render_outcome(out: &mut String, outcome: &Outcome, options: &ReportOptions) {
    let styles = &options.styles;
    let verdict = if outcome.passed() {
        styles.pass
    } else {
        styles.fail
    };
    swrite!(
        out,
        "|- group {} | test {} | result: {} in {}",
        outcome.group_index(),
        outcome.test_index(),
        outcome.passed().style(verdict),
        DisplaySecs(outcome.elapsed()),
    );
    for note in outcome.notes() {
        swrite!(out, " | {}", note_line(note, styles));
    }
    out.push('\n');
    if options.expand {
        render_detail(out, outcome, styles);
    }
}

fn render_detail(out: &mut String, outcome: &Outcome, styles: &Styles) {
    swrite!(
        out,
        "|    {} {} ({})\n|    {} {} ({})\n",
        "was:     ".style(styles.label),
        outcome.actual(),
        outcome.actual_type(),
        "expected:".style(styles.label),
        outcome.expected(),
        outcome.expected_type(),
    );
    let site = outcome.call_site();
    swrite!(
        out,
        "|    {} {}:{}\n|    {} {}\n|    {} {}\n",
        "at:".style(styles.label),
        site.file,
        site.line,
        "in:".style(styles.label),
        site.function,
        "as:".style(styles.label),
        site.signature,
    );
    if !outcome.message().is_empty() {
        swrite!(
            out,
            "|    {} {}\n",
            "message:".style(styles.label),
            outcome.message()
        );
    }
    if let Some(diff) = outcome.diff() {
        render_diff(out, diff, styles);
    }
}

fn render_diff(out: &mut String, diff: &StringDiff, styles: &Styles) {
    swrite!(
        out,
        "|    {} actual {} chars, expected {} chars, {} mismatched\n\
         |      actual:   {}\n\
         |      expected: {}\n",
        "diff:".style(styles.label),
        diff.actual_chars(),
        diff.expected_chars(),
        diff.mismatches(),
        diff_side(diff.actual_runs(), styles),
        diff_side(diff.expected_runs(), styles),
    );
}

fn diff_side(runs: &[DiffRun], styles: &Styles) -> String {
    let mut out = String::new();
    for run in runs {
        match run.kind {
            DiffKind::Match => swrite!(out, "{}", run.text),
            DiffKind::Mismatch if styles.is_colorized => {
                swrite!(out, "{}", run.text.style(styles.mismatch));
            }
            DiffKind::Mismatch => swrite!(out, "[{}]", run.text),
            DiffKind::Extra if styles.is_colorized => {
                swrite!(out, "{}", run.text.style(styles.extra));
            }
            DiffKind::Extra => swrite!(out, "{{+{}+}}", run.text),
        }
    }
    out
}

fn note_line(note: &Note, styles: &Styles) -> String {
    match note {
        Note::Message { severity, text } => {
            let style = styles.severity(*severity);
            format!("{}: {}", severity.as_str().style(style), text.style(style))
        }
        Note::Error { code, text } => {
            let line = format!("(error code {code}) {text}");
            format!("{}", line.style(styles.error_note))
        }
    }
}

/// The expanded plain rendering. This is also the text escalation payloads
/// carry.
impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let options = ReportOptions::new().expand();
        let mut out = String::new();
        render_outcome(&mut out, self, &options);
        f.write_str(out.trim_end_matches('\n'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tester::Tester;

    fn sample_groups() -> Vec<ResultGroup> {
        let tester = Tester::new();
        tester.test_one(2, 3);
        tester.test_one(1, 1);
        tester.add_note(Severity::Log, "checked both");
        tester.snapshot()
    }

    #[test]
    fn collapsed_report_has_header_separator_and_item_lines() {
        let report = render_groups(&sample_groups(), &ReportOptions::new());
        let mut lines = report.lines();
        let header = lines.next().unwrap();
        assert!(
            header.starts_with("(default) | 1/2 passed | status: SUCCESS in "),
            "{header}"
        );
        assert_eq!(lines.next().unwrap(), SEPARATOR);
        let first = lines.next().unwrap();
        assert!(
            first.starts_with("|- group 1 | test 1 | result: false"),
            "{first}"
        );
        assert!(report.contains("LOG: checked both"), "{report}");
        // Collapsed output carries no detail lines.
        assert!(!report.contains("was:"), "{report}");
    }

    #[test]
    fn passing_only_keeps_passes_and_notes() {
        let report = render_groups(
            &sample_groups(),
            &ReportOptions::new().filter(ReportFilter::PassingOnly),
        );
        assert!(!report.contains("result: false"), "{report}");
        assert!(report.contains("result: true"), "{report}");
        assert!(report.contains("LOG: checked both"), "{report}");
    }

    #[test]
    fn failing_only_drops_passes_and_notes() {
        let report = render_groups(
            &sample_groups(),
            &ReportOptions::new().filter(ReportFilter::FailingOnly),
        );
        assert!(report.contains("result: false"), "{report}");
        assert!(!report.contains("result: true"), "{report}");
        assert!(!report.contains("LOG"), "{report}");
    }

    #[test]
    fn expanded_report_shows_the_detail_block() {
        let tester = Tester::new();
        tester.test_one_msg(2, 3, "off by one");
        let report = render_groups(&tester.snapshot(), &ReportOptions::new().expand());
        assert!(report.contains("|    was:      2 (i32)"), "{report}");
        assert!(report.contains("|    expected: 3 (i32)"), "{report}");
        assert!(report.contains("|    at: "), "{report}");
        assert!(report.contains("report.rs:"), "{report}");
        assert!(report.contains("|    as: test_one(i32 actual = 2"), "{report}");
        assert!(report.contains("|    message: off by one"), "{report}");
    }

    #[test]
    fn plain_diff_marks_mismatches_and_extras() {
        let tester = Tester::new();
        tester.test_one("ab", "abcd");
        let report = render_groups(&tester.snapshot(), &ReportOptions::new().expand());
        assert!(
            report.contains("diff: actual 2 chars, expected 4 chars, 2 mismatched"),
            "{report}"
        );
        assert!(report.contains("|      actual:   ab\n"), "{report}");
        assert!(report.contains("|      expected: ab{+cd+}"), "{report}");
    }

    #[test]
    fn colorize_emits_ansi_and_plain_does_not() {
        let groups = sample_groups();
        let plain = render_groups(&groups, &ReportOptions::new());
        assert!(!plain.contains('\u{1b}'), "{plain}");
        let colored = render_groups(&groups, &ReportOptions::new().colorize());
        assert!(colored.contains("\u{1b}["), "{colored}");
    }

    #[test]
    fn outcome_display_is_the_expanded_form() {
        let tester = Tester::new();
        let text = tester.test_one(2, 3).to_string();
        assert!(text.starts_with("|- group 1 | test 1 | result: false"), "{text}");
        assert!(text.contains("was:      2 (i32)"), "{text}");
        assert!(!text.ends_with('\n'));
    }

    #[test]
    fn did_not_finish_groups_render_their_status() {
        let tester = Tester::new();
        tester.test("empty", |_| {});
        let report = render_groups(&tester.snapshot(), &ReportOptions::new());
        assert!(
            report.contains("empty | 0/0 passed | status: DID NOT FINISH"),
            "{report}"
        );
    }
}
