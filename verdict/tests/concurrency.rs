// Copyright (c) The verdict Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::thread;
use verdict::{GroupStatus, Item, Setting, Tester};

#[test]
fn two_threads_share_one_tester_without_losing_outcomes() {
    let tester = Tester::new();
    thread::scope(|scope| {
        for _ in 0..2 {
            scope.spawn(|| {
                for i in 0..100 {
                    tester.test_one(i, i);
                }
            });
        }
    });

    let groups = tester.snapshot();
    let current = groups.last().unwrap();
    assert_eq!(current.total_count(), 200);
    assert_eq!(current.pass_count(), 200);
    assert_eq!(current.items().len(), 200);
}

#[test]
fn delegated_sub_tests_merge_whole_groups() {
    let tester = Tester::new();
    thread::scope(|scope| {
        for worker in 0..4 {
            let tester = &tester;
            scope.spawn(move || {
                tester.test(format!("worker-{worker}"), |sub| {
                    for i in 0..50 {
                        sub.test_one(i, i);
                    }
                });
            });
        }
    });

    let groups = tester.snapshot();
    // Four named groups in some merge order, plus the untouched default.
    assert_eq!(groups.len(), 5);
    let mut names: Vec<_> = groups[..4].iter().map(|group| group.name().to_owned()).collect();
    names.sort();
    assert_eq!(names, ["worker-0", "worker-1", "worker-2", "worker-3"]);

    for group in &groups[..4] {
        assert_eq!(group.status(), GroupStatus::Success);
        assert_eq!(group.total_count(), 50);
        // No interleaving: within a merged group the outcomes are the
        // sub-tester's, in call order.
        let indexes: Vec<_> = group
            .items()
            .iter()
            .map(|item| match item {
                Item::Outcome(outcome) => outcome.group_index(),
                Item::Note(note) => panic!("unexpected note: {note:?}"),
            })
            .collect();
        assert_eq!(indexes, (1..=50).collect::<Vec<_>>());
    }
}

#[test]
fn settings_updates_are_visible_across_threads() {
    let tester = Tester::new();
    thread::scope(|scope| {
        scope.spawn(|| {
            tester.update_setting(Setting::PrintSync, true);
        });
    });
    assert!(tester.setting(Setting::PrintSync));
}
