// vim: tw=80
//! Verification: literal and matcher queries, call counts, cumulative
//! verifies, failure reports.

use mocklet::*;

trait Counter {
    fn add(&self, n: i32) -> i32;
    fn flush(&self);
}

mock! {
    MockCounter for Counter {
        fn add(&self, n: i32) -> i32;
        fn flush(&self);
    }
}

#[test]
fn verify_matches_literal_arguments() {
    let s = Session::new();
    let counter = MockCounter::new(&s);

    counter.add(6);
    verify(&counter).add(6);
    s.teardown();
}

#[test]
#[should_panic(expected = "Expected exactly 1 call")]
fn verify_rejects_different_literal_arguments() {
    let s = Session::new();
    let counter = MockCounter::new(&s);

    counter.add(6);
    verify(&counter).add(7);
}

#[test]
fn verification_is_cumulative_and_idempotent() {
    let s = Session::new();
    let counter = MockCounter::new(&s);

    counter.add(1);
    // The same recorded call satisfies both verifies and is marked
    // verified by each.
    verify(&counter).add(1);
    verify(&counter).add(1);
    verify_no_more_interactions(&[&counter]);
    s.teardown();
}

#[test]
fn never_passes_while_uncalled() {
    let s = Session::new();
    let counter = MockCounter::new(&s);

    verify_count(&counter, never()).flush();
    s.teardown();
}

#[test]
#[should_panic(expected = "Expected exactly 0 calls")]
fn never_rejects_a_single_call() {
    let s = Session::new();
    let counter = MockCounter::new(&s);

    counter.flush();
    verify_count(&counter, never()).flush();
}

#[test]
#[should_panic(expected = "at least 1 call")]
fn at_least_once_rejects_zero_calls() {
    let s = Session::new();
    let counter = MockCounter::new(&s);

    verify_count(&counter, at_least_once()).flush();
}

#[test]
fn call_count_boundaries() {
    assert!(!between(2, 4).matches(1));
    assert!(between(2, 4).matches(2));
    assert!(between(2, 4).matches(3));
    assert!(between(2, 4).matches(4));
    assert!(!between(2, 4).matches(5));

    assert!(never().matches(0));
    assert!(!never().matches(1));

    assert!(!at_least_once().matches(0));
    assert!(at_least_once().matches(1));
    assert!(at_least_once().matches(100));

    assert!(at_most(2).matches(0));
    assert!(at_most(2).matches(2));
    assert!(!at_most(2).matches(3));

    assert!(any_times().matches(0));
    assert!(any_times().matches(u64::MAX));
}

#[test]
fn verify_counts_matcher_queries_across_arguments() {
    let s = Session::new();
    let counter = MockCounter::new(&s);

    counter.add(1);
    counter.add(2);
    counter.add(3);

    verify_count(&counter, times(3)).add(s.any());
    verify_count(&counter, between(2, 4)).add(s.any());
    verify(&counter).add(2);
    s.teardown();
}

#[test]
#[should_panic(expected = "No method calls happened on this mock")]
fn failure_report_notes_an_empty_ledger() {
    let s = Session::new();
    let counter = MockCounter::new(&s);

    verify(&counter).add(1);
}

#[test]
#[should_panic(expected = "Method calls that did happen")]
fn failure_report_lists_recorded_calls() {
    let s = Session::new();
    let counter = MockCounter::new(&s);

    counter.add(1);
    verify(&counter).add(9);
}

#[test]
fn stub_then_call_then_verify_scenario() {
    let s = Session::new();
    let counter = MockCounter::new(&s);

    return_const(10).when(&counter).add(s.eq(5));

    assert_eq!(10, counter.add(5));
    assert_eq!(0, counter.add(6));

    verify(&counter).add(5);
    verify_count(&counter, times(2)).add(s.any());
    s.teardown();
}

#[test]
#[should_panic(expected = "Expected exactly 3 calls")]
fn scenario_overcounting_fails() {
    let s = Session::new();
    let counter = MockCounter::new(&s);

    counter.add(5);
    counter.add(6);
    verify_count(&counter, times(3)).add(s.any());
}

#[test]
fn verification_queries_are_not_recorded() {
    let s = Session::new();
    let counter = MockCounter::new(&s);

    counter.flush();
    verify(&counter).flush();
    // The query above must not have added a second flush to the ledger.
    verify(&counter).flush();
    verify_count(&counter, times(1)).flush();
    s.teardown();
}
