// vim: tw=80
//! Argument matchers: placeholders, exclusivity with literals, custom
//! predicates.

use mocklet::*;

trait Gauge {
    fn record(&self, name: String, value: i64);
    fn scale(&self, factor: i64) -> i64;
}

mock! {
    MockGauge for Gauge {
        fn record(&self, name: String, value: i64);
        fn scale(&self, factor: i64) -> i64;
    }
}

#[test]
fn any_matches_every_argument() {
    let s = Session::new();
    let gauge = MockGauge::new(&s);

    return_const(99i64).when(&gauge).scale(s.any());

    assert_eq!(99, gauge.scale(1));
    assert_eq!(99, gauge.scale(-40));
    s.teardown();
}

#[test]
fn eq_matches_by_value() {
    let s = Session::new();
    let gauge = MockGauge::new(&s);

    return_const(1i64).when(&gauge).scale(s.eq(10));

    assert_eq!(1, gauge.scale(10));
    assert_eq!(0, gauge.scale(11));
    s.teardown();
}

#[test]
fn is_a_matches_any_value_of_the_type() {
    let s = Session::new();
    let gauge = MockGauge::new(&s);

    gauge.record("rps".to_string(), 7);
    verify(&gauge).record(s.is_a::<String>(), s.is_a::<i64>());
    s.teardown();
}

#[test]
fn matching_accepts_arbitrary_predicates() {
    let s = Session::new();
    let gauge = MockGauge::new(&s);

    return_const(1i64).when(&gauge).scale(s.matching(predicate::gt(4)));

    assert_eq!(1, gauge.scale(5));
    assert_eq!(0, gauge.scale(3));
    s.teardown();
}

#[test]
#[should_panic(expected = "can't mix matchers and literal values")]
fn mixing_matchers_and_literals_is_rejected() {
    let s = Session::new();
    let gauge = MockGauge::new(&s);

    gauge.record("rps".to_string(), 7);
    // One matcher for a two-argument call: usage error.
    verify(&gauge).record(s.any(), 7);
}

#[test]
fn all_literal_arguments_always_work() {
    let s = Session::new();
    let gauge = MockGauge::new(&s);

    gauge.record("rps".to_string(), 7);
    verify(&gauge).record("rps".to_string(), 7);
    s.teardown();
}

#[test]
#[should_panic(expected = "outstanding matchers")]
fn leftover_matchers_fail_teardown() {
    let s = Session::new();
    let _placeholder: i64 = s.any();
    s.teardown();
}

#[test]
#[should_panic(expected = "outstanding matchers")]
fn leftover_matchers_fail_verify_begin() {
    let s = Session::new();
    let gauge = MockGauge::new(&s);

    let _placeholder: i64 = s.any();
    verify(&gauge).scale(4);
}
