// vim: tw=80
//! Capture matchers: accumulation order, most-recent value, verification
//! replay.

use mocklet::*;

trait Logger {
    fn log(&self, line: String);
    fn level(&self, severity: i32);
}

mock! {
    MockLogger for Logger {
        fn log(&self, line: String);
        fn level(&self, severity: i32);
    }
}

#[test]
fn stub_captor_accumulates_values_in_call_order() {
    let s = Session::new();
    let logger = MockLogger::new(&s);
    let captor = Captor::<String>::new();

    do_nothing().when(&logger).log(captor.capture(&s));

    logger.log("a".to_string());
    logger.log("b".to_string());
    logger.log("c".to_string());

    assert_eq!(
        vec!["a".to_string(), "b".to_string(), "c".to_string()],
        captor.all_values()
    );
    assert_eq!("c", captor.value());
    s.teardown();
}

#[test]
fn most_recent_value_tracks_each_capture() {
    let s = Session::new();
    let logger = MockLogger::new(&s);
    let captor = Captor::<String>::new();

    do_nothing().when(&logger).log(captor.capture(&s));

    logger.log("first".to_string());
    assert_eq!("first", captor.value());
    logger.log("second".to_string());
    assert_eq!("second", captor.value());
    s.teardown();
}

#[test]
fn verify_captor_captures_matching_calls() {
    let s = Session::new();
    let logger = MockLogger::new(&s);
    let captor = Captor::<i32>::new();

    logger.level(3);
    logger.level(5);

    verify_count(&logger, times(2)).level(captor.capture(&s));
    assert_eq!(vec![3, 5], captor.all_values());
    assert_eq!(5, captor.value());
    s.teardown();
}

#[test]
fn repeated_verification_replays_captures() {
    let s = Session::new();
    let logger = MockLogger::new(&s);
    let captor = Captor::<i32>::new();

    logger.level(3);
    logger.level(5);

    verify_count(&logger, times(2)).level(captor.capture(&s));
    // A second verify over the same history captures the same values
    // again; the captor reflects the most recent verification's matches.
    verify_count(&logger, times(2)).level(captor.capture(&s));

    assert_eq!(vec![3, 5, 3, 5], captor.all_values());
    assert_eq!(5, captor.value());
    s.teardown();
}

#[test]
#[should_panic(expected = "no value has been captured")]
fn value_panics_before_any_capture() {
    let captor = Captor::<i32>::new();
    captor.value();
}
