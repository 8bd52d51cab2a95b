// vim: tw=80
//! Stubbing: canned returns, shadowing, computed answers, raised errors.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::rc::Rc;

use mocklet::*;

#[derive(Clone, Debug, PartialEq, Eq, Default)]
struct Page(String);

#[derive(Clone, Debug, PartialEq, Eq)]
struct FetchError(String);

trait Store {
    fn get(&self, key: String) -> Page;
    fn put(&mut self, key: String, page: Page);
    fn size(&self) -> u64;
    fn fetch(&self, key: String) -> Result<Page, FetchError>;
}

mock! {
    MockStore for Store {
        fn get(&self, key: String) -> Page;
        fn put(&mut self, key: String, page: Page);
        fn size(&self) -> u64;
        fn fetch(&self, key: String) -> Result<Page, FetchError>;
    }
}

#[test]
fn unstubbed_calls_return_zero_values_and_are_recorded() {
    let s = Session::new();
    let store = MockStore::new(&s);

    assert_eq!(Page::default(), store.get("a".to_string()));
    assert_eq!(0, store.size());
    assert_eq!(Ok(Page::default()), store.fetch("a".to_string()));

    verify(&store).get(s.eq("a".to_string()));
    verify(&store).size();
    verify(&store).fetch(s.eq("a".to_string()));
    s.teardown();
}

#[test]
fn return_const_matches_literal_arguments() {
    let s = Session::new();
    let store = MockStore::new(&s);

    return_const(Page("cached".into()))
        .when(&store)
        .get("a".to_string());

    assert_eq!(Page("cached".into()), store.get("a".to_string()));
    // Different argument, no matching stub: zero value.
    assert_eq!(Page::default(), store.get("b".to_string()));
    s.teardown();
}

#[test]
fn most_recent_stub_shadows_earlier_one() {
    let s = Session::new();
    let store = MockStore::new(&s);

    return_const(Page("first".into())).when(&store).get("a".to_string());
    return_const(Page("second".into())).when(&store).get("a".to_string());

    assert_eq!(Page("second".into()), store.get("a".to_string()));
    s.teardown();
}

#[test]
fn per_argument_stubs_select_by_matcher() {
    let s = Session::new();
    let store = MockStore::new(&s);

    return_const(Page("five".into())).when(&store).get(s.eq("5".to_string()));
    return_const(Page("six".into())).when(&store).get(s.eq("6".to_string()));

    assert_eq!(Page("five".into()), store.get("5".to_string()));
    assert_eq!(Page("six".into()), store.get("6".to_string()));
    s.teardown();
}

#[test]
fn returning_runs_the_computation_each_call() {
    let s = Session::new();
    let store = MockStore::new(&s);

    let mut counter = 0u64;
    returning(move || {
        counter += 1;
        counter
    })
    .when(&store)
    .size();

    assert_eq!(1, store.size());
    assert_eq!(2, store.size());
    s.teardown();
}

#[test]
fn returning_st_allows_non_send_closures() {
    let s = Session::new();
    let store = MockStore::new(&s);

    let shared = Rc::new(7u64);
    returning_st(move || *shared).when(&store).size();

    assert_eq!(7, store.size());
    s.teardown();
}

#[test]
fn fail_with_is_delivered_as_err_for_result_methods() {
    let s = Session::new();
    let store = MockStore::new(&s);

    fail_with(FetchError("offline".into())).when(&store).fetch(s.any());

    assert_eq!(
        Err(FetchError("offline".into())),
        store.fetch("a".to_string())
    );
    s.teardown();
}

#[test]
fn fail_with_propagates_the_exact_value_on_plain_methods() {
    let s = Session::new();
    let store = MockStore::new(&s);

    fail_with(FetchError("boom".into())).when(&store).get(s.any());

    let payload = catch_unwind(AssertUnwindSafe(|| {
        store.get("a".to_string());
    }))
    .unwrap_err();
    let stubbed = payload.downcast::<StubbedError>().unwrap();
    assert_eq!(
        Some(&FetchError("boom".into())),
        stubbed.0.downcast_ref::<FetchError>().ok()
    );
    s.teardown();
}

#[test]
fn do_nothing_stubs_void_methods() {
    let s = Session::new();
    let mut store = MockStore::new(&s);

    do_nothing().when(&store).put(s.any(), s.any());
    store.put("k".to_string(), Page("v".into()));

    verify(&store).put(s.eq("k".to_string()), s.eq(Page("v".into())));
    s.teardown();
}

#[test]
#[should_panic(expected = "can't return")]
fn incompatible_return_type_fails_at_stub_time() {
    let s = Session::new();
    let store = MockStore::new(&s);

    // size() returns u64; stubbing it with an i32 constant must fail now,
    // not when the method is eventually called.
    return_const(5i32).when(&store).size();
}

#[test]
#[should_panic(expected = "which is not a")]
fn computed_stub_type_mismatch_surfaces_at_the_call() {
    let s = Session::new();
    let store = MockStore::new(&s);

    returning(|| "not a number".to_string()).when(&store).size();
    store.size();
}

#[test]
fn stub_registration_is_not_a_recorded_interaction() {
    let s = Session::new();
    let store = MockStore::new(&s);

    return_const(Page("x".into())).when(&store).get(s.any());
    verify_zero_interactions(&[&store]);
    s.teardown();
}
