//! Attachment lifecycle, multiple stores on one document, and the
//! reentrancy guard.

use std::{cell::Cell, rc::Rc};

use focuslink_core::{
    Document, FocusAction, FocusConfig, FocusEnhancer, FocusReducer, FocusState, FocusedStore,
    Store, focus, reduce,
};
use focuslink_harness::{Element, NodeId, SimDocument};

fn bind(document: &SimDocument) -> FocusedStore<FocusState, FocusAction, SimDocument> {
    FocusEnhancer::new(document.clone()).enhance(|| Store::new(FocusReducer, FocusState::new()))()
}

fn managed(document: &SimDocument, id: &str, focus_id: &str) -> NodeId {
    document.append(Element::input().with_id(id).with_attribute("data-focus", focus_id))
}

#[test]
fn attach_registers_two_listeners_and_one_subscription() {
    let document = SimDocument::new();
    let store = bind(&document);

    assert!(store.is_attached());
    assert_eq!(document.listener_count(), 2);
    assert_eq!(store.listener_count(), 1);
}

#[test]
fn disposed_store_ignores_native_focus() {
    let document = SimDocument::new();
    let email = managed(&document, "email", "a");

    let store = bind(&document).dispose();
    document.focus(&email);

    assert_eq!(document.listener_count(), 0);
    assert_eq!(store.listener_count(), 0);
    assert_eq!(store.get_state().element, None);
}

#[test]
fn disposed_store_no_longer_moves_focus() {
    let document = SimDocument::new();
    managed(&document, "email", "a");

    let store = bind(&document).dispose();
    store.dispatch(focus("a")).expect("dispatch");

    assert_eq!(document.pending_microtasks(), 0);
    assert_eq!(document.active_element(), None);
}

#[test]
fn microtask_queued_before_disposal_does_nothing() {
    let document = SimDocument::new();
    managed(&document, "email", "a");
    let store = bind(&document);

    store.dispatch(focus("a")).expect("dispatch");
    assert_eq!(document.pending_microtasks(), 1);
    let _plain = store.dispose();

    assert_eq!(document.run_microtasks(), Ok(1));
    assert_eq!(document.active_element(), None);
}

#[test]
fn dropping_focused_store_detaches() {
    let document = SimDocument::new();
    let store = bind(&document);
    let plain = store.store().clone();

    drop(store);

    assert_eq!(document.listener_count(), 0);
    assert_eq!(plain.listener_count(), 0);
}

#[test]
fn enhancer_attach_binds_existing_store() {
    let document = SimDocument::new();
    let email = managed(&document, "email", "a");
    let plain = Store::new(FocusReducer, FocusState::new());

    let bound: FocusedStore<FocusState, FocusAction, SimDocument> =
        FocusEnhancer::new(document.clone()).attach(plain.clone());
    document.focus(&email);

    assert!(bound.is_attached());
    assert_eq!(plain.get_state().element_str(), Some("a"));
}

#[test]
fn two_stores_track_the_same_document_independently() {
    let document = SimDocument::new();
    let email = managed(&document, "email", "a");
    let password = managed(&document, "password", "b");
    let first = bind(&document);
    let second = bind(&document);

    document.focus(&email);
    assert_eq!(first.get_state().element_str(), Some("a"));
    assert_eq!(second.get_state().element_str(), Some("a"));

    let first = first.dispose();
    document.focus(&password);
    document.run_microtasks().expect("settle");

    assert_eq!(first.get_state().element_str(), Some("a"));
    assert_eq!(second.get_state().element_str(), Some("b"));
    assert!(second.is_attached());
    assert_eq!(document.listener_count(), 2);
}

#[test]
fn invalid_config_is_rejected_before_attaching() {
    let document = SimDocument::new();
    let config = FocusConfig::default().with_attribute("data focus");

    assert!(FocusEnhancer::with_config(document.clone(), config).is_err());
    assert_eq!(document.listener_count(), 0);
}

fn counting_store(
    document: &SimDocument,
    guard: bool,
) -> (FocusedStore<FocusState, FocusAction, SimDocument>, Rc<Cell<usize>>) {
    let reductions = Rc::new(Cell::new(0));
    let counter = Rc::clone(&reductions);
    let reducer = move |state: &Rc<FocusState>, action: &FocusAction| {
        counter.set(counter.get() + 1);
        reduce(state, action)
    };

    let config = FocusConfig::default().with_reentrancy_guard(guard);
    let store = FocusEnhancer::with_config(document.clone(), config)
        .expect("valid config")
        .enhance(|| Store::new(reducer, FocusState::new()))();
    (store, reductions)
}

#[test]
fn forward_sync_echo_is_dispatched_without_guard() {
    let document = SimDocument::new();
    let email = managed(&document, "email", "a");
    let (store, reductions) = counting_store(&document, false);

    store.dispatch(focus("a")).expect("dispatch");
    document.run_microtasks().expect("settle");

    assert_eq!(document.active_element(), Some(email));
    assert_eq!(reductions.get(), 2, "focusin echo reaches the reducer");
}

#[test]
fn reentrancy_guard_suppresses_forward_sync_echo() {
    let document = SimDocument::new();
    let email = managed(&document, "email", "a");
    let (store, reductions) = counting_store(&document, true);

    store.dispatch(focus("a")).expect("dispatch");
    document.run_microtasks().expect("settle");

    assert_eq!(document.active_element(), Some(email));
    assert_eq!(reductions.get(), 1);

    // User-driven events still flow through.
    document.blur(&email);
    assert_eq!(store.get_state().element, None);
}
