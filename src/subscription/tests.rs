use super::*;
use assert_call::{call, CallRecorder};
use std::cell::Cell;

#[test]
fn from_fn_calls_on_drop() {
    let mut cr = CallRecorder::new();
    {
        let _s = Subscription::from_fn(|| call!("drop"));
        cr.verify(());
    }
    cr.verify("drop");
}

#[test]
fn from_weak_fn_calls_when_owner_alive() {
    let mut cr = CallRecorder::new();
    let owner = Rc::new(Cell::new(9));
    {
        let _s = Subscription::from_weak_fn(Rc::downgrade(&owner), |o| call!("{}", o.get()));
    }
    cr.verify("9");
}

#[test]
fn from_weak_fn_noop_when_owner_dropped() {
    let mut cr = CallRecorder::new();
    let owner = Rc::new(Cell::new(3));
    let s = Subscription::from_weak_fn(Rc::downgrade(&owner), |o| call!("{}", o.get()));
    drop(owner);
    drop(s);
    cr.verify(());
}

#[test]
fn detach_skips_unsubscribe() {
    let mut cr = CallRecorder::new();
    Subscription::from_fn(|| call!("drop")).detach();
    cr.verify(());
}

#[test]
fn empty_does_nothing() {
    let mut cr = CallRecorder::new();
    drop(Subscription::empty());
    drop(Subscription::default());
    cr.verify(());
}
