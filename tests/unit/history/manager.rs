use super::*;
use crate::model::document::Document;
use crate::model::slide::{Slide, SlideId, TextField};

use proptest::prelude::*;

fn state(label: &str) -> Snapshot {
    let mut doc = Document::new(15);
    doc.replace_slides(vec![Slide::blank(SlideId(0))]);
    doc.set_text(TextField::Headline, label).unwrap();
    Snapshot::capture(&doc)
}

fn headline(s: &Snapshot) -> &str {
    &s.state().slides[0].text.headline
}

#[test]
fn empty_history_cannot_move() {
    let mut h = History::new(10);
    assert_eq!(h.pointer(), None);
    assert!(h.undo().is_none());
    assert!(h.redo().is_none());
}

#[test]
fn duplicate_commits_are_ignored() {
    let mut h = History::new(10);
    assert!(h.commit(state("a")));
    assert!(!h.commit(state("a")));
    assert_eq!(h.len(), 1);
    assert!(h.commit(state("b")));
    assert_eq!(h.len(), 2);
}

#[test]
fn undo_redo_walk_the_stack() {
    let mut h = History::new(10);
    for s in ["a", "b", "c"] {
        h.commit(state(s));
    }
    assert_eq!(headline(h.undo().unwrap()), "b");
    assert_eq!(headline(h.undo().unwrap()), "a");
    assert!(h.undo().is_none());
    assert_eq!(h.pointer(), Some(0));
    assert_eq!(headline(h.redo().unwrap()), "b");
    assert_eq!(headline(h.redo().unwrap()), "c");
    assert!(h.redo().is_none());
}

#[test]
fn commit_after_undo_abandons_redo_branch() {
    let mut h = History::new(10);
    for s in ["a", "b", "c"] {
        h.commit(state(s));
    }
    h.undo();
    h.undo();
    h.commit(state("x"));
    assert_eq!(h.len(), 2);
    assert!(!h.can_redo());
    assert_eq!(headline(h.current().unwrap()), "x");
}

#[test]
fn discard_redo_without_commit() {
    let mut h = History::new(10);
    h.commit(state("a"));
    h.commit(state("b"));
    h.undo();
    h.discard_redo();
    assert_eq!(h.len(), 1);
    assert!(!h.can_redo());
}

#[test]
fn overflow_evicts_oldest_and_keeps_pointer_on_latest() {
    let mut h = History::new(3);
    for s in ["a", "b", "c", "d", "e"] {
        h.commit(state(s));
    }
    assert_eq!(h.len(), 3);
    assert_eq!(h.pointer(), Some(2));
    assert_eq!(headline(h.current().unwrap()), "e");
    assert_eq!(headline(h.undo().unwrap()), "d");
    assert_eq!(headline(h.undo().unwrap()), "c");
    assert!(h.undo().is_none());
}

proptest! {
    #[test]
    fn stack_never_exceeds_capacity(cap in 1usize..12, n in 0usize..40) {
        let mut h = History::new(cap);
        for i in 0..n {
            h.commit(state(&i.to_string()));
        }
        prop_assert!(h.len() <= cap);
        let steps = h.pointer().unwrap_or(0);
        for _ in 0..steps {
            prop_assert!(h.undo().is_some());
        }
        prop_assert!(h.undo().is_none());
        if n > 0 {
            let oldest = n.saturating_sub(cap);
            prop_assert_eq!(headline(h.current().unwrap()), oldest.to_string());
        }
    }

    #[test]
    fn undo_then_redo_is_identity(n in 2usize..10, back in 1usize..9) {
        let mut h = History::new(20);
        for i in 0..n {
            h.commit(state(&i.to_string()));
        }
        for _ in 0..back.min(n - 1) {
            h.undo();
        }
        let before = h.current().unwrap().fingerprint();
        if h.undo().is_some() {
            h.redo();
        }
        prop_assert_eq!(h.current().unwrap().fingerprint(), before);
    }
}
