use capdex::capture::{Capture, Registry, UNSET};
use std::thread;

// install a subscriber so the trace points are exercised, not just compiled
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn capture(id: i32, number: i32, name: &str) -> Capture {
    let mut capture = Capture::new();
    capture.set_id(id);
    capture.set_capture_number(number);
    capture.set_name(name);
    capture.set_pattern(r"\w+");
    capture
}

// the compiler's life cycle: captures registered provisionally in id
// order, then re-registered once the engine has assigned real slots
fn setup() -> Registry {
    let mut registry = Registry::new();
    for (id, name) in [(0, "WORD:verb"), (1, "WORD:noun"), (2, "NUMBER:count")] {
        registry.add(&capture(id, UNSET, name), false);
    }
    for (id, number, name) in [(0, 1, "WORD:verb"), (1, 2, "WORD:noun"), (2, 3, "NUMBER:count")] {
        registry.add(&capture(id, number, name), false);
    }
    registry
}

#[test]
fn views_stay_consistent_through_reregistration() {
    init_tracing();
    let registry = setup();
    registry.check_consistency().expect("views consistent");
    assert_eq!(registry.len(), 3);
    // the provisional slot entries remain reachable, last writer first
    assert_eq!(registry.get_by_capture_number(UNSET).expect("sentinel key").id(), 2);
    assert_eq!(registry.get_by_capture_number(2).expect("real slot").name(), Some("WORD:noun"));
}

#[test]
fn consistent_when_names_change_between_registrations() {
    let mut registry = Registry::new();
    registry.add(&capture(0, UNSET, "WORD:old"), false);
    // the compiler renamed the group before the final registration
    registry.add(&capture(0, 1, "WORD:new"), false);
    registry.check_consistency().expect("views consistent");
    assert_eq!(registry.get_by_subname("new").expect("new subname").id(), 0);
    // registration only ever upserts, so the entry under the old subname
    // stays reachable
    assert_eq!(registry.get_by_subname("old").expect("old subname").id(), 0);
}

#[test]
fn empty_registry_is_consistent() {
    let registry = Registry::new();
    registry.check_consistency().expect("views consistent");
    assert!(registry.is_empty());
}

#[test]
fn built_registry_serves_concurrent_reads() {
    let registry = setup();
    thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                for _ in 0..100 {
                    assert_eq!(registry.get_by_name("WORD:verb").expect("by name").id(), 0);
                    assert_eq!(registry.get_by_capture_number(3).expect("by number").id(), 2);
                    let ids: Vec<i32> = registry.walk().map(|capture| capture.id()).collect();
                    assert_eq!(ids, vec![0, 1, 2]);
                }
            });
        }
    });
}
