//! Tests for EventBus dispatch
//!
//! Verifies ordering, duplicate delivery, failure isolation and reentrancy.

use std::cell::RefCell;
use std::rc::Rc;

use super::{EventBus, EventKind, EnemyKind, EnemyRef, GameEvent, ListenerError, Rect};

fn make_boss(id: u64, kind: EnemyKind) -> EnemyRef {
    EnemyRef::new(id, kind, Rect::new(0.0, 0.0, 40.0, 80.0))
}

fn defeated(boss: EnemyRef) -> GameEvent {
    GameEvent::BossDefeated { boss }
}

type Log = Rc<RefCell<Vec<String>>>;

fn push_on(bus: &EventBus, kind: EventKind, log: &Log, tag: &'static str) {
    let log = Rc::clone(log);
    bus.register(kind, move |_| log.borrow_mut().push(tag.to_string()));
}

#[test]
fn test_listeners_run_in_registration_order() {
    let bus = EventBus::new();
    let log: Log = Rc::default();
    push_on(&bus, EventKind::BossDefeated, &log, "a");
    push_on(&bus, EventKind::BossDefeated, &log, "b");
    push_on(&bus, EventKind::BossDefeated, &log, "c");

    let report = bus.publish(defeated(make_boss(1, EnemyKind::Roric)));

    assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
    assert_eq!(report.delivered, 3);
    assert_eq!(report.failed, 0);
}

#[test]
fn test_only_matching_kind_is_delivered() {
    let bus = EventBus::new();
    let log: Log = Rc::default();
    push_on(&bus, EventKind::BossDefeated, &log, "boss");
    push_on(&bus, EventKind::CrateDestroyed, &log, "crate");

    bus.publish(GameEvent::CrateDestroyed);

    assert_eq!(*log.borrow(), vec!["crate"]);
}

#[test]
fn test_publish_without_listeners_is_noop() {
    let bus = EventBus::new();
    let report = bus.publish(GameEvent::SkybeamRequested);
    assert_eq!(report.delivered, 0);
    assert_eq!(bus.listener_count(EventKind::SkybeamRequested), 0);
}

#[test]
fn test_duplicate_registration_delivers_twice() {
    let bus = EventBus::new();
    let count = Rc::new(RefCell::new(0));
    let listener = {
        let count = Rc::clone(&count);
        move |_: &GameEvent| *count.borrow_mut() += 1
    };
    bus.register(EventKind::CrateDestroyed, listener.clone());
    bus.register(EventKind::CrateDestroyed, listener);

    bus.publish(GameEvent::CrateDestroyed);

    assert_eq!(*count.borrow(), 2);
    assert_eq!(bus.listener_count(EventKind::CrateDestroyed), 2);
}

#[test]
fn test_listeners_filter_on_payload() {
    // A only reacts to boss X; B and C react to any boss
    let bus = EventBus::new();
    let log: Log = Rc::default();
    let boss_x = make_boss(7, EnemyKind::Roric);
    let boss_y = make_boss(8, EnemyKind::Lancer);

    {
        let log = Rc::clone(&log);
        bus.register(EventKind::BossDefeated, move |event| {
            if let GameEvent::BossDefeated { boss } = event
                && boss.id == boss_x.id
            {
                log.borrow_mut().push("a".to_string());
            }
        });
    }
    push_on(&bus, EventKind::BossDefeated, &log, "b");
    push_on(&bus, EventKind::BossDefeated, &log, "c");

    bus.publish(defeated(boss_x));
    assert_eq!(*log.borrow(), vec!["a", "b", "c"]);

    log.borrow_mut().clear();
    bus.publish(defeated(boss_y));
    assert_eq!(*log.borrow(), vec!["b", "c"]);
}

#[test]
fn test_failing_listener_does_not_stop_dispatch() {
    let bus = EventBus::new();
    let log: Log = Rc::default();
    push_on(&bus, EventKind::GamePaused, &log, "first");
    bus.register_fallible(EventKind::GamePaused, |_| {
        Err(ListenerError::Failed("boom".to_string()))
    });
    push_on(&bus, EventKind::GamePaused, &log, "third");

    let report = bus.publish(GameEvent::GamePaused);

    assert_eq!(*log.borrow(), vec!["first", "third"]);
    assert_eq!(report.delivered, 2);
    assert_eq!(report.failed, 1);
}

#[test]
fn test_registration_during_publish_applies_next_time() {
    let bus = Rc::new(EventBus::new());
    let log: Log = Rc::default();
    {
        let bus_inner = Rc::clone(&bus);
        let log = Rc::clone(&log);
        bus.register(EventKind::CrateDestroyed, move |_| {
            log.borrow_mut().push("outer".to_string());
            let log = Rc::clone(&log);
            bus_inner.register(EventKind::CrateDestroyed, move |_| {
                log.borrow_mut().push("late".to_string())
            });
        });
    }

    bus.publish(GameEvent::CrateDestroyed);
    assert_eq!(*log.borrow(), vec!["outer"]);

    log.borrow_mut().clear();
    bus.publish(GameEvent::CrateDestroyed);
    assert_eq!(*log.borrow(), vec!["outer", "late"]);
}

#[test]
fn test_nested_publish_is_delivered() {
    let bus = Rc::new(EventBus::new());
    let log: Log = Rc::default();
    {
        let bus_inner = Rc::clone(&bus);
        bus.register(EventKind::GamePaused, move |_| {
            bus_inner.publish(GameEvent::CrateDestroyed);
        });
    }
    push_on(&bus, EventKind::CrateDestroyed, &log, "crate");

    bus.publish(GameEvent::GamePaused);

    assert_eq!(*log.borrow(), vec!["crate"]);
}

#[derive(Default)]
struct Counter {
    seen: usize,
}

fn count_event(counter: &mut Counter, _event: &GameEvent) {
    counter.seen += 1;
}

#[test]
fn test_subscribe_stops_after_handler_dropped() {
    let bus = EventBus::new();
    let handler = Rc::new(RefCell::new(Counter::default()));
    bus.subscribe(EventKind::CrateDestroyed, &handler, count_event);

    bus.publish(GameEvent::CrateDestroyed);
    assert_eq!(handler.borrow().seen, 1);

    drop(handler);
    let report = bus.publish(GameEvent::CrateDestroyed);
    assert_eq!(report.failed, 0);
}

#[test]
fn test_subscribe_reports_busy_handler() {
    let bus = EventBus::new();
    let handler = Rc::new(RefCell::new(Counter::default()));
    bus.subscribe(EventKind::CrateDestroyed, &handler, count_event);

    let _held = handler.borrow_mut();
    let report = bus.publish(GameEvent::CrateDestroyed);

    assert_eq!(report.failed, 1);
    assert_eq!(report.delivered, 0);
}
