//! Tests for PlayingState and StateManager
//!
//! Covers handler wiring on entry, deferred commands, pause handling and
//! teardown.

use std::time::Duration;

use super::{GameState, MenuState, PlayingState, StateCommand, StateManager};
use crate::boss::roric::{RoricDefinition, RoricPhase};
use crate::context::{LoopSettings, ManualClock};
use crate::events::{EncounterId, EventKind, GameEvent, event_channel};
use crate::game_loop::{CountingSink, GameLoop, Simulation};
use crate::headless::HeadlessSession;
use crate::world::WorldCall;

fn build_state(session: &HeadlessSession<ManualClock>) -> PlayingState {
    let roster = session.roster(RoricDefinition::default());
    PlayingState::new(session.ctx.clone(), &roster).unwrap()
}

fn make_state(session: &HeadlessSession<ManualClock>) -> PlayingState {
    let mut state = build_state(session);
    state.enter();
    state
}

fn roric_phase(state: &PlayingState) -> RoricPhase {
    state
        .encounters()
        .map(|e| e.roric.borrow().current_phase())
        .unwrap()
}

#[test]
fn test_enter_registers_handlers() {
    let session = HeadlessSession::new();
    let state = make_state(&session);
    assert_eq!(state.handler_count(), 2);
    assert_eq!(session.ctx.bus.listener_count(EventKind::FightInitiated), 1);
}

#[test]
fn test_update_drives_encounter() {
    let session = HeadlessSession::new();
    let mut state = make_state(&session);
    session.ctx.bus.publish(GameEvent::EncounterEngaged {
        encounter: EncounterId::Roric,
    });

    session.clock.set(Duration::from_millis(53_000));
    state.update().unwrap();

    assert_eq!(roric_phase(&state), RoricPhase::Assault);
}

#[test]
fn test_pause_event_is_deferred_and_freezes_handlers() {
    let session = HeadlessSession::new();
    let mut state = make_state(&session);
    session.ctx.bus.publish(GameEvent::EncounterEngaged {
        encounter: EncounterId::Roric,
    });

    session.clock.set(Duration::from_millis(50_000));
    session.ctx.bus.publish(GameEvent::GamePaused);
    assert!(!state.is_paused());

    state.update().unwrap();
    assert!(state.is_paused());

    session.clock.set(Duration::from_millis(80_000));
    state.update().unwrap();
    assert_eq!(roric_phase(&state), RoricPhase::Intro);

    session.ctx.bus.publish(GameEvent::GameResumed);
    state.update().unwrap();
    assert!(!state.is_paused());
    assert_eq!(roric_phase(&state), RoricPhase::Intro);

    // 30 s spent paused do not count towards the fight
    session.clock.set(Duration::from_millis(82_999));
    state.update().unwrap();
    assert_eq!(roric_phase(&state), RoricPhase::Intro);
    session.clock.set(Duration::from_millis(83_000));
    state.update().unwrap();
    assert_eq!(roric_phase(&state), RoricPhase::Assault);
}

#[test]
fn test_fight_initiation_resets_handlers_after_tick() {
    let session = HeadlessSession::new();
    let mut state = make_state(&session);
    session.ctx.bus.publish(GameEvent::EncounterEngaged {
        encounter: EncounterId::Roric,
    });
    session.clock.set(Duration::from_millis(60_000));
    state.update().unwrap();
    assert_eq!(roric_phase(&state), RoricPhase::Assault);

    session.ctx.bus.publish(GameEvent::FightInitiated {
        encounter: EncounterId::Roric,
    });
    assert!(!session.ctx.commands.is_empty());

    state.update().unwrap();
    assert!(session.ctx.commands.is_empty());
    assert_eq!(roric_phase(&state), RoricPhase::Intro);
    assert_eq!(
        session
            .world
            .borrow()
            .count(&WorldCall::SwitchToArena(EncounterId::Roric)),
        1
    );
}

#[test]
fn test_inbox_events_are_published_on_tick() {
    let session = HeadlessSession::new();
    let (sender, inbox) = event_channel();
    let mut state = make_state(&session).with_inbox(inbox);

    let producer = std::thread::spawn(move || {
        sender
            .send(GameEvent::EncounterEngaged {
                encounter: EncounterId::Roric,
            })
            .unwrap();
    });
    producer.join().unwrap();

    state.update().unwrap();
    assert!(
        state
            .encounters()
            .map(|e| e.roric.borrow().is_engaged())
            .unwrap()
    );
}

#[test]
fn test_engagement_queued_with_arena_entry_survives_reset() {
    let session = HeadlessSession::new();
    let (sender, inbox) = event_channel();
    let mut state = make_state(&session).with_inbox(inbox);

    sender
        .send(GameEvent::FightInitiated {
            encounter: EncounterId::Roric,
        })
        .unwrap();
    sender
        .send(GameEvent::EncounterEngaged {
            encounter: EncounterId::Roric,
        })
        .unwrap();

    session.clock.set(Duration::from_millis(10));
    state.update().unwrap();
    assert!(session.ctx.commands.is_empty());
    assert!(
        state
            .encounters()
            .map(|e| e.roric.borrow().is_engaged())
            .unwrap()
    );

    session.clock.set(Duration::from_millis(60_000));
    state.update().unwrap();
    assert_eq!(roric_phase(&state), RoricPhase::Assault);
}

#[test]
fn test_exit_discards_handlers() {
    let session = HeadlessSession::new();
    let mut manager = StateManager::new(Box::new(build_state(&session)));
    assert_eq!(manager.snapshot().state, "playing");

    manager.switch_to(Box::new(MenuState));
    assert_eq!(manager.current().name(), "menu");

    // Listeners of the dropped handlers are now inert
    let report = session.ctx.bus.publish(GameEvent::FightInitiated {
        encounter: EncounterId::Roric,
    });
    assert_eq!(report.failed, 0);
    assert!(session.world.borrow().calls().is_empty());
}

#[test]
fn test_reset_restarts_encounter_and_clears_pause() {
    let session = HeadlessSession::new();
    let mut state = make_state(&session);
    session.ctx.bus.publish(GameEvent::EncounterEngaged {
        encounter: EncounterId::Roric,
    });
    session.clock.set(Duration::from_millis(60_000));
    session.ctx.bus.publish(GameEvent::GamePaused);
    state.update().unwrap();
    assert!(state.is_paused());

    state.reset();

    assert!(!state.is_paused());
    assert_eq!(roric_phase(&state), RoricPhase::Intro);
    let engaged = state
        .encounters()
        .map(|e| e.roric.borrow().is_engaged())
        .unwrap();
    assert!(!engaged);
}

#[test]
fn test_stale_commands_dropped_on_enter() {
    let session = HeadlessSession::new();
    session.ctx.commands.push(StateCommand::Pause);
    let state = make_state(&session);
    assert!(!state.is_paused());
    assert!(session.ctx.commands.is_empty());
}

#[test]
fn test_loop_drives_state_manager() {
    let session = HeadlessSession::new();
    let mut manager = StateManager::new(Box::new(build_state(&session)));
    session.ctx.bus.publish(GameEvent::EncounterEngaged {
        encounter: EncounterId::Roric,
    });
    let mut game_loop =
        GameLoop::new(&LoopSettings::with_rates(200, 60), session.clock.clone()).unwrap();
    let mut sink = CountingSink::default();

    for _ in 0..1000 {
        session.clock.advance(Duration::from_millis(1));
        game_loop.step(&mut manager, &mut sink).unwrap();
    }

    let snapshot = manager.snapshot();
    assert_eq!(snapshot.tick, 200);
    assert!(!snapshot.paused);
    assert_eq!(sink.requests, 60);
}
