//! Quest objective progress
//!
//! Counts kills and collected crates against the active objectives.

use std::cell::RefCell;
use std::rc::Rc;

use tracing::info;

use crate::context::GameContext;
use crate::events::{EnemyKind, EventKind, GameEvent};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectiveType {
    Kill,
    Collect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectiveTarget {
    Skeleton,
    Ghoul,
    Lancer,
    Crate,
}

impl ObjectiveTarget {
    /// Kill target for an enemy kind, if that kind counts towards quests
    pub fn for_enemy(kind: EnemyKind) -> Option<Self> {
        match kind {
            EnemyKind::Skeleton => Some(Self::Skeleton),
            EnemyKind::Ghoul => Some(Self::Ghoul),
            EnemyKind::Lancer => Some(Self::Lancer),
            EnemyKind::Knight | EnemyKind::Roric => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Objective {
    pub kind: ObjectiveType,
    pub target: ObjectiveTarget,
    pub required: u32,
    pub progress: u32,
}

impl Objective {
    pub fn new(kind: ObjectiveType, target: ObjectiveTarget, required: u32) -> Self {
        Self {
            kind,
            target,
            required,
            progress: 0,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.progress >= self.required
    }
}

#[derive(Debug, Default)]
pub struct QuestTracker {
    objectives: Vec<Objective>,
}

impl QuestTracker {
    pub fn new(objectives: Vec<Objective>) -> Self {
        Self { objectives }
    }

    pub fn subscribe(this: &Rc<RefCell<Self>>, ctx: &GameContext) {
        ctx.bus
            .subscribe(EventKind::EnemyDefeated, this, Self::on_enemy_defeated);
        ctx.bus
            .subscribe(EventKind::CrateDestroyed, this, Self::on_crate_destroyed);
    }

    pub fn objectives(&self) -> &[Objective] {
        &self.objectives
    }

    /// Advance every incomplete objective matching `kind` and `target`
    pub fn update_progress(&mut self, kind: ObjectiveType, target: ObjectiveTarget) {
        for objective in self
            .objectives
            .iter_mut()
            .filter(|o| o.kind == kind && o.target == target && !o.is_complete())
        {
            objective.progress += 1;
            if objective.is_complete() {
                info!(?kind, ?target, "Quest objective complete");
            }
        }
    }

    fn on_enemy_defeated(&mut self, event: &GameEvent) {
        let GameEvent::EnemyDefeated { enemy } = event else {
            return;
        };
        if let Some(target) = ObjectiveTarget::for_enemy(enemy.kind) {
            self.update_progress(ObjectiveType::Kill, target);
        }
    }

    fn on_crate_destroyed(&mut self, _event: &GameEvent) {
        self.update_progress(ObjectiveType::Collect, ObjectiveTarget::Crate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EnemyRef, Rect};
    use crate::context::ManualClock;
    use crate::headless::HeadlessSession;

    fn defeated(kind: EnemyKind) -> GameEvent {
        GameEvent::EnemyDefeated {
            enemy: EnemyRef::new(1, kind, Rect::default()),
        }
    }

    fn make_tracker(session: &HeadlessSession<ManualClock>) -> Rc<RefCell<QuestTracker>> {
        let tracker = Rc::new(RefCell::new(QuestTracker::new(vec![
            Objective::new(ObjectiveType::Kill, ObjectiveTarget::Skeleton, 2),
            Objective::new(ObjectiveType::Kill, ObjectiveTarget::Lancer, 1),
            Objective::new(ObjectiveType::Collect, ObjectiveTarget::Crate, 3),
        ])));
        QuestTracker::subscribe(&tracker, &session.ctx);
        tracker
    }

    #[test]
    fn kills_advance_matching_objectives() {
        let session = HeadlessSession::new();
        let tracker = make_tracker(&session);

        session.ctx.bus.publish(defeated(EnemyKind::Skeleton));
        session.ctx.bus.publish(defeated(EnemyKind::Skeleton));
        session.ctx.bus.publish(defeated(EnemyKind::Skeleton));
        session.ctx.bus.publish(defeated(EnemyKind::Lancer));

        let tracker = tracker.borrow();
        let objectives = tracker.objectives();
        assert_eq!(objectives[0].progress, 2);
        assert!(objectives[0].is_complete());
        assert!(objectives[1].is_complete());
        assert_eq!(objectives[2].progress, 0);
    }

    #[test]
    fn untracked_enemies_are_ignored() {
        let session = HeadlessSession::new();
        let tracker = make_tracker(&session);

        session.ctx.bus.publish(defeated(EnemyKind::Knight));
        session.ctx.bus.publish(defeated(EnemyKind::Roric));

        assert!(tracker.borrow().objectives().iter().all(|o| o.progress == 0));
    }

    #[test]
    fn crates_count_towards_collection() {
        let session = HeadlessSession::new();
        let tracker = make_tracker(&session);

        session.ctx.bus.publish(GameEvent::CrateDestroyed);

        assert_eq!(tracker.borrow().objectives()[2].progress, 1);
    }
}
