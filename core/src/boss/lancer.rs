//! Lancer, a boss with no phases
//!
//! Everything the Lancer shows is a direct reaction to a discrete event, so
//! the handler only listens and never needs a per-tick update.

use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::context::GameContext;
use crate::events::{EnemyKind, EventKind, GameEvent, Point};
use crate::presentation::ParticleKind;

const TELEPORT_PARTICLES: u32 = 30;
const AURA_PARTICLES: u32 = 40;
const DASH_SLASH_PARTICLES: u32 = 30;

pub struct LancerEffectsHandler {
    ctx: GameContext,
    rng: StdRng,
}

impl LancerEffectsHandler {
    pub fn new(ctx: GameContext) -> Self {
        let rng = StdRng::seed_from_u64(ctx.debug.rng_seed);
        Self { ctx, rng }
    }

    pub fn subscribe(this: &Rc<RefCell<Self>>, ctx: &GameContext) {
        ctx.bus.subscribe(EventKind::Teleport, this, Self::on_teleport);
        ctx.bus.subscribe(EventKind::SpawnAura, this, Self::on_aura);
        ctx.bus.subscribe(EventKind::ClearAura, this, Self::on_aura);
        ctx.bus.subscribe(EventKind::DashSlash, this, Self::on_dash_slash);
        ctx.bus
            .subscribe(EventKind::ScreenShakeRequested, this, Self::on_screen_shake);
    }

    fn on_teleport(&mut self, event: &GameEvent) {
        let GameEvent::Teleport { boss, location, .. } = event else {
            return;
        };
        if boss.is(EnemyKind::Lancer) {
            self.ctx.presentation.borrow_mut().spawn_particles(
                *location,
                ParticleKind::Teleport,
                TELEPORT_PARTICLES,
                None,
            );
        }
    }

    fn on_aura(&mut self, event: &GameEvent) {
        let mut presentation = self.ctx.presentation.borrow_mut();
        match event {
            GameEvent::SpawnAura { boss } if boss.is(EnemyKind::Lancer) => {
                presentation.spawn_aura(boss.id, boss.hitbox.center(), AURA_PARTICLES)
            }
            GameEvent::ClearAura { boss } if boss.is(EnemyKind::Lancer) => {
                presentation.clear_aura(boss.id)
            }
            _ => {}
        }
    }

    /// Scatter particles along the dash, anywhere within the Lancer's height
    fn on_dash_slash(&mut self, event: &GameEvent) {
        let GameEvent::DashSlash { boss, start, end } = event else {
            return;
        };
        if !boss.is(EnemyKind::Lancer) {
            return;
        }
        let height = boss.hitbox.height;
        let mut presentation = self.ctx.presentation.borrow_mut();
        for _ in 0..DASH_SLASH_PARTICLES {
            let t: f64 = self.rng.r#gen();
            let x = start.x + t * (end.x - start.x);
            let y = start.y + self.rng.r#gen::<f64>() * height;
            presentation.spawn_particles(Point::new(x, y), ParticleKind::DashSlash, 1, None);
        }
    }

    fn on_screen_shake(&mut self, event: &GameEvent) {
        if let GameEvent::ScreenShakeRequested {
            duration_ticks,
            intensity,
        } = event
        {
            self.ctx
                .presentation
                .borrow_mut()
                .screen_shake(*duration_ticks, *intensity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{EnemyRef, Rect, TeleportDirection};
    use crate::presentation::PresentationCall;
    use crate::context::ManualClock;
    use crate::headless::HeadlessSession;

    fn lancer() -> EnemyRef {
        EnemyRef::new(3, EnemyKind::Lancer, Rect::new(100.0, 200.0, 30.0, 60.0))
    }

    fn make_handler(session: &HeadlessSession<ManualClock>) -> Rc<RefCell<LancerEffectsHandler>> {
        let handler = Rc::new(RefCell::new(LancerEffectsHandler::new(session.ctx.clone())));
        LancerEffectsHandler::subscribe(&handler, &session.ctx);
        handler
    }

    #[test]
    fn teleport_spawns_particles_for_lancer_only() {
        let session = HeadlessSession::new();
        let _handler = make_handler(&session);

        session.ctx.bus.publish(GameEvent::Teleport {
            boss: lancer(),
            location: Point::new(5.0, 6.0),
            direction: TeleportDirection::Out,
        });
        let roric = EnemyRef::new(9, EnemyKind::Roric, Rect::default());
        session.ctx.bus.publish(GameEvent::Teleport {
            boss: roric,
            location: Point::new(5.0, 6.0),
            direction: TeleportDirection::Out,
        });

        assert_eq!(session.presentation.borrow().particles_of(ParticleKind::Teleport), 30);
        assert_eq!(session.presentation.borrow().calls().len(), 1);
    }

    #[test]
    fn aura_spawns_and_clears() {
        let session = HeadlessSession::new();
        let _handler = make_handler(&session);

        session.ctx.bus.publish(GameEvent::SpawnAura { boss: lancer() });
        session.ctx.bus.publish(GameEvent::ClearAura { boss: lancer() });

        assert_eq!(
            session.presentation.borrow().calls(),
            &[
                PresentationCall::SpawnAura {
                    owner: lancer().id,
                    count: 40
                },
                PresentationCall::ClearAura { owner: lancer().id },
            ]
        );
    }

    #[test]
    fn dash_slash_stays_on_the_dash_line() {
        let session = HeadlessSession::new();
        let _handler = make_handler(&session);

        session.ctx.bus.publish(GameEvent::DashSlash {
            boss: lancer(),
            start: Point::new(0.0, 100.0),
            end: Point::new(300.0, 100.0),
        });

        let presentation = session.presentation.borrow();
        assert_eq!(presentation.particles_of(ParticleKind::DashSlash), 30);
        for call in presentation.calls() {
            let PresentationCall::SpawnParticles { at, .. } = call else {
                panic!("unexpected call {call:?}");
            };
            assert!((0.0..=300.0).contains(&at.x));
            assert!((100.0..=160.0).contains(&at.y));
        }
    }

    #[test]
    fn screen_shake_is_forwarded() {
        let session = HeadlessSession::new();
        let _handler = make_handler(&session);

        session.ctx.bus.publish(GameEvent::ScreenShakeRequested {
            duration_ticks: 12,
            intensity: 4.5,
        });

        assert_eq!(
            session.presentation.borrow().calls(),
            &[PresentationCall::ScreenShake {
                duration_ticks: 12,
                intensity: 4.5
            }]
        );
    }
}
