use std::cell::RefCell;
use std::rc::Rc;

use crate::boss::roric::{RoricDefinition, RoricEffectsHandler, RoricEncounter};
use crate::boss::{BossAi, DefinitionError, LancerEffectsHandler};
use crate::context::GameContext;
use crate::events::HandlerRegistry;
use crate::flow::GameFlowHandler;
use crate::quests::{Objective, QuestTracker};

/// Everything the playing state needs to build its handlers
#[derive(Clone)]
pub struct EncounterRoster {
    pub roric: Rc<RoricDefinition>,
    pub roric_ai: Rc<RefCell<dyn BossAi>>,
    pub objectives: Vec<Objective>,
}

impl EncounterRoster {
    pub fn new(roric: RoricDefinition, roric_ai: Rc<RefCell<dyn BossAi>>) -> Self {
        Self {
            roric: Rc::new(roric),
            roric_ai,
            objectives: Vec::new(),
        }
    }
}

/// Handlers owned by one playing session
pub struct EncounterSet {
    pub flow: Rc<RefCell<GameFlowHandler>>,
    pub quests: Rc<RefCell<QuestTracker>>,
    pub lancer: Rc<RefCell<LancerEffectsHandler>>,
    pub roric: Rc<RefCell<RoricEncounter>>,
    pub roric_effects: Rc<RefCell<RoricEffectsHandler>>,
}

impl EncounterSet {
    pub fn build(ctx: &GameContext, roster: &EncounterRoster) -> Result<Self, DefinitionError> {
        roster.roric.validate()?;
        let roric_effects = RoricEffectsHandler::new(
            ctx.clone(),
            Rc::clone(&roster.roric_ai),
            Rc::clone(&roster.roric),
        )?;
        Ok(Self {
            flow: Rc::new(RefCell::new(GameFlowHandler::new(ctx.clone()))),
            quests: Rc::new(RefCell::new(QuestTracker::new(roster.objectives.clone()))),
            lancer: Rc::new(RefCell::new(LancerEffectsHandler::new(ctx.clone()))),
            roric: Rc::new(RefCell::new(RoricEncounter::new(
                ctx.clone(),
                Rc::clone(&roster.roric),
            ))),
            roric_effects: Rc::new(RefCell::new(roric_effects)),
        })
    }

    /// Subscribe every handler to the bus and register the ticking ones.
    /// The encounter ticks before its effects so a phase entered this tick
    /// has its script armed before the script is polled.
    pub fn install(&self, ctx: &GameContext, registry: &mut HandlerRegistry) {
        GameFlowHandler::subscribe(&self.flow, ctx);
        QuestTracker::subscribe(&self.quests, ctx);
        LancerEffectsHandler::subscribe(&self.lancer, ctx);
        RoricEncounter::subscribe(&self.roric, ctx);
        RoricEffectsHandler::subscribe(&self.roric_effects, ctx);

        registry.register(&self.roric);
        registry.register(&self.roric_effects);
    }
}
