use std::sync::Arc;
use std::task::Poll;

use bracket_terminal::prelude::BTerm;
use tracing::{info, warn};

use crate::battle::{BattleEngine, BattleOutcome};
use crate::creature::progression::experience_for_level;
use crate::creature::{Creature, Party};
use crate::data::DataTables;
use crate::error::{RenderError, SceneError};
use crate::render::draw_battle;
use crate::rng::{RandomSource, pick_index};

use super::{FrameContext, GameSession, Scene, SceneCommand, SceneId};

/// One wild battle per visit. The party lead is lent to the engine for the
/// length of the battle and settled back into the party when it ends.
#[derive(Default)]
pub struct BattleScene {
    engine: Option<BattleEngine>,
    data: Option<Arc<DataTables>>,
    active: bool,
}

impl BattleScene {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub fn engine(&self) -> Option<&BattleEngine> {
        self.engine.as_ref()
    }
}

/// A random species within one level of `lead_level`.
pub fn roll_wild_opponent(
    data: &DataTables,
    lead_level: u32,
    rng: &mut dyn RandomSource,
) -> Option<Creature> {
    let count = data.species_count();
    if count == 0 {
        return None;
    }
    let species = data.species_at(pick_index(rng, count))?;
    let level = (lead_level + pick_index(rng, 3) as u32).saturating_sub(1).max(1);
    Some(Creature::wild(
        Arc::clone(species),
        experience_for_level(level),
        data,
    ))
}

/// Returns both combatants to where they belong after a battle.
pub fn settle(party: &mut Party, player: Creature, mut opponent: Creature, outcome: BattleOutcome) {
    party.insert_lead(player);
    match outcome {
        BattleOutcome::Captured => {
            opponent.tame();
            info!(creature = %opponent.id(), "{} joined the party", opponent.name());
            party.add(opponent);
        }
        BattleOutcome::Lost => party.restore_all(),
        BattleOutcome::Won | BattleOutcome::Escaped | BattleOutcome::Aborted => {}
    }
}

impl Scene for BattleScene {
    fn init(&mut self, session: &mut GameSession) -> Poll<Result<(), SceneError>> {
        self.data = Some(Arc::clone(&session.data));
        if self.engine.is_some() {
            return Poll::Ready(Ok(()));
        }
        let Some(lead) = session.party.take_lead() else {
            if session.party.is_empty() {
                warn!("party is empty, skipping battle");
            } else {
                warn!("no creature able to fight, skipping battle");
            }
            return Poll::Ready(Ok(()));
        };
        match roll_wild_opponent(&session.data, lead.level(), session.rng.as_mut()) {
            Some(opponent) => {
                info!(
                    species = %opponent.species().id,
                    level = opponent.level(),
                    "battle started"
                );
                self.engine = Some(BattleEngine::new(lead, opponent));
            }
            None => {
                warn!("species table is empty, skipping battle");
                session.party.insert_lead(lead);
            }
        }
        Poll::Ready(Ok(()))
    }

    fn activate(&mut self) {
        self.active = true;
    }

    fn deactivate(&mut self) {
        self.active = false;
    }

    fn cleanup(&mut self, session: &mut GameSession) {
        let Some(engine) = self.engine.take() else {
            return;
        };
        // Left mid-battle: the lead goes home, the wild creature does not.
        let outcome = engine.outcome().unwrap_or(BattleOutcome::Aborted);
        let (player, opponent) = engine.into_combatants();
        settle(&mut session.party, player, opponent, outcome);
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn update(&mut self, session: &mut GameSession, frame: &FrameContext) -> SceneCommand {
        let Some(engine) = self.engine.as_mut() else {
            return SceneCommand::SwitchTo(SceneId::Exploration);
        };
        engine.update(frame.delta, frame.input, session.rng.as_mut());
        if !engine.is_finished() {
            return SceneCommand::None;
        }

        if let Some((player, opponent, outcome)) = self.engine.take().and_then(BattleEngine::finish) {
            info!(?outcome, "battle over");
            settle(&mut session.party, player, opponent, outcome);
        }
        SceneCommand::SwitchTo(SceneId::Exploration)
    }

    fn render(&self, ctx: &mut BTerm) -> Result<(), RenderError> {
        if let (Some(engine), Some(data)) = (self.engine.as_ref(), self.data.as_ref()) {
            draw_battle(ctx, engine, data.type_chart());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputState, Key};
    use crate::scene::testing::session;

    fn frame(input: &InputState) -> FrameContext<'_> {
        FrameContext {
            delta: 1.0 / 24.0,
            input,
        }
    }

    #[test]
    fn init_lends_the_lead_and_rolls_a_nearby_level() {
        let mut session = session();
        let mut scene = BattleScene::new();
        assert!(matches!(scene.init(&mut session), Poll::Ready(Ok(()))));

        let engine = scene.engine().expect("battle");
        assert!(session.party.is_empty());
        assert!(engine.opponent().is_wild());
        // Constant high rolls pick the last species and the +1 level offset.
        assert_eq!(engine.player().level(), 5);
        assert_eq!(engine.opponent().level(), 6);
        let last = session.data.species_at(session.data.species_count() - 1).expect("species");
        assert_eq!(engine.opponent().species().id, last.id);
    }

    #[test]
    fn cancel_returns_to_exploration_with_the_lead() {
        let mut session = session();
        let mut scene = BattleScene::new();
        let _ = scene.init(&mut session);

        let mut input = InputState::new();
        input.refresh([Key::Cancel]);
        assert_eq!(
            scene.update(&mut session, &frame(&input)),
            SceneCommand::SwitchTo(SceneId::Exploration)
        );
        assert!(scene.engine().is_none());
        assert_eq!(session.party.len(), 1);
    }

    #[test]
    fn empty_party_skips_straight_back() {
        let mut session = session();
        session.party = Party::new();
        let mut scene = BattleScene::new();
        assert!(matches!(scene.init(&mut session), Poll::Ready(Ok(()))));
        let input = InputState::new();
        assert_eq!(
            scene.update(&mut session, &frame(&input)),
            SceneCommand::SwitchTo(SceneId::Exploration)
        );
    }

    #[test]
    fn cleanup_mid_battle_returns_the_lead() {
        let mut session = session();
        let mut scene = BattleScene::new();
        let _ = scene.init(&mut session);
        scene.cleanup(&mut session);
        assert_eq!(session.party.len(), 1);
        assert!(scene.engine().is_none());
    }

    fn combatants(session: &GameSession) -> (Creature, Creature) {
        let data = &session.data;
        let lead = session.party.members()[0].clone();
        let wild = Creature::wild(
            Arc::clone(data.species_at(0).expect("species")),
            experience_for_level(3),
            data,
        );
        (lead, wild)
    }

    #[test]
    fn captured_creature_joins_tamed() {
        let session = session();
        let (lead, wild) = combatants(&session);
        let mut party = Party::new();
        settle(&mut party, lead, wild, BattleOutcome::Captured);
        assert_eq!(party.len(), 2);
        assert_eq!(party.members()[0].level(), 5);
        assert!(!party.members()[1].is_wild());
    }

    #[test]
    fn losing_restores_the_whole_party() {
        let session = session();
        let (lead, wild) = combatants(&session);
        let max = lead.stats().max_health;
        let fainted = lead.with_health(0);
        assert!(fainted.is_fainted());

        let mut party = Party::new();
        settle(&mut party, fainted, wild, BattleOutcome::Lost);
        assert_eq!(party.len(), 1);
        assert_eq!(party.members()[0].health(), max);
    }

    #[test]
    fn escaping_leaves_the_wild_creature_behind() {
        let session = session();
        let (lead, wild) = combatants(&session);
        let mut party = Party::new();
        settle(&mut party, lead, wild, BattleOutcome::Escaped);
        assert_eq!(party.len(), 1);
    }
}
