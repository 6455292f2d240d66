//! Turn-based battle state machine.
//!
//! The engine owns both combatants for the length of a battle and hands them
//! back through [`BattleEngine::finish`]. Timed phases advance on `update`
//! with at most one phase change per call.

pub mod formulas;

use tracing::debug;

use crate::creature::Creature;
use crate::input::{Direction, InputState};
use crate::rng::RandomSource;

pub const ANIMATING_SECS: f32 = 0.8;
pub const ENEMY_TURN_SECS: f32 = 0.5;
pub const ESCAPE_SECS: f32 = 0.6;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BattlePhase {
    SelectingAction,
    Animating,
    EnemyTurn,
    Escaping,
    Victory,
    Defeat,
    Finished,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BattleAction {
    Fight,
    Catch,
    Run,
}

impl BattleAction {
    pub const ALL: [BattleAction; 3] = [BattleAction::Fight, BattleAction::Catch, BattleAction::Run];

    pub fn label(self) -> &'static str {
        match self {
            BattleAction::Fight => "Fight",
            BattleAction::Catch => "Catch",
            BattleAction::Run => "Run",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BattleOutcome {
    Won,
    Captured,
    Lost,
    Escaped,
    Aborted,
}

pub struct BattleEngine {
    player: Creature,
    opponent: Creature,
    phase: BattlePhase,
    timer: f32,
    cursor: usize,
    message: String,
    outcome: Option<BattleOutcome>,
}

impl BattleEngine {
    pub fn new(player: Creature, opponent: Creature) -> Self {
        let message = if opponent.is_wild() {
            format!("A wild {} appeared!", opponent.name())
        } else {
            format!("{} steps up to battle!", opponent.name())
        };
        Self {
            player,
            opponent,
            phase: BattlePhase::SelectingAction,
            timer: 0.0,
            cursor: 0,
            message,
            outcome: None,
        }
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn player(&self) -> &Creature {
        &self.player
    }

    pub fn opponent(&self) -> &Creature {
        &self.opponent
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn selected_action(&self) -> BattleAction {
        BattleAction::ALL[self.cursor]
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    pub fn is_finished(&self) -> bool {
        self.phase == BattlePhase::Finished
    }

    /// Hands back `(player, opponent, outcome)`. `None` until the battle is finished.
    pub fn finish(self) -> Option<(Creature, Creature, BattleOutcome)> {
        if !self.is_finished() {
            return None;
        }
        let outcome = self.outcome?;
        Some((self.player, self.opponent, outcome))
    }

    /// Hands back `(player, opponent)` whatever the phase, for battles abandoned midway.
    pub fn into_combatants(self) -> (Creature, Creature) {
        (self.player, self.opponent)
    }

    pub fn update(&mut self, dt: f32, input: &InputState, rng: &mut dyn RandomSource) {
        match self.phase {
            BattlePhase::SelectingAction => {
                if input.cancel_pressed() {
                    self.outcome = Some(BattleOutcome::Aborted);
                    self.set_phase(BattlePhase::Finished);
                    return;
                }
                match input.direction_pressed() {
                    Some(Direction::Up | Direction::Left) => self.move_cursor(-1),
                    Some(Direction::Down | Direction::Right) => self.move_cursor(1),
                    None => {}
                }
                if input.confirm_pressed() {
                    self.choose(self.selected_action(), rng);
                }
            }
            BattlePhase::Animating => {
                if self.tick_timer(dt, ANIMATING_SECS) {
                    if self.opponent.is_fainted() {
                        self.win_by_knockout();
                    } else {
                        self.message = format!("{} is attacking!", self.opponent.name());
                        self.set_phase(BattlePhase::EnemyTurn);
                    }
                }
            }
            BattlePhase::EnemyTurn => {
                if self.tick_timer(dt, ENEMY_TURN_SECS) {
                    self.resolve_enemy_turn(rng);
                }
            }
            BattlePhase::Escaping => {
                if self.tick_timer(dt, ESCAPE_SECS) {
                    self.outcome = Some(BattleOutcome::Escaped);
                    self.set_phase(BattlePhase::Finished);
                }
            }
            BattlePhase::Victory | BattlePhase::Defeat => {
                if input.confirm_pressed() {
                    self.set_phase(BattlePhase::Finished);
                }
            }
            BattlePhase::Finished => {}
        }
    }

    /// Executes `action` from the menu. Returns false when the action is
    /// refused, or when the engine is not waiting for a choice.
    pub fn choose(&mut self, action: BattleAction, rng: &mut dyn RandomSource) -> bool {
        if self.phase != BattlePhase::SelectingAction {
            return false;
        }
        match action {
            BattleAction::Fight => {
                let dealt = strike(&self.player, &mut self.opponent, rng);
                self.message = format!(
                    "{} hits {} for {dealt} damage.",
                    self.player.name(),
                    self.opponent.name()
                );
                self.set_phase(BattlePhase::Animating);
            }
            BattleAction::Catch => {
                if !self.opponent.is_wild() {
                    self.message = "You can't catch another tamer's creature!".to_string();
                    return false;
                }
                let stats = self.opponent.stats();
                let chance = formulas::catch_chance(self.opponent.health(), stats.max_health);
                let roll = rng.next_unit();
                debug!(chance, roll, "catch attempt");
                if roll < chance {
                    self.message = format!("Gotcha! {} was caught!", self.opponent.name());
                    self.outcome = Some(BattleOutcome::Captured);
                    self.set_phase(BattlePhase::Victory);
                } else {
                    self.message = format!("{} broke free!", self.opponent.name());
                    self.set_phase(BattlePhase::EnemyTurn);
                }
            }
            BattleAction::Run => {
                if !self.opponent.is_wild() {
                    self.message = "There's no running from a tamer battle!".to_string();
                    return false;
                }
                self.message = "Got away safely!".to_string();
                self.set_phase(BattlePhase::Escaping);
            }
        }
        true
    }

    /// The opponent's attack. Ends in `Defeat` when the player creature faints.
    pub fn resolve_enemy_turn(&mut self, rng: &mut dyn RandomSource) {
        let dealt = strike(&self.opponent, &mut self.player, rng);
        if self.player.is_fainted() {
            self.message = format!(
                "{} hits for {dealt}. {} fainted...",
                self.opponent.name(),
                self.player.name()
            );
            self.outcome = Some(BattleOutcome::Lost);
            self.set_phase(BattlePhase::Defeat);
        } else {
            self.message = format!(
                "{} hits {} for {dealt} damage.",
                self.opponent.name(),
                self.player.name()
            );
            self.set_phase(BattlePhase::SelectingAction);
        }
    }

    fn win_by_knockout(&mut self) {
        let reward = formulas::victory_experience(self.opponent.level());
        let leveled_up = self.player.gain_experience(reward);
        self.message = format!(
            "{} fainted! {} gained {reward} EXP.",
            self.opponent.name(),
            self.player.name()
        );
        if leveled_up {
            self.message.push_str(&format!(
                " {} grew to level {}!",
                self.player.name(),
                self.player.level()
            ));
        }
        self.outcome = Some(BattleOutcome::Won);
        self.set_phase(BattlePhase::Victory);
    }

    fn move_cursor(&mut self, step: isize) {
        let len = BattleAction::ALL.len() as isize;
        self.cursor = (self.cursor as isize + step).rem_euclid(len) as usize;
    }

    fn tick_timer(&mut self, dt: f32, duration: f32) -> bool {
        self.timer += dt.max(0.0);
        self.timer >= duration
    }

    fn set_phase(&mut self, next: BattlePhase) {
        debug!(from = ?self.phase, to = ?next, "battle phase");
        self.phase = next;
        self.timer = 0.0;
    }
}

fn strike(attacker: &Creature, defender: &mut Creature, rng: &mut dyn RandomSource) -> u32 {
    let amount = formulas::damage(attacker.stats().attack, defender.stats().defense, rng.next_unit());
    defender.take_damage(amount)
}
