//! Turn-loop orchestration
//!
//! The engine calls `initial_step` on the first turn of an episode,
//! `middle_step` once per turn after that, and `terminal_step` when the
//! engine reports terminal state. All per-unit work within a turn runs
//! sequentially in roster order; the learner owns every piece of mutable
//! learning state, including the single seeded random stream.

use ahash::AHashSet;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::agent::features::feature_vector;
use crate::agent::phase::{EpisodeOutcome, PhaseState};
use crate::agent::policy::select_target;
use crate::agent::report;
use crate::agent::reward::{turn_reward, RewardLedger};
use crate::agent::roster::Roster;
use crate::agent::update::update_weights;
use crate::agent::weights::Weights;
use crate::core::config::LearningConfig;
use crate::core::error::Result;
use crate::core::types::UnitId;
use crate::engine::command::CommandSet;
use crate::engine::history::{CommandStatus, TurnRecord};
use crate::engine::snapshot::Snapshot;

/// Does the previous turn require a fresh decision/update cycle?
///
/// Turns without a significant event just let in-flight actions continue.
pub fn is_significant(prior_turn: Option<&TurnRecord>, roster: &Roster) -> bool {
    let Some(record) = prior_turn else {
        // First turn of the episode.
        return true;
    };

    if !record.deaths.is_empty() {
        return true;
    }

    if record
        .damage
        .iter()
        .any(|d| roster.is_controlled(d.defender))
    {
        return true;
    }

    record
        .commands
        .iter()
        .any(|c| roster.is_controlled(c.unit) && c.status == CommandStatus::Incomplete)
}

/// Online Q-learning targeting controller
pub struct Learner {
    config: LearningConfig,
    weights: Weights,
    rng: StdRng,
    /// Best Q-value seen during the current selection pass
    best_q: f64,
    phase: PhaseState,
    roster: Roster,
    ledger: RewardLedger,
    credited_kills: AHashSet<UnitId>,
    /// Ledger totals of controlled units that died this episode
    fallen_reward_sum: f64,
    /// Controlled units present at episode start
    episode_unit_count: usize,
}

impl Learner {
    pub fn new(config: LearningConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let mut rng = StdRng::seed_from_u64(seed);
        let weights = if config.load_weights {
            Weights::load_or_random(&config.weights_path, &mut rng)
        } else {
            Weights::random(&mut rng)
        };
        Ok(Self {
            config,
            weights,
            rng,
            best_q: 0.0,
            phase: PhaseState::new(),
            roster: Roster::default(),
            ledger: RewardLedger::new(),
            credited_kills: AHashSet::new(),
            fallen_reward_sum: 0.0,
            episode_unit_count: 0,
        })
    }

    pub fn weights(&self) -> &Weights {
        &self.weights
    }

    pub fn phase(&self) -> &PhaseState {
        &self.phase
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// First turn of an episode: reset episode state, build rosters, and
    /// run a normal decision step (with no history view)
    pub fn initial_step(&mut self, snapshot: &Snapshot) -> Result<CommandSet> {
        self.best_q = 0.0;
        self.roster = Roster::from_snapshot(snapshot);
        self.ledger = RewardLedger::new();
        for &unit in &self.roster.controlled {
            self.ledger.observe(unit);
        }
        self.credited_kills.clear();
        self.fallen_reward_sum = 0.0;
        self.episode_unit_count = self.roster.controlled.len();

        tracing::debug!(
            controlled = self.roster.controlled.len(),
            opposing = self.roster.opposing.len(),
            evaluating = self.phase.is_evaluating(),
            "episode started"
        );

        self.middle_step(snapshot, None)
    }

    /// One simulation turn: account rewards, decide and learn on
    /// significant events, prune the dead, emit commands
    pub fn middle_step(
        &mut self,
        snapshot: &Snapshot,
        prior_turn: Option<&TurnRecord>,
    ) -> Result<CommandSet> {
        self.accumulate_rewards(prior_turn);

        let mut commands = CommandSet::new();

        if is_significant(prior_turn, &self.roster) {
            let controlled = self.roster.controlled.clone();
            let opponents = self.roster.opposing.clone();
            let evaluating = self.phase.is_evaluating();

            for unit in controlled {
                let Some(target) = select_target(
                    snapshot,
                    prior_turn,
                    unit,
                    &opponents,
                    &self.weights,
                    evaluating,
                    self.config.epsilon,
                    &mut self.rng,
                    &mut self.best_q,
                ) else {
                    continue;
                };

                if !evaluating {
                    let features = feature_vector(snapshot, prior_turn, unit, target);
                    update_weights(
                        &mut self.weights,
                        &features,
                        self.ledger.total(unit),
                        unit,
                        &opponents,
                        snapshot,
                        prior_turn,
                        self.best_q,
                        &self.config,
                    );
                }

                commands.attack(unit, target);
            }
        }

        if let Some(record) = prior_turn {
            self.prune_dead(record)?;
        }

        Ok(commands)
    }

    /// Episode end: final accounting, phase bookkeeping, weight save
    pub fn terminal_step(
        &mut self,
        _snapshot: &Snapshot,
        prior_turn: Option<&TurnRecord>,
    ) -> Result<EpisodeOutcome> {
        self.accumulate_rewards(prior_turn);
        if let Some(record) = prior_turn {
            self.prune_dead(record)?;
        }

        if self.roster.opposing.is_empty() && !self.roster.controlled.is_empty() {
            tracing::debug!(remaining = self.roster.controlled.len(), "episode won");
        } else if self.roster.controlled.is_empty() && !self.roster.opposing.is_empty() {
            tracing::debug!(remaining = self.roster.opposing.len(), "episode lost");
        }

        let mean_reward = (self.fallen_reward_sum + self.ledger.sum())
            / self.episode_unit_count.max(1) as f64;

        let outcome = self.phase.complete_episode(mean_reward, &self.config);

        if let Some(block) = outcome.completed_block {
            tracing::info!(
                episodes = block.episodes_played,
                average_reward = block.average_reward,
                "evaluation block complete"
            );
            report::print_learning_curve(self.phase.curve());
        }

        if let Err(e) = self.weights.save(&self.config.weights_path) {
            tracing::warn!(
                path = %self.config.weights_path.display(),
                error = %e,
                "failed to persist weights"
            );
        }

        if outcome.halt {
            report::print_learning_curve(self.phase.curve());
        }

        Ok(outcome)
    }

    fn accumulate_rewards(&mut self, prior_turn: Option<&TurnRecord>) {
        for unit in self.roster.controlled.clone() {
            let reward = turn_reward(unit, prior_turn, &mut self.credited_kills);
            self.ledger.accumulate(unit, reward);
        }
    }

    fn prune_dead(&mut self, record: &TurnRecord) -> Result<()> {
        for unit in self.roster.prune_deaths(record)? {
            if let Some(total) = self.ledger.remove(unit) {
                self.fallen_reward_sum += total;
            }
        }
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn force_evaluating(&mut self) {
        for _ in 0..self.config.learning_block {
            self.phase.complete_episode(0.0, &self.config);
        }
        assert!(self.phase.is_evaluating());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{GridPos, Side};
    use crate::engine::history::{CommandRecord, DamageEvent, DeathEvent};
    use crate::engine::snapshot::UnitState;

    fn snapshot(units: &[(u32, Side, (i32, i32), i32)]) -> Snapshot {
        let mut snapshot = Snapshot::default();
        for &(id, side, (x, y), hp) in units {
            snapshot.units.insert(
                UnitId(id),
                UnitState {
                    side,
                    position: GridPos::new(x, y),
                    hp,
                },
            );
        }
        snapshot
    }

    fn two_on_two() -> Snapshot {
        snapshot(&[
            (1, Side::Controlled, (0, 0), 10),
            (2, Side::Controlled, (0, 2), 10),
            (10, Side::Opposing, (5, 0), 10),
            (11, Side::Opposing, (5, 2), 10),
        ])
    }

    fn learner() -> Learner {
        let config = LearningConfig {
            weights_path: std::env::temp_dir()
                .join(format!("skirmish-learner-{}", std::process::id()))
                .join("weights.txt"),
            ..Default::default()
        };
        Learner::new(config, 12345).unwrap()
    }

    #[test]
    fn test_first_turn_is_significant() {
        assert!(is_significant(None, &Roster::default()));
    }

    #[test]
    fn test_quiet_turn_is_not_significant() {
        let roster = Roster {
            controlled: vec![UnitId(1)],
            opposing: vec![UnitId(10)],
        };
        let record = TurnRecord {
            commands: vec![CommandRecord {
                unit: UnitId(1),
                target: UnitId(10),
                status: CommandStatus::Complete,
            }],
            ..Default::default()
        };
        assert!(!is_significant(Some(&record), &roster));
    }

    #[test]
    fn test_death_damage_and_incomplete_are_significant() {
        let roster = Roster {
            controlled: vec![UnitId(1)],
            opposing: vec![UnitId(10)],
        };

        let deaths = TurnRecord {
            deaths: vec![DeathEvent {
                side: Side::Opposing,
                unit: UnitId(10),
            }],
            ..Default::default()
        };
        assert!(is_significant(Some(&deaths), &roster));

        let damage = TurnRecord {
            damage: vec![DamageEvent {
                attacker: UnitId(10),
                defender: UnitId(1),
                amount: 3,
            }],
            ..Default::default()
        };
        assert!(is_significant(Some(&damage), &roster));

        // Damage to an opposing unit alone does not trigger.
        let enemy_damage = TurnRecord {
            damage: vec![DamageEvent {
                attacker: UnitId(1),
                defender: UnitId(10),
                amount: 3,
            }],
            ..Default::default()
        };
        assert!(!is_significant(Some(&enemy_damage), &roster));

        let incomplete = TurnRecord {
            commands: vec![CommandRecord {
                unit: UnitId(1),
                target: UnitId(10),
                status: CommandStatus::Incomplete,
            }],
            ..Default::default()
        };
        assert!(is_significant(Some(&incomplete), &roster));
    }

    #[test]
    fn test_initial_step_commands_every_unit() {
        let mut learner = learner();
        let commands = learner.initial_step(&two_on_two()).unwrap();
        assert_eq!(commands.len(), 2);
        assert_eq!(learner.roster().controlled.len(), 2);
        assert_eq!(learner.roster().opposing.len(), 2);
    }

    #[test]
    fn test_learning_step_mutates_weights() {
        let mut learner = learner();
        let snapshot = two_on_two();
        learner.initial_step(&snapshot).unwrap();
        let before = learner.weights().clone();

        let record = TurnRecord {
            damage: vec![DamageEvent {
                attacker: UnitId(10),
                defender: UnitId(1),
                amount: 5,
            }],
            ..Default::default()
        };
        learner.middle_step(&snapshot, Some(&record)).unwrap();
        assert_ne!(learner.weights(), &before);
    }

    #[test]
    fn test_evaluation_never_mutates_weights() {
        let mut learner = learner();
        learner.force_evaluating();
        let snapshot = two_on_two();
        let before = learner.weights().clone();

        learner.initial_step(&snapshot).unwrap();
        let record = TurnRecord {
            damage: vec![DamageEvent {
                attacker: UnitId(10),
                defender: UnitId(1),
                amount: 5,
            }],
            ..Default::default()
        };
        for _ in 0..5 {
            learner.middle_step(&snapshot, Some(&record)).unwrap();
        }
        assert_eq!(learner.weights(), &before);
    }

    #[test]
    fn test_no_decision_on_quiet_turn() {
        let mut learner = learner();
        let snapshot = two_on_two();
        learner.initial_step(&snapshot).unwrap();

        let quiet = TurnRecord {
            commands: vec![CommandRecord {
                unit: UnitId(1),
                target: UnitId(10),
                status: CommandStatus::Complete,
            }],
            ..Default::default()
        };
        let commands = learner.middle_step(&snapshot, Some(&quiet)).unwrap();
        assert!(commands.is_empty());
    }

    #[test]
    fn test_fallen_unit_leaves_ledger() {
        let mut learner = learner();
        let snapshot = two_on_two();
        learner.initial_step(&snapshot).unwrap();

        let record = TurnRecord {
            deaths: vec![DeathEvent {
                side: Side::Controlled,
                unit: UnitId(2),
            }],
            ..Default::default()
        };
        learner.middle_step(&snapshot, Some(&record)).unwrap();
        assert_eq!(learner.roster().controlled, vec![UnitId(1)]);
        assert_eq!(learner.ledger.len(), 1);
    }

    #[test]
    fn test_roster_desync_is_fatal() {
        let mut learner = learner();
        let snapshot = two_on_two();
        learner.initial_step(&snapshot).unwrap();

        let record = TurnRecord {
            deaths: vec![DeathEvent {
                side: Side::Opposing,
                unit: UnitId(77),
            }],
            ..Default::default()
        };
        assert!(learner.middle_step(&snapshot, Some(&record)).is_err());
    }
}
