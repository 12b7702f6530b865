//! Minimal skirmish simulator
//!
//! A deterministic stand-in for the full simulation engine, just enough
//! to drive training episodes headlessly: 8-way grid movement toward the
//! target, adjacent melee attacks, and per-turn event logs. Opposing
//! units chase the nearest controlled unit.
//!
//! Each turn: apply commands -> opposing targeting -> movement/attacks ->
//! deaths -> event log.

use ahash::AHashMap;
use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::types::{GridPos, Side, Turn, UnitId};
use crate::engine::command::CommandSet;
use crate::engine::history::{
    CommandRecord, CommandStatus, DamageEvent, DeathEvent, TurnRecord,
};
use crate::engine::snapshot::{Snapshot, UnitState};

/// Simulator parameters
#[derive(Debug, Clone)]
pub struct SimConfig {
    pub width: i32,
    pub height: i32,
    pub controlled_units: u32,
    pub opposing_units: u32,
    pub unit_hp: i32,
    pub damage_min: i32,
    pub damage_max: i32,
    pub attack_range: i32,
    pub max_turns: Turn,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: 32,
            height: 16,
            controlled_units: 5,
            opposing_units: 5,
            unit_hp: 60,
            damage_min: 4,
            damage_max: 8,
            attack_range: 1,
            max_turns: 400,
        }
    }
}

#[derive(Debug, Clone)]
struct SimUnit {
    side: Side,
    position: GridPos,
    hp: i32,
    target: Option<UnitId>,
}

/// One skirmish episode
#[derive(Debug)]
pub struct SkirmishSim {
    config: SimConfig,
    units: AHashMap<UnitId, SimUnit>,
    /// Stable resolution order (spawn order)
    order: Vec<UnitId>,
    turn: Turn,
    rng: StdRng,
    last_record: Option<TurnRecord>,
}

impl SkirmishSim {
    /// Spawn two opposing columns facing each other across the map
    pub fn new(config: SimConfig, seed: u64) -> Self {
        let mut units = AHashMap::new();
        let mut order = Vec::new();
        let mut next_id = 0u32;

        let mut spawn_column = |side: Side, x: i32, count: u32| {
            for i in 0..count {
                let id = UnitId(next_id);
                next_id += 1;
                let y = 1 + (i as i32 * (config.height - 2)) / count.max(1) as i32;
                units.insert(
                    id,
                    SimUnit {
                        side,
                        position: GridPos::new(x, y),
                        hp: config.unit_hp,
                        target: None,
                    },
                );
                order.push(id);
            }
        };

        spawn_column(Side::Controlled, 2, config.controlled_units);
        spawn_column(Side::Opposing, config.width - 3, config.opposing_units);

        Self {
            config,
            units,
            order,
            turn: 0,
            rng: StdRng::seed_from_u64(seed),
            last_record: None,
        }
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    /// State view for the current turn
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            turn: self.turn,
            units: self
                .units
                .iter()
                .map(|(id, u)| {
                    (
                        *id,
                        UnitState {
                            side: u.side,
                            position: u.position,
                            hp: u.hp,
                        },
                    )
                })
                .collect(),
        }
    }

    /// Event log for the previous turn; `None` before the first resolution
    pub fn last_turn(&self) -> Option<&TurnRecord> {
        self.last_record.as_ref()
    }

    /// Accept the agent's commands for this turn
    pub fn apply_commands(&mut self, commands: &CommandSet) {
        for (unit, command) in &commands.commands {
            if let Some(u) = self.units.get_mut(unit) {
                u.target = Some(command.target);
            }
        }
    }

    /// Episode over when either side is wiped out or the turn cap hits
    pub fn is_over(&self) -> bool {
        self.side_count(Side::Controlled) == 0
            || self.side_count(Side::Opposing) == 0
            || self.turn >= self.config.max_turns
    }

    /// Did the controlled side win?
    pub fn controlled_won(&self) -> bool {
        self.side_count(Side::Opposing) == 0 && self.side_count(Side::Controlled) > 0
    }

    pub fn side_count(&self, side: Side) -> usize {
        self.units.values().filter(|u| u.side == side).count()
    }

    /// Resolve one turn and produce its event log
    pub fn step(&mut self) {
        let mut record = TurnRecord::default();

        self.retarget_opposing();

        // Movement and attacks, in stable spawn order. Damage lands
        // immediately; units reduced to zero fall at end of turn, so two
        // attackers can both log damage against the same dying unit.
        for idx in 0..self.order.len() {
            let id = self.order[idx];
            let (side, position, target) = match self.units.get(&id) {
                Some(u) => (u.side, u.position, u.target),
                None => continue,
            };
            let Some(target_id) = target else { continue };

            let Some(target_unit) = self.units.get(&target_id) else {
                // Target died earlier; controlled units wait for new
                // orders, opposing units re-pick next turn.
                if side == Side::Controlled {
                    record.commands.push(CommandRecord {
                        unit: id,
                        target: target_id,
                        status: CommandStatus::Failed,
                    });
                }
                if let Some(u) = self.units.get_mut(&id) {
                    u.target = None;
                }
                continue;
            };

            let target_pos = target_unit.position;
            let distance = position.chebyshev_distance(&target_pos);
            let status = if distance <= self.config.attack_range {
                let amount = self.rng.gen_range(self.config.damage_min..=self.config.damage_max);
                record.damage.push(DamageEvent {
                    attacker: id,
                    defender: target_id,
                    amount,
                });
                if let Some(t) = self.units.get_mut(&target_id) {
                    t.hp -= amount;
                }
                CommandStatus::Complete
            } else {
                if let Some(u) = self.units.get_mut(&id) {
                    u.position = u.position.step_toward(&target_pos);
                }
                CommandStatus::Incomplete
            };
            record.commands.push(CommandRecord {
                unit: id,
                target: target_id,
                status,
            });
        }

        // Deaths
        let dead: Vec<UnitId> = self
            .order
            .iter()
            .copied()
            .filter(|id| self.units.get(id).is_some_and(|u| u.hp <= 0))
            .collect();
        for id in dead {
            if let Some(unit) = self.units.remove(&id) {
                record.deaths.push(DeathEvent {
                    side: unit.side,
                    unit: id,
                });
                self.order.retain(|u| *u != id);
            }
        }

        self.turn += 1;
        self.last_record = Some(record);
    }

    /// Opposing units chase the nearest controlled unit, re-deciding every
    /// turn so their targeting shows up in the command log.
    fn retarget_opposing(&mut self) {
        let controlled: Vec<(UnitId, GridPos)> = self
            .order
            .iter()
            .filter_map(|id| {
                let u = self.units.get(id)?;
                (u.side == Side::Controlled).then_some((*id, u.position))
            })
            .collect();

        for idx in 0..self.order.len() {
            let id = self.order[idx];
            let Some(u) = self.units.get(&id) else { continue };
            if u.side != Side::Opposing {
                continue;
            }
            let position = u.position;
            let nearest = controlled
                .iter()
                .min_by_key(|(cid, pos)| {
                    (OrderedFloat(position.chebyshev_distance(pos) as f64), cid.0)
                })
                .map(|(cid, _)| *cid);
            if let Some(u) = self.units.get_mut(&id) {
                u.target = nearest;
            }
        }
    }
}
