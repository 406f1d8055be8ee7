//! Turn-based spell battle resolved through the best-first state search.
//!
//! A mage trades turns with a boss: every player turn casts exactly one
//! affordable spell, every boss turn answers with a physical attack, and
//! timed effects tick at the start of both. States are explored in order
//! of total mana spent, so the first victory found is the cheapest one.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::debug;

use crate::error::Result;
use crate::search::{best_first, SearchState};

/// Damage dealt by each poison tick.
const POISON_TICK: i32 = 3;
/// Armor granted while a shield is active.
const SHIELD_ARMOR: i32 = 7;
/// Mana restored by each recharge tick.
const RECHARGE_MANA: u32 = 101;
/// Direct damage of a magic missile.
const MISSILE_DAMAGE: i32 = 4;
/// Damage dealt and hit points restored by a drain.
const DRAIN_DAMAGE: i32 = 2;
const DRAIN_HEAL: i32 = 2;
/// Hit points lost at the start of each player turn in hard mode.
const HARD_MODE_LOSS: i32 = 1;

/// The five castable spells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Spell {
    MagicMissile,
    Drain,
    Shield,
    Poison,
    Recharge,
}

impl Spell {
    /// Every spell, in casting-priority order (cheapest first).
    pub const ALL: [Spell; 5] = [
        Spell::MagicMissile,
        Spell::Drain,
        Spell::Shield,
        Spell::Poison,
        Spell::Recharge,
    ];

    pub fn mana_cost(self) -> u32 {
        match self {
            Spell::MagicMissile => 53,
            Spell::Drain => 73,
            Spell::Shield => 113,
            Spell::Poison => 173,
            Spell::Recharge => 229,
        }
    }

    /// Turns the effect stays active; zero for instant spells.
    pub fn duration(self) -> u8 {
        match self {
            Spell::MagicMissile | Spell::Drain => 0,
            Spell::Shield | Spell::Poison => 6,
            Spell::Recharge => 5,
        }
    }

    /// Whether casting installs a timed effect instead of acting at once.
    pub fn is_effect(self) -> bool {
        self.duration() > 0
    }
}

/// An active timed effect and its remaining turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Effect {
    pub spell: Spell,
    pub remaining: u8,
}

/// Starting conditions for a battle, typically loaded from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleSetup {
    pub mage_hp: i32,
    pub mage_mana: u32,
    pub boss_hp: i32,
    pub boss_damage: i32,
    #[serde(default)]
    pub hard_mode: bool,
}

/// One combat position.
///
/// Equality and hashing cover the mage's resources, the boss, the active
/// effects, the difficulty, and the mana spent so far. The spell that
/// produced the state is excluded, so two different casting orders that
/// land on the same position de-duplicate in the search.
#[derive(Debug, Clone)]
pub struct BattleState {
    pub mage_hp: i32,
    pub mage_mana: u32,
    pub boss_hp: i32,
    pub boss_damage: i32,
    pub hard_mode: bool,
    /// Active effects, kept in a canonical order (at most one per spell).
    pub effects: SmallVec<[Effect; 3]>,
    /// Total mana spent on casts so far; the search cost.
    pub spent: u32,
    /// Spell cast to produce this state; `None` on the initial state.
    pub last_cast: Option<Spell>,
}

impl BattleState {
    pub fn initial(setup: &BattleSetup) -> Self {
        Self {
            mage_hp: setup.mage_hp,
            mage_mana: setup.mage_mana,
            boss_hp: setup.boss_hp,
            boss_damage: setup.boss_damage,
            hard_mode: setup.hard_mode,
            effects: SmallVec::new(),
            spent: 0,
            last_cast: None,
        }
    }

    fn key(&self) -> (i32, u32, i32, i32, bool, &[Effect], u32) {
        (
            self.mage_hp,
            self.mage_mana,
            self.boss_hp,
            self.boss_damage,
            self.hard_mode,
            &self.effects,
            self.spent,
        )
    }

    fn effect(&self, spell: Spell) -> Option<Effect> {
        self.effects.iter().find(|e| e.spell == spell).copied()
    }

    fn has_effect(&self, spell: Spell) -> bool {
        self.effect(spell).is_some()
    }

    fn armor(&self) -> i32 {
        if self.has_effect(Spell::Shield) {
            SHIELD_ARMOR
        } else {
            0
        }
    }

    /// Damage the remaining poison ticks will deal without further casts.
    fn pending_poison(&self) -> i32 {
        self.effect(Spell::Poison)
            .map_or(0, |e| POISON_TICK * i32::from(e.remaining))
    }

    /// The boss is beaten outright, or cannot outlive the poison already
    /// running. Pending poison only shrinks in lockstep with the boss's
    /// hit points, so the check is exact: a state that is not yet won
    /// never becomes won by ticking alone.
    pub fn is_won(&self) -> bool {
        self.boss_hp <= 0 || self.pending_poison() >= self.boss_hp
    }

    /// Apply every active effect once and retire the expired ones.
    fn tick_effects(&mut self) {
        let mut boss_damage = 0;
        let mut mana_gained = 0;
        for effect in &mut self.effects {
            match effect.spell {
                Spell::Poison => boss_damage += POISON_TICK,
                Spell::Recharge => mana_gained += RECHARGE_MANA,
                _ => {}
            }
            effect.remaining -= 1;
        }
        self.boss_hp -= boss_damage;
        self.mage_mana += mana_gained;
        self.effects.retain(|e| e.remaining > 0);
    }

    fn cast(&mut self, spell: Spell) {
        self.mage_mana -= spell.mana_cost();
        self.spent += spell.mana_cost();
        self.last_cast = Some(spell);
        match spell {
            Spell::MagicMissile => self.boss_hp -= MISSILE_DAMAGE,
            Spell::Drain => {
                self.boss_hp -= DRAIN_DAMAGE;
                self.mage_hp += DRAIN_HEAL;
            }
            Spell::Shield | Spell::Poison | Spell::Recharge => {
                self.effects.push(Effect {
                    spell,
                    remaining: spell.duration(),
                });
                self.effects.sort_by_key(|e| e.spell as u8);
            }
        }
    }

    /// Tick at the top of the boss turn, then attack. A won state never
    /// reaches this point, so the boss is always alive to strike.
    fn boss_turn(&mut self) {
        self.tick_effects();
        let damage = (self.boss_damage - self.armor()).max(1);
        self.mage_hp -= damage;
    }

    /// States reachable by one legal cast, each advanced through the boss
    /// response unless the cast already decides the battle.
    ///
    /// The full turn order: hard-mode bleed, player-turn effect tick, the
    /// cast itself, then (for an undecided battle) the boss-turn tick and
    /// attack. States where the mage dies along the way are dropped.
    pub fn successors(&self) -> Vec<BattleState> {
        let mut out = Vec::new();

        let mut base = self.clone();
        if base.hard_mode {
            base.mage_hp -= HARD_MODE_LOSS;
            if base.mage_hp <= 0 {
                return out;
            }
        }
        base.tick_effects();

        for spell in Spell::ALL {
            if spell.mana_cost() > base.mage_mana {
                continue;
            }
            if spell.is_effect() && base.has_effect(spell) {
                continue;
            }
            let mut next = base.clone();
            next.cast(spell);
            if next.is_won() {
                // Battle decided; the boss never gets to respond.
                out.push(next);
                continue;
            }
            next.boss_turn();
            if next.mage_hp > 0 {
                out.push(next);
            }
        }
        out
    }
}

impl PartialEq for BattleState {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for BattleState {}

impl Hash for BattleState {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl SearchState for BattleState {
    type Cost = u32;

    fn cost(&self) -> u32 {
        self.spent
    }
}

/// Outcome of a won battle.
#[derive(Debug, Clone, Serialize)]
pub struct Victory {
    /// Total mana spent across all casts; minimal for the setup.
    pub mana_spent: u32,
    /// The winning casts, in order.
    pub casts: Vec<Spell>,
    /// States the search expanded on the way.
    pub states_expanded: usize,
}

/// Find the cheapest sequence of casts that defeats the boss.
#[tracing::instrument(
    skip(setup),
    fields(boss_hp = setup.boss_hp, mage_hp = setup.mage_hp, hard_mode = setup.hard_mode)
)]
pub fn cheapest_victory(setup: &BattleSetup) -> Result<Victory> {
    let outcome = best_first(
        BattleState::initial(setup),
        BattleState::successors,
        BattleState::is_won,
    )?;

    let casts: Vec<Spell> = outcome.path.iter().filter_map(|s| s.last_cast).collect();
    debug!(mana_spent = outcome.goal.spent, casts = casts.len(), "battle won");
    Ok(Victory {
        mana_spent: outcome.goal.spent,
        casts,
        states_expanded: outcome.expanded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(mage_hp: i32, mage_mana: u32, boss_hp: i32, boss_damage: i32) -> BattleState {
        BattleState::initial(&BattleSetup {
            mage_hp,
            mage_mana,
            boss_hp,
            boss_damage,
            hard_mode: false,
        })
    }

    #[test]
    fn test_spell_table() {
        assert_eq!(Spell::MagicMissile.mana_cost(), 53);
        assert_eq!(Spell::Recharge.mana_cost(), 229);
        assert_eq!(Spell::Poison.duration(), 6);
        assert_eq!(Spell::Recharge.duration(), 5);
        assert!(!Spell::Drain.is_effect());
        assert!(Spell::Shield.is_effect());
    }

    #[test]
    fn test_effects_apply_then_expire() {
        let mut state = state(10, 0, 20, 8);
        state.effects.push(Effect {
            spell: Spell::Poison,
            remaining: 1,
        });
        state.effects.push(Effect {
            spell: Spell::Recharge,
            remaining: 2,
        });

        state.tick_effects();
        assert_eq!(state.boss_hp, 17);
        assert_eq!(state.mage_mana, 101);
        // Poison expired, recharge has one tick left.
        assert_eq!(state.effects.len(), 1);
        assert_eq!(state.effects[0].spell, Spell::Recharge);
        assert_eq!(state.effects[0].remaining, 1);
    }

    #[test]
    fn test_pending_poison_decides_the_battle() {
        let mut state = state(10, 0, 6, 8);
        state.effects.push(Effect {
            spell: Spell::Poison,
            remaining: 2,
        });
        assert!(state.is_won());

        state.boss_hp = 7;
        assert!(!state.is_won());
    }

    #[test]
    fn test_shield_blunts_the_boss_attack() {
        let mut start = state(10, 500, 30, 8);
        start.effects.push(Effect {
            spell: Spell::Shield,
            remaining: 4,
        });

        let successors = start.successors();
        let missile = successors
            .iter()
            .find(|s| s.last_cast == Some(Spell::MagicMissile))
            .unwrap();
        assert_eq!(missile.boss_hp, 26);
        // Attack lands for max(1, 8 - 7) = 1.
        assert_eq!(missile.mage_hp, 9);
        assert_eq!(missile.effect(Spell::Shield).unwrap().remaining, 2);
    }

    #[test]
    fn test_active_effect_blocks_recasting() {
        let mut start = state(20, 1000, 50, 3);
        start.effects.push(Effect {
            spell: Spell::Shield,
            remaining: 2,
        });
        let recast = start
            .successors()
            .into_iter()
            .find(|s| s.last_cast == Some(Spell::Shield));
        assert!(recast.is_none());

        // An effect expiring on the player-turn tick frees its slot.
        let mut expiring = state(20, 1000, 50, 3);
        expiring.effects.push(Effect {
            spell: Spell::Shield,
            remaining: 1,
        });
        let recast = expiring
            .successors()
            .into_iter()
            .find(|s| s.last_cast == Some(Spell::Shield));
        assert!(recast.is_some());
    }

    #[test]
    fn test_hard_mode_bleed_can_end_the_fight() {
        let mut dying = state(1, 1000, 50, 3);
        dying.hard_mode = true;
        assert!(dying.successors().is_empty());

        let mut surviving = state(5, 1000, 50, 3);
        surviving.hard_mode = true;
        let successors = surviving.successors();
        assert!(!successors.is_empty());
        for next in &successors {
            assert!(next.mage_hp > 0);
        }
    }

    #[test]
    fn test_unaffordable_spells_are_skipped() {
        let start = state(10, 60, 30, 1);
        let successors = start.successors();
        assert_eq!(successors.len(), 1);
        assert_eq!(successors[0].last_cast, Some(Spell::MagicMissile));
        assert_eq!(successors[0].spent, 53);
    }

    #[test]
    fn test_equality_ignores_the_producing_cast() {
        let mut left = state(10, 250, 13, 8);
        let mut right = left.clone();
        left.last_cast = Some(Spell::Drain);
        right.last_cast = Some(Spell::Shield);
        assert_eq!(left, right);

        let mut set = std::collections::HashSet::new();
        set.insert(left);
        set.insert(right);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_spent_mana_distinguishes_states() {
        let left = state(10, 250, 13, 8);
        let mut right = left.clone();
        right.spent = 53;
        assert_ne!(left, right);
    }
}
