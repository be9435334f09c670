//! Character factory

use crate::action::{self, Action};
use crate::entity::{Behavior, Character, Entity, MovementSpeed, MovementType, Side};
use crate::hex::Hex;
use crate::status::StatusEffect;
use serde::{Deserialize, Serialize};

/// Every unit the game knows how to build
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Archetype {
    // Heroes
    Knight,
    Pyromancer,
    Cryomancer,
    Rogue,
    // Enemies
    Grunt,
    Archer,
    Shaman,
    Imp,
}

pub const HEROES: [Archetype; 4] = [
    Archetype::Knight,
    Archetype::Pyromancer,
    Archetype::Cryomancer,
    Archetype::Rogue,
];

/// Unit stat line
struct Profile {
    name: &'static str,
    health: i32,
    power: f32,
    movement: MovementType,
    speed: MovementSpeed,
    range_bonus: u32,
    cooldown: i32,
    script: Behavior,
}

impl Archetype {
    fn profile(self) -> Profile {
        use MovementSpeed::*;
        use MovementType::*;
        let (name, health, power, movement, speed, range_bonus, cooldown, script) = match self {
            Archetype::Knight => ("Knight", 14, 1.0, Blocked, Normal, 0, 100, Behavior::Melee),
            Archetype::Pyromancer => ("Pyromancer", 9, 1.5, PassAllies, Normal, 0, 90, Behavior::Skirmisher),
            Archetype::Cryomancer => ("Cryomancer", 9, 1.0, PassAllies, Slow, 1, 110, Behavior::Skirmisher),
            Archetype::Rogue => ("Rogue", 10, 1.0, PassAll, Fast, 0, 70, Behavior::Melee),
            Archetype::Grunt => ("Grunt", 8, 1.0, PassAllies, Normal, 0, 100, Behavior::Melee),
            Archetype::Archer => ("Archer", 6, 1.0, PassAllies, Normal, 0, 90, Behavior::Skirmisher),
            Archetype::Shaman => ("Shaman", 7, 1.0, Blocked, Slow, 0, 120, Behavior::Summoner),
            Archetype::Imp => ("Imp", 3, 1.0, Phase, Fast, 0, 60, Behavior::Melee),
        };
        Profile {
            name,
            health,
            power,
            movement,
            speed,
            range_bonus,
            cooldown,
            script,
        }
    }

    pub fn name(self) -> &'static str {
        self.profile().name
    }

    pub fn actions(self) -> Vec<Action> {
        match self {
            Archetype::Knight => vec![
                action::walk(),
                action::strike(3),
                action::shield_bash(),
                action::charge(),
            ],
            Archetype::Pyromancer => vec![
                action::walk(),
                action::fire_bolt(),
                action::flame_cone(),
                action::detonate(),
            ],
            Archetype::Cryomancer => vec![
                action::walk(),
                action::frost_lance(),
                action::deep_freeze(),
                action::blink(),
                action::gust(),
            ],
            Archetype::Rogue => vec![
                action::walk(),
                action::strike(2),
                action::dash(),
                action::swap(),
            ],
            Archetype::Grunt => vec![action::walk(), action::strike(2)],
            Archetype::Archer => vec![action::walk(), action::arrow_shot(), action::arrow_volley()],
            Archetype::Shaman => vec![
                action::walk(),
                action::summon_imp(),
                action::war_cry(),
                action::strike(1).with_status(StatusEffect::poison(1, 2)),
            ],
            Archetype::Imp => vec![
                action::walk(),
                action::strike(1).with_status(StatusEffect::burn(1, 1)),
            ],
        }
    }

    /// The behaviour used when no player drives the unit
    pub fn script(self) -> Behavior {
        self.profile().script
    }

    /// Build a fully equipped character. The id is assigned on insertion.
    pub fn build(self, position: Hex, side: Side) -> Entity {
        let profile = self.profile();
        let behavior = match side {
            Side::Hero => Behavior::Manual,
            Side::Enemy => profile.script,
        };
        let character = Character {
            power: profile.power,
            actions: self.actions(),
            movement: profile.movement,
            speed: profile.speed,
            range_bonus: profile.range_bonus,
            timer: profile.cooldown / 2,
            cooldown: profile.cooldown,
            side,
            behavior,
        };
        Entity::character(profile.name, position, profile.health, character)
    }

    /// Same as [`Archetype::build`] but always scripted
    pub fn build_scripted(self, position: Hex, side: Side) -> Entity {
        let mut entity = self.build(position, side);
        if let Some(character) = entity.as_character_mut() {
            character.behavior = self.script();
        }
        entity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heroes_are_manual() {
        for archetype in HEROES {
            let entity = archetype.build(Hex::ORIGIN, Side::Hero);
            let character = entity.as_character().unwrap();
            assert_eq!(character.behavior, Behavior::Manual);
            assert!(!character.actions.is_empty());
            assert_eq!(entity.health, entity.max_health);
        }
    }

    #[test]
    fn test_enemies_are_scripted() {
        let grunt = Archetype::Grunt.build(Hex::ORIGIN, Side::Enemy);
        assert_eq!(grunt.as_character().unwrap().behavior, Behavior::Melee);
        let knight = Archetype::Knight.build_scripted(Hex::ORIGIN, Side::Hero);
        assert_eq!(knight.as_character().unwrap().behavior, Behavior::Melee);
    }
}
