//! Full-state snapshots pushed by the arena.
//!
//! The arena never sends deltas. Every message on the live stream carries
//! the whole board: the round counter, the board size, every bot with its
//! position and hit points, and optionally the attacks resolved this round.
//! Anything the viewer wants to know about *changes* has to be inferred by
//! comparing two snapshots.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::geometry::Cell;

/// Board size assumed before the first snapshot arrives.
pub const DEFAULT_BOARD_SIZE: u32 = 20;

/// Largest board edge accepted from the wire.
pub const MAX_BOARD_SIZE: u32 = 1024;

/// Position and health of one bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityState {
    /// Cell the bot currently occupies.
    pub pos: Cell,
    /// Remaining hit points. Eliminated bots may linger at zero or below.
    pub hp: i64,
}

/// One attack resolved during a round.
///
/// On the wire an attack is an array whose first element names the
/// attacker. A second string element, when present, names the target;
/// anything after that is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Value>", into = "Vec<Value>")]
pub struct Attack {
    /// Name of the attacking bot.
    pub attacker: String,
    /// Name of the bot that was hit, if the arena reported it.
    pub target: Option<String>,
}

impl Attack {
    /// An attack with a known target.
    pub fn new(attacker: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            attacker: attacker.into(),
            target: Some(target.into()),
        }
    }

    /// An attack that only names the attacker.
    pub fn by(attacker: impl Into<String>) -> Self {
        Self {
            attacker: attacker.into(),
            target: None,
        }
    }
}

impl TryFrom<Vec<Value>> for Attack {
    type Error = String;

    fn try_from(entry: Vec<Value>) -> Result<Self, Self::Error> {
        let mut fields = entry.into_iter();
        let attacker = match fields.next() {
            Some(Value::String(name)) => name,
            Some(other) => return Err(format!("attacker must be a string, got {other}")),
            None => return Err(String::from("attack entry is empty")),
        };
        let target = match fields.next() {
            Some(Value::String(name)) => Some(name),
            _ => None,
        };
        Ok(Self { attacker, target })
    }
}

impl From<Attack> for Vec<Value> {
    fn from(attack: Attack) -> Self {
        let mut entry = vec![Value::String(attack.attacker)];
        if let Some(target) = attack.target {
            entry.push(Value::String(target));
        }
        entry
    }
}

/// The authoritative board state as of one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Round counter. Never decreases within a session.
    pub round: u64,
    /// Edge length of the square board, at most [`MAX_BOARD_SIZE`].
    #[serde(deserialize_with = "bounded_board_size")]
    pub board_size: u32,
    /// Every bot on the board keyed by its unique name.
    pub bots: BTreeMap<String, EntityState>,
    /// Attacks resolved this round. Absent and empty mean the same thing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attacks: Option<Vec<Attack>>,
}

fn bounded_board_size<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let size = u32::deserialize(deserializer)?;
    if size > MAX_BOARD_SIZE {
        return Err(serde::de::Error::custom(format!(
            "board_size {size} exceeds {MAX_BOARD_SIZE}"
        )));
    }
    Ok(size)
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            round: 0,
            board_size: DEFAULT_BOARD_SIZE,
            bots: BTreeMap::new(),
            attacks: None,
        }
    }
}

impl Snapshot {
    /// An empty board of the given size at the given round.
    pub const fn empty(round: u64, board_size: u32) -> Self {
        Self {
            round,
            board_size,
            bots: BTreeMap::new(),
            attacks: None,
        }
    }

    /// Builder-style helper that places a bot on the board.
    #[must_use]
    pub fn with_bot(mut self, name: impl Into<String>, pos: Cell, hp: i64) -> Self {
        self.bots.insert(name.into(), EntityState { pos, hp });
        self
    }

    /// Builder-style helper that records an attack.
    #[must_use]
    pub fn with_attack(mut self, attack: Attack) -> Self {
        self.attacks.get_or_insert_with(Vec::new).push(attack);
        self
    }

    /// Parse a snapshot from the JSON text of one stream message.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Attacker names in the order the arena listed them.
    pub fn attackers(&self) -> impl Iterator<Item = &str> {
        self.attacks
            .iter()
            .flatten()
            .map(|attack| attack.attacker.as_str())
    }

    /// The bot standing on `cell`.
    ///
    /// Well-formed snapshots hold at most one bot per cell. If a malformed
    /// one stacks several, the first by name wins.
    pub fn occupant(&self, cell: Cell) -> Option<(&str, &EntityState)> {
        self.bots
            .iter()
            .find(|(_, state)| state.pos == cell)
            .map(|(name, state)| (name.as_str(), state))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn parses_full_message() {
        let text = r#"{
            "round": 7,
            "board_size": 5,
            "bots": {
                "random_bot": {"pos": [0, 1], "hp": 9},
                "weakest_bot": {"pos": [4, 4], "hp": 10}
            },
            "attacks": [["random_bot", "weakest_bot"]]
        }"#;
        let snapshot = Snapshot::from_json(text).unwrap();

        assert_eq!(snapshot.round, 7);
        assert_eq!(snapshot.board_size, 5);
        assert_eq!(snapshot.bots.len(), 2);
        assert_eq!(snapshot.bots["random_bot"].pos, Cell::new(0, 1));
        assert_eq!(snapshot.bots["random_bot"].hp, 9);
        assert_eq!(
            snapshot.attacks,
            Some(vec![Attack::new("random_bot", "weakest_bot")])
        );
    }

    #[test]
    fn oversized_board_is_rejected() {
        let text = r#"{"round": 1, "board_size": 4000000000, "bots": {}}"#;
        let error = Snapshot::from_json(text).unwrap_err();
        assert!(error.to_string().contains("exceeds"), "{error}");

        let largest = format!(r#"{{"round": 1, "board_size": {MAX_BOARD_SIZE}, "bots": {{}}}}"#);
        assert_eq!(Snapshot::from_json(&largest).unwrap().board_size, MAX_BOARD_SIZE);
    }

    #[test]
    fn attacks_are_optional() {
        let text = r#"{"round": 1, "board_size": 5, "bots": {}}"#;
        let snapshot = Snapshot::from_json(text).unwrap();
        assert!(snapshot.attacks.is_none());
        assert_eq!(snapshot.attackers().count(), 0);
    }

    #[test]
    fn attack_entry_with_only_attacker() {
        let text = r#"{"round": 1, "board_size": 5, "bots": {}, "attacks": [["A"], ["B", "A", 3]]}"#;
        let snapshot = Snapshot::from_json(text).unwrap();
        let attackers: Vec<&str> = snapshot.attackers().collect();
        assert_eq!(attackers, vec!["A", "B"]);
        assert_eq!(snapshot.attacks.unwrap()[0], Attack::by("A"));
    }

    #[test]
    fn malformed_attack_entries_fail_the_message() {
        let empty = r#"{"round": 1, "board_size": 5, "bots": {}, "attacks": [[]]}"#;
        assert!(Snapshot::from_json(empty).is_err());

        let numeric = r#"{"round": 1, "board_size": 5, "bots": {}, "attacks": [[1, "A"]]}"#;
        assert!(Snapshot::from_json(numeric).is_err());
    }

    #[test]
    fn rejects_non_snapshot_payloads() {
        assert!(Snapshot::from_json("not json").is_err());
        assert!(Snapshot::from_json(r#"{"round": 1}"#).is_err());
        assert!(Snapshot::from_json(r#"{"round": -1, "board_size": 5, "bots": {}}"#).is_err());
        assert!(
            Snapshot::from_json(r#"{"round": 1, "board_size": 5, "bots": {"A": {"pos": [1], "hp": 3}}}"#)
                .is_err()
        );
    }

    #[test]
    fn serializes_back_to_wire_shape() {
        let snapshot = Snapshot::empty(2, 5)
            .with_bot("A", Cell::new(1, 2), 4)
            .with_attack(Attack::by("A"));
        let value = serde_json::to_value(&snapshot).unwrap();

        assert_eq!(value["bots"]["A"]["pos"], serde_json::json!([1, 2]));
        assert_eq!(value["attacks"], serde_json::json!([["A"]]));

        let without_attacks = serde_json::to_value(Snapshot::empty(0, 5)).unwrap();
        assert!(without_attacks.get("attacks").is_none());
    }

    #[test]
    fn default_is_pre_connection_board() {
        let snapshot = Snapshot::default();
        assert_eq!(snapshot.round, 0);
        assert_eq!(snapshot.board_size, DEFAULT_BOARD_SIZE);
        assert!(snapshot.bots.is_empty());
    }

    #[test]
    fn occupant_prefers_first_name() {
        let snapshot = Snapshot::empty(0, 5)
            .with_bot("b", Cell::new(1, 1), 3)
            .with_bot("a", Cell::new(1, 1), 5)
            .with_bot("c", Cell::new(2, 2), 1);

        let (name, state) = snapshot.occupant(Cell::new(1, 1)).unwrap();
        assert_eq!(name, "a");
        assert_eq!(state.hp, 5);
        assert!(snapshot.occupant(Cell::new(0, 0)).is_none());
    }
}
