use std::collections::BTreeMap;

use serde::Serialize;

/// Player identifier as stored in tiles and actions
pub type PlayerId = u8;

/// Player id to tribe id
pub type OwnerTribeMap = BTreeMap<PlayerId, u16>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerRecord {
    pub id: PlayerId,
    pub name: String,
    pub account_id: String,
    pub autoplay: bool,
    pub start_coordinates: (i32, i32),
    pub tribe: u16,
    pub unknown_byte1: u8,
    pub unknown_int1: u32,
    pub unknown_list: Vec<[u8; 5]>,
    pub currency: u32,
    pub score: u32,
    pub unknown_int2: u32,
    pub num_cities: u16,
    pub technologies: Vec<u16>,
    pub encountered_players: Vec<PlayerId>,
    pub tasks: Vec<Task>,
    pub total_units_killed: i32,
    pub total_units_lost: i32,
    pub total_tribes_destroyed: i32,
    pub color_override: Option<[u8; 4]>,
    pub unknown_byte2: u8,
    pub unique_improvements: Vec<u16>,
    pub diplomacy: Vec<DiplomacyRelation>,
    pub diplomacy_messages: Vec<DiplomacyMessage>,
    pub destroyed_by_tribe: u8,
    pub destroyed_turn: u32,
    pub trailing: Vec<u8>,
}

impl PlayerRecord {
    pub fn is_destroyed(&self) -> bool {
        self.destroyed_turn != 0
    }

    pub fn relation_with(&self, other: PlayerId) -> Option<&DiplomacyRelation> {
        self.diplomacy.iter().find(|r| r.player_id == other)
    }
}

/// Task (achievement) progress. Pacifist and Killer tasks carry a counter,
/// the rest a short status field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    pub task_type: i16,
    pub payload: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiplomacyRelation {
    pub player_id: PlayerId,
    pub state: u8,
    pub last_attack_turn: i32,
    pub embassy_level: u8,
    pub last_peace_broken_turn: i32,
    pub first_meet_turn: i32,
    pub embassy_build_turn: i32,
    pub previous_attack_turn: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiplomacyMessage {
    pub message_type: u8,
    pub sender: PlayerId,
}
