use serde::Serialize;

use crate::codec::action::{ActionRecord, TurnCaptureIndex};
use crate::codec::map_header::MapHeader;
use crate::codec::schema::Generation;
use crate::state::player::{OwnerTribeMap, PlayerId, PlayerRecord};
use crate::state::tile::TileGrid;

/// Everything decoded from one save file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldState {
    /// Layout generation the file was decoded with
    pub generation: Generation,
    pub map_width: usize,
    pub map_height: usize,

    pub initial_header: MapHeader,
    pub current_header: MapHeader,

    /// Map as it was at the start of the game
    pub initial_tiles: TileGrid,
    /// Map as of the last saved turn
    pub tiles: TileGrid,

    pub initial_players: Vec<PlayerRecord>,
    pub players: Vec<PlayerRecord>,
    /// Current roster's player id to tribe mapping
    pub owner_tribes: OwnerTribeMap,

    /// Current turn as reported by the current-state header
    pub max_turn: u32,
    /// Turn counter value reached by walking the replay
    pub replay_turns: u32,

    pub actions: Vec<ActionRecord>,
    pub turn_captures: TurnCaptureIndex,
}

impl WorldState {
    pub fn get_player(&self, id: PlayerId) -> Option<&PlayerRecord> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn tribe_of(&self, id: PlayerId) -> Option<u16> {
        self.owner_tribes.get(&id).copied()
    }

    /// Players that have not been destroyed
    pub fn surviving_players(&self) -> impl Iterator<Item = &PlayerRecord> {
        self.players.iter().filter(|p| !p.is_destroyed())
    }
}
