pub mod action;
pub mod frame;
pub mod map_header;
pub mod player;
pub mod reader;
pub mod save_file;
pub mod schema;
pub mod tile;

#[cfg(test)]
pub mod fixtures;
#[cfg(test)]
pub mod writer;

pub use action::{
    read_action_log, ActionLog, ActionRecord, ActionType, CaptureCity, TurnCaptureIndex,
    TurnTracker, TURN_SENTINEL_PLAYER,
};
pub use frame::{decompress_frame, read_frame_file, FrameHeader};
pub use map_header::MapHeader;
pub use player::{build_owner_tribe_map, read_player_roster, task_payload_len};
pub use reader::BinaryReader;
pub use save_file::{decode_decompressed, decode_save, decode_save_file, DecodeOptions};
pub use schema::{Generation, Layout};
pub use tile::read_tile_grid;
