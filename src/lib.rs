//! Polytopia save file decoder
//!
//! Decompresses a save frame and decodes the initial and current map
//! state, both player rosters, and the replay action log into a
//! [`WorldState`].

pub mod codec;
pub mod error;
pub mod state;

pub use codec::{decode_save, decode_save_file, DecodeOptions, Generation, MapHeader};
pub use error::{Error, ErrorKind, Result};
pub use state::{
    PlayerRecord, TileGrid, TileRecord, TurnCaptureIndex, WorldState,
};
