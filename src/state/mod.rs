pub mod player;
pub mod tile;
pub mod world;

pub use crate::codec::action::{CaptureCity, TurnCaptureIndex};
pub use player::{
    DiplomacyMessage, DiplomacyRelation, OwnerTribeMap, PlayerId, PlayerRecord, Task,
};
pub use tile::{
    Improvement, ImprovementRecord, Rebellion, TileGrid, TileRecord, TileUnit, UnitRecord,
    CITY_IMPROVEMENT,
};
pub use world::WorldState;
