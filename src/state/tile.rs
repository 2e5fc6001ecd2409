use std::collections::BTreeMap;

use serde::Serialize;

/// Improvement code used for cities (and unclaimed villages)
pub const CITY_IMPROVEMENT: u16 = 1;

/// One decoded map cell
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileRecord {
    pub x: u32,
    pub y: u32,
    pub terrain: u16,
    pub climate: u16,
    pub altitude: i16,
    pub owner: u8,
    pub capital: u8,
    /// Location of the city governing this tile
    pub capital_coordinates: (i32, i32),
    pub resource: Option<u16>,
    pub improvement: Option<Improvement>,
    pub unit: Option<TileUnit>,
    pub player_visibility: Vec<u8>,
    pub has_road: bool,
    pub has_water_route: bool,
    pub unknown: Vec<u8>,
}

impl TileRecord {
    pub fn resource_exists(&self) -> bool {
        self.resource.is_some()
    }

    pub fn improvement_exists(&self) -> bool {
        self.improvement.is_some()
    }

    pub fn improvement_code(&self) -> Option<u16> {
        self.improvement.as_ref().map(Improvement::code)
    }

    /// True for owned cities and for unclaimed villages
    pub fn has_city(&self) -> bool {
        matches!(
            self.improvement,
            Some(Improvement::City(_)) | Some(Improvement::Village(_))
        )
    }

    /// The unit currently standing on the tile, if any
    pub fn unit(&self) -> Option<&UnitRecord> {
        self.unit.as_ref().map(TileUnit::unit)
    }
}

/// A built structure on a tile.
///
/// All variants share the same wire shape; the variant records how the
/// tile's owner, resource and improvement code classified it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Improvement {
    /// A city on an owned tile with no resource
    City(ImprovementRecord),
    /// A city marker without a name, not yet claimed by anyone
    Village(ImprovementRecord),
    Structure { code: u16, record: ImprovementRecord },
}

impl Improvement {
    pub fn code(&self) -> u16 {
        match self {
            Improvement::City(_) | Improvement::Village(_) => CITY_IMPROVEMENT,
            Improvement::Structure { code, .. } => *code,
        }
    }

    pub fn record(&self) -> &ImprovementRecord {
        match self {
            Improvement::City(record) | Improvement::Village(record) => record,
            Improvement::Structure { record, .. } => record,
        }
    }

    pub fn city_name(&self) -> Option<&str> {
        match self {
            Improvement::City(record) => record.name.as_deref(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImprovementRecord {
    pub level: u16,
    pub founded_turn: u16,
    pub current_population: i16,
    pub total_population: u16,
    pub production: u16,
    pub base_score: u16,
    /// 1 is the default border, 2 an expanded one
    pub border_size: u16,
    pub upgrade_count: i16,
    pub connected_player_capital: u8,
    pub name: Option<String>,
    pub founded_tribe: u8,
    pub rewards: Vec<u16>,
    pub rebellion: Option<Rebellion>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rebellion {
    pub flag: u16,
    pub data: [u8; 2],
}

/// Units present on a tile
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TileUnit {
    Single {
        unit: UnitRecord,
        trailer: Vec<u8>,
    },
    /// Embark/disembark in progress: the game recreates the unit, so the
    /// record it replaced is kept alongside it.
    Transition {
        unit: UnitRecord,
        previous: UnitRecord,
        trailer: Vec<u8>,
    },
}

impl TileUnit {
    pub fn unit(&self) -> &UnitRecord {
        match self {
            TileUnit::Single { unit, .. } | TileUnit::Transition { unit, .. } => unit,
        }
    }

    pub fn previous(&self) -> Option<&UnitRecord> {
        match self {
            TileUnit::Transition { previous, .. } => Some(previous),
            TileUnit::Single { .. } => None,
        }
    }

    pub fn trailer(&self) -> &[u8] {
        match self {
            TileUnit::Single { trailer, .. } | TileUnit::Transition { trailer, .. } => trailer,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitRecord {
    pub id: u32,
    pub owner: u8,
    pub unit_type: u16,
    pub reserved: [u8; 8],
    pub coordinates: (i32, i32),
    pub home_coordinates: (i32, i32),
    /// Stored as ten times the in-game value
    pub health: u16,
    pub promotion_level: u16,
    pub experience: u16,
    pub moved: bool,
    pub attacked: bool,
    pub flipped: bool,
    pub created_turn: u16,
}

impl UnitRecord {
    pub fn health_points(&self) -> f32 {
        self.health as f32 / 10.0
    }
}

/// Row-major grid of tiles
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileGrid {
    width: usize,
    height: usize,
    tiles: Vec<TileRecord>,
}

impl TileGrid {
    pub(crate) fn from_rows(width: usize, height: usize, tiles: Vec<TileRecord>) -> Self {
        debug_assert_eq!(tiles.len(), width * height);
        Self { width, height, tiles }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, x: usize, y: usize) -> Option<&TileRecord> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.tiles.get(y * self.width + x)
    }

    pub fn get_mut(&mut self, x: usize, y: usize) -> Option<&mut TileRecord> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.tiles.get_mut(y * self.width + x)
    }

    pub fn tiles(&self) -> &[TileRecord] {
        &self.tiles
    }

    pub fn rows(&self) -> impl Iterator<Item = &[TileRecord]> {
        // chunks() rejects a zero size
        self.tiles.chunks(self.width.max(1))
    }

    pub fn units(&self) -> impl Iterator<Item = &UnitRecord> {
        self.tiles.iter().filter_map(TileRecord::unit)
    }

    /// Group tile positions by the capital coordinates they point at
    pub fn city_territories(&self) -> BTreeMap<(i32, i32), Vec<(u32, u32)>> {
        let mut territories: BTreeMap<(i32, i32), Vec<(u32, u32)>> = BTreeMap::new();
        for tile in &self.tiles {
            territories
                .entry(tile.capital_coordinates)
                .or_default()
                .push((tile.x, tile.y));
        }
        territories
    }
}
