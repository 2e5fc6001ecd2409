use tracing::{debug, trace};

use super::reader::BinaryReader;
use super::schema::Layout;
use crate::error::{Error, Result};
use crate::state::tile::{
    Improvement, ImprovementRecord, Rebellion, TileGrid, TileRecord, TileUnit, UnitRecord,
    CITY_IMPROVEMENT,
};

/// Smallest possible tile: fixed header, three presence flags, the
/// visibility length, both route flags and the narrowest trailer
const MIN_TILE_BYTES: usize = 34;

/// Decode a `width` x `height` grid of tiles in row-major order
pub fn read_tile_grid(
    reader: &mut BinaryReader,
    layout: &Layout,
    width: usize,
    height: usize,
) -> Result<TileGrid> {
    let start = reader.position();
    let count = width.saturating_mul(height);
    let mut tiles = Vec::with_capacity(count.min(reader.remaining() / MIN_TILE_BYTES));
    for row in 0..height {
        for column in 0..width {
            tiles.push(read_tile(reader, layout, row, column)?);
        }
    }

    let grid = TileGrid::from_rows(width, height, tiles);
    debug!(
        offset = start,
        bytes = reader.position() - start,
        units = grid.units().count(),
        "read {}x{} tile grid",
        width,
        height
    );
    Ok(grid)
}

fn read_tile(reader: &mut BinaryReader, layout: &Layout, row: usize, column: usize) -> Result<TileRecord> {
    let offset = reader.position();
    let (x, y) = reader.read_coords_u32()?;
    // A mismatch here means an earlier record consumed the wrong number of bytes
    if x as usize != column || y as usize != row {
        return Err(Error::CoordinateMismatch { row, column, found_x: x, found_y: y });
    }

    let terrain = reader.read_u16_le()?;
    let climate = reader.read_u16_le()?;
    let altitude = reader.read_i16_le()?;
    let owner = reader.read_u8()?;
    let capital = reader.read_u8()?;
    let capital_coordinates = reader.read_coords_i32()?;

    let resource = if reader.read_flag("resource")? {
        Some(reader.read_u16_le()?)
    } else {
        None
    };

    let improvement_code = if reader.read_flag("improvement")? {
        Some(reader.read_u16_le()?)
    } else {
        None
    };
    let improvement = match improvement_code {
        Some(code) => {
            let record = read_improvement_record(reader)?;
            Some(classify_improvement(owner, resource, code, record))
        }
        None => None,
    };

    let unit = read_tile_unit(reader)?;

    let visibility_len = reader.read_u8()? as usize;
    let player_visibility = reader.read_vec(visibility_len)?;
    let has_road = reader.read_bool()?;
    let has_water_route = reader.read_bool()?;
    let unknown = reader.read_vec(layout.tile_trailer_len)?;

    trace!(offset, x, y, terrain, owner, "tile");

    Ok(TileRecord {
        x,
        y,
        terrain,
        climate,
        altitude,
        owner,
        capital,
        capital_coordinates,
        resource,
        improvement,
        unit,
        player_visibility,
        has_road,
        has_water_route,
        unknown,
    })
}

/// Owned, resource-free city markers are existing cities. Everything else
/// is a generic improvement, except a nameless city marker which is a village.
fn classify_improvement(owner: u8, resource: Option<u16>, code: u16, record: ImprovementRecord) -> Improvement {
    if owner > 0 && resource.is_none() && code == CITY_IMPROVEMENT {
        return Improvement::City(record);
    }
    if code == CITY_IMPROVEMENT && record.name.is_none() {
        return Improvement::Village(record);
    }
    Improvement::Structure { code, record }
}

fn read_improvement_record(reader: &mut BinaryReader) -> Result<ImprovementRecord> {
    let level = reader.read_u16_le()?;
    let founded_turn = reader.read_u16_le()?;
    let current_population = reader.read_i16_le()?;
    let total_population = reader.read_u16_le()?;
    let production = reader.read_u16_le()?;
    let base_score = reader.read_u16_le()?;
    let border_size = reader.read_u16_le()?;
    let upgrade_count = reader.read_i16_le()?;
    let connected_player_capital = reader.read_u8()?;
    let name = if reader.read_flag("city name")? {
        Some(reader.read_string()?)
    } else {
        None
    };
    let founded_tribe = reader.read_u8()?;
    let rewards = reader.read_u16_list()?;

    let rebellion_flag = reader.read_u16_le()?;
    let rebellion = if rebellion_flag != 0 {
        Some(Rebellion { flag: rebellion_flag, data: reader.read_array()? })
    } else {
        None
    };

    Ok(ImprovementRecord {
        level,
        founded_turn,
        current_population,
        total_population,
        production,
        base_score,
        border_size,
        upgrade_count,
        connected_player_capital,
        name,
        founded_tribe,
        rewards,
        rebellion,
    })
}

pub(crate) fn read_unit_record(reader: &mut BinaryReader) -> Result<UnitRecord> {
    Ok(UnitRecord {
        id: reader.read_u32_le()?,
        owner: reader.read_u8()?,
        unit_type: reader.read_u16_le()?,
        reserved: reader.read_array()?,
        coordinates: reader.read_coords_i32()?,
        home_coordinates: reader.read_coords_i32()?,
        health: reader.read_u16_le()?,
        promotion_level: reader.read_u16_le()?,
        experience: reader.read_u16_le()?,
        moved: reader.read_bool()?,
        attacked: reader.read_bool()?,
        flipped: reader.read_bool()?,
        created_turn: reader.read_u16_le()?,
    })
}

fn read_tile_unit(reader: &mut BinaryReader) -> Result<Option<TileUnit>> {
    if !reader.read_flag("unit")? {
        return Ok(None);
    }
    let unit = read_unit_record(reader)?;

    if reader.read_flag("transition unit")? {
        let previous = read_unit_record(reader)?;
        reader.expect_zero("transition marker")?;

        let first = reader.read_vec(7)?;
        let extended = first[0] == 1;
        let mut trailer = first;
        trailer.extend_from_slice(reader.read_bytes(7)?);
        if extended {
            trailer.extend_from_slice(reader.read_bytes(4)?);
        }
        return Ok(Some(TileUnit::Transition { unit, previous, trailer }));
    }

    let trailer_len = if reader.read_u8()? == 1 { 8 } else { 6 };
    let trailer = reader.read_vec(trailer_len)?;
    Ok(Some(TileUnit::Single { unit, trailer }))
}
