use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Save layout generation, selected from the header's version stamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Generation {
    Legacy,
    Standard,
    Extended,
}

impl Generation {
    pub const ALL: [Generation; 3] = [Generation::Legacy, Generation::Standard, Generation::Extended];

    /// Version stamps assigned to each layout. The boundaries are inferred
    /// rather than documented by the format; use a forced generation for
    /// stamps outside them.
    pub fn versions(self) -> RangeInclusive<u32> {
        match self {
            Generation::Legacy => 74..=89,
            Generation::Standard => 90..=104,
            Generation::Extended => 105..=114,
        }
    }

    pub fn from_version(version: u32) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|g| g.versions().contains(&version))
            .ok_or(Error::UnsupportedVersion { version })
    }

    pub fn layout(self) -> Layout {
        match self {
            Generation::Legacy => Layout {
                generation: self,
                header_has_unit_counter: false,
                header_reserved_len: 11,
                unlocked_tribes_overcounted: false,
                tile_trailer_len: 4,
                player_has_color_override: false,
                player_trailer_len: 14,
                initial_divider_len: 3,
                current_divider_len: 2,
            },
            Generation::Standard => Layout {
                generation: self,
                header_has_unit_counter: true,
                header_reserved_len: 11,
                unlocked_tribes_overcounted: false,
                tile_trailer_len: 4,
                player_has_color_override: true,
                player_trailer_len: 14,
                initial_divider_len: 3,
                current_divider_len: 2,
            },
            Generation::Extended => Layout {
                generation: self,
                header_has_unit_counter: true,
                header_reserved_len: 11,
                unlocked_tribes_overcounted: true,
                tile_trailer_len: 6,
                player_has_color_override: true,
                player_trailer_len: 14,
                initial_divider_len: 3,
                current_divider_len: 2,
            },
        }
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Generation::Legacy => "legacy",
            Generation::Standard => "standard",
            Generation::Extended => "extended",
        };
        f.write_str(name)
    }
}

impl FromStr for Generation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "legacy" => Ok(Generation::Legacy),
            "standard" => Ok(Generation::Standard),
            "extended" => Ok(Generation::Extended),
            other => Err(format!("unknown generation: {other}")),
        }
    }
}

/// Field widths and presence rules that differ between generations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub generation: Generation,
    /// Header carries the max unit id and a spare byte after the current player
    pub header_has_unit_counter: bool,
    pub header_reserved_len: usize,
    /// Unlocked tribe count is one more than the entries that follow it
    pub unlocked_tribes_overcounted: bool,
    pub tile_trailer_len: usize,
    pub player_has_color_override: bool,
    pub player_trailer_len: usize,
    /// Bytes between the initial-state roster and the current-state header
    pub initial_divider_len: usize,
    /// Bytes between the current-state roster and the action log
    pub current_divider_len: usize,
}

impl Layout {
    /// Number of unlocked tribe entries that follow a declared count
    pub fn unlocked_tribe_entries(&self, declared: u16) -> usize {
        if self.unlocked_tribes_overcounted {
            declared.saturating_sub(1) as usize
        } else {
            declared as usize
        }
    }
}
