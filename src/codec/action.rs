use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, trace};

use super::reader::BinaryReader;
use crate::error::{Error, Result};
use crate::state::player::PlayerId;

/// End-turn actions from this player id mark the start of a new game turn
pub const TURN_SENTINEL_PLAYER: PlayerId = 255;

/// Replay action type tags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u16)]
pub enum ActionType {
    Build = 1,
    Attack = 2,
    Recover = 3,
    Unknown4 = 4,
    Train = 5,
    Move = 6,
    CaptureCity = 7,
    Research = 8,
    DestroyImprovement = 9,
    CityReward = 11,
    Promote = 13,
    ExamineRuins = 14,
    EndTurn = 15,
    Upgrade = 16,
    Unknown17 = 17,
    Unknown18 = 18,
    Unknown20 = 20,
    CityLevelUp = 21,
    Unknown24 = 24,
    Unknown25 = 25,
    Unknown27 = 27,
    Unknown28 = 28,
    Unknown29 = 29,
    Unknown30 = 30,
}

impl ActionType {
    pub fn from_u16(v: u16) -> Option<Self> {
        let action_type = match v {
            1 => Self::Build,
            2 => Self::Attack,
            3 => Self::Recover,
            4 => Self::Unknown4,
            5 => Self::Train,
            6 => Self::Move,
            7 => Self::CaptureCity,
            8 => Self::Research,
            9 => Self::DestroyImprovement,
            11 => Self::CityReward,
            13 => Self::Promote,
            14 => Self::ExamineRuins,
            15 => Self::EndTurn,
            16 => Self::Upgrade,
            17 => Self::Unknown17,
            18 => Self::Unknown18,
            20 => Self::Unknown20,
            21 => Self::CityLevelUp,
            24 => Self::Unknown24,
            25 => Self::Unknown25,
            27 => Self::Unknown27,
            28 => Self::Unknown28,
            29 => Self::Unknown29,
            30 => Self::Unknown30,
            _ => return None,
        };
        Some(action_type)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CaptureCity {
    pub player: PlayerId,
    pub unit_id: u32,
    pub coordinates: (u32, u32),
}

/// One decoded replay action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ActionRecord {
    Build { player: PlayerId, improvement_type: u16, coordinates: (u32, u32) },
    Attack { player: PlayerId, unit_id: u32, origin: (u32, u32), target: (u32, u32) },
    Recover { player: PlayerId, coordinates: (u32, u32) },
    Train { player: PlayerId, unit_type: u16, coordinates: (u32, u32) },
    Move { player: PlayerId, from: (u32, u32), to: (u32, u32), unit_id: u32 },
    CaptureCity(CaptureCity),
    Research { player: PlayerId, tech_type: u16 },
    DestroyImprovement { player: PlayerId, coordinates: (u32, u32) },
    CityReward { player: PlayerId, coordinates: (u32, u32), reward: u16 },
    Promote { player: PlayerId, coordinates: (u32, u32) },
    ExamineRuins { player: PlayerId, coordinates: (u32, u32) },
    EndTurn { player: PlayerId },
    Upgrade { player: PlayerId, unit_type: u16, coordinates: (u32, u32) },
    CityLevelUp { player: PlayerId, coordinates: (u32, u32) },
    Opaque { action_type: ActionType, payload: Vec<u8> },
}

impl ActionRecord {
    /// Read one tagged action. `index` is only used for error reporting.
    pub fn read(reader: &mut BinaryReader, index: usize) -> Result<Self> {
        let offset = reader.position();
        let tag = reader.read_u16_le()?;
        let action_type = ActionType::from_u16(tag).ok_or(Error::UnknownActionType { tag, index, offset })?;

        let action = match action_type {
            ActionType::Build => Self::Build {
                player: reader.read_u8()?,
                improvement_type: reader.read_u16_le()?,
                coordinates: reader.read_coords_u32()?,
            },
            ActionType::Attack => Self::Attack {
                player: reader.read_u8()?,
                unit_id: reader.read_u32_le()?,
                origin: reader.read_coords_u32()?,
                target: reader.read_coords_u32()?,
            },
            ActionType::Recover => Self::Recover { player: reader.read_u8()?, coordinates: reader.read_coords_u32()? },
            ActionType::Train => Self::Train {
                player: reader.read_u8()?,
                unit_type: reader.read_u16_le()?,
                coordinates: reader.read_coords_u32()?,
            },
            ActionType::Move => Self::Move {
                player: reader.read_u8()?,
                from: reader.read_coords_u32()?,
                to: reader.read_coords_u32()?,
                unit_id: reader.read_u32_le()?,
            },
            ActionType::CaptureCity => Self::CaptureCity(CaptureCity {
                player: reader.read_u8()?,
                unit_id: reader.read_u32_le()?,
                coordinates: reader.read_coords_u32()?,
            }),
            ActionType::Research => Self::Research { player: reader.read_u8()?, tech_type: reader.read_u16_le()? },
            ActionType::DestroyImprovement => {
                Self::DestroyImprovement { player: reader.read_u8()?, coordinates: reader.read_coords_u32()? }
            }
            ActionType::CityReward => Self::CityReward {
                player: reader.read_u8()?,
                coordinates: reader.read_coords_u32()?,
                reward: reader.read_u16_le()?,
            },
            ActionType::Promote => Self::Promote { player: reader.read_u8()?, coordinates: reader.read_coords_u32()? },
            ActionType::ExamineRuins => Self::ExamineRuins { player: reader.read_u8()?, coordinates: reader.read_coords_u32()? },
            ActionType::EndTurn => Self::EndTurn { player: reader.read_u8()? },
            ActionType::Upgrade => Self::Upgrade {
                player: reader.read_u8()?,
                unit_type: reader.read_u16_le()?,
                coordinates: reader.read_coords_u32()?,
            },
            ActionType::CityLevelUp => Self::CityLevelUp { player: reader.read_u8()?, coordinates: reader.read_coords_u32()? },
            // Fields of these kinds are not understood yet, only their widths
            ActionType::Unknown4
            | ActionType::Unknown17
            | ActionType::Unknown18
            | ActionType::Unknown24
            | ActionType::Unknown25 => Self::read_opaque(reader, action_type, 9)?,
            ActionType::Unknown20 => Self::read_opaque(reader, action_type, 1)?,
            ActionType::Unknown27 | ActionType::Unknown29 | ActionType::Unknown30 => {
                Self::read_opaque(reader, action_type, 10)?
            }
            ActionType::Unknown28 => Self::read_opaque(reader, action_type, 3)?,
        };
        Ok(action)
    }

    fn read_opaque(reader: &mut BinaryReader, action_type: ActionType, len: usize) -> Result<Self> {
        Ok(Self::Opaque { action_type, payload: reader.read_vec(len)? })
    }

    pub fn action_type(&self) -> ActionType {
        match self {
            Self::Build { .. } => ActionType::Build,
            Self::Attack { .. } => ActionType::Attack,
            Self::Recover { .. } => ActionType::Recover,
            Self::Train { .. } => ActionType::Train,
            Self::Move { .. } => ActionType::Move,
            Self::CaptureCity(_) => ActionType::CaptureCity,
            Self::Research { .. } => ActionType::Research,
            Self::DestroyImprovement { .. } => ActionType::DestroyImprovement,
            Self::CityReward { .. } => ActionType::CityReward,
            Self::Promote { .. } => ActionType::Promote,
            Self::ExamineRuins { .. } => ActionType::ExamineRuins,
            Self::EndTurn { .. } => ActionType::EndTurn,
            Self::Upgrade { .. } => ActionType::Upgrade,
            Self::CityLevelUp { .. } => ActionType::CityLevelUp,
            Self::Opaque { action_type, .. } => *action_type,
        }
    }

    /// Acting player, when the action kind is understood
    pub fn player(&self) -> Option<PlayerId> {
        match self {
            Self::Build { player, .. }
            | Self::Attack { player, .. }
            | Self::Recover { player, .. }
            | Self::Train { player, .. }
            | Self::Move { player, .. }
            | Self::Research { player, .. }
            | Self::DestroyImprovement { player, .. }
            | Self::CityReward { player, .. }
            | Self::Promote { player, .. }
            | Self::ExamineRuins { player, .. }
            | Self::EndTurn { player }
            | Self::Upgrade { player, .. }
            | Self::CityLevelUp { player, .. } => Some(*player),
            Self::CaptureCity(capture) => Some(capture.player),
            Self::Opaque { .. } => None,
        }
    }
}

/// City captures grouped by the turn they happened on
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TurnCaptureIndex(BTreeMap<u32, Vec<CaptureCity>>);

impl TurnCaptureIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, turn: u32, capture: CaptureCity) {
        self.0.entry(turn).or_default().push(capture);
    }

    pub fn captures_on(&self, turn: u32) -> &[CaptureCity] {
        self.0.get(&turn).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn turns(&self) -> impl Iterator<Item = u32> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &[CaptureCity])> {
        self.0.iter().map(|(turn, captures)| (*turn, captures.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Turn counter and capture index built up while walking the action log
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnTracker {
    turn: u32,
    captures: TurnCaptureIndex,
}

impl Default for TurnTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnTracker {
    pub fn new() -> Self {
        Self { turn: 1, captures: TurnCaptureIndex::new() }
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn observe(&mut self, action: &ActionRecord) {
        match action {
            ActionRecord::EndTurn { player } if *player == TURN_SENTINEL_PLAYER => {
                self.turn += 1;
                trace!(turn = self.turn, "new turn");
            }
            ActionRecord::CaptureCity(capture) => self.captures.record(self.turn, *capture),
            _ => {}
        }
    }

    pub fn finish(self) -> (u32, TurnCaptureIndex) {
        (self.turn, self.captures)
    }
}

/// Decoded replay stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionLog {
    pub actions: Vec<ActionRecord>,
    /// Turn counter value after the last action
    pub final_turn: u32,
    pub captures: TurnCaptureIndex,
}

pub fn read_action_log(reader: &mut BinaryReader) -> Result<ActionLog> {
    let start = reader.position();
    let count = reader.read_u16_le()? as usize;
    let mut actions = Vec::with_capacity(count);
    let mut tracker = TurnTracker::new();

    for index in 0..count {
        let action = ActionRecord::read(reader, index)?;
        trace!(index, turn = tracker.turn(), ?action, "action");
        tracker.observe(&action);
        actions.push(action);
    }

    let (final_turn, captures) = tracker.finish();
    debug!(offset = start, count, final_turn, captures = captures.len(), "read action log");
    Ok(ActionLog { actions, final_turn, captures })
}
