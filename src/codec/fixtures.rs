//! Synthetic save builders shared by the codec tests

use super::player::task_payload_len;
use super::schema::Generation;
use super::writer::BinaryWriter;
use super::schema::Layout;

pub struct HeaderFixture {
    pub generation: Generation,
    pub version: u32,
    pub current_turn: u32,
    pub max_unit_id: u32,
    pub map_name: String,
    pub disabled: Vec<u16>,
    pub unlocked: Vec<u16>,
    pub skins: Vec<(u16, u16)>,
    pub width: u16,
    pub height: u16,
    pub zero_dimensions_first: bool,
}

impl HeaderFixture {
    pub fn new(generation: Generation, width: u16, height: u16) -> Self {
        Self {
            generation,
            version: *generation.versions().start(),
            current_turn: 1,
            max_unit_id: 50,
            map_name: String::new(),
            disabled: Vec::new(),
            unlocked: Vec::new(),
            skins: Vec::new(),
            width,
            height,
            zero_dimensions_first: false,
        }
    }

    pub fn write(&self, w: &mut BinaryWriter) {
        let layout = self.generation.layout();
        w.write_u32_le(self.version);
        w.write_u32_le(self.version);
        w.write_u16_le(0);
        w.write_u32_le(self.current_turn);
        w.write_u8(0);
        if layout.header_has_unit_counter {
            w.write_u32_le(self.max_unit_id);
            w.write_u8(0);
        }
        w.write_u32_le(1234);
        w.write_u32_le(30);
        w.write_zeros(layout.header_reserved_len);
        w.write_u8(1);
        w.write_u8(0);

        w.write_string(&self.map_name);
        w.write_u32_le(self.width as u32);

        w.write_u16_le(self.disabled.len() as u16);
        for tribe in &self.disabled {
            w.write_u16_le(*tribe);
        }
        let declared = if layout.unlocked_tribes_overcounted {
            self.unlocked.len() + 1
        } else {
            self.unlocked.len()
        };
        w.write_u16_le(declared as u16);
        for tribe in &self.unlocked {
            w.write_u16_le(*tribe);
        }

        w.write_u16_le(1);
        w.write_u32_le(1);
        w.write_zeros(5 + declared);

        w.write_u32_le(self.skins.len() as u32);
        for (tribe, skin) in &self.skins {
            w.write_u16_le(*tribe);
            w.write_u16_le(*skin);
        }

        if self.zero_dimensions_first {
            w.write_u16_le(0);
            w.write_u16_le(0);
        }
        w.write_u16_le(self.width);
        w.write_u16_le(self.height);
    }
}

pub struct ImprovementFixture {
    pub name: Option<String>,
    pub rewards: Vec<u16>,
    pub rebellion: Option<(u16, [u8; 2])>,
}

impl ImprovementFixture {
    pub fn named(name: &str) -> Self {
        Self { name: Some(name.into()), rewards: vec![3, 8], rebellion: None }
    }

    pub fn unnamed() -> Self {
        Self { name: None, rewards: Vec::new(), rebellion: None }
    }

    fn write(&self, w: &mut BinaryWriter) {
        w.write_u16_le(1);
        w.write_u16_le(0);
        w.write_i16_le(0);
        w.write_u16_le(0);
        w.write_u16_le(1);
        w.write_u16_le(0);
        w.write_u16_le(1);
        w.write_i16_le(0);
        w.write_u8(0);
        match &self.name {
            Some(name) => {
                w.write_u8(1);
                w.write_string(name);
            }
            None => w.write_u8(0),
        }
        w.write_u8(0);
        w.write_u16_le(self.rewards.len() as u16);
        for reward in &self.rewards {
            w.write_u16_le(*reward);
        }
        match self.rebellion {
            Some((flag, data)) => {
                w.write_u16_le(flag);
                w.write_bytes(&data);
            }
            None => w.write_u16_le(0),
        }
    }
}

pub enum UnitFixture {
    None,
    Single { id: u32, long_trailer: bool },
    Transition { id: u32, previous_id: u32, extended: bool, marker: u8 },
}

fn write_unit_record(w: &mut BinaryWriter, id: u32) {
    w.write_u32_le(id);
    w.write_u8(1);
    w.write_u16_le(2);
    w.write_zeros(8);
    w.write_i32_le(0);
    w.write_i32_le(0);
    w.write_i32_le(0);
    w.write_i32_le(0);
    w.write_u16_le(100);
    w.write_u16_le(0);
    w.write_u16_le(0);
    w.write_bool(false);
    w.write_bool(false);
    w.write_bool(false);
    w.write_u16_le(1);
}

impl UnitFixture {
    fn write(&self, w: &mut BinaryWriter) {
        match *self {
            UnitFixture::None => w.write_u8(0),
            UnitFixture::Single { id, long_trailer } => {
                w.write_u8(1);
                write_unit_record(w, id);
                w.write_u8(0);
                w.write_bool(long_trailer);
                w.write_zeros(if long_trailer { 8 } else { 6 });
            }
            UnitFixture::Transition { id, previous_id, extended, marker } => {
                w.write_u8(1);
                write_unit_record(w, id);
                w.write_u8(1);
                write_unit_record(w, previous_id);
                w.write_u8(marker);
                w.write_bool(extended);
                w.write_zeros(6);
                w.write_zeros(7);
                if extended {
                    w.write_zeros(4);
                }
            }
        }
    }
}

pub struct TileFixture {
    pub x: u32,
    pub y: u32,
    pub owner: u8,
    pub capital_coordinates: (i32, i32),
    pub resource: Option<u16>,
    pub improvement: Option<(u16, ImprovementFixture)>,
    pub unit: UnitFixture,
    pub visibility: Vec<u8>,
    pub has_road: bool,
}

impl TileFixture {
    pub fn plain(x: u32, y: u32) -> Self {
        Self {
            x,
            y,
            owner: 0,
            capital_coordinates: (x as i32, y as i32),
            resource: None,
            improvement: None,
            unit: UnitFixture::None,
            visibility: Vec::new(),
            has_road: false,
        }
    }

    pub fn write_header(&self, w: &mut BinaryWriter) {
        w.write_u32_le(self.x);
        w.write_u32_le(self.y);
        w.write_u16_le(1);
        w.write_u16_le(1);
        w.write_i16_le(1);
        w.write_u8(self.owner);
        w.write_u8(0);
        w.write_i32_le(self.capital_coordinates.0);
        w.write_i32_le(self.capital_coordinates.1);
    }

    pub fn write(&self, w: &mut BinaryWriter, layout: &Layout) {
        self.write_header(w);
        match self.resource {
            Some(resource) => {
                w.write_u8(1);
                w.write_u16_le(resource);
            }
            None => w.write_u8(0),
        }
        match &self.improvement {
            Some((code, record)) => {
                w.write_u8(1);
                w.write_u16_le(*code);
                record.write(w);
            }
            None => w.write_u8(0),
        }
        self.unit.write(w);
        w.write_u8(self.visibility.len() as u8);
        w.write_bytes(&self.visibility);
        w.write_bool(self.has_road);
        w.write_bool(false);
        w.write_zeros(layout.tile_trailer_len);
    }
}

pub struct PlayerFixture {
    pub id: u8,
    pub tribe: u16,
    pub name: String,
    pub technologies: Vec<u16>,
    pub encountered: Vec<u8>,
    pub tasks: Vec<i16>,
    pub diplomacy: Vec<u8>,
    pub messages: Vec<(u8, u8)>,
    pub destroyed: Option<(u8, u32)>,
}

impl PlayerFixture {
    pub fn new(id: u8, tribe: u16) -> Self {
        Self {
            id,
            tribe,
            name: format!("Player {id}"),
            technologies: Vec::new(),
            encountered: Vec::new(),
            tasks: Vec::new(),
            diplomacy: Vec::new(),
            messages: Vec::new(),
            destroyed: None,
        }
    }

    pub fn write(&self, w: &mut BinaryWriter, layout: &Layout) {
        w.write_u8(self.id);
        w.write_string(&self.name);
        w.write_string(&format!("acct-{}", self.id));
        w.write_bool(false);
        w.write_i32_le(0);
        w.write_i32_le(0);
        w.write_u16_le(self.tribe);
        w.write_u8(0);
        w.write_u32_le(0);
        w.write_u16_le(1);
        w.write_bytes(&[1, 2, 3, 4, 5]);

        w.write_u32_le(5);
        w.write_u32_le(0);
        w.write_u32_le(0);
        w.write_u16_le(1);

        w.write_u16_le(self.technologies.len() as u16);
        for tech in &self.technologies {
            w.write_u16_le(*tech);
        }
        w.write_u16_le(self.encountered.len() as u16);
        w.write_bytes(&self.encountered);

        w.write_i16_le(self.tasks.len() as i16);
        for task in &self.tasks {
            w.write_i16_le(*task);
            w.write_zeros(task_payload_len(*task).unwrap_or(2));
        }

        w.write_i32_le(0);
        w.write_i32_le(0);
        w.write_i32_le(0);
        if layout.player_has_color_override {
            w.write_bytes(&[0xAA, 0xBB, 0xCC, 0xFF]);
        }
        w.write_u8(0);

        w.write_u16_le(0);

        w.write_u16_le(self.diplomacy.len() as u16);
        for other in &self.diplomacy {
            w.write_u8(*other);
            w.write_u8(0);
            w.write_i32_le(-1);
            w.write_u8(0);
            w.write_i32_le(-1);
            w.write_i32_le(3);
            w.write_i32_le(-1);
            w.write_i32_le(-1);
        }

        w.write_u16_le(self.messages.len() as u16);
        for (message_type, sender) in &self.messages {
            w.write_u8(*message_type);
            w.write_u8(*sender);
        }

        let (destroyed_by, destroyed_turn) = self.destroyed.unwrap_or((0, 0));
        w.write_u8(destroyed_by);
        w.write_u32_le(destroyed_turn);
        w.write_zeros(layout.player_trailer_len);
    }
}

pub fn write_capture(w: &mut BinaryWriter, player: u8, unit_id: u32, coordinates: (u32, u32)) {
    w.write_u16_le(7);
    w.write_u8(player);
    w.write_u32_le(unit_id);
    w.write_u32_le(coordinates.0);
    w.write_u32_le(coordinates.1);
}

pub fn write_end_turn(w: &mut BinaryWriter, player: u8) {
    w.write_u16_le(15);
    w.write_u8(player);
}

/// A whole decompressed save: two plain grids, matching rosters, and
/// whatever action log bytes the test supplies.
pub struct SaveFixture {
    pub generation: Generation,
    pub width: u16,
    pub height: u16,
    pub players: Vec<(u8, u16)>,
    pub current_turn: u32,
    pub current_version: Option<u32>,
    pub actions: Vec<u8>,
}

impl SaveFixture {
    pub fn new(generation: Generation, width: u16, height: u16) -> Self {
        Self {
            generation,
            width,
            height,
            players: vec![(1, 2)],
            current_turn: 1,
            current_version: None,
            actions: vec![0, 0],
        }
    }

    fn write_state(&self, w: &mut BinaryWriter, header: &HeaderFixture) {
        let layout = self.generation.layout();
        header.write(w);
        for y in 0..self.height as u32 {
            for x in 0..self.width as u32 {
                TileFixture::plain(x, y).write(w, &layout);
            }
        }
        w.write_u16_le(self.players.len() as u16);
        for &(id, tribe) in &self.players {
            PlayerFixture::new(id, tribe).write(w, &layout);
        }
    }

    pub fn build(&self) -> Vec<u8> {
        let layout = self.generation.layout();
        let mut w = BinaryWriter::new();

        let initial = HeaderFixture::new(self.generation, self.width, self.height);
        self.write_state(&mut w, &initial);
        w.write_zeros(layout.initial_divider_len);

        let mut current = HeaderFixture::new(self.generation, self.width, self.height);
        current.current_turn = self.current_turn;
        if let Some(version) = self.current_version {
            current.version = version;
        }
        self.write_state(&mut w, &current);
        w.write_zeros(layout.current_divider_len);

        w.write_bytes(&self.actions);
        w.into_vec()
    }
}

/// Wrap `data` in a save frame using the given size class (2 or 3)
pub fn frame_with_class(data: &[u8], size_class: u8) -> Vec<u8> {
    let compressed = lz4_flex::block::compress(data);
    assert!(compressed.len() <= data.len(), "fixture does not compress");
    let delta = (data.len() - compressed.len()) as u32;

    let mut w = BinaryWriter::new();
    w.write_u8(size_class << 6);
    match size_class {
        2 => w.write_u16_le(u16::try_from(delta).expect("delta fits in u16")),
        _ => w.write_u32_le(delta),
    }
    w.write_bytes(&compressed);
    w.into_vec()
}

pub fn frame(data: &[u8]) -> Vec<u8> {
    frame_with_class(data, 3)
}
