/// Broad class of a decode failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Framing,
    Bounds,
    Structural,
    UnknownTag,
    Unsupported,
    Io,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("frame too short: {len} bytes")]
    FrameTooShort { len: usize },

    #[error("invalid frame size class: {size_class}")]
    InvalidSizeClass { size_class: u8 },

    #[error("block decompression failed: {0}")]
    Decompression(String),

    #[error("decompressed length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("unexpected end of data at offset {offset}: need {need} bytes, have {have}")]
    UnexpectedEof { offset: usize, need: usize, have: usize },

    #[error("tile at row {row}, column {column} carries coordinates ({found_x}, {found_y})")]
    CoordinateMismatch { row: usize, column: usize, found_x: u32, found_y: u32 },

    #[error("duplicate player id {id} (already mapped to tribe {tribe})")]
    DuplicatePlayerId { id: u8, tribe: u16 },

    #[error("expected zero for {field} at offset {offset}, got {value}")]
    ExpectedZero { offset: usize, field: &'static str, value: u8 },

    #[error("invalid {field} flag at offset {offset}: {value}")]
    InvalidFlag { offset: usize, field: &'static str, value: u8 },

    #[error("replay ended on turn {replay} but header reports turn {header}")]
    TurnMismatch { header: u32, replay: u32 },

    #[error("unknown action type {tag} (action #{index}, offset {offset})")]
    UnknownActionType { tag: u16, index: usize, offset: usize },

    #[error("unknown task type {task_type} for player {player}")]
    UnknownTaskType { task_type: i16, player: u8 },

    #[error("unsupported save version: {version}")]
    UnsupportedVersion { version: u32 },

    #[error("io error: {0}")]
    Io(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::FrameTooShort { .. }
            | Error::InvalidSizeClass { .. }
            | Error::Decompression(_)
            | Error::LengthMismatch { .. } => ErrorKind::Framing,
            Error::UnexpectedEof { .. } => ErrorKind::Bounds,
            Error::CoordinateMismatch { .. }
            | Error::DuplicatePlayerId { .. }
            | Error::ExpectedZero { .. }
            | Error::InvalidFlag { .. }
            | Error::TurnMismatch { .. } => ErrorKind::Structural,
            Error::UnknownActionType { .. } | Error::UnknownTaskType { .. } => ErrorKind::UnknownTag,
            Error::UnsupportedVersion { .. } => ErrorKind::Unsupported,
            Error::Io(_) => ErrorKind::Io,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
