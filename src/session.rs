use crate::engine::BodyHandle;

pub const BOARD_WIDTH: u32 = 900;
pub const BOARD_HEIGHT: u32 = 1000;
pub const STARTING_DISKS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardSize {
    pub width: u32,
    pub height: u32,
}

impl Default for BoardSize {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
        }
    }
}

/// Mutable state of one game in progress. Each player gets their own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    pub board: BoardSize,
    /// A dropped disk is still moving through the pegs.
    pub disk_is_active: bool,
    pub score: u32,
    pub remaining_disks: u32,
    /// Disk following the cursor before it is dropped.
    pub hover_disk: Option<BodyHandle>,
}

impl GameSession {
    pub fn new() -> Self {
        Self::with_board(BoardSize::default())
    }

    pub fn with_board(board: BoardSize) -> Self {
        Self {
            board,
            disk_is_active: false,
            score: 0,
            remaining_disks: STARTING_DISKS,
            hover_disk: None,
        }
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}
