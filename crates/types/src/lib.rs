//! Core types module - shared vocabulary and constants
//!
//! This crate defines the fundamental types used by the board model, the simulation
//! engine and any caller driving it (replay runner, network layer, UI). Everything here
//! is plain data with string helpers for callers that address values by name.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9, left to right)
//! - **Height**: 20 rows (indexed 0-19, row 0 is the top)
//! - **Spawn position**: shape box origin at (3, 0), which puts 3-wide pieces' pivot on column 4
//!
//! # Scoring Tables
//!
//! | Lines | Plain | T-spin | T-spin mini | Perfect clear bonus |
//! |-------|-------|--------|-------------|---------------------|
//! | 0 | 0 | 400 | 100 | - |
//! | 1 | 100 | 800 | 200 | 800 |
//! | 2 | 300 | 1200 | 400 | 1200 |
//! | 3 | 500 | 1600 | 400 | 1800 |
//! | 4 | 800 | - | - | 2000 |
//!
//! Totals are multiplied by the current level (1-15).
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{GameCommand, ItemKind, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! // Parse from string (case-insensitive)
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//!
//! // Rotate
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//!
//! // Commands use the SCREAMING_SNAKE vocabulary but parse leniently
//! assert_eq!(GameCommand::from_str("MOVE_LEFT"), Some(GameCommand::MoveLeft));
//! assert_eq!(GameCommand::from_str("hardDrop"), Some(GameCommand::HardDrop));
//!
//! assert_eq!(ItemKind::from_str("bomb"), Some(ItemKind::Bomb));
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: u8 = 10;

/// Board height in cells (20 rows)
pub const BOARD_HEIGHT: u8 = 20;

/// Shape box origin column used when spawning any piece
pub const SPAWN_X: i8 = (BOARD_WIDTH / 2) as i8 - 2;

/// Shape box origin row used when spawning any piece
pub const SPAWN_Y: i8 = 0;

/// Number of upcoming pieces mirrored into the game state
pub const NEXT_QUEUE_LEN: usize = 6;

/// First level of a match
pub const START_LEVEL: u32 = 1;

/// Level cap
pub const MAX_LEVEL: u32 = 15;

/// Lines needed per level step (`required = level * LINES_PER_LEVEL`)
pub const LINES_PER_LEVEL: u32 = 10;

/// Points per cell for a soft drop
pub const SOFT_DROP_POINTS: u64 = 1;

/// Points per cell for a hard drop
pub const HARD_DROP_POINTS: u64 = 2;

/// Plain line clear base score, indexed by lines cleared
pub const LINE_SCORES: [u64; 5] = [0, 100, 300, 500, 800];

/// Full T-spin base score, indexed by lines cleared
pub const TSPIN_SCORES: [u64; 4] = [400, 800, 1200, 1600];

/// T-spin mini base score, indexed by lines cleared (2+ share the last entry)
pub const TSPIN_MINI_SCORES: [u64; 3] = [100, 200, 400];

/// Perfect clear bonus, indexed by lines cleared
pub const PERFECT_CLEAR_SCORES: [u64; 5] = [0, 800, 1200, 1800, 2000];

/// Combo bonus per combo step (scaled by level)
pub const COMBO_BASE: u64 = 50;

/// Back-to-back bonus numerator (3/2 = 1.5x multiplier)
pub const B2B_NUMERATOR: u64 = 3;

/// Back-to-back bonus denominator
pub const B2B_DENOMINATOR: u64 = 2;

/// Chebyshev radius of the area bomb (5x5 region)
pub const BOMB_RADIUS: i8 = 2;

/// Points per block removed by the area bomb
pub const BOMB_POINTS_PER_BLOCK: u64 = 5;

/// Points per block removed by the cross clear
pub const CROSS_POINTS_PER_BLOCK: u64 = 5;

/// Points per block removed by the marked-row clear
pub const LINE_CLEAR_POINTS_PER_BLOCK: u64 = 10;

/// Points per marked row removed on lock, multiplied by the level
pub const LINE_CLEAR_ROW_POINTS: u64 = 100;

/// Points per block crushed by the falling weight
pub const WEIGHT_POINTS_PER_BLOCK: u64 = 10;

/// Flat score for the speed reset item
pub const SPEED_RESET_POINTS: u64 = 100;

/// Flat score for the bonus score item, the same at every level
pub const BONUS_SCORE_POINTS: u64 = 500;

/// Piece kinds: the seven tetrominoes plus the two item carriers
///
/// - **I**: Cyan, horizontal bar
/// - **O**: Yellow, 2x2 square (never rotates)
/// - **T**: Purple, T-shaped
/// - **S**: Green, S-shaped
/// - **Z**: Red, Z-shaped (mirror of S)
/// - **J**: Blue, J-shaped
/// - **L**: Orange, L-shaped (mirror of J)
/// - **Item**: single block carrying an item with no board anchor semantics
/// - **Weight**: 4-wide bar that crushes whatever lies beneath it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
    Item,
    Weight,
}

impl PieceKind {
    /// The seven standard tetrominoes in canonical bag order
    pub const STANDARD: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("Weight"), Some(PieceKind::Weight));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            "item" => Some(PieceKind::Item),
            "weight" => Some(PieceKind::Weight),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
            PieceKind::Item => "item",
            PieceKind::Weight => "weight",
        }
    }

    /// Whether this is one of the seven bag pieces
    pub fn is_standard(&self) -> bool {
        !matches!(self, PieceKind::Item | PieceKind::Weight)
    }

    /// Color written into the board when this piece locks
    pub fn color(&self) -> BlockColor {
        match self {
            PieceKind::I => BlockColor::Cyan,
            PieceKind::O => BlockColor::Yellow,
            PieceKind::T => BlockColor::Purple,
            PieceKind::S => BlockColor::Green,
            PieceKind::Z => BlockColor::Red,
            PieceKind::J => BlockColor::Blue,
            PieceKind::L => BlockColor::Orange,
            PieceKind::Item => BlockColor::White,
            PieceKind::Weight => BlockColor::Gray,
        }
    }
}

/// Block colors stored in occupied cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockColor {
    Cyan,
    Yellow,
    Purple,
    Green,
    Red,
    Blue,
    Orange,
    White,
    Gray,
}

/// Rotation states following the Super Rotation System (SRS)
///
/// - **North**: Spawn orientation (0° rotation)
/// - **East**: Rotated 90° clockwise ("right")
/// - **South**: Rotated 180° ("reverse")
/// - **West**: Rotated 90° counter-clockwise ("left")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise (-90° or 270°)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_ccw(), Rotation::West);
    /// assert_eq!(Rotation::East.rotate_ccw(), Rotation::North);
    /// ```
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Number of clockwise quarter turns from North
    pub fn quarter_turns(&self) -> u8 {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Parse rotation from string
    ///
    /// Accepts full names or single letters (case-insensitive):
    /// "north" | "n", "east" | "e", "south" | "s", "west" | "w"
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "north" | "n" => Some(Rotation::North),
            "east" | "e" => Some(Rotation::East),
            "south" | "s" => Some(Rotation::South),
            "west" | "w" => Some(Rotation::West),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Rotation::North => "north",
            Rotation::East => "east",
            Rotation::South => "south",
            Rotation::West => "west",
        }
    }
}

/// Player commands consumed by the engine
///
/// The first seven form the gameplay vocabulary; `Pause`/`Resume` only toggle the
/// paused flag so callers can freeze a match without leaving the command stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameCommand {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Drop piece one cell down (+1 point); locks when it cannot descend
    SoftDrop,
    /// Instantly drop piece to lowest valid position and lock it
    HardDrop,
    /// Rotate piece 90° clockwise
    RotateCw,
    /// Rotate piece 90° counter-clockwise
    RotateCcw,
    /// Hold current piece (once per lock cycle)
    Hold,
    /// Freeze the match
    Pause,
    /// Unfreeze the match
    Resume,
}

impl GameCommand {
    /// Parse a command name
    ///
    /// Underscores, dashes and case are ignored, so `MOVE_LEFT`, `moveLeft` and
    /// `move-left` all name the same command.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::GameCommand;
    ///
    /// assert_eq!(GameCommand::from_str("ROTATE_CW"), Some(GameCommand::RotateCw));
    /// assert_eq!(GameCommand::from_str("softDrop"), Some(GameCommand::SoftDrop));
    /// assert_eq!(GameCommand::from_str("jump"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "moveleft" => Some(GameCommand::MoveLeft),
            "moveright" => Some(GameCommand::MoveRight),
            "softdrop" => Some(GameCommand::SoftDrop),
            "harddrop" => Some(GameCommand::HardDrop),
            "rotatecw" => Some(GameCommand::RotateCw),
            "rotateccw" => Some(GameCommand::RotateCcw),
            "hold" => Some(GameCommand::Hold),
            "pause" => Some(GameCommand::Pause),
            "resume" => Some(GameCommand::Resume),
            _ => None,
        }
    }

    /// Convert to the SCREAMING_SNAKE command name
    pub fn as_str(&self) -> &'static str {
        match self {
            GameCommand::MoveLeft => "MOVE_LEFT",
            GameCommand::MoveRight => "MOVE_RIGHT",
            GameCommand::SoftDrop => "SOFT_DROP",
            GameCommand::HardDrop => "HARD_DROP",
            GameCommand::RotateCw => "ROTATE_CW",
            GameCommand::RotateCcw => "ROTATE_CCW",
            GameCommand::Hold => "HOLD",
            GameCommand::Pause => "PAUSE",
            GameCommand::Resume => "RESUME",
        }
    }
}

/// T-Spin detection result
///
/// - **None**: Not a T-spin
/// - **Mini**: 3-corner T-spin with an open facing corner, not produced by the last kick
/// - **Full**: any other 3-corner T-spin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TSpinKind {
    #[default]
    None,
    Mini,
    Full,
}

impl TSpinKind {
    /// Convert to optional string representation
    ///
    /// Returns `None` for `TSpinKind::None`, `Some("mini")` for Mini,
    /// and `Some("full")` for Full.
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            TSpinKind::None => None,
            TSpinKind::Mini => Some("mini"),
            TSpinKind::Full => Some("full"),
        }
    }

    /// Whether any kind of T-spin was detected
    pub fn is_tspin(&self) -> bool {
        !matches!(self, TSpinKind::None)
    }
}

/// Arcade item variants
///
/// Ordering is the canonical selection order used by the item manager, which keeps
/// uniform selection reproducible for a given seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemKind {
    /// Clears a 5x5 area around the anchor
    Bomb,
    /// Clears the anchor row and column
    Cross,
    /// Removes every row holding its marker, full or not
    LineClear,
    /// Falling 4-wide weight that crushes blocks beneath it
    WeightBomb,
    /// Restores the soft drop speed multiplier to 1.0
    SpeedReset,
    /// Flat score bonus
    BonusScore,
}

impl ItemKind {
    /// Every item variant in canonical order
    pub const ALL: [ItemKind; 6] = [
        ItemKind::Bomb,
        ItemKind::Cross,
        ItemKind::LineClear,
        ItemKind::WeightBomb,
        ItemKind::SpeedReset,
        ItemKind::BonusScore,
    ];

    /// Parse item kind from string (case-insensitive, underscores ignored)
    ///
    /// `PLUS` is accepted as an alias for the cross clear.
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::ItemKind;
    ///
    /// assert_eq!(ItemKind::from_str("LINE_CLEAR"), Some(ItemKind::LineClear));
    /// assert_eq!(ItemKind::from_str("plus"), Some(ItemKind::Cross));
    /// assert_eq!(ItemKind::from_str("laser"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        let normalized: String = s
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .flat_map(char::to_lowercase)
            .collect();
        match normalized.as_str() {
            "bomb" => Some(ItemKind::Bomb),
            "cross" | "plus" => Some(ItemKind::Cross),
            "lineclear" => Some(ItemKind::LineClear),
            "weightbomb" | "weight" => Some(ItemKind::WeightBomb),
            "speedreset" => Some(ItemKind::SpeedReset),
            "bonusscore" | "bonus" => Some(ItemKind::BonusScore),
            _ => None,
        }
    }

    /// Convert to the SCREAMING_SNAKE item name
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemKind::Bomb => "BOMB",
            ItemKind::Cross => "CROSS",
            ItemKind::LineClear => "LINE_CLEAR",
            ItemKind::WeightBomb => "WEIGHT_BOMB",
            ItemKind::SpeedReset => "SPEED_RESET",
            ItemKind::BonusScore => "BONUS_SCORE",
        }
    }

    /// Piece kind that transports this item when it is not riding on a tetromino
    ///
    /// Returns `None` for items that are embedded in the next standard piece.
    pub fn carrier(&self) -> Option<PieceKind> {
        match self {
            ItemKind::WeightBomb => Some(PieceKind::Weight),
            ItemKind::SpeedReset | ItemKind::BonusScore => Some(PieceKind::Item),
            ItemKind::Bomb | ItemKind::Cross | ItemKind::LineClear => None,
        }
    }
}
