//! Core domain types for the shared board.

use super::position::Position;
use serde::{Deserialize, Serialize};

/// One of the two seats at the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerId {
    /// Player 1 (moves on odd turns).
    One,
    /// Player 2 (moves on even turns).
    Two,
}

impl PlayerId {
    /// Both seats in arrival order.
    pub const ALL: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    /// Returns the opposing seat.
    pub fn opponent(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    /// Numeric id used on the wire (1 or 2).
    pub fn number(self) -> u8 {
        match self {
            PlayerId::One => 1,
            PlayerId::Two => 2,
        }
    }

    /// Parses a wire id. Anything other than 1 or 2 is `None`.
    pub fn from_number(n: i64) -> Option<Self> {
        match n {
            1 => Some(PlayerId::One),
            2 => Some(PlayerId::Two),
            _ => None,
        }
    }

    /// Zero-based slot index.
    pub fn index(self) -> usize {
        usize::from(self.number()) - 1
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.number())
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Cell {
    /// Nobody has played here yet.
    #[default]
    Empty,
    /// Claimed by a player. Never changes again until the session resets.
    Occupied(PlayerId),
}

impl Cell {
    /// Wire value: 0 for empty, otherwise the occupant's number.
    pub fn to_wire(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Occupied(player) => player.number(),
        }
    }
}

/// 3x3 board, indexed by [`Position`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Board {
    cells: [[Cell; 3]; 3],
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the cell at the given position.
    pub fn get(&self, pos: Position) -> Cell {
        self.cells[pos.row()][pos.col()]
    }

    /// Claims a cell. Only the rules engine writes to the board.
    pub(crate) fn set(&mut self, pos: Position, cell: Cell) {
        self.cells[pos.row()][pos.col()] = cell;
    }

    /// Checks if a cell is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Cell::Empty
    }

    /// True once all nine cells are occupied.
    pub fn is_full(&self) -> bool {
        self.occupied_count() == 9
    }

    /// Number of occupied cells.
    pub fn occupied_count(&self) -> usize {
        self.cells
            .iter()
            .flatten()
            .filter(|cell| **cell != Cell::Empty)
            .count()
    }

    /// Row-major grid of wire values (0 = empty, 1 = P1, 2 = P2).
    pub fn to_grid(&self) -> [[u8; 3]; 3] {
        self.cells.map(|row| row.map(Cell::to_wire))
    }

    /// Formats the board as a human-readable string.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for (r, row) in self.cells.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let symbol = match cell {
                    Cell::Empty => '.',
                    Cell::Occupied(PlayerId::One) => '1',
                    Cell::Occupied(PlayerId::Two) => '2',
                };
                result.push(symbol);
                if c < 2 {
                    result.push('|');
                }
            }
            if r < 2 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

/// Turn counter. Its parity picks the expected mover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TurnCounter(u32);

impl TurnCounter {
    /// The first turn of a fresh session.
    pub const START: TurnCounter = TurnCounter(1);

    /// Raw counter value (starts at 1).
    pub fn value(self) -> u32 {
        self.0
    }

    /// Odd turns belong to Player 1, even turns to Player 2.
    pub fn expected_mover(self) -> PlayerId {
        if self.0 % 2 == 1 {
            PlayerId::One
        } else {
            PlayerId::Two
        }
    }

    pub(crate) fn advance(&mut self) {
        self.0 += 1;
    }
}

impl Default for TurnCounter {
    fn default() -> Self {
        Self::START
    }
}

/// Outcome of the session so far.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Winner {
    /// Game still in progress.
    #[default]
    None,
    /// Three in a row for this player.
    Player(PlayerId),
    /// Full board, no line.
    Draw,
}

impl Winner {
    /// True once the game has a winner or is drawn.
    pub fn is_finished(self) -> bool {
        self != Winner::None
    }

    /// Wire representation: `""`, `"Player N"` or `"CAT"`.
    pub fn wire_label(self) -> String {
        match self {
            Winner::None => String::new(),
            Winner::Player(player) => player.to_string(),
            Winner::Draw => "CAT".to_string(),
        }
    }
}
