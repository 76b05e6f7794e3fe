use crate::types::{BOARD_WIDTH, Cell, Color, Position};

const NUM_SQUARES: usize = BOARD_WIDTH * BOARD_WIDTH;
const DIRECTIONS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Othello board state represented by two bitboards.
///
/// Square `row * 8 + col` maps to bit `row * 8 + col`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Board {
    black: u64,
    white: u64,
}

impl Board {
    /// Creates the initial board:
    /// (3,3)=white, (3,4)=black, (4,3)=black, (4,4)=white.
    pub fn new() -> Self {
        Self {
            black: bit(28) | bit(35),
            white: bit(27) | bit(36),
        }
    }

    /// Builds a board from raw masks. Squares set in both masks are a caller bug.
    pub fn from_bitboards(black: u64, white: u64) -> Self {
        assert_eq!(black & white, 0, "a square cannot hold both colors");
        Self { black, white }
    }

    /// Inverse of [`Board::to_rows`]. `None` unless the grid is 8x8.
    pub fn from_rows(rows: &[Vec<Option<Color>>]) -> Option<Self> {
        if rows.len() != BOARD_WIDTH || rows.iter().any(|row| row.len() != BOARD_WIDTH) {
            return None;
        }

        let mut board = Self { black: 0, white: 0 };
        for (idx, cell) in rows.iter().flatten().enumerate() {
            match cell {
                Some(Color::Black) => board.black |= bit(idx),
                Some(Color::White) => board.white |= bit(idx),
                None => {}
            }
        }
        Some(board)
    }

    pub fn cell(&self, pos: Position) -> Cell {
        let square = bit(index_of(pos));
        if (self.black & square) != 0 {
            Cell::Black
        } else if (self.white & square) != 0 {
            Cell::White
        } else {
            Cell::Empty
        }
    }

    /// Returns the opposing run captured when `color` plays at `pos`, walking
    /// in direction `(d_row, d_col)`. Zero when the run is empty, hits an empty
    /// square, or leaves the board before a `color` terminator.
    pub fn capture_line(&self, pos: Position, d_row: i32, d_col: i32, color: Color) -> u64 {
        let (me, opp) = self.sides(color);
        let mut r = pos.row as i32 + d_row;
        let mut c = pos.col as i32 + d_col;
        let mut line = 0u64;

        while in_bounds(r, c) {
            let square = bit((r as usize) * BOARD_WIDTH + c as usize);
            if (opp & square) != 0 {
                line |= square;
            } else if (me & square) != 0 {
                return line;
            } else {
                return 0;
            }

            r += d_row;
            c += d_col;
        }

        0
    }

    /// Returns every disc flipped if `color` played at `pos`.
    /// Zero when the square is occupied or nothing is captured.
    pub fn flips(&self, pos: Position, color: Color) -> u64 {
        let move_bit = bit(index_of(pos));
        if ((self.black | self.white) & move_bit) != 0 {
            return 0;
        }

        DIRECTIONS
            .iter()
            .fold(0u64, |acc, &(dr, dc)| acc | self.capture_line(pos, dr, dc, color))
    }

    /// Returns legal move mask for the given side.
    pub fn legal_moves(&self, color: Color) -> u64 {
        let occupied = self.black | self.white;
        let mut legal = 0u64;

        for idx in 0..NUM_SQUARES {
            let move_bit = bit(idx);
            if (occupied & move_bit) != 0 {
                continue;
            }
            if self.flips(Position::from_index(idx), color) != 0 {
                legal |= move_bit;
            }
        }

        legal
    }

    /// Places one disc and flips captured discs.
    /// Returns flipped bit mask. Returns 0 (and leaves the board alone) when
    /// the move is illegal.
    pub fn place(&mut self, pos: Position, color: Color) -> u64 {
        let flips = self.flips(pos, color);
        if flips == 0 {
            return 0;
        }

        let (me, opp) = self.sides(color);
        let next_me = me | bit(index_of(pos)) | flips;
        let next_opp = opp & !flips;

        match color {
            Color::Black => {
                self.black = next_me;
                self.white = next_opp;
            }
            Color::White => {
                self.white = next_me;
                self.black = next_opp;
            }
        }

        flips
    }

    /// Returns `(black_count, white_count)`.
    pub fn count(&self) -> (u8, u8) {
        (self.black.count_ones() as u8, self.white.count_ones() as u8)
    }

    /// Returns the number of empty squares.
    pub fn empty_count(&self) -> u8 {
        let (black_count, white_count) = self.count();
        NUM_SQUARES as u8 - black_count - white_count
    }

    /// Row-major grid, `None` for empty squares.
    pub fn to_rows(&self) -> Vec<Vec<Option<Color>>> {
        (0..BOARD_WIDTH as u8)
            .map(|row| {
                (0..BOARD_WIDTH as u8)
                    .map(|col| self.cell(Position::new(row, col)).color())
                    .collect()
            })
            .collect()
    }

    fn sides(&self, color: Color) -> (u64, u64) {
        match color {
            Color::Black => (self.black, self.white),
            Color::White => (self.white, self.black),
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

pub fn in_range(row: u8, col: u8) -> bool {
    (row as usize) < BOARD_WIDTH && (col as usize) < BOARD_WIDTH
}

pub(crate) fn mask_to_positions(mask: u64) -> Vec<Position> {
    let mut bits = mask;
    let mut out = Vec::new();

    while bits != 0 {
        out.push(Position::from_index(bits.trailing_zeros() as usize));
        bits &= bits - 1;
    }

    out
}

fn bit(idx: usize) -> u64 {
    if idx < NUM_SQUARES { 1u64 << idx } else { 0 }
}

fn index_of(pos: Position) -> usize {
    assert!(
        in_range(pos.row, pos.col),
        "position out of range: ({}, {})",
        pos.row,
        pos.col
    );
    (pos.row as usize) * BOARD_WIDTH + pos.col as usize
}

fn in_bounds(row: i32, col: i32) -> bool {
    (0..BOARD_WIDTH as i32).contains(&row) && (0..BOARD_WIDTH as i32).contains(&col)
}
