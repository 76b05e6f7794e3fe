use crate::board::{Board, in_range, mask_to_positions};
use crate::error::MoveError;
use crate::types::{Color, GameState, Position, Profile, Profiles, Scores, Winner};

/// What a successful move did to the position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub flipped: Vec<Position>,
    /// Side skipped by the pass rule, if any.
    pub passed: Option<Color>,
    pub game_over: bool,
}

/// Authoritative game state for one room.
///
/// Mutated only through [`GameEngine::apply_move`], the profile setters and
/// [`GameEngine::reset`]. Coordinates handed to the engine must already be on
/// the board; out-of-range input panics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEngine {
    board: Board,
    current_turn: Color,
    is_over: bool,
    winner: Option<Winner>,
    profiles: Profiles,
    is_pass: bool,
    flipped: Vec<Position>,
}

impl GameEngine {
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            current_turn: Color::Black,
            is_over: false,
            winner: None,
            profiles: Profiles::default(),
            is_pass: false,
            flipped: Vec::new(),
        }
    }

    /// Starts from an arbitrary position with `turn` to move. If `turn` has
    /// no legal move the opponent moves instead; if neither side can move the
    /// game is already over.
    pub fn from_position(board: Board, turn: Color) -> Self {
        let mut engine = Self {
            board,
            current_turn: turn,
            ..Self::new()
        };
        if !engine.has_legal_moves(turn) {
            engine.current_turn = turn.opponent();
            if !engine.has_legal_moves(engine.current_turn) {
                engine.end_game();
            }
        }
        engine
    }

    /// Rebuilds an engine from a snapshot received over the wire, e.g. to
    /// pre-check moves on the client. `None` if the board is malformed.
    pub fn from_snapshot(state: &GameState) -> Option<Self> {
        Some(Self {
            board: Board::from_rows(&state.board)?,
            current_turn: state.current_player,
            is_over: state.game_over,
            winner: state.winner,
            profiles: state.players.clone(),
            is_pass: state.is_pass,
            flipped: state.flipped.clone(),
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_turn(&self) -> Color {
        self.current_turn
    }

    pub fn is_over(&self) -> bool {
        self.is_over
    }

    pub fn winner(&self) -> Option<Winner> {
        self.winner
    }

    pub fn profiles(&self) -> &Profiles {
        &self.profiles
    }

    pub fn scores(&self) -> Scores {
        let (black, white) = self.board.count();
        Scores { black, white }
    }

    pub fn is_legal_move(&self, row: u8, col: u8, color: Color) -> bool {
        self.board.flips(on_board(row, col), color) != 0
    }

    /// Opposing discs captured in one direction from `(row, col)`, in walk
    /// order. `None` when that direction captures nothing.
    pub fn compute_capture_line(
        &self,
        row: u8,
        col: u8,
        d_row: i32,
        d_col: i32,
        color: Color,
    ) -> Option<Vec<Position>> {
        let line = self
            .board
            .capture_line(on_board(row, col), d_row, d_col, color);
        if line == 0 {
            return None;
        }

        let mut cells = mask_to_positions(line);
        if d_row < 0 || (d_row == 0 && d_col < 0) {
            cells.reverse();
        }
        Some(cells)
    }

    /// Every square `color` may play, row-major.
    pub fn legal_moves(&self, color: Color) -> Vec<Position> {
        mask_to_positions(self.board.legal_moves(color))
    }

    pub fn has_legal_moves(&self, color: Color) -> bool {
        self.board.legal_moves(color) != 0
    }

    /// Places a disc for `color`, flips every captured run, then advances the
    /// turn with the pass rule. Leaves the engine untouched on error.
    pub fn apply_move(&mut self, row: u8, col: u8, color: Color) -> Result<MoveOutcome, MoveError> {
        if self.is_over {
            return Err(MoveError::GameOver);
        }
        if color != self.current_turn {
            return Err(MoveError::NotYourTurn);
        }

        let pos = on_board(row, col);
        if self.board.cell(pos).color().is_some() {
            return Err(MoveError::Occupied);
        }

        let flips = self.board.place(pos, color);
        if flips == 0 {
            return Err(MoveError::NoCaptures);
        }

        self.flipped = mask_to_positions(flips);
        let passed = self.advance_turn(color);
        self.is_pass = passed.is_some();

        Ok(MoveOutcome {
            flipped: self.flipped.clone(),
            passed,
            game_over: self.is_over,
        })
    }

    /// Hands the turn to the opponent. An opponent without moves is skipped;
    /// if the mover then has no moves either, the game ends.
    fn advance_turn(&mut self, mover: Color) -> Option<Color> {
        let opponent = mover.opponent();
        self.current_turn = opponent;
        if self.has_legal_moves(opponent) {
            return None;
        }

        self.current_turn = mover;
        if !self.has_legal_moves(mover) {
            self.end_game();
        }
        Some(opponent)
    }

    fn end_game(&mut self) {
        self.is_over = true;
        self.winner = Some(self.determine_winner());
    }

    /// Strict disc majority wins; equal counts tie.
    pub fn determine_winner(&self) -> Winner {
        let (black, white) = self.board.count();
        if black > white {
            Winner::Black
        } else if white > black {
            Winner::White
        } else {
            Winner::Tie
        }
    }

    /// Restores the opening position. Profiles survive.
    pub fn reset(&mut self) {
        self.board = Board::new();
        self.current_turn = Color::Black;
        self.is_over = false;
        self.winner = None;
        self.is_pass = false;
        self.flipped.clear();
    }

    pub fn set_profile(&mut self, color: Color, profile: Profile) {
        self.profiles[color] = profile;
    }

    pub fn set_emoji(&mut self, color: Color, emoji: impl Into<String>) {
        self.profiles[color].emoji = emoji.into();
    }

    pub fn snapshot(&self) -> GameState {
        GameState {
            board: self.board.to_rows(),
            current_player: self.current_turn,
            players: self.profiles.clone(),
            game_over: self.is_over,
            winner: self.winner,
            scores: self.scores(),
            is_pass: self.is_pass,
            flipped: self.flipped.clone(),
        }
    }
}

impl Default for GameEngine {
    fn default() -> Self {
        Self::new()
    }
}

fn on_board(row: u8, col: u8) -> Position {
    assert!(in_range(row, col), "row/col out of range: ({row}, {col})");
    Position::new(row, col)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Cell;

    const FULL_BOARD: u64 = u64::MAX;

    fn bit(row: u8, col: u8) -> u64 {
        1u64 << (row as usize * 8 + col as usize)
    }

    #[test]
    fn initial_state_is_correct() {
        let game = GameEngine::new();
        let state = game.snapshot();

        assert_eq!(state.current_player, Color::Black);
        assert_eq!(state.scores, Scores { black: 2, white: 2 });
        assert!(!state.game_over);
        assert!(!state.is_pass);
        assert!(state.flipped.is_empty());
        assert_eq!(state.winner, None);
        assert_eq!(game.legal_moves(Color::Black).len(), 4);
    }

    #[test]
    fn scenario_a_opening_capture_hands_turn_to_white() {
        let mut game = GameEngine::new();

        let outcome = game.apply_move(2, 3, Color::Black).unwrap();

        assert_eq!(outcome.flipped, vec![Position::new(3, 3)]);
        assert_eq!(outcome.passed, None);
        assert!(!outcome.game_over);
        assert_eq!(game.board().cell(Position::new(2, 3)), Cell::Black);
        assert_eq!(game.board().cell(Position::new(3, 3)), Cell::Black);
        assert_eq!(game.current_turn(), Color::White);
    }

    #[test]
    fn scenario_b_move_without_capture_changes_nothing() {
        let mut game = GameEngine::new();
        let before = game.clone();

        let err = game.apply_move(2, 2, Color::Black).unwrap_err();

        assert_eq!(err, MoveError::NoCaptures);
        assert_eq!(game, before);
    }

    #[test]
    fn occupied_square_and_wrong_turn_are_rejected() {
        let mut game = GameEngine::new();
        let before = game.clone();

        assert_eq!(game.apply_move(3, 3, Color::Black), Err(MoveError::Occupied));
        assert_eq!(game.apply_move(2, 4, Color::White), Err(MoveError::NotYourTurn));
        assert_eq!(game, before);
    }

    #[test]
    fn compute_capture_line_walks_outward_from_the_move() {
        // Row 0: . W W B
        let board = Board::from_bitboards(bit(0, 3) | bit(4, 4), bit(0, 1) | bit(0, 2));
        let game = GameEngine::from_position(board, Color::Black);

        assert_eq!(
            game.compute_capture_line(0, 0, 0, 1, Color::Black),
            Some(vec![Position::new(0, 1), Position::new(0, 2)])
        );
        assert_eq!(game.compute_capture_line(0, 0, 1, 0, Color::Black), None);

        // Row 0 seen from the right: B W W . -> walking left.
        let board = Board::from_bitboards(bit(0, 0) | bit(4, 4), bit(0, 1) | bit(0, 2));
        let game = GameEngine::from_position(board, Color::Black);
        assert_eq!(
            game.compute_capture_line(0, 3, 0, -1, Color::Black),
            Some(vec![Position::new(0, 2), Position::new(0, 1)])
        );
    }

    #[test]
    fn opponent_without_moves_is_skipped() {
        // Row 0: B W .   Row 7: B W .
        let black = bit(0, 0) | bit(7, 0);
        let white = bit(0, 1) | bit(7, 1);
        let mut game = GameEngine::from_position(Board::from_bitboards(black, white), Color::Black);

        let outcome = game.apply_move(0, 2, Color::Black).unwrap();

        assert_eq!(outcome.passed, Some(Color::White));
        assert!(!outcome.game_over);
        assert_eq!(game.current_turn(), Color::Black);
        assert!(game.snapshot().is_pass);
        assert_eq!(game.legal_moves(Color::Black), vec![Position::new(7, 2)]);
    }

    #[test]
    fn scenario_d_no_moves_for_either_side_ends_the_game() {
        // Row 0: B W . -> Black wipes out White.
        let board = Board::from_bitboards(bit(0, 0), bit(0, 1));
        let mut game = GameEngine::from_position(board, Color::Black);

        let outcome = game.apply_move(0, 2, Color::Black).unwrap();

        assert!(outcome.game_over);
        assert!(game.is_over());
        assert_eq!(game.winner(), Some(Winner::Black));
        assert_eq!(game.current_turn(), Color::Black);
        assert_eq!(game.apply_move(1, 1, Color::Black), Err(MoveError::GameOver));
    }

    #[test]
    fn full_board_after_last_move_ends_game_with_majority_winner() {
        let black = bit(0, 1);
        let white = FULL_BOARD ^ bit(0, 0) ^ black;
        let mut game = GameEngine::from_position(Board::from_bitboards(black, white), Color::White);

        let outcome = game.apply_move(0, 0, Color::White).unwrap();

        assert!(outcome.game_over);
        assert_eq!(game.scores(), Scores { black: 0, white: 64 });
        assert_eq!(game.winner(), Some(Winner::White));
    }

    #[test]
    fn equal_counts_at_the_end_tie() {
        // Top half black, bottom half white, no empty squares.
        let black = 0x0000_0000_FFFF_FFFFu64;
        let game = GameEngine::from_position(Board::from_bitboards(black, !black), Color::Black);

        assert!(game.is_over());
        assert_eq!(game.winner(), Some(Winner::Tie));
    }

    #[test]
    fn from_position_gives_turn_to_side_that_can_move() {
        // Black cannot move; White at (0,2) can capture (0,1) against (0,0).
        let board = Board::from_bitboards(bit(0, 1), bit(0, 0));
        let game = GameEngine::from_position(board, Color::Black);

        assert!(!game.is_over());
        assert_eq!(game.current_turn(), Color::White);
    }

    #[test]
    fn reset_restores_opening_and_keeps_profiles() {
        let mut game = GameEngine::new();
        game.set_profile(
            Color::White,
            Profile {
                emoji: "🐸".to_string(),
                name: "Bo".to_string(),
            },
        );
        game.apply_move(2, 3, Color::Black).unwrap();
        game.apply_move(2, 2, Color::White).unwrap();

        game.reset();

        let fresh = GameEngine::new();
        assert_eq!(game.board(), fresh.board());
        assert_eq!(game.current_turn(), Color::Black);
        assert!(!game.is_over());
        assert_eq!(game.winner(), None);
        assert!(game.snapshot().flipped.is_empty());
        assert_eq!(game.profiles()[Color::White].name, "Bo");
        assert_eq!(game.profiles()[Color::White].emoji, "🐸");
    }

    #[test]
    fn snapshot_serializes_with_wire_field_names() {
        let json = serde_json::to_value(GameEngine::new().snapshot()).unwrap();

        assert_eq!(json["currentPlayer"], "black");
        assert_eq!(json["gameOver"], false);
        assert_eq!(json["winner"], serde_json::Value::Null);
        assert_eq!(json["board"][3][3], "white");
        assert_eq!(json["board"][0][0], serde_json::Value::Null);
        assert_eq!(json["players"]["white"]["emoji"], "🤖");
        assert_eq!(json["isPass"], false);
    }

    #[test]
    fn snapshot_round_trips_into_an_equal_engine() {
        let mut game = GameEngine::new();
        game.apply_move(2, 3, Color::Black).unwrap();

        let rebuilt = GameEngine::from_snapshot(&game.snapshot()).unwrap();

        assert_eq!(rebuilt, game);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn out_of_range_move_panics() {
        let mut game = GameEngine::new();
        let _ = game.apply_move(8, 0, Color::Black);
    }
}
