//! Draw detection.

use super::super::{Board, Position};
use tracing::instrument;

/// Checks if every cell is occupied.
///
/// A full board with no winner is a draw.
#[instrument(skip(board))]
pub fn is_full(board: &Board) -> bool {
    Position::ALL.iter().all(|&pos| !board.is_empty(pos))
}

#[cfg(test)]
mod tests {
    use super::super::super::{Cell, PlayerId, Winner};
    use super::super::evaluate_termination;
    use super::*;

    fn fill(board: &mut Board, rows: [[u8; 3]; 3]) {
        for pos in Position::ALL {
            let player = match rows[pos.row()][pos.col()] {
                1 => PlayerId::One,
                _ => PlayerId::Two,
            };
            board.set(pos, Cell::Occupied(player));
        }
    }

    #[test]
    fn test_empty_board_not_full() {
        assert!(!is_full(&Board::new()));
    }

    #[test]
    fn test_partial_board_not_full() {
        let mut board = Board::new();
        board.set(Position::Center, Cell::Occupied(PlayerId::One));
        assert!(!is_full(&board));
        assert_eq!(evaluate_termination(&board), Winner::None);
    }

    #[test]
    fn test_draw_detection() {
        let mut board = Board::new();
        // 1 2 1 / 2 1 1 / 2 1 2
        fill(&mut board, [[1, 2, 1], [2, 1, 1], [2, 1, 2]]);
        assert!(is_full(&board));
        assert_eq!(evaluate_termination(&board), Winner::Draw);
    }

    #[test]
    fn test_full_board_with_line_is_a_win() {
        let mut board = Board::new();
        // Bottom row for player 2, board full.
        fill(&mut board, [[1, 2, 1], [1, 1, 2], [2, 2, 2]]);
        assert!(is_full(&board));
        assert_eq!(
            evaluate_termination(&board),
            Winner::Player(PlayerId::Two)
        );
    }
}
