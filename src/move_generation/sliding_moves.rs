use crate::game_state::chess_types::{Direction, Move, Piece};
use crate::game_state::x88_board::X88Board;

pub fn generate_bishop_moves(board: &X88Board, bishop: &Piece, out: &mut Vec<Move>) {
    generate_sliding_moves(board, bishop, &Direction::DIAGONAL, out);
}

pub fn generate_rook_moves(board: &X88Board, rook: &Piece, out: &mut Vec<Move>) {
    generate_sliding_moves(board, rook, &Direction::ORTHOGONAL, out);
}

pub fn generate_queen_moves(board: &X88Board, queen: &Piece, out: &mut Vec<Move>) {
    generate_sliding_moves(board, queen, &Direction::ALL, out);
}

/// Walks each ray until it leaves the board, hits a friendly piece
/// (excluded), or captures an enemy piece (included, then stops).
fn generate_sliding_moves(
    board: &X88Board,
    piece: &Piece,
    directions: &[Direction],
    out: &mut Vec<Move>,
) {
    for &direction in directions {
        let mut to = piece.square.step(direction);
        loop {
            if board.is_opponent_piece(piece, to) {
                out.push(Move::new(*piece, to, board.piece_at(to)));
                break;
            }
            if !board.is_free(to) {
                break;
            }
            out.push(Move::new(*piece, to, None));
            to = to.step(direction);
        }
    }
}
