// Copyright 2023 Tobin Edwards
//
//    Licensed under the Apache License, Version 2.0 (the "License");
//    you may not use this file except in compliance with the License.
//    You may obtain a copy of the License at
//
//        http://www.apache.org/licenses/LICENSE-2.0
//
//    Unless required by applicable law or agreed to in writing, software
//    distributed under the License is distributed on an "AS IS" BASIS,
//    WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//    See the License for the specific language governing permissions and
//    limitations under the License.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Index;

use super::material::{Color, Material};
use super::moves::{LegalMove, Move, MoveError};
use super::position::{Pos, Position};
use super::square::{Mask, Square};
use super::Turn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BoardResult {
    CheckMate(Color),
    StaleMate,
}

/// State of the side to move once a move has been committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveStatus {
    Normal,
    Check,
    CheckMate,
    StaleMate,
}

/// What a committed move did. Its `Display` gives the diagnostic lines
/// recorded by the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveReport {
    pub material: Material,
    pub from: Square,
    pub to: Square,
    pub legal: LegalMove,
    pub captured: Option<Material>,
    pub status: MoveStatus,
}

impl fmt::Display for MoveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let color = self.material.color();
        match self.legal {
            LegalMove::ShortCastle => write!(f, "{} castles kingside", color)?,
            LegalMove::LongCastle => write!(f, "{} castles queenside", color)?,
            LegalMove::Standard(from, to) => {
                write!(f, "{} moves from {} to {}", self.material, from, to)?;
                if let Some(captured) = self.captured {
                    write!(f, " taking {}", captured)?;
                }
            }
        }
        let opponent = !color;
        match self.status {
            MoveStatus::Normal => Ok(()),
            MoveStatus::Check => write!(f, "\n{} is in check", opponent),
            MoveStatus::CheckMate => write!(f, "\n{} is in checkmate", opponent),
            MoveStatus::StaleMate => write!(f, "\n{} is in stalemate", opponent),
        }
    }
}

/// A single game session: one position, moves submitted by alternating
/// sides, and a transcript of what happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    position: Position,
    result: Option<BoardResult>,
    diagnostics: Vec<String>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// An empty board with White to move. Load a state before playing.
    pub fn new() -> Self {
        Self::from_position(Position::empty())
    }

    pub fn standard() -> Self {
        Self::from_position(Position::standard())
    }

    pub fn from_position(position: Position) -> Self {
        Self {
            position,
            result: None,
            diagnostics: Vec::new(),
        }
    }

    /// Replaces the whole board from an import record. The pieces are
    /// cleared first; if the record is malformed the board is left empty.
    pub fn load_state(&mut self, record: &str) -> Result<()> {
        self.position.clear_pieces();
        self.result = None;
        match Position::from_record(record) {
            Ok(position) => {
                self.position = position;
                self.log("A new board state is loaded!");
                Ok(())
            }
            Err(err) => {
                self.log(&err);
                Err(err.into())
            }
        }
    }

    /// Plays a move given as two position tokens such as `"E2"` and `"E4"`.
    /// The reason for a rejection is left in the transcript.
    pub fn submit_move(&mut self, from: &str, to: &str) -> bool {
        self.play(Move::parse(from, to)).is_ok()
    }

    /// Validates and commits `mv`, then evaluates the position for the
    /// side now to move. A rejected move leaves the board untouched; the
    /// error downcasts to `MoveError`.
    pub fn play(&mut self, mv: Move) -> Result<MoveReport> {
        match self.try_play(mv) {
            Ok(report) => {
                for line in report.to_string().lines() {
                    self.log(line);
                }
                Ok(report)
            }
            Err(err) => {
                self.log(&err);
                Err(err.into())
            }
        }
    }

    pub fn board_result(&self) -> Option<BoardResult> {
        self.result
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    /// Legal destinations for the piece on `from`; empty once the game is
    /// over or when the piece is not the side to move's.
    pub fn move_destinations(&self, from: Square) -> Mask {
        if self.result.is_some() {
            return Mask::empty();
        }
        self.position.clone().legal_destinations(from)
    }

    pub fn is_king_in_check(&self, color: Color) -> bool {
        self.position.is_king_in_check(color)
    }

    pub fn is_checkmate(&mut self, color: Color) -> bool {
        self.position.is_checkmate(color)
    }

    pub fn is_stalemate(&mut self, color: Color) -> bool {
        self.position.is_stalemate(color)
    }

    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<String> {
        std::mem::take(&mut self.diagnostics)
    }

    fn try_play(&mut self, mv: Move) -> Result<MoveReport, MoveError> {
        if self.result.is_some() {
            return Err(MoveError::GameOver);
        }
        let legal = self.position.validate_move(mv)?;
        let material = self.position[mv.from].ok_or(MoveError::NoPiece(mv.from))?;
        let captured = self.position.apply_move(legal);
        let status = self.update_result();
        Ok(MoveReport {
            material,
            from: mv.from,
            to: mv.to,
            legal,
            captured,
            status,
        })
    }

    fn update_result(&mut self) -> MoveStatus {
        use MoveStatus::*;
        let color = self.position.turn();
        let in_check = self.position.is_king_in_check(color);
        let status = match (in_check, self.position.has_legal_move(color)) {
            (false, true) => Normal,
            (true, true) => Check,
            (true, false) => CheckMate,
            (false, false) => StaleMate,
        };
        self.result = match status {
            CheckMate => Some(BoardResult::CheckMate(!color)),
            StaleMate => Some(BoardResult::StaleMate),
            _ => None,
        };
        status
    }

    fn log(&mut self, line: impl ToString) {
        self.diagnostics.push(line.to_string());
    }
}

impl Index<Square> for Board {
    type Output = Option<Material>;
    fn index(&self, index: Square) -> &Self::Output {
        self.position.index(index)
    }
}

impl Turn for Board {
    #[inline]
    fn turn(&self) -> Color {
        self.position.turn()
    }
}

impl AsRef<Position> for Board {
    fn as_ref(&self) -> &Position {
        &self.position
    }
}

impl Pos for Board {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ImportError;
    use crate::squares::*;

    use Color::*;

    fn play_all(board: &mut Board, moves: &[(&str, &str)]) {
        for (from, to) in moves {
            assert!(board.submit_move(from, to), "{} to {}: {:?}", from, to, board.diagnostics().last());
        }
    }

    fn rejection(board: &mut Board, from: Square, to: Square) -> MoveError {
        let before = board.position().clone();
        let err = board.play(Move::new(from, to)).unwrap_err();
        assert_eq!(*board.position(), before);
        *err.downcast_ref::<MoveError>().unwrap()
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert!(board.occupied().is_empty());
        assert_eq!(board.turn(), White);
        assert!(board.position().castling(White).oo());
        assert!(board.position().castling(Black).ooo());
    }
    #[test]
    fn test_turns_alternate() {
        let mut board = Board::standard();
        assert!(board.submit_move("E2", "E4"));
        assert_eq!(board.turn(), Black);
        assert!(!board.submit_move("D2", "D4"));
        assert_eq!(board.turn(), Black);
        assert!(board.submit_move("e7", "e5"));
        assert_eq!(board.turn(), White);
        assert_eq!(
            board.diagnostics(),
            [
                "White's Pawn moves from E2 to E4",
                "It is not White's turn to move!",
                "Black's Pawn moves from E7 to E5",
            ]
        );
    }
    #[test]
    fn test_rejections_leave_board_unchanged() {
        let mut board = Board::standard();
        play_all(&mut board, &[("E2", "E4"), ("E7", "E5")]);
        assert_eq!(rejection(&mut board, E3, E4), MoveError::NoPiece(E3));
        assert_eq!(rejection(&mut board, E5, E4), MoveError::WrongTurn(Black));
        assert_eq!(rejection(&mut board, E4, E4), MoveError::NullMove(Material::WP, E4));
        assert_eq!(rejection(&mut board, E4, E5), MoveError::IllegalMove(Material::WP, E5));
        assert_eq!(rejection(&mut board, A1, A4), MoveError::PathBlocked(Material::WR, A4));
        assert_eq!(rejection(&mut board, D1, D2), MoveError::FriendlyFire(Material::WQ, D2));
        assert_eq!(
            rejection(&mut board, Square::INVALID, E4),
            MoveError::OffBoard(Square::INVALID, E4)
        );
        let mut board = Board::standard();
        board.load_state("4k3/8/8/8/4r3/8/4N3/4K3 w -").unwrap();
        assert_eq!(rejection(&mut board, E2, C3), MoveError::SelfCheck);
    }
    #[test]
    fn test_rejection_diagnostics() {
        let mut board = Board::standard();
        assert!(!board.submit_move("E3", "E4"));
        assert!(!board.submit_move("A1", "A8"));
        assert!(!board.submit_move("Z9", "A1"));
        assert_eq!(
            board.take_diagnostics(),
            [
                "There is no piece at position E3!",
                "White's Rook cannot move to A8, the path is blocked!",
                "Move from invalid to A1 is off the board!",
            ]
        );
        assert!(board.diagnostics().is_empty());
    }
    #[test]
    fn test_capture_report() {
        let mut board = Board::standard();
        play_all(&mut board, &[("E2", "E4"), ("D7", "D5")]);
        let report = board.play(Move::parse("E4", "D5")).unwrap();
        assert_eq!(report.captured, Some(Material::BP));
        assert_eq!(report.status, MoveStatus::Normal);
        assert_eq!(
            board.diagnostics().last().map(String::as_str),
            Some("White's Pawn moves from E4 to D5 taking Black's Pawn")
        );
        assert_eq!(board.occupied().len(), 31);
    }
    #[test]
    fn test_kingside_castle() {
        let mut board = Board::new();
        board.load_state("r3k2r/8/8/8/8/8/8/R3K2R w KQkq").unwrap();
        let report = board.play(Move::new(E1, G1)).unwrap();
        assert_eq!(report.legal, LegalMove::ShortCastle);
        assert_eq!(board[G1].map(|m| m.piece()), Some(crate::Piece::King));
        assert_eq!(board[F1].map(|m| m.piece()), Some(crate::Piece::Rook));
        assert_eq!(board[H1], None);
        assert!(board[G1].is_some_and(|m| m.has_moved()));
        assert!(board[F1].is_some_and(|m| m.has_moved()));
        assert!(!board.position().castling(White).oo());
        assert_eq!(board.turn(), Black);
        assert_eq!(board.diagnostics().last().map(String::as_str), Some("White castles kingside"));
        // the same request again has nothing to move
        assert!(!board.submit_move("E1", "G1"));
    }
    #[test]
    fn test_returning_king_cannot_castle() {
        let mut board = Board::new();
        board.load_state("r3k2r/8/8/8/8/8/8/R3K2R w KQkq").unwrap();
        play_all(&mut board, &[("E1", "F1"), ("A8", "B8"), ("F1", "E1"), ("B8", "A8")]);
        assert_eq!(rejection(&mut board, E1, G1), MoveError::KingMoved);
    }
    #[test]
    fn test_returning_rook_cannot_castle() {
        let mut board = Board::new();
        board.load_state("r3k2r/8/8/8/8/8/8/R3K2R w KQkq").unwrap();
        play_all(&mut board, &[("H1", "H2"), ("A8", "B8"), ("H2", "H1"), ("B8", "A8")]);
        assert_eq!(rejection(&mut board, E1, G1), MoveError::RookMoved);
        assert!(board.submit_move("E1", "C1"));
    }
    #[test]
    fn test_long_castle_with_knight_on_b1() {
        let mut board = Board::new();
        board.load_state("r3k2r/8/8/8/8/8/8/RN2K2R w KQkq").unwrap();
        assert!(board.submit_move("E1", "C1"));
        assert_eq!(board[C1].map(|m| m.piece()), Some(crate::Piece::King));
        assert_eq!(board[D1].map(|m| m.piece()), Some(crate::Piece::Rook));
        assert_eq!(board[B1], Some(Material::WN));
        assert_eq!(board.diagnostics().last().map(String::as_str), Some("White castles queenside"));
    }
    #[test]
    fn test_pawn_diagonal_onto_empty_square() {
        let mut board = Board::standard();
        assert!(board.submit_move("E2", "D3"));
        assert_eq!(board[D3], Some(Material::WP));
        assert_eq!(board.turn(), Black);
    }
    #[test]
    fn test_castling_flag_from_record() {
        let mut board = Board::new();
        board.load_state("r3k2r/8/8/8/8/8/8/R3K2R w Qkq").unwrap();
        assert_eq!(rejection(&mut board, E1, G1), MoveError::CastlingUnavailable(White));
        assert!(board.submit_move("E1", "C1"));
        assert_eq!(board[D1].map(|m| m.piece()), Some(crate::Piece::Rook));
    }
    #[test]
    fn test_castle_giving_check() {
        let mut board = Board::new();
        board.load_state("5k2/8/8/8/8/8/8/4K2R w K").unwrap();
        let report = board.play(Move::new(E1, G1)).unwrap();
        assert_eq!(report.status, MoveStatus::Check);
        assert_eq!(report.to_string(), "White castles kingside\nBlack is in check");
    }
    #[test]
    fn test_check_report() {
        let mut board = Board::new();
        board.load_state("4k3/8/8/8/8/8/8/R3K3 w -").unwrap();
        let report = board.play(Move::new(A1, A8)).unwrap();
        assert_eq!(report.status, MoveStatus::Check);
        assert_eq!(board.board_result(), None);
        assert!(board.is_king_in_check(Black));
        assert_eq!(board.diagnostics().last().map(String::as_str), Some("Black is in check"));
    }
    #[test]
    fn test_scholars_mate() {
        let mut board = Board::standard();
        play_all(
            &mut board,
            &[
                ("E2", "E4"),
                ("E7", "E5"),
                ("F1", "C4"),
                ("B8", "C6"),
                ("D1", "H5"),
                ("G8", "F6"),
            ],
        );
        let report = board.play(Move::parse("H5", "F7")).unwrap();
        assert_eq!(report.status, MoveStatus::CheckMate);
        assert_eq!(board.board_result(), Some(BoardResult::CheckMate(White)));
        assert!(board.is_checkmate(Black));
        assert_eq!(
            board.diagnostics()[board.diagnostics().len() - 2..],
            [
                "White's Queen moves from H5 to F7 taking Black's Pawn",
                "Black is in checkmate",
            ]
        );
        assert_eq!(rejection(&mut board, A7, A6), MoveError::GameOver);
        assert!(board.move_destinations(A7).is_empty());
    }
    #[test]
    fn test_stalemate_ends_game() {
        let mut board = Board::new();
        board.load_state("7k/5K2/8/6Q1/8/8/8/8 w -").unwrap();
        let report = board.play(Move::new(G5, G6)).unwrap();
        assert_eq!(report.status, MoveStatus::StaleMate);
        assert_eq!(board.board_result(), Some(BoardResult::StaleMate));
        assert!(board.is_stalemate(Black));
        assert_eq!(board.diagnostics().last().map(String::as_str), Some("Black is in stalemate"));
        assert!(!board.submit_move("H8", "G8"));
    }
    #[test]
    fn test_load_resets_result() {
        let mut board = Board::new();
        board.load_state("7k/5K2/8/6Q1/8/8/8/8 w -").unwrap();
        assert!(board.submit_move("G5", "G6"));
        board.load_state("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();
        assert_eq!(board.board_result(), None);
        assert!(board.submit_move("E2", "E4"));
    }
    #[test]
    fn test_failed_load_leaves_board_cleared() {
        let mut board = Board::standard();
        assert!(board.submit_move("E2", "E4"));
        let err = board.load_state("rnbqkbnr/pppppppp w").unwrap_err();
        assert_eq!(err.downcast_ref::<ImportError>(), Some(&ImportError::MissingField));
        assert!(board.occupied().is_empty());
        assert_eq!(board.turn(), Black);
        assert_eq!(
            board.diagnostics().last().map(String::as_str),
            Some("Invalid FEN string format.")
        );
    }
    #[test]
    fn test_load_diagnostic() {
        let mut board = Board::new();
        board.load_state("4k3/8/8/8/8/8/8/4K3 b -").unwrap();
        assert_eq!(board.turn(), Black);
        assert_eq!(board.diagnostics(), ["A new board state is loaded!"]);
    }
    #[test]
    fn test_move_destinations() {
        let mut board = Board::standard();
        assert_eq!(board.move_destinations(B1), Mask::from_squares([A3, C3]));
        assert!(board.move_destinations(B8).is_empty());
        assert!(board.submit_move("B1", "C3"));
        assert_eq!(board.move_destinations(B8), Mask::from_squares([A6, C6]));
    }
}
