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

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::material::{Color, Material};
use super::position::{Pos, Position};
use super::square::{Mask, Square};
use super::Turn;

/// Why a move request was turned down. The message of each variant is the
/// diagnostic line shown to the player.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("The game is over, load a new board state to continue.")]
    GameOver,
    #[error("Move from {0} to {1} is off the board!")]
    OffBoard(Square, Square),
    #[error("There is no piece at position {0}!")]
    NoPiece(Square),
    #[error("It is not {0}'s turn to move!")]
    WrongTurn(Color),
    #[error("{0} is already on {1}!")]
    NullMove(Material, Square),
    #[error("{0} cannot move to {1}!")]
    IllegalMove(Material, Square),
    #[error("{0} cannot move to {1}, the path is blocked!")]
    PathBlocked(Material, Square),
    #[error("{0} cannot capture its own piece on {1}!")]
    FriendlyFire(Material, Square),
    #[error("Move puts your own king in check.")]
    SelfCheck,
    #[error("Invalid castling move: king condition not met.")]
    KingMoved,
    #[error("Invalid castling move: rook condition not met.")]
    RookMissing,
    #[error("Invalid castling move: rook has already moved.")]
    RookMoved,
    #[error("Invalid castling move: {0} has given up castling on that side.")]
    CastlingUnavailable(Color),
    #[error("Cannot castle while in check.")]
    CastleInCheck,
    #[error("Invalid castling move: path not clear.")]
    CastlingPathBlocked,
    #[error("Invalid castling move: king passes through threatened square.")]
    CastlingPathAttacked,
}
use MoveError::*;

/// A move request as submitted by a player.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
}

impl Move {
    pub fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }

    /// Builds a request from two position tokens such as `"E2"` and `"E4"`.
    /// Malformed tokens become `Square::INVALID` and are rejected on play.
    pub fn parse(from: &str, to: &str) -> Self {
        Self::new(Square::parse(from), Square::parse(to))
    }

    fn is_castling_shape(&self) -> bool {
        (self.to.col() - self.from.col()).abs() == 2
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegalMove {
    Standard(Square, Square),
    ShortCastle,
    LongCastle,
}

impl Position {
    /// Full legality check for the side to move. The board is the same
    /// afterwards whatever the outcome.
    pub fn validate_move(&mut self, mv: Move) -> Result<LegalMove, MoveError> {
        let material = self.check_request(mv)?;
        self.validate_for(material, mv)
    }

    /// Commits a move returned by `validate_move` and passes the turn.
    /// Returns the captured piece, if any.
    pub(super) fn apply_move(&mut self, mv: LegalMove) -> Option<Material> {
        let color = self.turn();
        let captured = match mv {
            LegalMove::Standard(from, to) => {
                let captured = self.trial(from, to).commit();
                self.mark_moved(to);
                self.castling_mut(color).update(from);
                self.castling_mut(!color).update(to);
                captured
            }
            LegalMove::ShortCastle | LegalMove::LongCastle => {
                self.apply_castle(color, mv);
                None
            }
        };
        self.pass_turn();
        captured
    }

    /// Whether any piece of the other color can reach the king of `color`.
    /// A side without a king is never in check.
    pub fn is_king_in_check(&self, color: Color) -> bool {
        match self.king(color) {
            Some(king) => self.is_attacked_by(king, !color),
            None => false,
        }
    }

    /// Whether a piece of `color` has an unobstructed line to `target`.
    pub fn is_attacked_by(&self, target: Square, color: Color) -> bool {
        Square::iter().any(|from| match *self.contents(from) {
            Some(material) if material.color() == color && from != target => {
                material.is_valid_move(from, target, self)
                    && (!material.piece().is_slider() || self.is_path_clear(from, target))
            }
            _ => false,
        })
    }

    /// `color` is in check and no move gets it out. Every candidate move is
    /// tried on this board and taken back before returning.
    pub fn is_checkmate(&mut self, color: Color) -> bool {
        self.is_king_in_check(color) && !self.has_legal_move(color)
    }

    /// `color` is not in check but has no move that keeps its king safe.
    pub fn is_stalemate(&mut self, color: Color) -> bool {
        !self.is_king_in_check(color) && !self.has_legal_move(color)
    }

    pub fn has_legal_move(&mut self, color: Color) -> bool {
        for from in self.occupied_by(color).iter() {
            let Some(material) = *self.contents(from) else {
                continue;
            };
            for to in Square::iter() {
                if to != from && self.validate_for(material, Move::new(from, to)).is_ok() {
                    return true;
                }
            }
        }
        false
    }

    /// Squares the piece on `from` may legally move to, castling included.
    /// Empty unless the piece belongs to the side to move.
    pub fn legal_destinations(&mut self, from: Square) -> Mask {
        let mut mask = Mask::empty();
        if let Some(material) = *self.contents(from) {
            if material.color() == self.turn() {
                for to in Square::iter() {
                    if to != from && self.validate_for(material, Move::new(from, to)).is_ok() {
                        mask |= to;
                    }
                }
            }
        }
        mask
    }

    fn check_request(&self, mv: Move) -> Result<Material, MoveError> {
        if !mv.from.is_valid() || !mv.to.is_valid() {
            return Err(OffBoard(mv.from, mv.to));
        }
        let material = self.contents(mv.from).ok_or(NoPiece(mv.from))?;
        if material.color() != self.turn() {
            return Err(WrongTurn(material.color()));
        }
        if mv.from == mv.to {
            return Err(NullMove(material, mv.to));
        }
        Ok(material)
    }

    fn validate_for(&mut self, material: Material, mv: Move) -> Result<LegalMove, MoveError> {
        if material.piece().is_king() && mv.is_castling_shape() {
            return self.validate_castle(mv.from, mv.to);
        }
        self.check_candidate(material, mv.from, mv.to)?;
        let trial = self.trial(mv.from, mv.to);
        if trial.is_king_in_check(material.color()) {
            return Err(SelfCheck);
        }
        Ok(LegalMove::Standard(mv.from, mv.to))
    }

    // Shape, path and destination ownership, without touching the board.
    fn check_candidate(&self, material: Material, from: Square, to: Square) -> Result<(), MoveError> {
        if !material.is_valid_move(from, to, self) {
            return Err(IllegalMove(material, to));
        }
        if material.piece().is_slider() && !self.is_path_clear(from, to) {
            return Err(PathBlocked(material, to));
        }
        match *self.contents(to) {
            Some(target) if target.color() == material.color() => Err(FriendlyFire(material, to)),
            _ => Ok(()),
        }
    }
}
