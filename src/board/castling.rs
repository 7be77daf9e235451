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

use super::material::{Color, Pair, Piece};
use super::moves::{LegalMove, MoveError};
use super::position::{between, Pos, Position};
use super::square::{Mask, Square};

use MoveError::*;

const KING_FILE: i8 = 4;
const OO_ROOK_FILE: i8 = 7;
const OO_KING_FILE: i8 = 6;
const OO_ROOK_DEST_FILE: i8 = 5;
const OOO_ROOK_FILE: i8 = 0;
const OOO_KING_FILE: i8 = 2;
const OOO_ROOK_DEST_FILE: i8 = 3;

/// Castling availability for one side, as read from an import record and
/// kept current as kings and rooks leave their home squares.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastlingRights {
    color: Color,
    oo: bool,
    ooo: bool,
}

impl CastlingRights {
    pub fn new(color: Color, oo: bool, ooo: bool) -> Self {
        Self { color, oo, ooo }
    }
    /// Kingside castling still allowed.
    #[inline]
    pub fn oo(&self) -> bool {
        self.oo
    }
    /// Queenside castling still allowed.
    #[inline]
    pub fn ooo(&self) -> bool {
        self.ooo
    }
    #[inline]
    pub fn row(&self) -> i8 {
        match self.color {
            Color::White => 7,
            Color::Black => 0,
        }
    }
    #[inline]
    pub fn king_src(&self) -> Square {
        Square::new(self.row(), KING_FILE)
    }
    #[inline]
    pub fn oo_rook_src(&self) -> Square {
        Square::new(self.row(), OO_ROOK_FILE)
    }
    #[inline]
    pub fn oo_king_dest(&self) -> Square {
        Square::new(self.row(), OO_KING_FILE)
    }
    #[inline]
    pub fn oo_rook_dest(&self) -> Square {
        Square::new(self.row(), OO_ROOK_DEST_FILE)
    }
    #[inline]
    pub fn ooo_rook_src(&self) -> Square {
        Square::new(self.row(), OOO_ROOK_FILE)
    }
    #[inline]
    pub fn ooo_king_dest(&self) -> Square {
        Square::new(self.row(), OOO_KING_FILE)
    }
    #[inline]
    pub fn ooo_rook_dest(&self) -> Square {
        Square::new(self.row(), OOO_ROOK_DEST_FILE)
    }
    /// Squares the king crosses or lands on; all must be empty. The
    /// queenside rook may pass over an occupied b-file square.
    pub fn blocking_lane(&self, mv: LegalMove) -> Mask {
        self.king_lane(mv)
    }
    /// Squares the king crosses or lands on; none may be attacked.
    pub fn attacking_lane(&self, mv: LegalMove) -> Mask {
        self.king_lane(mv)
    }
    fn king_lane(&self, mv: LegalMove) -> Mask {
        match mv {
            LegalMove::ShortCastle => {
                between(self.king_src(), self.oo_king_dest()) | self.oo_king_dest().to_mask()
            }
            LegalMove::LongCastle => {
                between(self.ooo_king_dest(), self.king_src()) | self.ooo_king_dest().to_mask()
            }
            LegalMove::Standard(..) => Mask::empty(),
        }
    }
    /// Drops the rights tied to `square` once a piece leaves it or is
    /// captured on it.
    pub fn update(&mut self, square: Square) {
        if square == self.king_src() {
            self.clear();
        }
        if square == self.oo_rook_src() {
            self.oo = false;
        }
        if square == self.ooo_rook_src() {
            self.ooo = false;
        }
    }
    pub fn clear(&mut self) {
        self.oo = false;
        self.ooo = false;
    }
}

impl Default for Pair<CastlingRights> {
    fn default() -> Self {
        Pair::new(
            CastlingRights::new(Color::White, true, true),
            CastlingRights::new(Color::Black, true, true),
        )
    }
}

impl Position {
    /// Checks a two-column king move from `from` to `to`. On success the
    /// board is unchanged and the matching castle is returned.
    pub(super) fn validate_castle(&mut self, from: Square, to: Square) -> Result<LegalMove, MoveError> {
        let king = match *self.contents(from) {
            Some(material) if material.piece() == Piece::King => material,
            Some(material) => return Err(IllegalMove(material, to)),
            None => return Err(NoPiece(from)),
        };
        let color = king.color();
        let rights = *self.castling(color);
        let mv = if to.col() > from.col() {
            LegalMove::ShortCastle
        } else {
            LegalMove::LongCastle
        };
        let (king_dest, rook_src) = match mv {
            LegalMove::ShortCastle => (rights.oo_king_dest(), rights.oo_rook_src()),
            _ => (rights.ooo_king_dest(), rights.ooo_rook_src()),
        };
        if king.has_moved() {
            return Err(KingMoved);
        }
        if from != rights.king_src() || to != king_dest {
            return Err(IllegalMove(king, to));
        }
        match *self.contents(rook_src) {
            Some(rook) if rook.piece() == Piece::Rook && rook.color() == color => {
                if rook.has_moved() {
                    return Err(RookMoved);
                }
            }
            _ => return Err(RookMissing),
        }
        let available = match mv {
            LegalMove::ShortCastle => rights.oo(),
            _ => rights.ooo(),
        };
        if !available {
            return Err(CastlingUnavailable(color));
        }
        if self.is_king_in_check(color) {
            return Err(CastleInCheck);
        }
        if !rights.blocking_lane(mv).iter().all(|square| self.is_vacant(square)) {
            return Err(CastlingPathBlocked);
        }
        for square in rights.attacking_lane(mv).iter() {
            let trial = self.trial(from, square);
            if trial.is_king_in_check(color) {
                return Err(CastlingPathAttacked);
            }
        }
        Ok(mv)
    }

    /// Relocates king and rook for a castle already validated for `color`.
    pub(super) fn apply_castle(&mut self, color: Color, mv: LegalMove) {
        let rights = *self.castling(color);
        let (king_dest, rook_src, rook_dest) = match mv {
            LegalMove::ShortCastle => (
                rights.oo_king_dest(),
                rights.oo_rook_src(),
                rights.oo_rook_dest(),
            ),
            LegalMove::LongCastle => (
                rights.ooo_king_dest(),
                rights.ooo_rook_src(),
                rights.ooo_rook_dest(),
            ),
            LegalMove::Standard(..) => return,
        };
        if let Some(king) = self.remove(rights.king_src()) {
            self.place(king_dest, king);
        }
        if let Some(rook) = self.remove(rook_src) {
            self.place(rook_dest, rook);
        }
        self.mark_moved(king_dest);
        self.mark_moved(rook_dest);
        self.castling_mut(color).clear();
    }
}
