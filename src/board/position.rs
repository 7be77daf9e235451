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

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::ops::{Deref, Index};
use strum::IntoEnumIterator;

use super::castling::CastlingRights;
use super::material::{Color, Material, Pair, Piece};
use super::square::{Mask, Square};
use super::Turn;

use Color::*;
use Piece::*;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct Squares(Vec<Option<Material>>);

impl Squares {
    fn empty() -> Self {
        Self(vec![None; 64])
    }
}

impl Index<Square> for Squares {
    type Output = Option<Material>;
    fn index(&self, index: Square) -> &Self::Output {
        match index.to_index() {
            Some(i) => &self.0[i],
            None => &None,
        }
    }
}

/// The contents of the 64 squares together with the side to move and the
/// castling-availability flags read from an import record.
///
/// Cells own their pieces; capturing a piece drops it. Kings are looked up
/// by scanning, so a position with no king (or two) of one color is
/// representable and `king` simply reports the first one found.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    squares: Squares,
    turn: Color,
    castling: Pair<CastlingRights>,
}

impl Default for Position {
    fn default() -> Self {
        Self::standard()
    }
}

impl Position {
    /// An empty board, White to move, every castling flag set.
    pub fn empty() -> Self {
        Self {
            squares: Squares::empty(),
            turn: White,
            castling: Pair::default(),
        }
    }

    pub fn standard() -> Self {
        const BACK_RANK: [Piece; 8] = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];
        const PAWN_ROWS: Pair<i8> = Pair::new(6, 1);
        const BACK_ROWS: Pair<i8> = Pair::new(7, 0);
        let mut position = Self::empty();
        for color in Color::iter() {
            for (col, piece) in (0..).zip(BACK_RANK) {
                position.place(Square::new(PAWN_ROWS[color], col), Material::new(color, Pawn));
                position.place(Square::new(BACK_ROWS[color], col), Material::new(color, piece));
            }
        }
        position
    }

    pub(super) fn from_parts(
        squares: Vec<Option<Material>>,
        turn: Color,
        castling: Pair<CastlingRights>,
    ) -> Self {
        debug_assert!(squares.len() == 64);
        Self {
            squares: Squares(squares),
            turn,
            castling,
        }
    }

    #[inline]
    pub fn castling(&self, color: Color) -> &CastlingRights {
        &self.castling[color]
    }

    #[inline]
    pub(super) fn castling_mut(&mut self, color: Color) -> &mut CastlingRights {
        &mut self.castling[color]
    }

    #[inline]
    pub(super) fn pass_turn(&mut self) {
        self.turn = !self.turn;
    }

    /// Puts `material` on `square`, returning whatever was there.
    pub(super) fn place(&mut self, square: Square, material: Material) -> Option<Material> {
        let index = square.to_index()?;
        self.squares.0[index].replace(material)
    }

    pub(super) fn remove(&mut self, square: Square) -> Option<Material> {
        let index = square.to_index()?;
        self.squares.0[index].take()
    }

    /// Empties every square, leaving turn and castling flags alone.
    pub(super) fn clear_pieces(&mut self) {
        self.squares = Squares::empty();
    }

    pub(super) fn mark_moved(&mut self, square: Square) {
        if let Some(index) = square.to_index() {
            if let Some(material) = self.squares.0[index].as_mut() {
                material.set_moved();
            }
        }
    }

    /// Provisionally moves the piece on `from` to `to`. Dropping the returned
    /// guard puts both squares back; `Trial::commit` keeps the move.
    pub(super) fn trial(&mut self, from: Square, to: Square) -> Trial<'_> {
        Trial::new(self, from, to)
    }

    /// Whether every square strictly between `from` and `to` is empty.
    /// Only meaningful for squares on a common line or diagonal; any other
    /// pair has nothing between it and is reported clear.
    pub fn is_path_clear(&self, from: Square, to: Square) -> bool {
        between(from, to).iter().all(|square| self.is_vacant(square))
    }
}

impl Turn for Position {
    #[inline]
    fn turn(&self) -> Color {
        self.turn
    }
}

impl Index<Square> for Position {
    type Output = Option<Material>;
    #[inline]
    fn index(&self, index: Square) -> &Self::Output {
        &self.squares[index]
    }
}

impl AsRef<Self> for Position {
    fn as_ref(&self) -> &Self {
        self
    }
}

impl Pos for Position {}

/// Read-only queries over anything holding a position.
pub trait Pos: Turn + AsRef<Position> {
    #[inline]
    fn contents(&self, square: Square) -> &Option<Material> {
        let pos: &Position = self.as_ref();
        &pos.squares[square]
    }
    #[inline]
    fn is_vacant(&self, square: Square) -> bool {
        self.contents(square).is_none()
    }
    #[inline]
    fn is_occupied(&self, square: Square) -> bool {
        self.contents(square).is_some()
    }
    #[inline]
    fn occupied_by(&self, color: Color) -> Mask {
        Mask::from_squares(
            Square::iter().filter(|&sq| matches!(self.contents(sq), Some(m) if m.color() == color)),
        )
    }
    #[inline]
    fn occupied(&self) -> Mask {
        self.occupied_by(White) | self.occupied_by(Black)
    }
    /// First king of `color` in scan order (`A8`, `B8`, ... `H1`).
    fn king(&self, color: Color) -> Option<Square> {
        Square::iter().find(|&sq| {
            matches!(self.contents(sq), Some(m) if m.piece() == King && m.color() == color)
        })
    }
}

pub(super) struct Trial<'a> {
    pos: &'a mut Position,
    from: Square,
    to: Square,
    moving: Option<Material>,
    captured: Option<Material>,
    committed: bool,
}

impl<'a> Trial<'a> {
    fn new(pos: &'a mut Position, from: Square, to: Square) -> Self {
        let moving = pos.remove(from);
        let captured = match moving {
            Some(material) => pos.place(to, material),
            None => None,
        };
        Self {
            pos,
            from,
            to,
            moving,
            captured,
            committed: false,
        }
    }

    /// Keeps the move and hands back the captured piece, if any.
    pub(super) fn commit(mut self) -> Option<Material> {
        self.committed = true;
        self.captured.take()
    }
}

impl Deref for Trial<'_> {
    type Target = Position;
    fn deref(&self) -> &Self::Target {
        &*self.pos
    }
}

impl Drop for Trial<'_> {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        if let Some(material) = self.moving {
            self.pos.remove(self.to);
            self.pos.place(self.from, material);
            if let Some(captured) = self.captured.take() {
                self.pos.place(self.to, captured);
            }
        }
    }
}

#[inline]
pub(super) fn between(from: Square, to: Square) -> Mask {
    match (from.to_index(), to.to_index()) {
        (Some(from), Some(to)) => SQUARES_BETWEEN[from * 64 + to],
        _ => Mask::empty(),
    }
}

static SQUARES_BETWEEN: Lazy<Vec<Mask>> = Lazy::new(|| {
    // Squares between `start` and `end` (exclusive of both) if they are on
    // a common line, otherwise an empty mask.
    fn squares_between(start: Square, end: Square) -> Mask {
        let mut mask = Mask::empty();
        if let Some(step) = (end - start).to_unit() {
            let mut next = start + step;
            while let Some(square) = next {
                if square == end {
                    break;
                }
                mask |= square;
                next = square + step;
            }
        }
        mask
    }

    let mut table = vec![Mask::empty(); 64 * 64];
    for start in Square::iter() {
        for end in Square::iter() {
            if let (Some(s), Some(e)) = (start.to_index(), end.to_index()) {
                table[s * 64 + e] = squares_between(start, end);
            }
        }
    }
    table
});

#[cfg(test)]
impl Position {
    pub fn set_contents(mut self, square: Square, value: Option<Material>) -> Self {
        match value {
            Some(material) => {
                self.place(square, material);
            }
            None => {
                self.remove(square);
            }
        }
        self
    }
    pub fn set_turn(mut self, turn: Color) -> Self {
        self.turn = turn;
        self
    }
    pub fn clear_castling(mut self, color: Color) -> Self {
        self.castling[color].clear();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::squares::*;

    #[test]
    fn test_standard_layout() {
        let pos = Position::standard();
        assert_eq!(pos[E1], Some(Material::WK));
        assert_eq!(pos[D8], Some(Material::BQ));
        assert_eq!(pos[A1], Some(Material::WR));
        assert_eq!(pos[G8], Some(Material::BN));
        assert_eq!(pos[C2], Some(Material::WP));
        assert_eq!(pos[F7], Some(Material::BP));
        assert_eq!(pos[E4], None);
        assert_eq!(pos.occupied().len(), 32);
        assert_eq!(pos.turn(), White);
    }
    #[test]
    fn test_invalid_square_is_empty() {
        let pos = Position::standard();
        assert_eq!(pos[Square::INVALID], None);
        assert!(!pos.is_occupied(Square::INVALID));
    }
    #[test]
    fn test_between_a3_and_e3() {
        let mask = between(A3, E3);
        assert_eq!(mask.len(), 3);
        assert!(!mask.contains(A3));
        assert!(mask.contains(B3));
        assert!(mask.contains(C3));
        assert!(mask.contains(D3));
        assert!(!mask.contains(E3));
    }
    #[test]
    fn test_between_c2_and_c8() {
        let mask = between(C2, C8);
        assert_eq!(mask.len(), 5);
        assert!(!mask.contains(C2));
        assert!(mask.contains(C3));
        assert!(mask.contains(C7));
        assert!(!mask.contains(C8));
    }
    #[test]
    fn test_between_h3_and_f5() {
        let mask = between(H3, F5);
        assert_eq!(mask.len(), 1);
        assert!(mask.contains(G4));
    }
    #[test]
    fn test_between_adjacent_and_unaligned() {
        assert!(between(G4, F5).is_empty());
        assert!(between(A1, H5).is_empty());
        assert!(between(A1, Square::INVALID).is_empty());
    }
    #[test]
    fn test_path_clear() {
        let pos = Position::empty().set_contents(A4, Some(Material::BP));
        assert!(pos.is_path_clear(A1, A4));
        assert!(!pos.is_path_clear(A1, A8));
        assert!(pos.is_path_clear(A1, H8));
    }
    #[test]
    fn test_king_lookup() {
        let pos = Position::standard();
        assert_eq!(pos.king(White), Some(E1));
        assert_eq!(pos.king(Black), Some(E8));
        assert_eq!(Position::empty().king(White), None);
    }
    #[test]
    fn test_king_lookup_takes_first_in_scan_order() {
        let pos = Position::empty()
            .set_contents(C3, Some(Material::WK))
            .set_contents(F6, Some(Material::WK));
        assert_eq!(pos.king(White), Some(F6));
    }
    #[test]
    fn test_trial_reverts_on_drop() {
        let mut pos = Position::standard().set_contents(D7, Some(Material::WN));
        let before = pos.clone();
        {
            let trial = pos.trial(D7, E8);
            assert_eq!(trial[E8], Some(Material::WN));
            assert_eq!(trial[D7], None);
        }
        assert_eq!(pos, before);
    }
    #[test]
    fn test_trial_commit_keeps_move() {
        let mut pos = Position::standard().set_contents(D7, Some(Material::WN));
        let captured = pos.trial(D7, E8).commit();
        assert_eq!(captured, Some(Material::BK));
        assert_eq!(pos[E8], Some(Material::WN));
        assert_eq!(pos[D7], None);
    }
    #[test]
    fn test_clear_pieces_keeps_turn() {
        let mut pos = Position::standard().set_turn(Black);
        pos.clear_pieces();
        assert!(pos.occupied().is_empty());
        assert_eq!(pos.turn(), Black);
    }
    #[test]
    fn test_trial_from_empty_square_is_noop() {
        let mut pos = Position::standard();
        let before = pos.clone();
        drop(pos.trial(E4, E5));
        assert_eq!(pos, before);
    }
}
