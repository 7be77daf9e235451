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
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Index, IndexMut, Not};
use strum_macros::Display;
use strum_macros::EnumIter;

use super::position::{Pos, Position};
use super::square::{Offset, Square};

/// A piece of a specific color. Kings and rooks also remember whether
/// they have ever moved, which gates castling.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Material {
    color: Color,
    piece: Piece,
    moved: bool,
}

impl Material {
    pub const WK: Self = Self::new(White, King);
    pub const WQ: Self = Self::new(White, Queen);
    pub const WR: Self = Self::new(White, Rook);
    pub const WB: Self = Self::new(White, Bishop);
    pub const WN: Self = Self::new(White, Knight);
    pub const WP: Self = Self::new(White, Pawn);

    pub const BK: Self = Self::new(Black, King);
    pub const BQ: Self = Self::new(Black, Queen);
    pub const BR: Self = Self::new(Black, Rook);
    pub const BB: Self = Self::new(Black, Bishop);
    pub const BN: Self = Self::new(Black, Knight);
    pub const BP: Self = Self::new(Black, Pawn);

    #[inline]
    pub const fn new(color: Color, piece: Piece) -> Self {
        Self {
            color,
            piece,
            moved: false,
        }
    }

    #[inline]
    pub const fn white(piece: Piece) -> Self {
        Self::new(White, piece)
    }

    /// Reads a piece letter from an import record: uppercase is White,
    /// lowercase is Black.
    pub fn from_char(c: char) -> Option<Self> {
        let color = if c.is_ascii_uppercase() { White } else { Black };
        let piece = Piece::from_char(c)?;
        Some(Self::new(color, piece))
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn piece(&self) -> Piece {
        self.piece
    }

    #[inline]
    pub fn has_moved(&self) -> bool {
        self.moved
    }

    /// Records that this piece completed a move. Only kings and rooks
    /// track it.
    #[inline]
    pub fn set_moved(&mut self) {
        if matches!(self.piece, King | Rook) {
            self.moved = true;
        }
    }

    /// Symbol in import-record convention, `K` for a white king, `k` for a
    /// black one.
    pub fn symbol(&self) -> char {
        match self.color {
            White => self.piece.symbol(),
            Black => self.piece.symbol().to_ascii_lowercase(),
        }
    }

    /// Whether `from -> to` is a displacement this piece can make. Only pawns
    /// look at the board; sliding pieces still need a separate path check
    /// and nobody here checks `from != to` or that both squares are valid.
    pub fn is_valid_move(&self, from: Square, to: Square, pos: &Position) -> bool {
        let offset = to - from;
        match self.piece {
            Pawn => pawn_shape(self.color, from, to, pos),
            Knight => knight_shape(offset),
            Bishop => bishop_shape(offset),
            Rook => rook_shape(offset),
            Queen => bishop_shape(offset) || rook_shape(offset),
            King => king_shape(offset),
        }
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}'s {}", self.color, self.piece)
    }
}

fn knight_shape(offset: Offset) -> bool {
    matches!(offset.abs(), (2, 1) | (1, 2))
}

fn bishop_shape(offset: Offset) -> bool {
    let (rows, cols) = offset.abs();
    rows == cols
}

fn rook_shape(offset: Offset) -> bool {
    offset.rows == 0 || offset.cols == 0
}

fn king_shape(offset: Offset) -> bool {
    let (rows, cols) = offset.abs();
    rows <= 1 && cols <= 1 && rows + cols > 0
}

fn pawn_shape(color: Color, from: Square, to: Square, pos: &Position) -> bool {
    let offset = to - from;
    let (forward, start_row) = match color {
        White => (-1, 6),
        Black => (1, 1),
    };
    if offset.cols == 0 {
        if offset.rows == forward {
            return !pos.is_occupied(to);
        }
        if offset.rows == 2 * forward && from.row() == start_row {
            let skipped = Square::new(from.row() + forward, from.col());
            return !pos.is_occupied(to) && !pos.is_occupied(skipped);
        }
        return false;
    }
    // diagonal: capture shape only, the target may be empty or friendly
    offset.cols.abs() == 1 && offset.rows == forward
}

use Color::{Black, White};

#[derive(Debug, Serialize, Deserialize, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub const fn to_index(&self) -> usize {
        *self as usize
    }
}

impl Not for Color {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        match self {
            White => Black,
            Black => White,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pair<T>((T, T));

impl<T> Pair<T> {
    pub const fn new(white: T, black: T) -> Self {
        Self((white, black))
    }
}

impl<T> Pair<T> {
    pub fn white(&self) -> &T {
        &self.0 .0
    }
    pub fn white_mut(&mut self) -> &mut T {
        &mut self.0 .0
    }
    pub fn black(&self) -> &T {
        &self.0 .1
    }
    pub fn black_mut(&mut self) -> &mut T {
        &mut self.0 .1
    }
}

impl<T: Hash> Hash for Pair<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.white().hash(state);
        self.black().hash(state);
    }
}

impl<T> Index<Color> for Pair<T> {
    type Output = T;

    #[inline(always)]
    fn index(&self, index: Color) -> &Self::Output {
        match index {
            White => self.white(),
            Black => self.black(),
        }
    }
}

impl<T> IndexMut<Color> for Pair<T> {
    #[inline(always)]
    fn index_mut(&mut self, index: Color) -> &mut Self::Output {
        match index {
            White => self.white_mut(),
            Black => self.black_mut(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Piece {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}
use Piece::{Bishop, King, Knight, Pawn, Queen, Rook};

impl Piece {
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'p' => Some(Pawn),
            'n' => Some(Knight),
            'b' => Some(Bishop),
            'r' => Some(Rook),
            'q' => Some(Queen),
            'k' => Some(King),
            _ => None,
        }
    }

    pub const fn symbol(&self) -> char {
        const SYMBOLS: [char; 6] = ['P', 'N', 'B', 'R', 'Q', 'K'];
        SYMBOLS[*self as usize]
    }

    pub fn is_king(&self) -> bool {
        matches!(*self, King)
    }
    pub fn is_pawn(&self) -> bool {
        matches!(*self, Pawn)
    }
    /// Bishops, rooks and queens need a clear path to their destination.
    pub fn is_slider(&self) -> bool {
        matches!(*self, Bishop | Rook | Queen)
    }
}
