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
use std::ops::{Add, BitOr, BitOrAssign, Sub};
use std::str::FromStr;

/// Coordinates of a single square. Row 0 is the eighth rank and column 0
/// is the a-file, so `A8` is `(0, 0)` and `H1` is `(7, 7)`.
///
/// A square built from malformed input is `Square::INVALID`; every query
/// on the board treats it as off-board.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Square {
    row: i8,
    col: i8,
}

impl Square {
    pub const INVALID: Self = Self { row: -1, col: -1 };

    #[inline]
    pub const fn new(row: i8, col: i8) -> Self {
        if row >= 0 && row < 8 && col >= 0 && col < 8 {
            Self { row, col }
        } else {
            Self::INVALID
        }
    }

    #[inline]
    pub const fn from_index(index: usize) -> Self {
        debug_assert!(index < 64);
        Self::new((index / 8) as i8, (index % 8) as i8)
    }

    /// Parses a file letter followed by a rank digit, e.g. `"E2"` or `"e2"`.
    pub fn parse(name: &str) -> Self {
        let mut chars = name.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(f), Some(r), None) => Self::try_from_chars(f, r).unwrap_or(Self::INVALID),
            _ => Self::INVALID,
        }
    }

    #[inline]
    pub fn try_from_chars(f: char, r: char) -> Option<Self> {
        let col = match f.to_ascii_uppercase() {
            c @ 'A'..='H' => (c as u8 - b'A') as i8,
            _ => return None,
        };
        let row = match r {
            c @ '1'..='8' => 8 - (c as u8 - b'0') as i8,
            _ => return None,
        };
        Some(Self::new(row, col))
    }

    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.row >= 0 && self.row < 8 && self.col >= 0 && self.col < 8
    }

    #[inline]
    pub const fn row(&self) -> i8 {
        self.row
    }

    #[inline]
    pub const fn col(&self) -> i8 {
        self.col
    }

    #[inline]
    pub fn to_index(&self) -> Option<usize> {
        if self.is_valid() {
            Some(self.row as usize * 8 + self.col as usize)
        } else {
            None
        }
    }

    #[inline]
    pub fn to_mask(&self) -> Mask {
        match self.to_index() {
            Some(index) => Mask::new(0x1 << (63 - index)),
            None => Mask::empty(),
        }
    }

    #[inline]
    pub fn file_char(&self) -> Option<char> {
        self.is_valid().then(|| (b'A' + self.col as u8) as char)
    }

    #[inline]
    pub fn rank_char(&self) -> Option<char> {
        self.is_valid().then(|| (b'8' - self.row as u8) as char)
    }

    /// All 64 squares in row-major order starting from `A8`.
    pub fn iter() -> impl DoubleEndedIterator<Item = Square> {
        (0..64).map(Square::from_index)
    }
}

impl Default for Square {
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.file_char(), self.rank_char()) {
            (Some(file), Some(rank)) => write!(f, "{}{}", file, rank),
            _ => write!(f, "invalid"),
        }
    }
}

impl FromStr for Square {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Offset {
    pub rows: i8,
    pub cols: i8,
}

impl Offset {
    pub const fn new(rows: i8, cols: i8) -> Self {
        Self { rows, cols }
    }

    /// Unit step toward the target if the offset is a straight line or a
    /// diagonal, `None` otherwise.
    pub fn to_unit(self) -> Option<Self> {
        let (rows, cols) = match (self.rows, self.cols) {
            (0, 0) => return None,
            (r, c) if r == 0 || c == 0 || r.abs() == c.abs() => (r.signum(), c.signum()),
            _ => return None,
        };
        Some(Self { rows, cols })
    }

    #[inline]
    pub fn abs(self) -> (i8, i8) {
        (self.rows.abs(), self.cols.abs())
    }
}

impl Add<Offset> for Square {
    type Output = Option<Square>;
    fn add(self, rhs: Offset) -> Self::Output {
        if !self.is_valid() {
            return None;
        }
        let square = Square::new(self.row + rhs.rows, self.col + rhs.cols);
        square.is_valid().then_some(square)
    }
}

impl Sub for Square {
    type Output = Offset;
    fn sub(self, rhs: Self) -> Self::Output {
        Offset::new(self.row - rhs.row, self.col - rhs.col)
    }
}

/// A set of squares, one bit per square.
#[derive(Clone, Serialize, Deserialize, Copy, PartialEq, Eq, Hash, Default)]
pub struct Mask(u64);

impl Mask {
    #[inline]
    pub const fn new(val: u64) -> Self {
        Self(val)
    }

    #[inline]
    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn from_squares<I>(squares: I) -> Self
    where
        I: IntoIterator<Item = Square>,
    {
        squares
            .into_iter()
            .map(|square| square.to_mask())
            .fold(Mask::empty(), |m1, m2| m1 | m2)
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    #[inline]
    pub fn contains(&self, square: Square) -> bool {
        (self.0 & square.to_mask().0) != 0
    }

    pub fn iter(&self) -> MaskIter {
        MaskIter(self.0)
    }
}

impl fmt::Debug for Mask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, square) in Square::iter().enumerate() {
            write!(f, "{}", if self.contains(square) { "#" } else { "." })?;
            if i % 8 == 7 {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

impl BitOr for Mask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Mask {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl BitOrAssign<Square> for Mask {
    fn bitor_assign(&mut self, rhs: Square) {
        self.0 |= rhs.to_mask().0;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaskIter(u64);

impl Iterator for MaskIter {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0 != 0 {
            let square = Square::from_index(self.0.leading_zeros() as usize);
            self.0 &= !square.to_mask().0;
            return Some(square);
        }
        None
    }
}

/// Named squares, `A8` through `H1`.
pub mod squares {
    use super::Square;

    macro_rules! rank {
        (@emit $row:expr; $col:expr; $name:ident) => {
            pub const $name: Square = Square::new($row, $col);
        };
        (@emit $row:expr; $col:expr; $name:ident, $($rest:ident),+) => {
            pub const $name: Square = Square::new($row, $col);
            rank!(@emit $row; $col + 1; $($rest),+);
        };
        ($row:expr; $($name:ident),+) => {
            rank!(@emit $row; 0; $($name),+);
        };
    }

    rank!(0; A8, B8, C8, D8, E8, F8, G8, H8);
    rank!(1; A7, B7, C7, D7, E7, F7, G7, H7);
    rank!(2; A6, B6, C6, D6, E6, F6, G6, H6);
    rank!(3; A5, B5, C5, D5, E5, F5, G5, H5);
    rank!(4; A4, B4, C4, D4, E4, F4, G4, H4);
    rank!(5; A3, B3, C3, D3, E3, F3, G3, H3);
    rank!(6; A2, B2, C2, D2, E2, F2, G2, H2);
    rank!(7; A1, B1, C1, D1, E1, F1, G1, H1);
}
