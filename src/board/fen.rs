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

use std::str::FromStr;
use thiserror::Error;

use super::castling::CastlingRights;
use super::material::{Color, Material, Pair};
use super::position::Position;
use super::square::Square;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportError {
    #[error("Invalid FEN string format.")]
    MissingField,
    #[error("Unknown piece '{0}' in FEN string.")]
    UnknownPiece(char),
    #[error("Rank {0} of the FEN string has more than 8 squares.")]
    RankOverflow(usize),
    #[error("FEN string has more than 8 ranks.")]
    TooManyRanks,
    #[error("Invalid active color in FEN string: {0:?}.")]
    ActiveColor(String),
}

impl Position {
    /// Reads a position from a FEN-style record: piece placement, active
    /// color and castling availability, separated by whitespace. Further
    /// fields such as the move counters are ignored.
    ///
    /// Castling letters are matched by presence only, so `-`, `KQkq` and
    /// `qK` are all accepted. Every imported piece starts unmoved.
    pub fn from_record(record: &str) -> Result<Self, ImportError> {
        let mut fields = record.split_whitespace();
        let (placement, active, castling) = match (fields.next(), fields.next(), fields.next()) {
            (Some(p), Some(a), Some(c)) => (p, a, c),
            _ => return Err(ImportError::MissingField),
        };
        let squares = read_placement(placement)?;
        let turn = match active {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(ImportError::ActiveColor(other.to_string())),
        };
        let castling = Pair::new(
            CastlingRights::new(Color::White, castling.contains('K'), castling.contains('Q')),
            CastlingRights::new(Color::Black, castling.contains('k'), castling.contains('q')),
        );
        Ok(Self::from_parts(squares, turn, castling))
    }
}

impl FromStr for Position {
    type Err = ImportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_record(s)
    }
}

fn read_placement(placement: &str) -> Result<Vec<Option<Material>>, ImportError> {
    let mut squares = vec![None; 64];
    let mut row: i8 = 0;
    let mut col: i8 = 0;
    for c in placement.chars() {
        match c {
            '/' => {
                row += 1;
                col = 0;
                if row > 7 {
                    return Err(ImportError::TooManyRanks);
                }
            }
            '0'..='9' => {
                col += (c as u8 - b'0') as i8;
                if col > 8 {
                    return Err(ImportError::RankOverflow(8 - row as usize));
                }
            }
            _ => {
                let material = Material::from_char(c).ok_or(ImportError::UnknownPiece(c))?;
                let index = Square::new(row, col)
                    .to_index()
                    .ok_or(ImportError::RankOverflow(8 - row as usize))?;
                squares[index] = Some(material);
                col += 1;
            }
        }
    }
    Ok(squares)
}
