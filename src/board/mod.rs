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

//! Chess referee for standard chess
//!
//! A _board_ holds a single game of chess between two local players,
//! decides whether each submitted move is legal, applies it and reports
//! check, checkmate and stalemate. The following features are supported:
//!
//! [x] Standard piece movement, captures and castling
//! [x] Self-check rejection
//! [x] Check, checkmate and stalemate detection
//! [x] Importing a position from a FEN-style record
//! [ ] Pawn promotion
//! [ ] En passant
//! [ ] Move history, take backs, repetition and fifty-move rules
//!
//! Some of the key abstractions include:
//!
//! * A `Square` represents the coordinates for a single square on an
//!   8-by-8 board. Row 0 is the eighth rank and column 0 is the a-file.
//!   Squares are named by file letter and rank digit (`A8` .. `H1`) and
//!   `Square::parse` reads that form back; anything malformed becomes
//!   `Square::INVALID`.
//!
//! * A `Mask` is a 64-bit (u64) value in which each bit maps to a
//!   square on the board, used for sets of squares such as the legal
//!   destinations of a piece.
//!
//! * `Material` represents a piece of a specific color. A `Piece` has
//!   six variants: `King`, `Queen`, `Rook`, `Bishop`, `Knight` and `Pawn`.
//!   `Color` is either `White` or `Black`. Kings and rooks carry a moved
//!   flag that gates castling.
//!
//! * A `Position` holds the contents of each square, whose turn it is and
//!   the castling-availability flags. It validates moves, applies them and
//!   answers check, checkmate and stalemate queries. Every search that
//!   needs to look one move ahead does so through a scoped trial move that
//!   puts the board back when it goes out of scope.
//!
//! * A `Board` is the session a caller drives: it loads positions,
//!   accepts moves as position tokens, records the game result and keeps
//!   a transcript of human-readable diagnostics.
//!

mod castling;
mod fen;
mod material;
mod moves;
mod play;
mod position;
mod square;

pub use castling::*;
pub use fen::*;
pub use material::*;
pub use moves::*;
pub use play::*;
pub use position::*;
pub use square::*;

pub trait Turn {
    fn turn(&self) -> Color;
}
