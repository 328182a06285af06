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
use once_cell::sync::Lazy;
#[cfg(feature = "random")]
use rand::{thread_rng, Rng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicU64, Ordering};
use strum::IntoEnumIterator;
use thiserror::Error;

use super::material::Material;
use super::square::{File, Orientation, Square};

pub const FEN_EMPTY: &str = "8/8/8/8/8/8/8/8";
pub const FEN_START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FenError {
    #[error("FEN has no piece placement field")]
    Empty,
    #[error("Expecting 8 ranks in piece placement, found {0}")]
    RankCount(usize),
    #[error("Rank {rank} describes {files} files (expecting 8)")]
    RankLength { rank: usize, files: usize },
    #[error("Unknown piece symbol {0:?}")]
    UnknownSymbol(char),
    #[error("Empty-square run {0:?} is out of range (expecting 1..8)")]
    BadDigit(char),
}

/// Opaque identity of one piece instance, used to keep a visual
/// element attached to a piece while it slides between squares.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PieceId(u64);

static NEXT_ID: AtomicU64 = AtomicU64::new(0);

static SALT: Lazy<u64> = Lazy::new(|| {
    #[cfg(feature = "random")]
    {
        thread_rng().gen()
    }
    #[cfg(not(feature = "random"))]
    {
        0
    }
});

impl PieceId {
    /// Mint an id that is unique for the lifetime of the process.
    pub fn mint() -> Self {
        let n = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        Self(SALT.wrapping_add(n))
    }
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// A material placed on the board, together with its identity.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Figure {
    id: PieceId,
    material: Material,
}

impl Figure {
    /// A new piece instance with a freshly minted id.
    pub fn new(material: Material) -> Self {
        Self::with_id(PieceId::mint(), material)
    }
    pub const fn with_id(id: PieceId, material: Material) -> Self {
        Self { id, material }
    }
    #[inline]
    pub fn id(&self) -> PieceId {
        self.id
    }
    #[inline]
    pub fn material(&self) -> Material {
        self.material
    }
    /// Same kind and color. Identity is ignored.
    #[inline]
    pub fn same(&self, other: &Figure) -> bool {
        self.material == other.material
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Squares([Option<Figure>; 64]);

impl Squares {
    fn empty() -> Self {
        Self([None; 64])
    }
}

impl Index<Square> for Squares {
    type Output = Option<Figure>;
    fn index(&self, index: Square) -> &Self::Output {
        &self.0[index.to_index()]
    }
}

impl IndexMut<Square> for Squares {
    fn index_mut(&mut self, index: Square) -> &mut Self::Output {
        &mut self.0[index.to_index()]
    }
}

/// Where pieces are: at most one figure per square. Positions are
/// plain values; every edit happens on a copy the caller owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    squares: Squares,
}

impl Serialize for Position {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.iter())
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let placed = Vec::<(Square, Figure)>::deserialize(deserializer)?;
        Ok(placed.into_iter().collect())
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::empty()
    }
}

impl Position {
    pub fn empty() -> Self {
        Self {
            squares: Squares::empty(),
        }
    }

    pub fn start() -> Self {
        // The start position is a compile-time constant; parsing it
        // cannot fail.
        Self::from_fen(FEN_START).unwrap_or_default()
    }

    /// Parse the piece placement field of `fen`. Trailing fields (side
    /// to move, castling, ..) are accepted and ignored. Every placed
    /// piece gets a freshly minted id.
    ///
    /// # Errors
    ///
    /// Returns `FenError` if the placement does not describe exactly 8
    /// ranks of 8 files or contains an unknown symbol.
    pub fn from_fen(fen: &str) -> Result<Self> {
        let placement = fen.split_whitespace().next().ok_or(FenError::Empty)?;
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::RankCount(ranks.len()).into());
        }
        let mut position = Self::empty();
        for (row, rank) in ranks.iter().enumerate() {
            let mut col = 0;
            for c in rank.chars() {
                if let Some(run) = c.to_digit(10) {
                    if !(1..=8).contains(&run) {
                        return Err(FenError::BadDigit(c).into());
                    }
                    col += run as usize;
                } else {
                    let material = Material::from_symbol(c).ok_or(FenError::UnknownSymbol(c))?;
                    if col < 8 {
                        let square = Square::from_row_col(row, col, Orientation::White);
                        position.squares[square] = Some(Figure::new(material));
                    }
                    col += 1;
                }
            }
            if col != 8 {
                return Err(FenError::RankLength {
                    rank: 8 - row,
                    files: col,
                }
                .into());
            }
        }
        Ok(position)
    }

    /// Piece placement field only.
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();
        let mut empty = 0;
        for square in Square::iter() {
            match self.squares[square] {
                Some(figure) => {
                    if empty > 0 {
                        fen.push_str(&empty.to_string());
                        empty = 0;
                    }
                    fen.push(figure.material().symbol());
                }
                None => empty += 1,
            }
            if square.file() == File::FileH {
                if empty > 0 {
                    fen.push_str(&empty.to_string());
                    empty = 0;
                }
                if square != Square::H1 {
                    fen.push('/');
                }
            }
        }
        fen
    }

    /// Bordered ASCII rendering with rank labels on the left and file
    /// labels below, both following `orientation`.
    pub fn print(&self, orientation: Orientation) -> String {
        const BORDER: &str = "+------------------------+";
        let mut s = format!("   {BORDER}\n");
        for row in 0..8 {
            let first = Square::from_row_col(row, 0, orientation);
            s.push_str(&format!(" {} |", first.rank()));
            for col in 0..8 {
                let square = Square::from_row_col(row, col, orientation);
                let symbol = self.squares[square].map_or('-', |f| f.material().symbol());
                s.push_str(&format!(" {symbol} "));
            }
            s.push_str("| \n");
        }
        s.push_str(&format!("   {BORDER}\n"));
        let files: Vec<String> = (0..8)
            .map(|col| Square::from_row_col(0, col, orientation).file().to_string())
            .collect();
        s.push_str("     ");
        s.push_str(&files.join("  "));
        s
    }

    #[inline]
    pub fn get(&self, square: Square) -> Option<Figure> {
        self.squares[square]
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn len(&self) -> usize {
        self.squares.0.iter().filter(|s| s.is_some()).count()
    }

    /// Occupied squares in canonical order (a8, b8, .., h1).
    pub fn iter(&self) -> impl Iterator<Item = (Square, Figure)> + '_ {
        Square::iter().filter_map(|square| self.squares[square].map(|f| (square, f)))
    }

    /// Square currently holding the piece with identity `id`.
    pub fn find(&self, id: PieceId) -> Option<Square> {
        self.iter()
            .find(|(_, figure)| figure.id() == id)
            .map(|(square, _)| square)
    }

    pub fn place(&mut self, square: Square, figure: Figure) -> Option<Figure> {
        self.squares[square].replace(figure)
    }

    pub fn remove(&mut self, square: Square) -> Option<Figure> {
        self.squares[square].take()
    }

    /// Move whatever stands on `from` to `to`, keeping its identity.
    /// Returns false when `from` is empty.
    pub fn relocate(&mut self, from: Square, to: Square) -> bool {
        match self.remove(from) {
            Some(figure) => {
                self.place(to, figure);
                true
            }
            None => false,
        }
    }

    /// Same materials on the same squares, identities ignored.
    pub fn same_placement(&self, other: &Position) -> bool {
        Square::iter().all(|square| {
            self.squares[square].map(|f| f.material()) == other.squares[square].map(|f| f.material())
        })
    }

    pub fn squares(&self) -> &Squares {
        &self.squares
    }
}

impl Index<Square> for Position {
    type Output = Option<Figure>;
    fn index(&self, index: Square) -> &Self::Output {
        &self.squares[index]
    }
}

impl FromIterator<(Square, Figure)> for Position {
    fn from_iter<T: IntoIterator<Item = (Square, Figure)>>(iter: T) -> Self {
        let mut position = Self::empty();
        for (square, figure) in iter {
            position.place(square, figure);
        }
        position
    }
}

#[cfg(test)]
impl Position {
    pub fn set_contents(mut self, square: Square, value: Option<Material>) -> Self {
        self.squares[square] = value.map(Figure::new);
        self
    }

    /// `count` pieces of random material on distinct random squares.
    #[cfg(feature = "random")]
    pub fn random<R: rand::Rng>(rng: &mut R, count: usize) -> Self {
        use rand::seq::SliceRandom;
        let materials: Vec<Material> = Material::all().collect();
        let mut squares: Vec<Square> = Square::iter().collect();
        squares.shuffle(rng);
        squares
            .into_iter()
            .take(count)
            .filter_map(|square| materials.choose(rng).map(|m| (square, Figure::new(*m))))
            .collect()
    }
}
