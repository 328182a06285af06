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
use std::ops::Not;
use strum::IntoEnumIterator;
use strum_macros::Display;
use strum_macros::EnumIter;

/// A piece of a specific color. Two materials are equal iff kind and
/// color match, which is the sameness the diff engine relies on.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Material {
    color: Color,
    piece: Piece,
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
        Self { color, piece }
    }

    #[inline]
    pub fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub fn piece(&self) -> Piece {
        self.piece
    }

    /// FEN symbol: uppercase for white, lowercase for black.
    #[inline]
    pub fn symbol(&self) -> char {
        let c = self.piece.symbol();
        match self.color {
            White => c.to_ascii_uppercase(),
            Black => c,
        }
    }

    #[inline]
    pub fn from_symbol(symbol: char) -> Option<Self> {
        let piece = Piece::from_symbol(symbol.to_ascii_lowercase())?;
        let color = if symbol.is_ascii_uppercase() { White } else { Black };
        Some(Self::new(color, piece))
    }

    /// All twelve materials, white first, in `K Q R B N P` order.
    pub fn all() -> impl Iterator<Item = Self> {
        Color::iter().flat_map(|color| {
            [King, Queen, Rook, Bishop, Knight, Pawn]
                .into_iter()
                .map(move |piece| Self::new(color, piece))
        })
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl TryFrom<char> for Material {
    type Error = char;

    fn try_from(value: char) -> Result<Self, Self::Error> {
        Self::from_symbol(value).ok_or(value)
    }
}

use Color::{Black, White};

#[derive(Debug, Serialize, Deserialize, Display, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Single-letter prefix used in theme property names.
    pub const fn letter(&self) -> char {
        match self {
            White => 'w',
            Black => 'b',
        }
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
    /// Lowercase FEN letter.
    pub const fn symbol(&self) -> char {
        match self {
            Pawn => 'p',
            Knight => 'n',
            Bishop => 'b',
            Rook => 'r',
            Queen => 'q',
            King => 'k',
        }
    }

    pub const fn from_symbol(c: char) -> Option<Self> {
        match c {
            'p' => Some(Pawn),
            'n' => Some(Knight),
            'b' => Some(Bishop),
            'r' => Some(Rook),
            'q' => Some(Queen),
            'k' => Some(King),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbols() {
        assert_eq!(Material::WK.symbol(), 'K');
        assert_eq!(Material::BN.symbol(), 'n');
        assert_eq!(Material::from_symbol('Q'), Some(Material::WQ));
        assert_eq!(Material::from_symbol('p'), Some(Material::BP));
        assert_eq!(Material::from_symbol('x'), None);
        assert_eq!(Material::from_symbol('1'), None);
        assert_eq!(Material::try_from('R'), Ok(Material::WR));
        assert_eq!(Material::try_from('z'), Err('z'));
    }

    #[test]
    fn test_all_materials() {
        let symbols: String = Material::all().map(|m| m.symbol()).collect();
        assert_eq!(symbols, "KQRBNPkqrbnp");
        for material in Material::all() {
            assert_eq!(Material::from_symbol(material.symbol()), Some(material));
        }
    }

    #[test]
    fn test_sameness_is_kind_and_color() {
        assert_eq!(Material::new(White, Pawn), Material::WP);
        assert_ne!(Material::WP, Material::BP);
        assert_ne!(Material::WP, Material::WN);
        assert_eq!(!White, Black);
    }
}
