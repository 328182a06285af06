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
use std::str::FromStr;
use strum_macros::{Display, EnumIter};
use thiserror::Error;

use super::material::Color;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SquareError {
    #[error("Not a square: {0:?} (expecting a1..h8)")]
    Invalid(String),
}

/// Which side is drawn at the bottom of the board.
#[derive(Debug, Serialize, Deserialize, Display, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Orientation {
    #[default]
    White,
    Black,
}

impl Not for Orientation {
    type Output = Self;

    #[inline]
    fn not(self) -> Self {
        match self {
            Orientation::White => Orientation::Black,
            Orientation::Black => Orientation::White,
        }
    }
}

impl From<Color> for Orientation {
    fn from(value: Color) -> Self {
        match value {
            Color::White => Orientation::White,
            Color::Black => Orientation::Black,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Shade {
    Light,
    Dark,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
pub enum Square {
    A8, B8, C8, D8, E8, F8, G8, H8,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A1, B1, C1, D1, E1, F1, G1, H1,
}

use Square::{
    A8, B8, C8, D8, E8, F8, G8, H8,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A1, B1, C1, D1, E1, F1, G1, H1,
};

impl Square {
    #[inline]
    pub const fn new(file: File, rank: Rank) -> Self {
        Self::from_index(rank.to_index() * 8 + file.to_index())
    }

    /// Square at `index` in canonical order (a8, b8, .., h1).
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        const VALUES: [Square; 64] = [
            A8, B8, C8, D8, E8, F8, G8, H8,
            A7, B7, C7, D7, E7, F7, G7, H7,
            A6, B6, C6, D6, E6, F6, G6, H6,
            A5, B5, C5, D5, E5, F5, G5, H5,
            A4, B4, C4, D4, E4, F4, G4, H4,
            A3, B3, C3, D3, E3, F3, G3, H3,
            A2, B2, C2, D2, E2, F2, G2, H2,
            A1, B1, C1, D1, E1, F1, G1, H1,
        ];
        debug_assert!(index < 64);
        VALUES[index]
    }
    #[inline]
    pub fn try_from_string(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        let f = chars.next()?;
        let r = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        Self::try_from_chars(f, r)
    }
    #[inline]
    pub fn try_from_chars(f: char, r: char) -> Option<Self> {
        let file = File::try_from_char(f)?;
        let rank = Rank::try_from_char(r)?;
        Some(Self::new(file, rank))
    }

    #[inline]
    pub const fn to_index(&self) -> usize {
        *self as usize
    }
    #[inline]
    pub const fn file_index(&self) -> usize {
        self.to_index() % 8
    }
    #[inline]
    pub const fn rank_index(&self) -> usize {
        self.to_index() / 8
    }
    #[inline]
    pub const fn file(&self) -> File {
        File::from_index(self.file_index())
    }
    #[inline]
    pub const fn rank(&self) -> Rank {
        Rank::from_index(self.rank_index())
    }

    /// Row and column of the square as drawn. Row 0 is the top edge
    /// and column 0 the left edge of the rendered board.
    #[inline]
    pub const fn row_col(&self, orientation: Orientation) -> (usize, usize) {
        match orientation {
            Orientation::White => (self.rank_index(), self.file_index()),
            Orientation::Black => (7 - self.rank_index(), 7 - self.file_index()),
        }
    }

    #[inline]
    pub const fn from_row_col(row: usize, col: usize, orientation: Orientation) -> Self {
        debug_assert!(row < 8 && col < 8);
        match orientation {
            Orientation::White => Self::from_index(row * 8 + col),
            Orientation::Black => Self::from_index(63 - (row * 8 + col)),
        }
    }

    /// Linear index in display order: 0 is the top-left square as drawn.
    #[inline]
    pub const fn index_in(&self, orientation: Orientation) -> usize {
        let (row, col) = self.row_col(orientation);
        row * 8 + col
    }

    #[inline]
    pub const fn from_index_in(index: usize, orientation: Orientation) -> Self {
        Self::from_row_col(index / 8, index % 8, orientation)
    }

    #[inline]
    pub const fn shade(&self, orientation: Orientation) -> Shade {
        let (row, col) = self.row_col(orientation);
        if (row + col) % 2 == 0 {
            Shade::Light
        } else {
            Shade::Dark
        }
    }

    /// Displacement from `self` to `dest` as drawn: `x` counts columns,
    /// `y` counts rows.
    #[inline]
    pub fn delta(&self, dest: Square, orientation: Orientation) -> Offset {
        let (src_row, src_col) = self.row_col(orientation);
        let (dest_row, dest_col) = dest.row_col(orientation);
        Offset::new(
            dest_col as isize - src_col as isize,
            dest_row as isize - src_row as isize,
        )
    }

    /// Chebyshev distance between the drawn squares.
    #[inline]
    pub fn distance(&self, dest: Square, orientation: Orientation) -> usize {
        self.delta(dest, orientation).chebyshev()
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl FromStr for Square {
    type Err = SquareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from_string(s).ok_or_else(|| SquareError::Invalid(s.to_string()))
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
pub enum File {
    FileA, FileB, FileC, FileD, FileE, FileF, FileG, FileH,
}

use File::{
    FileA, FileB, FileC, FileD, FileE, FileF, FileG, FileH,
};

impl File {
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        const VALUES: [File; 8] = [
            FileA, FileB, FileC, FileD, FileE, FileF, FileG, FileH,
        ];
        debug_assert!(index < 8);
        VALUES[index]
    }
    #[inline]
    pub const fn try_from_char(c: char) -> Option<Self> {
        match c {
            'a' | 'A' => Some(FileA),
            'b' | 'B' => Some(FileB),
            'c' | 'C' => Some(FileC),
            'd' | 'D' => Some(FileD),
            'e' | 'E' => Some(FileE),
            'f' | 'F' => Some(FileF),
            'g' | 'G' => Some(FileG),
            'h' | 'H' => Some(FileH),
            _ => None,
        }
    }

    #[inline]
    pub const fn to_index(&self) -> usize {
        *self as usize
    }
    #[inline]
    pub const fn to_char(&self) -> char {
        const VALUES: [char; 8] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];
        VALUES[self.to_index()]
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
pub enum Rank {
    Rank8, Rank7, Rank6, Rank5, Rank4, Rank3, Rank2, Rank1,
}

use Rank::{
    Rank8, Rank7, Rank6, Rank5, Rank4, Rank3, Rank2, Rank1,
};

impl Rank {
    #[inline]
    pub const fn from_index(index: usize) -> Self {
        const VALUES: [Rank; 8] = [
            Rank8, Rank7, Rank6, Rank5, Rank4, Rank3, Rank2, Rank1,
        ];
        debug_assert!(index < 8);
        VALUES[index]
    }
    #[inline]
    pub fn try_from_char(c: char) -> Option<Self> {
        match c {
            '1' => Some(Rank1),
            '2' => Some(Rank2),
            '3' => Some(Rank3),
            '4' => Some(Rank4),
            '5' => Some(Rank5),
            '6' => Some(Rank6),
            '7' => Some(Rank7),
            '8' => Some(Rank8),
            _ => None,
        }
    }
    #[inline]
    pub const fn to_index(&self) -> usize {
        *self as usize
    }
    #[inline]
    pub const fn to_char(&self) -> char {
        const VALUES: [char; 8] = ['8', '7', '6', '5', '4', '3', '2', '1'];
        VALUES[self.to_index()]
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Offset {
    pub x: isize,
    pub y: isize,
}

impl Offset {
    pub const fn new(x: isize, y: isize) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn chebyshev(&self) -> usize {
        self.x.unsigned_abs().max(self.y.unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    use Orientation::{Black, White};

    #[test]
    fn test_row_col_white() {
        assert_eq!(A8.row_col(White), (0, 0));
        assert_eq!(H8.row_col(White), (0, 7));
        assert_eq!(A1.row_col(White), (7, 0));
        assert_eq!(E4.row_col(White), (4, 4));
    }

    #[test]
    fn test_row_col_black() {
        assert_eq!(H1.row_col(Black), (0, 0));
        assert_eq!(A1.row_col(Black), (0, 7));
        assert_eq!(A8.row_col(Black), (7, 7));
        assert_eq!(E4.row_col(Black), (3, 3));
    }

    #[test]
    fn test_row_col_bijection() {
        for orientation in Orientation::iter() {
            for square in Square::iter() {
                let (row, col) = square.row_col(orientation);
                assert_eq!(Square::from_row_col(row, col, orientation), square);
                let index = square.index_in(orientation);
                assert_eq!(Square::from_index_in(index, orientation), square);
            }
        }
    }

    #[test]
    fn test_index_in() {
        assert_eq!(A8.index_in(White), 0);
        assert_eq!(H1.index_in(White), 63);
        assert_eq!(H1.index_in(Black), 0);
        assert_eq!(A8.index_in(Black), 63);
        assert_eq!(E2.index_in(Black), 11);
    }

    #[test]
    fn test_rank_file() {
        assert_eq!(E4.file(), FileE);
        assert_eq!(E4.rank(), Rank4);
        assert_eq!(Square::new(FileC, Rank7), C7);
        for square in Square::iter() {
            assert_eq!(Square::new(square.file(), square.rank()), square);
        }
    }

    #[test]
    fn test_parse_and_display() {
        assert_eq!("e4".parse::<Square>().unwrap(), E4);
        assert_eq!("H8".parse::<Square>().unwrap(), H8);
        assert!("i1".parse::<Square>().is_err());
        assert!("a9".parse::<Square>().is_err());
        assert!("a10".parse::<Square>().is_err());
        assert!("".parse::<Square>().is_err());
        assert_eq!(E4.to_string(), "e4");
        for square in Square::iter() {
            assert_eq!(square.to_string().parse::<Square>().unwrap(), square);
        }
    }

    #[test]
    fn test_shade() {
        assert_eq!(A8.shade(White), Shade::Light);
        assert_eq!(A1.shade(White), Shade::Dark);
        assert_eq!(H1.shade(White), Shade::Light);
        assert_eq!(H1.shade(Black), Shade::Light);
        assert_eq!(B8.shade(White), Shade::Dark);
    }

    #[test]
    fn test_delta() {
        assert_eq!(A8.delta(A1, White), Offset::new(0, 7));
        assert_eq!(E4.delta(D5, White), Offset::new(-1, -1));
        assert_eq!(A8.delta(H8, Black), Offset::new(-7, 0));
        assert_eq!(B2.delta(F6, Black), Offset::new(-4, 4));
        assert_eq!(G3.delta(B5, Black), Offset::new(5, 2));
    }

    #[test]
    fn test_distance() {
        for orientation in Orientation::iter() {
            assert_eq!(A8.distance(A1, orientation), 7);
            assert_eq!(A1.distance(H8, orientation), 7);
            assert_eq!(E4.distance(D5, orientation), 1);
            assert_eq!(B2.distance(F6, orientation), 4);
            assert_eq!(G3.distance(B5, orientation), 5);
            assert_eq!(E4.distance(E4, orientation), 0);
        }
    }

    #[test]
    fn test_orientation_flip() {
        assert_eq!(!White, Black);
        assert_eq!(!!White, White);
        assert_eq!(White.to_string(), "white");
        assert_eq!(Orientation::from(Color::Black), Black);
    }
}
