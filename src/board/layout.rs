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
use std::ops::{Add, Sub};

use super::square::{Orientation, Square};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn half(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub origin: Point,
    pub size: Size,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: Point::new(x, y),
            size: Size::new(width, height),
        }
    }
}

impl Square {
    /// Top-left pixel of the square relative to the board's top-left
    /// corner.
    pub fn pixel_offset(&self, square_size: Size, orientation: Orientation) -> Point {
        let (row, col) = self.row_col(orientation);
        Point::new(col as f64 * square_size.width, row as f64 * square_size.height)
    }
}

/// Where the board is drawn. `origin` is in the same coordinate space
/// as pointer events.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Geometry {
    pub origin: Point,
    pub size: Size,
}

impl Geometry {
    /// Fit a square board into `bounds`: its edge follows the width of
    /// the bounds, clamped to `min..=max`.
    pub fn fit(bounds: Rect, min: f64, max: Option<f64>) -> Self {
        let mut edge = bounds.size.width.round().max(min);
        if let Some(max) = max {
            edge = edge.min(max.max(min));
        }
        Self {
            origin: bounds.origin,
            size: Size::new(edge, edge),
        }
    }

    #[inline]
    pub fn square_size(&self) -> Size {
        Size::new(self.size.width / 8.0, self.size.height / 8.0)
    }

    /// Board-relative pixel of a pointer position.
    #[inline]
    pub fn local(&self, client: Point) -> Point {
        client - self.origin
    }

    /// Square under the pointer, or `None` outside the 8x8 grid.
    pub fn square_at(&self, client: Point, orientation: Orientation) -> Option<Square> {
        let square = self.square_size();
        if square.width <= 0.0 || square.height <= 0.0 {
            return None;
        }
        let local = self.local(client);
        let col = (local.x / square.width).floor();
        let row = (local.y / square.height).floor();
        if !(0.0..8.0).contains(&row) || !(0.0..8.0).contains(&col) {
            return None;
        }
        Some(Square::from_row_col(row as usize, col as usize, orientation))
    }
}

/// Geometry and orientation together: everything needed to turn a
/// square into pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct View {
    pub geometry: Geometry,
    pub orientation: Orientation,
}

impl View {
    pub fn new(geometry: Geometry, orientation: Orientation) -> Self {
        Self {
            geometry,
            orientation,
        }
    }

    #[inline]
    pub fn pixel(&self, square: Square) -> Point {
        square.pixel_offset(self.geometry.square_size(), self.orientation)
    }

    #[inline]
    pub fn square_at(&self, client: Point) -> Option<Square> {
        self.geometry.square_at(client, self.orientation)
    }
}
