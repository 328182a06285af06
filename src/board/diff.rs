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
use strum::IntoEnumIterator;

use super::position::{Figure, Position};
use super::square::{Orientation, Square};

/// One semantic edit between two positions.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Change {
    Add { square: Square, figure: Figure },
    Remove { square: Square, figure: Figure },
    /// `figure` carries the identity the piece had on `from`.
    Move { from: Square, to: Square, figure: Figure },
}

impl Change {
    #[inline]
    pub fn figure(&self) -> Figure {
        match *self {
            Change::Add { figure, .. } | Change::Remove { figure, .. } | Change::Move { figure, .. } => {
                figure
            }
        }
    }

    #[inline]
    pub fn is_move(&self) -> bool {
        matches!(self, Change::Move { .. })
    }

    #[inline]
    pub fn is_add(&self) -> bool {
        matches!(self, Change::Add { .. })
    }

    #[inline]
    pub fn is_remove(&self) -> bool {
        matches!(self, Change::Remove { .. })
    }
}

/// Computes the changes that turn `before` into `after`.
///
/// Squares are compared by material only. Every removed piece is then
/// paired with the nearest added piece of the same material (Chebyshev
/// distance as drawn in `orientation`, first candidate in canonical
/// order wins a tie) and the pair becomes a `Move`. The pairing is
/// greedy: removed squares are visited in canonical order and each one
/// takes its nearest candidate before the next is considered.
///
/// The result lists every `Move` (in pairing order), then every `Add`,
/// then every `Remove`, the latter two in canonical square order.
pub fn diff(before: &Position, after: &Position, orientation: Orientation) -> Vec<Change> {
    let mut added: Vec<(Square, Figure)> = Vec::new();
    let mut removed: Vec<(Square, Figure)> = Vec::new();

    for square in Square::iter() {
        let (prev, next) = (before[square], after[square]);
        if prev.map(|f| f.material()) != next.map(|f| f.material()) {
            if let Some(figure) = next {
                added.push((square, figure));
            }
            if let Some(figure) = prev {
                removed.push((square, figure));
            }
        }
    }

    let mut moves = Vec::new();
    let mut unmatched = Vec::new();
    for (from, figure) in removed {
        let mut nearest: Option<(usize, usize)> = None;
        for (i, (to, candidate)) in added.iter().enumerate() {
            if !candidate.same(&figure) {
                continue;
            }
            let distance = from.distance(*to, orientation);
            if nearest.map_or(true, |(_, best)| distance < best) {
                nearest = Some((i, distance));
            }
        }
        match nearest {
            Some((i, _)) => {
                let (to, _) = added.remove(i);
                moves.push(Change::Move { from, to, figure });
            }
            None => unmatched.push((from, figure)),
        }
    }

    let mut changes = moves;
    changes.extend(added.into_iter().map(|(square, figure)| Change::Add { square, figure }));
    changes.extend(unmatched.into_iter().map(|(square, figure)| Change::Remove { square, figure }));
    changes
}

/// `after` with every moved piece carrying the identity it had before
/// the move, so its visual element slides instead of being replaced.
pub fn carry_forward(after: &Position, changes: &[Change]) -> Position {
    let mut position = after.clone();
    for change in changes {
        if let Change::Move { to, figure, .. } = *change {
            position.place(to, figure);
        }
    }
    position
}

/// Replays `changes` on `before`.
pub fn apply(before: &Position, changes: &[Change]) -> Position {
    let mut position = before.clone();
    // Removals and departures first so a destination vacated in the
    // same batch is free when its new occupant lands.
    for change in changes {
        match *change {
            Change::Remove { square, .. } => {
                position.remove(square);
            }
            Change::Move { from, .. } => {
                position.remove(from);
            }
            Change::Add { .. } => {}
        }
    }
    for change in changes {
        match *change {
            Change::Add { square, figure } => {
                position.place(square, figure);
            }
            Change::Move { to, figure, .. } => {
                position.place(to, figure);
            }
            Change::Remove { .. } => {}
        }
    }
    position
}
