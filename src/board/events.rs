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
use strum_macros::Display;

use super::position::Figure;
use super::square::Square;

/// A piece was picked up. Rejecting it aborts the drag.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct MoveStart {
    pub from: Square,
    pub figure: Figure,
}

/// A piece was dropped on another square. Rejecting it sends the piece
/// back and leaves the position untouched.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct MoveFinish {
    pub from: Square,
    pub to: Square,
    pub figure: Figure,
}

#[derive(Debug, Serialize, Deserialize, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum CancelReason {
    SameSquare,
    OutOfBound,
}

/// A drag ended without a move.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct MoveCancel {
    pub from: Square,
    pub to: Option<Square>,
    pub figure: Figure,
    pub reason: CancelReason,
}

/// Any of the three events, tagged with its kebab-case name
/// (`move-start`, ..) for hosts that forward them as custom events.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Notification {
    MoveStart(MoveStart),
    MoveFinish(MoveFinish),
    MoveCancel(MoveCancel),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Verdict {
    #[default]
    Proceed,
    Reject,
}

/// Observer of drag-and-drop moves. `move_start` and `move_finish` may
/// veto; `move_cancel` is informational.
pub trait MoveListener {
    fn move_start(&mut self, _event: &MoveStart) -> Verdict {
        Verdict::Proceed
    }
    fn move_finish(&mut self, _event: &MoveFinish) -> Verdict {
        Verdict::Proceed
    }
    fn move_cancel(&mut self, _event: &MoveCancel) {}
}

#[derive(Default)]
pub struct Listeners(Vec<Box<dyn MoveListener>>);

impl Listeners {
    pub fn add(&mut self, listener: Box<dyn MoveListener>) {
        self.0.push(listener);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    // Every listener sees the event, even after one has rejected it.
    pub fn move_start(&mut self, event: &MoveStart) -> Verdict {
        self.0.iter_mut().fold(Verdict::Proceed, |verdict, l| {
            match l.move_start(event) {
                Verdict::Reject => Verdict::Reject,
                Verdict::Proceed => verdict,
            }
        })
    }

    pub fn move_finish(&mut self, event: &MoveFinish) -> Verdict {
        self.0.iter_mut().fold(Verdict::Proceed, |verdict, l| {
            match l.move_finish(event) {
                Verdict::Reject => Verdict::Reject,
                Verdict::Proceed => verdict,
            }
        })
    }

    pub fn move_cancel(&mut self, event: &MoveCancel) {
        for listener in self.0.iter_mut() {
            listener.move_cancel(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::material::Material;
    use crate::board::square::Square::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Veto;

    impl MoveListener for Veto {
        fn move_start(&mut self, _event: &MoveStart) -> Verdict {
            Verdict::Reject
        }
    }

    struct Count(Rc<Cell<usize>>);

    impl MoveListener for Count {
        fn move_start(&mut self, _event: &MoveStart) -> Verdict {
            self.0.set(self.0.get() + 1);
            Verdict::Proceed
        }
    }

    #[test]
    fn test_any_rejection_wins_and_all_listeners_see_event() {
        let seen = Rc::new(Cell::new(0));
        let mut listeners = Listeners::default();
        listeners.add(Box::new(Veto));
        listeners.add(Box::new(Count(seen.clone())));
        assert_eq!(listeners.len(), 2);
        let event = MoveStart {
            from: E2,
            figure: Figure::new(Material::WP),
        };
        assert_eq!(listeners.move_start(&event), Verdict::Reject);
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn test_no_listeners_proceeds() {
        let mut listeners = Listeners::default();
        let event = MoveFinish {
            from: E2,
            to: E4,
            figure: Figure::new(Material::WP),
        };
        assert_eq!(listeners.move_finish(&event), Verdict::Proceed);
        assert!(listeners.is_empty());
    }

    #[test]
    fn test_cancel_payload_shape() {
        let event = MoveCancel {
            from: E2,
            to: None,
            figure: Figure::new(Material::WP),
            reason: CancelReason::OutOfBound,
        };
        assert_eq!(CancelReason::SameSquare.to_string(), "same-square");
        let json = serde_json::to_value(Notification::MoveCancel(event)).unwrap();
        assert_eq!(json["type"], "move-cancel");
        assert_eq!(json["reason"], "out-of-bound");
        assert!(json["to"].is_null());
    }
}
