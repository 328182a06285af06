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

use log::debug;

use super::events::CancelReason;
use super::layout::{Point, Size, View};
use super::position::Figure;
use super::square::Square;

/// A piece being dragged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drag {
    pub src: Square,
    pub figure: Figure,
    /// Half the piece size: the pointer holds the piece by its center.
    pub half: Point,
    /// Board-relative pixel of the source square.
    pub origin: Point,
    /// Current board-relative pixel of the piece.
    pub translate: Point,
    pub over: Option<Square>,
    pub ghost: Option<Figure>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(Drag),
}

/// How a drag ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    Snapback {
        reason: CancelReason,
        to: Option<Square>,
    },
    Drop {
        to: Square,
    },
}

#[derive(Debug, Default)]
pub struct Controller {
    state: DragState,
}

impl Controller {
    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging(_))
    }

    pub fn drag(&self) -> Option<&Drag> {
        match &self.state {
            DragState::Dragging(drag) => Some(drag),
            DragState::Idle => None,
        }
    }

    /// Pick up `figure` from `src`. The move-start notification has
    /// already been accepted at this point.
    pub fn start(
        &mut self,
        src: Square,
        figure: Figure,
        client: Point,
        piece_size: Size,
        view: &View,
        ghost: bool,
    ) -> Drag {
        let half = piece_size.half();
        let drag = Drag {
            src,
            figure,
            half,
            origin: view.pixel(src),
            translate: view.geometry.local(client) - half,
            over: Some(src),
            ghost: ghost.then(|| Figure::new(figure.material())),
        };
        debug!("drag {} from {}", figure.material(), src);
        self.state = DragState::Dragging(drag);
        drag
    }

    pub fn track(&mut self, client: Point, view: &View) -> Option<&Drag> {
        match &mut self.state {
            DragState::Dragging(drag) => {
                drag.translate = view.geometry.local(client) - drag.half;
                drag.over = view.square_at(client);
                Some(drag)
            }
            DragState::Idle => None,
        }
    }

    /// End the drag where the pointer was released.
    pub fn release(&mut self, client: Point, view: &View) -> Option<(Drag, Release)> {
        self.track(client, view)?;
        let DragState::Dragging(drag) = std::mem::take(&mut self.state) else {
            return None;
        };
        let release = match drag.over {
            None => Release::Snapback {
                reason: CancelReason::OutOfBound,
                to: None,
            },
            Some(to) if to == drag.src => Release::Snapback {
                reason: CancelReason::SameSquare,
                to: Some(to),
            },
            Some(to) => Release::Drop { to },
        };
        debug!("drag from {} released: {:?}", drag.src, release);
        Some((drag, release))
    }

    pub fn cancel(&mut self) -> Option<Drag> {
        match std::mem::take(&mut self.state) {
            DragState::Dragging(drag) => {
                debug!("drag from {} cancelled", drag.src);
                Some(drag)
            }
            DragState::Idle => None,
        }
    }
}
