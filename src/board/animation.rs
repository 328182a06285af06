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

use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use strum_macros::Display;

use super::config::Durations;
use super::diff::Change;
use super::events::MoveCancel;
use super::layout::{Point, View};
use super::position::{Figure, PieceId, Position};
use super::square::Square;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AnimationId(u64);

impl AnimationId {
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AnimationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Serialize, Deserialize, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Easing {
    EaseIn,
    EaseOut,
    EaseInOut,
}

#[derive(Debug, Serialize, Deserialize, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Effect {
    FadeIn,
    FadeOut,
    Slide,
    Snap,
    Snapback,
}

/// One frame of a piece animation. `translate` is the top-left pixel
/// of the piece relative to the board.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
pub struct Keyframe {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub translate: Option<Point>,
}

impl Keyframe {
    pub fn at(translate: Point) -> Self {
        Self {
            opacity: None,
            translate: Some(translate),
        }
    }
    pub fn faded(translate: Point, opacity: f64) -> Self {
        Self {
            opacity: Some(opacity),
            translate: Some(translate),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Animation {
    pub id: AnimationId,
    pub piece: PieceId,
    pub effect: Effect,
    pub keyframes: Vec<Keyframe>,
    pub duration: Duration,
    pub easing: Easing,
}

/// Where a piece element ends up once its animation is over.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VisualState {
    At(Point),
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Playback {
    /// The host reports the end through `Board::animation_settled`.
    Running,
    /// Already over; completes synchronously.
    Finished,
}

/// What the renderer should show before the animations of a batch or a
/// gesture start.
#[derive(Debug, Clone, Copy)]
pub struct Scene<'a> {
    pub pieces: &'a Position,
    pub removing: &'a Position,
    pub ghost: Option<(Square, Figure)>,
    pub dragging: Option<PieceId>,
    pub view: View,
}

impl<'a> Scene<'a> {
    /// Every element the renderer needs, with its pixel offset.
    pub fn elements(&self) -> impl Iterator<Item = (Point, Figure)> + '_ {
        let ghost = self.ghost.map(|(square, figure)| (self.view.pixel(square), figure));
        self.pieces
            .iter()
            .chain(self.removing.iter())
            .map(move |(square, figure)| (self.view.pixel(square), figure))
            .chain(ghost)
    }
}

/// The capability that actually moves pixels.
pub trait Animator {
    fn render(&mut self, scene: &Scene);
    fn play(&mut self, animation: &Animation) -> Playback;
    /// Jump to the last keyframe. The scheduler completes the animation
    /// itself; a later settle report for `id` is ignored.
    fn force_finish(&mut self, id: AnimationId);
    fn apply(&mut self, piece: PieceId, state: VisualState);
}

/// Animator without a display: every animation is over as soon as it
/// starts.
#[derive(Debug, Clone, Copy, Default)]
pub struct Headless;

impl Animator for Headless {
    fn render(&mut self, _scene: &Scene) {}
    fn play(&mut self, _animation: &Animation) -> Playback {
        Playback::Finished
    }
    fn force_finish(&mut self, _id: AnimationId) {}
    fn apply(&mut self, _piece: PieceId, _state: VisualState) {}
}

/// Outcome of completing the last animation of a batch or a gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Settled {
    Committed(Position),
    Cancelled(MoveCancel),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Staged,
    Playing { queued: usize, finished: usize },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Rest {
    Square(Square),
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Track {
    Batch,
    Gesture(Option<MoveCancel>),
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    id: AnimationId,
    piece: PieceId,
    rest: Rest,
    track: Track,
}

/// Turns changes into animations and tracks them until the batch
/// settles.
///
/// A batch goes through `stage` (target position and fading pieces are
/// known, the renderer can be refreshed) and `play` (one animation per
/// change, all started together). Every animation ends in `complete`,
/// whether the host reports a natural finish or the scheduler forces
/// it. When the finished count of a batch reaches its queued count the
/// target position is handed back as `Settled::Committed`.
///
/// Drag gestures (snap, snapback) are tracked next to the batch but do
/// not count towards it.
#[derive(Debug)]
pub struct Scheduler {
    durations: Durations,
    next_id: u64,
    in_flight: Vec<InFlight>,
    queued: usize,
    finished: usize,
    changes: Vec<Change>,
    target: Option<Position>,
    removing: Position,
}

impl Scheduler {
    pub fn new(durations: Durations) -> Self {
        Self {
            durations,
            next_id: 1,
            in_flight: Vec::new(),
            queued: 0,
            finished: 0,
            changes: Vec::new(),
            target: None,
            removing: Position::empty(),
        }
    }

    pub fn durations(&self) -> &Durations {
        &self.durations
    }

    pub fn phase(&self) -> Phase {
        match self.target {
            None => Phase::Idle,
            Some(_) if self.queued == 0 => Phase::Staged,
            Some(_) => Phase::Playing {
                queued: self.queued,
                finished: self.finished,
            },
        }
    }

    /// Number of animations (batch and gestures) not yet completed.
    pub fn pending(&self) -> usize {
        self.in_flight.len()
    }

    pub fn is_idle(&self) -> bool {
        self.target.is_none() && self.in_flight.is_empty()
    }

    /// Position the batch settles on.
    pub fn staged(&self) -> Option<&Position> {
        self.target.as_ref()
    }

    /// Pieces fading out during the batch.
    pub fn removing(&self) -> &Position {
        &self.removing
    }

    pub fn stage(&mut self, changes: Vec<Change>, target: Position) {
        debug_assert!(self.target.is_none(), "a batch is already staged");
        self.removing = changes
            .iter()
            .filter_map(|change| match *change {
                Change::Remove { square, figure } => Some((square, figure)),
                _ => None,
            })
            .collect();
        debug!(
            "staged batch of {} changes ({} fading out)",
            changes.len(),
            self.removing.len()
        );
        self.changes = changes;
        self.target = Some(target);
    }

    /// Start every animation of the staged batch. Animations the
    /// animator reports as already finished are completed right away,
    /// which may settle the batch before this returns.
    pub fn play<A: Animator>(&mut self, view: View, animator: &mut A) -> Vec<Settled> {
        let changes = std::mem::take(&mut self.changes);
        let animations: Vec<(Animation, Rest)> = changes
            .iter()
            .map(|change| self.describe(change, view))
            .collect();

        // Count the whole batch before starting any of it so an instant
        // finish cannot settle early.
        self.queued += animations.len();
        self.in_flight.extend(animations.iter().map(|(animation, rest)| InFlight {
            id: animation.id,
            piece: animation.piece,
            rest: *rest,
            track: Track::Batch,
        }));

        let mut done = Vec::new();
        for (animation, _) in &animations {
            trace!(
                "play {} {} for piece {} over {:?}",
                animation.id,
                animation.effect,
                animation.piece,
                animation.duration
            );
            if animator.play(animation) == Playback::Finished {
                done.push(animation.id);
            }
        }
        done.into_iter()
            .filter_map(|id| self.complete(id, view, animator))
            .collect()
    }

    /// Slide a dropped piece from where the pointer left it onto the
    /// pixel grid of `dest`.
    pub fn snap<A: Animator>(
        &mut self,
        piece: PieceId,
        from: Point,
        dest: Square,
        view: View,
        animator: &mut A,
    ) -> Option<Settled> {
        let duration = self.durations.snap_duration();
        self.gesture(piece, Effect::Snap, from, dest, duration, None, view, animator)
    }

    /// Send a dragged piece back to `home`. `cancel` is reported once
    /// the piece is back.
    pub fn snapback<A: Animator>(
        &mut self,
        piece: PieceId,
        from: Point,
        home: Square,
        cancel: Option<MoveCancel>,
        view: View,
        animator: &mut A,
    ) -> Option<Settled> {
        let duration = self.durations.snapback_duration();
        self.gesture(piece, Effect::Snapback, from, home, duration, cancel, view, animator)
    }

    #[allow(clippy::too_many_arguments)]
    fn gesture<A: Animator>(
        &mut self,
        piece: PieceId,
        effect: Effect,
        from: Point,
        dest: Square,
        duration: Duration,
        cancel: Option<MoveCancel>,
        view: View,
        animator: &mut A,
    ) -> Option<Settled> {
        let animation = Animation {
            id: self.mint(),
            piece,
            effect,
            keyframes: vec![Keyframe::at(from), Keyframe::at(view.pixel(dest))],
            duration,
            easing: Easing::EaseInOut,
        };
        self.in_flight.push(InFlight {
            id: animation.id,
            piece,
            rest: Rest::Square(dest),
            track: Track::Gesture(cancel),
        });
        trace!("play {} {} for piece {}", animation.id, effect, piece);
        match animator.play(&animation) {
            Playback::Finished => self.complete(animation.id, view, animator),
            Playback::Running => None,
        }
    }

    /// Shared end of every animation, natural or forced: put the piece
    /// in its final visual state and account for it.
    pub fn complete<A: Animator>(
        &mut self,
        id: AnimationId,
        view: View,
        animator: &mut A,
    ) -> Option<Settled> {
        let Some(index) = self.in_flight.iter().position(|f| f.id == id) else {
            warn!("completion reported for unknown animation {id}");
            return None;
        };
        let flight = self.in_flight.remove(index);
        let state = match flight.rest {
            Rest::Square(square) => VisualState::At(view.pixel(square)),
            Rest::Hidden => VisualState::Hidden,
        };
        animator.apply(flight.piece, state);
        trace!("completed {id}");

        match flight.track {
            Track::Gesture(cancel) => cancel.map(Settled::Cancelled),
            Track::Batch => {
                self.finished += 1;
                if self.finished < self.queued {
                    return None;
                }
                self.settle()
            }
        }
    }

    /// Force-finish everything in flight, oldest first.
    pub fn finish_all<A: Animator>(&mut self, view: View, animator: &mut A) -> Vec<Settled> {
        let ids: Vec<AnimationId> = self.in_flight.iter().map(|f| f.id).collect();
        if !ids.is_empty() {
            debug!("force-finishing {} animations", ids.len());
        }
        let mut settled: Vec<Settled> = ids
            .into_iter()
            .filter_map(|id| {
                animator.force_finish(id);
                self.complete(id, view, animator)
            })
            .collect();
        // A batch that was staged but never played has nothing to wait for.
        if self.target.is_some() && self.in_flight.iter().all(|f| f.track != Track::Batch) {
            settled.extend(self.settle());
        }
        settled
    }

    fn settle(&mut self) -> Option<Settled> {
        let target = self.target.take();
        debug!("batch settled after {} animations", self.finished);
        self.queued = 0;
        self.finished = 0;
        self.changes.clear();
        self.removing = Position::empty();
        match target {
            Some(position) => Some(Settled::Committed(position)),
            None => {
                warn!("batch settled without a staged position");
                None
            }
        }
    }

    fn describe(&mut self, change: &Change, view: View) -> (Animation, Rest) {
        let id = self.mint();
        let (effect, keyframes, duration, easing, rest) = match *change {
            Change::Add { square, .. } => {
                let at = view.pixel(square);
                (
                    Effect::FadeIn,
                    vec![Keyframe::faded(at, 0.0), Keyframe::faded(at, 1.0)],
                    self.durations.in_duration(),
                    Easing::EaseIn,
                    Rest::Square(square),
                )
            }
            Change::Remove { square, .. } => {
                let at = view.pixel(square);
                (
                    Effect::FadeOut,
                    vec![Keyframe::faded(at, 1.0), Keyframe::faded(at, 0.0)],
                    self.durations.out_duration(),
                    Easing::EaseOut,
                    Rest::Hidden,
                )
            }
            Change::Move { from, to, .. } => (
                Effect::Slide,
                vec![Keyframe::at(view.pixel(from)), Keyframe::at(view.pixel(to))],
                self.durations.move_duration(),
                Easing::EaseInOut,
                Rest::Square(to),
            ),
        };
        let animation = Animation {
            id,
            piece: change.figure().id(),
            effect,
            keyframes,
            duration,
            easing,
        };
        (animation, rest)
    }

    fn mint(&mut self) -> AnimationId {
        let id = AnimationId(self.next_id);
        self.next_id += 1;
        id
    }
}
