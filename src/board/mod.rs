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

//! Interactive chess board widget core
//!
//! A _board_ shows where pieces are and animates getting from one
//! arrangement to the next. It knows nothing about the rules of chess:
//! any placement is accepted and any piece can be dragged anywhere.
//! The following features are supported:
//!
//! [x] FEN piece placement in and out
//! [x] Slide, fade-in and fade-out animations computed from position diffs
//! [x] Drag and drop with cancelable move-start and move-finish
//! [x] Optional ghost piece left on the drag source
//! [x] White or black orientation
//! [x] Board and piece themes
//! [ ] Coordinate labels
//! [ ] Highlighting a king in check
//!
//! Some of the key abstractions include:
//!
//! * A `Square` represents the coordinates for a single square
//!   on an 8-by-8 board. The 8 rows and 8 columns on a board
//!   are represented by `Rank` (`Rank1` .. `Rank8`) and `File`
//!   (`FileA` .. `FileH`) respectively. How a square maps to a row and
//!   column on screen depends on the `Orientation`.
//!
//! * `Material` represents a piece of a specific color. A `Figure` is
//!   a material placed on the board together with a `PieceId`, an
//!   opaque identity minted whenever a piece instance is created. The
//!   identity lets a renderer keep the same element for a piece that
//!   slides from one square to another. Sameness of two figures is
//!   decided by material alone.
//!
//! * A `Position` maps squares to figures. Positions are values: every
//!   edit builds a new one from a copy of the last.
//!
//! * `diff` compares two positions and lists the `Change`s between
//!   them: moves first (each removed piece paired with the nearest
//!   added piece of the same material), then additions, then removals.
//!
//! * The `Scheduler` turns a list of changes into one `Animation` per
//!   change and tracks the batch until every animation has finished,
//!   at which point the target position becomes the committed one.
//!   Pixels are moved by an `Animator` supplied by the host.
//!
//! * The `Controller` follows a drag from pointer down to pointer up
//!   and decides between a drop and a snapback. `MoveListener`s may
//!   reject a drag at its start or its finish.
//!
//! * `Board` ties it all together. Reads (`fen`, `get_piece`, ..)
//!   always reflect the committed position, never a batch still in
//!   flight.
//!

use anyhow::Result;
use log::{debug, warn};
use thiserror::Error;

mod animation;
mod config;
mod diff;
mod events;
mod interaction;
mod layout;
mod material;
mod position;
mod square;

pub use animation::*;
pub use config::*;
pub use diff::*;
pub use events::*;
pub use interaction::*;
pub use layout::*;
pub use material::*;
pub use position::*;
pub use square::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("Board has no geometry yet (call layout first)")]
    NotInitialized,
}

pub struct Board<A: Animator> {
    config: BoardConfig,
    theme: Theme,
    orientation: Orientation,
    position: Position,
    geometry: Option<Geometry>,
    scheduler: Scheduler,
    controller: Controller,
    listeners: Listeners,
    animator: A,
}

impl<A: Animator> Board<A> {
    /// # Errors
    ///
    /// Returns `FenError` if `config.fen` is not a valid placement.
    pub fn new(config: BoardConfig, animator: A) -> Result<Self> {
        let position = parse_fen(&config.fen)?;
        Ok(Self {
            theme: Theme::new(config.board_theme.clone()),
            orientation: config.orientation,
            scheduler: Scheduler::new(config.animation.clone()),
            controller: Controller::default(),
            listeners: Listeners::default(),
            geometry: None,
            position,
            config,
            animator,
        })
    }

    /// Fit the board into `bounds` (pointer coordinate space). Must be
    /// called before any mutation or pointer event.
    pub fn layout(&mut self, bounds: Rect) -> Geometry {
        let geometry = Geometry::fit(bounds, self.config.min_size, self.config.max_size);
        debug!("board laid out at {:?}", geometry);
        self.geometry = Some(geometry);
        self.render();
        geometry
    }

    pub fn geometry(&self) -> Option<Geometry> {
        self.geometry
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn animator(&self) -> &A {
        &self.animator
    }

    pub fn animator_mut(&mut self) -> &mut A {
        &mut self.animator
    }

    pub fn add_listener(&mut self, listener: Box<dyn MoveListener>) {
        self.listeners.add(listener);
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn set_piece_theme<F>(&mut self, pieces: F)
    where
        F: Fn(Material) -> String + 'static,
    {
        self.theme.set_pieces(pieces);
    }

    pub fn set_board_theme(&mut self, board: Option<String>) {
        self.theme.set_board(board);
    }

    pub fn set_interactive(&mut self, interactive: bool) {
        self.config.interactive = interactive;
    }

    pub fn set_show_ghost(&mut self, show_ghost: bool) {
        self.config.show_ghost = show_ghost;
    }

    /// # Errors
    ///
    /// Returns `FenError` for a malformed placement and `BoardError`
    /// before `layout`.
    pub fn load_from_fen(&mut self, fen: &str) -> Result<()> {
        let target = parse_fen(fen)?;
        self.set_position(target)
    }

    /// Replace the whole position: diff, animate, commit on settle.
    pub fn set_position(&mut self, target: Position) -> Result<()> {
        let view = self.view()?;
        self.finish_pending(view);

        let changes = diff(&self.position, &target, self.orientation);
        if changes.is_empty() {
            self.position = target;
            self.render();
            return Ok(());
        }
        let staged = carry_forward(&target, &changes);
        self.scheduler.stage(changes, staged);
        self.render();
        let settled = self.scheduler.play(view, &mut self.animator);
        self.settle(settled);
        Ok(())
    }

    pub fn set_piece(&mut self, square: Square, material: Material) -> Result<()> {
        self.edit(|target| {
            target.place(square, Figure::new(material));
            true
        })
    }

    /// Like `set_piece`, but an occupied square is left alone and
    /// nothing is animated.
    pub fn set_piece_if_empty(&mut self, square: Square, material: Material) -> Result<()> {
        self.edit(|target| {
            if target[square].is_some() {
                return false;
            }
            target.place(square, Figure::new(material));
            true
        })
    }

    pub fn remove_piece(&mut self, square: Square) -> Result<()> {
        self.edit(|target| target.remove(square).is_some())
    }

    /// Moving from an empty square does nothing.
    pub fn move_piece(&mut self, from: Square, to: Square) -> Result<()> {
        self.edit(|target| target.relocate(from, to))
    }

    // Single localized edit of the committed position. Pending batches
    // settle first so the edit starts from their outcome.
    fn edit<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Position) -> bool,
    {
        let view = self.view()?;
        self.finish_pending(view);
        let mut target = self.position.clone();
        if !f(&mut target) {
            return Ok(());
        }
        self.set_position(target)
    }

    pub fn clear(&mut self) -> Result<()> {
        self.set_position(Position::empty())
    }

    /// Toggle orientation. The position is untouched; animations in
    /// flight land on the squares of the new orientation.
    pub fn flip(&mut self) {
        self.orientation = !self.orientation;
        debug!("orientation is now {}", self.orientation);
        self.render();
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        if self.orientation != orientation {
            self.flip();
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn get_piece(&self, square: Square) -> Option<Material> {
        self.position[square].map(|f| f.material())
    }

    pub fn figure(&self, square: Square) -> Option<Figure> {
        self.position[square]
    }

    pub fn pieces_count(&self) -> usize {
        self.position.len()
    }

    pub fn fen(&self) -> String {
        self.position.to_fen()
    }

    pub fn print(&self) -> String {
        self.position.print(self.orientation)
    }

    pub fn is_animating(&self) -> bool {
        !self.scheduler.is_idle()
    }

    pub fn is_dragging(&self) -> bool {
        self.controller.is_dragging()
    }

    pub fn drag(&self) -> Option<&Drag> {
        self.controller.drag()
    }

    /// Start dragging the piece under `client`. Returns whether a drag
    /// started.
    pub fn pointer_down(&mut self, client: Point, piece_size: Size) -> Result<bool> {
        let view = self.view()?;
        if !self.config.interactive || self.controller.is_dragging() {
            return Ok(false);
        }
        self.finish_pending(view);

        let Some(src) = view.square_at(client) else {
            return Ok(false);
        };
        let Some(figure) = self.position[src] else {
            return Ok(false);
        };
        let event = MoveStart { from: src, figure };
        if self.listeners.move_start(&event) == Verdict::Reject {
            debug!("move start from {src} rejected");
            return Ok(false);
        }

        let drag = self.controller.start(
            src,
            figure,
            client,
            piece_size,
            &view,
            self.config.show_ghost,
        );
        self.render();
        self.animator.apply(figure.id(), VisualState::At(drag.translate));
        Ok(true)
    }

    pub fn pointer_move(&mut self, client: Point) -> Result<()> {
        let view = self.view()?;
        if let Some(drag) = self.controller.track(client, &view) {
            let (piece, at) = (drag.figure.id(), drag.translate);
            self.animator.apply(piece, VisualState::At(at));
        }
        Ok(())
    }

    /// End the drag. Batches started by API calls during the drag are
    /// committed first, so the drop applies on top of their outcome.
    pub fn pointer_up(&mut self, client: Point) -> Result<()> {
        let view = self.view()?;
        let Some((drag, release)) = self.controller.release(client, &view) else {
            return Ok(());
        };
        self.finish_pending(view);
        let piece = drag.figure.id();

        let settled = match release {
            Release::Snapback { reason, to } => {
                let cancel = MoveCancel {
                    from: drag.src,
                    to,
                    figure: drag.figure,
                    reason,
                };
                self.render();
                self.scheduler.snapback(
                    piece,
                    drag.translate,
                    drag.src,
                    Some(cancel),
                    view,
                    &mut self.animator,
                )
            }
            Release::Drop { .. } if self.position[drag.src] != Some(drag.figure) => {
                // Moved or removed through the API while dragged. No
                // listener hears about a move that cannot happen.
                warn!("dragged piece left {} during the drag", drag.src);
                self.render();
                let home = self.position.find(piece);
                home.and_then(|home| {
                    self.scheduler.snapback(
                        piece,
                        drag.translate,
                        home,
                        None,
                        view,
                        &mut self.animator,
                    )
                })
            }
            Release::Drop { to } => {
                let event = MoveFinish {
                    from: drag.src,
                    to,
                    figure: drag.figure,
                };
                if self.listeners.move_finish(&event) == Verdict::Proceed {
                    self.position.relocate(drag.src, to);
                    debug!("dropped {} on {}", drag.figure.material(), to);
                    self.render();
                    self.scheduler
                        .snap(piece, drag.translate, to, view, &mut self.animator)
                } else {
                    debug!("move finish {}{} rejected", drag.src, to);
                    self.render();
                    self.scheduler.snapback(
                        piece,
                        drag.translate,
                        drag.src,
                        None,
                        view,
                        &mut self.animator,
                    )
                }
            }
        };
        self.settle(settled);
        Ok(())
    }

    /// Drop the drag without notifying anyone.
    pub fn pointer_cancel(&mut self) {
        let Some(drag) = self.controller.cancel() else {
            return;
        };
        self.render();
        self.animator
            .apply(drag.figure.id(), VisualState::At(drag.origin));
    }

    /// The host reports that an animation it was playing has ended.
    pub fn animation_settled(&mut self, id: AnimationId) -> Result<()> {
        let view = self.view()?;
        let settled = self.scheduler.complete(id, view, &mut self.animator);
        self.settle(settled);
        Ok(())
    }

    /// Force-finish every animation in flight and commit its batch.
    pub fn finish_animations(&mut self) {
        if let Some(view) = self.current_view() {
            self.finish_pending(view);
        }
    }

    fn finish_pending(&mut self, view: View) {
        let settled = self.scheduler.finish_all(view, &mut self.animator);
        self.settle(settled);
    }

    fn settle(&mut self, settled: impl IntoIterator<Item = Settled>) {
        for outcome in settled {
            match outcome {
                Settled::Committed(position) => {
                    self.position = position;
                    debug!("committed {}", self.position.to_fen());
                    self.render();
                }
                Settled::Cancelled(event) => {
                    debug!("move from {} cancelled: {}", event.from, event.reason);
                    self.listeners.move_cancel(&event);
                }
            }
        }
    }

    fn current_view(&self) -> Option<View> {
        self.geometry
            .map(|geometry| View::new(geometry, self.orientation))
    }

    fn view(&self) -> Result<View> {
        Ok(self.current_view().ok_or(BoardError::NotInitialized)?)
    }

    fn render(&mut self) {
        let Some(view) = self.current_view() else {
            return;
        };
        let drag = self.controller.drag();
        let scene = Scene {
            pieces: self.scheduler.staged().unwrap_or(&self.position),
            removing: self.scheduler.removing(),
            ghost: drag.and_then(|d| d.ghost.map(|g| (d.src, g))),
            dragging: drag.map(|d| d.figure.id()),
            view,
        };
        self.animator.render(&scene);
    }
}

impl Board<Headless> {
    /// Board without a display; animations complete at once.
    pub fn headless(config: BoardConfig) -> Result<Self> {
        Self::new(config, Headless)
    }
}

impl<A: Animator> AsRef<Position> for Board<A> {
    fn as_ref(&self) -> &Position {
        &self.position
    }
}
