#![allow(dead_code)]

use riff_board::*;
use std::cell::RefCell;
use std::rc::Rc;

/// Listener that keeps every notification it sees. Clones share the
/// same log, so one clone can be handed to the board and another kept
/// for inspection.
#[derive(Debug, Clone, Default)]
pub struct Recorder(Rc<RefCell<Vec<Notification>>>);

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.0.borrow().clone()
    }

    pub fn cancels(&self) -> Vec<MoveCancel> {
        self.0
            .borrow()
            .iter()
            .filter_map(|n| match n {
                Notification::MoveCancel(event) => Some(*event),
                _ => None,
            })
            .collect()
    }

    pub fn finishes(&self) -> Vec<MoveFinish> {
        self.0
            .borrow()
            .iter()
            .filter_map(|n| match n {
                Notification::MoveFinish(event) => Some(*event),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

impl MoveListener for Recorder {
    fn move_start(&mut self, event: &MoveStart) -> Verdict {
        self.0.borrow_mut().push(Notification::MoveStart(*event));
        Verdict::Proceed
    }
    fn move_finish(&mut self, event: &MoveFinish) -> Verdict {
        self.0.borrow_mut().push(Notification::MoveFinish(*event));
        Verdict::Proceed
    }
    fn move_cancel(&mut self, event: &MoveCancel) {
        self.0.borrow_mut().push(Notification::MoveCancel(*event));
    }
}

/// Animator that keeps what it was asked to do. With `running` set the
/// animations stay in flight until the test reports them settled.
#[derive(Debug, Default)]
pub struct Recording {
    pub running: bool,
    pub renders: usize,
    pub last_scene: Option<SceneSnapshot>,
    pub played: Vec<Animation>,
    pub forced: Vec<AnimationId>,
    pub applied: Vec<(PieceId, VisualState)>,
}

#[derive(Debug, Clone)]
pub struct SceneSnapshot {
    pub pieces: String,
    pub removing: usize,
    pub ghost: Option<(Square, Figure)>,
    pub dragging: Option<PieceId>,
    pub orientation: Orientation,
}

impl Recording {
    pub fn running() -> Self {
        Self {
            running: true,
            ..Default::default()
        }
    }

    pub fn ids(&self) -> Vec<AnimationId> {
        self.played.iter().map(|a| a.id).collect()
    }

    pub fn last_applied(&self, piece: PieceId) -> Option<VisualState> {
        self.applied
            .iter()
            .rev()
            .find(|(p, _)| *p == piece)
            .map(|(_, state)| *state)
    }
}

impl Animator for Recording {
    fn render(&mut self, scene: &Scene) {
        self.renders += 1;
        self.last_scene = Some(SceneSnapshot {
            pieces: scene.pieces.to_fen(),
            removing: scene.removing.len(),
            ghost: scene.ghost,
            dragging: scene.dragging,
            orientation: scene.view.orientation,
        });
    }

    fn play(&mut self, animation: &Animation) -> Playback {
        self.played.push(animation.clone());
        if self.running {
            Playback::Running
        } else {
            Playback::Finished
        }
    }

    fn force_finish(&mut self, id: AnimationId) {
        self.forced.push(id);
    }

    fn apply(&mut self, piece: PieceId, state: VisualState) {
        self.applied.push((piece, state));
    }
}

pub const PIECE: Size = Size::new(50.0, 50.0);

/// 400x400 interactive board at the origin: squares are 50 pixels.
pub fn board<A: Animator>(fen: &str, animator: A) -> Board<A> {
    let config = BoardConfig {
        fen: fen.to_string(),
        interactive: true,
        ..Default::default()
    };
    let mut board = Board::new(config, animator).unwrap();
    board.layout(Rect::new(0.0, 0.0, 400.0, 400.0));
    board
}

/// Center of `square` in pointer coordinates.
pub fn center<A: Animator>(board: &Board<A>, square: Square) -> Point {
    let geometry = board.geometry().unwrap();
    let view = View::new(geometry, board.orientation());
    geometry.origin + view.pixel(square) + geometry.square_size().half()
}
