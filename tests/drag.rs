mod common;

use common::{board, center, Recorder, Recording, PIECE};
use riff_board::Square::*;
use riff_board::*;

struct Reject {
    start: bool,
    finish: bool,
}

impl MoveListener for Reject {
    fn move_start(&mut self, _event: &MoveStart) -> Verdict {
        if self.start {
            Verdict::Reject
        } else {
            Verdict::Proceed
        }
    }
    fn move_finish(&mut self, _event: &MoveFinish) -> Verdict {
        if self.finish {
            Verdict::Reject
        } else {
            Verdict::Proceed
        }
    }
}

fn recorded<A: Animator>(board: &mut Board<A>) -> Recorder {
    let recorder = Recorder::new();
    board.add_listener(Box::new(recorder.clone()));
    recorder
}

#[test]
fn drop_on_same_square_cancels() {
    let mut board = board("start", Headless);
    let recorder = recorded(&mut board);
    let before = board.position().clone();

    let at = center(&board, E2);
    assert!(board.pointer_down(at, PIECE).unwrap());
    board.pointer_move(Point::new(at.x + 10.0, at.y - 12.0)).unwrap();
    board.pointer_up(Point::new(at.x + 3.0, at.y + 3.0)).unwrap();

    assert!(recorder.finishes().is_empty());
    let cancels = recorder.cancels();
    assert_eq!(cancels.len(), 1);
    assert_eq!(cancels[0].reason, CancelReason::SameSquare);
    assert_eq!(cancels[0].from, E2);
    assert_eq!(cancels[0].to, Some(E2));
    assert_eq!(board.position(), &before);
}

#[test]
fn drop_outside_board_cancels() {
    let mut board = board("start", Headless);
    let recorder = recorded(&mut board);
    assert!(board.pointer_down(center(&board, B1), PIECE).unwrap());
    board.pointer_up(Point::new(401.0, 401.0)).unwrap();

    let cancels = recorder.cancels();
    assert_eq!(cancels.len(), 1);
    assert_eq!(cancels[0].reason, CancelReason::OutOfBound);
    assert_eq!(cancels[0].to, None);
    assert_eq!(board.get_piece(B1), Some(Material::WN));
}

#[test]
fn drop_commits_and_snaps() {
    let mut board = board("start", Recording::default());
    let recorder = recorded(&mut board);
    let pawn = board.figure(E2).unwrap();

    board.pointer_down(center(&board, E2), PIECE).unwrap();
    board.pointer_up(Point::new(207.0, 218.0)).unwrap();

    assert_eq!(board.fen(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR");
    assert_eq!(board.figure(E4), Some(pawn));
    let finishes = recorder.finishes();
    assert_eq!(finishes.len(), 1);
    assert_eq!((finishes[0].from, finishes[0].to), (E2, E4));
    assert!(recorder.cancels().is_empty());

    let snap = board.animator().played.last().unwrap().clone();
    assert_eq!(snap.effect, Effect::Snap);
    assert_eq!(snap.keyframes[0].translate, Some(Point::new(182.0, 193.0)));
    assert_eq!(snap.keyframes[1].translate, Some(Point::new(200.0, 200.0)));
    assert_eq!(
        board.animator().last_applied(pawn.id()),
        Some(VisualState::At(Point::new(200.0, 200.0)))
    );
}

#[test]
fn drop_captures() {
    let mut board = board("8/8/8/3p4/4P3/8/8/8", Headless);
    board.pointer_down(center(&board, E4), PIECE).unwrap();
    board.pointer_up(center(&board, D5)).unwrap();
    assert_eq!(board.fen(), "8/8/8/3P4/8/8/8/8");
    assert_eq!(board.pieces_count(), 1);
}

#[test]
fn rejected_start_aborts_drag() {
    let mut board = board("start", Headless);
    board.add_listener(Box::new(Reject {
        start: true,
        finish: false,
    }));
    let recorder = recorded(&mut board);
    assert!(!board.pointer_down(center(&board, E2), PIECE).unwrap());
    assert!(!board.is_dragging());
    board.pointer_up(center(&board, E4)).unwrap();
    // The recorder still saw the start, nothing after it
    assert_eq!(recorder.notifications().len(), 1);
    assert_eq!(board.get_piece(E2), Some(Material::WP));
}

#[test]
fn rejected_finish_sends_piece_back() {
    let mut board = board("start", Recording::default());
    board.add_listener(Box::new(Reject {
        start: false,
        finish: true,
    }));
    let recorder = recorded(&mut board);
    let pawn = board.figure(E2).unwrap();

    board.pointer_down(center(&board, E2), PIECE).unwrap();
    board.pointer_up(center(&board, E4)).unwrap();

    assert_eq!(board.fen(), "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR");
    assert_eq!(recorder.finishes().len(), 1);
    assert!(recorder.cancels().is_empty());
    let last = board.animator().played.last().unwrap();
    assert_eq!(last.effect, Effect::Snapback);
    assert_eq!(
        board.animator().last_applied(pawn.id()),
        Some(VisualState::At(Point::new(200.0, 300.0)))
    );
}

#[test]
fn ghost_stays_on_source_while_dragging() {
    let config = BoardConfig::from_json(r#"{"fen": "start", "interactive": true, "show-ghost": true}"#)
        .unwrap();
    let mut board = Board::new(config, Recording::default()).unwrap();
    board.layout(Rect::new(0.0, 0.0, 400.0, 400.0));
    let knight = board.figure(B8).unwrap();

    board.pointer_down(center(&board, B8), PIECE).unwrap();
    let scene = board.animator().last_scene.clone().unwrap();
    let (square, ghost) = scene.ghost.unwrap();
    assert_eq!(square, B8);
    assert!(ghost.same(&knight));
    assert_ne!(ghost.id(), knight.id());
    assert_eq!(scene.dragging, Some(knight.id()));

    board.pointer_up(center(&board, C6)).unwrap();
    let scene = board.animator().last_scene.clone().unwrap();
    assert!(scene.ghost.is_none());
    assert!(scene.dragging.is_none());
    assert_eq!(board.get_piece(C6), Some(Material::BN));
}

#[test]
fn snapback_cancel_waits_for_animation() {
    let mut board = board("start", Recording::running());
    let recorder = recorded(&mut board);
    board.pointer_down(center(&board, A2), PIECE).unwrap();
    board.pointer_up(Point::new(-20.0, 300.0)).unwrap();
    assert!(recorder.cancels().is_empty());
    assert!(board.is_animating());

    let id = board.animator().played.last().unwrap().id;
    board.animation_settled(id).unwrap();
    assert_eq!(recorder.cancels().len(), 1);
    assert!(!board.is_animating());
}

#[test]
fn pointer_down_finishes_pending_batch() {
    let mut board = board("start", Recording::running());
    board.move_piece(E2, E4).unwrap();
    assert!(board.pointer_down(center(&board, E4), PIECE).unwrap());
    assert_eq!(board.drag().unwrap().src, E4);
}

#[test]
fn drop_lands_after_batch_started_mid_drag() {
    let mut board = board("start", Recording::running());
    let knight = board.figure(G1).unwrap();
    assert!(board.pointer_down(center(&board, G1), PIECE).unwrap());
    board.move_piece(E2, E4).unwrap();
    assert!(board.is_animating());

    board.pointer_up(center(&board, F3)).unwrap();
    board.finish_animations();
    assert_eq!(board.figure(F3), Some(knight));
    assert_eq!(board.get_piece(E4), Some(Material::WP));
    assert_eq!(board.fen(), "rnbqkbnr/pppppppp/8/8/4P3/5N2/PPPP1PPP/RNBQKB1R");
}

#[test]
fn drop_after_dragged_piece_moved_is_not_a_move() {
    let mut board = board("start", Recording::default());
    let recorder = recorded(&mut board);
    let pawn = board.figure(E2).unwrap();
    board.pointer_down(center(&board, E2), PIECE).unwrap();
    board.move_piece(E2, E3).unwrap();
    board.pointer_up(center(&board, E4)).unwrap();

    assert!(recorder.finishes().is_empty());
    assert!(recorder.cancels().is_empty());
    assert_eq!(board.fen(), "rnbqkbnr/pppppppp/8/8/8/4P3/PPPP1PPP/RNBQKBNR");
    assert_eq!(board.get_piece(E4), None);
    // Sent to the square the API moved it to
    assert_eq!(
        board.animator().last_applied(pawn.id()),
        Some(VisualState::At(Point::new(200.0, 250.0)))
    );
}

#[test]
fn drop_after_dragged_piece_removed_is_not_a_move() {
    let mut board = board("start", Headless);
    let recorder = recorded(&mut board);
    board.pointer_down(center(&board, E2), PIECE).unwrap();
    board.remove_piece(E2).unwrap();
    board.pointer_up(center(&board, E4)).unwrap();

    assert_eq!(recorder.notifications().len(), 1);
    assert_eq!(board.pieces_count(), 31);
    assert_eq!(board.get_piece(E4), None);
    assert!(!board.is_animating());
}

#[test]
fn pointer_cancel_is_silent() {
    let mut board = board("start", Recording::default());
    let recorder = recorded(&mut board);
    let rook = board.figure(H1).unwrap();
    board.pointer_down(center(&board, H1), PIECE).unwrap();
    board.pointer_move(center(&board, H5)).unwrap();
    board.pointer_cancel();
    assert!(!board.is_dragging());
    assert_eq!(recorder.notifications().len(), 1);
    assert_eq!(
        board.animator().last_applied(rook.id()),
        Some(VisualState::At(Point::new(350.0, 350.0)))
    );
}

#[test]
fn drag_under_black_orientation() {
    let mut board = board("start", Headless);
    board.flip();
    // Top-left square is h1 when black is at the bottom
    assert!(board.pointer_down(Point::new(25.0, 25.0), PIECE).unwrap());
    assert_eq!(board.drag().unwrap().src, H1);
    board.pointer_up(center(&board, H3)).unwrap();
    assert_eq!(board.get_piece(H3), Some(Material::WR));
}
