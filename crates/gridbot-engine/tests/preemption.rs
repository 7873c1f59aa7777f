//! Replacing an in-flight move with a newer one.

use gridbot_core::CellIndex;
use gridbot_engine::MotionEvent;
use gridbot_test_utils::{recorded_board, run_until_idle, FRAME_DT};

#[test]
fn preempted_move_continues_from_reached_pose() {
    let (mut board, probe) = recorded_board(3, 4);
    let origin = board.pose().position;
    assert!(board.request_move(CellIndex(0)));
    for _ in 0..6 {
        board.frame(FRAME_DT);
    }
    let reached = board.pose();
    assert_ne!(reached.position, origin);

    assert!(board.request_move(CellIndex(2)));
    let t = board.transition().unwrap();
    assert_eq!(t.start, reached);
    assert_eq!(t.target_cell, CellIndex(2));

    // The abandoned destination is released immediately.
    assert!(!board.is_highlighted(CellIndex(0)));
    assert_eq!(board.tiles()[0].scale, 1.0);
    assert!(board.is_highlighted(CellIndex(2)));

    let events: Vec<_> = run_until_idle(&mut board, FRAME_DT, 120)
        .into_iter()
        .flat_map(|r| r.events)
        .collect();
    assert!(events
        .iter()
        .any(|e| matches!(e, MotionEvent::Preempted { target: CellIndex(0), .. })));
    assert!(events
        .iter()
        .any(|e| matches!(e, MotionEvent::Completed { cell: CellIndex(2), .. })));

    assert_eq!(board.current_cell(), CellIndex(2));
    assert_eq!(board.metrics().preemptions, 1);
    assert_eq!(board.metrics().transitions_completed, 1);
    // Walking stays on across the preemption.
    assert_eq!(probe.calls(), vec![true, true, false]);
}

#[test]
fn preemption_is_validated_against_departed_cell() {
    let (mut board, _) = recorded_board(3, 0);
    assert!(board.request_move(CellIndex(4)));
    board.frame(0.1);
    // 8 neighbours 4, but the agent has not reached 4 yet.
    assert!(!board.request_move(CellIndex(8)));
    assert_eq!(board.transition().unwrap().target_cell, CellIndex(4));
}

#[test]
fn no_tile_is_selectable_mid_flight() {
    let (mut board, _) = recorded_board(4, 5);
    assert!(board.request_move(CellIndex(10)));
    for _ in 0..10 {
        board.frame(FRAME_DT);
        let lit: Vec<_> = (0..16)
            .filter(|&i| board.is_highlighted(CellIndex(i)))
            .collect();
        assert_eq!(lit, vec![10]);
    }
}
