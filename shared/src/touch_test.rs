use super::*;
use crate::surface::testing::{RecordingSurface, SharedWidth};

fn tracker() -> StrokeTracker<RecordingSurface, SharedWidth> {
    StrokeTracker::new(RecordingSurface::default(), SharedWidth::new(10.0))
}

fn touch(identifier: i32, x: f64, y: f64) -> TouchRecord {
    TouchRecord::new(identifier, x, y)
}

#[test]
fn begin_tracks_without_drawing() {
    let mut t = tracker();
    t.on_contacts_begin(&[touch(1, 10.0, 10.0), touch(2, 50.0, 50.0)]);

    assert_eq!(t.len(), 2);
    assert!(t.contains(1));
    assert!(t.contains(2));
    assert!(t.surface().segments.is_empty());
}

#[test]
fn interleaved_contacts_draw_their_own_segments() {
    let mut t = tracker();
    t.on_contacts_begin(&[touch(1, 10.0, 10.0)]);
    t.on_contacts_begin(&[touch(2, 50.0, 50.0)]);
    t.on_contacts_move(&[touch(1, 12.0, 11.0)]);
    t.on_contacts_move(&[touch(2, 55.0, 52.0)]);

    assert_eq!(
        t.surface().lines(),
        vec![((10.0, 10.0), (12.0, 11.0)), ((50.0, 50.0), (55.0, 52.0))]
    );
}

#[test]
fn move_batch_draws_in_batch_order() {
    let mut t = tracker();
    t.on_contacts_begin(&[touch(1, 0.0, 0.0), touch(2, 100.0, 100.0)]);
    t.on_contacts_move(&[touch(2, 101.0, 99.0), touch(1, 1.0, 2.0)]);

    assert_eq!(
        t.surface().lines(),
        vec![((100.0, 100.0), (101.0, 99.0)), ((0.0, 0.0), (1.0, 2.0))]
    );
}

#[test]
fn successive_moves_continue_from_last_position() {
    let mut t = tracker();
    t.on_contacts_begin(&[touch(7, 0.0, 0.0)]);
    t.on_contacts_move(&[touch(7, 5.0, 0.0)]);
    t.on_contacts_move(&[touch(7, 5.0, 5.0)]);
    t.on_contacts_move(&[touch(7, 0.0, 5.0)]);

    assert_eq!(
        t.surface().lines(),
        vec![
            ((0.0, 0.0), (5.0, 0.0)),
            ((5.0, 0.0), (5.0, 5.0)),
            ((5.0, 5.0), (0.0, 5.0)),
        ]
    );
    assert_eq!(t.position(7), Some(Point::new(0.0, 5.0)));
}

#[test]
fn segments_use_round_join_and_current_width() {
    let width = SharedWidth::new(10.0);
    let mut t = StrokeTracker::new(RecordingSurface::default(), width.clone());
    t.on_contacts_begin(&[touch(1, 0.0, 0.0)]);
    t.on_contacts_move(&[touch(1, 1.0, 1.0)]);
    width.0.set(3.5);
    t.on_contacts_move(&[touch(1, 2.0, 2.0)]);

    let segments = &t.surface().segments;
    assert_eq!(segments.len(), 2);
    assert!(segments.iter().all(|s| s.line_join == LineJoin::Round));
    assert_eq!(segments[0].line_width, 10.0);
    assert_eq!(segments[1].line_width, 3.5);
}

#[test]
fn move_without_begin_is_ignored() {
    let mut t = tracker();
    t.on_contacts_move(&[touch(3, 1.0, 1.0)]);

    assert!(t.is_empty());
    assert!(t.surface().segments.is_empty());
}

#[test]
fn move_after_end_is_ignored() {
    let mut t = tracker();
    t.on_contacts_begin(&[touch(1, 10.0, 10.0), touch(2, 50.0, 50.0)]);
    t.on_contacts_end(&[touch(1, 10.0, 10.0)]);
    t.on_contacts_move(&[touch(1, 20.0, 20.0)]);

    assert!(t.surface().segments.is_empty());
    assert_eq!(t.identifiers().collect::<Vec<_>>(), vec![2]);
}

#[test]
fn end_and_cancel_tolerate_unknown_identifiers() {
    let mut t = tracker();
    t.on_contacts_begin(&[touch(1, 0.0, 0.0)]);
    t.on_contacts_end(&[touch(9, 0.0, 0.0)]);
    t.on_contacts_cancel(&[touch(9, 0.0, 0.0)]);
    t.on_contacts_cancel(&[touch(1, 0.0, 0.0)]);
    t.on_contacts_cancel(&[touch(1, 0.0, 0.0)]);

    assert!(t.is_empty());
    assert!(t.surface().segments.is_empty());
}

#[test]
fn full_cycle_leaves_registry_empty() {
    let mut t = tracker();
    t.on_contacts_begin(&[touch(1, 0.0, 0.0)]);
    for step in 1..=20 {
        t.on_contacts_move(&[touch(1, step as f64, step as f64)]);
        assert_eq!(t.len(), 1);
    }
    t.on_contacts_end(&[touch(1, 20.0, 20.0)]);

    assert!(t.is_empty());
    assert_eq!(t.surface().segments.len(), 20);
}

#[test]
fn reused_identifier_starts_fresh() {
    let mut t = tracker();
    t.on_contacts_begin(&[touch(1, 0.0, 0.0)]);
    t.on_contacts_move(&[touch(1, 30.0, 30.0)]);
    t.on_contacts_end(&[touch(1, 30.0, 30.0)]);
    t.on_contacts_begin(&[touch(1, 200.0, 200.0)]);
    t.on_contacts_move(&[touch(1, 201.0, 201.0)]);

    assert_eq!(
        t.surface().lines(),
        vec![((0.0, 0.0), (30.0, 30.0)), ((200.0, 200.0), (201.0, 201.0))]
    );
}

#[test]
fn duplicate_begin_overwrites_the_stale_contact() {
    let mut t = tracker();
    t.on_contacts_begin(&[touch(1, 0.0, 0.0)]);
    t.on_contacts_begin(&[touch(1, 40.0, 40.0)]);

    assert_eq!(t.len(), 1);
    t.on_contacts_move(&[touch(1, 41.0, 41.0)]);
    assert_eq!(t.surface().lines(), vec![((40.0, 40.0), (41.0, 41.0))]);
}

#[test]
fn duplicate_within_one_batch_keeps_a_single_entry() {
    let mut t = tracker();
    t.on_contacts_begin(&[touch(4, 1.0, 1.0), touch(4, 2.0, 2.0)]);

    assert_eq!(t.len(), 1);
    assert_eq!(t.position(4), Some(Point::new(2.0, 2.0)));
}

#[test]
fn clear_contacts_drops_everything() {
    let mut t = tracker();
    t.on_contacts_begin(&[touch(1, 0.0, 0.0), touch(2, 0.0, 0.0)]);
    t.clear_contacts();
    t.on_contacts_move(&[touch(1, 1.0, 1.0)]);

    assert!(t.is_empty());
    assert!(t.surface().segments.is_empty());
}

#[test]
fn origin_translates_to_surface_local() {
    let origin = SurfaceOrigin::new(15.0, 60.0);
    let local = origin.to_local(&touch(3, 115.0, 160.0));

    assert_eq!(local, touch(3, 100.0, 100.0));
}
