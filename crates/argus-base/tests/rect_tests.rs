use argus_base::{Rect, Vec2};

#[test]
fn min_max_corners() {
    let r = Rect::new(Vec2::new(10.0, 20.0), Vec2::new(30.0, 40.0));
    assert_eq!(r.min(), Vec2::new(10.0, 20.0));
    assert_eq!(r.max(), Vec2::new(40.0, 60.0));
    assert_eq!(r.area(), 1200.0);
}

#[test]
fn from_min_max_roundtrip() {
    let r = Rect::from_min_max(Vec2::new(5.0, 5.0), Vec2::new(15.0, 25.0));
    assert_eq!(r.origin, Vec2::new(5.0, 5.0));
    assert_eq!(r.size, Vec2::new(10.0, 20.0));
}

#[test]
fn overlapping_rects_intersect() {
    let a = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
    let b = Rect::new(Vec2::new(5.0, 5.0), Vec2::new(10.0, 10.0));
    assert!(a.intersects(b));

    let overlap = a.intersection(b).unwrap();
    assert_eq!(overlap.origin, Vec2::new(5.0, 5.0));
    assert_eq!(overlap.size, Vec2::new(5.0, 5.0));
}

#[test]
fn disjoint_rects_do_not_intersect() {
    let a = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
    let b = Rect::new(Vec2::new(20.0, 20.0), Vec2::new(5.0, 5.0));
    assert!(!a.intersects(b));
    assert!(a.intersection(b).is_none());
}

#[test]
fn touching_edges_count_as_disjoint() {
    let a = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(10.0, 10.0));
    let b = Rect::new(Vec2::new(10.0, 0.0), Vec2::new(10.0, 10.0));
    assert!(!a.intersects(b));
}

#[test]
fn contained_rect_intersection_is_inner() {
    let outer = Rect::new(Vec2::new(0.0, 0.0), Vec2::new(100.0, 100.0));
    let inner = Rect::new(Vec2::new(25.0, 25.0), Vec2::new(10.0, 10.0));
    let overlap = outer.intersection(inner).unwrap();
    assert_eq!(overlap, inner);
}
