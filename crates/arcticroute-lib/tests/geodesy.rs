use arcticroute_lib::{bearing, destination, distance, intermediate_point, GeoPoint};

const TOLERANCE_M: f64 = 1e-6;

fn sample_points() -> Vec<GeoPoint> {
    let mut points = Vec::new();
    for lat in [-89.5, -60.0, -12.5, 0.0, 33.3, 64.54, 68.97, 89.9] {
        for lon in [-179.9, -120.0, -45.5, 0.0, 33.07, 40.52, 179.0] {
            points.push(GeoPoint::new(lat, lon));
        }
    }
    points
}

#[test]
fn distance_to_self_is_zero() {
    for p in sample_points() {
        assert_eq!(distance(&p, &p), 0.0, "{p}");
    }
}

#[test]
fn distance_is_symmetric_and_non_negative() {
    let points = sample_points();
    for a in &points {
        for b in &points {
            let ab = distance(a, b);
            assert!(ab >= 0.0);
            assert!((ab - distance(b, a)).abs() < TOLERANCE_M, "{a} {b}");
        }
    }
}

#[test]
fn distance_satisfies_triangle_inequality() {
    let points = sample_points();
    for a in points.iter().step_by(3) {
        for b in points.iter().step_by(2) {
            for c in &points {
                let direct = distance(a, c);
                let detour = distance(a, b) + distance(b, c);
                assert!(direct <= detour + 1e-3, "{a} {b} {c}");
            }
        }
    }
}

#[test]
fn bearings_stay_in_range() {
    let points = sample_points();
    for a in &points {
        for b in &points {
            let value = bearing(a, b);
            assert!((0.0..360.0).contains(&value), "{a} -> {b}: {value}");
        }
    }
}

#[test]
fn intermediate_points_lie_on_the_arc() {
    let a = GeoPoint::new(64.54, 40.52);
    let b = GeoPoint::new(68.97, 33.07);
    let total = distance(&a, &b);

    for step in 1..10 {
        let fraction = step as f64 / 10.0;
        let point = intermediate_point(&a, &b, fraction).expect("non-degenerate arc");
        let from_a = distance(&a, &point);
        let to_b = distance(&point, &b);
        assert!((from_a - fraction * total).abs() < 1e-3);
        assert!((from_a + to_b - total).abs() < 1e-3);
    }
}

#[test]
fn destination_then_bearing_round_trips() {
    let origin = GeoPoint::new(66.0, 38.0);
    for bearing_deg in [10.0, 80.0, 170.0, 260.0, 350.0] {
        let target = destination(&origin, bearing_deg, 40_000.0);
        assert!((bearing(&origin, &target) - bearing_deg).abs() < 1e-6);
    }
}
