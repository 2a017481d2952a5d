//! Great-circle math for drawing legs on the globe.

use crate::models::Coordinate;

/// Mean Earth radius used for distance calculations.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Below this, sin(omega) is treated as zero and the endpoints as antipodal.
const ANTIPODAL_EPSILON: f64 = 1e-9;

type Vec3 = [f64; 3];

/// Sample the great-circle arc between two points.
///
/// Returns `steps + 1` points whose first and last entries are exactly
/// `from` and `to`. Identical points short-circuit to `[from, to]`.
/// A `steps` of zero is treated as one.
///
/// Antipodal endpoints have no unique great circle; the arc is swept
/// through a fixed perpendicular (toward the north pole, or toward
/// 90°E on the equator when starting at a pole) so the result is
/// deterministic.
pub fn interpolate_great_circle(from: Coordinate, to: Coordinate, steps: usize) -> Vec<Coordinate> {
    if from == to {
        return vec![from, to];
    }
    let steps = steps.max(1);
    let a = to_unit_vector(from);
    let b = to_unit_vector(to);

    // acos overshoots into NaN without the clamp when rounding pushes |dot| past 1.
    let omega = dot(a, b).clamp(-1.0, 1.0).acos();
    if omega == 0.0 {
        return vec![from, to];
    }

    let sin_omega = omega.sin();
    let degenerate = sin_omega.abs() < ANTIPODAL_EPSILON;
    let antipodal_axis = if degenerate && omega > std::f64::consts::FRAC_PI_2 {
        Some(perpendicular(a))
    } else {
        None
    };

    let mut path = Vec::with_capacity(steps + 1);
    path.push(from);
    for i in 1..steps {
        let t = i as f64 / steps as f64;
        let v = match antipodal_axis {
            Some(axis) => {
                let theta = omega * t;
                add(scale(a, theta.cos()), scale(axis, theta.sin()))
            }
            // Nearly coincident points: linear blend, normalized below.
            None if degenerate => add(scale(a, 1.0 - t), scale(b, t)),
            None => {
                let wa = ((1.0 - t) * omega).sin() / sin_omega;
                let wb = (t * omega).sin() / sin_omega;
                add(scale(a, wa), scale(b, wb))
            }
        };
        path.push(from_unit_vector(normalize(v)));
    }
    path.push(to);
    path
}

/// Great-circle distance between two coordinates in meters (Haversine formula).
pub fn haversine_distance_m(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.lat().to_radians();
    let phi2 = b.lat().to_radians();
    let dphi = (b.lat() - a.lat()).to_radians();
    let dlambda = (b.lon() - a.lon()).to_radians();
    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().atan2((1.0 - h).max(0.0).sqrt())
}

/// Total length of a polyline in meters.
pub fn path_length_m(path: &[Coordinate]) -> f64 {
    path.windows(2)
        .map(|pair| haversine_distance_m(pair[0], pair[1]))
        .sum()
}

fn to_unit_vector(c: Coordinate) -> Vec3 {
    let lon = c.lon().to_radians();
    let lat = c.lat().to_radians();
    [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
}

fn from_unit_vector(v: Vec3) -> Coordinate {
    let [x, y, z] = v;
    Coordinate::from_radians_unchecked(y.atan2(x), z.clamp(-1.0, 1.0).asin())
}

fn perpendicular(a: Vec3) -> Vec3 {
    // Project the north pole onto the plane orthogonal to `a`.
    let north = [0.0, 0.0, 1.0];
    let candidate = sub(north, scale(a, dot(north, a)));
    if norm(candidate) > ANTIPODAL_EPSILON {
        return normalize(candidate);
    }
    let east = [0.0, 1.0, 0.0];
    normalize(sub(east, scale(a, dot(east, a))))
}

fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn scale(a: Vec3, k: f64) -> Vec3 {
    [a[0] * k, a[1] * k, a[2] * k]
}

fn norm(a: Vec3) -> f64 {
    dot(a, a).sqrt()
}

fn normalize(a: Vec3) -> Vec3 {
    let n = norm(a);
    if n <= f64::EPSILON {
        return a;
    }
    scale(a, 1.0 / n)
}
