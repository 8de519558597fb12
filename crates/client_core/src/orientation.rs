const STANDARD_GRAVITY: f32 = 9.81;
/// Below this squared magnitude the device is treated as in free fall.
const FREE_FALL_GRAVITY_SQUARED: f32 = 0.01 * STANDARD_GRAVITY * STANDARD_GRAVITY;
/// Below this the magnetic field is absent or parallel to gravity.
const MIN_EAST_NORM: f32 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorKind {
    Gravity,
    Magnetic,
}

pub type Vector3 = [f32; 3];

/// Three-axis orientation in radians: `[azimuth, roll, tilt]`.
///
/// Only [`Orientation::roll`] feeds the steering controls.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Orientation(pub Vector3);

impl Orientation {
    pub fn roll(&self) -> f32 {
        self.0[1]
    }

    /// Roll in whole degrees, truncated toward zero.
    pub fn roll_degrees(&self) -> i32 {
        self.roll().to_degrees() as i32
    }
}

#[derive(Debug, Default)]
pub struct OrientationEstimator {
    gravity: Option<Vector3>,
    magnetic: Option<Vector3>,
    estimate: Orientation,
}

impl OrientationEstimator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the latest reading for `kind` and refreshes the estimate.
    ///
    /// Returns `true` when fusion succeeded and the estimate was replaced. A
    /// `false` return is a normal startup transient (one kind not seen yet) or
    /// a degenerate reading; the previous estimate is kept either way.
    pub fn update(&mut self, kind: SensorKind, vector: Vector3) -> bool {
        match kind {
            SensorKind::Gravity => self.gravity = Some(vector),
            SensorKind::Magnetic => self.magnetic = Some(vector),
        }

        let (Some(gravity), Some(magnetic)) = (self.gravity, self.magnetic) else {
            return false;
        };

        match rotation_matrix(gravity, magnetic) {
            Some(matrix) => {
                self.estimate = orientation_from(&matrix);
                true
            }
            None => false,
        }
    }

    pub fn estimate(&self) -> Orientation {
        self.estimate
    }

    pub fn roll_degrees(&self) -> i32 {
        self.estimate.roll_degrees()
    }
}

fn rotation_matrix(gravity: Vector3, magnetic: Vector3) -> Option<[f32; 9]> {
    let norm_sq_gravity = dot(gravity, gravity);
    if norm_sq_gravity < FREE_FALL_GRAVITY_SQUARED {
        return None;
    }

    let east = cross(magnetic, gravity);
    let east_norm = dot(east, east).sqrt();
    if east_norm < MIN_EAST_NORM {
        return None;
    }

    let east = scale(east, 1.0 / east_norm);
    let up = scale(gravity, 1.0 / norm_sq_gravity.sqrt());
    let north = cross(up, east);

    Some([
        east[0], east[1], east[2], north[0], north[1], north[2], up[0], up[1], up[2],
    ])
}

fn orientation_from(r: &[f32; 9]) -> Orientation {
    Orientation([
        r[1].atan2(r[4]),
        (-r[7]).clamp(-1.0, 1.0).asin(),
        (-r[6]).atan2(r[8]),
    ])
}

fn dot(a: Vector3, b: Vector3) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: Vector3, b: Vector3) -> Vector3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn scale(v: Vector3, k: f32) -> Vector3 {
    [v[0] * k, v[1] * k, v[2] * k]
}

/// Gravity vector a device would report when tilted by `roll_degrees` about
/// its long axis. Handy for front-ends that simulate tilt.
pub fn gravity_for_roll(roll_degrees: f32) -> Vector3 {
    let radians = roll_degrees.to_radians();
    [
        0.0,
        -STANDARD_GRAVITY * radians.sin(),
        STANDARD_GRAVITY * radians.cos(),
    ]
}

#[cfg(test)]
#[path = "tests/orientation_tests.rs"]
mod tests;
