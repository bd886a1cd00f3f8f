//! Almond eye outline built from two cubic Bezier arcs.
//!
//! Both lids start and end at the eye corners `(±half_width, 0)`. The upper
//! lid pulls to `-1.5 × half_height`, the lower lid to `+1.3 × half_height`,
//! so the almond is slightly taller above the corner line than below it.
//! Coordinates are relative to the eye center, y pointing down.

const UPPER_PULL: f32 = 1.5;
const LOWER_PULL: f32 = 1.3;
/// Horizontal position of the inner control points, as a fraction of half_width.
const CONTROL_SPREAD: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicSegment {
    pub from: [f32; 2],
    pub ctrl1: [f32; 2],
    pub ctrl2: [f32; 2],
    pub to: [f32; 2],
}

impl CubicSegment {
    /// Point on the curve at parameter `t` in `0..=1`.
    pub fn point_at(&self, t: f32) -> [f32; 2] {
        let u = 1.0 - t;
        let w0 = u * u * u;
        let w1 = 3.0 * u * u * t;
        let w2 = 3.0 * u * t * t;
        let w3 = t * t * t;
        [
            w0 * self.from[0] + w1 * self.ctrl1[0] + w2 * self.ctrl2[0] + w3 * self.to[0],
            w0 * self.from[1] + w1 * self.ctrl1[1] + w2 * self.ctrl2[1] + w3 * self.to[1],
        ]
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlmondOutline {
    /// Left corner → right corner, over the top.
    pub upper: CubicSegment,
    /// Right corner → left corner, along the bottom.
    pub lower: CubicSegment,
}

impl AlmondOutline {
    /// `openness` scales the lid height; 0 collapses the almond to a line.
    pub fn new(eye_width: f32, eye_height: f32, openness: f32) -> Self {
        let w = eye_width / 2.0;
        let h = eye_height / 2.0 * openness;
        let cx = w * CONTROL_SPREAD;
        Self {
            upper: CubicSegment {
                from: [-w, 0.0],
                ctrl1: [-cx, -h * UPPER_PULL],
                ctrl2: [cx, -h * UPPER_PULL],
                to: [w, 0.0],
            },
            lower: CubicSegment {
                from: [w, 0.0],
                ctrl1: [cx, h * LOWER_PULL],
                ctrl2: [-cx, h * LOWER_PULL],
                to: [-w, 0.0],
            },
        }
    }

    pub fn half_width(&self) -> f32 {
        self.upper.to[0]
    }

    /// Pack for GPU upload.
    ///
    /// Layout: for segment i (0 = upper, 1 = lower)
    ///   uniform[i*2]   = [P0.x, P0.y, P1.x, P1.y]
    ///   uniform[i*2+1] = [P2.x, P2.y, P3.x, P3.y]
    pub fn to_uniform_array(&self) -> [[f32; 4]; 4] {
        let mut result = [[0.0f32; 4]; 4];
        for (i, seg) in [self.upper, self.lower].iter().enumerate() {
            result[i * 2] = [seg.from[0], seg.from[1], seg.ctrl1[0], seg.ctrl1[1]];
            result[i * 2 + 1] = [seg.ctrl2[0], seg.ctrl2[1], seg.to[0], seg.to[1]];
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lids_meet_at_corners() {
        let o = AlmondOutline::new(600.0, 270.0, 1.0);
        assert_eq!(o.upper.from, [-300.0, 0.0]);
        assert_eq!(o.upper.to, [300.0, 0.0]);
        assert_eq!(o.lower.from, o.upper.to);
        assert_eq!(o.lower.to, o.upper.from);
        assert_eq!(o.half_width(), 300.0);
    }

    #[test]
    fn upper_lid_pulls_further_than_lower() {
        let o = AlmondOutline::new(600.0, 270.0, 1.0);
        // half_height = 135
        assert_eq!(o.upper.ctrl1, [-150.0, -202.5]);
        assert_eq!(o.lower.ctrl1[0], 150.0);
        assert!((o.lower.ctrl1[1] - 175.5).abs() < 1e-3);

        let top = o.upper.point_at(0.5);
        let bottom = o.lower.point_at(0.5);
        assert!(top[0].abs() < 1e-4);
        assert!((top[1] + 0.75 * 202.5).abs() < 1e-3);
        assert!((bottom[1] - 0.75 * 175.5).abs() < 1e-3);
        assert!(top[1].abs() > bottom[1].abs());
    }

    #[test]
    fn closed_outline_is_flat() {
        let o = AlmondOutline::new(600.0, 270.0, 0.0);
        for t in [0.0, 0.25, 0.5, 0.75, 1.0] {
            assert_eq!(o.upper.point_at(t)[1].abs(), 0.0);
            assert_eq!(o.lower.point_at(t)[1].abs(), 0.0);
        }
    }

    #[test]
    fn uniform_layout() {
        let o = AlmondOutline::new(2.0, 2.0, 1.0);
        let u = o.to_uniform_array();
        assert_eq!(u[0], [-1.0, 0.0, -0.5, -1.5]);
        assert_eq!(u[1], [0.5, -1.5, 1.0, 0.0]);
        assert_eq!(u[2], [1.0, 0.0, 0.5, LOWER_PULL]);
        assert_eq!(u[3], [-0.5, LOWER_PULL, -1.0, 0.0]);
    }
}
