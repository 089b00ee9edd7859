//! Index-fingertip → canvas pointer remapping.
//!
//! Only the right half of the camera frame maps onto the canvas width, and a
//! 150 px band is cut off the top and bottom, so the presenter can reach
//! every canvas corner without stretching across the whole camera view.

use crate::error::{ConfigError, GestureError};

/// Rows cut from the top and bottom of the frame before remapping.
pub const VERTICAL_MARGIN: u32 = 150;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    pub const fn new(width: u32, height: u32) -> Self {
        Dimensions { width, height }
    }
}

/// Integer canvas coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Point { x, y }
    }
}

/// Linear interpolation of `value` from `domain` onto `range`.
///
/// With `clamp` set, values outside the domain stick to the range ends.
pub fn interp(value: f32, domain: (f32, f32), range: (f32, f32), clamp: bool) -> f32 {
    let (d0, d1) = domain;
    let (r0, r1) = range;
    if (d1 - d0).abs() <= f32::EPSILON {
        return r0;
    }
    let mut t = (value - d0) / (d1 - d0);
    if clamp {
        t = t.clamp(0.0, 1.0);
    }
    r0 + t * (r1 - r0)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerMap {
    frame: Dimensions,
    canvas: Dimensions,
    clamp: bool,
}

impl PointerMap {
    pub fn new(frame: Dimensions, canvas: Dimensions) -> Result<Self, GestureError> {
        if frame.width == 0 || frame.height == 0 {
            return Err(ConfigError::ZeroDimension { what: "camera frame" }.into());
        }
        if canvas.width == 0 || canvas.height == 0 {
            return Err(ConfigError::ZeroDimension { what: "canvas" }.into());
        }
        if frame.height <= 2 * VERTICAL_MARGIN {
            return Err(ConfigError::FrameTooShort {
                height: frame.height,
                margin: VERTICAL_MARGIN,
            }
            .into());
        }
        Ok(PointerMap { frame, canvas, clamp: true })
    }

    /// Let out-of-domain fingertips extrapolate past the canvas edges.
    pub fn unclamped(self) -> Self {
        PointerMap { clamp: false, ..self }
    }

    fn x_domain(&self) -> (f32, f32) {
        ((self.frame.width / 2) as f32, self.frame.width as f32)
    }

    fn y_domain(&self) -> (f32, f32) {
        (
            VERTICAL_MARGIN as f32,
            (self.frame.height - VERTICAL_MARGIN) as f32,
        )
    }

    /// Map a fingertip in frame pixels to a canvas point.
    pub fn remap(&self, raw_x: f32, raw_y: f32) -> Point {
        let x = interp(raw_x, self.x_domain(), (0.0, self.canvas.width as f32), self.clamp);
        let y = interp(raw_y, self.y_domain(), (0.0, self.canvas.height as f32), self.clamp);
        // Truncation toward zero, matching an integer cast of the coordinate.
        Point::new(x as i32, y as i32)
    }

    /// Frame position that remaps onto `p`.  Used to synthesize hands.
    pub fn inverse(&self, p: Point) -> (f32, f32) {
        let x = interp(p.x as f32, (0.0, self.canvas.width as f32), self.x_domain(), self.clamp);
        let y = interp(p.y as f32, (0.0, self.canvas.height as f32), self.y_domain(), self.clamp);
        (x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hd() -> PointerMap {
        PointerMap::new(Dimensions::new(1280, 720), Dimensions::new(1280, 720)).unwrap()
    }

    #[test]
    fn right_half_spans_canvas_width() {
        let map = hd();
        assert_eq!(map.remap(640.0, 360.0).x, 0);
        assert_eq!(map.remap(960.0, 360.0).x, 640);
        assert_eq!(map.remap(1280.0, 360.0).x, 1280);
    }

    #[test]
    fn vertical_margins_are_cut() {
        let map = hd();
        assert_eq!(map.remap(800.0, 150.0).y, 0);
        assert_eq!(map.remap(800.0, 360.0).y, 360);
        assert_eq!(map.remap(800.0, 570.0).y, 720);
    }

    #[test]
    fn dead_zone_is_clamped() {
        let map = hd();
        assert_eq!(map.remap(100.0, 20.0), Point::new(0, 0));
        assert_eq!(map.remap(2000.0, 710.0), Point::new(1280, 720));
    }

    #[test]
    fn unclamped_extrapolates() {
        let map = hd().unclamped();
        assert_eq!(map.remap(320.0, 360.0).x, -640);
    }

    #[test]
    fn different_canvas_size() {
        let map = PointerMap::new(Dimensions::new(1280, 720), Dimensions::new(640, 360)).unwrap();
        assert_eq!(map.remap(960.0, 360.0), Point::new(320, 180));
    }

    #[test]
    fn inverse_round_trips_inside_domain() {
        let map = hd();
        let p = Point::new(320, 180);
        let (fx, fy) = map.inverse(p);
        assert_eq!(map.remap(fx, fy), p);
    }

    #[test]
    fn short_frame_is_rejected() {
        let err = PointerMap::new(Dimensions::new(640, 300), Dimensions::new(640, 480)).unwrap_err();
        assert!(matches!(
            err,
            GestureError::Configuration(ConfigError::FrameTooShort { height: 300, .. })
        ));
    }

    #[test]
    fn zero_canvas_is_rejected() {
        assert!(PointerMap::new(Dimensions::new(1280, 720), Dimensions::new(0, 720)).is_err());
    }
}
