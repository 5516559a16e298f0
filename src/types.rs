//! Small value types shared by the geometry engine and the annotator.

use std::f64::consts::{PI, TAU};
use std::fmt;
use std::ops::{Add, Neg, Sub};

use glam::{DVec2, dvec2};

use crate::defaults;

/// Angle in radians, counter-clockwise in y-up document space
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default)]
#[repr(transparent)]
pub struct Angle(pub f64);

impl Angle {
    pub const ZERO: Angle = Angle(0.0);
    pub const QUARTER: Angle = Angle(PI / 2.0);

    #[inline]
    pub fn from_degrees(deg: f64) -> Angle {
        Angle(deg.to_radians())
    }

    /// Direction of a vector, already in `(-π, π]`
    #[inline]
    pub fn of(v: DVec2) -> Angle {
        Angle(v.y.atan2(v.x))
    }

    #[inline]
    pub fn radians(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn degrees(self) -> f64 {
        self.0.to_degrees()
    }

    /// Wrap into `(-π, π]`
    pub fn normalized(self) -> Angle {
        let mut a = self.0.rem_euclid(TAU);
        if a > PI {
            a -= TAU;
        }
        Angle(a)
    }

    /// Unit vector pointing along this angle
    #[inline]
    pub fn direction(self) -> DVec2 {
        let (sin, cos) = self.0.sin_cos();
        dvec2(cos, sin)
    }

    /// Smallest absolute difference between two angles, in `[0, π]`
    pub fn distance(self, other: Angle) -> f64 {
        (self - other).normalized().0.abs()
    }
}

impl Add for Angle {
    type Output = Angle;
    fn add(self, rhs: Angle) -> Angle {
        Angle(self.0 + rhs.0)
    }
}

impl Sub for Angle {
    type Output = Angle;
    fn sub(self, rhs: Angle) -> Angle {
        Angle(self.0 - rhs.0)
    }
}

impl Neg for Angle {
    type Output = Angle;
    fn neg(self) -> Angle {
        Angle(-self.0)
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// Axis-aligned rectangle in document space (y-up)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub min: DVec2,
    pub max: DVec2,
}

impl Rect {
    pub fn new(min: DVec2, max: DVec2) -> Self {
        Rect { min, max }
    }

    /// Rectangle of the given size with its bottom-left corner at the origin
    pub fn from_size(size: DVec2) -> Self {
        Rect {
            min: DVec2::ZERO,
            max: size,
        }
    }

    /// Create an empty rectangle (will expand on first point)
    pub fn empty() -> Self {
        Rect {
            min: DVec2::splat(f64::MAX),
            max: DVec2::splat(f64::MIN),
        }
    }

    /// Smallest rectangle containing all points
    pub fn enclosing(points: impl IntoIterator<Item = DVec2>) -> Self {
        let mut rect = Rect::empty();
        for p in points {
            rect.expand_point(p);
        }
        rect
    }

    /// Check if the rect is empty (never expanded)
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn expand_point(&mut self, p: DVec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn size(&self) -> DVec2 {
        self.max - self.min
    }

    pub fn center(&self) -> DVec2 {
        (self.min + self.max) * 0.5
    }

    pub fn contains(&self, p: DVec2) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

/// Tolerances shared by every comparison in the geometry engine
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tolerance {
    /// Two points closer than this are the same point
    pub eps_pos: f64,
    /// Angles closer than this (radians) are the same angle
    pub eps_angle: f64,
    /// Stretch factors and axis cosines closer than this are equal
    pub eps_stretch: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Tolerance {
            eps_pos: defaults::EPS_POS,
            eps_angle: defaults::EPS_ANGLE,
            eps_stretch: defaults::EPS_STRETCH,
        }
    }
}

/// 16-bit per channel RGB colour, the host's drawing colour model
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Rgb {
    pub red: u16,
    pub green: u16,
    pub blue: u16,
}

impl Rgb {
    pub const fn new(red: u16, green: u16, blue: u16) -> Self {
        Rgb { red, green, blue }
    }

    /// Same hue at half intensity (locked items)
    pub fn dimmed(self) -> Self {
        Rgb {
            red: self.red / 2,
            green: self.green / 2,
            blue: self.blue / 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn angle_normalized_wraps_into_half_open_range() {
        assert!((Angle(PI / 2.0 + TAU).normalized().0 - PI / 2.0).abs() < 1e-12);
        assert!((Angle(-PI).normalized().0 - PI).abs() < 1e-12);
        assert!((Angle(-3.0 * PI / 2.0).normalized().0 - PI / 2.0).abs() < 1e-12);
        assert_eq!(Angle(0.25).normalized(), Angle(0.25));
    }

    #[test]
    fn angle_of_matches_direction() {
        for deg in [-170.0, -90.0, -12.5, 0.0, 45.0, 90.0, 163.1] {
            let a = Angle::from_degrees(deg);
            assert!(Angle::of(a.direction()).distance(a) < 1e-12);
        }
    }

    #[test]
    fn angle_distance_crosses_the_seam() {
        let a = Angle::from_degrees(179.0);
        let b = Angle::from_degrees(-179.0);
        assert!((a.distance(b) - 2f64.to_radians()).abs() < 1e-12);
    }

    #[test]
    fn rect_enclosing_points() {
        let rect = Rect::enclosing([dvec2(1.0, 2.0), dvec2(-3.0, 5.0), dvec2(0.0, -1.0)]);
        assert_eq!(rect.min, dvec2(-3.0, -1.0));
        assert_eq!(rect.max, dvec2(1.0, 5.0));
        assert_eq!(rect.size(), dvec2(4.0, 6.0));
        assert_eq!(rect.center(), dvec2(-1.0, 2.0));
        assert!(rect.contains(dvec2(0.0, 0.0)));
        assert!(!rect.contains(dvec2(2.0, 0.0)));
    }

    #[test]
    fn rect_empty_until_expanded() {
        let mut rect = Rect::empty();
        assert!(rect.is_empty());
        rect.expand_point(dvec2(1.0, 1.0));
        assert!(!rect.is_empty());
        assert_eq!(rect.width(), 0.0);
    }

    #[test]
    fn rgb_dimmed_halves_channels() {
        assert_eq!(Rgb::new(65000, 0, 301).dimmed(), Rgb::new(32500, 0, 150));
    }
}
