//! Pose recovery for placed items.
//!
//! A placed item is the canonical content rectangle (the PDF box, `w × h`)
//! mapped into document space by whatever the artist did to it: translation,
//! rotation, scaling along the item's own axes, and scaling along document
//! axes after a rotation (which shears the rectangle into a "diamond").
//! The only inputs are the four transformed corners and the content size.
//!
//! Conventions:
//! - document space is y-up, angles are counter-clockwise, in `(-π, π]`
//! - the first local axis runs bottom-left → bottom-right (content width)
//! - the second local axis runs bottom-left → top-left (content height)

use glam::{DAffine2, DVec2};

use crate::alignment::PlaceAlignment;
use crate::errors::GeometryError;
use crate::types::{Angle, Rect, Tolerance};

/// Euclidean length of a vector
#[inline]
pub fn norm(v: DVec2) -> f64 {
    (v.x * v.x + v.y * v.y).sqrt()
}

/// Distance between two points
#[inline]
pub fn distance(a: DVec2, b: DVec2) -> f64 {
    norm(a - b)
}

/// Local axis of a placed item
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Along the content width
    First,
    /// Along the content height
    Second,
}

/// The four corners of a placed item in document space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Quad {
    pub bottom_left: DVec2,
    pub bottom_right: DVec2,
    pub top_right: DVec2,
    pub top_left: DVec2,
}

impl Quad {
    /// Unrotated quad covering an axis-aligned rectangle
    pub fn from_rect(rect: Rect) -> Self {
        Quad {
            bottom_left: rect.min,
            bottom_right: DVec2::new(rect.max.x, rect.min.y),
            top_right: rect.max,
            top_left: DVec2::new(rect.min.x, rect.max.y),
        }
    }

    /// Corners of content of size `content` placed with `pose`
    pub fn from_pose(pose: &Pose, content: DVec2) -> Self {
        let direction = pose.angle.direction();
        let e1 = direction * (pose.stretch.x * content.x);
        let e2 = direction.perp() * (pose.stretch.y * content.y);
        let f = pose.alignment.factors();
        let bottom_left = pose.anchor - f.x * e1 - f.y * e2;
        Quad {
            bottom_left,
            bottom_right: bottom_left + e1,
            top_right: bottom_left + e1 + e2,
            top_left: bottom_left + e2,
        }
    }

    /// Corners in drawing order, starting at the bottom-left
    pub fn corners(&self) -> [DVec2; 4] {
        [self.bottom_left, self.bottom_right, self.top_right, self.top_left]
    }

    /// Axis-aligned bounds of the corners
    pub fn bounds(&self) -> Rect {
        Rect::enclosing(self.corners())
    }

    /// Apply a document-space transform to every corner
    pub fn transformed(&self, transform: DAffine2) -> Self {
        Quad {
            bottom_left: transform.transform_point2(self.bottom_left),
            bottom_right: transform.transform_point2(self.bottom_right),
            top_right: transform.transform_point2(self.top_right),
            top_left: transform.transform_point2(self.top_left),
        }
    }

    /// Same corners moved by `offset`
    pub fn translated(&self, offset: DVec2) -> Self {
        self.transformed(DAffine2::from_translation(offset))
    }
}

/// Semantic pose of an item: where its alignment point sits, how it is
/// rotated, and how much each local axis is stretched.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Pose {
    pub anchor: DVec2,
    pub alignment: PlaceAlignment,
    pub angle: Angle,
    pub stretch: DVec2,
}

impl Pose {
    /// Unrotated, unstretched pose
    pub fn new(anchor: DVec2, alignment: PlaceAlignment) -> Self {
        Pose {
            anchor,
            alignment,
            angle: Angle::ZERO,
            stretch: DVec2::ONE,
        }
    }

    pub fn with_angle(self, angle: Angle) -> Self {
        Pose { angle, ..self }
    }

    pub fn with_stretch(self, stretch: DVec2) -> Self {
        Pose { stretch, ..self }
    }
}

/// Validated geometry of a placed item
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlacedGeometry {
    quad: Quad,
    content: DVec2,
    tolerance: Tolerance,
}

impl PlacedGeometry {
    /// Validate the corners of a placed item.
    ///
    /// `content` is the size of the untransformed content box. Fails with
    /// [`GeometryError::Degenerate`] if the item has no area and with
    /// [`GeometryError::Inconsistent`] if the corners are not a parallelogram.
    pub fn new(quad: Quad, content: DVec2, tolerance: Tolerance) -> Result<Self, GeometryError> {
        let eps = tolerance.eps_pos;
        if !content.is_finite() || content.x <= eps || content.y <= eps {
            return Err(GeometryError::Degenerate {
                reason: "content box has no area",
            });
        }
        if !quad.corners().iter().all(|c| c.is_finite()) {
            return Err(GeometryError::Degenerate {
                reason: "corner is not finite",
            });
        }

        let e1 = quad.bottom_right - quad.bottom_left;
        let e2 = quad.top_left - quad.bottom_left;
        let (l1, l2) = (norm(e1), norm(e2));
        if l1 < eps || l2 < eps {
            return Err(GeometryError::Degenerate {
                reason: "coincident corners",
            });
        }
        // Height of the parallelogram over its longer edge.
        if e1.perp_dot(e2).abs() < eps * l1.max(l2) {
            return Err(GeometryError::Degenerate {
                reason: "collinear corners",
            });
        }

        let deviation = distance(quad.top_right, quad.bottom_left + e1 + e2);
        if deviation > eps {
            return Err(GeometryError::Inconsistent {
                reason: "top-right corner is off the parallelogram",
                deviation,
            });
        }

        Ok(PlacedGeometry {
            quad,
            content,
            tolerance,
        })
    }

    pub fn quad(&self) -> &Quad {
        &self.quad
    }

    pub fn content(&self) -> DVec2 {
        self.content
    }

    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    fn edge(&self, axis: Axis) -> DVec2 {
        match axis {
            Axis::First => self.quad.bottom_right - self.quad.bottom_left,
            Axis::Second => self.quad.top_left - self.quad.bottom_left,
        }
    }

    /// Direction of a local axis in document space
    pub fn angle(&self, axis: Axis) -> Angle {
        Angle::of(self.edge(axis)).normalized()
    }

    /// Placed edge length relative to the content size along `axis`
    pub fn stretch(&self, axis: Axis) -> f64 {
        let reference = match axis {
            Axis::First => self.content.x,
            Axis::Second => self.content.y,
        };
        norm(self.edge(axis)) / reference
    }

    pub fn is_rotated(&self) -> bool {
        self.angle(Axis::First).radians().abs() >= self.tolerance.eps_angle
    }

    /// The local axes are no longer perpendicular.
    ///
    /// Cosines are compared, so the stretch tolerance applies.
    pub fn is_diamond(&self) -> bool {
        let between = self.angle(Axis::Second) - self.angle(Axis::First);
        between.radians().cos().abs() >= self.tolerance.eps_stretch
    }

    pub fn is_stretched(&self) -> bool {
        let eps = self.tolerance.eps_stretch;
        (1.0 - self.stretch(Axis::First)).abs() >= eps
            || (1.0 - self.stretch(Axis::Second)).abs() >= eps
    }

    // Second axis points down: the content is flipped.
    fn is_mirrored(&self) -> bool {
        self.edge(Axis::First).perp_dot(self.edge(Axis::Second)) < 0.0
    }

    /// Document-space point of an alignment
    pub fn position(&self, alignment: PlaceAlignment) -> DVec2 {
        let f = alignment.factors();
        let bounds = self.quad.bounds();

        if !self.is_rotated() && !self.is_diamond() && !self.is_mirrored() {
            return bounds.min + f * bounds.size();
        }

        let v1 = self.angle(Axis::First).direction() * (self.stretch(Axis::First) * self.content.x);
        let v2 = self.angle(Axis::Second).direction() * (self.stretch(Axis::Second) * self.content.y);

        // The bounds' lower-left corner is the lowest extent of the rebuilt
        // parallelogram; shifting back by that extent lands on the node.
        let extent = DVec2::ZERO.min(v1).min(v2).min(v1 + v2);
        let node = bounds.min - extent;
        crate::log::trace!(?alignment, ?node, "rebuilt item frame");
        node + f.x * v1 + f.y * v2
    }

    /// Points of several alignments, element-wise equal to [`Self::position`]
    pub fn positions(&self, alignments: &[PlaceAlignment]) -> Vec<DVec2> {
        alignments.iter().map(|&a| self.position(a)).collect()
    }

    /// Recovered pose with the anchor at `alignment`
    pub fn pose(&self, alignment: PlaceAlignment) -> Pose {
        Pose {
            anchor: self.position(alignment),
            alignment,
            angle: self.angle(Axis::First),
            stretch: DVec2::new(self.stretch(Axis::First), self.stretch(Axis::Second)),
        }
    }

    /// Points of all nine alignments
    pub fn boundary(&self) -> BoundaryPoints {
        BoundaryPoints(PlaceAlignment::ALL.map(|a| self.position(a)))
    }
}

/// One point per [`PlaceAlignment`]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundaryPoints([DVec2; 9]);

impl BoundaryPoints {
    /// Points given in [`PlaceAlignment::ALL`] order
    pub fn from_points(points: [DVec2; 9]) -> Self {
        BoundaryPoints(points)
    }

    pub fn get(&self, alignment: PlaceAlignment) -> DVec2 {
        self.0[alignment.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (PlaceAlignment, DVec2)> + '_ {
        PlaceAlignment::ALL.into_iter().zip(self.0.iter().copied())
    }

    /// Closed outline through the left edge midpoint, where the baseline starts
    pub fn outline(&self) -> [DVec2; 6] {
        [
            PlaceAlignment::MidLeft,
            PlaceAlignment::TopLeft,
            PlaceAlignment::TopRight,
            PlaceAlignment::BotRight,
            PlaceAlignment::BotLeft,
            PlaceAlignment::MidLeft,
        ]
        .map(|a| self.get(a))
    }

    pub fn bounds(&self) -> Rect {
        Rect::enclosing(self.0)
    }

    /// Check that all nine points come from one affine map of the unit square.
    pub fn check(&self, tolerance: &Tolerance) -> Result<(), GeometryError> {
        let origin = self.get(PlaceAlignment::BotLeft);
        let e1 = self.get(PlaceAlignment::BotRight) - origin;
        let e2 = self.get(PlaceAlignment::TopLeft) - origin;

        let deviation = self
            .iter()
            .map(|(a, p)| {
                let f = a.factors();
                distance(p, origin + f.x * e1 + f.y * e2)
            })
            .fold(0.0, f64::max);

        if deviation.is_nan() || deviation > tolerance.eps_pos {
            return Err(GeometryError::Inconsistent {
                reason: "boundary points do not share one affine map",
                deviation,
            });
        }
        Ok(())
    }
}

impl std::ops::Index<PlaceAlignment> for BoundaryPoints {
    type Output = DVec2;

    fn index(&self, alignment: PlaceAlignment) -> &DVec2 {
        &self.0[alignment.index()]
    }
}
