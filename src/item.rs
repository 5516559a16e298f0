//! LaTeX items: a property paired with the placed art that shows it.

use glam::DVec2;

use crate::alignment::PlaceAlignment;
use crate::errors::ItemError;
use crate::geometry::{Axis, BoundaryPoints, PlacedGeometry, Pose, Quad};
use crate::host::{ArtHandle, Compiler, Document};
use crate::property::Property;
use crate::types::Tolerance;

/// How far a placed item is from its canonical shape
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BoundaryStatus {
    Ok,
    Stretched,
    /// Sheared out of a rectangle; takes precedence over `Stretched`
    Diamond,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Item {
    property: Property,
    art: ArtHandle,
    geometry: PlacedGeometry,
}

impl Item {
    pub fn new(property: Property, art: ArtHandle, geometry: PlacedGeometry) -> Self {
        Item {
            property,
            art,
            geometry,
        }
    }

    /// Compile `property` and place it with its alignment point at `click`.
    ///
    /// The new item is unrotated and unstretched. Content without an area is
    /// rejected before anything is placed; if the host fails after placing,
    /// the new art is removed again.
    pub fn create(
        doc: &mut impl Document,
        compiler: &mut impl Compiler,
        property: Property,
        click: DVec2,
        tolerance: Tolerance,
    ) -> Result<Item, ItemError> {
        let artifact = compiler.compile(&property)?;
        let content = artifact.content.size();
        let quad = Quad::from_pose(&Pose::new(click, property.alignment()), content);
        let geometry = PlacedGeometry::new(quad, content, tolerance)?;

        let art = doc.place(&artifact)?;
        let placed = doc
            .set_note(art, &property.to_note(true))
            .and_then(|()| doc.set_quad(art, &quad));
        if let Err(err) = placed {
            if let Err(_remove_err) = doc.remove(art) {
                crate::log::warn!(?art, error = %_remove_err, "could not remove half-created item");
            }
            return Err(err.into());
        }

        crate::log::debug!(?art, ?click, alignment = %property.alignment(), "created item");
        Ok(Item::new(property, art, geometry))
    }

    /// Replace the property of a placed item.
    ///
    /// A LaTeX change recompiles the item and puts the new content in place
    /// of the old one with the artist's transform. An alignment change keeps
    /// the placed corners, so the item is anchored at a different point of
    /// the same boundary. The note is rewritten whenever anything changed.
    pub fn change(
        &self,
        doc: &mut impl Document,
        compiler: &mut impl Compiler,
        property: Property,
        tolerance: Tolerance,
    ) -> Result<Item, ItemError> {
        let changes = self.property.compare(&property);
        if !changes.changed() {
            return Ok(self.clone());
        }

        let mut geometry = self.geometry;
        let property = if changes.latex {
            // The stored payload belongs to the old PDF.
            let property = property.with_pdf(None);
            let artifact = compiler.compile(&property)?;
            let content = artifact.content.size();
            let quad = self.replace_content_at(content, property.alignment());
            geometry = PlacedGeometry::new(quad, content, tolerance)?;
            doc.relink(self.art, &artifact)?;
            doc.set_quad(self.art, &quad)?;
            property
        } else {
            property
        };
        doc.set_note(self.art, &property.to_note(true))?;

        crate::log::debug!(art = ?self.art, ?changes, "changed item");
        Ok(Item::new(property, self.art, geometry))
    }

    /// Read an existing item back from its note and placement
    pub fn from_placed(doc: &impl Document, art: ArtHandle, tolerance: Tolerance) -> Result<Item, ItemError> {
        let property = Property::from_note(&doc.note(art)?)?;
        let placement = doc.placement(art)?;
        let geometry = PlacedGeometry::new(placement.quad, placement.content.size(), tolerance)?;
        Ok(Item::new(property, art, geometry))
    }

    pub fn property(&self) -> &Property {
        &self.property
    }

    pub fn art(&self) -> ArtHandle {
        self.art
    }

    pub fn geometry(&self) -> &PlacedGeometry {
        &self.geometry
    }

    pub fn alignment(&self) -> PlaceAlignment {
        self.property.alignment()
    }

    /// Document-space point of `alignment`
    pub fn position(&self, alignment: PlaceAlignment) -> DVec2 {
        self.geometry.position(alignment)
    }

    pub fn positions(&self, alignments: &[PlaceAlignment]) -> Vec<DVec2> {
        self.geometry.positions(alignments)
    }

    /// The point the item is anchored at
    pub fn anchor(&self) -> DVec2 {
        self.position(self.alignment())
    }

    pub fn boundary(&self) -> BoundaryPoints {
        self.geometry.boundary()
    }

    pub fn status(&self) -> BoundaryStatus {
        if self.geometry.is_diamond() {
            BoundaryStatus::Diamond
        } else if self.geometry.is_stretched() {
            BoundaryStatus::Stretched
        } else {
            BoundaryStatus::Ok
        }
    }

    /// Corners restoring the canonical size, or `None` if nothing to do.
    ///
    /// The anchor and the rotation of the first axis are kept.
    pub fn redo_boundary(&self) -> Option<Quad> {
        match self.status() {
            BoundaryStatus::Ok => None,
            BoundaryStatus::Stretched | BoundaryStatus::Diamond => {
                let pose = Pose::new(self.anchor(), self.alignment()).with_angle(self.geometry.angle(Axis::First));
                Some(Quad::from_pose(&pose, self.geometry.content()))
            }
        }
    }

    /// Corners for new content of size `content` in place of the current one.
    ///
    /// The artist's transform carries over unchanged (rotation, stretch and
    /// shear) and the alignment point stays where it is.
    pub fn replace_content(&self, content: DVec2) -> Quad {
        self.replace_content_at(content, self.alignment())
    }

    // The new content is anchored by `alignment` at that point of the
    // current boundary.
    fn replace_content_at(&self, content: DVec2, alignment: PlaceAlignment) -> Quad {
        let quad = self.geometry.quad();
        let scale = content / self.geometry.content();
        let e1 = (quad.bottom_right - quad.bottom_left) * scale.x;
        let e2 = (quad.top_left - quad.bottom_left) * scale.y;

        let f = alignment.factors();
        let bottom_left = self.position(alignment) - f.x * e1 - f.y * e2;
        Quad {
            bottom_left,
            bottom_right: bottom_left + e1,
            top_right: bottom_left + e1 + e2,
            top_left: bottom_left + e2,
        }
    }
}
