//! Boundary annotations for the LaTeX items of a document.
//!
//! While active, the annotator keeps the nine boundary points of every item
//! and uses them to draw outlines over the document and to answer hit tests.

use glam::DVec2;

use crate::alignment::PlaceAlignment;
use crate::defaults;
use crate::errors::{AnnotatorError, ItemError};
use crate::geometry::BoundaryPoints;
use crate::host::{ArtHandle, Document, Selection, Surface, View};
use crate::item::{BoundaryStatus, Item};
use crate::types::{Rect, Rgb, Tolerance};

/// How annotations are drawn
#[derive(Clone, Debug, PartialEq)]
pub struct AnnotatorStyle {
    pub line_width: f64,
    /// Radius of the dot marking the item's alignment point
    pub anchor_radius: f64,
    pub baseline_dash: Vec<f64>,
    pub color_ok: Rgb,
    pub color_stretched: Rgb,
    pub color_diamond: Rgb,
}

impl Default for AnnotatorStyle {
    fn default() -> Self {
        AnnotatorStyle {
            line_width: defaults::LINE_WIDTH,
            anchor_radius: defaults::ANCHOR_RADIUS,
            baseline_dash: defaults::BASELINE_DASH.to_vec(),
            color_ok: defaults::COLOR_OK,
            color_stretched: defaults::COLOR_STRETCHED,
            color_diamond: defaults::COLOR_DIAMOND,
        }
    }
}

impl AnnotatorStyle {
    pub fn color(&self, status: BoundaryStatus) -> Rgb {
        match status {
            BoundaryStatus::Ok => self.color_ok,
            BoundaryStatus::Stretched => self.color_stretched,
            BoundaryStatus::Diamond => self.color_diamond,
        }
    }
}

/// An item with the boundary points computed when it was tracked
#[derive(Clone, Debug, PartialEq)]
pub struct TrackedItem {
    pub item: Item,
    pub boundary: BoundaryPoints,
}

#[derive(Debug)]
pub struct Annotator {
    tolerance: Tolerance,
    style: AnnotatorStyle,
    active: bool,
    tracked: Vec<TrackedItem>,
    hit: Option<ArtHandle>,
}

impl Annotator {
    pub fn new(tolerance: Tolerance, style: AnnotatorStyle) -> Self {
        Annotator {
            tolerance,
            style,
            active: false,
            tracked: Vec::new(),
            hit: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn tracked(&self) -> &[TrackedItem] {
        &self.tracked
    }

    /// Item found by the last successful hit test
    pub fn hit_item(&self) -> Option<ArtHandle> {
        self.hit
    }

    pub fn tolerance(&self) -> Tolerance {
        self.tolerance
    }

    pub fn style(&self) -> &AnnotatorStyle {
        &self.style
    }

    pub fn activate(&mut self, doc: &impl Document, view: &mut impl View) {
        self.active = true;
        if doc.has_open_document() {
            self.rebuild(doc, view);
            self.invalidate(view, None);
        }
    }

    pub fn deactivate(&mut self, view: &mut impl View) {
        self.active = false;
        self.tracked.clear();
        self.hit = None;
        self.invalidate(view, None);
    }

    pub fn selection_changed(&mut self, doc: &impl Document, view: &mut impl View) {
        if self.active {
            self.rebuild(doc, view);
        }
    }

    /// Refresh after a redo pass moved or replaced items
    pub fn items_redone(&mut self, doc: &impl Document, view: &mut impl View) {
        if self.active {
            self.rebuild(doc, view);
            self.invalidate(view, None);
        }
    }

    fn rebuild(&mut self, doc: &impl Document, view: &mut impl View) {
        self.hit = None;
        match self.collect(doc) {
            Ok(tracked) => {
                crate::log::debug!(count = tracked.len(), "tracking items");
                self.tracked = tracked;
            }
            Err(err) => {
                crate::log::warn!(error = %err, "could not track items");
                self.tracked.clear();
                view.alert(&err.to_string());
            }
        }
    }

    fn collect(&self, doc: &impl Document) -> Result<Vec<TrackedItem>, AnnotatorError> {
        if !doc.has_open_document() {
            return Ok(Vec::new());
        }
        let arts = doc.items(Selection::All)?;
        let mut tracked = Vec::with_capacity(arts.len());
        for art in arts {
            let track = || -> Result<TrackedItem, ItemError> {
                let item = Item::from_placed(doc, art, self.tolerance)?;
                let boundary = item.boundary();
                boundary.check(&self.tolerance)?;
                Ok(TrackedItem { item, boundary })
            };
            tracked.push(track().map_err(|source| AnnotatorError::Item { art, source })?);
        }
        Ok(tracked)
    }

    /// Whether the cursor is over a tracked item
    pub fn hit_test(&mut self, view: &impl View, cursor: DVec2) -> Result<bool, AnnotatorError> {
        if !self.active {
            return Err(AnnotatorError::Inactive { operation: "hit-test" });
        }
        self.hit = view
            .hit_test(cursor)?
            .filter(|art| self.tracked.iter().any(|t| t.item.art() == *art));
        Ok(self.hit.is_some())
    }

    /// Draw the outline, anchor dot and baseline of every visible tracked item
    pub fn draw(&self, doc: &impl Document, surface: &mut impl Surface) -> Result<(), AnnotatorError> {
        if !self.active {
            return Err(AnnotatorError::Inactive { operation: "draw" });
        }
        surface.set_line_width(self.style.line_width);
        for tracked in &self.tracked {
            let visibility = doc.visibility(tracked.item.art())?;
            if visibility.hidden {
                continue;
            }
            let mut color = self.style.color(tracked.item.status());
            if visibility.locked {
                color = color.dimmed();
            }
            surface.set_color(color);
            surface.set_dash(&[]);

            let boundary = &tracked.boundary;
            surface.polygon(&boundary.outline(), false);

            let anchor = boundary[tracked.item.alignment()];
            let radius = DVec2::splat(self.style.anchor_radius);
            surface.ellipse(Rect::new(anchor - radius, anchor + radius), true);

            if tracked.item.property().is_baseline() {
                surface.set_dash(&self.style.baseline_dash);
                surface.line(boundary[PlaceAlignment::MidLeft], boundary[PlaceAlignment::MidRight]);
                surface.set_dash(&[]);
            }
        }
        Ok(())
    }

    /// Ask for a redraw of `region`, or of the whole view.
    ///
    /// Host failures are logged and otherwise ignored.
    pub fn invalidate(&self, view: &mut impl View, region: Option<Rect>) {
        let region = match region {
            Some(region) => Ok(region),
            None => view.view_bounds(),
        };
        if let Err(err) = region.and_then(|region| view.invalidate(region)) {
            crate::log::warn!(error = %err, "could not invalidate view");
        }
    }
}
