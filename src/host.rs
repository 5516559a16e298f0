//! Services of the host application.
//!
//! The library never owns placed art. It refers to it through [`ArtHandle`]s
//! and asks the host document for everything it needs.

use std::path::PathBuf;

use glam::DVec2;

use crate::errors::{CompileError, HostError};
use crate::geometry::Quad;
use crate::property::Property;
use crate::types::{Rect, Rgb};

/// Opaque reference to a piece of placed art in the host document
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ArtHandle(pub u64);

/// Which items a document query returns
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Selection {
    All,
    Selected,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct Visibility {
    pub hidden: bool,
    pub locked: bool,
}

/// Where a placed item sits in the document
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Placement {
    /// Transformed corners of the content box
    pub quad: Quad,
    /// Untransformed content box of the placed PDF
    pub content: Rect,
}

/// Compiled LaTeX output ready to be placed
#[derive(Clone, Debug, PartialEq)]
pub struct Artifact {
    pub pdf_path: PathBuf,
    pub content: Rect,
}

/// The open document of the host application
pub trait Document {
    fn has_open_document(&self) -> bool;

    /// Items carrying a note, in document order
    fn items(&self, selection: Selection) -> Result<Vec<ArtHandle>, HostError>;

    fn note(&self, art: ArtHandle) -> Result<String, HostError>;

    fn set_note(&mut self, art: ArtHandle, note: &str) -> Result<(), HostError>;

    fn placement(&self, art: ArtHandle) -> Result<Placement, HostError>;

    /// Transform the item so its content box lands on `quad`
    fn set_quad(&mut self, art: ArtHandle, quad: &Quad) -> Result<(), HostError>;

    fn visibility(&self, art: ArtHandle) -> Result<Visibility, HostError>;

    /// Place a new item, unrotated, at the document origin
    fn place(&mut self, artifact: &Artifact) -> Result<ArtHandle, HostError>;

    /// Swap the linked content of an existing item
    fn relink(&mut self, art: ArtHandle, artifact: &Artifact) -> Result<(), HostError>;

    /// Delete art from the document
    fn remove(&mut self, art: ArtHandle) -> Result<(), HostError>;
}

/// The document window the annotations are drawn in
pub trait View {
    /// Placed art under the cursor, if any
    fn hit_test(&self, cursor: DVec2) -> Result<Option<ArtHandle>, HostError>;

    fn view_bounds(&self) -> Result<Rect, HostError>;

    fn invalidate(&mut self, region: Rect) -> Result<(), HostError>;

    /// Show a message to the user
    fn alert(&mut self, message: &str);
}

/// Annotation drawing primitives, in document coordinates
pub trait Surface {
    fn set_line_width(&mut self, width: f64);
    fn set_color(&mut self, color: Rgb);
    /// An empty pattern draws solid lines.
    fn set_dash(&mut self, pattern: &[f64]);
    fn polygon(&mut self, points: &[DVec2], filled: bool);
    fn ellipse(&mut self, bounds: Rect, filled: bool);
    fn line(&mut self, from: DVec2, to: DVec2);
}

/// Turns a property into a placeable PDF
pub trait Compiler {
    fn compile(&mut self, property: &Property) -> Result<Artifact, CompileError>;
}
