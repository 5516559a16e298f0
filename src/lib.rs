//! Pose recovery and boundary tracking for LaTeX items placed in
//! vector-graphics documents.
//!
//! A LaTeX item is a compiled PDF placed in the document and transformed
//! freely by the artist. [`PlacedGeometry`] recovers where the item is
//! anchored, how it is rotated and how much it is stretched from nothing but
//! its four corners, so a recompiled PDF can take its place. The
//! [`Annotator`] tracks the items of a document and draws their boundaries.

pub mod alignment;
pub mod annotator;
pub mod defaults;
pub mod errors;
pub mod geometry;
pub mod host;
pub mod item;
pub mod log;
pub mod note;
pub mod property;
pub mod redo;
pub mod types;

pub use alignment::{PlaceAlignment, TextAlignHorizontal, TextAlignVertical};
pub use annotator::{Annotator, AnnotatorStyle, TrackedItem};
pub use errors::{AnnotatorError, CompileError, GeometryError, HostError, ItemError, NoteError};
pub use geometry::{Axis, BoundaryPoints, PlacedGeometry, Pose, Quad};
pub use host::{ArtHandle, Artifact, Compiler, Document, Placement, Selection, Surface, View, Visibility};
pub use item::{BoundaryStatus, Item};
pub use property::{HashMethod, PdfContents, Property, PropertyChanges};
pub use redo::{RedoMode, RedoReport, redo_items};
pub use types::{Angle, Rect, Rgb, Tolerance};
