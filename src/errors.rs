//! Error types with diagnostics using miette
//!
//! Geometry and annotator errors carry codes and help texts; note parse
//! errors also carry the note text and a span into it.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use crate::host::ArtHandle;

// ============================================================================
// Geometry Errors
// ============================================================================

/// Errors from recovering the pose of a placed item
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("degenerate item geometry: {reason}")]
    #[diagnostic(
        code(texanchor::geometry::degenerate),
        help("the placed item has no area; delete it and place it again")
    )]
    Degenerate { reason: &'static str },

    #[error("inconsistent item geometry: {reason} (off by {deviation})")]
    #[diagnostic(
        code(texanchor::geometry::inconsistent),
        help("the corner points do not describe a transformed rectangle")
    )]
    Inconsistent { reason: &'static str, deviation: f64 },
}

// ============================================================================
// Note Errors
// ============================================================================

/// Errors from reading the note stored on a placed item
#[derive(Error, Diagnostic, Debug)]
pub enum NoteError {
    #[error("malformed item note: {message}")]
    #[diagnostic(code(texanchor::note::syntax))]
    Syntax {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("closing tag `{found}` does not match `{expected}`")]
    #[diagnostic(code(texanchor::note::mismatched_tag))]
    MismatchedTag {
        expected: String,
        found: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("expected `</{expected}>`")]
        span: SourceSpan,
    },

    #[error("unknown entity `&{entity};`")]
    #[diagnostic(code(texanchor::note::unknown_entity))]
    UnknownEntity { entity: String },

    #[error("item note has no `{key}` entry")]
    #[diagnostic(code(texanchor::note::missing))]
    Missing { key: String },

    #[error("invalid value `{value}` for `{key}`")]
    #[diagnostic(code(texanchor::note::invalid_value))]
    InvalidValue { key: String, value: String },
}

// ============================================================================
// Collaborator Errors
// ============================================================================

/// Failure reported by the host application
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
#[error("host call `{context}` failed with code {code}")]
#[diagnostic(code(texanchor::host))]
pub struct HostError {
    pub code: i32,
    pub context: String,
}

impl HostError {
    pub fn new(code: i32, context: impl Into<String>) -> Self {
        Self {
            code,
            context: context.into(),
        }
    }
}

/// Failure reported by the LaTeX compiler collaborator
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
#[error("LaTeX compilation failed: {message}")]
#[diagnostic(
    code(texanchor::compile),
    help("check the LaTeX source of the item")
)]
pub struct CompileError {
    pub message: String,
}

// ============================================================================
// Item Errors
// ============================================================================

/// Errors from creating, reading or redoing an item
#[derive(Error, Diagnostic, Debug)]
pub enum ItemError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Note(#[from] NoteError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Host(#[from] HostError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Compile(#[from] CompileError),
}

// ============================================================================
// Annotator Errors
// ============================================================================

/// Errors from the annotator state machine
#[derive(Error, Diagnostic, Debug)]
pub enum AnnotatorError {
    #[error("annotator has to be active to {operation}")]
    #[diagnostic(
        code(texanchor::annotator::inactive),
        help("call `activate` before hit-testing or drawing")
    )]
    Inactive { operation: &'static str },

    #[error("item {art:?} could not be tracked")]
    #[diagnostic(code(texanchor::annotator::item))]
    Item {
        art: ArtHandle,
        #[source]
        #[diagnostic_source]
        source: ItemError,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Host(#[from] HostError),
}
