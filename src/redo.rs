//! Redo passes over the items of a document.

use crate::errors::{HostError, ItemError};
use crate::host::{ArtHandle, Compiler, Document, Selection};
use crate::item::Item;
use crate::types::Tolerance;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RedoMode {
    /// Reset stretched and diamond items to their canonical size
    Boundary,
    /// Recompile every item and place the new content in its pose
    Latex,
}

/// Outcome of a redo pass
#[derive(Debug, Default)]
pub struct RedoReport {
    /// Items that were moved or replaced
    pub redone: Vec<ArtHandle>,
    /// Hidden or locked items, left untouched
    pub skipped: Vec<ArtHandle>,
    pub failed: Vec<(ArtHandle, ItemError)>,
}

impl RedoReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    /// Alert text for the user when items were skipped
    pub fn skipped_message(&self) -> Option<String> {
        if self.skipped.is_empty() {
            return None;
        }
        Some(format!(
            "The redo got {} hidden / locked items. They were skipped.",
            self.skipped.len()
        ))
    }
}

/// Redo every item in `selection`.
///
/// Hidden and locked items are skipped. A failing item is recorded in the
/// report and the pass continues; only a failure to enumerate the items
/// aborts it.
pub fn redo_items(
    doc: &mut impl Document,
    compiler: &mut impl Compiler,
    selection: Selection,
    mode: RedoMode,
    tolerance: Tolerance,
) -> Result<RedoReport, HostError> {
    let mut report = RedoReport::default();
    for art in doc.items(selection)? {
        match redo_item(doc, compiler, art, mode, tolerance) {
            Ok(Redone::Yes) => report.redone.push(art),
            Ok(Redone::No) => {}
            Ok(Redone::Skipped) => {
                crate::log::warn!(?art, "skipping hidden or locked item");
                report.skipped.push(art);
            }
            Err(err) => {
                crate::log::warn!(?art, error = %err, "redo failed");
                report.failed.push((art, err));
            }
        }
    }
    crate::log::debug!(
        ?mode,
        redone = report.redone.len(),
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "redo pass finished"
    );
    Ok(report)
}

enum Redone {
    Yes,
    No,
    Skipped,
}

fn redo_item(
    doc: &mut impl Document,
    compiler: &mut impl Compiler,
    art: ArtHandle,
    mode: RedoMode,
    tolerance: Tolerance,
) -> Result<Redone, ItemError> {
    let visibility = doc.visibility(art)?;
    if visibility.hidden || visibility.locked {
        return Ok(Redone::Skipped);
    }

    let item = Item::from_placed(doc, art, tolerance)?;
    match mode {
        RedoMode::Boundary => match item.redo_boundary() {
            Some(quad) => {
                doc.set_quad(art, &quad)?;
                Ok(Redone::Yes)
            }
            None => Ok(Redone::No),
        },
        RedoMode::Latex => {
            let artifact = compiler.compile(item.property())?;
            doc.relink(art, &artifact)?;
            doc.set_quad(art, &item.replace_content(artifact.content.size()))?;
            // The stored payload belongs to the old PDF.
            let property = item.property().clone().with_pdf(None);
            doc.set_note(art, &property.to_note(true))?;
            Ok(Redone::Yes)
        }
    }
}
