//! In-memory host used by the integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Once;

use glam::{DVec2, dvec2};
use texanchor::{
    ArtHandle, Artifact, CompileError, Compiler, Document, HostError, Placement, Pose, Property, Quad,
    Rect, Rgb, Selection, Surface, View, Visibility,
};

/// Logs go to the test output; filter with `RUST_LOG`.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

#[derive(Clone, Debug)]
pub struct FakeArt {
    pub note: String,
    pub placement: Placement,
    pub visibility: Visibility,
    pub selected: bool,
    pub pdf_path: Option<PathBuf>,
}

#[derive(Debug, Default)]
pub struct FakeDocument {
    pub open: bool,
    pub order: Vec<ArtHandle>,
    pub arts: HashMap<ArtHandle, FakeArt>,
    pub next_handle: u64,
    /// Make `items` fail
    pub broken: bool,
    /// Make `set_quad` fail
    pub frozen: bool,
}

impl FakeDocument {
    pub fn new() -> Self {
        init_tracing();
        FakeDocument {
            open: true,
            ..FakeDocument::default()
        }
    }

    /// Add an item showing `property` with content of `content` size placed by `pose`
    pub fn add(&mut self, property: &Property, content: DVec2, pose: Pose) -> ArtHandle {
        self.add_quad(property, content, Quad::from_pose(&pose, content))
    }

    pub fn add_quad(&mut self, property: &Property, content: DVec2, quad: Quad) -> ArtHandle {
        let art = self.new_art(Placement {
            quad,
            content: Rect::from_size(content),
        });
        self.art_mut(art).note = property.to_note(false);
        art
    }

    fn new_art(&mut self, placement: Placement) -> ArtHandle {
        self.next_handle += 1;
        let art = ArtHandle(self.next_handle);
        self.order.push(art);
        self.arts.insert(
            art,
            FakeArt {
                note: String::new(),
                placement,
                visibility: Visibility::default(),
                selected: false,
                pdf_path: None,
            },
        );
        art
    }

    pub fn art(&self, art: ArtHandle) -> &FakeArt {
        &self.arts[&art]
    }

    pub fn art_mut(&mut self, art: ArtHandle) -> &mut FakeArt {
        self.arts.get_mut(&art).unwrap()
    }

    fn lookup(&self, art: ArtHandle, context: &str) -> Result<&FakeArt, HostError> {
        self.arts.get(&art).ok_or_else(|| HostError::new(-1, context))
    }

    fn lookup_mut(&mut self, art: ArtHandle, context: &str) -> Result<&mut FakeArt, HostError> {
        self.arts.get_mut(&art).ok_or_else(|| HostError::new(-1, context))
    }
}

impl Document for FakeDocument {
    fn has_open_document(&self) -> bool {
        self.open
    }

    fn items(&self, selection: Selection) -> Result<Vec<ArtHandle>, HostError> {
        if self.broken {
            return Err(HostError::new(-2, "items"));
        }
        Ok(self
            .order
            .iter()
            .copied()
            .filter(|art| selection == Selection::All || self.arts[art].selected)
            .collect())
    }

    fn note(&self, art: ArtHandle) -> Result<String, HostError> {
        Ok(self.lookup(art, "note")?.note.clone())
    }

    fn set_note(&mut self, art: ArtHandle, note: &str) -> Result<(), HostError> {
        self.lookup_mut(art, "set_note")?.note = note.to_string();
        Ok(())
    }

    fn placement(&self, art: ArtHandle) -> Result<Placement, HostError> {
        Ok(self.lookup(art, "placement")?.placement)
    }

    fn set_quad(&mut self, art: ArtHandle, quad: &Quad) -> Result<(), HostError> {
        if self.frozen {
            return Err(HostError::new(-4, "set_quad"));
        }
        self.lookup_mut(art, "set_quad")?.placement.quad = *quad;
        Ok(())
    }

    fn visibility(&self, art: ArtHandle) -> Result<Visibility, HostError> {
        Ok(self.lookup(art, "visibility")?.visibility)
    }

    fn place(&mut self, artifact: &Artifact) -> Result<ArtHandle, HostError> {
        let art = self.new_art(Placement {
            quad: Quad::from_rect(Rect::from_size(artifact.content.size())),
            content: artifact.content,
        });
        self.art_mut(art).pdf_path = Some(artifact.pdf_path.clone());
        Ok(art)
    }

    fn relink(&mut self, art: ArtHandle, artifact: &Artifact) -> Result<(), HostError> {
        let fake = self.lookup_mut(art, "relink")?;
        fake.placement.content = artifact.content;
        fake.pdf_path = Some(artifact.pdf_path.clone());
        Ok(())
    }

    fn remove(&mut self, art: ArtHandle) -> Result<(), HostError> {
        self.arts.remove(&art).ok_or_else(|| HostError::new(-1, "remove"))?;
        self.order.retain(|a| *a != art);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct FakeView {
    /// What the host reports under the cursor
    pub under_cursor: Option<ArtHandle>,
    pub invalidated: Vec<Rect>,
    pub alerts: Vec<String>,
    /// Make every fallible call fail
    pub broken: bool,
}

impl FakeView {
    pub fn bounds() -> Rect {
        Rect::new(dvec2(-1000.0, -1000.0), dvec2(1000.0, 1000.0))
    }
}

impl View for FakeView {
    fn hit_test(&self, _cursor: DVec2) -> Result<Option<ArtHandle>, HostError> {
        if self.broken {
            return Err(HostError::new(-3, "hit_test"));
        }
        Ok(self.under_cursor)
    }

    fn view_bounds(&self) -> Result<Rect, HostError> {
        if self.broken {
            return Err(HostError::new(-3, "view_bounds"));
        }
        Ok(FakeView::bounds())
    }

    fn invalidate(&mut self, region: Rect) -> Result<(), HostError> {
        if self.broken {
            return Err(HostError::new(-3, "invalidate"));
        }
        self.invalidated.push(region);
        Ok(())
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DrawCall {
    LineWidth(f64),
    Color(Rgb),
    Dash(Vec<f64>),
    Polygon(Vec<DVec2>, bool),
    Ellipse(Rect, bool),
    Line(DVec2, DVec2),
}

#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<DrawCall>,
}

impl RecordingSurface {
    pub fn polygons(&self) -> Vec<&[DVec2]> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Polygon(points, _) => Some(points.as_slice()),
                _ => None,
            })
            .collect()
    }

    pub fn colors(&self) -> Vec<Rgb> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Color(color) => Some(*color),
                _ => None,
            })
            .collect()
    }

    pub fn lines(&self) -> Vec<(DVec2, DVec2)> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Line(a, b) => Some((*a, *b)),
                _ => None,
            })
            .collect()
    }

    pub fn ellipses(&self) -> Vec<Rect> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DrawCall::Ellipse(rect, _) => Some(*rect),
                _ => None,
            })
            .collect()
    }
}

impl Surface for RecordingSurface {
    fn set_line_width(&mut self, width: f64) {
        self.calls.push(DrawCall::LineWidth(width));
    }

    fn set_color(&mut self, color: Rgb) {
        self.calls.push(DrawCall::Color(color));
    }

    fn set_dash(&mut self, pattern: &[f64]) {
        self.calls.push(DrawCall::Dash(pattern.to_vec()));
    }

    fn polygon(&mut self, points: &[DVec2], filled: bool) {
        self.calls.push(DrawCall::Polygon(points.to_vec(), filled));
    }

    fn ellipse(&mut self, bounds: Rect, filled: bool) {
        self.calls.push(DrawCall::Ellipse(bounds, filled));
    }

    fn line(&mut self, from: DVec2, to: DVec2) {
        self.calls.push(DrawCall::Line(from, to));
    }
}

/// Compiles to a box 6pt wide per character of LaTeX and 12pt high.
/// LaTeX containing `\error` fails.
#[derive(Debug, Default)]
pub struct FakeCompiler {
    pub compiled: Vec<String>,
}

impl FakeCompiler {
    pub fn content_for(latex: &str) -> DVec2 {
        dvec2(6.0 * latex.chars().count() as f64, 12.0)
    }
}

impl Compiler for FakeCompiler {
    fn compile(&mut self, property: &Property) -> Result<Artifact, CompileError> {
        if property.latex().contains("\\error") {
            return Err(CompileError {
                message: "undefined control sequence".to_string(),
            });
        }
        self.compiled.push(property.latex().to_string());
        Ok(Artifact {
            pdf_path: PathBuf::from(format!("item_{}.pdf", self.compiled.len())),
            content: Rect::from_size(FakeCompiler::content_for(property.latex())),
        })
    }
}
