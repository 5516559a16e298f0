//! The LaTeX property of an item and its note representation.

use std::fmt;
use std::str::FromStr;

use crate::alignment::{PlaceAlignment, TextAlignHorizontal, TextAlignVertical, place_alignment};
use crate::defaults;
use crate::errors::NoteError;
use crate::note::ParameterList;

const KEY_ALIGN_H: &str = "text_align_horizontal";
const KEY_ALIGN_V: &str = "text_align_vertical";
const KEY_VERSION: &str = "latex2ai_version";
const KEY_LATEX: &str = "latex";
const KEY_CURSOR: &str = "cursor_position";
const KEY_PDF: &str = "pdf_file_contents";
const KEY_HASH: &str = "hash";
const KEY_HASH_METHOD: &str = "hash_method";

/// How the embedded PDF payload is fingerprinted
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum HashMethod {
    #[default]
    None,
    Crc64,
}

impl HashMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HashMethod::None => "none",
            HashMethod::Crc64 => "crc64",
        }
    }
}

impl FromStr for HashMethod {
    type Err = NoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(HashMethod::None),
            "crc64" => Ok(HashMethod::Crc64),
            _ => Err(NoteError::InvalidValue {
                key: KEY_HASH_METHOD.to_string(),
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for HashMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Encoded PDF payload stored alongside the LaTeX source
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct PdfContents {
    pub encoded: String,
    pub hash: String,
    pub hash_method: HashMethod,
}

/// Which parts of a property differ from another one
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct PropertyChanges {
    /// The item has to be recompiled
    pub latex: bool,
    pub align: bool,
    pub cursor: bool,
}

impl PropertyChanges {
    pub fn changed(&self) -> bool {
        self.latex || self.align || self.cursor
    }
}

/// LaTeX source and alignment of an item.
///
/// Built once; an edit produces a new value through the `with_*` methods.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Property {
    latex: String,
    align_h: TextAlignHorizontal,
    align_v: TextAlignVertical,
    cursor: usize,
    pdf: Option<PdfContents>,
    version: String,
}

impl Default for Property {
    fn default() -> Self {
        Property {
            latex: "$a^2+b^2=c^2$".to_string(),
            align_h: TextAlignHorizontal::Centre,
            align_v: TextAlignVertical::Centre,
            cursor: 0,
            pdf: None,
            version: defaults::NOTE_VERSION.to_string(),
        }
    }
}

impl Property {
    pub fn new(latex: impl Into<String>, align_h: TextAlignHorizontal, align_v: TextAlignVertical) -> Self {
        Property {
            latex: latex.into(),
            align_h,
            align_v,
            ..Property::default()
        }
    }

    pub fn with_latex(self, latex: impl Into<String>) -> Self {
        Property {
            latex: latex.into(),
            ..self
        }
    }

    pub fn with_alignment(self, align_h: TextAlignHorizontal, align_v: TextAlignVertical) -> Self {
        Property {
            align_h,
            align_v,
            ..self
        }
    }

    pub fn with_cursor(self, cursor: usize) -> Self {
        Property { cursor, ..self }
    }

    pub fn with_pdf(self, pdf: Option<PdfContents>) -> Self {
        Property { pdf, ..self }
    }

    pub fn latex(&self) -> &str {
        &self.latex
    }

    pub fn text_align_horizontal(&self) -> TextAlignHorizontal {
        self.align_h
    }

    pub fn text_align_vertical(&self) -> TextAlignVertical {
        self.align_v
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn pdf(&self) -> Option<&PdfContents> {
        self.pdf.as_ref()
    }

    /// Version of the writer of the note this property was read from
    pub fn version(&self) -> &str {
        &self.version
    }

    /// Placement alignment the item is anchored at
    pub fn alignment(&self) -> PlaceAlignment {
        place_alignment(self.align_h, self.align_v)
    }

    pub fn is_baseline(&self) -> bool {
        self.align_v == TextAlignVertical::Baseline
    }

    /// Differences from `other`.
    ///
    /// Switching into or out of baseline alignment changes the cropping of
    /// the compiled PDF, so it counts as a LaTeX change too.
    pub fn compare(&self, other: &Property) -> PropertyChanges {
        let mut changes = PropertyChanges {
            latex: self.latex != other.latex,
            align: self.align_h != other.align_h || self.align_v != other.align_v,
            cursor: self.cursor != other.cursor,
        };
        if changes.align && self.is_baseline() != other.is_baseline() {
            changes.latex = true;
        }
        changes
    }

    pub fn to_parameter_list(&self, write_pdf: bool) -> ParameterList {
        let mut list = ParameterList::new();
        list.set_option(KEY_ALIGN_H, self.align_h.as_str());
        list.set_option(KEY_ALIGN_V, self.align_v.as_str());
        list.set_option(KEY_VERSION, &self.version);

        let mut latex = ParameterList::new();
        latex.set_main_option(self.latex.as_str());
        latex.set_option(KEY_CURSOR, self.cursor);
        list.set_sub_list(KEY_LATEX, latex);

        if let Some(pdf) = self.pdf.as_ref().filter(|_| write_pdf) {
            let mut contents = ParameterList::new();
            contents.set_main_option(pdf.encoded.as_str());
            contents.set_option(KEY_HASH, &pdf.hash);
            contents.set_option(KEY_HASH_METHOD, pdf.hash_method);
            list.set_sub_list(KEY_PDF, contents);
        }
        list
    }

    pub fn from_parameter_list(list: &ParameterList) -> Result<Self, NoteError> {
        let align_h: TextAlignHorizontal = list.required_option(KEY_ALIGN_H)?.parse()?;
        let align_v: TextAlignVertical = list.required_option(KEY_ALIGN_V)?.parse()?;
        let version = list
            .option(KEY_VERSION)
            .unwrap_or(defaults::NOTE_VERSION_UNKNOWN)
            .to_string();

        let latex_list = list.required_sub_list(KEY_LATEX)?;
        let latex = latex_list.main_option().unwrap_or_default().to_string();
        let cursor = latex_list.int_option(KEY_CURSOR)?;

        let pdf = match list.sub_list(KEY_PDF) {
            Some(contents) => Some(PdfContents {
                encoded: contents.main_option().unwrap_or_default().to_string(),
                hash: contents.option(KEY_HASH).unwrap_or_default().to_string(),
                hash_method: match contents.option(KEY_HASH_METHOD) {
                    Some(method) => method.parse::<HashMethod>()?,
                    None => HashMethod::None,
                },
            }),
            None => None,
        };

        Ok(Property {
            latex,
            align_h,
            align_v,
            cursor,
            pdf,
            version,
        })
    }

    /// Note text stored on the placed art
    pub fn to_note(&self, write_pdf: bool) -> String {
        self.to_parameter_list(write_pdf).to_xml(defaults::NOTE_ROOT)
    }

    pub fn from_note(note: &str) -> Result<Self, NoteError> {
        let (root, list) = ParameterList::from_xml(note)?;
        if root != defaults::NOTE_ROOT {
            return Err(NoteError::InvalidValue {
                key: "root element".to_string(),
                value: root,
            });
        }
        Property::from_parameter_list(&list)
    }
}
