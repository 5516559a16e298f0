//! Placement alignments: the nine reference points of an item's rectangle.

use std::fmt;
use std::str::FromStr;

use glam::{DVec2, dvec2};

use crate::errors::NoteError;

/// One of the nine canonical reference points of a rectangle
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PlaceAlignment {
    TopLeft,
    TopMid,
    TopRight,
    MidLeft,
    MidMid,
    MidRight,
    BotLeft,
    BotMid,
    BotRight,
}

impl PlaceAlignment {
    /// All alignments, row by row from the top
    pub const ALL: [PlaceAlignment; 9] = [
        PlaceAlignment::TopLeft,
        PlaceAlignment::TopMid,
        PlaceAlignment::TopRight,
        PlaceAlignment::MidLeft,
        PlaceAlignment::MidMid,
        PlaceAlignment::MidRight,
        PlaceAlignment::BotLeft,
        PlaceAlignment::BotMid,
        PlaceAlignment::BotRight,
    ];

    /// Position in [`PlaceAlignment::ALL`]
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Interpolation factors along the first (x) and second (y) local axis.
    ///
    /// Bottom-left is `(0, 0)` and top-right is `(1, 1)`.
    pub fn factors(self) -> DVec2 {
        let fx = match self {
            PlaceAlignment::TopLeft | PlaceAlignment::MidLeft | PlaceAlignment::BotLeft => 0.0,
            PlaceAlignment::TopMid | PlaceAlignment::MidMid | PlaceAlignment::BotMid => 0.5,
            PlaceAlignment::TopRight | PlaceAlignment::MidRight | PlaceAlignment::BotRight => 1.0,
        };
        let fy = match self {
            PlaceAlignment::TopLeft | PlaceAlignment::TopMid | PlaceAlignment::TopRight => 1.0,
            PlaceAlignment::MidLeft | PlaceAlignment::MidMid | PlaceAlignment::MidRight => 0.5,
            PlaceAlignment::BotLeft | PlaceAlignment::BotMid | PlaceAlignment::BotRight => 0.0,
        };
        dvec2(fx, fy)
    }

    pub fn is_corner(self) -> bool {
        let f = self.factors();
        f.x != 0.5 && f.y != 0.5
    }
}

impl fmt::Display for PlaceAlignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Horizontal alignment of the LaTeX text
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum TextAlignHorizontal {
    Left,
    #[default]
    Centre,
    Right,
}

impl TextAlignHorizontal {
    /// Name used in item notes
    pub fn as_str(self) -> &'static str {
        match self {
            TextAlignHorizontal::Left => "left",
            TextAlignHorizontal::Centre => "centreH",
            TextAlignHorizontal::Right => "right",
        }
    }
}

impl FromStr for TextAlignHorizontal {
    type Err = NoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "left" => Ok(TextAlignHorizontal::Left),
            "centreH" => Ok(TextAlignHorizontal::Centre),
            "right" => Ok(TextAlignHorizontal::Right),
            _ => Err(NoteError::InvalidValue {
                key: "text_align_horizontal".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Vertical alignment of the LaTeX text
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum TextAlignVertical {
    Top,
    #[default]
    Centre,
    /// Text baseline; the compiled PDF is cropped so it sits at half height
    Baseline,
    Bottom,
}

impl TextAlignVertical {
    /// Name used in item notes
    pub fn as_str(self) -> &'static str {
        match self {
            TextAlignVertical::Top => "top",
            TextAlignVertical::Centre => "centreV",
            TextAlignVertical::Baseline => "baseline",
            TextAlignVertical::Bottom => "bottom",
        }
    }
}

impl FromStr for TextAlignVertical {
    type Err = NoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(TextAlignVertical::Top),
            "centreV" => Ok(TextAlignVertical::Centre),
            "baseline" => Ok(TextAlignVertical::Baseline),
            "bottom" => Ok(TextAlignVertical::Bottom),
            _ => Err(NoteError::InvalidValue {
                key: "text_align_vertical".to_string(),
                value: s.to_string(),
            }),
        }
    }
}

/// Placement alignment for a pair of text alignments
pub fn place_alignment(h: TextAlignHorizontal, v: TextAlignVertical) -> PlaceAlignment {
    use TextAlignHorizontal as H;
    use TextAlignVertical as V;
    match (v, h) {
        (V::Top, H::Left) => PlaceAlignment::TopLeft,
        (V::Top, H::Centre) => PlaceAlignment::TopMid,
        (V::Top, H::Right) => PlaceAlignment::TopRight,
        (V::Centre | V::Baseline, H::Left) => PlaceAlignment::MidLeft,
        (V::Centre | V::Baseline, H::Centre) => PlaceAlignment::MidMid,
        (V::Centre | V::Baseline, H::Right) => PlaceAlignment::MidRight,
        (V::Bottom, H::Left) => PlaceAlignment::BotLeft,
        (V::Bottom, H::Centre) => PlaceAlignment::BotMid,
        (V::Bottom, H::Right) => PlaceAlignment::BotRight,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_matches_all_order() {
        for (i, a) in PlaceAlignment::ALL.iter().enumerate() {
            assert_eq!(a.index(), i);
        }
    }

    #[test]
    fn factors_span_the_unit_square() {
        assert_eq!(PlaceAlignment::BotLeft.factors(), dvec2(0.0, 0.0));
        assert_eq!(PlaceAlignment::TopRight.factors(), dvec2(1.0, 1.0));
        assert_eq!(PlaceAlignment::MidMid.factors(), dvec2(0.5, 0.5));
        assert_eq!(PlaceAlignment::TopMid.factors(), dvec2(0.5, 1.0));
        assert_eq!(PlaceAlignment::MidLeft.factors(), dvec2(0.0, 0.5));
    }

    #[test]
    fn four_corners() {
        let corners: Vec<_> = PlaceAlignment::ALL.into_iter().filter(|a| a.is_corner()).collect();
        assert_eq!(
            corners,
            [
                PlaceAlignment::TopLeft,
                PlaceAlignment::TopRight,
                PlaceAlignment::BotLeft,
                PlaceAlignment::BotRight
            ]
        );
    }

    #[test]
    fn baseline_maps_to_middle_row() {
        assert_eq!(
            place_alignment(TextAlignHorizontal::Left, TextAlignVertical::Baseline),
            PlaceAlignment::MidLeft
        );
        assert_eq!(
            place_alignment(TextAlignHorizontal::Right, TextAlignVertical::Top),
            PlaceAlignment::TopRight
        );
        assert_eq!(
            place_alignment(TextAlignHorizontal::Centre, TextAlignVertical::Bottom),
            PlaceAlignment::BotMid
        );
    }

    #[test]
    fn note_names_parse_back() {
        for h in [TextAlignHorizontal::Left, TextAlignHorizontal::Centre, TextAlignHorizontal::Right] {
            assert_eq!(h.as_str().parse::<TextAlignHorizontal>().unwrap(), h);
        }
        for v in [
            TextAlignVertical::Top,
            TextAlignVertical::Centre,
            TextAlignVertical::Baseline,
            TextAlignVertical::Bottom,
        ] {
            assert_eq!(v.as_str().parse::<TextAlignVertical>().unwrap(), v);
        }
        assert!("centre".parse::<TextAlignHorizontal>().is_err());
    }
}
