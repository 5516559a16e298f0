//! Item notes: the XML text a placed item carries to remember its property.
//!
//! A [`ParameterList`] mirrors one XML element: attributes become options,
//! the element text becomes the main option, child elements become named
//! sub-lists.

use std::borrow::Cow;
use std::collections::BTreeMap;

use miette::{NamedSource, SourceSpan};
use pest::Parser;
use pest::error::InputLocation;
use pest::iterators::{Pair, Pairs};
use pest_derive::Parser;

use crate::errors::NoteError;

#[derive(Parser)]
#[grammar = "note.pest"]
struct NoteParser;

/// Options, main option and sub-lists of one note element
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParameterList {
    options: BTreeMap<String, String>,
    main_option: Option<String>,
    sub_lists: BTreeMap<String, ParameterList>,
}

impl ParameterList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_option(&mut self, key: impl Into<String>, value: impl ToString) {
        self.options.insert(key.into(), value.to_string());
    }

    pub fn option(&self, key: &str) -> Option<&str> {
        self.options.get(key).map(String::as_str)
    }

    pub fn required_option(&self, key: &str) -> Result<&str, NoteError> {
        self.option(key).ok_or_else(|| NoteError::Missing {
            key: key.to_string(),
        })
    }

    /// Required option parsed as an unsigned integer
    pub fn int_option(&self, key: &str) -> Result<usize, NoteError> {
        let value = self.required_option(key)?;
        value.trim().parse().map_err(|_| NoteError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })
    }

    pub fn set_main_option(&mut self, value: impl Into<String>) {
        self.main_option = Some(value.into());
    }

    pub fn main_option(&self) -> Option<&str> {
        self.main_option.as_deref()
    }

    pub fn set_sub_list(&mut self, key: impl Into<String>, list: ParameterList) {
        self.sub_lists.insert(key.into(), list);
    }

    pub fn sub_list(&self, key: &str) -> Option<&ParameterList> {
        self.sub_lists.get(key)
    }

    pub fn required_sub_list(&self, key: &str) -> Result<&ParameterList, NoteError> {
        self.sub_list(key).ok_or_else(|| NoteError::Missing {
            key: key.to_string(),
        })
    }

    fn is_empty_element(&self) -> bool {
        self.main_option.is_none() && self.sub_lists.is_empty()
    }

    /// Serialize as an XML element named `root`
    pub fn to_xml(&self, root: &str) -> String {
        let mut out = String::new();
        self.write_element(&mut out, root);
        out
    }

    fn write_element(&self, out: &mut String, name: &str) {
        out.push('<');
        out.push_str(name);
        for (key, value) in &self.options {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape(value));
            out.push('"');
        }
        if self.is_empty_element() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        if let Some(text) = &self.main_option {
            out.push_str(&escape(text));
        }
        for (key, sub) in &self.sub_lists {
            sub.write_element(out, key);
        }
        out.push_str("</");
        out.push_str(name);
        out.push('>');
    }

    /// Parse an XML note, returning the root element name and its contents
    pub fn from_xml(source: &str) -> Result<(String, ParameterList), NoteError> {
        let mut pairs = NoteParser::parse(Rule::note, source).map_err(|e| syntax_error(source, e))?;
        let note = pairs
            .next()
            .ok_or_else(|| syntax_at(source, "empty note", 0, source.len()))?;
        let element = note
            .into_inner()
            .find(|p| p.as_rule() == Rule::element)
            .ok_or_else(|| syntax_at(source, "note has no root element", 0, source.len()))?;
        parse_element(source, element)
    }
}

fn parse_element(source: &str, pair: Pair<Rule>) -> Result<(String, ParameterList), NoteError> {
    let span = pair.as_span();
    let mut inner = pair.into_inner();
    let name = next_pair(source, &mut inner, span.start(), span.end())?
        .as_str()
        .to_string();

    let mut list = ParameterList::new();
    let mut text = String::new();
    for part in inner {
        match part.as_rule() {
            Rule::attribute => {
                let (start, end) = (part.as_span().start(), part.as_span().end());
                let mut kv = part.into_inner();
                let key = next_pair(source, &mut kv, start, end)?.as_str().to_string();
                let value = next_pair(source, &mut kv, start, end)?;
                list.set_option(key, unescape(value.as_str())?);
            }
            Rule::content => {
                for child in part.into_inner() {
                    match child.as_rule() {
                        Rule::element => {
                            let child_span = child.as_span();
                            let (key, sub) = parse_element(source, child)?;
                            if list.sub_lists.contains_key(&key) {
                                return Err(syntax_at(
                                    source,
                                    &format!("duplicate entry `{key}`"),
                                    child_span.start(),
                                    child_span.end(),
                                ));
                            }
                            list.sub_lists.insert(key, sub);
                        }
                        Rule::text => text.push_str(&unescape(child.as_str())?),
                        _ => {}
                    }
                }
            }
            Rule::close_tag => {
                let (start, end) = (part.as_span().start(), part.as_span().end());
                let close = next_pair(source, &mut part.into_inner(), start, end)?;
                if close.as_str() != name {
                    let close_span = close.as_span();
                    return Err(NoteError::MismatchedTag {
                        expected: name,
                        found: close.as_str().to_string(),
                        src: named_source(source),
                        span: (close_span.start(), close_span.end() - close_span.start()).into(),
                    });
                }
            }
            _ => {}
        }
    }

    // Indentation between child elements is not a value.
    if !text.is_empty() && !(text.trim().is_empty() && !list.sub_lists.is_empty()) {
        list.main_option = Some(text);
    }
    Ok((name, list))
}

fn next_pair<'i>(
    source: &str,
    pairs: &mut Pairs<'i, Rule>,
    start: usize,
    end: usize,
) -> Result<Pair<'i, Rule>, NoteError> {
    pairs
        .next()
        .ok_or_else(|| syntax_at(source, "incomplete element", start, end))
}

fn named_source(source: &str) -> NamedSource<String> {
    NamedSource::new("item note", source.to_string())
}

fn syntax_at(source: &str, message: &str, start: usize, end: usize) -> NoteError {
    NoteError::Syntax {
        message: message.to_string(),
        src: named_source(source),
        span: (start, end.saturating_sub(start)).into(),
    }
}

fn syntax_error(source: &str, err: pest::error::Error<Rule>) -> NoteError {
    let span: SourceSpan = match err.location {
        InputLocation::Pos(pos) => (pos, 0).into(),
        InputLocation::Span((start, end)) => (start, end - start).into(),
    };
    NoteError::Syntax {
        message: err.variant.message().to_string(),
        src: named_source(source),
        span,
    }
}

/// Replace XML special characters with entities
pub fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Decode the predefined XML entities and numeric character references
pub fn unescape(text: &str) -> Result<Cow<'_, str>, NoteError> {
    if !text.contains('&') {
        return Ok(Cow::Borrowed(text));
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp + 1..];
        let Some(semi) = rest.find(';') else {
            return Err(NoteError::UnknownEntity {
                entity: rest.to_string(),
            });
        };
        let entity = &rest[..semi];
        out.push(decode_entity(entity).ok_or_else(|| NoteError::UnknownEntity {
            entity: entity.to_string(),
        })?);
        rest = &rest[semi + 1..];
    }
    out.push_str(rest);
    Ok(Cow::Owned(out))
}

fn decode_entity(entity: &str) -> Option<char> {
    match entity {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => {
            let code = entity.strip_prefix('#')?;
            let value = match code.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok()?,
                None => code.parse().ok()?,
            };
            char::from_u32(value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_attributes_text_and_children() {
        let note = r#"<?xml version="1.0"?>
<LaTeX2AI_item text_align_horizontal="left" latex2ai_version="0.1.0">
    <latex cursor_position="4">$a^2$</latex>
    <empty/>
</LaTeX2AI_item>
"#;
        let (root, list) = ParameterList::from_xml(note).unwrap();
        assert_eq!(root, "LaTeX2AI_item");
        assert_eq!(list.option("text_align_horizontal"), Some("left"));
        assert_eq!(list.main_option(), None);

        let latex = list.sub_list("latex").unwrap();
        assert_eq!(latex.main_option(), Some("$a^2$"));
        assert_eq!(latex.int_option("cursor_position").unwrap(), 4);

        let empty = list.sub_list("empty").unwrap();
        assert!(empty.is_empty_element());
    }

    #[test]
    fn text_keeps_whitespace_and_entities() {
        let (_, list) = ParameterList::from_xml("<a>  x &lt; y &amp;&amp; \n z&#62;&#x41;</a>").unwrap();
        assert_eq!(list.main_option(), Some("  x < y && \n z>A"));
    }

    #[test]
    fn written_xml_reads_back() {
        let mut latex = ParameterList::new();
        latex.set_main_option("\\text{\"quoted\" & <tagged>}\n  $x'$");
        latex.set_option("cursor_position", 7);
        let mut list = ParameterList::new();
        list.set_option("text_align_vertical", "baseline");
        list.set_sub_list("latex", latex);

        let xml = list.to_xml("root");
        assert_eq!(
            xml,
            "<root text_align_vertical=\"baseline\"><latex cursor_position=\"7\">\
             \\text{&quot;quoted&quot; &amp; &lt;tagged&gt;}\n  $x&apos;$</latex></root>"
        );
        let (root, parsed) = ParameterList::from_xml(&xml).unwrap();
        assert_eq!(root, "root");
        assert_eq!(parsed, list);
    }

    #[test]
    fn comments_are_skipped() {
        let (_, list) = ParameterList::from_xml("<!-- note --><a k=\"v\"><!-- inner -->text</a>").unwrap();
        assert_eq!(list.option("k"), Some("v"));
        assert_eq!(list.main_option(), Some("text"));
    }

    #[test]
    fn mismatched_closing_tag() {
        let err = ParameterList::from_xml("<a><b>x</c></a>").unwrap_err();
        match err {
            NoteError::MismatchedTag { expected, found, .. } => {
                assert_eq!(expected, "b");
                assert_eq!(found, "c");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn truncated_note_is_a_syntax_error() {
        assert!(matches!(
            ParameterList::from_xml("<a k=\"v\"><b>"),
            Err(NoteError::Syntax { .. })
        ));
        assert!(matches!(ParameterList::from_xml(""), Err(NoteError::Syntax { .. })));
        assert!(matches!(
            ParameterList::from_xml("plain text"),
            Err(NoteError::Syntax { .. })
        ));
    }

    #[test]
    fn duplicate_children_are_rejected() {
        assert!(matches!(
            ParameterList::from_xml("<a><b/><b/></a>"),
            Err(NoteError::Syntax { .. })
        ));
    }

    #[test]
    fn unknown_entity() {
        assert!(matches!(
            ParameterList::from_xml("<a>&nbsp;</a>"),
            Err(NoteError::UnknownEntity { .. })
        ));
        assert!(matches!(unescape("a & b"), Err(NoteError::UnknownEntity { .. })));
    }

    #[test]
    fn missing_and_invalid_options() {
        let (_, list) = ParameterList::from_xml("<a n=\"x1\"/>").unwrap();
        assert!(matches!(list.required_option("m"), Err(NoteError::Missing { .. })));
        assert!(matches!(list.int_option("n"), Err(NoteError::InvalidValue { .. })));
        assert!(matches!(list.required_sub_list("s"), Err(NoteError::Missing { .. })));
    }
}
