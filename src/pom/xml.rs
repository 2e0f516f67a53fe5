// src/pom/xml.rs
//! Minimal XML element-tree reader for descriptors.
//!
//! Handles elements, text, comments, processing instructions, DOCTYPE, CDATA
//! and character/predefined entities. Attributes are skipped and namespace
//! prefixes are dropped from element names.

use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub text: String,
    pub children: Vec<Element>,
}

impl Element {
    fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Follows a `/`-separated path of child names.
    #[must_use]
    pub fn descend(&self, path: &str) -> Option<&Element> {
        path.split('/').try_fold(self, |el, name| el.child(name))
    }

    /// Trimmed text of a direct child, `None` when absent or blank.
    #[must_use]
    pub fn child_text(&self, name: &str) -> Option<String> {
        self.child(name)
            .map(|c| c.text.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlError(pub String);

impl fmt::Display for XmlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for XmlError {}

type XmlResult<T> = Result<T, XmlError>;

fn err<T>(message: impl Into<String>) -> XmlResult<T> {
    Err(XmlError(message.into()))
}

/// Parses a document and returns its root element.
///
/// # Errors
/// Returns `XmlError` for unterminated constructs, mismatched tags, text
/// outside the root, or a missing/duplicated root element.
pub fn parse(input: &str) -> XmlResult<Element> {
    let mut tree = TreeBuilder::default();
    let mut rest = input.strip_prefix('\u{feff}').unwrap_or(input);

    while !rest.is_empty() {
        rest = if let Some(after) = rest.strip_prefix("<!--") {
            skip_past(after, "-->")?
        } else if let Some(after) = rest.strip_prefix("<![CDATA[") {
            let Some(end) = after.find("]]>") else {
                return err("unterminated CDATA section");
            };
            tree.text(&after[..end])?;
            &after[end + 3..]
        } else if let Some(after) = rest.strip_prefix("<?") {
            skip_past(after, "?>")?
        } else if let Some(after) = rest.strip_prefix("<!") {
            skip_past(after, ">")?
        } else if let Some(after) = rest.strip_prefix("</") {
            let Some(end) = after.find('>') else {
                return err("unterminated closing tag");
            };
            tree.close(local_name(after[..end].trim()))?;
            &after[end + 1..]
        } else if let Some(after) = rest.strip_prefix('<') {
            let end = find_tag_end(after)?;
            open_tag(&mut tree, &after[..end])?;
            &after[end + 1..]
        } else {
            let end = rest.find('<').unwrap_or(rest.len());
            tree.text(&decode_entities(&rest[..end])?)?;
            &rest[end..]
        };
    }

    tree.finish()
}

#[derive(Default)]
struct TreeBuilder {
    stack: Vec<Element>,
    root: Option<Element>,
}

impl TreeBuilder {
    fn open(&mut self, name: &str) {
        self.stack.push(Element::named(name));
    }

    fn close(&mut self, name: &str) -> XmlResult<()> {
        match self.stack.pop() {
            Some(el) if el.name == name => self.attach(el),
            Some(el) => err(format!("mismatched closing tag </{name}>, expected </{}>", el.name)),
            None => err(format!("unexpected closing tag </{name}>")),
        }
    }

    fn attach(&mut self, el: Element) -> XmlResult<()> {
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(el);
            return Ok(());
        }
        if self.root.is_some() {
            return err("multiple root elements");
        }
        self.root = Some(el);
        Ok(())
    }

    fn text(&mut self, text: &str) -> XmlResult<()> {
        match self.stack.last_mut() {
            Some(top) => {
                top.text.push_str(text);
                Ok(())
            }
            None if text.trim().is_empty() => Ok(()),
            None => err("text outside of root element"),
        }
    }

    fn finish(self) -> XmlResult<Element> {
        if let Some(open) = self.stack.last() {
            return err(format!("unclosed element <{}>", open.name));
        }
        match self.root {
            Some(root) => Ok(root),
            None => err("no root element"),
        }
    }
}

fn open_tag(tree: &mut TreeBuilder, tag: &str) -> XmlResult<()> {
    let self_closing = tag.ends_with('/');
    let body = tag.trim_end_matches('/');
    let Some(raw_name) = body.split_whitespace().next() else {
        return err("empty tag");
    };
    let name = local_name(raw_name);
    tree.open(name);
    if self_closing {
        tree.close(name)?;
    }
    Ok(())
}

fn local_name(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

fn skip_past<'a>(input: &'a str, terminator: &str) -> XmlResult<&'a str> {
    match input.find(terminator) {
        Some(pos) => Ok(&input[pos + terminator.len()..]),
        None => err(format!("missing '{terminator}'")),
    }
}

/// Position of the `>` ending a start tag, ignoring quoted attribute values.
fn find_tag_end(input: &str) -> XmlResult<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in input.char_indices() {
        match (quote, c) {
            (None, '"' | '\'') => quote = Some(c),
            (Some(q), _) if q == c => quote = None,
            (None, '>') => return Ok(i),
            _ => {}
        }
    }
    err("unterminated start tag")
}

fn decode_entities(text: &str) -> XmlResult<String> {
    if !text.contains('&') {
        return Ok(text.to_string());
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let Some(end) = after.find(';') else {
            return err("unterminated entity reference");
        };
        out.push(decode_entity(&after[..end])?);
        rest = &after[end + 1..];
    }
    out.push_str(rest);
    Ok(out)
}

fn decode_entity(entity: &str) -> XmlResult<char> {
    let decoded = match entity {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        _ => entity
            .strip_prefix("#x")
            .map(|hex| u32::from_str_radix(hex, 16))
            .or_else(|| entity.strip_prefix('#').map(str::parse::<u32>))
            .and_then(Result::ok)
            .and_then(char::from_u32),
    };
    decoded.map_or_else(|| err(format!("unknown entity &{entity};")), Ok)
}
