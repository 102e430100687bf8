//! Minimal element tree built with quick-xml.
//!
//! Element tags are kept in Clark notation (`{namespace-uri}local`), the
//! same shape the fiscal schemas are documented with, so lookups can be
//! qualified by the document's namespace without touching prefixes.
//!
//! Names, attribute values and character data are decoded with the
//! encoding named in the XML declaration (UTF-8 when there is none).

use quick_xml::encoding::Decoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::NsReader;
use tracing::trace;

use super::Result;
use crate::error::XmlError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// An element and its subtree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    /// Tag in Clark notation; unqualified elements carry the bare name.
    pub tag: String,
    pub attributes: Vec<(String, String)>,
    /// Concatenated character data directly inside this element.
    pub text: String,
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Value of the attribute with the given local name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Namespace URI of this element, empty when unqualified.
    pub fn namespace(&self) -> &str {
        namespace_of(&self.tag)
    }

    /// All elements below this one in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }
}

/// Pre-order iterator over an element's descendants.
pub struct Descendants<'a> {
    stack: Vec<&'a XmlElement>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        self.stack.extend(element.children.iter().rev());
        Some(element)
    }
}

/// Namespace URI part of a Clark-notation tag.
pub fn namespace_of(tag: &str) -> &str {
    tag.strip_prefix('{')
        .and_then(|rest| rest.split_once('}'))
        .map(|(uri, _)| uri)
        .unwrap_or("")
}

/// Tag without its namespace qualifier or prefix.
pub fn local_name(tag: &str) -> &str {
    let tag = match tag.rsplit_once('}') {
        Some((_, local)) => local,
        None => tag,
    };
    match tag.rsplit_once(':') {
        Some((_, local)) => local,
        None => tag,
    }
}

/// Parse a complete document into its root element.
pub fn parse(xml: &[u8]) -> Result<XmlElement> {
    let xml = xml.strip_prefix(UTF8_BOM).unwrap_or(xml);

    let mut reader = NsReader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        // Taken before reading: the resolved event borrows the reader.
        let decoder = reader.decoder();
        match reader.read_resolved_event_into(&mut buf) {
            Ok((ns, Event::Start(start))) => {
                stack.push(element_from(decoder, ns, &start)?);
            }
            Ok((ns, Event::Empty(start))) => {
                let element = element_from(decoder, ns, &start)?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok((_, Event::End(_))) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| XmlError::Syntax("unmatched end tag".to_string()))?;
                attach(&mut stack, &mut root, element)?;
            }
            Ok((_, Event::Text(text))) => {
                let text = text
                    .unescape()
                    .map_err(|e| XmlError::Syntax(e.to_string()))?;
                push_text(&mut stack, &text)?;
            }
            Ok((_, Event::CData(data))) => {
                let text = data
                    .decode()
                    .map_err(|e| XmlError::Syntax(e.to_string()))?;
                push_text(&mut stack, &text)?;
            }
            Ok((_, Event::Eof)) => break,
            Ok(_) => {}
            Err(e) => return Err(XmlError::Syntax(e.to_string())),
        }
        buf.clear();
    }

    if let Some(open) = stack.pop() {
        return Err(XmlError::UnclosedElement(local_name(&open.tag).to_string()));
    }

    let root = root.ok_or(XmlError::NoRoot)?;
    trace!("Parsed XML document with root {}", root.tag);
    Ok(root)
}

fn decode_name(decoder: Decoder, bytes: &[u8]) -> Result<String> {
    decoder
        .decode(bytes)
        .map(|name| name.into_owned())
        .map_err(|e| XmlError::Syntax(e.to_string()))
}

fn element_from(
    decoder: Decoder,
    ns: ResolveResult<'_>,
    start: &BytesStart<'_>,
) -> Result<XmlElement> {
    let local = decode_name(decoder, start.local_name().as_ref())?;
    let tag = match ns {
        ResolveResult::Bound(Namespace(uri)) => {
            format!("{{{}}}{}", decode_name(decoder, uri)?, local)
        }
        _ => local,
    };

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| XmlError::Syntax(e.to_string()))?;
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let key = decode_name(decoder, attr.key.local_name().as_ref())?;
        let value = attr
            .decode_and_unescape_value(decoder)
            .map_err(|e| XmlError::Syntax(e.to_string()))?
            .into_owned();
        attributes.push((key, value));
    }

    Ok(XmlElement {
        tag,
        attributes,
        ..Default::default()
    })
}

fn attach(
    stack: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_some() => return Err(XmlError::MultipleRoots),
        None => *root = Some(element),
    }
    Ok(())
}

fn push_text(stack: &mut [XmlElement], text: &str) -> Result<()> {
    match stack.last_mut() {
        Some(current) => current.text.push_str(text),
        None if text.trim().is_empty() => {}
        None => {
            return Err(XmlError::Syntax(
                "character data outside the root element".to_string(),
            ))
        }
    }
    Ok(())
}
