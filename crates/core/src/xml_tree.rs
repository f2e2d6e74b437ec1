use crate::{Result, WxrError};

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;
use quick_xml::reader::NsReader;
use std::io::BufRead;

/// An element of a decoded XML document with its namespace resolved
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct XmlElement {
    /// Namespace URI the element is bound to (`None` when unqualified)
    pub namespace: Option<String>,
    /// Local name without any prefix
    pub local_name: String,
    /// Attributes as (local name, unescaped value) in document order
    pub attributes: Vec<(String, String)>,
    /// Character data directly inside this element, CDATA included verbatim
    pub text: String,
    /// Child elements in document order
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Check whether this element has the given namespace and local name
    pub fn is(&self, namespace: Option<&str>, local_name: &str) -> bool {
        self.namespace.as_deref() == namespace && self.local_name == local_name
    }

    /// Iterate over direct children with the given namespace and local name
    pub fn children_named<'a>(
        &'a self, namespace: Option<&'a str>, local_name: &'a str,
    ) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |child| child.is(namespace, local_name))
    }

    /// Text of the last direct child with the given name, or an empty string
    pub fn child_text(&self, namespace: Option<&str>, local_name: &str) -> String {
        self.children_named(namespace, local_name)
            .last()
            .map(|child| child.text.clone())
            .unwrap_or_default()
    }

    /// Iterate over direct children with the given local name in any namespace
    pub fn children_local<'a>(&'a self, local_name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.children.iter().filter(move |child| child.local_name == local_name)
    }

    /// Text of the last direct child with the given local name in any namespace
    pub fn local_child_text(&self, local_name: &str) -> String {
        self.children_local(local_name)
            .last()
            .map(|child| child.text.clone())
            .unwrap_or_default()
    }

    /// Get an attribute value by local name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Read the root element of an XML document.
///
/// Decoding is lenient: end tag names are not matched against their start
/// tags, CDATA is kept verbatim, a bare `&` is kept as text and unknown
/// entity references stay in the text as written. Anything after the root
/// element is ignored.
///
/// Returns `Ok(None)` when the input holds no element at all.
pub fn read_root<R: BufRead>(input: R) -> Result<Option<XmlElement>> {
    let mut reader = NsReader::from_reader(input);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_dangling_amp = true;

    let mut buf = Vec::new();
    let mut stack: Vec<XmlElement> = Vec::new();

    loop {
        let (ns, event) = reader.read_resolved_event_into(&mut buf)?;
        match event {
            Event::Start(ref start) => {
                let element = open_element(ns, start)?;
                stack.push(element);
            }
            Event::Empty(ref start) => {
                let element = open_element(ns, start)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => return Ok(Some(element)),
                }
            }
            Event::End(_) => {
                if let Some(element) = stack.pop() {
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(element),
                        None => return Ok(Some(element)),
                    }
                }
            }
            Event::Text(ref text) => {
                if let Some(current) = stack.last_mut() {
                    let raw = utf8(text.as_ref())?;
                    current.text.push_str(&unescape_entities(raw));
                }
            }
            Event::CData(ref cdata) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(utf8(cdata.as_ref())?);
                }
            }
            Event::GeneralRef(ref reference) => {
                if let Some(current) = stack.last_mut() {
                    let name = utf8(reference.as_ref())?;
                    current.text.push_str(&resolve_reference(name));
                }
            }
            Event::Eof => {
                return match stack.first() {
                    Some(root) => Err(WxrError::MalformedDocument(format!(
                        "unexpected end of document inside <{}>",
                        root.local_name
                    ))),
                    None => Ok(None),
                };
            }
            _ => {}
        }
        buf.clear();
    }
}

/// Build an element (without children yet) from a start tag
fn open_element(ns: ResolveResult<'_>, start: &BytesStart<'_>) -> Result<XmlElement> {
    let namespace = match ns {
        ResolveResult::Bound(namespace) => Some(utf8(namespace.as_ref())?.to_string()),
        ResolveResult::Unbound => None,
        ResolveResult::Unknown(prefix) => Some(utf8(&prefix)?.to_string()),
    };
    let local_name = utf8(start.local_name().as_ref())?.to_string();

    let mut attributes = Vec::new();
    for attr in start.attributes().flatten() {
        let key = utf8(attr.key.local_name().as_ref())?.to_string();
        let value = unescape_entities(utf8(&attr.value)?);
        attributes.push((key, value));
    }

    Ok(XmlElement { namespace, local_name, attributes, text: String::new(), children: Vec::new() })
}

fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| WxrError::MalformedDocument(format!("invalid UTF-8 in document: {}", e)))
}

/// Resolve the body of an `&...;` reference, keeping unknown entities literally
fn resolve_reference(name: &str) -> String {
    let resolved = match name {
        "lt" => Some('<'),
        "gt" => Some('>'),
        "amp" => Some('&'),
        "apos" => Some('\''),
        "quot" => Some('"'),
        _ => name.strip_prefix('#').and_then(|code| {
            let value = match code.strip_prefix('x').or_else(|| code.strip_prefix('X')) {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => code.parse::<u32>().ok(),
            };
            value.and_then(char::from_u32)
        }),
    };

    match resolved {
        Some(ch) => ch.to_string(),
        None => format!("&{};", name),
    }
}

/// Replace every `&...;` reference in `text` that can be resolved
fn unescape_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        match after.find(';') {
            Some(end) if end > 0 && !after[..end].contains(char::is_whitespace) => {
                out.push_str(&resolve_reference(&after[..end]));
                rest = &after[end + 1..];
            }
            _ => {
                out.push('&');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
