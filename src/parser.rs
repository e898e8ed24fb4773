//! Response-envelope parsing and payload extraction.
//!
//! Different operations wrap their payload differently, so extraction is an
//! ordered fallback: the first `return` element wins, otherwise the first
//! `xml` element, otherwise the raw response is handed back unchanged.
//! Matching is on local names, so namespace prefixes don't matter.

use crate::error::Error;
use quick_xml::escape::resolve_html5_entity;
use quick_xml::events::{BytesRef, Event};
use quick_xml::Reader;

/// Text accumulated for one captured element.
struct Capture {
    open_depth: u32,
    text: String,
    done: bool,
}

impl Capture {
    fn open(depth: u32) -> Self {
        Self {
            open_depth: depth,
            text: String::new(),
            done: false,
        }
    }

    fn closed() -> Self {
        Self {
            open_depth: 0,
            text: String::new(),
            done: true,
        }
    }

    fn push(&mut self, text: &str) {
        if !self.done {
            self.text.push_str(text);
        }
    }
}

/// Extract the meaningful payload from a webservice response.
///
/// Returns the text content (all descendant text, entities resolved, CDATA
/// included) of the first `return` element; failing that, of the first `xml`
/// element; failing both, the raw response unchanged. The extracted string is
/// not validated further.
pub fn extract_response_content(response: &str) -> Result<String, Error> {
    let mut reader = Reader::from_str(response);

    let mut return_capture: Option<Capture> = None;
    let mut xml_capture: Option<Capture> = None;
    let mut depth: u32 = 0;
    let mut saw_element = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                depth += 1;
                saw_element = true;
                match e.local_name().as_ref() {
                    b"return" if return_capture.is_none() => {
                        return_capture = Some(Capture::open(depth));
                    }
                    b"xml" if xml_capture.is_none() => {
                        xml_capture = Some(Capture::open(depth));
                    }
                    _ => {}
                }
            }
            Ok(Event::Empty(e)) => {
                saw_element = true;
                match e.local_name().as_ref() {
                    b"return" if return_capture.is_none() => {
                        return_capture = Some(Capture::closed());
                    }
                    b"xml" if xml_capture.is_none() => {
                        xml_capture = Some(Capture::closed());
                    }
                    _ => {}
                }
            }
            Ok(Event::End(_)) => {
                for capture in [&mut return_capture, &mut xml_capture] {
                    if let Some(c) = capture {
                        if !c.done && c.open_depth == depth {
                            c.done = true;
                        }
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Text(e)) => {
                if capturing(&return_capture) || capturing(&xml_capture) {
                    let text = e
                        .decode()
                        .map_err(|err| Error::ResponseParse(err.to_string()))?;
                    push_to_captures(&mut return_capture, &mut xml_capture, &text);
                }
            }
            Ok(Event::CData(e)) => {
                if capturing(&return_capture) || capturing(&xml_capture) {
                    let bytes = e.into_inner();
                    let text = std::str::from_utf8(&bytes)
                        .map_err(|err| Error::ResponseParse(err.to_string()))?;
                    push_to_captures(&mut return_capture, &mut xml_capture, text);
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if capturing(&return_capture) || capturing(&xml_capture) {
                    let resolved = resolve_reference(&e)?;
                    push_to_captures(&mut return_capture, &mut xml_capture, &resolved);
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => return Err(Error::ResponseParse(err.to_string())),
        }
    }

    if !saw_element {
        return Err(Error::ResponseParse("no root element".to_string()));
    }
    if depth != 0 {
        return Err(Error::ResponseParse(format!(
            "{depth} element(s) left unclosed"
        )));
    }

    if let Some(c) = return_capture {
        return Ok(c.text);
    }
    if let Some(c) = xml_capture {
        return Ok(c.text);
    }
    Ok(response.to_string())
}

fn capturing(capture: &Option<Capture>) -> bool {
    capture.as_ref().is_some_and(|c| !c.done)
}

fn push_to_captures(
    return_capture: &mut Option<Capture>,
    xml_capture: &mut Option<Capture>,
    text: &str,
) {
    for capture in [return_capture, xml_capture] {
        if let Some(c) = capture {
            c.push(text);
        }
    }
}

/// Resolve a character or named entity reference inside a captured region.
///
/// Peers echo HTML-escaped request bodies back, so the full HTML5 entity set
/// is accepted, not just the XML predefined five.
fn resolve_reference(e: &BytesRef) -> Result<String, Error> {
    if let Some(ch) = e
        .resolve_char_ref()
        .map_err(|err| Error::ResponseParse(err.to_string()))?
    {
        return Ok(ch.to_string());
    }
    let name = e
        .decode()
        .map_err(|err| Error::ResponseParse(err.to_string()))?;
    match resolve_html5_entity(&name) {
        Some(text) => Ok(text.to_string()),
        None => Err(Error::ResponseParse(format!(
            "unresolvable entity reference &{name};"
        ))),
    }
}
