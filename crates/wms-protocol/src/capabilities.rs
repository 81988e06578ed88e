//! TIME dimension extraction from WMS GetCapabilities documents.
//!
//! The radar services publish one named layer nested under the root layer,
//! and its `Dimension` element carries a comma-separated list of frame
//! timestamps in chronological order:
//!
//! ```text
//! <WMS_Capabilities>
//!   <Capability>
//!     <Layer>
//!       <Layer>
//!         <Dimension name="time">2025-06-01T12:00:00Z,2025-06-01T12:02:00Z</Dimension>
//! ```

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;

/// Element path below the document root that holds the frame list.
const DIMENSION_PATH: [&[u8]; 4] = [b"Capability", b"Layer", b"Layer", b"Dimension"];

#[derive(Debug, Error)]
pub enum CapabilitiesError {
    #[error("XML parsing error: {0}")]
    Xml(String),

    #[error("no time dimension under Capability/Layer/Layer")]
    MissingDimension,
}

/// Parse the layer's TIME dimension into raw timestamp strings, in document order.
pub fn parse_time_dimension(xml: &str) -> Result<Vec<String>, CapabilitiesError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut path: Vec<Vec<u8>> = Vec::new();
    let mut in_dimension = false;
    let mut content = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                path.push(e.local_name().as_ref().to_vec());
                if at_dimension(&path) && is_time_dimension(&e)? {
                    in_dimension = true;
                    content.clear();
                }
            }
            Ok(Event::Text(t)) if in_dimension => {
                let text = t
                    .unescape()
                    .map_err(|e| CapabilitiesError::Xml(e.to_string()))?;
                content.push_str(&text);
            }
            Ok(Event::CData(c)) if in_dimension => {
                content.push_str(&String::from_utf8_lossy(&c.into_inner()));
            }
            Ok(Event::End(_)) => {
                if in_dimension {
                    in_dimension = false;
                    let times = split_times(&content);
                    if !times.is_empty() {
                        return Ok(times);
                    }
                }
                path.pop();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(CapabilitiesError::Xml(format!(
                    "at position {}: {}",
                    reader.buffer_position(),
                    e
                )))
            }
            _ => {}
        }
    }

    Err(CapabilitiesError::MissingDimension)
}

fn at_dimension(path: &[Vec<u8>]) -> bool {
    path.len() == DIMENSION_PATH.len() + 1
        && path[1..]
            .iter()
            .zip(DIMENSION_PATH)
            .all(|(seen, expected)| seen.as_slice() == expected)
}

/// Unnamed dimensions are accepted; named ones must be `time`.
fn is_time_dimension(e: &BytesStart) -> Result<bool, CapabilitiesError> {
    let attr = e
        .try_get_attribute("name")
        .map_err(|err| CapabilitiesError::Xml(err.to_string()))?;
    match attr {
        None => Ok(true),
        Some(attr) => {
            let name = attr
                .unescape_value()
                .map_err(|err| CapabilitiesError::Xml(err.to_string()))?;
            Ok(name.eq_ignore_ascii_case("time"))
        }
    }
}

fn split_times(content: &str) -> Vec<String> {
    content
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
