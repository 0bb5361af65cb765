//! Streaming XML attribute extraction.
//!
//! Source manifests can be large, so the document is walked as an event
//! stream and parsing stops at the first matching element.

use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tokio::fs::File;
use tokio::io::BufReader;

use crate::error::ScanError;

/// Scan `path` for the first element named `tag` whose `filter_attribute`
/// equals `filter_value`, and yield its `attribute` value.
///
/// Element and attribute names are compared ASCII case-insensitively;
/// manifests in the wild use both `<project>` and `<PROJECT>`. The filter
/// value comparison is exact.
pub async fn scan_for_attribute(
    path: &Path,
    tag: &str,
    attribute: &str,
    filter_attribute: &str,
    filter_value: &str,
) -> Result<String, ScanError> {
    let file = File::open(path).await?;
    let mut reader = Reader::from_reader(BufReader::new(file));
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into_async(&mut buf).await? {
            Event::Start(element) | Event::Empty(element) => {
                if element.name().as_ref().eq_ignore_ascii_case(tag.as_bytes()) {
                    if let Some(value) =
                        matching_attribute(&element, attribute, filter_attribute, filter_value)?
                    {
                        return Ok(value);
                    }
                }
            }
            Event::Eof => {
                return Err(ScanError::NotFound {
                    path: path.to_path_buf(),
                    needle: format!("{tag}[{filter_attribute}={filter_value}]"),
                });
            }
            _ => {}
        }
        buf.clear();
    }
}

/// Yield `attribute` from `element` if its `filter_attribute` matches.
fn matching_attribute(
    element: &BytesStart<'_>,
    attribute: &str,
    filter_attribute: &str,
    filter_value: &str,
) -> Result<Option<String>, ScanError> {
    let mut target = None;
    let mut filter_hit = false;

    for attr in element.attributes().with_checks(false) {
        let attr = attr?;
        let key = attr.key.as_ref();
        if key.eq_ignore_ascii_case(filter_attribute.as_bytes()) {
            filter_hit = attr.value.as_ref() == filter_value.as_bytes();
        } else if key.eq_ignore_ascii_case(attribute.as_bytes()) {
            target = Some(String::from_utf8_lossy(&attr.value).into_owned());
        }
    }

    Ok(if filter_hit { target } else { None })
}
