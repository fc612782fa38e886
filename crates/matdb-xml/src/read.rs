// Dweve MatDB - Materials Database Spreadsheet Toolkit
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! XML to attributed tree conversion.

use crate::error::XmlError;
use matdb_core::{attr_key, collapse_group, TreeValue, TEXT_KEY};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Maximum element nesting depth (prevents stack overflow on crafted input).
const MAX_DEPTH: usize = 100;

/// Parse an XML document into an attributed tree.
///
/// The returned value is a node whose entries are the document's root
/// elements (one, for a well-formed document). Attributes become
/// `@`-prefixed keys, co-located text lands under `#text`, repeated sibling
/// elements collapse into a list, and a text-only element becomes bare text.
pub fn from_xml(xml: &str) -> Result<TreeValue, XmlError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut groups: BTreeMap<String, Vec<TreeValue>> = BTreeMap::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = element_name(&e);
                let attrs = read_attributes(&e, &reader)?;
                let value = parse_element(&mut reader, &name, attrs, 1)?;
                groups.entry(name).or_default().push(value);
            }
            Ok(Event::Empty(e)) => {
                let name = element_name(&e);
                let attrs = read_attributes(&e, &reader)?;
                groups.entry(name).or_default().push(empty_element(attrs));
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(parse_error(&reader, e)),
            // Declaration, comments, DTDs, stray whitespace.
            _ => {}
        }
    }

    let mut root = BTreeMap::new();
    for (name, members) in groups {
        if let Some(value) = collapse_group(members) {
            root.insert(name, value);
        }
    }
    Ok(TreeValue::Node(root))
}

/// Read and parse an XML document from disk.
pub fn from_xml_file(path: impl AsRef<Path>) -> Result<TreeValue, XmlError> {
    let path = path.as_ref();
    let xml = fs::read_to_string(path).map_err(|source| XmlError::Io {
        action: "read",
        path: path.to_path_buf(),
        source,
    })?;
    from_xml(&xml)
}

fn parse_element(
    reader: &mut Reader<&[u8]>,
    name: &str,
    attrs: BTreeMap<String, TreeValue>,
    depth: usize,
) -> Result<TreeValue, XmlError> {
    if depth > MAX_DEPTH {
        return Err(XmlError::TooDeep { max: MAX_DEPTH });
    }

    let mut text = String::new();
    let mut groups: BTreeMap<String, Vec<TreeValue>> = BTreeMap::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let child_name = element_name(&e);
                let child_attrs = read_attributes(&e, reader)?;
                let child = parse_element(reader, &child_name, child_attrs, depth + 1)?;
                groups.entry(child_name).or_default().push(child);
            }
            Ok(Event::Empty(e)) => {
                let child_name = element_name(&e);
                let child_attrs = read_attributes(&e, reader)?;
                groups
                    .entry(child_name)
                    .or_default()
                    .push(empty_element(child_attrs));
            }
            Ok(Event::Text(t)) => {
                let chunk = t
                    .unescape()
                    .map_err(|e| parse_error(reader, e))?;
                text.push_str(&chunk);
            }
            Ok(Event::CData(c)) => {
                text.push_str(&String::from_utf8_lossy(&c.into_inner()));
            }
            Ok(Event::End(e)) => {
                if String::from_utf8_lossy(e.name().as_ref()) == name {
                    break;
                }
            }
            Ok(Event::Eof) => {
                return Err(XmlError::UnexpectedEof {
                    element: name.to_string(),
                })
            }
            Err(e) => return Err(parse_error(reader, e)),
            _ => {}
        }
    }

    Ok(finish_element(attrs, text, groups))
}

/// Assemble the parsed pieces of one element into its tree value.
fn finish_element(
    attrs: BTreeMap<String, TreeValue>,
    text: String,
    groups: BTreeMap<String, Vec<TreeValue>>,
) -> TreeValue {
    if attrs.is_empty() && groups.is_empty() {
        return TreeValue::Text(text);
    }

    let mut map = attrs;
    if !text.is_empty() {
        map.insert(TEXT_KEY.to_string(), TreeValue::Text(text));
    }
    for (name, members) in groups {
        if let Some(value) = collapse_group(members) {
            map.insert(name, value);
        }
    }
    TreeValue::Node(map)
}

fn empty_element(attrs: BTreeMap<String, TreeValue>) -> TreeValue {
    finish_element(attrs, String::new(), BTreeMap::new())
}

fn element_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).to_string()
}

fn read_attributes(
    e: &BytesStart,
    reader: &Reader<&[u8]>,
) -> Result<BTreeMap<String, TreeValue>, XmlError> {
    let mut attrs = BTreeMap::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| XmlError::Parse {
            position: reader.buffer_position(),
            message: err.to_string(),
        })?;
        let name = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr
            .unescape_value()
            .map_err(|err| parse_error(reader, err))?;
        attrs.insert(attr_key(&name), TreeValue::Text(value.into_owned()));
    }
    Ok(attrs)
}

fn parse_error(reader: &Reader<&[u8]>, err: impl std::fmt::Display) -> XmlError {
    XmlError::Parse {
        position: reader.buffer_position(),
        message: err.to_string(),
    }
}
