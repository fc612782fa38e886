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

//! Attributed tree to XML serialization.

use crate::error::XmlError;
use matdb_core::{TreeValue, ATTR_PREFIX, TEXT_KEY};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::fs;
use std::io::Cursor;
use std::path::Path;

/// Configuration for XML output.
#[derive(Debug, Clone)]
pub struct ToXmlConfig {
    /// Pretty-print with indentation.
    pub pretty: bool,
    /// Indentation string (e.g., "  " or "\t").
    pub indent: String,
    /// Emit the `<?xml ...?>` declaration.
    pub declaration: bool,
}

impl Default for ToXmlConfig {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ".to_string(),
            declaration: true,
        }
    }
}

/// Serialize an attributed tree to an XML string.
///
/// The root value must be a node; its entries become the document's root
/// elements. A list under a key writes one element per member, so a bare
/// node and a one-element list produce identical output.
pub fn to_xml(tree: &TreeValue, config: &ToXmlConfig) -> Result<String, XmlError> {
    let root = tree.as_node().ok_or(XmlError::NotADocument)?;

    let mut writer = if config.pretty {
        Writer::new_with_indent(Cursor::new(Vec::new()), b' ', config.indent.len())
    } else {
        Writer::new(Cursor::new(Vec::new()))
    };

    if config.declaration {
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(write_error)?;
    }

    for (key, value) in root {
        if key.starts_with(ATTR_PREFIX) || key == TEXT_KEY {
            return Err(XmlError::NotADocument);
        }
        write_element(&mut writer, key, value)?;
    }

    let bytes = writer.into_inner().into_inner();
    String::from_utf8(bytes).map_err(|e| XmlError::Write(e.to_string()))
}

/// Serialize a tree and write it to disk as one complete file.
pub fn to_xml_file(
    tree: &TreeValue,
    path: impl AsRef<Path>,
    config: &ToXmlConfig,
) -> Result<(), XmlError> {
    let path = path.as_ref();
    let xml = to_xml(tree, config)?;
    fs::write(path, xml).map_err(|source| XmlError::Io {
        action: "write",
        path: path.to_path_buf(),
        source,
    })
}

fn write_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    value: &TreeValue,
) -> Result<(), XmlError> {
    match value {
        TreeValue::List(items) => {
            for item in items {
                write_element(writer, name, item)?;
            }
            Ok(())
        }
        TreeValue::Node(map) => {
            let mut elem = BytesStart::new(name);
            let mut text = String::new();
            let mut children = Vec::new();

            for (key, child) in map {
                if key == TEXT_KEY {
                    text = child.display();
                } else if let Some(attr_name) = key.strip_prefix(ATTR_PREFIX) {
                    elem.push_attribute((attr_name, child.display().as_str()));
                } else {
                    children.push((key.as_str(), child));
                }
            }

            if text.is_empty() && children.is_empty() {
                return writer.write_event(Event::Empty(elem)).map_err(write_error);
            }

            writer.write_event(Event::Start(elem)).map_err(write_error)?;
            if !text.is_empty() {
                writer
                    .write_event(Event::Text(BytesText::new(&text)))
                    .map_err(write_error)?;
            }
            for (key, child) in children {
                write_element(writer, key, child)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new(name)))
                .map_err(write_error)
        }
        scalar => {
            let text = scalar.display();
            if text.is_empty() {
                writer
                    .write_event(Event::Empty(BytesStart::new(name)))
                    .map_err(write_error)
            } else {
                writer
                    .write_event(Event::Start(BytesStart::new(name)))
                    .map_err(write_error)?;
                writer
                    .write_event(Event::Text(BytesText::new(&text)))
                    .map_err(write_error)?;
                writer
                    .write_event(Event::End(BytesEnd::new(name)))
                    .map_err(write_error)
            }
        }
    }
}

fn write_error(err: impl std::fmt::Display) -> XmlError {
    XmlError::Write(err.to_string())
}
