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

//! MatDB XML Codec
//!
//! Bidirectional conversion between materials database XML documents and the
//! generic attributed tree ([`matdb_core::TreeValue`]).
//!
//! The mapping follows the tree's shape convention: attributes become
//! `@`-prefixed keys, element text that coexists with attributes lands under
//! `#text`, repeated sibling elements become a list, and a text-only element
//! becomes a bare text value. Serialization applies the same rules in
//! reverse, so a one-element list and a bare node produce identical XML.
//!
//! # Examples
//!
//! ```rust
//! use matdb_xml::{from_xml, to_xml, ToXmlConfig};
//!
//! let xml = r#"<materials version="1.0">
//!   <material id="M1"><details><name>Oak</name></details></material>
//! </materials>"#;
//!
//! let tree = from_xml(xml)?;
//! let materials = tree.get("materials").unwrap();
//! assert_eq!(materials.attr_text("version"), "1.0");
//!
//! let out = to_xml(&tree, &ToXmlConfig::default())?;
//! assert!(out.contains("<material id=\"M1\">"));
//! # Ok::<(), matdb_xml::XmlError>(())
//! ```

mod error;
mod read;
mod write;

pub use error::XmlError;
pub use read::{from_xml, from_xml_file};
pub use write::{to_xml, to_xml_file, ToXmlConfig};

#[cfg(test)]
mod tests {
    use super::*;
    use matdb_core::{group_members, TreeValue};

    #[test]
    fn parses_attributes_text_and_nesting() {
        let xml = r#"<?xml version="1.0"?>
            <materials version="1.0">
              <material id="M1">
                <details>
                  <name>Oak</name>
                  <favorite>1</favorite>
                </details>
              </material>
            </materials>"#;

        let tree = from_xml(xml).unwrap();
        let materials = tree.get("materials").unwrap();
        assert_eq!(materials.attr_text("version"), "1.0");

        let material = materials.get("material").unwrap();
        assert_eq!(material.attr_text("id"), "M1");

        let details = material.get("details").unwrap();
        assert_eq!(details.get("name").unwrap().text(), "Oak");
        assert_eq!(details.get("favorite").unwrap().text(), "1");
    }

    #[test]
    fn text_with_attributes_lands_under_text_key() {
        let xml = r#"<panel><thickness unit="mm">18</thickness></panel>"#;
        let tree = from_xml(xml).unwrap();
        let thickness = tree.get("panel").unwrap().get("thickness").unwrap();

        assert_eq!(thickness.text(), "18");
        assert_eq!(thickness.attr_text("unit"), "mm");
    }

    #[test]
    fn repeated_siblings_become_a_list() {
        let xml = r#"<layers><layer><name>a</name></layer><layer><name>b</name></layer></layers>"#;
        let tree = from_xml(xml).unwrap();
        let layers = tree.get("layers").unwrap();

        let members = group_members(layers.get("layer"));
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].get("name").unwrap().text(), "a");
        assert_eq!(members[1].get("name").unwrap().text(), "b");
    }

    #[test]
    fn single_child_stays_a_bare_node() {
        let xml = r#"<panels><panel><name>only</name></panel></panels>"#;
        let tree = from_xml(xml).unwrap();
        let panel = tree.get("panels").unwrap().get("panel").unwrap();

        assert!(matches!(panel, TreeValue::Node(_)));
        assert_eq!(group_members(Some(panel)).len(), 1);
    }

    #[test]
    fn empty_element_parses_as_blank_text() {
        let tree = from_xml("<material><article/></material>").unwrap();
        let article = tree.get("material").unwrap().get("article").unwrap();
        assert_eq!(article, &TreeValue::Text(String::new()));
    }

    #[test]
    fn round_trip_preserves_structure() {
        let xml = r#"<materials version="1.0"><material id="M1"><details><name>Oak &amp; Ash</name></details><panels><panel id="P1"><thickness unit="mm">18</thickness></panel></panels></material></materials>"#;

        let tree = from_xml(xml).unwrap();
        let out = to_xml(&tree, &ToXmlConfig::default()).unwrap();
        let tree2 = from_xml(&out).unwrap();

        assert_eq!(tree2, tree);
    }

    #[test]
    fn escaping_survives_both_directions() {
        let xml = r#"<m><name>Oak &amp; Ash &lt;select&gt;</name></m>"#;
        let tree = from_xml(xml).unwrap();
        assert_eq!(
            tree.get("m").unwrap().get("name").unwrap().text(),
            "Oak & Ash <select>"
        );

        let out = to_xml(&tree, &ToXmlConfig::default()).unwrap();
        assert!(out.contains("Oak &amp; Ash &lt;select&gt;"));
    }

    #[test]
    fn compact_output_has_no_newlines_between_elements() {
        let tree = from_xml("<a><b>1</b><c>2</c></a>").unwrap();
        let config = ToXmlConfig {
            pretty: false,
            ..Default::default()
        };
        let out = to_xml(&tree, &config).unwrap();
        assert!(out.contains("<a><b>1</b><c>2</c></a>"));
    }

    #[test]
    fn unclosed_element_is_rejected() {
        assert!(from_xml("<materials><material>").is_err());
    }

    #[test]
    fn file_helpers_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("materials.db");

        let tree =
            from_xml(r#"<materials version="1.0"><material id="M1"/></materials>"#).unwrap();
        to_xml_file(&tree, &path, &ToXmlConfig::default()).unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert_eq!(from_xml_file(&path).unwrap(), tree);
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = from_xml_file("/no/such/materials.db").unwrap_err();
        assert!(err.to_string().contains("/no/such/materials.db"));
    }

    #[test]
    fn scalar_root_is_rejected_on_write() {
        let err = to_xml(&TreeValue::from("loose text"), &ToXmlConfig::default());
        assert!(matches!(err, Err(XmlError::NotADocument)));
    }
}
