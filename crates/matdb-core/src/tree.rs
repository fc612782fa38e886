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

//! Generic attributed tree.
//!
//! A [`TreeValue`] is the in-memory form of a materials database document.
//! The XML codec maps documents onto it with a fixed shape convention:
//!
//! - attribute keys carry the reserved [`ATTR_PREFIX`] (`@id`, `@unit`),
//! - element text co-located with attributes lives under [`TEXT_KEY`],
//! - a repeatable child appears as an absent key (zero), a bare
//!   [`TreeValue::Node`] (one), or a [`TreeValue::List`] (many).
//!
//! The third rule is the classic round-trip hazard, so it is owned by a
//! single pair of boundary functions: [`group_members`] normalizes any of
//! the three shapes into a uniform slice, and [`collapse_group`] folds a
//! vector back into the canonical shape. Everything that walks or builds
//! repeatable children goes through these two functions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reserved key prefix marking a tree entry as a source-document attribute.
pub const ATTR_PREFIX: char = '@';

/// Reserved key holding element text that coexists with attributes.
pub const TEXT_KEY: &str = "#text";

/// A node in the attributed tree.
///
/// Scalar variants beyond `Text` exist so a tree dumped to JSON by the
/// `parse` command survives a reload after hand editing (JSON numbers and
/// booleans deserialize without loss). The XML codec itself only ever
/// produces `Text`, `List`, and `Node`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<TreeValue>),
    Node(BTreeMap<String, TreeValue>),
}

impl TreeValue {
    /// An empty element node.
    pub fn empty_node() -> Self {
        TreeValue::Node(BTreeMap::new())
    }

    /// Borrow the node map, if this is a node.
    pub fn as_node(&self) -> Option<&BTreeMap<String, TreeValue>> {
        match self {
            TreeValue::Node(map) => Some(map),
            _ => None,
        }
    }

    /// Child lookup; `None` for scalars and lists.
    pub fn get(&self, key: &str) -> Option<&TreeValue> {
        self.as_node().and_then(|map| map.get(key))
    }

    /// Attribute lookup by bare name (without the `@` prefix).
    pub fn attr(&self, name: &str) -> Option<&TreeValue> {
        self.get(&attr_key(name))
    }

    /// Attribute rendered as a plain string, blank when absent.
    pub fn attr_text(&self, name: &str) -> String {
        self.attr(name).map(TreeValue::display).unwrap_or_default()
    }

    /// The textual content of a value.
    ///
    /// Scalars render directly; a node yields its `#text` entry (blank when
    /// there is none); lists have no single text and yield blank. This is
    /// the one rule for reading value+unit fields that may appear either as
    /// a bare scalar or as a `{#text, @unit}` node.
    pub fn text(&self) -> String {
        match self {
            TreeValue::Node(map) => map.get(TEXT_KEY).map(TreeValue::display).unwrap_or_default(),
            TreeValue::List(_) => String::new(),
            scalar => scalar.display(),
        }
    }

    /// Scalar rendering used for cell values; composites render blank.
    pub fn display(&self) -> String {
        match self {
            TreeValue::Null => String::new(),
            TreeValue::Bool(b) => b.to_string(),
            TreeValue::Int(n) => n.to_string(),
            TreeValue::Float(f) => f.to_string(),
            TreeValue::Text(s) => s.clone(),
            TreeValue::List(_) | TreeValue::Node(_) => String::new(),
        }
    }
}

impl From<&str> for TreeValue {
    fn from(s: &str) -> Self {
        TreeValue::Text(s.to_string())
    }
}

impl From<String> for TreeValue {
    fn from(s: String) -> Self {
        TreeValue::Text(s)
    }
}

/// The tree key for an attribute name: `id` → `@id`.
pub fn attr_key(name: &str) -> String {
    format!("{}{}", ATTR_PREFIX, name)
}

/// Normalize a repeatable-child group into a uniform member slice.
///
/// Absent keys (and explicit nulls from hand-edited JSON dumps) are zero
/// members, a bare value is one, a list is many.
pub fn group_members(group: Option<&TreeValue>) -> Vec<&TreeValue> {
    match group {
        None | Some(TreeValue::Null) => Vec::new(),
        Some(TreeValue::List(items)) => items.iter().collect(),
        Some(single) => vec![single],
    }
}

/// Fold assembled members back into the canonical group shape.
///
/// Zero members collapse to an absent key (`None`), exactly one stays a
/// bare value, more than one becomes a list. The inverse of
/// [`group_members`].
pub fn collapse_group(mut items: Vec<TreeValue>) -> Option<TreeValue> {
    match items.len() {
        0 => None,
        1 => Some(items.remove(0)),
        _ => Some(TreeValue::List(items)),
    }
}
