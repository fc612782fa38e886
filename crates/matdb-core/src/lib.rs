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

//! MatDB Core Data Model
//!
//! Shared types for the MatDB toolkit: the generic attributed tree that the
//! XML codec produces and consumes, the typed sheet rows that the flattening
//! and reconstruction engines exchange with the workbook store, and the fixed
//! sheet/column schema that both sides of that exchange honor.
//!
//! # Examples
//!
//! ```rust
//! use matdb_core::{collapse_group, group_members, TreeValue};
//!
//! // The single-vs-list shape convention is resolved by one pair of
//! // boundary functions, used identically by flatten and reconstruct.
//! let one = collapse_group(vec![TreeValue::from("only")]).unwrap();
//! assert_eq!(one, TreeValue::from("only"));
//! assert_eq!(group_members(Some(&one)).len(), 1);
//! assert!(collapse_group(Vec::new()).is_none());
//! ```

mod rows;
pub mod schema;
mod tree;

pub use rows::{
    EdgeRow, LayerRow, MaterialRow, Measure, PanelRow, RowSets, SheetRow, TextureRow,
};
pub use tree::{attr_key, collapse_group, group_members, TreeValue, ATTR_PREFIX, TEXT_KEY};
