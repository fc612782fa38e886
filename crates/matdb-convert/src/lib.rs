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

//! MatDB Conversion Engines
//!
//! The core of the toolkit: flattening a materials database tree into the
//! five editable row sets, reconstructing a semantically equivalent tree
//! from edited rows, and validating referential integrity before the
//! destructive write.
//!
//! # Data flow
//!
//! ```text
//! materials.db ──XML codec──▶ tree ──flatten──▶ rows ──workbook store──▶ template.xlsx
//!                                                          │  (operator edits)
//! materials_new.db ◀──XML codec── tree ◀──reconstruct── rows ◀──workbook store──┘
//!                                            ▲
//!                                   duplicate-materials gate
//! ```
//!
//! The [`ops`] module bundles these steps into the operations the CLI and
//! the HTTP service expose.
//!
//! # Examples
//!
//! ```rust
//! use matdb_convert::{flatten, reconstruct, ReconstructOptions};
//! use matdb_xml::from_xml;
//!
//! let xml = r#"<materials version="1.0">
//!   <material id="M1"><details><name>Oak</name></details></material>
//! </materials>"#;
//!
//! let mut rows = flatten(&from_xml(xml)?)?;
//! assert_eq!(rows.materials.len(), 1);
//!
//! let tree = reconstruct(&mut rows, &ReconstructOptions::default())?;
//! let material = tree.get("materials").unwrap().get("material").unwrap();
//! assert_eq!(material.attr_text("id"), "M1");
//! # Ok::<(), matdb_convert::ConvertError>(())
//! ```

mod error;
mod flatten;
pub mod ops;
mod reconstruct;
pub mod report;

pub use error::{ConvertError, IntegrityViolation};
pub use flatten::flatten;
pub use ops::{
    backup_original, default_report_path, generate_template_from_db,
    generate_template_from_json, import_workbook, load_tree_json, parse_to_json,
    report_workbook, write_report_json, ImportOptions, ImportOutcome,
};
pub use reconstruct::{reconstruct, ReconstructOptions};
pub use report::{materials_gate, report, Report};
