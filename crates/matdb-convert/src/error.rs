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

//! Error types for the conversion engines.
//!
//! The taxonomy mirrors the guarantees the toolkit exists to provide:
//! structural problems and integrity violations abort the whole operation
//! before anything is written, and I/O failures surface the attempted path
//! verbatim. Callers branch on variants, never on message text: the
//! duplicate-materials gate in particular is a typed
//! [`IntegrityViolation`] carrying the offending values and row numbers.

use crate::report::{DuplicateMaterialId, DuplicateMaterialName};
use matdb_xlsx::WorkbookError;
use matdb_xml::XmlError;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The duplicate-materials gate tripped.
///
/// Carries the full duplicate groups so callers can report every offending
/// value with its spreadsheet row numbers.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrityViolation {
    /// Non-blank `material_name` values appearing on two or more rows.
    pub duplicate_names: Vec<DuplicateMaterialName>,
    /// Non-blank `material_id` values appearing on two or more rows.
    pub duplicate_ids: Vec<DuplicateMaterialId>,
}

impl fmt::Display for IntegrityViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if !self.duplicate_names.is_empty() {
            let names: Vec<&str> = self
                .duplicate_names
                .iter()
                .filter_map(|d| d.name.as_deref())
                .collect();
            parts.push(format!(
                "duplicate material_name values: {}",
                names.join(", ")
            ));
        }
        if !self.duplicate_ids.is_empty() {
            let ids: Vec<&str> = self.duplicate_ids.iter().map(|d| d.id.as_str()).collect();
            parts.push(format!("duplicate material_id values: {}", ids.join(", ")));
        }
        write!(f, "Materials: {}", parts.join("; "))
    }
}

impl std::error::Error for IntegrityViolation {}

/// Conversion error types.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The source document or workbook is missing required top-level
    /// structure. Fatal; no partial output is written.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The duplicate-materials gate tripped. Fatal unless the caller
    /// explicitly bypasses the gate.
    #[error(transparent)]
    Integrity(#[from] IntegrityViolation),

    /// Backup, read, or write failure, with the attempted path.
    #[error("failed to {action} '{path}': {source}")]
    Io {
        /// What was being attempted ("read", "write", "back up").
        action: &'static str,
        /// The path involved.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// An intermediate JSON tree dump could not be produced or reloaded.
    #[error("invalid JSON tree in '{path}': {message}")]
    Json {
        /// The JSON file involved.
        path: PathBuf,
        /// The serde message.
        message: String,
    },

    /// XML codec failure.
    #[error(transparent)]
    Xml(#[from] XmlError),

    /// Workbook store failure.
    #[error(transparent)]
    Workbook(#[from] WorkbookError),
}
