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

//! Error types for workbook store operations.

use std::path::PathBuf;
use thiserror::Error;

/// Workbook read/write error types.
#[derive(Debug, Error)]
pub enum WorkbookError {
    /// The workbook file could not be opened or parsed.
    #[error("failed to open workbook '{path}': {message}")]
    Open {
        /// The path that was attempted.
        path: PathBuf,
        /// The underlying reader message.
        message: String,
    },

    /// A sheet could not be read or populated.
    #[error("failed to process sheet '{sheet}': {message}")]
    Sheet {
        /// The sheet involved.
        sheet: String,
        /// The underlying message.
        message: String,
    },

    /// The workbook file could not be written.
    #[error("failed to write workbook '{path}': {message}")]
    Write {
        /// The path that was attempted.
        path: PathBuf,
        /// The underlying writer message.
        message: String,
    },
}
