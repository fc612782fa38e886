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

//! Error types for XML codec operations.

use std::path::PathBuf;
use thiserror::Error;

/// XML codec error types.
#[derive(Debug, Error)]
pub enum XmlError {
    /// Ill-formed XML input.
    #[error("XML parse error at position {position}: {message}")]
    Parse {
        /// Byte offset where the reader gave up.
        position: usize,
        /// Detailed parser message.
        message: String,
    },

    /// The document ended while an element was still open.
    #[error("unexpected end of document inside <{element}>")]
    UnexpectedEof {
        /// Name of the unterminated element.
        element: String,
    },

    /// Nesting deeper than the codec supports.
    #[error("element nesting exceeds the supported depth ({max})")]
    TooDeep {
        /// The enforced depth limit.
        max: usize,
    },

    /// Serialization was asked to write something that is not a document
    /// (the root of a document tree must be an element node).
    #[error("document root must be an element node")]
    NotADocument,

    /// Low-level writer failure.
    #[error("XML write error: {0}")]
    Write(String),

    /// File read/write failure, with the attempted path.
    #[error("failed to {action} '{path}': {source}")]
    Io {
        /// What was being attempted ("read", "write").
        action: &'static str,
        /// The path involved.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
