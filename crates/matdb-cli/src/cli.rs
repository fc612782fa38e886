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

//! CLI command definitions and argument parsing.

use crate::commands;
use clap::Subcommand;
use matdb_convert::ConvertError;
use std::path::PathBuf;

/// Top-level CLI commands.
///
/// The three commands mirror the edit workflow: dump the database, generate
/// the editable workbook, re-import the edited workbook.
#[derive(Subcommand)]
pub enum Commands {
    /// Parse a materials database (.db XML) into a JSON tree dump
    Parse {
        /// Input database file
        #[arg(value_name = "DB")]
        db: PathBuf,

        /// Output JSON path
        #[arg(value_name = "OUT_JSON", default_value = "materials_parsed.json")]
        out: PathBuf,
    },

    /// Generate the editable template workbook from a JSON tree dump
    GenerateTemplate {
        /// Input JSON tree dump (from `parse`)
        #[arg(value_name = "JSON")]
        json: PathBuf,

        /// Output workbook path
        #[arg(value_name = "OUT_XLSX", default_value = "materials_template.xlsx")]
        out: PathBuf,
    },

    /// Import an edited workbook and write a new database
    ///
    /// Validates the Materials sheet for duplicate names and ids before
    /// writing; a violation aborts the import with exit code 2.
    ImportXlsx {
        /// Edited workbook
        #[arg(value_name = "XLSX")]
        xlsx: PathBuf,

        /// Output database path
        #[arg(value_name = "OUT_DB", default_value = "materials_new.db")]
        out: PathBuf,

        /// Original database to back up before writing
        #[arg(value_name = "ORIGINAL_DB")]
        original: Option<PathBuf>,

        /// Proceed past the duplicate-materials gate
        #[arg(long)]
        force: bool,

        /// Validate and report only; writes no database
        #[arg(long)]
        report: bool,

        /// Where to save the report JSON (defaults to reports/report-<ts>.json)
        #[arg(long, value_name = "PATH")]
        report_out: Option<PathBuf>,
    },
}

impl Commands {
    /// Execute the command.
    pub fn execute(self) -> Result<(), ConvertError> {
        match self {
            Commands::Parse { db, out } => commands::parse(&db, &out),
            Commands::GenerateTemplate { json, out } => commands::generate_template(&json, &out),
            Commands::ImportXlsx {
                xlsx,
                out,
                original,
                force,
                report,
                report_out,
            } => {
                if report {
                    commands::report(&xlsx, report_out.as_deref())
                } else {
                    commands::import(&xlsx, &out, original.as_deref(), force)
                }
            }
        }
    }
}
