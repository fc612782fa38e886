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

//! MatDB Command Line Interface

use clap::Parser;
use matdb_convert::ConvertError;
use std::process::ExitCode;

mod cli;
mod commands;

/// MatDB - materials database spreadsheet toolkit
///
/// Converts a materials database (.db XML) into an editable workbook and
/// imports the edited workbook back, validating referential integrity
/// before any destructive write.
///
/// # Examples
///
/// ```bash
/// # Dump a database as a JSON tree
/// matdb parse materials.db materials_parsed.json
///
/// # Generate the editable template workbook
/// matdb generate-template materials_parsed.json materials_template.xlsx
///
/// # Validate an edited workbook without writing anything
/// matdb import-xlsx materials_template.xlsx --report
///
/// # Import the edited workbook, backing up the original database
/// matdb import-xlsx materials_template.xlsx materials_new.db materials.db
/// ```
#[derive(Parser)]
#[command(name = "matdb")]
#[command(author, version, about = "MatDB - materials database spreadsheet toolkit", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: cli::Commands,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(ConvertError::Integrity(violation)) => {
            eprintln!("Error: {}", violation);
            eprintln!(
                "Import aborted due to duplicate materials. \
                 Re-run with --force to override (not recommended)."
            );
            ExitCode::from(2)
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
