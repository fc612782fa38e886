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

//! Template workbook writing.

use crate::error::WorkbookError;
use matdb_core::schema::{
    Column, EDGES_COLUMNS, EDGES_SHEET, LAYERS_COLUMNS, LAYERS_SHEET, MATERIALS_COLUMNS,
    MATERIALS_SHEET, PANELS_COLUMNS, PANELS_SHEET, TEXTURES_COLUMNS, TEXTURES_SHEET,
};
use matdb_core::RowSets;
use rust_xlsxwriter::{Workbook, Worksheet};
use std::path::Path;

/// Write the five-sheet template workbook.
///
/// Sheet order and column order follow [`matdb_core::schema`]; the header
/// row lands on row 1 and data rows start at row 2, which is the numbering
/// the validator reports back to the operator. Blank cells are left
/// unwritten.
pub fn write_template(path: impl AsRef<Path>, rows: &RowSets) -> Result<(), WorkbookError> {
    let path = path.as_ref();
    let mut workbook = Workbook::new();

    write_sheet(
        &mut workbook,
        MATERIALS_SHEET,
        MATERIALS_COLUMNS,
        rows.materials.iter().map(|r| r.data.cells()),
    )?;
    write_sheet(
        &mut workbook,
        TEXTURES_SHEET,
        TEXTURES_COLUMNS,
        rows.textures.iter().map(|r| r.data.cells()),
    )?;
    write_sheet(
        &mut workbook,
        PANELS_SHEET,
        PANELS_COLUMNS,
        rows.panels.iter().map(|r| r.data.cells()),
    )?;
    write_sheet(
        &mut workbook,
        LAYERS_SHEET,
        LAYERS_COLUMNS,
        rows.layers.iter().map(|r| r.data.cells()),
    )?;
    write_sheet(
        &mut workbook,
        EDGES_SHEET,
        EDGES_COLUMNS,
        rows.edges.iter().map(|r| r.data.cells()),
    )?;

    workbook.save(path).map_err(|e| WorkbookError::Write {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn write_sheet(
    workbook: &mut Workbook,
    name: &str,
    columns: &[Column],
    rows: impl Iterator<Item = Vec<String>>,
) -> Result<(), WorkbookError> {
    let sheet_err = |e: rust_xlsxwriter::XlsxError| WorkbookError::Sheet {
        sheet: name.to_string(),
        message: e.to_string(),
    };

    let worksheet: &mut Worksheet = workbook.add_worksheet();
    worksheet.set_name(name).map_err(sheet_err)?;

    for (col, column) in columns.iter().enumerate() {
        worksheet
            .write_string(0, col as u16, column.header)
            .map_err(sheet_err)?;
        worksheet
            .set_column_width(col as u16, column.width)
            .map_err(sheet_err)?;
    }

    for (row, cells) in rows.enumerate() {
        for (col, cell) in cells.iter().enumerate() {
            if cell.is_empty() {
                continue;
            }
            worksheet
                .write_string((row + 1) as u32, col as u16, cell)
                .map_err(sheet_err)?;
        }
    }

    Ok(())
}
