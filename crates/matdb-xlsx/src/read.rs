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

//! Template workbook reading.

use crate::error::WorkbookError;
use calamine::{open_workbook, Data, Reader, Xlsx};
use matdb_core::schema::{
    EDGES_SHEET, LAYERS_SHEET, MATERIALS_SHEET, PANELS_SHEET, TEXTURES_SHEET,
};
use matdb_core::{
    EdgeRow, LayerRow, MaterialRow, PanelRow, RowSets, SheetRow, TextureRow,
};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

type XlsxFile = Xlsx<BufReader<File>>;

/// Read an edited template workbook back into row sets.
///
/// Cells are resolved by header name, so a user who reordered or appended
/// columns still imports cleanly. A missing sheet yields an empty row set
/// rather than an error, and entirely blank rows are skipped. Each kept row
/// records its 1-based spreadsheet row number for diagnostics.
pub fn read_template(path: impl AsRef<Path>) -> Result<RowSets, WorkbookError> {
    let path = path.as_ref();
    let mut workbook = open_workbook::<XlsxFile, _>(path).map_err(|e| WorkbookError::Open {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    Ok(RowSets {
        materials: read_sheet(&mut workbook, MATERIALS_SHEET, |field| {
            MaterialRow::from_fields(field)
        })?,
        textures: read_sheet(&mut workbook, TEXTURES_SHEET, |field| {
            TextureRow::from_fields(field)
        })?,
        panels: read_sheet(&mut workbook, PANELS_SHEET, |field| {
            PanelRow::from_fields(field)
        })?,
        layers: read_sheet(&mut workbook, LAYERS_SHEET, |field| {
            LayerRow::from_fields(field)
        })?,
        edges: read_sheet(&mut workbook, EDGES_SHEET, |field| {
            EdgeRow::from_fields(field)
        })?,
    })
}

fn read_sheet<T>(
    workbook: &mut XlsxFile,
    name: &str,
    build: impl Fn(&dyn Fn(&str) -> String) -> T,
) -> Result<Vec<SheetRow<T>>, WorkbookError> {
    if !workbook.sheet_names().iter().any(|s| s == name) {
        return Ok(Vec::new());
    }

    let range = workbook
        .worksheet_range(name)
        .map_err(|e| WorkbookError::Sheet {
            sheet: name.to_string(),
            message: e.to_string(),
        })?;

    let (start_row, _) = range.start().unwrap_or((0, 0));
    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row.iter().map(cell_text).collect(),
        None => return Ok(Vec::new()),
    };

    let mut out = Vec::new();
    for (i, row) in rows.enumerate() {
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }

        let lookup = |field: &str| -> String {
            headers
                .iter()
                .position(|h| h == field)
                .and_then(|idx| row.get(idx))
                .map(cell_text)
                .unwrap_or_default()
        };

        // Header occupies the first range row; data row i is the next one.
        let row_number = start_row + i as u32 + 2;
        out.push(SheetRow::new(row_number, build(&lookup)));
    }

    Ok(out)
}

/// Render a cell as the string the row model transports.
///
/// Floats print through Rust's shortest representation, so a cell Excel
/// stored as `18.0` comes back as the `18` the operator typed.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::Error(e) => format!("{e:?}"),
        other => other.to_string(),
    }
}
