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

//! MatDB Workbook Store
//!
//! Reads and writes the five-sheet template workbook (Materials, Textures,
//! Panels, Layers, Edges) that operators edit in a spreadsheet application.
//! Writing uses `rust_xlsxwriter`, reading uses `calamine`; both sides share
//! the fixed schema from [`matdb_core::schema`].

mod error;
mod read;
mod write;

pub use error::WorkbookError;
pub use read::read_template;
pub use write::write_template;

#[cfg(test)]
mod tests {
    use super::*;
    use matdb_core::{
        LayerRow, MaterialRow, Measure, PanelRow, RowSets, SheetRow, TextureRow,
    };

    fn sample_rows() -> RowSets {
        let material = MaterialRow {
            material_id: "M1".to_string(),
            material_name: "Oak".to_string(),
            favorite: "1".to_string(),
            kind: "wood".to_string(),
            shininess: "0.4".to_string(),
            ..Default::default()
        };
        let panel = PanelRow {
            panel_id: "P1".to_string(),
            material_id: "M1".to_string(),
            material_name: "Oak".to_string(),
            panel_name: "Standard".to_string(),
            thickness: Measure::new("18", "mm"),
            ..Default::default()
        };
        let layer = LayerRow {
            layer_id: "L1".to_string(),
            panel_id: "P1".to_string(),
            panel_name: "Standard".to_string(),
            layer_name: "core".to_string(),
            thickness: Measure::new("16", "mm"),
            ..Default::default()
        };
        let texture = TextureRow {
            material_id: "M1".to_string(),
            material_name: "Oak".to_string(),
            position: "top".to_string(),
            image: "oak_top.png".to_string(),
            ..Default::default()
        };

        RowSets {
            materials: vec![SheetRow::new(2, material)],
            panels: vec![SheetRow::new(2, panel)],
            layers: vec![SheetRow::new(2, layer)],
            textures: vec![SheetRow::new(2, texture)],
            edges: Vec::new(),
        }
    }

    #[test]
    fn template_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("template.xlsx");

        let rows = sample_rows();
        write_template(&path, &rows).unwrap();
        let back = read_template(&path).unwrap();

        assert_eq!(back.materials.len(), 1);
        assert_eq!(back.materials[0].row, 2);
        assert_eq!(back.materials[0].data, rows.materials[0].data);
        assert_eq!(back.panels[0].data.thickness, Measure::new("18", "mm"));
        assert_eq!(back.layers[0].data.layer_name, "core");
        assert_eq!(back.textures[0].data.position, "top");
        assert!(back.edges.is_empty());
    }

    #[test]
    fn numeric_cells_read_back_without_decimal_noise() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("numbers.xlsx");

        // Write a thickness as a real number cell, the way a spreadsheet
        // application stores "18" typed by the operator.
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Panels").unwrap();
        sheet.write_string(0, 0, "panel_id").unwrap();
        sheet.write_string(0, 1, "thickness").unwrap();
        sheet.write_string(1, 0, "P1").unwrap();
        sheet.write_number(1, 1, 18.0).unwrap();
        workbook.save(&path).unwrap();

        let rows = read_template(&path).unwrap();
        assert_eq!(rows.panels[0].data.thickness.value, "18");
    }

    #[test]
    fn missing_sheets_read_as_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.xlsx");

        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Materials").unwrap();
        sheet.write_string(0, 0, "material_id").unwrap();
        sheet.write_string(1, 0, "M1").unwrap();
        workbook.save(&path).unwrap();

        let rows = read_template(&path).unwrap();
        assert_eq!(rows.materials.len(), 1);
        assert!(rows.panels.is_empty());
        assert!(rows.layers.is_empty());
        assert!(rows.textures.is_empty());
        assert!(rows.edges.is_empty());
    }

    #[test]
    fn reordered_columns_still_resolve_by_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reordered.xlsx");

        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Materials").unwrap();
        sheet.write_string(0, 0, "material_name").unwrap();
        sheet.write_string(0, 1, "material_id").unwrap();
        sheet.write_string(1, 0, "Oak").unwrap();
        sheet.write_string(1, 1, "M1").unwrap();
        workbook.save(&path).unwrap();

        let rows = read_template(&path).unwrap();
        assert_eq!(rows.materials[0].data.material_id, "M1");
        assert_eq!(rows.materials[0].data.material_name, "Oak");
    }

    #[test]
    fn blank_rows_are_skipped_but_numbering_is_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gaps.xlsx");

        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.set_name("Materials").unwrap();
        sheet.write_string(0, 0, "material_id").unwrap();
        sheet.write_string(1, 0, "M1").unwrap();
        // Row 3 left blank on purpose.
        sheet.write_string(3, 0, "M2").unwrap();
        workbook.save(&path).unwrap();

        let rows = read_template(&path).unwrap();
        let ids: Vec<_> = rows
            .materials
            .iter()
            .map(|r| (r.row, r.data.material_id.clone()))
            .collect();
        assert_eq!(ids, vec![(2, "M1".to_string()), (4, "M2".to_string())]);
    }
}
