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

//! Fixed workbook schema: sheet names, column headers, column widths.
//!
//! Header order is part of the external contract. Editors rely on the
//! generated template's layout, and the importer reads cells by header name
//! so a user reordering columns does not corrupt an import.

/// One sheet column: header text plus the width the template is written with.
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub header: &'static str,
    pub width: f64,
}

const fn col(header: &'static str, width: f64) -> Column {
    Column { header, width }
}

pub const MATERIALS_SHEET: &str = "Materials";
pub const TEXTURES_SHEET: &str = "Textures";
pub const PANELS_SHEET: &str = "Panels";
pub const LAYERS_SHEET: &str = "Layers";
pub const EDGES_SHEET: &str = "Edges";

pub const MATERIALS_COLUMNS: &[Column] = &[
    col("material_id", 40.0),
    col("material_name", 30.0),
    col("favorite", 8.0),
    col("type", 12.0),
    col("rotatable", 10.0),
    col("path", 30.0),
    col("reflect", 10.0),
    col("rainbown", 10.0),
    col("specular", 10.0),
    col("shininess", 10.0),
    col("glossiness", 10.0),
    col("opacity_min", 10.0),
    col("opacity_max", 10.0),
];

pub const TEXTURES_COLUMNS: &[Column] = &[
    col("texture_id", 40.0),
    col("material_id", 40.0),
    col("material_name", 30.0),
    col("position", 10.0),
    col("image", 60.0),
    col("angle", 8.0),
    col("fit_vertically", 12.0),
    col("mirror", 10.0),
];

pub const PANELS_COLUMNS: &[Column] = &[
    col("panel_id", 40.0),
    col("material_id", 40.0),
    col("material_name", 30.0),
    col("panel_name", 30.0),
    col("article", 20.0),
    col("supplier", 20.0),
    col("thickness", 10.0),
    col("thickness_unit", 8.0),
    col("solid_base_id", 40.0),
    col("solid_base_name", 30.0),
];

pub const LAYERS_COLUMNS: &[Column] = &[
    col("layer_id", 40.0),
    col("panel_id", 40.0),
    col("panel_name", 30.0),
    col("layer_name", 30.0),
    col("thickness", 10.0),
    col("thickness_unit", 8.0),
    col("type", 12.0),
    col("supplier", 15.0),
    col("length", 12.0),
    col("length_unit", 8.0),
    col("width", 12.0),
    col("width_unit", 8.0),
    col("price", 12.0),
    col("price_unit", 8.0),
    col("unprocessed_offset", 12.0),
    col("unprocessed_offset_unit", 8.0),
    col("outsize", 8.0),
    col("outsize_unit", 8.0),
];

pub const EDGES_COLUMNS: &[Column] = &[
    col("edge_id", 40.0),
    col("material_id", 40.0),
    col("material_name", 30.0),
    col("name", 30.0),
    col("article", 30.0),
    col("supplier", 15.0),
    col("factory_width", 12.0),
    col("angle", 8.0),
    col("thickness", 10.0),
    col("thickness_unit", 8.0),
    col("price", 12.0),
    col("price_unit", 8.0),
    col("width_min", 10.0),
    col("width_min_unit", 8.0),
    col("width_max", 10.0),
    col("width_max_unit", 8.0),
];
