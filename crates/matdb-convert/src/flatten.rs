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

//! Flattening engine: attributed tree to the five row sets.
//!
//! A pure transform. Walks materials, their panels (and each panel's
//! layers), texture slots, and edges, emitting one row per entity with the
//! owning entity's id and name repeated on every child row for operator
//! readability. Single-vs-list child shapes normalize through
//! [`group_members`]; value+unit nodes split into the value and unit
//! columns.

use crate::error::ConvertError;
use matdb_core::{
    group_members, EdgeRow, LayerRow, MaterialRow, Measure, PanelRow, RowSets, SheetRow,
    TextureRow, TreeValue,
};

/// Flatten a materials database tree into the five row sets.
///
/// Fails with [`ConvertError::MalformedInput`] when the top-level
/// `materials` node is absent. An empty `materials` node flattens to empty
/// row sets; "zero means absent key" keeps an empty database representable.
pub fn flatten(tree: &TreeValue) -> Result<RowSets, ConvertError> {
    let materials_node = tree.get("materials").ok_or_else(|| {
        ConvertError::MalformedInput("document has no top-level <materials> element".to_string())
    })?;

    let mut rows = RowSets::default();

    for material in group_members(materials_node.get("material")) {
        let material_id = material.attr_text("id");
        let details = material.get("details");
        let material_name = child_text(details, "name");
        let visual = details.and_then(|d| d.get("visual_effect"));

        rows.materials.push(sheet_row(
            rows.materials.len(),
            MaterialRow {
                material_id: material_id.clone(),
                material_name: material_name.clone(),
                favorite: child_text(details, "favorite"),
                kind: child_text(details, "type"),
                rotatable: child_text(details, "rotatable"),
                path: child_text(details, "path"),
                reflect: child_text(visual, "reflect"),
                rainbown: child_text(visual, "rainbown"),
                specular: child_text(visual, "specular"),
                shininess: child_text(visual, "shininess"),
                glossiness: child_text(visual, "glossiness"),
                opacity_min: child_text(visual, "opacity_min"),
                opacity_max: child_text(visual, "opacity_max"),
            },
        ));

        if let Some(textures) = material.get("textures") {
            for position in ["top", "bottom"] {
                let Some(slot) = textures.get(position) else {
                    continue;
                };
                if is_blank_scalar(slot) {
                    continue;
                }
                rows.textures.push(sheet_row(
                    rows.textures.len(),
                    TextureRow {
                        texture_id: String::new(),
                        material_id: material_id.clone(),
                        material_name: material_name.clone(),
                        position: position.to_string(),
                        image: child_text(Some(slot), "image"),
                        angle: child_text(Some(slot), "angle"),
                        fit_vertically: child_text(Some(slot), "fit_vertically"),
                        mirror: child_text(Some(slot), "mirror"),
                    },
                ));
            }
        }

        for panel in group_members(material.get("panels").and_then(|p| p.get("panel"))) {
            let panel_id = panel.attr_text("id");
            let panel_name = child_text(Some(panel), "name");
            let solid_base = panel.get("solid_base");

            rows.panels.push(sheet_row(
                rows.panels.len(),
                PanelRow {
                    panel_id: panel_id.clone(),
                    material_id: material_id.clone(),
                    material_name: material_name.clone(),
                    panel_name: panel_name.clone(),
                    article: child_text(Some(panel), "article"),
                    supplier: child_text(Some(panel), "supplier"),
                    thickness: measure_of(panel.get("thickness")),
                    solid_base_id: solid_base
                        .map(|sb| sb.attr_text("id"))
                        .unwrap_or_default(),
                    solid_base_name: solid_base.map(TreeValue::text).unwrap_or_default(),
                },
            ));

            for layer in group_members(panel.get("layers").and_then(|l| l.get("layer"))) {
                rows.layers.push(sheet_row(
                    rows.layers.len(),
                    LayerRow {
                        layer_id: layer.attr_text("id"),
                        panel_id: panel_id.clone(),
                        panel_name: panel_name.clone(),
                        layer_name: child_text(Some(layer), "name"),
                        thickness: measure_of(layer.get("thickness")),
                        kind: child_text(Some(layer), "type"),
                        supplier: child_text(Some(layer), "supplier"),
                        length: measure_of(layer.get("length")),
                        width: measure_of(layer.get("width")),
                        price: measure_of(layer.get("price")),
                        unprocessed_offset: measure_of(layer.get("unprocessed_offset")),
                        outsize: measure_of(layer.get("outsize")),
                    },
                ));
            }
        }

        for edge in group_members(material.get("edges").and_then(|e| e.get("edge"))) {
            rows.edges.push(sheet_row(
                rows.edges.len(),
                EdgeRow {
                    edge_id: edge.attr_text("id"),
                    material_id: material_id.clone(),
                    material_name: material_name.clone(),
                    name: child_text(Some(edge), "name"),
                    article: child_text(Some(edge), "article"),
                    supplier: child_text(Some(edge), "supplier"),
                    factory_width: edge
                        .get("factory_width")
                        .map(TreeValue::text)
                        .unwrap_or_default(),
                    angle: child_text(edge.get("visual_effect"), "angle"),
                    thickness: measure_of(edge.get("thickness")),
                    price: measure_of(edge.get("price")),
                    width_min: measure_of(edge.get("width_min")),
                    width_max: measure_of(edge.get("width_max")),
                },
            ));
        }
    }

    Ok(rows)
}

/// Wrap a row with the spreadsheet row number it will land on (header row
/// 1, data from row 2).
fn sheet_row<T>(index: usize, data: T) -> SheetRow<T> {
    SheetRow::new(index as u32 + 2, data)
}

fn child_text(node: Option<&TreeValue>, key: &str) -> String {
    node.and_then(|n| n.get(key))
        .map(TreeValue::text)
        .unwrap_or_default()
}

/// Split a value+unit node into its column pair; a bare scalar has no unit.
fn measure_of(node: Option<&TreeValue>) -> Measure {
    match node {
        Some(n) => Measure::new(n.text(), n.attr_text("unit")),
        None => Measure::default(),
    }
}

/// An empty element slot (`<top/>`) carries no texture.
fn is_blank_scalar(value: &TreeValue) -> bool {
    matches!(value, TreeValue::Null) || matches!(value, TreeValue::Text(s) if s.is_empty())
}
