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

//! Integrity validator and workbook reporter.
//!
//! [`report`] is a read-only inspection of the five row sets: duplicate-key
//! diagnostics, per-parent statistics, and a bounded sample of each sheet.
//! It never mutates the rows and does not require ids to be generated.
//!
//! [`materials_gate`] is the import precondition: the same Materials
//! duplicate computation the report performs, exposed as a typed error so
//! the gate and the report can never disagree on what a duplicate is.
//!
//! Rows with a blank foreign key are bucketed under [`MISSING_PARENT_KEY`]
//! so they stay visible in the report instead of silently vanishing.

use crate::error::IntegrityViolation;
use matdb_core::{MaterialRow, RowSets, SheetRow};
use serde::Serialize;
use std::collections::BTreeMap;

/// Bucket key for rows whose parent foreign key is blank.
pub const MISSING_PARENT_KEY: &str = "__MISSING__";

/// Bucket key for texture rows with a blank position.
const MISSING_POSITION_KEY: &str = "__none__";

/// Sample size per sheet.
const SAMPLE_LIMIT: usize = 10;

/// A `material_name` duplicate group, or a missing-name flag.
///
/// A missing name is reported as `name: null` with the single row that
/// lacks it; a real duplicate carries every row and the ids on those rows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateMaterialName {
    pub name: Option<String>,
    pub rows: Vec<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ids: Option<Vec<String>>,
}

/// A `material_id` duplicate group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateMaterialId {
    pub id: String,
    pub rows: Vec<u32>,
    pub names: Vec<String>,
}

/// A panel name duplicated within one material.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicatePanelName {
    pub sheet: &'static str,
    pub material_id: String,
    pub panel_name: Option<String>,
    pub rows: Vec<u32>,
    pub panel_ids: Vec<String>,
}

/// A layer name duplicated within one panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateLayerName {
    pub sheet: &'static str,
    pub panel_id: String,
    pub layer_name: Option<String>,
    pub rows: Vec<u32>,
    pub layer_ids: Vec<String>,
}

/// A texture position occupied more than once for one material.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateTexture {
    pub sheet: &'static str,
    pub material_id: String,
    pub position: String,
    pub rows: Vec<u32>,
    pub texture_ids: Vec<String>,
}

/// An edge name duplicated within one material.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DuplicateEdgeName {
    pub sheet: &'static str,
    pub material_id: String,
    pub name: Option<String>,
    pub rows: Vec<u32>,
    pub edge_ids: Vec<String>,
}

/// Texture slot counts for one material.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TextureCounts {
    pub top: usize,
    pub bottom: usize,
    pub other: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialSample {
    pub row: u32,
    pub material_id: String,
    pub material_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PanelSample {
    pub row: u32,
    pub panel_id: String,
    pub panel_name: String,
    pub material_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSample {
    pub row: u32,
    pub layer_id: String,
    pub layer_name: String,
    pub panel_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextureSample {
    pub row: u32,
    pub texture_id: String,
    pub position: String,
    pub material_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeSample {
    pub row: u32,
    pub edge_id: String,
    pub name: String,
    pub material_id: String,
}

/// First rows of each sheet for quick inspection.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Sample {
    pub materials: Vec<MaterialSample>,
    pub panels: Vec<PanelSample>,
    pub layers: Vec<LayerSample>,
    pub textures: Vec<TextureSample>,
    pub edges: Vec<EdgeSample>,
}

/// The persisted report shape.
///
/// Field spelling matches the JSON consumed by the operator UI: camelCase
/// at the top level, snake_case inside the duplicate groups and samples.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub materials: usize,
    pub textures: usize,
    pub panels: usize,
    pub layers: usize,
    pub edges: usize,
    pub duplicate_material_names: Vec<DuplicateMaterialName>,
    pub duplicate_material_ids: Vec<DuplicateMaterialId>,
    pub duplicate_panel_names: Vec<DuplicatePanelName>,
    pub duplicate_layer_names: Vec<DuplicateLayerName>,
    pub duplicate_textures: Vec<DuplicateTexture>,
    pub duplicate_edge_names: Vec<DuplicateEdgeName>,
    pub panels_per_material: BTreeMap<String, usize>,
    pub layers_per_panel: BTreeMap<String, usize>,
    pub textures_per_material: BTreeMap<String, TextureCounts>,
    pub edges_per_material: BTreeMap<String, usize>,
    pub sample: Sample,
}

impl Report {
    /// True when at least one duplicate finding exists in any sheet.
    pub fn has_duplicates(&self) -> bool {
        !self.duplicate_material_names.is_empty()
            || !self.duplicate_material_ids.is_empty()
            || !self.duplicate_panel_names.is_empty()
            || !self.duplicate_layer_names.is_empty()
            || !self.duplicate_textures.is_empty()
            || !self.duplicate_edge_names.is_empty()
    }
}

/// Compute the Materials duplicate groups (case-sensitive, trimmed exact
/// match on non-blank values).
fn materials_duplicates(
    materials: &[SheetRow<MaterialRow>],
) -> (Vec<DuplicateMaterialName>, Vec<DuplicateMaterialId>) {
    let mut name_buckets: BTreeMap<String, Vec<(u32, String)>> = BTreeMap::new();
    let mut id_buckets: BTreeMap<String, Vec<(u32, String)>> = BTreeMap::new();

    for m in materials {
        let name = m.data.material_name.trim();
        let id = m.data.material_id.trim();
        if !name.is_empty() {
            name_buckets
                .entry(name.to_string())
                .or_default()
                .push((m.row, id.to_string()));
        }
        if !id.is_empty() {
            id_buckets
                .entry(id.to_string())
                .or_default()
                .push((m.row, name.to_string()));
        }
    }

    let names = name_buckets
        .into_iter()
        .filter(|(_, hits)| hits.len() > 1)
        .map(|(name, hits)| DuplicateMaterialName {
            name: Some(name),
            rows: hits.iter().map(|(row, _)| *row).collect(),
            ids: Some(hits.into_iter().map(|(_, id)| id).collect()),
        })
        .collect();

    let ids = id_buckets
        .into_iter()
        .filter(|(_, hits)| hits.len() > 1)
        .map(|(id, hits)| DuplicateMaterialId {
            id,
            rows: hits.iter().map(|(row, _)| *row).collect(),
            names: hits.into_iter().map(|(_, name)| name).collect(),
        })
        .collect();

    (names, ids)
}

/// The import precondition: fail on any duplicate material name or id.
///
/// Blank values never count toward duplication; generated ids are UUIDs and
/// cannot collide, so callers run id assignment for Materials before this
/// check.
pub fn materials_gate(materials: &[SheetRow<MaterialRow>]) -> Result<(), IntegrityViolation> {
    let (duplicate_names, duplicate_ids) = materials_duplicates(materials);
    if duplicate_names.is_empty() && duplicate_ids.is_empty() {
        return Ok(());
    }
    Err(IntegrityViolation {
        duplicate_names,
        duplicate_ids,
    })
}

fn parent_key(raw: &str) -> String {
    if raw.is_empty() {
        MISSING_PARENT_KEY.to_string()
    } else {
        raw.to_string()
    }
}

fn optional_name(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Build the full diagnostic report for a workbook's row sets.
pub fn report(rows: &RowSets) -> Report {
    let mut out = Report {
        materials: rows.materials.len(),
        textures: rows.textures.len(),
        panels: rows.panels.len(),
        layers: rows.layers.len(),
        edges: rows.edges.len(),
        ..Default::default()
    };

    // Materials: missing names first, then the duplicate groups.
    for m in &rows.materials {
        if m.data.material_name.trim().is_empty() {
            out.duplicate_material_names.push(DuplicateMaterialName {
                name: None,
                rows: vec![m.row],
                ids: None,
            });
        }
    }
    let (duplicate_names, duplicate_ids) = materials_duplicates(&rows.materials);
    out.duplicate_material_names.extend(duplicate_names);
    out.duplicate_material_ids = duplicate_ids;

    // Panels per material, and panel names duplicated within one material.
    let mut panel_buckets: BTreeMap<(String, String), Vec<(u32, String)>> = BTreeMap::new();
    for p in &rows.panels {
        let mid = parent_key(&p.data.material_id);
        *out.panels_per_material.entry(mid.clone()).or_default() += 1;
        panel_buckets
            .entry((mid, p.data.panel_name.trim().to_string()))
            .or_default()
            .push((p.row, p.data.panel_id.clone()));
    }
    for ((material_id, panel_name), hits) in panel_buckets {
        if hits.len() > 1 {
            out.duplicate_panel_names.push(DuplicatePanelName {
                sheet: "Panels",
                material_id,
                panel_name: optional_name(&panel_name),
                rows: hits.iter().map(|(row, _)| *row).collect(),
                panel_ids: hits.into_iter().map(|(_, id)| id).collect(),
            });
        }
    }

    // Layers per panel, and layer names duplicated within one panel.
    let mut layer_buckets: BTreeMap<(String, String), Vec<(u32, String)>> = BTreeMap::new();
    for l in &rows.layers {
        let pid = parent_key(&l.data.panel_id);
        *out.layers_per_panel.entry(pid.clone()).or_default() += 1;
        layer_buckets
            .entry((pid, l.data.layer_name.trim().to_string()))
            .or_default()
            .push((l.row, l.data.layer_id.clone()));
    }
    for ((panel_id, layer_name), hits) in layer_buckets {
        if hits.len() > 1 {
            out.duplicate_layer_names.push(DuplicateLayerName {
                sheet: "Layers",
                panel_id,
                layer_name: optional_name(&layer_name),
                rows: hits.iter().map(|(row, _)| *row).collect(),
                layer_ids: hits.into_iter().map(|(_, id)| id).collect(),
            });
        }
    }

    // Texture slot counts, and positions occupied twice for one material.
    let mut texture_buckets: BTreeMap<(String, String), Vec<(u32, String)>> = BTreeMap::new();
    for t in &rows.textures {
        let mid = parent_key(&t.data.material_id);
        let counts = out.textures_per_material.entry(mid.clone()).or_default();
        let pos = t.data.position.to_lowercase();
        match pos.as_str() {
            "top" => counts.top += 1,
            "bottom" => counts.bottom += 1,
            _ => counts.other += 1,
        }
        let pos_key = if pos.is_empty() {
            MISSING_POSITION_KEY.to_string()
        } else {
            pos
        };
        texture_buckets
            .entry((mid, pos_key))
            .or_default()
            .push((t.row, t.data.texture_id.clone()));
    }
    for ((material_id, position), hits) in texture_buckets {
        if hits.len() > 1 {
            out.duplicate_textures.push(DuplicateTexture {
                sheet: "Textures",
                material_id,
                position,
                rows: hits.iter().map(|(row, _)| *row).collect(),
                texture_ids: hits.into_iter().map(|(_, id)| id).collect(),
            });
        }
    }

    // Edges per material, and edge names duplicated within one material.
    let mut edge_buckets: BTreeMap<(String, String), Vec<(u32, String)>> = BTreeMap::new();
    for e in &rows.edges {
        let mid = parent_key(&e.data.material_id);
        *out.edges_per_material.entry(mid.clone()).or_default() += 1;
        edge_buckets
            .entry((mid, e.data.name.trim().to_string()))
            .or_default()
            .push((e.row, e.data.edge_id.clone()));
    }
    for ((material_id, name), hits) in edge_buckets {
        if hits.len() > 1 {
            out.duplicate_edge_names.push(DuplicateEdgeName {
                sheet: "Edges",
                material_id,
                name: optional_name(&name),
                rows: hits.iter().map(|(row, _)| *row).collect(),
                edge_ids: hits.into_iter().map(|(_, id)| id).collect(),
            });
        }
    }

    out.sample = Sample {
        materials: rows
            .materials
            .iter()
            .take(SAMPLE_LIMIT)
            .map(|m| MaterialSample {
                row: m.row,
                material_id: m.data.material_id.clone(),
                material_name: m.data.material_name.clone(),
            })
            .collect(),
        panels: rows
            .panels
            .iter()
            .take(SAMPLE_LIMIT)
            .map(|p| PanelSample {
                row: p.row,
                panel_id: p.data.panel_id.clone(),
                panel_name: p.data.panel_name.clone(),
                material_id: p.data.material_id.clone(),
            })
            .collect(),
        layers: rows
            .layers
            .iter()
            .take(SAMPLE_LIMIT)
            .map(|l| LayerSample {
                row: l.row,
                layer_id: l.data.layer_id.clone(),
                layer_name: l.data.layer_name.clone(),
                panel_id: l.data.panel_id.clone(),
            })
            .collect(),
        textures: rows
            .textures
            .iter()
            .take(SAMPLE_LIMIT)
            .map(|t| TextureSample {
                row: t.row,
                texture_id: t.data.texture_id.clone(),
                position: t.data.position.clone(),
                material_id: t.data.material_id.clone(),
            })
            .collect(),
        edges: rows
            .edges
            .iter()
            .take(SAMPLE_LIMIT)
            .map(|e| EdgeSample {
                row: e.row,
                edge_id: e.data.edge_id.clone(),
                name: e.data.name.clone(),
                material_id: e.data.material_id.clone(),
            })
            .collect(),
    };

    out
}
