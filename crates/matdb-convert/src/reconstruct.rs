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

//! Reconstruction engine: row sets back to an attributed tree.
//!
//! The inverse of flattening. Blank ids are filled in place with fresh
//! UUIDs before anything else, the Materials duplicate gate runs before any
//! assembly, children re-nest under their parents by foreign key, and every
//! repeatable boundary collapses through [`collapse_group`] so the codec's
//! single-vs-list shape convention holds on output exactly as on input.
//!
//! Rows whose foreign key resolves to no parent are left out of the tree;
//! there is nothing to attach them to. The reporter, not this engine, makes
//! them visible.

use crate::error::ConvertError;
use crate::report::materials_gate;
use matdb_core::{
    attr_key, collapse_group, EdgeRow, LayerRow, MaterialRow, Measure, PanelRow, RowSets,
    TextureRow, TreeValue, TEXT_KEY,
};
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

/// Options for a reconstruction run.
#[derive(Debug, Clone, Default)]
pub struct ReconstructOptions {
    /// Skip the Materials duplicate gate. Set only by an explicit operator
    /// override; the resulting document may carry duplicate identifiers.
    pub skip_gate: bool,
}

/// Rebuild the materials tree from (possibly edited) row sets.
///
/// Id assignment mutates the row sets in place, so a row keeps its
/// generated id for the remainder of the run and re-running reconstruction
/// on its own output never regenerates an id.
pub fn reconstruct(
    rows: &mut RowSets,
    options: &ReconstructOptions,
) -> Result<TreeValue, ConvertError> {
    // Materials ids first: generated UUIDs cannot collide, so the gate
    // below only ever trips on operator-entered values.
    for m in &mut rows.materials {
        ensure_id(&mut m.data.material_id);
    }

    if !options.skip_gate {
        materials_gate(&rows.materials)?;
    }

    for p in &mut rows.panels {
        ensure_id(&mut p.data.panel_id);
    }
    for l in &mut rows.layers {
        ensure_id(&mut l.data.layer_id);
    }
    for t in &mut rows.textures {
        ensure_id(&mut t.data.texture_id);
    }
    for e in &mut rows.edges {
        ensure_id(&mut e.data.edge_id);
    }

    let mut panels_by_material: HashMap<&str, Vec<&PanelRow>> = HashMap::new();
    for p in &rows.panels {
        panels_by_material
            .entry(p.data.material_id.as_str())
            .or_default()
            .push(&p.data);
    }

    let mut layers_by_panel: HashMap<&str, Vec<&LayerRow>> = HashMap::new();
    for l in &rows.layers {
        layers_by_panel
            .entry(l.data.panel_id.as_str())
            .or_default()
            .push(&l.data);
    }

    // Texture slots: keyed by material and lowercased position; a repeated
    // position keeps the last row, matching the slot model (one top, one
    // bottom).
    let mut textures_by_material: HashMap<&str, HashMap<String, &TextureRow>> = HashMap::new();
    for t in &rows.textures {
        let position = t.data.position.to_lowercase();
        if position.is_empty() {
            continue;
        }
        textures_by_material
            .entry(t.data.material_id.as_str())
            .or_default()
            .insert(position, &t.data);
    }

    let mut edges_by_material: HashMap<&str, Vec<&EdgeRow>> = HashMap::new();
    for e in &rows.edges {
        edges_by_material
            .entry(e.data.material_id.as_str())
            .or_default()
            .push(&e.data);
    }

    let material_values: Vec<TreeValue> = rows
        .materials
        .iter()
        .map(|m| {
            let mid = m.data.material_id.as_str();
            build_material(
                &m.data,
                panels_by_material.get(mid).map(Vec::as_slice).unwrap_or(&[]),
                &layers_by_panel,
                textures_by_material.get(mid),
                edges_by_material.get(mid).map(Vec::as_slice).unwrap_or(&[]),
            )
        })
        .collect();

    let mut materials_node = BTreeMap::new();
    materials_node.insert(attr_key("version"), TreeValue::from("1.0"));
    if let Some(collapsed) = collapse_group(material_values) {
        materials_node.insert("material".to_string(), collapsed);
    }

    let mut root = BTreeMap::new();
    root.insert("materials".to_string(), TreeValue::Node(materials_node));
    Ok(TreeValue::Node(root))
}

fn ensure_id(id: &mut String) {
    if id.trim().is_empty() {
        *id = Uuid::new_v4().to_string();
    }
}

fn build_material(
    m: &MaterialRow,
    panels: &[&PanelRow],
    layers_by_panel: &HashMap<&str, Vec<&LayerRow>>,
    textures: Option<&HashMap<String, &TextureRow>>,
    edges: &[&EdgeRow],
) -> TreeValue {
    let mut visual = BTreeMap::new();
    visual.insert("reflect".to_string(), TreeValue::from(m.reflect.clone()));
    visual.insert("rainbown".to_string(), TreeValue::from(m.rainbown.clone()));
    visual.insert("specular".to_string(), TreeValue::from(m.specular.clone()));
    visual.insert(
        "shininess".to_string(),
        TreeValue::from(m.shininess.clone()),
    );
    visual.insert(
        "glossiness".to_string(),
        TreeValue::from(m.glossiness.clone()),
    );
    visual.insert(
        "opacity_min".to_string(),
        TreeValue::from(m.opacity_min.clone()),
    );
    visual.insert(
        "opacity_max".to_string(),
        TreeValue::from(m.opacity_max.clone()),
    );

    let mut details = BTreeMap::new();
    details.insert("favorite".to_string(), TreeValue::from(m.favorite.clone()));
    details.insert(
        "name".to_string(),
        TreeValue::from(m.material_name.clone()),
    );
    details.insert("type".to_string(), TreeValue::from(m.kind.clone()));
    details.insert(
        "rotatable".to_string(),
        TreeValue::from(m.rotatable.clone()),
    );
    details.insert("path".to_string(), TreeValue::from(m.path.clone()));
    details.insert("visual_effect".to_string(), TreeValue::Node(visual));

    let mut textures_node = BTreeMap::new();
    if let Some(slots) = textures {
        for position in ["top", "bottom"] {
            if let Some(t) = slots.get(position) {
                textures_node.insert(position.to_string(), build_texture(t));
            }
        }
    }

    let panel_values: Vec<TreeValue> = panels
        .iter()
        .map(|p| build_panel(p, layers_by_panel))
        .collect();
    let mut panels_node = BTreeMap::new();
    if let Some(collapsed) = collapse_group(panel_values) {
        panels_node.insert("panel".to_string(), collapsed);
    }

    let mut material = BTreeMap::new();
    material.insert(attr_key("id"), TreeValue::from(m.material_id.clone()));
    material.insert("details".to_string(), TreeValue::Node(details));
    material.insert("textures".to_string(), TreeValue::Node(textures_node));
    material.insert("panels".to_string(), TreeValue::Node(panels_node));

    // Zero edges serialize as no node at all, not as an empty collection.
    let edge_values: Vec<TreeValue> = edges.iter().map(|e| build_edge(e)).collect();
    if let Some(collapsed) = collapse_group(edge_values) {
        let mut edges_node = BTreeMap::new();
        edges_node.insert("edge".to_string(), collapsed);
        material.insert("edges".to_string(), TreeValue::Node(edges_node));
    }

    TreeValue::Node(material)
}

fn build_texture(t: &TextureRow) -> TreeValue {
    let mut slot = BTreeMap::new();
    slot.insert("image".to_string(), TreeValue::from(t.image.clone()));
    slot.insert("angle".to_string(), TreeValue::from(t.angle.clone()));
    slot.insert(
        "fit_vertically".to_string(),
        TreeValue::from(t.fit_vertically.clone()),
    );
    if !t.mirror.is_empty() {
        slot.insert("mirror".to_string(), TreeValue::from(t.mirror.clone()));
    }
    TreeValue::Node(slot)
}

fn build_panel(p: &PanelRow, layers_by_panel: &HashMap<&str, Vec<&LayerRow>>) -> TreeValue {
    let layer_values: Vec<TreeValue> = layers_by_panel
        .get(p.panel_id.as_str())
        .map(Vec::as_slice)
        .unwrap_or(&[])
        .iter()
        .map(|l| build_layer(l))
        .collect();
    let mut layers_node = BTreeMap::new();
    if let Some(collapsed) = collapse_group(layer_values) {
        layers_node.insert("layer".to_string(), collapsed);
    }

    let mut solid_base = BTreeMap::new();
    solid_base.insert(attr_key("id"), TreeValue::from(p.solid_base_id.clone()));
    if !p.solid_base_name.is_empty() {
        solid_base.insert(
            TEXT_KEY.to_string(),
            TreeValue::from(p.solid_base_name.clone()),
        );
    }

    let mut panel = BTreeMap::new();
    panel.insert(attr_key("id"), TreeValue::from(p.panel_id.clone()));
    panel.insert("name".to_string(), TreeValue::from(p.panel_name.clone()));
    panel.insert("article".to_string(), TreeValue::from(p.article.clone()));
    panel.insert("supplier".to_string(), TreeValue::from(p.supplier.clone()));
    panel.insert("thickness".to_string(), measure_node(&p.thickness));
    panel.insert("solid_base".to_string(), TreeValue::Node(solid_base));
    panel.insert("layers".to_string(), TreeValue::Node(layers_node));
    TreeValue::Node(panel)
}

fn build_layer(l: &LayerRow) -> TreeValue {
    let mut layer = BTreeMap::new();
    layer.insert(attr_key("id"), TreeValue::from(l.layer_id.clone()));
    if !l.layer_name.is_empty() {
        layer.insert("name".to_string(), TreeValue::from(l.layer_name.clone()));
    }
    if !l.kind.is_empty() {
        layer.insert("type".to_string(), TreeValue::from(l.kind.clone()));
    }
    if !l.supplier.is_empty() {
        layer.insert("supplier".to_string(), TreeValue::from(l.supplier.clone()));
    }
    insert_measure_if_present(&mut layer, "thickness", &l.thickness);
    insert_measure_if_present(&mut layer, "length", &l.length);
    insert_measure_if_present(&mut layer, "width", &l.width);
    insert_measure_if_present(&mut layer, "price", &l.price);
    insert_measure_if_present(&mut layer, "unprocessed_offset", &l.unprocessed_offset);
    insert_measure_if_present(&mut layer, "outsize", &l.outsize);
    TreeValue::Node(layer)
}

fn build_edge(e: &EdgeRow) -> TreeValue {
    let mut edge = BTreeMap::new();
    edge.insert(attr_key("id"), TreeValue::from(e.edge_id.clone()));
    edge.insert("name".to_string(), TreeValue::from(e.name.clone()));
    edge.insert("article".to_string(), TreeValue::from(e.article.clone()));
    edge.insert("supplier".to_string(), TreeValue::from(e.supplier.clone()));
    edge.insert("thickness".to_string(), measure_node(&e.thickness));
    edge.insert(
        "factory_width".to_string(),
        TreeValue::from(e.factory_width.clone()),
    );
    insert_measure_if_present(&mut edge, "price", &e.price);
    edge.insert("width_min".to_string(), measure_node(&e.width_min));
    edge.insert("width_max".to_string(), measure_node(&e.width_max));
    if !e.angle.is_empty() {
        let mut visual = BTreeMap::new();
        visual.insert("angle".to_string(), TreeValue::from(e.angle.clone()));
        edge.insert("visual_effect".to_string(), TreeValue::Node(visual));
    }
    TreeValue::Node(edge)
}

/// A value+unit pair as a `{#text, @unit}` node. The unit attribute is
/// always written so the column pair survives the next flatten intact.
fn measure_node(measure: &Measure) -> TreeValue {
    let mut node = BTreeMap::new();
    if !measure.value.is_empty() {
        node.insert(TEXT_KEY.to_string(), TreeValue::from(measure.value.clone()));
    }
    node.insert(attr_key("unit"), TreeValue::from(measure.unit.clone()));
    TreeValue::Node(node)
}

fn insert_measure_if_present(
    map: &mut BTreeMap<String, TreeValue>,
    key: &str,
    measure: &Measure,
) {
    if !measure.is_blank() {
        map.insert(key.to_string(), measure_node(measure));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use matdb_core::{group_members, MaterialRow, SheetRow};

    fn material(row: u32, id: &str, name: &str) -> SheetRow<MaterialRow> {
        SheetRow::new(
            row,
            MaterialRow {
                material_id: id.to_string(),
                material_name: name.to_string(),
                ..Default::default()
            },
        )
    }

    fn panel(row: u32, id: &str, material_id: &str, name: &str) -> SheetRow<PanelRow> {
        SheetRow::new(
            row,
            PanelRow {
                panel_id: id.to_string(),
                material_id: material_id.to_string(),
                panel_name: name.to_string(),
                ..Default::default()
            },
        )
    }

    fn layer(row: u32, id: &str, panel_id: &str, name: &str) -> SheetRow<LayerRow> {
        SheetRow::new(
            row,
            LayerRow {
                layer_id: id.to_string(),
                panel_id: panel_id.to_string(),
                layer_name: name.to_string(),
                ..Default::default()
            },
        )
    }

    fn first_material(tree: &TreeValue) -> &TreeValue {
        let materials = tree.get("materials").unwrap();
        group_members(materials.get("material"))[0]
    }

    #[test]
    fn rebuilds_nesting_and_preserves_layer_order() {
        let mut rows = RowSets {
            materials: vec![material(2, "M1", "Oak")],
            panels: vec![panel(2, "P1", "M1", "Standard")],
            layers: vec![layer(2, "L1", "P1", "core"), layer(3, "L2", "P1", "veneer")],
            ..Default::default()
        };

        let tree = reconstruct(&mut rows, &ReconstructOptions::default()).unwrap();
        let m = first_material(&tree);
        assert_eq!(m.attr_text("id"), "M1");
        assert_eq!(m.get("details").unwrap().get("name").unwrap().text(), "Oak");

        let p = group_members(m.get("panels").unwrap().get("panel"));
        assert_eq!(p.len(), 1);
        assert_eq!(p[0].attr_text("id"), "P1");

        let layers = group_members(p[0].get("layers").unwrap().get("layer"));
        assert_eq!(layers.len(), 2);
        assert_eq!(layers[0].attr_text("id"), "L1");
        assert_eq!(layers[0].get("name").unwrap().text(), "core");
        assert_eq!(layers[1].get("name").unwrap().text(), "veneer");
    }

    #[test]
    fn blank_ids_are_generated_once_and_stick() {
        let mut rows = RowSets {
            materials: vec![material(2, "", "Oak")],
            ..Default::default()
        };

        reconstruct(&mut rows, &ReconstructOptions::default()).unwrap();
        let generated = rows.materials[0].data.material_id.clone();
        assert!(!generated.trim().is_empty());

        // A second run over the same (mutated) rows keeps the id.
        reconstruct(&mut rows, &ReconstructOptions::default()).unwrap();
        assert_eq!(rows.materials[0].data.material_id, generated);
    }

    #[test]
    fn duplicate_names_trip_the_gate_unless_skipped() {
        let mut rows = RowSets {
            materials: vec![material(2, "M1", "Oak"), material(3, "M2", "Oak")],
            ..Default::default()
        };

        let err = reconstruct(&mut rows, &ReconstructOptions::default()).unwrap_err();
        match err {
            ConvertError::Integrity(violation) => {
                assert_eq!(violation.duplicate_names[0].name.as_deref(), Some("Oak"));
                assert_eq!(violation.duplicate_names[0].rows, vec![2, 3]);
            }
            other => panic!("expected integrity violation, got {other}"),
        }

        let tree = reconstruct(&mut rows, &ReconstructOptions { skip_gate: true }).unwrap();
        let materials = tree.get("materials").unwrap();
        assert_eq!(group_members(materials.get("material")).len(), 2);
    }

    #[test]
    fn orphan_panel_attaches_nowhere_and_does_not_crash() {
        let mut rows = RowSets {
            materials: vec![material(2, "M1", "Oak")],
            panels: vec![panel(2, "P1", "NO_SUCH", "loose")],
            ..Default::default()
        };

        let tree = reconstruct(&mut rows, &ReconstructOptions::default()).unwrap();
        let m = first_material(&tree);
        let panels_node = m.get("panels").unwrap();
        assert!(panels_node.get("panel").is_none());
    }

    #[test]
    fn zero_edges_means_no_edges_node_one_edge_stays_bare() {
        let mut rows = RowSets {
            materials: vec![material(2, "M1", "Oak")],
            ..Default::default()
        };
        let tree = reconstruct(&mut rows, &ReconstructOptions::default()).unwrap();
        assert!(first_material(&tree).get("edges").is_none());

        let mut rows = RowSets {
            materials: vec![material(2, "M1", "Oak")],
            edges: vec![SheetRow::new(
                2,
                EdgeRow {
                    edge_id: "E1".to_string(),
                    material_id: "M1".to_string(),
                    name: "oak edge".to_string(),
                    ..Default::default()
                },
            )],
            ..Default::default()
        };
        let tree = reconstruct(&mut rows, &ReconstructOptions::default()).unwrap();
        let edges_node = first_material(&tree).get("edges").unwrap();
        let edge = edges_node.get("edge").unwrap();
        assert!(matches!(edge, TreeValue::Node(_)));
        assert_eq!(edge.attr_text("id"), "E1");
    }

    #[test]
    fn blank_mirror_is_omitted_from_the_texture() {
        let mut rows = RowSets {
            materials: vec![material(2, "M1", "Oak")],
            textures: vec![SheetRow::new(
                2,
                TextureRow {
                    material_id: "M1".to_string(),
                    position: "top".to_string(),
                    image: "oak.png".to_string(),
                    ..Default::default()
                },
            )],
            ..Default::default()
        };

        let tree = reconstruct(&mut rows, &ReconstructOptions::default()).unwrap();
        let top = first_material(&tree)
            .get("textures")
            .unwrap()
            .get("top")
            .unwrap();
        assert_eq!(top.get("image").unwrap().text(), "oak.png");
        assert!(top.get("mirror").is_none());
    }

    #[test]
    fn texture_position_is_matched_case_insensitively() {
        let mut rows = RowSets {
            materials: vec![material(2, "M1", "Oak")],
            textures: vec![SheetRow::new(
                2,
                TextureRow {
                    material_id: "M1".to_string(),
                    position: "TOP".to_string(),
                    image: "oak.png".to_string(),
                    ..Default::default()
                },
            )],
            ..Default::default()
        };

        let tree = reconstruct(&mut rows, &ReconstructOptions::default()).unwrap();
        let textures = first_material(&tree).get("textures").unwrap();
        assert!(textures.get("top").is_some());
    }

    #[test]
    fn root_carries_the_database_version() {
        let mut rows = RowSets::default();
        let tree = reconstruct(&mut rows, &ReconstructOptions::default()).unwrap();
        let materials = tree.get("materials").unwrap();
        assert_eq!(materials.attr_text("version"), "1.0");
        assert!(materials.get("material").is_none());
    }
}
