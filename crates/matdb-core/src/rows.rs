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

//! Typed sheet rows.
//!
//! One struct per sheet, fields in the column order of [`crate::schema`].
//! All cell values transport as strings; a blank cell is an empty string.
//! Value+unit fields travel as a [`Measure`] pair that maps to the
//! `<field>` / `<field>_unit` column pair.
//!
//! Each row type converts both ways at the workbook boundary:
//! `from_fields` builds a row from a header-name lookup (tolerant of
//! reordered columns), and `cells` emits the row in schema column order.

/// A value+unit pair. Either member may be blank, but the pair always
/// travels together.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Measure {
    pub value: String,
    pub unit: String,
}

impl Measure {
    pub fn new(value: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            unit: unit.into(),
        }
    }

    /// True when the value member is blank (the unit alone does not make a
    /// measure worth serializing).
    pub fn is_blank(&self) -> bool {
        self.value.is_empty()
    }
}

/// A sheet row paired with its 1-based spreadsheet row number.
///
/// The row number is a diagnostic side-channel for the validator's
/// messages; it is never persisted to XML.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetRow<T> {
    pub row: u32,
    pub data: T,
}

impl<T> SheetRow<T> {
    pub fn new(row: u32, data: T) -> Self {
        Self { row, data }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialRow {
    pub material_id: String,
    pub material_name: String,
    pub favorite: String,
    pub kind: String,
    pub rotatable: String,
    pub path: String,
    pub reflect: String,
    pub rainbown: String,
    pub specular: String,
    pub shininess: String,
    pub glossiness: String,
    pub opacity_min: String,
    pub opacity_max: String,
}

impl MaterialRow {
    pub fn from_fields<F: Fn(&str) -> String>(field: F) -> Self {
        Self {
            material_id: field("material_id"),
            material_name: field("material_name"),
            favorite: field("favorite"),
            kind: field("type"),
            rotatable: field("rotatable"),
            path: field("path"),
            reflect: field("reflect"),
            rainbown: field("rainbown"),
            specular: field("specular"),
            shininess: field("shininess"),
            glossiness: field("glossiness"),
            opacity_min: field("opacity_min"),
            opacity_max: field("opacity_max"),
        }
    }

    pub fn cells(&self) -> Vec<String> {
        vec![
            self.material_id.clone(),
            self.material_name.clone(),
            self.favorite.clone(),
            self.kind.clone(),
            self.rotatable.clone(),
            self.path.clone(),
            self.reflect.clone(),
            self.rainbown.clone(),
            self.specular.clone(),
            self.shininess.clone(),
            self.glossiness.clone(),
            self.opacity_min.clone(),
            self.opacity_max.clone(),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextureRow {
    pub texture_id: String,
    pub material_id: String,
    pub material_name: String,
    pub position: String,
    pub image: String,
    pub angle: String,
    pub fit_vertically: String,
    pub mirror: String,
}

impl TextureRow {
    pub fn from_fields<F: Fn(&str) -> String>(field: F) -> Self {
        Self {
            texture_id: field("texture_id"),
            material_id: field("material_id"),
            material_name: field("material_name"),
            position: field("position"),
            image: field("image"),
            angle: field("angle"),
            fit_vertically: field("fit_vertically"),
            mirror: field("mirror"),
        }
    }

    pub fn cells(&self) -> Vec<String> {
        vec![
            self.texture_id.clone(),
            self.material_id.clone(),
            self.material_name.clone(),
            self.position.clone(),
            self.image.clone(),
            self.angle.clone(),
            self.fit_vertically.clone(),
            self.mirror.clone(),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelRow {
    pub panel_id: String,
    pub material_id: String,
    pub material_name: String,
    pub panel_name: String,
    pub article: String,
    pub supplier: String,
    pub thickness: Measure,
    pub solid_base_id: String,
    pub solid_base_name: String,
}

impl PanelRow {
    pub fn from_fields<F: Fn(&str) -> String>(field: F) -> Self {
        Self {
            panel_id: field("panel_id"),
            material_id: field("material_id"),
            material_name: field("material_name"),
            panel_name: field("panel_name"),
            article: field("article"),
            supplier: field("supplier"),
            thickness: Measure::new(field("thickness"), field("thickness_unit")),
            solid_base_id: field("solid_base_id"),
            solid_base_name: field("solid_base_name"),
        }
    }

    pub fn cells(&self) -> Vec<String> {
        vec![
            self.panel_id.clone(),
            self.material_id.clone(),
            self.material_name.clone(),
            self.panel_name.clone(),
            self.article.clone(),
            self.supplier.clone(),
            self.thickness.value.clone(),
            self.thickness.unit.clone(),
            self.solid_base_id.clone(),
            self.solid_base_name.clone(),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerRow {
    pub layer_id: String,
    pub panel_id: String,
    pub panel_name: String,
    pub layer_name: String,
    pub thickness: Measure,
    pub kind: String,
    pub supplier: String,
    pub length: Measure,
    pub width: Measure,
    pub price: Measure,
    pub unprocessed_offset: Measure,
    pub outsize: Measure,
}

impl LayerRow {
    pub fn from_fields<F: Fn(&str) -> String>(field: F) -> Self {
        Self {
            layer_id: field("layer_id"),
            panel_id: field("panel_id"),
            panel_name: field("panel_name"),
            layer_name: field("layer_name"),
            thickness: Measure::new(field("thickness"), field("thickness_unit")),
            kind: field("type"),
            supplier: field("supplier"),
            length: Measure::new(field("length"), field("length_unit")),
            width: Measure::new(field("width"), field("width_unit")),
            price: Measure::new(field("price"), field("price_unit")),
            unprocessed_offset: Measure::new(
                field("unprocessed_offset"),
                field("unprocessed_offset_unit"),
            ),
            outsize: Measure::new(field("outsize"), field("outsize_unit")),
        }
    }

    pub fn cells(&self) -> Vec<String> {
        vec![
            self.layer_id.clone(),
            self.panel_id.clone(),
            self.panel_name.clone(),
            self.layer_name.clone(),
            self.thickness.value.clone(),
            self.thickness.unit.clone(),
            self.kind.clone(),
            self.supplier.clone(),
            self.length.value.clone(),
            self.length.unit.clone(),
            self.width.value.clone(),
            self.width.unit.clone(),
            self.price.value.clone(),
            self.price.unit.clone(),
            self.unprocessed_offset.value.clone(),
            self.unprocessed_offset.unit.clone(),
            self.outsize.value.clone(),
            self.outsize.unit.clone(),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeRow {
    pub edge_id: String,
    pub material_id: String,
    pub material_name: String,
    pub name: String,
    pub article: String,
    pub supplier: String,
    pub factory_width: String,
    pub angle: String,
    pub thickness: Measure,
    pub price: Measure,
    pub width_min: Measure,
    pub width_max: Measure,
}

impl EdgeRow {
    pub fn from_fields<F: Fn(&str) -> String>(field: F) -> Self {
        Self {
            edge_id: field("edge_id"),
            material_id: field("material_id"),
            material_name: field("material_name"),
            name: field("name"),
            article: field("article"),
            supplier: field("supplier"),
            factory_width: field("factory_width"),
            angle: field("angle"),
            thickness: Measure::new(field("thickness"), field("thickness_unit")),
            price: Measure::new(field("price"), field("price_unit")),
            width_min: Measure::new(field("width_min"), field("width_min_unit")),
            width_max: Measure::new(field("width_max"), field("width_max_unit")),
        }
    }

    pub fn cells(&self) -> Vec<String> {
        vec![
            self.edge_id.clone(),
            self.material_id.clone(),
            self.material_name.clone(),
            self.name.clone(),
            self.article.clone(),
            self.supplier.clone(),
            self.factory_width.clone(),
            self.angle.clone(),
            self.thickness.value.clone(),
            self.thickness.unit.clone(),
            self.price.value.clone(),
            self.price.unit.clone(),
            self.width_min.value.clone(),
            self.width_min.unit.clone(),
            self.width_max.value.clone(),
            self.width_max.unit.clone(),
        ]
    }
}

/// The five related row sets a workbook carries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSets {
    pub materials: Vec<SheetRow<MaterialRow>>,
    pub textures: Vec<SheetRow<TextureRow>>,
    pub panels: Vec<SheetRow<PanelRow>>,
    pub layers: Vec<SheetRow<LayerRow>>,
    pub edges: Vec<SheetRow<EdgeRow>>,
}

impl RowSets {
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
            && self.textures.is_empty()
            && self.panels.is_empty()
            && self.layers.is_empty()
            && self.edges.is_empty()
    }
}
