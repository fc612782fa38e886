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

//! CLI command implementations.

use matdb_convert::{
    default_report_path, generate_template_from_json, import_workbook, parse_to_json,
    report_workbook, write_report_json, ConvertError, ImportOptions, Report,
};
use std::path::Path;

/// Number of per-parent entries printed per section.
const PRINT_LIMIT: usize = 10;

pub fn parse(db: &Path, out: &Path) -> Result<(), ConvertError> {
    parse_to_json(db, out)?;
    println!("Parsed JSON written to {}", out.display());
    Ok(())
}

pub fn generate_template(json: &Path, out: &Path) -> Result<(), ConvertError> {
    generate_template_from_json(json, out)?;
    println!("Template generated: {}", out.display());
    Ok(())
}

pub fn import(
    xlsx: &Path,
    out: &Path,
    original: Option<&Path>,
    force: bool,
) -> Result<(), ConvertError> {
    let outcome = import_workbook(xlsx, out, original, &ImportOptions { force })?;
    if let Some(backup) = outcome.backup {
        println!("Original database backed up to {}", backup.display());
    }
    println!("Import finished: {}", out.display());
    Ok(())
}

pub fn report(xlsx: &Path, report_out: Option<&Path>) -> Result<(), ConvertError> {
    let report = report_workbook(xlsx)?;
    print_report(&report);

    let path = match report_out {
        Some(path) => path.to_path_buf(),
        None => default_report_path(Path::new("reports")),
    };
    write_report_json(&report, &path)?;
    println!();
    println!("Report saved to {}", path.display());
    Ok(())
}

fn print_report(report: &Report) {
    println!("--- Workbook report ---");
    println!("Materials: {}", report.materials);
    println!("Panels: {}", report.panels);
    println!("Layers: {}", report.layers);
    println!("Textures: {}", report.textures);
    println!("Edges: {}", report.edges);

    print_duplicates(
        "Duplicate material names",
        &report.duplicate_material_names,
    );
    print_duplicates("Duplicate material ids", &report.duplicate_material_ids);
    print_duplicates(
        "Duplicate panel names (per material)",
        &report.duplicate_panel_names,
    );
    print_duplicates(
        "Duplicate layer names (per panel)",
        &report.duplicate_layer_names,
    );
    print_duplicates(
        "Duplicate textures (material+position)",
        &report.duplicate_textures,
    );
    print_duplicates(
        "Duplicate edge names (per material)",
        &report.duplicate_edge_names,
    );

    println!();
    println!("Panels per material (sample up to {}):", PRINT_LIMIT);
    for (key, count) in report.panels_per_material.iter().take(PRINT_LIMIT) {
        println!("  {}: {}", key, count);
    }
    println!();
    println!("Layers per panel (sample up to {}):", PRINT_LIMIT);
    for (key, count) in report.layers_per_panel.iter().take(PRINT_LIMIT) {
        println!("  {}: {}", key, count);
    }
    println!();
    println!("Textures per material (sample up to {}):", PRINT_LIMIT);
    for (key, counts) in report.textures_per_material.iter().take(PRINT_LIMIT) {
        println!(
            "  {}: top={}, bottom={}, other={}",
            key, counts.top, counts.bottom, counts.other
        );
    }
    println!();
    println!("Edges per material (sample up to {}):", PRINT_LIMIT);
    for (key, count) in report.edges_per_material.iter().take(PRINT_LIMIT) {
        println!("  {}: {}", key, count);
    }
}

fn print_duplicates<T: serde::Serialize>(label: &str, groups: &[T]) {
    if groups.is_empty() {
        return;
    }
    let rendered =
        serde_json::to_string_pretty(groups).unwrap_or_else(|e| format!("<unprintable: {}>", e));
    println!("{}: {}", label, rendered);
}
