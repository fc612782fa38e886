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

//! High-level operations: the parse / generate-template / import / report
//! flows the CLI and the HTTP service both call.
//!
//! Each operation runs to completion and either succeeds as a whole or
//! fails without partial output. The import flow backs up the original
//! database (when one is supplied) before the destructive write, and a
//! backup failure aborts the import.

use crate::error::ConvertError;
use crate::flatten::flatten;
use crate::reconstruct::{reconstruct, ReconstructOptions};
use crate::report::{report, Report};
use chrono::Utc;
use matdb_core::TreeValue;
use matdb_xlsx::{read_template, write_template};
use matdb_xml::{from_xml_file, to_xml_file, ToXmlConfig};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// Options for an import run.
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Proceed past the duplicate-materials gate.
    pub force: bool,
}

/// What an import produced besides the output document.
#[derive(Debug, Clone, Default)]
pub struct ImportOutcome {
    /// Path of the timestamped backup, when an original was supplied.
    pub backup: Option<PathBuf>,
}

/// Parse a database document and dump the tree as pretty JSON.
pub fn parse_to_json(db_path: &Path, out_json: &Path) -> Result<(), ConvertError> {
    let tree = from_xml_file(db_path)?;
    write_tree_json(&tree, out_json)
}

/// Load a tree previously dumped by [`parse_to_json`].
pub fn load_tree_json(path: &Path) -> Result<TreeValue, ConvertError> {
    let raw = fs::read_to_string(path).map_err(|source| ConvertError::Io {
        action: "read",
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|e| ConvertError::Json {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

fn write_tree_json(tree: &TreeValue, path: &Path) -> Result<(), ConvertError> {
    let json = serde_json::to_string_pretty(tree).map_err(|e| ConvertError::Json {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    fs::write(path, json).map_err(|source| ConvertError::Io {
        action: "write",
        path: path.to_path_buf(),
        source,
    })
}

/// Generate the editable template workbook from a JSON tree dump.
pub fn generate_template_from_json(json_path: &Path, xlsx_path: &Path) -> Result<(), ConvertError> {
    let tree = load_tree_json(json_path)?;
    let rows = flatten(&tree)?;
    write_template(xlsx_path, &rows)?;
    Ok(())
}

/// Generate the editable template workbook straight from a database file.
pub fn generate_template_from_db(db_path: &Path, xlsx_path: &Path) -> Result<(), ConvertError> {
    let tree = from_xml_file(db_path)?;
    let rows = flatten(&tree)?;
    write_template(xlsx_path, &rows)?;
    Ok(())
}

/// Import an edited workbook and write the reconstructed database.
///
/// Runs the duplicate-materials gate (unless forced), backs up
/// `original_db` when it exists, then writes `out_db` as one complete
/// file. Nothing is written when any step fails.
pub fn import_workbook(
    xlsx_path: &Path,
    out_db: &Path,
    original_db: Option<&Path>,
    options: &ImportOptions,
) -> Result<ImportOutcome, ConvertError> {
    let mut rows = read_template(xlsx_path)?;
    let tree = reconstruct(
        &mut rows,
        &ReconstructOptions {
            skip_gate: options.force,
        },
    )?;

    let backup = match original_db {
        Some(original) if original.exists() => Some(backup_original(original)?),
        _ => None,
    };

    to_xml_file(&tree, out_db, &ToXmlConfig::default())?;
    Ok(ImportOutcome { backup })
}

/// Copy the original database aside as `<path>.bak.<unix-millis>`.
pub fn backup_original(path: &Path) -> Result<PathBuf, ConvertError> {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(format!(".bak.{}", Utc::now().timestamp_millis()));
    let backup = PathBuf::from(name);

    fs::copy(path, &backup).map_err(|source| ConvertError::Io {
        action: "back up",
        path: path.to_path_buf(),
        source,
    })?;
    Ok(backup)
}

/// Run the validator over a workbook without touching anything.
pub fn report_workbook(xlsx_path: &Path) -> Result<Report, ConvertError> {
    let rows = read_template(xlsx_path)?;
    Ok(report(&rows))
}

/// Persist a report as pretty JSON.
pub fn write_report_json(report: &Report, path: &Path) -> Result<(), ConvertError> {
    let json = serde_json::to_string_pretty(report).map_err(|e| ConvertError::Json {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(|source| ConvertError::Io {
                action: "create report directory",
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    fs::write(path, json).map_err(|source| ConvertError::Io {
        action: "write",
        path: path.to_path_buf(),
        source,
    })
}

/// Default timestamped report path under a reports directory.
pub fn default_report_path(dir: &Path) -> PathBuf {
    dir.join(format!("report-{}.json", Utc::now().timestamp_millis()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const DB: &str = r#"<materials version="1.0">
        <material id="M1">
          <details><name>Oak</name></details>
          <panels>
            <panel id="P1">
              <name>Standard</name>
              <thickness unit="mm">18</thickness>
              <layers><layer id="L1"><name>core</name></layer></layers>
            </panel>
          </panels>
        </material>
      </materials>"#;

    #[test]
    fn parse_then_template_then_import_round_trips_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("materials.db");
        let json = dir.path().join("materials.json");
        let xlsx = dir.path().join("template.xlsx");
        let out = dir.path().join("materials_new.db");
        fs::write(&db, DB).unwrap();

        parse_to_json(&db, &json).unwrap();
        generate_template_from_json(&json, &xlsx).unwrap();
        let outcome =
            import_workbook(&xlsx, &out, None, &ImportOptions::default()).unwrap();
        assert!(outcome.backup.is_none());

        let tree = from_xml_file(&out).unwrap();
        let materials = tree.get("materials").unwrap();
        let material = materials.get("material").unwrap();
        assert_eq!(material.attr_text("id"), "M1");
        assert_eq!(
            material.get("details").unwrap().get("name").unwrap().text(),
            "Oak"
        );
    }

    #[test]
    fn import_backs_up_the_original_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("materials.db");
        let xlsx = dir.path().join("template.xlsx");
        let out = dir.path().join("materials_new.db");
        fs::write(&db, DB).unwrap();

        generate_template_from_db(&db, &xlsx).unwrap();
        let outcome =
            import_workbook(&xlsx, &out, Some(&db), &ImportOptions::default()).unwrap();

        let backup = outcome.backup.unwrap();
        assert!(backup.exists());
        assert!(backup
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("materials.db.bak."));
        assert_eq!(fs::read_to_string(&backup).unwrap(), DB);
        assert!(out.exists());
    }

    #[test]
    fn missing_original_is_not_backed_up() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("materials.db");
        let xlsx = dir.path().join("template.xlsx");
        let out = dir.path().join("materials_new.db");
        fs::write(&db, DB).unwrap();

        generate_template_from_db(&db, &xlsx).unwrap();
        let gone = dir.path().join("never_existed.db");
        let outcome =
            import_workbook(&xlsx, &out, Some(&gone), &ImportOptions::default()).unwrap();
        assert!(outcome.backup.is_none());
    }

    #[test]
    fn report_workbook_reads_counts_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("materials.db");
        let xlsx = dir.path().join("template.xlsx");
        fs::write(&db, DB).unwrap();

        generate_template_from_db(&db, &xlsx).unwrap();
        let report = report_workbook(&xlsx).unwrap();
        assert_eq!(report.materials, 1);
        assert_eq!(report.panels, 1);
        assert_eq!(report.layers, 1);
        assert!(!report.has_duplicates());
    }

    #[test]
    fn write_report_json_creates_the_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("report-1.json");
        write_report_json(&Report::default(), &path).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("duplicateMaterialNames"));
    }
}
