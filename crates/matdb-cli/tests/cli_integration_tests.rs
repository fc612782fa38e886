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

//! End-to-end CLI tests: parse, generate-template, import-xlsx.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn matdb_cmd() -> Command {
    Command::cargo_bin("matdb").expect("Failed to find matdb binary")
}

const DB: &str = r#"<materials version="1.0">
  <material id="M1">
    <details><name>Oak</name><type>wood</type></details>
    <panels>
      <panel id="P1">
        <name>Standard</name>
        <thickness unit="mm">18</thickness>
        <layers>
          <layer id="L1"><name>core</name></layer>
          <layer id="L2"><name>veneer</name></layer>
        </layers>
      </panel>
    </panels>
    <edges>
      <edge id="E1"><name>oak edge</name><thickness unit="mm">2</thickness></edge>
    </edges>
  </material>
</materials>"#;

/// A database whose template will trip the duplicate-name gate.
const DUPLICATE_DB: &str = r#"<materials version="1.0">
  <material id="M1"><details><name>Oak</name></details></material>
  <material id="M2"><details><name>Oak</name></details></material>
</materials>"#;

fn write_db(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).expect("Failed to write database fixture");
    path
}

fn run_pipeline(dir: &TempDir, db_content: &str) -> (std::path::PathBuf, std::path::PathBuf) {
    let db = write_db(dir, "materials.db", db_content);
    let json = dir.path().join("materials_parsed.json");
    let xlsx = dir.path().join("materials_template.xlsx");

    matdb_cmd()
        .arg("parse")
        .arg(&db)
        .arg(&json)
        .assert()
        .success()
        .stdout(predicate::str::contains("Parsed JSON written to"));

    matdb_cmd()
        .arg("generate-template")
        .arg(&json)
        .arg(&xlsx)
        .assert()
        .success()
        .stdout(predicate::str::contains("Template generated:"));

    (db, xlsx)
}

#[test]
fn test_help_output() {
    matdb_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "MatDB - materials database spreadsheet toolkit",
        ))
        .stdout(predicate::str::contains("Usage:"));
}

#[test]
fn test_no_subcommand_fails() {
    matdb_cmd().assert().failure();
}

#[test]
fn test_parse_missing_file() {
    matdb_cmd()
        .arg("parse")
        .arg("/nonexistent/materials.db")
        .arg("/tmp/out.json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read"));
}

#[test]
fn test_parse_writes_json_tree() {
    let dir = TempDir::new().unwrap();
    let db = write_db(&dir, "materials.db", DB);
    let json = dir.path().join("out.json");

    matdb_cmd()
        .arg("parse")
        .arg(&db)
        .arg(&json)
        .assert()
        .success();

    let raw = fs::read_to_string(&json).unwrap();
    assert!(raw.contains("\"materials\""));
    assert!(raw.contains("\"@id\": \"M1\""));
    assert!(raw.contains("\"@version\": \"1.0\""));
}

#[test]
fn test_full_pipeline_import_reproduces_database() {
    let dir = TempDir::new().unwrap();
    let (db, xlsx) = run_pipeline(&dir, DB);
    let out = dir.path().join("materials_new.db");

    matdb_cmd()
        .arg("import-xlsx")
        .arg(&xlsx)
        .arg(&out)
        .arg(&db)
        .assert()
        .success()
        .stdout(predicate::str::contains("Original database backed up to"))
        .stdout(predicate::str::contains("Import finished:"));

    let xml = fs::read_to_string(&out).unwrap();
    assert!(xml.contains("<material id=\"M1\">"));
    assert!(xml.contains("<name>Oak</name>"));
    assert!(xml.contains("<panel id=\"P1\">"));
    assert!(xml.contains("<thickness unit=\"mm\">18</thickness>"));
    assert!(xml.contains("<layer id=\"L1\">"));
    // Exactly one edge: a bare element, no list wrapper artifacts.
    assert!(xml.contains("<edge id=\"E1\">"));

    // The original was backed up next to itself.
    let backups: Vec<_> = fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_name()
                .to_string_lossy()
                .starts_with("materials.db.bak.")
        })
        .collect();
    assert_eq!(backups.len(), 1);
}

#[test]
fn test_duplicate_materials_abort_with_exit_code_two() {
    let dir = TempDir::new().unwrap();
    let (_db, xlsx) = run_pipeline(&dir, DUPLICATE_DB);
    let out = dir.path().join("materials_new.db");

    matdb_cmd()
        .arg("import-xlsx")
        .arg(&xlsx)
        .arg(&out)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("duplicate material_name"))
        .stderr(predicate::str::contains("Oak"))
        .stderr(predicate::str::contains("--force"));

    // The gate aborted before anything was written.
    assert!(!out.exists());
}

#[test]
fn test_force_bypasses_the_gate() {
    let dir = TempDir::new().unwrap();
    let (_db, xlsx) = run_pipeline(&dir, DUPLICATE_DB);
    let out = dir.path().join("materials_new.db");

    matdb_cmd()
        .arg("import-xlsx")
        .arg(&xlsx)
        .arg(&out)
        .arg("--force")
        .assert()
        .success();

    let xml = fs::read_to_string(&out).unwrap();
    assert!(xml.contains("<material id=\"M1\">"));
    assert!(xml.contains("<material id=\"M2\">"));
}

#[test]
fn test_report_mode_writes_json_and_no_database() {
    let dir = TempDir::new().unwrap();
    let (_db, xlsx) = run_pipeline(&dir, DUPLICATE_DB);
    let out = dir.path().join("materials_new.db");
    let report = dir.path().join("report.json");

    matdb_cmd()
        .arg("import-xlsx")
        .arg(&xlsx)
        .arg(&out)
        .arg("--report")
        .arg("--report-out")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("Materials: 2"))
        .stdout(predicate::str::contains("Duplicate material names"))
        .stdout(predicate::str::contains("Report saved to"));

    assert!(!out.exists());
    let raw = fs::read_to_string(&report).unwrap();
    assert!(raw.contains("\"duplicateMaterialNames\""));
    assert!(raw.contains("\"Oak\""));
}

#[test]
fn test_report_mode_defaults_into_reports_directory() {
    let dir = TempDir::new().unwrap();
    let (_db, xlsx) = run_pipeline(&dir, DB);

    matdb_cmd()
        .current_dir(dir.path())
        .arg("import-xlsx")
        .arg(&xlsx)
        .arg("--report")
        .assert()
        .success();

    let reports: Vec<_> = fs::read_dir(dir.path().join("reports"))
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name().to_string_lossy().to_string();
            name.starts_with("report-") && name.ends_with(".json")
        })
        .collect();
    assert_eq!(reports.len(), 1);
}

#[test]
fn test_import_missing_workbook_fails_plainly() {
    let dir = TempDir::new().unwrap();
    matdb_cmd()
        .arg("import-xlsx")
        .arg(dir.path().join("missing.xlsx"))
        .arg(dir.path().join("out.db"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to open workbook"));
}

#[test]
fn test_generate_template_rejects_bad_json() {
    let dir = TempDir::new().unwrap();
    let json = dir.path().join("broken.json");
    fs::write(&json, "{ not json").unwrap();

    matdb_cmd()
        .arg("generate-template")
        .arg(&json)
        .arg(dir.path().join("out.xlsx"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid JSON tree"));
}

#[test]
fn test_generate_template_rejects_missing_materials_root() {
    let dir = TempDir::new().unwrap();
    let json = dir.path().join("wrong.json");
    fs::write(&json, r#"{"other": {}}"#).unwrap();

    matdb_cmd()
        .arg("generate-template")
        .arg(&json)
        .arg(dir.path().join("out.xlsx"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed input"));
}

#[test]
fn test_parse_default_output_lands_in_cwd() {
    let dir = TempDir::new().unwrap();
    write_db(&dir, "materials.db", DB);

    matdb_cmd()
        .current_dir(dir.path())
        .arg("parse")
        .arg("materials.db")
        .assert()
        .success();

    assert!(Path::new(&dir.path().join("materials_parsed.json")).exists());
}
