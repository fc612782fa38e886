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

//! HTTP route handlers.
//!
//! Conversion work is synchronous file I/O, so every handler pushes it onto
//! the blocking pool. Uploads land in temp files that are removed when the
//! handler finishes, whatever the outcome.

use crate::dialogs;
use crate::error::ApiError;
use crate::AppState;
use axum::extract::{Multipart, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use matdb_convert::{
    default_report_path, generate_template_from_db, generate_template_from_json,
    import_workbook, report_workbook, write_report_json, ConvertError, ImportOptions,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/report", get(get_report))
        .route("/open", post(open_in_excel))
        .route("/dialog/open-file", get(dialog_open_file))
        .route("/dialog/open-folder", get(dialog_open_folder))
        .route("/generate-template", post(generate_template))
        .route(
            "/api/generate-template-from-db",
            post(generate_template_from_database),
        )
        .route(
            "/api/generate-template-upload",
            post(generate_template_upload),
        )
        .route("/api/upload-xlsx-preview", post(upload_xlsx_preview))
        .route("/import", post(import))
        .with_state(state)
}

async fn run_blocking<T, F>(work: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ConvertError> + Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| ApiError::internal(format!("blocking task failed: {e}")))?
        .map_err(ApiError::from)
}

fn latest_report_file(reports_dir: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(reports_dir).ok()?;
    entries
        .filter_map(|e| e.ok())
        .filter(|e| {
            let name = e.file_name().to_string_lossy().to_string();
            name.starts_with("report-") && name.ends_with(".json")
        })
        .filter_map(|e| {
            let modified = e.metadata().ok()?.modified().ok()?;
            Some((e.path(), modified))
        })
        .max_by_key(|(_, modified)| *modified)
        .map(|(path, _)| path)
}

#[derive(Deserialize)]
struct ReportQuery {
    file: Option<String>,
}

async fn get_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Value>, ApiError> {
    let path = match query.file {
        Some(file) => PathBuf::from(file),
        None => latest_report_file(&state.reports_dir)
            .ok_or_else(|| ApiError::not_found("No report found"))?,
    };
    if !path.exists() {
        return Err(ApiError::not_found(format!(
            "Report not found: {}",
            path.display()
        )));
    }

    let raw = fs::read_to_string(&path)
        .map_err(|e| ApiError::internal(format!("failed to read report: {e}")))?;
    let value: Value = serde_json::from_str(&raw)
        .map_err(|e| ApiError::internal(format!("report is not valid JSON: {e}")))?;
    Ok(Json(value))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct OpenRequest {
    file_path: String,
    sheet_name: String,
    row: u32,
}

async fn open_in_excel(Json(body): Json<OpenRequest>) -> Result<Json<Value>, ApiError> {
    if !Path::new(&body.file_path).exists() {
        return Err(ApiError::not_found(format!(
            "Excel file not found: {}",
            body.file_path
        )));
    }

    tokio::task::spawn_blocking(move || {
        dialogs::open_in_excel(&body.file_path, &body.sheet_name, body.row)
    })
    .await
    .map_err(|e| ApiError::internal(format!("blocking task failed: {e}")))?
    .map_err(|e| ApiError::internal(e.to_string()))?;

    Ok(Json(json!({ "ok": true })))
}

#[derive(Deserialize)]
struct DialogQuery {
    ext: Option<String>,
}

async fn dialog_open_file(
    Query(query): Query<DialogQuery>,
) -> Result<Json<Value>, ApiError> {
    let ext = query.ext.unwrap_or_default().to_lowercase();
    let path = tokio::task::spawn_blocking(move || dialogs::open_file_dialog(&ext))
        .await
        .map_err(|e| ApiError::internal(format!("blocking task failed: {e}")))?
        .map_err(|e| ApiError::internal(e.to_string()))?;
    Ok(Json(json!({ "path": path })))
}

async fn dialog_open_folder() -> Result<Json<Value>, ApiError> {
    let path = tokio::task::spawn_blocking(dialogs::open_folder_dialog)
        .await
        .map_err(|e| ApiError::internal(format!("blocking task failed: {e}")))?
        .map_err(|e| ApiError::internal(e.to_string()))?;
    Ok(Json(json!({ "path": path })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateTemplateRequest {
    json_path: String,
    xlsx_path: String,
}

async fn generate_template(
    Json(body): Json<GenerateTemplateRequest>,
) -> Result<Json<Value>, ApiError> {
    let json_path = PathBuf::from(body.json_path);
    let xlsx_path = PathBuf::from(body.xlsx_path);
    let response_path = xlsx_path.display().to_string();

    run_blocking(move || generate_template_from_json(&json_path, &xlsx_path)).await?;
    Ok(Json(json!({ "ok": true, "xlsxPath": response_path })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateFromDbRequest {
    db_path: String,
    xlsx_path: String,
}

async fn generate_template_from_database(
    Json(body): Json<GenerateFromDbRequest>,
) -> Result<Json<Value>, ApiError> {
    let db_path = PathBuf::from(body.db_path);
    if !db_path.exists() {
        return Err(ApiError::not_found(format!(
            "DB file not found: {}",
            db_path.display()
        )));
    }
    let xlsx_path = PathBuf::from(body.xlsx_path);
    let response_path = xlsx_path.display().to_string();

    run_blocking(move || generate_template_from_db(&db_path, &xlsx_path)).await?;
    Ok(Json(json!({ "ok": true, "xlsxPath": response_path })))
}

/// Pull one named field out of a multipart upload into a temp file.
async fn save_upload_field(
    multipart: &mut Multipart,
    expected: &str,
) -> Result<tempfile::TempPath, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some(expected) {
            continue;
        }
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("failed to read upload: {e}")))?;

        let file = tempfile::Builder::new()
            .prefix("matdb_upload_")
            .tempfile()
            .map_err(|e| ApiError::internal(format!("failed to create temp file: {e}")))?;
        fs::write(file.path(), &data)
            .map_err(|e| ApiError::internal(format!("failed to write upload: {e}")))?;
        return Ok(file.into_temp_path());
    }
    Err(ApiError::bad_request(format!(
        "{expected} required (multipart/form-data field name: {expected})"
    )))
}

async fn generate_template_upload(
    mut multipart: Multipart,
) -> Result<axum::response::Response, ApiError> {
    let uploaded_db = save_upload_field(&mut multipart, "dbfile").await?;

    let db_path = uploaded_db.to_path_buf();
    let xlsx_temp = tempfile::Builder::new()
        .prefix("matdb_template_")
        .suffix(".xlsx")
        .tempfile()
        .map_err(|e| ApiError::internal(format!("failed to create temp file: {e}")))?
        .into_temp_path();
    let xlsx_path = xlsx_temp.to_path_buf();

    run_blocking(move || generate_template_from_db(&db_path, &xlsx_path)).await?;

    let bytes = fs::read(&xlsx_temp)
        .map_err(|e| ApiError::internal(format!("failed to read generated workbook: {e}")))?;

    Ok((
        [
            (
                header::CONTENT_TYPE,
                "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            ),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"materials_template.xlsx\"",
            ),
        ],
        bytes,
    )
        .into_response())
}

async fn upload_xlsx_preview(mut multipart: Multipart) -> Result<Json<Value>, ApiError> {
    let uploaded = save_upload_field(&mut multipart, "file").await?;

    let xlsx_path = uploaded.to_path_buf();
    let report = run_blocking(move || report_workbook(&xlsx_path)).await?;
    Ok(Json(json!({ "ok": true, "report": report })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportRequest {
    xlsx_path: String,
    out_db_path: String,
    original_db_path: Option<String>,
    report_folder: Option<String>,
}

async fn import(
    State(state): State<AppState>,
    Json(body): Json<ImportRequest>,
) -> Result<Json<Value>, ApiError> {
    let xlsx_path = PathBuf::from(body.xlsx_path);
    let out_db = PathBuf::from(body.out_db_path);
    let original = body.original_db_path.map(PathBuf::from);
    let report_dir = body
        .report_folder
        .map(PathBuf::from)
        .unwrap_or(state.reports_dir);

    let out_db_response = out_db.display().to_string();

    let (report, report_path) = run_blocking(move || {
        import_workbook(
            &xlsx_path,
            &out_db,
            original.as_deref(),
            &ImportOptions::default(),
        )?;
        let report = report_workbook(&xlsx_path)?;
        let report_path = default_report_path(&report_dir);
        write_report_json(&report, &report_path)?;
        Ok((report, report_path))
    })
    .await?;

    Ok(Json(json!({
        "ok": true,
        "outDbPath": out_db_response,
        "reportPath": report_path.display().to_string(),
        "report": report,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_report_prefers_the_newest_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("report-1.json"), "{}").unwrap();
        fs::write(dir.path().join("not-a-report.txt"), "x").unwrap();
        let newer = dir.path().join("report-2.json");
        fs::write(&newer, "{}").unwrap();

        // Nudge mtime so ordering does not depend on write granularity.
        let later = std::time::SystemTime::now() + std::time::Duration::from_secs(5);
        let file = fs::File::options().write(true).open(&newer).unwrap();
        file.set_modified(later).unwrap();

        assert_eq!(latest_report_file(dir.path()), Some(newer));
    }

    #[test]
    fn latest_report_is_none_for_missing_directory() {
        assert_eq!(latest_report_file(Path::new("/no/such/dir")), None);
    }
}
