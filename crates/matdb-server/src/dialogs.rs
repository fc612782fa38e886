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

//! Native desktop helpers, driven through PowerShell on Windows.
//!
//! Each helper writes a short script to a temp file and runs it with
//! `powershell -NoProfile -ExecutionPolicy Bypass -File`, which sidesteps
//! command-line quoting entirely. On other platforms every helper reports
//! that the feature needs Windows.

use std::io;

/// Quote a value for embedding in a single-quoted PowerShell string.
fn ps_quote(value: &str) -> String {
    value.replace('\'', "''")
}

/// Show the native open-file dialog; returns the chosen path (empty when
/// the operator cancels).
pub fn open_file_dialog(ext: &str) -> io::Result<String> {
    let filter = match ext {
        "xlsx" => "Excel files (*.xlsx)|*.xlsx|All files (*.*)|*.*",
        "db" => "DB files (*.db)|*.db|All files (*.*)|*.*",
        _ => "All files (*.*)|*.*",
    };
    let script = format!(
        "Add-Type -AssemblyName System.Windows.Forms\n\
         $form = New-Object System.Windows.Forms.Form\n\
         $form.TopMost = $true\n\
         $form.Size = New-Object System.Drawing.Size(0,0)\n\
         $form.ShowInTaskbar = $false\n\
         $form.Opacity = 0\n\
         $ofd = New-Object System.Windows.Forms.OpenFileDialog\n\
         $ofd.Filter = '{}'\n\
         $ofd.Multiselect = $false\n\
         if ($ofd.ShowDialog($form) -eq 'OK') {{ Write-Output $ofd.FileName }}\n\
         $form.Dispose()\n",
        ps_quote(filter)
    );
    run_powershell(&script)
}

/// Show the native folder picker; returns the chosen path (empty when the
/// operator cancels).
pub fn open_folder_dialog() -> io::Result<String> {
    let script = "Add-Type -AssemblyName System.Windows.Forms\n\
         $form = New-Object System.Windows.Forms.Form\n\
         $form.TopMost = $true\n\
         $form.Size = New-Object System.Drawing.Size(0,0)\n\
         $form.ShowInTaskbar = $false\n\
         $form.Opacity = 0\n\
         $f = New-Object System.Windows.Forms.FolderBrowserDialog\n\
         if ($f.ShowDialog($form) -eq 'OK') { Write-Output $f.SelectedPath }\n\
         $form.Dispose()\n";
    run_powershell(script)
}

/// Open a workbook in Excel and select a cell, via COM automation.
pub fn open_in_excel(file_path: &str, sheet_name: &str, row: u32) -> io::Result<()> {
    let script = format!(
        "$excel = New-Object -ComObject Excel.Application\n\
         $excel.Visible = $true\n\
         $wb = $excel.Workbooks.Open('{}')\n\
         try {{ $ws = $wb.Worksheets.Item('{}') }} catch {{ $ws = $wb.Worksheets.Item(1) }}\n\
         $ws.Activate()\n\
         $rng = $ws.Range(\"A{}\")\n\
         $rng.Select()\n",
        ps_quote(file_path),
        ps_quote(sheet_name),
        row
    );
    run_powershell(&script).map(|_| ())
}

#[cfg(windows)]
fn run_powershell(script: &str) -> io::Result<String> {
    use std::io::Write;
    use std::process::Command;

    let mut file = tempfile::Builder::new()
        .prefix("matdb_ps_")
        .suffix(".ps1")
        .tempfile()?;
    file.write_all(script.as_bytes())?;
    let path = file.into_temp_path();

    let output = Command::new("powershell")
        .args(["-NoProfile", "-ExecutionPolicy", "Bypass", "-File"])
        .arg(&path)
        .output()?;

    if !output.status.success() {
        return Err(io::Error::other(format!(
            "powershell exited with {}: {}",
            output.status,
            String::from_utf8_lossy(&output.stderr)
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(not(windows))]
fn run_powershell(_script: &str) -> io::Result<String> {
    Err(io::Error::other(
        "native dialogs and Excel automation require Windows",
    ))
}
