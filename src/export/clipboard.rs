//! Clipboard integration for PNG exports.

use super::types::ExportError;
use std::process::{Command, Stdio};
use wl_clipboard_rs::copy::{MimeType, Options, Source};

/// MIME type of clipboard payloads.
pub const PNG_MIME: &str = "image/png";

/// Copy PNG data to the Wayland clipboard.
///
/// Prefers the `wl-copy` command and falls back to the wl-clipboard-rs
/// library when the command is missing or fails.
pub fn copy_to_clipboard(png_data: &[u8]) -> Result<(), ExportError> {
    log::debug!("Copying export to clipboard ({} bytes)", png_data.len());

    match copy_via_command(png_data) {
        Ok(()) => {
            log::info!("Copied to clipboard via wl-copy command");
            Ok(())
        }
        Err(cmd_err) => {
            log::warn!(
                "wl-copy command path failed ({}). Falling back to wl-clipboard-rs",
                cmd_err
            );
            match copy_via_library(png_data) {
                Ok(()) => {
                    log::info!("Copied to clipboard via wl-clipboard-rs fallback");
                    Ok(())
                }
                Err(lib_err) => Err(ExportError::ClipboardFailure(format!(
                    "wl-copy failed: {} ; wl-clipboard-rs failed: {}",
                    cmd_err, lib_err
                ))),
            }
        }
    }
}

/// Copy to clipboard using wl-clipboard-rs library.
fn copy_via_library(png_data: &[u8]) -> Result<(), ExportError> {
    use wl_clipboard_rs::copy::ServeRequests;

    let mut opts = Options::new();

    // Serve one paste then exit
    opts.serve_requests(ServeRequests::Only(1));

    opts.copy(
        Source::Bytes(png_data.into()),
        MimeType::Specific(PNG_MIME.to_string()),
    )
    .map_err(|e| ExportError::ClipboardFailure(format!("wl-clipboard-rs error: {}", e)))?;

    Ok(())
}

/// Copy to clipboard by shelling out to wl-copy command.
fn copy_via_command(png_data: &[u8]) -> Result<(), ExportError> {
    use std::io::Write;

    let mut child = Command::new("wl-copy")
        .arg("--type")
        .arg(PNG_MIME)
        .stdin(Stdio::piped())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            ExportError::ClipboardFailure(format!(
                "Failed to spawn wl-copy (is it installed?): {}",
                e
            ))
        })?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin.write_all(png_data).map_err(|e| {
            ExportError::ClipboardFailure(format!("Failed to write to wl-copy stdin: {}", e))
        })?;
    }

    let output = child.wait_with_output().map_err(|e| {
        ExportError::ClipboardFailure(format!("Failed to wait for wl-copy: {}", e))
    })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ExportError::ClipboardFailure(format!(
            "wl-copy refused the payload: {}",
            stderr.trim()
        )));
    }

    log::debug!("wl-copy command completed successfully");
    Ok(())
}
