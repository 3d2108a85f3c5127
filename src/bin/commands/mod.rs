pub mod config;
pub mod lookup;
pub mod session;

use ipscope::lens::ip::ExportArtifact;
use ipscope::{IpscopeConfig, OutputFormat};
use std::path::Path;

/// Print an error either as plain text or, for JSON formats, as a JSON object
pub(crate) fn print_error(message: &str, output_format: OutputFormat) {
    if output_format.is_json() {
        eprintln!("{}", serde_json::json!({ "error": message }));
    } else {
        eprintln!("ERROR: {}", message);
    }
}

/// Write an export artifact to `dir`, or the configured export directory
pub(crate) fn write_export(
    artifact: &ExportArtifact,
    dir: Option<&str>,
    config: &IpscopeConfig,
) -> bool {
    let dir = dir.unwrap_or(config.export_dir.as_str());
    match artifact.write_to(Path::new(dir)) {
        Ok(path) => {
            eprintln!("exported to {}", path.display());
            true
        }
        Err(e) => {
            eprintln!("ERROR: {}", e);
            false
        }
    }
}
