use std::fs;
use std::path::{Path, PathBuf};

use ocr_core::{mime_type_for, SelectedDocument, ACCEPTED_EXTENSIONS};
use ocr_logging::{ocr_info, ocr_warn};

#[derive(Debug, thiserror::Error)]
pub enum PickError {
    #[error("{} is not a supported document (accepted: {})", .0.display(), accepted_list())]
    Unsupported(PathBuf),
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Load a document from disk, applying the picker's extension allow-list.
pub fn pick_document(path: &Path) -> Result<SelectedDocument, PickError> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let Some(mime_type) = mime_type_for(&file_name) else {
        ocr_warn!("Rejected {:?}: not in the accepted file types", path);
        return Err(PickError::Unsupported(path.to_path_buf()));
    };

    let content = fs::read(path).map_err(|source| PickError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    ocr_info!(
        "Selected {} type={} size={}",
        file_name,
        mime_type,
        content.len()
    );
    Ok(SelectedDocument::new(file_name, mime_type, content))
}

fn accepted_list() -> String {
    ACCEPTED_EXTENSIONS
        .iter()
        .map(|(ext, _)| *ext)
        .collect::<Vec<_>>()
        .join(", ")
}
