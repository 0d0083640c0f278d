use crate::errors::StoreError;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const FORBIDDEN: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Checks that a label can be used verbatim as one directory name.
pub fn validate_label(label: &str) -> Result<(), StoreError> {
    if label.trim().is_empty() {
        return Err(StoreError::validation("label is required"));
    }
    if label == "." || label == ".." {
        return Err(StoreError::validation(format!(
            "label '{label}' is not a valid folder name"
        )));
    }
    if let Some(bad) = label
        .chars()
        .find(|c| FORBIDDEN.contains(c) || c.is_control())
    {
        return Err(StoreError::validation(format!(
            "label contains a character not allowed in folder names: {bad:?}"
        )));
    }
    Ok(())
}

/// `<root>/<label>`, the label kept as is.
pub fn label_dir(root: &Path, label: &str) -> Result<PathBuf, StoreError> {
    validate_label(label)?;
    Ok(root.join(label))
}

pub fn new_image_filename() -> String {
    format!("{}.jpg", Uuid::new_v4())
}
