//! Multipart form reading and on-disk staging of uploaded resumes.
//!
//! Each upload is written into the configured upload directory as
//! `<8-char uuid>_<sanitized name>` and removed when the staged handle drops,
//! including on error paths.

use std::collections::HashMap;
use std::path::Path;

use axum::extract::Multipart;
use bytes::Bytes;
use tempfile::NamedTempFile;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::screening::extract::{extract_text_from_pdf, secure_filename, ExtractionError};

const FALLBACK_FILE_NAME: &str = "resume.pdf";

/// A file part of a multipart request.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field: String,
    pub file_name: String,
    pub bytes: Bytes,
}

/// Text fields and file parts of a multipart request, read fully into memory.
#[derive(Debug, Default)]
pub struct MultipartForm {
    fields: HashMap<String, String>,
    files: Vec<UploadedFile>,
}

impl MultipartForm {
    pub async fn read(mut multipart: Multipart) -> Result<Self, AppError> {
        let mut form = MultipartForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Invalid upload: {}", e.body_text())))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    let bytes = field.bytes().await.map_err(|e| {
                        AppError::Validation(format!("Invalid upload: {}", e.body_text()))
                    })?;
                    form.files.push(UploadedFile {
                        field: name,
                        file_name,
                        bytes,
                    });
                }
                None => {
                    let text = field.text().await.map_err(|e| {
                        AppError::Validation(format!("Invalid upload: {}", e.body_text()))
                    })?;
                    form.fields.insert(name, text);
                }
            }
        }

        Ok(form)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// File parts for `name`, skipping the empty parts browsers send when no file was chosen.
    pub fn files<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a UploadedFile> + 'a {
        self.files
            .iter()
            .filter(move |f| f.field == name && !f.file_name.is_empty())
    }
}

/// An uploaded resume written to the upload directory. Deleted on drop.
#[derive(Debug)]
pub struct StagedResume {
    file: NamedTempFile,
    safe_name: String,
}

impl StagedResume {
    pub async fn stage(upload_dir: &Path, upload: &UploadedFile) -> Result<Self, ExtractionError> {
        let mut safe_name = secure_filename(&upload.file_name);
        if safe_name.is_empty() {
            safe_name = FALLBACK_FILE_NAME.to_string();
        }

        let uid = Uuid::new_v4().simple().to_string();
        let file = tempfile::Builder::new()
            .prefix(&format!("{}_", &uid[..8]))
            .suffix(&format!("_{safe_name}"))
            .tempfile_in(upload_dir)?;
        tokio::fs::write(file.path(), &upload.bytes).await?;

        debug!(
            "Staged {} ({} bytes) at {}",
            upload.file_name,
            upload.bytes.len(),
            file.path().display()
        );
        Ok(Self { file, safe_name })
    }

    pub fn safe_name(&self) -> &str {
        &self.safe_name
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Extracts and normalizes the PDF text on the blocking pool, then removes the file.
    /// A parser panic is reported as `ExtractionError::Panicked`.
    pub async fn extract_text(self) -> Result<String, ExtractionError> {
        let file = self.safe_name.clone();
        tokio::task::spawn_blocking(move || extract_text_from_pdf(self.path()))
            .await
            .map_err(|_| ExtractionError::Panicked { file })?
    }
}
