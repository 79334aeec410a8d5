//! Streaming multipart fields to private temporary files.

use std::path::Path;

use axum::extract::multipart::{Field, MultipartError};
use axum::extract::Multipart;
use axum::http::StatusCode;
use tempfile::NamedTempFile;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use tubely_models::MediaType;

use crate::error::{ApiError, ApiResult};

/// An upload written to disk. The file is removed when this is dropped.
#[derive(Debug)]
pub struct StagedUpload {
    pub file: NamedTempFile,
    pub media_type: MediaType,
    pub size: u64,
}

impl StagedUpload {
    pub fn path(&self) -> &Path {
        self.file.path()
    }
}

/// Map a multipart read failure onto 413 or 400.
pub fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large(err.body_text())
    } else {
        ApiError::bad_request(err.body_text())
    }
}

/// Create a private temp file in `dir`.
pub fn temp_file_in(dir: &Path, prefix: &str, extension: &str) -> ApiResult<NamedTempFile> {
    let file = tempfile::Builder::new()
        .prefix(prefix)
        .suffix(&format!(".{}", extension))
        .tempfile_in(dir)?;
    Ok(file)
}

/// Find `field_name` in the form and stream it into a temp file in `dir`.
///
/// The declared part type is checked against `allowed` before any file is
/// created. Other fields are skipped.
pub async fn stage_field(
    multipart: &mut Multipart,
    field_name: &str,
    allowed: &[MediaType],
    dir: &Path,
) -> ApiResult<StagedUpload> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(field_name) {
            continue;
        }

        let media_type = MediaType::parse_allowed(field.content_type(), allowed)?;
        let file = temp_file_in(dir, "tubely-upload-", media_type.extension())?;
        let size = write_field(field, &file).await?;

        if size == 0 {
            return Err(ApiError::bad_request(format!("Form field '{}' is empty", field_name)));
        }

        debug!(
            field = field_name,
            size,
            media_type = %media_type,
            path = %file.path().display(),
            "Staged upload"
        );
        return Ok(StagedUpload { file, media_type, size });
    }

    Err(ApiError::bad_request(format!("Missing form field '{}'", field_name)))
}

async fn write_field(mut field: Field<'_>, file: &NamedTempFile) -> ApiResult<u64> {
    let mut out = tokio::fs::File::from_std(file.as_file().try_clone()?);
    let mut size = 0u64;

    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        out.write_all(&chunk).await?;
        size += chunk.len() as u64;
    }

    out.flush().await?;
    Ok(size)
}
