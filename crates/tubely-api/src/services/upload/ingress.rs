//! Size-bounded reading of the asset field from a multipart body.

use std::path::Path;

use axum::extract::multipart::Field;
use axum::extract::Multipart;
use bytes::{Bytes, BytesMut};
use tubely_core::AppError;
use tubely_processing::{classify, AssetKind, MediaClass, StagedFile, StagingArea};

use crate::error::HttpAppError;

/// A classified field streamed to disk. Dropping it removes `area` with every artifact in it.
pub struct StagedUpload {
    pub class: MediaClass,
    pub file: StagedFile,
    pub area: StagingArea,
}

fn too_large(kind: AssetKind, limit: u64) -> HttpAppError {
    HttpAppError(AppError::PayloadTooLarge(format!(
        "The {} exceeds the upload limit of {} bytes",
        kind, limit
    )))
}

fn missing_field(field_name: &str) -> HttpAppError {
    HttpAppError(AppError::InvalidInput(format!(
        "Missing multipart field '{}'",
        field_name
    )))
}

fn exceeds(received: u64, chunk: &[u8], limit: u64) -> bool {
    received.saturating_add(chunk.len() as u64) > limit
}

/// Buffer the field named `field_name` in memory.
///
/// The declared content type is checked before any bytes are read. Fails as soon as the
/// running total passes `limit`; other fields are skipped.
pub async fn read_field_to_memory(
    multipart: &mut Multipart,
    field_name: &str,
    kind: AssetKind,
    limit: u64,
) -> Result<(MediaClass, Bytes), HttpAppError> {
    while let Some(mut field) = multipart.next_field().await? {
        if field.name() != Some(field_name) {
            continue;
        }
        let class = classify(kind, field.content_type())?;

        let mut buffer = BytesMut::new();
        while let Some(chunk) = field.chunk().await? {
            if exceeds(buffer.len() as u64, &chunk, limit) {
                return Err(too_large(kind, limit));
            }
            buffer.extend_from_slice(&chunk);
        }

        return Ok((class, buffer.freeze()));
    }

    Err(missing_field(field_name))
}

/// Stream the field named `field_name` into a fresh staging directory under
/// `staging_root`, as `file_name`.
///
/// Nothing touches the filesystem until the declared content type is accepted. On any
/// failure the staging directory is dropped, removing whatever was written.
pub async fn stage_field(
    multipart: &mut Multipart,
    field_name: &str,
    kind: AssetKind,
    limit: u64,
    staging_root: &Path,
    file_name: &str,
) -> Result<StagedUpload, HttpAppError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(field_name) {
            continue;
        }
        let class = classify(kind, field.content_type())?;

        let area = StagingArea::new_in(staging_root)?;
        let file = copy_to_staging(field, &area, file_name, kind, limit).await?;

        tracing::debug!(
            size_bytes = file.size(),
            path = %file.path().display(),
            "Upload staged"
        );
        return Ok(StagedUpload { class, file, area });
    }

    Err(missing_field(field_name))
}

async fn copy_to_staging(
    mut field: Field<'_>,
    area: &StagingArea,
    file_name: &str,
    kind: AssetKind,
    limit: u64,
) -> Result<StagedFile, HttpAppError> {
    let mut writer = area.create_file(file_name).await?;
    while let Some(chunk) = field.chunk().await? {
        if exceeds(writer.bytes_written(), &chunk, limit) {
            return Err(too_large(kind, limit));
        }
        writer.write_chunk(&chunk).await?;
    }
    Ok(writer.finish().await?)
}
