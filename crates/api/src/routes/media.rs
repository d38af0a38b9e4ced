//! Image upload and product-image route handlers.

use axum::{
    Json,
    extract::{Multipart, Query, State},
};
use serde::Deserialize;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use mayorista_core::ProductId;

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// An image payload extracted and validated from the multipart request.
struct ImageUpload {
    filename: String,
    bytes: Vec<u8>,
}

/// Upload a product image through the media relay.
///
/// POST /upload-image
///
/// The request is held open until the relay answers or times out; the
/// caller needs the hosted URL. Payload validation happens before the
/// relay is consulted, so a malformed upload never makes a relay call.
#[instrument(skip_all)]
pub async fn upload_image(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>> {
    let upload = extract_image(multipart).await?;

    let Some(media) = state.media() else {
        return Err(AppError::RelayUnavailable(
            "image hosting is not configured".to_string(),
        ));
    };

    let unique_filename = unique_filename(&upload.filename);
    let url = media.upload(&unique_filename, upload.bytes).await?;

    Ok(Json(json!({
        "filename": unique_filename,
        "url": url,
        "message": "Imagen subida exitosamente",
    })))
}

/// Query parameters for the image-update operation (Spanish parameter
/// names are part of the public interface).
#[derive(Debug, Deserialize)]
pub struct UpdateImageQuery {
    pub producto_id: i64,
    pub imagen_url: String,
}

/// Overwrite a product's stored image URL.
///
/// POST /actualizar-imagen-producto?producto_id=&imagen_url=
#[instrument(skip(state))]
pub async fn update_product_image(
    State(state): State<AppState>,
    Query(query): Query<UpdateImageQuery>,
) -> Result<Json<serde_json::Value>> {
    if query.imagen_url.trim().is_empty() {
        return Err(AppError::InvalidInput(
            "imagen_url must not be empty".to_string(),
        ));
    }

    let repo = ProductRepository::new(state.pool());
    repo.update_image(ProductId::new(query.producto_id), &query.imagen_url)
        .await?;

    tracing::info!(producto_id = query.producto_id, "Product image updated");
    Ok(Json(json!({
        "message": format!("Imagen del producto {} actualizada exitosamente", query.producto_id),
        "url": query.imagen_url,
    })))
}

/// Pull the image field out of the multipart payload, enforcing the
/// media-type and filename requirements.
async fn extract_image(mut multipart: Multipart) -> Result<ImageUpload> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("malformed multipart payload: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field.content_type().unwrap_or_default().to_string();
        if !content_type.starts_with("image/") {
            return Err(AppError::InvalidInput(
                "el archivo debe ser una imagen".to_string(),
            ));
        }

        let filename = field.file_name().unwrap_or_default().to_string();
        if filename.is_empty() {
            return Err(AppError::InvalidInput(
                "el archivo debe tener un nombre".to_string(),
            ));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::InvalidInput(format!("failed to read upload: {e}")))?
            .to_vec();

        return Ok(ImageUpload { filename, bytes });
    }

    Err(AppError::InvalidInput(
        "multipart field 'file' is required".to_string(),
    ))
}

/// Collision-proof relay filename: `{uuid}.{ext}`, extension taken from
/// the client filename with `jpg` as fallback.
fn unique_filename(original: &str) -> String {
    let extension = original.rsplit_once('.').map_or("jpg", |(_, ext)| ext);
    format!("{}.{extension}", Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unique_filename_keeps_extension() {
        let name = unique_filename("gorro.png");
        assert!(name.ends_with(".png"));
        assert_ne!(unique_filename("gorro.png"), name);
    }

    #[test]
    fn test_unique_filename_defaults_to_jpg() {
        assert!(unique_filename("gorro").ends_with(".jpg"));
    }
}
