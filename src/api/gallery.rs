/// Gallery endpoints: list, upload, delete, delete-all, blob serving
use crate::{
    context::AppContext,
    error::{GalleryError, GalleryResult},
};
use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{Redirect, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Build gallery routes
pub fn routes() -> Router<AppContext> {
    Router::new()
        .route("/", get(list_images))
        .route("/upload", post(upload_images))
        .route("/delete", post(delete_image))
        .route("/deleteAll", post(delete_all_images))
        .route("/blob/:name", get(serve_blob))
}

/// Gallery listing response
#[derive(Debug, Serialize)]
pub struct GalleryListing {
    pub images: Vec<String>,
}

/// List the gallery
///
/// Returns the public URL of every image in the container, recomputed from
/// a live listing on every call.
async fn list_images(State(ctx): State<AppContext>) -> GalleryResult<Json<GalleryListing>> {
    let images = ctx.gallery.list_image_urls().await?;
    Ok(Json(GalleryListing { images }))
}

/// Upload one or more images (multipart form)
///
/// Parts without a file name or with empty content are skipped; the batch
/// still redirects to the gallery afterwards.
async fn upload_images(
    State(ctx): State<AppContext>,
    mut multipart: Multipart,
) -> GalleryResult<Redirect> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| GalleryError::Internal(format!("Malformed multipart request: {}", e)))?
    {
        let Some(file_name) = field.file_name().map(String::from) else {
            continue;
        };
        if file_name.is_empty() {
            continue;
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| GalleryError::Internal(format!("Failed to read upload: {}", e)))?;
        if data.is_empty() {
            debug!("Skipping empty upload part {}", file_name);
            continue;
        }

        ctx.gallery.store_blob(&file_name, data.to_vec()).await?;
    }

    Ok(Redirect::to("/"))
}

/// Delete request form
#[derive(Debug, Deserialize)]
pub struct DeleteForm {
    /// Public blob URL (or bare blob name)
    pub name: String,
}

/// Delete a single image by its public URL
async fn delete_image(
    State(ctx): State<AppContext>,
    Form(form): Form<DeleteForm>,
) -> GalleryResult<Redirect> {
    ctx.gallery.delete_blob(&form.name).await?;
    Ok(Redirect::to("/"))
}

/// Delete every image in the container
async fn delete_all_images(State(ctx): State<AppContext>) -> GalleryResult<Redirect> {
    ctx.gallery.delete_all().await?;
    Ok(Redirect::to("/"))
}

/// Serve a stored blob by name
///
/// Memory-backend URLs resolve here; S3 URLs point straight at the
/// container. Blob names are unique per upload, so content is immutable
/// and cacheable.
async fn serve_blob(
    State(ctx): State<AppContext>,
    Path(name): Path<String>,
) -> GalleryResult<Response> {
    let (data, content_type) = ctx
        .gallery
        .get_blob(&name)
        .await?
        .ok_or_else(|| GalleryError::NotFound(format!("Blob not found: {}", name)))?;

    Ok(Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, data.len().to_string())
        .header(header::CACHE_CONTROL, "public, max-age=31536000, immutable")
        .body(axum::body::Body::from(data))
        .unwrap())
}
