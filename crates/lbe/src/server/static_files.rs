use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use rust_embed::Embed;

// ==============================================================================
// Static File Serving
// ==============================================================================

#[derive(Embed)]
#[folder = "assets/"]
struct Assets;

/// Serves embedded stylesheets and images with a MIME type guessed from
/// the file extension.
pub(super) async fn static_file(Path(path): Path<String>) -> Response {
    match Assets::get(&path) {
        Some(content) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.as_ref())], content.data).into_response()
        }
        None => (StatusCode::NOT_FOUND, "asset not found").into_response(),
    }
}
