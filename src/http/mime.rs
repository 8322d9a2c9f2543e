//! # Tipos MIME
//! src/http/mime.rs
//!
//! Tabla estática extensión → Content-Type. La extensión se acepta con o sin
//! punto inicial y sin distinguir mayúsculas.

/// Content-Type para extensiones que no están en la tabla
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Busca el Content-Type de una extensión
pub fn lookup(extension: &str) -> Option<&'static str> {
    let ext = extension.trim_start_matches('.').to_ascii_lowercase();

    let content_type = match ext.as_str() {
        "html" | "htm" => "text/html",
        "txt" | "text" | "log" => "text/plain",
        "css" => "text/css",
        "csv" => "text/csv",
        "md" => "text/markdown",
        "xml" => "text/xml",
        "js" | "mjs" => "application/javascript",
        "json" => "application/json",
        "pdf" => "application/pdf",
        "zip" => "application/zip",
        "gz" => "application/gzip",
        "tar" => "application/x-tar",
        "wasm" => "application/wasm",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        _ => return None,
    };

    Some(content_type)
}

/// Content-Type de una extensión; nunca falla.
///
/// # Ejemplo
/// ```
/// use docserve::http::mime::content_type_for;
/// assert_eq!(content_type_for("html"), "text/html");
/// assert_eq!(content_type_for(".xyz"), "application/octet-stream");
/// ```
pub fn content_type_for(extension: &str) -> &'static str {
    lookup(extension).unwrap_or(DEFAULT_CONTENT_TYPE)
}
