//! # Módulo HTTP
//!
//! Implementación a mano del subconjunto de HTTP/1.0 y HTTP/1.1 que necesita
//! el servidor de archivos. Incluye:
//!
//! - Parsing de la request line y de los headers reconocidos
//! - Construcción y envío de responses
//! - Status codes y tabla de tipos MIME
//! - Fechas HTTP
//!
//! ### Formato de Request
//!
//! ```text
//! GET /path/file.html HTTP/1.1\r\n
//! Host: localhost\r\n
//! If-Modified-Since: Sun, 06 Nov 1994 08:49:37 GMT\r\n
//! \r\n
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Date: Sun, 06 Nov 1994 08:49:37 GMT\r\n
//! Connection: close\r\n
//! Content-Type: text/html\r\n
//! Content-Length: 13\r\n
//! \r\n
//! <html>...</html>
//! ```

pub mod date;
pub mod headers;
pub mod html;
pub mod mime;
pub mod request;
pub mod response;
pub mod status;

// Permite usar `http::Response` en vez de `http::response::Response`
pub use headers::{HeaderSet, KnownHeader};
pub use request::{Method, ParseError, RequestLine, Version};
pub use response::Response;
pub use status::StatusCode;
