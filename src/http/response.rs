//! # Construcción de Respuestas HTTP
//!
//! API para construir respuestas y escribirlas directamente sobre el socket.
//! Todas las respuestas cierran la conexión (`Connection: close`).
//!
//! ## Formato
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Date: Sun, 06 Nov 1994 08:49:37 GMT\r\n
//! Server: docserve/0.1.0\r\n
//! Connection: close\r\n
//! Content-Type: text/html\r\n
//! Content-Length: 13\r\n
//! \r\n
//! <html>...</html>
//! ```
//!
//! ## Ejemplo de uso
//!
//! ```
//! use docserve::http::{Response, StatusCode, Version};
//!
//! let response = Response::new(StatusCode::Ok)
//!     .with_header("Content-Type", "text/plain")
//!     .with_body("Hello");
//!
//! let mut bytes = Vec::new();
//! response.write_to(&mut bytes, Version::Http11, true).unwrap();
//! assert!(bytes.starts_with(b"HTTP/1.1 200 OK\r\n"));
//! ```

use super::request::Version;
use super::{date, html, StatusCode};
use std::fs::File;
use std::io::{self, Read, Write};

/// Valor del header `Server`
pub const SERVER_NAME: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Tamaño de los bloques con que se envían los archivos
pub const CHUNK_SIZE: usize = 8192;

/// Métodos que anuncia una respuesta 405
pub const ALLOWED_METHODS: &str = "GET, HEAD, POST";

/// Cuerpo de la respuesta
#[derive(Debug)]
pub enum Body {
    Empty,
    Bytes(Vec<u8>),
    /// Archivo abierto que se envía por bloques
    File(File),
}

/// Representa una respuesta HTTP completa
#[derive(Debug)]
pub struct Response {
    status: StatusCode,

    /// Headers en orden de emisión
    headers: Vec<(String, String)>,

    body: Body,
}

impl Response {
    /// Crea una respuesta sin headers ni body
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Body::Empty,
        }
    }

    /// Respuesta con los headers generales: `Date`, `Server` y
    /// `Connection: close`
    pub fn with_general_headers(status: StatusCode) -> Self {
        Self::new(status)
            .with_header("Date", &date::now())
            .with_header("Server", SERVER_NAME)
            .with_header("Connection", "close")
    }

    /// Agrega un header; si ya existe se reemplaza su valor
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.add_header(name, value);
        self
    }

    pub fn add_header(&mut self, name: &str, value: &str) {
        match self
            .headers
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.headers.push((name.to_string(), value.to_string())),
        }
    }

    /// Establece el body desde un string y calcula `Content-Length`
    pub fn with_body(self, body: &str) -> Self {
        self.with_body_bytes(body.as_bytes().to_vec())
    }

    /// Establece el body desde bytes y calcula `Content-Length`
    pub fn with_body_bytes(mut self, body: Vec<u8>) -> Self {
        self.add_header("Content-Length", &body.len().to_string());
        self.body = Body::Bytes(body);
        self
    }

    /// Establece un archivo como body. `len` es el tamaño según metadata.
    pub fn with_file(mut self, file: File, len: u64) -> Self {
        self.add_header("Content-Length", &len.to_string());
        self.body = Body::File(file);
        self
    }

    /// Página HTML de error para 400, 403, 404 y 405.
    ///
    /// Retorna `None` para códigos que no llevan página de error.
    pub fn error_page(status: StatusCode) -> Option<Self> {
        let body = match status {
            StatusCode::BadRequest => "<h2>No Host: header received</h2>\n\
                 <p>HTTP/1.1 requests must include the Host: header.</p>"
                .to_string(),
            StatusCode::Forbidden => "<h2>403 Error: Content Forbidden</h2>".to_string(),
            StatusCode::NotFound => "<h2>404 Error: Not Found</h2>\n\
                 <p>The requested resource was not found on this server.</p>"
                .to_string(),
            StatusCode::MethodNotAllowed => format!(
                "<h2>405 Error: Method Not Allowed</h2>\n<h4>Allow: {}</h4>",
                ALLOWED_METHODS
            ),
            StatusCode::Ok | StatusCode::NotModified | StatusCode::PreconditionFailed => {
                return None;
            }
        };

        let mut response = Self::with_general_headers(status)
            .with_header("Content-Type", "text/html")
            .with_body(&html::page(&status.to_string(), &body));

        if status == StatusCode::MethodNotAllowed {
            response.add_header("Allow", ALLOWED_METHODS);
        }

        Some(response)
    }

    /// Escribe status line, headers y la línea vacía
    pub fn write_head<W: Write>(&self, writer: &mut W, version: Version) -> io::Result<()> {
        write!(writer, "{} {}\r\n", version, self.status)?;
        for (name, value) in &self.headers {
            write!(writer, "{}: {}\r\n", name, value)?;
        }
        writer.write_all(b"\r\n")
    }

    /// Escribe la respuesta completa.
    ///
    /// Con `include_body = false` (HEAD) solo se envía la cabecera. Retorna
    /// los bytes de body enviados.
    pub fn write_to<W: Write>(self, writer: &mut W, version: Version, include_body: bool) -> io::Result<u64> {
        self.write_head(writer, version)?;

        let sent = if include_body {
            match self.body {
                Body::Empty => 0,
                Body::Bytes(bytes) => {
                    writer.write_all(&bytes)?;
                    bytes.len() as u64
                }
                Body::File(mut file) => send_chunks(&mut file, writer)?,
            }
        } else {
            0
        };

        writer.flush()?;
        Ok(sent)
    }

    /// Obtiene el código de estado de la respuesta
    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// Valor de un header (sin distinguir mayúsculas)
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn body(&self) -> &Body {
        &self.body
    }
}

/// Copia `source` en `writer` por bloques de [`CHUNK_SIZE`]
fn send_chunks<R: Read, W: Write>(source: &mut R, writer: &mut W) -> io::Result<u64> {
    let mut buffer = [0u8; CHUNK_SIZE];
    let mut total = 0u64;

    loop {
        let read = match source.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        writer.write_all(&buffer[..read])?;
        total += read as u64;
    }

    Ok(total)
}
