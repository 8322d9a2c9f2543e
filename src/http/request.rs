//! # Parsing de la Request Line
//! src/http/request.rs
//!
//! El request se lee del socket línea por línea. Este módulo parsea la
//! primera línea (request line) y ofrece el lector de líneas acotado que
//! también usa el parser de headers.
//!
//! ## Formato
//!
//! ```text
//! GET /path/file.html HTTP/1.1\r\n
//! ```
//!
//! 1. **Method**: GET, HEAD, POST (cualquier otro se conserva como `Other`)
//! 2. **Target**: path relativo o URI absoluta
//! 3. **Version**: HTTP/1.0 o HTTP/1.1

use std::io::{self, BufRead, Read};

/// Longitud máxima de una línea del request (request line o header)
pub const MAX_LINE_BYTES: u64 = 8 * 1024;

/// Métodos HTTP
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    /// GET - Obtener un recurso
    GET,

    /// HEAD - Como GET pero solo retorna headers
    HEAD,

    /// POST - Enviar datos a un recurso
    POST,

    /// Cualquier otro token; produce 405
    Other(String),
}

impl Method {
    /// Clasifica el token de método. Nunca falla.
    pub fn from_token(token: &str) -> Self {
        match token {
            "GET" => Method::GET,
            "HEAD" => Method::HEAD,
            "POST" => Method::POST,
            other => Method::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::Other(token) => token,
        }
    }

    /// GET, HEAD y POST están permitidos
    pub fn is_allowed(&self) -> bool {
        !matches!(self, Method::Other(_))
    }
}

/// Versiones de protocolo soportadas
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Version {
    Http10,
    Http11,
}

impl Version {
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "HTTP/1.0" => Some(Version::Http10),
            "HTTP/1.1" => Some(Version::Http11),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Version::Http10 => "HTTP/1.0",
            Version::Http11 => "HTTP/1.1",
        }
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errores al interpretar la request line
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// El cliente cerró sin enviar nada
    #[error("empty request")]
    EmptyRequest,

    /// Menos de dos tokens
    #[error("invalid request line: {0:?}")]
    InvalidRequestLine(String),

    /// Versión ausente o distinta de HTTP/1.0 y HTTP/1.1
    #[error("unsupported HTTP version: {0:?}")]
    UnsupportedVersion(String),
}

/// Primera línea del request ya separada en tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    raw: String,
    method: Method,
    target: String,
    version_token: Option<String>,
}

impl RequestLine {
    /// Parsea la request line.
    ///
    /// Solo exige dos tokens (método y target); la versión se valida aparte
    /// con [`RequestLine::version`] porque los endpoints de administración se
    /// atienden antes de negociarla.
    ///
    /// # Ejemplo
    /// ```
    /// use docserve::http::request::{Method, RequestLine, Version};
    ///
    /// let line = RequestLine::parse("GET /index.html HTTP/1.1").unwrap();
    /// assert_eq!(line.method(), &Method::GET);
    /// assert_eq!(line.target(), "/index.html");
    /// assert_eq!(line.version(), Ok(Version::Http11));
    /// ```
    pub fn parse(line: &str) -> Result<Self, ParseError> {
        let raw = line.trim_end_matches(['\r', '\n']).to_string();
        let mut tokens = raw.split_whitespace();

        let (method, target) = match (tokens.next(), tokens.next()) {
            (Some(method), Some(target)) => (Method::from_token(method), target.to_string()),
            _ => return Err(ParseError::InvalidRequestLine(raw)),
        };
        let version_token = tokens.next().map(str::to_string);

        Ok(Self {
            raw,
            method,
            target,
            version_token,
        })
    }

    /// Línea tal como llegó (sin el salto de línea)
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn target(&self) -> &str {
        &self.target
    }

    pub fn version_token(&self) -> Option<&str> {
        self.version_token.as_deref()
    }

    /// Negocia la versión: solo HTTP/1.0 y HTTP/1.1
    pub fn version(&self) -> Result<Version, ParseError> {
        let token = self.version_token.as_deref().unwrap_or("");
        Version::from_token(token).ok_or_else(|| ParseError::UnsupportedVersion(token.to_string()))
    }
}

/// Lee una línea de como máximo [`MAX_LINE_BYTES`] bytes.
///
/// Retorna `Ok(None)` en EOF. Bytes no UTF-8 se reemplazan en lugar de
/// abortar la conexión.
pub fn read_line<R: BufRead>(reader: &mut R) -> io::Result<Option<String>> {
    let mut buffer = Vec::new();
    let read = reader.by_ref().take(MAX_LINE_BYTES).read_until(b'\n', &mut buffer)?;

    if read == 0 {
        return Ok(None);
    }

    let line = String::from_utf8_lossy(&buffer);
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}
