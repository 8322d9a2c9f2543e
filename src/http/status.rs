//! # Códigos de Estado HTTP
//!
//! Códigos que produce el servidor de archivos. No se generan otros:
//!
//! - **2xx**: 200 OK
//! - **3xx**: 304 Not Modified (GET condicional)
//! - **4xx**: 400, 403, 404, 405, 412

/// Representa los códigos de estado HTTP que soporta nuestro servidor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusCode {
    /// 200 OK - La petición fue exitosa
    Ok = 200,

    /// 304 Not Modified - El recurso no cambió desde `If-Modified-Since`
    NotModified = 304,

    /// 400 Bad Request - Request HTTP/1.1 sin header `Host`
    BadRequest = 400,

    /// 403 Forbidden - El path escapa del document root o es restringido
    Forbidden = 403,

    /// 404 Not Found - Recurso no encontrado
    NotFound = 404,

    /// 405 Method Not Allowed - Método distinto de GET, HEAD o POST
    MethodNotAllowed = 405,

    /// 412 Precondition Failed - Falló `If-Unmodified-Since`
    PreconditionFailed = 412,
}

impl StatusCode {
    /// Convierte el código a su valor numérico
    ///
    /// # Ejemplo
    /// ```
    /// use docserve::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// ```
    pub fn as_u16(&self) -> u16 {
        *self as u16
    }

    /// Busca el código a partir de su valor numérico
    pub fn from_u16(code: u16) -> Option<Self> {
        match code {
            200 => Some(StatusCode::Ok),
            304 => Some(StatusCode::NotModified),
            400 => Some(StatusCode::BadRequest),
            403 => Some(StatusCode::Forbidden),
            404 => Some(StatusCode::NotFound),
            405 => Some(StatusCode::MethodNotAllowed),
            412 => Some(StatusCode::PreconditionFailed),
            _ => None,
        }
    }

    /// Retorna el texto de razón (reason phrase) asociado al código
    ///
    /// # Ejemplo
    /// ```
    /// use docserve::http::StatusCode;
    /// assert_eq!(StatusCode::Ok.reason_phrase(), "OK");
    /// assert_eq!(StatusCode::NotFound.reason_phrase(), "Not Found");
    /// ```
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::NotModified => "Not Modified",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::Forbidden => "Forbidden",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
            StatusCode::PreconditionFailed => "Precondition Failed",
        }
    }

    /// Verifica si el código indica éxito (2xx)
    pub fn is_success(&self) -> bool {
        matches!(self, StatusCode::Ok)
    }
}

/// Tabla estática código → frase de razón.
///
/// Para códigos desconocidos retorna `"Unknown"` en lugar de fallar.
pub fn reason_phrase_for(code: u16) -> &'static str {
    StatusCode::from_u16(code)
        .map(|status| status.reason_phrase())
        .unwrap_or("Unknown")
}

impl std::fmt::Display for StatusCode {
    /// Formato: "200 OK"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.as_u16(), self.reason_phrase())
    }
}
