//! # Errores del Servidor
//! src/error.rs
//!
//! - [`ServerError`]: fallas de arranque, las únicas fatales
//! - [`HandlerError`]: fallas de una conexión; se registran y solo se
//!   cierra esa conexión

use crate::http::{ParseError, StatusCode};
use crate::workers::PoolError;
use std::io;
use std::path::PathBuf;

/// Errores al iniciar o ejecutar el servidor
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("document root {} is not accessible", path.display())]
    InvalidRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("document root {} is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("cannot open error log {}", path.display())]
    ErrorLog {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot bind {address}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    #[error("listener error")]
    Listener(#[source] io::Error),

    #[error(transparent)]
    Pool(#[from] PoolError),
}

/// Errores al atender una conexión
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    #[error("i/o error")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    /// URI absoluta sin path
    #[error("malformed request URI: {0:?}")]
    MalformedUri(String),

    /// Se llegó al camino de error con un status sin página de error
    #[error("internal error: no error page for status {0}")]
    NoErrorBody(StatusCode),

    #[error("cannot serialize status snapshot")]
    Json(#[from] serde_json::Error),
}
