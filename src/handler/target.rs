//! # Resolución del Target
//! src/handler/target.rs
//!
//! Convierte el target de la request line en un path dentro del document
//! root. Pasos:
//!
//! 1. [`normalize`]: descarta el query string, `%20` → espacio, quita
//!    esquema y autoridad de una URI absoluta y agrega el `/` inicial
//! 2. [`resolve`]: aplica las restricciones y clasifica el destino
//!
//! Ningún destino puede quedar fuera del root, ni de forma léxica (`..`) ni
//! siguiendo enlaces simbólicos.

use std::fs;
use std::path::{Path, PathBuf};

/// Texto prohibido en cualquier parte de la request line
const RESTRICTED: &str = "etc/passwd";

/// Motivo por el que un target no se puede servir
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Responde 403
    Forbidden,

    /// URI absoluta sin path: se cierra sin respuesta
    NoPath,
}

/// Destino ya clasificado
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Forbidden,
    Directory(PathBuf),
    File(PathBuf),
    Missing(PathBuf),
}

impl Target {
    /// Path en disco, si lo hay
    pub fn path(&self) -> Option<&Path> {
        match self {
            Target::Forbidden => None,
            Target::Directory(path) | Target::File(path) | Target::Missing(path) => Some(path),
        }
    }
}

/// Normaliza el target crudo a un path absoluto respecto del root.
///
/// Para una URI absoluta el path debe empezar con el path del document root,
/// que se quita; si no, el resultado es [`Rejection::Forbidden`].
pub fn normalize(raw: &str, root: &Path) -> Result<String, Rejection> {
    let without_query = raw.split(['?', '#']).next().unwrap_or("");
    let decoded = without_query.replace("%20", " ");

    if decoded.starts_with('/') {
        return Ok(decoded);
    }

    if let Some((_, rest)) = decoded.split_once("://") {
        let path = match rest.find('/') {
            Some(index) => &rest[index..],
            None => return Err(Rejection::NoPath),
        };
        return strip_root(path, root).ok_or(Rejection::Forbidden);
    }

    Ok(format!("/{}", decoded))
}

/// Quita el path del root al inicio de `path`, respetando componentes
fn strip_root(path: &str, root: &Path) -> Option<String> {
    let root = root.to_string_lossy();
    let root = root.trim_end_matches('/');
    let rest = path.strip_prefix(root)?;

    if rest.is_empty() {
        Some("/".to_string())
    } else if rest.starts_with('/') {
        Some(rest.to_string())
    } else {
        None
    }
}

/// `true` si la request line contiene texto restringido
pub fn is_restricted(request_line: &str) -> bool {
    request_line.contains(RESTRICTED)
}

/// Path relativo al root resuelto de forma léxica.
///
/// Retorna `None` si algún `..` sube por encima del root.
pub fn lexical_relative(path: &str) -> Option<PathBuf> {
    let mut segments: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop()?;
            }
            name => segments.push(name),
        }
    }

    Some(segments.iter().collect())
}

/// Resuelve el path normalizado contra el root.
///
/// `root` debe ser canónico. Todo destino existente se canonicaliza y debe
/// seguir dentro del root; así un enlace simbólico no puede escapar.
pub fn resolve(root: &Path, request_line: &str, path: &str) -> Target {
    if is_restricted(request_line) {
        return Target::Forbidden;
    }

    let relative = if path.contains("..") || path.contains('~') {
        match lexical_relative(path) {
            Some(relative) => relative,
            None => return Target::Forbidden,
        }
    } else {
        // Sin `..` la resolución léxica no puede fallar
        lexical_relative(path).unwrap_or_default()
    };

    let full = root.join(relative);

    let canonical = match fs::canonicalize(&full) {
        Ok(canonical) => canonical,
        Err(_) => return Target::Missing(full),
    };

    if !canonical.starts_with(root) {
        return Target::Forbidden;
    }

    match fs::metadata(&canonical) {
        Ok(metadata) if metadata.is_dir() => Target::Directory(full),
        Ok(metadata) if metadata.is_file() => Target::File(full),
        _ => Target::Missing(full),
    }
}

/// Extensión usada para el `Content-Type`.
///
/// Directorios: `html`. Archivos: lo que sigue al último `.` del nombre, o
/// `txt` si no hay punto.
pub fn extension_of(target: &Target) -> &str {
    match target {
        Target::Directory(_) => "html",
        Target::File(path) | Target::Missing(path) => path
            .file_name()
            .and_then(|name| name.to_str())
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext)
            .unwrap_or("txt"),
        Target::Forbidden => "html",
    }
}
