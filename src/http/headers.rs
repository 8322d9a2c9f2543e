//! # Headers del Request
//! src/http/headers.rs
//!
//! Solo se reconoce un subconjunto fijo de headers; el resto se lee y se
//! descarta. Las líneas de continuación (empiezan con espacio o tab) se
//! agregan al último header reconocido:
//!
//! ```text
//! If-Modified-Since: Sun, 06 Nov 1994\r\n
//!  08:49:37 GMT\r\n
//! ```

use super::request::read_line;
use std::collections::HashMap;
use std::io::{self, BufRead};

/// Largo máximo de un valor, continuaciones incluidas
pub const MAX_VALUE_BYTES: usize = 8 * 1024;

/// Headers que el servidor interpreta
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownHeader {
    Host,
    IfModifiedSince,
    IfUnmodifiedSince,
    ContentType,
    ContentLength,
}

impl KnownHeader {
    /// Reconoce el nombre de un header (sin distinguir mayúsculas)
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        [
            KnownHeader::Host,
            KnownHeader::IfModifiedSince,
            KnownHeader::IfUnmodifiedSince,
            KnownHeader::ContentType,
            KnownHeader::ContentLength,
        ]
        .into_iter()
        .find(|header| header.as_str().eq_ignore_ascii_case(name))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            KnownHeader::Host => "Host",
            KnownHeader::IfModifiedSince => "If-Modified-Since",
            KnownHeader::IfUnmodifiedSince => "If-Unmodified-Since",
            KnownHeader::ContentType => "Content-Type",
            KnownHeader::ContentLength => "Content-Length",
        }
    }
}

/// Headers reconocidos de un request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSet {
    values: HashMap<KnownHeader, String>,

    /// Último header reconocido, destino de las continuaciones
    last: Option<KnownHeader>,
}

impl HeaderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Lee headers hasta la línea vacía o EOF
    pub fn read_from<R: BufRead>(reader: &mut R) -> io::Result<Self> {
        let mut headers = Self::new();

        // Sin límite de líneas: el timeout del socket acota la lectura
        while let Some(line) = read_line(reader)? {
            if line.trim().is_empty() {
                break;
            }
            headers.push_line(&line);
        }

        Ok(headers)
    }

    /// Procesa una línea de header
    pub fn push_line(&mut self, line: &str) {
        if line.starts_with([' ', '\t']) {
            // Continuación sin header previo reconocido: se ignora
            if let Some(header) = self.last {
                let folded = line.trim();
                if let Some(value) = self.values.get_mut(&header) {
                    if !folded.is_empty() && value.len() + folded.len() < MAX_VALUE_BYTES {
                        if !value.is_empty() {
                            value.push(' ');
                        }
                        value.push_str(folded);
                    }
                }
            }
            return;
        }

        self.last = None;

        let Some((name, value)) = line.split_once(':') else {
            return;
        };

        if let Some(header) = KnownHeader::from_name(name) {
            self.values.insert(header, value.trim().to_string());
            self.last = Some(header);
        }
    }

    pub fn get(&self, header: KnownHeader) -> Option<&str> {
        self.values.get(&header).map(String::as_str)
    }

    pub fn contains(&self, header: KnownHeader) -> bool {
        self.values.contains_key(&header)
    }

    pub fn host(&self) -> Option<&str> {
        self.get(KnownHeader::Host)
    }

    pub fn if_modified_since(&self) -> Option<&str> {
        self.get(KnownHeader::IfModifiedSince)
    }

    pub fn if_unmodified_since(&self) -> Option<&str> {
        self.get(KnownHeader::IfUnmodifiedSince)
    }

    pub fn content_type(&self) -> Option<&str> {
        self.get(KnownHeader::ContentType)
    }

    /// `Content-Length` si es un entero válido
    pub fn content_length(&self) -> Option<u64> {
        self.get(KnownHeader::ContentLength)?.parse().ok()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
