//! # Fechas HTTP
//! src/http/date.rs
//!
//! Formateo RFC 1123 (GMT) para `Date` y `Last-Modified`, y parseo de los tres
//! formatos que aceptan `If-Modified-Since` / `If-Unmodified-Since`:
//!
//! ```text
//! Sun, 06 Nov 1994 08:49:37 GMT    ; RFC 1123
//! Sunday, 06-Nov-94 08:49:37 GMT   ; RFC 850
//! Sun Nov  6 08:49:37 1994         ; asctime()
//! ```

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Último segundo representable: 9999-12-31 23:59:59 GMT
const MAX_HTTP_DATE_SECS: u64 = 253_402_300_799;

/// Formatea en RFC 1123. Fechas fuera de 1970..=9999 se acotan al extremo
/// más cercano.
pub fn format(time: SystemTime) -> String {
    httpdate::fmt_http_date(clamp(time))
}

fn clamp(time: SystemTime) -> SystemTime {
    let max = UNIX_EPOCH + Duration::from_secs(MAX_HTTP_DATE_SECS);
    if time < UNIX_EPOCH {
        UNIX_EPOCH
    } else if time > max {
        max
    } else {
        time
    }
}

/// Fecha actual en formato HTTP
pub fn now() -> String {
    format(SystemTime::now())
}

pub fn parse(value: &str) -> Option<SystemTime> {
    httpdate::parse_http_date(value.trim()).ok()
}

/// Las fechas HTTP tienen resolución de segundos; el mtime del disco no.
pub fn truncate_to_seconds(time: SystemTime) -> SystemTime {
    let secs = time
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    UNIX_EPOCH + Duration::from_secs(secs)
}
