//! # GET Condicional
//! src/handler/conditional.rs
//!
//! Evalúa `If-Modified-Since` y `If-Unmodified-Since` contra la fecha de
//! modificación del destino. Solo se llama cuando el status sigue en 200.

use crate::http::{date, HeaderSet, StatusCode};
use std::time::SystemTime;

/// Resultado de las precondiciones: 200, 304 o 412.
///
/// - `If-Modified-Since`: modificado en o antes de la fecha → 304
/// - `If-Unmodified-Since`: modificado en o antes de la fecha → 412
///
/// Una fecha que no se puede parsear produce 304 o 412 respectivamente.
/// Si el primero ya dio 304, el segundo no se evalúa.
pub fn evaluate(headers: &HeaderSet, last_modified: SystemTime) -> StatusCode {
    let last_modified = date::truncate_to_seconds(last_modified);

    if let Some(value) = headers.if_modified_since() {
        if not_after(value, last_modified, "If-Modified-Since") {
            return StatusCode::NotModified;
        }
    }

    if let Some(value) = headers.if_unmodified_since() {
        if not_after(value, last_modified, "If-Unmodified-Since") {
            return StatusCode::PreconditionFailed;
        }
    }

    StatusCode::Ok
}

/// `last_modified <= value`; una fecha inválida cuenta como verdadero
fn not_after(value: &str, last_modified: SystemTime, header: &str) -> bool {
    match date::parse(value) {
        Some(since) => last_modified <= since,
        None => {
            tracing::debug!(header, value, "unparsable date");
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    const NOV_1994: &str = "Sun, 06 Nov 1994 08:49:37 GMT";

    fn at(secs: u64) -> SystemTime {
        UNIX_EPOCH + Duration::from_secs(secs)
    }

    fn headers(lines: &[&str]) -> HeaderSet {
        let mut headers = HeaderSet::new();
        for line in lines {
            headers.push_line(line);
        }
        headers
    }

    #[test]
    fn test_no_conditional_headers() {
        assert_eq!(evaluate(&HeaderSet::new(), at(784_111_777)), StatusCode::Ok);
    }

    #[test]
    fn test_if_modified_since_equal_or_later() {
        let set = headers(&[format!("If-Modified-Since: {}", NOV_1994).as_str()]);

        assert_eq!(evaluate(&set, at(784_111_777)), StatusCode::NotModified);
        assert_eq!(evaluate(&set, at(784_000_000)), StatusCode::NotModified);
    }

    #[test]
    fn test_if_modified_since_earlier_date() {
        let set = headers(&[format!("If-Modified-Since: {}", NOV_1994).as_str()]);
        assert_eq!(evaluate(&set, at(784_111_778)), StatusCode::Ok);
    }

    #[test]
    fn test_subsecond_mtime_is_truncated() {
        let set = headers(&[format!("If-Modified-Since: {}", NOV_1994).as_str()]);
        let mtime = at(784_111_777) + Duration::from_millis(900);
        assert_eq!(evaluate(&set, mtime), StatusCode::NotModified);
    }

    #[test]
    fn test_if_unmodified_since() {
        let set = headers(&[format!("If-Unmodified-Since: {}", NOV_1994).as_str()]);

        assert_eq!(evaluate(&set, at(784_111_777)), StatusCode::PreconditionFailed);
        assert_eq!(evaluate(&set, at(784_111_900)), StatusCode::Ok);
    }

    #[test]
    fn test_unparsable_dates_degrade() {
        let set = headers(&["If-Modified-Since: someday"]);
        assert_eq!(evaluate(&set, at(1)), StatusCode::NotModified);

        let set = headers(&["If-Unmodified-Since: someday"]);
        assert_eq!(evaluate(&set, at(1)), StatusCode::PreconditionFailed);
    }

    #[test]
    fn test_not_modified_wins_over_unmodified_since() {
        let set = headers(&[
            format!("If-Modified-Since: {}", NOV_1994).as_str(),
            format!("If-Unmodified-Since: {}", NOV_1994).as_str(),
        ]);
        assert_eq!(evaluate(&set, at(784_111_777)), StatusCode::NotModified);
    }

    #[test]
    fn test_rfc850_and_asctime_dates() {
        let set = headers(&["If-Modified-Since: Sunday, 06-Nov-94 08:49:37 GMT"]);
        assert_eq!(evaluate(&set, at(784_111_777)), StatusCode::NotModified);

        let set = headers(&["If-Modified-Since: Sun Nov  6 08:49:37 1994"]);
        assert_eq!(evaluate(&set, at(784_111_778)), StatusCode::Ok);
    }
}
