//! # Páginas HTML generadas
//! src/http/html.rs
//!
//! Utilidades mínimas para las páginas que arma el servidor: errores,
//! listados de directorio y panel de administración.

/// Escapa los caracteres especiales de HTML
pub fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Envuelve `body` (ya escapado) en un documento HTML con título
pub fn page(title: &str, body: &str) -> String {
    format!(
        "<html>\n<head><title>{}</title></head>\n<body>\n{}\n</body>\n</html>\n",
        escape(title),
        body
    )
}

/// Pie de página con la fecha de generación
pub fn footer() -> String {
    format!("<p><hr><br><i>{}</i></p>", super::date::now())
}
