//! # Endpoints de Administración
//! src/server/admin.rs
//!
//! | Path        | Acción                                         |
//! |-------------|------------------------------------------------|
//! | `/control`  | Panel con los workers activos y la cola        |
//! | `/shutdown` | Página de confirmación y apagado del servidor  |
//! | `/errorlog` | Contenido del log de errores                   |
//!
//! Solo se atienden con GET. Las operaciones se serializan con el lock de
//! administración del contexto.

use crate::error::HandlerError;
use crate::http::{html, RequestLine, Response, StatusCode, Version};
use crate::server::context::ServerContext;
use crate::workers::WorkerSnapshot;
use serde::Serialize;
use std::io::Write;

/// Endpoint reservado
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminEndpoint {
    Control,
    Shutdown,
    ErrorLog,
}

impl AdminEndpoint {
    /// Reconoce un target que empieza con un path reservado
    pub fn from_target(target: &str) -> Option<Self> {
        if target.starts_with("/control") {
            Some(AdminEndpoint::Control)
        } else if target.starts_with("/shutdown") {
            Some(AdminEndpoint::Shutdown)
        } else if target.starts_with("/errorlog") {
            Some(AdminEndpoint::ErrorLog)
        } else {
            None
        }
    }
}

/// Estado del servidor que muestra `/control`
#[derive(Debug, Clone, Serialize)]
pub struct StatusSnapshot {
    pub workers: Vec<WorkerSnapshot>,
    pub queue_len: usize,
    pub queue_capacity: usize,
}

impl StatusSnapshot {
    pub fn capture(ctx: &ServerContext) -> Self {
        Self {
            workers: ctx.pool().active_snapshots(),
            queue_len: ctx.queue().len(),
            queue_capacity: ctx.queue().capacity(),
        }
    }
}

/// Atiende un endpoint de administración y escribe la respuesta
pub fn respond<W: Write>(
    ctx: &ServerContext,
    endpoint: AdminEndpoint,
    request: &RequestLine,
    writer: &mut W,
) -> Result<StatusCode, HandlerError> {
    let _guard = ctx.lock_admin();
    // Se atiende antes de negociar la versión
    let version = request.version().unwrap_or(Version::Http10);

    tracing::info!(endpoint = ?endpoint, "admin request");

    match endpoint {
        AdminEndpoint::Control => {
            let snapshot = StatusSnapshot::capture(ctx);
            let response = if wants_json(request.target()) {
                Response::with_general_headers(StatusCode::Ok)
                    .with_header("Content-Type", "application/json")
                    .with_body(&serde_json::to_string_pretty(&snapshot)?)
            } else {
                html_response(&control_page(&snapshot))
            };
            response.write_to(writer, version, true)?;
        }
        AdminEndpoint::Shutdown => {
            let page = html::page(
                "Shutdown",
                "<h2>Server is shutting down</h2>\n<p>Pending connections will be closed.</p>",
            );
            if let Err(e) = html_response(&page).write_to(writer, version, true) {
                ctx.error_log()
                    .append_with("Cannot write shutdown confirmation", &e);
            }
            ctx.shutdown();
        }
        AdminEndpoint::ErrorLog => {
            let contents = ctx.error_log().contents()?;
            html_response(&errorlog_page(&contents)).write_to(writer, version, true)?;
        }
    }

    Ok(StatusCode::Ok)
}

fn html_response(page: &str) -> Response {
    Response::with_general_headers(StatusCode::Ok)
        .with_header("Content-Type", "text/html")
        .with_body(page)
}

fn wants_json(target: &str) -> bool {
    target
        .split_once('?')
        .map(|(_, query)| query.split('&').any(|pair| pair == "format=json"))
        .unwrap_or(false)
}

fn control_page(snapshot: &StatusSnapshot) -> String {
    let mut rows = String::new();
    for worker in &snapshot.workers {
        rows.push_str(&format!(
            "<tr><td>{}</td><td>{}</td></tr>\n",
            html::escape(&worker.name),
            html::escape(worker.status_label())
        ));
    }

    let body = format!(
        "<h2>Server Control Panel</h2>\n\
         <p>Queue: {} / {}</p>\n\
         <table>\n<tr><th>Worker</th><th>Serving</th></tr>\n{}</table>\n\
         <p><a href=\"shutdown\">Shutdown server</a></p>\n\
         <p><a href=\"errorlog\">View error log</a></p>\n{}",
        snapshot.queue_len,
        snapshot.queue_capacity,
        rows,
        html::footer()
    );

    html::page("Server Control Panel", &body)
}

fn errorlog_page(contents: &str) -> String {
    let mut body = String::from("<h2>Error Log</h2>\n<p>\n");
    for line in contents.lines() {
        body.push_str(&html::escape(line));
        body.push_str("<br>\n");
    }
    body.push_str("</p>");

    html::page("Error Log", &body)
}
