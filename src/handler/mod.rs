//! # Handler de Conexiones
//! src/handler/mod.rs
//!
//! Máquina de estados del protocolo para una conexión:
//!
//! ```text
//! request line → método → admin? → versión → target → guardas
//!   → headers → status → headers de respuesta → body → cierre
//! ```
//!
//! Precedencia de status: 405 > 400 (falta `Host`) > 404 > condicional > 200.
//! Un 403 se envía de inmediato, sin leer los headers.

pub mod conditional;
pub mod listing;
pub mod target;

use crate::error::HandlerError;
use crate::http::request::read_line;
use crate::http::{
    date, mime, HeaderSet, Method, ParseError, RequestLine, Response, StatusCode, Version,
};
use crate::server::admin::{self, AdminEndpoint};
use crate::server::context::{Connection, ServerContext};
use crate::workers::Worker;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Read, Write};
use std::net::{Shutdown, TcpStream};
use target::{Rejection, Target};

/// Máximo de bytes de body que se descartan en un POST
pub const MAX_DRAINED_BODY: u64 = 1024 * 1024;

/// Atiende una conexión completa y la cierra.
///
/// Las fallas se registran en el log de errores; nunca se propagan al
/// worker.
pub fn handle_connection(ctx: &ServerContext, worker: &Worker, connection: Connection) {
    let Connection { stream, peer } = connection;

    match serve(ctx, worker, &stream) {
        Ok(status) => tracing::debug!(%peer, worker = worker.name(), status = status.as_u16(), "request served"),
        Err(HandlerError::Parse(ParseError::EmptyRequest)) => {
            tracing::debug!(%peer, "connection closed without a request");
        }
        Err(e) => ctx
            .error_log()
            .append_with(&format!("Request from {} failed", peer), &e),
    }

    if let Err(e) = stream.shutdown(Shutdown::Both) {
        if e.kind() != io::ErrorKind::NotConnected {
            ctx.error_log().append_with("Cannot close socket", &e);
        }
    }
}

/// Configura el socket, arma lector y escritor con buffer y procesa el
/// request. El escritor se vacía aunque el procesamiento falle.
fn serve(ctx: &ServerContext, worker: &Worker, stream: &TcpStream) -> Result<StatusCode, HandlerError> {
    stream.set_read_timeout(Some(ctx.socket_timeout()))?;
    stream.set_write_timeout(Some(ctx.socket_timeout()))?;

    let mut reader = BufReader::new(stream);
    let mut writer = BufWriter::new(stream);

    let result = process(ctx, worker, &mut reader, &mut writer);

    if let Err(e) = writer.flush() {
        ctx.error_log().append_with("Cannot flush response", &e);
    }

    result
}

/// Procesa un request completo leyendo de `reader` y escribiendo en `writer`.
///
/// Retorna el status enviado. Los errores significan que se cierra la
/// conexión sin (o con parte de) una respuesta.
pub fn process<R: BufRead, W: Write>(
    ctx: &ServerContext,
    worker: &Worker,
    reader: &mut R,
    writer: &mut W,
) -> Result<StatusCode, HandlerError> {
    let line = match read_line(reader)? {
        Some(line) if !line.trim().is_empty() => line,
        _ => return Err(ParseError::EmptyRequest.into()),
    };
    let request = RequestLine::parse(&line)?;

    let mut status = if request.method().is_allowed() {
        StatusCode::Ok
    } else {
        StatusCode::MethodNotAllowed
    };

    if *request.method() == Method::GET {
        if let Some(endpoint) = AdminEndpoint::from_target(request.target()) {
            return admin::respond(ctx, endpoint, &request, writer);
        }
    }

    let version = request.version()?;
    let root = ctx.document_root();

    let path = match target::normalize(request.target(), root) {
        Ok(path) => path,
        Err(Rejection::NoPath) => return Err(HandlerError::MalformedUri(request.target().to_string())),
        Err(Rejection::Forbidden) => return send_error(writer, StatusCode::Forbidden, version),
    };

    let target = target::resolve(root, request.raw(), &path);
    if target == Target::Forbidden {
        return send_error(writer, StatusCode::Forbidden, version);
    }
    if let Some(resolved) = target.path() {
        worker.set_current_path(resolved);
    }

    let headers = HeaderSet::read_from(reader)?;

    if version == Version::Http11 && headers.host().is_none() && status == StatusCode::Ok {
        status = StatusCode::BadRequest;
    }
    if status == StatusCode::Ok && matches!(target, Target::Missing(_)) {
        status = StatusCode::NotFound;
    }

    if *request.method() == Method::POST {
        drain_body(reader, &headers);
    }

    let include_body = *request.method() != Method::HEAD;

    if !status.is_success() {
        return send_error_with_body(writer, status, version, include_body);
    }

    let response = match target_response(ctx, &target, &headers, version)? {
        Some(response) => response,
        None => return Err(HandlerError::NoErrorBody(status)),
    };

    let status = response.status();
    let include_body = include_body && status == StatusCode::Ok;
    response.write_to(writer, version, include_body)?;

    Ok(status)
}

/// Respuesta para un destino existente: 200, 304 o 412
fn target_response(
    ctx: &ServerContext,
    target: &Target,
    headers: &HeaderSet,
    version: Version,
) -> Result<Option<Response>, HandlerError> {
    let (metadata, body) = match target {
        Target::File(path) => {
            let file = File::open(path)?;
            (file.metadata()?, Some(file))
        }
        Target::Directory(path) => (std::fs::metadata(path)?, None),
        Target::Missing(_) | Target::Forbidden => return Ok(None),
    };

    let last_modified = metadata.modified()?;

    // En HTTP/1.0 los headers no afectan el status
    if version == Version::Http11 {
        let status = conditional::evaluate(headers, last_modified);
        if status != StatusCode::Ok {
            return Ok(Some(Response::with_general_headers(status)));
        }
    }

    let response = Response::with_general_headers(StatusCode::Ok)
        .with_header("Content-Type", mime::content_type_for(target::extension_of(target)))
        .with_header("Last-Modified", &date::format(last_modified));

    let response = match (target, body) {
        (_, Some(file)) => response.with_file(file, metadata.len()),
        (Target::Directory(path), None) => {
            let page = listing::render(ctx.document_root(), path)?;
            response.with_body(&page)
        }
        _ => return Ok(None),
    };

    Ok(Some(response))
}

fn send_error<W: Write>(writer: &mut W, status: StatusCode, version: Version) -> Result<StatusCode, HandlerError> {
    send_error_with_body(writer, status, version, true)
}

fn send_error_with_body<W: Write>(
    writer: &mut W,
    status: StatusCode,
    version: Version,
    include_body: bool,
) -> Result<StatusCode, HandlerError> {
    let response = Response::error_page(status).ok_or(HandlerError::NoErrorBody(status))?;
    response.write_to(writer, version, include_body)?;
    Ok(status)
}

/// Descarta el body de un POST para que el cierre no resetee la conexión
/// antes de que el cliente lea la respuesta
fn drain_body<R: BufRead>(reader: &mut R, headers: &HeaderSet) {
    let Some(length) = headers.content_length() else {
        return;
    };

    let limit = length.min(MAX_DRAINED_BODY);
    tracing::debug!(
        length,
        content_type = headers.content_type().unwrap_or("-"),
        "draining request body"
    );
    if let Err(e) = io::copy(&mut reader.by_ref().take(limit), &mut io::sink()) {
        tracing::debug!(error = %e, "cannot drain request body");
    }
}
