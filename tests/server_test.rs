//! Tests de integración del servidor
//! tests/server_test.rs
//!
//! Cada test levanta un servidor real en `127.0.0.1:0` con un document root
//! temporal y habla con él por TCP.

use docserve::config::Config;
use docserve::server::{Server, ShutdownSignal};
use std::fs;
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use temp_dir::TempDir;

const INDEX: &str = "<html><body><h1>Welcome</h1></body></html>";

/// Servidor corriendo en un hilo aparte
struct TestServer {
    dir: TempDir,
    addr: SocketAddr,
    signal: ShutdownSignal,
    handle: Option<JoinHandle<()>>,
}

impl TestServer {
    fn start() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.child("index.html"), INDEX).unwrap();
        fs::write(dir.child("style.css"), "h1 { color: red; }").unwrap();
        fs::create_dir(dir.child("docs")).unwrap();
        fs::write(dir.child("docs").join("guide one.txt"), "guide").unwrap();

        let config = Config {
            port: 0,
            root: dir.path().to_path_buf(),
            workers: 3,
            queue_capacity: 8,
            socket_timeout_ms: 2_000,
            accept_poll_ms: 10,
            ..Config::default()
        };

        let server = Server::bind(&config).expect("bind");
        let addr = server.local_addr().unwrap();
        let signal = server.shutdown_signal();
        let handle = thread::spawn(move || server.run().expect("run"));

        Self {
            dir,
            addr,
            signal,
            handle: Some(handle),
        }
    }

    /// Envía el request crudo y retorna la response completa
    fn send(&self, raw: &str) -> String {
        let mut stream = TcpStream::connect(self.addr).unwrap();
        stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
        stream.write_all(raw.as_bytes()).unwrap();
        stream.flush().unwrap();

        let mut response = Vec::new();
        stream.read_to_end(&mut response).unwrap();
        String::from_utf8_lossy(&response).into_owned()
    }

    fn wait(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.join().unwrap();
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.signal.trigger();
        self.wait();
    }
}

/// Helper: separa headers y body
fn split(response: &str) -> (&str, &str) {
    response.split_once("\r\n\r\n").unwrap_or((response, ""))
}

// ==================== Escenarios principales ====================

#[test]
fn test_get_index_html() {
    let server = TestServer::start();
    let response = server.send("GET /index.html HTTP/1.1\r\nHost: localhost\r\n\r\n");
    let (head, body) = split(&response);

    assert!(head.starts_with("HTTP/1.1 200 OK\r\n"), "got: {}", head);
    assert!(head.contains("Content-Type: text/html"));
    assert!(head.contains(&format!("Content-Length: {}", INDEX.len())));
    assert!(head.contains("Date: "));
    assert!(head.contains("Server: "));
    assert!(head.contains("Last-Modified: "));
    assert_eq!(body, INDEX);
}

#[test]
fn test_missing_file_returns_404() {
    let server = TestServer::start();
    let response = server.send("GET /missing.html HTTP/1.1\r\nHost: localhost\r\n\r\n");
    let (head, body) = split(&response);

    assert!(head.starts_with("HTTP/1.1 404 Not Found\r\n"), "got: {}", head);
    assert!(body.contains("Not Found"));
}

#[test]
fn test_traversal_returns_403() {
    let server = TestServer::start();
    let response = server.send("GET /../../etc/passwd HTTP/1.1\r\nHost: localhost\r\n\r\n");

    assert!(response.starts_with("HTTP/1.1 403 Forbidden\r\n"), "got: {}", response);
    assert!(!response.contains("root:"));
}

#[test]
fn test_delete_returns_405_with_allow() {
    let server = TestServer::start();
    let response = server.send("DELETE /index.html HTTP/1.1\r\nHost: localhost\r\n\r\n");
    let (head, _) = split(&response);

    assert!(head.starts_with("HTTP/1.1 405 Method Not Allowed\r\n"), "got: {}", head);
    assert!(head.contains("Allow: GET, HEAD, POST"));
}

#[test]
fn test_http11_without_host_returns_400() {
    let server = TestServer::start();
    let response = server.send("GET /index.html HTTP/1.1\r\n\r\n");

    assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"), "got: {}", response);
}

// ==================== Otros comportamientos ====================

#[test]
fn test_http10_without_host_is_ok() {
    let server = TestServer::start();
    let response = server.send("GET /style.css HTTP/1.0\r\n\r\n");
    let (head, body) = split(&response);

    assert!(head.starts_with("HTTP/1.0 200 OK\r\n"));
    assert!(head.contains("Content-Type: text/css"));
    assert_eq!(body, "h1 { color: red; }");
}

#[test]
fn test_head_returns_headers_only() {
    let server = TestServer::start();
    let response = server.send("HEAD /index.html HTTP/1.1\r\nHost: localhost\r\n\r\n");
    let (head, body) = split(&response);

    assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(head.contains(&format!("Content-Length: {}", INDEX.len())));
    assert!(body.is_empty());
}

#[test]
fn test_directory_listing() {
    let server = TestServer::start();
    let response = server.send("GET /docs/ HTTP/1.1\r\nHost: localhost\r\n\r\n");
    let (head, body) = split(&response);

    assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(head.contains("Content-Type: text/html"));
    assert!(body.contains("href=\"/docs/guide%20one.txt\""));
}

#[test]
fn test_file_with_space_in_name() {
    let server = TestServer::start();
    let response = server.send("GET /docs/guide%20one.txt HTTP/1.0\r\n\r\n");
    let (head, body) = split(&response);

    assert!(head.starts_with("HTTP/1.0 200 OK\r\n"));
    assert_eq!(body, "guide");
}

#[test]
fn test_conditional_get_not_modified() {
    let server = TestServer::start();
    let response = server.send("GET /index.html HTTP/1.1\r\nHost: localhost\r\n\r\n");
    let last_modified = response
        .lines()
        .find_map(|line| line.strip_prefix("Last-Modified: "))
        .unwrap()
        .to_string();

    let response = server.send(&format!(
        "GET /index.html HTTP/1.1\r\nHost: localhost\r\nIf-Modified-Since: {}\r\n\r\n",
        last_modified
    ));
    let (head, body) = split(&response);

    assert!(head.starts_with("HTTP/1.1 304 Not Modified\r\n"), "got: {}", head);
    assert!(body.is_empty());
}

#[test]
fn test_concurrent_clients() {
    let server = TestServer::start();
    let addr = server.addr;

    let clients: Vec<_> = (0..12)
        .map(|_| {
            thread::spawn(move || {
                let mut stream = TcpStream::connect(addr).unwrap();
                stream.set_read_timeout(Some(Duration::from_secs(5))).unwrap();
                stream.write_all(b"GET /index.html HTTP/1.0\r\n\r\n").unwrap();
                let mut response = String::new();
                stream.read_to_string(&mut response).unwrap();
                response
            })
        })
        .collect();

    for client in clients {
        let response = client.join().unwrap();
        assert!(response.starts_with("HTTP/1.0 200 OK\r\n"));
        assert!(response.ends_with(INDEX));
    }
}

// ==================== Administración ====================

#[test]
fn test_control_panel() {
    let server = TestServer::start();
    let response = server.send("GET /control HTTP/1.1\r\n\r\n");
    let (head, body) = split(&response);

    assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(body.contains("worker-1"));
    assert!(body.contains("href=\"shutdown\""));
    assert!(body.contains("href=\"errorlog\""));
}

#[test]
fn test_errorlog_records_bad_requests() {
    let server = TestServer::start();

    // Versión no soportada: se cierra sin respuesta y se registra
    let response = server.send("GET /index.html HTTP/2.0\r\n\r\n");
    assert!(response.is_empty());

    let response = server.send("GET /errorlog HTTP/1.1\r\n\r\n");
    let (head, body) = split(&response);

    assert!(head.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(body.contains("Error at: "));
    assert!(body.contains("unsupported HTTP version"));

    let on_disk = fs::read_to_string(server.dir.child("errorlog.txt")).unwrap();
    assert!(on_disk.contains("unsupported HTTP version"));
}

#[test]
fn test_shutdown_endpoint_stops_server() {
    let mut server = TestServer::start();
    let addr = server.addr;

    let response = server.send("GET /shutdown HTTP/1.1\r\n\r\n");
    assert!(response.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(response.contains("shutting down"));

    // Server::run retorna cuando todos los workers terminaron
    server.wait();

    assert!(TcpStream::connect(addr).is_err());
}
