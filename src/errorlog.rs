//! # Log de Errores
//! src/errorlog.rs
//!
//! Archivo de texto compartido, solo de escritura al final, donde el servidor
//! registra las fallas de las conexiones. Lo lee el endpoint `/errorlog`.
//!
//! ## Formato de una entrada
//!
//! ```text
//! Error at: Sun, 06 Nov 1994 08:49:37 GMT
//! Request from 127.0.0.1:51234 failed
//! i/o error
//! caused by: connection reset by peer
//!
//! ```

use crate::http::date;
use std::error::Error;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

/// Log de errores compartido entre todos los workers
#[derive(Debug)]
pub struct ErrorLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl ErrorLog {
    /// Abre (o crea) el archivo en modo append
    pub fn open(path: impl Into<PathBuf>) -> io::Result<Self> {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Agrega una entrada con solo el mensaje
    pub fn append(&self, message: &str) {
        tracing::warn!("{}", message);
        self.write_entry(message, None);
    }

    /// Agrega una entrada con el detalle de la falla y sus causas
    pub fn append_with(&self, message: &str, error: &dyn Error) {
        tracing::warn!(error = %error, "{}", message);

        let mut detail = error.to_string();
        let mut source = error.source();
        while let Some(cause) = source {
            detail.push_str("\ncaused by: ");
            detail.push_str(&cause.to_string());
            source = cause.source();
        }

        self.write_entry(message, Some(&detail));
    }

    /// Contenido completo del log
    pub fn contents(&self) -> io::Result<String> {
        // Con el lock tomado no se leen entradas a medio escribir
        let _guard = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        fs::read_to_string(&self.path)
    }

    fn write_entry(&self, message: &str, detail: Option<&str>) {
        let mut entry = format!("Error at: {}\n{}\n", date::now(), message);
        if let Some(detail) = detail {
            entry.push_str(detail);
            entry.push('\n');
        }
        entry.push('\n');

        let mut file = self.file.lock().unwrap_or_else(PoisonError::into_inner);
        if let Err(e) = file.write_all(entry.as_bytes()).and_then(|_| file.flush()) {
            // Si el log falla solo queda el log de tracing
            tracing::error!(path = %self.path.display(), error = %e, "cannot write error log");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HandlerError;
    use temp_dir::TempDir;

    #[test]
    fn test_append_and_read() {
        let dir = TempDir::new().unwrap();
        let log = ErrorLog::open(dir.child("errorlog.txt")).unwrap();

        log.append("first failure");

        let contents = log.contents().unwrap();
        assert!(contents.starts_with("Error at: "));
        assert!(contents.contains("first failure\n"));
        assert!(contents.ends_with("\n\n"));
    }

    #[test]
    fn test_append_with_error_chain() {
        let dir = TempDir::new().unwrap();
        let log = ErrorLog::open(dir.child("errorlog.txt")).unwrap();

        let error = io::Error::new(io::ErrorKind::ConnectionReset, "peer went away");
        log.append_with("Request failed", &error);

        let contents = log.contents().unwrap();
        assert!(contents.contains("Request failed\npeer went away\n"));
    }

    #[test]
    fn test_io_error_detail_is_not_repeated() {
        let dir = TempDir::new().unwrap();
        let log = ErrorLog::open(dir.child("errorlog.txt")).unwrap();
        let cause = io::Error::new(io::ErrorKind::ConnectionReset, "reset by peer");
        let error = HandlerError::from(cause);

        log.append_with("Request failed", &error);

        let contents = log.contents().unwrap();
        assert!(contents.contains("i/o error\ncaused by: reset by peer\n"));
        assert_eq!(contents.matches("reset by peer").count(), 1);
    }

    #[test]
    fn test_reopen_appends() {
        let dir = TempDir::new().unwrap();
        let path = dir.child("errorlog.txt");

        ErrorLog::open(&path).unwrap().append("one");
        ErrorLog::open(&path).unwrap().append("two");

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.matches("Error at: ").count(), 2);
        assert!(contents.find("one").unwrap() < contents.find("two").unwrap());
    }

    #[test]
    fn test_concurrent_appends_do_not_interleave() {
        let dir = TempDir::new().unwrap();
        let log = std::sync::Arc::new(ErrorLog::open(dir.child("errorlog.txt")).unwrap());

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let log = std::sync::Arc::clone(&log);
                std::thread::spawn(move || {
                    for j in 0..25 {
                        log.append(&format!("thread {} entry {}", i, j));
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let contents = log.contents().unwrap();
        let entries: Vec<&str> = contents.split("\n\n").filter(|e| !e.is_empty()).collect();
        assert_eq!(entries.len(), 100);
        assert!(entries.iter().all(|e| e.starts_with("Error at: ") && e.lines().count() == 2));
    }
}
