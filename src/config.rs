//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración del servidor de archivos con soporte para argumentos CLI y
//! variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./docserve --port 8080 \
//!   --root ./www \
//!   --workers 10 \
//!   --queue-capacity 1000 \
//!   --socket-timeout 5000
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=8080 DOC_ROOT=/srv/www LOG_LEVEL=debug ./docserve
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::Level;

/// Configuración del servidor de archivos
#[derive(Debug, Clone, Parser)]
#[command(name = "docserve")]
#[command(about = "Servidor HTTP/1.0 - HTTP/1.1 de archivos estáticos con pool de workers")]
#[command(version)]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "8080", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha
    #[arg(long, default_value = "127.0.0.1", env = "HTTP_HOST")]
    pub host: String,

    /// Directorio raíz de los documentos
    #[arg(long, default_value = "./www", env = "DOC_ROOT")]
    pub root: PathBuf,

    // === Workers ===
    /// Número de workers que atienden conexiones
    #[arg(long, default_value = "10", env = "WORKERS")]
    pub workers: usize,

    /// Capacidad máxima de la cola de conexiones pendientes
    #[arg(long = "queue-capacity", default_value = "1000", env = "QUEUE_CAPACITY")]
    pub queue_capacity: usize,

    // === Timeouts ===
    /// Timeout de lectura/escritura del socket en milisegundos
    #[arg(long = "socket-timeout", default_value = "5000", env = "SOCKET_TIMEOUT")]
    pub socket_timeout_ms: u64,

    /// Intervalo con que el aceptador revisa la señal de apagado (ms)
    #[arg(long = "accept-poll", default_value = "50", env = "ACCEPT_POLL")]
    pub accept_poll_ms: u64,

    // === Logs ===
    /// Nombre del log de errores, dentro del directorio raíz
    #[arg(long = "error-log", default_value = "errorlog.txt", env = "ERROR_LOG")]
    pub error_log: String,

    /// Nivel de log (trace, debug, info, warn, error)
    #[arg(long = "log-level", default_value = "info", env = "LOG_LEVEL")]
    pub log_level: Level,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use docserve::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "127.0.0.1:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn socket_timeout(&self) -> Duration {
        Duration::from_millis(self.socket_timeout_ms)
    }

    pub fn accept_poll(&self) -> Duration {
        Duration::from_millis(self.accept_poll_ms)
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == 0 {
            return Err("Workers must be >= 1".to_string());
        }

        if self.queue_capacity == 0 {
            return Err("Queue capacity must be >= 1".to_string());
        }

        if self.socket_timeout_ms == 0 {
            return Err("Socket timeout must be > 0".to_string());
        }
        if self.accept_poll_ms == 0 {
            return Err("Accept poll interval must be > 0".to_string());
        }

        // El log vive dentro del root: solo se acepta un nombre de archivo
        if self.error_log.is_empty()
            || self.error_log.contains(['/', '\\'])
            || self.error_log == "."
            || self.error_log == ".."
        {
            return Err("Error log must be a plain file name".to_string());
        }

        Ok(())
    }

    /// Registra un resumen de la configuración
    pub fn log_summary(&self) {
        tracing::info!(
            address = %self.address(),
            root = %self.root.display(),
            "network"
        );
        tracing::info!(
            workers = self.workers,
            queue_capacity = self.queue_capacity,
            socket_timeout_ms = self.socket_timeout_ms,
            accept_poll_ms = self.accept_poll_ms,
            "worker pool"
        );
        tracing::info!(error_log = %self.error_log, log_level = %self.log_level, "logs");
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 8080,
            host: "127.0.0.1".to_string(),
            root: PathBuf::from("./www"),
            workers: 10,
            queue_capacity: 1000,
            socket_timeout_ms: 5_000,
            accept_poll_ms: 50,
            error_log: "errorlog.txt".to_string(),
            log_level: Level::INFO,
        }
    }
}
