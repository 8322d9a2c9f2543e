//! # docserve
//! src/lib.rs
//!
//! Servidor HTTP/1.0 - HTTP/1.1 de archivos estáticos. Un hilo acepta
//! conexiones y las encola en una cola acotada; un pool fijo de workers las
//! atiende de principio a fin.
//!
//! ## Arquitectura
//!
//! - `http`: request line, headers, responses, status, MIME y fechas
//! - `workers`: cola acotada, workers y pool
//! - `handler`: máquina de estados del protocolo por conexión
//! - `server`: listener, contexto compartido y endpoints de administración
//! - `config`: configuración por CLI y variables de entorno
//! - `errorlog`: log de errores en texto plano
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use docserve::config::Config;
//! use docserve::server::Server;
//!
//! let config = Config::default();
//! let server = Server::bind(&config).expect("Error al iniciar servidor");
//! server.run().expect("Error en el servidor");
//! ```

pub mod config;
pub mod error;
pub mod errorlog;
pub mod handler;
pub mod http;
pub mod server;
pub mod workers;
