//! # Módulo del Servidor
//! src/server/mod.rs
//!
//! - `tcp`: bind, loop de aceptación y ciclo de vida del servidor
//! - `context`: estado compartido (root, log, cola, pool, señal de apagado)
//! - `admin`: endpoints `/control`, `/shutdown` y `/errorlog`
//! - `shutdown`: señal de apagado

pub mod admin;
pub mod context;
pub mod shutdown;
pub mod tcp;

// Re-exportar para facilitar el uso
pub use context::{Connection, ServerContext};
pub use shutdown::ShutdownSignal;
pub use tcp::Server;
