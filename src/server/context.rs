//! # Contexto del Servidor
//! src/server/context.rs
//!
//! Estado compartido por el aceptador, los workers y los endpoints de
//! administración. Se crea una vez por servidor y se comparte con `Arc`.

use crate::errorlog::ErrorLog;
use crate::handler;
use crate::server::shutdown::ShutdownSignal;
use crate::workers::{BoundedQueue, Handler, Worker, WorkerPool};
use std::net::{SocketAddr, TcpStream};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// Conexión aceptada a la espera de un worker
#[derive(Debug)]
pub struct Connection {
    pub stream: TcpStream,
    pub peer: SocketAddr,
}

/// Estado compartido del servidor
#[derive(Debug)]
pub struct ServerContext {
    document_root: PathBuf,
    socket_timeout: Duration,
    error_log: ErrorLog,
    queue: Arc<BoundedQueue<Connection>>,
    pool: WorkerPool<Connection>,
    shutdown: ShutdownSignal,

    /// Serializa las operaciones de administración
    admin_lock: Mutex<()>,
}

impl ServerContext {
    /// Crea el contexto con su cola y su pool (sin lanzar los hilos).
    ///
    /// `document_root` debe ser canónico.
    pub fn new(
        document_root: PathBuf,
        socket_timeout: Duration,
        error_log: ErrorLog,
        workers: usize,
        queue_capacity: usize,
    ) -> Self {
        let queue = Arc::new(BoundedQueue::new(queue_capacity));
        let pool = WorkerPool::new(Arc::clone(&queue), workers);

        Self {
            document_root,
            socket_timeout,
            error_log,
            queue,
            pool,
            shutdown: ShutdownSignal::new(),
            admin_lock: Mutex::new(()),
        }
    }

    pub fn document_root(&self) -> &Path {
        &self.document_root
    }

    pub fn socket_timeout(&self) -> Duration {
        self.socket_timeout
    }

    pub fn error_log(&self) -> &ErrorLog {
        &self.error_log
    }

    pub fn queue(&self) -> &Arc<BoundedQueue<Connection>> {
        &self.queue
    }

    pub fn pool(&self) -> &WorkerPool<Connection> {
        &self.pool
    }

    pub fn shutdown_signal(&self) -> &ShutdownSignal {
        &self.shutdown
    }

    /// Toma el lock de administración
    pub fn lock_admin(&self) -> MutexGuard<'_, ()> {
        self.admin_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Inicia el apagado: termina el pool, activa la señal y cierra la cola.
    ///
    /// Las conexiones que seguían en cola se cierran sin respuesta. No espera a
    /// los workers (puede llamarse desde uno de ellos); eso lo hace
    /// `Server::run`. Idempotente.
    pub fn shutdown(&self) {
        self.pool.terminate();

        if self.shutdown.trigger() {
            tracing::info!("shutdown requested");
        }

        let pending = self.queue.close();
        if !pending.is_empty() {
            tracing::info!(dropped = pending.len(), "closing queued connections");
        }
    }
}

impl Handler<Connection> for ServerContext {
    fn handle(&self, worker: &Worker, connection: Connection) {
        handler::handle_connection(self, worker, connection);
    }

    fn on_panic(&self, worker: &Worker, message: &str) {
        self.error_log
            .append(&format!("Worker {} panicked: {}", worker.name(), message));
    }
}
