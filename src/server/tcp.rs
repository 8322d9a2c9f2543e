//! # Servidor TCP
//! src/server/tcp.rs
//!
//! Un hilo aceptador y un pool fijo de workers conectados por una cola
//! acotada. El aceptador no procesa requests: solo encola conexiones.
//!
//! ```text
//! TcpListener ──accept──▶ BoundedQueue<Connection> ──▶ WorkerPool
//! ```
//!
//! El listener es no bloqueante y se consulta cada `accept_poll` para poder
//! observar la señal de apagado.

use crate::config::Config;
use crate::error::ServerError;
use crate::errorlog::ErrorLog;
use crate::server::context::{Connection, ServerContext};
use crate::server::shutdown::ShutdownSignal;
use std::fs;
use std::io;
use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Servidor de archivos con pool fijo de workers
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    context: Arc<ServerContext>,
    accept_poll: Duration,
}

impl Server {
    /// Valida la configuración, prepara el document root y el log de errores
    /// y hace bind del listener.
    ///
    /// Son las únicas fallas fatales del servidor.
    pub fn bind(config: &Config) -> Result<Self, ServerError> {
        config.validate().map_err(ServerError::Config)?;

        let root = fs::canonicalize(&config.root).map_err(|source| ServerError::InvalidRoot {
            path: config.root.clone(),
            source,
        })?;
        if !root.is_dir() {
            return Err(ServerError::NotADirectory(root));
        }

        let log_path = root.join(&config.error_log);
        let error_log = ErrorLog::open(&log_path).map_err(|source| ServerError::ErrorLog {
            path: log_path.clone(),
            source,
        })?;

        let address = config.address();
        let listener = TcpListener::bind(&address).map_err(|source| ServerError::Bind {
            address: address.clone(),
            source,
        })?;

        let context = ServerContext::new(
            root,
            config.socket_timeout(),
            error_log,
            config.workers,
            config.queue_capacity,
        );

        Ok(Self {
            listener,
            context: Arc::new(context),
            accept_poll: config.accept_poll(),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub fn context(&self) -> &Arc<ServerContext> {
        &self.context
    }

    /// Señal que detiene el servidor desde otro hilo
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.context.shutdown_signal().clone()
    }

    /// Lanza los workers y acepta conexiones hasta el apagado.
    ///
    /// Al salir, todos los workers terminaron.
    pub fn run(self) -> Result<(), ServerError> {
        let Self {
            listener,
            context,
            accept_poll,
        } = self;

        listener.set_nonblocking(true).map_err(ServerError::Listener)?;
        context.pool().start(Arc::clone(&context))?;

        if let Ok(address) = listener.local_addr() {
            tracing::info!(%address, root = %context.document_root().display(), "server listening");
        }

        accept_loop(&listener, &context, accept_poll);
        drop(listener);

        // Si el apagado vino de la señal externa falta cerrar cola y pool
        context.shutdown();
        context.pool().join();

        tracing::info!("server stopped");
        Ok(())
    }
}

fn accept_loop(listener: &TcpListener, context: &ServerContext, accept_poll: Duration) {
    let signal = context.shutdown_signal();

    while !signal.is_triggered() {
        let (stream, peer) = match listener.accept() {
            Ok(accepted) => accepted,
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                thread::sleep(accept_poll);
                continue;
            }
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                context.error_log().append_with("Cannot accept connection", &e);
                thread::sleep(accept_poll);
                continue;
            }
        };

        if let Err(e) = stream.set_nonblocking(false) {
            context
                .error_log()
                .append_with(&format!("Cannot configure connection from {}", peer), &e);
            continue;
        }

        tracing::debug!(%peer, "connection accepted");

        if let Err(e) = context.queue().enqueue(Connection { stream, peer }) {
            let rejected = e.into_inner();
            tracing::debug!(peer = %rejected.peer, "queue closed, dropping connection");
            break;
        }
    }
}
