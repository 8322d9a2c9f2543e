//! # Pool de Workers
//! src/workers/pool.rs
//!
//! Conjunto de tamaño fijo de workers que comparten una misma cola.
//!
//! Ciclo de vida:
//! 1. `new()` crea los workers (todavía sin hilo)
//! 2. `start()` lanza un hilo por worker, una sola vez
//! 3. `terminate()` marca a todos para terminar (idempotente)
//! 4. `join()` espera a que todos los hilos salgan

use crate::workers::queue::BoundedQueue;
use crate::workers::worker::{Handler, Worker, WorkerSnapshot};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

/// Errores del ciclo de vida del pool
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("worker pool already started")]
    AlreadyStarted,

    #[error("failed to spawn worker thread {name}: {source}")]
    Spawn {
        name: String,
        #[source]
        source: std::io::Error,
    },
}

/// Pool fijo de workers sobre una `BoundedQueue<T>`
pub struct WorkerPool<T> {
    queue: Arc<BoundedQueue<T>>,
    workers: Vec<Arc<Worker>>,
    handles: Mutex<Vec<JoinHandle<()>>>,
    started: AtomicBool,
}

impl<T: Send + 'static> WorkerPool<T> {
    /// Crea `worker_count` workers llamados `worker-1`, `worker-2`, ...
    pub fn new(queue: Arc<BoundedQueue<T>>, worker_count: usize) -> Self {
        let workers = (1..=worker_count)
            .map(|i| Arc::new(Worker::new(format!("worker-{}", i))))
            .collect();

        Self {
            queue,
            workers,
            handles: Mutex::new(Vec::with_capacity(worker_count)),
            started: AtomicBool::new(false),
        }
    }

    /// Lanza un hilo por worker.
    ///
    /// Solo puede llamarse una vez; la segunda retorna `AlreadyStarted`.
    pub fn start<H>(&self, handler: Arc<H>) -> Result<(), PoolError>
    where
        H: Handler<T>,
    {
        if self.started.swap(true, Ordering::SeqCst) {
            return Err(PoolError::AlreadyStarted);
        }

        let mut handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);

        for worker in &self.workers {
            let name = worker.name().to_string();
            let worker = Arc::clone(worker);
            let queue = Arc::clone(&self.queue);
            let handler = Arc::clone(&handler);

            let handle = thread::Builder::new()
                .name(name.clone())
                .spawn(move || worker.run(&queue, handler.as_ref()))
                .map_err(|source| PoolError::Spawn { name, source })?;

            handles.push(handle);
        }

        tracing::info!(workers = self.workers.len(), "worker pool started");
        Ok(())
    }

    /// Marca todos los workers para terminar.
    ///
    /// Un worker bloqueado en `dequeue` no sale hasta que desencola algo o la
    /// cola se cierra; el apagado del servidor cierra la cola después de esto.
    pub fn terminate(&self) {
        for worker in &self.workers {
            worker.terminate();
        }
    }

    /// Espera a que terminen todos los hilos lanzados
    pub fn join(&self) {
        let handles: Vec<JoinHandle<()>> = {
            let mut handles = self.handles.lock().unwrap_or_else(PoisonError::into_inner);
            handles.drain(..).collect()
        };

        for handle in handles {
            let name = handle.thread().name().unwrap_or("worker").to_string();
            if handle.join().is_err() {
                tracing::error!(worker = %name, "worker thread panicked");
            }
        }
    }

    pub fn workers(&self) -> &[Arc<Worker>] {
        &self.workers
    }

    pub fn queue(&self) -> &Arc<BoundedQueue<T>> {
        &self.queue
    }

    pub fn size(&self) -> usize {
        self.workers.len()
    }

    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Snapshot de los workers que no han sido terminados
    pub fn active_snapshots(&self) -> Vec<WorkerSnapshot> {
        self.workers
            .iter()
            .map(|worker| worker.snapshot())
            .filter(|snapshot| !snapshot.terminated)
            .collect()
    }
}

impl<T> std::fmt::Debug for WorkerPool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("workers", &self.workers.len())
            .field("started", &self.started.load(Ordering::SeqCst))
            .finish()
    }
}
