//! # Worker
//! src/workers/worker.rs
//!
//! Un worker es un hilo de larga vida que repite el ciclo
//! `dequeue → handler → dequeue`. Expone su nombre y el path que está
//! procesando para el panel de control; ese estado lo escribe el propio hilo
//! y lo lee el panel desde otro hilo, por eso va detrás de un atómico y un mutex.

use crate::workers::queue::BoundedQueue;
use serde::Serialize;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

/// Texto que muestra el panel para un worker sin request en curso
pub const IDLE_LABEL: &str = "Waiting...";

/// Procesa los elementos que un worker saca de la cola.
///
/// El servidor lo implementa para conexiones TCP; los tests lo implementan
/// con closures.
pub trait Handler<T>: Send + Sync + 'static {
    fn handle(&self, worker: &Worker, item: T);

    /// Se llama cuando `handle` entra en pánico; el worker sigue vivo
    fn on_panic(&self, worker: &Worker, message: &str) {
        tracing::error!(worker = worker.name(), panic = message, "handler panicked");
    }
}

impl<T, F> Handler<T> for F
where
    F: Fn(&Worker, T) + Send + Sync + 'static,
{
    fn handle(&self, worker: &Worker, item: T) {
        self(worker, item)
    }
}

/// Vista inmutable de un worker en un instante
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerSnapshot {
    pub name: String,
    pub current_path: Option<String>,
    pub terminated: bool,
}

impl WorkerSnapshot {
    /// Path en curso o `Waiting...`
    pub fn status_label(&self) -> &str {
        self.current_path.as_deref().unwrap_or(IDLE_LABEL)
    }
}

/// Estado compartido de un worker
#[derive(Debug)]
pub struct Worker {
    name: String,
    terminated: AtomicBool,
    current_path: Mutex<Option<String>>,
}

impl Worker {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            terminated: AtomicBool::new(false),
            current_path: Mutex::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Marca el worker para terminar. Idempotente.
    pub fn terminate(&self) {
        self.terminated.store(true, Ordering::SeqCst);
    }

    pub fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::SeqCst)
    }

    /// Registra el archivo que se está sirviendo
    pub fn set_current_path(&self, path: &Path) {
        let mut current = self.current_path.lock().unwrap_or_else(PoisonError::into_inner);
        *current = Some(path.display().to_string());
    }

    pub fn clear_current_path(&self) {
        let mut current = self.current_path.lock().unwrap_or_else(PoisonError::into_inner);
        *current = None;
    }

    pub fn current_path(&self) -> Option<String> {
        self.current_path
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn snapshot(&self) -> WorkerSnapshot {
        WorkerSnapshot {
            name: self.name.clone(),
            current_path: self.current_path(),
            terminated: self.is_terminated(),
        }
    }

    /// Loop principal del worker.
    ///
    /// Termina cuando la cola se cierra o cuando, tras desencolar, encuentra
    /// su bandera de terminación activa; en ese caso el elemento se descarta
    /// sin procesar (para una conexión, soltarla la cierra).
    pub fn run<T, H>(&self, queue: &BoundedQueue<T>, handler: &H)
    where
        H: Handler<T> + ?Sized,
    {
        tracing::debug!(worker = %self.name, "worker started");

        while !self.is_terminated() {
            let item = match queue.dequeue() {
                Ok(item) => item,
                Err(_) => {
                    tracing::debug!(worker = %self.name, "queue closed");
                    break;
                }
            };

            if self.is_terminated() {
                drop(item);
                break;
            }

            let outcome = panic::catch_unwind(AssertUnwindSafe(|| handler.handle(self, item)));
            if let Err(payload) = outcome {
                handler.on_panic(self, &panic_message(payload.as_ref()));
            }
            self.clear_current_path();
        }

        tracing::debug!(worker = %self.name, "worker stopped");
    }
}

/// Texto de un pánico (`&str` o `String`)
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
