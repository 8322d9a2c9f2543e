//! # Cola Bloqueante Acotada
//! src/workers/queue.rs
//!
//! Cola FIFO thread-safe con capacidad máxima. Es el único punto de
//! sincronización entre el hilo que acepta conexiones y el pool de workers.
//!
//! - `enqueue` bloquea mientras la cola está llena
//! - `dequeue` bloquea mientras la cola está vacía
//!
//! Se usan dos condvars (una por dirección) y siempre `notify_all`: con varios
//! productores o consumidores esperando a la vez, `notify_one` puede despertar
//! al hilo equivocado y perder el aviso.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};

/// Error de una operación sobre una cola cerrada.
///
/// `enqueue` devuelve el elemento dentro de `Closed(item)` para que el
/// llamador decida qué hacer con él (por ejemplo cerrar la conexión).
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum QueueError<T> {
    #[error("queue is closed")]
    Closed(T),
}

impl<T> QueueError<T> {
    /// Recupera el elemento que no pudo encolarse
    pub fn into_inner(self) -> T {
        match self {
            QueueError::Closed(item) => item,
        }
    }
}

/// Estado protegido por el mutex
struct QueueState<T> {
    items: VecDeque<T>,
    closed: bool,
}

/// Cola FIFO acotada con inserción y extracción bloqueantes
pub struct BoundedQueue<T> {
    state: Mutex<QueueState<T>>,

    /// Se señala cuando entra un elemento (despierta a `dequeue`)
    not_empty: Condvar,

    /// Se señala cuando sale un elemento (despierta a `enqueue`)
    not_full: Condvar,

    capacity: usize,
}

impl<T> BoundedQueue<T> {
    /// Crea una cola vacía.
    ///
    /// Una capacidad de 0 se eleva a 1: una cola sin espacio bloquearía para
    /// siempre a cualquier productor.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::with_capacity(capacity.min(1024)),
                closed: false,
            }),
            not_empty: Condvar::new(),
            not_full: Condvar::new(),
            capacity,
        }
    }

    fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Encola un elemento al final.
    ///
    /// Bloquea mientras la cola esté llena. Si la cola se cierra (antes o
    /// durante la espera) retorna `Err(QueueError::Closed(item))`.
    pub fn enqueue(&self, item: T) -> Result<(), QueueError<T>> {
        let mut state = self.lock();

        while !state.closed && state.items.len() >= self.capacity {
            state = self
                .not_full
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }

        if state.closed {
            return Err(QueueError::Closed(item));
        }

        state.items.push_back(item);
        drop(state);

        self.not_empty.notify_all();
        Ok(())
    }

    /// Desencola el elemento más antiguo.
    ///
    /// Bloquea mientras la cola esté vacía. Retorna `Err` si la cola se cierra.
    pub fn dequeue(&self) -> Result<T, QueueError<()>> {
        let mut state = self.lock();

        loop {
            if state.closed {
                return Err(QueueError::Closed(()));
            }

            if let Some(item) = state.items.pop_front() {
                drop(state);
                self.not_full.notify_all();
                return Ok(item);
            }

            state = self
                .not_empty
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Cierra la cola y despierta a todos los hilos bloqueados.
    ///
    /// Retorna los elementos que quedaban encolados. Llamadas repetidas
    /// retornan un vector vacío.
    pub fn close(&self) -> Vec<T> {
        let mut state = self.lock();
        state.closed = true;
        let pending: Vec<T> = state.items.drain(..).collect();
        drop(state);

        self.not_empty.notify_all();
        self.not_full.notify_all();
        pending
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Retorna el tamaño actual de la cola
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    /// Verifica si la cola está vacía
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Retorna la capacidad máxima
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl<T> std::fmt::Debug for BoundedQueue<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("BoundedQueue")
            .field("len", &state.items.len())
            .field("capacity", &self.capacity)
            .field("closed", &state.closed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_queue_fifo_order() {
        let queue = BoundedQueue::new(10);

        for i in 1..=5 {
            queue.enqueue(i).unwrap();
        }

        let out: Vec<i32> = (0..5).map(|_| queue.dequeue().unwrap()).collect();
        assert_eq!(out, vec![1, 2, 3, 4, 5]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_zero_capacity_is_raised_to_one() {
        let queue: BoundedQueue<u8> = BoundedQueue::new(0);
        assert_eq!(queue.capacity(), 1);
    }

    #[test]
    fn test_enqueue_blocks_when_full() {
        let queue = Arc::new(BoundedQueue::new(2));
        queue.enqueue(1).unwrap();
        queue.enqueue(2).unwrap();

        let done = Arc::new(AtomicUsize::new(0));
        let producer = thread::spawn({
            let queue = Arc::clone(&queue);
            let done = Arc::clone(&done);
            move || {
                queue.enqueue(3).unwrap();
                done.store(1, Ordering::SeqCst);
            }
        });

        thread::sleep(Duration::from_millis(100));
        // Sigue bloqueado: la cola nunca supera la capacidad
        assert_eq!(done.load(Ordering::SeqCst), 0);
        assert_eq!(queue.len(), 2);

        assert_eq!(queue.dequeue().unwrap(), 1);
        producer.join().unwrap();

        assert_eq!(done.load(Ordering::SeqCst), 1);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.dequeue().unwrap(), 2);
        assert_eq!(queue.dequeue().unwrap(), 3);
    }

    #[test]
    fn test_dequeue_blocks_until_item() {
        let queue = Arc::new(BoundedQueue::new(1));

        let consumer = thread::spawn({
            let queue = Arc::clone(&queue);
            move || queue.dequeue().unwrap()
        });

        thread::sleep(Duration::from_millis(50));
        queue.enqueue("hola").unwrap();

        assert_eq!(consumer.join().unwrap(), "hola");
    }

    #[test]
    fn test_single_dequeue_releases_exactly_one_producer() {
        let queue = Arc::new(BoundedQueue::new(1));
        queue.enqueue(0).unwrap();

        let finished = Arc::new(AtomicUsize::new(0));
        let producers: Vec<_> = (1..=2)
            .map(|i| {
                let queue = Arc::clone(&queue);
                let finished = Arc::clone(&finished);
                thread::spawn(move || {
                    queue.enqueue(i).unwrap();
                    finished.fetch_add(1, Ordering::SeqCst);
                })
            })
            .collect();

        thread::sleep(Duration::from_millis(100));
        assert_eq!(finished.load(Ordering::SeqCst), 0);

        assert_eq!(queue.dequeue().unwrap(), 0);
        thread::sleep(Duration::from_millis(100));

        // Uno entró, el otro sigue esperando espacio
        assert_eq!(finished.load(Ordering::SeqCst), 1);
        assert_eq!(queue.len(), 1);

        queue.dequeue().unwrap();
        for producer in producers {
            producer.join().unwrap();
        }
        assert_eq!(finished.load(Ordering::SeqCst), 2);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_close_releases_blocked_consumers() {
        let queue: Arc<BoundedQueue<u32>> = Arc::new(BoundedQueue::new(4));

        let consumers: Vec<_> = (0..3)
            .map(|_| {
                let queue = Arc::clone(&queue);
                thread::spawn(move || queue.dequeue())
            })
            .collect();

        thread::sleep(Duration::from_millis(50));
        queue.close();

        for consumer in consumers {
            assert_eq!(consumer.join().unwrap(), Err(QueueError::Closed(())));
        }
    }

    #[test]
    fn test_close_hands_back_blocked_item() {
        let queue = Arc::new(BoundedQueue::new(1));
        queue.enqueue(1).unwrap();

        let producer = thread::spawn({
            let queue = Arc::clone(&queue);
            move || queue.enqueue(2)
        });

        thread::sleep(Duration::from_millis(50));
        let pending = queue.close();

        assert_eq!(pending, vec![1]);
        let err = producer.join().unwrap().unwrap_err();
        assert_eq!(err.into_inner(), 2);
        assert!(queue.is_closed());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_error_display_and_item() {
        let err = QueueError::Closed("conn");
        assert_eq!(err.to_string(), "queue is closed");
        assert_eq!(err.into_inner(), "conn");
    }
}
