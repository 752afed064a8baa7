//! Пул потоков с общей очередью задач и двумя протоколами завершения
//!
//! # Features
//! - Фиксированное число OS-потоков, все запущены сразу после конструктора
//! - FIFO очередь по умолчанию, контейнер подключаемый (`TaskQueue`)
//! - Graceful shutdown (`join`) и abrupt shutdown (`stop`), Drop вызывает `stop`
//! - Глобальный сигнал остановки: обработчик возвращает `false`
//! - Опциональный observer, вызовы которого сериализованы между воркерами
//! - Опциональный лимит очереди с блокирующим submit
//! - Изоляция паник и метрики
//!
//! ```
//! use concurrent_work_queue::WorkQueue;
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! let sum = Arc::new(AtomicUsize::new(0));
//! let acc = sum.clone();
//! let pool = WorkQueue::new(4, move |n: usize| {
//!     acc.fetch_add(n, Ordering::Relaxed);
//!     true
//! }).unwrap();
//!
//! for n in 1..=10 {
//!     pool.submit(n).unwrap();
//! }
//! pool.join();
//! assert_eq!(sum.load(Ordering::Relaxed), 55);
//! ```

pub mod config;
pub mod errors;
pub mod handle;
pub mod logging;
pub mod model;
pub mod pool;
pub mod queue;
pub mod task;
mod worker;

pub use config::Config;
pub use errors::{PoolError, SubmitError};
pub use handle::StopHandle;
pub use model::{Lifecycle, PanicPolicy, PoolMetrics};
pub use pool::{Builder, WorkQueue};
pub use queue::TaskQueue;
pub use task::{Observer, Processor};
