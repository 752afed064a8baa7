use std::fmt;
use thiserror::Error;


/// Ошибки создания пула
#[derive(Debug, Error)]
pub enum PoolError {
    #[error("concurrency must not be zero")]
    ZeroConcurrency,
    #[error("invalid pool configuration: {0}")]
    InvalidConfig(String),
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}


/// Ошибка постановки задачи в очередь. Задача всегда возвращается вызывающему.
#[derive(PartialEq, Eq, Clone, Copy, Error)]
pub enum SubmitError<T> {
    #[error("work queue is full")]
    Full(T),
    #[error("work queue is no longer accepting items")]
    Closed(T),
}

impl<T> SubmitError<T> {
    #[inline]
    pub fn into_inner(self) -> T {
        match self {
            SubmitError::Full(item) | SubmitError::Closed(item) => item,
        }
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        matches!(self, SubmitError::Full(_))
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        matches!(self, SubmitError::Closed(_))
    }
}

// T не обязан реализовывать Debug
impl<T> fmt::Debug for SubmitError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Full(_) => f.write_str("Full(..)"),
            SubmitError::Closed(_) => f.write_str("Closed(..)"),
        }
    }
}
