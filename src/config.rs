use super::{
    errors::PoolError,
    model::PanicPolicy,
};


pub const DEFAULT_THREAD_NAME_PREFIX: &str = "work-queue";

/// Конфигурация пула
#[derive(Debug, Clone)]
pub struct Config {
    pub num_threads: usize,
    /// `None`: очередь без ограничения. `Some(n)`: submit блокируется на n задачах
    pub max_pending: Option<usize>,
    pub thread_name_prefix: String,
    pub panic_policy: PanicPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            num_threads: num_cpus::get(),
            max_pending: None,
            thread_name_prefix: DEFAULT_THREAD_NAME_PREFIX.to_string(),
            panic_policy: PanicPolicy::default(),
        }
    }
}

impl Config {
    pub fn cpu_bound() -> Self {
        let num_cpus = num_cpus::get();
        Self {
            num_threads: num_cpus,
            max_pending: Some(num_cpus * 10),
            ..Default::default()
        }
    }

    /// Воркеры большую часть времени блокируются на I/O
    pub fn io_bound() -> Self {
        Self {
            num_threads: num_cpus::get() * 2,
            max_pending: None,
            ..Default::default()
        }
    }

    pub fn with_threads(num_threads: usize) -> Self {
        Self {
            num_threads,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), PoolError> {
        if self.num_threads == 0 {
            return Err(PoolError::ZeroConcurrency);
        }
        if self.max_pending == Some(0) {
            return Err(PoolError::InvalidConfig(
                "max_pending must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
