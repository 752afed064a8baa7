use super::model::Lifecycle;
use std::{
    fmt,
    sync::Weak,
};


/// То, что умеет остановить пул. Реализуется общим состоянием пула.
pub(crate) trait Halt: Send + Sync {
    fn halt(&self, cause: &'static str) -> bool;
    fn lifecycle(&self) -> Lifecycle;
}


/// Handle для глобальной остановки пула без ожидания воркеров.
///
/// Держит только слабую ссылку: handle не продлевает жизнь пула и может
/// безопасно вызываться изнутри обработчика.
#[derive(Clone)]
pub struct StopHandle {
    target: Weak<dyn Halt>,
}

impl StopHandle {
    pub(crate) fn new(target: Weak<dyn Halt>) -> Self {
        Self { target }
    }

    /// Поднимает сигнал остановки. `true`, если именно этот вызов остановил пул.
    #[inline]
    pub fn stop(&self) -> bool {
        match self.target.upgrade() {
            Some(pool) => pool.halt("stop handle"),
            None => false,
        }
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        match self.target.upgrade() {
            Some(pool) => pool.lifecycle().is_stopped(),
            None => true,
        }
    }
}

impl fmt::Debug for StopHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StopHandle")
            .field("stopped", &self.is_stopped())
            .finish()
    }
}
