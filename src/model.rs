use std::fmt;


/// Жизненный цикл пула. Переходы только вперед: Running -> Draining -> Stopped
/// или Running -> Stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Lifecycle {
    /// Принимает задачи, воркеры ждут работу
    Running,
    /// Идет join: новые задачи не принимаются, очередь дочищается
    Draining,
    /// Терминальное состояние: очередь брошена, воркеры выходят
    Stopped,
}

impl Lifecycle {
    #[inline]
    pub fn is_running(self) -> bool {
        self == Lifecycle::Running
    }

    #[inline]
    pub fn is_stopped(self) -> bool {
        self == Lifecycle::Stopped
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Lifecycle::Running => "running",
            Lifecycle::Draining => "draining",
            Lifecycle::Stopped => "stopped",
        };
        f.write_str(name)
    }
}


/// Что делать с паникой внутри observer/processor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanicPolicy {
    /// Задача считается проваленной, воркер берет следующую
    #[default]
    Isolate,
    /// Паника работает как глобальный сигнал остановки
    Halt,
}


#[derive(Debug, Clone)]
pub struct PoolMetrics {
    pub workers: usize,
    pub live_workers: usize,
    pub active_tasks: usize,
    pub idle_workers: usize,
    pub queued_tasks: usize,
    pub total_submitted: usize,
    pub completed_tasks: usize,
    pub failed_tasks: usize,
    pub abandoned_tasks: usize,
    pub state: Lifecycle,
}

impl PoolMetrics {
    pub fn utilization(&self) -> f64 {
        if self.active_tasks + self.idle_workers == 0 {
            return 0.0;
        }
        self.active_tasks as f64 / (self.active_tasks + self.idle_workers) as f64
    }

    pub fn success_rate(&self) -> f64 {
        let total = self.completed_tasks + self.failed_tasks;
        if total == 0 {
            return 1.0;
        }
        self.completed_tasks as f64 / total as f64
    }

    /// Сколько задач получило окончательный исход
    pub fn settled(&self) -> usize {
        self.completed_tasks + self.failed_tasks + self.abandoned_tasks
    }
}
