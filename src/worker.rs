use super::{
    model::{Lifecycle, PanicPolicy},
    pool::Shared,
    queue::TaskQueue,
};
use std::{
    any::Any,
    panic::{self, AssertUnwindSafe},
    sync::{
        atomic::Ordering,
        Arc,
    },
};
use parking_lot::MutexGuard;
use tracing::{debug, error, info};


/// Один поток пула.
///
/// Цикл: ждем работу -> забираем голову очереди -> отпускаем лок ->
/// observer под своим локом -> processor. Processor вызывается без общих
/// локов, поэтому воркеры обрабатывают задачи действительно параллельно.
pub(crate) struct Worker<T: Send + 'static, Q: TaskQueue<T>> {
    index: usize,
    shared: Arc<Shared<T, Q>>,
}

impl<T: Send + 'static, Q: TaskQueue<T>> Worker<T, Q> {
    pub(crate) fn new(index: usize, shared: Arc<Shared<T, Q>>) -> Self {
        Self { index, shared }
    }

    pub(crate) fn run(self) {
        let shared = &*self.shared;
        let _exit = ExitGuard { index: self.index, shared };
        debug!(worker = self.index, "worker started");

        let mut state = shared.state.lock();
        loop {
            if state.lifecycle.is_stopped() {
                break;
            }

            if let Some(item) = state.queue.pop() {
                if shared.max_pending.is_some() {
                    shared.space_available.notify_one();
                }
                MutexGuard::unlocked(&mut state, || self.execute(item));
                continue;
            }

            // join: очередь пуста, новых задач не будет
            if state.lifecycle == Lifecycle::Draining {
                break;
            }

            shared.work_available.wait(&mut state);
        }
    }

    fn execute(&self, item: T) {
        let shared = &*self.shared;
        shared.counters.active.fetch_add(1, Ordering::Relaxed);

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            if let Some(observer) = &shared.observer {
                observer.lock().observe(&item);
            }
            shared.processor.process(item)
        }));

        shared.counters.active.fetch_sub(1, Ordering::Relaxed);

        match outcome {
            Ok(true) => {
                shared.counters.completed.fetch_add(1, Ordering::Relaxed);
            }
            Ok(false) => {
                shared.counters.completed.fetch_add(1, Ordering::Relaxed);
                if shared.halt("stop signal") {
                    info!(worker = self.index, "processor raised the stop signal");
                }
            }
            Err(payload) => {
                shared.counters.failed.fetch_add(1, Ordering::Relaxed);
                error!(
                    worker = self.index,
                    panic = %panic_message(payload.as_ref()),
                    "work item panicked"
                );
                if shared.panic_policy == PanicPolicy::Halt {
                    shared.halt("worker panic");
                }
            }
        }
    }
}


// Снимает воркер с учета даже при размотке стека
struct ExitGuard<'a, T: Send + 'static, Q: TaskQueue<T>> {
    index: usize,
    shared: &'a Shared<T, Q>,
}

impl<T: Send + 'static, Q: TaskQueue<T>> Drop for ExitGuard<'_, T, Q> {
    fn drop(&mut self) {
        let drained = {
            let mut state = self.shared.state.lock();
            state.live_workers -= 1;
            // Последний воркер после join закрывает пул
            let drained = state.live_workers == 0 && state.lifecycle == Lifecycle::Draining;
            if drained {
                state.lifecycle = Lifecycle::Stopped;
            }
            drained
        };
        self.shared.exited.notify_all();
        debug!(worker = self.index, "worker exited");
        if drained {
            info!("work queue drained");
        }
    }
}


fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}
