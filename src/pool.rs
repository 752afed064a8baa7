use super::{
    config::Config,
    errors::{PoolError, SubmitError},
    handle::{Halt, StopHandle},
    model::{Lifecycle, PanicPolicy, PoolMetrics},
    queue::TaskQueue,
    task::{Observer, Processor},
    worker::Worker,
};
use std::{
    collections::VecDeque,
    fmt,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Weak,
    },
    thread::{self, JoinHandle, ThreadId},
};
use crossbeam::utils::CachePadded;
use parking_lot::{Condvar, Mutex};
use tracing::{debug, error, info};


/// Все, что меняется под общим локом
pub(crate) struct State<Q> {
    pub(crate) queue: Q,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) live_workers: usize,
    // join/stop, вызванные из processor и ждущие остальных воркеров
    pub(crate) inside_waiters: usize,
}

#[derive(Default)]
pub(crate) struct Counters {
    pub(crate) submitted: CachePadded<AtomicUsize>,
    pub(crate) active: CachePadded<AtomicUsize>,
    pub(crate) completed: CachePadded<AtomicUsize>,
    pub(crate) failed: CachePadded<AtomicUsize>,
    pub(crate) abandoned: CachePadded<AtomicUsize>,
}

pub(crate) struct Shared<T: Send + 'static, Q: TaskQueue<T>> {
    pub(crate) state: Mutex<State<Q>>,
    pub(crate) work_available: Condvar,
    pub(crate) space_available: Condvar,
    pub(crate) exited: Condvar,
    pub(crate) processor: Box<dyn Processor<T>>,
    pub(crate) observer: Option<Mutex<Box<dyn Observer<T>>>>,
    pub(crate) counters: Counters,
    pub(crate) max_pending: Option<usize>,
    pub(crate) panic_policy: PanicPolicy,
}

impl<T: Send + 'static, Q: TaskQueue<T>> Shared<T, Q> {
    /// Переводит пул в Stopped и бросает ожидающие задачи.
    /// `true`, если переход выполнил именно этот вызов.
    pub(crate) fn halt(&self, cause: &'static str) -> bool {
        let abandoned = {
            let mut state = self.state.lock();
            if state.lifecycle.is_stopped() {
                return false;
            }
            state.lifecycle = Lifecycle::Stopped;
            state.queue.drain_all()
        };
        self.wake_all();

        // Дропаем задачи вне лока
        let count = abandoned.len();
        drop(abandoned);
        self.counters.abandoned.fetch_add(count, Ordering::Relaxed);
        info!(cause, abandoned = count, "work queue stopped");
        true
    }

    pub(crate) fn wake_all(&self) {
        self.work_available.notify_all();
        self.space_available.notify_all();
    }
}

impl<T: Send + 'static, Q: TaskQueue<T>> Halt for Shared<T, Q> {
    #[inline]
    fn halt(&self, cause: &'static str) -> bool {
        Shared::halt(self, cause)
    }

    #[inline]
    fn lifecycle(&self) -> Lifecycle {
        self.state.lock().lifecycle
    }
}


/// Пул потоков с общей очередью задач.
///
/// Все воркеры уже запущены, когда конструктор вернул управление.
/// Завершение либо через [`WorkQueue::join`] (дочистить очередь), либо через
/// [`WorkQueue::stop`] (бросить очередь). Drop всегда вызывает `stop`.
pub struct WorkQueue<T: Send + 'static, Q: TaskQueue<T> = VecDeque<T>> {
    shared: Arc<Shared<T, Q>>,
    threads: Mutex<Vec<JoinHandle<()>>>,
    worker_ids: Vec<ThreadId>,
    concurrency: usize,
}

impl<T: Send + 'static> WorkQueue<T> {
    pub fn new<P>(concurrency: usize, processor: P) -> Result<Self, PoolError>
    where
        P: Processor<T>,
    {
        Self::with_config(Config::with_threads(concurrency), processor)
    }

    pub fn with_config<P>(config: Config, processor: P) -> Result<Self, PoolError>
    where
        P: Processor<T>,
    {
        Builder::new().config(config).build(processor)
    }

    pub fn builder() -> Builder<T> {
        Builder::new()
    }
}

impl<T: Send + 'static, Q: TaskQueue<T>> WorkQueue<T, Q> {
    fn spawn(
        config: Config,
        queue: Q,
        processor: Box<dyn Processor<T>>,
        observer: Option<Box<dyn Observer<T>>>,
    ) -> Result<Self, PoolError> {
        config.validate()?;

        let counters = Counters::default();
        counters.submitted.store(queue.len(), Ordering::Relaxed);

        let shared = Arc::new(Shared {
            state: Mutex::new(State {
                queue,
                lifecycle: Lifecycle::Running,
                live_workers: 0,
                inside_waiters: 0,
            }),
            work_available: Condvar::new(),
            space_available: Condvar::new(),
            exited: Condvar::new(),
            processor,
            observer: observer.map(Mutex::new),
            counters,
            max_pending: config.max_pending,
            panic_policy: config.panic_policy,
        });

        let mut threads = Vec::with_capacity(config.num_threads);
        for index in 0..config.num_threads {
            // Учитываем воркер до старта потока, иначе join может его не дождаться
            shared.state.lock().live_workers += 1;

            let worker = Worker::new(index, Arc::clone(&shared));
            let spawned = thread::Builder::new()
                .name(format!("{}-{}", config.thread_name_prefix, index))
                .spawn(move || worker.run());

            match spawned {
                Ok(handle) => threads.push(handle),
                Err(err) => {
                    shared.state.lock().live_workers -= 1;
                    error!(worker = index, error = %err, "failed to spawn worker thread");
                    shared.halt("spawn failure");
                    for handle in threads {
                        let _ = handle.join();
                    }
                    return Err(PoolError::Spawn(err));
                }
            }
        }

        info!(
            workers = config.num_threads,
            max_pending = ?config.max_pending,
            "work queue started"
        );

        let worker_ids = threads.iter().map(|h| h.thread().id()).collect();
        Ok(Self {
            shared,
            threads: Mutex::new(threads),
            worker_ids,
            concurrency: config.num_threads,
        })
    }

    /// Ставит задачу в хвост очереди и будит один воркер.
    ///
    /// Без `max_pending` никогда не блокируется. С `max_pending` ждет
    /// свободного места. После `join`/`stop` задача возвращается в
    /// [`SubmitError::Closed`].
    pub fn submit(&self, item: T) -> Result<(), SubmitError<T>> {
        let mut state = self.shared.state.lock();
        if let Some(limit) = self.shared.max_pending {
            while state.lifecycle.is_running() && state.queue.len() >= limit {
                self.shared.space_available.wait(&mut state);
            }
        }
        if !state.lifecycle.is_running() {
            return Err(SubmitError::Closed(item));
        }
        state.queue.push(item);
        self.shared.counters.submitted.fetch_add(1, Ordering::Relaxed);
        drop(state);

        self.shared.work_available.notify_one();
        Ok(())
    }

    /// Как [`WorkQueue::submit`], но при заполненной очереди сразу
    /// возвращает [`SubmitError::Full`].
    pub fn try_submit(&self, item: T) -> Result<(), SubmitError<T>> {
        let mut state = self.shared.state.lock();
        if !state.lifecycle.is_running() {
            return Err(SubmitError::Closed(item));
        }
        if let Some(limit) = self.shared.max_pending {
            if state.queue.len() >= limit {
                return Err(SubmitError::Full(item));
            }
        }
        state.queue.push(item);
        self.shared.counters.submitted.fetch_add(1, Ordering::Relaxed);
        drop(state);

        self.shared.work_available.notify_one();
        Ok(())
    }

    /// Graceful shutdown: перестает принимать задачи, ждет пока воркеры
    /// обработают все, что уже в очереди, и переводит пул в Stopped.
    pub fn join(&self) {
        {
            let mut state = self.shared.state.lock();
            if state.lifecycle.is_running() {
                state.lifecycle = Lifecycle::Draining;
                info!(queued = state.queue.len(), "work queue draining");
            }
        }
        // Простаивающие воркеры должны перепроверить условие и выйти
        self.shared.wake_all();

        // Из processor дочищать будет сам вызывающий воркер, Stopped
        // выставит последний вышедший
        if self.await_workers() {
            self.shared.halt("drained");
        }
    }

    /// Abrupt shutdown: бросает очередь и ждет только задачи, которые уже
    /// в обработке. Повторный вызов ничего не делает.
    pub fn stop(&self) {
        self.shared.halt("stop requested");
        self.await_workers();
    }

    pub fn stop_handle(&self) -> StopHandle {
        let weak = Arc::downgrade(&self.shared);
        let target: Weak<dyn Halt> = weak;
        StopHandle::new(target)
    }

    /// Ждет выхода воркеров. `true`, если вышли все и потоки собраны.
    ///
    /// Вызов с потока воркера (join/stop из processor) не ждет ни себя, ни
    /// других таких же вызывающих и не трогает `JoinHandle`: их соберет
    /// следующий `stop`/`join`/Drop с чужого потока.
    fn await_workers(&self) -> bool {
        let on_worker = self.worker_ids.contains(&thread::current().id());

        {
            let mut state = self.shared.state.lock();
            if on_worker {
                state.inside_waiters += 1;
                // Другие ждущие внутри воркеров должны пересчитать условие
                self.shared.exited.notify_all();
                while state.live_workers > state.inside_waiters {
                    self.shared.exited.wait(&mut state);
                }
                state.inside_waiters -= 1;
                debug!(live = state.live_workers, "join/stop returned inside a worker");
                return false;
            }
            while state.live_workers > 0 {
                self.shared.exited.wait(&mut state);
            }
        }

        let handles = std::mem::take(&mut *self.threads.lock());
        for handle in handles {
            if handle.join().is_err() {
                error!("worker thread terminated by a panic");
            }
        }
        true
    }

    #[inline]
    pub fn state(&self) -> Lifecycle {
        self.shared.state.lock().lifecycle
    }

    #[inline]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Количество задач, ожидающих в очереди
    #[inline]
    pub fn len(&self) -> usize {
        self.shared.state.lock().queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn metrics(&self) -> PoolMetrics {
        let (queued_tasks, live_workers, state) = {
            let state = self.shared.state.lock();
            (state.queue.len(), state.live_workers, state.lifecycle)
        };
        let counters = &self.shared.counters;
        let active_tasks = counters.active.load(Ordering::Relaxed);

        PoolMetrics {
            workers: self.concurrency,
            live_workers,
            active_tasks,
            idle_workers: live_workers.saturating_sub(active_tasks),
            queued_tasks,
            total_submitted: counters.submitted.load(Ordering::Relaxed),
            completed_tasks: counters.completed.load(Ordering::Relaxed),
            failed_tasks: counters.failed.load(Ordering::Relaxed),
            abandoned_tasks: counters.abandoned.load(Ordering::Relaxed),
            state,
        }
    }
}

impl<T: Send + 'static, Q: TaskQueue<T>> Drop for WorkQueue<T, Q> {
    fn drop(&mut self) {
        self.stop();
    }
}

impl<T: Send + 'static, Q: TaskQueue<T>> fmt::Debug for WorkQueue<T, Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkQueue")
            .field("concurrency", &self.concurrency)
            .field("state", &self.state())
            .field("queued", &self.len())
            .finish()
    }
}


/// Builder пула: конфигурация, observer и контейнер очереди
pub struct Builder<T: Send + 'static, Q: TaskQueue<T> = VecDeque<T>> {
    config: Config,
    queue: Q,
    observer: Option<Box<dyn Observer<T>>>,
}

impl<T: Send + 'static> Builder<T> {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            queue: VecDeque::new(),
            observer: None,
        }
    }
}

impl<T: Send + 'static> Default for Builder<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Send + 'static, Q: TaskQueue<T>> Builder<T, Q> {
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn threads(mut self, num_threads: usize) -> Self {
        self.config.num_threads = num_threads;
        self
    }

    pub fn max_pending(mut self, max_pending: usize) -> Self {
        self.config.max_pending = Some(max_pending);
        self
    }

    pub fn thread_name(mut self, prefix: impl Into<String>) -> Self {
        self.config.thread_name_prefix = prefix.into();
        self
    }

    pub fn panic_policy(mut self, policy: PanicPolicy) -> Self {
        self.config.panic_policy = policy;
        self
    }

    pub fn observer<O>(mut self, observer: O) -> Self
    where
        O: Observer<T>,
    {
        self.observer = Some(Box::new(observer));
        self
    }

    /// Заменяет контейнер очереди. Уже лежащие в нем элементы станут задачами.
    pub fn queue<Q2>(self, queue: Q2) -> Builder<T, Q2>
    where
        Q2: TaskQueue<T>,
    {
        Builder {
            config: self.config,
            queue,
            observer: self.observer,
        }
    }

    pub fn build<P>(self, processor: P) -> Result<WorkQueue<T, Q>, PoolError>
    where
        P: Processor<T>,
    {
        WorkQueue::spawn(self.config, self.queue, Box::new(processor), self.observer)
    }
}
