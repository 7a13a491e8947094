// WorkerExecutor / ControlLoop - Coordinates the tokio runtime with the control thread
//
// Two sides work together here:
// 1. tokio's multi-threaded runtime, where resolve and load work runs
// 2. a single control thread that owns all lifecycle state
//
// Background work never touches the control context. When it finishes, a
// completion closure is posted over a channel and only runs once the control
// thread pumps the loop.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// A completion posted back to the control thread.
type Completion<C> = Box<dyn FnOnce(&mut C, &WorkerExecutor<C>) + Send>;

/// Schedules work off the control thread and routes results back to it.
///
/// Cheap to clone; every clone feeds the same [`ControlLoop`].
///
/// # Example
/// ```ignore
/// let runtime = tokio::runtime::Runtime::new()?;
/// let mut control = ControlLoop::new(runtime.handle().clone(), |_| Vec::<u32>::new());
///
/// control.executor().run(async { 42 }, |values, value, _| values.push(value));
/// control.run_until_idle();
/// assert_eq!(control.context(), &vec![42]);
/// ```
pub struct WorkerExecutor<C> {
    tokio_handle: Handle,

    /// Unbounded so that a burst of completions (one per profile) never
    /// blocks or drops a result on the worker side.
    completion_tx: mpsc::UnboundedSender<Completion<C>>,

    /// Work scheduled whose completion has not run yet.
    in_flight: Arc<AtomicUsize>,
}

// Manual Clone implementation to avoid requiring C: Clone
impl<C> Clone for WorkerExecutor<C> {
    fn clone(&self) -> Self {
        Self {
            tokio_handle: self.tokio_handle.clone(),
            completion_tx: self.completion_tx.clone(),
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

impl<C: 'static> WorkerExecutor<C> {
    /// Run `work` on the runtime; `on_complete` runs on the control thread
    /// with its output, exactly once.
    ///
    /// Failures must be encoded in `T`. If `work` panics the panic is logged
    /// and `on_complete` is skipped.
    pub fn run<F, T, H>(&self, work: F, on_complete: H)
    where
        F: Future<Output = T> + Send + 'static,
        T: Send + 'static,
        H: FnOnce(&mut C, T, &WorkerExecutor<C>) + Send + 'static,
    {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let task = self.tokio_handle.spawn(work);
        self.forward(task, on_complete);
    }

    /// Like [`run`](Self::run) for synchronous work, which goes to the
    /// runtime's blocking pool.
    pub fn run_blocking<F, T, H>(&self, work: F, on_complete: H)
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
        H: FnOnce(&mut C, T, &WorkerExecutor<C>) + Send + 'static,
    {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let task = self.tokio_handle.spawn_blocking(work);
        self.forward(task, on_complete);
    }

    /// Number of scheduled units whose completion has not run yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn tokio_handle(&self) -> &Handle {
        &self.tokio_handle
    }

    fn forward<T, H>(&self, task: JoinHandle<T>, on_complete: H)
    where
        T: Send + 'static,
        H: FnOnce(&mut C, T, &WorkerExecutor<C>) + Send + 'static,
    {
        let completion_tx = self.completion_tx.clone();
        let in_flight = Arc::clone(&self.in_flight);

        self.tokio_handle.spawn(async move {
            let completion: Completion<C> = match task.await {
                Ok(output) => {
                    Box::new(move |context, executor| on_complete(context, output, executor))
                }
                Err(e) => {
                    tracing::error!("Background work did not complete: {}", e);
                    // Still wakes the loop so the in-flight count is settled.
                    Box::new(|_, _| {})
                }
            };

            if completion_tx.send(completion).is_err() {
                tracing::warn!("Failed to post completion - control loop has stopped");
                in_flight.fetch_sub(1, Ordering::SeqCst);
            }
        });
    }
}

/// The control thread's side: owns the context and runs completions.
///
/// All context mutation happens through [`pump`](Self::pump),
/// [`run_next`](Self::run_next) and [`with_context`](Self::with_context),
/// which must be called from one thread outside the tokio runtime.
pub struct ControlLoop<C> {
    context: C,
    executor: WorkerExecutor<C>,
    completion_rx: mpsc::UnboundedReceiver<Completion<C>>,
}

impl<C: 'static> ControlLoop<C> {
    /// Create the loop. `build` receives the executor so the context can
    /// schedule work while it is being constructed.
    pub fn new(tokio_handle: Handle, build: impl FnOnce(&WorkerExecutor<C>) -> C) -> Self {
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let executor = WorkerExecutor {
            tokio_handle,
            completion_tx,
            in_flight: Arc::new(AtomicUsize::new(0)),
        };
        let context = build(&executor);

        tracing::debug!("Control loop initialized");

        Self {
            context,
            executor,
            completion_rx,
        }
    }

    pub fn executor(&self) -> &WorkerExecutor<C> {
        &self.executor
    }

    pub fn context(&self) -> &C {
        &self.context
    }

    /// Run a trigger against the context on the control thread.
    pub fn with_context<R>(&mut self, f: impl FnOnce(&mut C, &WorkerExecutor<C>) -> R) -> R {
        f(&mut self.context, &self.executor)
    }

    pub fn in_flight(&self) -> usize {
        self.executor.in_flight()
    }

    /// Run every completion that has already arrived, without waiting.
    /// Returns how many ran.
    pub fn pump(&mut self) -> usize {
        let mut ran = 0;
        while let Ok(completion) = self.completion_rx.try_recv() {
            self.dispatch(completion);
            ran += 1;
        }
        ran
    }

    /// Wait for the next completion and run it.
    ///
    /// Returns `false` immediately when nothing is in flight.
    pub fn run_next(&mut self) -> bool {
        if self.in_flight() == 0 {
            return false;
        }
        match self.completion_rx.blocking_recv() {
            Some(completion) => {
                self.dispatch(completion);
                true
            }
            None => false,
        }
    }

    /// Like [`run_next`](Self::run_next), giving up after `timeout`.
    pub fn run_next_timeout(&mut self, timeout: Duration) -> bool {
        if self.in_flight() == 0 {
            return false;
        }
        let received = self
            .executor
            .tokio_handle
            .block_on(tokio::time::timeout(timeout, self.completion_rx.recv()));

        match received {
            Ok(Some(completion)) => {
                self.dispatch(completion);
                true
            }
            Ok(None) => false,
            Err(_) => {
                tracing::debug!("No completion within {:?}", timeout);
                false
            }
        }
    }

    /// Keep running completions until no work is in flight, including work
    /// scheduled by the completions themselves.
    pub fn run_until_idle(&mut self) {
        while self.run_next() {}
        self.pump();
    }

    pub fn into_context(self) -> C {
        self.context
    }

    fn dispatch(&mut self, completion: Completion<C>) {
        completion(&mut self.context, &self.executor);
        // Decremented after the handler so work it schedules keeps the loop busy.
        self.executor.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}
