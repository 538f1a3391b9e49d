//! One-shot promise for view models that start detached work.
//!
//! `accept` can await its work directly, which keeps the input filtered
//! until the work is done. When the work should not hold the filter, start
//! it with [`async_task`] and respond from its callbacks instead.

use std::future::Future;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;
use tokio::runtime::Handle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TaskError {
    #[error("task already resolved")]
    AlreadyResolved,

    #[error("no tokio runtime on this thread")]
    NoRuntime,
}

/// Run `future` on the runtime the caller is running on.
///
/// Meant for `accept`, which always runs inside the engine's runtime:
///
/// ```ignore
/// async_task(async move { Ok(cart.add_product(product).await?) })?
///     .on_success(move |cart| respond.send(Output::ShowCart(cart.clone())));
/// ```
pub fn async_task<T, F>(future: F) -> Result<AsyncTask<T>, TaskError>
where
    T: Send + Sync + 'static,
    F: Future<Output = anyhow::Result<T>> + Send + 'static,
{
    let runtime = Handle::try_current().map_err(|_| TaskError::NoRuntime)?;
    Ok(AsyncTask::spawn(&runtime, future))
}

type Outcome<T> = Arc<Result<T, anyhow::Error>>;

enum Callback<T> {
    Success(Box<dyn FnOnce(&T) + Send>),
    Failure(Box<dyn FnOnce(&anyhow::Error) + Send>),
    Complete(Box<dyn FnOnce(Result<&T, &anyhow::Error>) + Send>),
}

impl<T> Callback<T> {
    fn invoke(self, outcome: &Result<T, anyhow::Error>) {
        match (self, outcome) {
            (Callback::Success(f), Ok(value)) => f(value),
            (Callback::Failure(f), Err(error)) => f(error),
            (Callback::Complete(f), outcome) => f(outcome.as_ref()),
            _ => {}
        }
    }
}

struct TaskState<T> {
    outcome: Option<Outcome<T>>,
    callbacks: Vec<Callback<T>>,
}

/// A value or error that arrives later.
///
/// Callbacks registered before resolution run when it resolves, on the
/// resolving thread. Callbacks registered afterwards run immediately. Every
/// callback runs exactly once.
pub struct AsyncTask<T> {
    state: Arc<Mutex<TaskState<T>>>,
}

impl<T> Clone for AsyncTask<T> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
        }
    }
}

impl<T> Default for AsyncTask<T> {
    fn default() -> Self {
        Self {
            state: Arc::new(Mutex::new(TaskState {
                outcome: None,
                callbacks: Vec::new(),
            })),
        }
    }
}

impl<T: Send + Sync + 'static> AsyncTask<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `future` on `runtime` and resolve with its result.
    pub fn spawn<F>(runtime: &Handle, future: F) -> Self
    where
        F: Future<Output = anyhow::Result<T>> + Send + 'static,
    {
        let task = Self::new();
        let resolver = task.clone();
        runtime.spawn(async move {
            // Fresh task, so it cannot already be resolved.
            let _ = resolver.resolve(future.await);
        });
        task
    }

    pub fn success(&self, value: T) -> Result<(), TaskError> {
        self.resolve(Ok(value))
    }

    pub fn failure(&self, error: impl Into<anyhow::Error>) -> Result<(), TaskError> {
        self.resolve(Err(error.into()))
    }

    /// Settle the task. Only the first call takes effect.
    pub fn resolve(&self, outcome: anyhow::Result<T>) -> Result<(), TaskError> {
        let (outcome, callbacks) = {
            let mut state = self.state.lock();
            if state.outcome.is_some() {
                return Err(TaskError::AlreadyResolved);
            }
            let outcome = Arc::new(outcome);
            state.outcome = Some(Arc::clone(&outcome));
            (outcome, std::mem::take(&mut state.callbacks))
        };

        for callback in callbacks {
            callback.invoke(&outcome);
        }
        Ok(())
    }

    pub fn on_success<F>(&self, callback: F) -> &Self
    where
        F: FnOnce(&T) + Send + 'static,
    {
        self.register(Callback::Success(Box::new(callback)));
        self
    }

    pub fn on_failure<F>(&self, callback: F) -> &Self
    where
        F: FnOnce(&anyhow::Error) + Send + 'static,
    {
        self.register(Callback::Failure(Box::new(callback)));
        self
    }

    pub fn on_complete<F>(&self, callback: F) -> &Self
    where
        F: FnOnce(Result<&T, &anyhow::Error>) + Send + 'static,
    {
        self.register(Callback::Complete(Box::new(callback)));
        self
    }

    pub fn is_fulfilled(&self) -> bool {
        self.state.lock().outcome.is_some()
    }

    fn register(&self, callback: Callback<T>) {
        let outcome = {
            let mut state = self.state.lock();
            match &state.outcome {
                Some(outcome) => Arc::clone(outcome),
                None => {
                    state.callbacks.push(callback);
                    return;
                }
            }
        };
        callback.invoke(&outcome);
    }
}
