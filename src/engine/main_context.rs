//! The designated delivery context.
//!
//! A dedicated thread that runs posted jobs one at a time, in posting order.
//! Every output a consumer sees is delivered from this thread, so consumer
//! callbacks never need their own synchronization.

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Sender};
use std::sync::Arc;
use std::thread::{self, ThreadId};

type Job = Box<dyn FnOnce() + Send + 'static>;

#[derive(Clone)]
pub struct MainContext {
    tx: Sender<Job>,
    thread: ThreadId,
    name: Arc<str>,
}

impl MainContext {
    /// Spawn the context thread.
    ///
    /// The thread exits once every clone of the returned context is dropped
    /// and the queue has drained.
    pub fn spawn(name: &str) -> io::Result<Self> {
        let (tx, rx) = mpsc::channel::<Job>();
        let thread_name = name.to_string();

        let handle = thread::Builder::new()
            .name(thread_name.clone())
            .spawn(move || {
                while let Ok(job) = rx.recv() {
                    if panic::catch_unwind(AssertUnwindSafe(job)).is_err() {
                        tracing::error!(context = %thread_name, "Job panicked on main context");
                    }
                }
                tracing::trace!(context = %thread_name, "Main context stopped");
            })?;

        Ok(Self {
            tx,
            thread: handle.thread().id(),
            name: Arc::from(name),
        })
    }

    pub fn thread_id(&self) -> ThreadId {
        self.thread
    }

    /// Whether the caller is running on this context.
    pub fn is_current(&self) -> bool {
        thread::current().id() == self.thread
    }

    /// Queue `job` behind everything posted so far.
    pub fn post<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.tx.send(Box::new(job)).is_err() {
            tracing::warn!(context = %self.name, "Main context stopped; job discarded");
        }
    }

    /// Run `job` inline when already on this context, otherwise post it.
    pub fn run<F>(&self, job: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if self.is_current() {
            job();
        } else {
            self.post(job);
        }
    }

    /// Block until every job posted before this call has run.
    ///
    /// Returns immediately when called from the context itself.
    pub fn flush(&self) {
        if self.is_current() {
            return;
        }
        let (done_tx, done_rx) = mpsc::sync_channel::<()>(1);
        self.post(move || {
            let _ = done_tx.send(());
        });
        let _ = done_rx.recv();
    }
}

impl std::fmt::Debug for MainContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MainContext")
            .field("name", &self.name)
            .field("thread", &self.thread)
            .finish()
    }
}
