//! Input/output dispatch for view models.
//!
//! A view sends inputs to a [`ViewModelInterface`], which decides whether and
//! when each one reaches the [`ViewModel`], and delivers the outputs back on
//! a single [`MainContext`] thread in the order they were produced.

pub mod config;
pub mod debounce;
pub mod demo;
pub mod engine;
pub mod logging;
pub mod task;
pub mod testing;
pub mod viewmodel;

pub use engine::{Dispatcher, MainContext, ViewModelInterface};
pub use task::{async_task, AsyncTask};
pub use viewmodel::{Debounce, Responder, ViewModel, ViewModelError};
