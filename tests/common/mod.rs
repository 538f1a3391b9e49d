//! Shared fixtures for the engine and demo tests.

#![allow(dead_code, unused_imports)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread::{self, ThreadId};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use thiserror::Error;
use tokio::runtime::{Builder, Runtime};
use tokio::sync::watch;

use simple_viewmodel::demo::{
    Cart, CartProvider, InMemoryCart, NormalPrice, Price, Product, ProductProvider, ServiceError,
    Sku, SkuColor, SkuSize,
};
use simple_viewmodel::testing::TestWaiter;
use simple_viewmodel::{Debounce, Dispatcher, MainContext, Responder, ViewModel, ViewModelError};

pub const WAIT: Duration = Duration::from_secs(2);

/// Runtime and dispatcher for one test. Keep the runtime alive for the
/// whole test.
pub fn dispatcher() -> (Runtime, Dispatcher) {
    let runtime = Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .expect("Failed to build runtime");
    let main = MainContext::spawn("test-main").expect("Failed to spawn main context");
    let dispatcher = Dispatcher::new(runtime.handle().clone(), main);
    (runtime, dispatcher)
}

// -- Recording ----------------------------------------------------------------

pub type Recorded<O> = Arc<Mutex<Vec<O>>>;

/// Delivery callback that appends every output to a shared buffer.
pub fn recorder<O: Send + 'static>() -> (Recorded<O>, impl FnMut(O) + Send + 'static) {
    let recorded = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&recorded);
    (recorded, move |output| sink.lock().push(output))
}

/// Like [`recorder`], also noting the thread each output arrived on.
pub fn thread_recorder<O: Send + 'static>(
) -> (Arc<Mutex<Vec<(O, ThreadId)>>>, impl FnMut(O) + Send + 'static) {
    let recorded = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&recorded);
    (recorded, move |output| {
        sink.lock().push((output, thread::current().id()))
    })
}

#[track_caller]
pub fn wait_until(description: &str, condition: impl FnMut() -> bool) {
    TestWaiter::new(description)
        .with_poll_interval(Duration::from_millis(10))
        .wait_for(WAIT, condition);
}

pub fn settle(duration: Duration) {
    TestWaiter::default().sleep(duration);
}

// -- Latch --------------------------------------------------------------------

/// Holds async work pending until the test opens it.
#[derive(Clone)]
pub struct Latch {
    tx: Arc<watch::Sender<bool>>,
}

impl Latch {
    pub fn closed() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    pub fn open() -> Self {
        let latch = Self::closed();
        latch.release();
        latch
    }

    pub fn release(&self) {
        self.tx.send_replace(true);
    }

    pub fn close(&self) {
        self.tx.send_replace(false);
    }

    pub async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        let _ = rx.wait_for(|open| *open).await;
    }
}

/// Names of the inputs that reached `accept`, in order.
#[derive(Clone, Default)]
pub struct Accepted(Arc<Mutex<Vec<String>>>);

impl Accepted {
    pub fn record(&self, input: &impl std::fmt::Debug) {
        self.0.lock().push(format!("{input:?}"));
    }

    pub fn count(&self) -> usize {
        self.0.lock().len()
    }

    pub fn count_of(&self, prefix: &str) -> usize {
        self.0.lock().iter().filter(|i| i.starts_with(prefix)).count()
    }

    pub fn all(&self) -> Vec<String> {
        self.0.lock().clone()
    }
}

// -- FooViewModel -------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum FooInput {
    DidTapButton,
    DidTapOtherButton,
    DidTapProgress,
    DidTapSilent,
    DidTapPlain,
    DidSearch(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FooOutput {
    State(u32, String),
    Loaded(String),
    Progress(u32),
    Search(String),
    Done,
}

/// Declares one of every input policy.
pub struct FooViewModel {
    pub latch: Latch,
    pub accepted: Accepted,
}

impl FooViewModel {
    pub fn new(latch: Latch) -> Self {
        Self {
            latch,
            accepted: Accepted::default(),
        }
    }
}

#[async_trait]
impl ViewModel for FooViewModel {
    type Input = FooInput;
    type Output = FooOutput;

    fn first(&self, respond: &Responder<FooOutput>) {
        respond.send(FooOutput::State(5, "Foo".to_string()));
    }

    async fn accept(&self, input: FooInput, respond: Responder<FooOutput>) -> anyhow::Result<()> {
        self.accepted.record(&input);
        match input {
            FooInput::DidTapButton => {
                self.latch.wait().await;
                respond.send(FooOutput::Loaded("button".to_string()));
            }
            FooInput::DidTapOtherButton => {
                self.latch.wait().await;
                respond.send(FooOutput::Loaded("other".to_string()));
            }
            FooInput::DidTapProgress => {
                respond.send(FooOutput::Progress(50));
                self.latch.wait().await;
                respond.send(FooOutput::Done);
            }
            FooInput::DidTapSilent => self.latch.wait().await,
            FooInput::DidTapPlain => respond.send(FooOutput::Done),
            FooInput::DidSearch(term) => respond.send(FooOutput::Search(term)),
        }
        Ok(())
    }

    fn filter(&self) -> Vec<FooInput> {
        vec![
            FooInput::DidTapButton,
            FooInput::DidTapProgress,
            FooInput::DidTapSilent,
        ]
    }

    fn filter_all_inputs(&self) -> Vec<FooInput> {
        vec![FooInput::DidTapOtherButton]
    }

    fn debounce(&self) -> Vec<Debounce<FooInput>> {
        vec![Debounce::new(
            FooInput::DidSearch(String::new()),
            Duration::from_millis(300),
        )]
    }

    fn filter_outputs(&self) -> Vec<FooOutput> {
        vec![FooOutput::Progress(0)]
    }
}

// -- BarViewModel -------------------------------------------------------------

#[derive(Debug, Error)]
#[error("fake failure")]
pub struct FakeError;

#[derive(Debug, Clone, PartialEq)]
pub enum BarInput {
    DidTapEditButton,
    DidTapSaveButton,
    DidTapIgnored,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BarOutput {
    State(String),
    Saved,
    ShowError(String),
}

/// One input at a time; failures become `ShowError`.
pub struct BarViewModel {
    pub latch: Latch,
    pub accepted: Accepted,
}

impl BarViewModel {
    pub fn new(latch: Latch) -> Self {
        Self {
            latch,
            accepted: Accepted::default(),
        }
    }
}

#[async_trait]
impl ViewModel for BarViewModel {
    type Input = BarInput;
    type Output = BarOutput;

    fn first(&self, respond: &Responder<BarOutput>) {
        respond.send(BarOutput::State("Bar".to_string()));
    }

    async fn accept(&self, input: BarInput, respond: Responder<BarOutput>) -> anyhow::Result<()> {
        self.accepted.record(&input);
        match input {
            BarInput::DidTapEditButton => Err(FakeError.into()),
            BarInput::DidTapSaveButton => {
                self.latch.wait().await;
                respond.send(BarOutput::Saved);
                Ok(())
            }
            BarInput::DidTapIgnored => Err(ViewModelError::IgnoreInput.into()),
        }
    }

    fn filter_all(&self) -> bool {
        true
    }

    fn thrown_error(&self, error: anyhow::Error, respond: &Responder<BarOutput>) {
        respond.send(BarOutput::ShowError(error.to_string()));
    }
}

// -- StreamViewModel ----------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum StreamInput {
    Hold,
    Emit(Vec<u32>),
    Fail,
    Panic,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StreamOutput {
    ViewState(u32),
    Pushed(u32),
    Held,
}

/// Keeps its standing responder and relies on the default error handling.
pub struct StreamViewModel {
    pub latch: Latch,
    pub accepted: Accepted,
    pub lifecycle: Arc<Mutex<Vec<&'static str>>>,
    standing: Mutex<Option<Responder<StreamOutput>>>,
}

impl StreamViewModel {
    pub fn new(latch: Latch) -> Self {
        Self {
            latch,
            accepted: Accepted::default(),
            lifecycle: Arc::new(Mutex::new(Vec::new())),
            standing: Mutex::new(None),
        }
    }

    pub fn push(&self, value: u32) {
        if let Some(respond) = self.standing.lock().as_ref() {
            respond.send(StreamOutput::Pushed(value));
        }
    }

    pub fn push_view_state(&self, value: u32) {
        if let Some(respond) = self.standing.lock().as_ref() {
            respond.send(StreamOutput::ViewState(value));
        }
    }
}

#[async_trait]
impl ViewModel for StreamViewModel {
    type Input = StreamInput;
    type Output = StreamOutput;

    fn responder(&self, respond: Responder<StreamOutput>) {
        self.lifecycle.lock().push("responder");
        *self.standing.lock() = Some(respond);
    }

    fn first(&self, _respond: &Responder<StreamOutput>) {
        self.lifecycle.lock().push("first");
    }

    async fn accept(
        &self,
        input: StreamInput,
        respond: Responder<StreamOutput>,
    ) -> anyhow::Result<()> {
        self.accepted.record(&input);
        match input {
            StreamInput::Hold => {
                self.latch.wait().await;
                respond.send(StreamOutput::Held);
            }
            StreamInput::Emit(values) => {
                for value in values {
                    respond.send(StreamOutput::ViewState(value));
                }
            }
            StreamInput::Fail => return Err(FakeError.into()),
            StreamInput::Panic => panic!("accept panicked"),
        }
        Ok(())
    }

    fn filter(&self) -> Vec<StreamInput> {
        vec![StreamInput::Hold, StreamInput::Fail, StreamInput::Panic]
    }

    fn carries_view_state(&self, output: &StreamOutput) -> bool {
        matches!(output, StreamOutput::ViewState(_))
    }
}

// -- Providers ----------------------------------------------------------------

pub fn sample_product(id: &str) -> Product {
    Product {
        id: id.to_string(),
        name: "Name".to_string(),
        price: NormalPrice::Single(Price::Regular(10.0)),
        skus: vec![Sku {
            id: "1".to_string(),
            color: SkuColor {
                name: "Red".to_string(),
                image_url: None,
            },
            size: SkuSize {
                name: "L".to_string(),
                meta_description: None,
            },
            price: Price::Regular(10.0),
        }],
    }
}

/// Product provider whose fetch waits on a latch and counts calls.
pub struct StubProductProvider {
    pub latch: Latch,
    pub fail: bool,
    calls: AtomicUsize,
}

impl StubProductProvider {
    pub fn new(latch: Latch) -> Self {
        Self {
            latch,
            fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new(Latch::open())
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProductProvider for StubProductProvider {
    async fn product(&self, id: &str) -> Result<Product, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.latch.wait().await;
        if self.fail {
            return Err(ServiceError::ProductNotFound(id.to_string()));
        }
        Ok(sample_product(id))
    }
}

/// In-memory cart whose requests wait on a latch.
pub struct StubCartProvider {
    pub latch: Latch,
    pub cart: InMemoryCart,
    calls: AtomicUsize,
}

impl StubCartProvider {
    pub fn new(latch: Latch) -> Self {
        Self {
            latch,
            cart: InMemoryCart::new(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CartProvider for StubCartProvider {
    async fn add_product(&self, product: Product) -> Result<Cart, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.latch.wait().await;
        self.cart.add_product(product).await
    }

    async fn remove_product(&self, product: Product) -> Result<Cart, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.latch.wait().await;
        self.cart.remove_product(product).await
    }
}
