use std::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use super::{coordinator::Coordinator, slot::Slot, worker::Worker};
use crate::{
    config::Config,
    error::RuntimeError,
    events::Bus,
    subscribers::{Subscribe, SubscriberSet},
};

/// Builder for constructing a [`Coordinator`] with optional subscribers.
pub struct CoordinatorBuilder<T> {
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
    runtime: Option<Handle>,
    _output: PhantomData<fn() -> T>,
}

impl<T: Send + 'static> CoordinatorBuilder<T> {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            subscribers: Vec::new(),
            runtime: None,
            _output: PhantomData,
        }
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive coordinator events (admission, completion, release, ...)
    /// through dedicated workers with bounded queues.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Runs the worker and watchers on `handle` instead of the current runtime.
    ///
    /// Lets a coordinator be built (and used) from threads outside any runtime.
    pub fn with_runtime(mut self, handle: Handle) -> Self {
        self.runtime = Some(handle);
        self
    }

    /// Builds the coordinator.
    ///
    /// This spawns the worker and, if subscribers were given, the listener that
    /// fans bus events out to them. Fails with [`RuntimeError::NoRuntime`] if no
    /// runtime handle was given and none is current.
    pub fn build(self) -> Result<Coordinator<T>, RuntimeError> {
        let runtime = match self.runtime {
            Some(handle) => handle,
            None => Handle::try_current().map_err(|_| RuntimeError::NoRuntime)?,
        };
        let _enter = runtime.enter();

        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let listener = CancellationToken::new();
        if !self.subscribers.is_empty() {
            let subs = SubscriberSet::new(self.subscribers, bus.clone());
            spawn_listener(&runtime, &bus, subs, listener.clone());
        }

        let (jobs, worker) = Worker::<T>::new(bus.clone());
        let worker = runtime.spawn(worker.run());

        Ok(Coordinator {
            cfg: self.cfg,
            bus,
            slot: Arc::new(Slot::new()),
            jobs: Mutex::new(Some(jobs)),
            worker: Mutex::new(Some(worker)),
            watchers: TaskTracker::new(),
            root: CancellationToken::new(),
            listener,
            runtime,
            next_id: AtomicU64::new(0),
        })
    }
}

/// Subscribes to the bus and forwards events to the subscriber set until `stop` fires.
fn spawn_listener(runtime: &Handle, bus: &Bus, subs: SubscriberSet, stop: CancellationToken) {
    let mut rx = bus.subscribe();
    runtime.spawn(async move {
        loop {
            tokio::select! {
                _ = stop.cancelled() => break,
                res = rx.recv() => match res {
                    Ok(ev) => subs.emit(&ev),
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(skipped, "subscriber listener lagged");
                    }
                    Err(RecvError::Closed) => break,
                },
            }
        }
        subs.shutdown().await;
    });
}
