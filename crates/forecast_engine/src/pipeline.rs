use std::sync::Arc;

use forecast_core::{
    update, BoxObserver, Effect, FetchError, Msg, Orchestrator, PipelineConfig, PipelineState,
    Query, QuerySource, RequestId, StatePublisher, SubscriptionId,
};
use forecast_logging::{forecast_debug, forecast_info, forecast_warn, PIPELINE_TARGET};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

use crate::FetchCapability;

/// Everything the worker reacts to, in arrival order.
enum Event<T> {
    SetQuery(String),
    RefreshNow(String),
    DebounceElapsed,
    Subscribe {
        id: SubscriptionId,
        observer: BoxObserver<T>,
    },
    Unsubscribe(SubscriptionId),
    Completed {
        request_id: RequestId,
        result: Result<T, FetchError>,
    },
    Shutdown,
}

/// A fetch abandoned because its token fired.
struct Cancelled;

struct InFlight {
    request_id: RequestId,
    token: CancellationToken,
}

/// Host-side handle to one running pipeline.
///
/// Spawns a worker task on the current tokio runtime. The worker owns the
/// query source, the orchestrator and the publisher; every host call and every
/// fetch completion is folded into its single event queue, so state only ever
/// changes on that one task. Dropping the handle tears the pipeline down.
pub struct PipelineHandle<T> {
    name: &'static str,
    tx: mpsc::UnboundedSender<Event<T>>,
    task: Option<JoinHandle<()>>,
}

impl<T> PipelineHandle<T>
where
    T: Clone + Send + 'static,
{
    pub fn spawn(
        name: &'static str,
        config: PipelineConfig<T>,
        capability: Arc<dyn FetchCapability<T>>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = Worker {
            name,
            source: QuerySource::new(Query::default(), config.debounce_window),
            orchestrator: Orchestrator::new(config),
            publisher: StatePublisher::new(),
            in_flight: None,
            capability,
            shutdown: CancellationToken::new(),
            tx: tx.clone(),
        };
        let task = tokio::spawn(worker.run(rx));
        forecast_info!(target: PIPELINE_TARGET, "[{}] pipeline started", name);

        Self {
            name,
            tx,
            task: Some(task),
        }
    }

    /// Feeds a raw edit into the debounced query source.
    pub fn set_query(&self, raw: impl Into<String>) {
        self.send(Event::SetQuery(raw.into()));
    }

    /// Settles `query` immediately, bypassing (and discarding) any pending edit.
    pub fn refresh_now(&self, query: impl Into<String>) {
        self.send(Event::RefreshNow(query.into()));
    }

    /// Registers `observer`; it first receives the latest state, then every change.
    pub fn subscribe<F>(&self, observer: F) -> Subscription<T>
    where
        F: FnMut(&PipelineState<T>) + Send + 'static,
    {
        let id = SubscriptionId::next();
        self.send(Event::Subscribe {
            id,
            observer: Box::new(observer),
        });
        Subscription {
            id,
            tx: self.tx.clone(),
            active: true,
        }
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.send(Event::Unsubscribe(id));
    }

    /// Cancels any in-flight fetch, releases observers and waits for the worker to exit.
    pub async fn shutdown(mut self) {
        self.send(Event::Shutdown);
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                forecast_warn!(target: PIPELINE_TARGET, "[{}] worker ended abnormally: {}", self.name, err);
            }
        }
    }

    fn send(&self, event: Event<T>) {
        if self.tx.send(event).is_err() {
            forecast_debug!(target: PIPELINE_TARGET, "[{}] worker already stopped", self.name);
        }
    }
}

impl<T> Drop for PipelineHandle<T> {
    fn drop(&mut self) {
        if self.task.is_some() {
            let _ = self.tx.send(Event::Shutdown);
        }
    }
}

/// Observer registration; unsubscribes when dropped unless detached.
#[must_use = "dropping a Subscription unsubscribes its observer"]
pub struct Subscription<T> {
    id: SubscriptionId,
    tx: mpsc::UnboundedSender<Event<T>>,
    active: bool,
}

impl<T> Subscription<T> {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Keeps the observer registered for the rest of the pipeline's life.
    pub fn detach(mut self) -> SubscriptionId {
        self.active = false;
        self.id
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if self.active {
            let _ = self.tx.send(Event::Unsubscribe(self.id));
        }
    }
}

struct Worker<T> {
    name: &'static str,
    source: QuerySource,
    orchestrator: Orchestrator<T>,
    publisher: StatePublisher<T>,
    in_flight: Option<InFlight>,
    capability: Arc<dyn FetchCapability<T>>,
    shutdown: CancellationToken,
    tx: mpsc::UnboundedSender<Event<T>>,
}

impl<T> Worker<T>
where
    T: Clone + Send + 'static,
{
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Event<T>>) {
        loop {
            let deadline = self.source.deadline().map(Instant::from_std);
            let event = tokio::select! {
                biased;
                event = rx.recv() => event.unwrap_or(Event::Shutdown),
                _ = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    Event::DebounceElapsed
                }
            };
            if !self.handle(event) {
                break;
            }
        }
        forecast_info!(target: PIPELINE_TARGET, "[{}] pipeline stopped", self.name);
    }

    /// Returns `false` once the pipeline has shut down.
    fn handle(&mut self, event: Event<T>) -> bool {
        match event {
            Event::SetQuery(raw) => {
                if let Some(query) = self.source.emit(&raw, Instant::now().into_std()) {
                    self.settle(query);
                }
            }
            Event::RefreshNow(raw) => {
                self.source.discard_pending();
                self.settle(Query::new(raw));
            }
            Event::DebounceElapsed => {
                if let Some(query) = self.source.poll(Instant::now().into_std()) {
                    self.settle(query);
                }
            }
            Event::Subscribe { id, observer } => self.publisher.attach(id, observer),
            Event::Unsubscribe(id) => {
                self.publisher.unsubscribe(id);
            }
            Event::Completed { request_id, result } => {
                if self
                    .in_flight
                    .as_ref()
                    .is_some_and(|in_flight| in_flight.request_id == request_id)
                {
                    self.in_flight = None;
                }
                let msg = match result {
                    Ok(result) => Msg::FetchSucceeded { request_id, result },
                    Err(error) => {
                        forecast_warn!(
                            target: PIPELINE_TARGET,
                            "[{}] fetch {} failed: {}",
                            self.name,
                            request_id,
                            error
                        );
                        Msg::FetchFailed { request_id, error }
                    }
                };
                self.dispatch(msg);
            }
            Event::Shutdown => {
                self.dispatch(Msg::Shutdown);
                self.shutdown.cancel();
                self.publisher.clear();
                return false;
            }
        }
        true
    }

    fn settle(&mut self, query: Query) {
        forecast_debug!(target: PIPELINE_TARGET, "[{}] settled query {:?}", self.name, query.as_str());
        self.dispatch(Msg::QuerySettled(query));
    }

    fn dispatch(&mut self, msg: Msg<T>) {
        let orchestrator = std::mem::take(&mut self.orchestrator);
        let (orchestrator, effects) = update(orchestrator, msg);
        self.orchestrator = orchestrator;
        for effect in effects {
            self.run_effect(effect);
        }
    }

    fn run_effect(&mut self, effect: Effect<T>) {
        match effect {
            Effect::StartFetch { request_id, query } => self.start_fetch(request_id, query),
            Effect::CancelFetch { request_id } => match self.in_flight.take() {
                Some(in_flight) if in_flight.request_id == request_id => {
                    forecast_debug!(target: PIPELINE_TARGET, "[{}] cancel fetch {}", self.name, request_id);
                    in_flight.token.cancel();
                }
                other => self.in_flight = other,
            },
            Effect::Publish(state) => self.publisher.publish(state),
        }
    }

    fn start_fetch(&mut self, request_id: RequestId, query: Query) {
        forecast_debug!(
            target: PIPELINE_TARGET,
            "[{}] start fetch {} for {:?}",
            self.name,
            request_id,
            query.as_str()
        );
        let token = self.shutdown.child_token();
        let fetch_token = token.clone();
        let capability = Arc::clone(&self.capability);
        let tx = self.tx.clone();
        let name = self.name;

        tokio::spawn(async move {
            match run_fetch(&*capability, query.as_str(), &fetch_token).await {
                Ok(result) => {
                    let _ = tx.send(Event::Completed { request_id, result });
                }
                Err(Cancelled) => {
                    forecast_debug!(target: PIPELINE_TARGET, "[{}] fetch {} discarded", name, request_id);
                }
            }
        });

        self.in_flight = Some(InFlight { request_id, token });
    }
}

async fn run_fetch<T>(
    capability: &dyn FetchCapability<T>,
    query: &str,
    token: &CancellationToken,
) -> Result<Result<T, FetchError>, Cancelled> {
    let result = tokio::select! {
        biased;
        _ = token.cancelled() => return Err(Cancelled),
        result = capability.fetch(query) => result,
    };
    // A result that raced the cancel still must not be delivered.
    if token.is_cancelled() {
        return Err(Cancelled);
    }
    Ok(result)
}
