//! Event loop that owns the [`ViewState`] and carries out its effects.
//!
//! Actions are handled one at a time, in arrival order. Timers and network
//! calls run as separate tasks and report back by posting actions into the
//! same queue, so nothing but the loop ever touches the state.

use std::sync::Arc;

use tokio::{
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
};

use crate::{
    config::InputSettings,
    debounce::Debouncer,
    provider::WeatherService,
    state::{Action, Effect, ViewState},
};

#[derive(Debug, thiserror::Error)]
#[error("session event loop has stopped")]
pub struct SessionClosed;

#[derive(Debug)]
struct Envelope {
    action: Action,
    applied: Option<oneshot::Sender<()>>,
}

/// Handle to a running widget session.
#[derive(Debug)]
pub struct Session {
    tx: mpsc::UnboundedSender<Envelope>,
    state: watch::Receiver<ViewState>,
    task: JoinHandle<()>,
}

impl Session {
    /// Start the event loop on the current tokio runtime.
    pub fn spawn(service: Arc<dyn WeatherService>, settings: InputSettings) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let initial = ViewState::new(settings.default_unit);
        let (state_tx, state) = watch::channel(initial.clone());

        let event_loop = EventLoop {
            service,
            settings,
            view: initial,
            tx: tx.clone(),
            state_tx,
            debounce: Debouncer::new(),
            blur: Debouncer::new(),
        };
        let task = tokio::spawn(event_loop.run(rx));

        Self { tx, state, task }
    }

    /// Queue an action without waiting for it to be applied.
    pub fn dispatch(&self, action: Action) -> Result<(), SessionClosed> {
        self.tx
            .send(Envelope { action, applied: None })
            .map_err(|_| SessionClosed)
    }

    /// Queue an action and wait until the loop has applied it.
    pub async fn send(&self, action: Action) -> Result<ViewState, SessionClosed> {
        let (applied_tx, applied_rx) = oneshot::channel();
        self.tx
            .send(Envelope { action, applied: Some(applied_tx) })
            .map_err(|_| SessionClosed)?;
        applied_rx.await.map_err(|_| SessionClosed)?;
        Ok(self.state())
    }

    /// Snapshot of the latest published state.
    pub fn state(&self) -> ViewState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.state.clone()
    }

    /// Wait until no timer or lookup is outstanding.
    pub async fn settle(&self) -> Result<ViewState, SessionClosed> {
        let mut rx = self.state.clone();
        let state = rx.wait_for(|s| !s.is_busy()).await.map_err(|_| SessionClosed)?;
        Ok(state.clone())
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.task.abort();
    }
}

struct EventLoop {
    service: Arc<dyn WeatherService>,
    settings: InputSettings,
    view: ViewState,
    tx: mpsc::UnboundedSender<Envelope>,
    state_tx: watch::Sender<ViewState>,
    debounce: Debouncer,
    blur: Debouncer,
}

impl EventLoop {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<Envelope>) {
        while let Some(Envelope { action, applied }) = rx.recv().await {
            let effects = self.view.apply(action, &self.settings);
            for effect in effects {
                self.execute(effect);
            }

            self.state_tx.send_replace(self.view.clone());
            if let Some(applied) = applied {
                let _ = applied.send(());
            }
        }
    }

    fn execute(&mut self, effect: Effect) {
        match effect {
            Effect::StartDebounce { ticket, delay } => {
                let tx = self.tx.clone();
                self.debounce.schedule(delay, async move {
                    post(&tx, Action::DebounceElapsed { ticket });
                });
            }
            Effect::CancelDebounce => self.debounce.cancel(),
            Effect::ScheduleSuggestionClear { delay } => {
                let tx = self.tx.clone();
                self.blur.schedule(delay, async move {
                    post(&tx, Action::BlurElapsed);
                });
            }
            Effect::FetchSuggestions { generation, query, limit } => {
                let tx = self.tx.clone();
                let service = Arc::clone(&self.service);
                tokio::spawn(async move {
                    let result = service.suggest(&query, limit).await;
                    post(&tx, Action::SuggestionsLoaded { generation, result });
                });
            }
            Effect::FetchWeather { generation, query } => {
                let tx = self.tx.clone();
                let service = Arc::clone(&self.service);
                tokio::spawn(async move {
                    let result = service.current_weather(&query).await;
                    post(&tx, Action::WeatherLoaded { generation, result });
                });
            }
        }
    }
}

fn post(tx: &mpsc::UnboundedSender<Envelope>, action: Action) {
    if tx.send(Envelope { action, applied: None }).is_err() {
        tracing::debug!("Session closed before completion could be delivered");
    }
}
