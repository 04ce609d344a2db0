use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use shared::{
    domain::{ClientOption, Market},
    protocol::{SubmissionPayload, SubmissionReceipt},
};
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};
use tracing::{info, warn};

pub mod error;
pub mod form;
pub mod transport;
pub mod types;

pub use error::IntakeError;
pub use form::SelectionState;
pub use transport::HttpIntakeBackend;
pub use types::{FormEvent, FormattingCommand, SubmissionPhase, SubmitOutcome, Validity};

#[async_trait]
pub trait ClientLookup: Send + Sync {
    async fn search_clients(&self, query: &str) -> Result<Vec<ClientOption>>;
}

#[async_trait]
pub trait SubmissionSink: Send + Sync {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<SubmissionReceipt>;
}

/// Rich-text widget hosting the ad copy. Only its markup and formatting commands are visible here.
pub trait EditorSurface: Send {
    fn markup(&self) -> String;
    fn apply(&mut self, command: &FormattingCommand);
    fn clear(&mut self);
}

struct ControllerState {
    selection: SelectionState,
    phase: SubmissionPhase,
    options: Vec<ClientOption>,
    lookup_generation: u64,
    editor: Option<Box<dyn EditorSurface>>,
}

/// Owns the intake form: selections, the displayed client options and the submit lifecycle.
pub struct IntakeController {
    lookup: Arc<dyn ClientLookup>,
    sink: Arc<dyn SubmissionSink>,
    inner: Mutex<ControllerState>,
    events: broadcast::Sender<FormEvent>,
}

impl IntakeController {
    pub fn new(lookup: Arc<dyn ClientLookup>, sink: Arc<dyn SubmissionSink>) -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        Arc::new(Self {
            lookup,
            sink,
            inner: Mutex::new(ControllerState {
                selection: SelectionState::default(),
                phase: SubmissionPhase::Idle,
                options: Vec::new(),
                lookup_generation: 0,
                editor: None,
            }),
            events,
        })
    }

    /// Both collaborators served by one HTTP backend.
    pub fn with_backend(backend: HttpIntakeBackend) -> Arc<Self> {
        let backend = Arc::new(backend);
        Self::new(backend.clone(), backend)
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<FormEvent> {
        self.events.subscribe()
    }

    pub async fn attach_editor(&self, editor: Box<dyn EditorSurface>) {
        let mut guard = self.inner.lock().await;
        let markup = editor.markup();
        guard.selection.set_content(markup);
        guard.editor = Some(editor);
    }

    pub async fn selection(&self) -> SelectionState {
        self.inner.lock().await.selection.clone()
    }

    pub async fn options(&self) -> Vec<ClientOption> {
        self.inner.lock().await.options.clone()
    }

    pub async fn phase(&self) -> SubmissionPhase {
        self.inner.lock().await.phase
    }

    pub async fn is_submitting(&self) -> bool {
        self.phase().await == SubmissionPhase::Submitting
    }

    pub async fn validity(&self) -> Validity {
        self.inner.lock().await.selection.validity()
    }

    pub async fn is_valid(&self) -> bool {
        self.validity().await.is_valid()
    }

    pub async fn selected_count(&self) -> usize {
        self.inner.lock().await.selection.selected_count()
    }

    pub async fn preview_markup(&self) -> String {
        self.inner.lock().await.selection.content().to_string()
    }

    pub async fn toggle_market(&self, market: Market) -> bool {
        self.inner.lock().await.selection.toggle_market(market)
    }

    pub async fn set_date(&self, raw: &str) -> Result<(), IntakeError> {
        self.inner.lock().await.selection.set_date(raw)
    }

    /// Records the editor's current markup.
    pub async fn set_content(&self, markup: impl Into<String>) {
        self.inner.lock().await.selection.set_content(markup);
    }

    pub async fn set_link_url(&self, text: impl Into<String>) {
        self.inner.lock().await.selection.set_link_url(text);
    }

    pub async fn clear_client(&self) {
        self.inner.lock().await.selection.clear_client();
    }

    /// Runs a formatting command on the attached editor and re-reads its markup.
    /// Without an editor this is a no-op.
    pub async fn format(&self, command: FormattingCommand) {
        let mut guard = self.inner.lock().await;
        let state = &mut *guard;
        if let Some(editor) = state.editor.as_mut() {
            editor.apply(&command);
            state.selection.set_content(editor.markup());
        }
    }

    /// The "apply link" button: sets or removes a link depending on the link url box.
    pub async fn apply_link(&self) -> Result<FormattingCommand, IntakeError> {
        let command = self.inner.lock().await.selection.link_command()?;
        self.format(command.clone()).await;
        Ok(command)
    }

    /// Updates the search box and looks the text up. Results of any query
    /// issued before a later one are discarded when they arrive.
    pub async fn query_clients(self: &Arc<Self>, text: impl Into<String>) -> JoinHandle<()> {
        let text = text.into();
        let generation = {
            let mut guard = self.inner.lock().await;
            guard.selection.set_client_query(text.clone());
            next_generation(&mut guard)
        };
        self.spawn_lookup(text, generation)
    }

    /// Picks a client; the search box now shows its name, which is looked up again.
    pub async fn select_client(self: &Arc<Self>, option: ClientOption) -> JoinHandle<()> {
        let query = option.name.clone();
        let generation = {
            let mut guard = self.inner.lock().await;
            guard.selection.set_client(option);
            next_generation(&mut guard)
        };
        self.spawn_lookup(query, generation)
    }

    fn spawn_lookup(self: &Arc<Self>, query: String, generation: u64) -> JoinHandle<()> {
        let controller = Arc::clone(self);
        tokio::spawn(async move {
            let result = controller.lookup.search_clients(&query).await;

            let mut guard = controller.inner.lock().await;
            if guard.lookup_generation != generation {
                return;
            }
            let event = match result {
                Ok(options) => {
                    let count = options.len();
                    guard.options = options;
                    FormEvent::OptionsUpdated { query, count }
                }
                Err(err) => {
                    let err = IntakeError::LookupFailure(format!("{err:#}"));
                    warn!(%query, error = %err, "client lookup failed; showing no matches");
                    guard.options.clear();
                    FormEvent::LookupFailed {
                        query,
                        message: err.to_string(),
                    }
                }
            };
            drop(guard);
            let _ = controller.events.send(event);
        })
    }

    /// Sends the form when it is complete and nothing else is in flight.
    ///
    /// On success the form is cleared; on failure it is left exactly as it was.
    pub async fn submit(self: &Arc<Self>) -> Result<SubmitOutcome, IntakeError> {
        let payload = {
            let mut guard = self.inner.lock().await;
            if guard.phase == SubmissionPhase::Submitting {
                return Ok(SubmitOutcome::InFlight);
            }
            let Some(payload) = guard.selection.build_payload() else {
                return Ok(SubmitOutcome::Blocked(guard.selection.validity()));
            };
            guard.phase = SubmissionPhase::Submitting;
            payload
        };

        let result = self.sink.submit(&payload).await;

        let mut guard = self.inner.lock().await;
        guard.phase = SubmissionPhase::Idle;
        match result {
            Ok(receipt) => {
                info!(
                    client_id = %payload.client.id,
                    markets = payload.markets.len(),
                    date = %payload.date,
                    "submission accepted"
                );
                guard.selection.reset();
                if let Some(editor) = guard.editor.as_mut() {
                    editor.clear();
                }
                let generation = next_generation(&mut guard);
                drop(guard);
                self.spawn_lookup(String::new(), generation);
                let _ = self.events.send(FormEvent::Submitted {
                    receipt: receipt.clone(),
                });
                Ok(SubmitOutcome::Submitted(receipt))
            }
            Err(err) => {
                drop(guard);
                let err = IntakeError::SubmissionFailure(format!("{err:#}"));
                warn!(error = %err, "submission failed; form left intact for retry");
                let _ = self.events.send(FormEvent::SubmissionFailed {
                    message: err.to_string(),
                });
                Err(err)
            }
        }
    }
}

fn next_generation(state: &mut ControllerState) -> u64 {
    state.lookup_generation += 1;
    state.lookup_generation
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
