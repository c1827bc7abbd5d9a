use crate::cache::{CacheKey, FragmentCache};
use crate::history::{HistoryEntry, HistoryStack};
use crate::host::{BrowserHistory, DialogSurface, DocumentTree};
use crate::markup::{extract_scripts, Fragment};
use crate::transport::{Transport, TransportError};
use crate::trigger::{FragmentSource, TriggerRequest};
use lightbox_evaluator::{Context, TemplateEngine};
use std::cell::RefCell;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Marker pushed to the host history on each successful navigation
pub const HISTORY_MARKER: &str = "#lightbox";

pub type NavigateResult<T> = Result<T, NavigateError>;

#[derive(Error, Debug)]
pub enum NavigateError {
    #[error("Transport failure: {0}")]
    Transport(#[from] TransportError),

    #[error("Target region '{target}' not found")]
    TargetNotFound { target: String },

    #[error("Malformed data payload: {0}")]
    Payload(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogState {
    Closed,
    Loading,
    Displayed,
}

struct ControllerState {
    cache: FragmentCache,
    stack: HistoryStack,
    dialog: DialogState,
    /// Monotonic operation counter. A navigation completing after a newer
    /// operation has been issued is stale: it may still populate the cache,
    /// but it no longer owns the visible state.
    latest_seq: u64,
}

/// Orchestrates one dialog instance: resolves a fragment source, renders it,
/// memoizes the result, and keeps the history stack in step with the host.
///
/// Single-threaded and cooperative: `navigate` suspends only at the
/// transport boundary, and all state mutation happens between suspension
/// points. Overlapping navigations are not deduplicated and in-flight
/// fetches are never aborted; the sequence guard instead discards stale
/// completions, so the newest request wins the visible state.
pub struct DialogController<T: Transport> {
    transport: T,
    dom: Box<dyn DocumentTree>,
    history: Box<dyn BrowserHistory>,
    surface: Box<dyn DialogSurface>,
    state: RefCell<ControllerState>,
}

impl<T: Transport> DialogController<T> {
    pub fn new(
        transport: T,
        dom: Box<dyn DocumentTree>,
        history: Box<dyn BrowserHistory>,
        surface: Box<dyn DialogSurface>,
    ) -> Self {
        Self {
            transport,
            dom,
            history,
            surface,
            state: RefCell::new(ControllerState {
                cache: FragmentCache::new(),
                stack: HistoryStack::new(),
                dialog: DialogState::Closed,
                latest_seq: 0,
            }),
        }
    }

    pub fn dialog_state(&self) -> DialogState {
        self.state.borrow().dialog
    }

    pub fn history_len(&self) -> usize {
        self.state.borrow().stack.len()
    }

    pub fn cached_fragments(&self) -> usize {
        self.state.borrow().cache.len()
    }

    pub fn current_entry(&self) -> Option<HistoryEntry> {
        self.state.borrow().stack.current().cloned()
    }

    /// Load a fragment into the dialog.
    ///
    /// Serves the rendered fragment from cache when the (source, target)
    /// pair has been displayed before; otherwise resolves the source,
    /// renders it, and memoizes the result. Every successful navigation
    /// pushes a fresh history entry and notifies the host history. On
    /// failure the dialog is left in its previous state and nothing partial
    /// is displayed.
    #[instrument(skip(self))]
    pub async fn navigate(
        &self,
        source: FragmentSource,
        target: &str,
    ) -> NavigateResult<()> {
        let seq = self.issue_seq();
        let prev = self.state.borrow().dialog;

        let result = self.try_navigate(&source, target, seq).await;
        if let Err(err) = &result {
            warn!(error = %err, target = target, "Navigation failed");
            self.restore_after_failure(prev, seq);
        }
        result
    }

    /// Dispatch a parsed trigger-element request
    pub async fn navigate_trigger(&self, request: &TriggerRequest) -> NavigateResult<()> {
        self.navigate(request.source.clone(), &request.target).await
    }

    /// Pop the current fragment and re-display the previous one from its
    /// cached rendering; no fetch and no fresh history entry. With one or
    /// zero entries this is equivalent to `close`.
    pub fn go_back(&self) {
        self.issue_seq();

        let previous = {
            let mut state = self.state.borrow_mut();
            if state.stack.len() > 1 {
                state.stack.pop();
                state.stack.current().cloned().map(|entry| {
                    let content = state
                        .cache
                        .get(&CacheKey::from_entry(&entry))
                        .unwrap_or_default()
                        .to_string();
                    (entry, content)
                })
            } else {
                None
            }
        };

        match previous {
            Some((entry, content)) => {
                debug!(target = entry.target.as_str(), "Navigated back");
                self.state.borrow_mut().dialog = DialogState::Displayed;
                self.surface.display(&content);
                self.execute_scripts(&content);
                self.update_back_affordance();
            }
            None => self.close(),
        }
    }

    /// The host's externally triggered back signal (its popstate equivalent)
    pub fn handle_external_back(&self) {
        self.go_back();
    }

    /// Clear the history stack and the displayed content
    pub fn close(&self) {
        self.issue_seq();
        {
            let mut state = self.state.borrow_mut();
            state.stack.clear();
            state.dialog = DialogState::Closed;
        }
        self.surface.clear();
        self.surface.set_back_enabled(false);
        info!("Dialog closed");
    }

    async fn try_navigate(
        &self,
        source: &FragmentSource,
        target: &str,
        seq: u64,
    ) -> NavigateResult<()> {
        let key = CacheKey::new(source, target);

        let cached = self.state.borrow().cache.get(&key).map(str::to_string);
        if let Some(content) = cached {
            debug!(target = target, "Fragment served from cache");
            self.present(HistoryEntry::new(source.clone(), target), &content);
            return Ok(());
        }

        let rendered = match source {
            FragmentSource::SamePage => {
                let template = self.dom.inner_markup(target).ok_or_else(|| {
                    NavigateError::TargetNotFound {
                        target: target.to_string(),
                    }
                })?;
                TemplateEngine::render(&template, &Context::new())
            }
            FragmentSource::Remote(url) => {
                self.state.borrow_mut().dialog = DialogState::Loading;
                self.surface.show_loading();

                info!(url = url.as_str(), "Fetching fragment");
                let response = self.transport.fetch(url).await?;

                if response.is_json() {
                    // Structured data: the live target region is the template
                    let payload: serde_json::Value = serde_json::from_str(&response.body)?;
                    let template = self.dom.inner_markup(target).ok_or_else(|| {
                        NavigateError::TargetNotFound {
                            target: target.to_string(),
                        }
                    })?;
                    TemplateEngine::render(&template, &Context::from_json(payload))
                } else {
                    // Markup: the target region inside the fetched fragment
                    let fragment = Fragment::parse(&response.body);
                    let element = fragment.element_by_id(target).ok_or_else(|| {
                        NavigateError::TargetNotFound {
                            target: target.to_string(),
                        }
                    })?;
                    TemplateEngine::render(element.inner_markup(), &Context::new())
                }
            }
        };

        // Completed results are always cacheable, stale or not
        self.state.borrow_mut().cache.insert(key, rendered.clone());

        if self.is_stale(seq) {
            debug!(target = target, "Discarding stale navigation completion");
            return Ok(());
        }

        self.present(HistoryEntry::new(source.clone(), target), &rendered);
        Ok(())
    }

    /// Push the entry, notify the host history, hand the content to the
    /// surface, and re-execute embedded scripts
    fn present(&self, entry: HistoryEntry, content: &str) {
        {
            let mut state = self.state.borrow_mut();
            state.stack.push(entry);
            state.dialog = DialogState::Displayed;
        }
        self.history.push_marker(HISTORY_MARKER);
        self.surface.display(content);
        self.execute_scripts(content);
        self.update_back_affordance();
    }

    fn execute_scripts(&self, content: &str) {
        for script in extract_scripts(content) {
            self.dom.insert_script(&script);
        }
    }

    fn update_back_affordance(&self) {
        let enabled = self.state.borrow().stack.len() > 1;
        self.surface.set_back_enabled(enabled);
    }

    /// Revert a failed navigation, unless a newer operation already owns the
    /// state
    fn restore_after_failure(&self, prev: DialogState, seq: u64) {
        let content = {
            let mut state = self.state.borrow_mut();
            if state.latest_seq != seq || state.dialog == prev {
                return;
            }
            state.dialog = prev;
            state.stack.current().and_then(|entry| {
                state
                    .cache
                    .get(&CacheKey::from_entry(entry))
                    .map(str::to_string)
            })
        };

        match prev {
            DialogState::Displayed => {
                if let Some(content) = content {
                    self.surface.display(&content);
                }
            }
            DialogState::Closed => self.surface.clear(),
            DialogState::Loading => {}
        }
    }

    fn issue_seq(&self) -> u64 {
        let mut state = self.state.borrow_mut();
        state.latest_seq += 1;
        state.latest_seq
    }

    fn is_stale(&self, seq: u64) -> bool {
        self.state.borrow().latest_seq != seq
    }
}
