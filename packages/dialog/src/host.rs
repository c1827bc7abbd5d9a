//! Host-environment collaborators: the document tree, the host's navigation
//! history, and the dialog surface. Each trait has an in-memory
//! implementation usable both as a test double and by hosts without a live
//! browsing environment. Methods take `&self`; implementations manage their
//! own interior mutability.

use crate::markup::ScriptSource;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Hierarchical markup tree access
pub trait DocumentTree {
    /// Inner markup of the element with the given id, if present
    fn inner_markup(&self, id: &str) -> Option<String>;

    /// Replace the inner markup of the element with the given id
    fn set_inner_markup(&self, id: &str, markup: &str);

    /// Insert an executable equivalent of a script element found in rendered
    /// content. Inert markup insertion does not run embedded scripts, so the
    /// host must re-create them.
    fn insert_script(&self, script: &ScriptSource);
}

/// External navigation history: an opaque append-only marker stack. The
/// externally triggered "go back" signal reaches the controller through
/// `DialogController::handle_external_back`.
pub trait BrowserHistory {
    fn push_marker(&self, marker: &str);
}

/// Presentation boundary of the dialog chrome
pub trait DialogSurface {
    fn show_loading(&self);
    fn display(&self, content: &str);
    fn clear(&self);
    fn set_back_enabled(&self, enabled: bool);
}

/// In-memory document tree: a flat id → inner-markup map that records
/// inserted scripts. Clones share state.
#[derive(Clone, Default)]
pub struct InMemoryDocument {
    inner: Rc<RefCell<DocumentState>>,
}

#[derive(Default)]
struct DocumentState {
    elements: HashMap<String, String>,
    inserted_scripts: Vec<ScriptSource>,
}

impl InMemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_element(self, id: impl Into<String>, markup: impl Into<String>) -> Self {
        self.inner
            .borrow_mut()
            .elements
            .insert(id.into(), markup.into());
        self
    }

    /// Scripts handed over for re-execution, in insertion order
    pub fn inserted_scripts(&self) -> Vec<ScriptSource> {
        self.inner.borrow().inserted_scripts.clone()
    }
}

impl DocumentTree for InMemoryDocument {
    fn inner_markup(&self, id: &str) -> Option<String> {
        self.inner.borrow().elements.get(id).cloned()
    }

    fn set_inner_markup(&self, id: &str, markup: &str) {
        self.inner
            .borrow_mut()
            .elements
            .insert(id.to_string(), markup.to_string());
    }

    fn insert_script(&self, script: &ScriptSource) {
        self.inner.borrow_mut().inserted_scripts.push(script.clone());
    }
}

/// Recording browser-history double. Clones share state.
#[derive(Clone, Default)]
pub struct MockBrowserHistory {
    markers: Rc<RefCell<Vec<String>>>,
}

impl MockBrowserHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn markers(&self) -> Vec<String> {
        self.markers.borrow().clone()
    }
}

impl BrowserHistory for MockBrowserHistory {
    fn push_marker(&self, marker: &str) {
        self.markers.borrow_mut().push(marker.to_string());
    }
}

/// What happened on a [`MockSurface`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Loading,
    Displayed(String),
    Cleared,
    BackEnabled(bool),
}

/// Recording surface double. Clones share state.
#[derive(Clone, Default)]
pub struct MockSurface {
    inner: Rc<RefCell<SurfaceState>>,
}

#[derive(Default)]
struct SurfaceState {
    events: Vec<SurfaceEvent>,
    content: Option<String>,
}

impl MockSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.inner.borrow().events.clone()
    }

    /// Currently displayed content; `None` after a clear
    pub fn content(&self) -> Option<String> {
        self.inner.borrow().content.clone()
    }
}

impl DialogSurface for MockSurface {
    fn show_loading(&self) {
        self.inner.borrow_mut().events.push(SurfaceEvent::Loading);
    }

    fn display(&self, content: &str) {
        let mut state = self.inner.borrow_mut();
        state.events.push(SurfaceEvent::Displayed(content.to_string()));
        state.content = Some(content.to_string());
    }

    fn clear(&self) {
        let mut state = self.inner.borrow_mut();
        state.events.push(SurfaceEvent::Cleared);
        state.content = None;
    }

    fn set_back_enabled(&self, enabled: bool) {
        self.inner
            .borrow_mut()
            .events
            .push(SurfaceEvent::BackEnabled(enabled));
    }
}
