//! # Lightbox Dialog
//!
//! Loads markup or JSON fragments into an overlay dialog, rendering them
//! through the directive template language and tracking a navigable history
//! of visited fragments synchronized with the host's back/forward mechanism.
//!
//! The [`DialogController`] is an explicit object constructed with injected
//! collaborators — transport, document tree, host history, dialog surface —
//! so multiple independent instances can coexist and tests run
//! deterministically against the in-memory implementations.
//!
//! ## Fragment resolution
//!
//! - JSON responses are parsed into a render context; the template is the
//!   live document's current markup for the target region.
//! - Markup responses are scanned for the target region; its inner markup is
//!   rendered against an empty context.
//! - Same-page requests (a trigger with no `href`) skip the transport and
//!   render the live target region directly.
//!
//! Rendered fragments are memoized per (source, target) pair for the life of
//! the controller; a pair navigated twice fetches exactly once.

pub mod cache;
pub mod controller;
pub mod history;
pub mod host;
pub mod markup;
pub mod transport;
pub mod trigger;

pub use cache::{CacheKey, FragmentCache};
pub use controller::{
    DialogController, DialogState, NavigateError, NavigateResult, HISTORY_MARKER,
};
pub use history::{HistoryEntry, HistoryStack};
pub use host::{
    BrowserHistory, DialogSurface, DocumentTree, InMemoryDocument, MockBrowserHistory,
    MockSurface, SurfaceEvent,
};
pub use markup::{extract_scripts, Fragment, FragmentElement, ScriptSource};
pub use transport::{FetchResponse, HttpTransport, MockTransport, Transport, TransportError};
pub use trigger::{FragmentSource, TriggerRequest, MARKER_ATTR, SOURCE_ATTR, TARGET_ATTR};
