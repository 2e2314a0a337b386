//! Focus synchronization core for focuslink
//!
//! Keeps a centralized state container in agreement with the element that
//! holds input focus in a document, in both directions. Native focus events
//! become dispatched actions, and state changes become imperative focus/blur
//! calls on the document.
//!
//! The document is a host abstraction ([`Document`]) so the same engine runs
//! against a browser binding or the deterministic simulated document in
//! `focuslink-harness`.
//!
//! # Components
//!
//! - [`FocusAction`]: the two focus intents (set target, clear target)
//! - [`FocusState`]: the persisted focus slice
//! - [`FocusReducer`]: pure fold of actions into [`FocusState`]
//! - [`Store`]: single-threaded state container with change notifications
//! - [`Document`]: trait for host-specific focus I/O
//! - [`FocusEnhancer`]: the synchronization engine wrapping store creation

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod action;
mod config;
mod document;
mod enhancer;
mod error;
mod reducer;
pub mod selector;
mod state;
mod store;

pub use action::{FocusAction, FocusActionLike, FocusId, FocusTarget, UNMANAGED, clear_focus, focus};
pub use config::{DEFAULT_FOCUS_ATTRIBUTE, FocusConfig};
pub use document::{Document, FocusEvent, FocusEventKind, FocusListener, ListenerId, Microtask};
pub use enhancer::{FocusBinding, FocusEnhancer, FocusedStore};
pub use error::{ConfigError, StoreError};
pub use reducer::{FocusReducer, Reducer, reduce, reduce_action};
pub use state::{FocusSlice, FocusState};
pub use store::{Store, Subscription};
