//! Document trait for abstracting host focus I/O.
//!
//! The [`Document`] trait decouples the synchronization engine from a
//! specific DOM. Each host implements the trait to provide node lookup,
//! focus movement, event delegation and microtask scheduling, while the
//! generic [`crate::FocusEnhancer`] handles all synchronization logic.

use std::{fmt, rc::Rc};

/// Native focus event kinds the engine observes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FocusEventKind {
    /// Focus moved onto the target (`focusin`).
    FocusIn,
    /// Focus left the target (`focusout`).
    FocusOut,
}

impl fmt::Display for FocusEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FocusIn => f.write_str("focusin"),
            Self::FocusOut => f.write_str("focusout"),
        }
    }
}

/// A bubbling focus event delivered at the document root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FocusEvent<N> {
    /// Event kind.
    pub kind: FocusEventKind,
    /// Node the event was dispatched on.
    pub target: N,
    /// For `focusout`, the node receiving focus next. For `focusin`, the node
    /// that lost focus. `None` when focus leaves or enters from outside the
    /// document.
    pub related_target: Option<N>,
}

/// Listener registered at the document root.
pub type FocusListener<N> = Rc<dyn Fn(&FocusEvent<N>)>;

/// Deferred work run at the next microtask checkpoint.
pub type Microtask = Box<dyn FnOnce()>;

/// Handle for removing a root listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Abstracts the focus-related surface of a document.
///
/// All methods take `&self`: hosts are single-threaded and use interior
/// mutability. Implementations must tolerate re-entrant calls from inside
/// listeners and microtasks.
///
/// # Invariants
///
/// Implementations MUST guarantee:
///
/// - [`focus`](Document::focus) on the node that already holds focus fires
///   no events, and [`blur`](Document::blur) on a node that does not hold
///   focus fires no events
/// - events fire synchronously, inside the `focus`/`blur` call that caused
///   them
/// - microtasks run in FIFO order, after the current task completes
pub trait Document {
    /// Node handle type.
    type Node: Clone + PartialEq + fmt::Debug + 'static;

    /// First mounted node, in document order, whose `attribute` equals
    /// `value`. Always queries the live tree.
    fn query_attribute(&self, attribute: &str, value: &str) -> Option<Self::Node>;

    /// Value of an attribute on a node. `None` if absent.
    fn attribute(&self, node: &Self::Node, attribute: &str) -> Option<String>;

    /// Node currently holding focus. `None` if focus rests on the body or
    /// outside the document.
    fn active_element(&self) -> Option<Self::Node>;

    /// Move focus to a node.
    fn focus(&self, node: &Self::Node);

    /// Remove focus from a node, returning it to the body.
    fn blur(&self, node: &Self::Node);

    /// Attach a listener for one event kind at the document root.
    fn add_listener(&self, kind: FocusEventKind, listener: FocusListener<Self::Node>) -> ListenerId;

    /// Detach a root listener. Returns `false` if it was not attached.
    fn remove_listener(&self, id: ListenerId) -> bool;

    /// Queue work for the next microtask checkpoint.
    fn queue_microtask(&self, task: Microtask);
}
