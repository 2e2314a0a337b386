//! Simulated document implementing the [`Document`] trait.
//!
//! `SimDocument` provides the same focus surface as a browser document but
//! runs deterministically in-process. It implements [`Document`] so the same
//! [`focuslink_core::FocusEnhancer`] code runs against it in tests, the
//! fuzzer and the command line simulator.
//!
//! # Focus semantics
//!
//! - `focus(n)` on the active node fires nothing. Otherwise it fires
//!   `focusout` on the previous node (related: `n`) and then `focusin` on `n`
//!   (related: previous node).
//! - `blur(n)` fires `focusout` (related: `None`) only if `n` is active.
//! - Removing a subtree containing the active node blurs it with
//!   `focusout` (related: `None`).
//! - Microtasks queue in FIFO order and only run from
//!   [`SimDocument::run_microtasks`].

use std::{
    cell::{Cell, RefCell},
    collections::{BTreeMap, VecDeque},
    fmt,
    rc::Rc,
};

use focuslink_core::{Document, FocusEvent, FocusEventKind, FocusListener, ListenerId, Microtask};
use thiserror::Error;

/// Upper bound on microtasks drained by one [`SimDocument::run_microtasks`]
/// call. Exceeding it means forward and backward sync never settled.
pub const MICROTASK_LIMIT: usize = 10_000;

const ROOT: NodeId = NodeId(0);
const BODY: NodeId = NodeId(1);

/// Handle to a node in a [`SimDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Errors from structural operations on a [`SimDocument`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// Node handle does not belong to this document.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// Node was removed from the document.
    #[error("node {0} is not connected")]
    Disconnected(NodeId),

    /// The document element and body cannot be removed.
    #[error("node {0} cannot be removed")]
    ProtectedNode(NodeId),

    /// Microtasks kept scheduling more microtasks.
    #[error("microtask queue did not drain within {limit} tasks")]
    MicrotaskLimit {
        /// Number of tasks run before giving up.
        limit: usize,
    },
}

/// Element description used to mount a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: BTreeMap<String, String>,
}

impl Element {
    /// Element with the given tag and no attributes.
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into(), attributes: BTreeMap::new() }
    }

    /// `<input>` element, the usual focusable node in tests.
    pub fn input() -> Self {
        Self::new("input")
    }

    /// Set an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Set the `id` attribute.
    #[must_use]
    pub fn with_id(self, id: impl Into<String>) -> Self {
        self.with_attribute("id", id)
    }
}

#[derive(Debug)]
struct NodeData {
    tag: String,
    attributes: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    connected: bool,
}

#[derive(Debug)]
struct Tree {
    nodes: Vec<NodeData>,
    active: Option<NodeId>,
}

impl Tree {
    fn new() -> Self {
        let root = NodeData {
            tag: "html".into(),
            attributes: BTreeMap::new(),
            parent: None,
            children: vec![BODY],
            connected: true,
        };
        let body = NodeData {
            tag: "body".into(),
            attributes: BTreeMap::new(),
            parent: Some(ROOT),
            children: Vec::new(),
            connected: true,
        };
        Self { nodes: vec![root, body], active: None }
    }

    fn get(&self, node: NodeId) -> Result<&NodeData, SimError> {
        self.nodes.get(node.0 as usize).ok_or(SimError::UnknownNode(node))
    }

    fn get_mut(&mut self, node: NodeId) -> Result<&mut NodeData, SimError> {
        self.nodes.get_mut(node.0 as usize).ok_or(SimError::UnknownNode(node))
    }

    fn connected(&self, node: NodeId) -> Result<&NodeData, SimError> {
        let data = self.get(node)?;
        if data.connected { Ok(data) } else { Err(SimError::Disconnected(node)) }
    }

    fn insert(&mut self, parent: NodeId, element: Element) -> Result<NodeId, SimError> {
        self.connected(parent)?;
        Ok(self.push_child(parent, element))
    }

    /// Append without validating `parent`. Callers check it is connected.
    fn push_child(&mut self, parent: NodeId, element: Element) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            tag: element.tag,
            attributes: element.attributes,
            parent: Some(parent),
            children: Vec::new(),
            connected: true,
        });
        if let Some(data) = self.nodes.get_mut(parent.0 as usize) {
            data.children.push(id);
        }
        id
    }

    /// Pre-order traversal of connected nodes.
    fn document_order(&self) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![ROOT];
        while let Some(node) = stack.pop() {
            order.push(node);
            if let Some(data) = self.nodes.get(node.0 as usize) {
                stack.extend(data.children.iter().rev().copied());
            }
        }
        order
    }

    /// Nodes of the subtree rooted at `node`, including `node`.
    fn subtree(&self, node: NodeId) -> Vec<NodeId> {
        let mut nodes = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            nodes.push(current);
            if let Some(data) = self.nodes.get(current.0 as usize) {
                stack.extend(data.children.iter().copied());
            }
        }
        nodes
    }
}

struct SimInner {
    tree: RefCell<Tree>,
    listeners: RefCell<Vec<(ListenerId, FocusEventKind, FocusListener<NodeId>)>>,
    next_listener: Cell<u64>,
    microtasks: RefCell<VecDeque<Microtask>>,
    events: RefCell<Vec<FocusEvent<NodeId>>>,
}

/// Deterministic in-memory document.
///
/// Cheap clonable handle; clones share the same tree, listeners and
/// microtask queue.
#[derive(Clone)]
pub struct SimDocument {
    inner: Rc<SimInner>,
}

impl Default for SimDocument {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SimDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SimDocument")
            .field("nodes", &self.inner.tree.borrow().nodes.len())
            .field("active", &self.inner.tree.borrow().active)
            .field("listeners", &self.inner.listeners.borrow().len())
            .field("microtasks", &self.inner.microtasks.borrow().len())
            .finish()
    }
}

impl SimDocument {
    /// Empty document: `<html><body></body></html>`.
    pub fn new() -> Self {
        let inner = SimInner {
            tree: RefCell::new(Tree::new()),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(0),
            microtasks: RefCell::new(VecDeque::new()),
            events: RefCell::new(Vec::new()),
        };
        Self { inner: Rc::new(inner) }
    }

    /// The document element.
    pub fn root(&self) -> NodeId {
        ROOT
    }

    /// The body element.
    pub fn body(&self) -> NodeId {
        BODY
    }

    /// Mount an element as the last child of the body.
    pub fn append(&self, element: Element) -> NodeId {
        // The body is never removed.
        self.inner.tree.borrow_mut().push_child(BODY, element)
    }

    /// Mount an element as the last child of `parent`.
    pub fn append_child(&self, parent: NodeId, element: Element) -> Result<NodeId, SimError> {
        self.inner.tree.borrow_mut().insert(parent, element)
    }

    /// Remove a node and its subtree from the document.
    ///
    /// If focus rests inside the subtree it is blurred first, firing
    /// `focusout` with no related target.
    pub fn remove(&self, node: NodeId) -> Result<(), SimError> {
        let blurred = {
            let mut tree = self.inner.tree.borrow_mut();
            if node == ROOT || node == BODY {
                return Err(SimError::ProtectedNode(node));
            }
            let parent = tree.connected(node)?.parent;

            let subtree = tree.subtree(node);
            for id in &subtree {
                tree.get_mut(*id)?.connected = false;
            }
            if let Some(parent) = parent {
                tree.get_mut(parent)?.children.retain(|child| *child != node);
            }
            tree.get_mut(node)?.parent = None;

            let blurred = tree.active.filter(|active| subtree.contains(active));
            if blurred.is_some() {
                tree.active = None;
            }
            blurred
        };

        tracing::trace!(%node, "removed node");
        if let Some(active) = blurred {
            self.deliver(FocusEvent {
                kind: FocusEventKind::FocusOut,
                target: active,
                related_target: None,
            });
        }
        Ok(())
    }

    /// Set an attribute on a node.
    pub fn set_attribute(
        &self,
        node: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<(), SimError> {
        let mut tree = self.inner.tree.borrow_mut();
        tree.get_mut(node)?.attributes.insert(name.into(), value.into());
        Ok(())
    }

    /// First connected node whose `id` attribute matches.
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.query_attribute("id", id)
    }

    /// Whether a node is part of the document.
    pub fn is_connected(&self, node: NodeId) -> bool {
        self.inner.tree.borrow().get(node).is_ok_and(|data| data.connected)
    }

    /// Short human-readable description, e.g. `input#name[data-focus=a]`.
    pub fn describe(&self, node: NodeId) -> String {
        let tree = self.inner.tree.borrow();
        let Ok(data) = tree.get(node) else {
            return node.to_string();
        };

        let mut label = data.tag.clone();
        if let Some(id) = data.attributes.get("id") {
            label.push('#');
            label.push_str(id);
        }
        for (name, value) in data.attributes.iter().filter(|(name, _)| name.as_str() != "id") {
            label.push_str(&format!("[{name}={value}]"));
        }
        label
    }

    /// Deliver a synthetic event to root listeners without moving focus.
    pub fn dispatch_event(&self, event: FocusEvent<NodeId>) {
        self.deliver(event);
    }

    /// Run queued microtasks, including those queued while draining.
    ///
    /// Returns the number of tasks run.
    pub fn run_microtasks(&self) -> Result<usize, SimError> {
        let mut ran = 0;
        loop {
            if ran == MICROTASK_LIMIT && self.pending_microtasks() > 0 {
                return Err(SimError::MicrotaskLimit { limit: MICROTASK_LIMIT });
            }
            let next = self.inner.microtasks.borrow_mut().pop_front();
            let Some(task) = next else {
                break;
            };
            ran += 1;
            task();
        }
        Ok(ran)
    }

    /// Number of microtasks waiting to run.
    pub fn pending_microtasks(&self) -> usize {
        self.inner.microtasks.borrow().len()
    }

    /// Number of attached root listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }

    /// Drain the log of delivered events.
    pub fn take_events(&self) -> Vec<FocusEvent<NodeId>> {
        std::mem::take(&mut *self.inner.events.borrow_mut())
    }

    fn deliver(&self, event: FocusEvent<NodeId>) {
        tracing::trace!(
            kind = %event.kind,
            target = %event.target,
            related = ?event.related_target,
            "delivering focus event"
        );
        self.inner.events.borrow_mut().push(event.clone());

        let listeners: Vec<FocusListener<NodeId>> = self
            .inner
            .listeners
            .borrow()
            .iter()
            .filter(|(_, kind, _)| *kind == event.kind)
            .map(|(_, _, listener)| Rc::clone(listener))
            .collect();
        for listener in listeners {
            listener(&event);
        }
    }
}

impl Document for SimDocument {
    type Node = NodeId;

    fn query_attribute(&self, attribute: &str, value: &str) -> Option<NodeId> {
        let tree = self.inner.tree.borrow();
        tree.document_order().into_iter().find(|node| {
            tree.get(*node)
                .is_ok_and(|data| data.attributes.get(attribute).is_some_and(|v| v == value))
        })
    }

    fn attribute(&self, node: &NodeId, attribute: &str) -> Option<String> {
        let tree = self.inner.tree.borrow();
        tree.get(*node).ok().and_then(|data| data.attributes.get(attribute).cloned())
    }

    fn active_element(&self) -> Option<NodeId> {
        self.inner.tree.borrow().active
    }

    fn focus(&self, node: &NodeId) {
        let node = *node;
        let previous = {
            let mut tree = self.inner.tree.borrow_mut();
            if node == ROOT || node == BODY || tree.connected(node).is_err() {
                tracing::trace!(%node, "ignoring focus on unfocusable node");
                return;
            }
            if tree.active == Some(node) {
                return;
            }
            tree.active.replace(node)
        };

        if let Some(previous) = previous {
            self.deliver(FocusEvent {
                kind: FocusEventKind::FocusOut,
                target: previous,
                related_target: Some(node),
            });
        }
        self.deliver(FocusEvent {
            kind: FocusEventKind::FocusIn,
            target: node,
            related_target: previous,
        });
    }

    fn blur(&self, node: &NodeId) {
        let node = *node;
        {
            let mut tree = self.inner.tree.borrow_mut();
            if tree.active != Some(node) {
                return;
            }
            tree.active = None;
        }

        self.deliver(FocusEvent {
            kind: FocusEventKind::FocusOut,
            target: node,
            related_target: None,
        });
    }

    fn add_listener(&self, kind: FocusEventKind, listener: FocusListener<NodeId>) -> ListenerId {
        let id = ListenerId(self.inner.next_listener.get());
        self.inner.next_listener.set(id.0 + 1);
        self.inner.listeners.borrow_mut().push((id, kind, listener));
        id
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        let mut listeners = self.inner.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(listener, _, _)| *listener != id);
        listeners.len() != before
    }

    fn queue_microtask(&self, task: Microtask) {
        self.inner.microtasks.borrow_mut().push_back(task);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording_listener(
        document: &SimDocument,
        kind: FocusEventKind,
    ) -> Rc<RefCell<Vec<FocusEvent<NodeId>>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        document.add_listener(
            kind,
            Rc::new(move |event: &FocusEvent<NodeId>| sink.borrow_mut().push(event.clone())),
        );
        seen
    }

    #[test]
    fn focus_moves_active_element_and_fires_pair() {
        let document = SimDocument::new();
        let a = document.append(Element::input().with_id("a"));
        let b = document.append(Element::input().with_id("b"));

        document.focus(&a);
        let _ = document.take_events();
        document.focus(&b);

        assert_eq!(document.active_element(), Some(b));
        assert_eq!(document.take_events(), vec![
            FocusEvent { kind: FocusEventKind::FocusOut, target: a, related_target: Some(b) },
            FocusEvent { kind: FocusEventKind::FocusIn, target: b, related_target: Some(a) },
        ]);
    }

    #[test]
    fn focusing_active_node_fires_nothing() {
        let document = SimDocument::new();
        let a = document.append(Element::input());

        document.focus(&a);
        let _ = document.take_events();
        document.focus(&a);

        assert!(document.take_events().is_empty());
    }

    #[test]
    fn blur_of_inactive_node_fires_nothing() {
        let document = SimDocument::new();
        let a = document.append(Element::input());
        let b = document.append(Element::input());

        document.focus(&a);
        let _ = document.take_events();
        document.blur(&b);

        assert!(document.take_events().is_empty());
        assert_eq!(document.active_element(), Some(a));
    }

    #[test]
    fn removing_focused_subtree_blurs() {
        let document = SimDocument::new();
        let form = document.append(Element::new("form"));
        let field = document.append_child(form, Element::input()).unwrap_or(form);
        let focus_out = recording_listener(&document, FocusEventKind::FocusOut);

        document.focus(&field);
        assert!(document.remove(form).is_ok());

        assert_eq!(document.active_element(), None);
        assert!(!document.is_connected(field));
        assert_eq!(focus_out.borrow().as_slice(), &[FocusEvent {
            kind: FocusEventKind::FocusOut,
            target: field,
            related_target: None,
        }]);
    }

    #[test]
    fn query_follows_document_order() {
        let document = SimDocument::new();
        let outer = document.append(Element::new("div"));
        let later = document.append(Element::input().with_attribute("data-focus", "dup"));
        let nested = document
            .append_child(outer, Element::input().with_attribute("data-focus", "dup"))
            .unwrap_or(later);

        assert_eq!(document.query_attribute("data-focus", "dup"), Some(nested));

        assert!(document.remove(nested).is_ok());
        assert_eq!(document.query_attribute("data-focus", "dup"), Some(later));
    }

    #[test]
    fn root_and_body_cannot_be_removed_or_focused() {
        let document = SimDocument::new();

        assert_eq!(document.remove(document.body()), Err(SimError::ProtectedNode(document.body())));
        document.focus(&document.body());
        assert_eq!(document.active_element(), None);
    }

    #[test]
    fn microtasks_run_in_fifo_order_including_nested() {
        let document = SimDocument::new();
        let order = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&order);
        let nested_doc = document.clone();
        document.queue_microtask(Box::new(move || {
            first.borrow_mut().push(1);
            let nested = Rc::clone(&first);
            nested_doc.queue_microtask(Box::new(move || nested.borrow_mut().push(3)));
        }));
        let second = Rc::clone(&order);
        document.queue_microtask(Box::new(move || second.borrow_mut().push(2)));

        assert_eq!(document.run_microtasks(), Ok(3));
        assert_eq!(*order.borrow(), vec![1, 2, 3]);
    }

    #[test]
    fn runaway_microtasks_hit_the_limit() {
        fn requeue(document: SimDocument) {
            let next = document.clone();
            document.queue_microtask(Box::new(move || requeue(next)));
        }

        let document = SimDocument::new();
        requeue(document.clone());

        assert_eq!(
            document.run_microtasks(),
            Err(SimError::MicrotaskLimit { limit: MICROTASK_LIMIT })
        );
        assert_eq!(document.pending_microtasks(), 1, "the task past the limit stays queued");
    }

    #[test]
    fn exactly_limit_microtasks_drain() {
        let document = SimDocument::new();
        let ran = Rc::new(Cell::new(0));
        for _ in 0..MICROTASK_LIMIT {
            let counter = Rc::clone(&ran);
            document.queue_microtask(Box::new(move || counter.set(counter.get() + 1)));
        }

        assert_eq!(document.run_microtasks(), Ok(MICROTASK_LIMIT));
        assert_eq!(ran.get(), MICROTASK_LIMIT);
        assert_eq!(document.pending_microtasks(), 0);
    }

    #[test]
    fn append_and_append_child_share_document_order() {
        let document = SimDocument::new();
        let first = document.append(Element::input().with_id("first"));
        let form = document.append(Element::new("form"));
        let nested = document.append_child(form, Element::input().with_id("nested")).ok();
        let last = document.append(Element::input().with_id("last"));

        assert!(document.is_connected(first) && document.is_connected(last));
        assert_eq!(document.get_element_by_id("nested"), nested);
        assert_eq!(document.get_element_by_id("last"), Some(last));
        assert_eq!(document.get_element_by_id("missing"), None);
    }

    #[test]
    fn get_element_by_id_skips_removed_nodes() {
        let document = SimDocument::new();
        let original = document.append(Element::input().with_id("field"));
        let replacement = document.append(Element::input().with_id("field"));

        assert_eq!(document.get_element_by_id("field"), Some(original));
        assert!(document.remove(original).is_ok());
        assert_eq!(document.get_element_by_id("field"), Some(replacement));
    }

    #[test]
    fn set_attribute_is_visible_to_queries() {
        let document = SimDocument::new();
        let node = document.append(Element::input());

        assert_eq!(document.query_attribute("data-focus", "x"), None);
        assert!(document.set_attribute(node, "data-focus", "x").is_ok());

        assert_eq!(document.query_attribute("data-focus", "x"), Some(node));
        assert_eq!(document.attribute(&node, "data-focus").as_deref(), Some("x"));
    }

    #[test]
    fn describe_lists_attributes() {
        let document = SimDocument::new();
        let node = document.append(Element::input().with_id("name").with_attribute("data-focus", "a"));

        assert_eq!(document.describe(node), "input#name[data-focus=a]");
    }
}
