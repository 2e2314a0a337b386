//! Focus synchronization engine.
//!
//! The [`FocusEnhancer`] wraps store construction and binds the resulting
//! [`Store`] to a [`Document`] in both directions.
//!
//! # Responsibilities
//!
//! - Backward sync: translates `focusin`/`focusout` events observed at the
//!   document root into [`FocusAction`] dispatches, synchronously inside
//!   event delivery.
//! - Forward sync: on every store change, queues one microtask that re-reads
//!   the freshest state and moves or removes real focus to match it.
//! - Lifecycle: listeners and the store subscription live exactly as long as
//!   the [`FocusBinding`]. Disposal detaches both and neutralises microtasks
//!   already queued.
//!
//! # Feedback
//!
//! Forward sync raises native events that feed backward sync. The cycle
//! terminates because the reducer keeps the state `Rc` when an action does
//! not change the focused element (the store then stays silent), and because
//! the host fires no events for focus calls that do not move focus.
//! [`FocusConfig::guard_reentrancy`] adds an explicit guard for hosts that
//! break the second rule.

use std::{cell::Cell, ops::Deref, rc::Rc};

use crate::{
    ConfigError, Document, FocusAction, FocusActionLike, FocusConfig, FocusEvent, FocusEventKind,
    FocusSlice, FocusTarget, ListenerId, Store, Subscription, selector,
};

/// Store enhancer binding a store's focus slice to a document.
#[derive(Debug, Clone)]
pub struct FocusEnhancer<D> {
    document: D,
    config: FocusConfig,
}

impl<D> FocusEnhancer<D>
where
    D: Document + Clone + 'static,
{
    /// Enhancer using the default `data-focus` attribute.
    pub fn new(document: D) -> Self {
        Self { document, config: FocusConfig::default() }
    }

    /// Enhancer with an explicit configuration.
    pub fn with_config(document: D, config: FocusConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { document, config })
    }

    /// Wrap a store constructor.
    ///
    /// The returned constructor builds the store, attaches the document
    /// listeners, subscribes forward sync and hands the store back inside a
    /// [`FocusedStore`].
    pub fn enhance<S, A, C>(self, create: C) -> impl FnOnce() -> FocusedStore<S, A, D>
    where
        S: FocusSlice + 'static,
        A: FocusActionLike + 'static,
        C: FnOnce() -> Store<S, A>,
    {
        move || {
            let store = create();
            self.attach(store)
        }
    }

    /// Bind an already constructed store.
    pub fn attach<S, A>(&self, store: Store<S, A>) -> FocusedStore<S, A, D>
    where
        S: FocusSlice + 'static,
        A: FocusActionLike + 'static,
    {
        let engine = Rc::new(SyncEngine {
            document: self.document.clone(),
            store: store.clone(),
            attribute: self.config.attribute.clone(),
            guard_reentrancy: self.config.guard_reentrancy,
            attached: Cell::new(true),
            flush_scheduled: Cell::new(false),
            applying: Cell::new(false),
        });

        let focus_in = {
            let engine = Rc::clone(&engine);
            self.document.add_listener(
                FocusEventKind::FocusIn,
                Rc::new(move |event: &FocusEvent<D::Node>| engine.on_focus_in(event)),
            )
        };
        let focus_out = {
            let engine = Rc::clone(&engine);
            self.document.add_listener(
                FocusEventKind::FocusOut,
                Rc::new(move |event: &FocusEvent<D::Node>| engine.on_focus_out(event)),
            )
        };
        let subscription = {
            let engine = Rc::clone(&engine);
            store.subscribe(move || engine.schedule_flush())
        };

        tracing::debug!(attribute = %self.config.attribute, "focus sync attached");

        let binding = FocusBinding {
            engine,
            listeners: vec![focus_in, focus_out],
            subscription: Some(subscription),
        };
        FocusedStore { store, binding }
    }
}

/// Shared state of one store/document binding.
struct SyncEngine<S, A, D> {
    document: D,
    store: Store<S, A>,
    attribute: String,
    guard_reentrancy: bool,
    /// Cleared on disposal; every entry point checks it first.
    attached: Cell<bool>,
    /// A forward-sync microtask is queued and has not run yet.
    flush_scheduled: Cell<bool>,
    /// Forward sync is inside an imperative focus/blur call.
    applying: Cell<bool>,
}

impl<S, A, D> SyncEngine<S, A, D>
where
    S: FocusSlice + 'static,
    A: FocusActionLike + 'static,
    D: Document + 'static,
{
    fn on_focus_in(&self, event: &FocusEvent<D::Node>) {
        if self.ignores_native_events() {
            return;
        }

        let target = selector::target_of(&self.document, &self.attribute, &event.target);
        tracing::debug!(%target, "focusin");
        self.dispatch(FocusAction::Focus { target });
    }

    fn on_focus_out(&self, event: &FocusEvent<D::Node>) {
        if self.ignores_native_events() {
            return;
        }

        // The paired focusin owns the next transition.
        if let Some(next) = &event.related_target {
            tracing::trace!(?next, "focusout with successor");
            return;
        }

        tracing::debug!(target = ?event.target, "focus left the document");
        self.dispatch(FocusAction::Clear);
    }

    fn ignores_native_events(&self) -> bool {
        if !self.attached.get() {
            return true;
        }
        if self.guard_reentrancy && self.applying.get() {
            tracing::trace!("ignoring event raised by forward sync");
            return true;
        }
        false
    }

    fn dispatch(&self, action: FocusAction) {
        if let Err(error) = self.store.dispatch(A::from(action)) {
            tracing::warn!(%error, "dropping focus dispatch");
        }
    }

    fn schedule_flush(self: &Rc<Self>) {
        if !self.attached.get() {
            return;
        }
        if self.flush_scheduled.replace(true) {
            tracing::trace!("forward sync already queued");
            return;
        }

        let engine = Rc::clone(self);
        self.document.queue_microtask(Box::new(move || engine.flush()));
    }

    /// Apply the freshest state to the document.
    fn flush(&self) {
        self.flush_scheduled.set(false);
        if !self.attached.get() {
            tracing::trace!("skipping forward sync after disposal");
            return;
        }

        let state = self.store.get_state();
        match &state.focus_state().element {
            Some(target) => self.focus_target(target),
            None => self.blur_active(),
        }
    }

    fn focus_target(&self, target: &FocusTarget) {
        let Some(node) = selector::resolve(&self.document, &self.attribute, target) else {
            tracing::trace!(%target, "focus target not resolvable");
            return;
        };

        if self.document.active_element().as_ref() == Some(&node) {
            tracing::trace!(%target, "focus target already active");
            return;
        }

        tracing::debug!(%target, ?node, "moving focus");
        self.apply(|| self.document.focus(&node));
    }

    fn blur_active(&self) {
        let Some(active) = self.document.active_element() else {
            return;
        };

        tracing::debug!(?active, "clearing focus");
        self.apply(|| self.document.blur(&active));
    }

    fn apply(&self, effect: impl FnOnce()) {
        let outer = self.applying.replace(true);
        effect();
        self.applying.set(outer);
    }
}

/// Attachment of one store to one document.
///
/// Dropping the binding detaches it.
pub struct FocusBinding<S, A, D: Document> {
    engine: Rc<SyncEngine<S, A, D>>,
    listeners: Vec<ListenerId>,
    subscription: Option<Subscription<S, A>>,
}

impl<S, A, D: Document> FocusBinding<S, A, D> {
    /// Whether listeners and the store subscription are still attached.
    pub fn is_attached(&self) -> bool {
        self.engine.attached.get()
    }

    /// Remove the document listeners and the store subscription.
    ///
    /// Idempotent. Forward-sync microtasks queued before detaching become
    /// no-ops.
    pub fn detach(&mut self) {
        if !self.engine.attached.replace(false) {
            return;
        }

        for id in self.listeners.drain(..) {
            self.engine.document.remove_listener(id);
        }
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
        }

        tracing::debug!("focus sync detached");
    }
}

impl<S, A, D: Document> Drop for FocusBinding<S, A, D> {
    fn drop(&mut self) {
        self.detach();
    }
}

/// Store returned by an enhanced constructor.
///
/// Dereferences to the underlying [`Store`]; the focus binding lives as
/// long as this value or until [`dispose`](FocusedStore::dispose).
pub struct FocusedStore<S, A, D: Document> {
    store: Store<S, A>,
    binding: FocusBinding<S, A, D>,
}

impl<S, A, D: Document> FocusedStore<S, A, D> {
    /// The underlying store.
    pub fn store(&self) -> &Store<S, A> {
        &self.store
    }

    /// Whether the focus binding is still attached.
    pub fn is_attached(&self) -> bool {
        self.binding.is_attached()
    }

    /// Detach from the document and return the plain store.
    pub fn dispose(self) -> Store<S, A> {
        let Self { store, mut binding } = self;
        binding.detach();
        store
    }
}

impl<S, A, D: Document> Deref for FocusedStore<S, A, D> {
    type Target = Store<S, A>;

    fn deref(&self) -> &Self::Target {
        &self.store
    }
}
