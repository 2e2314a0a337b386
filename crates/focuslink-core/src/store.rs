//! Single-threaded state container.
//!
//! [`Store`] owns the current state snapshot, folds dispatched actions through
//! a [`Reducer`], and notifies subscribers after every transition that
//! produced a new snapshot. Transitions that return the previous `Rc`
//! unchanged are silent.
//!
//! The store is a cheap clonable handle. All clones share the same state and
//! subscriber list.

use std::{
    cell::{Cell, RefCell},
    fmt,
    rc::{Rc, Weak},
};

use crate::{Reducer, StoreError};

type Listener = Rc<dyn Fn()>;

struct StoreInner<S, A> {
    state: RefCell<Rc<S>>,
    reducer: Box<dyn Reducer<S, A>>,
    listeners: RefCell<Vec<(u64, Listener)>>,
    next_listener: Cell<u64>,
    reducing: Cell<bool>,
}

/// State container exposing `dispatch`, `subscribe` and `get_state`.
pub struct Store<S, A> {
    inner: Rc<StoreInner<S, A>>,
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self { inner: Rc::clone(&self.inner) }
    }
}

impl<S: fmt::Debug, A> fmt::Debug for Store<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.inner.state.borrow())
            .field("listeners", &self.inner.listeners.borrow().len())
            .finish_non_exhaustive()
    }
}

impl<S: 'static, A: 'static> Store<S, A> {
    /// Create a store with the given reducer and initial state.
    pub fn new(reducer: impl Reducer<S, A> + 'static, initial: S) -> Self {
        let inner = StoreInner {
            state: RefCell::new(Rc::new(initial)),
            reducer: Box::new(reducer),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(0),
            reducing: Cell::new(false),
        };
        Self { inner: Rc::new(inner) }
    }

    /// Current state snapshot.
    pub fn get_state(&self) -> Rc<S> {
        Rc::clone(&self.inner.state.borrow())
    }

    /// Fold an action into the state and notify subscribers on change.
    ///
    /// Subscribers run after the new state is stored, in subscription order,
    /// and may dispatch further actions. Subscribers added or removed during
    /// a notification round take effect from the next round.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ReentrantDispatch`] if called from inside the
    /// reducer.
    pub fn dispatch(&self, action: A) -> Result<(), StoreError> {
        if self.inner.reducing.get() {
            return Err(StoreError::ReentrantDispatch);
        }

        let current = self.get_state();
        self.inner.reducing.set(true);
        let next = self.inner.reducer.reduce(&current, &action);
        self.inner.reducing.set(false);

        if Rc::ptr_eq(&current, &next) {
            tracing::trace!("dispatch left state unchanged");
            return Ok(());
        }

        *self.inner.state.borrow_mut() = next;

        let listeners: Vec<Listener> =
            self.inner.listeners.borrow().iter().map(|(_, l)| Rc::clone(l)).collect();
        for listener in listeners {
            listener();
        }

        Ok(())
    }

    /// Register a change listener.
    ///
    /// The returned [`Subscription`] does not unsubscribe when dropped. Call
    /// [`Subscription::unsubscribe`] to stop notifications.
    pub fn subscribe(&self, listener: impl Fn() + 'static) -> Subscription<S, A> {
        let id = self.inner.next_listener.get();
        self.inner.next_listener.set(id + 1);
        self.inner.listeners.borrow_mut().push((id, Rc::new(listener)));
        Subscription { id, store: Rc::downgrade(&self.inner) }
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.inner.listeners.borrow().len()
    }
}

/// Handle for removing a listener registered with [`Store::subscribe`].
pub struct Subscription<S, A> {
    id: u64,
    store: Weak<StoreInner<S, A>>,
}

impl<S, A> Subscription<S, A> {
    /// Remove the listener. Returns `false` if it was already removed or the
    /// store is gone.
    pub fn unsubscribe(self) -> bool {
        let Some(store) = self.store.upgrade() else {
            return false;
        };
        let mut listeners = store.listeners.borrow_mut();
        let before = listeners.len();
        listeners.retain(|(id, _)| *id != self.id);
        listeners.len() != before
    }
}

impl<S, A> fmt::Debug for Subscription<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish_non_exhaustive()
    }
}
