//! Focus reducer.
//!
//! Pure fold from `(state, action)` to the next state. The reducer returns
//! the incoming `Rc` untouched whenever an action would not change the
//! focused element, which lets [`crate::Store`] suppress the change
//! notification and stops focus feedback from amplifying.

use std::rc::Rc;

use crate::{FocusAction, FocusActionLike, FocusState};

/// Pure state transition used by [`crate::Store`].
///
/// Returning a pointer-equal `Rc` means "no change" and suppresses
/// subscriber notification.
pub trait Reducer<S, A> {
    /// Fold one action into the state.
    fn reduce(&self, state: &Rc<S>, action: &A) -> Rc<S>;
}

impl<S, A, F> Reducer<S, A> for F
where
    F: Fn(&Rc<S>, &A) -> Rc<S>,
{
    fn reduce(&self, state: &Rc<S>, action: &A) -> Rc<S> {
        self(state, action)
    }
}

/// Reducer for stores whose whole state is a [`FocusState`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FocusReducer;

impl<A: FocusActionLike> Reducer<FocusState, A> for FocusReducer {
    fn reduce(&self, state: &Rc<FocusState>, action: &A) -> Rc<FocusState> {
        reduce_action(state, action)
    }
}

/// Apply a focus action.
pub fn reduce(state: &Rc<FocusState>, action: &FocusAction) -> Rc<FocusState> {
    match action {
        FocusAction::Focus { target } => {
            if state.element.as_ref() == Some(target) {
                Rc::clone(state)
            } else {
                Rc::new(FocusState { element: Some(target.clone()) })
            }
        },
        FocusAction::Clear => {
            if state.element.is_none() {
                Rc::clone(state)
            } else {
                Rc::new(FocusState { element: None })
            }
        },
    }
}

/// Apply an application action, ignoring everything that is not a focus
/// action.
///
/// Use this from a combined reducer to fold the focus slice.
pub fn reduce_action<A: FocusActionLike>(state: &Rc<FocusState>, action: &A) -> Rc<FocusState> {
    match action.as_focus_action() {
        Some(focus_action) => reduce(state, focus_action),
        None => Rc::clone(state),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FocusTarget, clear_focus, focus};

    #[derive(Debug)]
    enum MixedAction {
        Focus(FocusAction),
        Increment,
    }

    impl From<FocusAction> for MixedAction {
        fn from(action: FocusAction) -> Self {
            Self::Focus(action)
        }
    }

    impl FocusActionLike for MixedAction {
        fn as_focus_action(&self) -> Option<&FocusAction> {
            match self {
                Self::Focus(action) => Some(action),
                Self::Increment => None,
            }
        }
    }

    #[test]
    fn focus_sets_element() {
        let state = Rc::new(FocusState::new());
        let next = reduce(&state, &focus("test-elem-1"));

        assert_eq!(next.element, Some(FocusTarget::from("test-elem-1")));
    }

    #[test]
    fn focus_same_target_keeps_identity() {
        let state = Rc::new(FocusState::focused("a"));
        let next = reduce(&state, &focus("a"));

        assert!(Rc::ptr_eq(&state, &next));
    }

    #[test]
    fn clear_on_empty_keeps_identity() {
        let state = Rc::new(FocusState::new());
        let next = reduce(&state, &clear_focus());

        assert!(Rc::ptr_eq(&state, &next));
    }

    #[test]
    fn focus_then_clear_round_trips() {
        let state = Rc::new(FocusState::new());
        let focused = reduce(&state, &focus("a"));
        let cleared = reduce(&focused, &clear_focus());

        assert_eq!(*cleared, FocusState::new());
    }

    #[test]
    fn unmanaged_is_a_distinct_value() {
        let state = Rc::new(FocusState::focused("a"));
        let next = reduce(&state, &focus(FocusTarget::Unmanaged));

        assert_eq!(next.element_str(), Some("unmanaged"));
    }

    #[test]
    fn foreign_action_keeps_identity() {
        let state = Rc::new(FocusState::focused("a"));
        let next = FocusReducer.reduce(&state, &MixedAction::Increment);

        assert!(Rc::ptr_eq(&state, &next));
    }

    #[test]
    fn wrapped_focus_action_is_applied() {
        let state = Rc::new(FocusState::new());
        let next = FocusReducer.reduce(&state, &MixedAction::from(focus("b")));

        assert_eq!(next.element_str(), Some("b"));
    }
}
