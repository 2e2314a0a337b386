//! Scripted scenarios against a bound store.
//!
//! A scenario is a list of [`Step`]s in a small textual form:
//!
//! ```text
//! mount <id>[=<focus-id>]   append an input with that id (and focus id)
//! unmount <id>              remove it, blurring it if focused
//! focus <id>                user focuses the node
//! blur <id>                 user blurs the node
//! dispatch <focus-id>       application requests focus
//! clear                     application clears focus
//! focusout                  focus leaves the document
//! focusout-to <id>          focusout naming a successor node
//! tick                      run queued microtasks
//! ```
//!
//! Verb and argument are separated by whitespace or `:` so steps can be
//! passed as single shell words (`mount:a=email`).

use std::{collections::HashMap, fmt, str::FromStr};

use focuslink_core::{
    ConfigError, Document, FocusAction, FocusConfig, FocusEnhancer, FocusEvent, FocusEventKind,
    FocusReducer, FocusState, FocusTarget, FocusedStore, Store, StoreError, clear_focus, focus,
};
use thiserror::Error;

use crate::{Element, FocusSnapshot, NodeId, SimDocument, SimError};

/// Errors from parsing or running a scenario.
#[derive(Error, Debug)]
pub enum ScenarioError {
    /// Step text is malformed.
    #[error("cannot parse step {input:?}: {reason}")]
    Parse {
        /// Offending input.
        input: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// Step names a node that is not mounted.
    #[error("no mounted node with id {0:?}")]
    UnknownNode(String),

    /// Mount reuses an id that is still mounted.
    #[error("node id {0:?} is already mounted")]
    DuplicateNode(String),

    /// Simulated document failure.
    #[error(transparent)]
    Sim(#[from] SimError),

    /// Invalid engine configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Store rejected a dispatch.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One scenario step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Append an input to the body.
    Mount {
        /// `id` attribute.
        id: String,
        /// Focus identifier. `None` mounts an unmanaged node.
        focus_id: Option<String>,
    },
    /// Remove a node.
    Unmount {
        /// `id` attribute.
        id: String,
    },
    /// User focuses a node.
    Focus {
        /// `id` attribute.
        id: String,
    },
    /// User blurs a node.
    Blur {
        /// `id` attribute.
        id: String,
    },
    /// Application requests focus on an identifier.
    Dispatch {
        /// Focus identifier, or `unmanaged`.
        target: String,
    },
    /// Application clears focus.
    Clear,
    /// `focusout` with no related target.
    FocusOut,
    /// `focusout` naming a successor.
    FocusOutTo {
        /// `id` attribute of the successor.
        id: String,
    },
    /// Run queued microtasks.
    Tick,
}

impl FromStr for Step {
    type Err = ScenarioError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let parse_error = |reason| ScenarioError::Parse { input: input.to_string(), reason };

        let trimmed = input.trim();
        let (verb, arg) = match trimmed.split_once(|c: char| c == ':' || c.is_whitespace()) {
            Some((verb, arg)) => (verb, Some(arg.trim()).filter(|arg| !arg.is_empty())),
            None => (trimmed, None),
        };
        let required =
            |arg: Option<&str>| arg.map(String::from).ok_or_else(|| parse_error("missing argument"));
        let no_arg = |step: Step| match arg {
            Some(_) => Err(parse_error("unexpected argument")),
            None => Ok(step),
        };

        match verb {
            "mount" => {
                let node = required(arg)?;
                match node.split_once('=') {
                    Some((id, focus_id)) if !id.is_empty() && !focus_id.is_empty() => {
                        Ok(Self::Mount { id: id.to_string(), focus_id: Some(focus_id.to_string()) })
                    },
                    Some(_) => Err(parse_error("expected <id>=<focus-id>")),
                    None => Ok(Self::Mount { id: node, focus_id: None }),
                }
            },
            "unmount" => Ok(Self::Unmount { id: required(arg)? }),
            "focus" => Ok(Self::Focus { id: required(arg)? }),
            "blur" => Ok(Self::Blur { id: required(arg)? }),
            "dispatch" => Ok(Self::Dispatch { target: required(arg)? }),
            "focusout-to" => Ok(Self::FocusOutTo { id: required(arg)? }),
            "clear" => no_arg(Self::Clear),
            "focusout" => no_arg(Self::FocusOut),
            "tick" => no_arg(Self::Tick),
            "" => Err(parse_error("empty step")),
            _ => Err(parse_error("unknown verb")),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mount { id, focus_id: Some(focus_id) } => write!(f, "mount {id}={focus_id}"),
            Self::Mount { id, focus_id: None } => write!(f, "mount {id}"),
            Self::Unmount { id } => write!(f, "unmount {id}"),
            Self::Focus { id } => write!(f, "focus {id}"),
            Self::Blur { id } => write!(f, "blur {id}"),
            Self::Dispatch { target } => write!(f, "dispatch {target}"),
            Self::Clear => f.write_str("clear"),
            Self::FocusOut => f.write_str("focusout"),
            Self::FocusOutTo { id } => write!(f, "focusout-to {id}"),
            Self::Tick => f.write_str("tick"),
        }
    }
}

/// State after a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    /// Store's focused element.
    pub element: Option<String>,
    /// Description of the node holding focus.
    pub active: Option<String>,
    /// Microtasks run during the step.
    pub microtasks: usize,
    /// Focus events delivered during the step, rendered for display.
    pub events: Vec<String>,
}

/// Runs steps against a store bound to a fresh [`SimDocument`].
pub struct ScenarioRunner {
    document: SimDocument,
    store: FocusedStore<FocusState, FocusAction, SimDocument>,
    attribute: String,
    nodes: HashMap<String, NodeId>,
    auto_tick: bool,
}

impl ScenarioRunner {
    /// Runner with a focus-only store. Microtasks run after every step.
    pub fn new(config: FocusConfig) -> Result<Self, ScenarioError> {
        let document = SimDocument::new();
        let attribute = config.attribute.clone();
        let enhancer = FocusEnhancer::with_config(document.clone(), config)?;
        let store = enhancer.enhance(|| Store::new(FocusReducer, FocusState::new()))();

        Ok(Self { document, store, attribute, nodes: HashMap::new(), auto_tick: true })
    }

    /// Only run microtasks on explicit `tick` steps.
    #[must_use]
    pub fn with_manual_ticks(mut self) -> Self {
        self.auto_tick = false;
        self
    }

    /// Snapshot for invariant checks.
    pub fn snapshot(&self) -> FocusSnapshot {
        FocusSnapshot::capture(&self.document, &*self.store.get_state(), &self.attribute)
    }

    /// Store's focused element as a string.
    pub fn element(&self) -> Option<String> {
        self.store.get_state().element_str().map(String::from)
    }

    /// `id` attribute of the node holding focus.
    pub fn active_id(&self) -> Option<String> {
        let active = self.document.active_element()?;
        self.document.attribute(&active, "id")
    }

    /// Run a sequence of steps, stopping at the first error.
    pub fn run<'a>(
        &mut self,
        steps: impl IntoIterator<Item = &'a Step>,
    ) -> Result<Vec<StepOutcome>, ScenarioError> {
        steps.into_iter().map(|step| self.run_step(step)).collect()
    }

    /// Run one step.
    pub fn run_step(&mut self, step: &Step) -> Result<StepOutcome, ScenarioError> {
        tracing::debug!(%step, "running step");

        match step {
            Step::Mount { id, focus_id } => {
                if self.nodes.contains_key(id) {
                    return Err(ScenarioError::DuplicateNode(id.clone()));
                }
                let mut element = Element::input().with_id(id.as_str());
                if let Some(focus_id) = focus_id {
                    element = element.with_attribute(self.attribute.as_str(), focus_id.as_str());
                }
                let node = self.document.append(element);
                self.nodes.insert(id.clone(), node);
            },
            Step::Unmount { id } => {
                let node = self.lookup(id)?;
                self.document.remove(node)?;
                self.nodes.remove(id);
            },
            Step::Focus { id } => {
                let node = self.lookup(id)?;
                self.document.focus(&node);
            },
            Step::Blur { id } => {
                let node = self.lookup(id)?;
                self.document.blur(&node);
            },
            Step::Dispatch { target } => {
                self.store.dispatch(focus(FocusTarget::from(target.as_str())))?;
            },
            Step::Clear => self.store.dispatch(clear_focus())?,
            Step::FocusOut => self.document.dispatch_event(FocusEvent {
                kind: FocusEventKind::FocusOut,
                target: self.document.root(),
                related_target: None,
            }),
            Step::FocusOutTo { id } => {
                let successor = self.lookup(id)?;
                self.document.dispatch_event(FocusEvent {
                    kind: FocusEventKind::FocusOut,
                    target: self.document.root(),
                    related_target: Some(successor),
                });
            },
            Step::Tick => {},
        }

        let microtasks = if self.auto_tick || *step == Step::Tick {
            self.document.run_microtasks()?
        } else {
            0
        };

        Ok(self.outcome(microtasks))
    }

    /// Detach focus sync and return the plain store.
    pub fn dispose(self) -> Store<FocusState, FocusAction> {
        self.store.dispose()
    }

    fn lookup(&self, id: &str) -> Result<NodeId, ScenarioError> {
        self.nodes.get(id).copied().ok_or_else(|| ScenarioError::UnknownNode(id.to_string()))
    }

    fn outcome(&self, microtasks: usize) -> StepOutcome {
        let events = self
            .document
            .take_events()
            .iter()
            .map(|event| {
                let related = event
                    .related_target
                    .map_or_else(|| "-".to_string(), |node| self.document.describe(node));
                format!("{} {} -> {related}", event.kind, self.document.describe(event.target))
            })
            .collect();

        StepOutcome {
            element: self.element(),
            active: self.document.active_element().map(|node| self.document.describe(node)),
            microtasks,
            events,
        }
    }
}
