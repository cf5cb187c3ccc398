//! Mock action group

use crate::provider::{ActionGroup, Dispatch};
use crate::variant::Variant;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use tracing::debug;

/// A side effect recorded by [`MockActionGroup`]
#[derive(Debug, Clone, PartialEq)]
pub enum ActionEvent {
    /// An action was activated
    Activated {
        /// Local action name
        name: String,
        /// Activation parameter
        parameter: Option<Variant>,
    },
    /// A state change was requested
    StateChanged {
        /// Local action name
        name: String,
        /// Requested state
        value: Variant,
    },
}

impl ActionEvent {
    /// Local name of the action this event targets
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Activated { name, .. } | Self::StateChanged { name, .. } => name,
        }
    }
}

#[derive(Debug, Default)]
struct GroupState {
    actions: BTreeMap<String, Option<Variant>>,
    events: Vec<ActionEvent>,
    dispatch: Dispatch,
}

type EventHandler = Box<dyn Fn(&ActionEvent)>;

/// In-memory action group
///
/// Activating a boolean-stateful action without a parameter toggles it;
/// activating with a parameter of the state's type sets the state. Every
/// side effect is recorded and handed to the registered handlers.
#[derive(Clone, Default)]
pub struct MockActionGroup {
    state: Rc<RefCell<GroupState>>,
    handlers: Rc<RefCell<Vec<EventHandler>>>,
}

impl std::fmt::Debug for MockActionGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("MockActionGroup")
            .field("actions", &state.actions)
            .field("events_count", &state.events.len())
            .field("handlers_count", &self.handlers.borrow().len())
            .field("dispatch", &state.dispatch)
            .finish()
    }
}

impl MockActionGroup {
    /// Create an empty group
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stateless action
    #[must_use]
    pub fn action(self, name: &str) -> Self {
        self.insert(name, None);
        self
    }

    /// Add an action with initial state
    #[must_use]
    pub fn stateful_action(self, name: &str, state: impl Into<Variant>) -> Self {
        self.insert(name, Some(state.into()));
        self
    }

    /// Add or replace an action
    pub fn insert(&self, name: &str, state: Option<Variant>) {
        self.state
            .borrow_mut()
            .actions
            .insert(name.to_string(), state);
    }

    /// Remove an action
    pub fn remove(&self, name: &str) {
        self.state.borrow_mut().actions.remove(name);
    }

    /// Choose how side effects are reported to the matcher
    pub fn set_dispatch(&self, dispatch: Dispatch) {
        self.state.borrow_mut().dispatch = dispatch;
    }

    /// Register a handler called after every side effect
    pub fn on_event<F>(&self, handler: F)
    where
        F: Fn(&ActionEvent) + 'static,
    {
        self.handlers.borrow_mut().push(Box::new(handler));
    }

    /// Every recorded side effect in order
    #[must_use]
    pub fn events(&self) -> Vec<ActionEvent> {
        self.state.borrow().events.clone()
    }

    /// Parameters of every activation of `name`
    #[must_use]
    pub fn activations(&self, name: &str) -> Vec<Option<Variant>> {
        self.state
            .borrow()
            .events
            .iter()
            .filter_map(|event| match event {
                ActionEvent::Activated { name: n, parameter } if n == name => {
                    Some(parameter.clone())
                }
                _ => None,
            })
            .collect()
    }

    /// Names of all actions
    #[must_use]
    pub fn action_names(&self) -> Vec<String> {
        self.state.borrow().actions.keys().cloned().collect()
    }

    fn record(&self, event: ActionEvent) -> Dispatch {
        let dispatch = {
            let mut state = self.state.borrow_mut();
            state.events.push(event.clone());
            state.dispatch
        };
        for handler in self.handlers.borrow().iter() {
            handler(&event);
        }
        dispatch
    }
}

impl ActionGroup for MockActionGroup {
    fn has_action(&self, name: &str) -> bool {
        self.state.borrow().actions.contains_key(name)
    }

    fn action_state(&self, name: &str) -> Option<Variant> {
        self.state.borrow().actions.get(name).cloned().flatten()
    }

    fn change_action_state(&self, name: &str, value: Variant) -> Dispatch {
        debug!(action = name, %value, "changing action state");
        if let Some(Some(state)) = self.state.borrow_mut().actions.get_mut(name) {
            if state.same_type(&value) {
                *state = value.clone();
            }
        }
        self.record(ActionEvent::StateChanged {
            name: name.to_string(),
            value,
        })
    }

    fn activate_action(&self, name: &str, parameter: Option<Variant>) -> Dispatch {
        debug!(action = name, ?parameter, "activating action");
        if let Some(Some(state)) = self.state.borrow_mut().actions.get_mut(name) {
            match (&parameter, state.as_bool()) {
                (None, Some(current)) => *state = Variant::Bool(!current),
                (Some(value), _) if value.same_type(state) => *state = value.clone(),
                _ => {}
            }
        }
        self.record(ActionEvent::Activated {
            name: name.to_string(),
            parameter,
        })
    }
}
