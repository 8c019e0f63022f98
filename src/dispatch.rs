//! Literal-to-state dispatch table.
//!
//! The entry state looks up the next two characters, then the next
//! single character, before falling back to character classes. Binding a
//! new literal here is how a dialect adds syntax (say `@@` for system
//! variables) without touching the built-in states.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use tracing::debug;

use crate::scanner::State;
use crate::state;

static SHARED: LazyLock<Arc<DispatchTable>> = LazyLock::new(|| Arc::new(DispatchTable::default()));

/// Error raised when binding a literal.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DispatchError {
    /// Literals must be one or two characters long.
    #[error("dispatch literal {0:?} must be one or two characters long")]
    InvalidLiteral(String),
}

/// Mapping from one- or two-character literals to the state handling them.
#[derive(Clone)]
pub struct DispatchTable {
    states: HashMap<String, State>,
}

impl DispatchTable {
    /// Table with no bindings; only class-based dispatch applies.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            states: HashMap::new(),
        }
    }

    /// The built-in table, shared by every scanner that does not bring its
    /// own.
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::clone(&SHARED)
    }

    /// Bind `literal` to `state`, replacing any earlier binding.
    pub fn register(
        &mut self,
        literal: impl Into<String>,
        state: State,
    ) -> Result<(), DispatchError> {
        let literal = literal.into();
        if !matches!(literal.chars().count(), 1 | 2) {
            return Err(DispatchError::InvalidLiteral(literal));
        }
        debug!(literal = %literal, state = state.name(), "registering dispatch literal");
        self.states.insert(literal, state);
        Ok(())
    }

    /// Builder form of [`DispatchTable::register`].
    pub fn with(mut self, literal: impl Into<String>, state: State) -> Result<Self, DispatchError> {
        self.register(literal, state)?;
        Ok(self)
    }

    /// Remove the binding for `literal`, returning the state it had.
    pub fn unregister(&mut self, literal: &str) -> Option<State> {
        self.states.remove(literal)
    }

    #[must_use]
    pub fn get(&self, literal: &str) -> Option<State> {
        self.states.get(literal).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Wrap the table for sharing between scanners.
    #[must_use]
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl Default for DispatchTable {
    fn default() -> Self {
        let bindings = [
            ("?", state::HOLDER),
            ("%s", state::HOLDER),
            (".", state::PERIOD),
            (",", state::COMMA),
            (";", state::SEMICOLON),
            (":", state::COLON),
            ("\"", state::STRING),
            ("'", state::STRING),
            ("(", state::LPAREN),
            (")", state::RPAREN),
            ("[", state::LBRACKET),
            ("]", state::RBRACKET),
            ("{", state::LBRACE),
            ("}", state::RBRACE),
            ("/*", state::MULTI_LINE_COMMENT),
            ("//", state::SINGLE_LINE_COMMENT),
            ("--", state::SINGLE_LINE_COMMENT),
        ];

        Self {
            states: bindings
                .into_iter()
                .map(|(literal, state)| (literal.to_string(), state))
                .collect(),
        }
    }
}

impl fmt::Debug for DispatchTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut literals: Vec<_> = self.states.iter().collect();
        literals.sort_by(|a, b| a.0.cmp(b.0));
        f.debug_map().entries(literals).finish()
    }
}
