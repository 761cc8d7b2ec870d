//! Command table
//!
//! Maps command names to their implementations. The table is built once and
//! never changes afterwards; lookup is an exact, case-sensitive match.

use std::collections::HashMap;
use std::sync::Arc;

use crate::commands::{self, Action};
use crate::error::{ActionError, Result};

#[derive(Clone)]
pub struct CommandTable {
    actions: HashMap<&'static str, Arc<dyn Action>>,
}

impl CommandTable {
    /// Table holding every built-in command
    pub fn builtin() -> Result<Self> {
        Self::from_actions(commands::builtin())
    }

    /// Build a table, rejecting two actions registered under one name
    pub fn from_actions<I>(actions: I) -> Result<Self>
    where
        I: IntoIterator<Item = Arc<dyn Action>>,
    {
        let mut table = HashMap::new();
        for action in actions {
            let name = action.name();
            if table.insert(name, action).is_some() {
                return Err(ActionError::InvalidArguments(format!(
                    "command {} registered twice",
                    name
                )));
            }
        }
        Ok(Self { actions: table })
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Action>> {
        self.actions.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Registered names in sorted order
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.actions.keys().copied().collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl std::fmt::Debug for CommandTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandTable")
            .field("names", &self.names())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
