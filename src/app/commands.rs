//! Typed commands and their handler registry.
//!
//! Command descriptors carry no behaviour. Handlers are registered by id in a
//! [`CommandRegistry`] injected into the coordinator; invoking a command without
//! a registered handler is forwarded to the host as
//! [`Action::RunCommand`](crate::app::Action::RunCommand).

use crate::domain::Record;
use crate::options::collection::CommandDef;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Id of the built-in tag management command.
pub const MANAGE_TAGS: &str = "manageTags";

/// Normalized command descriptor.
///
/// A missing label or tooltip is tolerated; the renderer shows the command with
/// the text omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    pub id: String,
    pub label: Option<String>,
    pub tooltip: Option<String>,
    pub enabled: bool,
    pub visible: bool,
    pub requires_selection: bool,
}

impl Command {
    /// Normalizes a configured command, logging missing texts.
    #[must_use]
    pub fn from_def(def: &CommandDef) -> Self {
        let label = def.label.clone().filter(|l| !l.trim().is_empty());
        let tooltip = def.tooltip.clone().filter(|t| !t.trim().is_empty());
        if label.is_none() {
            tracing::warn!(command = %def.id, "command has no label, rendering without one");
        }
        if tooltip.is_none() {
            tracing::warn!(command = %def.id, "command has no tooltip, rendering without one");
        }

        Self {
            id: def.id.clone(),
            label,
            tooltip,
            enabled: def.enabled,
            visible: def.visible,
            requires_selection: def.requires_selection,
        }
    }

    /// Applies runtime gating: selection requirements and tag authorization.
    #[must_use]
    pub fn resolve(&self, gate: &CommandGate) -> Self {
        let mut resolved = self.clone();
        if self.requires_selection && gate.selection_count == 0 {
            resolved.enabled = false;
        }
        if self.id == MANAGE_TAGS {
            resolved.visible = self.visible && gate.tags_authorized;
            resolved.enabled = resolved.enabled && !gate.tag_manager_open;
        }
        resolved
    }

    /// True when the command can currently be invoked.
    #[must_use]
    pub const fn is_invocable(&self) -> bool {
        self.enabled && self.visible
    }
}

/// Runtime facts that gate command availability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommandGate {
    pub selection_count: usize,
    pub tags_authorized: bool,
    pub tag_manager_open: bool,
}

/// What a handler receives when its command runs.
#[derive(Debug)]
pub struct CommandContext<'a> {
    pub id: &'a str,
    pub selected: &'a [Record],
}

/// Handler invoked for a command id.
pub type CommandHandler = Box<dyn FnMut(&CommandContext<'_>)>;

/// Command handlers keyed by command id.
#[derive(Default)]
pub struct CommandRegistry {
    handlers: HashMap<String, CommandHandler>,
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ids: Vec<&String> = self.handlers.keys().collect();
        ids.sort();
        f.debug_struct("CommandRegistry").field("handlers", &ids).finish()
    }
}

impl CommandRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers (or replaces) the handler for `id`.
    pub fn register(&mut self, id: impl Into<String>, handler: impl FnMut(&CommandContext<'_>) + 'static) {
        self.handlers.insert(id.into(), Box::new(handler));
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.handlers.contains_key(id)
    }

    /// Runs the handler for `context.id`. Returns false when none is registered.
    pub fn invoke(&mut self, context: &CommandContext<'_>) -> bool {
        match self.handlers.get_mut(context.id) {
            Some(handler) => {
                handler(context);
                true
            }
            None => false,
        }
    }
}
