// Copyright (c) 2026 Vouch Foundation

//! Scoped execution context.
//!
//! The context is a stack of scopes. Each scope holds a key/value map and,
//! for scopes opened by a contract call, the call frame that opened it.
//! Lookups fall through from the innermost scope to the root; writes only
//! ever touch the innermost scope, so a popped scope leaves no trace.

use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// One active contract call, recorded as `"<contract>-<api>"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Frame {
    pub contract: String,
    pub api: String,
}

impl Frame {
    pub fn new(contract: &str, api: &str) -> Self {
        Self {
            contract: contract.to_string(),
            api: api.to_string(),
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.contract, self.api)
    }
}

#[derive(Debug, Default)]
struct Scope {
    values: HashMap<String, Value>,
    frame: Option<Frame>,
}

/// Stack of execution scopes owned by a single [`crate::Host`].
#[derive(Debug)]
pub struct Context {
    scopes: Vec<Scope>,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// A context with only the root scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
        }
    }

    /// Look a key up, innermost scope first.
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.scopes.iter().rev().find_map(|s| s.values.get(key))
    }

    /// Set a key in the innermost scope.
    pub fn set(&mut self, key: &str, value: Value) {
        self.top_mut().values.insert(key.to_string(), value);
    }

    /// Open a plain scope with no call frame.
    pub fn push(&mut self) {
        self.scopes.push(Scope::default());
    }

    /// Open a scope for a contract call.
    pub(crate) fn push_frame(&mut self, frame: Frame) {
        self.scopes.push(Scope {
            values: HashMap::new(),
            frame: Some(frame),
        });
    }

    /// Close the innermost scope.
    ///
    /// # Panics
    ///
    /// Popping the root scope means push/pop calls were not nested properly,
    /// which is a bug in the caller.
    pub fn pop(&mut self) {
        assert!(self.scopes.len() > 1, "pop of the root execution scope");
        self.scopes.pop();
    }

    /// Number of open scopes, root included.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Number of active contract calls.
    pub fn stack_height(&self) -> usize {
        self.frames().count()
    }

    /// Active call frames, outermost first.
    pub fn frames(&self) -> impl Iterator<Item = &Frame> {
        self.scopes.iter().filter_map(|s| s.frame.as_ref())
    }

    fn top_mut(&mut self) -> &mut Scope {
        // The root scope is never popped, so the stack is never empty.
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }
}
