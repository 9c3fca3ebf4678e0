//! Header directives and the ordered policy set.
//!
//! # Responsibilities
//! - Hold the ordered directive table built at startup
//! - Resolve the table against one request (last-write-wins per header)
//! - Write the resolved outcome onto a response header map
//!
//! # Design Decisions
//! - Resolution happens before the handler runs, because predicates look at
//!   the request; application happens on the response
//! - A `Remove` outcome deletes the header even if the handler set it
//! - Immutable after construction, shared through `Arc`

use axum::http::{HeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;

use crate::security::predicate::{RequestHead, RequestPredicate};

/// What a directive does to its header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveAction {
    Set(HeaderValue),
    Remove,
}

/// One entry of the policy table.
#[derive(Debug, Clone)]
pub struct HeaderDirective {
    name: HeaderName,
    action: DirectiveAction,
    applies_when: Option<Arc<dyn RequestPredicate>>,
}

impl HeaderDirective {
    pub fn set(name: HeaderName, value: HeaderValue) -> Self {
        Self {
            name,
            action: DirectiveAction::Set(value),
            applies_when: None,
        }
    }

    pub fn remove(name: HeaderName) -> Self {
        Self {
            name,
            action: DirectiveAction::Remove,
            applies_when: None,
        }
    }

    /// Restrict the directive to requests for which `predicate` holds.
    pub fn when(mut self, predicate: impl RequestPredicate + 'static) -> Self {
        self.applies_when = Some(Arc::new(predicate));
        self
    }

    pub fn name(&self) -> &HeaderName {
        &self.name
    }

    fn applies_to(&self, req: &RequestHead<'_>) -> bool {
        self.applies_when
            .as_ref()
            .map_or(true, |predicate| predicate.holds(req))
    }
}

/// Ordered sequence of header directives.
#[derive(Debug, Clone, Default)]
pub struct PolicySet {
    directives: Vec<HeaderDirective>,
}

impl PolicySet {
    pub fn new(directives: Vec<HeaderDirective>) -> Self {
        Self { directives }
    }

    pub fn len(&self) -> usize {
        self.directives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Compute the final outcome per header for one request.
    ///
    /// Directives are walked in order; each applicable one replaces whatever
    /// an earlier directive decided for the same header.
    pub fn resolve(&self, req: &RequestHead<'_>) -> ResolvedHeaders {
        let mut entries: Vec<(HeaderName, DirectiveAction)> = Vec::new();

        for directive in self.directives.iter().filter(|d| d.applies_to(req)) {
            match entries.iter_mut().find(|(name, _)| name == directive.name()) {
                Some(entry) => entry.1 = directive.action.clone(),
                None => entries.push((directive.name.clone(), directive.action.clone())),
            }
        }

        ResolvedHeaders { entries }
    }

    /// Header names that an earlier directive sets and a later one removes.
    ///
    /// These are contradictions in the configuration: the earlier protection
    /// never reaches a client.
    pub fn shadowed(&self) -> Vec<HeaderName> {
        let mut shadowed: Vec<HeaderName> = Vec::new();

        for (i, directive) in self.directives.iter().enumerate() {
            if directive.action != DirectiveAction::Remove || shadowed.contains(&directive.name) {
                continue;
            }
            let set_earlier = self.directives[..i].iter().any(|earlier| {
                earlier.name == directive.name
                    && matches!(earlier.action, DirectiveAction::Set(_))
            });
            if set_earlier {
                shadowed.push(directive.name.clone());
            }
        }

        shadowed
    }
}

/// Final per-header outcome of a policy for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedHeaders {
    entries: Vec<(HeaderName, DirectiveAction)>,
}

impl ResolvedHeaders {
    /// Write the outcome onto a response's headers.
    ///
    /// `Set` replaces every existing value of the header; applying twice is
    /// the same as applying once.
    pub fn apply(&self, headers: &mut HeaderMap) {
        for (name, action) in &self.entries {
            match action {
                DirectiveAction::Set(value) => {
                    headers.insert(name.clone(), value.clone());
                }
                DirectiveAction::Remove => {
                    headers.remove(name);
                }
            }
        }
    }

    /// Value the policy sets for `name`, if any.
    pub fn get(&self, name: &HeaderName) -> Option<&HeaderValue> {
        self.entries.iter().find_map(|(n, action)| match action {
            DirectiveAction::Set(value) if n == name => Some(value),
            _ => None,
        })
    }

    /// Headers set by the policy, in first-appearance order.
    pub fn set_headers(&self) -> impl Iterator<Item = (&HeaderName, &HeaderValue)> {
        self.entries.iter().filter_map(|(name, action)| match action {
            DirectiveAction::Set(value) => Some((name, value)),
            DirectiveAction::Remove => None,
        })
    }

    /// Headers the policy strips from responses.
    pub fn removed_headers(&self) -> impl Iterator<Item = &HeaderName> {
        self.entries
            .iter()
            .filter(|(_, action)| *action == DirectiveAction::Remove)
            .map(|(name, _)| name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
