//! Hierarchical state tree model.
//!
//! # Design
//!
//! - `Chart` — arena owning every `State`; the root is always index 0
//! - `StateId` — stable index into the arena; all cross-references
//!   (`parent`, `start`, `children`, `Event::src`, `Event::dst`) are ids,
//!   so back-edges never form ownership cycles
//! - `Event` — a guarded, optionally targeted event declaration on a state
//!
//! States are appended in document order, so iterating the arena yields the
//! root followed by its descendants in pre-order.
//!
//! The queries here (`path`, `diff`, `follow_start`, descendant tests) are
//! the raw material of the transition compiler; `follow_start` enforces the
//! start-chain invariants and is the only query that can fail.

use crate::error::{CompileError, CompileResult, ErrorKind};

/// Index of a state in the chart arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateId(pub(crate) usize);

/// A node in the state tree.
///
/// A state with children is *composite*; a state without is a *leaf*. Only
/// leaves can be the current state of the emitted machine. A state with an
/// empty name is an anonymous grouping node: legal as a container, never a
/// reference target.
#[derive(Debug, Clone, Default)]
pub struct State {
    /// Name; empty for anonymous grouping states. The root carries the full
    /// qualified chart name (`demo.M`).
    pub name: String,
    /// Parent state; `None` only for the root.
    pub parent: Option<StateId>,
    /// Start reference, resolved to a descendant after the resolver pass.
    pub start: Option<StateId>,
    /// Entry action names, in declaration order.
    pub entry: Vec<String>,
    /// Exit action names, in declaration order.
    pub exit: Vec<String>,
    /// Child states, in document order.
    pub children: Vec<StateId>,
    /// Event declarations, own first, inherited copies appended later.
    pub events: Vec<Event>,
}

/// An event declaration attached to a state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Event name.
    pub name: String,
    /// Guard condition name, if any.
    pub cond: Option<String>,
    /// State this declaration is dispatched from.
    pub src: StateId,
    /// Destination state; `None` means no state change.
    pub dst: Option<StateId>,
    /// Action names, in declaration order.
    pub actions: Vec<String>,
}

impl Event {
    /// Whether this event carries a guard condition.
    pub fn has_cond(&self) -> bool {
        self.cond.is_some()
    }

    /// Whether two declarations collide: same name and same guard.
    pub fn same(&self, other: &Event) -> bool {
        self.name == other.name && self.cond == other.cond
    }
}

/// A complete chart: the state arena rooted at a qualified name.
#[derive(Debug, Clone, Default)]
pub struct Chart {
    states: Vec<State>,
}

impl Chart {
    /// Create a chart whose root carries the given (first) name segment.
    pub fn new(root_name: String) -> Self {
        Self {
            states: vec![State {
                name: root_name,
                ..State::default()
            }],
        }
    }

    /// The root state.
    pub fn root(&self) -> StateId {
        StateId(0)
    }

    /// Borrow a state.
    pub fn state(&self, id: StateId) -> &State {
        &self.states[id.0]
    }

    /// Mutably borrow a state.
    pub(crate) fn state_mut(&mut self, id: StateId) -> &mut State {
        &mut self.states[id.0]
    }

    /// Append a new anonymous state under `parent` and return its id.
    pub(crate) fn new_state(&mut self, parent: StateId) -> StateId {
        let id = StateId(self.states.len());
        self.states.push(State {
            parent: Some(parent),
            ..State::default()
        });
        self.states[parent.0].children.push(id);
        id
    }

    /// All states in document order (root first, then pre-order).
    pub fn states(&self) -> impl Iterator<Item = (StateId, &State)> {
        self.states
            .iter()
            .enumerate()
            .map(|(idx, state)| (StateId(idx), state))
    }

    /// Strict descendants of `id`, pre-order.
    pub fn descendants(&self, id: StateId) -> Vec<StateId> {
        let mut out = Vec::new();
        self.collect_descendants(id, &mut out);
        out
    }

    fn collect_descendants(&self, id: StateId, out: &mut Vec<StateId>) {
        for &child in &self.state(id).children {
            out.push(child);
            self.collect_descendants(child, out);
        }
    }

    /// Whether `id` has no children.
    pub fn is_leaf(&self, id: StateId) -> bool {
        self.state(id).children.is_empty()
    }

    /// Whether `id` has children.
    pub fn is_composite(&self, id: StateId) -> bool {
        !self.is_leaf(id)
    }

    /// Whether `id` is `ancestor` or nested anywhere below it.
    pub fn is_descendant_of(&self, id: StateId, ancestor: StateId) -> bool {
        let mut cursor = Some(id);
        while let Some(state) = cursor {
            if state == ancestor {
                return true;
            }
            cursor = self.state(state).parent;
        }
        false
    }

    /// Ancestor chain from the root down to `id`, inclusive.
    pub fn path(&self, id: StateId) -> Vec<StateId> {
        let mut path = Vec::new();
        let mut cursor = Some(id);
        while let Some(state) = cursor {
            path.push(state);
            cursor = self.state(state).parent;
        }
        path.reverse();
        path
    }

    /// Paths of `src` and `dst` with their common prefix (the least common
    /// ancestor and everything above it) stripped.
    pub fn diff(&self, src: StateId, dst: StateId) -> (Vec<StateId>, Vec<StateId>) {
        let mut src_path = self.path(src);
        let mut dst_path = self.path(dst);
        let common = src_path
            .iter()
            .zip(dst_path.iter())
            .take_while(|(a, b)| a == b)
            .count();
        src_path.drain(..common);
        dst_path.drain(..common);
        (src_path, dst_path)
    }

    /// Chase start references from `id` until a leaf is reached.
    ///
    /// Each hop must strictly descend into the current state's subtree, so
    /// the chain terminates; a missing or non-descending reference is a
    /// fatal error named after the offending state.
    pub fn follow_start(&self, id: StateId) -> CompileResult<StateId> {
        let mut cursor = id;
        while !self.is_leaf(cursor) {
            let state = self.state(cursor);
            let start = state.start.ok_or_else(|| {
                CompileError::unlocated(
                    ErrorKind::MissingStart,
                    format!("{}: missing start", state.name),
                )
            })?;
            if start == cursor || !self.is_descendant_of(start, cursor) {
                return Err(CompileError::unlocated(
                    ErrorKind::InvalidStart,
                    format!("{}: invalid start", state.name),
                ));
            }
            cursor = start;
        }
        Ok(cursor)
    }

    /// Whether an event leaves the current state configuration.
    ///
    /// No destination, or a destination that already contains the source,
    /// means the event runs its actions without exiting anything.
    pub fn is_internal(&self, event: &Event) -> bool {
        match event.dst {
            None => true,
            Some(dst) => self.is_descendant_of(event.src, dst),
        }
    }

    /// Append an event to a state unless an identical (name, guard) pair is
    /// already declared there. Returns `true` when the event was suppressed
    /// as a duplicate.
    pub(crate) fn add_event(&mut self, id: StateId, event: Event) -> bool {
        if self.state(id).events.iter().any(|ev| ev.same(&event)) {
            return true;
        }
        self.state_mut(id).events.push(event);
        false
    }
}
