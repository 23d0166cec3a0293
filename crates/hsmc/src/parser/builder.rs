//! Tree builder: interprets semantic actions into a chart.
//!
//! The recognizer machine reports *what* it saw; this builder is the single
//! consumer that turns those reports into states and events. It also keeps
//! the pending-references table: `start` and `dst` clauses name states that
//! may not exist yet, so each occurrence is recorded against the name and
//! patched by the resolver once the whole tree is known.

use indexmap::IndexMap;

use super::machine::SemanticAction;
use crate::chart::{Chart, Event, StateId};
use crate::error::{CompileError, CompileResult, ErrorKind};
use crate::foundation::Span;
use crate::lexer::Token;

/// A reference slot awaiting resolution, keyed by the referenced name.
///
/// `EventDst` addresses the event by its position in the owning state's
/// declaration list, which is stable: events are only ever appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingRef {
    /// `start <name>;` on a state
    StateStart(StateId),
    /// `dst <name>;` on an event, as (owning state, event index)
    EventDst(StateId, usize),
}

/// Deferred name lookups, in first-occurrence order.
pub type PendingRefs = IndexMap<String, Vec<PendingRef>>;

/// Incrementally built chart plus unresolved references.
#[derive(Debug, Default)]
pub struct Builder {
    chart: Option<Chart>,
    /// Open states, innermost last; empty before the root opens and after
    /// its closing brace.
    stack: Vec<StateId>,
    /// Event currently being declared.
    event: Option<Event>,
    /// `dst` name of the current event; registered when the event closes.
    event_dst: Option<String>,
    pending: PendingRefs,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one semantic action. `token` is the token the action fired on
    /// and supplies identifier text; `span` locates builder-level errors.
    pub fn apply(
        &mut self,
        action: SemanticAction,
        token: &Token,
        span: Span,
    ) -> CompileResult<()> {
        use SemanticAction as A;
        match action {
            A::RootBegin => {
                let chart = Chart::new(token.text().to_string());
                self.stack.push(chart.root());
                self.chart = Some(chart);
            }
            A::RootName => {
                let chart = self.chart_mut();
                let root = chart.root();
                let name = &mut chart.state_mut(root).name;
                name.push('.');
                name.push_str(token.text());
            }
            A::StateBegin => {
                let parent = self.current(token, span)?;
                let id = self.chart_mut().new_state(parent);
                self.stack.push(id);
            }
            A::StateEnd => {
                self.current(token, span)?;
                self.stack.pop();
            }
            A::StateName => {
                let id = self.current(token, span)?;
                self.chart_mut().state_mut(id).name = token.text().to_string();
            }
            A::StateEntry => {
                let id = self.current(token, span)?;
                self.chart_mut()
                    .state_mut(id)
                    .entry
                    .push(token.text().to_string());
            }
            A::StateExit => {
                let id = self.current(token, span)?;
                self.chart_mut()
                    .state_mut(id)
                    .exit
                    .push(token.text().to_string());
            }
            A::StateStart => {
                let id = self.current(token, span)?;
                self.pending
                    .entry(token.text().to_string())
                    .or_default()
                    .push(PendingRef::StateStart(id));
            }
            A::EventBegin => {
                let src = self.current(token, span)?;
                self.event = Some(Event {
                    name: String::new(),
                    cond: None,
                    src,
                    dst: None,
                    actions: Vec::new(),
                });
                self.event_dst = None;
            }
            A::EventName => {
                self.event_mut().name = token.text().to_string();
            }
            A::EventCond => {
                self.event_mut().cond = Some(token.text().to_string());
            }
            A::EventAct => {
                self.event_mut().actions.push(token.text().to_string());
            }
            A::EventDst => {
                // Last `dst` clause wins.
                self.event_dst = Some(token.text().to_string());
            }
            A::EventEnd => {
                let id = self.current(token, span)?;
                let event = self.event.take().expect("BUG: event end without begin");
                let name = event.name.clone();
                if self.chart_mut().add_event(id, event) {
                    return Err(CompileError::new(
                        ErrorKind::DuplicateEvent,
                        span,
                        format!("event {} redeclared", name),
                    ));
                }
                if let Some(dst) = self.event_dst.take() {
                    let index = self.chart_mut().state(id).events.len() - 1;
                    self.pending
                        .entry(dst)
                        .or_default()
                        .push(PendingRef::EventDst(id, index));
                }
            }
        }
        Ok(())
    }

    /// Close out the build: valid end of input means the root was opened and
    /// every state closed.
    pub fn finish(self, end: Span) -> CompileResult<(Chart, PendingRefs)> {
        if self.chart.is_none() || !self.stack.is_empty() {
            return Err(CompileError::new(ErrorKind::Syntax, end, "unexpected EOF"));
        }
        Ok((self.chart.expect("checked above"), self.pending))
    }

    /// The innermost open state, or an unexpected-token error once the root
    /// has closed (trailing `}` or declarations after the chart).
    fn current(&self, token: &Token, span: Span) -> CompileResult<StateId> {
        self.stack.last().copied().ok_or_else(|| {
            CompileError::new(ErrorKind::Syntax, span, format!("unexpected {}", token))
        })
    }

    fn chart_mut(&mut self) -> &mut Chart {
        self.chart.as_mut().expect("BUG: action before root began")
    }

    fn event_mut(&mut self) -> &mut Event {
        self.event.as_mut().expect("BUG: event action without begin")
    }
}
