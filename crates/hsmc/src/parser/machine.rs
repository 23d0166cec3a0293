//! Recognizer state machine for the chart DSL.
//!
//! The parser is itself a hierarchical state machine of the kind this tool
//! compiles. Its chart is the authoritative description of the grammar and
//! is kept here; `Machine::step` is the hand-translated transition table.
//!
//! ```text
//! hsmc.Machine {
//!     start RootBegin;
//!     state RootBegin {
//!         event Next if Ident { dst RootNext; act RootBegin; }
//!     }
//!     state RootNext {
//!         event Next if Bra { dst StateNext; }
//!         event Next if Dot { dst RootName; }
//!     }
//!     state RootName {
//!         event Next if Ident { dst RootNext; act RootName; }
//!     }
//!     state StateEntry {
//!         event Next if Ident { dst StateEntryNext; act StateEntry; }
//!     }
//!     state StateExit {
//!         event Next if Ident { dst StateExitNext; act StateExit; }
//!     }
//!     state StateStart {
//!         event Next if Ident { dst StateStartNext; act StateStart; }
//!     }
//!     state {
//!         state StateName {
//!             event Next if Ident { dst StateNameNext; act StateName; }
//!         }
//!         state StateNameNext;
//!         event Next if Semi { dst StateNext; act StateEnd; }
//!         event Next if Bra { dst StateNext; }
//!     }
//!     state {
//!         state StateStartNext;
//!         state StateEntryNext {
//!             event Next if Comma { dst StateEntry; }
//!         }
//!         state StateExitNext {
//!             event Next if Comma { dst StateExit; }
//!         }
//!         state StateNext {
//!             event Next if Entry { dst StateEntry; }
//!             event Next if Event { dst EventName; act EventBegin; }
//!             event Next if Exit { dst StateExit; }
//!             event Next if Start { dst StateStart; }
//!             event Next if State { dst StateName; act StateBegin; }
//!         }
//!         event Next if Semi { dst StateNext; }
//!         event Next if Ket { dst StateNext; act StateEnd; }
//!     }
//!     state EventName {
//!         event Next if Ident { dst EventNameNext; act EventName; }
//!     }
//!     state EventCond {
//!         event Next if Ident { dst EventCondNext; act EventCond; }
//!     }
//!     state EventAct {
//!         event Next if Ident { dst EventActNext; act EventAct; }
//!     }
//!     state EventDst {
//!         event Next if Ident { dst EventDstNext; act EventDst; }
//!     }
//!     state {
//!         state EventNameNext {
//!             event Next if If { dst EventCond; }
//!         }
//!         state EventCondNext;
//!         event Next if Semi { dst StateNext; act EventEnd; }
//!         event Next if Bra { dst EventNext; }
//!     }
//!     state {
//!         state EventDstNext;
//!         state EventActNext {
//!             event Next if Comma { dst EventAct; }
//!         }
//!         state EventNext {
//!             event Next if Act { dst EventAct; }
//!             event Next if Dst { dst EventDst; }
//!         }
//!         event Next if Semi { dst EventNext; }
//!         event Next if Ket { dst StateNext; act EventEnd; }
//!     }
//!     event Next { act ErrorUnexpected; }
//! }
//! ```
//!
//! Each token is one `Next` event; guards are tried in the order written
//! above (events declared on a grouping state run after those of its inner
//! states). The first match fires its action and moves the machine; no match
//! is an unexpected-token error reported by the caller. The machine itself
//! holds no tree state: it emits at most one `SemanticAction` per token and
//! a separate builder interprets them.

use crate::lexer::Token;

/// Semantic action fired by a recognizer transition.
///
/// Actions that consume the current token's text (names, action lists,
/// references) fire on identifier guards; the rest fire on punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticAction {
    RootBegin,
    RootName,
    StateBegin,
    StateEnd,
    StateName,
    StateEntry,
    StateExit,
    StateStart,
    EventBegin,
    EventEnd,
    EventName,
    EventCond,
    EventAct,
    EventDst,
}

/// Recognizer states, one per position in the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Recognizer {
    RootBegin,
    RootNext,
    RootName,
    StateName,
    StateNameNext,
    StateEntry,
    StateEntryNext,
    StateExit,
    StateExitNext,
    StateStart,
    StateStartNext,
    StateNext,
    EventName,
    EventNameNext,
    EventCond,
    EventCondNext,
    EventAct,
    EventActNext,
    EventDst,
    EventDstNext,
    EventNext,
}

/// The token did not match any guard of the current recognizer state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Unexpected;

/// Push-driven recognizer: feed one token at a time.
#[derive(Debug)]
pub struct Machine {
    state: Recognizer,
}

impl Machine {
    pub fn new() -> Self {
        Self {
            state: Recognizer::RootBegin,
        }
    }

    /// Advance by one token, returning the semantic action fired, if any.
    pub fn step(&mut self, token: &Token) -> Result<Option<SemanticAction>, Unexpected> {
        use Recognizer as R;
        use SemanticAction as A;

        match self.state {
            R::RootBegin => {
                if token.is_ident() {
                    return self.fire(R::RootNext, A::RootBegin);
                }
                Err(Unexpected)
            }
            R::RootNext => {
                if token.is_lbrace() {
                    return self.goto(R::StateNext);
                }
                if token.is_dot() {
                    return self.goto(R::RootName);
                }
                Err(Unexpected)
            }
            R::RootName => {
                if token.is_ident() {
                    return self.fire(R::RootNext, A::RootName);
                }
                Err(Unexpected)
            }
            R::StateEntry => {
                if token.is_ident() {
                    return self.fire(R::StateEntryNext, A::StateEntry);
                }
                Err(Unexpected)
            }
            R::StateExit => {
                if token.is_ident() {
                    return self.fire(R::StateExitNext, A::StateExit);
                }
                Err(Unexpected)
            }
            R::StateStart => {
                if token.is_ident() {
                    return self.fire(R::StateStartNext, A::StateStart);
                }
                Err(Unexpected)
            }
            R::StateName => {
                if token.is_ident() {
                    return self.fire(R::StateNameNext, A::StateName);
                }
                if token.is_semi() {
                    return self.fire(R::StateNext, A::StateEnd);
                }
                if token.is_lbrace() {
                    return self.goto(R::StateNext);
                }
                Err(Unexpected)
            }
            R::StateNameNext => {
                if token.is_semi() {
                    return self.fire(R::StateNext, A::StateEnd);
                }
                if token.is_lbrace() {
                    return self.goto(R::StateNext);
                }
                Err(Unexpected)
            }
            R::StateStartNext => {
                if token.is_semi() {
                    return self.goto(R::StateNext);
                }
                if token.is_rbrace() {
                    return self.fire(R::StateNext, A::StateEnd);
                }
                Err(Unexpected)
            }
            R::StateEntryNext => {
                if token.is_comma() {
                    return self.goto(R::StateEntry);
                }
                if token.is_semi() {
                    return self.goto(R::StateNext);
                }
                if token.is_rbrace() {
                    return self.fire(R::StateNext, A::StateEnd);
                }
                Err(Unexpected)
            }
            R::StateExitNext => {
                if token.is_comma() {
                    return self.goto(R::StateExit);
                }
                if token.is_semi() {
                    return self.goto(R::StateNext);
                }
                if token.is_rbrace() {
                    return self.fire(R::StateNext, A::StateEnd);
                }
                Err(Unexpected)
            }
            R::StateNext => {
                if token.is_keyword("entry") {
                    return self.goto(R::StateEntry);
                }
                if token.is_keyword("event") {
                    return self.fire(R::EventName, A::EventBegin);
                }
                if token.is_keyword("exit") {
                    return self.goto(R::StateExit);
                }
                if token.is_keyword("start") {
                    return self.goto(R::StateStart);
                }
                if token.is_keyword("state") {
                    return self.fire(R::StateName, A::StateBegin);
                }
                if token.is_semi() {
                    return Ok(None);
                }
                if token.is_rbrace() {
                    return Ok(Some(A::StateEnd));
                }
                Err(Unexpected)
            }
            R::EventName => {
                if token.is_ident() {
                    return self.fire(R::EventNameNext, A::EventName);
                }
                Err(Unexpected)
            }
            R::EventCond => {
                if token.is_ident() {
                    return self.fire(R::EventCondNext, A::EventCond);
                }
                Err(Unexpected)
            }
            R::EventAct => {
                if token.is_ident() {
                    return self.fire(R::EventActNext, A::EventAct);
                }
                Err(Unexpected)
            }
            R::EventDst => {
                if token.is_ident() {
                    return self.fire(R::EventDstNext, A::EventDst);
                }
                Err(Unexpected)
            }
            R::EventNameNext => {
                if token.is_keyword("if") {
                    return self.goto(R::EventCond);
                }
                if token.is_semi() {
                    return self.fire(R::StateNext, A::EventEnd);
                }
                if token.is_lbrace() {
                    return self.goto(R::EventNext);
                }
                Err(Unexpected)
            }
            R::EventCondNext => {
                if token.is_semi() {
                    return self.fire(R::StateNext, A::EventEnd);
                }
                if token.is_lbrace() {
                    return self.goto(R::EventNext);
                }
                Err(Unexpected)
            }
            R::EventDstNext => {
                if token.is_semi() {
                    return self.goto(R::EventNext);
                }
                if token.is_rbrace() {
                    return self.fire(R::StateNext, A::EventEnd);
                }
                Err(Unexpected)
            }
            R::EventActNext => {
                if token.is_comma() {
                    return self.goto(R::EventAct);
                }
                if token.is_semi() {
                    return self.goto(R::EventNext);
                }
                if token.is_rbrace() {
                    return self.fire(R::StateNext, A::EventEnd);
                }
                Err(Unexpected)
            }
            R::EventNext => {
                if token.is_keyword("act") {
                    return self.goto(R::EventAct);
                }
                if token.is_keyword("dst") {
                    return self.goto(R::EventDst);
                }
                if token.is_semi() {
                    return Ok(None);
                }
                if token.is_rbrace() {
                    return self.fire(R::StateNext, A::EventEnd);
                }
                Err(Unexpected)
            }
        }
    }

    /// Whether the machine is back at the body position it occupies between
    /// complete declarations. Anywhere else at end of input is a truncated
    /// chart.
    pub fn at_rest(&self) -> bool {
        matches!(self.state, Recognizer::StateNext)
    }

    fn goto(&mut self, next: Recognizer) -> Result<Option<SemanticAction>, Unexpected> {
        self.state = next;
        Ok(None)
    }

    fn fire(
        &mut self,
        next: Recognizer,
        action: SemanticAction,
    ) -> Result<Option<SemanticAction>, Unexpected> {
        self.state = next;
        Ok(Some(action))
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}
