//! Hand-written push parser for the chart DSL.
//!
//! ## Grammar
//!
//! ```text
//! chart       := ident ('.' ident)* '{' state_body '}'
//! state_body  := (state_decl | event_decl | ';')*
//! state_decl  := 'state' (ident ('{' state_body '}')? | '{' state_body '}') ';'?
//!              | 'entry' ident (',' ident)* ';'
//!              | 'exit'  ident (',' ident)* ';'
//!              | 'start' ident ';'
//! event_decl  := 'event' ident ('if' ident)? (';' | '{' event_body '}')
//! event_body  := ('dst' ident ';' | 'act' ident (',' ident)* ';' | ';')*
//! ```
//!
//! ## Architecture
//!
//! - `machine`: the recognizer state machine (one token in, at most one
//!   semantic action out); its module docs carry its own state chart
//! - `builder`: the single consumer of semantic actions; owns the chart
//!   under construction and the pending-references table
//!
//! `parse` drives both: it feeds spanned tokens to the machine, forwards
//! fired actions to the builder, and enforces the end-of-input discipline
//! (after the last token every state must be closed).

mod builder;
mod machine;

pub use builder::{PendingRef, PendingRefs};
pub use machine::SemanticAction;

use crate::chart::Chart;
use crate::error::{CompileError, CompileResult, ErrorKind};
use crate::foundation::Span;
use crate::lexer::Token;
use std::ops::Range;

use builder::Builder;
use machine::Machine;

/// Parse a sequence of tokens with byte spans into a chart plus its
/// unresolved name references.
///
/// # Errors
///
/// - `Syntax` for a token no guard of the current recognizer state accepts,
///   reported as `unexpected <token>` at the token's position
/// - `Syntax` (`unexpected EOF`) when input ends with states still open
/// - `DuplicateEvent` when a state declares the same (name, guard) twice
pub fn parse(
    tokens: &[(Token, Range<usize>)],
    file_id: u16,
) -> CompileResult<(Chart, PendingRefs)> {
    let mut machine = Machine::new();
    let mut builder = Builder::new();
    let mut end = Span::zero(file_id);

    for (token, range) in tokens {
        let span = Span::new(file_id, range.start as u32, range.end as u32);
        match machine.step(token) {
            Ok(Some(action)) => builder.apply(action, token, span)?,
            Ok(None) => {}
            Err(_) => {
                return Err(CompileError::new(
                    ErrorKind::Syntax,
                    span,
                    format!("unexpected {}", token),
                ));
            }
        }
        end = Span::new(file_id, range.end as u32, range.end as u32);
    }

    // End-of-input discipline: the machine must be back at its rest
    // position (mid-declaration EOF) and the builder must have closed every
    // state (unbalanced braces). Both are truncated-chart errors.
    if !machine.at_rest() {
        return Err(CompileError::new(ErrorKind::Syntax, end, "unexpected EOF"));
    }
    builder.finish(end)
}
