//! # hsmc — hierarchical state machine compiler
//!
//! Compiles a textual state chart DSL into an in-memory model that code
//! generation backends render as a self-contained class in a target
//! language.
//!
//! ## Pipeline
//!
//! ```text
//! lexer      tokens with byte spans (logos)
//!   ↓
//! parser     recognizer state machine + tree builder
//!   ↓
//! resolve    deferred start/dst names bound to states
//!   ↓        (print the round-trip comment block here)
//! inherit    ancestor events materialized on every descendant
//!   ↓
//! render     per-leaf grouped events, transition compilation, backends
//! ```
//!
//! `parse_chart` runs the first three stages; `resolve::inherit_events` is
//! invoked separately so callers can pretty-print the chart before inherited
//! copies are added.
//!
//! ## Usage
//!
//! ```
//! use hsmc::foundation::SourceMap;
//! use std::path::PathBuf;
//!
//! let mut sources = SourceMap::new();
//! let file_id = sources.add_file(
//!     PathBuf::from("demo.hsm"),
//!     "demo.M { start A; state A { event Go { dst B; } } state B; }".to_string(),
//! );
//! let mut chart = hsmc::parse_chart(&sources, file_id).unwrap();
//! let comment_block = hsmc::print::print_root(&chart);
//! hsmc::resolve::inherit_events(&mut chart);
//!
//! let (actions, leaf) = hsmc::transition::compile_start(&chart).unwrap();
//! assert!(actions.is_empty());
//! assert_eq!(chart.state(leaf).name, "A");
//! # let _ = comment_block;
//! ```

pub mod chart;
pub mod error;
pub mod foundation;
pub mod lexer;
pub mod parser;
pub mod print;
pub mod render;
pub mod resolve;
pub mod transition;

pub use chart::{Chart, Event, State, StateId};
pub use error::{CompileError, CompileResult, ErrorKind};

use foundation::{SourceMap, Span};
use lexer::Token;
use logos::Logos;

/// Lex, parse, and resolve one chart file from the source map.
///
/// Returns the resolved chart, ready for pretty-printing; run
/// [`resolve::inherit_events`] before handing it to a backend.
pub fn parse_chart(sources: &SourceMap, file_id: u16) -> CompileResult<Chart> {
    let source = sources.source(file_id);

    let mut tokens = Vec::new();
    for (result, range) in Token::lexer(source).spanned() {
        match result {
            Ok(token) => tokens.push((token, range)),
            Err(()) => {
                return Err(CompileError::new(
                    ErrorKind::Lexical,
                    Span::new(file_id, range.start as u32, range.end as u32),
                    format!("unexpected {}", &source[range]),
                ));
            }
        }
    }

    let (mut chart, pending) = parser::parse(&tokens, file_id)?;
    resolve::resolve(&mut chart, pending)?;
    Ok(chart)
}
