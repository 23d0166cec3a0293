//! Code generation backends.
//!
//! Each backend walks the same read-only facade (leaves, grouped events,
//! compiled transitions) and renders one self-contained class. The emitted
//! machine dispatches on its current leaf state only; guarded alternatives
//! are expanded in declaration order with the unguarded default last, and a
//! multi-step transition parks the machine in a sentinel invalid state
//! before running its actions so re-entrant dispatch is trapped instead of
//! observing a half-taken transition.
//!
//! All backends emit CRLF line endings and tab indentation, and embed the
//! chart's canonical DSL text as a comment block for auditability.

mod cpp;
mod cs;
mod golang;

use std::fmt;
use std::str::FromStr;

use hsmc::transition::compile_transition;
use hsmc::{Chart, CompileResult, Event};

/// A code generation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// C# (`using System;`, namespace, sealed class)
    Cs,
    /// C++ (`#pragma once`, header-only struct)
    Cpp,
    /// Go (package, struct of handler funcs)
    Go,
}

impl Target {
    /// Render the chart for this target. `source` is the canonical DSL text
    /// embedded verbatim in the output's comment block.
    pub fn emit(&self, chart: &Chart, source: &[String]) -> CompileResult<String> {
        match self {
            Target::Cs => cs::emit(chart, source),
            Target::Cpp => cpp::emit(chart, source),
            Target::Go => golang::emit(chart, source),
        }
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "cs" => Ok(Target::Cs),
            "cpp" => Ok(Target::Cpp),
            "go" => Ok(Target::Go),
            other => Err(format!("unknown target {} (expected cs, cpp or go)", other)),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Cs => f.write_str("cs"),
            Target::Cpp => f.write_str("cpp"),
            Target::Go => f.write_str("go"),
        }
    }
}

/// Line-oriented output buffer: tab indentation, CRLF endings.
pub(crate) struct Emitter {
    out: String,
}

impl Emitter {
    pub(crate) fn new() -> Self {
        Self { out: String::new() }
    }

    pub(crate) fn line(&mut self, indent: usize, text: impl AsRef<str>) {
        for _ in 0..indent {
            self.out.push('\t');
        }
        self.out.push_str(text.as_ref());
        self.out.push_str("\r\n");
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }
}

/// Whether every alternative of a dispatch group compiles to a no-op (no
/// actions, no state change). Such handlers are omitted where the target's
/// default behavior is already "ignore the event".
pub(crate) fn dispatch_is_empty(chart: &Chart, events: &[&Event]) -> CompileResult<bool> {
    for event in events {
        let (actions, dst) = compile_transition(chart, event)?;
        if dst.is_some() || !actions.is_empty() {
            return Ok(false);
        }
    }
    Ok(true)
}
