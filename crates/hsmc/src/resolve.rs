//! Name resolution and event inheritance.
//!
//! # What these passes do
//!
//! 1. **`resolve`** — binds every deferred `start`/`dst` name recorded by
//!    the parser to an actual state, rejecting unknown and ambiguous names.
//! 2. **`inherit_events`** — copies events declared on composite states down
//!    to every descendant, so the emitted code can dispatch on the current
//!    leaf alone.
//!
//! After both passes the chart is frozen: the transition compiler and the
//! backends only read.
//!
//! # Scoping rules
//!
//! - There is a single flat namespace of state names per chart.
//! - Anonymous grouping states (empty name) never participate in lookup;
//!   they can only be referenced structurally.
//! - A referenced name carried by more than one state is fatal.

use tracing::warn;

use crate::chart::{Chart, Event, StateId};
use crate::error::{CompileError, CompileResult, ErrorKind};
use crate::parser::{PendingRef, PendingRefs};

/// Bind all pending references, then warn about composite states that still
/// lack a start reference (fatal only if such a state is ever entered).
pub fn resolve(chart: &mut Chart, pending: PendingRefs) -> CompileResult<()> {
    for (name, refs) in pending {
        let target = lookup(chart, &name)?;
        for slot in refs {
            match slot {
                PendingRef::StateStart(id) => {
                    chart.state_mut(id).start = Some(target);
                }
                PendingRef::EventDst(id, index) => {
                    chart.state_mut(id).events[index].dst = Some(target);
                }
            }
        }
    }

    for (_, state) in chart.states() {
        if !state.children.is_empty() && state.start.is_none() {
            warn!(
                state = display_name(&state.name),
                "composite state has no start reference; it cannot be entered"
            );
        }
    }
    Ok(())
}

/// Find the single named state matching `name`.
fn lookup(chart: &Chart, name: &str) -> CompileResult<StateId> {
    let mut found = None;
    for (id, state) in chart.states() {
        if state.name == name {
            if found.is_some() {
                return Err(CompileError::unlocated(
                    ErrorKind::AmbiguousState,
                    format!("ambiguous state {}", name),
                ));
            }
            found = Some(id);
        }
    }
    found.ok_or_else(|| {
        CompileError::unlocated(ErrorKind::UnknownState, format!("unknown state {}", name))
    })
}

fn display_name(name: &str) -> &str {
    if name.is_empty() {
        "<anonymous>"
    } else {
        name
    }
}

/// Push events declared on composite states down to their descendants.
///
/// Children run first, so a copy from a near ancestor lands before one from
/// a far ancestor and shadows it under the (name, guard) duplicate rule; a
/// descendant's own declaration always wins. Copies keep the ancestor's
/// name, guard, destination, and action list, but are dispatched from the
/// descendant.
pub fn inherit_events(chart: &mut Chart) {
    push_events(chart, chart.root());
}

fn push_events(chart: &mut Chart, id: StateId) {
    let children = chart.state(id).children.clone();
    for child in children {
        push_events(chart, child);
    }
    let events = chart.state(id).events.clone();
    for descendant in chart.descendants(id) {
        for event in &events {
            let copy = Event {
                src: descendant,
                ..event.clone()
            };
            chart.add_event(descendant, copy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Token;
    use crate::parser;
    use logos::Logos;

    fn resolved(source: &str) -> CompileResult<Chart> {
        let tokens: Vec<_> = Token::lexer(source)
            .spanned()
            .map(|(token, span)| (token.expect("lexing failed"), span))
            .collect();
        let (mut chart, pending) = parser::parse(&tokens, 0)?;
        resolve(&mut chart, pending)?;
        Ok(chart)
    }

    fn find(chart: &Chart, name: &str) -> StateId {
        chart
            .states()
            .find(|(_, state)| state.name == name)
            .map(|(id, _)| id)
            .expect("state not found")
    }

    #[test]
    fn test_start_and_dst_bound() {
        let chart =
            resolved("demo.M { start A; state A { event Go { dst B; } } state B; }").unwrap();
        let a = find(&chart, "A");
        let b = find(&chart, "B");
        assert_eq!(chart.state(chart.root()).start, Some(a));
        assert_eq!(chart.state(a).events[0].dst, Some(b));
    }

    #[test]
    fn test_forward_reference() {
        // B is referenced before its declaration appears.
        let chart = resolved("demo.M { start B; state B; }").unwrap();
        assert_eq!(chart.state(chart.root()).start, Some(find(&chart, "B")));
    }

    #[test]
    fn test_unknown_state() {
        let err = resolved("demo.M { start NoSuch; state A; }").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownState);
        assert_eq!(err.message, "unknown state NoSuch");
    }

    #[test]
    fn test_ambiguous_reference() {
        let err =
            resolved("demo.M { start A; state Outer { state A; } state A; }").unwrap_err();
        assert_eq!(err.kind, ErrorKind::AmbiguousState);
        assert_eq!(err.message, "ambiguous state A");
    }

    #[test]
    fn test_duplicate_names_tolerated_when_unreferenced() {
        // Two states named A, but nothing refers to A by name.
        resolved("demo.M { start B; state B; state Outer { state A; } state Grp { state A; } }")
            .unwrap();
    }

    #[test]
    fn test_anonymous_states_not_resolvable() {
        // The anonymous grouping state cannot be the target of a name.
        let err = resolved("demo.M { start G; state { state A; } }").unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnknownState);
    }

    #[test]
    fn test_inheritance_pushes_to_descendants() {
        let mut chart = resolved(
            "demo.M { start Outer;
                state Outer { start Inner;
                    event Reset { dst Outer; }
                    state Inner;
                }
            }",
        )
        .unwrap();
        inherit_events(&mut chart);

        let inner = find(&chart, "Inner");
        let events = &chart.state(inner).events;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].name, "Reset");
        // The copy is dispatched from the descendant but keeps the target.
        assert_eq!(events[0].src, inner);
        assert_eq!(events[0].dst, Some(find(&chart, "Outer")));
    }

    #[test]
    fn test_inheritance_shadowed_by_own_declaration() {
        let mut chart = resolved(
            "demo.M { start Outer;
                state Outer { start Inner;
                    event E { act a; }
                    state Inner { event E { act b; } }
                }
            }",
        )
        .unwrap();
        inherit_events(&mut chart);

        let inner = find(&chart, "Inner");
        let events = &chart.state(inner).events;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].actions, vec!["b"]);
    }

    #[test]
    fn test_inheritance_near_ancestor_shadows_far() {
        let mut chart = resolved(
            "demo.M { start Mid;
                event E { act from_root; }
                state Mid { start Leaf;
                    event E { act from_mid; }
                    state Leaf;
                }
            }",
        )
        .unwrap();
        inherit_events(&mut chart);

        let leaf = find(&chart, "Leaf");
        let events = &chart.state(leaf).events;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].actions, vec!["from_mid"]);
    }

    #[test]
    fn test_inheritance_distinct_guards_coexist() {
        let mut chart = resolved(
            "demo.M { start Outer;
                state Outer { start Inner;
                    event E if p { act a; }
                    state Inner { event E { act b; } }
                }
            }",
        )
        .unwrap();
        inherit_events(&mut chart);

        let inner = find(&chart, "Inner");
        let events = &chart.state(inner).events;
        assert_eq!(events.len(), 2);
        // Own declaration first, inherited guarded copy appended after.
        assert_eq!(events[0].actions, vec!["b"]);
        assert_eq!(events[1].cond.as_deref(), Some("p"));
    }
}
