//! Transition compilation.
//!
//! For an event dispatched at a leaf, computes the exact ordered action list
//! and the resolved destination leaf:
//!
//! - internal events (no destination, or a destination that already contains
//!   the source) run their actions and stay put;
//! - external events exit from the source up to (not including) the least
//!   common ancestor, run the event's own actions, then enter down the
//!   destination path, following start references to a leaf.
//!
//! Exit actions run innermost-first, entry actions outermost-first. The
//! destination path already ends at a leaf because the destination is
//! resolved through `follow_start` before the paths are diffed.

use crate::chart::{Chart, Event, StateId};
use crate::error::CompileResult;

/// Compiled form of one transition: the actions to run, in order, and the
/// leaf to install afterwards (`None` for internal transitions).
pub type Transition = (Vec<String>, Option<StateId>);

/// Compile a single event declaration into its action list and destination.
pub fn compile_transition(chart: &Chart, event: &Event) -> CompileResult<Transition> {
    if chart.is_internal(event) {
        return Ok((event.actions.clone(), None));
    }
    let dst = event.dst.expect("external transition without destination");
    let target = chart.follow_start(dst)?;
    let (exit_path, entry_path) = chart.diff(event.src, target);

    let mut actions = exit_actions(chart, &exit_path);
    actions.extend(event.actions.iter().cloned());
    let (entry, dst_leaf) = entry_actions(chart, &entry_path);
    actions.extend(entry);
    Ok((actions, dst_leaf))
}

/// Compile the start sequence of the whole chart: the entry actions from the
/// root down to the initial leaf, and that leaf.
pub fn compile_start(chart: &Chart) -> CompileResult<(Vec<String>, StateId)> {
    let leaf = chart.follow_start(chart.root())?;
    let (actions, dst) = entry_actions(chart, &chart.path(leaf));
    Ok((actions, dst.expect("start chain ends at a leaf")))
}

/// Exit actions along a path, innermost state first.
fn exit_actions(chart: &Chart, path: &[StateId]) -> Vec<String> {
    path.iter()
        .rev()
        .flat_map(|&id| chart.state(id).exit.iter().cloned())
        .collect()
}

/// Entry actions along a path, outermost state first, stopping at the first
/// leaf (which is the resolved destination).
fn entry_actions(chart: &Chart, path: &[StateId]) -> (Vec<String>, Option<StateId>) {
    let mut actions = Vec::new();
    for &id in path {
        actions.extend(chart.state(id).entry.iter().cloned());
        if chart.is_leaf(id) {
            return (actions, Some(id));
        }
    }
    (actions, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Token;
    use crate::parser;
    use crate::resolve;
    use logos::Logos;

    fn chart(source: &str) -> Chart {
        let tokens: Vec<_> = Token::lexer(source)
            .spanned()
            .map(|(token, span)| (token.expect("lexing failed"), span))
            .collect();
        let (mut chart, pending) = parser::parse(&tokens, 0).expect("parse failed");
        resolve::resolve(&mut chart, pending).expect("resolve failed");
        chart
    }

    fn find(chart: &Chart, name: &str) -> StateId {
        chart
            .states()
            .find(|(_, state)| state.name == name)
            .map(|(id, _)| id)
            .expect("state not found")
    }

    fn event<'c>(chart: &'c Chart, state: &str, name: &str) -> &'c Event {
        let id = find(chart, state);
        chart
            .state(id)
            .events
            .iter()
            .find(|ev| ev.name == name)
            .expect("event not found")
    }

    #[test]
    fn test_flat_transition() {
        let chart = chart("demo.M { start A; state A { event Go { dst B; act f; } } state B; }");
        let (actions, dst) = compile_transition(&chart, event(&chart, "A", "Go")).unwrap();
        assert_eq!(actions, vec!["f"]);
        assert_eq!(dst, Some(find(&chart, "B")));
    }

    #[test]
    fn test_internal_event_keeps_state() {
        let chart = chart("demo.M { start A; state A { exit x; event Tick { act t; } } }");
        let (actions, dst) = compile_transition(&chart, event(&chart, "A", "Tick")).unwrap();
        assert_eq!(actions, vec!["t"]);
        assert_eq!(dst, None);
    }

    #[test]
    fn test_nested_exit_entry_ordering() {
        let chart = chart(
            "demo.M { start Outer;
                state Outer { entry eo; exit xo; start Inner;
                    state Inner { entry ei; exit xi;
                        event Jump { dst Sibling; act act1; }
                    }
                }
                state Sibling { entry es; }
            }",
        );
        let (actions, dst) = compile_transition(&chart, event(&chart, "Inner", "Jump")).unwrap();
        assert_eq!(actions, vec!["xi", "xo", "act1", "es"]);
        assert_eq!(dst, Some(find(&chart, "Sibling")));
    }

    #[test]
    fn test_destination_start_chain_followed() {
        // Entering a composite descends its start chain, collecting entry
        // actions outer to inner.
        let chart = chart(
            "demo.M { start A;
                state A { event Go { dst Grp; act mid; } }
                state Grp { entry eg; start Deep;
                    state Deep { entry ed; start Leaf;
                        state Leaf { entry el; }
                    }
                }
            }",
        );
        let (actions, dst) = compile_transition(&chart, event(&chart, "A", "Go")).unwrap();
        assert_eq!(actions, vec!["mid", "eg", "ed", "el"]);
        assert_eq!(dst, Some(find(&chart, "Leaf")));
    }

    #[test]
    fn test_ancestor_destination_is_internal() {
        // The destination contains the source, so nothing is exited or
        // entered even though a destination is present.
        let chart = chart(
            "demo.M { start Outer;
                state Outer { exit xo; start L;
                    state L { exit xl; event Up { dst Outer; act a; } }
                }
            }",
        );
        let (actions, dst) = compile_transition(&chart, event(&chart, "L", "Up")).unwrap();
        assert_eq!(actions, vec!["a"]);
        assert_eq!(dst, None);
    }

    #[test]
    fn test_self_destination_is_internal() {
        let chart = chart("demo.M { start A; state A { event Again { dst A; act r; } } }");
        let (actions, dst) = compile_transition(&chart, event(&chart, "A", "Again")).unwrap();
        assert_eq!(actions, vec!["r"]);
        assert_eq!(dst, None);
    }

    #[test]
    fn test_transition_without_actions_still_moves() {
        let chart = chart("demo.M { start A; state A { event Go { dst B; } } state B; }");
        let (actions, dst) = compile_transition(&chart, event(&chart, "A", "Go")).unwrap();
        assert!(actions.is_empty());
        assert_eq!(dst, Some(find(&chart, "B")));
    }

    #[test]
    fn test_compile_start_minimal() {
        let chart = chart("demo.M { start A; state A { event Go { dst B; act f; } } state B; }");
        let (actions, dst) = compile_start(&chart).unwrap();
        assert!(actions.is_empty());
        assert_eq!(dst, find(&chart, "A"));
    }

    #[test]
    fn test_compile_start_runs_entry_chain() {
        let chart = chart(
            "demo.M { entry boot; start Outer;
                state Outer { entry eo; start Inner;
                    state Inner { entry ei; }
                }
            }",
        );
        let (actions, dst) = compile_start(&chart).unwrap();
        assert_eq!(actions, vec!["boot", "eo", "ei"]);
        assert_eq!(dst, find(&chart, "Inner"));
    }

    #[test]
    fn test_start_chain_terminates_at_leaf_everywhere() {
        let chart = chart(
            "demo.M { start Outer;
                state Outer { start Inner;
                    state Inner { start Leaf; state Leaf; }
                }
            }",
        );
        for (id, state) in chart.states() {
            if !state.children.is_empty() {
                let leaf = chart.follow_start(id).unwrap();
                assert!(chart.is_leaf(leaf), "start chain of {} ended", state.name);
            }
        }
    }

    #[test]
    fn test_missing_start_surfaces_at_compilation() {
        let chart = chart(
            "demo.M { start A;
                state A { event Go { dst Grp; } }
                state Grp { state X; state Y; }
            }",
        );
        let err = compile_transition(&chart, event(&chart, "A", "Go")).unwrap_err();
        assert_eq!(err.message, "Grp: missing start");
    }
}
