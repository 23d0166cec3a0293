//! Canonical pretty-printer for charts.
//!
//! Regenerates DSL text from the resolved tree. The emitted file embeds this
//! text as its comment block, so the output must itself reparse to an
//! equivalent chart. Printing runs after resolution (references print their
//! resolved state's name) but before event inheritance (inherited copies are
//! an implementation artifact and never printed).

use crate::chart::{Chart, Event, StateId};

/// Render the whole chart, one line per entry, tab-indented.
pub fn print_root(chart: &Chart) -> Vec<String> {
    let root = chart.state(chart.root());
    let mut lines = vec![format!("{} {{", root.name)];
    print_body(chart, chart.root(), "\t", &mut lines);
    lines.push("}".to_string());
    lines
}

/// Render one state. Leaves without any content use the short form.
fn print_state(chart: &Chart, id: StateId, indent: &str, lines: &mut Vec<String>) {
    let state = chart.state(id);
    let has_body = state.start.is_some()
        || !state.entry.is_empty()
        || !state.exit.is_empty()
        || !state.children.is_empty()
        || !state.events.is_empty();
    if !has_body {
        lines.push(format!("{}state {};", indent, state.name));
        return;
    }
    if state.name.is_empty() {
        lines.push(format!("{}state {{", indent));
    } else {
        lines.push(format!("{}state {} {{", indent, state.name));
    }
    print_body(chart, id, &format!("{}\t", indent), lines);
    lines.push(format!("{}}}", indent));
}

/// Render a state's body: actions, start, children, events.
fn print_body(chart: &Chart, id: StateId, indent: &str, lines: &mut Vec<String>) {
    let state = chart.state(id);
    if !state.entry.is_empty() {
        lines.push(format!("{}entry {};", indent, state.entry.join(", ")));
    }
    if !state.exit.is_empty() {
        lines.push(format!("{}exit {};", indent, state.exit.join(", ")));
    }
    if let Some(start) = state.start {
        lines.push(format!("{}start {};", indent, chart.state(start).name));
    }
    for &child in &state.children {
        print_state(chart, child, indent, lines);
    }
    for event in &state.events {
        lines.push(print_event(chart, event, indent));
    }
}

/// Render one event declaration on a single line.
fn print_event(chart: &Chart, event: &Event, indent: &str) -> String {
    let mut line = match &event.cond {
        Some(cond) => format!("{}event {} if {}", indent, event.name, cond),
        None => format!("{}event {}", indent, event.name),
    };
    if event.dst.is_none() && event.actions.is_empty() {
        line.push(';');
        return line;
    }
    line.push_str(" {");
    if let Some(dst) = event.dst {
        line.push_str(&format!(" dst {};", chart.state(dst).name));
    }
    if !event.actions.is_empty() {
        line.push_str(&format!(" act {};", event.actions.join(", ")));
    }
    line.push_str(" }");
    line
}
