//! Go backend.
//!
//! Emits a struct whose handler surface is a set of function-valued fields
//! (`On*`, `Cond*`), a string-valued current state, and one `Send*` method
//! per event switching on the current leaf. The `"none"` state is the
//! re-entrancy trap.

use hsmc::render::pascal_case;
use hsmc::transition::{compile_start, compile_transition};
use hsmc::{Chart, CompileResult, Event};

use crate::{dispatch_is_empty, Emitter};

pub(crate) fn emit(chart: &Chart, source: &[String]) -> CompileResult<String> {
    let mut e = Emitter::new();
    let (name, ns) = chart.chart_name();
    let all_conds = chart.all_conditions();
    let all_acts = chart.all_actions();
    let all_events = chart.all_events();
    let leaves = chart.leaves();

    e.line(0, format!("package {}", ns.join("")));
    e.line(0, "");
    e.line(0, "/**");
    e.line(0, source.join("\r\n"));
    e.line(0, "**/");
    e.line(0, "");
    e.line(0, format!("type {} struct {{", name));
    for act in &all_acts {
        e.line(1, format!("On{} func()", pascal_case(act)));
    }
    for cond in &all_conds {
        e.line(1, format!("Cond{} func() bool", pascal_case(cond)));
    }
    e.line(1, "PostEvent func(func())");
    e.line(1, "currentState string");
    e.line(0, "}");
    e.line(0, "");

    for event_name in &all_events {
        e.line(
            0,
            format!("func (this *{}) Send{}() {{", name, pascal_case(event_name)),
        );
        e.line(1, "switch this.currentState {");
        for &leaf in &leaves {
            let groups = chart.events_grouped(leaf);
            let Some(events) = groups.get(event_name.as_str()) else {
                continue;
            };
            if dispatch_is_empty(chart, events)? {
                continue;
            }
            e.line(
                1,
                format!("case \"{}\":", pascal_case(&chart.state(leaf).name)),
            );
            for event in events {
                if let Some(cond) = &event.cond {
                    e.line(2, format!("if this.Cond{}() {{", pascal_case(cond)));
                    transition(&mut e, 3, chart, event)?;
                    e.line(3, "return;");
                    e.line(2, "}");
                } else {
                    transition(&mut e, 2, chart, event)?;
                }
            }
        }
        e.line(1, "case \"none\":");
        e.line(2, "panic(\"invalid state\")");
        e.line(1, "}");
        e.line(0, "}");
    }

    for event_name in &all_events {
        let event_name = pascal_case(event_name);
        e.line(0, format!("func (this *{}) Post{}() {{", name, event_name));
        e.line(1, format!("this.PostEvent(this.Send{})", event_name));
        e.line(0, "}");
    }

    e.line(0, "");
    let (actions, dst) = compile_start(chart)?;
    e.line(0, format!("func (this *{}) Start() {{", name));
    e.line(1, "if this.currentState == \"\" {");
    for act in &actions {
        e.line(2, format!("this.On{}();", pascal_case(act)));
    }
    e.line(
        2,
        format!(
            "this.currentState = \"{}\"",
            pascal_case(&chart.state(dst).name)
        ),
    );
    e.line(1, "}");
    e.line(0, "}");
    Ok(e.finish())
}

fn transition(e: &mut Emitter, indent: usize, chart: &Chart, event: &Event) -> CompileResult<()> {
    let (actions, dst) = compile_transition(chart, event)?;
    if dst.is_some() && !actions.is_empty() {
        e.line(indent, "this.currentState = \"none\"");
    }
    for act in &actions {
        e.line(indent, format!("this.On{}()", pascal_case(act)));
    }
    if let Some(dst) = dst {
        e.line(
            indent,
            format!(
                "this.currentState = \"{}\"",
                pascal_case(&chart.state(dst).name)
            ),
        );
    }
    Ok(())
}
