//! C# backend.
//!
//! Emits a sealed class with an `IHandler` interface (one `Cond*` per guard,
//! one `On*` per action, `PostEvent` for deferral), a `DelegateHandler`
//! convenience implementation, `Send*`/`Post*` per event, and one singleton
//! state class per leaf overriding the events it handles.

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

    e.line(0, "using System;");
    e.line(0, "");
    e.line(0, "/**");
    e.line(0, source.join("\r\n"));
    e.line(0, "**/");
    e.line(0, "");
    e.line(0, format!("namespace {} {{", ns.join(".")));
    e.line(1, format!("public sealed class {} {{", name));

    e.line(2, "public interface IHandler {");
    for cond in &all_conds {
        e.line(3, format!("bool Cond{}();", pascal_case(cond)));
    }
    for act in &all_acts {
        e.line(3, format!("void On{}();", pascal_case(act)));
    }
    e.line(3, "void PostEvent(Action action);");
    e.line(2, "}");

    e.line(2, "public sealed class DelegateHandler: IHandler {");
    for cond in &all_conds {
        let cond = pascal_case(cond);
        e.line(3, format!("public bool Cond{}() {{", cond));
        e.line(4, format!("return cond{}();", cond));
        e.line(3, "}");
        e.line(3, format!("public Func<bool> cond{} {{ get; set; }}", cond));
    }
    for act in &all_acts {
        let act = pascal_case(act);
        e.line(3, format!("public void On{}() {{", act));
        e.line(4, format!("on{}();", act));
        e.line(3, "}");
        e.line(3, format!("public Action on{} {{ get; set; }}", act));
    }
    e.line(3, "public void PostEvent(Action action) {");
    e.line(4, "postEvent(action);");
    e.line(3, "}");
    e.line(3, "public Action<Action> postEvent { get; set; }");
    e.line(2, "}");

    for event in &all_events {
        let event = pascal_case(event);
        e.line(2, format!("public void Send{}() {{", event));
        e.line(3, format!("CurrentState.On{}(this);", event));
        e.line(2, "}");
    }
    for event in &all_events {
        let event = pascal_case(event);
        e.line(2, format!("public void Post{}() {{", event));
        e.line(3, format!("Handler.PostEvent(Send{});", event));
        e.line(2, "}");
    }

    e.line(2, "public void Start() {");
    e.line(3, "if (CurrentState == null) {");
    let (actions, dst) = compile_start(chart)?;
    for act in &actions {
        e.line(4, format!("Handler.On{}();", pascal_case(act)));
    }
    e.line(
        4,
        format!(
            "CurrentState = State{}.Instance;",
            pascal_case(&chart.state(dst).name)
        ),
    );
    e.line(3, "}");
    e.line(2, "}");

    e.line(2, "private class IState {");
    for event in &all_events {
        e.line(
            3,
            format!("public virtual void On{}({} parent) {{", pascal_case(event), name),
        );
        e.line(3, "}");
    }
    e.line(2, "}");

    e.line(2, "private class InvalidState: IState {");
    for event in &all_events {
        e.line(
            3,
            format!("public override void On{}({} parent) {{", pascal_case(event), name),
        );
        e.line(4, "throw new Exception();");
        e.line(3, "}");
    }
    e.line(3, "public static readonly IState Instance = new InvalidState();");
    e.line(2, "}");

    for &leaf in &chart.leaves() {
        let state_name = pascal_case(&chart.state(leaf).name);
        e.line(2, format!("private class State{}: IState {{", state_name));
        let groups = chart.events_grouped(leaf);
        for event_name in &all_events {
            let Some(events) = groups.get(event_name.as_str()) else {
                continue;
            };
            if dispatch_is_empty(chart, events)? {
                continue;
            }
            e.line(
                3,
                format!(
                    "public override void On{}({} parent) {{",
                    pascal_case(event_name),
                    name
                ),
            );
            for event in events {
                if let Some(cond) = &event.cond {
                    e.line(
                        4,
                        format!("if (parent.Handler.Cond{}()) {{", pascal_case(cond)),
                    );
                    transition(&mut e, 5, chart, event)?;
                    e.line(5, "return;");
                    e.line(4, "}");
                } else {
                    transition(&mut e, 4, chart, event)?;
                }
            }
            e.line(3, "}");
        }
        e.line(
            3,
            format!(
                "public static readonly IState Instance = new State{}();",
                state_name
            ),
        );
        e.line(2, "}");
    }

    e.line(2, format!("public {}(IHandler handler) {{", name));
    e.line(3, "Handler = handler;");
    e.line(2, "}");
    e.line(2, "private readonly IHandler Handler;");
    e.line(2, "private IState CurrentState;");
    e.line(1, "}");
    e.line(0, "}");
    Ok(e.finish())
}

/// Emit one taken transition: park in the invalid state when actions run
/// before a state change, run the actions, then install the destination.
fn transition(e: &mut Emitter, indent: usize, chart: &Chart, event: &Event) -> CompileResult<()> {
    let (actions, dst) = compile_transition(chart, event)?;
    if dst.is_some() && !actions.is_empty() {
        e.line(indent, "parent.CurrentState = InvalidState.Instance;");
    }
    for act in &actions {
        e.line(indent, format!("parent.Handler.On{}();", pascal_case(act)));
    }
    if let Some(dst) = dst {
        e.line(
            indent,
            format!(
                "parent.CurrentState = State{}.Instance;",
                pascal_case(&chart.state(dst).name)
            ),
        );
    }
    Ok(())
}
