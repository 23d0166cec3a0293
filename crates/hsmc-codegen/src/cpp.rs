//! C++ backend.
//!
//! Emits a header-only struct: `Send*`/`Post*` per event, protected virtual
//! `On*`/`Cond*` hooks (conditions and `PostEvent` throw until overridden),
//! per-leaf state structs with function-local-static instances, and
//! `SetInvalidState` as the re-entrancy trap.

use hsmc::render::pascal_case;
use hsmc::transition::{compile_start, compile_transition};
use hsmc::{Chart, CompileResult, Event};

use crate::Emitter;

pub(crate) fn emit(chart: &Chart, source: &[String]) -> CompileResult<String> {
    let mut e = Emitter::new();
    let (name, ns) = chart.chart_name();
    let all_conds = chart.all_conditions();
    let all_acts = chart.all_actions();
    let all_events = chart.all_events();

    e.line(0, "#pragma once");
    e.line(0, "");
    e.line(0, "/**");
    e.line(0, source.join("\r\n"));
    e.line(0, "**/");
    e.line(0, "");
    e.line(0, format!("namespace {} {{", ns.join("::")));
    e.line(1, format!("struct {} {{", name));

    for event in &all_events {
        let event = pascal_case(event);
        e.line(2, format!("void Send{}() {{", event));
        e.line(3, format!("CurrentState->On{}(this);", event));
        e.line(2, "}");
    }
    for event in &all_events {
        let event = pascal_case(event);
        e.line(2, format!("void Post{}() {{", event));
        e.line(3, format!("PostEvent(&{}::Send{});", name, event));
        e.line(2, "}");
    }

    e.line(2, "void Start() {");
    e.line(3, "if (CurrentState == nullptr) {");
    let (actions, dst) = compile_start(chart)?;
    for act in &actions {
        e.line(4, format!("On{}();", pascal_case(act)));
    }
    e.line(
        4,
        format!("SetState{}();", pascal_case(&chart.state(dst).name)),
    );
    e.line(3, "}");
    e.line(2, "}");
    e.line(2, format!("using Event = void ({}::*)();", name));

    e.line(1, "protected:");
    for act in &all_acts {
        e.line(2, format!("virtual void On{}() {{", pascal_case(act)));
        e.line(2, "}");
    }
    for cond in &all_conds {
        let cond = pascal_case(cond);
        e.line(2, format!("virtual bool Cond{}() const {{", cond));
        e.line(3, format!("throw \"not implemented: Cond{}\";", cond));
        e.line(2, "}");
    }
    e.line(2, "virtual void PostEvent(Event event) {");
    e.line(3, "throw \"not implemented: PostEvent\";");
    e.line(2, "}");
    e.line(2, "void ProcessEvent(Event event) {");
    e.line(3, "(this->*event)();");
    e.line(2, "}");

    e.line(1, "private:");
    e.line(2, "struct IState {");
    for event in &all_events {
        e.line(
            3,
            format!("virtual void On{}({} *) {{", pascal_case(event), name),
        );
        e.line(3, "}");
    }
    e.line(2, "};");
    e.line(2, "struct InvalidState: IState {");
    for event in &all_events {
        e.line(
            3,
            format!("void On{}({} *) override {{", pascal_case(event), name),
        );
        e.line(4, "throw \"invalid state\";");
        e.line(3, "}");
    }
    e.line(2, "};");

    for &leaf in &chart.leaves() {
        let state_name = pascal_case(&chart.state(leaf).name);
        e.line(2, format!("struct State{}: IState {{", state_name));
        let groups = chart.events_grouped(leaf);
        for event_name in &all_events {
            let Some(events) = groups.get(event_name.as_str()) else {
                continue;
            };
            e.line(
                3,
                format!(
                    "void On{}({} *parent) override {{",
                    pascal_case(event_name),
                    name
                ),
            );
            for event in events {
                if let Some(cond) = &event.cond {
                    e.line(4, format!("if (parent->Cond{}()) {{", pascal_case(cond)));
                    transition(&mut e, 5, chart, event)?;
                    e.line(5, "return;");
                    e.line(4, "}");
                } else {
                    transition(&mut e, 4, chart, event)?;
                }
            }
            e.line(3, "}");
        }
        e.line(2, "};");
    }

    e.line(2, "void SetInvalidState() {");
    e.line(3, "static InvalidState Instance;");
    e.line(3, "CurrentState = &Instance;");
    e.line(2, "}");
    for &leaf in &chart.leaves() {
        let state_name = pascal_case(&chart.state(leaf).name);
        e.line(2, format!("void SetState{}() {{", state_name));
        e.line(3, format!("static State{} Instance;", state_name));
        e.line(3, "CurrentState = &Instance;");
        e.line(2, "}");
    }
    e.line(2, "IState *CurrentState = nullptr;");
    e.line(1, "};");
    e.line(0, "}");
    Ok(e.finish())
}

fn transition(e: &mut Emitter, indent: usize, chart: &Chart, event: &Event) -> CompileResult<()> {
    let (actions, dst) = compile_transition(chart, event)?;
    if dst.is_some() && !actions.is_empty() {
        e.line(indent, "parent->SetInvalidState();");
    }
    for act in &actions {
        e.line(indent, format!("parent->On{}();", pascal_case(act)));
    }
    if let Some(dst) = dst {
        e.line(
            indent,
            format!("parent->SetState{}();", pascal_case(&chart.state(dst).name)),
        );
    }
    Ok(())
}
