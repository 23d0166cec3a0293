//! Backend smoke tests: structural landmarks of each target's output,
//! sentinel install order, and guard fall-through order.

use std::path::PathBuf;

use hsmc::foundation::SourceMap;
use hsmc::Chart;
use hsmc_codegen::Target;

fn emit(target: Target, source: &str) -> String {
    let (chart, printed) = compile(source);
    target.emit(&chart, &printed).expect("emit failed")
}

fn compile(source: &str) -> (Chart, Vec<String>) {
    let mut sources = SourceMap::new();
    let file_id = sources.add_file(PathBuf::from("test.hsm"), source.to_string());
    let mut chart = hsmc::parse_chart(&sources, file_id).expect("parse failed");
    let printed = hsmc::print::print_root(&chart);
    hsmc::resolve::inherit_events(&mut chart);
    (chart, printed)
}

/// Assert each needle occurs, in the given order.
fn assert_in_order(haystack: &str, needles: &[&str]) {
    let mut from = 0;
    for needle in needles {
        match haystack[from..].find(needle) {
            Some(pos) => from += pos + needle.len(),
            None => panic!("missing or out of order: {:?}\n---\n{}", needle, haystack),
        }
    }
}

const BASIC: &str = "demo.M { start A;
    state A { exit xa; event Go { dst B; act f; } }
    state B { entry eb; }
}";

// =========================================================================
// C#
// =========================================================================

#[test]
fn test_cs_structure() {
    let out = emit(Target::Cs, BASIC);
    assert_in_order(
        &out,
        &[
            "using System;",
            "/**",
            "demo.M {",
            "**/",
            "namespace demo {",
            "public sealed class M {",
            "public interface IHandler {",
            "void OnEb();",
            "void OnF();",
            "void OnXa();",
            "void PostEvent(Action action);",
            "public sealed class DelegateHandler: IHandler {",
            "public void SendGo() {",
            "public void PostGo() {",
            "Handler.PostEvent(SendGo);",
            "public void Start() {",
            "private class InvalidState: IState {",
            "private class StateA: IState {",
            "private class StateB: IState {",
            "private IState CurrentState;",
        ],
    );
    assert!(out.ends_with("}\r\n"));
}

#[test]
fn test_cs_sentinel_before_actions() {
    let out = emit(Target::Cs, BASIC);
    assert_in_order(
        &out,
        &[
            "public override void OnGo(M parent) {",
            "parent.CurrentState = InvalidState.Instance;",
            "parent.Handler.OnXa();",
            "parent.Handler.OnF();",
            "parent.Handler.OnEb();",
            "parent.CurrentState = StateB.Instance;",
        ],
    );
}

#[test]
fn test_cs_guard_fall_through_order() {
    let out = emit(
        Target::Cs,
        "demo.M { start A;
            state A {
                event E if p { dst X; }
                event E if q { dst Y; act a; }
                event E { act b; }
            }
            state X; state Y;
        }",
    );
    assert_in_order(
        &out,
        &[
            "private class StateA: IState {",
            "if (parent.Handler.CondP()) {",
            "parent.CurrentState = StateX.Instance;",
            "return;",
            "if (parent.Handler.CondQ()) {",
            "parent.Handler.OnA();",
            "parent.CurrentState = StateY.Instance;",
            "return;",
            "parent.Handler.OnB();",
        ],
    );
}

#[test]
fn test_cs_noop_dispatch_omitted() {
    let out = emit(
        Target::Cs,
        "demo.M { start A; state A { event Noop; event Go { dst B; } } state B; }",
    );
    // The event still exists on the machine surface.
    assert!(out.contains("public void SendNoop() {"));
    // But StateA only overrides Go.
    let state_a = &out[out.find("private class StateA").unwrap()..];
    let state_a = &state_a[..state_a.find("private class StateB").unwrap()];
    assert!(state_a.contains("OnGo"));
    assert!(!state_a.contains("OnNoop"));
}

#[test]
fn test_cs_internal_transition_keeps_state() {
    let out = emit(
        Target::Cs,
        "demo.M { start A; state A { event Tick { act t; } } }",
    );
    let on_tick = &out[out.find("private class StateA").unwrap()..];
    assert!(on_tick.contains("parent.Handler.OnT();"));
    // No sentinel and no state install for a pure internal transition.
    let handler = &on_tick[..on_tick.find("public static readonly").unwrap()];
    assert!(!handler.contains("InvalidState.Instance"));
    assert!(!handler.contains("CurrentState = State"));
}

// =========================================================================
// C++
// =========================================================================

#[test]
fn test_cpp_structure() {
    let out = emit(Target::Cpp, BASIC);
    assert_in_order(
        &out,
        &[
            "#pragma once",
            "/**",
            "**/",
            "namespace demo {",
            "struct M {",
            "void SendGo() {",
            "CurrentState->OnGo(this);",
            "void PostGo() {",
            "PostEvent(&M::SendGo);",
            "void Start() {",
            "using Event = void (M::*)();",
            "protected:",
            "virtual void OnEb() {",
            "virtual void PostEvent(Event event) {",
            "private:",
            "struct IState {",
            "struct InvalidState: IState {",
            "throw \"invalid state\";",
            "struct StateA: IState {",
            "void SetInvalidState() {",
            "void SetStateA() {",
            "static StateA Instance;",
            "IState *CurrentState = nullptr;",
        ],
    );
}

#[test]
fn test_cpp_sentinel_before_actions() {
    let out = emit(Target::Cpp, BASIC);
    assert_in_order(
        &out,
        &[
            "void OnGo(M *parent) override {",
            "parent->SetInvalidState();",
            "parent->OnXa();",
            "parent->OnF();",
            "parent->OnEb();",
            "parent->SetStateB();",
        ],
    );
}

#[test]
fn test_cpp_namespace_separator() {
    let out = emit(Target::Cpp, "com.example.M { start A; state A; }");
    assert!(out.contains("namespace com::example {"));
}

// =========================================================================
// Go
// =========================================================================

#[test]
fn test_go_structure() {
    let out = emit(Target::Go, BASIC);
    assert_in_order(
        &out,
        &[
            "package demo",
            "/**",
            "**/",
            "type M struct {",
            "OnEb func()",
            "OnF func()",
            "OnXa func()",
            "PostEvent func(func())",
            "currentState string",
            "func (this *M) SendGo() {",
            "switch this.currentState {",
            "case \"A\":",
            "case \"none\":",
            "panic(\"invalid state\")",
            "func (this *M) PostGo() {",
            "this.PostEvent(this.SendGo)",
            "func (this *M) Start() {",
            "if this.currentState == \"\" {",
            "this.currentState = \"A\"",
        ],
    );
}

#[test]
fn test_go_sentinel_before_actions() {
    let out = emit(Target::Go, BASIC);
    assert_in_order(
        &out,
        &[
            "case \"A\":",
            "this.currentState = \"none\"",
            "this.OnXa()",
            "this.OnF()",
            "this.OnEb()",
            "this.currentState = \"B\"",
        ],
    );
}

#[test]
fn test_go_guarded_dispatch() {
    let out = emit(
        Target::Go,
        "demo.M { start A;
            state A { event E if p { dst B; } event E { act stay; } }
            state B;
        }",
    );
    assert_in_order(
        &out,
        &[
            "if this.CondP() {",
            "this.currentState = \"B\"",
            "return;",
            "}",
            "this.OnStay()",
        ],
    );
}

// =========================================================================
// Shared properties
// =========================================================================

#[test]
fn test_comment_block_reparses() {
    // The DSL text embedded in the output is itself a valid chart.
    let out = emit(Target::Cs, BASIC);
    let begin = out.find("/**").unwrap() + 3;
    let end = out.find("**/").unwrap();
    let embedded = out[begin..end].to_string();

    let mut sources = SourceMap::new();
    let file_id = sources.add_file(PathBuf::from("embedded.hsm"), embedded);
    let chart = hsmc::parse_chart(&sources, file_id).expect("embedded chart must reparse");
    assert_eq!(chart.chart_name().0, "M");
}

#[test]
fn test_crlf_line_endings() {
    let out = emit(Target::Go, BASIC);
    assert!(out.lines().count() > 10);
    assert!(!out.contains("\n\r"));
    assert_eq!(out.matches('\n').count(), out.matches("\r\n").count());
}

#[test]
fn test_emit_is_deterministic() {
    let (chart, printed) = compile(BASIC);
    let first = Target::Cs.emit(&chart, &printed).unwrap();
    let second = Target::Cs.emit(&chart, &printed).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_missing_start_reported_not_panicked() {
    let (chart, printed) = compile(
        "demo.M { start A;
            state A { event Go { dst Grp; } }
            state Grp { state X; state Y; }
        }",
    );
    let err = Target::Cs.emit(&chart, &printed).unwrap_err();
    assert_eq!(err.message, "Grp: missing start");
}
