//! Read-only facade consumed by the code generation backends.
//!
//! Everything a backend needs: the chart name split into class and
//! namespace, the sorted unique event/action/condition name sets, the leaf
//! states, per-leaf events grouped by name (guarded alternatives before the
//! unguarded default), and the identifier conversion the emitted code uses.

use std::collections::BTreeSet;

use indexmap::IndexMap;

use crate::chart::{Chart, Event, StateId};

impl Chart {
    /// The chart's class name (last segment) and namespace segments (the
    /// rest), split from the root's qualified name.
    pub fn chart_name(&self) -> (String, Vec<String>) {
        let qualified = &self.state(self.root()).name;
        let mut segments: Vec<String> = qualified.split('.').map(str::to_string).collect();
        let class = segments.pop().expect("split yields at least one segment");
        (class, segments)
    }

    /// Sorted unique event names across the whole chart.
    pub fn all_events(&self) -> Vec<String> {
        let mut set = BTreeSet::new();
        for (_, state) in self.states() {
            for event in &state.events {
                set.insert(event.name.clone());
            }
        }
        set.into_iter().collect()
    }

    /// Sorted unique guard condition names across the whole chart.
    pub fn all_conditions(&self) -> Vec<String> {
        let mut set = BTreeSet::new();
        for (_, state) in self.states() {
            for event in &state.events {
                if let Some(cond) = &event.cond {
                    set.insert(cond.clone());
                }
            }
        }
        set.into_iter().collect()
    }

    /// Sorted unique action names: event actions plus entry and exit
    /// actions of every state.
    pub fn all_actions(&self) -> Vec<String> {
        let mut set = BTreeSet::new();
        for (_, state) in self.states() {
            for event in &state.events {
                set.extend(event.actions.iter().cloned());
            }
            set.extend(state.entry.iter().cloned());
            set.extend(state.exit.iter().cloned());
        }
        set.into_iter().collect()
    }

    /// Leaf states in document order.
    pub fn leaves(&self) -> Vec<StateId> {
        self.states()
            .filter(|(id, _)| self.is_leaf(*id))
            .map(|(id, _)| id)
            .collect()
    }

    /// A state's events grouped by name. Within each group, guarded
    /// declarations keep their order and come first; the unguarded default,
    /// if any, is last — the dispatch order of the emitted code.
    pub fn events_grouped(&self, id: StateId) -> IndexMap<&str, Vec<&Event>> {
        let mut groups: IndexMap<&str, Vec<&Event>> = IndexMap::new();
        let events = &self.state(id).events;
        for event in events.iter().filter(|ev| ev.has_cond()) {
            groups.entry(&event.name).or_default().push(event);
        }
        for event in events.iter().filter(|ev| !ev.has_cond()) {
            groups.entry(&event.name).or_default().push(event);
        }
        groups
    }
}

/// Convert an identifier to PascalCase: every non-alphanumeric rune becomes
/// a word break, each word is title-cased, breaks are removed.
pub fn pascal_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word_start = true;
    for ch in text.chars() {
        if !ch.is_alphanumeric() {
            word_start = true;
            continue;
        }
        if word_start {
            out.extend(ch.to_uppercase());
            word_start = false;
        } else {
            out.push(ch);
        }
    }
    out
}
