//! Read-only traversal utilities over nested values.
//!
//! Every operation walks depth-first in pre-order, descending into both
//! dict values and sequence elements. The iterators are lazy and finite,
//! and walk with an explicit stack so that pathologically deep input cannot
//! overflow the call stack. [`contains`] is the one strict reduction.
//!
//! Note one deliberate asymmetry, kept from the behavior this engine
//! models: [`find`] matches entry keys exactly, while [`contains`] treats
//! its key as a substring.

use crate::value::{Dict, Value, ValueKind};

/// The value at every occurrence of `key` anywhere in the structure,
/// including occurrences nested inside a value that itself matched.
pub fn extract<'a>(root: &'a Value, key: &'a str) -> Extract<'a> {
    Extract {
        key,
        stack: vec![Task::Visit(root)],
    }
}

/// Every dict owning an entry `key` (exact match) whose value matches
/// `kind`, or any kind if `None`. A matching dict is yielded once; the
/// walk does not descend into the matched entry's value, but does descend
/// into the dict's other entries.
pub fn find<'a>(root: &'a Value, key: &'a str, kind: Option<ValueKind>) -> Find<'a> {
    Find {
        key,
        kind,
        stack: vec![Step::Value(root)],
    }
}

/// Every dict containing an entry equal to `value`, optionally constrained
/// to the entry name `key`.
pub fn find_value<'a>(root: &'a Value, value: &'a Value, key: Option<&'a str>) -> FindValue<'a> {
    FindValue {
        value,
        key,
        stack: vec![Step::Value(root)],
    }
}

/// True iff any dict anywhere has an entry whose key includes `key` as a
/// substring (unlike [`find`]) and whose value matches `kind`.
pub fn contains(root: &Value, key: &str, kind: Option<ValueKind>) -> bool {
    contains_impl(vec![Step::Value(root)], key, kind)
}

pub(crate) fn contains_dict(root: &Dict, key: &str, kind: Option<ValueKind>) -> bool {
    contains_impl(vec![Step::Map(root)], key, kind)
}

fn kind_matches(value: &Value, kind: Option<ValueKind>) -> bool {
    kind.map_or(true, |k| value.kind() == k)
}

enum Task<'a> {
    Emit(&'a Value),
    Visit(&'a Value),
}

pub struct Extract<'a> {
    key: &'a str,
    stack: Vec<Task<'a>>,
}

impl<'a> Extract<'a> {
    pub(crate) fn from_dict(root: &'a Dict, key: &'a str) -> Self {
        let mut iter = Extract {
            key,
            stack: Vec::new(),
        };
        iter.visit_entries(root);
        iter
    }

    fn visit_entries(&mut self, entries: &'a Dict) {
        for (key, child) in entries.iter().rev() {
            self.stack.push(Task::Visit(child));
            if key.as_str() == self.key {
                self.stack.push(Task::Emit(child));
            }
        }
    }
}

impl<'a> Iterator for Extract<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<&'a Value> {
        while let Some(task) = self.stack.pop() {
            match task {
                Task::Emit(value) => return Some(value),
                Task::Visit(Value::Dict(entries)) => self.visit_entries(entries),
                Task::Visit(Value::Array(items)) | Task::Visit(Value::Tuple(items)) => {
                    for item in items.iter().rev() {
                        self.stack.push(Task::Visit(item));
                    }
                }
                Task::Visit(_) => {}
            }
        }
        None
    }
}

enum Step<'a> {
    Value(&'a Value),
    Map(&'a Dict),
}

/// Pop work until the next dict surfaces, expanding sequences on the way.
fn next_dict<'a>(stack: &mut Vec<Step<'a>>) -> Option<&'a Dict> {
    while let Some(step) = stack.pop() {
        match step {
            Step::Map(entries) => return Some(entries),
            Step::Value(Value::Dict(entries)) => return Some(entries),
            Step::Value(Value::Array(items)) | Step::Value(Value::Tuple(items)) => {
                for item in items.iter().rev() {
                    stack.push(Step::Value(item));
                }
            }
            Step::Value(_) => {}
        }
    }
    None
}

pub struct Find<'a> {
    key: &'a str,
    kind: Option<ValueKind>,
    stack: Vec<Step<'a>>,
}

impl<'a> Find<'a> {
    pub(crate) fn from_dict(root: &'a Dict, key: &'a str, kind: Option<ValueKind>) -> Self {
        Find {
            key,
            kind,
            stack: vec![Step::Map(root)],
        }
    }
}

impl<'a> Iterator for Find<'a> {
    type Item = &'a Dict;

    fn next(&mut self) -> Option<&'a Dict> {
        while let Some(entries) = next_dict(&mut self.stack) {
            let matched = entries
                .get(self.key)
                .is_some_and(|value| kind_matches(value, self.kind));
            for (key, child) in entries.iter().rev() {
                if matched && key.as_str() == self.key {
                    continue;
                }
                self.stack.push(Step::Value(child));
            }
            if matched {
                return Some(entries);
            }
        }
        None
    }
}

pub struct FindValue<'a> {
    value: &'a Value,
    key: Option<&'a str>,
    stack: Vec<Step<'a>>,
}

impl<'a> FindValue<'a> {
    pub(crate) fn from_dict(root: &'a Dict, value: &'a Value, key: Option<&'a str>) -> Self {
        FindValue {
            value,
            key,
            stack: vec![Step::Map(root)],
        }
    }
}

impl<'a> Iterator for FindValue<'a> {
    type Item = &'a Dict;

    fn next(&mut self) -> Option<&'a Dict> {
        while let Some(entries) = next_dict(&mut self.stack) {
            let matched = entries.iter().any(|(key, value)| {
                value == self.value && self.key.map_or(true, |want| key.as_str() == want)
            });
            for (_, child) in entries.iter().rev() {
                self.stack.push(Step::Value(child));
            }
            if matched {
                return Some(entries);
            }
        }
        None
    }
}

fn contains_impl(mut stack: Vec<Step<'_>>, key: &str, kind: Option<ValueKind>) -> bool {
    while let Some(entries) = next_dict(&mut stack) {
        for (name, child) in entries {
            if name.as_str().contains(key) && kind_matches(child, kind) {
                return true;
            }
            stack.push(Step::Value(child));
        }
    }
    false
}
