//! Utilities for structured reporting of engine statistics.
//!
//! Everything reported within one thread is collected into a single JSON
//! document and dumped to stdout when the reporting guard is dropped.
//! Reporting is opt-in: until [`enable_reporting`] is called, the `report!`
//! macro is a no-op, so library code can report unconditionally without
//! forcing output on anyone.
//!
//! Nested contexts group values: [`push_context`] opens an object under a
//! key, [`push_collection_context`] opens an array whose items are created
//! with [`push_collection_item`] (one per query, usually). Contexts close
//! when their guard is dropped.

use serde_json::{Map, Value};
use std::cell::RefCell;

pub use serde_json::json;

pub mod benchmark;

#[derive(Debug)]
enum Context {
    Object { key: Option<String>, map: Map<String, Value> },
    Collection { key: String, items: Vec<Value> },
}

#[derive(Debug)]
struct Reporter {
    // bottom entry is always the root object
    stack: Vec<Context>,
}

impl Reporter {
    fn new() -> Reporter {
        Reporter {
            stack: vec![Context::Object {
                key: None,
                map: Map::new(),
            }],
        }
    }

    fn report(&mut self, key: String, val: Value) {
        match self.stack.last_mut() {
            Some(Context::Object { map, .. }) => {
                let prev = map.insert(key, val);
                if !cfg!(feature = "report-allow-override") {
                    assert!(prev.is_none(), "reported the same key twice in one context");
                }
            }
            Some(Context::Collection { .. }) => panic!("cannot report a value directly into a collection"),
            None => unreachable!("context stack empty"),
        }
    }

    fn pop_context(&mut self) {
        let top = self.stack.pop().expect("tried to pop from empty context stack");
        let (key, value) = match top {
            Context::Object { key, map } => (key.expect("tried to pop the root context"), Value::Object(map)),
            Context::Collection { key, items } => (key, Value::Array(items)),
        };
        match self.stack.last_mut() {
            Some(Context::Object { map, .. }) => {
                map.insert(key, value);
            }
            _ => panic!("inconsistent context stack"),
        }
    }

    fn pop_collection_item(&mut self) {
        let top = self.stack.pop().expect("tried to pop from empty context stack");
        let value = match top {
            Context::Object { key: None, map } => Value::Object(map),
            _ => panic!("inconsistent context stack"),
        };
        match self.stack.last_mut() {
            Some(Context::Collection { items, .. }) => items.push(value),
            _ => panic!("collection item without enclosing collection"),
        }
    }

    fn into_root(mut self) -> Value {
        assert!(self.stack.len() == 1, "dangling reporting contexts");
        match self.stack.pop() {
            Some(Context::Object { map, .. }) => Value::Object(map),
            _ => unreachable!(),
        }
    }
}

thread_local! {
    static REPORTER: RefCell<Option<Reporter>> = const { RefCell::new(None) };
}

/// Activate reporting for the current thread. The returned guard prints the
/// collected JSON document to stdout when dropped.
#[must_use]
pub fn enable_reporting() -> ReportingGuard {
    REPORTER.with(|r| *r.borrow_mut() = Some(Reporter::new()));
    ReportingGuard(())
}

pub struct ReportingGuard(());

impl Drop for ReportingGuard {
    fn drop(&mut self) {
        REPORTER.with(|r| {
            if let Some(reporter) = r.borrow_mut().take() {
                println!("{}", reporter.into_root());
            }
        });
    }
}

/// Group everything reported while the guard lives into an object under `key`.
#[must_use]
pub fn push_context(key: &str) -> ContextGuard {
    with_reporter(|r| r.stack.push(Context::Object {
        key: Some(key.to_string()),
        map: Map::new(),
    }));
    ContextGuard(())
}

/// Open an array under `key`. Items are opened with [`push_collection_item`].
#[must_use]
pub fn push_collection_context(key: &str) -> ContextGuard {
    with_reporter(|r| r.stack.push(Context::Collection {
        key: key.to_string(),
        items: Vec::new(),
    }));
    ContextGuard(())
}

/// Open a new item object in the innermost collection context.
#[must_use]
pub fn push_collection_item() -> CollectionItemGuard {
    with_reporter(|r| r.stack.push(Context::Object { key: None, map: Map::new() }));
    CollectionItemGuard(())
}

pub struct ContextGuard(());

impl Drop for ContextGuard {
    fn drop(&mut self) {
        with_reporter(Reporter::pop_context);
    }
}

pub struct CollectionItemGuard(());

impl Drop for CollectionItemGuard {
    fn drop(&mut self) {
        with_reporter(Reporter::pop_collection_item);
    }
}

pub fn report(key: String, val: Value) {
    if cfg!(feature = "report-to-stderr") {
        eprintln!("{}: {}", key, val);
    }
    with_reporter(|r| r.report(key, val));
}

fn with_reporter(f: impl FnOnce(&mut Reporter)) {
    REPORTER.with(|r| {
        if let Some(reporter) = r.borrow_mut().as_mut() {
            f(reporter);
        }
    });
}

#[macro_export]
macro_rules! report {
    ($k:expr, $($json:tt)+) => {
        $crate::report::report($k.to_string(), $crate::report::json!($($json)+))
    };
}
