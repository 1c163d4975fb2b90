use std::cell::RefCell;
use std::collections::BTreeMap;
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Result;

use super::SampleMsg;
use crate::indexed::{IndexPlate, IndexSet};

static NEXT_SCOPE_ID: AtomicU64 = AtomicU64::new(0);

/// A handler installed on the thread's interceptor stack.
///
/// Every hook defaults to a no-op, so a handler only implements the effects
/// it cares about.
pub trait Messenger {
    fn label(&self) -> &str;

    fn process_sample(&self, _msg: &mut SampleMsg) -> Result<()> {
        Ok(())
    }

    /// Returns `true` when the registration was handled; handlers further
    /// out are then not consulted.
    fn process_add_indices(&self, _indexset: &IndexSet) -> Result<bool> {
        Ok(false)
    }

    fn collect_index_plates(&self, _plates: &mut BTreeMap<String, IndexPlate>) {}
}

struct StackEntry {
    id: u64,
    messenger: Rc<dyn Messenger>,
}

thread_local! {
    static HANDLER_STACK: RefCell<Vec<StackEntry>> = const { RefCell::new(Vec::new()) };
}

/// Keeps a handler installed until dropped.
#[must_use = "the handler is removed as soon as the scope is dropped"]
pub struct HandlerScope {
    id: u64,
    label: String,
    // Scopes belong to the thread whose stack they were pushed on.
    _not_send: PhantomData<Rc<()>>,
}

impl HandlerScope {
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl Drop for HandlerScope {
    fn drop(&mut self) {
        HANDLER_STACK.with(|stack| {
            let mut stack = stack.borrow_mut();
            match stack.last() {
                Some(top) if top.id == self.id => {
                    stack.pop();
                }
                _ => {
                    crate::critical!(
                        "handler '{}' exited out of order; removing it from the middle of the stack",
                        self.label
                    );
                    stack.retain(|entry| entry.id != self.id);
                }
            }
        });
        crate::trace!("handler.exit label={}", self.label);
    }
}

/// Push `messenger` as the innermost handler of this thread.
pub fn push_handler(messenger: Rc<dyn Messenger>) -> HandlerScope {
    let id = NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed);
    let label = messenger.label().to_string();
    crate::trace!("handler.enter label={}", label);
    HANDLER_STACK.with(|stack| stack.borrow_mut().push(StackEntry { id, messenger }));
    HandlerScope {
        id,
        label,
        _not_send: PhantomData,
    }
}

/// Snapshot of the active handlers, outermost first.
pub(crate) fn handler_stack() -> Vec<Rc<dyn Messenger>> {
    HANDLER_STACK.with(|stack| {
        stack
            .borrow()
            .iter()
            .map(|entry| entry.messenger.clone())
            .collect()
    })
}

pub fn handler_depth() -> usize {
    HANDLER_STACK.with(|stack| stack.borrow().len())
}
