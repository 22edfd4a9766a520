//! Test doubles for the probe, invoker and host seams.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

use crate::error::ErrorKind;
use crate::invoker::{CommandOutcome, CommandTemplate, Invocation, Invoker};
use crate::presenter::{Host, Notification};
use crate::probe::{ExecutableLocation, Probe};

/// Probe with a fixed answer and a shared call counter.
#[derive(Clone)]
pub struct FakeProbe {
    answer: Rc<RefCell<ExecutableLocation>>,
    calls: Rc<Cell<u32>>,
}

impl FakeProbe {
    pub fn installed() -> Self {
        Self::answering(ExecutableLocation::found("/usr/local/bin/grc"))
    }

    pub fn not_installed() -> Self {
        Self::answering(ExecutableLocation::missing(ErrorKind::NotInstalled))
    }

    pub fn answering(location: ExecutableLocation) -> Self {
        Self {
            answer: Rc::new(RefCell::new(location)),
            calls: Rc::new(Cell::new(0)),
        }
    }

    /// Change what later probes report, e.g. after an install.
    pub fn set(&self, location: ExecutableLocation) {
        *self.answer.borrow_mut() = location;
    }

    pub fn calls(&self) -> u32 {
        self.calls.get()
    }
}

impl Probe for FakeProbe {
    fn locate(&self) -> ExecutableLocation {
        self.calls.set(self.calls.get() + 1);
        self.answer.borrow().clone()
    }
}

/// Invoker that records every call and replays canned outcomes.
/// Templates without a canned outcome succeed with empty output.
#[derive(Clone, Default)]
pub struct FakeInvoker {
    responses: Rc<RefCell<HashMap<CommandTemplate, CommandOutcome>>>,
    calls: Rc<RefCell<Vec<Invocation>>>,
}

impl FakeInvoker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, template: CommandTemplate, outcome: CommandOutcome) -> Self {
        self.responses.borrow_mut().insert(template, outcome);
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    pub fn count(&self, template: CommandTemplate) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.template == template)
            .count()
    }
}

impl Invoker for FakeInvoker {
    fn run(&self, _executable: &Path, invocation: &Invocation) -> CommandOutcome {
        self.calls.borrow_mut().push(invocation.clone());
        self.responses
            .borrow()
            .get(&invocation.template)
            .cloned()
            .unwrap_or_else(|| CommandOutcome::success(""))
    }
}

/// Host that records notifications and answers prompts from a script.
#[derive(Default)]
pub struct FakeHost {
    pub accept_first_action: bool,
    pub inputs: RefCell<Vec<String>>,
    pub notifications: RefCell<Vec<Notification>>,
    pub status_lines: RefCell<Vec<String>>,
}

impl FakeHost {
    pub fn accepting() -> Self {
        Self {
            accept_first_action: true,
            ..Self::default()
        }
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.notifications.borrow().clone()
    }
}

impl Host for FakeHost {
    fn notify(&self, notification: &Notification) -> Option<usize> {
        self.notifications.borrow_mut().push(notification.clone());
        (self.accept_first_action && !notification.actions.is_empty()).then_some(0)
    }

    fn input(&self, _prompt: &str) -> Option<String> {
        let mut inputs = self.inputs.borrow_mut();
        if inputs.is_empty() {
            None
        } else {
            Some(inputs.remove(0))
        }
    }

    fn pick(&self, prompt: &str, _items: &[String]) -> Option<String> {
        self.input(prompt)
    }

    fn status(&self, text: &str) {
        self.status_lines.borrow_mut().push(text.to_string());
    }
}
