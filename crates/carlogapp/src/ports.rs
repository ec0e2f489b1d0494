//! # Host Ports
//!
//! The library never prompts or prints. Anything that needs the user goes through two
//! traits supplied by the host when it builds a [`CarlogApi`](crate::api::CarlogApi):
//!
//! - [`Confirm`]: yes/no answer before destructive operations (delete, restore).
//! - [`Notify`]: transient notices ("Fuel record added") and change events telling
//!   the host which collection it should re-query.
//!
//! A third port, [`Clock`], is where the facade reads the time. It defaults to
//! [`SystemClock`]; tests pin it with [`FixedClock`].
//!
//! The implementations here cover tests and non-interactive hosts. The CLI ships its
//! own terminal versions.

use chrono::{DateTime, Utc};
use std::cell::RefCell;

use crate::commands::CmdMessage;
use crate::model::Collection;

pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

pub trait Notify {
    fn notice(&self, message: &CmdMessage);

    /// A collection changed and views over it are stale.
    fn changed(&self, _collection: Collection) {}
}

pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Always reports the same instant.
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Answers yes to everything.
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Answers no to everything.
pub struct NeverConfirm;

impl Confirm for NeverConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        false
    }
}

pub struct SilentNotifier;

impl Notify for SilentNotifier {
    fn notice(&self, _message: &CmdMessage) {}
}

/// Keeps every notice and change event, for assertions.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: RefCell<Vec<CmdMessage>>,
    changes: RefCell<Vec<Collection>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<CmdMessage> {
        self.notices.borrow().clone()
    }

    pub fn changes(&self) -> Vec<Collection> {
        self.changes.borrow().clone()
    }
}

impl Notify for RecordingNotifier {
    fn notice(&self, message: &CmdMessage) {
        self.notices.borrow_mut().push(message.clone());
    }

    fn changed(&self, collection: Collection) {
        self.changes.borrow_mut().push(collection);
    }
}

impl<T: Notify + ?Sized> Notify for std::rc::Rc<T> {
    fn notice(&self, message: &CmdMessage) {
        (**self).notice(message)
    }

    fn changed(&self, collection: Collection) {
        (**self).changed(collection)
    }
}

impl<T: Confirm + ?Sized> Confirm for std::rc::Rc<T> {
    fn confirm(&self, prompt: &str) -> bool {
        (**self).confirm(prompt)
    }
}
