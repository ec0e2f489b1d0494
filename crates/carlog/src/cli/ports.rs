use carlogapp::commands::CmdMessage;
use carlogapp::model::Collection;
use carlogapp::ports::{Confirm, Notify};
use console::Term;
use tracing::debug;

use super::render::print_message;

/// Asks on the terminal. Declines when there is no terminal to ask on.
pub struct TerminalConfirm {
    assume_yes: bool,
}

impl TerminalConfirm {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        let term = Term::stderr();
        if !term.is_term() {
            debug!(prompt, "no terminal to confirm on, declining");
            return false;
        }
        if term.write_str(&format!("{} [y/N] ", prompt)).is_err() {
            return false;
        }
        match term.read_line() {
            Ok(answer) => is_yes(&answer),
            Err(_) => false,
        }
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}

/// Prints notices as they arrive.
pub struct TerminalNotifier;

impl Notify for TerminalNotifier {
    fn notice(&self, message: &CmdMessage) {
        print_message(message);
    }

    fn changed(&self, collection: Collection) {
        debug!(%collection, "collection changed");
    }
}
