//! Focus coordination for the combobox.
//!
//! Focus leaving the search input or the trigger does not close the panel
//! right away. The coordinator hands out a [`Ticket`] on blur; the combobox
//! yields once to the runtime and then asks the coordinator to
//! [`settle`](FocusCoordinator::settle) that ticket. Some hosts move focus
//! in two steps (out of the control, then into a row), and only the
//! settled location counts.

/// Where keyboard focus currently is, as far as the combobox knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusTarget {
    /// The closed-state trigger button.
    Trigger,
    /// The search input inside the open panel.
    Input,
    /// The in-panel title / close button.
    Toggle,
    /// A row of the flattened list.
    Row(usize),
    /// The panel footer.
    Footer,
    /// Anything outside the control.
    #[default]
    Outside,
}

impl FocusTarget {
    /// Whether this target is part of the control.
    pub fn is_inside(self) -> bool {
        !matches!(self, FocusTarget::Outside)
    }
}

/// Identifies one deferred blur check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// What a settled blur check decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// Focus left the control: dismiss the panel.
    Dismiss,
    /// Focus stayed inside the control.
    Stay,
    /// The ticket was superseded, or the control is closed or unmounted.
    Stale,
}

#[derive(Debug, Clone)]
pub struct FocusCoordinator {
    current: FocusTarget,
    epoch: u64,
    pending: Option<u64>,
    mounted: bool,
}

impl FocusCoordinator {
    pub fn new() -> Self {
        Self {
            current: FocusTarget::Outside,
            epoch: 0,
            pending: None,
            mounted: true,
        }
    }

    pub fn current(&self) -> FocusTarget {
        self.current
    }

    /// Record that focus moved to `target`.
    pub fn focus(&mut self, target: FocusTarget) {
        self.current = target;
    }

    /// Record a blur and return the ticket for the deferred check.
    pub fn blur(&mut self) -> Ticket {
        self.epoch += 1;
        self.pending = Some(self.epoch);
        Ticket(self.epoch)
    }

    /// Invalidate any outstanding ticket. Called on every open and close so
    /// a check scheduled in an earlier open phase cannot act on a later one.
    pub fn invalidate(&mut self) {
        self.epoch += 1;
        self.pending = None;
    }

    /// Resolve a deferred check against the state at resume time.
    pub fn settle(&mut self, ticket: Ticket, is_open: bool) -> Settled {
        if !self.mounted || self.pending != Some(ticket.0) {
            return Settled::Stale;
        }
        self.pending = None;
        if !is_open {
            return Settled::Stale;
        }
        if self.current.is_inside() {
            Settled::Stay
        } else {
            Settled::Dismiss
        }
    }

    /// Return focus to the trigger after the panel closes, unless the user
    /// already moved it somewhere outside the control. Returns whether focus
    /// moved.
    pub fn restore_to_trigger(&mut self) -> bool {
        if self.current == FocusTarget::Outside || self.current == FocusTarget::Trigger {
            return false;
        }
        self.current = FocusTarget::Trigger;
        true
    }

    /// Detach from the host. Pending checks resolve as stale from now on.
    pub fn unmount(&mut self) {
        self.mounted = false;
        self.pending = None;
    }
}

impl Default for FocusCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_outside() {
        let fc = FocusCoordinator::new();
        assert_eq!(fc.current(), FocusTarget::Outside);
    }

    #[test]
    fn settle_outside_dismisses() {
        let mut fc = FocusCoordinator::new();
        fc.focus(FocusTarget::Input);
        let ticket = fc.blur();
        fc.focus(FocusTarget::Outside);
        assert_eq!(fc.settle(ticket, true), Settled::Dismiss);
    }

    #[test]
    fn settle_inside_stays() {
        let mut fc = FocusCoordinator::new();
        fc.focus(FocusTarget::Input);
        let ticket = fc.blur();
        // Two-step move: out, then onto a row before the check runs.
        fc.focus(FocusTarget::Outside);
        fc.focus(FocusTarget::Row(2));
        assert_eq!(fc.settle(ticket, true), Settled::Stay);
    }

    #[test]
    fn superseded_ticket_is_stale() {
        let mut fc = FocusCoordinator::new();
        let old = fc.blur();
        let new = fc.blur();
        assert_eq!(fc.settle(old, true), Settled::Stale);
        assert_eq!(fc.settle(new, true), Settled::Dismiss);
    }

    #[test]
    fn ticket_settles_once() {
        let mut fc = FocusCoordinator::new();
        let ticket = fc.blur();
        assert_eq!(fc.settle(ticket, true), Settled::Dismiss);
        assert_eq!(fc.settle(ticket, true), Settled::Stale);
    }

    #[test]
    fn invalidate_discards_pending() {
        let mut fc = FocusCoordinator::new();
        let ticket = fc.blur();
        fc.invalidate();
        assert_eq!(fc.settle(ticket, true), Settled::Stale);
    }

    #[test]
    fn closed_panel_is_stale() {
        let mut fc = FocusCoordinator::new();
        let ticket = fc.blur();
        assert_eq!(fc.settle(ticket, false), Settled::Stale);
    }

    #[test]
    fn unmount_discards_pending() {
        let mut fc = FocusCoordinator::new();
        let ticket = fc.blur();
        fc.unmount();
        assert_eq!(fc.settle(ticket, true), Settled::Stale);
    }

    #[test]
    fn restore_skips_outside() {
        let mut fc = FocusCoordinator::new();
        fc.focus(FocusTarget::Row(0));
        assert!(fc.restore_to_trigger());
        assert_eq!(fc.current(), FocusTarget::Trigger);

        fc.focus(FocusTarget::Outside);
        assert!(!fc.restore_to_trigger());
        assert_eq!(fc.current(), FocusTarget::Outside);
    }
}
