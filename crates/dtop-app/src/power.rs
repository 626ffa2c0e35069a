//! Power command lifecycle and single-flight dispatch.
//!
//! One dispatcher instance exists for the whole application. A command
//! moves `Idle -> Pending -> Succeeded/Failed -> Idle`; a new command may
//! not begin while one is pending. Every issued command carries an epoch,
//! and completions with a stale epoch are dropped so an in-flight command
//! can never mutate UI state that has since been replaced.

use std::fmt;

/// The power state requested from the remote system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PowerState {
    On,
    Off,
    Reset,
}

impl PowerState {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
            Self::Reset => "RESET",
        }
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An entry in the node action menu.
///
/// A tagged variant rather than a positional slot index: the pending state
/// carries the action itself, so menu layout and spinner placement cannot
/// drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    PowerOn,
    PowerOff,
    Reset,
}

impl MenuAction {
    /// Menu order.
    pub const ALL: [MenuAction; 3] = [Self::PowerOn, Self::PowerOff, Self::Reset];

    /// The power state this action requests.
    #[must_use]
    pub const fn power_state(self) -> PowerState {
        match self {
            Self::PowerOn => PowerState::On,
            Self::PowerOff => PowerState::Off,
            Self::Reset => PowerState::Reset,
        }
    }

    /// Menu label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PowerOn => "Power On",
            Self::PowerOff => "Power Off",
            Self::Reset => "Reset",
        }
    }

    /// Menu icon.
    #[must_use]
    pub const fn icon(self) -> char {
        match self {
            Self::PowerOn => '\u{23FB}',  // ⏻
            Self::PowerOff => '\u{23FC}', // ⏼
            Self::Reset => '\u{21BB}',    // ↻
        }
    }
}

/// Observable state of the single power command slot.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CommandLifecycle {
    #[default]
    Idle,
    Pending {
        action: MenuAction,
        node_id: String,
        epoch: u64,
    },
    /// Command completed; the flag is the remote "applied" result.
    /// `Succeeded(false)` is a soft failure.
    Succeeded(bool),
    Failed(String),
}

impl CommandLifecycle {
    /// True while a command is in flight.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }

    /// True in `Succeeded` or `Failed`.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded(_) | Self::Failed(_))
    }
}

/// Rejection reasons for a dispatch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// A command is already pending.
    Busy,
    /// The selection did not resolve to a concrete node.
    SelectionInvalid,
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy => f.write_str("a power command is already in flight"),
            Self::SelectionInvalid => f.write_str("selection does not resolve to a node"),
        }
    }
}

impl std::error::Error for DispatchError {}

/// Single-flight power command dispatcher.
#[derive(Debug, Default)]
pub struct PowerDispatcher {
    lifecycle: CommandLifecycle,
    next_epoch: u64,
}

impl PowerDispatcher {
    /// Create an idle dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn lifecycle(&self) -> &CommandLifecycle {
        &self.lifecycle
    }

    /// True while a command is in flight.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.lifecycle.is_pending()
    }

    /// The action whose menu entry should show a spinner, if any.
    #[must_use]
    pub fn pending_action(&self) -> Option<MenuAction> {
        match &self.lifecycle {
            CommandLifecycle::Pending { action, .. } => Some(*action),
            _ => None,
        }
    }

    /// Claim the command slot. Returns the epoch to attach to the
    /// asynchronous completion.
    pub fn begin(&mut self, node_id: &str, action: MenuAction) -> Result<u64, DispatchError> {
        if self.lifecycle.is_pending() {
            return Err(DispatchError::Busy);
        }
        self.next_epoch += 1;
        let epoch = self.next_epoch;
        self.lifecycle = CommandLifecycle::Pending {
            action,
            node_id: node_id.to_string(),
            epoch,
        };
        Ok(epoch)
    }

    /// Record a completion. Returns false (and changes nothing) when the
    /// epoch does not match the in-flight command; such completions belong
    /// to a slot that has since been invalidated.
    pub fn settle(&mut self, epoch: u64, result: Result<bool, String>) -> bool {
        match &self.lifecycle {
            CommandLifecycle::Pending { epoch: e, .. } if *e == epoch => {
                self.lifecycle = match result {
                    Ok(applied) => CommandLifecycle::Succeeded(applied),
                    Err(message) => CommandLifecycle::Failed(message),
                };
                true
            }
            _ => false,
        }
    }

    /// Return to `Idle` after observing a terminal state. Idempotent and
    /// side-effect free beyond the state clear.
    pub fn acknowledge(&mut self) {
        if self.lifecycle.is_terminal() {
            self.lifecycle = CommandLifecycle::Idle;
        }
    }

    /// Drop any in-flight command without waiting for its completion.
    /// The orphaned completion will fail the epoch check in [`settle`].
    ///
    /// [`settle`]: Self::settle
    pub fn invalidate(&mut self) {
        self.lifecycle = CommandLifecycle::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_actions_map_to_power_states() {
        assert_eq!(MenuAction::PowerOn.power_state(), PowerState::On);
        assert_eq!(MenuAction::PowerOff.power_state(), PowerState::Off);
        assert_eq!(MenuAction::Reset.power_state(), PowerState::Reset);
        assert_eq!(PowerState::Reset.as_str(), "RESET");
    }

    #[test]
    fn begin_claims_slot() {
        let mut d = PowerDispatcher::new();
        let epoch = d.begin("n1", MenuAction::PowerOn).unwrap();
        assert!(d.is_pending());
        assert_eq!(d.pending_action(), Some(MenuAction::PowerOn));
        assert_eq!(epoch, 1);
    }

    #[test]
    fn second_begin_rejected_while_pending() {
        let mut d = PowerDispatcher::new();
        d.begin("n1", MenuAction::PowerOn).unwrap();
        assert_eq!(
            d.begin("n2", MenuAction::Reset),
            Err(DispatchError::Busy)
        );
        // Still the first command.
        assert_eq!(d.pending_action(), Some(MenuAction::PowerOn));
    }

    #[test]
    fn settle_then_acknowledge_returns_to_idle() {
        let mut d = PowerDispatcher::new();
        let epoch = d.begin("n1", MenuAction::Reset).unwrap();
        assert!(d.settle(epoch, Ok(true)));
        assert_eq!(d.lifecycle(), &CommandLifecycle::Succeeded(true));
        d.acknowledge();
        assert_eq!(d.lifecycle(), &CommandLifecycle::Idle);
        // Idempotent.
        d.acknowledge();
        assert_eq!(d.lifecycle(), &CommandLifecycle::Idle);
    }

    #[test]
    fn settle_failure_records_message() {
        let mut d = PowerDispatcher::new();
        let epoch = d.begin("n1", MenuAction::PowerOff).unwrap();
        assert!(d.settle(epoch, Err("bmc timeout".into())));
        assert_eq!(
            d.lifecycle(),
            &CommandLifecycle::Failed("bmc timeout".into())
        );
    }

    #[test]
    fn stale_epoch_dropped() {
        let mut d = PowerDispatcher::new();
        let first = d.begin("n1", MenuAction::PowerOn).unwrap();
        d.invalidate();
        assert!(!d.settle(first, Ok(true)));
        assert_eq!(d.lifecycle(), &CommandLifecycle::Idle);

        // A fresh command gets a fresh epoch; the old completion still
        // cannot land.
        let second = d.begin("n1", MenuAction::Reset).unwrap();
        assert_ne!(first, second);
        assert!(!d.settle(first, Ok(false)));
        assert!(d.is_pending());
    }

    #[test]
    fn acknowledge_does_not_clear_pending() {
        let mut d = PowerDispatcher::new();
        d.begin("n1", MenuAction::PowerOn).unwrap();
        d.acknowledge();
        assert!(d.is_pending());
    }
}
