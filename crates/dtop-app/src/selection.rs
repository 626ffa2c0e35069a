//! Node selection state machine.
//!
//! Tracks which node is targeted by the action menu. The target index
//! points into the current node list and is only trusted after bounds
//! revalidation; a refetch can shrink the list underneath an open menu.

use dtop_graph::DeploymentNode;

/// Menu target state: closed, or open over one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NodeSelection {
    #[default]
    Closed,
    MenuOpen {
        target_index: usize,
    },
}

impl NodeSelection {
    /// Open the menu for the node at `index`. Reselecting while already
    /// open moves the target directly, with no intermediate close.
    pub fn open(&mut self, index: usize) {
        *self = Self::MenuOpen {
            target_index: index,
        };
    }

    /// Explicit dismissal (click-away, Escape). Suppressed while the
    /// deployment fetch is loading so the target cannot go stale
    /// mid-refetch; returns whether the menu actually closed.
    pub fn dismiss(&mut self, fetch_loading: bool) -> bool {
        if fetch_loading {
            return false;
        }
        *self = Self::Closed;
        true
    }

    /// Unconditional close, used when a command reaches a terminal state.
    pub fn reset(&mut self) {
        *self = Self::Closed;
    }

    /// The target index, if the menu is open.
    #[must_use]
    pub const fn target(&self) -> Option<usize> {
        match self {
            Self::MenuOpen { target_index } => Some(*target_index),
            Self::Closed => None,
        }
    }

    /// True while the menu is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::MenuOpen { .. })
    }

    /// Dereference the target into the current node list, revalidating
    /// bounds. `None` covers both "no selection" and "index out of range
    /// after a refetch".
    #[must_use]
    pub fn resolve<'a>(&self, nodes: &'a [DeploymentNode]) -> Option<&'a DeploymentNode> {
        nodes.get(self.target()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_records_target() {
        let mut s = NodeSelection::default();
        assert!(!s.is_open());
        s.open(3);
        assert_eq!(s.target(), Some(3));
    }

    #[test]
    fn reselect_moves_target_without_closing() {
        let mut s = NodeSelection::default();
        s.open(1);
        s.open(4);
        assert_eq!(s.target(), Some(4));
        assert!(s.is_open());
    }

    #[test]
    fn dismiss_closes_when_not_loading() {
        let mut s = NodeSelection::default();
        s.open(0);
        assert!(s.dismiss(false));
        assert!(!s.is_open());
    }

    #[test]
    fn dismiss_suppressed_while_loading() {
        let mut s = NodeSelection::default();
        s.open(2);
        assert!(!s.dismiss(true));
        assert_eq!(s.target(), Some(2));
        // Loading finished; dismissal works again.
        assert!(s.dismiss(false));
        assert!(!s.is_open());
    }

    #[test]
    fn reset_always_closes() {
        let mut s = NodeSelection::default();
        s.open(1);
        s.reset();
        assert!(!s.is_open());
    }

    #[test]
    fn resolve_revalidates_bounds() {
        let nodes = vec![
            DeploymentNode::new("a", "res-a"),
            DeploymentNode::new("b", "res-b"),
        ];
        let mut s = NodeSelection::default();
        assert!(s.resolve(&nodes).is_none());

        s.open(1);
        assert_eq!(s.resolve(&nodes).map(|n| n.id.as_str()), Some("b"));

        // The list shrank under an open menu; resolution degrades to None
        // instead of panicking.
        s.open(5);
        assert!(s.resolve(&nodes).is_none());
    }
}
