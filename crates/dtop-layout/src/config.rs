//! Layout direction, edge anchor sides, and tuning knobs.

use std::fmt;
use std::str::FromStr;

/// Flow direction of the layered layout.
///
/// Ranks increase along the chosen direction: `TopToBottom` places rank 0
/// at the top, `LeftToRight` at the left, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Direction {
    #[default]
    TopToBottom,
    BottomToTop,
    LeftToRight,
    RightToLeft,
}

impl Direction {
    /// True for `LeftToRight` and `RightToLeft`.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::LeftToRight | Self::RightToLeft)
    }

    /// The side of a vertex box where incoming edges attach.
    #[must_use]
    pub const fn target_side(self) -> AnchorSide {
        match self {
            Self::TopToBottom => AnchorSide::Top,
            Self::BottomToTop => AnchorSide::Bottom,
            Self::LeftToRight => AnchorSide::Left,
            Self::RightToLeft => AnchorSide::Right,
        }
    }

    /// The side of a vertex box where outgoing edges attach.
    #[must_use]
    pub const fn source_side(self) -> AnchorSide {
        self.target_side().opposite()
    }

    /// Cycle to the next direction (for interactive switching).
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::TopToBottom => Self::BottomToTop,
            Self::BottomToTop => Self::LeftToRight,
            Self::LeftToRight => Self::RightToLeft,
            Self::RightToLeft => Self::TopToBottom,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::TopToBottom => "top-to-bottom",
            Self::BottomToTop => "bottom-to-top",
            Self::LeftToRight => "left-to-right",
            Self::RightToLeft => "right-to-left",
        };
        f.write_str(s)
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tb" | "top-to-bottom" => Ok(Self::TopToBottom),
            "bt" | "bottom-to-top" => Ok(Self::BottomToTop),
            "lr" | "left-to-right" => Ok(Self::LeftToRight),
            "rl" | "right-to-left" => Ok(Self::RightToLeft),
            other => Err(format!("unknown direction: {other}")),
        }
    }
}

/// Which side of a vertex box an edge endpoint attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnchorSide {
    Top,
    Bottom,
    Left,
    Right,
}

impl AnchorSide {
    /// The opposite side.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Top => Self::Bottom,
            Self::Bottom => Self::Top,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Tuning knobs for the layout engine.
///
/// The defaults are the reference configuration (172x36 unit boxes with
/// half-width vertex separation), not law.
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Vertex bounding-box width in world units.
    pub node_width: f64,
    /// Vertex bounding-box height in world units.
    pub node_height: f64,
    /// Gap between vertices within a rank.
    pub node_spacing: f64,
    /// Gap reserved per edge between ranks.
    pub edge_spacing: f64,
    /// Gap between adjacent ranks.
    pub rank_spacing: f64,
    /// Maximum barycenter sweep iterations.
    pub max_crossing_iterations: usize,
    /// Shared iteration budget across all phases.
    pub iteration_budget: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let node_width = 172.0;
        Self {
            node_width,
            node_height: 36.0,
            node_spacing: node_width / 2.0,
            edge_spacing: 25.0,
            rank_spacing: 50.0,
            max_crossing_iterations: 24,
            iteration_budget: 10_000,
        }
    }
}
