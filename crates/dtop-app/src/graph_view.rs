//! Pannable, zoomable rendering of a laid-out topology graph.
//!
//! World coordinates come from the layout engine; the viewport maps them
//! onto terminal cells (and braille sub-pixels for edges). One cell spans
//! 8x16 world units at zoom 1.0, so a 172x36 vertex box is roughly 21x2
//! cells on screen.

use dtop_graph::Graph;
use dtop_layout::{AnchorSide, LayoutResult, PlacedVertex};
use dtop_tui::buffer::fit_to_width;
use dtop_tui::canvas::{COLS_PER_CELL, Painter, ROWS_PER_CELL};
use dtop_tui::cell::Cell;
use dtop_tui::frame::Frame;
use dtop_tui::geometry::Rect;
use dtop_tui::{Style, Widget};

use crate::theme;

/// World units covered by one cell column at zoom 1.0.
pub const WORLD_PER_CELL_X: f64 = 8.0;
/// World units covered by one cell row at zoom 1.0.
pub const WORLD_PER_CELL_Y: f64 = 16.0;

const ZOOM_MIN: f64 = 0.25;
const ZOOM_MAX: f64 = 4.0;
/// Zoom increment per keypress/scroll step.
pub const ZOOM_STEP: f64 = 0.1;

/// World spacing of the background dot grid.
const DOT_GRID: f64 = 48.0;

/// Pan/zoom transform from world coordinates to screen cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub zoom: f64,
    /// World coordinates of the view's top-left corner.
    pub origin: (f64, f64),
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            origin: (0.0, 0.0),
        }
    }
}

impl Viewport {
    /// World width/height visible in `area` at the current zoom.
    #[must_use]
    pub fn world_extent(&self, area: Rect) -> (f64, f64) {
        (
            f64::from(area.width) * WORLD_PER_CELL_X / self.zoom,
            f64::from(area.height) * WORLD_PER_CELL_Y / self.zoom,
        )
    }

    /// Map a world point to an absolute cell position (may be outside
    /// `area`).
    #[must_use]
    pub fn world_to_cell(&self, area: Rect, wx: f64, wy: f64) -> (i32, i32) {
        let cx = (wx - self.origin.0) * self.zoom / WORLD_PER_CELL_X;
        let cy = (wy - self.origin.1) * self.zoom / WORLD_PER_CELL_Y;
        (
            i32::from(area.x) + cx.floor() as i32,
            i32::from(area.y) + cy.floor() as i32,
        )
    }

    /// Map a world point to sub-pixel coordinates relative to `area`.
    #[must_use]
    pub fn world_to_px(&self, wx: f64, wy: f64) -> (i32, i32) {
        let px = (wx - self.origin.0) * self.zoom / (WORLD_PER_CELL_X / f64::from(COLS_PER_CELL));
        let py = (wy - self.origin.1) * self.zoom / (WORLD_PER_CELL_Y / f64::from(ROWS_PER_CELL));
        (px.round() as i32, py.round() as i32)
    }

    /// Map a cell position back to the world point at its top-left.
    #[must_use]
    pub fn cell_to_world(&self, area: Rect, x: u16, y: u16) -> (f64, f64) {
        (
            self.origin.0 + f64::from(x.saturating_sub(area.x)) * WORLD_PER_CELL_X / self.zoom,
            self.origin.1 + f64::from(y.saturating_sub(area.y)) * WORLD_PER_CELL_Y / self.zoom,
        )
    }

    /// Pan by a cell delta (positive moves the view right/down).
    pub fn pan_cells(&mut self, dx: i32, dy: i32) {
        self.origin.0 += f64::from(dx) * WORLD_PER_CELL_X / self.zoom;
        self.origin.1 += f64::from(dy) * WORLD_PER_CELL_Y / self.zoom;
    }

    /// Zoom by `delta`, keeping the center of `area` fixed.
    pub fn zoom_by(&mut self, delta: f64, area: Rect) {
        let (w, h) = self.world_extent(area);
        let center = (self.origin.0 + w / 2.0, self.origin.1 + h / 2.0);
        self.zoom = (self.zoom + delta).clamp(ZOOM_MIN, ZOOM_MAX);
        let (nw, nh) = self.world_extent(area);
        self.origin = (center.0 - nw / 2.0, center.1 - nh / 2.0);
    }

    /// Frame the given world bounds inside `area`, centered, with the
    /// zoom clamped to the interactive range.
    pub fn fit(&mut self, bounds: (f64, f64, f64, f64), area: Rect) {
        if area.is_empty() {
            return;
        }
        let (x0, y0, x1, y1) = bounds;
        let world_w = (x1 - x0).max(1.0);
        let world_h = (y1 - y0).max(1.0);
        let avail_w = f64::from(area.width.saturating_sub(2)) * WORLD_PER_CELL_X;
        let avail_h = f64::from(area.height.saturating_sub(2)) * WORLD_PER_CELL_Y;
        self.zoom = (avail_w / world_w).min(avail_h / world_h).clamp(ZOOM_MIN, ZOOM_MAX);
        let (vw, vh) = self.world_extent(area);
        self.origin = (
            x0 + world_w / 2.0 - vw / 2.0,
            y0 + world_h / 2.0 - vh / 2.0,
        );
    }
}

/// Orthogonal "smooth step" route between two anchor points.
///
/// Vertical flows bend at the midpoint between the anchors' y
/// coordinates, horizontal flows at the midpoint x.
#[must_use]
pub fn smooth_step(
    from: (f64, f64),
    to: (f64, f64),
    source_side: AnchorSide,
) -> Vec<(f64, f64)> {
    match source_side {
        AnchorSide::Top | AnchorSide::Bottom => {
            let mid_y = (from.1 + to.1) / 2.0;
            vec![from, (from.0, mid_y), (to.0, mid_y), to]
        }
        AnchorSide::Left | AnchorSide::Right => {
            let mid_x = (from.0 + to.0) / 2.0;
            vec![from, (mid_x, from.1), (mid_x, to.1), to]
        }
    }
}

/// The vertex under a screen cell, if any.
#[must_use]
pub fn hit_test(
    layout: &LayoutResult,
    viewport: &Viewport,
    area: Rect,
    x: u16,
    y: u16,
) -> Option<usize> {
    if !area.contains(x, y) {
        return None;
    }
    for v in &layout.vertices {
        let (x0, y0) = viewport.world_to_cell(area, v.x, v.y);
        let (x1, y1) = viewport.world_to_cell(area, v.x + v.width, v.y + v.height);
        let (x1, y1) = (x1.max(x0 + 1), y1.max(y0 + 1));
        let (cx, cy) = (i32::from(x), i32::from(y));
        if cx >= x0 && cx < x1 && cy >= y0 && cy < y1 {
            return Some(v.index);
        }
    }
    None
}

/// Widget drawing the dot background, edges, and vertex boxes.
pub struct GraphView<'a> {
    graph: &'a Graph,
    layout: &'a LayoutResult,
    viewport: &'a Viewport,
    selected: Option<usize>,
}

impl<'a> GraphView<'a> {
    /// Create a view over a graph and its layout.
    #[must_use]
    pub fn new(graph: &'a Graph, layout: &'a LayoutResult, viewport: &'a Viewport) -> Self {
        Self {
            graph,
            layout,
            viewport,
            selected: None,
        }
    }

    /// Highlight one vertex.
    #[must_use]
    pub fn selected(mut self, index: Option<usize>) -> Self {
        self.selected = index;
        self
    }

    fn draw_dots(&self, area: Rect, frame: &mut Frame) {
        let (vw, vh) = self.viewport.world_extent(area);
        let (ox, oy) = self.viewport.origin;
        let style = theme::muted();

        let mut gy = (oy / DOT_GRID).ceil() * DOT_GRID;
        while gy <= oy + vh {
            let mut gx = (ox / DOT_GRID).ceil() * DOT_GRID;
            while gx <= ox + vw {
                let (cx, cy) = self.viewport.world_to_cell(area, gx, gy);
                if cx >= 0 && cy >= 0 {
                    let (cx, cy) = (cx as u16, cy as u16);
                    if area.contains(cx, cy) {
                        frame.buffer.set(cx, cy, Cell::styled('·', style));
                    }
                }
                gx += DOT_GRID;
            }
            gy += DOT_GRID;
        }
    }

    fn draw_edges(&self, area: Rect, frame: &mut Frame) {
        let mut painter = Painter::for_area(area);
        for edge in &self.layout.edges {
            if edge.self_loop {
                continue;
            }
            let src = &self.layout.vertices[edge.source];
            let tgt = &self.layout.vertices[edge.target];
            let from = src.anchor(src.source_side);
            let to = tgt.anchor(tgt.target_side);
            let route = smooth_step(from, to, src.source_side);
            let px: Vec<(i32, i32)> = route
                .iter()
                .map(|&(wx, wy)| self.viewport.world_to_px(wx, wy))
                .collect();
            painter.polyline(&px, None);
        }
        painter.render_to(area, &mut frame.buffer, theme::edge());
    }

    fn draw_vertex(&self, v: &PlacedVertex, area: Rect, frame: &mut Frame) {
        let (x0, y0) = self.viewport.world_to_cell(area, v.x, v.y);
        let (x1, y1) = self.viewport.world_to_cell(area, v.x + v.width, v.y + v.height);
        let w = (x1 - x0).max(1);
        let h = (y1 - y0).max(1);

        // Fully outside the viewport.
        if x0 + w <= i32::from(area.x)
            || y0 + h <= i32::from(area.y)
            || x0 >= i32::from(area.right())
            || y0 >= i32::from(area.bottom())
        {
            return;
        }

        let is_selected = self.selected == Some(v.index);
        let style = if is_selected {
            theme::selected()
        } else {
            theme::text()
        };

        let node = &self.graph.vertices[v.index].node;
        let mut label = String::from(" ");
        label.push_str(&node.resource_key);
        if node.features.has_power() {
            label.push_str(" ⏻");
        }
        if node.features.has_console() {
            label.push_str(" ⌗");
        }
        label.push(' ');

        let clamp_x = |x: i32| x.clamp(i32::from(area.x), i32::from(area.right()) - 1) as u16;
        let clamp_y = |y: i32| y.clamp(i32::from(area.y), i32::from(area.bottom()) - 1) as u16;

        if h >= 3 && w >= 4 {
            let rect = Rect::new(
                clamp_x(x0),
                clamp_y(y0),
                (clamp_x(x0 + w - 1) - clamp_x(x0) + 1).max(2),
                (clamp_y(y0 + h - 1) - clamp_y(y0) + 1).max(2),
            );
            draw_box(rect, style, frame);
            let inner = rect.inset(1);
            if !inner.is_empty() {
                let text = fit_to_width(label.trim(), inner.width);
                let ty = inner.y + inner.height / 2;
                frame.buffer.draw_str(inner.x, ty, text, style, inner.width);
            }
        } else {
            // Too small for a box; render as a single tagged row.
            let y = clamp_y(y0);
            let x = clamp_x(x0);
            let max = (i32::from(area.right()) - i32::from(x)).max(0) as u16;
            let max = max.min(w.max(2) as u16);
            let text = fit_to_width(&label, max);
            let row_style = if is_selected { style.reversed() } else { style };
            frame.buffer.draw_str(x, y, text, row_style, max);
        }
    }
}

fn draw_box(rect: Rect, style: Style, frame: &mut Frame) {
    if rect.width < 2 || rect.height < 2 {
        return;
    }
    let buf = &mut frame.buffer;
    let right = rect.right() - 1;
    let bottom = rect.bottom() - 1;
    for x in (rect.x + 1)..right {
        buf.set(x, rect.y, Cell::styled('─', style));
        buf.set(x, bottom, Cell::styled('─', style));
    }
    for y in (rect.y + 1)..bottom {
        buf.set(rect.x, y, Cell::styled('│', style));
        buf.set(right, y, Cell::styled('│', style));
    }
    buf.set(rect.x, rect.y, Cell::styled('┌', style));
    buf.set(right, rect.y, Cell::styled('┐', style));
    buf.set(rect.x, bottom, Cell::styled('└', style));
    buf.set(right, bottom, Cell::styled('┘', style));
}

impl Widget for GraphView<'_> {
    fn render(&self, area: Rect, frame: &mut Frame) {
        if area.is_empty() {
            return;
        }
        self.draw_dots(area, frame);
        self.draw_edges(area, frame);
        for v in &self.layout.vertices {
            self.draw_vertex(v, area, frame);
        }
    }
}
