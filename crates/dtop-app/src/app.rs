//! Application model: fetch lifecycle, selection, dispatch, and view.
//!
//! One deployment is fetched per start/reload. The node list is derived
//! into a graph and laid out wholesale on every arrival; the viewport is
//! fitted one deferred frame later, once a render pass has measured the
//! graph area. Power commands run as background tasks whose completions
//! come back as messages; the dispatcher's single pending slot plus the
//! disable-while-pending rule is the only concurrency control needed.

use std::cell::Cell;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use dtop_graph::{Deployment, DeploymentNode, Graph, build_graph};
use dtop_layout::{Direction, LayoutConfig, LayoutResult, layout_with_config};
use dtop_tui::event::{Event, KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use dtop_tui::frame::Frame;
use dtop_tui::geometry::Rect;
use dtop_tui::list::{List, ListState};
use dtop_tui::panel::Panel;
use dtop_tui::runtime::{Cmd, Model};
use dtop_tui::spinner::Spinner;
use dtop_tui::toast::{Severity, ToastManager};
use dtop_tui::Widget;

use crate::client::{ClientError, DeploymentClient};
use crate::graph_view::{GraphView, Viewport, ZOOM_STEP, hit_test};
use crate::power::{CommandLifecycle, DispatchError, MenuAction, PowerDispatcher};
use crate::selection::NodeSelection;
use crate::theme;

/// Periodic housekeeping cadence (toast expiry, spinner frames).
const TICK_INTERVAL: Duration = Duration::from_millis(250);
/// Node list panel width in cells.
const LIST_PANEL_WIDTH: u16 = 26;
/// Cells panned per arrow keypress.
const PAN_STEP: i32 = 2;

/// Which pane receives directional keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    List,
    Graph,
}

/// Outbound navigation requested by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavRequest {
    DestroyDeployment(String),
}

/// Application messages.
pub enum Msg {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resized,
    Tick,
    FetchCompleted(Result<Deployment, ClientError>),
    PowerCompleted {
        epoch: u64,
        result: Result<bool, ClientError>,
    },
}

impl From<Event> for Msg {
    fn from(event: Event) -> Self {
        match event {
            Event::Key(key) => Msg::Key(key),
            Event::Mouse(mouse) => Msg::Mouse(mouse),
            Event::Resize { .. } => Msg::Resized,
            Event::Tick => Msg::Tick,
        }
    }
}

struct MenuRow {
    text: String,
    disabled: bool,
}

/// Top-level application state.
pub struct AppModel {
    client: Arc<dyn DeploymentClient + Send + Sync>,
    deployment_id: String,
    direction: Direction,
    layout_config: LayoutConfig,

    loading: bool,
    deployment: Option<Deployment>,
    graph: Option<Graph>,
    placed: Option<LayoutResult>,

    viewport: Viewport,
    fit_pending: bool,

    focus: Focus,
    list_state: ListState,
    selection: NodeSelection,
    menu_cursor: usize,
    dispatcher: PowerDispatcher,
    toasts: ToastManager,
    actions_open: bool,
    navigation: Option<NavRequest>,

    spinner_tick: u64,
    next_periodic: Instant,
    exit_deadline: Option<Instant>,
    drag_anchor: Option<(u16, u16)>,

    // Pane geometry is only known during rendering; `view` takes `&self`,
    // so the measured areas live behind interior mutability.
    graph_area: Cell<Rect>,
    list_area: Cell<Rect>,
}

impl AppModel {
    /// Create the model. The first fetch is issued from `init`.
    #[must_use]
    pub fn new(
        client: Arc<dyn DeploymentClient + Send + Sync>,
        deployment_id: impl Into<String>,
        direction: Direction,
        exit_after: Option<Duration>,
    ) -> Self {
        let now = Instant::now();
        Self {
            client,
            deployment_id: deployment_id.into(),
            direction,
            layout_config: LayoutConfig::default(),
            loading: false,
            deployment: None,
            graph: None,
            placed: None,
            viewport: Viewport::default(),
            fit_pending: false,
            focus: Focus::List,
            list_state: ListState::default(),
            selection: NodeSelection::default(),
            menu_cursor: 0,
            dispatcher: PowerDispatcher::new(),
            toasts: ToastManager::default(),
            actions_open: false,
            navigation: None,
            spinner_tick: 0,
            next_periodic: now,
            exit_deadline: exit_after.map(|d| now + d),
            drag_anchor: None,
            graph_area: Cell::new(Rect::default()),
            list_area: Cell::new(Rect::default()),
        }
    }

    /// The navigation request recorded before quitting, if any.
    #[must_use]
    pub fn navigation(&self) -> Option<&NavRequest> {
        self.navigation.as_ref()
    }

    fn nodes(&self) -> &[DeploymentNode] {
        self.deployment
            .as_ref()
            .map(|d| d.deployment_nodes.as_slice())
            .unwrap_or(&[])
    }

    fn start_fetch(&mut self) -> Cmd<Msg> {
        self.loading = true;
        // A refetch replaces the node list wholesale; any in-flight
        // command completion would land on stale state, so orphan it.
        self.dispatcher.invalidate();
        let client = Arc::clone(&self.client);
        let id = self.deployment_id.clone();
        info!(deployment = %id, "fetching deployment");
        Cmd::task(move || Msg::FetchCompleted(client.fetch_deployment(&id)))
    }

    // -----------------------------------------------------------------
    // Update handlers
    // -----------------------------------------------------------------

    fn on_tick(&mut self) -> Cmd<Msg> {
        self.spinner_tick += 1;

        if self.fit_pending
            && let Some(placed) = &self.placed
        {
            let area = self.graph_area.get();
            if !area.is_empty() {
                self.viewport.fit(placed.bounds, area);
                self.fit_pending = false;
            }
        }

        let now = Instant::now();
        if let Some(deadline) = self.exit_deadline
            && now >= deadline
        {
            return Cmd::quit();
        }
        if now >= self.next_periodic {
            self.toasts.tick();
            self.next_periodic = now + TICK_INTERVAL;
            return Cmd::tick(TICK_INTERVAL);
        }
        Cmd::none()
    }

    fn on_fetch(&mut self, result: Result<Deployment, ClientError>) -> Cmd<Msg> {
        self.loading = false;
        match result {
            Ok(deployment) => match build_graph(&deployment.deployment_nodes) {
                Ok(graph) => {
                    let placed = layout_with_config(&graph, self.direction, &self.layout_config);
                    info!(
                        deployment = %deployment.name,
                        nodes = graph.vertex_count(),
                        edges = graph.edge_count(),
                        "deployment loaded"
                    );
                    self.list_state.clamp(deployment.deployment_nodes.len());
                    self.deployment = Some(deployment);
                    self.graph = Some(graph);
                    self.placed = Some(placed);
                    self.fit_pending = true;
                    // Fit on the next frame, after a render pass has
                    // measured the graph area.
                    Cmd::tick(Duration::ZERO)
                }
                Err(err) => {
                    error!(%err, "deployment topology is corrupt");
                    self.toasts.push(
                        format!("Deployment topology corrupt: {err}"),
                        Severity::Error,
                    );
                    Cmd::none()
                }
            },
            Err(err) => {
                warn!(error = %err, "deployment fetch failed");
                self.toasts.push(
                    format!("Failed to get deployment: {}", err.message),
                    Severity::Error,
                );
                Cmd::none()
            }
        }
    }

    fn on_power(&mut self, epoch: u64, result: Result<bool, ClientError>) -> Cmd<Msg> {
        if !self.dispatcher.settle(epoch, result.map_err(|e| e.message)) {
            debug!(epoch, "dropping stale power completion");
            return Cmd::none();
        }
        match self.dispatcher.lifecycle() {
            CommandLifecycle::Succeeded(true) => {
                self.toasts
                    .push("Resource power state updated", Severity::Success);
            }
            CommandLifecycle::Succeeded(false) => {
                self.toasts
                    .push("Failed to update resource power state", Severity::Error);
            }
            CommandLifecycle::Failed(message) => {
                error!(%message, "power command failed");
                self.toasts
                    .push("Error occurred: see log for details", Severity::Error);
            }
            _ => {}
        }
        self.selection.reset();
        self.menu_cursor = 0;
        self.dispatcher.acknowledge();
        Cmd::none()
    }

    fn on_key(&mut self, key: KeyEvent) -> Cmd<Msg> {
        if self.actions_open {
            return self.on_key_actions(key);
        }
        if self.selection.is_open() {
            return self.on_key_menu(key);
        }
        self.on_key_global(key)
    }

    fn on_key_global(&mut self, key: KeyEvent) -> Cmd<Msg> {
        match key.code {
            KeyCode::Char('q') => Cmd::quit(),
            KeyCode::Char('c') if key.ctrl() => Cmd::quit(),
            KeyCode::Tab => {
                self.focus = match self.focus {
                    Focus::List => Focus::Graph,
                    Focus::Graph => Focus::List,
                };
                Cmd::none()
            }
            KeyCode::Char('a') => {
                self.actions_open = true;
                Cmd::none()
            }
            KeyCode::Char('r') => {
                if self.loading {
                    Cmd::none()
                } else {
                    self.start_fetch()
                }
            }
            KeyCode::Char('d') => self.cycle_direction(),
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.viewport.zoom_by(ZOOM_STEP, self.graph_area.get());
                Cmd::none()
            }
            KeyCode::Char('-') => {
                self.viewport.zoom_by(-ZOOM_STEP, self.graph_area.get());
                Cmd::none()
            }
            KeyCode::Char('0') => {
                if let Some(placed) = &self.placed {
                    self.viewport.fit(placed.bounds, self.graph_area.get());
                }
                Cmd::none()
            }
            KeyCode::Enter | KeyCode::Char('m') => self.open_menu_for_selected(),
            KeyCode::Char('j') => {
                self.move_selection(1);
                Cmd::none()
            }
            KeyCode::Char('k') => {
                self.move_selection(-1);
                Cmd::none()
            }
            KeyCode::Up => {
                match self.focus {
                    Focus::List => self.move_selection(-1),
                    Focus::Graph => self.viewport.pan_cells(0, -PAN_STEP),
                }
                Cmd::none()
            }
            KeyCode::Down => {
                match self.focus {
                    Focus::List => self.move_selection(1),
                    Focus::Graph => self.viewport.pan_cells(0, PAN_STEP),
                }
                Cmd::none()
            }
            KeyCode::Left => {
                if self.focus == Focus::Graph {
                    self.viewport.pan_cells(-PAN_STEP, 0);
                }
                Cmd::none()
            }
            KeyCode::Right => {
                if self.focus == Focus::Graph {
                    self.viewport.pan_cells(PAN_STEP, 0);
                }
                Cmd::none()
            }
            _ => Cmd::none(),
        }
    }

    fn on_key_menu(&mut self, key: KeyEvent) -> Cmd<Msg> {
        let rows = self.menu_rows();
        match key.code {
            KeyCode::Escape => {
                // Suppressed while the fetch is loading so the target
                // index cannot go stale mid-refetch.
                self.selection.dismiss(self.loading);
                Cmd::none()
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.menu_cursor = self.menu_cursor.saturating_sub(1);
                Cmd::none()
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.menu_cursor = (self.menu_cursor + 1).min(rows.len().saturating_sub(1));
                Cmd::none()
            }
            KeyCode::Enter => self.activate_menu_entry(),
            // Anything else behaves as if the menu were not open; the
            // menu only captures its own navigation keys.
            _ => self.on_key_global(key),
        }
    }

    fn on_key_actions(&mut self, key: KeyEvent) -> Cmd<Msg> {
        match key.code {
            KeyCode::Escape | KeyCode::Char('q') | KeyCode::Char('a') => {
                self.actions_open = false;
                Cmd::none()
            }
            KeyCode::Enter => {
                let id = self
                    .deployment
                    .as_ref()
                    .map(|d| d.id.clone())
                    .unwrap_or_else(|| self.deployment_id.clone());
                info!(deployment = %id, "destroy requested");
                self.navigation = Some(NavRequest::DestroyDeployment(id));
                Cmd::quit()
            }
            _ => Cmd::none(),
        }
    }

    fn on_mouse(&mut self, mouse: MouseEvent) -> Cmd<Msg> {
        let list_area = self.list_area.get();
        let graph_area = self.graph_area.get();
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if list_area.contains(mouse.x, mouse.y) {
                    let row = self.list_state.offset + usize::from(mouse.y - list_area.y);
                    if row < self.nodes().len() {
                        self.list_state.selected = Some(row);
                        // Row trigger: opening over an open menu reselects
                        // directly.
                        self.selection.open(row);
                        self.menu_cursor = 0;
                    }
                } else if graph_area.contains(mouse.x, mouse.y) {
                    if self.selection.is_open() {
                        self.selection.dismiss(self.loading);
                    }
                    if let Some(placed) = &self.placed
                        && let Some(index) =
                            hit_test(placed, &self.viewport, graph_area, mouse.x, mouse.y)
                    {
                        self.list_state.selected = Some(index);
                        self.list_state
                            .scroll_into_view(list_area.height as usize);
                    }
                    self.drag_anchor = Some((mouse.x, mouse.y));
                } else if self.selection.is_open() {
                    // Click-away.
                    self.selection.dismiss(self.loading);
                }
                Cmd::none()
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some((ax, ay)) = self.drag_anchor
                    && graph_area.contains(mouse.x, mouse.y)
                {
                    let dx = i32::from(ax) - i32::from(mouse.x);
                    let dy = i32::from(ay) - i32::from(mouse.y);
                    self.viewport.pan_cells(dx, dy);
                    self.drag_anchor = Some((mouse.x, mouse.y));
                }
                Cmd::none()
            }
            MouseEventKind::Up(MouseButton::Left) => {
                self.drag_anchor = None;
                Cmd::none()
            }
            MouseEventKind::ScrollUp => {
                if graph_area.contains(mouse.x, mouse.y) {
                    self.viewport.zoom_by(ZOOM_STEP, graph_area);
                }
                Cmd::none()
            }
            MouseEventKind::ScrollDown => {
                if graph_area.contains(mouse.x, mouse.y) {
                    self.viewport.zoom_by(-ZOOM_STEP, graph_area);
                }
                Cmd::none()
            }
            _ => Cmd::none(),
        }
    }

    // -----------------------------------------------------------------
    // Selection and dispatch
    // -----------------------------------------------------------------

    fn move_selection(&mut self, delta: i32) {
        let len = self.nodes().len();
        if delta > 0 {
            self.list_state.select_next(len);
        } else {
            self.list_state.select_prev(len);
        }
        self.list_state
            .scroll_into_view(self.list_area.get().height as usize);
    }

    fn open_menu_for_selected(&mut self) -> Cmd<Msg> {
        if let Some(index) = self.list_state.selected
            && index < self.nodes().len()
        {
            self.selection.open(index);
            self.menu_cursor = 0;
        }
        Cmd::none()
    }

    fn cycle_direction(&mut self) -> Cmd<Msg> {
        self.direction = self.direction.next();
        if let Some(graph) = &self.graph {
            self.placed = Some(layout_with_config(graph, self.direction, &self.layout_config));
            self.fit_pending = true;
            return Cmd::tick(Duration::ZERO);
        }
        Cmd::none()
    }

    fn activate_menu_entry(&mut self) -> Cmd<Msg> {
        let (node_id, powered) = match self.selection.resolve(self.nodes()) {
            Some(node) => (node.id.clone(), node.features.has_power()),
            None => return self.selection_invalid(),
        };
        if !powered {
            // The only row is the disabled "not available" entry.
            return Cmd::none();
        }
        if self.dispatcher.is_pending() {
            // Menu entries are disabled while a command is in flight; a
            // second activation is rejected, never queued.
            return Cmd::none();
        }
        let action = MenuAction::ALL[self.menu_cursor.min(MenuAction::ALL.len() - 1)];
        self.dispatch_power(node_id, action)
    }

    fn dispatch_power(&mut self, node_id: String, action: MenuAction) -> Cmd<Msg> {
        match self.dispatcher.begin(&node_id, action) {
            Ok(epoch) => {
                info!(node = %node_id, action = ?action, epoch, "dispatching power command");
                let client = Arc::clone(&self.client);
                let state = action.power_state();
                Cmd::task(move || Msg::PowerCompleted {
                    epoch,
                    result: client.set_node_power(&node_id, state),
                })
            }
            Err(DispatchError::Busy) => Cmd::none(),
            Err(DispatchError::SelectionInvalid) => self.selection_invalid(),
        }
    }

    fn selection_invalid(&mut self) -> Cmd<Msg> {
        warn!("power command without a resolvable target");
        self.toasts.push(
            "Unknown node selection, reload the deployment",
            Severity::Error,
        );
        Cmd::none()
    }

    fn menu_rows(&self) -> Vec<MenuRow> {
        let Some(node) = self.selection.resolve(self.nodes()) else {
            return vec![MenuRow {
                text: "Unknown node".into(),
                disabled: true,
            }];
        };
        if !node.features.has_power() {
            return vec![MenuRow {
                text: "Power Controls Not Available".into(),
                disabled: true,
            }];
        }
        let pending = self.dispatcher.pending_action();
        let spinner = Spinner::new();
        MenuAction::ALL
            .iter()
            .map(|&action| {
                let glyph = if pending == Some(action) {
                    spinner.frame(self.spinner_tick).to_string()
                } else {
                    action.icon().to_string()
                };
                MenuRow {
                    text: format!("{glyph} {}", action.label()),
                    disabled: pending.is_some(),
                }
            })
            .collect()
    }

    // -----------------------------------------------------------------
    // View
    // -----------------------------------------------------------------

    fn draw_header(&self, area: Rect, frame: &mut Frame) {
        let name = self
            .deployment
            .as_ref()
            .map(|d| d.name.as_str())
            .unwrap_or(self.deployment_id.as_str());
        let title = format!("dtop — {name}");
        frame
            .buffer
            .draw_str(area.x + 1, area.y, &title, theme::header(), area.width);

        let hint = "[a] actions";
        let x = area
            .right()
            .saturating_sub(hint.len() as u16 + 1)
            .max(area.x);
        frame.buffer.draw_str(x, area.y, hint, theme::muted(), area.width);

        if self.loading {
            let spinner = Spinner::new();
            let text = format!("{} Loading deployment…", spinner.frame(self.spinner_tick));
            frame
                .buffer
                .draw_str(area.x + 1, area.y + 1, &text, theme::loading(), area.width);
        }
    }

    fn draw_status(&self, area: Rect, frame: &mut Frame) {
        let hints = "q quit · tab focus · ⏎ menu · d flow · r reload · +/- zoom · 0 fit";
        frame
            .buffer
            .draw_str(area.x + 1, area.y, hints, theme::muted(), area.width);

        let right = format!(
            "{} · {:.0}%",
            self.direction,
            self.viewport.zoom * 100.0
        );
        let x = area
            .right()
            .saturating_sub(right.len() as u16 + 1)
            .max(area.x);
        frame.buffer.draw_str(x, area.y, &right, theme::text(), area.width);
    }

    fn render_menu(&self, frame: &mut Frame) {
        let Some(target) = self.selection.target() else {
            return;
        };
        let rows = self.menu_rows();
        let list_area = self.list_area.get();
        let area = frame.area();

        let width = rows
            .iter()
            .map(|r| r.text.len() as u16)
            .max()
            .unwrap_or(10)
            .saturating_add(4)
            .min(area.width);
        let height = rows.len() as u16 + 2;

        let row_on_screen = target.saturating_sub(self.list_state.offset) as u16;
        let mut x = list_area.right();
        let mut y = list_area.y.saturating_add(row_on_screen);
        if x + width > area.right() {
            x = area.right().saturating_sub(width);
        }
        if y + height > area.bottom() {
            y = area.bottom().saturating_sub(height);
        }
        let menu_area = Rect::new(x, y, width, height);

        Panel::new()
            .border_style(theme::border_focused())
            .render(menu_area, frame);
        let inner = Panel::inner(menu_area);
        for (i, row) in rows.iter().enumerate() {
            let ry = inner.y + i as u16;
            if ry >= inner.bottom() {
                break;
            }
            let mut style = if row.disabled {
                theme::muted()
            } else {
                theme::text()
            };
            if i == self.menu_cursor && !row.disabled {
                style = theme::selected().reversed();
                frame
                    .buffer
                    .fill(Rect::new(inner.x, ry, inner.width, 1), ' ', style);
            }
            frame
                .buffer
                .draw_str(inner.x + 1, ry, &row.text, style, inner.width.saturating_sub(1));
        }
    }

    fn render_actions(&self, frame: &mut Frame) {
        let area = frame.area();
        let width = 16u16.min(area.width);
        let menu_area = Rect::new(
            area.right().saturating_sub(width + 1),
            area.y + 1,
            width,
            3,
        );
        Panel::new()
            .title("Actions")
            .border_style(theme::border_focused())
            .render(menu_area, frame);
        let inner = Panel::inner(menu_area);
        frame.buffer.draw_str(
            inner.x + 1,
            inner.y,
            "Destroy",
            theme::selected().reversed(),
            inner.width,
        );
    }

    fn render_body(&self, area: Rect, frame: &mut Frame) {
        let list_width = LIST_PANEL_WIDTH.min(area.width / 2);
        let list_panel = Rect::new(area.x, area.y, list_width, area.height);
        let graph_panel = Rect::new(
            area.x + list_width,
            area.y,
            area.width - list_width,
            area.height,
        );

        let (list_border, graph_border) = match self.focus {
            Focus::List => (theme::border_focused(), theme::border()),
            Focus::Graph => (theme::border(), theme::border_focused()),
        };

        Panel::new()
            .title("Nodes")
            .border_style(list_border)
            .render(list_panel, frame);
        let list_inner = Panel::inner(list_panel);
        self.list_area.set(list_inner);
        let items: Vec<&str> = self.nodes().iter().map(|n| n.resource_key.as_str()).collect();
        List::new(items)
            .highlight_symbol("> ")
            .highlight_style(theme::selected())
            .render(list_inner, frame, &self.list_state);

        Panel::new()
            .title("Topology")
            .border_style(graph_border)
            .render(graph_panel, frame);
        let graph_inner = Panel::inner(graph_panel);
        self.graph_area.set(graph_inner);
        if let (Some(graph), Some(placed)) = (&self.graph, &self.placed) {
            GraphView::new(graph, placed, &self.viewport)
                .selected(self.list_state.selected)
                .render(graph_inner, frame);
        } else if !graph_inner.is_empty() {
            let text = if self.loading { "Loading…" } else { "No topology" };
            frame.buffer.draw_str(
                graph_inner.x + 1,
                graph_inner.y + graph_inner.height / 2,
                text,
                theme::muted(),
                graph_inner.width,
            );
        }
    }
}

impl Model for AppModel {
    type Message = Msg;

    fn init(&mut self) -> Cmd<Msg> {
        Cmd::batch(vec![self.start_fetch(), Cmd::tick(TICK_INTERVAL)])
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::Resized => Cmd::none(),
            Msg::Tick => self.on_tick(),
            Msg::FetchCompleted(result) => self.on_fetch(result),
            Msg::PowerCompleted { epoch, result } => self.on_power(epoch, result),
            Msg::Key(key) => self.on_key(key),
            Msg::Mouse(mouse) => self.on_mouse(mouse),
        }
    }

    fn view(&self, frame: &mut Frame) {
        let area = frame.area();
        if area.width < 24 || area.height < 8 {
            frame
                .buffer
                .draw_str(0, 0, "Terminal too small", theme::text(), area.width);
            return;
        }

        let header = Rect::new(area.x, area.y, area.width, 2);
        let status = Rect::new(area.x, area.bottom() - 1, area.width, 1);
        let body = Rect::new(
            area.x,
            header.bottom(),
            area.width,
            area.height - header.height - status.height,
        );

        self.draw_header(header, frame);
        self.render_body(body, frame);
        self.draw_status(status, frame);

        if self.selection.is_open() {
            self.render_menu(frame);
        }
        if self.actions_open {
            self.render_actions(frame);
        }
        self.toasts.render(area, frame);
    }
}
