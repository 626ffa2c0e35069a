//! Elm-style runtime: Model, Cmd, Program.
//!
//! The program owns the model and drives the update/view loop. State is
//! mutated only inside `update()` in response to discrete messages; side
//! effects are described by [`Cmd`] values and executed by the runtime.
//! `Cmd::Task` runs a closure on a spawned thread whose result is sent
//! back over the loop's channel, so the model never sees concurrent
//! mutation and no locks are needed.

use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, error};

use crate::event::Event;
use crate::frame::Frame;

/// How long to wait for terminal input before re-checking ticks and task
/// results.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Application state and behavior.
pub trait Model: Sized {
    /// Messages that drive state transitions. Must be constructible from
    /// raw input events.
    type Message: From<Event> + Send + 'static;

    /// Startup commands (initial fetches and timers).
    fn init(&mut self) -> Cmd<Self::Message> {
        Cmd::none()
    }

    /// The state transition function.
    fn update(&mut self, msg: Self::Message) -> Cmd<Self::Message>;

    /// Render the current state.
    fn view(&self, frame: &mut Frame);
}

/// A side effect requested by the model.
pub enum Cmd<M> {
    /// No operation.
    None,
    /// Stop the program.
    Quit,
    /// Feed a message back into the update loop.
    Msg(M),
    /// Execute several commands.
    Batch(Vec<Cmd<M>>),
    /// Deliver an [`Event::Tick`] after the given delay.
    Tick(Duration),
    /// Run a blocking closure on a background thread; its return value is
    /// delivered as a message.
    Task(Box<dyn FnOnce() -> M + Send>),
}

impl<M> Cmd<M> {
    /// No-op command.
    #[inline]
    #[must_use]
    pub fn none() -> Self {
        Self::None
    }

    /// Quit command.
    #[inline]
    #[must_use]
    pub fn quit() -> Self {
        Self::Quit
    }

    /// Message command.
    #[inline]
    #[must_use]
    pub fn msg(m: M) -> Self {
        Self::Msg(m)
    }

    /// Tick command.
    #[inline]
    #[must_use]
    pub fn tick(delay: Duration) -> Self {
        Self::Tick(delay)
    }

    /// Background task command.
    #[must_use]
    pub fn task<F>(f: F) -> Self
    where
        F: FnOnce() -> M + Send + 'static,
    {
        Self::Task(Box::new(f))
    }

    /// Batch command; collapses trivial cases.
    #[must_use]
    pub fn batch(cmds: Vec<Self>) -> Self {
        let mut cmds: Vec<Self> = cmds
            .into_iter()
            .filter(|c| !matches!(c, Self::None))
            .collect();
        match cmds.len() {
            0 => Self::None,
            1 => cmds.remove(0),
            _ => Self::Batch(cmds),
        }
    }

    /// Number of atomic commands.
    #[must_use]
    pub fn count(&self) -> usize {
        match self {
            Self::None => 0,
            Self::Batch(cmds) => cmds.iter().map(Self::count).sum(),
            _ => 1,
        }
    }
}

impl<M> std::fmt::Debug for Cmd<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "None"),
            Self::Quit => write!(f, "Quit"),
            Self::Msg(_) => write!(f, "Msg"),
            Self::Batch(cmds) => write!(f, "Batch({})", cmds.len()),
            Self::Tick(d) => write!(f, "Tick({d:?})"),
            Self::Task(_) => write!(f, "Task"),
        }
    }
}

/// Source of input events for the program loop.
pub trait EventSource {
    /// Wait up to `timeout` for the next event.
    fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<Event>>;
}

/// Scripted event source for tests and headless runs.
#[derive(Debug, Default)]
pub struct HeadlessEventSource {
    events: std::collections::VecDeque<Event>,
}

impl HeadlessEventSource {
    /// Create a source that replays the given events, then goes quiet.
    #[must_use]
    pub fn scripted(events: impl IntoIterator<Item = Event>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }
}

impl EventSource for HeadlessEventSource {
    fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<Event>> {
        match self.events.pop_front() {
            Some(event) => Ok(Some(event)),
            None => {
                // Keep the loop from spinning while background work runs.
                thread::sleep(timeout.min(Duration::from_millis(1)));
                Ok(None)
            }
        }
    }
}

/// Destination for rendered frames.
pub trait Presenter {
    /// Current render surface size in cells.
    fn dimensions(&self) -> (u16, u16);

    /// Write a finished frame.
    fn present(&mut self, frame: &Frame) -> io::Result<()>;
}

/// In-memory presenter for tests; keeps the last frame.
#[derive(Debug, Default)]
pub struct CapturePresenter {
    width: u16,
    height: u16,
    pub last_frame: Option<Frame>,
}

impl CapturePresenter {
    /// Create a capture surface of the given size.
    #[must_use]
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            last_frame: None,
        }
    }
}

impl Presenter for CapturePresenter {
    fn dimensions(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    fn present(&mut self, frame: &Frame) -> io::Result<()> {
        self.last_frame = Some(frame.clone());
        Ok(())
    }
}

/// The update/view loop.
pub struct Program<M: Model, E: EventSource, P: Presenter> {
    model: M,
    events: E,
    presenter: P,
    tx: mpsc::Sender<M::Message>,
    rx: mpsc::Receiver<M::Message>,
    ticks: Vec<Instant>,
    quit: bool,
}

impl<M: Model, E: EventSource, P: Presenter> Program<M, E, P> {
    /// Create a program over the given model, input source, and surface.
    pub fn new(model: M, events: E, presenter: P) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            model,
            events,
            presenter,
            tx,
            rx,
            ticks: Vec::new(),
            quit: false,
        }
    }

    /// Run until the model quits.
    pub fn run(&mut self) -> io::Result<()> {
        let init = self.model.init();
        self.apply(init);

        while !self.quit {
            self.deliver_due_ticks();
            while let Ok(msg) = self.rx.try_recv() {
                self.dispatch(msg);
                if self.quit {
                    break;
                }
            }
            if self.quit {
                break;
            }

            let (width, height) = self.presenter.dimensions();
            let mut frame = Frame::new(width, height);
            self.model.view(&mut frame);
            self.presenter.present(&frame)?;

            let timeout = self.next_tick_timeout();
            match self.events.poll_event(timeout) {
                Ok(Some(event)) => self.dispatch(M::Message::from(event)),
                Ok(None) => {}
                Err(err) => {
                    error!(%err, "event source failed");
                    return Err(err);
                }
            }
        }

        debug!("program loop finished");
        Ok(())
    }

    /// The model, for post-run inspection.
    #[must_use]
    pub fn model(&self) -> &M {
        &self.model
    }

    /// The presenter, for post-run inspection.
    #[must_use]
    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    fn dispatch(&mut self, msg: M::Message) {
        let cmd = self.model.update(msg);
        self.apply(cmd);
    }

    fn apply(&mut self, cmd: Cmd<M::Message>) {
        match cmd {
            Cmd::None => {}
            Cmd::Quit => self.quit = true,
            Cmd::Msg(m) => self.dispatch(m),
            Cmd::Batch(cmds) => {
                for c in cmds {
                    self.apply(c);
                    if self.quit {
                        break;
                    }
                }
            }
            Cmd::Tick(delay) => self.ticks.push(Instant::now() + delay),
            Cmd::Task(f) => {
                let tx = self.tx.clone();
                thread::spawn(move || {
                    // A closed channel just means the loop is gone.
                    let _ = tx.send(f());
                });
            }
        }
    }

    fn deliver_due_ticks(&mut self) {
        let now = Instant::now();
        let mut due = 0usize;
        self.ticks.retain(|deadline| {
            if *deadline <= now {
                due += 1;
                false
            } else {
                true
            }
        });
        for _ in 0..due {
            if self.quit {
                break;
            }
            self.dispatch(M::Message::from(Event::Tick));
        }
    }

    fn next_tick_timeout(&self) -> Duration {
        let now = Instant::now();
        self.ticks
            .iter()
            .map(|deadline| deadline.saturating_duration_since(now))
            .min()
            .unwrap_or(POLL_INTERVAL)
            .min(POLL_INTERVAL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{KeyCode, KeyEvent};

    struct Counter {
        count: i32,
        ticks: u32,
    }

    enum Msg {
        Increment,
        TaskDone(i32),
        Tick,
        Quit,
        Noop,
    }

    impl From<Event> for Msg {
        fn from(event: Event) -> Self {
            match event {
                Event::Key(k) if k.is_char('q') => Msg::Quit,
                Event::Key(k) if k.is_char('+') => Msg::Increment,
                Event::Tick => Msg::Tick,
                _ => Msg::Noop,
            }
        }
    }

    impl Model for Counter {
        type Message = Msg;

        fn update(&mut self, msg: Msg) -> Cmd<Msg> {
            match msg {
                Msg::Increment => {
                    self.count += 1;
                    Cmd::none()
                }
                Msg::TaskDone(n) => {
                    self.count += n;
                    Cmd::quit()
                }
                Msg::Tick => {
                    self.ticks += 1;
                    Cmd::quit()
                }
                Msg::Quit => Cmd::quit(),
                Msg::Noop => Cmd::none(),
            }
        }

        fn view(&self, frame: &mut Frame) {
            let text = format!("count={}", self.count);
            frame
                .buffer
                .draw_str(0, 0, &text, crate::style::Style::new(), 20);
        }
    }

    fn key(c: char) -> Event {
        Event::Key(KeyEvent::new(KeyCode::Char(c)))
    }

    // -- Cmd tests --

    #[test]
    fn batch_collapses_trivial_cases() {
        assert!(matches!(Cmd::<Msg>::batch(vec![]), Cmd::None));
        assert!(matches!(
            Cmd::batch(vec![Cmd::none(), Cmd::msg(Msg::Noop)]),
            Cmd::Msg(_)
        ));
        assert_eq!(
            Cmd::batch(vec![Cmd::msg(Msg::Noop), Cmd::quit()]).count(),
            2
        );
    }

    // -- Program tests --

    #[test]
    fn scripted_keys_drive_updates() {
        let events = HeadlessEventSource::scripted([key('+'), key('+'), key('q')]);
        let mut program = Program::new(
            Counter { count: 0, ticks: 0 },
            events,
            CapturePresenter::new(20, 2),
        );
        program.run().unwrap();
        assert_eq!(program.model().count, 2);
    }

    #[test]
    fn frames_are_presented() {
        let events = HeadlessEventSource::scripted([key('+'), key('q')]);
        let mut program = Program::new(
            Counter { count: 0, ticks: 0 },
            events,
            CapturePresenter::new(20, 2),
        );
        program.run().unwrap();
        let frame = program.presenter().last_frame.as_ref().unwrap();
        let row: String = (0..7)
            .filter_map(|x| frame.buffer.get(x, 0))
            .map(|c| c.ch)
            .collect();
        assert_eq!(row, "count=1");
    }

    #[test]
    fn task_result_fed_back_as_message() {
        struct TaskModel {
            inner: Counter,
        }
        impl Model for TaskModel {
            type Message = Msg;
            fn init(&mut self) -> Cmd<Msg> {
                Cmd::task(|| Msg::TaskDone(5))
            }
            fn update(&mut self, msg: Msg) -> Cmd<Msg> {
                self.inner.update(msg)
            }
            fn view(&self, frame: &mut Frame) {
                self.inner.view(frame);
            }
        }

        let mut program = Program::new(
            TaskModel {
                inner: Counter { count: 0, ticks: 0 },
            },
            HeadlessEventSource::default(),
            CapturePresenter::new(10, 1),
        );
        program.run().unwrap();
        assert_eq!(program.model().inner.count, 5);
    }

    #[test]
    fn tick_delivered_after_delay() {
        struct TickModel {
            inner: Counter,
        }
        impl Model for TickModel {
            type Message = Msg;
            fn init(&mut self) -> Cmd<Msg> {
                Cmd::tick(Duration::from_millis(1))
            }
            fn update(&mut self, msg: Msg) -> Cmd<Msg> {
                self.inner.update(msg)
            }
            fn view(&self, frame: &mut Frame) {
                self.inner.view(frame);
            }
        }

        let mut program = Program::new(
            TickModel {
                inner: Counter { count: 0, ticks: 0 },
            },
            HeadlessEventSource::default(),
            CapturePresenter::new(10, 1),
        );
        program.run().unwrap();
        assert_eq!(program.model().inner.ticks, 1);
    }
}
