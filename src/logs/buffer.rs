use crate::channel::{ChannelEvent, ChannelState};
use std::collections::VecDeque;

pub type LogEvent = ChannelEvent<String>;

/// Placeholder shown while a log stream (re)connects.
pub const CONNECTING_PLACEHOLDER: &str = "Connecting to log stream...";

/// Rows of slack still counted as "at the bottom".
pub const FOLLOW_TOLERANCE: usize = 1;

/// Append-only visible log text, bounded to `max_lines`.
#[derive(Debug, Clone)]
pub struct LogBuffer {
    lines: VecDeque<String>,
    max_lines: usize,
}

impl LogBuffer {
    pub fn new(max_lines: usize) -> Self {
        Self {
            lines: VecDeque::new(),
            max_lines: max_lines.max(1),
        }
    }

    /// Append one line; the oldest line is evicted when full. Returns the
    /// number of evicted lines.
    pub fn push(&mut self, line: impl Into<String>) -> usize {
        self.lines.push_back(line.into());
        let mut evicted = 0;
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
            evicted += 1;
        }
        evicted
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

}

/// Scroll position over a log buffer, in rows. One stream message is one row,
/// whatever it contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// First visible row.
    pub offset: usize,
    /// Number of visible rows.
    pub height: usize,
}

impl Viewport {
    pub fn new(height: usize) -> Self {
        Self { offset: 0, height }
    }

    /// Whether the unscrolled remainder below the view is within tolerance.
    pub fn at_bottom(&self, content_rows: usize) -> bool {
        content_rows.saturating_sub(self.height) <= self.offset + FOLLOW_TOLERANCE
    }

    pub fn scroll_to_bottom(&mut self, content_rows: usize) {
        self.offset = content_rows.saturating_sub(self.height);
    }

    /// Scroll by `delta` rows, clamped to the content.
    pub fn scroll_by(&mut self, delta: isize, content_rows: usize) {
        let max = content_rows.saturating_sub(self.height);
        self.offset = self.offset.saturating_add_signed(delta).min(max);
    }
}

/// What a log event changed, for the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogUpdate {
    /// Buffer was reset and now only holds the connecting placeholder.
    Reset,
    /// Placeholder removed; the new session starts empty.
    Cleared,
    /// One line appended; `follow` is set when the view moved with it.
    Appended { follow: bool },
    Unchanged,
}

/// Operator input on the log pane, one command per input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneCommand {
    Up(usize),
    Down(usize),
    Bottom,
    Clear,
    Quit,
}

impl PaneCommand {
    /// `k`/`j` move one row, `u`/`d` one page of `page` rows, `b` jumps to the
    /// bottom, `c` clears, `q` leaves.
    pub fn parse(input: &str, page: usize) -> Option<Self> {
        match input.trim() {
            "k" => Some(PaneCommand::Up(1)),
            "j" => Some(PaneCommand::Down(1)),
            "u" => Some(PaneCommand::Up(page.max(1))),
            "d" => Some(PaneCommand::Down(page.max(1))),
            "b" => Some(PaneCommand::Bottom),
            "c" => Some(PaneCommand::Clear),
            "q" => Some(PaneCommand::Quit),
            _ => None,
        }
    }
}

/// Consumer-side state of one log stream.
#[derive(Debug, Clone)]
pub struct LogTail {
    buffer: LogBuffer,
    viewport: Viewport,
    auto_scroll: bool,
    state: ChannelState,
}

impl LogTail {
    pub fn new(max_lines: usize, viewport_rows: usize, auto_scroll: bool) -> Self {
        Self {
            buffer: LogBuffer::new(max_lines),
            viewport: Viewport::new(viewport_rows),
            auto_scroll,
            state: ChannelState::Disconnected,
        }
    }

    pub fn apply(&mut self, event: LogEvent) -> LogUpdate {
        match event {
            ChannelEvent::State(ChannelState::Connecting) => {
                self.state = ChannelState::Connecting;
                self.buffer.clear();
                self.buffer.push(CONNECTING_PLACEHOLDER);
                self.viewport.offset = 0;
                LogUpdate::Reset
            }
            ChannelEvent::State(ChannelState::Open) => {
                self.state = ChannelState::Open;
                self.buffer.clear();
                self.viewport.offset = 0;
                LogUpdate::Cleared
            }
            ChannelEvent::State(state) => {
                self.state = state;
                LogUpdate::Unchanged
            }
            ChannelEvent::Message(line) => {
                let was_at_bottom = self.viewport.at_bottom(self.buffer.len());
                let evicted = self.buffer.push(line);
                self.viewport.offset = self.viewport.offset.saturating_sub(evicted);

                let follow = self.auto_scroll && was_at_bottom;
                if follow {
                    self.viewport.scroll_to_bottom(self.buffer.len());
                }
                LogUpdate::Appended { follow }
            }
        }
    }

    /// Operator "clear" action; the stream stays connected.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.viewport.offset = 0;
    }

    pub fn scroll_by(&mut self, delta: isize) {
        self.viewport.scroll_by(delta, self.buffer.len());
    }

    /// Apply an operator command. Returns false for `Quit`.
    pub fn command(&mut self, cmd: PaneCommand) -> bool {
        let rows = |n: usize| isize::try_from(n).unwrap_or(isize::MAX);
        match cmd {
            PaneCommand::Up(n) => self.scroll_by(-rows(n)),
            PaneCommand::Down(n) => self.scroll_by(rows(n)),
            PaneCommand::Bottom => self.viewport.scroll_to_bottom(self.buffer.len()),
            PaneCommand::Clear => self.clear(),
            PaneCommand::Quit => return false,
        }
        true
    }

    /// Whether the newest line is on screen.
    pub fn at_bottom(&self) -> bool {
        self.viewport.offset >= self.buffer.len().saturating_sub(self.viewport.height)
    }

    /// Lines inside the viewport.
    pub fn visible(&self) -> impl Iterator<Item = &str> {
        self.buffer
            .lines()
            .skip(self.viewport.offset)
            .take(self.viewport.height)
    }

    pub fn buffer(&self) -> &LogBuffer {
        &self.buffer
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn state(&self) -> ChannelState {
        self.state
    }
}
