//! Reader status panel with the "place tag" wave animation.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::domain::entities::TokenInfo;
use crate::presentation::events::UiHandle;
use crate::presentation::theme::{ColorToken, Theme};

/// Interval between animation frames.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(200);
const FRAME_COUNT: usize = 6;
const LABEL_WIDTH: usize = 7;
const FOOTER: &str = "Media won't launch when TUI is open";
const DOT: char = '◆';

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    NoReader,
    Waiting,
    Scanned,
}

#[derive(Debug)]
struct Inner {
    state: ScanState,
    reader_count: usize,
    driver: String,
    token: Option<TokenInfo>,
    frame: usize,
    ticker: Option<JoinHandle<()>>,
}

/// Shows reader status, a waiting animation or the last scanned token.
///
/// State sits behind a lock because the animation ticker advances the
/// frame from its own task.
#[derive(Debug)]
pub struct ScanningArea {
    inner: Arc<Mutex<Inner>>,
    ui: Option<UiHandle>,
}

impl ScanningArea {
    /// `ui` receives a redraw request on every animation frame.
    #[must_use]
    pub fn new(ui: Option<UiHandle>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state: ScanState::NoReader,
                reader_count: 0,
                driver: String::new(),
                token: None,
                frame: 0,
                ticker: None,
            })),
            ui,
        }
    }

    #[must_use]
    pub fn state(&self) -> ScanState {
        self.inner.lock().state
    }

    #[must_use]
    pub fn frame(&self) -> usize {
        self.inner.lock().frame
    }

    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.inner
            .lock()
            .ticker
            .as_ref()
            .is_some_and(|ticker| !ticker.is_finished())
    }

    #[must_use]
    pub fn token(&self) -> Option<TokenInfo> {
        self.inner.lock().token.clone()
    }

    pub fn set_reader_info(&self, count: usize, driver: impl Into<String>) {
        let mut inner = self.inner.lock();
        inner.reader_count = count;
        inner.driver = driver.into();
        if count == 0 {
            self.transition(&mut inner, ScanState::NoReader);
        } else if inner.state == ScanState::NoReader {
            self.transition(&mut inner, ScanState::Waiting);
        }
    }

    pub fn set_token(&self, token: TokenInfo) {
        let mut inner = self.inner.lock();
        inner.token = Some(token);
        self.transition(&mut inner, ScanState::Scanned);
    }

    pub fn clear_token(&self) {
        let mut inner = self.inner.lock();
        inner.token = None;
        let next = if inner.reader_count > 0 {
            ScanState::Waiting
        } else {
            ScanState::NoReader
        };
        self.transition(&mut inner, next);
    }

    /// Restarts the animation if the area is still waiting, after [`Self::stop`].
    pub fn resume(&self) {
        let mut inner = self.inner.lock();
        let running = inner.ticker.as_ref().is_some_and(|t| !t.is_finished());
        if inner.state == ScanState::Waiting && !running {
            self.start_ticker(&mut inner);
        }
    }

    /// Stops the animation; call when the hosting page goes away.
    pub fn stop(&self) {
        Self::stop_ticker(&mut self.inner.lock());
    }

    fn transition(&self, inner: &mut Inner, next: ScanState) {
        let previous = inner.state;
        inner.state = next;
        if previous == next {
            return;
        }
        debug!(?previous, ?next, "Scan state changed");

        if next == ScanState::Waiting {
            self.start_ticker(inner);
        } else if previous == ScanState::Waiting {
            Self::stop_ticker(inner);
        }
    }

    fn start_ticker(&self, inner: &mut Inner) {
        Self::stop_ticker(inner);
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            debug!("No runtime, animation disabled");
            return;
        };

        let shared = Arc::clone(&self.inner);
        let ui = self.ui.clone();
        inner.ticker = Some(runtime.spawn(async move {
            let start = tokio::time::Instant::now() + FRAME_INTERVAL;
            let mut interval = tokio::time::interval_at(start, FRAME_INTERVAL);
            loop {
                interval.tick().await;
                {
                    let mut inner = shared.lock();
                    inner.frame = (inner.frame + 1) % FRAME_COUNT;
                }
                if let Some(ui) = &ui
                    && !ui.request_redraw()
                {
                    break;
                }
            }
        }));
    }

    fn stop_ticker(inner: &mut Inner) {
        if let Some(ticker) = inner.ticker.take() {
            ticker.abort();
        }
    }

    fn reader_status(count: usize, driver: &str) -> String {
        match count {
            0 => "No readers".to_string(),
            1 => format!("1 reader ({driver})"),
            n => format!("{n} readers"),
        }
    }

    fn wave(frame: usize, theme: &Theme) -> Line<'static> {
        let center = Style::default()
            .fg(theme.color(ColorToken::Border))
            .add_modifier(Modifier::BOLD);
        let inner = theme.style(ColorToken::Text);
        let outer = theme.style(ColorToken::Secondary);

        let rings = match frame {
            0 => 0,
            1 | 5 => 1,
            2 | 4 => 2,
            _ => 3,
        };
        let ring_style = |i: usize| if i == 0 { inner } else { outer };

        let mut spans: Vec<Span<'static>> = (0..rings)
            .rev()
            .map(|i| Span::styled(")", ring_style(i)))
            .collect();
        spans.push(Span::styled(DOT.to_string(), center));
        spans.extend((0..rings).map(|i| Span::styled("(", ring_style(i))));
        Line::from(spans)
    }

    /// Wraps on the last space that fits, otherwise hard-breaks.
    fn wrap(text: &str, width: usize) -> Vec<String> {
        if width == 0 {
            return Vec::new();
        }

        let mut lines = Vec::new();
        let mut remaining: Vec<char> = text.chars().collect();
        while remaining.len() > width {
            let split = (1..=width).rev().find(|&i| remaining[i] == ' ').unwrap_or(width);
            lines.push(remaining[..split].iter().collect());
            remaining.drain(..split);
            while remaining.first() == Some(&' ') {
                remaining.remove(0);
            }
        }
        if !remaining.is_empty() || lines.is_empty() {
            lines.push(remaining.into_iter().collect());
        }
        lines
    }

    fn truncate(value: &str, width: usize) -> String {
        if value.chars().count() <= width {
            return value.to_string();
        }
        if width <= 3 {
            return value.chars().take(width).collect();
        }
        let mut out: String = value.chars().take(width - 3).collect();
        out.push_str("...");
        out
    }

    fn centered(buf: &mut Buffer, area: Rect, y: u16, line: Line<'_>) {
        if y < area.bottom() {
            Paragraph::new(line)
                .alignment(Alignment::Center)
                .render(Rect::new(area.x, y, area.width, 1), buf);
        }
    }

    fn draw_token(buf: &mut Buffer, area: Rect, token: &TokenInfo, theme: &Theme) {
        let label = theme.style(ColorToken::Label).add_modifier(Modifier::BOLD);
        let value = theme.style(ColorToken::Border);
        let value_width = usize::from(area.width).saturating_sub(LABEL_WIDTH);
        let labelled = |name: &str, text: String| {
            Line::from(vec![
                Span::styled(format!("{:<width$}", format!("{name}:"), width = LABEL_WIDTH), label),
                Span::styled(text, value),
            ])
        };

        let mut lines = vec![
            labelled(
                "Time",
                Self::truncate(&token.scanned_at.format("%H:%M:%S").to_string(), value_width),
            ),
            labelled("UID", Self::truncate(&token.uid, value_width)),
        ];
        for (i, chunk) in Self::wrap(&token.text, value_width).into_iter().enumerate() {
            if i == 0 {
                lines.push(labelled("Value", chunk));
            } else {
                lines.push(Line::from(vec![
                    Span::raw(" ".repeat(LABEL_WIDTH)),
                    Span::styled(chunk, value),
                ]));
            }
        }
        Paragraph::new(lines).render(area, buf);
    }

    pub fn draw(&self, area: Rect, buf: &mut Buffer, theme: &Theme) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let (state, frame, count, driver, token) = {
            let inner = self.inner.lock();
            (
                inner.state,
                inner.frame,
                inner.reader_count,
                inner.driver.clone(),
                inner.token.clone(),
            )
        };

        buf.set_style(area, theme.base_style());

        let dot_token = if count == 0 {
            ColorToken::Secondary
        } else {
            ColorToken::Success
        };
        let status = Self::truncate(
            &Self::reader_status(count, &driver),
            usize::from(area.width).saturating_sub(3),
        );
        Paragraph::new(Line::from(vec![
            Span::styled(format!("{DOT} "), theme.style(dot_token)),
            Span::styled(status, theme.style(ColorToken::Text)),
        ]))
        .render(Rect { height: 1, ..area }, buf);

        if area.height >= 2 {
            let footer = Line::styled(FOOTER, theme.style(ColorToken::Secondary));
            Self::centered(buf, area, area.bottom() - 1, footer);
        }

        let content = Rect {
            y: area.y + 2,
            height: area.height.saturating_sub(4),
            ..area
        };
        if content.height == 0 {
            return;
        }

        match state {
            ScanState::NoReader => {
                let line = Line::styled("No reader connected", theme.style(ColorToken::Secondary));
                Self::centered(buf, content, content.y + content.height / 2, line);
            }
            ScanState::Waiting => {
                if content.height < 2 {
                    return;
                }
                let y = (content.y + content.height / 2).saturating_sub(1).max(content.y);
                Self::centered(buf, content, y, Self::wave(frame, theme));
                let text = Line::styled("Place tag on reader", theme.style(ColorToken::Text));
                Self::centered(buf, content, y + 2, text);
            }
            ScanState::Scanned => {
                if let Some(token) = token {
                    Self::draw_token(buf, content, &token, theme);
                }
            }
        }
    }
}

impl Drop for ScanningArea {
    fn drop(&mut self) {
        self.stop();
    }
}
