//! Terminal rendering for the chat controller and notification banners.

use std::{
    io::{self, Stdout, Write},
    sync::{
        Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
};

use colored::{ColoredString, Colorize};
use shared::{format::format_time_of_day, models::ChatLogEntry};
use tracing::warn;
use widget::{Banner, BannerId, BannerKind, BannerSink, IndicatorId, MessageSink};

const TYPING_TEXT: &str = "Assistant is typing...";
const CLEAR_LINE: &str = "\r\x1b[2K";

/// Writes chat lines and banners to any writer, stdout by default.
///
/// The typing indicator is drawn on its own line without a newline so the
/// next rendered line can overwrite it.
pub struct TerminalSink<W: Write + Send> {
    out: Mutex<W>,
    next_indicator: AtomicU64,
    typing: Mutex<Option<IndicatorId>>,
}

impl TerminalSink<Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write + Send> TerminalSink<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
            next_indicator: AtomicU64::new(1),
            typing: Mutex::new(None),
        }
    }

    pub fn into_inner(self) -> W {
        self.out.into_inner().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_out(&self) -> MutexGuard<'_, W> {
        self.out.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_typing(&self) -> MutexGuard<'_, Option<IndicatorId>> {
        self.typing.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Writes a full line, first wiping a visible typing indicator.
    fn write_line(&self, line: &str) {
        let typing_visible = self.lock_typing().is_some();
        let mut out = self.lock_out();
        let result = if typing_visible {
            write!(out, "{CLEAR_LINE}{line}\n{TYPING_TEXT}")
        } else {
            writeln!(out, "{line}")
        };
        if let Err(err) = result.and_then(|()| out.flush()) {
            warn!(error = %err, "failed to write to terminal");
        }
    }

    fn write_raw(&self, text: &str) {
        let mut out = self.lock_out();
        if let Err(err) = out.write_all(text.as_bytes()).and_then(|()| out.flush()) {
            warn!(error = %err, "failed to write to terminal");
        }
    }
}

fn speaker(entry: &ChatLogEntry) -> ColoredString {
    if entry.is_user {
        "You".cyan().bold()
    } else {
        "Assistant".green().bold()
    }
}

/// Banner label colored by kind.
pub fn banner_label(kind: BannerKind) -> ColoredString {
    let label = format!("[{kind}]");
    match kind {
        BannerKind::Info => label.blue(),
        BannerKind::Success => label.green(),
        BannerKind::Warning => label.yellow(),
        BannerKind::Danger => label.red(),
    }
}

impl<W: Write + Send> MessageSink for TerminalSink<W> {
    // Line-buffered stdin already consumed the input.
    fn clear_input(&self) {}

    fn render_message(&self, entry: &ChatLogEntry) {
        let stamp = format_time_of_day(entry.timestamp.0);
        let line = format!("[{}] {}: {}", stamp.dimmed(), speaker(entry), entry.message);
        self.write_line(&line);
    }

    fn scroll_to_latest(&self) {}

    fn show_typing_indicator(&self) -> IndicatorId {
        let id = IndicatorId(self.next_indicator.fetch_add(1, Ordering::Relaxed));
        let previous = self.lock_typing().replace(id);
        if previous.is_none() {
            self.write_raw(&TYPING_TEXT.dimmed().to_string());
        }
        id
    }

    fn remove_typing_indicator(&self, indicator: IndicatorId) {
        let mut typing = self.lock_typing();
        if *typing == Some(indicator) {
            *typing = None;
            drop(typing);
            self.write_raw(CLEAR_LINE);
        }
    }
}

impl<W: Write + Send> BannerSink for TerminalSink<W> {
    fn show_banner(&self, banner: &Banner) {
        let line = format!("{} {}", banner_label(banner.kind), banner.message);
        self.write_line(&line);
    }

    // Banners scroll away with the rest of the output.
    fn remove_banner(&self, _id: BannerId) {}
}
