use crate::command::Command;
use crate::util::center_rect;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Flex, Layout, Rect, Size},
    text::{Line, Text},
    widgets::{
        block::{Block, Padding},
        Clear, Scrollbar, ScrollbarOrientation, ScrollbarState, StatefulWidget, Widget,
    },
};
use std::borrow::Cow;

/// A pop-up reporting an error (and its causes) that the player must
/// dismiss before continuing
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct Warning {
    lines: Vec<String>,
    scroll_offset: usize,
}

impl Warning {
    const MAX_LINES: u16 = 12;
    const TEXT_WIDTH: u16 = 48;
    const WIDTH: u16 = Self::TEXT_WIDTH + 4;

    /// Handle a keypress.  Returns `Some` once the pop-up is done with.
    pub(crate) fn handle_command(&mut self, cmd: Command) -> Option<WarningOutcome> {
        match cmd {
            Command::Enter | Command::Esc => return Some(WarningOutcome::Dismissed),
            Command::Quit => return Some(WarningOutcome::Quit),
            Command::Up => self.scroll_offset = self.scroll_offset.saturating_sub(1),
            Command::Down => {
                if self.scroll_offset < self.max_scroll() {
                    self.scroll_offset += 1;
                }
            }
            Command::Home => self.scroll_offset = 0,
            Command::End => self.scroll_offset = self.max_scroll(),
            _ => (),
        }
        None
    }

    fn scrolling(&self) -> bool {
        self.lines.len() > usize::from(Self::MAX_LINES)
    }

    /// The largest scroll offset at which the last line is still shown at
    /// the bottom
    fn max_scroll(&self) -> usize {
        self.lines
            .len()
            .saturating_sub(usize::from(Self::MAX_LINES))
    }

    /// Build a warning from an error message followed by the messages of its
    /// chain of causes
    fn from_error_messages(msgs: Vec<String>) -> Self {
        let mut msgs = msgs.into_iter();
        let Some(first) = msgs.next() else {
            return Warning {
                lines: vec![String::from("Something went wrong.")],
                scroll_offset: 0,
            };
        };
        let mut lines = wrap(&first, "", "");
        let causes = msgs.collect::<Vec<_>>();
        if !causes.is_empty() {
            lines.push(String::new());
            lines.push(String::from("Caused by:"));
        }
        if let [cause] = causes.as_slice() {
            lines.extend(wrap(cause, "    ", "    "));
        } else {
            for (i, cause) in causes.iter().enumerate() {
                lines.extend(wrap(cause, &format!("{i:>5}: "), "       "));
            }
        }
        Warning {
            lines,
            scroll_offset: 0,
        }
    }
}

fn wrap(s: &str, initial_indent: &str, subsequent_indent: &str) -> Vec<String> {
    let opts = textwrap::Options::new(usize::from(Warning::TEXT_WIDTH))
        .break_words(true)
        .initial_indent(initial_indent)
        .subsequent_indent(subsequent_indent);
    textwrap::wrap(s, opts)
        .into_iter()
        .map(Cow::into_owned)
        .collect()
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum WarningOutcome {
    Dismissed,
    Quit,
}

impl<E: std::error::Error> From<E> for Warning {
    fn from(e: E) -> Warning {
        let mut msgs = vec![e.to_string()];
        let mut source = e.source();
        while let Some(src) = source {
            msgs.push(src.to_string());
            source = src.source();
        }
        Warning::from_error_messages(msgs)
    }
}

impl Widget for &Warning {
    // `area` is here the area of the entire display in which the program is
    // drawing, not the area for just the widget proper.
    fn render(self, area: Rect, buf: &mut Buffer) {
        let height = u16::try_from(self.lines.len())
            .unwrap_or(u16::MAX)
            .min(Warning::MAX_LINES)
            .saturating_add(4);
        let block_area = center_rect(
            area,
            Size {
                width: Warning::WIDTH.saturating_add(u16::from(self.scrolling()) * 2),
                height,
            },
        );
        let block = Block::bordered()
            .title(" WARNING ")
            .title_alignment(Alignment::Center)
            .padding(Padding::horizontal(1));
        let [text_area, ok_area] = Layout::vertical([Constraint::Fill(1), Constraint::Length(1)])
            .flex(Flex::Start)
            .spacing(1)
            .areas(block.inner(block_area));
        Clear.render(block_area, buf);
        block.render(block_area, buf);
        let shown = self
            .lines
            .iter()
            .skip(self.scroll_offset)
            .take(usize::from(Warning::MAX_LINES))
            .map(String::as_str);
        if self.scrolling() {
            let [text_area, scrollbar_area] =
                Layout::horizontal([Constraint::Fill(1), Constraint::Length(1)])
                    .flex(Flex::Start)
                    .spacing(1)
                    .areas(text_area);
            Text::from_iter(shown).render(text_area, buf);
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .track_symbol(Some(ratatui::symbols::shade::MEDIUM));
            let mut scroll_state =
                ScrollbarState::new(self.max_scroll()).position(self.scroll_offset);
            scrollbar.render(scrollbar_area, buf, &mut scroll_state);
        } else {
            Text::from_iter(shown).render(text_area, buf);
        }
        Line::from("[OK]").centered().render(ok_area, buf);
    }
}
