use crate::command::Command;
use crate::consts;
use crate::util::EnumExt;
use crossterm::event::Event;
use enum_map::Enum;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{
        block::{Block, Padding},
        Clear, Widget,
    },
};

/// The pause menu pop-up.  While it is shown, the simulation and all of its
/// timers are frozen.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct Paused {
    selection: PauseOpt,
}

impl Paused {
    /// The height that should be used for the `Rect` passed to
    /// `Paused::render()`
    pub(super) const HEIGHT: u16 = 6;

    /// The width that should be used for the `Rect` passed to
    /// `Paused::render()`
    pub(super) const WIDTH: u16 = 21;

    pub(super) fn new() -> Paused {
        Paused {
            selection: PauseOpt::min(),
        }
    }

    /// Handle an input event.  Returns `Some` if the user made a choice.
    pub(super) fn handle_event(&mut self, event: Event) -> Option<PauseOpt> {
        match Command::from_key_event(event.as_key_press_event()?)? {
            Command::Esc | Command::Space | Command::P => Some(PauseOpt::Resume),
            Command::R => Some(PauseOpt::Restart),
            Command::M => Some(PauseOpt::MainMenu),
            Command::Q | Command::Quit => Some(PauseOpt::Quit),
            Command::Enter => Some(self.selection),
            cmd => {
                self.move_selection(cmd);
                None
            }
        }
    }

    fn move_selection(&mut self, cmd: Command) {
        let selection = match cmd {
            Command::Up => self.selection.prev(),
            Command::Down => self.selection.next(),
            Command::Next => Some(self.selection.next().unwrap_or_else(PauseOpt::min)),
            Command::Prev => Some(self.selection.prev().unwrap_or_else(PauseOpt::max)),
            Command::Home => Some(PauseOpt::min()),
            Command::End => Some(PauseOpt::max()),
            _ => None,
        };
        if let Some(sel) = selection {
            self.selection = sel;
        }
    }
}

/// The choices in the pause menu
#[derive(Clone, Copy, Debug, Enum, Eq, PartialEq)]
pub(super) enum PauseOpt {
    Resume,
    Restart,
    MainMenu,
    Quit,
}

impl PauseOpt {
    fn label(self) -> &'static str {
        match self {
            PauseOpt::Resume => "Resume",
            PauseOpt::Restart => "Restart",
            PauseOpt::MainMenu => "Main Menu",
            PauseOpt::Quit => "Quit",
        }
    }

    fn key(self) -> &'static str {
        match self {
            PauseOpt::Resume => "Esc",
            PauseOpt::Restart => "r",
            PauseOpt::MainMenu => "m",
            PauseOpt::Quit => "q",
        }
    }

    fn to_line(self, selected: bool) -> Line<'static> {
        let line = Line::from_iter([
            Span::raw(if selected { "» " } else { "  " }),
            Span::raw(self.label()),
            Span::raw(" ("),
            Span::styled(self.key(), consts::KEY_STYLE),
            Span::raw(")"),
        ]);
        if selected {
            line.style(consts::MENU_SELECTION_STYLE)
        } else {
            line
        }
    }
}

impl Widget for Paused {
    /*
     * ┌───── PAUSED ──────┐
     * │ » Resume (Esc)    │
     * │   Restart (r)     │
     * │   Main Menu (m)   │
     * │   Quit (q)        │
     * └───────────────────┘
     */

    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::bordered()
            .title(" PAUSED ")
            .title_alignment(Alignment::Center)
            .padding(Padding::horizontal(1))
            .style(Style::reset());
        let inner = block.inner(area);
        Clear.render(area, buf);
        block.render(area, buf);
        for (opt, row) in PauseOpt::iter().zip(inner.rows()) {
            opt.to_line(self.selection == opt).render(row, buf);
        }
    }
}
