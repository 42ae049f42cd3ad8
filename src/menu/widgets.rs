use crate::achievements::{Achievement, Tracker};
use crate::consts;
use crate::util::EnumExt;
use enum_map::Enum;
use ratatui::{
    buffer::Buffer,
    layout::{Flex, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::Widget,
};

/// The game's name with a little snake chasing its food underneath
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct Title;

impl Title {
    const NAME: &'static str = "P O W E R   S N A K E";
    const BODY_CELLS: usize = 6;
    pub(super) const HEIGHT: u16 = 3;
    pub(super) const WIDTH: u16 = 21;
}

impl Widget for Title {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [name_area, _, diagram_area] = Layout::vertical([1, 1, 1]).areas(area);
        Line::styled(Self::NAME, consts::TITLE_STYLE)
            .centered()
            .render(name_area, buf);
        Line::from_iter([
            Span::styled(
                consts::SNAKE_BODY_SYMBOL.repeat(Self::BODY_CELLS),
                consts::SNAKE_STYLE,
            ),
            Span::styled(consts::SNAKE_HEAD_EAST_SYMBOL, consts::SNAKE_STYLE),
            Span::raw("  "),
            Span::styled(consts::FOOD_SYMBOL, consts::FOOD_STYLE),
        ])
        .centered()
        .render(diagram_area, buf);
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct Instructions;

impl Instructions {
    pub(super) const HEIGHT: u16 = 6;
    pub(super) const WIDTH: u16 = 22;
}

impl Widget for Instructions {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let keys = |ks: [&'static str; 4]| {
            ks.into_iter().enumerate().flat_map(|(i, k)| {
                [
                    Span::raw(if i == 0 { "" } else { " " }),
                    Span::styled(k, consts::KEY_STYLE),
                ]
            })
        };
        let text = Text::from_iter([
            Line::from("Move the snake with:"),
            Line::from_iter(std::iter::once(Span::raw("  ")).chain(keys(["←", "↓", "↑", "→"]))),
            Line::from_iter(
                std::iter::once(Span::raw("  "))
                    .chain(keys(["h", "j", "k", "l"]))
                    .chain(std::iter::once(Span::raw("  or  ")))
                    .chain(keys(["a", "s", "w", "d"])),
            ),
            Line::from_iter([
                Span::raw("Pause with "),
                Span::styled("Esc", consts::KEY_STYLE),
                Span::raw(" or "),
                Span::styled("p", consts::KEY_STYLE),
            ]),
            Line::from("Eat food, but don't"),
            Line::from("hit anything!"),
        ]);
        debug_assert_eq!(
            text.height(),
            usize::from(Self::HEIGHT),
            "Instructions::HEIGHT is wrong"
        );
        debug_assert_eq!(
            text.width(),
            usize::from(Self::WIDTH),
            "Instructions::WIDTH is wrong"
        );
        text.render(area, buf);
    }
}

/// What each kind of food looks like & does
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(super) struct Legend;

impl Legend {
    pub(super) const HEIGHT: u16 = 6;
    pub(super) const WIDTH: u16 = 17;

    const ENTRIES: [(&'static str, Style, &'static str); 6] = [
        (consts::FOOD_SYMBOL, consts::FOOD_STYLE, "Food"),
        (consts::SPEED_FOOD_SYMBOL, consts::POWER_FOOD_STYLE, "Speed up"),
        (consts::SLOW_FOOD_SYMBOL, consts::POWER_FOOD_STYLE, "Slow down"),
        (consts::DOUBLE_FOOD_SYMBOL, consts::POWER_FOOD_STYLE, "Double points"),
        (consts::SHIELD_FOOD_SYMBOL, consts::POWER_FOOD_STYLE, "Shield"),
        (consts::BONUS_SYMBOL, consts::BONUS_STYLE, "Bonus (hurry!)"),
    ];
}

impl Widget for Legend {
    fn render(self, area: Rect, buf: &mut Buffer) {
        for ((symbol, style, label), row) in Self::ENTRIES.into_iter().zip(area.rows()) {
            Line::from_iter([
                Span::styled(symbol, style),
                Span::raw(" "),
                Span::raw(label),
            ])
            .render(row, buf);
        }
    }
}

/// A checklist of the achievements
#[derive(Clone, Copy, Debug)]
pub(super) struct AchievementList<'a>(pub(super) &'a Tracker);

impl AchievementList<'_> {
    #[allow(clippy::cast_possible_truncation)]
    pub(super) const HEIGHT: u16 = (Achievement::LENGTH as u16) + 1;
    pub(super) const WIDTH: u16 = 13;
}

impl Widget for AchievementList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut rows = area.rows();
        if let Some(row) = rows.next() {
            Line::styled("Achievements:", consts::PANEL_HEADING_STYLE).render(row, buf);
        }
        for (achievement, row) in Achievement::iter().zip(rows) {
            let line = if self.0.is_unlocked(achievement) {
                Line::from_iter([
                    Span::styled("✓ ", consts::KEY_STYLE),
                    Span::raw(achievement.title()),
                ])
            } else {
                Line::styled(
                    format!("· {achievement}"),
                    Style::new().add_modifier(Modifier::DIM),
                )
            };
            line.render(row, buf);
        }
    }
}

/// Lay out the help text, the food legend & the achievement checklist side by
/// side
pub(super) fn render_help(tracker: &Tracker, area: Rect, buf: &mut Buffer) {
    let [instructions_area, legend_area, achievements_area] = Layout::horizontal([
        Instructions::WIDTH,
        Legend::WIDTH,
        AchievementList::WIDTH,
    ])
    .flex(Flex::Center)
    .spacing(4)
    .areas(area);
    Instructions.render(instructions_area, buf);
    Legend.render(legend_area, buf);
    AchievementList(tracker).render(achievements_area, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameEvent;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .filter_map(|x| buf.cell((x, y)))
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn title() {
        let area = Rect::new(0, 0, 30, Title::HEIGHT);
        let mut buffer = Buffer::empty(area);
        Title.render(area, &mut buffer);
        assert_eq!(row_text(&buffer, 0), "    P O W E R   S N A K E     ");
        assert_eq!(row_text(&buffer, 1), " ".repeat(30));
        assert_eq!(row_text(&buffer, 2), "      ⚬⚬⚬⚬⚬⚬⚬⚬⚬⚬⚬⚬=<  ()      ");
    }

    #[test]
    fn instructions() {
        let area = Rect::new(0, 0, Instructions::WIDTH, Instructions::HEIGHT);
        let mut buffer = Buffer::empty(area);
        Instructions.render(area, &mut buffer);
        let mut expected = Buffer::with_lines([
            "Move the snake with:  ",
            "  ← ↓ ↑ →             ",
            "  h j k l  or  a s w d",
            "Pause with Esc or p   ",
            "Eat food, but don't   ",
            "hit anything!         ",
        ]);
        for x in [2, 4, 6, 8] {
            expected.set_style(Rect::new(x, 1, 1, 1), consts::KEY_STYLE);
            expected.set_style(Rect::new(x, 2, 1, 1), consts::KEY_STYLE);
            expected.set_style(Rect::new(x + 13, 2, 1, 1), consts::KEY_STYLE);
        }
        expected.set_style(Rect::new(11, 3, 3, 1), consts::KEY_STYLE);
        expected.set_style(Rect::new(18, 3, 1, 1), consts::KEY_STYLE);
        pretty_assertions::assert_eq!(buffer, expected);
    }

    #[test]
    fn legend() {
        let area = Rect::new(0, 0, Legend::WIDTH, Legend::HEIGHT);
        let mut buffer = Buffer::empty(area);
        Legend.render(area, &mut buffer);
        let rows = (0..Legend::HEIGHT)
            .map(|y| row_text(&buffer, y))
            .collect::<Vec<_>>();
        assert_eq!(
            rows,
            [
                "() Food          ",
                "»» Speed up      ",
                "«« Slow down     ",
                "x2 Double points ",
                "[] Shield        ",
                "$$ Bonus (hurry!)",
            ]
        );
    }

    #[test]
    fn achievement_checklist() {
        let mut tracker = Tracker::default();
        tracker.observe(GameEvent::GameEnded { final_score: 0 });
        let area = Rect::new(0, 0, AchievementList::WIDTH, AchievementList::HEIGHT);
        let mut buffer = Buffer::empty(area);
        AchievementList(&tracker).render(area, &mut buffer);
        let rows = (0..AchievementList::HEIGHT)
            .map(|y| row_text(&buffer, y))
            .collect::<Vec<_>>();
        assert_eq!(
            rows,
            [
                "Achievements:",
                "✓ First Game ",
                "· Centurion  ",
                "· Speed Demon",
                "· Collector  ",
                "· Untouchable",
            ]
        );
    }
}
