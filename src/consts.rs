//! Assorted constants & hard-coded configuration
use ratatui::{
    layout::Size,
    style::{Color, Modifier, Style},
};
use std::time::Duration;

/// Time between movements of the snake on [`Easy`][crate::options::Difficulty::Easy]
pub(crate) const EASY_TICK_PERIOD: Duration = Duration::from_millis(150);

/// Time between movements of the snake on [`Medium`][crate::options::Difficulty::Medium]
pub(crate) const MEDIUM_TICK_PERIOD: Duration = Duration::from_millis(100);

/// Time between movements of the snake on [`Hard`][crate::options::Difficulty::Hard]
pub(crate) const HARD_TICK_PERIOD: Duration = Duration::from_millis(50);

/// Draw everything inside a rectangle of this size in the center of the
/// terminal window.
///
/// Cf. [`crate::util::get_display_area()`]
pub(crate) const DISPLAY_SIZE: Size = Size {
    width: 80,
    height: 24,
};

/// Smallest allowed side length of the (square) board
pub(crate) const MIN_BOARD_SIZE: u16 = 10;

/// Largest allowed side length of the board.  With each cell drawn two
/// columns wide, this is the most that fits in [`DISPLAY_SIZE`].
pub(crate) const MAX_BOARD_SIZE: u16 = 20;

/// Snake length at the start of a game
pub(crate) const INITIAL_SNAKE_LENGTH: usize = 3;

/// When laying out obstacles for a level, keep this many cells directly in
/// front of the snake's head free.
pub(crate) const FORWARDS_CLEARANCE: usize = 5;

/// Obstacles are never placed within this Chebyshev distance of the snake's
/// head.
pub(crate) const OBSTACLE_HEAD_DISTANCE: u16 = 2;

/// Number of terminal columns used to draw one board cell
pub(crate) const CELL_WIDTH: u16 = 2;

/// Glyph for the snake's head when it is moving north/up
pub(crate) const SNAKE_HEAD_NORTH_SYMBOL: &str = "vv";

/// Glyph for the snake's head when it is moving south/down
pub(crate) const SNAKE_HEAD_SOUTH_SYMBOL: &str = "^^";

/// Glyph for the snake's head when it is moving east/right
pub(crate) const SNAKE_HEAD_EAST_SYMBOL: &str = "=<";

/// Glyph for the snake's head when it is moving west/left
pub(crate) const SNAKE_HEAD_WEST_SYMBOL: &str = ">=";

/// Glyph for the parts of the snake's body
pub(crate) const SNAKE_BODY_SYMBOL: &str = "⚬⚬";

/// Glyph for plain food
pub(crate) const FOOD_SYMBOL: &str = "()";

/// Glyph for speed food
pub(crate) const SPEED_FOOD_SYMBOL: &str = "»»";

/// Glyph for slow food
pub(crate) const SLOW_FOOD_SYMBOL: &str = "««";

/// Glyph for double-score food
pub(crate) const DOUBLE_FOOD_SYMBOL: &str = "x2";

/// Glyph for shield (invulnerability) food
pub(crate) const SHIELD_FOOD_SYMBOL: &str = "[]";

/// Glyph for bonus food
pub(crate) const BONUS_SYMBOL: &str = "$$";

/// Glyph for obstacles
pub(crate) const OBSTACLE_SYMBOL: &str = "██";

/// Glyph for the snake's head when it's collided with an obstacle, a wall,
/// or itself
pub(crate) const COLLISION_SYMBOL: &str = "××";

/// Style for the snake's head and body
pub(crate) const SNAKE_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);

/// Style for the snake while it is invulnerable
pub(crate) const SHIELDED_SNAKE_STYLE: Style =
    Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);

/// Style for plain food
pub(crate) const FOOD_STYLE: Style = Style::new().fg(Color::LightRed);

/// Style for food that activates an effect
pub(crate) const POWER_FOOD_STYLE: Style = Style::new().fg(Color::LightMagenta);

/// Style for bonus food
pub(crate) const BONUS_STYLE: Style = Style::new()
    .fg(Color::Yellow)
    .add_modifier(Modifier::BOLD);

/// Style for obstacles
pub(crate) const OBSTACLE_STYLE: Style = Style::new().fg(Color::Gray);

/// Style for [`COLLISION_SYMBOL`]
pub(crate) const COLLISION_STYLE: Style = Style::new()
    .fg(Color::LightRed)
    .add_modifier(Modifier::REVERSED);

/// Style for key codes shown in the interface
pub(crate) const KEY_STYLE: Style = Style::new().fg(Color::Yellow);

/// Style for the headings in the status panel beside the board
pub(crate) const PANEL_HEADING_STYLE: Style = Style::new().add_modifier(Modifier::REVERSED);

/// Style for the currently-selected menu item
pub(crate) const MENU_SELECTION_STYLE: Style = Style::new().add_modifier(Modifier::UNDERLINED);

/// Style for the title on the main menu
pub(crate) const TITLE_STYLE: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);

/// Number of speed foods that must be eaten in a row for the "Speed Demon"
/// achievement
pub(crate) const SPEED_DEMON_STREAK: u32 = 5;

/// Score that must be reached in a single game for the "Centurion"
/// achievement
pub(crate) const CENTURION_SCORE: u32 = 100;
