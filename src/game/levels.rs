use super::board::Board;
use super::direction::Direction;
use super::placer::{place_where, PlacementExhausted};
use crate::consts;
use rand::Rng;
use ratatui::layout::Position;
use std::collections::HashSet;
use std::time::Duration;

/// Per-level settings
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct LevelConfig {
    /// The 1-based level number
    pub(crate) level: u32,

    /// Score at which the next level is reached.  `None` for the final
    /// level.
    pub(crate) score_to_next_level: Option<u32>,

    /// Number of obstacles placed on the board for this level
    pub(crate) obstacle_count: usize,

    /// How long a bonus food stays on the board before vanishing
    pub(crate) bonus_food_duration: Duration,

    /// Percentage by which the difficulty's base tick interval is scaled;
    /// values below 100 make the snake faster.
    pub(crate) speed_percent: u32,
}

/// The levels in ascending order.  The last one never ends.
pub(crate) static LEVELS: [LevelConfig; 5] = [
    LevelConfig {
        level: 1,
        score_to_next_level: Some(50),
        obstacle_count: 0,
        bonus_food_duration: Duration::from_secs(8),
        speed_percent: 100,
    },
    LevelConfig {
        level: 2,
        score_to_next_level: Some(150),
        obstacle_count: 3,
        bonus_food_duration: Duration::from_secs(7),
        speed_percent: 90,
    },
    LevelConfig {
        level: 3,
        score_to_next_level: Some(300),
        obstacle_count: 6,
        bonus_food_duration: Duration::from_secs(6),
        speed_percent: 80,
    },
    LevelConfig {
        level: 4,
        score_to_next_level: Some(500),
        obstacle_count: 10,
        bonus_food_duration: Duration::from_secs(5),
        speed_percent: 70,
    },
    LevelConfig {
        level: 5,
        score_to_next_level: None,
        obstacle_count: 15,
        bonus_food_duration: Duration::from_secs(4),
        speed_percent: 60,
    },
];

impl LevelConfig {
    pub(crate) fn first() -> &'static LevelConfig {
        &LEVELS[0]
    }

    /// The level following this one, if any
    pub(crate) fn next(&self) -> Option<&'static LevelConfig> {
        LEVELS.iter().find(|lc| lc.level == self.level + 1)
    }

    /// Should a player with `score` points have moved past this level?
    pub(crate) fn is_complete(&self, score: u32) -> bool {
        self.score_to_next_level.is_some_and(|t| score >= t)
    }

    /// Scale a base tick interval by this level's speed
    pub(crate) fn scale_interval(&self, base: Duration) -> Duration {
        base * self.speed_percent / 100
    }
}

/// Generate `count` obstacles on `board` for a snake whose head is at `head`
/// and which is moving in `heading`.
///
/// Obstacles never land on a cell in `occupied`, within
/// [`OBSTACLE_HEAD_DISTANCE`][consts::OBSTACLE_HEAD_DISTANCE] cells of the
/// head (counting across the edges when the walls wrap), or on the next
/// [`FORWARDS_CLEARANCE`][consts::FORWARDS_CLEARANCE] cells directly in front
/// of the head.
pub(crate) fn generate_obstacles<R: Rng + ?Sized>(
    rng: &mut R,
    board: Board,
    count: usize,
    head: Position,
    heading: Direction,
    occupied: &[&HashSet<Position>],
) -> Result<HashSet<Position>, PlacementExhausted> {
    let ahead = std::iter::successors(Some(head), |&p| heading.advance(p, board))
        .skip(1)
        .take(consts::FORWARDS_CLEARANCE)
        .collect::<HashSet<_>>();
    let mut obstacles = HashSet::with_capacity(count);
    while obstacles.len() < count {
        let pos = place_where(rng, board, |p| {
            board.distance(p, head) > consts::OBSTACLE_HEAD_DISTANCE
                && !ahead.contains(&p)
                && !obstacles.contains(&p)
                && occupied.iter().all(|set| !set.contains(&p))
        })?;
        obstacles.insert(pos);
    }
    Ok(obstacles)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::WallPolicy;
    use rand::SeedableRng;
    use rand_chacha::ChaCha12Rng;

    const RNG_SEED: u64 = 0x0123456789ABCDEF;

    #[test]
    fn table_is_ordered() {
        for (i, lc) in LEVELS.iter().enumerate() {
            assert_eq!(usize::try_from(lc.level).unwrap(), i + 1);
        }
        let thresholds = LEVELS
            .iter()
            .filter_map(|lc| lc.score_to_next_level)
            .collect::<Vec<_>>();
        assert_eq!(thresholds.len(), LEVELS.len() - 1);
        assert!(thresholds.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(LEVELS[LEVELS.len() - 1].score_to_next_level, None);
    }

    #[test]
    fn next_level() {
        assert_eq!(LevelConfig::first().next(), Some(&LEVELS[1]));
        assert_eq!(LEVELS[4].next(), None);
    }

    #[test]
    fn completion() {
        let first = LevelConfig::first();
        assert!(!first.is_complete(49));
        assert!(first.is_complete(50));
        assert!(!LEVELS[4].is_complete(u32::MAX));
    }

    #[test]
    fn interval_scaling() {
        assert_eq!(
            LEVELS[2].scale_interval(Duration::from_millis(100)),
            Duration::from_millis(80)
        );
    }

    #[test]
    fn obstacles_keep_clear_of_snake() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let board = Board::new(20, WallPolicy::Wrap);
        let head = Position::new(10, 10);
        let snake = HashSet::from([head, Position::new(9, 10), Position::new(8, 10)]);
        let food = HashSet::from([Position::new(3, 3)]);
        for _ in 0..20 {
            let obstacles =
                generate_obstacles(&mut rng, board, 15, head, Direction::Right, &[&snake, &food])
                    .unwrap();
            assert_eq!(obstacles.len(), 15);
            for p in &obstacles {
                assert!(board.is_inside(*p));
                assert!(board.distance(*p, head) > 2);
                assert!(!snake.contains(p));
                assert!(!food.contains(p));
                assert!(!(p.y == 10 && (11..=15).contains(&p.x)), "obstacle {p:?} ahead");
            }
        }
    }

    #[test]
    fn obstacles_keep_clear_of_head_across_edges() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let board = Board::new(20, WallPolicy::Wrap);
        let head = Position::new(19, 10);
        let snake = HashSet::from([head, Position::new(19, 11), Position::new(19, 12)]);
        for _ in 0..200 {
            let obstacles =
                generate_obstacles(&mut rng, board, 15, head, Direction::Up, &[&snake]).unwrap();
            for p in &obstacles {
                assert!(
                    !(p.x <= 1 && (8..=12).contains(&p.y)),
                    "obstacle {p:?} next to the head across the edge"
                );
                assert!(board.distance(*p, head) > 2, "obstacle {p:?} too close");
            }
        }
    }

    #[test]
    fn no_room_for_obstacles() {
        let mut rng = ChaCha12Rng::seed_from_u64(RNG_SEED);
        let board = Board::new(5, WallPolicy::Solid);
        let r = generate_obstacles(
            &mut rng,
            board,
            1,
            Position::new(2, 2),
            Direction::Up,
            &[],
        );
        assert_eq!(r, Err(PlacementExhausted));
    }
}
