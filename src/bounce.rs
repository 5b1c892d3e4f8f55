//! Bounce controller: a point moving one pixel per frame inside a rectangle.
//!
//! Each axis carries a [`Direction`] of exactly one pixel per step. The
//! controller first moves the point with the direction it already holds and
//! only then checks the moved position against the edges. That means the
//! shape may poke one pixel past an edge for a frame before it turns around.
//!
//! ## Rust concepts
//! - Enums instead of integers to make invalid states unrepresentable
//! - Pure functions that are easy to test in isolation
//! - `#[derive]` for value types that are cheap to copy

/// Per-axis direction of travel. A step is always exactly one pixel.
///
/// # Rust concept: enums as constrained values
/// A plain `i32` could hold 0 or 7. Using an enum means the compiler
/// guarantees the velocity is always -1 or +1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Negative,
    Positive,
}

impl Direction {
    /// Signed unit step for this direction.
    pub fn step(self) -> i32 {
        match self {
            Direction::Negative => -1,
            Direction::Positive => 1,
        }
    }
}

/// Integer point on the canvas (the centre of the ball).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Direction of travel on both axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Velocity {
    pub x: Direction,
    pub y: Direction,
}

impl Velocity {
    pub fn new(x: Direction, y: Direction) -> Self {
        Self { x, y }
    }

    /// The velocity as a signed pair, e.g. `(1, -1)`.
    pub fn as_steps(&self) -> (i32, i32) {
        (self.x.step(), self.y.step())
    }
}

impl Default for Velocity {
    fn default() -> Self {
        Self::new(Direction::Positive, Direction::Positive)
    }
}

/// Decide the direction on one axis given the ball's position on it.
///
/// The high edge is checked first: if `position + radius` passes `extent`
/// the ball heads back towards zero. Otherwise, if `position - radius` is
/// below zero it heads away from zero. Anywhere in between the direction
/// is kept.
pub fn reflect(position: i32, radius: i32, extent: i32, direction: Direction) -> Direction {
    if position.saturating_add(radius) > extent {
        Direction::Negative
    } else if position.saturating_sub(radius) < 0 {
        Direction::Positive
    } else {
        direction
    }
}

/// Position and velocity of the ball inside a `width` x `height` rectangle.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BounceController {
    position: Point,
    velocity: Velocity,
    radius: i32,
    width: i32,
    height: i32,
}

impl BounceController {
    /// Start at the top-left corner, moving down and to the right.
    pub fn new(width: u32, height: u32, radius: u32) -> Self {
        Self::with_state(width, height, radius, Point::default(), Velocity::default())
    }

    /// Resume from an explicit position and velocity.
    ///
    /// Sizes above `i32::MAX` saturate instead of wrapping negative.
    pub fn with_state(
        width: u32,
        height: u32,
        radius: u32,
        position: Point,
        velocity: Velocity,
    ) -> Self {
        Self {
            position,
            velocity,
            radius: saturating_i32(radius),
            width: saturating_i32(width),
            height: saturating_i32(height),
        }
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn velocity(&self) -> Velocity {
        self.velocity
    }

    pub fn radius(&self) -> i32 {
        self.radius
    }

    /// Move one pixel along each axis, then bounce off any edge the ball
    /// now overlaps.
    pub fn advance(&mut self) {
        self.position.x = self.position.x.saturating_add(self.velocity.x.step());
        self.position.y = self.position.y.saturating_add(self.velocity.y.step());

        self.velocity.y = reflect(self.position.y, self.radius, self.height, self.velocity.y);
        self.velocity.x = reflect(self.position.x, self.radius, self.width, self.velocity.x);
    }
}

fn saturating_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::Direction::{Negative, Positive};

    // ── reflect ────────────────────────────────────────────────────

    #[rstest]
    #[case(30, Positive, Positive)] // Middle keeps direction
    #[case(30, Negative, Negative)]
    #[case(59, Positive, Positive)] // 59 + 5 = 64, touching is not passing
    #[case(60, Positive, Negative)] // 60 + 5 = 65 > 64
    #[case(60, Negative, Negative)]
    #[case(5, Negative, Negative)] // 5 - 5 = 0, still inside
    #[case(4, Negative, Positive)] // 4 - 5 < 0
    #[case(0, Positive, Positive)]
    fn test_reflect(#[case] position: i32, #[case] before: Direction, #[case] after: Direction) {
        assert_eq!(reflect(position, 5, 64, before), after);
    }

    #[test]
    fn reflect_checks_high_edge_before_low_edge() {
        // Ball wider than the canvas overlaps both edges; high edge wins.
        assert_eq!(reflect(2, 5, 6, Positive), Negative);
        assert_eq!(reflect(2, 5, 6, Negative), Negative);
    }

    #[test]
    fn direction_steps_are_unit() {
        assert_eq!(Positive.step(), 1);
        assert_eq!(Negative.step(), -1);
    }

    // ── advance ────────────────────────────────────────────────────

    #[test]
    fn new_controller_starts_at_origin_moving_down_right() {
        let ball = BounceController::new(64, 32, 5);
        assert_eq!(ball.position(), Point::new(0, 0));
        assert_eq!(ball.velocity().as_steps(), (1, 1));
    }

    #[test]
    fn first_advance_moves_diagonally() {
        let mut ball = BounceController::new(64, 32, 5);
        ball.advance();
        assert_eq!(ball.position(), Point::new(1, 1));
        assert_eq!(ball.velocity(), Velocity::default());
    }

    #[test]
    fn bounces_off_right_edge_then_left_edge() {
        let mut ball = BounceController::with_state(
            64,
            1000,
            5,
            Point::new(60, 500),
            Velocity::new(Positive, Positive),
        );

        ball.advance();
        assert_eq!(ball.position().x, 61);
        assert_eq!(ball.velocity().x, Negative);

        let mut previous = ball.position().x;
        while ball.velocity().x == Negative {
            ball.advance();
            assert_eq!(ball.position().x, previous - 1);
            previous = ball.position().x;
        }

        // Turned around on the first step where x - 5 < 0
        assert_eq!(ball.position().x, 4);
        assert_eq!(ball.velocity().x, Positive);
    }

    #[test]
    fn bounces_off_bottom_edge() {
        let mut ball = BounceController::with_state(
            64,
            32,
            5,
            Point::new(30, 27),
            Velocity::new(Positive, Positive),
        );

        ball.advance(); // y = 28, 28 + 5 = 33 > 32
        assert_eq!(ball.position(), Point::new(31, 28));
        assert_eq!(ball.velocity(), Velocity::new(Positive, Negative));

        ball.advance();
        assert_eq!(ball.position(), Point::new(32, 27));
    }

    #[test]
    fn stays_inside_canvas_in_steady_state() {
        let mut ball = BounceController::new(64, 32, 5);
        for _ in 0..10_000 {
            ball.advance();
            let p = ball.position();
            assert!((0..64).contains(&p.x), "x escaped: {p:?}");
            assert!((0..32).contains(&p.y), "y escaped: {p:?}");
        }
    }

    #[test]
    fn velocity_is_always_unit() {
        let mut ball = BounceController::new(17, 9, 3);
        for _ in 0..1_000 {
            ball.advance();
            let (dx, dy) = ball.velocity().as_steps();
            assert_eq!(dx.abs(), 1);
            assert_eq!(dy.abs(), 1);
        }
    }

    #[rstest]
    #[case(8, 8, 6)]
    #[case(10, 4, 5)]
    #[case(3, 3, 100)]
    fn oversized_radius_jitters_inside_bounds(
        #[case] width: u32,
        #[case] height: u32,
        #[case] radius: u32,
    ) {
        let mut ball = BounceController::new(width, height, radius);
        for _ in 0..500 {
            ball.advance();
            let (dx, dy) = ball.velocity().as_steps();
            assert_eq!((dx.abs(), dy.abs()), (1, 1));
            // High edge wins, so the ball settles around `extent - radius`.
            let p = ball.position();
            let (w, h, r) = (width as i32, height as i32, radius as i32);
            assert!((w - r - 1..=w).contains(&p.x), "x ran away: {p:?}");
            assert!((h - r - 1..=h).contains(&p.y), "y ran away: {p:?}");
        }
    }

    #[rstest]
    #[case(3_000_000_000)]
    #[case(i32::MAX as u32)]
    #[case(u32::MAX)]
    fn huge_radius_saturates_instead_of_wrapping(#[case] radius: u32) {
        let mut ball = BounceController::new(64, 32, radius);
        assert_eq!(ball.radius(), i32::MAX);

        for _ in 0..10 {
            ball.advance();
        }
        let (dx, dy) = ball.velocity().as_steps();
        assert_eq!((dx.abs(), dy.abs()), (1, 1));
    }

    #[test]
    fn reflect_does_not_overflow_at_extremes() {
        assert_eq!(reflect(1, i32::MAX, 64, Positive), Negative);
        assert_eq!(reflect(i32::MIN, 5, 64, Negative), Positive);
    }

    #[test]
    fn advancing_is_deterministic() {
        let mut a = BounceController::new(64, 32, 5);
        let mut b = BounceController::new(64, 32, 5);
        for _ in 0..777 {
            a.advance();
        }
        for _ in 0..300 {
            b.advance();
        }
        for _ in 0..477 {
            b.advance();
        }
        assert_eq!(a, b);
    }

    #[test]
    fn steady_state_range_on_wide_axis() {
        let mut ball = BounceController::new(64, 1000, 5);
        // Skip the run-in from the corner.
        for _ in 0..100 {
            ball.advance();
        }
        let mut min_x = i32::MAX;
        let mut max_x = i32::MIN;
        for _ in 0..500 {
            ball.advance();
            min_x = min_x.min(ball.position().x);
            max_x = max_x.max(ball.position().x);
        }
        // Overshoots by one pixel before turning: 60 + 5 > 64 and 4 - 5 < 0.
        assert_eq!(max_x, 60);
        assert_eq!(min_x, 4);
    }
}
