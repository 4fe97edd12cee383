//! Placement of the snake, food and obstacles
//!
//! Every placement draws uniformly random cells and retries until the cell
//! is acceptable. After `MAX_RANDOM_ATTEMPTS` misses the remaining free cells
//! are enumerated and one is drawn uniformly, so a crowded grid still
//! terminates and a full grid reports `None`.

use rand::Rng;

use super::state::{Cell, Direction, Snake};
use crate::consts::{MAX_RANDOM_ATTEMPTS, OBSTACLE_SAFE_DISTANCE};

/// True if `cell` lies on a `grid_count` x `grid_count` grid
#[inline]
pub fn in_bounds(cell: Cell, grid_count: i32) -> bool {
    cell.x >= 0 && cell.y >= 0 && cell.x < grid_count && cell.y < grid_count
}

/// Chebyshev (king-move) distance between two cells
#[inline]
pub fn chebyshev(a: Cell, b: Cell) -> i32 {
    let d = (a - b).abs();
    d.x.max(d.y)
}

/// Draw a uniformly random cell satisfying `accept`
pub fn random_cell_where(
    rng: &mut impl Rng,
    grid_count: i32,
    accept: impl Fn(Cell) -> bool,
) -> Option<Cell> {
    for _ in 0..MAX_RANDOM_ATTEMPTS {
        let cell = Cell::new(
            rng.random_range(0..grid_count),
            rng.random_range(0..grid_count),
        );
        if accept(cell) {
            return Some(cell);
        }
    }

    let free: Vec<Cell> = (0..grid_count)
        .flat_map(|y| (0..grid_count).map(move |x| Cell::new(x, y)))
        .filter(|&c| accept(c))
        .collect();
    if free.is_empty() {
        None
    } else {
        Some(free[rng.random_range(0..free.len())])
    }
}

/// Spawn a straight snake with a random heading, body kept at least one
/// cell away from every edge
///
/// The caller guarantees `length <= grid_count - 2`.
pub fn spawn_snake(rng: &mut impl Rng, grid_count: i32, length: usize) -> (Snake, Direction) {
    let interior = |c: Cell| c.x >= 1 && c.y >= 1 && c.x <= grid_count - 2 && c.y <= grid_count - 2;
    loop {
        let head = Cell::new(
            rng.random_range(1..grid_count - 1),
            rng.random_range(1..grid_count - 1),
        );
        let heading = Direction::ALL[rng.random_range(0..Direction::ALL.len())];
        let snake = Snake::straight(head, heading, length);
        if snake.cells().iter().all(|&c| interior(c)) {
            return (snake, heading);
        }
    }
}

/// Place food off the snake and obstacles
pub fn place_food(rng: &mut impl Rng, grid_count: i32, snake: &Snake, obstacles: &[Cell]) -> Option<Cell> {
    random_cell_where(rng, grid_count, |c| {
        !snake.contains(c) && !obstacles.contains(&c)
    })
}

/// Place up to `count` obstacles clear of the snake, the food, each other and
/// the area around the spawn head
pub fn place_obstacles(
    rng: &mut impl Rng,
    grid_count: i32,
    count: usize,
    snake: &Snake,
    food: Cell,
) -> Vec<Cell> {
    let head = snake.head();
    let mut obstacles = Vec::with_capacity(count);
    for _ in 0..count {
        let next = random_cell_where(rng, grid_count, |c| {
            !snake.contains(c)
                && c != food
                && !obstacles.contains(&c)
                && chebyshev(c, head) >= OBSTACLE_SAFE_DISTANCE
        });
        match next {
            Some(cell) => obstacles.push(cell),
            None => {
                log::warn!("Grid full after {} of {} obstacles", obstacles.len(), count);
                break;
            }
        }
    }
    obstacles
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_chebyshev() {
        assert_eq!(chebyshev(Cell::new(0, 0), Cell::new(2, -1)), 2);
        assert_eq!(chebyshev(Cell::new(3, 3), Cell::new(3, 3)), 0);
    }

    #[test]
    fn test_full_grid_has_no_food_cell() {
        let mut rng = Pcg32::seed_from_u64(1);
        // 3x3 grid completely covered by a snaking body
        let cells = vec![
            Cell::new(0, 0),
            Cell::new(1, 0),
            Cell::new(2, 0),
            Cell::new(2, 1),
            Cell::new(1, 1),
            Cell::new(0, 1),
            Cell::new(0, 2),
            Cell::new(1, 2),
        ];
        let snake = Snake::new(cells);
        assert_eq!(place_food(&mut rng, 3, &snake, &[]), Some(Cell::new(2, 2)));
        assert_eq!(place_food(&mut rng, 3, &snake, &[Cell::new(2, 2)]), None);
    }

    #[test]
    fn test_spawn_respects_margin() {
        let mut rng = Pcg32::seed_from_u64(99);
        for _ in 0..200 {
            let (snake, heading) = spawn_snake(&mut rng, 7, 5);
            assert_eq!(snake.len(), 5);
            assert!(snake.is_self_disjoint());
            for c in snake.cells() {
                assert!(c.x >= 1 && c.y >= 1 && c.x <= 5 && c.y <= 5, "{:?}", c);
            }
            // Body trails directly behind the head
            assert_eq!(snake.cells()[1], snake.head() - heading.delta());
        }
    }

    proptest! {
        #[test]
        fn prop_food_never_on_snake_or_obstacles(seed in any::<u64>(), count in 0usize..12) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let (snake, _) = spawn_snake(&mut rng, 15, 4);
            let food = place_food(&mut rng, 15, &snake, &[]).unwrap();
            let obstacles = place_obstacles(&mut rng, 15, count, &snake, food);
            prop_assert_eq!(obstacles.len(), count);

            for _ in 0..20 {
                let food = place_food(&mut rng, 15, &snake, &obstacles).unwrap();
                prop_assert!(in_bounds(food, 15));
                prop_assert!(!snake.contains(food));
                prop_assert!(!obstacles.contains(&food));
            }
        }

        #[test]
        fn prop_obstacles_clear_of_spawn(seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let (snake, _) = spawn_snake(&mut rng, 20, 5);
            let food = place_food(&mut rng, 20, &snake, &[]).unwrap();
            let obstacles = place_obstacles(&mut rng, 20, 10, &snake, food);
            for (i, &o) in obstacles.iter().enumerate() {
                prop_assert!(!snake.contains(o));
                prop_assert_ne!(o, food);
                prop_assert!(chebyshev(o, snake.head()) >= OBSTACLE_SAFE_DISTANCE);
                prop_assert!(!obstacles[i + 1..].contains(&o));
            }
        }
    }
}
