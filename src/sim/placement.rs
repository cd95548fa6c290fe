//! Target placement: bounded random scatter with a grid fallback

use glam::Vec2;
use rand::Rng;

use crate::config::Region;
use crate::consts::CONTACT_SKIN;
use crate::error::PlacementExhausted;

/// Two equal balls overlap when their centers are closer than a diameter
#[inline]
pub fn overlaps(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance_squared(b) < 4.0 * radius * radius
}

/// Random non-overlapping centers inside `region`
///
/// Each ball gets at most `max_attempts` draws. Positions also stay clear
/// of everything in `avoid`.
pub fn random_positions<R: Rng>(
    rng: &mut R,
    count: usize,
    region: &Region,
    radius: f32,
    avoid: &[Vec2],
    max_attempts: u32,
) -> Result<Vec<Vec2>, PlacementExhausted> {
    let mut placed: Vec<Vec2> = Vec::with_capacity(count);

    for _ in 0..count {
        let mut found = None;
        for _ in 0..max_attempts {
            let candidate = Vec2::new(
                rng.random_range(region.x_min..=region.x_max),
                rng.random_range(region.z_min..=region.z_max),
            );
            let blocked = placed
                .iter()
                .chain(avoid.iter())
                .any(|&p| overlaps(candidate, p, radius));
            if !blocked {
                found = Some(candidate);
                break;
            }
        }

        match found {
            Some(p) => placed.push(p),
            None => {
                return Err(PlacementExhausted {
                    placed: placed.len(),
                    requested: count,
                    attempts: max_attempts,
                });
            }
        }
    }

    Ok(placed)
}

fn grid_dims(region: &Region, radius: f32) -> (usize, usize, f32) {
    let cell = 2.0 * radius + CONTACT_SKIN;
    let cols = (region.width() / cell).floor() as usize + 1;
    let rows = (region.depth() / cell).floor() as usize + 1;
    (cols, rows, cell)
}

/// How many balls the fallback grid can hold
pub fn grid_capacity(region: &Region, radius: f32) -> usize {
    let (cols, rows, _) = grid_dims(region, radius);
    cols * rows
}

/// Deterministic row-major grid, filled from the far (high z) edge
///
/// Callers must keep `count` within `grid_capacity`; extra balls are dropped.
pub fn grid_positions(count: usize, region: &Region, radius: f32) -> Vec<Vec2> {
    let (cols, rows, cell) = grid_dims(region, radius);
    let x0 = region.x_min + (region.width() - (cols - 1) as f32 * cell) / 2.0;
    let z0 = region.z_max;

    (0..rows)
        .flat_map(|row| (0..cols).map(move |col| (row, col)))
        .take(count)
        .map(|(row, col)| Vec2::new(x0 + col as f32 * cell, z0 - row as f32 * cell))
        .collect()
}

/// Random placement, falling back to the grid when the retry cap is hit
pub fn place_targets<R: Rng>(
    rng: &mut R,
    count: usize,
    region: &Region,
    radius: f32,
    avoid: &[Vec2],
    max_attempts: u32,
) -> Vec<Vec2> {
    match random_positions(rng, count, region, radius, avoid, max_attempts) {
        Ok(positions) => positions,
        Err(e) => {
            log::warn!("{}; using grid layout", e);
            grid_positions(count, region, radius)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn region() -> Region {
        Region {
            x_min: -2.8,
            x_max: 2.8,
            z_min: -2.6,
            z_max: 3.3,
        }
    }

    fn assert_no_overlap(positions: &[Vec2], radius: f32) {
        for (i, a) in positions.iter().enumerate() {
            for b in &positions[i + 1..] {
                assert!(!overlaps(*a, *b, radius), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_random_positions_valid() {
        let mut rng = Pcg32::seed_from_u64(42);
        let avoid = [Vec2::new(0.0, -2.6)];
        let positions = random_positions(&mut rng, 20, &region(), 0.15, &avoid, 1000).unwrap();
        assert_eq!(positions.len(), 20);
        assert_no_overlap(&positions, 0.15);
        for p in &positions {
            assert!(p.x >= -2.8 && p.x <= 2.8 && p.y >= -2.6 && p.y <= 3.3);
            assert!(!overlaps(*p, avoid[0], 0.15));
        }
    }

    #[test]
    fn test_random_positions_deterministic() {
        let a = random_positions(&mut Pcg32::seed_from_u64(7), 10, &region(), 0.15, &[], 100);
        let b = random_positions(&mut Pcg32::seed_from_u64(7), 10, &region(), 0.15, &[], 100);
        assert_eq!(a, b);
    }

    #[test]
    fn test_random_positions_exhausts() {
        let tiny = Region {
            x_min: 0.0,
            x_max: 0.1,
            z_min: 0.0,
            z_max: 0.1,
        };
        let mut rng = Pcg32::seed_from_u64(1);
        let err = random_positions(&mut rng, 3, &tiny, 0.15, &[], 50).unwrap_err();
        assert_eq!(err.placed, 1);
        assert_eq!(err.requested, 3);
        assert_eq!(err.attempts, 50);
    }

    #[test]
    fn test_grid_positions_fit() {
        let capacity = grid_capacity(&region(), 0.15);
        assert!(capacity >= 300);
        let positions = grid_positions(40, &region(), 0.15);
        assert_eq!(positions.len(), 40);
        assert_no_overlap(&positions, 0.15);
        for p in &positions {
            assert!(p.x >= -2.8 - 1e-4 && p.x <= 2.8 + 1e-4);
            assert!(p.y >= -2.6 - 1e-4 && p.y <= 3.3 + 1e-4);
        }
    }

    #[test]
    fn test_place_targets_falls_back_to_grid() {
        let small = Region {
            x_min: 0.0,
            x_max: 0.2,
            z_min: 0.0,
            z_max: 0.2,
        };
        // Every candidate lands on the avoided ball, the grid ignores it
        let avoid = [Vec2::new(0.1, 0.1)];
        let mut rng = Pcg32::seed_from_u64(3);
        let positions = place_targets(&mut rng, 1, &small, 0.15, &avoid, 20);
        assert_eq!(positions, vec![Vec2::new(0.1, 0.2)]);
    }
}
