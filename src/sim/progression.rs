//! Lives, score and level progression
//!
//! Consumes a frame's collision outcome and moves the game between
//! rounds, levels and its two terminal phases.

use super::collision::FrameOutcome;
use super::state::{GameEvent, GamePhase, GameState, GameWorld};
use crate::config::GameConfig;
use crate::error::SimError;

/// A state change triggered by the rules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Lost a ball with lives left: new active ball, unfired
    Reset,
    /// Level threshold met: refill lives, faster ball, new layout
    LevelUp,
    Win,
    Lose,
}

/// Cumulative score needed to clear the current level outright
pub fn level_threshold(state: &GameState, config: &GameConfig) -> u32 {
    config.target_count as u32 * state.level
}

/// Cumulative score needed to pass the level once lives run out
pub fn half_clear_bar(state: &GameState, config: &GameConfig) -> u32 {
    state.level * (config.target_count as u32 / 2)
}

/// Which level-end transition the counters call for, if any
pub fn next_transition(state: &GameState, config: &GameConfig) -> Option<Transition> {
    if state.phase.is_terminal() {
        return None;
    }

    let final_level = state.level >= config.max_level;

    if state.score >= level_threshold(state, config) {
        return Some(if final_level {
            Transition::Win
        } else {
            Transition::LevelUp
        });
    }

    if state.lives == 0 {
        if state.score >= half_clear_bar(state, config) {
            return Some(if final_level {
                Transition::Win
            } else {
                Transition::LevelUp
            });
        }
        return Some(Transition::Lose);
    }

    None
}

/// Carry out a transition on the world
pub fn apply_transition(
    world: &mut GameWorld,
    transition: Transition,
    events: &mut Vec<GameEvent>,
) -> Result<(), SimError> {
    match transition {
        Transition::Reset => {
            world.reset_active();
            events.push(GameEvent::Respawned);
        }
        Transition::LevelUp => {
            world.level_up()?;
            events.push(GameEvent::LevelUp {
                level: world.state.level,
            });
        }
        Transition::Win => {
            world.state.phase = GamePhase::Won;
            world.freeze();
            log::info!(
                "Won at level {} with score {}",
                world.state.level,
                world.state.score
            );
            events.push(GameEvent::Won);
        }
        Transition::Lose => {
            world.state.phase = GamePhase::Lost;
            world.freeze();
            log::info!(
                "Defeated at level {} with score {}",
                world.state.level,
                world.state.score
            );
            events.push(GameEvent::Lost);
        }
    }
    Ok(())
}

/// Fold one frame's collisions into lives and score, then check for
/// level-end transitions
pub fn apply_outcome(
    world: &mut GameWorld,
    outcome: &FrameOutcome,
) -> Result<Vec<GameEvent>, SimError> {
    let mut events = Vec::new();

    for &id in &outcome.destroyed {
        world.state.score += 1;
        events.push(GameEvent::TargetDestroyed { id });
    }

    if outcome.bonus_collected {
        world.state.lives += 1;
        log::debug!("Bonus collected, lives {}", world.state.lives);
        events.push(GameEvent::BonusCollected {
            lives: world.state.lives,
        });
    }

    if outcome.active_lost {
        world.state.lives = world.state.lives.saturating_sub(1);
        log::debug!("Ball lost, lives {}", world.state.lives);
        events.push(GameEvent::BallLost {
            lives_left: world.state.lives,
        });
        if world.state.lives > 0 {
            apply_transition(world, Transition::Reset, &mut events)?;
        }
    }

    if let Some(transition) = next_transition(&world.state, &world.config) {
        apply_transition(world, transition, &mut events)?;
    }

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;

    fn world() -> GameWorld {
        let config = GameConfig {
            seed: 21,
            bonus_chance: 0.0,
            ..GameConfig::default()
        };
        GameWorld::new(config).unwrap()
    }

    fn lost() -> FrameOutcome {
        FrameOutcome {
            active_lost: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_ball_lost_with_spare_life_resets() {
        let mut world = world();
        world.launch();
        world.active.destroy();

        let events = apply_outcome(&mut world, &lost()).unwrap();
        assert_eq!(world.state.lives, 1);
        assert!(world.active.is_live());
        assert!(!world.state.launched);
        assert_eq!(world.state.phase, GamePhase::Playing);
        assert_eq!(
            events,
            vec![GameEvent::BallLost { lives_left: 1 }, GameEvent::Respawned]
        );
    }

    #[test]
    fn test_last_life_below_bar_loses() {
        let mut world = world();
        world.state.lives = 1;
        world.state.score = 9;
        world.active.destroy();

        let events = apply_outcome(&mut world, &lost()).unwrap();
        assert_eq!(world.state.lives, 0);
        assert_eq!(world.state.phase, GamePhase::Lost);
        assert!(!world.active.is_live());
        assert_eq!(events.last(), Some(&GameEvent::Lost));
    }

    #[test]
    fn test_last_life_above_bar_levels_up() {
        let mut world = world();
        world.state.lives = 1;
        world.state.score = 10;
        world.active.destroy();

        let events = apply_outcome(&mut world, &lost()).unwrap();
        assert_eq!(world.state.level, 2);
        assert_eq!(world.state.lives, 2);
        assert!(world.active.is_live());
        assert_eq!(events.last(), Some(&GameEvent::LevelUp { level: 2 }));
    }

    #[test]
    fn test_last_life_on_final_level_wins() {
        let mut world = world();
        world.state.level = 5;
        world.state.lives = 1;
        world.state.score = 50;
        world.active.destroy();

        apply_outcome(&mut world, &lost()).unwrap();
        assert_eq!(world.state.phase, GamePhase::Won);
        assert!(next_transition(&world.state, &world.config).is_none());
    }

    #[test]
    fn test_full_clear_levels_up_exactly_once() {
        let mut world = world();
        world.state.score = 19;
        let outcome = FrameOutcome {
            destroyed: vec![42],
            ..Default::default()
        };

        let events = apply_outcome(&mut world, &outcome).unwrap();
        assert_eq!(world.state.score, 20);
        assert_eq!(world.state.level, 2);
        assert_eq!(world.state.lives, 2);
        let level_ups = events
            .iter()
            .filter(|e| matches!(e, GameEvent::LevelUp { .. }))
            .count();
        assert_eq!(level_ups, 1);

        // Nothing more to do on the next quiet frame
        let events = apply_outcome(&mut world, &FrameOutcome::default()).unwrap();
        assert!(events.is_empty());
        assert_eq!(world.state.level, 2);
    }

    #[test]
    fn test_full_clear_on_final_level_wins() {
        let mut world = world();
        world.state.level = 5;
        world.state.score = 100;
        assert_eq!(
            next_transition(&world.state, &world.config),
            Some(Transition::Win)
        );
    }

    #[test]
    fn test_score_counts_each_destroyed_target() {
        let mut world = world();
        let outcome = FrameOutcome {
            destroyed: vec![7, 8, 9],
            ..Default::default()
        };
        let events = apply_outcome(&mut world, &outcome).unwrap();
        assert_eq!(world.state.score, 3);
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_bonus_adds_life() {
        let mut world = world();
        let outcome = FrameOutcome {
            bonus_collected: true,
            ..Default::default()
        };
        apply_outcome(&mut world, &outcome).unwrap();
        assert_eq!(world.state.lives, 3);
    }

    #[test]
    fn test_thresholds() {
        let world = world();
        let mut state = world.state.clone();
        assert_eq!(level_threshold(&state, &world.config), 20);
        assert_eq!(half_clear_bar(&state, &world.config), 10);
        state.level = 3;
        assert_eq!(level_threshold(&state, &world.config), 60);
        assert_eq!(half_clear_bar(&state, &world.config), 30);
    }
}
