//! Step/reset environment around a [`Puzzle`].

use std::collections::BTreeMap;

use log::debug;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::config::{Encoding, EnvConfig};
use crate::error::Result;
use crate::permutation::random_permutation;
use crate::puzzle::{Move, Puzzle};
use crate::solvability::is_solvable;

/// Half of all draws are solvable, so hitting this means the RNG is broken.
const MAX_SCRAMBLE_DRAWS: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    Grid(Vec<Vec<u32>>),
    OneHot(Vec<u8>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepInfo {
    /// False when an out-of-bounds move was ignored.
    pub moved: bool,
    pub blank: (usize, usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step<O> {
    pub observation: O,
    pub reward: i32,
    pub done: bool,
    pub info: StepInfo,
}

/// Capabilities a puzzle simulation exposes to its callers.
pub trait Environment {
    type Action;
    type State;
    type Observation;

    /// Installs a fresh solvable scramble and returns its observation.
    fn reset(&mut self) -> Self::Observation;

    fn step(&mut self, action: Self::Action) -> Result<Step<Self::Observation>>;

    fn action_count(&self) -> usize;

    fn is_solved(&self) -> bool;

    fn to_permutation(&self) -> Vec<u32>;

    fn to_one_hot(&self) -> Vec<u8>;

    fn neighbors(&self) -> BTreeMap<Self::Action, Self::State>;
}

#[derive(Debug)]
pub struct TileEnv {
    puzzle: Puzzle,
    config: EnvConfig,
    rng: StdRng,
}

impl TileEnv {
    /// A scrambled, solvable environment with default options.
    pub fn create(size: usize) -> Result<Self> {
        Self::new(size, EnvConfig::default())
    }

    pub fn new(size: usize, config: EnvConfig) -> Result<Self> {
        let mut env = Self {
            puzzle: Puzzle::new(size)?,
            rng: rng_for(&config),
            config,
        };
        env.reset();
        Ok(env)
    }

    /// Exactly the given board; no scramble and no solvability check.
    pub fn from_permutation(values: &[u32], config: EnvConfig) -> Result<Self> {
        Ok(Self {
            puzzle: Puzzle::from_permutation(values)?,
            rng: rng_for(&config),
            config,
        })
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn size(&self) -> usize {
        self.puzzle.size()
    }

    pub fn observe(&self) -> Observation {
        match self.config.encoding {
            Encoding::Grid => Observation::Grid(self.puzzle.grid().to_vec()),
            Encoding::OneHot => Observation::OneHot(self.puzzle.to_one_hot()),
        }
    }

    /// Scrambles by sliding the blank `moves` times from the solved board,
    /// never undoing the previous slide.
    pub fn scramble_by_walk(&mut self, moves: usize) -> Observation {
        let size = self.puzzle.size();
        let identity: Vec<u32> = (1..=(size * size) as u32).collect();
        self.puzzle.install(&identity);

        let mut last: Option<Move> = None;
        for _ in 0..moves {
            let choices: Vec<Move> = self
                .puzzle
                .legal_moves()
                .into_iter()
                .filter(|dir| last.map_or(true, |prev| *dir != prev.opposite()))
                .collect();
            let Some(&dir) = choices.choose(&mut self.rng) else {
                break;
            };
            if let Some(next) = self.puzzle.try_move(dir) {
                self.puzzle = next;
                last = Some(dir);
            }
        }

        debug!("random walk of {moves} slides from solved");
        self.observe()
    }

    pub fn render(&self) -> String {
        self.puzzle.to_string()
    }
}

impl Environment for TileEnv {
    type Action = Move;
    type State = Puzzle;
    type Observation = Observation;

    fn reset(&mut self) -> Observation {
        let size = self.puzzle.size();
        let mut attempts = 0;
        let values = loop {
            attempts += 1;
            debug_assert!(
                attempts <= MAX_SCRAMBLE_DRAWS,
                "no solvable {size}x{size} scramble after {MAX_SCRAMBLE_DRAWS} draws"
            );
            let candidate = random_permutation(size * size, &mut self.rng);
            if is_solvable(&candidate, size) {
                break candidate;
            }
        };

        self.puzzle.install(&values);
        debug!("scrambled {size}x{size} board after {attempts} draw(s)");
        self.observe()
    }

    fn step(&mut self, action: Move) -> Result<Step<Observation>> {
        let moved = self.puzzle.apply_move(action, self.config.out_of_bounds)?;
        let done = self.puzzle.is_solved();
        Ok(Step {
            observation: self.observe(),
            reward: self.config.reward.reward(done),
            done,
            info: StepInfo {
                moved,
                blank: self.puzzle.blank(),
            },
        })
    }

    fn action_count(&self) -> usize {
        Move::ALL.len()
    }

    fn is_solved(&self) -> bool {
        self.puzzle.is_solved()
    }

    fn to_permutation(&self) -> Vec<u32> {
        self.puzzle.to_permutation()
    }

    fn to_one_hot(&self) -> Vec<u8> {
        self.puzzle.to_one_hot()
    }

    fn neighbors(&self) -> BTreeMap<Move, Puzzle> {
        self.puzzle.neighbors()
    }
}

fn rng_for(config: &EnvConfig) -> StdRng {
    match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OutOfBoundsPolicy, RewardScheme};
    use crate::error::Error;

    fn seeded(seed: u64) -> EnvConfig {
        EnvConfig {
            seed: Some(seed),
            ..EnvConfig::default()
        }
    }

    #[test]
    fn create_rejects_zero_size() {
        assert!(matches!(TileEnv::create(0), Err(Error::InvalidSize { size: 0 })));
    }

    #[test]
    fn same_seed_same_scramble() {
        let a = TileEnv::new(4, seeded(99)).unwrap();
        let b = TileEnv::new(4, seeded(99)).unwrap();
        assert_eq!(a.to_permutation(), b.to_permutation());
    }

    #[test]
    fn reset_installs_a_consistent_solvable_board() {
        let mut env = TileEnv::new(3, seeded(3)).unwrap();
        for _ in 0..20 {
            let Observation::Grid(grid) = env.reset() else {
                panic!("grid encoding expected");
            };
            assert_eq!(grid, env.puzzle().grid());
            assert!(env.puzzle().is_solvable());
            assert!(env.puzzle().verify_blank().is_ok());
        }
    }

    #[test]
    fn ignored_move_still_reports_reward_and_done() {
        let identity: Vec<u32> = (1..=4).collect();
        let mut env = TileEnv::from_permutation(&identity, EnvConfig::default()).unwrap();
        let step = env.step(Move::Down).unwrap();
        assert!(!step.info.moved);
        assert!(step.done);
        assert_eq!(step.reward, 1);
        assert_eq!(step.info.blank, (1, 1));
    }

    #[test]
    fn strict_policy_fails_out_of_bounds() {
        let config = EnvConfig {
            out_of_bounds: OutOfBoundsPolicy::Strict,
            ..EnvConfig::default()
        };
        let mut env = TileEnv::from_permutation(&[1, 2, 3, 4], config).unwrap();
        assert!(matches!(env.step(Move::Right), Err(Error::OutOfBounds { .. })));
        assert!(env.is_solved());
    }

    #[test]
    fn penalty_reward_until_solved() {
        let config = EnvConfig {
            reward: RewardScheme::Penalty,
            ..EnvConfig::default()
        };
        // blank one slide left of home
        let mut env = TileEnv::from_permutation(&[1, 2, 4, 3], config).unwrap();
        let away = env.step(Move::Up).unwrap();
        assert_eq!((away.reward, away.done), (-1, false));
        let back = env.step(Move::Down).unwrap();
        assert_eq!((back.reward, back.done), (-1, false));
        let home = env.step(Move::Right).unwrap();
        assert_eq!((home.reward, home.done), (1, true));
    }

    #[test]
    fn one_hot_observation() {
        let config = EnvConfig {
            encoding: Encoding::OneHot,
            ..EnvConfig::default()
        };
        let env = TileEnv::from_permutation(&[1, 2, 3, 4], config).unwrap();
        assert_eq!(
            env.observe(),
            Observation::OneHot(vec![1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1])
        );
    }

    #[test]
    fn random_walk_scramble_is_solvable() {
        let mut env = TileEnv::new(4, seeded(5)).unwrap();
        for moves in [0, 1, 7, 200] {
            env.scramble_by_walk(moves);
            assert!(env.puzzle().is_solvable());
        }
        env.scramble_by_walk(0);
        assert!(env.is_solved());
    }

    #[test]
    fn four_actions() {
        let env = TileEnv::create(2).unwrap();
        assert_eq!(env.action_count(), 4);
    }
}
