use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::grid::{Grid, WIN_TILE, spawn_tile};
use crate::storage::{HighScore, MemoryStore, ScoreStore};
use crate::types::{Direction, GameState, GameView, MoveOutcome};

/// Fresh game: empty grid plus two spawned tiles.
pub fn new_game<R: Rng + ?Sized>(rng: &mut R) -> GameState {
    let grid = spawn_tile(&Grid::empty(), rng);
    let grid = spawn_tile(&grid, rng);

    GameState {
        grid,
        score: 0,
        game_over: false,
        won: false,
    }
}

/// Applies one directional input.
///
/// Contract:
/// - Rejected inputs (finished game without `keep_playing`, or a slide that
///   changes nothing) return `state` unchanged and a default outcome.
/// - Accepted inputs spawn exactly one tile when a cell is free, add the
///   merge score, and re-evaluate `won` and `game_over`.
pub fn apply_move<R: Rng + ?Sized>(
    state: &GameState,
    direction: Direction,
    keep_playing: bool,
    rng: &mut R,
) -> (GameState, MoveOutcome) {
    if state.game_over && !keep_playing {
        return (*state, MoveOutcome::default());
    }

    let slide = state.grid.slide(direction);
    if !slide.moved {
        return (*state, MoveOutcome::default());
    }

    let grid = spawn_tile(&slide.grid, rng);
    let just_won = !state.won && grid.contains(WIN_TILE);
    let next = GameState {
        grid,
        score: state.score.saturating_add(slide.score),
        game_over: grid.is_terminal(),
        won: state.won || just_won,
    };

    (
        next,
        MoveOutcome {
            moved: true,
            score_gained: slide.score,
            just_won,
        },
    )
}

/// A running session: current game, RNG, keep-playing flag and high score.
pub struct GameInstance {
    state: GameState,
    pub keep_playing: bool,
    last: MoveOutcome,
    high_score: HighScore,
    rng: StdRng,
}

impl GameInstance {
    pub fn new(seed: u64, store: Box<dyn ScoreStore>) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        Self {
            state: new_game(&mut rng),
            keep_playing: false,
            last: MoveOutcome::default(),
            high_score: HighScore::load(store),
            rng,
        }
    }

    pub fn new_with_memory_store(seed: u64) -> Self {
        Self::new(seed, Box::new(MemoryStore::new()))
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn high_score(&self) -> u32 {
        self.high_score.best()
    }

    pub fn last_outcome(&self) -> MoveOutcome {
        self.last
    }

    pub fn play(&mut self, direction: Direction) -> MoveOutcome {
        let (next, outcome) =
            apply_move(&self.state, direction, self.keep_playing, &mut self.rng);
        self.state = next;
        self.last = outcome;

        if outcome.moved {
            self.high_score.observe(self.state.score);
        }

        outcome
    }

    /// Starts over. The high score is kept; keep-playing is cleared.
    pub fn reset(&mut self) {
        self.state = new_game(&mut self.rng);
        self.keep_playing = false;
        self.last = MoveOutcome::default();
    }

    pub fn to_view(&self) -> GameView {
        GameView {
            grid: self.state.grid,
            score: self.state.score,
            high_score: self.high_score.best(),
            game_over: self.state.game_over,
            won: self.state.won,
            keep_playing: self.keep_playing,
            moved: self.last.moved,
            score_gained: self.last.score_gained,
            just_won: self.last.just_won,
        }
    }

    #[cfg(test)]
    fn set_state_for_test(&mut self, state: GameState) {
        self.state = state;
        self.last = MoveOutcome::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::SIZE;
    use crate::storage::record;

    fn state_with(rows: [[u32; SIZE]; SIZE]) -> GameState {
        GameState {
            grid: Grid::from_rows(rows),
            score: 0,
            game_over: false,
            won: false,
        }
    }

    fn checkerboard_rows() -> [[u32; SIZE]; SIZE] {
        [[2, 4, 2, 4], [4, 2, 4, 2], [2, 4, 2, 4], [4, 2, 4, 2]]
    }

    #[test]
    fn new_game_has_two_small_tiles_and_clean_flags() {
        let mut rng = StdRng::seed_from_u64(1);
        let state = new_game(&mut rng);

        assert_eq!(state.grid.tile_count(), 2);
        assert!(state.grid.max_tile() <= 4);
        assert_eq!(state.score, 0);
        assert!(!state.game_over);
        assert!(!state.won);
    }

    #[test]
    fn blocked_direction_leaves_state_unchanged() {
        let mut rng = StdRng::seed_from_u64(3);
        let state = state_with([[2, 4, 0, 0], [8, 0, 0, 0], [0; SIZE], [0; SIZE]]);

        let (next, outcome) = apply_move(&state, Direction::Left, false, &mut rng);

        assert_eq!(next, state);
        assert_eq!(outcome, MoveOutcome::default());
    }

    #[test]
    fn accepted_move_spawns_one_tile_and_adds_score() {
        let mut rng = StdRng::seed_from_u64(5);
        let state = state_with([[0, 2, 2, 4], [0; SIZE], [0; SIZE], [0; SIZE]]);

        let (next, outcome) = apply_move(&state, Direction::Left, false, &mut rng);

        assert!(outcome.moved);
        assert_eq!(outcome.score_gained, 4);
        assert_eq!(next.score, 4);
        assert_eq!(next.grid.rows()[0][..2], [4, 4]);
        // Two tiles after the merge, plus one spawn.
        assert_eq!(next.grid.tile_count(), 3);
    }

    #[test]
    fn first_2048_sets_won_once() {
        let mut rng = StdRng::seed_from_u64(9);
        let state = state_with([[1024, 1024, 0, 0], [0; SIZE], [0; SIZE], [0; SIZE]]);

        let (won_state, outcome) = apply_move(&state, Direction::Left, false, &mut rng);
        assert!(outcome.just_won);
        assert!(won_state.won);
        assert_eq!(won_state.score, 2048);

        let (later, outcome) = apply_move(&won_state, Direction::Right, false, &mut rng);
        assert!(outcome.moved);
        assert!(later.grid.contains(WIN_TILE));
        assert!(!outcome.just_won);
        assert!(later.won, "won stays set for the rest of the game");
    }

    #[test]
    fn move_into_terminal_board_sets_game_over() {
        let mut rng = StdRng::seed_from_u64(0);
        // The slide frees only (0, 3). Its neighbours 8 and 32 cannot match a spawned 2 or 4.
        let state = state_with([
            [0, 2, 4, 8],
            [4, 8, 16, 32],
            [2, 4, 8, 16],
            [4, 8, 16, 32],
        ]);

        let (next, outcome) = apply_move(&state, Direction::Left, false, &mut rng);

        assert!(outcome.moved);
        assert_eq!(next.grid.rows()[0][..3], [2, 4, 8]);
        assert!(matches!(next.grid.get(0, 3), 2 | 4));
        assert!(next.game_over);
    }

    #[test]
    fn game_over_rejects_input_unless_continuing() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut state = state_with(checkerboard_rows());
        state.game_over = true;

        for direction in Direction::ALL {
            let (next, outcome) = apply_move(&state, direction, false, &mut rng);
            assert_eq!(next, state);
            assert!(!outcome.moved);

            let (next, _) = apply_move(&state, direction, true, &mut rng);
            assert_eq!(next, state, "a locked board cannot move either way");
        }
    }

    #[test]
    fn score_never_decreases_over_random_play() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut state = new_game(&mut rng);

        for step in 0..500 {
            let direction = Direction::ALL[rng.gen_range(0..4)];
            let before = state;
            let (next, outcome) = apply_move(&state, direction, false, &mut rng);

            assert!(next.score >= before.score, "score dropped at step {step}");
            if outcome.moved {
                assert_eq!(next.score, before.score + outcome.score_gained);
                let slid = before.grid.slide(direction).grid;
                assert_eq!(next.grid.tile_count(), slid.tile_count() + 1);
            } else {
                assert_eq!(next, before);
            }
            if next.game_over {
                break;
            }
            state = next;
        }
    }

    #[test]
    fn instance_tracks_high_score_in_store() {
        let store = MemoryStore::with_record(&record::encode(2));
        let mut game = GameInstance::new(4, Box::new(store.clone()));
        game.set_state_for_test(state_with([[2, 2, 0, 0], [0; SIZE], [0; SIZE], [0; SIZE]]));

        let outcome = game.play(Direction::Left);

        assert!(outcome.moved);
        assert_eq!(game.state().score, 4);
        assert_eq!(game.high_score(), 4);
        assert_eq!(store.record(), Some(record::encode(4)));
    }

    #[test]
    fn instance_keeps_high_score_across_reset() {
        let mut game = GameInstance::new_with_memory_store(8);
        game.set_state_for_test(state_with([[8, 8, 0, 0], [0; SIZE], [0; SIZE], [0; SIZE]]));
        game.play(Direction::Right);
        game.keep_playing = true;

        game.reset();

        assert_eq!(game.state().score, 0);
        assert_eq!(game.state().grid.tile_count(), 2);
        assert_eq!(game.high_score(), 16);
        assert!(!game.keep_playing);
        assert_eq!(game.last_outcome(), MoveOutcome::default());
    }

    #[test]
    fn view_reflects_last_outcome() {
        let mut game = GameInstance::new_with_memory_store(6);
        let rows = [[1024, 1024, 0, 0], [0; SIZE], [0; SIZE], [0; SIZE]];
        game.set_state_for_test(state_with(rows));

        game.play(Direction::Left);
        let view = game.to_view();

        assert!(view.moved);
        assert!(view.won);
        assert!(view.just_won);
        assert_eq!(view.score_gained, 2048);
        assert_eq!(view.high_score, 2048);

        game.play(Direction::Up);
        game.play(Direction::Down);
        assert!(!game.to_view().just_won);
    }

    #[test]
    fn same_seed_replays_same_game() {
        let mut a = GameInstance::new_with_memory_store(77);
        let mut b = GameInstance::new_with_memory_store(77);

        for direction in [Direction::Left, Direction::Up, Direction::Right, Direction::Down] {
            a.play(direction);
            b.play(direction);
        }

        assert_eq!(a.state(), b.state());
    }
}
