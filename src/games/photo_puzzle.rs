//! Photo puzzle: a 3x3 sliding-tile puzzle cut from one photo.
//!
//! The board is scrambled by random legal moves from the solved position, so
//! it is always solvable.

use rand::seq::IndexedRandom;
use rand_pcg::Pcg32;

use super::{Choice, GameView, Mark, MiniGame, Step, fork_rng};
use crate::catalog::GameId;
use crate::content::{PHOTOS, Photo};

pub const GRID: usize = 3;
const CELLS: usize = GRID * GRID;
/// Tile number of the gap
const EMPTY: usize = CELLS - 1;
const SHUFFLE_MOVES: usize = 200;
pub const FINISH_DELAY_MS: u32 = 1500;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Playing,
    Solved,
    Done,
}

#[derive(Debug)]
pub struct PhotoPuzzle {
    photo: Option<&'static Photo>,
    /// `tiles[cell]` is the tile currently in `cell`
    tiles: [usize; CELLS],
    empty_cell: usize,
    moves: u32,
    phase: Phase,
}

impl Default for PhotoPuzzle {
    fn default() -> Self {
        Self::new()
    }
}

/// Cells orthogonally adjacent to `cell`
fn neighbors(cell: usize) -> Vec<usize> {
    let (row, col) = (cell / GRID, cell % GRID);
    let mut out = Vec::with_capacity(4);
    if row > 0 {
        out.push(cell - GRID);
    }
    if row + 1 < GRID {
        out.push(cell + GRID);
    }
    if col > 0 {
        out.push(cell - 1);
    }
    if col + 1 < GRID {
        out.push(cell + 1);
    }
    out
}

impl PhotoPuzzle {
    pub fn new() -> Self {
        Self {
            photo: None,
            tiles: std::array::from_fn(|i| i),
            empty_cell: EMPTY,
            moves: 0,
            phase: Phase::Idle,
        }
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn is_solved(&self) -> bool {
        self.tiles.iter().enumerate().all(|(cell, &tile)| cell == tile)
    }

    fn slide(&mut self, cell: usize) {
        self.tiles.swap(cell, self.empty_cell);
        self.empty_cell = cell;
    }

    fn scramble(&mut self, rng: &mut Pcg32) {
        loop {
            for _ in 0..SHUFFLE_MOVES {
                if let Some(&cell) = neighbors(self.empty_cell).choose(rng) {
                    self.slide(cell);
                }
            }
            if !self.is_solved() {
                break;
            }
        }
    }
}

impl MiniGame for PhotoPuzzle {
    fn id(&self) -> GameId {
        GameId::PhotoPuzzle
    }

    fn start(&mut self, rng: &mut Pcg32) {
        let mut rng = fork_rng(rng);
        *self = Self::new();
        self.photo = PHOTOS.choose(&mut rng);
        self.scramble(&mut rng);
        self.phase = Phase::Playing;
    }

    fn reset(&mut self) {
        *self = Self::new();
    }

    fn view(&self) -> GameView {
        let (Some(photo), false) = (self.photo, self.phase == Phase::Idle) else {
            return GameView::default();
        };
        let choices = self
            .tiles
            .iter()
            .map(|&tile| {
                if tile == EMPTY && self.phase == Phase::Playing {
                    return Choice::text("").marked(Mark::Disabled);
                }
                // Offset of this tile's slice within the photo
                let x = (tile % GRID) as f32 * 100.0 / (GRID - 1) as f32;
                let y = (tile / GRID) as f32 * 100.0 / (GRID - 1) as f32;
                let mark = if self.phase == Phase::Playing {
                    Mark::Plain
                } else {
                    Mark::Done
                };
                Choice::photo(photo, (tile + 1).to_string()).marked(mark).at(x, y)
            })
            .collect();
        GameView {
            prompt: format!("Slide the tiles to rebuild \"{}\"", photo.moment),
            image: Some(photo.src),
            status: format!("Moves: {}", self.moves),
            feedback: (self.phase != Phase::Playing).then(|| "Puzzle solved! 🧩".to_string()),
            choices,
        }
    }

    fn choose(&mut self, cell: usize) -> Step {
        if self.phase != Phase::Playing || !neighbors(self.empty_cell).contains(&cell) {
            return Step::Ignored;
        }
        self.slide(cell);
        self.moves += 1;
        if self.is_solved() {
            self.phase = Phase::Solved;
            Step::Wait {
                delay_ms: FINISH_DELAY_MS,
            }
        } else {
            Step::Updated
        }
    }

    fn resume(&mut self) -> Step {
        if self.phase != Phase::Solved {
            return Step::Ignored;
        }
        self.phase = Phase::Done;
        Step::Finished {
            summary: format!("Puzzle solved in {} moves", self.moves),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::testing::rng;

    #[test]
    fn test_neighbors() {
        assert_eq!(neighbors(0), [3, 1]);
        assert_eq!(neighbors(4), [1, 7, 3, 5]);
        assert_eq!(neighbors(8), [5, 7]);
    }

    #[test]
    fn test_start_is_scrambled_permutation() {
        let mut game = PhotoPuzzle::new();
        game.start(&mut rng());
        assert!(!game.is_solved());
        let mut sorted = game.tiles;
        sorted.sort();
        assert_eq!(sorted, std::array::from_fn::<usize, CELLS, _>(|i| i));
        assert_eq!(game.tiles[game.empty_cell], EMPTY);
        assert_eq!(game.moves(), 0);
    }

    #[test]
    fn test_only_adjacent_tiles_slide() {
        let mut game = PhotoPuzzle::new();
        game.start(&mut rng());
        let far = (0..CELLS)
            .find(|c| *c != game.empty_cell && !neighbors(game.empty_cell).contains(c))
            .unwrap();
        assert_eq!(game.choose(far), Step::Ignored);
        assert_eq!(game.choose(game.empty_cell), Step::Ignored);
    }

    #[test]
    fn test_final_slide_finishes() {
        let mut game = PhotoPuzzle::new();
        game.start(&mut rng());
        // One move from solved: the gap sits where tile 7 belongs
        game.tiles = [0, 1, 2, 3, 4, 5, 6, EMPTY, 7];
        game.empty_cell = 7;

        assert_eq!(game.choose(8), Step::Wait { delay_ms: FINISH_DELAY_MS });
        assert!(game.is_solved());
        assert_eq!(game.choose(5), Step::Ignored);
        assert!(matches!(game.resume(), Step::Finished { .. }));
        assert_eq!(game.resume(), Step::Ignored);
    }
}
