//! Board transforms behind the abilities.
//!
//! Every function here takes a board by reference and returns a new board of
//! the same width and height; none of them can fail. Effects that cannot do
//! everything they were asked (too few legal cells, fewer rows than
//! requested) do as much as the board allows and report the count.

use std::collections::VecDeque;

use versus_tetris_core::area::{self, AreaGravity};
use versus_tetris_core::{Board, RandomSource};

pub use versus_tetris_core::area::settle;

/// Push `n` garbage rows in from the bottom. Each new row has exactly one
/// empty column; the top `n` rows are discarded.
pub fn add_junk_rows(board: &Board, n: usize, rng: &mut impl RandomSource) -> Board {
    let (width, height) = (board.width(), board.height());
    let n = n.min(height);
    let mut next = board.clone();
    next.clear();

    for y in n..height {
        for x in 0..width {
            next.set(x as i32, (y - n) as i32, board.row(y)[x]);
        }
    }
    for y in height - n..height {
        let hole = rng.next_int(width as u32) as usize;
        for x in 0..width {
            if x != hole {
                next.set(x as i32, y as i32, Some(rng.choose_kind()));
            }
        }
    }
    next
}

/// Remove the bottom `n` rows and pad the top. Returns the rows removed.
pub fn clear_bottom_rows(board: &Board, n: usize) -> (Board, usize) {
    let (width, height) = (board.width(), board.height());
    let cleared = n.min(height);
    let mut next = board.clone();
    next.clear();

    for y in 0..height - cleared {
        for x in 0..width {
            next.set(x as i32, (y + cleared) as i32, board.row(y)[x]);
        }
    }
    (next, cleared)
}

/// Cross-shaped area clear. Returns the filled cells removed.
pub fn cross_bomb(
    board: &Board,
    cx: i32,
    cy: i32,
    half_width: u32,
    gravity: AreaGravity,
) -> (Board, usize) {
    area::cross_clear(board, cx, cy, half_width, gravity)
}

/// Circular area clear. Returns the filled cells removed.
pub fn circle_bomb(
    board: &Board,
    cx: i32,
    cy: i32,
    radius: f64,
    gravity: AreaGravity,
) -> (Board, usize) {
    area::circle_clear(board, cx, cy, radius, gravity)
}

/// Which empty cells off the bottom row may receive a spawned block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpawnRule {
    /// Next to an existing block (4-neighbourhood)
    Adjacent,
    /// At Manhattan distance two or more from every existing block
    #[default]
    Isolated,
}

/// Fill up to `n` empty cells chosen among the bottom row and the cells the
/// rule allows. Never overwrites. Returns the cells filled.
pub fn random_spawner(
    board: &Board,
    n: usize,
    rule: SpawnRule,
    rng: &mut impl RandomSource,
) -> (Board, usize) {
    let (width, height) = (board.width() as i32, board.height() as i32);
    let filled: Vec<(i32, i32)> = occupied_cells(board).collect();

    let mut candidates: Vec<(i32, i32)> = Vec::new();
    for y in 0..height {
        for x in 0..width {
            if board.is_occupied(x, y) {
                continue;
            }
            let allowed = y == height - 1
                || match rule {
                    SpawnRule::Adjacent => [(0, 1), (0, -1), (1, 0), (-1, 0)]
                        .iter()
                        .any(|&(dx, dy)| board.is_occupied(x + dx, y + dy)),
                    SpawnRule::Isolated => filled
                        .iter()
                        .all(|&(fx, fy)| (fx - x).abs() + (fy - y).abs() >= 2),
                };
            if allowed {
                candidates.push((x, y));
            }
        }
    }

    rng.shuffle(&mut candidates);
    let mut next = board.clone();
    let count = n.min(candidates.len());
    for &(x, y) in &candidates[..count] {
        next.set(x, y, Some(rng.choose_kind()));
    }
    (next, count)
}

/// Remove up to `n` random blocks at or below `safe_zone_row`. Returns the
/// blocks removed, always `min(n, available)`.
pub fn gold_digger(
    board: &Board,
    n: usize,
    safe_zone_row: usize,
    rng: &mut impl RandomSource,
) -> (Board, usize) {
    let mut targets: Vec<(i32, i32)> = occupied_cells(board)
        .filter(|&(_, y)| y as usize >= safe_zone_row)
        .collect();
    rng.shuffle(&mut targets);

    let mut next = board.clone();
    let count = n.min(targets.len());
    for &(x, y) in &targets[..count] {
        next.set(x, y, None);
    }
    (next, count)
}

/// Shift every row one or two cells left or right. Cells pushed past the
/// edge are lost and vacated cells are left empty.
pub fn earthquake(board: &Board, rng: &mut impl RandomSource) -> Board {
    let width = board.width() as i32;
    let mut next = board.clone();
    next.clear();

    for y in 0..board.height() as i32 {
        let left = rng.chance(0.5);
        let amount = 1 + rng.next_int(2) as i32;
        let shift = if left { -amount } else { amount };
        for x in 0..width {
            if let Some(Some(kind)) = board.get(x, y) {
                next.set(x + shift, y, Some(kind));
            }
        }
    }
    next
}

/// Shuffle every block's kind and restack them from the bottom row up,
/// filling each row before starting the next.
pub fn scramble(board: &Board, rng: &mut impl RandomSource) -> Board {
    let mut kinds: Vec<_> = board.cells().iter().flatten().copied().collect();
    rng.shuffle(&mut kinds);

    let width = board.width();
    let height = board.height() as i32;
    let mut next = board.clone();
    next.clear();
    for (i, kind) in kinds.into_iter().enumerate() {
        let x = (i % width) as i32;
        let y = height - 1 - (i / width) as i32;
        next.set(x, y, Some(kind));
    }
    next
}

/// Reverse the row order
pub fn gravity_flip(board: &Board) -> Board {
    let mut rows = board.to_rows();
    rows.reverse();
    let mut next = board.clone();
    for (y, row) in rows.into_iter().enumerate() {
        for (x, cell) in row.into_iter().enumerate() {
            next.set(x as i32, y as i32, cell);
        }
    }
    next
}

/// Fill every empty region that does not touch the board edge
pub fn fill_holes(board: &Board, rng: &mut impl RandomSource) -> Board {
    let (width, height) = (board.width(), board.height());
    let mut visited = vec![false; width * height];
    let mut next = board.clone();
    let mut queue = VecDeque::new();

    for start in 0..width * height {
        if visited[start] || board.cells()[start].is_some() {
            continue;
        }

        let mut region = Vec::new();
        let mut enclosed = true;
        visited[start] = true;
        queue.push_back(start);

        while let Some(idx) = queue.pop_front() {
            region.push(idx);
            let (x, y) = (idx % width, idx / width);
            if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
                enclosed = false;
            }

            let neighbours = [
                (x > 0).then(|| idx - 1),
                (x + 1 < width).then(|| idx + 1),
                (y > 0).then(|| idx - width),
                (y + 1 < height).then(|| idx + width),
            ];
            for n in neighbours.into_iter().flatten() {
                if !visited[n] && board.cells()[n].is_none() {
                    visited[n] = true;
                    queue.push_back(n);
                }
            }
        }

        if enclosed {
            for idx in region {
                next.set((idx % width) as i32, (idx / width) as i32, Some(rng.choose_kind()));
            }
        }
    }
    next
}

/// Toggle the cells on both diagonals rising from the bottom corners.
/// A cell where the diagonals meet is toggled once.
pub fn death_cross(board: &Board, rng: &mut impl RandomSource) -> Board {
    let (width, height) = (board.width(), board.height());
    let steps = width.min(height);
    let mut toggled = vec![false; width * height];
    let mut next = board.clone();

    let diagonal = (0..steps)
        .map(|i| (i, height - 1 - i))
        .chain((0..steps).map(|i| (width - 1 - i, height - 1 - i)));
    for (x, y) in diagonal {
        let idx = y * width + x;
        if toggled[idx] {
            continue;
        }
        toggled[idx] = true;
        let cell = match board.cells()[idx] {
            Some(_) => None,
            None => Some(rng.choose_kind()),
        };
        next.set(x as i32, y as i32, cell);
    }
    next
}

/// Fill up to `count` empty cells of one random column, bottom up
pub fn column_drop(board: &Board, count: usize, rng: &mut impl RandomSource) -> Board {
    let column = rng.next_int(board.width() as u32) as i32;
    let mut next = board.clone();
    let mut placed = 0;
    for y in (0..board.height() as i32).rev() {
        if placed == count {
            break;
        }
        if !board.is_occupied(column, y) {
            next.set(column, y, Some(rng.choose_kind()));
            placed += 1;
        }
    }
    next
}

/// Cross or circle bomb followed by a settle pass
pub fn legacy_bomb(board: &Board, cx: i32, cy: i32, circle: bool) -> (Board, usize) {
    if circle {
        circle_bomb(board, cx, cy, 2.0, AreaGravity::Settle)
    } else {
        cross_bomb(board, cx, cy, 0, AreaGravity::Settle)
    }
}

fn occupied_cells(board: &Board) -> impl Iterator<Item = (i32, i32)> + '_ {
    let width = board.width();
    board
        .cells()
        .iter()
        .enumerate()
        .filter(|(_, c)| c.is_some())
        .map(move |(i, _)| ((i % width) as i32, (i / width) as i32))
}
