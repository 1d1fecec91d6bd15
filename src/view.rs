use super::inputs::*;

/// The per-turn snapshot of the board plus some values derived from it.
/// Rebuilt from scratch every turn; the only in-turn edit is `mark_recycler`.
#[derive(Clone,Debug)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    pub my_matter: i32,
    pub opp_matter: i32,

    /// row-major, index = y * width + x
    pub cells: Box<[Cell]>,

    pub my_bots: Vec<Bot>,
    pub opp_bots: Vec<Bot>,
}
impl Grid {
    pub fn new(width: i32, height: i32, my_matter: i32, opp_matter: i32, cells: Vec<Cell>) -> Self {
        let mut my_bots = Vec::new();
        let mut opp_bots = Vec::new();
        for cell in cells.iter() {
            let bots = match cell.owner {
                Owner::Me => &mut my_bots,
                Owner::Opponent => &mut opp_bots,
                Owner::Neutral => continue, // neutral cells never hold units
            };
            for _ in 0..cell.units {
                bots.push(Bot { pos: cell.pos, owner: cell.owner });
            }
        }

        Self {
            width,
            height,
            my_matter,
            opp_matter,
            cells: cells.into_boxed_slice(),
            my_bots,
            opp_bots,
        }
    }

    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.width && pos.y < self.height
    }

    pub fn index_of(&self, pos: Position) -> Option<usize> {
        if !self.contains(pos) { return None }
        Some((pos.y * self.width + pos.x) as usize)
    }

    pub fn cell_at(&self, pos: Position) -> Option<&Cell> {
        self.index_of(pos).map(|index| &self.cells[index])
    }

    pub fn is_traversable(&self, pos: Position) -> bool {
        self.cell_at(pos).map_or(false, |cell| cell.is_traversable())
    }

    /// Indices of the in-bounds 4-neighbours of a cell
    pub fn neighbors(&self, index: usize) -> impl Iterator<Item=usize> + '_ {
        let pos = self.cells[index].pos;
        [(0, -1), (1, 0), (0, 1), (-1, 0)].into_iter()
            .filter_map(move |(dx, dy)| self.index_of(pos.offset(dx, dy)))
    }

    /// Reflect a recycler queued this turn so that later planning sees the cell as blocked.
    /// Returns false if the position is off the board.
    pub fn mark_recycler(&mut self, pos: Position) -> bool {
        let index = match self.index_of(pos) {
            Some(index) => index,
            None => return false,
        };

        let cell = &mut self.cells[index];
        cell.recycler = true;
        cell.can_build = false;
        cell.can_spawn = false;
        cell.in_range_of_recycler = true;
        true
    }
}
