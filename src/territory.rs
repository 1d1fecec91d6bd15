use std::collections::VecDeque;
use std::fmt::Display;

use super::inputs::*;
use super::view::*;

#[derive(Copy,Clone,Debug,PartialEq,Eq)]
pub enum Control {
    Contested,
    /// Units from at most one side. `Owner::Neutral` means nobody has units here.
    Uncontested(Owner),
}

/// A maximal 4-connected set of traversable cells
#[derive(Clone,Debug)]
pub struct Territory {
    pub id: usize,
    /// cell indices in ascending (row-major) order
    pub cells: Box<[usize]>,
    pub my_bots: Vec<Bot>,
    pub opp_bots: Vec<Bot>,
    pub control: Control,
}
impl Territory {
    pub fn contains(&self, index: usize) -> bool {
        self.cells.binary_search(&index).is_ok()
    }

    pub fn has_friendly_cell(&self, grid: &Grid) -> bool {
        self.cells.iter().any(|&index| grid.cells[index].owner == Owner::Me)
    }

    fn classify(my_bots: &[Bot], opp_bots: &[Bot]) -> Control {
        // Only cells holding units decide control; claimed but empty cells are ignored
        match (my_bots.is_empty(), opp_bots.is_empty()) {
            (false, false) => Control::Contested,
            (false, true) => Control::Uncontested(Owner::Me),
            (true, false) => Control::Uncontested(Owner::Opponent),
            (true, true) => Control::Uncontested(Owner::Neutral),
        }
    }
}
impl Display for Territory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let control = match self.control {
            Control::Contested => "contested".to_string(),
            Control::Uncontested(owner) => format!("held by {}", owner),
        };
        write!(f, "#{} [{} cells, {} vs {} bots, {}]", self.id, self.cells.len(), self.my_bots.len(), self.opp_bots.len(), control)
    }
}

/// The territories of one snapshot
#[derive(Clone,Debug)]
pub struct Partition {
    pub territories: Box<[Territory]>,
    /// cell -> territory id, None for cells that cannot be walked on
    pub lookup: Box<[Option<usize>]>,
}
impl Partition {
    pub fn generate(grid: &Grid) -> Self {
        let num_cells = grid.num_cells();
        let mut lookup = Vec::new();
        lookup.resize(num_cells, None);

        let mut members: Vec<Vec<usize>> = Vec::new();
        let mut queue = VecDeque::new();
        for start in 0..num_cells {
            if lookup[start].is_some() || !grid.cells[start].is_traversable() { continue }

            let id = members.len();
            let mut cells = Vec::new();
            lookup[start] = Some(id);
            queue.push_back(start);

            while let Some(current) = queue.pop_front() {
                cells.push(current);
                for neighbor in grid.neighbors(current) {
                    if lookup[neighbor].is_some() || !grid.cells[neighbor].is_traversable() { continue }

                    lookup[neighbor] = Some(id);
                    queue.push_back(neighbor);
                }
            }

            cells.sort_unstable();
            members.push(cells);
        }

        let mut my_bots: Vec<Vec<Bot>> = vec![Vec::new(); members.len()];
        let mut opp_bots: Vec<Vec<Bot>> = vec![Vec::new(); members.len()];
        for (bots, per_territory) in [(&grid.my_bots, &mut my_bots), (&grid.opp_bots, &mut opp_bots)] {
            for bot in bots.iter() {
                let territory = grid.index_of(bot.pos).and_then(|index| lookup[index]);
                if let Some(id) = territory {
                    per_territory[id].push(*bot);
                }
            }
        }

        let territories: Vec<Territory> =
            members.into_iter().zip(my_bots.into_iter().zip(opp_bots.into_iter()))
            .enumerate()
            .map(|(id, (cells, (my_bots, opp_bots)))| Territory {
                id,
                cells: cells.into_boxed_slice(),
                control: Territory::classify(&my_bots, &opp_bots),
                my_bots,
                opp_bots,
            }).collect();

        Self {
            territories: territories.into_boxed_slice(),
            lookup: lookup.into_boxed_slice(),
        }
    }

    pub fn num_contested(&self) -> usize {
        self.territories.iter().filter(|t| t.control == Control::Contested).count()
    }
}

/// Computes the partition at most once per snapshot
#[derive(Debug,Default)]
pub struct TerritoryAnalyzer {
    cache: Option<Partition>,
    num_computations: u32,
}
impl TerritoryAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn partition(&mut self, grid: &Grid) -> &Partition {
        if self.cache.is_none() {
            self.num_computations += 1;
        }
        self.cache.get_or_insert_with(|| Partition::generate(grid))
    }

    /// Forget the cached partition, for when a new snapshot arrives
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    pub fn num_computations(&self) -> u32 {
        self.num_computations
    }
}
