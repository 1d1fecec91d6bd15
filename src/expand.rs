use std::collections::BTreeMap;
use std::fmt::Display;

use tracing::debug;

use super::config::PlannerConfig;
use super::inputs::*;
use super::ledger::*;
use super::territory::Territory;
use super::tiebreak::TieBreak;
use super::view::*;

/// Which way is forward. Fixed for the whole game once the starting side is known.
#[derive(Copy,Clone,Debug,PartialEq,Eq)]
pub struct Heading {
    pub dx: i32,
    pub dy: i32,
}
impl Heading {
    /// Head away from whichever half of each axis our units start in
    pub fn from_start(grid: &Grid) -> Option<Self> {
        let num_bots = grid.my_bots.len() as i32;
        if num_bots <= 0 { return None }

        let sum_x: i32 = grid.my_bots.iter().map(|bot| bot.pos.x).sum();
        let sum_y: i32 = grid.my_bots.iter().map(|bot| bot.pos.y).sum();

        // compare mean * 2 against (size - 1) to stay in integers
        let dx = if 2 * sum_x < (grid.width - 1) * num_bots { 1 } else { -1 };
        let dy = if 2 * sum_y < (grid.height - 1) * num_bots { 1 } else { -1 };
        Some(Self { dx, dy })
    }
}
impl Display for Heading {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:+},{:+}", self.dx, self.dy)
    }
}

#[derive(Copy,Clone,Debug,PartialEq,Eq)]
pub enum ScanAxis {
    /// lines are rows and units push along x
    Rows,
    /// lines are columns and units push along y
    Columns,
}
impl ScanAxis {
    pub fn flipped(self) -> Self {
        match self {
            ScanAxis::Rows => ScanAxis::Columns,
            ScanAxis::Columns => ScanAxis::Rows,
        }
    }
}

/// Heading and axis together: everything needed to talk about lines, forward and sideways
#[derive(Copy,Clone,Debug,PartialEq,Eq)]
pub struct Frame {
    pub heading: Heading,
    pub axis: ScanAxis,
}
impl Frame {
    pub fn line_of(&self, pos: Position) -> i32 {
        match self.axis {
            ScanAxis::Rows => pos.y,
            ScanAxis::Columns => pos.x,
        }
    }

    /// Larger means further ahead
    pub fn progress(&self, pos: Position) -> i32 {
        match self.axis {
            ScanAxis::Rows => pos.x * self.heading.dx,
            ScanAxis::Columns => pos.y * self.heading.dy,
        }
    }

    pub fn ahead(&self, pos: Position) -> Position {
        match self.axis {
            ScanAxis::Rows => pos.offset(self.heading.dx, 0),
            ScanAxis::Columns => pos.offset(0, self.heading.dy),
        }
    }

    /// One step across lines, side is -1 or +1
    pub fn beside(&self, pos: Position, side: i32) -> Position {
        match self.axis {
            ScanAxis::Rows => pos.offset(0, side),
            ScanAxis::Columns => pos.offset(side, 0),
        }
    }

    /// The cross-line direction that points at the opponent, used when both sides are equally sparse
    fn default_side(&self) -> i32 {
        match self.axis {
            ScanAxis::Rows => self.heading.dy,
            ScanAxis::Columns => self.heading.dx,
        }
    }
}

/// Friendly units of one territory grouped by line, in ascending line order
struct Lines {
    members: BTreeMap<i32, Vec<usize>>,
}
impl Lines {
    fn new(bots: &[Bot], frame: &Frame) -> Self {
        let mut members: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
        for (index, bot) in bots.iter().enumerate() {
            members.entry(frame.line_of(bot.pos)).or_default().push(index);
        }
        Self { members }
    }

    fn count_before(&self, line: i32) -> usize {
        self.members.range(..line).count()
    }

    fn count_after(&self, line: i32) -> usize {
        self.members.range(line + 1..).count()
    }

    /// Index of the bot furthest ahead on the line, the first one found wins ties
    fn leader(&self, line: i32, bots: &[Bot], frame: &Frame) -> Option<usize> {
        let mut leader: Option<usize> = None;
        for &index in self.members.get(&line)?.iter() {
            let is_further = match leader {
                Some(current) => frame.progress(bots[index].pos) > frame.progress(bots[current].pos),
                None => true,
            };
            if is_further {
                leader = Some(index);
            }
        }
        leader
    }
}

pub struct Expander<'a> {
    territory: &'a Territory,
    frame: Frame,
    config: &'a PlannerConfig,
}
impl<'a> Expander<'a> {
    pub fn new(territory: &'a Territory, frame: Frame, config: &'a PlannerConfig) -> Self {
        Self { territory, frame, config }
    }

    /// Blockers first, then movement, then reinforcements, so each phase sees the matter and cells the previous one left
    pub fn plan(&self, grid: &mut Grid, ledger: &mut Ledger, tie_break: &mut TieBreak) {
        if self.config.defensive_builds {
            self.build_blockers(grid, ledger);
        }

        let lines = Lines::new(&self.territory.my_bots, &self.frame);
        self.advance(&lines, grid, ledger, tie_break);

        if self.config.reinforce_frontier {
            self.reinforce_weakest_line(&lines, grid, ledger);
            self.top_up_frontier(grid, ledger);
        }
    }

    /// Put a recycler on every empty friendly cell an enemy could step onto
    fn build_blockers(&self, grid: &mut Grid, ledger: &mut Ledger) {
        let mut seen: Vec<Position> = Vec::new();
        for enemy in self.territory.opp_bots.iter() {
            if seen.contains(&enemy.pos) { continue } // stacked units share a cell
            seen.push(enemy.pos);

            let index = match grid.index_of(enemy.pos) {
                Some(index) => index,
                None => continue,
            };
            let neighbors: Vec<usize> = grid.neighbors(index).collect();
            for neighbor in neighbors {
                let cell = &grid.cells[neighbor];
                if cell.owner != Owner::Me || !cell.can_build || cell.recycler || cell.units > 0 { continue }

                let at = cell.pos;
                match ledger.submit_if_affordable(Action::Build { at }, grid) {
                    Outcome::Dropped(DropReason::Unaffordable) => return,
                    outcome => debug!(territory = self.territory.id, %at, ?outcome, "blocking recycler"),
                }
            }
        }
    }

    fn advance(&self, lines: &Lines, grid: &mut Grid, ledger: &mut Ledger, tie_break: &mut TieBreak) {
        let bots = &self.territory.my_bots;
        let mut moves: Vec<(Position, Position, i32)> = Vec::new();

        for (&line, members) in lines.members.iter() {
            let leader = match lines.leader(line, bots, &self.frame) {
                Some(leader) => leader,
                None => continue,
            };

            let followers = members.iter().copied().filter(|&index| index != leader);
            for index in std::iter::once(leader).chain(followers) {
                let from = bots[index].pos;
                let to = match self.next_step(from, line, lines, grid, tie_break) {
                    Some(to) if to != from => to,
                    _ => continue, // nowhere left to go
                };

                match moves.iter_mut().find(|(f, t, _)| *f == from && *t == to) {
                    Some((_, _, count)) => *count += 1,
                    None => moves.push((from, to, 1)),
                }
            }
        }

        for (from, to, count) in moves {
            let outcome = ledger.submit(Action::Move { from, to, count }, grid);
            debug!(territory = self.territory.id, %from, %to, count, ?outcome, "advance");
        }
    }

    /// Straight ahead, else sideways towards the sparser side, else the nearest cell we do not own yet
    fn next_step(&self, from: Position, line: i32, lines: &Lines, grid: &Grid, tie_break: &mut TieBreak) -> Option<Position> {
        let ahead = self.frame.ahead(from);
        if Self::is_open(ahead, grid) { return Some(ahead) }

        let before = lines.count_before(line);
        let after = lines.count_after(line);
        let preferred =
            if before < after { -1 }
            else if after < before { 1 }
            else { self.frame.default_side() };

        for side in [preferred, -preferred] {
            let beside = self.frame.beside(from, side);
            if Self::is_open(beside, grid) { return Some(beside) }
        }

        self.nearest_unclaimed(from, grid, tie_break)
    }

    /// Direct Manhattan search, walls in between are not considered
    fn nearest_unclaimed(&self, from: Position, grid: &Grid, tie_break: &mut TieBreak) -> Option<Position> {
        let candidates = self.territory.cells.iter()
            .map(|&index| &grid.cells[index])
            .filter(|cell| cell.is_safe() && cell.owner != Owner::Me)
            .map(|cell| cell.pos);
        tie_break.min_by_key(candidates, |pos| from.distance(*pos))
    }

    /// Unclaimed ground that will not decay under the unit
    fn is_open(pos: Position, grid: &Grid) -> bool {
        match grid.cell_at(pos) {
            Some(cell) => cell.is_safe() && cell.owner != Owner::Me,
            None => false,
        }
    }

    /// Hold and reinforce the line where the opponent outnumbers us the most
    fn reinforce_weakest_line(&self, lines: &Lines, grid: &mut Grid, ledger: &mut Ledger) {
        let mut weakest: Option<(i32, i32)> = None;
        for &line in lines.members.keys() {
            let mine = lines.members[&line].len() as i32;
            let theirs = self.territory.opp_bots.iter().filter(|bot| self.frame.line_of(bot.pos) == line).count() as i32;
            let balance = mine - theirs;
            if weakest.map_or(true, |(_, lowest)| balance < lowest) {
                weakest = Some((line, balance));
            }
        }

        let (line, balance) = match weakest {
            Some(weakest) => weakest,
            None => return,
        };
        if balance >= 0 { return } // not outnumbered anywhere

        let at = match lines.leader(line, &self.territory.my_bots, &self.frame) {
            Some(leader) => self.territory.my_bots[leader].pos,
            None => return,
        };
        let can_spawn = grid.cell_at(at).map_or(false, |cell| cell.can_spawn);
        if !can_spawn || ledger.matter() < SPAWN_COST { return }

        let outcome = ledger.submit_replacing_move(at, 1, grid);
        debug!(territory = self.territory.id, line, balance, %at, ?outcome, "reinforce line");
    }

    /// Spawn on empty friendly cells whose forward neighbour is still open ground
    fn top_up_frontier(&self, grid: &mut Grid, ledger: &mut Ledger) {
        for &index in self.territory.cells.iter() {
            let cell = &grid.cells[index];
            if cell.owner != Owner::Me || cell.units > 0 || !cell.can_spawn || cell.recycler { continue }

            let at = cell.pos;
            let forward = self.frame.ahead(at);
            let is_frontier = grid.cell_at(forward).map_or(false, |ahead| ahead.is_traversable() && ahead.owner != Owner::Me);
            if !is_frontier || ledger.has_spawn_at(at) { continue }

            match ledger.submit_if_affordable(Action::Spawn { at, count: 1 }, grid) {
                Outcome::Dropped(DropReason::Unaffordable) => return,
                outcome => debug!(territory = self.territory.id, %at, ?outcome, "frontier top-up"),
            }
        }
    }
}
