use tracing::debug;

use super::inputs::*;
use super::ledger::*;
use super::territory::Territory;
use super::tiebreak::TieBreak;
use super::view::*;

#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub struct Assignment {
    pub source: Position,
    pub sink: Position,
}

/// Fill a territory nobody is fighting over: one unit per unclaimed cell, closest pairs first
pub fn plan(territory: &Territory, grid: &mut Grid, ledger: &mut Ledger, tie_break: &mut TieBreak) {
    if territory.my_bots.is_empty() {
        reseed(territory, grid, ledger);
    }

    let assignments = assign_units(territory, grid, tie_break);
    let mut moves: Vec<(Position, Position, i32)> = Vec::new();
    for assignment in assignments {
        match moves.iter_mut().find(|(from, to, _)| *from == assignment.source && *to == assignment.sink) {
            Some((_, _, count)) => *count += 1,
            None => moves.push((assignment.source, assignment.sink, 1)),
        }
    }
    for (from, to, count) in moves {
        let outcome = ledger.submit(Action::Move { from, to, count }, grid);
        debug!(territory = territory.id, %from, %to, count, ?outcome, "consolidate move");
    }

    fill_empty_cells(territory, grid, ledger);
}

/// Greedy closest-pair matching. Each unit and each cell is used at most once; spare units stay idle.
pub fn assign_units(territory: &Territory, grid: &Grid, tie_break: &mut TieBreak) -> Vec<Assignment> {
    let mut sources: Vec<Position> = territory.my_bots.iter().map(|bot| bot.pos).collect();
    let mut sinks: Vec<Position> =
        territory.cells.iter()
        .map(|&index| &grid.cells[index])
        .filter(|cell| cell.is_safe() && cell.owner != Owner::Me)
        .map(|cell| cell.pos)
        .collect();

    let mut assignments = Vec::new();
    while !sources.is_empty() && !sinks.is_empty() {
        let pairs = sinks.iter().enumerate().flat_map(|(sink, &sink_pos)| {
            sources.iter().enumerate().map(move |(source, &source_pos)| (source, sink, source_pos.distance(sink_pos)))
        });
        let (source, sink, distance) = match tie_break.min_by_key(pairs, |&(_, _, distance)| distance) {
            Some(closest) => closest,
            None => break,
        };

        let assignment = Assignment {
            source: sources.remove(source),
            sink: sinks.remove(sink),
        };
        debug!(territory = territory.id, from = %assignment.source, to = %assignment.sink, distance, "claim");
        assignments.push(assignment);
    }
    assignments
}

/// No units left here: spawn on the first friendly cell that can still hold one
fn reseed(territory: &Territory, grid: &mut Grid, ledger: &mut Ledger) {
    let at = territory.cells.iter()
        .map(|&index| &grid.cells[index])
        .find(|cell| cell.owner == Owner::Me && !cell.recycler && cell.scrap_amount > 0)
        .map(|cell| cell.pos);

    if let Some(at) = at {
        let outcome = ledger.submit_if_affordable(Action::Spawn { at, count: 1 }, grid);
        debug!(territory = territory.id, %at, ?outcome, "reseed");
    }
}

fn fill_empty_cells(territory: &Territory, grid: &mut Grid, ledger: &mut Ledger) {
    for &index in territory.cells.iter() {
        let cell = &grid.cells[index];
        if cell.owner != Owner::Me || cell.units >= 1 || !cell.can_spawn { continue }

        let at = cell.pos;
        if ledger.has_spawn_at(at) { continue } // already reseeded this turn

        if let Outcome::Dropped(DropReason::Unaffordable) = ledger.submit_if_affordable(Action::Spawn { at, count: 1 }, grid) {
            return;
        }
    }
}
