use tracing::debug;

use super::inputs::*;
use super::view::*;

#[derive(Copy,Clone,Debug,PartialEq,Eq)]
pub enum DropReason {
    EmptySpawn,
    OffBoard,
    Unaffordable,
}

#[derive(Copy,Clone,Debug,PartialEq,Eq)]
pub enum Outcome {
    Queued,
    /// Took the place of a move that started on the same cell
    Replaced,
    Dropped(DropReason),
}
impl Outcome {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Outcome::Dropped(_))
    }
}

/// The commands for this turn, in the order they were decided, plus the matter left to spend.
#[derive(Clone,Debug)]
pub struct Ledger {
    actions: Vec<Action>,
    matter: i32,
}
impl Ledger {
    pub fn new(matter: i32) -> Self {
        Self {
            actions: Vec::new(),
            matter,
        }
    }

    pub fn matter(&self) -> i32 {
        self.matter
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn can_afford(&self, action: &Action) -> bool {
        self.matter >= action.cost()
    }

    pub fn has_spawn_at(&self, pos: Position) -> bool {
        self.actions.iter().any(|action| matches!(action, Action::Spawn { at, .. } if *at == pos))
    }

    /// Queue an action. Matter is deducted without any floor; affordability is the caller's concern.
    /// A build is applied to the grid straight away so the rest of the turn sees the recycler.
    pub fn submit(&mut self, action: Action, grid: &mut Grid) -> Outcome {
        if let Some(reason) = Self::reject(&action, grid) {
            debug!(?action, ?reason, "dropped action");
            return Outcome::Dropped(reason);
        }

        self.apply(&action, grid);
        self.actions.push(action);
        Outcome::Queued
    }

    pub fn submit_if_affordable(&mut self, action: Action, grid: &mut Grid) -> Outcome {
        if !self.can_afford(&action) {
            debug!(?action, matter = self.matter, "cannot afford action");
            return Outcome::Dropped(DropReason::Unaffordable);
        }
        self.submit(action, grid)
    }

    /// Queue a spawn, cancelling the first queued move that leaves the same cell.
    /// The spawn takes the cancelled move's slot so everything else keeps its order.
    pub fn submit_replacing_move(&mut self, at: Position, count: i32, grid: &mut Grid) -> Outcome {
        let spawn = Action::Spawn { at, count };
        if let Some(reason) = Self::reject(&spawn, grid) {
            debug!(action = ?spawn, ?reason, "dropped action");
            return Outcome::Dropped(reason);
        }

        let replaced = self.actions.iter().position(|action| matches!(action, Action::Move { from, .. } if *from == at));
        self.apply(&spawn, grid);
        match replaced {
            Some(index) => {
                debug!(replaced = ?self.actions[index], "move cancelled for reinforcement");
                self.actions[index] = spawn;
                Outcome::Replaced
            },
            None => {
                self.actions.push(spawn);
                Outcome::Queued
            },
        }
    }

    /// Consume the ledger, yielding actions in submission order
    pub fn flush(self) -> Vec<Action> {
        self.actions
    }

    fn reject(action: &Action, grid: &Grid) -> Option<DropReason> {
        match action {
            Action::Spawn { count, .. } if *count <= 0 => Some(DropReason::EmptySpawn),
            Action::Build { at } if !grid.contains(*at) => Some(DropReason::OffBoard),
            _ => None,
        }
    }

    fn apply(&mut self, action: &Action, grid: &mut Grid) {
        self.matter -= action.cost();
        if let Action::Build { at } = action {
            let marked = grid.mark_recycler(*at);
            debug_assert!(marked, "build at {} passed the bounds check", at);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid() -> Grid {
        let cells = (0..4).map(|x| Cell::open(Position::new(x, 0), 5, Owner::Me, 0)).collect();
        Grid::new(4, 1, 25, 0, cells)
    }

    fn step(from: i32) -> Action {
        Action::Move { from: Position::new(from, 0), to: Position::new(from + 1, 0), count: 1 }
    }

    #[test]
    fn deducts_without_floor() {
        let mut grid = grid();
        let mut ledger = Ledger::new(grid.my_matter);
        for x in 0..4 {
            assert_eq!(ledger.submit(Action::Spawn { at: Position::new(x, 0), count: 1 }, &mut grid), Outcome::Queued);
        }
        assert_eq!(ledger.matter(), 25 - 40);
        assert_eq!(ledger.actions().len(), 4);
    }

    #[test]
    fn affordable_variant_checks_balance() {
        let mut grid = grid();
        let mut ledger = Ledger::new(15);
        assert_eq!(ledger.submit_if_affordable(Action::Build { at: Position::new(0, 0) }, &mut grid), Outcome::Queued);
        assert_eq!(ledger.submit_if_affordable(Action::Build { at: Position::new(1, 0) }, &mut grid), Outcome::Dropped(DropReason::Unaffordable));
        assert_eq!(ledger.matter(), 5);
        assert!(!grid.cells[1].recycler);
    }

    #[test]
    fn silent_drops() {
        let mut grid = grid();
        let mut ledger = Ledger::new(100);
        assert_eq!(ledger.submit(Action::Spawn { at: Position::new(0, 0), count: 0 }, &mut grid), Outcome::Dropped(DropReason::EmptySpawn));
        assert_eq!(ledger.submit(Action::Spawn { at: Position::new(0, 0), count: -2 }, &mut grid), Outcome::Dropped(DropReason::EmptySpawn));
        assert_eq!(ledger.submit(Action::Build { at: Position::new(4, 0) }, &mut grid), Outcome::Dropped(DropReason::OffBoard));
        assert_eq!(ledger.submit(Action::Build { at: Position::new(0, -1) }, &mut grid), Outcome::Dropped(DropReason::OffBoard));
        assert!(ledger.is_empty());
        assert_eq!(ledger.matter(), 100);
    }

    #[test]
    fn build_is_visible_immediately() {
        let mut grid = grid();
        let mut ledger = Ledger::new(100);
        ledger.submit(Action::Build { at: Position::new(2, 0) }, &mut grid);
        let cell = &grid.cells[2];
        assert!(cell.recycler);
        assert!(!cell.can_build);
        assert!(!cell.can_spawn);
        assert!(cell.in_range_of_recycler);
    }

    #[test]
    fn replacing_spawn_takes_first_matching_slot() {
        let mut grid = grid();
        let mut ledger = Ledger::new(100);
        ledger.submit(step(0), &mut grid);
        ledger.submit(step(1), &mut grid);
        ledger.submit(Action::Message { text: "hi".to_string() }, &mut grid);
        ledger.submit(Action::Move { from: Position::new(1, 0), to: Position::new(0, 0), count: 2 }, &mut grid);

        let outcome = ledger.submit_replacing_move(Position::new(1, 0), 1, &mut grid);
        assert_eq!(outcome, Outcome::Replaced);
        assert_eq!(ledger.actions(), &[
            step(0),
            Action::Spawn { at: Position::new(1, 0), count: 1 },
            Action::Message { text: "hi".to_string() },
            Action::Move { from: Position::new(1, 0), to: Position::new(0, 0), count: 2 },
        ]);
        assert_eq!(ledger.matter(), 90);
    }

    #[test]
    fn replacing_spawn_appends_without_match() {
        let mut grid = grid();
        let mut ledger = Ledger::new(100);
        ledger.submit(step(0), &mut grid);
        assert_eq!(ledger.submit_replacing_move(Position::new(3, 0), 2, &mut grid), Outcome::Queued);
        assert_eq!(ledger.actions().last(), Some(&Action::Spawn { at: Position::new(3, 0), count: 2 }));
        assert_eq!(ledger.matter(), 80);
        assert!(ledger.has_spawn_at(Position::new(3, 0)));
    }

    #[test]
    fn replacing_empty_spawn_keeps_move() {
        let mut grid = grid();
        let mut ledger = Ledger::new(100);
        ledger.submit(step(0), &mut grid);
        assert_eq!(ledger.submit_replacing_move(Position::new(0, 0), 0, &mut grid), Outcome::Dropped(DropReason::EmptySpawn));
        assert_eq!(ledger.flush(), vec![step(0)]);
    }
}
