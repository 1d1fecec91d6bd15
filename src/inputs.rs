use std::fmt::Display;

pub const BUILD_COST: i32 = 10;
pub const SPAWN_COST: i32 = 10;

#[derive(Copy,Clone,Debug,PartialEq,Eq,Hash,PartialOrd,Ord)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}
impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance, the only metric the planner uses
    pub fn distance(&self, other: Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Position {
        Position::new(self.x + dx, self.y + dy)
    }
}
impl Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}

#[derive(Copy,Clone,Debug,PartialEq,Eq,Hash)]
pub enum Owner {
    Me,
    Opponent,
    Neutral,
}
impl Owner {
    pub fn from_code(code: i32) -> Self {
        match code {
            1 => Owner::Me,
            0 => Owner::Opponent,
            _ => Owner::Neutral,
        }
    }
}
impl Display for Owner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Owner::Me => write!(f, "me"),
            Owner::Opponent => write!(f, "opponent"),
            Owner::Neutral => write!(f, "none"),
        }
    }
}

#[derive(Clone,Debug,PartialEq,Eq)]
pub struct Cell {
    pub pos: Position,
    pub scrap_amount: i32,
    pub owner: Owner,
    pub units: i32,
    pub recycler: bool,
    pub can_build: bool,
    pub can_spawn: bool,
    pub in_range_of_recycler: bool,
}
impl Cell {
    /// A bare cell with terrain and no structure, mostly useful when assembling grids by hand
    pub fn open(pos: Position, scrap_amount: i32, owner: Owner, units: i32) -> Self {
        Self {
            pos,
            scrap_amount,
            owner,
            units,
            recycler: false,
            can_build: owner == Owner::Me && units == 0,
            can_spawn: owner == Owner::Me,
            in_range_of_recycler: false,
        }
    }

    pub fn is_traversable(&self) -> bool {
        self.scrap_amount > 0 && !self.recycler
    }

    /// Walkable now and not next to a recycler, so it will still be there next turn
    pub fn is_safe(&self) -> bool {
        self.is_traversable() && !self.in_range_of_recycler
    }
}

/// One logical unit. A cell holding N units yields N bots at the same position.
#[derive(Copy,Clone,Debug,PartialEq,Eq)]
pub struct Bot {
    pub pos: Position,
    pub owner: Owner,
}

#[derive(Clone,Debug,PartialEq,Eq)]
pub enum Action {
    Move { from: Position, to: Position, count: i32 },
    Build { at: Position },
    Spawn { at: Position, count: i32 },
    Message { text: String },
    Wait,
}
impl Action {
    pub fn cost(&self) -> i32 {
        match self {
            Action::Build { .. } => BUILD_COST,
            Action::Spawn { count, .. } => SPAWN_COST * count,
            Action::Move { .. } | Action::Message { .. } | Action::Wait => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_cost_scales_with_count() {
        let at = Position::new(1, 1);
        assert_eq!(Action::Spawn { at, count: 3 }.cost(), 30);
        assert_eq!(Action::Build { at }.cost(), 10);
        assert_eq!(Action::Move { from: at, to: at.offset(1, 0), count: 4 }.cost(), 0);
    }

    #[test]
    fn owner_codes_follow_the_referee() {
        assert_eq!(Owner::from_code(1), Owner::Me);
        assert_eq!(Owner::from_code(0), Owner::Opponent);
        assert_eq!(Owner::from_code(-1), Owner::Neutral);
    }

    #[test]
    fn recycler_blocks_traversal() {
        let mut cell = Cell::open(Position::new(0, 0), 4, Owner::Me, 0);
        assert!(cell.is_traversable());
        cell.recycler = true;
        assert!(!cell.is_traversable());
        cell.recycler = false;
        cell.scrap_amount = 0;
        assert!(!cell.is_traversable());
    }

    #[test]
    fn decaying_cells_are_walkable_but_unsafe() {
        let mut cell = Cell::open(Position::new(0, 0), 1, Owner::Neutral, 0);
        assert!(cell.is_safe());
        cell.in_range_of_recycler = true;
        assert!(cell.is_traversable());
        assert!(!cell.is_safe());
    }
}
