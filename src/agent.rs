use tracing::{debug, info};

use super::config::PlannerConfig;
use super::consolidate;
use super::expand::{Expander, Frame, Heading, ScanAxis};
use super::inputs::*;
use super::ledger::Ledger;
use super::territory::{Control, TerritoryAnalyzer};
use super::tiebreak::TieBreak;
use super::view::*;

/// Everything the planner carries from one turn to the next
pub struct Agent {
    config: PlannerConfig,
    heading: Option<Heading>,
    axis: ScanAxis,
    tie_break: TieBreak,
    turn: u32,
}
impl Agent {
    pub fn new(config: PlannerConfig) -> Self {
        Self {
            tie_break: TieBreak::new(config.tie_break_seed),
            config,
            heading: None,
            axis: ScanAxis::Rows,
            turn: 0,
        }
    }

    pub fn heading(&self) -> Option<Heading> {
        self.heading
    }

    pub fn axis(&self) -> ScanAxis {
        self.axis
    }

    /// Plan one turn against a fresh snapshot and return the commands in the order they should be sent
    pub fn act(&mut self, mut grid: Grid) -> Vec<Action> {
        self.turn += 1;
        if self.heading.is_none() {
            self.heading = Heading::from_start(&grid);
        }

        let mut analyzer = TerritoryAnalyzer::new();
        let partition = analyzer.partition(&grid);
        info!(
            turn = self.turn,
            matter = grid.my_matter,
            opp_matter = grid.opp_matter,
            territories = partition.territories.len(),
            contested = partition.num_contested(),
            "planning turn"
        );

        let mut ledger = Ledger::new(grid.my_matter);

        // Fight first, so the frontline gets first call on matter
        if let Some(heading) = self.heading {
            let frame = Frame { heading, axis: self.axis };
            for territory in partition.territories.iter().filter(|t| t.control == Control::Contested) {
                debug!(%territory, %heading, axis = ?self.axis, "expand");
                Expander::new(territory, frame, &self.config).plan(&mut grid, &mut ledger, &mut self.tie_break);
            }
        }

        for territory in partition.territories.iter() {
            let is_ours = match territory.control {
                Control::Uncontested(Owner::Me) => true,
                Control::Uncontested(Owner::Neutral) => territory.has_friendly_cell(&grid),
                Control::Uncontested(Owner::Opponent) | Control::Contested => false,
            };
            if !is_ours { continue }

            debug!(%territory, "consolidate");
            consolidate::plan(territory, &mut grid, &mut ledger, &mut self.tie_break);
        }

        if self.config.status_message {
            let text = format!("{}/{} contested", partition.num_contested(), partition.territories.len());
            ledger.submit(Action::Message { text }, &mut grid);
        }

        debug!(remaining_matter = ledger.matter(), num_actions = ledger.actions().len(), "turn planned");

        if self.config.alternate_scan_axis {
            self.axis = self.axis.flipped();
        }

        ledger.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skirmish() -> Grid {
        Grid::new(3, 1, 100, 100, vec![
            Cell { can_build: false, ..Cell::open(Position::new(0, 0), 5, Owner::Me, 1) },
            Cell::open(Position::new(1, 0), 5, Owner::Neutral, 0),
            Cell::open(Position::new(2, 0), 5, Owner::Opponent, 1),
        ])
    }

    #[test]
    fn heading_is_fixed_on_first_turn() {
        let mut agent = Agent::new(PlannerConfig::default());
        agent.act(skirmish());
        let heading = agent.heading();
        assert_eq!(heading.map(|h| h.dx), Some(1));

        // units now on the far side do not change it
        let mirrored = Grid::new(3, 1, 100, 100, vec![
            Cell::open(Position::new(0, 0), 5, Owner::Opponent, 1),
            Cell::open(Position::new(1, 0), 5, Owner::Neutral, 0),
            Cell::open(Position::new(2, 0), 5, Owner::Me, 1),
        ]);
        agent.act(mirrored);
        assert_eq!(agent.heading(), heading);
    }

    #[test]
    fn axis_alternates_between_turns() {
        let mut agent = Agent::new(PlannerConfig::default());
        assert_eq!(agent.axis(), ScanAxis::Rows);
        agent.act(skirmish());
        assert_eq!(agent.axis(), ScanAxis::Columns);
        agent.act(skirmish());
        assert_eq!(agent.axis(), ScanAxis::Rows);

        let mut rows_only = Agent::new(PlannerConfig { alternate_scan_axis: false, ..PlannerConfig::default() });
        rows_only.act(skirmish());
        assert_eq!(rows_only.axis(), ScanAxis::Rows);
    }

    #[test]
    fn status_message_goes_last() {
        let mut agent = Agent::new(PlannerConfig { status_message: true, ..PlannerConfig::default() });
        let actions = agent.act(skirmish());
        assert_eq!(actions.last(), Some(&Action::Message { text: "1/1 contested".to_string() }));
    }

    #[test]
    fn opponent_ground_is_left_alone() {
        let grid = Grid::new(3, 1, 100, 100, vec![
            Cell::open(Position::new(0, 0), 5, Owner::Opponent, 2),
            Cell::open(Position::new(1, 0), 5, Owner::Neutral, 0),
            Cell::open(Position::new(2, 0), 5, Owner::Opponent, 0),
        ]);
        let mut agent = Agent::new(PlannerConfig::default());
        assert!(agent.act(grid).is_empty());
    }

    #[test]
    fn contested_ground_spends_matter_first() {
        // left: contested strip with an empty frontier cell; right: our own pocket with an empty cell
        let grid = Grid::new(5, 2, 10, 0, vec![
            Cell::open(Position::new(0, 0), 5, Owner::Me, 1),
            Cell::open(Position::new(1, 0), 5, Owner::Neutral, 0),
            Cell::open(Position::new(2, 0), 0, Owner::Neutral, 0),
            Cell::open(Position::new(3, 0), 5, Owner::Me, 1),
            Cell::open(Position::new(4, 0), 5, Owner::Me, 0),
            Cell::open(Position::new(0, 1), 5, Owner::Me, 0),
            Cell::open(Position::new(1, 1), 5, Owner::Opponent, 1),
            Cell::open(Position::new(2, 1), 0, Owner::Neutral, 0),
            Cell::open(Position::new(3, 1), 5, Owner::Me, 0),
            Cell::open(Position::new(4, 1), 5, Owner::Me, 0),
        ]);
        let config = PlannerConfig { defensive_builds: false, ..PlannerConfig::default() };
        let mut agent = Agent::new(config);
        let actions = agent.act(grid);
        let spawns: Vec<&Action> = actions.iter().filter(|a| matches!(a, Action::Spawn { .. })).collect();
        assert_eq!(spawns, vec![&Action::Spawn { at: Position::new(0, 1), count: 1 }]);
    }
}
