pub mod agent;
pub mod config;
pub mod consolidate;
pub mod expand;
pub mod inputs;
pub mod interface;
pub mod ledger;
pub mod territory;
pub mod tiebreak;
pub mod view;
