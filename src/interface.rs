use std::io::{self, BufRead};
use std::num::ParseIntError;

use thiserror::Error;

use super::inputs::*;
use super::view::Grid;

pub const CELL_FIELDS: usize = 7;

#[derive(Debug,Error)]
pub enum InputError {
    #[error("failed to read input: {0}")]
    Io(#[from] io::Error),
    #[error("input ended")]
    EndOfInput,
    #[error("expected {expected} fields but found {found} in {line:?}")]
    FieldCount {
        expected: usize,
        found: usize,
        line: String,
    },
    #[error("invalid integer {token:?}: {source}")]
    Parse {
        token: String,
        #[source]
        source: ParseIntError,
    },
}

#[derive(Copy,Clone,Debug,PartialEq,Eq)]
pub struct Dimensions {
    pub width: i32,
    pub height: i32,
}

fn read_fields<R: BufRead>(input: &mut R, expected: usize) -> Result<Vec<i32>, InputError> {
    let mut input_line = String::new();
    if input.read_line(&mut input_line)? == 0 {
        return Err(InputError::EndOfInput);
    }

    let fields = input_line
        .split_whitespace()
        .map(|token| token.parse::<i32>().map_err(|source| InputError::Parse { token: token.to_string(), source }))
        .collect::<Result<Vec<i32>, InputError>>()?;

    if fields.len() != expected {
        return Err(InputError::FieldCount {
            expected,
            found: fields.len(),
            line: input_line.trim_end().to_string(),
        });
    }
    Ok(fields)
}

pub fn read_initial<R: BufRead>(input: &mut R) -> Result<Dimensions, InputError> {
    let fields = read_fields(input, 2)?;
    Ok(Dimensions { width: fields[0], height: fields[1] })
}

pub fn read_turn<R: BufRead>(input: &mut R, dimensions: Dimensions) -> Result<Grid, InputError> {
    let matter = read_fields(input, 2)?;
    let (my_matter, opp_matter) = (matter[0], matter[1]);

    let mut cells = Vec::with_capacity((dimensions.width * dimensions.height).max(0) as usize);
    for y in 0..dimensions.height {
        for x in 0..dimensions.width {
            let fields = read_fields(input, CELL_FIELDS)?;
            cells.push(Cell {
                pos: Position::new(x, y),
                scrap_amount: fields[0],
                owner: Owner::from_code(fields[1]),
                units: fields[2],
                recycler: fields[3] == 1,
                can_build: fields[4] == 1,
                can_spawn: fields[5] == 1,
                in_range_of_recycler: fields[6] == 1,
            });
        }
    }

    Ok(Grid::new(dimensions.width, dimensions.height, my_matter, opp_matter, cells))
}

pub fn format_action(action: &Action) -> String {
    match action {
        Action::Move { from, to, count } => format!("MOVE {} {} {} {} {}", count, from.x, from.y, to.x, to.y),
        Action::Build { at } => format!("BUILD {} {}", at.x, at.y),
        Action::Spawn { at, count } => format!("SPAWN {} {} {}", count, at.x, at.y),
        Action::Message { text } => format!("MESSAGE {}", text),
        Action::Wait => format!("WAIT"),
    }
}

/// One command line for the turn; an idle turn is `WAIT`, never an empty line
pub fn format_turn(actions: &[Action]) -> String {
    if actions.is_empty() {
        return format_action(&Action::Wait);
    }
    actions.iter().map(format_action).collect::<Vec<_>>().join(";")
}
