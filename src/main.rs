use std::io::{self, Write};

use fall_challenge_2022::agent::Agent;
use fall_challenge_2022::config::PlannerConfig;
use fall_challenge_2022::interface::{self, InputError};

fn main() -> Result<(), InputError> {
    // stdout is the command channel, so logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .with_ansi(false)
        .init();

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let dimensions = interface::read_initial(&mut input)?;
    let mut agent = Agent::new(PlannerConfig::load());

    // game loop
    loop {
        let grid = match interface::read_turn(&mut input, dimensions) {
            Ok(grid) => grid,
            Err(InputError::EndOfInput) => break,
            Err(err) => return Err(err),
        };

        let actions = agent.act(grid);

        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", interface::format_turn(&actions))?;
        stdout.flush()?;
    }

    Ok(())
}
