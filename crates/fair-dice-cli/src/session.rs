//! Interactive game session over a line-oriented reader and writer.

use crate::table;
use anyhow::{Context, Result};
use fair_dice_core::{
    game::{pick_computer_die, throw_face, MOVE_ORDER_RANGE, THROW_RANGE},
    probability_matrix, DiceConfiguration, FairRandomRound, GameId, GameResult, MoveOrder,
    Participant, ProbabilityMatrix, Reveal,
};
use std::io::{BufRead, Write};
use tracing::{debug, info, info_span};

/// How a session ended
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Finished(GameResult),
    Exited,
}

enum Choice {
    Selected(usize),
    Exit,
}

/// One game between the computer and the user at the terminal
pub struct Session<R, W> {
    dice: Vec<DiceConfiguration>,
    matrix: ProbabilityMatrix,
    precision: usize,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(dice: Vec<DiceConfiguration>, precision: usize, input: R, output: W) -> Self {
        let matrix = probability_matrix(&dice);
        Self {
            dice,
            matrix,
            precision,
            input,
            output,
        }
    }

    /// Play one game to the end, or until the user exits
    pub fn run(&mut self) -> Result<Outcome> {
        let game_id = GameId::new();
        let span = info_span!("game", id = %game_id);
        let _enter = span.enter();
        info!(dice = self.dice.len(), "Game started");

        writeln!(self.output, "Let's determine who makes the first move.")?;
        let Some(toss) = self.fair_round(
            MOVE_ORDER_RANGE,
            "Try to guess my selection.",
            "My selection",
        )?
        else {
            return self.exit();
        };
        let order = MoveOrder::from_reveal(&toss)?;
        match order.first {
            Participant::User => writeln!(self.output, "You guessed it. You make the first move.")?,
            Participant::Computer => {
                writeln!(self.output, "You didn't guess it. I make the first move.")?
            }
        }
        info!(first = %order.first, "Move order decided");

        let mut available: Vec<usize> = (0..self.dice.len()).collect();
        let mut picks = Vec::with_capacity(2);
        for participant in order.sequence() {
            let pick = match participant {
                Participant::Computer => {
                    let pick = pick_computer_die(&available)?;
                    writeln!(self.output, "I choose the [{}] dice.", self.dice[pick])?;
                    pick
                }
                Participant::User => {
                    writeln!(self.output, "Choose your dice:")?;
                    let labels: Vec<String> =
                        available.iter().map(|&i| self.dice[i].to_string()).collect();
                    let Choice::Selected(index) = self.prompt(&labels)? else {
                        return self.exit();
                    };
                    let pick = available[index];
                    writeln!(self.output, "You choose the [{}] dice.", self.dice[pick])?;
                    pick
                }
            };
            available.retain(|&i| i != pick);
            picks.push((participant, pick));
        }

        let mut computer_face = 0;
        let mut user_face = 0;
        for (participant, pick) in picks {
            let whose = match participant {
                Participant::Computer => "my",
                Participant::User => "your",
            };
            writeln!(self.output, "It's time for {} throw.", whose)?;
            let Some(reveal) = self.fair_round(
                THROW_RANGE,
                "Add your number modulo 6.",
                "My number is",
            )?
            else {
                return self.exit();
            };
            writeln!(
                self.output,
                "The fair number generation result is {} + {} = {} (mod {}).",
                reveal.self_value, reveal.peer_value, reveal.result, reveal.range
            )?;

            let face = throw_face(&self.dice[pick], &reveal)?;
            match participant {
                Participant::Computer => {
                    writeln!(self.output, "My throw is {}.", face)?;
                    computer_face = face;
                }
                Participant::User => {
                    writeln!(self.output, "Your throw is {}.", face)?;
                    user_face = face;
                }
            }
        }

        let result = GameResult::judge(computer_face, user_face);
        match result {
            GameResult::UserWins => {
                writeln!(self.output, "You win ({} > {})!", user_face, computer_face)?
            }
            GameResult::ComputerWins => {
                writeln!(self.output, "I win ({} > {})!", computer_face, user_face)?
            }
            GameResult::Draw => {
                writeln!(self.output, "It's a tie ({} = {})!", user_face, computer_face)?
            }
        }
        info!(%result, computer_face, user_face, "Game finished");
        Ok(Outcome::Finished(result))
    }

    /// Run one commit/contribute/reveal exchange; `None` if the user exits
    fn fair_round(&mut self, range: u32, ask: &str, reveal_label: &str) -> Result<Option<Reveal>> {
        let mut round = FairRandomRound::start(range)?;
        writeln!(
            self.output,
            "I selected a random value in the range 0..{} (HMAC={}).",
            range - 1,
            round.mac()
        )?;
        writeln!(self.output, "{}", ask)?;

        let values: Vec<String> = (0..range).map(|v| v.to_string()).collect();
        match self.prompt(&values)? {
            Choice::Selected(value) => round.contribute(value as u32)?,
            Choice::Exit => {
                let aborted = round.abort();
                info!(%aborted, "User left");
                return Ok(None);
            }
        }

        let reveal = round.reveal()?;
        writeln!(
            self.output,
            "{} {} (KEY={}).",
            reveal_label, reveal.self_value, reveal.secret_key
        )?;
        Ok(Some(reveal))
    }

    /// Show the menu until the user picks an option or exits
    fn prompt(&mut self, labels: &[String]) -> Result<Choice> {
        loop {
            for (i, label) in labels.iter().enumerate() {
                writeln!(self.output, "{} - {}", i, label)?;
            }
            writeln!(self.output, "X - exit")?;
            writeln!(self.output, "? - help")?;
            write!(self.output, "Your selection: ")?;
            self.output.flush()?;

            let mut line = String::new();
            let read = self
                .input
                .read_line(&mut line)
                .context("failed to read selection")?;
            if read == 0 {
                writeln!(self.output)?;
                return Ok(Choice::Exit);
            }
            let line = line.trim();

            match line {
                "x" | "X" => return Ok(Choice::Exit),
                "?" => self.help()?,
                _ => match line.parse::<usize>() {
                    Ok(index) if index < labels.len() => return Ok(Choice::Selected(index)),
                    _ => {
                        debug!(input = line, "Rejected selection");
                        writeln!(
                            self.output,
                            "Invalid selection '{}'. Choose one of the listed options.",
                            line
                        )?;
                    }
                },
            }
        }
    }

    fn help(&mut self) -> Result<()> {
        writeln!(self.output, "Probability of the win for the user:")?;
        writeln!(self.output, "{}", table::render(&self.matrix, self.precision))?;
        Ok(())
    }

    fn exit(&mut self) -> Result<Outcome> {
        writeln!(self.output, "Goodbye.")?;
        Ok(Outcome::Exited)
    }
}
