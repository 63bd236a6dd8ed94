use std::io::{self, BufRead, BufReader, Read};

use anyhow::{Context, Result};
use log::{debug, info};

use crate::command::{Command, ParseCommandError};

pub(crate) trait CommandInput {
    /// Blocks until the next command.  End of input reads as `Command::Quit`.
    fn next_command(&mut self) -> Result<Command>;
}

/// Reads one command per line.
pub(crate) struct LineInput<R> {
    reader: BufReader<R>,
}

impl LineInput<io::Stdin> {
    pub(crate) fn stdin() -> Self {
        Self::new(io::stdin())
    }
}

impl<R: Read> LineInput<R> {
    pub(crate) fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
        }
    }
}

impl<R: Read> CommandInput for LineInput<R> {
    fn next_command(&mut self) -> Result<Command> {
        let mut line = String::new();
        loop {
            line.clear();
            let bytes_read = self
                .reader
                .read_line(&mut line)
                .context("Failed to read command")?;
            if bytes_read == 0 {
                info!("End of input");
                return Ok(Command::Quit);
            }

            debug!("Read line: {:?}", line);
            match line.parse() {
                Ok(command) => return Ok(command),
                Err(ParseCommandError::Empty) => {}
                Err(err) => println!("{err}, type one of:\n{}", crate::command::USAGE),
            }
        }
    }
}
