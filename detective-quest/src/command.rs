use std::collections::VecDeque;
use std::io::{self, BufRead};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    MoveLeft,
    MoveRight,
    Review,
    ShowSuspects,
    Quit,
}

impl Command {
    /// e: left, d: right, r: review clues, x: show suspects, s: quit.
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'e' => Some(Command::MoveLeft),
            'd' => Some(Command::MoveRight),
            'r' => Some(Command::Review),
            'x' => Some(Command::ShowSuspects),
            's' => Some(Command::Quit),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Command(Command),
    Unknown(char),
    /// A line that could not be decoded; it has been discarded.
    Malformed,
    Exhausted,
}

/// Pulls one non-whitespace character at a time out of a line-buffered reader.
/// Several characters typed on one line are consumed as several inputs.
pub struct CommandReader<R> {
    input: R,
    pending: VecDeque<char>,
}

impl<R: BufRead> CommandReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            pending: VecDeque::new(),
        }
    }

    pub fn next_input(&mut self) -> io::Result<Input> {
        loop {
            if let Some(c) = self.pending.pop_front() {
                return Ok(match Command::from_char(c) {
                    Some(command) => Input::Command(command),
                    None => Input::Unknown(c),
                });
            }

            let mut line = Vec::new();
            if self.input.read_until(b'\n', &mut line)? == 0 {
                return Ok(Input::Exhausted);
            }
            match String::from_utf8(line) {
                Ok(line) => self.pending.extend(line.chars().filter(|c| !c.is_whitespace())),
                Err(_) => return Ok(Input::Malformed),
            }
        }
    }
}
