use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::clue_ledger::ClueLedger;
use crate::command::{Command, CommandReader, Input};
use crate::room_map::{Direction, Room, RoomMap};
use crate::rules::ClueRules;
use crate::suspect_tally::{BUCKET_COUNT, SuspectTally, bucket_index};

const PROMPT: &str = "Opções: (e: Esquerda, d: Direita, r: Revisar Pistas, x: Ver Suspeitos, s: Sair): ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    RoomReached,
    AwaitingCommand,
    Exploring,
    Terminated,
}

/// What happened when a room's clue was picked up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discovery {
    pub room: String,
    pub clue: String,
    pub suspect: String,
    pub suspect_count: u32,
    /// False when an identical clue text was already in the ledger.
    pub new_clue: bool,
}

/// Walks the player through the mansion and owns everything collected on the way.
#[derive(Debug)]
pub struct Investigation {
    map: RoomMap,
    path: Vec<Direction>,
    ledger: ClueLedger,
    tally: SuspectTally,
    rules: ClueRules,
    state: State,
}

impl Investigation {
    pub fn new(map: RoomMap, rules: ClueRules) -> Self {
        Self {
            map,
            path: Vec::new(),
            ledger: ClueLedger::new(),
            tally: SuspectTally::new(),
            rules,
            state: State::RoomReached,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn ledger(&self) -> &ClueLedger {
        &self.ledger
    }

    pub fn tally(&self) -> &SuspectTally {
        &self.tally
    }

    pub fn map(&self) -> &RoomMap {
        &self.map
    }

    /// Directions taken from the entrance to the current room.
    pub fn path(&self) -> &[Direction] {
        &self.path
    }

    pub fn current_room(&self) -> &Room {
        self.map
            .room_at(&self.path)
            .unwrap_or_else(|| self.map.root())
    }

    /// Picks up the current room's clue, if it still has one, and charges it
    /// to a suspect. The room is left without a clue afterwards.
    pub fn collect_clue(&mut self) -> Option<Discovery> {
        let room = self.map.room_at_mut(&self.path)?;
        let clue = room.take_clue()?;
        let room = room.name().to_string();

        let new_clue = self.ledger.insert(&clue);
        if !new_clue {
            debug!(%room, %clue, "clue text already in ledger");
        }
        let suspect = self.rules.suspect_for(&clue).to_string();
        let suspect_count = self.tally.increment(&suspect);
        debug!(
            %room,
            %clue,
            %suspect,
            bucket = bucket_index(&suspect),
            count = suspect_count,
            "clue collected"
        );

        Some(Discovery {
            room,
            clue,
            suspect,
            suspect_count,
            new_clue,
        })
    }

    /// Moves to the child room in `direction`. Returns false, leaving the
    /// position untouched, when there is no room that way.
    pub fn step(&mut self, direction: Direction) -> bool {
        if self.current_room().child(direction).is_none() {
            return false;
        }
        self.path.push(direction);
        self.state = State::RoomReached;
        true
    }

    /// Runs the interactive loop until the player quits or input runs out.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> Result<()> {
        let mut reader = CommandReader::new(input);

        writeln!(out, "\n--- Início da Exploração ---")?;
        writeln!(out, "Você está no: {}", self.current_room().name())?;

        while self.state != State::Terminated {
            if self.state == State::RoomReached {
                self.arrive(out)?;
                self.state = State::AwaitingCommand;
            }
            if self.current_room().is_dead_end() {
                writeln!(
                    out,
                    "Fim do caminho. Não há mais salas para explorar a partir daqui. Pressione 's' para sair ou 'r' para revisar."
                )?;
            }

            write!(out, "\n{PROMPT}")?;
            out.flush().context("failed to flush the prompt")?;

            match reader.next_input().context("failed to read a command")? {
                Input::Exhausted => {
                    info!("input exhausted, leaving the mansion");
                    writeln!(out)?;
                    self.state = State::Terminated;
                }
                Input::Malformed => {
                    warn!("discarded an undecodable input line");
                }
                Input::Unknown(c) => {
                    debug!(input = %c, "unknown command");
                    writeln!(out, "Opção inválida.")?;
                }
                Input::Command(command) => {
                    self.state = State::Exploring;
                    self.handle(command, out)?;
                    if self.state == State::Exploring {
                        self.state = State::AwaitingCommand;
                    }
                }
            }
        }

        writeln!(out, "--- Fim da Exploração ---")?;
        Ok(())
    }

    pub fn handle<W: Write>(&mut self, command: Command, out: &mut W) -> io::Result<()> {
        match command {
            Command::Quit => {
                writeln!(out, "\nExploração encerrada. Saindo da mansão.")?;
                self.state = State::Terminated;
            }
            Command::Review => self.write_clues(out)?,
            Command::ShowSuspects => {
                self.write_suspects(out)?;
                self.write_verdict(out)?;
            }
            Command::MoveLeft => self.write_move(Direction::Left, out)?,
            Command::MoveRight => self.write_move(Direction::Right, out)?,
        }
        Ok(())
    }

    fn write_move<W: Write>(&mut self, direction: Direction, out: &mut W) -> io::Result<()> {
        let (side, way) = match direction {
            Direction::Left => ("Esquerda", "esquerda"),
            Direction::Right => ("Direita", "direita"),
        };
        if self.step(direction) {
            writeln!(out, "Você foi para a {side}. Nova sala: {}", self.current_room().name())
        } else {
            writeln!(out, "Não há caminho para a {way}. Tente novamente.")
        }
    }

    fn arrive<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        if let Some(found) = self.collect_clue() {
            writeln!(out, "Pista Encontrada! -> \"{}\"", found.clue)?;
            writeln!(out, " -> Pista associada a: {}", found.suspect)?;
        }
        Ok(())
    }

    pub fn write_clues<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "\n--- CADERNO DE EVIDÊNCIAS (Pistas em Ordem Alfabética) ---")?;
        for clue in &self.ledger {
            writeln!(out, "   - {clue}")?;
        }
        writeln!(out, "----------------------------------------------------------")
    }

    pub fn write_suspects<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "\n--- ASSOCIAÇÕES DE SUSPEITOS (Tabela Hash) ---")?;
        if self.tally.is_empty() {
            return writeln!(out, "Nenhuma associação registrada ainda.");
        }
        for index in 0..BUCKET_COUNT {
            let mut chain = self.tally.chain(index).peekable();
            if chain.peek().is_none() {
                continue;
            }
            writeln!(out, "Bucket [{index}]:")?;
            for suspect in chain {
                writeln!(
                    out,
                    "  -> Suspeito: {} (Pistas Coletadas: {})",
                    suspect.name(),
                    suspect.clue_count()
                )?;
            }
        }
        Ok(())
    }

    pub fn write_verdict<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "\n--- RESOLUÇÃO DO MISTÉRIO ---")?;
        match self.tally.most_likely() {
            Some(suspect) => writeln!(
                out,
                "Baseado nas {} pistas coletadas, o SUSPEITO MAIS PROVÁVEL é: {}!",
                suspect.clue_count(),
                suspect.name()
            )?,
            None => writeln!(out, "Ainda não há evidências suficientes para apontar um suspeito.")?,
        }
        writeln!(out, "------------------------------")
    }

    /// Prints the final verdict and releases the map, ledger and tally, in that order.
    pub fn conclude<W: Write>(self, out: &mut W) -> io::Result<()> {
        self.write_verdict(out)?;
        self.finish();
        Ok(())
    }

    pub fn finish(self) {
        let Self {
            map, ledger, tally, ..
        } = self;
        let (rooms, clues, suspects) = (map.len(), ledger.len(), tally.len());
        drop(map);
        drop(ledger);
        drop(tally);
        debug!(rooms, clues, suspects, "investigation torn down");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mansion() -> Investigation {
        Investigation::new(RoomMap::mansion().unwrap(), ClueRules::default())
    }

    #[test]
    fn starts_at_entrance_with_nothing_collected() {
        let investigation = mansion();
        assert_eq!(investigation.current_room().name(), "Hall de Entrada");
        assert_eq!(investigation.state(), State::RoomReached);
        assert!(investigation.ledger().is_empty());
        assert!(investigation.tally().is_empty());
    }

    #[test]
    fn entrance_has_no_clue() {
        let mut investigation = mansion();
        assert!(investigation.collect_clue().is_none());
    }

    #[test]
    fn collecting_charges_the_mapped_suspect() {
        let mut investigation = mansion();
        assert!(investigation.step(Direction::Right));
        let found = investigation.collect_clue().unwrap();
        assert_eq!(found.room, "Biblioteca");
        assert_eq!(found.clue, "Relógio de bolso quebrado");
        assert_eq!(found.suspect, "Mordomo");
        assert_eq!(found.suspect_count, 1);
        assert!(found.new_clue);
        assert!(investigation.current_room().clue().is_none());
    }

    #[test]
    fn revisiting_a_room_collects_nothing() {
        let mut investigation = mansion();
        investigation.step(Direction::Right);
        investigation.collect_clue();
        assert!(investigation.collect_clue().is_none());
        assert_eq!(investigation.ledger().len(), 1);
        assert_eq!(investigation.tally().count_of("Mordomo"), 1);
    }

    #[test]
    fn blocked_move_keeps_position() {
        let mut investigation = mansion();
        investigation.step(Direction::Left);
        investigation.step(Direction::Left);
        assert_eq!(investigation.current_room().name(), "Despensa");
        assert!(!investigation.step(Direction::Left));
        assert!(!investigation.step(Direction::Right));
        assert_eq!(investigation.current_room().name(), "Despensa");
        assert_eq!(investigation.path(), &[Direction::Left, Direction::Left]);
    }

    #[test]
    fn unmatched_clue_goes_to_fallback() {
        let mut investigation = mansion();
        investigation.step(Direction::Left);
        investigation.step(Direction::Left);
        let found = investigation.collect_clue().unwrap();
        assert_eq!(found.suspect, "Desconhecido");
    }

    #[test]
    fn same_text_in_two_rooms_is_listed_once_but_counted_twice() {
        let mut root = Room::new("Hall", "");
        root.set_child(Direction::Left, Room::new("A", "Luva"));
        root.set_child(Direction::Right, Room::new("B", "Luva"));
        let mut investigation = Investigation::new(RoomMap::from_root(root), ClueRules::default());

        investigation.step(Direction::Left);
        assert!(investigation.collect_clue().unwrap().new_clue);
        investigation.path.clear();
        investigation.step(Direction::Right);
        let second = investigation.collect_clue().unwrap();
        assert!(!second.new_clue);
        assert_eq!(second.suspect_count, 2);
        assert_eq!(investigation.ledger().len(), 1);
    }

    #[test]
    fn suspects_listing_groups_by_bucket() {
        let mut investigation = mansion();
        let mut out = Vec::new();
        investigation.write_suspects(&mut out).unwrap();
        assert!(String::from_utf8(out).unwrap().contains("Nenhuma associação registrada ainda."));

        investigation.step(Direction::Right);
        investigation.collect_clue();
        let mut out = Vec::new();
        investigation.write_suspects(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(&format!("Bucket [{}]:", bucket_index("Mordomo"))));
        assert!(text.contains("  -> Suspeito: Mordomo (Pistas Coletadas: 1)"));
    }

    #[test]
    fn verdict_without_evidence() {
        let investigation = mansion();
        let mut out = Vec::new();
        investigation.conclude(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Ainda não há evidências suficientes para apontar um suspeito."));
    }
}
