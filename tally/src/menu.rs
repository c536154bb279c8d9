//! Interactive menu loop over a [`Registry`].
//!
//! The session is generic over its console so tests can drive it with
//! scripted input. State reaches disk only through "Save and Exit".

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::core::record::RecordFormat;
use crate::core::registry::{Registry, RegistryError, VoteOutcome};
use crate::io::config::TallyConfig;
use crate::io::store::{LoadSource, load_registry, save_registry};

/// Numbered menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    AddCandidate,
    DisplayCandidates,
    CastVote,
    DisplayResults,
    SaveAndExit,
}

impl MenuChoice {
    /// Parse a typed menu number. Anything else is an invalid choice.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().parse::<i64>().ok()? {
            1 => Some(Self::AddCandidate),
            2 => Some(Self::DisplayCandidates),
            3 => Some(Self::CastVote),
            4 => Some(Self::DisplayResults),
            5 => Some(Self::SaveAndExit),
            _ => None,
        }
    }
}

/// How a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEnd {
    /// The user chose "Save and Exit". `saved` is false if the write failed.
    Exited { saved: bool },
    /// Input closed first; nothing was written.
    InputClosed,
}

/// Whether the current action let the loop continue or ran out of input.
enum Next {
    Continue,
    Closed,
}

/// Registry plus the persistence settings it was loaded with.
#[derive(Debug)]
pub struct Session {
    registry: Registry,
    source: LoadSource,
    data_file: PathBuf,
    format: RecordFormat,
}

impl Session {
    /// Load the registry described by `cfg`, starting empty if there is no data file.
    pub fn open(cfg: &TallyConfig) -> Self {
        let loaded = load_registry(&cfg.data_file, cfg.format, cfg.max_candidates);
        Self {
            registry: loaded.registry,
            source: loaded.source,
            data_file: cfg.data_file.clone(),
            format: cfg.format,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn source(&self) -> LoadSource {
        self.source
    }

    /// Run the menu until the user exits or `input` is exhausted.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, output: W) -> Result<SessionEnd> {
        let mut console = Console { input, output };
        info!(
            data_file = %self.data_file.display(),
            candidates = self.registry.len(),
            "session started"
        );

        match self.source {
            LoadSource::Fresh => console.say("No previous results found. Starting fresh.")?,
            LoadSource::File { .. } => console.say("Results loaded successfully!")?,
        }

        loop {
            console.show_menu()?;
            let Some(line) = console.prompt("Enter your choice: ")? else {
                return self.abandon(&mut console);
            };
            let next = match MenuChoice::parse(&line) {
                Some(MenuChoice::AddCandidate) => self.add_candidate(&mut console)?,
                Some(MenuChoice::DisplayCandidates) => self.display_candidates(&mut console)?,
                Some(MenuChoice::CastVote) => self.cast_vote(&mut console)?,
                Some(MenuChoice::DisplayResults) => self.display_results(&mut console)?,
                Some(MenuChoice::SaveAndExit) => return self.save_and_exit(&mut console),
                None => {
                    console.say("Invalid choice. Please try again.")?;
                    Next::Continue
                }
            };
            if let Next::Closed = next {
                return self.abandon(&mut console);
            }
        }
    }

    fn add_candidate<R: BufRead, W: Write>(
        &mut self,
        console: &mut Console<R, W>,
    ) -> Result<Next> {
        if self.registry.is_full() {
            console.say("Maximum number of candidates reached.")?;
            return Ok(Next::Continue);
        }

        let Some(raw_id) = console.prompt("Enter Candidate ID: ")? else {
            return Ok(Next::Closed);
        };
        let Ok(id) = raw_id.trim().parse::<i64>() else {
            console.say("Invalid Candidate ID.")?;
            return Ok(Next::Continue);
        };
        if self.registry.contains_id(id) {
            console.say("Candidate ID already exists. Try again.")?;
            return Ok(Next::Continue);
        }

        let Some(name) = console.prompt("Enter Candidate Name: ")? else {
            return Ok(Next::Closed);
        };
        if !self.format.accepts_name(&name) {
            console.say("Candidate name must not contain a comma.")?;
            return Ok(Next::Continue);
        }

        match self.registry.add(id, &name) {
            Ok(_) => console.say("Candidate added successfully!")?,
            Err(RegistryError::Full { .. }) => {
                console.say("Maximum number of candidates reached.")?;
            }
            Err(RegistryError::DuplicateId { .. }) => {
                console.say("Candidate ID already exists. Try again.")?;
            }
        }
        Ok(Next::Continue)
    }

    fn display_candidates<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
    ) -> Result<Next> {
        console.say("\nCandidates List:")?;
        match self.registry.list() {
            Some(candidates) => {
                for candidate in candidates {
                    console.say(&format!(
                        "ID: {}, Name: {}, Votes: {}",
                        candidate.id, candidate.name, candidate.votes
                    ))?;
                }
            }
            None => console.say("No candidates available.")?,
        }
        Ok(Next::Continue)
    }

    fn cast_vote<R: BufRead, W: Write>(&mut self, console: &mut Console<R, W>) -> Result<Next> {
        let Some(voter_id) = console.prompt("Enter your voter ID (for reference only): ")? else {
            return Ok(Next::Closed);
        };
        let Some(raw_id) = console.prompt("Enter Candidate ID to vote for: ")? else {
            return Ok(Next::Closed);
        };
        let Ok(candidate_id) = raw_id.trim().parse::<i64>() else {
            console.say("Invalid Candidate ID. Vote not counted.")?;
            return Ok(Next::Continue);
        };

        match self.registry.cast_vote(voter_id.trim(), candidate_id) {
            VoteOutcome::Counted { name, .. } => {
                console.say(&format!("Vote cast successfully for {name}."))?;
            }
            VoteOutcome::UnknownCandidate => {
                console.say("Invalid Candidate ID. Vote not counted.")?;
            }
            VoteOutcome::Saturated { name } => {
                console.say(&format!(
                    "Vote counter for {name} is at its maximum. Vote not counted."
                ))?;
            }
        }
        Ok(Next::Continue)
    }

    fn display_results<R: BufRead, W: Write>(&self, console: &mut Console<R, W>) -> Result<Next> {
        console.say("\nVoting Results:")?;
        match self.registry.results() {
            Some(results) => {
                for (name, votes) in results {
                    console.say(&format!("Candidate: {name}, Votes: {votes}"))?;
                }
            }
            None => console.say("No results to display.")?,
        }
        Ok(Next::Continue)
    }

    fn save_and_exit<R: BufRead, W: Write>(
        &self,
        console: &mut Console<R, W>,
    ) -> Result<SessionEnd> {
        let saved = match save_registry(&self.data_file, self.format, &self.registry) {
            Ok(()) => {
                console.say("Results saved successfully!")?;
                true
            }
            Err(err) => {
                warn!(error = %format!("{err:#}"), "save failed");
                console.say("Error saving results to file.")?;
                false
            }
        };
        console.say("Exiting the system. Goodbye!")?;
        info!(saved, candidates = self.registry.len(), "session ended");
        Ok(SessionEnd::Exited { saved })
    }

    fn abandon<R: BufRead, W: Write>(&self, console: &mut Console<R, W>) -> Result<SessionEnd> {
        warn!(candidates = self.registry.len(), "input closed before save");
        console.say("\nInput closed. Unsaved changes were discarded.")?;
        Ok(SessionEnd::InputClosed)
    }
}

/// Line-oriented prompt/response console.
struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    fn say(&mut self, line: &str) -> Result<()> {
        writeln!(self.output, "{line}").context("write to console")
    }

    fn show_menu(&mut self) -> Result<()> {
        self.say(
            "\nVoting System Menu:\n\
             1. Add Candidate\n\
             2. Display Candidates\n\
             3. Cast Vote\n\
             4. Display Results\n\
             5. Save and Exit",
        )
    }

    /// Print `text` without a newline and read one answer.
    ///
    /// Returns `None` once input is exhausted. The line terminator is removed
    /// and bytes that are not UTF-8 become U+FFFD, so a garbled line is just
    /// invalid input.
    fn prompt(&mut self, text: &str) -> Result<Option<String>> {
        write!(self.output, "{text}").context("write prompt")?;
        self.output.flush().context("flush prompt")?;

        let mut buf = Vec::new();
        let read = self
            .input
            .read_until(b'\n', &mut buf)
            .context("read console input")?;
        if read == 0 {
            return Ok(None);
        }
        if buf.ends_with(b"\n") {
            buf.pop();
            if buf.ends_with(b"\r") {
                buf.pop();
            }
        }
        Ok(Some(String::from_utf8_lossy(&buf).into_owned()))
    }
}
