use std::io::{self, BufRead, Write};

use crate::advice::{self, OpponentProfile};
use crate::deck::{MAX_RANK, MIN_RANK};
use crate::error::TrackerError;
use crate::history::{HistoryStore, RoundRecord};
use crate::round::{Participant, Phase, RoundTracker};
use crate::trump;

/// Closed set of console commands. Anything unrecognized becomes
/// `Unknown` and is reported without stopping the loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Draw(Participant),
    Stand,
    NewRound(Option<u32>),
    Odds,
    Advice,
    UseTrump(String),
    Seen(u8),
    History,
    Status,
    Help,
    Quit,
    Unknown(String),
}

/// Case-insensitive tokenizer: first word picks the command, the rest is
/// its argument.
pub fn parse_command(line: &str) -> Command {
    let trimmed = line.trim();
    let lower = trimmed.to_lowercase();
    let mut words = lower.split_whitespace();
    let head = match words.next() {
        Some(head) => head,
        None => return Command::Unknown(String::new()),
    };
    let rest = words.collect::<Vec<_>>().join(" ");
    match head {
        "draw" | "hit" => match rest.as_str() {
            "" | "me" => Command::Draw(Participant::Player),
            "opp" | "opponent" => Command::Draw(Participant::Opponent),
            _ => Command::Unknown(trimmed.to_string()),
        },
        "stand" | "stay" => Command::Stand,
        "newround" | "new" => match rest.as_str() {
            "" => Command::NewRound(None),
            arg => match arg.parse::<u32>() {
                Ok(target) => Command::NewRound(Some(target)),
                Err(_) => Command::Unknown(trimmed.to_string()),
            },
        },
        "odds" => Command::Odds,
        "advice" => Command::Advice,
        "use" if !rest.is_empty() => Command::UseTrump(rest),
        "seen" => match rest.parse::<u8>() {
            Ok(rank) if (MIN_RANK..=MAX_RANK).contains(&rank) => Command::Seen(rank),
            _ => Command::Unknown(trimmed.to_string()),
        },
        "history" => Command::History,
        "status" => Command::Status,
        "help" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(trimmed.to_string()),
    }
}

/// 20-character HP fill bar, as the in-game rig renders it.
pub fn hp_bar(current: u32, maximum: u32, width: usize) -> String {
    let filled = if maximum == 0 {
        0
    } else {
        (current as usize * width) / maximum as usize
    };
    format!(
        "[{}{}] {current}/{maximum}",
        "#".repeat(filled),
        "-".repeat(width - filled)
    )
}

/// Blocking read/dispatch/print loop around a `RoundTracker`.
pub struct ConsoleLoop {
    tracker: RoundTracker,
    opponent: &'static OpponentProfile,
    store: Option<HistoryStore>,
    history: Vec<RoundRecord>,
}

impl ConsoleLoop {
    pub fn new(
        tracker: RoundTracker,
        opponent: &'static OpponentProfile,
        store: Option<HistoryStore>,
        history: Vec<RoundRecord>,
    ) -> Self {
        ConsoleLoop {
            tracker,
            opponent,
            store,
            history,
        }
    }

    /// Run until `quit`, end of input, or a side is eliminated.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut out: W) -> io::Result<()> {
        writeln!(out, "21 helper — opponent: {}", self.opponent.name)?;
        writeln!(out, "Type 'help' for commands, 'newround' to deal.")?;
        let mut line = String::new();
        loop {
            write!(out, "> ")?;
            out.flush()?;
            line.clear();
            if input.read_line(&mut line)? == 0 {
                break;
            }
            if line.trim().is_empty() {
                continue;
            }
            match parse_command(&line) {
                Command::Quit => break,
                command => {
                    self.dispatch(command, &mut out)?;
                    if self.tracker.match_over() {
                        self.print_match_result(&mut out)?;
                        break;
                    }
                }
            }
        }
        Ok(())
    }

    fn dispatch<W: Write>(&mut self, command: Command, out: &mut W) -> io::Result<()> {
        match command {
            Command::Draw(who) => self.handle_draw(who, out),
            Command::Stand => self.handle_resolution(out),
            Command::NewRound(target) => match self.tracker.start_round(target) {
                Ok(()) => {
                    writeln!(
                        out,
                        "New round. Target is {}, 11 cards in the deck.",
                        self.tracker.target()
                    )
                }
                Err(err) => writeln!(out, "{err}"),
            },
            Command::Odds => self.print_odds(out),
            Command::Advice => self.print_advice(out),
            Command::UseTrump(name) => match self.tracker.apply_modifier(Participant::Player, &name)
            {
                Ok(_) => writeln!(
                    out,
                    "Played '{name}'. Target {}, odds updated.",
                    self.tracker.target()
                ),
                Err(err @ TrackerError::UnknownModifier(_)) => {
                    writeln!(out, "Ignored: {err}. Known trumps: {}.", trump::TRUMP_NAMES.join(", "))
                }
                Err(err) => writeln!(out, "{err}"),
            },
            Command::Seen(rank) => match self.tracker.remove_seen(rank) {
                Ok(true) => writeln!(out, "Removed {rank} from the deck."),
                Ok(false) => writeln!(out, "{rank} was already out of the deck."),
                Err(err) => writeln!(out, "{err}"),
            },
            Command::History => self.print_history(out),
            Command::Status => self.print_status(out),
            Command::Help => self.print_help(out),
            Command::Unknown(raw) => {
                writeln!(out, "{}", TrackerError::Parse(raw))
            }
            Command::Quit => Ok(()),
        }
    }

    fn handle_draw<W: Write>(&mut self, who: Participant, out: &mut W) -> io::Result<()> {
        match self.tracker.draw(who) {
            Ok(card) => {
                let score = self.tracker.current_score(who);
                writeln!(out, "{} drew {card} (score {score}).", who.label())?;
                if who == Participant::Player && score > self.tracker.target() {
                    writeln!(out, "Bust! Over {}.", self.tracker.target())?;
                    return self.handle_resolution(out);
                }
                Ok(())
            }
            Err(TrackerError::EmptyDeck) => {
                writeln!(out, "Deck is empty — forcing a stand.")?;
                self.handle_resolution(out)
            }
            Err(err) => writeln!(out, "{err}"),
        }
    }

    fn handle_resolution<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        let record = match self.tracker.resolve_round() {
            Ok(record) => record,
            Err(err) => return writeln!(out, "{err}"),
        };
        match record.winner.as_str() {
            "player" => writeln!(
                out,
                "You win {} to {} — {} damage to {}.",
                record.player_score, record.opponent_score, record.damage, self.opponent.name
            )?,
            "opponent" => writeln!(
                out,
                "You lose {} to {} — {} damage to you.",
                record.player_score, record.opponent_score, record.damage
            )?,
            _ => writeln!(
                out,
                "Draw at {} / {} — no damage.",
                record.player_score, record.opponent_score
            )?,
        }
        self.history.push(record);
        if let Some(store) = &self.store {
            if let Err(err) = store.save(&self.history) {
                writeln!(out, "Warning: could not write history file: {err}")?;
            }
        }
        self.print_hp(out)
    }

    fn print_odds<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if self.tracker.phase() != Phase::InProgress {
            return writeln!(out, "{}", TrackerError::RoundNotStarted);
        }
        let score = self.tracker.current_score(Participant::Player);
        let bust = self.tracker.bust_probability(Participant::Player) * 100.0;
        let safe = self.tracker.safe_draws(Participant::Player);
        writeln!(
            out,
            "Score {score} / target {}. Bust chance {bust:.1}%.",
            self.tracker.target()
        )?;
        if safe.is_empty() {
            writeln!(out, "No safe draws left.")
        } else {
            let safe: Vec<String> = safe.iter().map(u8::to_string).collect();
            writeln!(out, "Safe draws: {}.", safe.join(", "))
        }
    }

    fn print_advice<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if self.tracker.phase() == Phase::InProgress {
            let score = self.tracker.current_score(Participant::Player);
            let bust = self.tracker.bust_probability(Participant::Player);
            writeln!(out, "{}", advice::recommend(score, bust, self.opponent))?;
        }
        writeln!(out, "{}: {}", self.opponent.name, self.opponent.tip)?;
        if !self.opponent.trumps.is_empty() {
            writeln!(out, "Watch for: {}.", self.opponent.trumps.join(", "))?;
        }
        Ok(())
    }

    fn print_history<W: Write>(&self, out: &mut W) -> io::Result<()> {
        if self.history.is_empty() {
            return writeln!(out, "No rounds recorded yet.");
        }
        for (i, r) in self.history.iter().enumerate() {
            writeln!(
                out,
                "R{}: {} ({} vs {}) — {} dmg",
                i + 1,
                r.winner,
                r.player_score,
                r.opponent_score,
                r.damage
            )?;
        }
        Ok(())
    }

    fn print_status<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let hand: Vec<String> = self
            .tracker
            .hand(Participant::Player)
            .iter()
            .map(u8::to_string)
            .collect();
        let opp: Vec<String> = self
            .tracker
            .hand(Participant::Opponent)
            .iter()
            .map(u8::to_string)
            .collect();
        writeln!(
            out,
            "Your hand: [{}] = {}. Opponent shows: [{}] = {}.",
            hand.join(", "),
            self.tracker.current_score(Participant::Player),
            opp.join(", "),
            self.tracker.current_score(Participant::Opponent)
        )?;
        writeln!(
            out,
            "Target {} — {} cards left in deck.",
            self.tracker.target(),
            self.tracker.deck_remaining().len()
        )?;
        self.print_hp(out)
    }

    fn print_hp<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            "You  {}",
            hp_bar(
                self.tracker.hp(Participant::Player),
                self.tracker.max_hp(Participant::Player),
                20
            )
        )?;
        writeln!(
            out,
            "{:<4} {}",
            self.opponent.name.split_whitespace().next().unwrap_or("Opp"),
            hp_bar(
                self.tracker.hp(Participant::Opponent),
                self.tracker.max_hp(Participant::Opponent),
                20
            )
        )
    }

    fn print_match_result<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match self.tracker.eliminated() {
            Some(Participant::Opponent) => {
                writeln!(out, "{} is out of HP. You win the match!", self.opponent.name)
            }
            Some(Participant::Player) => writeln!(out, "You are out of HP. Match over."),
            None => Ok(()),
        }
    }

    fn print_help<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "Commands:")?;
        writeln!(out, "  newround [17|21|24|27]  start a round (default target 21)")?;
        writeln!(out, "  draw [opp]              draw a card for you or the opponent")?;
        writeln!(out, "  stand                   stop drawing and resolve the round")?;
        writeln!(out, "  odds                    bust chance and safe draws")?;
        writeln!(out, "  advice                  hit/stand call and opponent intel")?;
        writeln!(out, "  use <trump>             play a trump card")?;
        writeln!(out, "  seen <rank>             mark a rank as out of the deck")?;
        writeln!(out, "  history                 completed rounds")?;
        writeln!(out, "  status                  hands, target, HP")?;
        writeln!(out, "  quit                    leave")?;
        writeln!(out, "Trumps: {}.", trump::TRUMP_NAMES.join(", "))
    }
}
