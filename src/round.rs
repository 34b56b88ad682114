use crate::deck::Deck;
use crate::error::TrackerError;
use crate::hand;
use crate::history::RoundRecord;
use crate::trump::{self, TrumpEffect};

pub const DEFAULT_TARGET: u32 = 21;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Participant {
    Player,
    Opponent,
}

impl Participant {
    pub fn other(self) -> Participant {
        match self {
            Participant::Player => Participant::Opponent,
            Participant::Opponent => Participant::Player,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Participant::Player => "player",
            Participant::Opponent => "opponent",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    NotStarted,
    InProgress,
    Resolved,
}

/// One side of the table: hand for the current round, HP across rounds,
/// and pending end-of-round damage modifiers (reset every round).
struct Side {
    hand: Vec<u8>,
    hp: u32,
    max_hp: u32,
    damage_bonus: i32,
    damage_multiplier: u32,
}

impl Side {
    fn new(hp: u32) -> Self {
        Side {
            hand: Vec::new(),
            hp,
            max_hp: hp,
            damage_bonus: 0,
            damage_multiplier: 1,
        }
    }

    fn reset_round(&mut self) {
        self.hand.clear();
        self.damage_bonus = 0;
        self.damage_multiplier = 1;
    }
}

/// Deck state, both hands, HP pools, and round lifecycle for one match.
pub struct RoundTracker {
    deck: Deck,
    target: u32,
    phase: Phase,
    player: Side,
    opponent: Side,
    opponent_stay: u32,
    removed: Vec<u8>,
}

impl RoundTracker {
    pub fn new(player_hp: u32, opponent_hp: u32, opponent_stay: u32, seed: u64) -> Self {
        RoundTracker {
            deck: Deck::new(seed),
            target: DEFAULT_TARGET,
            phase: Phase::NotStarted,
            player: Side::new(player_hp),
            opponent: Side::new(opponent_hp),
            opponent_stay,
            removed: Vec::new(),
        }
    }

    fn side(&self, who: Participant) -> &Side {
        match who {
            Participant::Player => &self.player,
            Participant::Opponent => &self.opponent,
        }
    }

    fn side_mut(&mut self, who: Participant) -> &mut Side {
        match who {
            Participant::Player => &mut self.player,
            Participant::Opponent => &mut self.opponent,
        }
    }

    /// Reset the deck to the full 1-11 rank set, clear both hands and all
    /// per-round modifiers, and set the active target.
    pub fn start_round(&mut self, target: Option<u32>) -> Result<(), TrackerError> {
        if self.match_over() {
            return Err(TrackerError::MatchOver);
        }
        let target = target.unwrap_or(DEFAULT_TARGET);
        if !trump::is_valid_target(target) {
            return Err(TrackerError::Parse(format!("target {target}")));
        }
        self.deck.reset();
        self.player.reset_round();
        self.opponent.reset_round();
        self.removed.clear();
        self.target = target;
        self.phase = Phase::InProgress;
        Ok(())
    }

    /// Random draw without replacement into the given hand.
    pub fn draw(&mut self, who: Participant) -> Result<u8, TrackerError> {
        self.require_in_progress()?;
        let card = self.deck.draw()?;
        self.side_mut(who).hand.push(card);
        Ok(card)
    }

    /// Mark a rank as gone from the deck without assigning it to a hand,
    /// e.g. a card removed from play on the real table.
    pub fn remove_seen(&mut self, rank: u8) -> Result<bool, TrackerError> {
        self.require_in_progress()?;
        let removed = self.deck.remove_rank(rank);
        if removed {
            self.removed.push(rank);
        }
        Ok(removed)
    }

    pub fn current_score(&self, who: Participant) -> u32 {
        hand::hand_score(&self.side(who).hand)
    }

    pub fn bust_probability(&self, who: Participant) -> f64 {
        hand::bust_probability(self.deck.remaining(), self.current_score(who), self.target)
    }

    pub fn safe_draws(&self, who: Participant) -> Vec<u8> {
        hand::safe_ranks(self.deck.remaining(), self.current_score(who), self.target)
    }

    /// Apply a named trump for `who`. Target changers replace the active
    /// target; damage modifiers accumulate until the round resolves.
    pub fn apply_modifier(
        &mut self,
        who: Participant,
        name: &str,
    ) -> Result<TrumpEffect, TrackerError> {
        self.require_in_progress()?;
        let effect = trump::lookup(name)?;
        match effect {
            TrumpEffect::SetTarget(target) => self.target = target,
            TrumpEffect::RaiseOpponentDamage(n) => {
                self.side_mut(who.other()).damage_bonus += n;
            }
            TrumpEffect::ShieldSelf(n) => self.side_mut(who).damage_bonus -= n,
            TrumpEffect::DoubleOwnDamage => self.side_mut(who).damage_multiplier *= 2,
        }
        Ok(effect)
    }

    /// Finish the round: the opponent draws to its stay value, the winner
    /// is decided by closest-to-target-without-busting, and damage lands
    /// on the loser's HP. Returns the history record for the round.
    pub fn resolve_round(&mut self) -> Result<RoundRecord, TrackerError> {
        self.require_in_progress()?;
        // A busted player has already lost; the opponent stops drawing.
        if self.current_score(Participant::Player) <= self.target {
            self.play_opponent();
        }

        let player_score = self.current_score(Participant::Player);
        let opponent_score = self.current_score(Participant::Opponent);
        let winner = self.decide_winner(player_score, opponent_score);

        let damage = match winner {
            Some(winner) => {
                let loser = winner.other();
                let damage = self.compute_damage(winner, loser);
                let side = self.side_mut(loser);
                side.hp = side.hp.saturating_sub(damage);
                damage
            }
            None => 0,
        };

        self.phase = Phase::Resolved;
        Ok(RoundRecord {
            winner: winner.map_or("draw", Participant::label).to_string(),
            player_score,
            opponent_score,
            damage,
        })
    }

    /// The opponent keeps drawing until it reaches its stay value, busts,
    /// or empties the deck. Its stay value never exceeds the target, so a
    /// raised target just means it stops early.
    fn play_opponent(&mut self) {
        loop {
            let score = self.current_score(Participant::Opponent);
            if score >= self.opponent_stay.min(self.target) {
                break;
            }
            match self.deck.draw() {
                Ok(card) => self.opponent.hand.push(card),
                Err(_) => break,
            }
        }
    }

    fn decide_winner(&self, player_score: u32, opponent_score: u32) -> Option<Participant> {
        let player_bust = player_score > self.target;
        let opponent_bust = opponent_score > self.target;
        match (player_bust, opponent_bust) {
            (true, true) => None,
            (true, false) => Some(Participant::Opponent),
            (false, true) => Some(Participant::Player),
            (false, false) => {
                if player_score > opponent_score {
                    Some(Participant::Player)
                } else if opponent_score > player_score {
                    Some(Participant::Opponent)
                } else {
                    None
                }
            }
        }
    }

    /// Base damage is the score gap (bust margin when the loser busted),
    /// never below 1; the loser's pending modifiers then scale and shift
    /// it, floored at 0.
    fn compute_damage(&self, winner: Participant, loser: Participant) -> u32 {
        let winner_score = self.current_score(winner);
        let loser_score = self.current_score(loser);
        let gap = if loser_score > self.target {
            loser_score - self.target
        } else {
            winner_score - loser_score
        };
        let base = gap.max(1);
        let side = self.side(loser);
        let scaled = base as i64 * side.damage_multiplier as i64 + side.damage_bonus as i64;
        scaled.max(0) as u32
    }

    fn require_in_progress(&self) -> Result<(), TrackerError> {
        match self.phase {
            Phase::InProgress => Ok(()),
            _ => Err(TrackerError::RoundNotStarted),
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn hand(&self, who: Participant) -> &[u8] {
        &self.side(who).hand
    }

    pub fn hp(&self, who: Participant) -> u32 {
        self.side(who).hp
    }

    pub fn max_hp(&self, who: Participant) -> u32 {
        self.side(who).max_hp
    }

    pub fn deck_remaining(&self) -> &[u8] {
        self.deck.remaining()
    }

    /// A side at 0 HP ends the match; no further rounds start.
    pub fn match_over(&self) -> bool {
        self.player.hp == 0 || self.opponent.hp == 0
    }

    pub fn eliminated(&self) -> Option<Participant> {
        if self.player.hp == 0 {
            Some(Participant::Player)
        } else if self.opponent.hp == 0 {
            Some(Participant::Opponent)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tracker() -> RoundTracker {
        RoundTracker::new(10, 10, 17, 42)
    }

    /// Push known cards into a hand without the deck's randomness.
    fn force_hand(t: &mut RoundTracker, who: Participant, cards: &[u8]) {
        for &card in cards {
            assert!(t.remove_seen(card).unwrap(), "rank {card} should be in deck");
            match who {
                Participant::Player => t.player.hand.push(card),
                Participant::Opponent => t.opponent.hand.push(card),
            }
            t.removed.pop();
        }
    }

    #[test]
    fn deck_and_hands_partition_the_rank_set() {
        let mut t = tracker();
        t.start_round(None).unwrap();
        for _ in 0..3 {
            t.draw(Participant::Player).unwrap();
        }
        t.draw(Participant::Opponent).unwrap();
        let dead = t.deck_remaining()[0];
        t.remove_seen(dead).unwrap();

        let mut all: Vec<u8> = t.deck_remaining().to_vec();
        all.extend_from_slice(t.hand(Participant::Player));
        all.extend_from_slice(t.hand(Participant::Opponent));
        all.extend_from_slice(&t.removed);
        all.sort_unstable();
        assert_eq!(all, (1..=11).collect::<Vec<u8>>());
    }

    #[test]
    fn nineteen_against_twenty_one_leaves_two_safe_ranks() {
        let mut t = tracker();
        t.start_round(None).unwrap();
        force_hand(&mut t, Participant::Player, &[10, 9]);
        assert_eq!(t.current_score(Participant::Player), 19);
        // 9 ranks remain; only 1 and 2 keep the hand at or under 21.
        assert_eq!(t.safe_draws(Participant::Player), vec![1, 2]);
        let p = t.bust_probability(Participant::Player);
        assert!((p - 7.0 / 9.0).abs() < 1e-12, "p = {p}");
    }

    #[test]
    fn opponent_bust_gives_player_win_with_margin_damage() {
        let mut t = tracker();
        t.start_round(None).unwrap();
        force_hand(&mut t, Participant::Player, &[10, 8]);
        force_hand(&mut t, Participant::Opponent, &[11, 9, 5]);
        let record = t.resolve_round().unwrap();
        assert_eq!(record.winner, "player");
        assert_eq!(record.player_score, 18);
        assert_eq!(record.opponent_score, 25);
        // max(1, 25 - 21) at the default x1 multiplier.
        assert_eq!(record.damage, 4);
        assert_eq!(t.hp(Participant::Opponent), 6);
        assert_eq!(t.hp(Participant::Player), 10, "winner HP unchanged");
    }

    #[test]
    fn both_bust_is_a_draw_with_no_damage() {
        let mut t = tracker();
        t.start_round(None).unwrap();
        force_hand(&mut t, Participant::Player, &[11, 10, 2]);
        force_hand(&mut t, Participant::Opponent, &[9, 8, 7]);
        let record = t.resolve_round().unwrap();
        assert_eq!(record.winner, "draw");
        assert_eq!(record.damage, 0);
        assert_eq!(t.hp(Participant::Player), 10);
        assert_eq!(t.hp(Participant::Opponent), 10);
    }

    #[test]
    fn busted_player_loses_before_the_opponent_draws_again() {
        let mut t = RoundTracker::new(10, 10, 17, 3);
        t.start_round(None).unwrap();
        force_hand(&mut t, Participant::Player, &[11, 10, 2]);
        force_hand(&mut t, Participant::Opponent, &[9, 7]);
        let record = t.resolve_round().unwrap();
        assert_eq!(record.winner, "opponent");
        assert_eq!(
            record.opponent_score, 16,
            "opponent must not keep drawing against a busted player"
        );
        // Bust margin 23 - 21 at the default x1 multiplier.
        assert_eq!(record.damage, 2);
        assert_eq!(t.hp(Participant::Player), 8);
        assert_eq!(t.hp(Participant::Opponent), 10);
    }

    #[test]
    fn equal_standing_scores_draw() {
        let mut t = RoundTracker::new(10, 10, 18, 1);
        t.start_round(None).unwrap();
        force_hand(&mut t, Participant::Player, &[10, 8]);
        force_hand(&mut t, Participant::Opponent, &[11, 7]);
        let record = t.resolve_round().unwrap();
        assert_eq!(record.winner, "draw");
        assert_eq!(record.damage, 0);
    }

    #[test]
    fn go_for_24_changes_target_and_odds() {
        let mut t = tracker();
        t.start_round(None).unwrap();
        force_hand(&mut t, Participant::Player, &[10, 9]);
        t.apply_modifier(Participant::Player, "go for 24").unwrap();
        assert_eq!(t.target(), 24);
        // At 19 against 24, safe ranks are now 1-5 (those still in deck).
        assert_eq!(t.safe_draws(Participant::Player), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn unknown_modifier_is_rejected() {
        let mut t = tracker();
        t.start_round(None).unwrap();
        assert!(matches!(
            t.apply_modifier(Participant::Player, "black magic"),
            Err(TrackerError::UnknownModifier(_))
        ));
    }

    #[test]
    fn two_up_raises_damage_taken_by_the_opponent() {
        let mut t = tracker();
        t.start_round(None).unwrap();
        force_hand(&mut t, Participant::Player, &[10, 8]);
        force_hand(&mut t, Participant::Opponent, &[11, 9, 5]);
        t.apply_modifier(Participant::Player, "two-up").unwrap();
        let record = t.resolve_round().unwrap();
        assert_eq!(record.damage, 6, "4 base + 2 from two-up");
        assert_eq!(t.hp(Participant::Opponent), 4);
    }

    #[test]
    fn desire_doubles_damage_the_user_takes() {
        let mut t = tracker();
        t.start_round(None).unwrap();
        force_hand(&mut t, Participant::Player, &[11, 10, 3]);
        force_hand(&mut t, Participant::Opponent, &[10, 7]);
        // Enemy attack card played against the player.
        t.apply_modifier(Participant::Player, "desire").unwrap();
        let record = t.resolve_round().unwrap();
        assert_eq!(record.winner, "opponent");
        // Bust margin 3, minimum applies to base, then doubled.
        assert_eq!(record.damage, 6);
        assert_eq!(t.hp(Participant::Player), 4);
    }

    #[test]
    fn shield_can_reduce_damage_to_zero_but_hp_never_goes_negative() {
        let mut t = RoundTracker::new(1, 10, 17, 5);
        t.start_round(None).unwrap();
        force_hand(&mut t, Participant::Player, &[10, 7]);
        force_hand(&mut t, Participant::Opponent, &[11, 7]);
        t.apply_modifier(Participant::Player, "shield+").unwrap();
        let record = t.resolve_round().unwrap();
        assert_eq!(record.winner, "opponent");
        // Base gap 1, shield+ takes it to -1, floored at 0.
        assert_eq!(record.damage, 0);
        assert_eq!(t.hp(Participant::Player), 1);
        assert!(!t.match_over());
    }

    #[test]
    fn elimination_stops_new_rounds() {
        let mut t = RoundTracker::new(2, 10, 17, 5);
        t.start_round(None).unwrap();
        force_hand(&mut t, Participant::Player, &[11, 10, 6]);
        force_hand(&mut t, Participant::Opponent, &[10, 8]);
        let record = t.resolve_round().unwrap();
        assert!(record.damage >= 2);
        assert_eq!(t.hp(Participant::Player), 0);
        assert_eq!(t.eliminated(), Some(Participant::Player));
        assert!(matches!(t.start_round(None), Err(TrackerError::MatchOver)));
    }

    #[test]
    fn new_round_fully_resets_leftover_state() {
        let mut t = tracker();
        t.start_round(Some(24)).unwrap();
        t.draw(Participant::Player).unwrap();
        t.draw(Participant::Opponent).unwrap();
        t.apply_modifier(Participant::Player, "shield").unwrap();
        t.resolve_round().unwrap();

        t.start_round(None).unwrap();
        assert_eq!(t.target(), DEFAULT_TARGET);
        assert_eq!(t.deck_remaining().len(), 11);
        assert!(t.hand(Participant::Player).is_empty());
        assert!(t.hand(Participant::Opponent).is_empty());
        assert_eq!(t.player.damage_bonus, 0);
        assert_eq!(t.player.damage_multiplier, 1);
    }

    #[test]
    fn draw_outside_a_round_is_rejected() {
        let mut t = tracker();
        assert!(matches!(
            t.draw(Participant::Player),
            Err(TrackerError::RoundNotStarted)
        ));
    }

    #[test]
    fn invalid_target_is_rejected() {
        let mut t = tracker();
        assert!(matches!(
            t.start_round(Some(22)),
            Err(TrackerError::Parse(_))
        ));
    }

    #[test]
    fn opponent_draws_to_its_stay_value_on_resolution() {
        let mut t = RoundTracker::new(10, 10, 16, 8);
        t.start_round(None).unwrap();
        force_hand(&mut t, Participant::Player, &[10, 7]);
        t.resolve_round().unwrap();
        let score = t.current_score(Participant::Opponent);
        assert!(score >= 16, "opponent stopped at {score}");
    }
}
