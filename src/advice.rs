/// Intel on a known opponent: how long they keep drawing and what their
/// trump kit does to you.
pub struct OpponentProfile {
    pub name: &'static str,
    /// Score the opponent stops drawing at.
    pub stay_value: u32,
    pub trumps: &'static [&'static str],
    pub tip: &'static str,
}

pub static OPPONENTS: [OpponentProfile; 5] = [
    OpponentProfile {
        name: "Lucas",
        stay_value: 17,
        trumps: &["one-up", "two-up", "shield"],
        tip: "Plays it straight until the last round, then stacks bet raisers. \
              Keep a shield in reserve.",
    },
    OpponentProfile {
        name: "Tally Mark Hoffman",
        stay_value: 16,
        trumps: &[],
        tip: "No trump kit and stops drawing early. Play the odds and save \
              your own trumps for later fights.",
    },
    OpponentProfile {
        name: "Bandaged Hoffman",
        stay_value: 17,
        trumps: &["one-up", "shield"],
        tip: "Raises your bet one step at a time. Answer a one-up with a \
              shield and keep drawing while the odds hold.",
    },
    OpponentProfile {
        name: "Molded Hoffman",
        stay_value: 18,
        trumps: &["two-up", "go for 24"],
        tip: "Switches the target to 24 when behind; re-check the odds after \
              every trump he plays.",
    },
    OpponentProfile {
        name: "Undead Hoffman",
        stay_value: 18,
        trumps: &["two-up", "desire", "go for 27"],
        tip: "Desire doubles what you lose. Stand early rather than chase a \
              high target against him.",
    },
];

pub fn find_opponent(name: &str) -> Option<&'static OpponentProfile> {
    let wanted = name.trim().to_lowercase();
    OPPONENTS.iter().find(|o| o.name.to_lowercase() == wanted)
}

pub fn opponent_names() -> Vec<&'static str> {
    OPPONENTS.iter().map(|o| o.name).collect()
}

/// Hit-or-stand call for the player's current position. The opponent is
/// assumed to land at its stay value unless it busts.
pub fn recommend(score: u32, bust_probability: f64, opponent: &OpponentProfile) -> String {
    if bust_probability == 0.0 {
        return "Draw: no remaining card can bust you.".to_string();
    }
    if score >= opponent.stay_value {
        return format!(
            "Stand: you already match or beat {}'s stay value of {}.",
            opponent.name, opponent.stay_value
        );
    }
    if bust_probability < 0.5 {
        format!(
            "Draw: {:.0}% bust risk, and {} keeps drawing to {}.",
            bust_probability * 100.0,
            opponent.name,
            opponent.stay_value
        )
    } else {
        format!(
            "Stand: {:.0}% bust risk outweighs being under {}'s stay value.",
            bust_probability * 100.0,
            opponent.name
        )
    }
}
