use crate::error::TrackerError;

/// Effect of a named trump card, resolved from the fixed table below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrumpEffect {
    /// "Go For N": replaces the active target while on the table.
    SetTarget(u32),
    /// Bet raiser: end-of-round damage dealt to the user's opponent +n.
    RaiseOpponentDamage(i32),
    /// Shield: end-of-round damage taken by the user -n.
    ShieldSelf(i32),
    /// Desire: end-of-round damage taken by the user is doubled.
    DoubleOwnDamage,
}

/// Legal "Go For" targets.
pub const TARGETS: [u32; 4] = [17, 21, 24, 27];

pub fn is_valid_target(target: u32) -> bool {
    TARGETS.contains(&target)
}

/// Player-facing names, in the order shown by `help`.
pub const TRUMP_NAMES: [&str; 8] = [
    "go for 17",
    "go for 24",
    "go for 27",
    "one-up",
    "two-up",
    "shield",
    "shield+",
    "desire",
];

/// Case-insensitive lookup of a trump name.
pub fn lookup(name: &str) -> Result<TrumpEffect, TrackerError> {
    let effect = match name.trim().to_lowercase().as_str() {
        "go for 17" => TrumpEffect::SetTarget(17),
        "go for 24" => TrumpEffect::SetTarget(24),
        "go for 27" => TrumpEffect::SetTarget(27),
        "one-up" => TrumpEffect::RaiseOpponentDamage(1),
        "two-up" => TrumpEffect::RaiseOpponentDamage(2),
        "shield" => TrumpEffect::ShieldSelf(1),
        "shield+" => TrumpEffect::ShieldSelf(2),
        "desire" => TrumpEffect::DoubleOwnDamage,
        other => return Err(TrackerError::UnknownModifier(other.to_string())),
    };
    Ok(effect)
}
