/// Score of a hand: ranks sum directly, no soft values in this variant.
pub fn hand_score(hand: &[u8]) -> u32 {
    hand.iter().map(|&c| c as u32).sum()
}

/// Ranks from `remaining` that keep the hand at or under target.
pub fn safe_ranks(remaining: &[u8], score: u32, target: u32) -> Vec<u8> {
    let mut safe: Vec<u8> = remaining
        .iter()
        .copied()
        .filter(|&r| score + r as u32 <= target)
        .collect();
    safe.sort_unstable();
    safe
}

/// Fraction of remaining ranks that would push the hand over target.
/// 0.0 on an empty deck: no draw can happen, so no draw can bust.
pub fn bust_probability(remaining: &[u8], score: u32, target: u32) -> f64 {
    if remaining.is_empty() {
        return 0.0;
    }
    let busting = remaining
        .iter()
        .filter(|&&r| score + r as u32 > target)
        .count();
    busting as f64 / remaining.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_is_plain_sum() {
        assert_eq!(hand_score(&[10, 9]), 19);
        assert_eq!(hand_score(&[]), 0);
    }

    #[test]
    fn bust_probability_matches_hand_counting() {
        // Hand [10, 9] = 19 against 21: only 1 and 2 are safe.
        let remaining = [1, 2, 3, 4, 5, 6, 7, 8, 11];
        let p = bust_probability(&remaining, 19, 21);
        assert!((p - 7.0 / 9.0).abs() < 1e-12);
        assert_eq!(safe_ranks(&remaining, 19, 21), vec![1, 2]);
    }

    #[test]
    fn bust_probability_stays_in_unit_interval() {
        let remaining = [1, 2, 3];
        for score in 0..30 {
            let p = bust_probability(&remaining, score, 21);
            assert!((0.0..=1.0).contains(&p), "p={p} out of range");
        }
    }

    #[test]
    fn empty_deck_never_busts() {
        assert_eq!(bust_probability(&[], 20, 21), 0.0);
    }
}
