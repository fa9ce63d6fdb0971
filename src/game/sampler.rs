//! Length-matching pair selection.
//!
//! Picks a random AI message, then samples the real pool a bounded number of
//! times and keeps the candidate whose length is closest to it. Cost per
//! pairing is bounded by [`MAX_DRAWS`] whatever the pool size.

use rand::Rng;

use crate::types::{AiMessage, RealMessage};

/// Upper bound on real-pool draws per pairing
pub const MAX_DRAWS: usize = 100;

/// Indices into the pools handed to [`select_pair`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pair {
    pub ai: usize,
    pub real: usize,
}

/// Character length as shown to the player
pub fn text_len(text: &str) -> usize {
    text.chars().count()
}

/// Pick an AI target and a real message of similar length.
///
/// Draws are with replacement, so fewer than `MAX_DRAWS` distinct candidates
/// may be seen. Ties keep the first candidate. Returns `None` if either pool
/// is empty.
pub fn select_pair<R: Rng>(
    rng: &mut R,
    ai_pool: &[AiMessage],
    real_pool: &[RealMessage],
) -> Option<Pair> {
    if ai_pool.is_empty() || real_pool.is_empty() {
        return None;
    }

    let ai = rng.random_range(0..ai_pool.len());
    let target_len = text_len(&ai_pool[ai].text);

    let mut best: Option<(usize, usize)> = None;
    for _ in 0..MAX_DRAWS.min(real_pool.len()) {
        let candidate = rng.random_range(0..real_pool.len());
        let difference = text_len(&real_pool[candidate].text).abs_diff(target_len);

        match best {
            Some((_, best_difference)) if difference >= best_difference => {}
            _ => best = Some((candidate, difference)),
        }
    }

    let real = match best {
        Some((index, _)) => index,
        None => rng.random_range(0..real_pool.len()),
    };

    Some(Pair { ai, real })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn real(text: &str) -> RealMessage {
        RealMessage {
            timestamp: "2024-01-01 12:00:00".to_string(),
            author: "alice".to_string(),
            external_link: "http://x".to_string(),
            text: text.to_string(),
        }
    }

    fn ai(id: usize, text: &str) -> AiMessage {
        AiMessage {
            id,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_single_candidate_pair() {
        let mut rng = StdRng::seed_from_u64(1);
        let ai_pool = [ai(0, "this is a test message")];
        let real_pool = vec![real("hello there friend")];

        let pair = select_pair(&mut rng, &ai_pool, &real_pool).unwrap();
        assert_eq!(pair, Pair { ai: 0, real: 0 });
    }

    #[test]
    fn test_empty_pools_yield_none() {
        let mut rng = StdRng::seed_from_u64(1);
        let ai_pool = [ai(0, "this is a test message")];

        assert!(select_pair(&mut rng, &ai_pool, &[]).is_none());
        assert!(select_pair(&mut rng, &[], &[real("hello there friend")]).is_none());
    }

    #[test]
    fn test_pools_are_not_mutated() {
        let mut rng = StdRng::seed_from_u64(7);
        let ai_pool = [ai(0, "first generated line"), ai(1, "second generated line")];
        let real_pool = vec![real("hello there friend"), real("what a play that was")];
        let before = real_pool.clone();

        for _ in 0..50 {
            let pair = select_pair(&mut rng, &ai_pool, &real_pool).unwrap();
            assert!(pair.ai < ai_pool.len());
            assert!(pair.real < real_pool.len());
        }

        assert_eq!(real_pool, before);
        assert_eq!(ai_pool.len(), 2);
    }

    #[test]
    fn test_prefers_closer_length() {
        // Half the pool matches the target length exactly, the other half is far off.
        // Ten draws all missing the exact half is a 1 in 1024 event per seed.
        let target = "x".repeat(40);
        let ai_pool = [ai(0, &target)];

        let mut real_pool: Vec<RealMessage> = (0..5).map(|_| real(&"y".repeat(200))).collect();
        real_pool.extend((0..5).map(|_| real(&"z".repeat(40))));

        let mut exact = 0;
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let pair = select_pair(&mut rng, &ai_pool, &real_pool).unwrap();
            if text_len(&real_pool[pair.real].text) == 40 {
                exact += 1;
            }
        }
        assert!(exact >= 18, "exact match chosen only {} of 20 times", exact);
    }

    #[test]
    fn test_uniform_ai_target() {
        let ai_pool = [ai(0, "first generated line"), ai(1, "second generated line")];
        let real_pool = vec![real("hello there friend")];

        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = [0usize; 2];
        for _ in 0..200 {
            let pair = select_pair(&mut rng, &ai_pool, &real_pool).unwrap();
            seen[pair.ai] += 1;
        }
        assert!(seen[0] > 50 && seen[1] > 50, "skewed draw: {:?}", seen);
    }

    #[test]
    fn test_text_len_counts_chars() {
        assert_eq!(text_len("héllo"), 5);
        assert_eq!(text_len(""), 0);
    }
}
