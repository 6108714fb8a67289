//! Zipfian subreddit selection.
//!
//! Rank `i` gets weight `1/(i+1)` (Zipf with exponent 1), normalized into a
//! probability distribution. Selection walks the cumulative mass, so lower
//! ranks ("more popular" subreddits) are picked more often.

use rand::Rng;
use reddit_engine::utils::logging;

// ------------------------------------------------------------------------------------------------
// Pure functions
// ------------------------------------------------------------------------------------------------

/// Normalized Zipf(s=1) weights for `n` ranked items
pub fn zipf_weights(n: usize) -> Vec<f64> {
    let raw: Vec<f64> = (0..n).map(|i| 1.0 / (i as f64 + 1.0)).collect();
    let total: f64 = raw.iter().sum();
    raw.into_iter().map(|w| w / total).collect()
}

/// Picks the first item whose cumulative probability reaches `draw`.
///
/// `draw` is expected in `[0, 1)`. If floating point rounding leaves the draw
/// above the total mass, the last item is returned. Returns `None` only for
/// an empty slice.
pub fn weighted_select<T>(draw: f64, pairs: &[(f64, T)]) -> Option<&T> {
    let mut cumulative = 0.0;
    for (probability, item) in pairs {
        cumulative += probability;
        if cumulative >= draw {
            return Some(item);
        }
    }
    pairs.last().map(|(_, item)| item)
}

// ------------------------------------------------------------------------------------------------
// Data Structures
// ------------------------------------------------------------------------------------------------

/// Selects subreddits according to a Zipf distribution over their rank
pub struct ZipfSubredditSelector {
    pairs: Vec<(f64, String)>,
}

impl ZipfSubredditSelector {
    /// Creates a selector over `subreddits`, most popular first
    pub fn new(subreddits: Vec<String>) -> Self {
        logging::log(
            "ZIPF_SELECTOR",
            &format!("Creating subreddit selector over {} subreddits", subreddits.len()),
        );
        let weights = zipf_weights(subreddits.len());
        Self {
            pairs: weights.into_iter().zip(subreddits).collect(),
        }
    }

    /// Selects a subreddit using a caller supplied random source
    pub fn select<R: Rng>(&self, rng: &mut R) -> Option<&str> {
        let draw: f64 = rng.gen();
        weighted_select(draw, &self.pairs).map(String::as_str)
    }
}
