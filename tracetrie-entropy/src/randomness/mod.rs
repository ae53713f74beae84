// tracetrie-entropy/src/randomness/mod.rs
use libm::log2;

/// Minimum count of alphanumeric characters before a string is even
/// considered for the random-token heuristic.
pub const RANDOM_COUNT_THRESHOLD: usize = 4;

/// Maximum tolerated normalized imbalance between lower- and upper-case
/// character counts before a string is rejected as "random".
pub const RANDOM_DELTA_CASE_THRESHOLD: f64 = 0.2;

/// Minimum normalized Shannon entropy (1.0 being "ideally random") required
/// for a string to be accepted as a random-looking token.
pub const RANDOM_ENTROPY_THRESHOLD: f64 = 0.85;

const LOCASE_SPAN: usize = 1 + (b'z' - b'a') as usize;
const UPCASE_SPAN: usize = 1 + (b'Z' - b'A') as usize;
const DECIMAL_SPAN: usize = 1 + (b'9' - b'0') as usize;
const FREQ_TABLE_LEN: usize = LOCASE_SPAN + UPCASE_SPAN + DECIMAL_SPAN;

/// Heuristically decides whether `s` looks like a randomly generated
/// alphanumeric sequence (session id, API key, hex digest, ...).
///
/// This reproduces the reference estimator byte for byte: a guessed
/// "alphabet span" is derived from which character kinds were seen (6 per
/// case if only hex letters appeared, 26 if any non-hex letter appeared, +10
/// if decimals appeared), the case balance is checked with a threshold that
/// relaxes on short inputs, and the Shannon entropy of the character
/// frequency histogram is normalized against that span before being compared
/// to [`RANDOM_ENTROPY_THRESHOLD`].
pub fn is_random_alphanums(s: &str) -> bool {
    let mut freqs = [0usize; FREQ_TABLE_LEN];
    let mut cnt_relevant = 0usize;
    let mut cnt_locase = 0usize;
    let mut cnt_upcase = 0usize;
    let mut has_not_hexadecimals = false;
    let mut has_decimals = false;

    for c in s.bytes() {
        if c.is_ascii_lowercase() {
            if c > b'f' {
                has_not_hexadecimals = true;
            }
            cnt_locase += 1;
            cnt_relevant += 1;
            freqs[(c - b'a') as usize] += 1;
        } else if c.is_ascii_uppercase() {
            if c > b'F' {
                has_not_hexadecimals = true;
            }
            cnt_upcase += 1;
            cnt_relevant += 1;
            freqs[LOCASE_SPAN + (c - b'A') as usize] += 1;
        } else if c.is_ascii_digit() {
            has_decimals = true;
            cnt_relevant += 1;
            freqs[LOCASE_SPAN + UPCASE_SPAN + (c - b'0') as usize] += 1;
        }
    }

    if cnt_relevant < RANDOM_COUNT_THRESHOLD {
        return false;
    }

    // Guessed span of unique values the observed characters could be drawn from.
    let mut span = 0usize;
    if cnt_locase != 0 {
        span += if has_not_hexadecimals { 26 } else { 6 };
    }
    if cnt_upcase != 0 {
        span += if has_not_hexadecimals { 26 } else { 6 };
    }

    if cnt_locase != 0 && cnt_upcase != 0 {
        // In true randomness, lower- and upper-case occur in roughly equal amounts.
        let cnt_bothcase = cnt_locase + cnt_upcase;
        let delta_case = cnt_locase.abs_diff(cnt_upcase);
        let mut norm_delta_case = delta_case as f64 / cnt_bothcase as f64;
        // Relax the check on short sequences, where imbalance is expected by chance.
        let span_quarter = (span / 4) as f64;
        norm_delta_case /= 1.0 + (span_quarter / (span_quarter + cnt_bothcase as f64));
        if norm_delta_case > RANDOM_DELTA_CASE_THRESHOLD {
            return false;
        }
    }

    if has_decimals {
        span += 10;
    }
    if span == 0 {
        return false;
    }

    // Sort-of Shannon entropy estimation over the observed character histogram.
    let mut entropy = 0.0f64;
    for &freq in freqs.iter() {
        if freq != 0 {
            let v = freq as f64 / cnt_relevant as f64;
            entropy -= v * log2(v);
        }
    }

    let mut span_redundancy = cnt_relevant / span;
    if span_redundancy * span < cnt_relevant {
        span_redundancy += 1;
    }

    entropy /= log2(cnt_relevant as f64 / span_redundancy as f64);

    entropy > RANDOM_ENTROPY_THRESHOLD
}
