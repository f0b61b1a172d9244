//! Levenshtein edit distance.
//!
//! Counts the minimum number of single-character insertions, deletions and
//! substitutions turning one string into another. Comparison is over Unicode
//! scalar values and is case-sensitive; callers lowercase both sides first
//! when they want case-insensitive matching.

/// Edit distance between `a` and `b`.
///
/// Classic dynamic programme over a `(len(a)+1) x (len(b)+1)` table, kept
/// as two rolling rows:
///
/// ```text
/// dp[i][0] = i
/// dp[0][j] = j
/// dp[i][j] = min(dp[i-1][j] + 1, dp[i][j-1] + 1, dp[i-1][j-1] + (a[i-1] != b[j-1]))
/// ```
///
/// # Examples
///
/// ```
/// use wikifind_search::distance::distance;
///
/// assert_eq!(distance("kitten", "sitting"), 3);
/// assert_eq!(distance("albrt einsten", "albert einstein"), 2);
/// ```
pub fn distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Edit distance after lowercasing both sides.
pub fn distance_ignore_case(a: &str, b: &str) -> usize {
    distance(&a.to_lowercase(), &b.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLES: &[&str] = &[
        "",
        "a",
        "ab",
        "kitten",
        "sitting",
        "Albert Einstein",
        "albrt einsten",
        "Saturday",
        "Sunday",
        "naïve",
        "naive",
        "日本語",
    ];

    #[test]
    fn known_distances() {
        assert_eq!(distance("kitten", "sitting"), 3);
        assert_eq!(distance("Saturday", "Sunday"), 3);
        assert_eq!(distance("flaw", "lawn"), 2);
        assert_eq!(distance("abc", "abc"), 0);
    }

    #[test]
    fn empty_strings() {
        assert_eq!(distance("", ""), 0);
        assert_eq!(distance("", "abc"), 3);
        assert_eq!(distance("abc", ""), 3);
    }

    #[test]
    fn case_sensitive_by_default() {
        assert_eq!(distance("Einstein", "einstein"), 1);
        assert_eq!(distance_ignore_case("Einstein", "einstein"), 0);
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert_eq!(distance("naïve", "naive"), 1);
        assert_eq!(distance("日本語", "日本"), 1);
    }

    #[test]
    fn misspelled_name_within_two_edits() {
        assert_eq!(distance_ignore_case("Albrt Einsten", "Albert Einstein"), 2);
    }

    #[test]
    fn symmetric_identity_and_bounded() {
        for a in SAMPLES {
            assert_eq!(distance(a, a), 0, "identity failed for {a:?}");
            for b in SAMPLES {
                let ab = distance(a, b);
                assert_eq!(ab, distance(b, a), "symmetry failed for {a:?} / {b:?}");
                let bound = a.chars().count().max(b.chars().count());
                assert!(ab <= bound, "{a:?} / {b:?}: {ab} > {bound}");
            }
        }
    }
}
