//! Filename pattern matching for archive queries.

/// Matches `name` against `pattern`, where `*` matches any run of
/// characters (including none). All other characters are literal.
#[must_use]
pub fn matches(pattern: &str, name: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        matches_chars(
            &pattern.chars().collect::<Vec<_>>(),
            &name.chars().collect::<Vec<_>>(),
        )
    } else {
        matches_chars(
            &pattern.to_lowercase().chars().collect::<Vec<_>>(),
            &name.to_lowercase().chars().collect::<Vec<_>>(),
        )
    }
}

/// Whether the string contains a wildcard at all.
#[must_use]
pub fn is_pattern(s: &str) -> bool {
    s.contains('*')
}

// Iterative greedy match with backtracking to the last star.
fn matches_chars(pattern: &[char], name: &[char]) -> bool {
    let mut p = 0;
    let mut n = 0;
    let mut star: Option<usize> = None;
    let mut star_n = 0;

    while n < name.len() {
        if p < pattern.len() && (pattern[p] == name[n]) {
            p += 1;
            n += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            star = Some(p);
            star_n = n;
            p += 1;
        } else if let Some(sp) = star {
            p = sp + 1;
            star_n += 1;
            n = star_n;
        } else {
            return false;
        }
    }
    while p < pattern.len() && pattern[p] == '*' {
        p += 1;
    }
    p == pattern.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_match() {
        assert!(matches("scene.cfg", "scene.cfg", true));
        assert!(!matches("scene.cfg", "scene.cfgx", true));
        assert!(!matches("scene.cfg", "Scene.cfg", true));
    }

    #[test]
    fn test_star_matches_any_run() {
        assert!(matches("*.material", "rock.material", true));
        assert!(matches("*.material", ".material", true));
        assert!(!matches("*.material", "rock.mat", true));
        assert!(matches("tex*one*", "texture_stone", true));
    }

    #[test]
    fn test_star_backtracking() {
        assert!(matches("*ab*ab", "abxabab", true));
        assert!(!matches("*ab*abc", "abxabab", true));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(matches("*.PNG", "logo.png", false));
        assert!(!matches("*.PNG", "logo.png", true));
    }

    #[test]
    fn test_is_pattern() {
        assert!(is_pattern("*.cfg"));
        assert!(!is_pattern("exact.cfg"));
    }
}
