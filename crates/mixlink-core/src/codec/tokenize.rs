/// Split a line into tokens.
///
/// Tokens are separated by whitespace. A double-quoted run is part of its
/// token with the quotes removed, so `"Kick Drum"` is one token and `""`
/// is an empty one. An unterminated quote runs to the end of the line.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut started = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                started = true;
            }
            c if c.is_whitespace() && !quoted => {
                if started {
                    tokens.push(std::mem::take(&mut current));
                    started = false;
                }
            }
            c => {
                current.push(c);
                started = true;
            }
        }
    }
    if started {
        tokens.push(current);
    }
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_tokens() {
        assert_eq!(
            tokenize("OK set MIXER:Current/InCh/Fader/Level 0 0 -32768"),
            vec!["OK", "set", "MIXER:Current/InCh/Fader/Level", "0", "0", "-32768"]
        );
    }

    #[test]
    fn test_quoted_tokens() {
        assert_eq!(
            tokenize(r#"OK get MIXER:Current/InCh/Label/Name 3 0 "Kick Drum""#),
            vec!["OK", "get", "MIXER:Current/InCh/Label/Name", "3", "0", "Kick Drum"]
        );
        assert_eq!(tokenize(r#"a "" b"#), vec!["a", "", "b"]);
        assert_eq!(tokenize(r#"ab"c d"e"#), vec!["abc de"]);
    }

    #[test]
    fn test_whitespace_only() {
        assert!(tokenize("   \t ").is_empty());
        assert_eq!(tokenize("  a   b  "), vec!["a", "b"]);
    }

    #[test]
    fn test_unterminated_quote() {
        assert_eq!(tokenize(r#"x "open end"#), vec!["x", "open end"]);
    }
}
