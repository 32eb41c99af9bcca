//! Lexical splitting of a command line into words.
//!
//! This is a deliberately small subset of shell word splitting: single and
//! double quotes group characters, a backslash escapes the next character,
//! and unquoted whitespace separates words. No expansion of any kind happens.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quote {
    Single,
    Double,
}

impl Quote {
    fn from_char(ch: char) -> Option<Self> {
        match ch {
            '\'' => Some(Quote::Single),
            '"' => Some(Quote::Double),
            _ => None,
        }
    }

    fn closes_with(self, ch: char) -> bool {
        matches!((self, ch), (Quote::Single, '\'') | (Quote::Double, '"'))
    }
}

/// Split a command line into words.
///
/// A closing quote always ends the current word, even when the quoted
/// section is empty, so `''` yields one empty word. Text left inside an
/// unterminated quote at the end of the input is discarded.
pub fn tokenize(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut quote: Option<Quote> = None;
    let mut escaped = false;

    for ch in input.chars() {
        if escaped {
            current.push(ch);
            escaped = false;
        } else if ch == '\\' {
            escaped = true;
        } else if let Some(q) = quote {
            if q.closes_with(ch) {
                quote = None;
                words.push(std::mem::take(&mut current));
            } else {
                current.push(ch);
            }
        } else if let Some(q) = Quote::from_char(ch) {
            quote = Some(q);
        } else if ch.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
        } else {
            current.push(ch);
        }
    }

    if quote.is_none() && !current.is_empty() {
        words.push(current);
    }

    words
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_words() {
        assert_eq!(tokenize("ls -la /tmp"), vec!["ls", "-la", "/tmp"]);
        assert_eq!(tokenize("  ls   -la  "), vec!["ls", "-la"]);
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t ").is_empty());
    }

    #[test]
    fn test_quoted_words() {
        assert_eq!(
            tokenize("git commit -am 'fix bug'"),
            vec!["git", "commit", "-am", "fix bug"]
        );
        assert_eq!(tokenize(r#"echo "hello world""#), vec!["echo", "hello world"]);
        assert_eq!(tokenize(r#"echo "it's""#), vec!["echo", "it's"]);
    }

    #[test]
    fn test_empty_quotes_produce_empty_word() {
        assert_eq!(tokenize("echo '' x"), vec!["echo", "", "x"]);
        assert_eq!(tokenize("''"), vec![""]);
    }

    #[test]
    fn test_escapes() {
        assert_eq!(tokenize(r"touch my\ file"), vec!["touch", "my file"]);
        assert_eq!(tokenize(r#"echo \"x\""#), vec!["echo", "\"x\""]);
        assert_eq!(tokenize(r"echo a\\b"), vec!["echo", r"a\b"]);
    }

    #[test]
    fn test_unterminated_quote_is_dropped() {
        assert_eq!(tokenize(r#"echo "abc"#), vec!["echo"]);
        assert_eq!(tokenize("echo 'abc def"), vec!["echo"]);
        // Text already buffered before the quote goes with it.
        assert_eq!(tokenize(r#"echo ab"cd"#), vec!["echo"]);
    }

    #[test]
    fn test_quote_flushes_preceding_text_into_same_word() {
        // The opening quote does not split; the closing quote flushes the lot.
        assert_eq!(tokenize("--msg='a b' c"), vec!["--msg=a b", "c"]);
    }
}
