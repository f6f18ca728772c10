// Command line tokenizing
//
// Splits a raw line into words on unquoted whitespace. Single and double
// quotes group words; a backslash escapes the next character outside single
// quotes. An unterminated quote runs to the end of the line.

pub fn parse_line(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current_arg = String::new();
    let mut in_word = false;
    let mut quote_char: Option<char> = None;
    let mut chars = input.chars();

    while let Some(ch) = chars.next() {
        match (quote_char, ch) {
            (None, '"' | '\'') => {
                quote_char = Some(ch);
                in_word = true;
            }
            (Some(q), _) if ch == q => {
                quote_char = None;
            }
            (Some('\''), _) => current_arg.push(ch),
            (_, '\\') => {
                if let Some(escaped) = chars.next() {
                    current_arg.push(escaped);
                }
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current_arg));
                    in_word = false;
                }
            }
            _ => {
                current_arg.push(ch);
                in_word = true;
            }
        }
    }

    if in_word {
        words.push(current_arg);
    }

    words
}

#[cfg(test)]
mod tests {
    use super::parse_line;
    use pretty_assertions::assert_eq;

    fn words(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_whitespace_split() {
        assert_eq!(parse_line("help extra  args"), words(&["help", "extra", "args"]));
        assert_eq!(parse_line("  \t set\tRHOST  10.0.0.1 "), words(&["set", "RHOST", "10.0.0.1"]));
    }

    #[test]
    fn test_blank_lines() {
        assert!(parse_line("").is_empty());
        assert!(parse_line("   \t ").is_empty());
    }

    #[test]
    fn test_quotes_group_words() {
        assert_eq!(
            parse_line("set banner \"hello world\" 'a b'"),
            words(&["set", "banner", "hello world", "a b"])
        );
        assert_eq!(parse_line("echo \"\""), words(&["echo", ""]));
        assert_eq!(parse_line("echo pre\"fix\"ed"), words(&["echo", "prefixed"]));
    }

    #[test]
    fn test_escapes() {
        assert_eq!(parse_line(r"echo a\ b"), words(&["echo", "a b"]));
        assert_eq!(parse_line(r#"echo "say \"hi\"""#), words(&["echo", "say \"hi\""]));
        assert_eq!(parse_line(r"echo 'c:\dir'"), words(&["echo", r"c:\dir"]));
    }

    #[test]
    fn test_unterminated_quote_runs_to_end() {
        assert_eq!(parse_line("echo \"open ended"), words(&["echo", "open ended"]));
    }
}
