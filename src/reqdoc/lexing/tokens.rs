//! Token definitions for the reqdoc format
//!
//! The tokens are defined using the logos derive macro. Every byte of the input
//! belongs to exactly one token, so tokenization cannot fail and spans can be
//! used to slice the source back out verbatim.
use logos::Logos;

/// All possible tokens in the reqdoc format
#[derive(Logos, Debug, PartialEq, Eq, Clone, Copy)]
pub enum Token {
    // Line breaks
    #[token("\n")]
    Newline,

    // Everything up to the next line break, including any `\r` of a CRLF ending
    #[regex(r"[^\n]+")]
    Text,
}

/// Tokenize a string and collect tokens with their spans
pub fn tokenize(source: &str) -> Vec<(Token, logos::Span)> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        if let Ok(token) = result {
            tokens.push((token, lexer.span()));
        }
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source).into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(tokenize(""), vec![]);
    }

    #[test]
    fn test_text_and_newlines() {
        assert_eq!(
            kinds("headers\na: 1\n/headers"),
            vec![
                Token::Text,
                Token::Newline,
                Token::Text,
                Token::Newline,
                Token::Text
            ]
        );
    }

    #[test]
    fn test_consecutive_newlines() {
        assert_eq!(
            kinds("a\n\n\nb"),
            vec![
                Token::Text,
                Token::Newline,
                Token::Newline,
                Token::Newline,
                Token::Text
            ]
        );
    }

    #[test]
    fn test_carriage_return_stays_in_text() {
        let tokens = tokenize("a\r\nb");
        assert_eq!(tokens[0], (Token::Text, 0..2));
        assert_eq!(tokens[1], (Token::Newline, 2..3));
        assert_eq!(tokens[2], (Token::Text, 3..4));
    }

    #[test]
    fn test_spans_cover_input() {
        let source = "meta\nname: x\n\n/meta\n";
        let covered: usize = tokenize(source).iter().map(|(_, s)| s.len()).sum();
        assert_eq!(covered, source.len());
    }
}
