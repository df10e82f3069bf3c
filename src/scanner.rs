use std::iter::Peekable;
use std::str::Chars;

use phf::phf_map;
use thiserror::Error;

use crate::token::{Token, TokenType};

// reserved words, fixed at compile time
static KEYWORDS: phf::Map<&'static str, TokenType> = phf_map! {
    "and" => TokenType::And,
    "class" => TokenType::Class,
    "else" => TokenType::Else,
    "false" => TokenType::False,
    "fun" => TokenType::Fun,
    "for" => TokenType::For,
    "if" => TokenType::If,
    "nil" => TokenType::Nil,
    "or" => TokenType::Or,
    "print" => TokenType::Print,
    "return" => TokenType::Return,
    "super" => TokenType::Super,
    "this" => TokenType::This,
    "true" => TokenType::True,
    "var" => TokenType::Var,
    "while" => TokenType::While,
};

/// public interface for tokenizing.
/// Lexical errors never abort the scan: the token list always ends with EOF,
/// and the errors that came up along the way are returned next to it in the
/// order they occurred. Whether they are fatal is the caller's call.
pub fn tokenize(source: &str) -> (Vec<Token>, Vec<ScanningError>) {
    let mut scanner = Scanner::new(source);
    scanner.scan_tokens();
    (scanner.tokens, scanner.errors)
}

struct Scanner<'a> {
    source: &'a str,
    char_iter: Peekable<Chars<'a>>,
    tokens: Vec<Token>,
    errors: Vec<ScanningError>,

    // position of the start of lexeme
    current_lexeme_start: usize,
    current: usize,
    line: usize,
}

#[derive(Debug, Error, PartialEq)]
pub enum ScanningError {
    #[error("Unrecognized character.")]
    UnrecognizedCharacter { line: usize, character: char },
    #[error("Unterminated string.")]
    UnterminatedString { line: usize },
}
impl ScanningError {
    // not sure how I feel about this. But also wrapping the error in yet another struct feels bad.
    pub fn get_line(&self) -> usize {
        match self {
            ScanningError::UnrecognizedCharacter { line, .. }
            | ScanningError::UnterminatedString { line, .. } => *line,
        }
    }
}

impl Scanner<'_> {
    fn new(source: &str) -> Scanner {
        Scanner {
            source,
            char_iter: source.chars().peekable(),
            tokens: vec![],
            errors: vec![],
            current_lexeme_start: 0,
            current: 0,
            line: 1,
        }
    }

    fn scan_tokens(&mut self) {
        while !self.is_at_end() {
            if let Err(scanning_error) = self.scan_token() {
                self.errors.push(scanning_error);
            }
        }
        self.tokens.push(Token {
            r#type: TokenType::EOF,
            lexeme: "".to_string(),
            line: self.line,
        });
    }

    fn scan_token(&mut self) -> Result<(), ScanningError> {
        // set start of lexeme
        self.current_lexeme_start = self.current;
        let c: char = self.advance();
        let maybe_token_type = match c {
            '(' => Some(TokenType::LeftParen),
            ')' => Some(TokenType::RightParen),
            '{' => Some(TokenType::LeftBrace),
            '}' => Some(TokenType::RightBrace),
            ',' => Some(TokenType::Comma),
            '.' => Some(TokenType::Dot),
            '-' => Some(TokenType::Minus),
            '+' => Some(TokenType::Plus),
            ';' => Some(TokenType::Semicolon),
            '*' => Some(TokenType::Star),
            '!' => match self.match_one('=') {
                true => Some(TokenType::BangEqual),
                false => Some(TokenType::Bang),
            },
            '=' => match self.match_one('=') {
                true => Some(TokenType::EqualEqual),
                false => Some(TokenType::Equal),
            },
            '<' => match self.match_one('=') {
                true => Some(TokenType::LessEqual),
                false => Some(TokenType::Less),
            },
            '>' => match self.match_one('=') {
                true => Some(TokenType::GreaterEqual),
                false => Some(TokenType::Greater),
            },
            '/' => {
                if self.match_one('/') {
                    // comment runs to the end of the line. The newline itself
                    // is left for the next scan_token call to count.
                    while self.peek_one() != Some(&'\n') && self.peek_one() != None {
                        self.advance();
                    }
                    None
                } else {
                    Some(TokenType::Slash)
                }
            }
            ' ' | '\t' => None,
            '\n' => {
                self.line += 1;
                None
            }
            '"' => {
                self.consume_if_match_string()?;
                None
            }
            c if is_digit(&c) => Some(self.consume_if_match_number()),
            c if is_alpha(&c) => Some(self.consume_if_match_identifier()),
            _ => {
                return Err(ScanningError::UnrecognizedCharacter {
                    line: self.line,
                    character: c,
                });
            }
        };

        if let Some(token_type) = maybe_token_type {
            self.add_token(token_type);
        }
        Ok(())
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.source.len()
    }

    fn match_one(&mut self, expected: char) -> bool {
        if self.is_at_end() {
            return false;
        }
        if self.peek_one() != Some(&expected) {
            return false;
        }
        self.advance();
        true
    }

    fn advance(&mut self) -> char {
        // callers always check is_at_end or peek first
        let current_char = self.char_iter.next().expect("advance past end of input");
        self.current += current_char.len_utf8();
        current_char
    }

    fn add_token(&mut self, token_type: TokenType) {
        // slicing bytes is only safe because current_lexeme_start and current
        // always sit on character boundaries
        let text: String = self.source[self.current_lexeme_start..self.current].to_string();
        self.add_token_with_lexeme(token_type, text);
    }

    // for tokens whose lexeme is not the raw source slice (strings)
    fn add_token_with_lexeme(&mut self, token_type: TokenType, lexeme: String) {
        self.tokens.push(Token {
            r#type: token_type,
            lexeme,
            line: self.line,
        });
    }

    /// like advance but does not consume the character. 1 lookahead.
    fn peek_one(&mut self) -> Option<&char> {
        self.char_iter.peek()
    }

    /// 2 lookahead, only needed to decide whether a '.' after digits starts
    /// a fractional part.
    fn peek_two(&self) -> Option<char> {
        self.source[self.current..].chars().nth(1)
    }

    fn consume_if_match_string(&mut self) -> Result<(), ScanningError> {
        // strings don't span lines: stop at a newline too and let the outer
        // loop count it
        while let Some(&c) = self.peek_one() {
            if c == '"' || c == '\n' {
                break;
            }
            self.advance();
        }

        if self.peek_one() != Some(&'"') {
            // abandon the literal without consuming the newline (if any),
            // scanning resumes right here
            return Err(ScanningError::UnterminatedString { line: self.line });
        }

        // consume closing quote
        self.advance();

        // both quotes are excluded from the lexeme
        let lexeme = self.source[self.current_lexeme_start + 1..self.current - 1].to_string();
        self.add_token_with_lexeme(TokenType::String, lexeme);
        Ok(())
    }

    fn consume_if_match_number(&mut self) -> TokenType {
        while self.peek_one().is_some_and(is_digit) {
            self.advance();
        }

        // a '.' only belongs to the number when a digit follows it, so `1..2`
        // lexes as NUMBER DOT DOT NUMBER
        if self.peek_one() == Some(&'.') && self.peek_two().is_some_and(|c| is_digit(&c)) {
            // consume the '.'
            self.advance();

            while self.peek_one().is_some_and(is_digit) {
                self.advance();
            }
        }

        TokenType::Number
    }

    fn consume_if_match_identifier(&mut self) -> TokenType {
        while self.peek_one().is_some_and(is_alphanumeric) {
            self.advance();
        }

        let lexeme = &self.source[self.current_lexeme_start..self.current];

        match KEYWORDS.get(lexeme) {
            Some(keyword_token) => keyword_token.clone(),
            None => TokenType::Identifier,
        }
    }
}

fn is_digit(c: &char) -> bool {
    matches!(c, '0'..='9')
}
fn is_alpha(c: &char) -> bool {
    matches!(c, 'a'..='z' | 'A'..='Z' | '_')
}
fn is_alphanumeric(c: &char) -> bool {
    is_digit(c) || is_alpha(c)
}
