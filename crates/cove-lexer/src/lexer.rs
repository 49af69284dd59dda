//! The Cove lexer.
//! Cove 词法分析器。

use crate::token::{Token, TokenKind};
use cove_common::Span;
use cove_diagnostic::{Diagnostic, DiagnosticKind, ErrorCode, Label};

/// The Cove lexer.
/// Cove 词法分析器。
///
/// Converts source code into a sequence of tokens terminated by `Eof`.
/// 将源代码转换为以 `Eof` 结尾的 token 序列。
///
/// Lexical errors are recorded as diagnostics and produce `Error`
/// tokens; lexing always runs to the end of the input.
pub struct Lexer<'src> {
    /// Character iterator with position info
    /// 带位置信息的字符迭代器
    chars: std::iter::Peekable<std::str::CharIndices<'src>>,
    /// Current position in source
    /// 当前在源码中的位置
    pos: usize,
    /// Collected diagnostics (errors/warnings)
    /// 收集的诊断信息（错误/警告）
    diagnostics: Vec<Diagnostic>,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source code.
    /// 为给定的源代码创建新的词法分析器。
    pub fn new(source: &'src str) -> Self {
        Self {
            chars: source.char_indices().peekable(),
            pos: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Tokenize the entire source and return tokens and diagnostics.
    /// 对整个源码进行词法分析，返回 token 和诊断信息。
    ///
    /// The returned token list always ends with exactly one `Eof`.
    pub fn tokenize(mut self) -> (Vec<Token>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token();
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }

        (tokens, self.diagnostics)
    }

    fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.pos;

        let Some((_pos, ch)) = self.advance() else {
            return Token::new(TokenKind::Eof, Span::from_usize(start, start));
        };

        let kind = match ch {
            // Single character tokens
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            ',' => TokenKind::Comma,
            ';' => TokenKind::Semicolon,
            ':' => TokenKind::Colon,
            '?' => TokenKind::Question,
            '~' => TokenKind::Tilde,
            '.' => TokenKind::Dot,

            // Plus, PlusPlus, PlusEq
            '+' => {
                if self.eat_char('+') {
                    TokenKind::PlusPlus
                } else if self.eat_char('=') {
                    TokenKind::PlusEq
                } else {
                    TokenKind::Plus
                }
            }

            // Minus, MinusMinus, MinusEq, Arrow
            '-' => {
                if self.eat_char('-') {
                    TokenKind::MinusMinus
                } else if self.eat_char('=') {
                    TokenKind::MinusEq
                } else if self.eat_char('>') {
                    TokenKind::Arrow
                } else {
                    TokenKind::Minus
                }
            }

            // Star or StarEq
            '*' => {
                if self.eat_char('=') {
                    TokenKind::StarEq
                } else {
                    TokenKind::Star
                }
            }

            // Slash, SlashEq, or a comment
            '/' => {
                if self.eat_char('/') {
                    self.skip_line_comment();
                    return self.next_token();
                } else if self.eat_char('*') {
                    self.skip_block_comment(start);
                    return self.next_token();
                } else if self.eat_char('=') {
                    TokenKind::SlashEq
                } else {
                    TokenKind::Slash
                }
            }

            // Percent or PercentEq
            '%' => {
                if self.eat_char('=') {
                    TokenKind::PercentEq
                } else {
                    TokenKind::Percent
                }
            }

            // Equals
            '=' => {
                if self.eat_char('=') {
                    TokenKind::EqEq
                } else {
                    TokenKind::Eq
                }
            }

            // Bang (logical not)
            '!' => {
                if self.eat_char('=') {
                    TokenKind::BangEq
                } else {
                    TokenKind::Bang
                }
            }

            // Less than, shifts
            '<' => {
                if self.eat_char('=') {
                    TokenKind::LtEq
                } else if self.eat_char('<') {
                    if self.eat_char('=') {
                        TokenKind::ShlEq
                    } else {
                        TokenKind::Shl
                    }
                } else {
                    TokenKind::Lt
                }
            }

            // Greater than, shifts
            '>' => {
                if self.eat_char('=') {
                    TokenKind::GtEq
                } else if self.eat_char('>') {
                    if self.eat_char('=') {
                        TokenKind::ShrEq
                    } else {
                        TokenKind::Shr
                    }
                } else {
                    TokenKind::Gt
                }
            }

            // Ampersand
            '&' => {
                if self.eat_char('&') {
                    TokenKind::AmpAmp
                } else if self.eat_char('=') {
                    TokenKind::AmpEq
                } else {
                    TokenKind::Amp
                }
            }

            // Pipe
            '|' => {
                if self.eat_char('|') {
                    TokenKind::PipePipe
                } else if self.eat_char('=') {
                    TokenKind::PipeEq
                } else {
                    TokenKind::Pipe
                }
            }

            // Caret
            '^' => {
                if self.eat_char('=') {
                    TokenKind::CaretEq
                } else {
                    TokenKind::Caret
                }
            }

            // String literal
            '"' => self.string_literal(),

            // Char literal
            '\'' => self.char_literal(),

            // Numbers
            '0'..='9' => self.number(ch),

            // Identifiers and keywords
            'a'..='z' | 'A'..='Z' | '_' => self.identifier(ch),

            _ => {
                self.error_unexpected_char(ch, start);
                TokenKind::Error
            }
        };

        Token::new(kind, Span::from_usize(start, self.pos))
    }

    /// Advance to the next character.
    /// 前进到下一个字符。
    fn advance(&mut self) -> Option<(usize, char)> {
        let result = self.chars.next();
        if let Some((pos, ch)) = result {
            self.pos = pos + ch.len_utf8();
        }
        result
    }

    /// Peek at the next character without consuming it.
    /// 查看下一个字符但不消费它。
    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, ch)| *ch)
    }

    /// Consume the next character if it equals `expected`.
    /// 如果下一个字符等于 `expected` 则消费它。
    fn eat_char(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Skip whitespace characters.
    /// 跳过空白字符。
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Skip a line comment (`//` to end of line).
    /// 跳过行注释（`//` 到行尾）。
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek_char() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Skip a block comment (`/*` ... `*/`).
    /// 跳过块注释（`/*` ... `*/`）。
    fn skip_block_comment(&mut self, start: usize) {
        loop {
            match self.advance() {
                Some((_, '*')) => {
                    if self.eat_char('/') {
                        break;
                    }
                }
                Some(_) => {}
                None => {
                    let span = Span::from_usize(start, self.pos);
                    self.diagnostics.push(
                        Diagnostic::error(DiagnosticKind::Lexer, span, "unterminated block comment")
                            .with_code(ErrorCode::UnterminatedComment),
                    );
                    break;
                }
            }
        }
    }

    /// Parse a string literal (double-quoted).
    /// 解析字符串字面量（双引号）。
    fn string_literal(&mut self) -> TokenKind {
        let mut value = String::new();
        let start = self.pos;

        loop {
            match self.advance() {
                Some((_, '"')) => break,
                Some((_, '\n')) | None => {
                    let span = Span::from_usize(start, self.pos);
                    self.diagnostics.push(
                        Diagnostic::error(DiagnosticKind::Lexer, span, "unterminated string")
                            .with_code(ErrorCode::UnterminatedString),
                    );
                    return TokenKind::Error;
                }
                Some((_, '\\')) => {
                    if let Some(escaped) = self.escape_char() {
                        value.push(escaped);
                    }
                }
                Some((_, ch)) => value.push(ch),
            }
        }

        TokenKind::StrLit(value)
    }

    /// Parse a character literal (single-quoted).
    /// 解析字符字面量（单引号）。
    fn char_literal(&mut self) -> TokenKind {
        let start = self.pos;

        let ch = match self.advance() {
            Some((_, '\\')) => self.escape_char(),
            Some((_, ch)) => Some(ch),
            None => None,
        };

        match self.advance() {
            Some((_, '\'')) => {}
            _ => {
                let span = Span::from_usize(start, self.pos);
                self.diagnostics.push(
                    Diagnostic::error(DiagnosticKind::Lexer, span, "unterminated character literal")
                        .with_code(ErrorCode::UnterminatedChar),
                );
                return TokenKind::Error;
            }
        }

        match ch {
            Some(c) => TokenKind::CharLit(c),
            None => TokenKind::Error,
        }
    }

    /// Parse an escape character sequence.
    /// 解析转义字符序列。
    fn escape_char(&mut self) -> Option<char> {
        match self.advance() {
            Some((_, 'n')) => Some('\n'),
            Some((_, 'r')) => Some('\r'),
            Some((_, 't')) => Some('\t'),
            Some((_, '0')) => Some('\0'),
            Some((_, '\\')) => Some('\\'),
            Some((_, '"')) => Some('"'),
            Some((_, '\'')) => Some('\''),
            Some((pos, ch)) => {
                let span = Span::from_usize(pos, self.pos);
                self.diagnostics.push(
                    Diagnostic::error(
                        DiagnosticKind::Lexer,
                        span,
                        format!("invalid escape sequence: \\{}", ch),
                    )
                    .with_code(ErrorCode::InvalidEscape),
                );
                None
            }
            None => None,
        }
    }

    /// Parse an integer or floating-point literal.
    /// 解析整数或浮点数字面量。
    fn number(&mut self, first: char) -> TokenKind {
        let start = self.pos - first.len_utf8();
        let mut value = String::from(first);
        let mut is_float = false;

        // Hex and octal prefixes
        if first == '0' {
            match self.peek_char() {
                Some('x' | 'X') => {
                    self.advance();
                    return self.hex_number(start);
                }
                Some('0'..='7') => return self.octal_number(start),
                _ => {}
            }
        }

        // Integer part
        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_digit() {
                value.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        // Decimal part
        if self.peek_char() == Some('.') {
            // Look ahead so `x.y` member access on a literal stays two tokens
            let mut chars = self.chars.clone();
            chars.next(); // skip .
            if let Some((_, ch)) = chars.next()
                && ch.is_ascii_digit()
            {
                self.advance(); // consume .
                value.push('.');
                is_float = true;

                while let Some(ch) = self.peek_char() {
                    if ch.is_ascii_digit() {
                        value.push(ch);
                        self.advance();
                    } else {
                        break;
                    }
                }
            }
        }

        // Exponent
        if let Some('e' | 'E') = self.peek_char() {
            self.advance();
            value.push('e');
            is_float = true;

            if let Some('+' | '-') = self.peek_char() {
                value.push(self.advance().unwrap().1);
            }

            while let Some(ch) = self.peek_char() {
                if ch.is_ascii_digit() {
                    value.push(ch);
                    self.advance();
                } else {
                    break;
                }
            }
        }

        // Integer/float suffixes are accepted and ignored
        while let Some('u' | 'U' | 'l' | 'L' | 'f' | 'F') = self.peek_char() {
            if matches!(self.peek_char(), Some('f' | 'F')) {
                is_float = true;
            }
            self.advance();
        }

        if is_float {
            match value.parse::<f64>() {
                Ok(f) => TokenKind::FloatLit(f),
                Err(_) => self.error_invalid_number(start),
            }
        } else {
            match value.parse::<i64>() {
                Ok(i) => TokenKind::IntLit(i),
                Err(_) => self.error_invalid_number(start),
            }
        }
    }

    /// Parse a hexadecimal number (0x...).
    /// 解析十六进制数（0x...）。
    fn hex_number(&mut self, start: usize) -> TokenKind {
        let mut value = String::new();

        while let Some(ch) = self.peek_char() {
            if ch.is_ascii_hexdigit() {
                value.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        while let Some('u' | 'U' | 'l' | 'L') = self.peek_char() {
            self.advance();
        }

        match i64::from_str_radix(&value, 16) {
            Ok(i) => TokenKind::IntLit(i),
            Err(_) => self.error_invalid_number(start),
        }
    }

    /// Parse an octal number (leading 0).
    /// 解析八进制数（前导 0）。
    fn octal_number(&mut self, start: usize) -> TokenKind {
        let mut value = String::new();

        while let Some(ch) = self.peek_char() {
            if ('0'..='7').contains(&ch) {
                value.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        while let Some('u' | 'U' | 'l' | 'L') = self.peek_char() {
            self.advance();
        }

        match i64::from_str_radix(&value, 8) {
            Ok(i) => TokenKind::IntLit(i),
            Err(_) => self.error_invalid_number(start),
        }
    }

    /// Parse an identifier or keyword.
    /// 解析标识符或关键字。
    fn identifier(&mut self, first: char) -> TokenKind {
        let mut value = String::from(first);

        while let Some(ch) = self.peek_char() {
            if ch.is_alphanumeric() || ch == '_' {
                value.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        TokenKind::keyword_from_str(&value).unwrap_or(TokenKind::Ident(value))
    }

    /// Report an unexpected character error.
    fn error_unexpected_char(&mut self, ch: char, pos: usize) {
        let span = Span::from_usize(pos, self.pos);
        self.diagnostics.push(
            Diagnostic::error(
                DiagnosticKind::Lexer,
                span,
                format!("unexpected character: '{}'", ch),
            )
            .with_code(ErrorCode::UnexpectedCharacter)
            .with_label(Label::new(span, "unexpected character here")),
        );
    }

    /// Report an invalid number literal and return an error token kind.
    fn error_invalid_number(&mut self, start: usize) -> TokenKind {
        let span = Span::from_usize(start, self.pos);
        self.diagnostics.push(
            Diagnostic::error(DiagnosticKind::Lexer, span, "invalid number literal")
                .with_code(ErrorCode::InvalidNumber),
        );
        TokenKind::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let (tokens, diagnostics) = Lexer::new(source).tokenize();
        assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
        tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn compound_assignment_operators() {
        assert_eq!(
            kinds("<<= >>= += ->"),
            vec![
                TokenKind::ShlEq,
                TokenKind::ShrEq,
                TokenKind::PlusEq,
                TokenKind::Arrow,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn octal_and_hex() {
        assert_eq!(
            kinds("010 0x1F 0"),
            vec![
                TokenKind::IntLit(8),
                TokenKind::IntLit(31),
                TokenKind::IntLit(0),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn comments_are_skipped() {
        assert_eq!(
            kinds("a // line\n /* block\n still */ b"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Ident("b".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unterminated_comment_is_diagnosed() {
        let (tokens, diagnostics) = Lexer::new("x /* never closed").tokenize();
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, Some(ErrorCode::UnterminatedComment));
    }
}
