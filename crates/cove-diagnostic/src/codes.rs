//! Error codes for Cove diagnostics.

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Lexer errors (E0001 - E0099)
    UnexpectedCharacter,
    UnterminatedString,
    UnterminatedChar,
    UnterminatedComment,
    InvalidEscape,
    InvalidNumber,

    // Parser errors (E0100 - E0199)
    UnexpectedToken,
    ExpectedStatement,
    ExpectedExpression,
    ExpectedLParen,
    ExpectedIdentifier,
    UnclosedDelimiter,
    MissingSemicolon,
    DeclarationNotAllowed,
    NestingTooDeep,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            // Lexer
            ErrorCode::UnexpectedCharacter => "E0001",
            ErrorCode::UnterminatedString => "E0002",
            ErrorCode::UnterminatedChar => "E0003",
            ErrorCode::UnterminatedComment => "E0004",
            ErrorCode::InvalidEscape => "E0005",
            ErrorCode::InvalidNumber => "E0006",

            // Parser
            ErrorCode::UnexpectedToken => "E0100",
            ErrorCode::ExpectedStatement => "E0101",
            ErrorCode::ExpectedExpression => "E0102",
            ErrorCode::ExpectedLParen => "E0103",
            ErrorCode::ExpectedIdentifier => "E0104",
            ErrorCode::UnclosedDelimiter => "E0105",
            ErrorCode::MissingSemicolon => "E0106",
            ErrorCode::DeclarationNotAllowed => "E0107",
            ErrorCode::NestingTooDeep => "E0108",
        }
    }

    /// Get a human-readable description of the error.
    pub fn description(&self) -> &'static str {
        match self {
            // Lexer
            ErrorCode::UnexpectedCharacter => "unexpected character in input",
            ErrorCode::UnterminatedString => "string literal is not terminated",
            ErrorCode::UnterminatedChar => "character literal is not terminated",
            ErrorCode::UnterminatedComment => "comment is not terminated",
            ErrorCode::InvalidEscape => "invalid escape sequence",
            ErrorCode::InvalidNumber => "invalid number literal",

            // Parser
            ErrorCode::UnexpectedToken => "unexpected token",
            ErrorCode::ExpectedStatement => "expected a statement or declaration",
            ErrorCode::ExpectedExpression => "expected an expression",
            ErrorCode::ExpectedLParen => "expected `(` after statement keyword",
            ErrorCode::ExpectedIdentifier => "expected an identifier",
            ErrorCode::UnclosedDelimiter => "unclosed delimiter",
            ErrorCode::MissingSemicolon => "missing semicolon",
            ErrorCode::DeclarationNotAllowed => "declaration not allowed in this position",
            ErrorCode::NestingTooDeep => "nesting is too deep",
        }
    }

    /// Get a suggested fix for the error, if available.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            ErrorCode::UnterminatedString => Some("add a closing quote `\"` to terminate the string"),
            ErrorCode::UnterminatedChar => Some("add a closing quote `'` to terminate the character"),
            ErrorCode::UnterminatedComment => Some("add `*/` to close the comment"),
            ErrorCode::MissingSemicolon => Some("add `;` at the end of the statement"),
            ErrorCode::UnclosedDelimiter => Some("add the matching closing delimiter"),
            ErrorCode::ExpectedLParen => Some("the condition must be parenthesized"),
            ErrorCode::DeclarationNotAllowed => {
                Some("wrap the declaration in a `{ ... }` block to use it here")
            }
            _ => None,
        }
    }
}
