//! Token definitions for Cove.

use cove_common::Span;

/// A token with its kind and span.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// The kind of a token.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    IntLit(i64),
    FloatLit(f64),
    StrLit(String),
    CharLit(char),

    // Identifiers
    Ident(String),

    // Statement keywords
    If,
    Else,
    While,
    Do,
    For,
    Switch,
    Case,
    Default,
    Goto,
    Continue,
    Break,
    Return,

    // Declaration specifiers
    Void,
    Char,
    Short,
    Int,
    Long,
    Float,
    Double,
    Signed,
    Unsigned,
    Const,
    Static,

    // Delimiters
    LParen,   // (
    RParen,   // )
    LBracket, // [
    RBracket, // ]
    LBrace,   // {
    RBrace,   // }

    // Operators
    Plus,      // +
    Minus,     // -
    Star,      // *
    Slash,     // /
    Percent,   // %
    PlusPlus,  // ++
    MinusMinus, // --
    Amp,       // &
    AmpAmp,    // &&
    Pipe,      // |
    PipePipe,  // ||
    Caret,     // ^
    Tilde,     // ~
    Bang,      // !
    Eq,        // =
    EqEq,      // ==
    BangEq,    // !=
    Lt,        // <
    LtEq,      // <=
    Gt,        // >
    GtEq,      // >=
    Shl,       // <<
    Shr,       // >>
    PlusEq,    // +=
    MinusEq,   // -=
    StarEq,    // *=
    SlashEq,   // /=
    PercentEq, // %=
    AmpEq,     // &=
    PipeEq,    // |=
    CaretEq,   // ^=
    ShlEq,     // <<=
    ShrEq,     // >>=
    Arrow,     // ->
    Question,  // ?

    // Punctuation
    Comma,     // ,
    Colon,     // :
    Semicolon, // ;
    Dot,       // .

    // Special
    Eof,
    Error,
}

impl TokenKind {
    /// Returns true if this token can begin a block-item declaration.
    pub fn is_decl_specifier(&self) -> bool {
        matches!(
            self,
            TokenKind::Void
                | TokenKind::Char
                | TokenKind::Short
                | TokenKind::Int
                | TokenKind::Long
                | TokenKind::Float
                | TokenKind::Double
                | TokenKind::Signed
                | TokenKind::Unsigned
                | TokenKind::Const
                | TokenKind::Static
        )
    }

    /// Returns true if this token can begin an expression.
    pub fn can_begin_expression(&self) -> bool {
        matches!(
            self,
            TokenKind::IntLit(_)
                | TokenKind::FloatLit(_)
                | TokenKind::StrLit(_)
                | TokenKind::CharLit(_)
                | TokenKind::Ident(_)
                | TokenKind::LParen
                | TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Star
                | TokenKind::Amp
                | TokenKind::Bang
                | TokenKind::Tilde
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
        )
    }

    /// Returns the keyword for an identifier, if any.
    pub fn keyword_from_str(s: &str) -> Option<TokenKind> {
        match s {
            "if" => Some(TokenKind::If),
            "else" => Some(TokenKind::Else),
            "while" => Some(TokenKind::While),
            "do" => Some(TokenKind::Do),
            "for" => Some(TokenKind::For),
            "switch" => Some(TokenKind::Switch),
            "case" => Some(TokenKind::Case),
            "default" => Some(TokenKind::Default),
            "goto" => Some(TokenKind::Goto),
            "continue" => Some(TokenKind::Continue),
            "break" => Some(TokenKind::Break),
            "return" => Some(TokenKind::Return),
            "void" => Some(TokenKind::Void),
            "char" => Some(TokenKind::Char),
            "short" => Some(TokenKind::Short),
            "int" => Some(TokenKind::Int),
            "long" => Some(TokenKind::Long),
            "float" => Some(TokenKind::Float),
            "double" => Some(TokenKind::Double),
            "signed" => Some(TokenKind::Signed),
            "unsigned" => Some(TokenKind::Unsigned),
            "const" => Some(TokenKind::Const),
            "static" => Some(TokenKind::Static),
            _ => None,
        }
    }
}
