//! Error recovery strategies for the parser.
//!
//! This module defines the synchronization-point token sets used to
//! bound error cascades: after a malformed statement the parser skips
//! forward to the next statement boundary instead of misreading every
//! following token.

use cove_lexer::TokenKind;

/// Tokens that start a new statement.
pub const STMT_STARTS: &[TokenKind] = &[
    TokenKind::LBrace,
    TokenKind::If,
    TokenKind::While,
    TokenKind::Do,
    TokenKind::For,
    TokenKind::Switch,
    TokenKind::Case,
    TokenKind::Default,
    TokenKind::Goto,
    TokenKind::Continue,
    TokenKind::Break,
    TokenKind::Return,
];

/// Tokens that end a statement.
pub const STMT_ENDS: &[TokenKind] = &[TokenKind::Semicolon, TokenKind::RBrace];

/// Check if a token kind is in a set.
pub fn is_in_set(kind: &TokenKind, set: &[TokenKind]) -> bool {
    set.iter()
        .any(|k| std::mem::discriminant(k) == std::mem::discriminant(kind))
}

/// Check if a token starts a statement.
pub fn is_stmt_start(kind: &TokenKind) -> bool {
    is_in_set(kind, STMT_STARTS)
}

/// Check if a token ends a statement.
pub fn is_stmt_end(kind: &TokenKind) -> bool {
    is_in_set(kind, STMT_ENDS)
}

/// Check if a token is a synchronization point.
///
/// Declaration specifiers count: `int` on the next line is a far more
/// likely statement boundary than a continuation of a broken one.
pub fn is_sync_token(kind: &TokenKind) -> bool {
    is_stmt_start(kind) || is_stmt_end(kind) || kind.is_decl_specifier() || *kind == TokenKind::Eof
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stmt_starts() {
        assert!(is_stmt_start(&TokenKind::If));
        assert!(is_stmt_start(&TokenKind::LBrace));
        assert!(is_stmt_start(&TokenKind::Return));
        assert!(!is_stmt_start(&TokenKind::Plus));
        assert!(!is_stmt_start(&TokenKind::Semicolon));
    }

    #[test]
    fn sync_tokens() {
        assert!(is_sync_token(&TokenKind::Semicolon));
        assert!(is_sync_token(&TokenKind::RBrace));
        assert!(is_sync_token(&TokenKind::Int));
        assert!(is_sync_token(&TokenKind::Eof));
        assert!(!is_sync_token(&TokenKind::Ident("x".into())));
    }
}
