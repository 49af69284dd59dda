//! The Cove parser.
//!
//! Statement dispatch follows C99 6.8: every statement form is decided
//! from the current lookahead token (labeled statements need one extra
//! token of lookahead for `ident :`), and malformed statements are
//! recovered at the next statement boundary.

use cove_common::Span;
use cove_diagnostic::{Diagnostic, DiagnosticKind, ErrorCode, Label};
use cove_lexer::{Token, TokenKind};
use cove_syntax::*;

use crate::recovery::{STMT_ENDS, is_in_set, is_sync_token};

/// Default ceiling for recursive nesting depth.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// The Cove parser.
///
/// Owns the token cursor and the diagnostic sink for one parse
/// session; independent sessions share no state.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
    /// Current recursion depth across statements and expressions
    depth: usize,
    /// Ceiling for `depth`; exceeding it fails the construct instead
    /// of overflowing the stack on adversarially nested input
    max_depth: usize,
    /// Whether the ceiling has already been diagnosed this session
    ceiling_reported: bool,
}

impl Parser {
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut tokens = tokens;
        // The cursor relies on a terminal Eof sentinel.
        if tokens.last().map(|t| &t.kind) != Some(&TokenKind::Eof) {
            let span = tokens.last().map(|t| t.span).unwrap_or(Span::DUMMY);
            tokens.push(Token::new(TokenKind::Eof, span));
        }
        Self {
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
            ceiling_reported: false,
        }
    }

    /// Set the block nesting ceiling.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Index of the next unconsumed token.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Parse a complete source file: a sequence of block items.
    pub fn parse_file(&mut self) -> SourceFile {
        let start = self.current_span();
        let mut items = Vec::new();

        while !self.at_end() {
            if let Some(item) = self.parse_block_item(false) {
                items.push(item);
            }
            // A failed item already resynchronized the cursor.
        }

        let end = self.previous_span();
        SourceFile {
            items,
            span: start.merge(end),
        }
    }

    // ========== Statement Dispatch ==========

    /// Parse one block item: a declaration or a statement.
    ///
    /// With `only_statement` set, declarations are diagnosed and
    /// rejected; C99 6.8.4/6.8.5 control-statement bodies are
    /// statements, never declarations.
    ///
    /// Every statement-level recursion passes through here, braced or
    /// not, so this is where the nesting ceiling is enforced.
    fn parse_block_item(&mut self, only_statement: bool) -> Option<BlockItem> {
        if self.depth >= self.max_depth {
            self.error_nesting_too_deep();
            if self.check(TokenKind::LBrace) {
                self.skip_balanced(TokenKind::LBrace, TokenKind::RBrace);
            } else {
                self.skip_until(STMT_ENDS);
                self.eat(TokenKind::Semicolon);
            }
            return None;
        }

        self.depth += 1;
        let item = self.dispatch_block_item(only_statement);
        self.depth -= 1;
        item
    }

    fn dispatch_block_item(&mut self, only_statement: bool) -> Option<BlockItem> {
        match self.current_kind() {
            TokenKind::LBrace => self.parse_compound().map(|block| {
                let span = block.span;
                BlockItem::Stmt(Stmt::new(StmtKind::Compound(block), span))
            }),

            // A lone `;` is a valid null statement, not an error.
            TokenKind::Semicolon => {
                let span = self.current_span();
                self.advance();
                Some(BlockItem::Stmt(Stmt::new(StmtKind::Empty, span)))
            }

            TokenKind::If => self.parse_if().map(BlockItem::Stmt),
            TokenKind::While => self.parse_while().map(BlockItem::Stmt),
            TokenKind::Do => self.parse_do_while().map(BlockItem::Stmt),
            TokenKind::For => self.parse_for().map(BlockItem::Stmt),
            TokenKind::Switch => self.parse_switch().map(BlockItem::Stmt),

            TokenKind::Case | TokenKind::Default => self.parse_labeled().map(BlockItem::Stmt),
            TokenKind::Ident(_) if self.peek_kind(1) == &TokenKind::Colon => {
                self.parse_labeled().map(BlockItem::Stmt)
            }

            TokenKind::Goto | TokenKind::Continue | TokenKind::Break | TokenKind::Return => {
                self.parse_jump().map(BlockItem::Stmt)
            }

            kind if kind.is_decl_specifier() => {
                let decl = self.parse_decl()?;
                if only_statement {
                    self.diagnostics.push(
                        Diagnostic::error(
                            DiagnosticKind::Parser,
                            decl.span,
                            "expected a statement, found a declaration",
                        )
                        .with_code(ErrorCode::DeclarationNotAllowed)
                        .with_help("wrap the declaration in a `{ ... }` block to use it here"),
                    );
                    return None;
                }
                Some(BlockItem::Decl(decl))
            }

            kind if kind.can_begin_expression() => self.parse_expr_stmt().map(BlockItem::Stmt),

            _ => {
                let span = self.current_span();
                self.diagnostics.push(
                    Diagnostic::error(
                        DiagnosticKind::Parser,
                        span,
                        "expected a statement or declaration",
                    )
                    .with_code(ErrorCode::ExpectedStatement)
                    .with_label(Label::new(span, "not the start of a statement")),
                );
                // Consume the offending token, then resynchronize, so
                // the enclosing loop always makes progress.
                self.advance();
                self.synchronize();
                None
            }
        }
    }

    /// Parse a statement in a position where declarations are invalid.
    fn parse_statement(&mut self) -> Option<Stmt> {
        match self.parse_block_item(true)? {
            BlockItem::Stmt(stmt) => Some(stmt),
            // parse_block_item(true) already rejected declarations
            BlockItem::Decl(_) => None,
        }
    }

    // ========== Compound Statements ==========

    /// Parse a `{ ... }` block. The caller must have checked for `{`.
    fn parse_compound(&mut self) -> Option<Block> {
        debug_assert!(self.check(TokenKind::LBrace), "not a compound statement");
        let start = self.current_span();
        self.advance(); // eat the `{`

        let mut items = Vec::new();
        while !self.check(TokenKind::RBrace) && !self.at_end() {
            if let Some(item) = self.parse_block_item(false) {
                items.push(item);
            }
            // Failed items were skipped up to the next boundary; the
            // loop itself stays resilient to one bad item.
        }

        if self.check(TokenKind::RBrace) {
            let end = self.current_span();
            self.advance();
            Some(Block {
                items,
                span: start.merge(end),
            })
        } else {
            // Eof mid-block: diagnose once and propagate failure. Eof
            // is the strongest synchronization point, so no skipping.
            self.diagnostics.push(
                Diagnostic::error(DiagnosticKind::Parser, self.current_span(), "expected `}`")
                    .with_code(ErrorCode::UnclosedDelimiter)
                    .with_label(Label::new(start, "unclosed `{` here")),
            );
            None
        }
    }

    /// Skip a balanced delimiter run, consuming both delimiters.
    fn skip_balanced(&mut self, open: TokenKind, close: TokenKind) {
        debug_assert!(self.check(open.clone()), "not at an opening delimiter");
        let mut depth: usize = 0;
        while !self.at_end() {
            if self.check(open.clone()) {
                depth += 1;
                self.advance();
            } else if self.check(close.clone()) {
                self.advance();
                depth -= 1;
                if depth == 0 {
                    return;
                }
            } else {
                self.advance();
            }
        }
    }

    // ========== Control Statements ==========

    /// Parse `if ( expr ) stmt` with an optional `else stmt`.
    fn parse_if(&mut self) -> Option<Stmt> {
        debug_assert!(self.check(TokenKind::If), "not an if statement");
        let start = self.current_span();
        self.advance(); // eat the `if`

        if !self.check(TokenKind::LParen) {
            // Intentional bail-out: the condition and body are not
            // parsed on this path.
            self.error_expected_lparen("if");
            self.synchronize();
            return None;
        }

        let condition = self.parse_paren_expr();
        let then_branch = Box::new(self.parse_statement()?);

        let else_branch = if self.eat(TokenKind::Else) {
            Some(Box::new(self.parse_statement()?))
        } else {
            None
        };

        let span = start.merge(self.previous_span());
        Some(Stmt::new(
            StmtKind::If {
                condition,
                then_branch,
                else_branch,
            },
            span,
        ))
    }

    /// Parse `while ( expr ) stmt`.
    fn parse_while(&mut self) -> Option<Stmt> {
        debug_assert!(self.check(TokenKind::While), "not a while statement");
        let start = self.current_span();
        self.advance();

        if !self.check(TokenKind::LParen) {
            self.error_expected_lparen("while");
            self.synchronize();
            return None;
        }

        let condition = self.parse_paren_expr();
        let body = Box::new(self.parse_statement()?);

        let span = start.merge(self.previous_span());
        Some(Stmt::new(StmtKind::While { condition, body }, span))
    }

    /// Parse `do stmt while ( expr ) ;`.
    fn parse_do_while(&mut self) -> Option<Stmt> {
        debug_assert!(self.check(TokenKind::Do), "not a do statement");
        let start = self.current_span();
        self.advance();

        let body = Box::new(self.parse_statement()?);

        if !self.eat(TokenKind::While) {
            let span = self.current_span();
            self.diagnostics.push(
                Diagnostic::error(DiagnosticKind::Parser, span, "expected `while` after `do` body")
                    .with_code(ErrorCode::UnexpectedToken),
            );
            self.synchronize();
            return None;
        }

        if !self.check(TokenKind::LParen) {
            self.error_expected_lparen("while");
            self.synchronize();
            return None;
        }

        let condition = self.parse_paren_expr();
        self.expect_semicolon();

        let span = start.merge(self.previous_span());
        Some(Stmt::new(StmtKind::DoWhile { body, condition }, span))
    }

    /// Parse `for ( init ; cond ; step ) stmt`.
    fn parse_for(&mut self) -> Option<Stmt> {
        debug_assert!(self.check(TokenKind::For), "not a for statement");
        let start = self.current_span();
        self.advance();

        if !self.check(TokenKind::LParen) {
            self.error_expected_lparen("for");
            self.synchronize();
            return None;
        }
        self.advance(); // eat the `(`

        // Init clause: empty, a declaration (C99 6.8.5.3), or an
        // expression. The declaration branch consumes its own `;`.
        let init = if self.eat(TokenKind::Semicolon) {
            ForInit::None
        } else if self.current_kind().is_decl_specifier() {
            ForInit::Decl(self.parse_decl()?)
        } else {
            let expr = self.parse_expr();
            if !self.eat(TokenKind::Semicolon) {
                self.error_missing_semicolon();
                self.synchronize();
                return None;
            }
            ForInit::Expr(expr)
        };

        let condition = if self.check(TokenKind::Semicolon) {
            None
        } else {
            Some(self.parse_expr())
        };
        if !self.eat(TokenKind::Semicolon) {
            self.error_missing_semicolon();
            self.synchronize();
            return None;
        }

        let step = if self.check(TokenKind::RParen) {
            None
        } else {
            Some(self.parse_expr())
        };
        if !self.eat(TokenKind::RParen) {
            let span = self.current_span();
            self.diagnostics.push(
                Diagnostic::error(DiagnosticKind::Parser, span, "expected `)` after `for` clauses")
                    .with_code(ErrorCode::UnclosedDelimiter),
            );
            self.synchronize();
            return None;
        }

        let body = Box::new(self.parse_statement()?);

        let span = start.merge(self.previous_span());
        Some(Stmt::new(
            StmtKind::For {
                init,
                condition,
                step,
                body,
            },
            span,
        ))
    }

    /// Parse `switch ( expr ) stmt`.
    fn parse_switch(&mut self) -> Option<Stmt> {
        debug_assert!(self.check(TokenKind::Switch), "not a switch statement");
        let start = self.current_span();
        self.advance();

        if !self.check(TokenKind::LParen) {
            self.error_expected_lparen("switch");
            self.synchronize();
            return None;
        }

        let scrutinee = self.parse_paren_expr();
        let body = Box::new(self.parse_statement()?);

        let span = start.merge(self.previous_span());
        Some(Stmt::new(StmtKind::Switch { scrutinee, body }, span))
    }

    /// Parse a labeled statement: `ident :`, `case expr :`, `default :`.
    fn parse_labeled(&mut self) -> Option<Stmt> {
        let start = self.current_span();

        match self.current_kind().clone() {
            TokenKind::Case => {
                self.advance();
                // case labels take a constant expression: conditional
                // level, so `,` stays a label terminator
                let value = self.parse_conditional_expr();
                self.expect_colon("`case` label")?;
                let body = Box::new(self.parse_statement()?);
                let span = start.merge(self.previous_span());
                Some(Stmt::new(StmtKind::Case { value, body }, span))
            }
            TokenKind::Default => {
                self.advance();
                self.expect_colon("`default` label")?;
                let body = Box::new(self.parse_statement()?);
                let span = start.merge(self.previous_span());
                Some(Stmt::new(StmtKind::Default { body }, span))
            }
            TokenKind::Ident(name) => {
                let label = Ident::new(name, self.current_span());
                self.advance();
                self.expect_colon("label")?;
                let body = Box::new(self.parse_statement()?);
                let span = start.merge(self.previous_span());
                Some(Stmt::new(StmtKind::Labeled { label, body }, span))
            }
            _ => {
                debug_assert!(false, "not a labeled statement");
                None
            }
        }
    }

    /// Parse a jump statement: `goto`, `continue`, `break`, `return`.
    fn parse_jump(&mut self) -> Option<Stmt> {
        let start = self.current_span();

        let kind = match self.current_kind() {
            TokenKind::Goto => {
                self.advance();
                let TokenKind::Ident(name) = self.current_kind().clone() else {
                    let span = self.current_span();
                    self.diagnostics.push(
                        Diagnostic::error(DiagnosticKind::Parser, span, "expected label after `goto`")
                            .with_code(ErrorCode::ExpectedIdentifier),
                    );
                    self.synchronize();
                    return None;
                };
                let label = Ident::new(name, self.current_span());
                self.advance();
                StmtKind::Goto(label)
            }
            TokenKind::Continue => {
                self.advance();
                StmtKind::Continue
            }
            TokenKind::Break => {
                self.advance();
                StmtKind::Break
            }
            TokenKind::Return => {
                self.advance();
                let value = if self.check(TokenKind::Semicolon) {
                    None
                } else {
                    Some(self.parse_expr())
                };
                StmtKind::Return(value)
            }
            _ => {
                debug_assert!(false, "not a jump statement");
                return None;
            }
        };

        self.expect_semicolon();
        let span = start.merge(self.previous_span());
        Some(Stmt::new(kind, span))
    }

    /// Parse `expr ;`.
    fn parse_expr_stmt(&mut self) -> Option<Stmt> {
        let start = self.current_span();
        let expr = self.parse_expr();
        self.expect_semicolon();
        let span = start.merge(self.previous_span());
        Some(Stmt::new(StmtKind::Expr(expr), span))
    }

    // ========== Declarations ==========

    /// Parse a block-item declaration, consuming the trailing `;`.
    fn parse_decl(&mut self) -> Option<Decl> {
        let start = self.current_span();

        let mut specifiers = Vec::new();
        while let Some(spec) = decl_specifier(self.current_kind()) {
            specifiers.push(spec);
            self.advance();
        }
        debug_assert!(!specifiers.is_empty(), "not a declaration");

        let mut declarators = Vec::new();
        loop {
            let d_start = self.current_span();
            let mut pointer_depth = 0u32;
            while self.eat(TokenKind::Star) {
                pointer_depth += 1;
            }

            let TokenKind::Ident(name) = self.current_kind().clone() else {
                let span = self.current_span();
                self.diagnostics.push(
                    Diagnostic::error(DiagnosticKind::Parser, span, "expected declarator name")
                        .with_code(ErrorCode::ExpectedIdentifier),
                );
                self.synchronize();
                return None;
            };
            let ident = Ident::new(name, self.current_span());
            self.advance();

            let init = if self.eat(TokenKind::Eq) {
                Some(self.parse_assign_expr())
            } else {
                None
            };

            declarators.push(InitDeclarator {
                name: ident,
                pointer_depth,
                init,
                span: d_start.merge(self.previous_span()),
            });

            if !self.eat(TokenKind::Comma) {
                break;
            }
        }

        if !self.eat(TokenKind::Semicolon) {
            self.error_missing_semicolon();
            self.synchronize();
        }

        Some(Decl {
            specifiers,
            declarators,
            span: start.merge(self.previous_span()),
        })
    }

    // ========== Expressions ==========

    /// Parse a parenthesized expression, owning both parentheses.
    /// The caller must have checked for `(`.
    fn parse_paren_expr(&mut self) -> Expr {
        debug_assert!(self.check(TokenKind::LParen), "not a parenthesized expression");
        let open = self.current_span();

        if self.depth >= self.max_depth {
            self.error_nesting_too_deep();
            self.skip_balanced(TokenKind::LParen, TokenKind::RParen);
            return Expr::new(ExprKind::Error, open);
        }

        self.depth += 1;
        self.advance(); // eat the `(`

        let expr = self.parse_expr();

        if !self.eat(TokenKind::RParen) {
            let span = self.current_span();
            self.diagnostics.push(
                Diagnostic::error(DiagnosticKind::Parser, span, "expected `)`")
                    .with_code(ErrorCode::UnclosedDelimiter),
            );
            self.skip_until(&[
                TokenKind::RParen,
                TokenKind::Semicolon,
                TokenKind::LBrace,
                TokenKind::RBrace,
            ]);
            self.eat(TokenKind::RParen);
        }

        self.depth -= 1;
        expr
    }

    /// Parse a full expression (comma level, lowest precedence).
    fn parse_expr(&mut self) -> Expr {
        let mut left = self.parse_assign_expr();

        while self.eat(TokenKind::Comma) {
            let right = self.parse_assign_expr();
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::Comma {
                    left: Box::new(left),
                    right: Box::new(right),
                },
                span,
            );
        }

        left
    }

    /// Parse an assignment expression (right-associative).
    fn parse_assign_expr(&mut self) -> Expr {
        let left = self.parse_conditional_expr();

        let op = match self.current_kind() {
            TokenKind::Eq => Some(AssignOp::Assign),
            TokenKind::PlusEq => Some(AssignOp::Add),
            TokenKind::MinusEq => Some(AssignOp::Sub),
            TokenKind::StarEq => Some(AssignOp::Mul),
            TokenKind::SlashEq => Some(AssignOp::Div),
            TokenKind::PercentEq => Some(AssignOp::Rem),
            TokenKind::ShlEq => Some(AssignOp::Shl),
            TokenKind::ShrEq => Some(AssignOp::Shr),
            TokenKind::AmpEq => Some(AssignOp::And),
            TokenKind::CaretEq => Some(AssignOp::Xor),
            TokenKind::PipeEq => Some(AssignOp::Or),
            _ => None,
        };

        if let Some(op) = op {
            if self.depth >= self.max_depth {
                self.error_nesting_too_deep();
                self.skip_until(STMT_ENDS);
                return Expr::new(ExprKind::Error, self.current_span());
            }
            self.advance();
            self.depth += 1;
            let value = self.parse_assign_expr();
            self.depth -= 1;
            let span = left.span.merge(value.span);
            return Expr::new(
                ExprKind::Assign {
                    op,
                    target: Box::new(left),
                    value: Box::new(value),
                },
                span,
            );
        }

        left
    }

    /// Parse `cond ? expr : conditional-expr`.
    fn parse_conditional_expr(&mut self) -> Expr {
        let condition = self.parse_or_expr();

        if self.check(TokenKind::Question) {
            if self.depth >= self.max_depth {
                self.error_nesting_too_deep();
                self.skip_until(STMT_ENDS);
                return Expr::new(ExprKind::Error, self.current_span());
            }
            self.advance();
            self.depth += 1;
            let then_expr = self.parse_expr();
            let else_expr = if self.eat(TokenKind::Colon) {
                self.parse_conditional_expr()
            } else {
                let span = self.current_span();
                self.diagnostics.push(
                    Diagnostic::error(
                        DiagnosticKind::Parser,
                        span,
                        "expected `:` in conditional expression",
                    )
                    .with_code(ErrorCode::UnexpectedToken),
                );
                Expr::new(ExprKind::Error, span)
            };
            self.depth -= 1;
            let span = condition.span.merge(else_expr.span);
            return Expr::new(
                ExprKind::Conditional {
                    condition: Box::new(condition),
                    then_expr: Box::new(then_expr),
                    else_expr: Box::new(else_expr),
                },
                span,
            );
        }

        condition
    }

    fn parse_or_expr(&mut self) -> Expr {
        let mut left = self.parse_and_expr();
        while self.eat(TokenKind::PipePipe) {
            let right = self.parse_and_expr();
            left = binary(BinOp::Or, left, right);
        }
        left
    }

    fn parse_and_expr(&mut self) -> Expr {
        let mut left = self.parse_bit_or_expr();
        while self.eat(TokenKind::AmpAmp) {
            let right = self.parse_bit_or_expr();
            left = binary(BinOp::And, left, right);
        }
        left
    }

    fn parse_bit_or_expr(&mut self) -> Expr {
        let mut left = self.parse_bit_xor_expr();
        while self.eat(TokenKind::Pipe) {
            let right = self.parse_bit_xor_expr();
            left = binary(BinOp::BitOr, left, right);
        }
        left
    }

    fn parse_bit_xor_expr(&mut self) -> Expr {
        let mut left = self.parse_bit_and_expr();
        while self.eat(TokenKind::Caret) {
            let right = self.parse_bit_and_expr();
            left = binary(BinOp::BitXor, left, right);
        }
        left
    }

    fn parse_bit_and_expr(&mut self) -> Expr {
        let mut left = self.parse_equality_expr();
        while self.eat(TokenKind::Amp) {
            let right = self.parse_equality_expr();
            left = binary(BinOp::BitAnd, left, right);
        }
        left
    }

    fn parse_equality_expr(&mut self) -> Expr {
        let mut left = self.parse_relational_expr();
        loop {
            let op = match self.current_kind() {
                TokenKind::EqEq => BinOp::Eq,
                TokenKind::BangEq => BinOp::Ne,
                _ => break,
            };
            self.advance();
            let right = self.parse_relational_expr();
            left = binary(op, left, right);
        }
        left
    }

    fn parse_relational_expr(&mut self) -> Expr {
        let mut left = self.parse_shift_expr();
        loop {
            let op = match self.current_kind() {
                TokenKind::Lt => BinOp::Lt,
                TokenKind::Gt => BinOp::Gt,
                TokenKind::LtEq => BinOp::Le,
                TokenKind::GtEq => BinOp::Ge,
                _ => break,
            };
            self.advance();
            let right = self.parse_shift_expr();
            left = binary(op, left, right);
        }
        left
    }

    fn parse_shift_expr(&mut self) -> Expr {
        let mut left = self.parse_additive_expr();
        loop {
            let op = match self.current_kind() {
                TokenKind::Shl => BinOp::Shl,
                TokenKind::Shr => BinOp::Shr,
                _ => break,
            };
            self.advance();
            let right = self.parse_additive_expr();
            left = binary(op, left, right);
        }
        left
    }

    fn parse_additive_expr(&mut self) -> Expr {
        let mut left = self.parse_multiplicative_expr();
        loop {
            let op = match self.current_kind() {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            self.advance();
            let right = self.parse_multiplicative_expr();
            left = binary(op, left, right);
        }
        left
    }

    fn parse_multiplicative_expr(&mut self) -> Expr {
        let mut left = self.parse_unary_expr();
        loop {
            let op = match self.current_kind() {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Rem,
                _ => break,
            };
            self.advance();
            let right = self.parse_unary_expr();
            left = binary(op, left, right);
        }
        left
    }

    fn parse_unary_expr(&mut self) -> Expr {
        let start = self.current_span();
        let op = match self.current_kind() {
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::Minus => Some(UnaryOp::Neg),
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Tilde => Some(UnaryOp::BitNot),
            TokenKind::Star => Some(UnaryOp::Deref),
            TokenKind::Amp => Some(UnaryOp::AddrOf),
            TokenKind::PlusPlus => Some(UnaryOp::PreIncr),
            TokenKind::MinusMinus => Some(UnaryOp::PreDecr),
            _ => None,
        };

        if let Some(op) = op {
            if self.depth >= self.max_depth {
                self.error_nesting_too_deep();
                self.skip_until(STMT_ENDS);
                return Expr::new(ExprKind::Error, start);
            }
            self.advance();
            self.depth += 1;
            let operand = self.parse_unary_expr();
            self.depth -= 1;
            let span = start.merge(operand.span);
            return Expr::new(
                ExprKind::Unary {
                    op,
                    operand: Box::new(operand),
                },
                span,
            );
        }

        self.parse_postfix_expr()
    }

    fn parse_postfix_expr(&mut self) -> Expr {
        let mut expr = self.parse_primary_expr();

        loop {
            match self.current_kind() {
                TokenKind::LParen => {
                    let args = if self.depth >= self.max_depth {
                        self.error_nesting_too_deep();
                        self.skip_balanced(TokenKind::LParen, TokenKind::RParen);
                        Vec::new()
                    } else {
                        self.depth += 1;
                        self.advance();
                        let mut args = Vec::new();
                        if !self.check(TokenKind::RParen) {
                            loop {
                                args.push(self.parse_assign_expr());
                                if !self.eat(TokenKind::Comma) {
                                    break;
                                }
                            }
                        }
                        if !self.eat(TokenKind::RParen) {
                            let span = self.current_span();
                            self.diagnostics.push(
                                Diagnostic::error(DiagnosticKind::Parser, span, "expected `)` after arguments")
                                    .with_code(ErrorCode::UnclosedDelimiter),
                            );
                            self.skip_until(&[
                                TokenKind::RParen,
                                TokenKind::Semicolon,
                                TokenKind::RBrace,
                            ]);
                            self.eat(TokenKind::RParen);
                        }
                        self.depth -= 1;
                        args
                    };
                    let span = expr.span.merge(self.previous_span());
                    expr = Expr::new(
                        ExprKind::Call {
                            func: Box::new(expr),
                            args,
                        },
                        span,
                    );
                }
                TokenKind::LBracket => {
                    let index = if self.depth >= self.max_depth {
                        self.error_nesting_too_deep();
                        self.skip_balanced(TokenKind::LBracket, TokenKind::RBracket);
                        Expr::new(ExprKind::Error, self.previous_span())
                    } else {
                        self.depth += 1;
                        self.advance();
                        let index = self.parse_expr();
                        if !self.eat(TokenKind::RBracket) {
                            let span = self.current_span();
                            self.diagnostics.push(
                                Diagnostic::error(DiagnosticKind::Parser, span, "expected `]`")
                                    .with_code(ErrorCode::UnclosedDelimiter),
                            );
                            self.skip_until(&[
                                TokenKind::RBracket,
                                TokenKind::Semicolon,
                                TokenKind::RBrace,
                            ]);
                            self.eat(TokenKind::RBracket);
                        }
                        self.depth -= 1;
                        index
                    };
                    let span = expr.span.merge(self.previous_span());
                    expr = Expr::new(
                        ExprKind::Index {
                            base: Box::new(expr),
                            index: Box::new(index),
                        },
                        span,
                    );
                }
                TokenKind::Dot | TokenKind::Arrow => {
                    let arrow = self.check(TokenKind::Arrow);
                    self.advance();
                    let TokenKind::Ident(name) = self.current_kind().clone() else {
                        let span = self.current_span();
                        self.diagnostics.push(
                            Diagnostic::error(DiagnosticKind::Parser, span, "expected field name")
                                .with_code(ErrorCode::ExpectedIdentifier),
                        );
                        return Expr::new(ExprKind::Error, span);
                    };
                    let field = Ident::new(name, self.current_span());
                    self.advance();
                    let span = expr.span.merge(field.span);
                    expr = Expr::new(
                        ExprKind::Member {
                            base: Box::new(expr),
                            field,
                            arrow,
                        },
                        span,
                    );
                }
                TokenKind::PlusPlus => {
                    self.advance();
                    let span = expr.span.merge(self.previous_span());
                    expr = Expr::new(
                        ExprKind::Postfix {
                            op: PostfixOp::Incr,
                            operand: Box::new(expr),
                        },
                        span,
                    );
                }
                TokenKind::MinusMinus => {
                    self.advance();
                    let span = expr.span.merge(self.previous_span());
                    expr = Expr::new(
                        ExprKind::Postfix {
                            op: PostfixOp::Decr,
                            operand: Box::new(expr),
                        },
                        span,
                    );
                }
                _ => break,
            }
        }

        expr
    }

    fn parse_primary_expr(&mut self) -> Expr {
        let span = self.current_span();
        match self.current_kind().clone() {
            TokenKind::IntLit(v) => {
                self.advance();
                Expr::new(ExprKind::IntLit(v), span)
            }
            TokenKind::FloatLit(v) => {
                self.advance();
                Expr::new(ExprKind::FloatLit(v), span)
            }
            TokenKind::StrLit(v) => {
                self.advance();
                Expr::new(ExprKind::StrLit(v), span)
            }
            TokenKind::CharLit(v) => {
                self.advance();
                Expr::new(ExprKind::CharLit(v), span)
            }
            TokenKind::Ident(name) => {
                self.advance();
                Expr::new(ExprKind::Var(Ident::new(name, span)), span)
            }
            TokenKind::LParen => self.parse_paren_expr(),
            _ => {
                // Do not consume: the surrounding statement decides
                // how to resynchronize.
                self.diagnostics.push(
                    Diagnostic::error(DiagnosticKind::Parser, span, "expected an expression")
                        .with_code(ErrorCode::ExpectedExpression)
                        .with_label(Label::new(span, "expected an expression here")),
                );
                Expr::new(ExprKind::Error, span)
            }
        }
    }

    // ========== Token Helpers ==========

    fn current(&self) -> &Token {
        self.tokens
            .get(self.pos)
            .unwrap_or(&self.tokens[self.tokens.len() - 1])
    }

    fn current_kind(&self) -> &TokenKind {
        &self.current().kind
    }

    fn current_span(&self) -> Span {
        self.current().span
    }

    fn previous_span(&self) -> Span {
        if self.pos > 0 {
            self.tokens[self.pos - 1].span
        } else {
            Span::DUMMY
        }
    }

    /// Peek `n` tokens past the cursor without consuming anything.
    fn peek_kind(&self, n: usize) -> &TokenKind {
        let idx = (self.pos + n).min(self.tokens.len() - 1);
        &self.tokens[idx].kind
    }

    fn at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    fn check(&self, kind: TokenKind) -> bool {
        std::mem::discriminant(self.current_kind()) == std::mem::discriminant(&kind)
    }

    fn advance(&mut self) {
        if !self.at_end() {
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Require a `:` after a label; on failure diagnose, resync, bail.
    fn expect_colon(&mut self, what: &str) -> Option<()> {
        if self.eat(TokenKind::Colon) {
            Some(())
        } else {
            let span = self.current_span();
            self.diagnostics.push(
                Diagnostic::error(DiagnosticKind::Parser, span, format!("expected `:` after {what}"))
                    .with_code(ErrorCode::UnexpectedToken),
            );
            self.synchronize();
            None
        }
    }

    /// Require a statement-terminating `;`; on failure diagnose and
    /// resync, but let the statement itself stand.
    fn expect_semicolon(&mut self) {
        if !self.eat(TokenKind::Semicolon) {
            self.error_missing_semicolon();
            self.synchronize();
        }
    }

    fn error_missing_semicolon(&mut self) {
        let span = self.current_span();
        self.diagnostics.push(
            Diagnostic::error(DiagnosticKind::Parser, span, "expected `;`")
                .with_code(ErrorCode::MissingSemicolon)
                .with_help("add `;` at the end of the statement"),
        );
    }

    /// Report the nesting ceiling. The recovery that follows can probe
    /// the ceiling several times while one over-deep construct unwinds,
    /// so the diagnostic is emitted once per session.
    fn error_nesting_too_deep(&mut self) {
        if self.ceiling_reported {
            return;
        }
        self.ceiling_reported = true;
        let span = self.current_span();
        self.diagnostics.push(
            Diagnostic::error(DiagnosticKind::Parser, span, "nesting is too deep")
                .with_code(ErrorCode::NestingTooDeep)
                .with_note(format!("the nesting limit is {}", self.max_depth)),
        );
    }

    fn error_expected_lparen(&mut self, after: &str) {
        let span = self.current_span();
        self.diagnostics.push(
            Diagnostic::error(
                DiagnosticKind::Parser,
                span,
                format!("expected `(` after `{after}`"),
            )
            .with_code(ErrorCode::ExpectedLParen)
            .with_label(Label::new(span, "expected `(` here")),
        );
    }

    // ========== Error Recovery ==========

    /// Advance until the lookahead is one of `targets` or Eof.
    ///
    /// The target token is left unconsumed so the caller decides
    /// whether to step over it; Eof is never consumed.
    pub fn skip_until(&mut self, targets: &[TokenKind]) {
        while !self.at_end() {
            if is_in_set(self.current_kind(), targets) {
                return;
            }
            self.advance();
        }
    }

    /// Skip to the next statement boundary, then step over a `;` so
    /// the next dispatch starts on a fresh statement.
    fn synchronize(&mut self) {
        while !self.at_end() && !is_sync_token(self.current_kind()) {
            self.advance();
        }
        self.eat(TokenKind::Semicolon);
    }
}

/// Build a binary expression node with a merged span.
fn binary(op: BinOp, left: Expr, right: Expr) -> Expr {
    let span = left.span.merge(right.span);
    Expr::new(
        ExprKind::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        },
        span,
    )
}

/// Map a specifier token to its AST counterpart.
fn decl_specifier(kind: &TokenKind) -> Option<DeclSpecifier> {
    match kind {
        TokenKind::Void => Some(DeclSpecifier::Void),
        TokenKind::Char => Some(DeclSpecifier::Char),
        TokenKind::Short => Some(DeclSpecifier::Short),
        TokenKind::Int => Some(DeclSpecifier::Int),
        TokenKind::Long => Some(DeclSpecifier::Long),
        TokenKind::Float => Some(DeclSpecifier::Float),
        TokenKind::Double => Some(DeclSpecifier::Double),
        TokenKind::Signed => Some(DeclSpecifier::Signed),
        TokenKind::Unsigned => Some(DeclSpecifier::Unsigned),
        TokenKind::Const => Some(DeclSpecifier::Const),
        TokenKind::Static => Some(DeclSpecifier::Static),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cove_lexer::Lexer;

    fn parse_ok(source: &str) -> SourceFile {
        let (tokens, lex_diags) = Lexer::new(source).tokenize();
        assert!(lex_diags.is_empty(), "lexer diagnostics: {lex_diags:?}");
        let mut parser = Parser::new(tokens);
        let file = parser.parse_file();
        let diags = parser.diagnostics();
        assert!(diags.is_empty(), "parser diagnostics: {diags:?}");
        file
    }

    #[test]
    fn mixed_block_items() {
        let file = parse_ok("{ int x = 1; x = x + 2; if (x) return x; }");
        assert_eq!(file.items.len(), 1);
        let BlockItem::Stmt(stmt) = &file.items[0] else {
            panic!("expected a statement");
        };
        let StmtKind::Compound(block) = &stmt.kind else {
            panic!("expected a compound statement");
        };
        assert_eq!(block.items.len(), 3);
        assert!(matches!(&block.items[0], BlockItem::Decl(_)));
        assert!(matches!(
            &block.items[1],
            BlockItem::Stmt(s) if matches!(s.kind, StmtKind::Expr(_))
        ));
        assert!(matches!(
            &block.items[2],
            BlockItem::Stmt(s) if matches!(s.kind, StmtKind::If { .. })
        ));
    }

    #[test]
    fn declaration_rejected_as_loop_body() {
        let (tokens, _) = Lexer::new("while (1) int x = 0;").tokenize();
        let mut parser = Parser::new(tokens);
        parser.parse_file();
        let diags = parser.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, Some(ErrorCode::DeclarationNotAllowed));
    }

    #[test]
    fn assignment_is_right_associative() {
        let file = parse_ok("a = b = 1;");
        let BlockItem::Stmt(stmt) = &file.items[0] else {
            panic!("expected a statement");
        };
        let StmtKind::Expr(expr) = &stmt.kind else {
            panic!("expected an expression statement");
        };
        let ExprKind::Assign { target, value, .. } = &expr.kind else {
            panic!("expected an assignment");
        };
        assert!(matches!(target.kind, ExprKind::Var(_)));
        assert!(matches!(value.kind, ExprKind::Assign { .. }));
    }

    #[test]
    fn nesting_ceiling_fails_gracefully() {
        let (tokens, _) = Lexer::new("{{{{{{}}}}}}").tokenize();
        let mut parser = Parser::new(tokens).with_max_depth(3);
        parser.parse_file();
        let diags = parser.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, Some(ErrorCode::NestingTooDeep));
    }
}
