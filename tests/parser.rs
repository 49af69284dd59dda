//! Integration tests for cove-parser: statement dispatch, blocks, and
//! the full C99 statement grammar.

use cove_diagnostic::ErrorCode;
use cove_lexer::Lexer;
use cove_parser::{Parser, parse};
use cove_syntax::*;

fn parse_ok(source: &str) -> SourceFile {
    let (file, diagnostics) = parse(source);
    assert!(diagnostics.is_empty(), "unexpected diagnostics: {diagnostics:?}");
    file
}

/// The single statement of a one-item source file.
fn single_stmt(source: &str) -> Stmt {
    let file = parse_ok(source);
    assert_eq!(file.items.len(), 1, "expected one item in {source:?}");
    match file.items.into_iter().next().unwrap() {
        BlockItem::Stmt(stmt) => stmt,
        BlockItem::Decl(decl) => panic!("expected a statement, got {decl:?}"),
    }
}

/// Debug shape of a node with all span digits stripped, for comparing
/// parses of the same construct at different source offsets.
fn shape(node: &impl std::fmt::Debug) -> String {
    format!("{node:?}").chars().filter(|c| !c.is_ascii_digit()).collect()
}

// ============================================================================
// Blocks
// ============================================================================

#[test]
fn empty_block_consumes_exactly_two_tokens() {
    let (tokens, _) = Lexer::new("{}").tokenize();
    assert_eq!(tokens.len(), 3); // `{`, `}`, Eof
    let mut parser = Parser::new(tokens);
    let file = parser.parse_file();
    // `{` and `}` consumed; the cursor rests on the Eof sentinel.
    assert_eq!(parser.position(), 2);
    assert!(parser.diagnostics().is_empty());

    let stmt = match &file.items[0] {
        BlockItem::Stmt(s) => s,
        other => panic!("expected statement, got {other:?}"),
    };
    let StmtKind::Compound(block) = &stmt.kind else {
        panic!("expected compound statement");
    };
    assert!(block.items.is_empty());
}

#[test]
fn nested_empty_blocks_round_trip() {
    let stmt = single_stmt("{ {{{}}} }");

    // Outer block holds one item; unwrap three more levels.
    let mut current = stmt;
    for depth in 0..4 {
        let StmtKind::Compound(block) = current.kind else {
            panic!("expected compound at depth {depth}");
        };
        if depth == 3 {
            assert!(block.items.is_empty(), "innermost block must be empty");
            return;
        }
        assert_eq!(block.items.len(), 1, "one nested block at depth {depth}");
        current = match block.items.into_iter().next().unwrap() {
            BlockItem::Stmt(s) => s,
            other => panic!("expected statement, got {other:?}"),
        };
    }
}

#[test]
fn unclosed_block_reports_once_and_terminates() {
    let (file, diagnostics) = parse("{ if (x) ;");
    assert!(file.items.is_empty());
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, Some(ErrorCode::UnclosedDelimiter));
}

// ============================================================================
// Conditional Statements
// ============================================================================

#[test]
fn if_without_else() {
    let stmt = single_stmt("if (x) ;");
    let StmtKind::If {
        condition,
        then_branch,
        else_branch,
    } = stmt.kind
    else {
        panic!("expected if statement");
    };
    assert!(matches!(condition.kind, ExprKind::Var(ref v) if v.name == "x"));
    assert!(matches!(then_branch.kind, StmtKind::Empty));
    assert!(else_branch.is_none());
}

#[test]
fn else_branch_equals_standalone_parse() {
    let stmt = single_stmt("if (x) ; else y = 2;");
    let StmtKind::If { else_branch, .. } = stmt.kind else {
        panic!("expected if statement");
    };
    let else_branch = else_branch.expect("else branch should be present");

    let standalone = single_stmt("y = 2;");
    assert_eq!(shape(&else_branch.kind), shape(&standalone.kind));
}

#[test]
fn dangling_else_binds_to_innermost_if() {
    let stmt = single_stmt("if (a) if (b) ; else ;");
    let StmtKind::If {
        then_branch,
        else_branch,
        ..
    } = stmt.kind
    else {
        panic!("expected if statement");
    };
    assert!(else_branch.is_none(), "outer if takes no else");
    assert!(
        matches!(
            then_branch.kind,
            StmtKind::If { ref else_branch, .. } if else_branch.is_some()
        ),
        "inner if takes the else"
    );
}

#[test]
fn missing_lparen_after_if_bails_without_parsing_condition() {
    let (file, diagnostics) = parse("if x) ;");
    assert_eq!(diagnostics.len(), 1, "exactly one diagnostic: {diagnostics:?}");
    assert_eq!(diagnostics[0].code, Some(ErrorCode::ExpectedLParen));
    // The bail-out discards the whole malformed statement.
    assert!(file.items.is_empty());
}

#[test]
fn block_with_empty_then_if_else() {
    let (file, diagnostics) = parse("{ ; if ( a ) { } else ; }");
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert_eq!(file.items.len(), 1);

    let BlockItem::Stmt(stmt) = &file.items[0] else {
        panic!("expected statement");
    };
    let StmtKind::Compound(block) = &stmt.kind else {
        panic!("expected compound statement");
    };
    assert_eq!(block.items.len(), 2);

    assert!(matches!(
        &block.items[0],
        BlockItem::Stmt(s) if matches!(s.kind, StmtKind::Empty)
    ));

    let BlockItem::Stmt(if_stmt) = &block.items[1] else {
        panic!("expected statement");
    };
    let StmtKind::If {
        condition,
        then_branch,
        else_branch,
    } = &if_stmt.kind
    else {
        panic!("expected if statement");
    };
    assert!(matches!(condition.kind, ExprKind::Var(ref v) if v.name == "a"));
    assert!(matches!(
        &then_branch.kind,
        StmtKind::Compound(b) if b.items.is_empty()
    ));
    assert!(matches!(
        else_branch.as_deref(),
        Some(Stmt { kind: StmtKind::Empty, .. })
    ));
}

// ============================================================================
// Iteration Statements
// ============================================================================

#[test]
fn while_statement() {
    let stmt = single_stmt("while (i < 10) i = i + 1;");
    let StmtKind::While { condition, body } = stmt.kind else {
        panic!("expected while statement");
    };
    assert!(matches!(
        condition.kind,
        ExprKind::Binary { op: BinOp::Lt, .. }
    ));
    assert!(matches!(body.kind, StmtKind::Expr(_)));
}

#[test]
fn do_while_statement() {
    let stmt = single_stmt("do { i++; } while (i < 10);");
    let StmtKind::DoWhile { body, condition } = stmt.kind else {
        panic!("expected do-while statement");
    };
    assert!(matches!(body.kind, StmtKind::Compound(_)));
    assert!(matches!(
        condition.kind,
        ExprKind::Binary { op: BinOp::Lt, .. }
    ));
}

#[test]
fn for_with_declaration_init() {
    let stmt = single_stmt("for (int i = 0; i < n; i++) ;");
    let StmtKind::For {
        init,
        condition,
        step,
        body,
    } = stmt.kind
    else {
        panic!("expected for statement");
    };
    assert!(matches!(init, ForInit::Decl(_)));
    assert!(condition.is_some());
    assert!(step.is_some());
    assert!(matches!(body.kind, StmtKind::Empty));
}

#[test]
fn for_with_all_clauses_empty() {
    let stmt = single_stmt("for (;;) break;");
    let StmtKind::For {
        init,
        condition,
        step,
        body,
    } = stmt.kind
    else {
        panic!("expected for statement");
    };
    assert!(matches!(init, ForInit::None));
    assert!(condition.is_none());
    assert!(step.is_none());
    assert!(matches!(body.kind, StmtKind::Break));
}

// ============================================================================
// Switch and Labeled Statements
// ============================================================================

#[test]
fn switch_with_cases() {
    let stmt = single_stmt("switch (x) { case 1: break; default: break; }");
    let StmtKind::Switch { scrutinee, body } = stmt.kind else {
        panic!("expected switch statement");
    };
    assert!(matches!(scrutinee.kind, ExprKind::Var(_)));

    let StmtKind::Compound(block) = body.kind else {
        panic!("expected compound body");
    };
    assert_eq!(block.items.len(), 2);
    assert!(matches!(
        &block.items[0],
        BlockItem::Stmt(s) if matches!(s.kind, StmtKind::Case { .. })
    ));
    assert!(matches!(
        &block.items[1],
        BlockItem::Stmt(s) if matches!(s.kind, StmtKind::Default { .. })
    ));
}

#[test]
fn labeled_statement_and_goto() {
    let file = parse_ok("again: x--; goto again;");
    assert_eq!(file.items.len(), 2);
    assert!(matches!(
        &file.items[0],
        BlockItem::Stmt(s) if matches!(
            &s.kind,
            StmtKind::Labeled { label, .. } if label.name == "again"
        )
    ));
    assert!(matches!(
        &file.items[1],
        BlockItem::Stmt(s) if matches!(
            &s.kind,
            StmtKind::Goto(label) if label.name == "again"
        )
    ));
}

#[test]
fn identifier_expression_is_not_a_label() {
    // `x;` starts with an identifier but has no colon after it.
    let stmt = single_stmt("x;");
    assert!(matches!(stmt.kind, StmtKind::Expr(_)));
}

// ============================================================================
// Jump Statements
// ============================================================================

#[test]
fn return_with_and_without_value() {
    let stmt = single_stmt("return;");
    assert!(matches!(stmt.kind, StmtKind::Return(None)));

    let stmt = single_stmt("return x + 1;");
    assert!(matches!(stmt.kind, StmtKind::Return(Some(_))));
}

#[test]
fn continue_and_break() {
    let file = parse_ok("while (1) { continue; break; }");
    assert_eq!(file.items.len(), 1);
}

// ============================================================================
// Declarations
// ============================================================================

#[test]
fn declaration_with_multiple_declarators() {
    let file = parse_ok("static const int x = 1, *p, **pp = 0;");
    assert_eq!(file.items.len(), 1);
    let BlockItem::Decl(decl) = &file.items[0] else {
        panic!("expected declaration");
    };
    assert_eq!(
        decl.specifiers,
        vec![DeclSpecifier::Static, DeclSpecifier::Const, DeclSpecifier::Int]
    );
    assert_eq!(decl.declarators.len(), 3);
    assert_eq!(decl.declarators[0].pointer_depth, 0);
    assert!(decl.declarators[0].init.is_some());
    assert_eq!(decl.declarators[1].pointer_depth, 1);
    assert!(decl.declarators[1].init.is_none());
    assert_eq!(decl.declarators[2].pointer_depth, 2);
}

#[test]
fn declaration_rejected_as_if_body() {
    let (_, diagnostics) = parse("if (x) int y;");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, Some(ErrorCode::DeclarationNotAllowed));
}

// ============================================================================
// Expressions (through expression statements)
// ============================================================================

#[test]
fn precedence_mul_binds_tighter_than_add() {
    let stmt = single_stmt("r = a + b * c;");
    let StmtKind::Expr(expr) = stmt.kind else {
        panic!("expected expression statement");
    };
    let ExprKind::Assign { value, .. } = expr.kind else {
        panic!("expected assignment");
    };
    let ExprKind::Binary { op: BinOp::Add, right, .. } = value.kind else {
        panic!("expected addition at the top");
    };
    assert!(matches!(right.kind, ExprKind::Binary { op: BinOp::Mul, .. }));
}

#[test]
fn postfix_and_member_chains() {
    let stmt = single_stmt("p->next.value[i]++;");
    let StmtKind::Expr(expr) = stmt.kind else {
        panic!("expected expression statement");
    };
    assert!(matches!(
        expr.kind,
        ExprKind::Postfix { op: PostfixOp::Incr, .. }
    ));
}

#[test]
fn conditional_expression() {
    let stmt = single_stmt("m = a > b ? a : b;");
    let StmtKind::Expr(expr) = stmt.kind else {
        panic!("expected expression statement");
    };
    let ExprKind::Assign { value, .. } = expr.kind else {
        panic!("expected assignment");
    };
    assert!(matches!(value.kind, ExprKind::Conditional { .. }));
}

#[test]
fn call_with_arguments() {
    let stmt = single_stmt("f(a, b + 1, g(c));");
    let StmtKind::Expr(expr) = stmt.kind else {
        panic!("expected expression statement");
    };
    let ExprKind::Call { args, .. } = expr.kind else {
        panic!("expected call");
    };
    assert_eq!(args.len(), 3);
}

// ============================================================================
// Recovery Across Statements
// ============================================================================

#[test]
fn one_bad_statement_does_not_cascade() {
    let (file, diagnostics) = parse("{ if x) ; y = 1; }");
    assert_eq!(diagnostics.len(), 1, "{diagnostics:?}");
    assert_eq!(diagnostics[0].code, Some(ErrorCode::ExpectedLParen));

    // The following well-formed statement still parses.
    let BlockItem::Stmt(stmt) = &file.items[0] else {
        panic!("expected statement");
    };
    let StmtKind::Compound(block) = &stmt.kind else {
        panic!("expected compound statement");
    };
    assert_eq!(block.items.len(), 1);
    assert!(matches!(
        &block.items[0],
        BlockItem::Stmt(s) if matches!(s.kind, StmtKind::Expr(_))
    ));
}

#[test]
fn missing_semicolon_is_one_diagnostic() {
    let (file, diagnostics) = parse("x = 1\nreturn x;");
    assert_eq!(diagnostics.len(), 1, "{diagnostics:?}");
    assert_eq!(diagnostics[0].code, Some(ErrorCode::MissingSemicolon));
    // `return` is a synchronization point, so the next statement survives.
    assert_eq!(file.items.len(), 2);
    assert!(matches!(
        &file.items[1],
        BlockItem::Stmt(s) if matches!(s.kind, StmtKind::Return(Some(_)))
    ));
}

#[test]
fn garbage_statement_start_is_one_diagnostic() {
    let (file, diagnostics) = parse("{ ; ) ) ; x; }");
    assert_eq!(diagnostics.len(), 1, "{diagnostics:?}");
    assert_eq!(diagnostics[0].code, Some(ErrorCode::ExpectedStatement));

    let BlockItem::Stmt(stmt) = &file.items[0] else {
        panic!("expected statement");
    };
    let StmtKind::Compound(block) = &stmt.kind else {
        panic!("expected compound statement");
    };
    // The null statement before and the `x;` after both survive.
    assert_eq!(block.items.len(), 2);
}
