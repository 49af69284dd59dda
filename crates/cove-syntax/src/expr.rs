//! Expression AST nodes.

use crate::Ident;
use cove_common::Span;

/// An expression.
#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Expression kind.
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// Integer literal
    IntLit(i64),
    /// Float literal
    FloatLit(f64),
    /// String literal
    StrLit(String),
    /// Character literal
    CharLit(char),

    /// Variable reference
    Var(Ident),

    /// Assignment `lhs = rhs`, `lhs += rhs`, ...
    Assign {
        op: AssignOp,
        target: Box<Expr>,
        value: Box<Expr>,
    },

    /// Conditional `cond ? then : else`
    Conditional {
        condition: Box<Expr>,
        then_expr: Box<Expr>,
        else_expr: Box<Expr>,
    },

    /// Binary operation `a + b`
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Prefix unary operation `!a`, `*p`, `++i`, ...
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },

    /// Postfix `i++` / `i--`
    Postfix {
        op: PostfixOp,
        operand: Box<Expr>,
    },

    /// Comma expression `a, b`
    Comma {
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// Function call `f(a, b)`
    Call {
        func: Box<Expr>,
        args: Vec<Expr>,
    },

    /// Index `a[i]`
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },

    /// Member access `s.field` or `p->field`
    Member {
        base: Box<Expr>,
        field: Ident,
        arrow: bool,
    },

    /// Placeholder produced by error recovery.
    Error,
}

/// Binary operators by precedence group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Multiplicative
    Mul, // *
    Div, // /
    Rem, // %

    // Additive
    Add, // +
    Sub, // -

    // Shift
    Shl, // <<
    Shr, // >>

    // Relational
    Lt, // <
    Gt, // >
    Le, // <=
    Ge, // >=

    // Equality
    Eq, // ==
    Ne, // !=

    // Bitwise
    BitAnd, // &
    BitXor, // ^
    BitOr,  // |

    // Logical
    And, // &&
    Or,  // ||
}

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign, // =
    Add,    // +=
    Sub,    // -=
    Mul,    // *=
    Div,    // /=
    Rem,    // %=
    Shl,    // <<=
    Shr,    // >>=
    And,    // &=
    Xor,    // ^=
    Or,     // |=
}

/// Prefix unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,    // +
    Neg,     // -
    Not,     // !
    BitNot,  // ~
    Deref,   // *
    AddrOf,  // &
    PreIncr, // ++
    PreDecr, // --
}

/// Postfix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostfixOp {
    Incr, // ++
    Decr, // --
}
