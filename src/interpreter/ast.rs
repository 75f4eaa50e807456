#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add, Subtract,
    Multiply, Divide,

    Or, And,

    Equal, NotEqual,
    Less, LessEqual,
    Greater, GreaterEqual,
}

/// An expression evaluates to a single number. There is no separate boolean
/// type; `Or`, `And` and the comparisons yield `1.0` or `0.0`.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Constant(f64),
    Variable(String),

    Negate(Box<Expr>),
    Binary {
        left: Box<Expr>,
        operator: BinaryOp,
        right: Box<Expr>,
    },
}

/// A statement executes for effect against the variable environment and the
/// command sink. Each parent owns its children; the tree is never shared.
#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Home,
    PenUp,
    PenDown,
    PushState,
    PopState,

    Forward(Expr),
    Left(Expr),
    Right(Expr),

    Assign {
        name: String,
        expr: Expr,
    },
    If {
        condition: Expr,
        then: Box<Stmt>,
        otherwise: Option<Box<Stmt>>,
    },
    While {
        condition: Expr,
        body: Box<Stmt>,
    },
    Block(Vec<Stmt>),
}
