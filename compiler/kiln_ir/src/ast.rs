//! Bound statement and expression trees.
//!
//! Every node carries its span; expressions also carry the type the binder
//! computed for them.

use crate::{Constant, LocalId, Name, Span, Symbol, TypeId};

#[derive(Clone, Debug)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub span: Span,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>, span: Span) -> Self {
        Block { stmts, span }
    }
}

#[derive(Clone, Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

#[derive(Clone, Debug)]
pub struct SwitchCase {
    /// `None` for the `default` clause.
    pub test: Option<Expr>,
    pub body: Stmt,
}

#[derive(Clone, Debug)]
pub struct CatchClause {
    /// Local bound to the thrown value; its declared type selects the clause.
    pub exception: LocalId,
    pub body: Block,
}

#[derive(Clone, Debug)]
pub enum StmtKind {
    Block(Block),
    LocalVariable {
        local: LocalId,
        default: Option<Constant>,
    },
    If {
        condition: Expr,
        consequent: Box<Stmt>,
        alternate: Option<Box<Stmt>>,
    },
    Switch {
        discriminant: Expr,
        cases: Vec<SwitchCase>,
    },
    Labeled {
        label: Name,
        body: Box<Stmt>,
    },
    Return(Option<Expr>),
    Throw(Expr),
    Break(Option<Name>),
    Continue(Option<Name>),
    While {
        /// `None` loops until a `break`.
        condition: Option<Expr>,
        body: Box<Stmt>,
    },
    For {
        init: Option<Box<Stmt>>,
        condition: Option<Expr>,
        post: Option<Box<Stmt>>,
        body: Box<Stmt>,
    },
    Try {
        body: Block,
        catches: Vec<CatchClause>,
        finally: Option<Block>,
    },
    Empty,
    /// Several statements sharing the enclosing scope.
    Multi(Vec<Stmt>),
    Expression(Expr),
}

impl StmtKind {
    /// Short node name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            StmtKind::Block(_) => "block",
            StmtKind::LocalVariable { .. } => "local",
            StmtKind::If { .. } => "if",
            StmtKind::Switch { .. } => "switch",
            StmtKind::Labeled { .. } => "labeled",
            StmtKind::Return(_) => "return",
            StmtKind::Throw(_) => "throw",
            StmtKind::Break(_) => "break",
            StmtKind::Continue(_) => "continue",
            StmtKind::While { .. } => "while",
            StmtKind::For { .. } => "for",
            StmtKind::Try { .. } => "try",
            StmtKind::Empty => "empty",
            StmtKind::Multi(_) => "multi",
            StmtKind::Expression(_) => "expression",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Dereference,
    AddressOf,
    Plus,
    Minus,
    Not,
    BitNot,
    Increment,
    Decrement,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Shl,
    Shr,
    BitAnd,
    BitOr,
    BitXor,
    And,
    Or,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Eq,
    NotEq,
    Assign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    RemAssign,
    PowAssign,
    ShlAssign,
    ShrAssign,
    BitAndAssign,
    BitOrAssign,
    BitXorAssign,
}

impl BinaryOp {
    /// For an assignment operator, the arithmetic it applies before storing.
    ///
    /// Returns `None` for plain `=` and for non-assignment operators.
    pub fn compound_operator(self) -> Option<BinaryOp> {
        Some(match self {
            BinaryOp::AddAssign => BinaryOp::Add,
            BinaryOp::SubAssign => BinaryOp::Sub,
            BinaryOp::MulAssign => BinaryOp::Mul,
            BinaryOp::DivAssign => BinaryOp::Div,
            BinaryOp::RemAssign => BinaryOp::Rem,
            BinaryOp::PowAssign => BinaryOp::Pow,
            BinaryOp::ShlAssign => BinaryOp::Shl,
            BinaryOp::ShrAssign => BinaryOp::Shr,
            BinaryOp::BitAndAssign => BinaryOp::BitAnd,
            BinaryOp::BitOrAssign => BinaryOp::BitOr,
            BinaryOp::BitXorAssign => BinaryOp::BitXor,
            _ => return None,
        })
    }

    pub fn is_assignment(self) -> bool {
        self == BinaryOp::Assign || self.compound_operator().is_some()
    }
}

#[derive(Clone, Debug)]
pub struct PropertyInit {
    pub name: Name,
    pub value: Expr,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct Expr {
    pub kind: ExprKind,
    pub ty: TypeId,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, ty: TypeId, span: Span) -> Self {
        Expr { kind, ty, span }
    }

    /// Whether this expression is a bare load of `local`.
    pub fn loads_local(&self, local: LocalId) -> bool {
        matches!(
            self.kind,
            ExprKind::LoadLocation {
                object: None,
                symbol: Symbol::Local(id),
            } if id == local
        )
    }
}

#[derive(Clone, Debug)]
pub enum ExprKind {
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    /// Array literal typed by `Expr::ty`.
    Array {
        size: Option<Box<Expr>>,
        elements: Option<Vec<Expr>>,
    },
    /// Object literal typed by `Expr::ty`.
    Object {
        properties: Vec<PropertyInit>,
    },
    LoadLocation {
        object: Option<Box<Expr>>,
        symbol: Symbol,
    },
    /// Computed member access: `object[name]`.
    LoadDynamic {
        object: Box<Expr>,
        name: Box<Expr>,
    },
    /// Construct an instance of `Expr::ty`.
    New {
        args: Vec<Expr>,
    },
    Invoke {
        function: Box<Expr>,
        args: Vec<Expr>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
        /// For `++`/`--`, yield the value from before the update.
        postfix: bool,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Checked conversion to `Expr::ty`.
    Cast(Box<Expr>),
    IsInst {
        expr: Box<Expr>,
        target: TypeId,
    },
    TypeOf(Box<Expr>),
    Conditional {
        condition: Box<Expr>,
        consequent: Box<Expr>,
        alternate: Box<Expr>,
    },
    /// Evaluate in order, yield the last.
    Sequence(Vec<Expr>),
}

impl ExprKind {
    /// Short node name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            ExprKind::Null => "null",
            ExprKind::Bool(_) => "bool",
            ExprKind::Number(_) => "number",
            ExprKind::String(_) => "string",
            ExprKind::Array { .. } => "array",
            ExprKind::Object { .. } => "object",
            ExprKind::LoadLocation { .. } => "load",
            ExprKind::LoadDynamic { .. } => "load-dynamic",
            ExprKind::New { .. } => "new",
            ExprKind::Invoke { .. } => "invoke",
            ExprKind::Unary { .. } => "unary",
            ExprKind::Binary { .. } => "binary",
            ExprKind::Cast(_) => "cast",
            ExprKind::IsInst { .. } => "isinst",
            ExprKind::TypeOf(_) => "typeof",
            ExprKind::Conditional { .. } => "conditional",
            ExprKind::Sequence(_) => "sequence",
        }
    }
}
