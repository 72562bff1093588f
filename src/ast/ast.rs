use crate::ast::types::Ty;
use crate::intern::intern::Symbol;
use crate::Position;

/// A whole parsed program: the ordered list of user class definitions.
#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub classes: Vec<ClassDef>,
}

/// One class definition.
///
/// `parent` is `None` only for the root class; every other class names the
/// class it inherits from. The definition is created once at install time
/// and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassDef {
    pub name: Symbol,
    pub parent: Option<Symbol>,
    pub features: Vec<Feature>,
    pub position: Position,
}

/// A class member: either an attribute or a method.
#[derive(Debug, Clone, PartialEq)]
pub enum Feature {
    Attribute(Attribute),
    Method(Method),
}

/// An attribute declaration. An omitted initializer is a [`ExprKind::NoOp`]
/// expression, which resolves to the no-type sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub name: Symbol,
    pub declared_type: Symbol,
    pub init: Expr,
    pub position: Position,
}

/// A method declaration with its ordered formal parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub name: Symbol,
    pub formals: Vec<Formal>,
    pub return_type: Symbol,
    pub body: Expr,
    pub position: Position,
}

/// One formal parameter of a method.
#[derive(Debug, Clone, PartialEq)]
pub struct Formal {
    pub name: Symbol,
    pub declared_type: Symbol,
    pub position: Position,
}

/// One branch of a case expression: the pattern identifier, its declared
/// type, and the branch body checked under that binding.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseBranch {
    pub name: Symbol,
    pub declared_type: Symbol,
    pub body: Expr,
    pub position: Position,
}

/// An expression node.
///
/// `ty` is the resolved-type slot: unset until the type checker visits the
/// node, then set to the statically determined type (or a recovery type).
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub position: Position,
    pub ty: Option<Ty>,
}

impl Expr {
    pub fn new(kind: ExprKind, position: Position) -> Self {
        Expr {
            kind,
            position,
            ty: None,
        }
    }

    /// An empty expression, e.g. the body of a built-in method or an
    /// omitted attribute initializer.
    pub fn no_op(position: Position) -> Self {
        Expr::new(ExprKind::NoOp, position)
    }
}

/// The arithmetic operators over integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

/// The ordering comparisons over integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Lt,
    Le,
}

/// Every expression form of the language.
///
/// This is a closed sum type: a new form added here is a compile-time
/// exhaustiveness failure in the type checker.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Arith {
        op: ArithOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Compare {
        op: CompareOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Eq {
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    /// Arithmetic negation.
    Neg(Box<Expr>),
    /// Boolean complement.
    Not(Box<Expr>),
    Assign {
        target: Symbol,
        value: Box<Expr>,
    },
    Ident(Symbol),
    New(Symbol),
    IsVoid(Box<Expr>),
    If {
        predicate: Box<Expr>,
        then_branch: Box<Expr>,
        else_branch: Box<Expr>,
    },
    While {
        predicate: Box<Expr>,
        body: Box<Expr>,
    },
    Case {
        scrutinee: Box<Expr>,
        branches: Vec<CaseBranch>,
    },
    Let {
        name: Symbol,
        declared_type: Symbol,
        init: Box<Expr>,
        body: Box<Expr>,
    },
    Block(Vec<Expr>),
    Dispatch {
        receiver: Box<Expr>,
        method: Symbol,
        args: Vec<Expr>,
    },
    StaticDispatch {
        receiver: Box<Expr>,
        dispatch_type: Symbol,
        method: Symbol,
        args: Vec<Expr>,
    },
    IntLit(i64),
    BoolLit(bool),
    StrLit(String),
    NoOp,
}
