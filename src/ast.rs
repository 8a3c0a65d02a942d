// File: src/ast.rs
//
// Abstract Syntax Tree (AST) definitions for the Slate programming language.
// Defines the structure of parsed Slate programs.
//
// The AST represents the syntactic structure of Slate code after parsing.
// Expressions (Expr) represent values and computations, Statements (Stmt)
// represent actions and control flow, and Declarations introduce the
// program's variables and functions. All node kinds are closed enums so the
// analyzer and executor match on them exhaustively.

use crate::errors::SourceLocation;
use std::fmt;

/// The static type of a declaration or expression. A closed enumeration
/// compared by value; never constructed dynamically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Type {
    Integer,
    Boolean,
    String,
    Void,
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Type::Integer => write!(f, "Integer"),
            Type::Boolean => write!(f, "Boolean"),
            Type::String => write!(f, "String"),
            Type::Void => write!(f, "void"),
        }
    }
}

/// Represents an expression in Slate - something that evaluates to a value.
/// Each variant carries its source position, used only for diagnostics.
#[derive(Debug, Clone)]
pub enum Expr {
    /// Literal value kept as its lexical text, typed by its token kind
    Literal {
        value: String,
        ty: Type,
        line: usize,
        column: usize,
    },
    Variable {
        name: String,
        line: usize,
        column: usize,
    },
    Unary {
        op: String,
        operand: Box<Expr>,
        line: usize,
        column: usize,
    },
    Binary {
        left: Box<Expr>,
        op: String,
        right: Box<Expr>,
        line: usize,
        column: usize,
    },
    Call {
        name: String,
        args: Vec<Expr>,
        line: usize,
        column: usize,
    },
}

impl Expr {
    /// Returns the source location of this expression.
    pub fn location(&self) -> SourceLocation {
        match self {
            Expr::Literal { line, column, .. }
            | Expr::Variable { line, column, .. }
            | Expr::Unary { line, column, .. }
            | Expr::Binary { line, column, .. }
            | Expr::Call { line, column, .. } => SourceLocation::new(*line, *column),
        }
    }
}

/// Represents a statement in Slate - an action or control-flow construct
#[derive(Debug, Clone)]
pub enum Stmt {
    Assign {
        name: String,
        value: Expr,
        line: usize,
        column: usize,
    },
    If {
        condition: Expr,
        then_branch: Vec<Stmt>,
        /// Empty when the statement has no else branch
        else_branch: Vec<Stmt>,
        line: usize,
        column: usize,
    },
    While {
        condition: Expr,
        body: Vec<Stmt>,
        line: usize,
        column: usize,
    },
    Print {
        expr: Expr,
        line: usize,
        column: usize,
    },
    PrintLine {
        line: usize,
        column: usize,
    },
    Return {
        value: Option<Expr>,
        line: usize,
        column: usize,
    },
    Call {
        name: String,
        args: Vec<Expr>,
        line: usize,
        column: usize,
    },
}

impl Stmt {
    /// Returns the source location of this statement.
    pub fn location(&self) -> SourceLocation {
        match self {
            Stmt::Assign { line, column, .. }
            | Stmt::If { line, column, .. }
            | Stmt::While { line, column, .. }
            | Stmt::Print { line, column, .. }
            | Stmt::PrintLine { line, column }
            | Stmt::Return { line, column, .. }
            | Stmt::Call { line, column, .. } => SourceLocation::new(*line, *column),
        }
    }
}

/// A variable declaration: `label : type ;`
/// Used both for top-level variables and for function parameters/locals.
#[derive(Debug, Clone)]
pub struct VariableDecl {
    pub name: String,
    pub ty: Type,
    pub line: usize,
    pub column: usize,
}

/// A function declaration: `label ( params ) : type is locals begin stmts end ;`
/// Parameters and locals share one name space per function.
#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: String,
    pub return_type: Type,
    pub params: Vec<VariableDecl>,
    pub locals: Vec<VariableDecl>,
    pub body: Vec<Stmt>,
    pub line: usize,
    pub column: usize,
}

/// A top-level declaration. Every declaration carries a unique label and a
/// source position for diagnostics.
#[derive(Debug, Clone)]
pub enum Declaration {
    Variable(VariableDecl),
    Function(FunctionDecl),
}

impl Declaration {
    pub fn label(&self) -> &str {
        match self {
            Declaration::Variable(v) => &v.name,
            Declaration::Function(f) => &f.name,
        }
    }

    pub fn location(&self) -> SourceLocation {
        match self {
            Declaration::Variable(v) => SourceLocation::new(v.line, v.column),
            Declaration::Function(f) => SourceLocation::new(f.line, f.column),
        }
    }
}

/// The parse root: top-level declarations followed by the program body.
/// Immutable after parsing.
#[derive(Debug, Clone)]
pub struct Program {
    pub declarations: Vec<Declaration>,
    pub body: Vec<Stmt>,
}
