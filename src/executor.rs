// File: src/executor.rs
//
// Tree-walking executor for the Slate programming language.
// Executes a validated AST against mutable variable environments, producing
// console output and fatal execution errors.
//
// The executor assumes the AST already passed semantic analysis but
// re-validates types defensively before every operation; it never trusts
// static types alone. A return statement produces a distinguishable control
// flow signal (not an error) that unwinds exactly to the function-call
// boundary that initiated the current activation.

use crate::ast::{Declaration, Expr, FunctionDecl, Program, Stmt, Type};
use crate::errors::{SlateError, SourceLocation};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

/// A runtime value. Undefined represents a declared-but-not-yet-assigned
/// local variable and must never be read or printed.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Boolean(bool),
    Str(String),
    Undefined(Type),
}

impl Value {
    /// The runtime type of this value. An undefined slot reports its
    /// declared type so assignments to uninitialized locals still type-check.
    pub fn runtime_type(&self) -> Type {
        match self {
            Value::Integer(_) => Type::Integer,
            Value::Boolean(_) => Type::Boolean,
            Value::Str(_) => Type::String,
            Value::Undefined(ty) => *ty,
        }
    }

    /// The zero value a declared global starts with
    pub fn zero(ty: Type) -> Value {
        match ty {
            Type::Integer => Value::Integer(0),
            Type::Boolean => Value::Boolean(false),
            Type::String => Value::Str(String::new()),
            Type::Void => Value::Undefined(Type::Void),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{}", i),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Str(s) => write!(f, "{}", s),
            Value::Undefined(ty) => write!(f, "<undefined {}>", ty),
        }
    }
}

/// The outcome of executing a statement: either it completed normally, or a
/// return statement fired a signal carrying an optional value. The signal
/// unwinds to the nearest enclosing call boundary.
#[derive(Debug)]
enum Flow {
    Normal,
    Return(Option<Value>),
}

/// A variable environment: the bindings visible to the executing statement
/// plus the enclosing function's declared return type (None in the top-level
/// program body). One environment exists for the global scope and one fresh
/// one per function activation; activations are never shared or captured.
struct Env {
    vars: HashMap<String, Value>,
    return_type: Option<Type>,
}

/// Main executor that runs validated Slate programs
pub struct Executor {
    functions: HashMap<String, FunctionDecl>,
    output: Option<Arc<Mutex<Vec<u8>>>>,
}

impl Executor {
    /// Creates a new executor
    pub fn new() -> Self {
        Executor {
            functions: HashMap::new(),
            output: None,
        }
    }

    /// Sets the output sink for print statements (used for testing)
    pub fn set_output(&mut self, output: Arc<Mutex<Vec<u8>>>) {
        self.output = Some(output);
    }

    /// Helper to write output to either the output buffer or stdout
    fn write_output(&self, msg: &str) {
        if let Some(out) = &self.output {
            out.lock().unwrap().extend_from_slice(msg.as_bytes());
        } else {
            print!("{}", msg);
        }
    }

    /// Run a validated program: build the function map once, initialize
    /// every declared global to its type's zero value, then execute the
    /// top-level body.
    pub fn run(&mut self, program: &Program) -> Result<(), SlateError> {
        let mut globals = HashMap::new();
        for decl in &program.declarations {
            match decl {
                Declaration::Function(func) => {
                    self.functions.insert(func.name.clone(), func.clone());
                }
                Declaration::Variable(var) => {
                    globals.insert(var.name.clone(), Value::zero(var.ty));
                }
            }
        }

        let mut env = Env {
            vars: globals,
            return_type: None,
        };

        for stmt in &program.body {
            match self.exec_stmt(stmt, &mut env)? {
                Flow::Normal => {}
                // The analyzer rejects return statements in the top-level
                // body, so a signal reaching here is a defect in the
                // pipeline, not a user-facing diagnostic.
                Flow::Return(_) => {
                    return Err(SlateError::internal_error(
                        "The main program body cannot have a return statement -- this should \
                         have been caught during semantic analysis"
                            .to_string(),
                    ));
                }
            }
        }

        Ok(())
    }

    fn exec_stmt(&self, stmt: &Stmt, env: &mut Env) -> Result<Flow, SlateError> {
        match stmt {
            Stmt::Assign { name, value, .. } => {
                if !env.vars.contains_key(name) {
                    return Err(SlateError::execution_error(
                        format!("Variable '{}' not declared", name),
                        stmt.location(),
                    ));
                }

                let evaluated = self.eval_expr(value, env)?;
                let current = &env.vars[name];
                if evaluated.runtime_type() != current.runtime_type() {
                    return Err(SlateError::execution_error(
                        format!(
                            "Type mismatch: variable '{}' is of type {} but tried to assign {}",
                            name,
                            current.runtime_type(),
                            evaluated.runtime_type()
                        ),
                        stmt.location(),
                    ));
                }

                env.vars.insert(name.clone(), evaluated);
                Ok(Flow::Normal)
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                let cond = self.eval_expr(condition, env)?;
                let branch = match cond {
                    Value::Boolean(true) => then_branch,
                    Value::Boolean(false) => else_branch,
                    _ => {
                        return Err(SlateError::execution_error(
                            "If statement condition must evaluate to a Boolean value"
                                .to_string(),
                            stmt.location(),
                        ));
                    }
                };
                for s in branch {
                    match self.exec_stmt(s, env)? {
                        Flow::Normal => {}
                        ret => return Ok(ret),
                    }
                }
                Ok(Flow::Normal)
            }

            Stmt::While {
                condition, body, ..
            } => {
                // The condition is re-evaluated before every iteration,
                // including the first.
                loop {
                    let cond = self.eval_expr(condition, env)?;
                    match cond {
                        Value::Boolean(true) => {}
                        Value::Boolean(false) => break,
                        _ => {
                            return Err(SlateError::execution_error(
                                "While loop condition must evaluate to a Boolean value"
                                    .to_string(),
                                stmt.location(),
                            ));
                        }
                    }
                    for s in body {
                        match self.exec_stmt(s, env)? {
                            Flow::Normal => {}
                            ret => return Ok(ret),
                        }
                    }
                }
                Ok(Flow::Normal)
            }

            Stmt::Print { expr, .. } => {
                let value = self.eval_expr(expr, env)?;
                if let Value::Undefined(_) = value {
                    return Err(SlateError::execution_error(
                        "Cannot print an undefined value".to_string(),
                        stmt.location(),
                    ));
                }
                self.write_output(&value.to_string());
                Ok(Flow::Normal)
            }

            Stmt::PrintLine { .. } => {
                self.write_output("\n");
                Ok(Flow::Normal)
            }

            Stmt::Return { value, .. } => {
                let evaluated = match value {
                    Some(expr) => Some(self.eval_expr(expr, env)?),
                    None => None,
                };

                // In the top-level body there is no declared return type;
                // the signal still unwinds and run() reports the internal
                // error.
                if let Some(expected) = env.return_type {
                    match &evaluated {
                        None => {
                            if expected != Type::Void {
                                return Err(SlateError::execution_error(
                                    "Non-void function must return a value".to_string(),
                                    stmt.location(),
                                ));
                            }
                        }
                        Some(v) => {
                            if v.runtime_type() != expected {
                                return Err(SlateError::execution_error(
                                    format!(
                                        "Return type mismatch: expected {} but found {}",
                                        expected,
                                        v.runtime_type()
                                    ),
                                    stmt.location(),
                                ));
                            }
                        }
                    }
                }

                Ok(Flow::Return(evaluated))
            }

            Stmt::Call { name, args, .. } => {
                self.call_function(name, args, env, stmt.location())?;
                Ok(Flow::Normal)
            }
        }
    }

    fn eval_expr(&self, expr: &Expr, env: &Env) -> Result<Value, SlateError> {
        match expr {
            Expr::Literal { value, ty, .. } => match ty {
                Type::Integer => value.parse::<i64>().map(Value::Integer).map_err(|_| {
                    SlateError::execution_error(
                        format!("Invalid integer literal: {}", value),
                        expr.location(),
                    )
                }),
                Type::Boolean => Ok(Value::Boolean(value == "true")),
                Type::String => Ok(Value::Str(value.clone())),
                Type::Void => Err(SlateError::execution_error(
                    format!("Unsupported literal type: {}", ty),
                    expr.location(),
                )),
            },

            Expr::Variable { name, .. } => match env.vars.get(name) {
                None => Err(SlateError::execution_error(
                    format!("Undefined variable: {}", name),
                    expr.location(),
                )),
                Some(Value::Undefined(_)) => Err(SlateError::execution_error(
                    format!("Uninitialized variable: {}", name),
                    expr.location(),
                )),
                Some(v) => Ok(v.clone()),
            },

            Expr::Unary { op, operand, .. } => {
                let value = self.eval_expr(operand, env)?;
                match op.as_str() {
                    "-" => match value {
                        Value::Integer(i) => Ok(Value::Integer(i.wrapping_neg())),
                        _ => Err(SlateError::execution_error(
                            "Unary '-' operator requires an Integer operand".to_string(),
                            expr.location(),
                        )),
                    },
                    "not" => match value {
                        Value::Boolean(b) => Ok(Value::Boolean(!b)),
                        _ => Err(SlateError::execution_error(
                            "Unary 'not' operator requires a Boolean operand".to_string(),
                            expr.location(),
                        )),
                    },
                    other => Err(SlateError::execution_error(
                        format!("Unsupported unary operator: {}", other),
                        expr.location(),
                    )),
                }
            }

            Expr::Binary {
                left, op, right, ..
            } => {
                let lhs = self.eval_expr(left, env)?;
                let rhs = self.eval_expr(right, env)?;
                self.eval_binary_op(op, lhs, rhs, expr.location())
            }

            Expr::Call { name, args, .. } => {
                match self.call_function(name, args, env, expr.location())? {
                    Flow::Return(Some(value)) => Ok(value),
                    // A call in expression position requires a return signal
                    // to have fired; there is no implicit fallthrough value.
                    Flow::Return(None) | Flow::Normal => Err(SlateError::execution_error(
                        format!("Function '{}' did not return a value", name),
                        expr.location(),
                    )),
                }
            }
        }
    }

    fn eval_binary_op(
        &self,
        op: &str,
        lhs: Value,
        rhs: Value,
        location: SourceLocation,
    ) -> Result<Value, SlateError> {
        match op {
            "+" | "-" | "*" | "/" | "%" => {
                let (l, r) = match (&lhs, &rhs) {
                    (Value::Integer(l), Value::Integer(r)) => (*l, *r),
                    _ => {
                        return Err(SlateError::execution_error(
                            "Arithmetic operators require Integer operands".to_string(),
                            location,
                        ));
                    }
                };
                let result = match op {
                    "+" => l.wrapping_add(r),
                    "-" => l.wrapping_sub(r),
                    "*" => l.wrapping_mul(r),
                    "/" => {
                        if r == 0 {
                            return Err(SlateError::execution_error(
                                "Division by zero is not possible".to_string(),
                                location,
                            ));
                        }
                        l.wrapping_div(r)
                    }
                    _ => {
                        if r == 0 {
                            return Err(SlateError::execution_error(
                                "Modulo by zero is not possible".to_string(),
                                location,
                            ));
                        }
                        l.wrapping_rem(r)
                    }
                };
                Ok(Value::Integer(result))
            }

            "<" | ">" | "<=" | ">=" => {
                let (l, r) = match (&lhs, &rhs) {
                    (Value::Integer(l), Value::Integer(r)) => (*l, *r),
                    _ => {
                        return Err(SlateError::execution_error(
                            "Relational operators require Integer operands".to_string(),
                            location,
                        ));
                    }
                };
                let result = match op {
                    "<" => l < r,
                    ">" => l > r,
                    "<=" => l <= r,
                    _ => l >= r,
                };
                Ok(Value::Boolean(result))
            }

            "==" | "!=" => {
                if lhs.runtime_type() != rhs.runtime_type() {
                    return Err(SlateError::execution_error(
                        "Equality operators require operands of the same type".to_string(),
                        location,
                    ));
                }
                // Equality is defined on the canonical textual form of the
                // operands once their runtime types match.
                let equal = lhs.to_string() == rhs.to_string();
                Ok(Value::Boolean(if op == "==" { equal } else { !equal }))
            }

            "and" | "or" => {
                let (l, r) = match (&lhs, &rhs) {
                    (Value::Boolean(l), Value::Boolean(r)) => (*l, *r),
                    _ => {
                        return Err(SlateError::execution_error(
                            "Logical operators require Boolean operands".to_string(),
                            location,
                        ));
                    }
                };
                Ok(Value::Boolean(if op == "and" { l && r } else { l || r }))
            }

            other => Err(SlateError::execution_error(
                format!("Unsupported operator: {}", other),
                location,
            )),
        }
    }

    /// Execute a function call from statement or expression position.
    ///
    /// Arguments are evaluated eagerly, left to right, in the caller's
    /// environment. The callee runs against a fresh activation environment
    /// holding its bound parameters, its locals initialized to undefined
    /// slots, and its declared return type. The return signal (if any) is
    /// caught here, validated against the declared return type, and handed
    /// back to the caller.
    fn call_function(
        &self,
        name: &str,
        args: &[Expr],
        caller_env: &Env,
        location: SourceLocation,
    ) -> Result<Flow, SlateError> {
        let func = match self.functions.get(name) {
            Some(f) => f,
            None => {
                return Err(SlateError::execution_error(
                    format!("Undefined function: {}", name),
                    location,
                ));
            }
        };

        if args.len() != func.params.len() {
            return Err(SlateError::execution_error(
                format!("Argument count mismatch in call to function: {}", name),
                location,
            ));
        }

        let mut bindings = HashMap::new();
        for (i, (arg, param)) in args.iter().zip(&func.params).enumerate() {
            let value = self.eval_expr(arg, caller_env)?;
            if value.runtime_type() != param.ty {
                return Err(SlateError::execution_error(
                    format!(
                        "Type mismatch for argument {} in call to function {}: expected {} but found {}",
                        i + 1,
                        name,
                        param.ty,
                        value.runtime_type()
                    ),
                    location,
                ));
            }
            bindings.insert(param.name.clone(), value);
        }

        for local in &func.locals {
            bindings.insert(local.name.clone(), Value::Undefined(local.ty));
        }

        let mut activation = Env {
            vars: bindings,
            return_type: Some(func.return_type),
        };

        for stmt in &func.body {
            match self.exec_stmt(stmt, &mut activation)? {
                Flow::Normal => {}
                Flow::Return(value) => {
                    match (&value, func.return_type) {
                        (None, Type::Void) => {}
                        (Some(_), Type::Void) => {
                            return Err(SlateError::execution_error(
                                format!("Void function '{}' should not return a value", name),
                                location,
                            ));
                        }
                        (Some(v), expected) => {
                            if v.runtime_type() != expected {
                                return Err(SlateError::execution_error(
                                    format!(
                                        "Function '{}' must return a value of type {}",
                                        name, expected
                                    ),
                                    location,
                                ));
                            }
                        }
                        (None, expected) => {
                            return Err(SlateError::execution_error(
                                format!(
                                    "Function '{}' must return a value of type {}",
                                    name, expected
                                ),
                                location,
                            ));
                        }
                    }
                    return Ok(Flow::Return(value));
                }
            }
        }

        // The body completed without a return signal. A statement-position
        // call tolerates this; an expression-position call rejects it.
        Ok(Flow::Normal)
    }
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}
