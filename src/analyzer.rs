// File: src/analyzer.rs
//
// Semantic analyzer for the Slate programming language.
// Performs a single static pass over the AST before execution, validating
// declarations, types, and control-flow well-formedness.
//
// Checks, in order:
// 1. No two top-level declarations share a label
// 2. Per function: parameters and locals share one name space with no
//    duplicates, and no function name collides with any parameter or local
//    anywhere in the program (a conservative whole-program uniqueness rule)
// 3. Every statement in every function body type-checks against that
//    function's scope (parameters + locals + declared return type)
// 4. Non-void functions contain a return statement
// 5. Every statement in the top-level body type-checks against the global
//    scope, where return statements are rejected
//
// The analyzer never mutates the AST and stops at the first violation.

use crate::ast::{Declaration, Expr, FunctionDecl, Program, Stmt, Type};
use crate::errors::{find_closest_match, SlateError, SourceLocation};
use std::collections::{HashMap, HashSet};

/// The typing environment a statement is checked against: the visible
/// variable bindings plus the enclosing function's declared return type
/// (None in the top-level program body).
struct Scope {
    vars: HashMap<String, Type>,
    return_type: Option<Type>,
}

/// Semantic analyzer maintains the global symbol tables built from the
/// program's top-level declarations
pub struct SemanticAnalyzer {
    functions: HashMap<String, FunctionDecl>,
    globals: HashMap<String, Type>,
}

impl SemanticAnalyzer {
    /// Creates a new analyzer with empty symbol tables
    pub fn new() -> Self {
        SemanticAnalyzer {
            functions: HashMap::new(),
            globals: HashMap::new(),
        }
    }

    /// Analyze a parsed program, failing on the first violation found
    pub fn analyze(&mut self, program: &Program) -> Result<(), SlateError> {
        self.check_no_duplicate_labels(program)?;
        self.build_symbol_tables(program);

        for decl in &program.declarations {
            if let Declaration::Function(func) = decl {
                self.analyze_function(func)?;
            }
        }

        // The top-level body has no enclosing function, so no return type
        let scope = Scope {
            vars: self.globals.clone(),
            return_type: None,
        };
        for stmt in &program.body {
            self.check_stmt(stmt, &scope)?;
        }

        Ok(())
    }

    /// Top-level variables and functions share one name space
    fn check_no_duplicate_labels(&self, program: &Program) -> Result<(), SlateError> {
        let mut labels = HashSet::new();
        for decl in &program.declarations {
            if !labels.insert(decl.label()) {
                return Err(SlateError::semantic_error(
                    format!(
                        "Cannot have duplicate label '{}' in program",
                        decl.label()
                    ),
                    decl.location(),
                ));
            }
        }
        Ok(())
    }

    fn build_symbol_tables(&mut self, program: &Program) {
        for decl in &program.declarations {
            match decl {
                Declaration::Variable(var) => {
                    self.globals.insert(var.name.clone(), var.ty);
                }
                Declaration::Function(func) => {
                    self.functions.insert(func.name.clone(), func.clone());
                }
            }
        }
    }

    fn analyze_function(&self, func: &FunctionDecl) -> Result<(), SlateError> {
        self.check_function_labels(func)?;

        let scope = self.function_scope(func);
        for stmt in &func.body {
            self.check_stmt(stmt, &scope)?;
        }

        if func.return_type != Type::Void && !has_return_statement(&func.body) {
            return Err(SlateError::semantic_error(
                format!(
                    "Non-void function '{}' must contain a return statement",
                    func.name
                ),
                SourceLocation::new(func.line, func.column),
            ));
        }

        Ok(())
    }

    /// Parameters and locals share one name space per function. Function
    /// names must also not collide with any parameter or local anywhere in
    /// the program.
    fn check_function_labels(&self, func: &FunctionDecl) -> Result<(), SlateError> {
        let loc = SourceLocation::new(func.line, func.column);

        let mut labels = HashSet::new();
        for param in &func.params {
            if !labels.insert(param.name.as_str()) {
                return Err(SlateError::semantic_error(
                    format!(
                        "Duplicate parameter name '{}' in function '{}'",
                        param.name, func.name
                    ),
                    loc,
                ));
            }
        }
        for local in &func.locals {
            if !labels.insert(local.name.as_str()) {
                return Err(SlateError::semantic_error(
                    format!(
                        "Duplicate local variable name '{}' in function '{}'",
                        local.name, func.name
                    ),
                    loc,
                ));
            }
        }

        if labels.contains(func.name.as_str()) {
            return Err(SlateError::semantic_error(
                format!(
                    "Function name conflicts with parameter or local variable: '{}'",
                    func.name
                ),
                loc,
            ));
        }

        for other in self.functions.values() {
            for param in &other.params {
                if param.name == func.name {
                    return Err(SlateError::semantic_error(
                        format!(
                            "Function name '{}' conflicts with parameter '{}' in function '{}'",
                            func.name, param.name, other.name
                        ),
                        loc,
                    ));
                }
            }
            for local in &other.locals {
                if local.name == func.name {
                    return Err(SlateError::semantic_error(
                        format!(
                            "Function name '{}' conflicts with local variable '{}' in function '{}'",
                            func.name, local.name, other.name
                        ),
                        loc,
                    ));
                }
            }
        }

        Ok(())
    }

    /// Function bodies see only their own parameters and locals, never the
    /// program's global variables.
    fn function_scope(&self, func: &FunctionDecl) -> Scope {
        let mut vars = HashMap::new();
        for param in &func.params {
            vars.insert(param.name.clone(), param.ty);
        }
        for local in &func.locals {
            vars.insert(local.name.clone(), local.ty);
        }
        Scope {
            vars,
            return_type: Some(func.return_type),
        }
    }

    fn check_stmt(&self, stmt: &Stmt, scope: &Scope) -> Result<(), SlateError> {
        match stmt {
            Stmt::Assign { name, value, .. } => {
                let var_type = match scope.vars.get(name) {
                    Some(t) => *t,
                    None => {
                        let mut err = SlateError::semantic_error(
                            format!("Variable '{}' not declared", name),
                            stmt.location(),
                        );
                        if let Some(closest) =
                            find_closest_match(name, scope.vars.keys().map(String::as_str))
                        {
                            err = err.with_suggestion(closest.to_string());
                        }
                        return Err(err);
                    }
                };

                let expr_type = self.type_of(value, scope)?;
                if expr_type != var_type {
                    return Err(SlateError::semantic_error(
                        format!(
                            "Type mismatch: '{}' is {} but got {}",
                            name, var_type, expr_type
                        ),
                        stmt.location(),
                    ));
                }
                Ok(())
            }

            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                let cond_type = self.type_of(condition, scope)?;
                if cond_type != Type::Boolean {
                    return Err(SlateError::semantic_error(
                        "If statement condition must be of type Boolean".to_string(),
                        stmt.location(),
                    ));
                }
                for s in then_branch {
                    self.check_stmt(s, scope)?;
                }
                for s in else_branch {
                    self.check_stmt(s, scope)?;
                }
                Ok(())
            }

            Stmt::While {
                condition, body, ..
            } => {
                let cond_type = self.type_of(condition, scope)?;
                if cond_type != Type::Boolean {
                    return Err(SlateError::semantic_error(
                        "While loop condition must be of type Boolean".to_string(),
                        stmt.location(),
                    ));
                }
                for s in body {
                    self.check_stmt(s, scope)?;
                }
                Ok(())
            }

            Stmt::Print { expr, .. } => {
                let expr_type = self.type_of(expr, scope)?;
                if expr_type == Type::Void {
                    return Err(SlateError::semantic_error(
                        format!(
                            "Print statement cannot print expression of type {}",
                            expr_type
                        ),
                        stmt.location(),
                    ));
                }
                Ok(())
            }

            Stmt::PrintLine { .. } => Ok(()),

            Stmt::Return { value, .. } => {
                let expected = match scope.return_type {
                    Some(t) => t,
                    None => {
                        return Err(SlateError::semantic_error(
                            "Return statement used outside of a function context".to_string(),
                            stmt.location(),
                        ));
                    }
                };

                match value {
                    None => {
                        if expected != Type::Void {
                            return Err(SlateError::semantic_error(
                                "Non-void function must return a value".to_string(),
                                stmt.location(),
                            ));
                        }
                        Ok(())
                    }
                    Some(expr) => {
                        let actual = self.type_of(expr, scope)?;
                        if actual != expected {
                            return Err(SlateError::semantic_error(
                                format!(
                                    "Return type mismatch: expected {} but found {}",
                                    expected, actual
                                ),
                                stmt.location(),
                            ));
                        }
                        Ok(())
                    }
                }
            }

            Stmt::Call { name, args, .. } => {
                self.check_call(name, args, scope, stmt.location())?;
                Ok(())
            }
        }
    }

    /// Infer and validate the static type of an expression
    fn type_of(&self, expr: &Expr, scope: &Scope) -> Result<Type, SlateError> {
        match expr {
            Expr::Literal { ty, .. } => Ok(*ty),

            Expr::Variable { name, .. } => match scope.vars.get(name) {
                Some(t) => Ok(*t),
                None => {
                    let mut err = SlateError::semantic_error(
                        format!("Undefined variable: {}", name),
                        expr.location(),
                    );
                    if let Some(closest) =
                        find_closest_match(name, scope.vars.keys().map(String::as_str))
                    {
                        err = err.with_suggestion(closest.to_string());
                    }
                    Err(err)
                }
            },

            Expr::Unary { op, operand, .. } => {
                let operand_type = self.type_of(operand, scope)?;
                match op.as_str() {
                    "-" => {
                        if operand_type != Type::Integer {
                            return Err(SlateError::semantic_error(
                                "Unary '-' operator requires an Integer operand".to_string(),
                                expr.location(),
                            ));
                        }
                        Ok(Type::Integer)
                    }
                    "not" => {
                        if operand_type != Type::Boolean {
                            return Err(SlateError::semantic_error(
                                "Unary 'not' operator requires a Boolean operand".to_string(),
                                expr.location(),
                            ));
                        }
                        Ok(Type::Boolean)
                    }
                    other => Err(SlateError::semantic_error(
                        format!("Unsupported unary operator: {}", other),
                        expr.location(),
                    )),
                }
            }

            Expr::Binary {
                left, op, right, ..
            } => {
                let left_type = self.type_of(left, scope)?;
                let right_type = self.type_of(right, scope)?;

                match op.as_str() {
                    "<" | ">" | "<=" | ">=" => {
                        if left_type != Type::Integer || right_type != Type::Integer {
                            return Err(SlateError::semantic_error(
                                "Relational operators require Integer operands".to_string(),
                                expr.location(),
                            ));
                        }
                        Ok(Type::Boolean)
                    }
                    "==" | "!=" => {
                        if left_type != right_type {
                            return Err(SlateError::semantic_error(
                                "Equality operators require operands of the same type"
                                    .to_string(),
                                expr.location(),
                            ));
                        }
                        if left_type != Type::Integer && left_type != Type::Boolean {
                            return Err(SlateError::semantic_error(
                                "Equality operators support only Integer and Boolean types"
                                    .to_string(),
                                expr.location(),
                            ));
                        }
                        Ok(Type::Boolean)
                    }
                    "+" | "-" | "*" | "/" | "%" => {
                        if left_type != Type::Integer || right_type != Type::Integer {
                            return Err(SlateError::semantic_error(
                                "Arithmetic operators require Integer operands".to_string(),
                                expr.location(),
                            ));
                        }
                        Ok(Type::Integer)
                    }
                    "and" | "or" => {
                        if left_type != Type::Boolean || right_type != Type::Boolean {
                            return Err(SlateError::semantic_error(
                                "Logical operators require Boolean operands".to_string(),
                                expr.location(),
                            ));
                        }
                        Ok(Type::Boolean)
                    }
                    other => Err(SlateError::semantic_error(
                        format!("Unsupported operator: {}", other),
                        expr.location(),
                    )),
                }
            }

            Expr::Call { name, args, .. } => self.check_call(name, args, scope, expr.location()),
        }
    }

    /// Validate a function call (statement or expression position) and
    /// return the callee's declared return type
    fn check_call(
        &self,
        name: &str,
        args: &[Expr],
        scope: &Scope,
        location: SourceLocation,
    ) -> Result<Type, SlateError> {
        let func = match self.functions.get(name) {
            Some(f) => f,
            None => {
                let mut err = SlateError::semantic_error(
                    format!("Undefined function: {}", name),
                    location,
                );
                if let Some(closest) =
                    find_closest_match(name, self.functions.keys().map(String::as_str))
                {
                    err = err.with_suggestion(closest.to_string());
                }
                return Err(err);
            }
        };

        if args.len() != func.params.len() {
            return Err(SlateError::semantic_error(
                format!("Argument count mismatch in call to function: {}", name),
                location,
            ));
        }

        for (i, (arg, param)) in args.iter().zip(&func.params).enumerate() {
            let actual = self.type_of(arg, scope)?;
            if actual != param.ty {
                return Err(SlateError::semantic_error(
                    format!(
                        "Type mismatch for argument {} in call to function {}: expected {} but found {}",
                        i + 1,
                        name,
                        param.ty,
                        actual
                    ),
                    location,
                ));
            }
        }

        Ok(func.return_type)
    }
}

impl Default for SemanticAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

/// Scans a statement list for a return statement. An if statement counts
/// only when both branches recursively contain a return; a branch lacking
/// one just continues the scan. While bodies are never entered.
fn has_return_statement(statements: &[Stmt]) -> bool {
    for stmt in statements {
        match stmt {
            Stmt::Return { .. } => return true,
            Stmt::If {
                then_branch,
                else_branch,
                ..
            } => {
                if has_return_statement(then_branch) && has_return_statement(else_branch) {
                    return true;
                }
            }
            _ => {}
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::lexer::tokenize;
    use crate::parser::Parser;

    fn analyze_source(src: &str) -> Result<(), SlateError> {
        let tokens = tokenize(src).expect("lexing should succeed");
        let program = Parser::new(tokens).parse().expect("parsing should succeed");
        SemanticAnalyzer::new().analyze(&program)
    }

    #[test]
    fn test_valid_program_passes() {
        let src = "program \
                   x: Integer; \
                   square(n: Integer): Integer is begin return n * n; end; \
                   begin x := square(4); print x; end;";
        assert!(analyze_source(src).is_ok());
    }

    #[test]
    fn test_duplicate_top_level_label() {
        let err = analyze_source("program x: Integer; x: Boolean; begin end;").unwrap_err();
        assert_eq!(err.kind, ErrorKind::SemanticError);
        assert!(err.message.contains("duplicate label 'x'"));
    }

    #[test]
    fn test_duplicate_label_between_variable_and_function() {
        let src = "program x: Integer; x(): void is begin end; begin end;";
        let err = analyze_source(src).unwrap_err();
        assert!(err.message.contains("duplicate label"));
    }

    #[test]
    fn test_undeclared_assignment_target() {
        let err = analyze_source("program begin y := 1; end;").unwrap_err();
        assert_eq!(err.kind, ErrorKind::SemanticError);
        assert!(err.message.contains("not declared"));
    }

    #[test]
    fn test_undeclared_variable_gets_suggestion() {
        let src = "program counter: Integer; begin countr := 1; end;";
        let err = analyze_source(src).unwrap_err();
        assert_eq!(err.suggestion.as_deref(), Some("counter"));
    }

    #[test]
    fn test_assignment_type_mismatch() {
        let err = analyze_source("program x: Integer; begin x := true; end;").unwrap_err();
        assert!(err.message.contains("Type mismatch"));
    }

    #[test]
    fn test_arithmetic_requires_integers() {
        let err = analyze_source("program x: Integer; begin x := 1 + true; end;").unwrap_err();
        assert!(err.message.contains("Arithmetic operators require Integer operands"));
    }

    #[test]
    fn test_relational_requires_integers() {
        let src = "program b: Boolean; begin b := true < false; end;";
        let err = analyze_source(src).unwrap_err();
        assert!(err.message.contains("Relational operators require Integer operands"));
    }

    #[test]
    fn test_equality_rejects_mixed_types() {
        let src = "program b: Boolean; begin b := 1 == true; end;";
        let err = analyze_source(src).unwrap_err();
        assert!(err.message.contains("operands of the same type"));
    }

    #[test]
    fn test_equality_rejects_strings() {
        let src = "program b: Boolean; begin b := \"a\" == \"a\"; end;";
        let err = analyze_source(src).unwrap_err();
        assert!(err.message.contains("only Integer and Boolean"));
    }

    #[test]
    fn test_logical_requires_booleans() {
        let src = "program b: Boolean; begin b := 1 and 2; end;";
        let err = analyze_source(src).unwrap_err();
        assert!(err.message.contains("Logical operators require Boolean operands"));
    }

    #[test]
    fn test_if_condition_must_be_boolean() {
        let err = analyze_source("program begin if 1 then print_line; end if; end;").unwrap_err();
        assert!(err.message.contains("must be of type Boolean"));
    }

    #[test]
    fn test_missing_return_in_non_void_function() {
        let src = "program f(): Integer is begin print 1; end; begin end;";
        let err = analyze_source(src).unwrap_err();
        assert!(err.message.contains("must contain a return statement"));
    }

    #[test]
    fn test_return_in_both_if_branches_satisfies_check() {
        let src = "program \
                   f(n: Integer): Integer is begin \
                   if n > 0 then return 1; else return 0; end if; \
                   end; \
                   begin end;";
        assert!(analyze_source(src).is_ok());
    }

    #[test]
    fn test_return_in_only_then_branch_is_permissively_accepted() {
        // The coverage rule does not fail on a one-armed if: the scan just
        // continues, and a later return still satisfies the check.
        let src = "program \
                   f(n: Integer): Integer is begin \
                   if n > 0 then return 1; end if; \
                   return 0; \
                   end; \
                   begin end;";
        assert!(analyze_source(src).is_ok());
    }

    #[test]
    fn test_return_inside_while_does_not_satisfy_check() {
        let src = "program \
                   f(): Integer is begin \
                   while true do return 1; end while; \
                   end; \
                   begin end;";
        let err = analyze_source(src).unwrap_err();
        assert!(err.message.contains("must contain a return statement"));
    }

    #[test]
    fn test_return_at_top_level_is_semantic_error() {
        let err = analyze_source("program begin return 1; end;").unwrap_err();
        assert_eq!(err.kind, ErrorKind::SemanticError);
        assert!(err.message.contains("outside of a function"));
    }

    #[test]
    fn test_argument_count_mismatch() {
        let src = "program f(n: Integer): Integer is begin return n; end; \
                   begin f(1, 2); end;";
        let err = analyze_source(src).unwrap_err();
        assert!(err.message.contains("Argument count mismatch"));
    }

    #[test]
    fn test_argument_type_mismatch() {
        let src = "program f(n: Integer): Integer is begin return n; end; \
                   begin f(true); end;";
        let err = analyze_source(src).unwrap_err();
        assert!(err.message.contains("argument 1"));
    }

    #[test]
    fn test_undefined_function_gets_suggestion() {
        let src = "program square(n: Integer): Integer is begin return n * n; end; \
                   begin squar(2); end;";
        let err = analyze_source(src).unwrap_err();
        assert!(err.message.contains("Undefined function"));
        assert_eq!(err.suggestion.as_deref(), Some("square"));
    }

    #[test]
    fn test_globals_not_visible_inside_functions() {
        let src = "program \
                   g: Integer; \
                   f(): Integer is begin return g; end; \
                   begin end;";
        let err = analyze_source(src).unwrap_err();
        assert!(err.message.contains("Undefined variable: g"));
    }

    #[test]
    fn test_duplicate_parameter_and_local_names() {
        let src = "program f(a: Integer, a: Integer): void is begin end; begin end;";
        let err = analyze_source(src).unwrap_err();
        assert!(err.message.contains("Duplicate parameter name"));

        let src = "program f(a: Integer): void is a: Boolean; begin end; begin end;";
        let err = analyze_source(src).unwrap_err();
        assert!(err.message.contains("Duplicate local variable name"));
    }

    #[test]
    fn test_function_name_conflicts_with_other_functions_param() {
        let src = "program \
                   f(g: Integer): void is begin end; \
                   g(): void is begin end; \
                   begin end;";
        let err = analyze_source(src).unwrap_err();
        assert!(err.message.contains("conflicts with parameter"));
    }

    #[test]
    fn test_print_void_call_is_rejected() {
        let src = "program f(): void is begin end; begin print f(); end;";
        let err = analyze_source(src).unwrap_err();
        assert!(err.message.contains("cannot print expression of type void"));
    }

    #[test]
    fn test_void_return_with_value_is_rejected() {
        let src = "program f(): void is begin return 1; end; begin end;";
        let err = analyze_source(src).unwrap_err();
        assert!(err.message.contains("Return type mismatch"));
    }
}
