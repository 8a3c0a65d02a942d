// File: src/parser.rs
//
// Recursive descent parser for the Slate programming language.
// Transforms a sequence of tokens into an Abstract Syntax Tree (AST).
//
// The parser implements a traditional recursive descent strategy over an
// immutable token buffer with a cursor, using one to two tokens of
// lookahead and cascaded precedence levels for expressions. It supports:
// - Top-level variable and function declarations
// - Statements: assignment, if/else, while, print, print_line, return, call
// - Expression parsing with proper operator precedence
//
// Grammar:
//   program    := 'program' decl* 'begin' stmt* 'end' ';'
//   decl       := varDecl | funcDecl
//   varDecl    := label ':' type ';'?
//   funcDecl   := label '(' params ')' ':' type 'is' varDecl* 'begin' stmt* 'end' ';'
//   stmt       := ifStmt | whileStmt | printStmt | printLineStmt | returnStmt
//               | assignStmt | callStmt
//   expr       := orExpr
//   orExpr     := andExpr ('or' andExpr)*
//   andExpr    := eqExpr ('and' eqExpr)*
//   eqExpr     := relExpr (('==' | '!=') relExpr)*
//   relExpr    := addExpr (('<' | '>' | '<=' | '>=') addExpr)*
//   addExpr    := mulExpr (('+' | '-') mulExpr)*
//   mulExpr    := unary (('*' | '/' | '%') unary)*
//   unary      := ('-' | 'not') unary | primary
//   primary    := literal | label ('(' args ')')? | '(' expr ')'

use crate::ast::{Declaration, Expr, FunctionDecl, Program, Stmt, Type, VariableDecl};
use crate::errors::SlateError;
use crate::lexer::{Token, TokenKind};

/// Parser maintains a position in the token stream and provides methods to
/// parse declarations, statements, and expressions
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    /// Creates a new parser from a vector of tokens.
    /// The lexer guarantees the vector ends with an Eof token.
    pub fn new(tokens: Vec<Token>) -> Self {
        Parser { tokens, pos: 0 }
    }

    /// Peek at the current token without consuming it
    fn peek(&self) -> &Token {
        self.tokens
            .get(self.pos)
            .unwrap_or_else(|| self.tokens.last().expect("token stream ends with Eof"))
    }

    /// Peek at the token directly after the current one
    fn peek_ahead(&self) -> &Token {
        self.tokens
            .get(self.pos + 1)
            .unwrap_or_else(|| self.tokens.last().expect("token stream ends with Eof"))
    }

    /// Consume and return the current token, then advance to the next
    fn advance(&mut self) -> Token {
        let tok = self.peek().clone();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        tok
    }

    /// Compares the next token's text to an expected value and consumes it,
    /// failing with a parse error if they don't match.
    fn expect(&mut self, expected: &str) -> Result<Token, SlateError> {
        let tok = self.peek().clone();
        if tok.kind == TokenKind::Eof {
            return Err(SlateError::parse_error(
                "Unexpectedly reached the end of file.".to_string(),
                tok.location(),
            ));
        }
        if tok.text != expected {
            return Err(SlateError::parse_error(
                format!("Expected '{}', got '{}'.", expected, tok.text),
                tok.location(),
            ));
        }
        self.advance();
        Ok(tok)
    }

    /// Returns true if the current token's text matches the expected string
    fn peek_is(&self, expected: &str) -> bool {
        let tok = self.peek();
        tok.kind != TokenKind::Eof && tok.text == expected
    }

    /// Parse the entire token stream into a program AST
    ///
    /// program := 'program' decl* 'begin' stmt* 'end' ';'
    pub fn parse(&mut self) -> Result<Program, SlateError> {
        self.expect("program")?;

        let declarations = self.parse_decls()?;

        self.expect("begin")?;
        let body = self.parse_stmts()?;
        self.expect("end")?;
        self.expect(";")?;

        Ok(Program { declarations, body })
    }

    /// decl* — declarations run until the 'begin' of the program body
    fn parse_decls(&mut self) -> Result<Vec<Declaration>, SlateError> {
        let mut decls = Vec::new();
        while !self.peek_is("begin") {
            if self.peek().kind == TokenKind::Eof {
                return Err(SlateError::parse_error(
                    "Unexpectedly reached the end of file.".to_string(),
                    self.peek().location(),
                ));
            }
            decls.push(self.parse_decl()?);
        }
        Ok(decls)
    }

    /// decl := varDecl | funcDecl
    ///
    /// The token after the label disambiguates: ':' starts a variable
    /// declaration, '(' starts a function declaration.
    fn parse_decl(&mut self) -> Result<Declaration, SlateError> {
        if self.peek_ahead().text == ":" {
            Ok(Declaration::Variable(self.parse_var_decl()?))
        } else if self.peek_ahead().text == "(" {
            Ok(Declaration::Function(self.parse_func_decl()?))
        } else {
            let tok = self.peek();
            Err(SlateError::parse_error(
                "Declaration expected".to_string(),
                tok.location(),
            ))
        }
    }

    /// varDecl := label ':' type ';'?
    ///
    /// The trailing ';' is consumed when present; parameter lists omit it.
    fn parse_var_decl(&mut self) -> Result<VariableDecl, SlateError> {
        let name_tok = self.expect_label()?;
        self.expect(":")?;
        let ty = self.parse_type()?;
        if self.peek_is(";") {
            self.expect(";")?;
        }

        Ok(VariableDecl {
            name: name_tok.text,
            ty,
            line: name_tok.line,
            column: name_tok.column,
        })
    }

    /// funcDecl := label '(' params ')' ':' type 'is' varDecl* 'begin' stmt* 'end' ';'
    fn parse_func_decl(&mut self) -> Result<FunctionDecl, SlateError> {
        let name_tok = self.expect_label()?;
        self.expect("(")?;
        let params = self.parse_params()?;
        self.expect(")")?;

        self.expect(":")?;
        let return_type = self.parse_type()?;
        self.expect("is")?;

        let mut locals = Vec::new();
        while !self.peek_is("begin") {
            if self.peek().kind == TokenKind::Eof {
                return Err(SlateError::parse_error(
                    "Unexpectedly reached the end of file.".to_string(),
                    self.peek().location(),
                ));
            }
            locals.push(self.parse_var_decl()?);
        }
        self.expect("begin")?;

        let body = self.parse_stmts()?;
        self.expect("end")?;
        self.expect(";")?;

        Ok(FunctionDecl {
            name: name_tok.text,
            return_type,
            params,
            locals,
            body,
            line: name_tok.line,
            column: name_tok.column,
        })
    }

    /// params := (varDecl (',' varDecl)*)?
    fn parse_params(&mut self) -> Result<Vec<VariableDecl>, SlateError> {
        let mut params = Vec::new();
        while !self.peek_is(")") {
            params.push(self.parse_var_decl()?);
            if !self.peek_is(")") {
                self.expect(",")?;
            }
        }
        Ok(params)
    }

    /// type := 'Integer' | 'Boolean' | 'String' | 'void'
    fn parse_type(&mut self) -> Result<Type, SlateError> {
        let tok = self.advance();
        match tok.text.as_str() {
            "Integer" => Ok(Type::Integer),
            "Boolean" => Ok(Type::Boolean),
            "String" => Ok(Type::String),
            "void" => Ok(Type::Void),
            other => Err(SlateError::parse_error(
                format!("Unknown type: {}", other),
                tok.location(),
            )),
        }
    }

    /// Consume a token that must be a label
    fn expect_label(&mut self) -> Result<Token, SlateError> {
        let tok = self.peek().clone();
        if tok.kind != TokenKind::Label {
            return Err(SlateError::parse_error(
                format!("Expected a label, got '{}'.", tok.text),
                tok.location(),
            ));
        }
        self.advance();
        Ok(tok)
    }

    /// stmt* — statement lists terminate on an 'end' or 'else' lookahead,
    /// which is never consumed as part of the list
    fn parse_stmts(&mut self) -> Result<Vec<Stmt>, SlateError> {
        let mut stmts = Vec::new();
        while !self.peek_is("end") && !self.peek_is("else") {
            if self.peek().kind == TokenKind::Eof {
                return Err(SlateError::parse_error(
                    "Unexpectedly reached the end of file.".to_string(),
                    self.peek().location(),
                ));
            }
            stmts.push(self.parse_stmt()?);
        }
        Ok(stmts)
    }

    fn parse_stmt(&mut self) -> Result<Stmt, SlateError> {
        let tok = self.peek().clone();

        if tok.text == "if" {
            self.parse_if_stmt()
        } else if tok.text == "while" {
            self.parse_while_stmt()
        } else if tok.text == "print" {
            self.parse_print_stmt()
        } else if tok.text == "print_line" {
            self.parse_print_line_stmt()
        } else if tok.text == "return" {
            self.parse_return_stmt()
        } else if tok.kind == TokenKind::Label {
            // A label followed by '(' is a call statement, otherwise an
            // assignment.
            if self.peek_ahead().text == "(" {
                self.parse_call_stmt()
            } else {
                self.parse_assign_stmt()
            }
        } else {
            Err(SlateError::parse_error(
                format!("Unexpected token in statement: {}", tok.text),
                tok.location(),
            ))
        }
    }

    /// ifStmt := 'if' expr 'then' stmt* ('else' stmt*)? 'end' 'if' ';'
    fn parse_if_stmt(&mut self) -> Result<Stmt, SlateError> {
        let if_tok = self.advance();
        let condition = self.parse_expression()?;
        self.expect("then")?;

        let then_branch = self.parse_stmts()?;
        let else_branch = if self.peek_is("else") {
            self.advance();
            self.parse_stmts()?
        } else {
            Vec::new()
        };

        self.expect("end")?;
        self.expect("if")?;
        self.expect(";")?;

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
            line: if_tok.line,
            column: if_tok.column,
        })
    }

    /// whileStmt := 'while' expr 'do' stmt* 'end' 'while' ';'
    fn parse_while_stmt(&mut self) -> Result<Stmt, SlateError> {
        let while_tok = self.advance();
        let condition = self.parse_expression()?;
        self.expect("do")?;

        let body = self.parse_stmts()?;
        self.expect("end")?;
        self.expect("while")?;
        self.expect(";")?;

        Ok(Stmt::While {
            condition,
            body,
            line: while_tok.line,
            column: while_tok.column,
        })
    }

    /// printStmt := 'print' expr ';'
    fn parse_print_stmt(&mut self) -> Result<Stmt, SlateError> {
        let print_tok = self.advance();
        let expr = self.parse_expression()?;
        self.expect(";")?;

        Ok(Stmt::Print {
            expr,
            line: print_tok.line,
            column: print_tok.column,
        })
    }

    /// printLineStmt := 'print_line' ';'
    fn parse_print_line_stmt(&mut self) -> Result<Stmt, SlateError> {
        let tok = self.advance();
        self.expect(";")?;

        Ok(Stmt::PrintLine {
            line: tok.line,
            column: tok.column,
        })
    }

    /// returnStmt := 'return' expr? ';'
    fn parse_return_stmt(&mut self) -> Result<Stmt, SlateError> {
        let return_tok = self.advance();
        let value = if !self.peek_is(";") {
            Some(self.parse_expression()?)
        } else {
            None
        };
        self.expect(";")?;

        Ok(Stmt::Return {
            value,
            line: return_tok.line,
            column: return_tok.column,
        })
    }

    /// assignStmt := label ':=' expr ';'
    fn parse_assign_stmt(&mut self) -> Result<Stmt, SlateError> {
        let name_tok = self.expect_label()?;
        self.expect(":=")?;
        let value = self.parse_expression()?;
        self.expect(";")?;

        Ok(Stmt::Assign {
            name: name_tok.text,
            value,
            line: name_tok.line,
            column: name_tok.column,
        })
    }

    /// callStmt := label '(' (expr (',' expr)*)? ')' ';'
    fn parse_call_stmt(&mut self) -> Result<Stmt, SlateError> {
        let name_tok = self.expect_label()?;
        self.expect("(")?;
        let args = self.parse_args()?;
        self.expect(")")?;
        self.expect(";")?;

        Ok(Stmt::Call {
            name: name_tok.text,
            args,
            line: name_tok.line,
            column: name_tok.column,
        })
    }

    fn parse_args(&mut self) -> Result<Vec<Expr>, SlateError> {
        let mut args = Vec::new();
        while !self.peek_is(")") {
            if self.peek().kind == TokenKind::Eof {
                return Err(SlateError::parse_error(
                    "Unexpectedly reached the end of file.".to_string(),
                    self.peek().location(),
                ));
            }
            args.push(self.parse_expression()?);
            if !self.peek_is(")") {
                self.expect(",")?;
            }
        }
        Ok(args)
    }

    /// expr := orExpr — entry point for expression parsing.
    ///
    /// Binary operators are parsed with cascaded precedence levels,
    /// loosest-binding first: or, and, equality, relational, additive,
    /// multiplicative, unary.
    fn parse_expression(&mut self) -> Result<Expr, SlateError> {
        self.parse_or()
    }

    /// orExpr := andExpr ('or' andExpr)*
    fn parse_or(&mut self) -> Result<Expr, SlateError> {
        let mut left = self.parse_and()?;
        while self.peek_is_op("or") {
            let op_tok = self.advance();
            let right = self.parse_and()?;
            left = Expr::Binary {
                left: Box::new(left),
                op: op_tok.text,
                right: Box::new(right),
                line: op_tok.line,
                column: op_tok.column,
            };
        }
        Ok(left)
    }

    /// andExpr := eqExpr ('and' eqExpr)*
    fn parse_and(&mut self) -> Result<Expr, SlateError> {
        let mut left = self.parse_equality()?;
        while self.peek_is_op("and") {
            let op_tok = self.advance();
            let right = self.parse_equality()?;
            left = Expr::Binary {
                left: Box::new(left),
                op: op_tok.text,
                right: Box::new(right),
                line: op_tok.line,
                column: op_tok.column,
            };
        }
        Ok(left)
    }

    /// eqExpr := relExpr (('==' | '!=') relExpr)*
    fn parse_equality(&mut self) -> Result<Expr, SlateError> {
        let mut left = self.parse_relational()?;
        while self.peek_is_op("==") || self.peek_is_op("!=") {
            let op_tok = self.advance();
            let right = self.parse_relational()?;
            left = Expr::Binary {
                left: Box::new(left),
                op: op_tok.text,
                right: Box::new(right),
                line: op_tok.line,
                column: op_tok.column,
            };
        }
        Ok(left)
    }

    /// relExpr := addExpr (('<' | '>' | '<=' | '>=') addExpr)*
    fn parse_relational(&mut self) -> Result<Expr, SlateError> {
        let mut left = self.parse_additive()?;
        while self.peek_is_op("<")
            || self.peek_is_op(">")
            || self.peek_is_op("<=")
            || self.peek_is_op(">=")
        {
            let op_tok = self.advance();
            let right = self.parse_additive()?;
            left = Expr::Binary {
                left: Box::new(left),
                op: op_tok.text,
                right: Box::new(right),
                line: op_tok.line,
                column: op_tok.column,
            };
        }
        Ok(left)
    }

    /// addExpr := mulExpr (('+' | '-') mulExpr)*
    fn parse_additive(&mut self) -> Result<Expr, SlateError> {
        let mut left = self.parse_multiplicative()?;
        while self.peek_is_op("+") || self.peek_is_op("-") {
            let op_tok = self.advance();
            let right = self.parse_multiplicative()?;
            left = Expr::Binary {
                left: Box::new(left),
                op: op_tok.text,
                right: Box::new(right),
                line: op_tok.line,
                column: op_tok.column,
            };
        }
        Ok(left)
    }

    /// mulExpr := unary (('*' | '/' | '%') unary)*
    fn parse_multiplicative(&mut self) -> Result<Expr, SlateError> {
        let mut left = self.parse_unary()?;
        while self.peek_is_op("*") || self.peek_is_op("/") || self.peek_is_op("%") {
            let op_tok = self.advance();
            let right = self.parse_unary()?;
            left = Expr::Binary {
                left: Box::new(left),
                op: op_tok.text,
                right: Box::new(right),
                line: op_tok.line,
                column: op_tok.column,
            };
        }
        Ok(left)
    }

    /// unary := ('-' | 'not') unary | primary
    fn parse_unary(&mut self) -> Result<Expr, SlateError> {
        let tok = self.peek().clone();
        if (tok.text == "-" && tok.kind == TokenKind::Operator)
            || (tok.text == "not" && tok.kind == TokenKind::Keyword)
        {
            self.advance();
            let operand = self.parse_unary()?;
            return Ok(Expr::Unary {
                op: tok.text,
                operand: Box::new(operand),
                line: tok.line,
                column: tok.column,
            });
        }
        self.parse_primary()
    }

    /// Returns true if the current token is the given operator. The logical
    /// operators 'and', 'or', and 'not' lex as keywords.
    fn peek_is_op(&self, op: &str) -> bool {
        let tok = self.peek();
        match tok.kind {
            TokenKind::Operator | TokenKind::Keyword => tok.text == op,
            _ => false,
        }
    }

    /// primary := literal | label ('(' args ')')? | '(' expr ')'
    fn parse_primary(&mut self) -> Result<Expr, SlateError> {
        let tok = self.peek().clone();
        if tok.kind == TokenKind::Eof {
            return Err(SlateError::parse_error(
                "Unexpectedly reached the end of file.".to_string(),
                tok.location(),
            ));
        }
        self.advance();

        match tok.kind {
            TokenKind::IntLiteral => Ok(Expr::Literal {
                value: tok.text,
                ty: Type::Integer,
                line: tok.line,
                column: tok.column,
            }),
            TokenKind::BoolLiteral => Ok(Expr::Literal {
                value: tok.text,
                ty: Type::Boolean,
                line: tok.line,
                column: tok.column,
            }),
            TokenKind::StringLiteral => Ok(Expr::Literal {
                value: tok.text,
                ty: Type::String,
                line: tok.line,
                column: tok.column,
            }),
            TokenKind::Label => {
                if self.peek_is("(") {
                    self.advance();
                    let args = self.parse_args()?;
                    self.expect(")")?;
                    Ok(Expr::Call {
                        name: tok.text,
                        args,
                        line: tok.line,
                        column: tok.column,
                    })
                } else {
                    Ok(Expr::Variable {
                        name: tok.text,
                        line: tok.line,
                        column: tok.column,
                    })
                }
            }
            TokenKind::Punctuation if tok.text == "(" => {
                let grouped = self.parse_expression()?;
                self.expect(")")?;
                Ok(grouped)
            }
            _ => Err(SlateError::parse_error(
                format!("Unexpected token in expression: {}", tok.text),
                tok.location(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ErrorKind;
    use crate::lexer::tokenize;

    fn parse_source(src: &str) -> Result<Program, SlateError> {
        let tokens = tokenize(src).expect("lexing should succeed");
        Parser::new(tokens).parse()
    }

    #[test]
    fn test_parse_empty_program() {
        let prog = parse_source("program begin end;").unwrap();
        assert!(prog.declarations.is_empty());
        assert!(prog.body.is_empty());
    }

    #[test]
    fn test_parse_variable_declaration() {
        let prog = parse_source("program x: Integer; begin end;").unwrap();
        assert_eq!(prog.declarations.len(), 1);
        match &prog.declarations[0] {
            Declaration::Variable(v) => {
                assert_eq!(v.name, "x");
                assert_eq!(v.ty, Type::Integer);
            }
            other => panic!("expected variable declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_function_declaration() {
        let src = "program \
                   square(n: Integer): Integer is \
                   begin return (n * n); end; \
                   begin end;";
        let prog = parse_source(src).unwrap();
        match &prog.declarations[0] {
            Declaration::Function(f) => {
                assert_eq!(f.name, "square");
                assert_eq!(f.return_type, Type::Integer);
                assert_eq!(f.params.len(), 1);
                assert_eq!(f.params[0].name, "n");
                assert!(f.locals.is_empty());
                assert_eq!(f.body.len(), 1);
            }
            other => panic!("expected function declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_function_with_locals_and_multiple_params() {
        let src = "program \
                   add(a: Integer, b: Integer): Integer is \
                   sum: Integer; \
                   begin sum := (a + b); return sum; end; \
                   begin end;";
        let prog = parse_source(src).unwrap();
        match &prog.declarations[0] {
            Declaration::Function(f) => {
                assert_eq!(f.params.len(), 2);
                assert_eq!(f.locals.len(), 1);
                assert_eq!(f.locals[0].name, "sum");
            }
            other => panic!("expected function declaration, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_if_with_else() {
        let src = "program begin \
                   if true then print 1; else print 2; end if; \
                   end;";
        let prog = parse_source(src).unwrap();
        match &prog.body[0] {
            Stmt::If {
                then_branch,
                else_branch,
                ..
            } => {
                assert_eq!(then_branch.len(), 1);
                assert_eq!(else_branch.len(), 1);
            }
            other => panic!("expected if statement, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_if_without_else_has_empty_branch() {
        let src = "program begin if true then print 1; end if; end;";
        let prog = parse_source(src).unwrap();
        match &prog.body[0] {
            Stmt::If { else_branch, .. } => assert!(else_branch.is_empty()),
            other => panic!("expected if statement, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_while() {
        let src = "program begin while (1 < 2) do print_line; end while; end;";
        let prog = parse_source(src).unwrap();
        assert!(matches!(prog.body[0], Stmt::While { .. }));
    }

    #[test]
    fn test_label_followed_by_paren_is_call_statement() {
        let src = "program begin greet(\"hi\", 3); end;";
        let prog = parse_source(src).unwrap();
        match &prog.body[0] {
            Stmt::Call { name, args, .. } => {
                assert_eq!(name, "greet");
                assert_eq!(args.len(), 2);
            }
            other => panic!("expected call statement, got {:?}", other),
        }
    }

    #[test]
    fn test_multiplication_binds_tighter_than_addition() {
        let src = "program begin x := 1 + 2 * 3; end;";
        let prog = parse_source(src).unwrap();
        match &prog.body[0] {
            Stmt::Assign { value, .. } => match value {
                Expr::Binary { op, right, .. } => {
                    assert_eq!(op, "+");
                    assert!(matches!(**right, Expr::Binary { .. }));
                }
                other => panic!("expected binary expression, got {:?}", other),
            },
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_parentheses_override_precedence() {
        let src = "program begin x := (1 + 2) * 3; end;";
        let prog = parse_source(src).unwrap();
        match &prog.body[0] {
            Stmt::Assign { value, .. } => match value {
                Expr::Binary { op, left, .. } => {
                    assert_eq!(op, "*");
                    assert!(matches!(**left, Expr::Binary { .. }));
                }
                other => panic!("expected binary expression, got {:?}", other),
            },
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_relational_binds_tighter_than_logical() {
        let src = "program begin b := 1 < 2 and not false; end;";
        let prog = parse_source(src).unwrap();
        match &prog.body[0] {
            Stmt::Assign { value, .. } => match value {
                Expr::Binary { op, left, right, .. } => {
                    assert_eq!(op, "and");
                    assert!(matches!(**left, Expr::Binary { .. }));
                    assert!(matches!(**right, Expr::Unary { .. }));
                }
                other => panic!("expected binary expression, got {:?}", other),
            },
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_unary_minus() {
        let src = "program begin x := -5; end;";
        let prog = parse_source(src).unwrap();
        match &prog.body[0] {
            Stmt::Assign { value, .. } => match value {
                Expr::Unary { op, .. } => assert_eq!(op, "-"),
                other => panic!("expected unary expression, got {:?}", other),
            },
            other => panic!("expected assignment, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_type_is_parse_error() {
        let err = parse_source("program x: Float; begin end;").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ParseError);
        assert!(err.message.contains("Unknown type"));
    }

    #[test]
    fn test_premature_end_of_input() {
        let err = parse_source("program begin print 1;").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ParseError);
        assert!(err.message.contains("end of file"));
    }

    #[test]
    fn test_missing_semicolon_is_parse_error() {
        let err = parse_source("program begin x := 1 end;").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ParseError);
        assert!(err.message.contains("Expected ';'"));
    }

    #[test]
    fn test_declaration_expected_error() {
        let err = parse_source("program 42 begin end;").unwrap_err();
        assert_eq!(err.kind, ErrorKind::ParseError);
        assert!(err.message.contains("Declaration expected"));
    }

    #[test]
    fn test_return_with_and_without_value() {
        let src = "program \
                   f(): Integer is begin return 1; end; \
                   g(): void is begin return; end; \
                   begin end;";
        let prog = parse_source(src).unwrap();
        let bodies: Vec<_> = prog
            .declarations
            .iter()
            .map(|d| match d {
                Declaration::Function(f) => &f.body[0],
                _ => panic!("expected function"),
            })
            .collect();
        assert!(matches!(bodies[0], Stmt::Return { value: Some(_), .. }));
        assert!(matches!(bodies[1], Stmt::Return { value: None, .. }));
    }
}
