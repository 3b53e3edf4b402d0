//! Expression grammar.

use std::rc::Rc;

use kelp_ir::{Expr, ExprKind, FuncDef, MatchArm, Name, Span};
use kelp_lexer::TokenKind;
use kelp_stack::ensure_sufficient_stack;

use crate::{ParseError, Parser};

/// Special forms, recognised in head position only.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Form {
    Do,
    Bind,
    Match,
    If,
    While,
    And,
    Or,
    Ref,
    Peek,
    Poke,
    Begin,
    End,
    Inc,
    Succ,
    Func,
}

impl Form {
    fn from_symbol(s: &str) -> Option<Form> {
        Some(match s {
            "do" => Form::Do,
            "bind" => Form::Bind,
            "match" => Form::Match,
            "if" => Form::If,
            "while" => Form::While,
            "and" => Form::And,
            "or" => Form::Or,
            "ref" => Form::Ref,
            "peek" => Form::Peek,
            "poke" => Form::Poke,
            "begin" => Form::Begin,
            "end" => Form::End,
            "inc" => Form::Inc,
            "succ" => Form::Succ,
            "func" => Form::Func,
            _ => return None,
        })
    }

    fn keyword(self) -> &'static str {
        match self {
            Form::Do => "do",
            Form::Bind => "bind",
            Form::Match => "match",
            Form::If => "if",
            Form::While => "while",
            Form::And => "and",
            Form::Or => "or",
            Form::Ref => "ref",
            Form::Peek => "peek",
            Form::Poke => "poke",
            Form::Begin => "begin",
            Form::End => "end",
            Form::Inc => "inc",
            Form::Succ => "succ",
            Form::Func => "func",
        }
    }
}

impl Parser<'_> {
    /// Parse one expression.
    pub fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        ensure_sufficient_stack(|| self.parse_expr_inner())
    }

    fn parse_expr_inner(&mut self) -> Result<Expr, ParseError> {
        let token = self.cursor.next("an expression")?;
        let span = token.span;
        let kind = match &token.kind {
            TokenKind::Int(n) => ExprKind::Int(*n),
            TokenKind::Real(r) => ExprKind::Real(*r),
            TokenKind::Char(c) => ExprKind::Char(*c),
            TokenKind::Str(s) => ExprKind::Str(s.clone()),
            TokenKind::Symbol(s) => match s.as_str() {
                "true" => ExprKind::Bool(true),
                "false" => ExprKind::Bool(false),
                _ => ExprKind::Symbol(self.interner.intern(s)),
            },
            TokenKind::LBracket => {
                let (items, end) = self.parse_sequence(&TokenKind::RBracket, "`]`")?;
                return Ok(Expr::new(ExprKind::Array(items), span.merge(end)));
            }
            TokenKind::LBrace => {
                let (items, end) = self.parse_sequence(&TokenKind::RBrace, "`}`")?;
                return Ok(Expr::new(ExprKind::Tuple(items), span.merge(end)));
            }
            TokenKind::LParen => return self.parse_list(span),
            TokenKind::RParen | TokenKind::RBracket | TokenKind::RBrace => {
                return Err(ParseError::Unexpected {
                    found: token.kind.describe(),
                    expected: "an expression",
                    span,
                })
            }
        };
        Ok(Expr::new(kind, span))
    }

    /// Parse expressions up to and including `close`.
    fn parse_sequence(
        &mut self,
        close: &TokenKind,
        expected: &'static str,
    ) -> Result<(Vec<Expr>, Span), ParseError> {
        let mut items = Vec::new();
        loop {
            if let Some(end) = self.cursor.eat(close) {
                return Ok((items, end));
            }
            if self.cursor.is_at_end() {
                return Err(ParseError::UnexpectedEof { expected });
            }
            items.push(self.parse_expr()?);
        }
    }

    /// Parse the rest of a list after its `(`.
    fn parse_list(&mut self, open: Span) -> Result<Expr, ParseError> {
        if let Some(close) = self.cursor.eat(&TokenKind::RParen) {
            return Ok(Expr::new(ExprKind::Unit, open.merge(close)));
        }

        if let Some(TokenKind::Symbol(head)) = self.cursor.peek_kind() {
            if let Some(form) = Form::from_symbol(head) {
                self.cursor.next("a special form")?;
                return self.parse_form(form, open);
            }
        }

        let callee = self.parse_expr()?;
        let (args, close) = self.parse_sequence(&TokenKind::RParen, "`)`")?;
        Ok(Expr::new(
            ExprKind::Call {
                callee: Box::new(callee),
                args,
            },
            open.merge(close),
        ))
    }

    fn parse_form(&mut self, form: Form, open: Span) -> Result<Expr, ParseError> {
        let kind = match form {
            Form::Do => {
                let (items, close) = self.parse_sequence(&TokenKind::RParen, "`)`")?;
                return Ok(Expr::new(ExprKind::Do(items), open.merge(close)));
            }
            Form::And | Form::Or => {
                let (items, close) = self.parse_sequence(&TokenKind::RParen, "`)`")?;
                let kind = if form == Form::And {
                    ExprKind::And(items)
                } else {
                    ExprKind::Or(items)
                };
                return Ok(Expr::new(kind, open.merge(close)));
            }
            Form::Bind => {
                let pattern = self.parse_pattern()?;
                let value = self.parse_expr()?;
                ExprKind::Bind {
                    pattern,
                    value: Box::new(value),
                }
            }
            Form::Match => return self.parse_match(open),
            Form::If => {
                let (mut items, close) = self.parse_sequence(&TokenKind::RParen, "`)`")?;
                let span = open.merge(close);
                if !(2..=3).contains(&items.len()) {
                    return Err(bad_form(form, "expected a condition, a then branch and an optional else branch", span));
                }
                let else_branch = if items.len() == 3 {
                    items.pop().map(Box::new)
                } else {
                    None
                };
                let then_branch = items.pop().map(Box::new);
                let cond = items.pop().map(Box::new);
                let (Some(cond), Some(then_branch)) = (cond, then_branch) else {
                    return Err(bad_form(form, "missing branches", span));
                };
                return Ok(Expr::new(
                    ExprKind::If {
                        cond,
                        then_branch,
                        else_branch,
                    },
                    span,
                ));
            }
            Form::While => {
                let cond = self.parse_expr()?;
                let (body, close) = self.parse_body(form, open)?;
                return Ok(Expr::new(
                    ExprKind::While {
                        cond: Box::new(cond),
                        body: Box::new(body),
                    },
                    open.merge(close),
                ));
            }
            Form::Ref => ExprKind::Ref(self.parse_symbol_operand(form)?),
            Form::Begin => ExprKind::Begin(self.parse_symbol_operand(form)?),
            Form::End => ExprKind::End(self.parse_symbol_operand(form)?),
            Form::Peek => ExprKind::Peek(Box::new(self.parse_expr()?)),
            Form::Inc => ExprKind::Inc(Box::new(self.parse_expr()?)),
            Form::Succ => ExprKind::Succ(Box::new(self.parse_expr()?)),
            Form::Poke => {
                let target = self.parse_expr()?;
                let value = self.parse_expr()?;
                ExprKind::Poke {
                    target: Box::new(target),
                    value: Box::new(value),
                }
            }
            Form::Func => return self.parse_func(open),
        };
        let close = self.close_form(form)?;
        Ok(Expr::new(kind, open.merge(close)))
    }

    /// Consume the `)` ending a fixed-arity form.
    fn close_form(&mut self, form: Form) -> Result<Span, ParseError> {
        match self.cursor.next("`)`")? {
            token if token.kind == TokenKind::RParen => Ok(token.span),
            token => Err(bad_form(
                form,
                format!("unexpected {}", token.kind.describe()),
                token.span,
            )),
        }
    }

    fn parse_symbol_operand(&mut self, form: Form) -> Result<Name, ParseError> {
        let token = self.cursor.next("a symbol")?;
        match &token.kind {
            TokenKind::Symbol(s) if s != "true" && s != "false" => Ok(self.interner.intern(s)),
            other => Err(bad_form(
                form,
                format!("operand must be a bare symbol, found {}", other.describe()),
                token.span,
            )),
        }
    }

    /// One or more expressions up to `)`; several become an implicit `do`.
    fn parse_body(&mut self, form: Form, open: Span) -> Result<(Expr, Span), ParseError> {
        let (mut items, close) = self.parse_sequence(&TokenKind::RParen, "`)`")?;
        let body = match items.len() {
            0 => return Err(bad_form(form, "missing body", open.merge(close))),
            1 => items.pop(),
            _ => {
                let span = items
                    .iter()
                    .map(|e| e.span)
                    .reduce(Span::merge)
                    .unwrap_or(close);
                Some(Expr::new(ExprKind::Do(items), span))
            }
        };
        match body {
            Some(body) => Ok((body, close)),
            None => Err(bad_form(form, "missing body", open.merge(close))),
        }
    }

    fn parse_match(&mut self, open: Span) -> Result<Expr, ParseError> {
        let subject = self.parse_expr()?;
        let mut arms = Vec::new();
        let close = loop {
            if let Some(close) = self.cursor.eat(&TokenKind::RParen) {
                break close;
            }
            let arm_open = self.cursor.expect(&TokenKind::LParen, "a `(pattern body)` case")?;
            let pattern = self.parse_pattern()?;
            let (body, arm_close) = self.parse_body(Form::Match, arm_open)?;
            arms.push(MatchArm {
                pattern,
                body,
                span: arm_open.merge(arm_close),
            });
        };
        let span = open.merge(close);
        if arms.is_empty() {
            return Err(bad_form(Form::Match, "expected at least one case", span));
        }
        Ok(Expr::new(
            ExprKind::Match {
                subject: Box::new(subject),
                arms,
            },
            span,
        ))
    }

    fn parse_func(&mut self, open: Span) -> Result<Expr, ParseError> {
        self.cursor.expect(&TokenKind::LParen, "a parameter list")?;
        let mut params = Vec::new();
        while self.cursor.eat(&TokenKind::RParen).is_none() {
            params.push(self.parse_pattern()?);
        }
        let (body, close) = self.parse_body(Form::Func, open)?;
        let span = open.merge(close);
        Ok(Expr::new(
            ExprKind::Func(Rc::new(FuncDef { params, body, span })),
            span,
        ))
    }
}

fn bad_form(form: Form, message: impl Into<String>, span: Span) -> ParseError {
    ParseError::BadForm {
        form: form.keyword(),
        message: message.into(),
        span,
    }
}
