use super::lexer::{Token, TokenKind};
use crate::ast::{BinaryOp, Expression, LogicalOp, MethodArgument, UnaryOp, Value};
use crate::catalog::{Associativity, Catalog, DataSourceKind, MethodArgKind, ReturnKind};
use crate::error::CompileError;

/// Property names known for a record, with the name used in error messages.
#[derive(Debug, Clone)]
struct Props {
    owner: String,
    names: Vec<String>,
}

/// The statically known shape of a sub-expression.
#[derive(Debug, Clone)]
enum Shape {
    Unknown,
    Scalar,
    Record(Option<Props>),
    Collection(Option<Props>),
}

impl Shape {
    fn describe(&self) -> &'static str {
        match self {
            Shape::Unknown => "an unknown value",
            Shape::Scalar => "a scalar value",
            Shape::Record(_) => "a record",
            Shape::Collection(_) => "a collection",
        }
    }
}

/// A parsed sub-expression with its static shape and tree height.
#[derive(Debug)]
struct Parsed {
    expr: Expression,
    shape: Shape,
    height: usize,
}

impl Parsed {
    fn leaf(expr: Expression, shape: Shape) -> Self {
        Self {
            expr,
            shape,
            height: 1,
        }
    }
}

/// Precedence-climbing parser driven by the operator table of a [`Catalog`].
///
/// `max_depth` bounds both the recursion of the parser and the height of the
/// produced tree, so every accepted expression fits the evaluator's depth budget.
pub(super) struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    catalog: &'a Catalog,
    /// Lambda parameters in scope, innermost last.
    scope: Vec<(String, Shape)>,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    pub(super) fn new(tokens: Vec<Token>, catalog: &'a Catalog, max_depth: usize) -> Self {
        Self {
            tokens,
            pos: 0,
            catalog,
            scope: Vec::new(),
            depth: 0,
            max_depth,
        }
    }

    /// Parses the whole token stream into a single expression.
    pub(super) fn parse(mut self) -> Result<Expression, CompileError> {
        let parsed = self.parse_ternary()?;
        match self.tokens.get(self.pos) {
            None => Ok(parsed.expr),
            Some(token) => Err(CompileError::UnexpectedToken {
                found: token.kind.to_string(),
                expected: "end of expression".to_string(),
                position: token.position,
            }),
        }
    }

    fn parse_ternary(&mut self) -> Result<Parsed, CompileError> {
        self.descend()?;
        let ternary = *self.catalog.ternary_operator();
        let condition = self.parse_binary(ternary.precedence.saturating_sub(1))?;

        let result = if self.peek_kind() == Some(&TokenKind::Question) {
            let position = self.current_position();
            self.pos += 1;
            let then_branch = self.parse_ternary()?;
            self.expect(&TokenKind::Colon, "':' in conditional expression")?;
            // Right associative: `a ? b : c ? d : e` nests in the else branch.
            let else_branch = match ternary.associativity {
                Associativity::Right => self.parse_ternary()?,
                Associativity::Left => self.parse_binary(ternary.precedence.saturating_sub(1))?,
            };
            let height = condition
                .height
                .max(then_branch.height)
                .max(else_branch.height);
            self.node(
                Expression::Conditional {
                    condition: Box::new(condition.expr),
                    then_branch: Box::new(then_branch.expr),
                    else_branch: Box::new(else_branch.expr),
                },
                Shape::Unknown,
                height + 1,
                position,
            )?
        } else {
            condition
        };
        self.depth -= 1;
        Ok(result)
    }

    /// Parses operators whose precedence is at most `max_precedence`.
    fn parse_binary(&mut self, max_precedence: u8) -> Result<Parsed, CompileError> {
        let mut left = self.parse_unary()?;

        while let Some(TokenKind::Operator(symbol)) = self.peek_kind() {
            let symbol = *symbol;
            let Some(spec) = self.catalog.binary_operator(symbol).copied() else {
                break;
            };
            if spec.precedence > max_precedence {
                break;
            }
            let position = self.current_position();
            self.pos += 1;

            let next_max = match spec.associativity {
                Associativity::Left => spec.precedence.saturating_sub(1),
                Associativity::Right => spec.precedence,
            };
            self.descend()?;
            let right = self.parse_binary(next_max)?;
            self.depth -= 1;
            let height = left.height.max(right.height) + 1;
            let expr = combine(symbol, left.expr, right.expr, position)?;
            left = self.node(expr, Shape::Scalar, height, position)?;
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Parsed, CompileError> {
        if let Some(TokenKind::Operator(symbol)) = self.peek_kind() {
            let symbol = *symbol;
            if let (Some(spec), Some(op)) = (
                self.catalog.unary_operator(symbol).copied(),
                UnaryOp::from_symbol(symbol),
            ) {
                let position = self.current_position();
                self.descend()?;
                self.pos += 1;
                let operand = self.parse_binary(spec.precedence)?;
                self.depth -= 1;
                return self.node(
                    Expression::Unary {
                        op,
                        operand: Box::new(operand.expr),
                    },
                    Shape::Scalar,
                    operand.height + 1,
                    position,
                );
            }
        }
        self.parse_postfix()
    }

    fn parse_postfix(&mut self) -> Result<Parsed, CompileError> {
        let mut parsed = self.parse_primary()?;

        while self.eat(&TokenKind::Dot) {
            let (name, position) = self.expect_ident("property or method name")?;
            parsed = if self.peek_kind() == Some(&TokenKind::LParen) {
                self.parse_method(parsed, name, position)?
            } else {
                let (expr, shape, height) = access_property(parsed, name, position)?;
                self.node(expr, shape, height, position)?
            };
        }

        Ok(parsed)
    }

    fn parse_primary(&mut self) -> Result<Parsed, CompileError> {
        let Some(token) = self.tokens.get(self.pos).cloned() else {
            return Err(CompileError::UnexpectedEnd {
                expected: "a value".to_string(),
            });
        };
        self.pos += 1;

        match token.kind {
            TokenKind::Number(n) => Ok(Parsed::leaf(
                Expression::Literal(Value::Number(n)),
                Shape::Scalar,
            )),
            TokenKind::Str(s) => Ok(Parsed::leaf(
                Expression::Literal(Value::Str(s)),
                Shape::Scalar,
            )),
            TokenKind::True => Ok(Parsed::leaf(
                Expression::Literal(Value::Bool(true)),
                Shape::Scalar,
            )),
            TokenKind::False => Ok(Parsed::leaf(
                Expression::Literal(Value::Bool(false)),
                Shape::Scalar,
            )),
            TokenKind::Null => Ok(Parsed::leaf(Expression::Literal(Value::Null), Shape::Unknown)),
            TokenKind::LParen => {
                let inner = self.parse_ternary()?;
                self.expect(&TokenKind::RParen, "')'")?;
                Ok(inner)
            }
            TokenKind::Ident(name) => self.parse_identifier(name, token.position),
            other => Err(CompileError::UnexpectedToken {
                found: other.to_string(),
                expected: "a value".to_string(),
                position: token.position,
            }),
        }
    }

    fn parse_identifier(&mut self, name: String, position: usize) -> Result<Parsed, CompileError> {
        if let Some((_, shape)) = self.scope.iter().rev().find(|(param, _)| *param == name) {
            let shape = shape.clone();
            return Ok(Parsed::leaf(
                Expression::DataRef {
                    source: name,
                    path: Vec::new(),
                },
                shape,
            ));
        }

        if let Some(source) = self.catalog.data_source(&name) {
            let props = Some(Props {
                owner: source.id.clone(),
                names: source.properties.clone(),
            });
            let shape = match source.kind {
                DataSourceKind::Object => Shape::Record(props),
                DataSourceKind::Collection => Shape::Collection(props),
            };
            return Ok(Parsed::leaf(
                Expression::DataRef {
                    source: name,
                    path: Vec::new(),
                },
                shape,
            ));
        }

        if self.catalog.is_function_namespace(&name) {
            return self.parse_function_call(name, position);
        }

        Err(CompileError::UnknownIdentifier { name, position })
    }

    fn parse_function_call(
        &mut self,
        namespace: String,
        position: usize,
    ) -> Result<Parsed, CompileError> {
        self.expect(&TokenKind::Dot, "'.' after function namespace")?;
        let (member, _) = self.expect_ident("function name")?;
        let id = format!("{}.{}", namespace, member);
        let spec = *self
            .catalog
            .function(&id)
            .ok_or_else(|| CompileError::UnknownFunction {
                name: id.clone(),
                position,
            })?;

        self.expect(&TokenKind::LParen, "'(' after function name")?;
        let (args, args_height) = self.parse_arguments()?;
        if args.len() != spec.arity {
            return Err(CompileError::ArityMismatch {
                name: id,
                expected: spec.arity,
                found: args.len(),
                position,
            });
        }

        self.node(
            Expression::Call { function: id, args },
            shape_of(spec.returns),
            args_height + 1,
            position,
        )
    }

    /// Parses a comma separated argument list; the opening parenthesis is consumed.
    /// Returns the arguments and the height of the tallest one.
    fn parse_arguments(&mut self) -> Result<(Vec<Expression>, usize), CompileError> {
        let mut args = Vec::new();
        let mut height = 0;
        if self.eat(&TokenKind::RParen) {
            return Ok((args, height));
        }
        loop {
            let arg = self.parse_ternary()?;
            height = height.max(arg.height);
            args.push(arg.expr);
            if self.eat(&TokenKind::Comma) {
                continue;
            }
            self.expect(&TokenKind::RParen, "',' or ')'")?;
            return Ok((args, height));
        }
    }

    fn parse_method(
        &mut self,
        receiver: Parsed,
        name: String,
        position: usize,
    ) -> Result<Parsed, CompileError> {
        let spec = *self
            .catalog
            .method(&name)
            .ok_or_else(|| CompileError::UnknownMethod {
                name: name.clone(),
                position,
            })?;

        let element = match receiver.shape {
            Shape::Collection(props) => props,
            Shape::Unknown => None,
            other => {
                return Err(CompileError::InvalidReceiver {
                    method: name,
                    target: other.describe().to_string(),
                    position,
                });
            }
        };

        self.expect(&TokenKind::LParen, "'('")?;
        let (argument, argument_height) = if spec.argument == MethodArgKind::Lambda && self.at_lambda() {
            let (param, _) = self.expect_ident("lambda parameter")?;
            self.expect(&TokenKind::Arrow, "'=>'")?;
            self.scope
                .push((param.clone(), Shape::Record(element.clone())));
            let body = self.parse_ternary();
            self.scope.pop();
            let body = body?;
            self.expect(&TokenKind::RParen, "')' after lambda")?;
            let lambda = MethodArgument::Lambda {
                param,
                body: Box::new(body.expr),
            };
            (lambda, body.height)
        } else {
            if self.at_lambda() {
                return Err(CompileError::UnexpectedToken {
                    found: "lambda".to_string(),
                    expected: format!("no lambda for '{}'", name),
                    position: self.current_position(),
                });
            }
            let (mut args, args_height) = self.parse_arguments()?;
            if args.len() != spec.arity {
                return Err(CompileError::ArityMismatch {
                    name,
                    expected: spec.arity,
                    found: args.len(),
                    position,
                });
            }
            let argument = match (spec.argument, args.pop()) {
                (MethodArgKind::Value, Some(arg)) => MethodArgument::Value(Box::new(arg)),
                (MethodArgKind::Lambda, Some(_)) => {
                    return Err(CompileError::UnexpectedToken {
                        found: "expression".to_string(),
                        expected: format!("a lambda (x => ...) for '{}'", name),
                        position,
                    });
                }
                _ => MethodArgument::None,
            };
            (argument, args_height)
        };

        let shape = match spec.id {
            "groupBy" => Shape::Collection(Some(Props {
                owner: "group".to_string(),
                names: vec!["Key".to_string(), "Items".to_string()],
            })),
            "first" | "last" => Shape::Record(element),
            _ if spec.returns == ReturnKind::Collection => Shape::Collection(element),
            _ => Shape::Scalar,
        };

        let height = receiver.height.max(argument_height) + 1;
        self.node(
            Expression::Method {
                receiver: Box::new(receiver.expr),
                method: name,
                argument,
            },
            shape,
            height,
            position,
        )
    }

    /// Wraps a freshly built node, rejecting trees taller than `max_depth`.
    fn node(
        &self,
        expr: Expression,
        shape: Shape,
        height: usize,
        position: usize,
    ) -> Result<Parsed, CompileError> {
        if height > self.max_depth {
            return Err(CompileError::TooDeep {
                limit: self.max_depth,
                position,
            });
        }
        Ok(Parsed {
            expr,
            shape,
            height,
        })
    }

    // --- Token helpers ---

    fn descend(&mut self) -> Result<(), CompileError> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(CompileError::TooDeep {
                limit: self.max_depth,
                position: self.current_position(),
            });
        }
        Ok(())
    }

    fn peek_kind(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn at_lambda(&self) -> bool {
        matches!(
            (
                self.tokens.get(self.pos).map(|t| &t.kind),
                self.tokens.get(self.pos + 1).map(|t| &t.kind)
            ),
            (Some(TokenKind::Ident(_)), Some(TokenKind::Arrow))
        )
    }

    fn current_position(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map_or(0, |t| t.position)
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek_kind() == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: &TokenKind, expected: &str) -> Result<(), CompileError> {
        if self.eat(kind) {
            return Ok(());
        }
        Err(self.unexpected(expected))
    }

    fn expect_ident(&mut self, expected: &str) -> Result<(String, usize), CompileError> {
        match self.tokens.get(self.pos) {
            Some(Token {
                kind: TokenKind::Ident(name),
                position,
            }) => {
                let result = (name.clone(), *position);
                self.pos += 1;
                Ok(result)
            }
            _ => Err(self.unexpected(expected)),
        }
    }

    fn unexpected(&self, expected: &str) -> CompileError {
        match self.tokens.get(self.pos) {
            Some(token) => CompileError::UnexpectedToken {
                found: token.kind.to_string(),
                expected: expected.to_string(),
                position: token.position,
            },
            None => CompileError::UnexpectedEnd {
                expected: expected.to_string(),
            },
        }
    }
}

fn combine(
    symbol: &str,
    left: Expression,
    right: Expression,
    position: usize,
) -> Result<Expression, CompileError> {
    if let Some(op) = LogicalOp::from_symbol(symbol) {
        return Ok(Expression::Logical {
            op,
            left: Box::new(left),
            right: Box::new(right),
        });
    }
    let op = BinaryOp::from_symbol(symbol).ok_or_else(|| CompileError::UnknownFunction {
        name: symbol.to_string(),
        position,
    })?;
    Ok(Expression::Binary {
        op,
        left: Box::new(left),
        right: Box::new(right),
    })
}

/// Resolves `.name` on a parsed value. Returns the new expression, its shape
/// and height; paths on data references stay a single node.
fn access_property(
    parsed: Parsed,
    name: String,
    position: usize,
) -> Result<(Expression, Shape, usize), CompileError> {
    let Parsed {
        expr,
        shape,
        height,
    } = parsed;
    match &shape {
        Shape::Record(Some(props)) if !props.names.iter().any(|p| *p == name) => {
            return Err(CompileError::UnknownProperty {
                source_id: props.owner.clone(),
                property: name,
                position,
            });
        }
        Shape::Collection(_) | Shape::Scalar => {
            return Err(CompileError::InvalidReceiver {
                method: format!(".{}", name),
                target: shape.describe().to_string(),
                position,
            });
        }
        _ => {}
    }

    Ok(match expr {
        Expression::DataRef { source, mut path } => {
            path.push(name);
            (Expression::DataRef { source, path }, Shape::Unknown, height)
        }
        other => (
            Expression::Member {
                object: Box::new(other),
                property: name,
            },
            Shape::Unknown,
            height + 1,
        ),
    })
}

fn shape_of(returns: ReturnKind) -> Shape {
    match returns {
        ReturnKind::Collection => Shape::Collection(None),
        ReturnKind::Record => Shape::Record(None),
        ReturnKind::Any => Shape::Unknown,
        _ => Shape::Scalar,
    }
}
