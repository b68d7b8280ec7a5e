use super::Value;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::Hash;

/// Binary arithmetic and comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOp {
    Power,
    Multiply,
    Divide,
    Modulo,
    Add,
    Subtract,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    LooseEqual,
    LooseNotEqual,
    StrictEqual,
    StrictNotEqual,
}

impl BinaryOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Some(match symbol {
            "**" => BinaryOp::Power,
            "*" => BinaryOp::Multiply,
            "/" => BinaryOp::Divide,
            "%" => BinaryOp::Modulo,
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Subtract,
            "<" => BinaryOp::Less,
            "<=" => BinaryOp::LessOrEqual,
            ">" => BinaryOp::Greater,
            ">=" => BinaryOp::GreaterOrEqual,
            "==" => BinaryOp::LooseEqual,
            "!=" => BinaryOp::LooseNotEqual,
            "===" => BinaryOp::StrictEqual,
            "!==" => BinaryOp::StrictNotEqual,
            _ => return None,
        })
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Power => "**",
            BinaryOp::Multiply => "*",
            BinaryOp::Divide => "/",
            BinaryOp::Modulo => "%",
            BinaryOp::Add => "+",
            BinaryOp::Subtract => "-",
            BinaryOp::Less => "<",
            BinaryOp::LessOrEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterOrEqual => ">=",
            BinaryOp::LooseEqual => "==",
            BinaryOp::LooseNotEqual => "!=",
            BinaryOp::StrictEqual => "===",
            BinaryOp::StrictNotEqual => "!==",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    Negate,
}

impl UnaryOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "!" => Some(UnaryOp::Not),
            "-" => Some(UnaryOp::Negate),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Negate => "-",
        }
    }
}

/// Short-circuiting boolean combinators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicalOp {
    And,
    Or,
}

impl LogicalOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "&&" => Some(LogicalOp::And),
            "||" => Some(LogicalOp::Or),
            _ => None,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            LogicalOp::And => "&&",
            LogicalOp::Or => "||",
        }
    }
}

/// The argument passed to a collection method call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MethodArgument {
    None,
    Value(Box<Expression>),
    Lambda { param: String, body: Box<Expression> },
}

/// The Abstract Syntax Tree representing a compiled expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expression {
    // Leaf nodes
    Literal(Value),
    /// A data source (or lambda parameter) followed by a property path.
    DataRef {
        source: String,
        path: Vec<String>,
    },

    /// Property access on a computed value, e.g. `allSales.first().Amount`.
    Member {
        object: Box<Expression>,
        property: String,
    },

    // Operators
    Unary {
        op: UnaryOp,
        operand: Box<Expression>,
    },
    Binary {
        op: BinaryOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Logical {
        op: LogicalOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Conditional {
        condition: Box<Expression>,
        then_branch: Box<Expression>,
        else_branch: Box<Expression>,
    },

    // Calls
    Call {
        function: String,
        args: Vec<Expression>,
    },
    Method {
        receiver: Box<Expression>,
        method: String,
        argument: MethodArgument,
    },
}

impl Expression {
    /// Direct children in evaluation order.
    pub fn children(&self) -> Vec<&Expression> {
        match self {
            Expression::Literal(_) | Expression::DataRef { .. } => Vec::new(),
            Expression::Member { object, .. } => vec![object.as_ref()],
            Expression::Unary { operand, .. } => vec![operand.as_ref()],
            Expression::Binary { left, right, .. } | Expression::Logical { left, right, .. } => {
                vec![left.as_ref(), right.as_ref()]
            }
            Expression::Conditional {
                condition,
                then_branch,
                else_branch,
            } => vec![
                condition.as_ref(),
                then_branch.as_ref(),
                else_branch.as_ref(),
            ],
            Expression::Call { args, .. } => args.iter().collect(),
            Expression::Method {
                receiver, argument, ..
            } => match argument {
                MethodArgument::None => vec![receiver.as_ref()],
                MethodArgument::Value(arg) => vec![receiver.as_ref(), arg.as_ref()],
                MethodArgument::Lambda { body, .. } => vec![receiver.as_ref(), body.as_ref()],
            },
        }
    }

    /// Height of the tree, leaves count as one.
    pub fn depth(&self) -> usize {
        1 + self
            .children()
            .into_iter()
            .map(Expression::depth)
            .max()
            .unwrap_or(0)
    }
}

/// A wrapper to display an expression as an indented tree.
pub struct DisplayExpression<'a> {
    pub expr: &'a Expression,
}

impl<'a> fmt::Display for DisplayExpression<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_as_tree(self.expr, f, "", true)
    }
}

impl<'a> DisplayExpression<'a> {
    fn fmt_as_tree(
        &self,
        expr: &Expression,
        f: &mut fmt::Formatter<'_>,
        prefix: &str,
        is_last: bool,
    ) -> fmt::Result {
        let node_marker = if is_last { "└── " } else { "├── " };
        write!(f, "{}{}", prefix, node_marker)?;

        let child_prefix = format!("{}{}", prefix, if is_last { "    " } else { "│   " });

        match expr {
            Expression::Literal(v) => writeln!(f, "Literal: {}", v)?,
            Expression::DataRef { source, path } => {
                writeln!(f, "Data: {}", std::iter::once(source).chain(path).join("."))?
            }
            Expression::Member { property, .. } => writeln!(f, "Member (.{})", property)?,
            Expression::Unary { op, .. } => writeln!(f, "Unary ({})", op.symbol())?,
            Expression::Binary { op, .. } => writeln!(f, "Binary ({})", op.symbol())?,
            Expression::Logical { op, .. } => writeln!(f, "Logical ({})", op.symbol())?,
            Expression::Conditional { .. } => writeln!(f, "Conditional (?:)")?,
            Expression::Call { function, .. } => writeln!(f, "Call {}()", function)?,
            Expression::Method {
                method, argument, ..
            } => match argument {
                MethodArgument::Lambda { param, .. } => {
                    writeln!(f, "Method .{}({} => ...)", method, param)?
                }
                _ => writeln!(f, "Method .{}()", method)?,
            },
        }

        let children = expr.children();
        let count = children.len();
        for (i, child) in children.into_iter().enumerate() {
            self.fmt_as_tree(child, f, &child_prefix, i + 1 == count)?;
        }
        Ok(())
    }
}
