//! Expression nodes as handed over by the binder.
//!
//! Only the shapes the delegation checks distinguish are modelled; anything
//! else a caller can express as a `binaryOp` or a `call`.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Node {
    /// Unqualified name: a column, a table, a variable or an enum member.
    FirstName { name: String },
    /// `left.right`
    DottedName { left: Box<Node>, right: String },
    StrLit { value: String },
    NumLit { value: f64 },
    BoolLit { value: bool },
    Call(CallNode),
    BinaryOp {
        op: String,
        left: Box<Node>,
        right: Box<Node>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CallNode {
    pub name: String,
    #[serde(default)]
    pub args: Vec<Node>,
}

impl Node {
    pub fn first_name(name: impl Into<String>) -> Self {
        Node::FirstName { name: name.into() }
    }

    pub fn dotted(left: Node, right: impl Into<String>) -> Self {
        Node::DottedName {
            left: Box::new(left),
            right: right.into(),
        }
    }

    pub fn str_lit(value: impl Into<String>) -> Self {
        Node::StrLit {
            value: value.into(),
        }
    }

    pub fn call(name: impl Into<String>, args: Vec<Node>) -> Self {
        Node::Call(CallNode::new(name, args))
    }

    pub fn binary(op: impl Into<String>, left: Node, right: Node) -> Self {
        Node::BinaryOp {
            op: op.into(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Direct children, left to right.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::DottedName { left, .. } => vec![left.as_ref()],
            Node::Call(call) => call.args.iter().collect(),
            Node::BinaryOp { left, right, .. } => vec![left.as_ref(), right.as_ref()],
            Node::FirstName { .. }
            | Node::StrLit { .. }
            | Node::NumLit { .. }
            | Node::BoolLit { .. } => Vec::new(),
        }
    }
}

impl CallNode {
    pub fn new(name: impl Into<String>, args: Vec<Node>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::FirstName { name } => f.write_str(name),
            Node::DottedName { left, right } => write!(f, "{left}.{right}"),
            Node::StrLit { value } => write!(f, "\"{}\"", value.replace('"', "\"\"")),
            Node::NumLit { value } => write!(f, "{value}"),
            Node::BoolLit { value } => write!(f, "{value}"),
            Node::Call(call) => call.fmt(f),
            Node::BinaryOp { op, left, right } => write!(f, "{left} {op} {right}"),
        }
    }
}

impl fmt::Display for CallNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.name)?;
        for (idx, arg) in self.args.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str(")")
    }
}
