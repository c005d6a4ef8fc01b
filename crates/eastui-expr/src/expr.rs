#![forbid(unsafe_code)]

//! The expression tree reactive bodies are written in.
//!
//! This is deliberately a small language: literals, variables, `let`,
//! lambdas, calls, conditionals, data literals, field access, and the two
//! tracked state accessors. It exists to *describe* a render, not to be a
//! general-purpose language.

use eastui_value::{Value, ValueType};

/// Definition location attached to variable references and lambdas,
/// carried into diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Site {
    /// Human-readable origin, typically a component or fragment name.
    pub label: String,
    /// Line within the origin, when known. Zero means unknown.
    pub line: u32,
}

impl Site {
    /// Create a site from a label and line.
    #[must_use]
    pub fn new(label: impl Into<String>, line: u32) -> Self {
        Self {
            label: label.into(),
            line,
        }
    }

    /// Create a site with an unknown line.
    #[must_use]
    pub fn named(label: impl Into<String>) -> Self {
        Self::new(label, 0)
    }
}

impl std::fmt::Display for Site {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.line == 0 {
            write!(f, "{}", self.label)
        } else {
            write!(f, "{}:{}", self.label, self.line)
        }
    }
}

/// A function literal: the shape reactive bodies take.
#[derive(Debug, Clone, PartialEq)]
pub struct Lambda {
    /// Parameter names, bound in the body.
    pub params: Vec<String>,
    pub body: Box<Expr>,
    /// Where the lambda was defined.
    pub site: Site,
}

impl Lambda {
    /// Create a lambda.
    #[must_use]
    pub fn new<P: Into<String>>(
        params: impl IntoIterator<Item = P>,
        body: Expr,
        site: Site,
    ) -> Self {
        Self {
            params: params.into_iter().map(Into::into).collect(),
            body: Box::new(body),
            site,
        }
    }

    /// Create a parameterless lambda (the common reactive-body case).
    #[must_use]
    pub fn thunk(body: Expr, site: Site) -> Self {
        Self::new(std::iter::empty::<String>(), body, site)
    }
}

/// An expression node.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A constant value.
    Lit(Value),
    /// A variable reference.
    Var { name: String, site: Site },
    /// `let name = value in body`.
    Let {
        name: String,
        value: Box<Expr>,
        body: Box<Expr>,
    },
    /// A function literal.
    Lambda(Lambda),
    /// Application of a lambda to arguments.
    Call { func: Box<Expr>, args: Vec<Expr> },
    /// Two-armed conditional; the condition must evaluate to a bool.
    If {
        cond: Box<Expr>,
        then: Box<Expr>,
        otherwise: Box<Expr>,
    },
    /// Struct field projection.
    Field { target: Box<Expr>, name: String },
    /// Struct literal with ordered fields.
    StructLit(Vec<(String, Expr)>),
    /// Tagged-union literal.
    UnionLit { tag: String, payload: Box<Expr> },
    /// Array literal.
    ArrayLit(Vec<Expr>),
    /// Option literal.
    OptionLit(Option<Box<Expr>>),
    /// Tracked read of a state key; evaluates to an option of `ty`.
    StateRead { key: Box<Expr>, ty: ValueType },
    /// Tracked existence check of a state key; evaluates to a bool.
    StateHas { key: Box<Expr> },
}

impl Expr {
    /// A literal expression.
    #[must_use]
    pub fn lit(value: Value) -> Self {
        Self::Lit(value)
    }

    /// A string literal.
    #[must_use]
    pub fn str(s: impl Into<String>) -> Self {
        Self::Lit(Value::str(s))
    }

    /// An integer literal.
    #[must_use]
    pub const fn int(n: i64) -> Self {
        Self::Lit(Value::Int(n))
    }

    /// A variable reference.
    #[must_use]
    pub fn var(name: impl Into<String>, site: Site) -> Self {
        Self::Var {
            name: name.into(),
            site,
        }
    }

    /// A `let` binding.
    #[must_use]
    pub fn let_(name: impl Into<String>, value: Expr, body: Expr) -> Self {
        Self::Let {
            name: name.into(),
            value: Box::new(value),
            body: Box::new(body),
        }
    }

    /// A call expression.
    #[must_use]
    pub fn call(func: Expr, args: impl IntoIterator<Item = Expr>) -> Self {
        Self::Call {
            func: Box::new(func),
            args: args.into_iter().collect(),
        }
    }

    /// A conditional expression.
    #[must_use]
    pub fn if_(cond: Expr, then: Expr, otherwise: Expr) -> Self {
        Self::If {
            cond: Box::new(cond),
            then: Box::new(then),
            otherwise: Box::new(otherwise),
        }
    }

    /// A field projection.
    #[must_use]
    pub fn field(target: Expr, name: impl Into<String>) -> Self {
        Self::Field {
            target: Box::new(target),
            name: name.into(),
        }
    }

    /// A struct literal.
    #[must_use]
    pub fn record<N: Into<String>>(fields: impl IntoIterator<Item = (N, Expr)>) -> Self {
        Self::StructLit(fields.into_iter().map(|(n, e)| (n.into(), e)).collect())
    }

    /// A tagged-union literal.
    #[must_use]
    pub fn union(tag: impl Into<String>, payload: Expr) -> Self {
        Self::UnionLit {
            tag: tag.into(),
            payload: Box::new(payload),
        }
    }

    /// A tracked read of a fixed state key.
    #[must_use]
    pub fn state_read(key: impl Into<String>, ty: ValueType) -> Self {
        Self::StateRead {
            key: Box::new(Self::str(key)),
            ty,
        }
    }

    /// A tracked existence check of a fixed state key.
    #[must_use]
    pub fn state_has(key: impl Into<String>) -> Self {
        Self::StateHas {
            key: Box::new(Self::str(key)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn site_display() {
        assert_eq!(Site::new("Counter", 12).to_string(), "Counter:12");
        assert_eq!(Site::named("Counter").to_string(), "Counter");
    }

    #[test]
    fn thunk_has_no_params() {
        let l = Lambda::thunk(Expr::int(1), Site::named("t"));
        assert!(l.params.is_empty());
    }

    #[test]
    fn builders_shape() {
        let e = Expr::let_(
            "x",
            Expr::int(1),
            Expr::record([("x", Expr::var("x", Site::named("b")))]),
        );
        let Expr::Let { name, .. } = &e else {
            panic!("expected let");
        };
        assert_eq!(name, "x");
    }
}
