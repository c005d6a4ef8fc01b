#![forbid(unsafe_code)]

//! Expression evaluation against a host state surface.
//!
//! The evaluator is a plain recursive interpreter. It owns no state of its
//! own: every `StateRead`/`StateHas` goes through the [`HostState`] trait so
//! the caller decides where state lives and how accesses are recorded. During
//! a reactive render the host is the tracked store; in tests it is usually a
//! map.
//!
//! # Failure Modes
//!
//! All errors surface synchronously to the caller. There is no retry or
//! fallback anywhere on this path; a failed evaluation leaves no partial
//! result behind.

use std::rc::Rc;

use eastui_value::{CodecError, Value, ValueType};

use crate::expr::{Expr, Lambda, Site};

/// The state surface the evaluator reads through.
pub trait HostState {
    /// Read and decode `key` with expected payload type `ty`.
    ///
    /// Absent keys yield `Value::Option(None)`; present keys yield
    /// `Value::Option(Some(_))`. The access must be recorded if a tracking
    /// pass is active.
    fn state_read(&self, key: &str, ty: &ValueType) -> Result<Value, EvalError>;

    /// Tracked existence check for `key`.
    fn state_has(&self, key: &str) -> Result<bool, EvalError>;
}

/// An evaluation failure.
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// A variable was referenced that is not bound. With the construction
    /// time capture check in place this indicates a malformed tree.
    Unbound { name: String, site: Site },
    /// A call target did not evaluate to a lambda.
    NotCallable { found: String },
    /// A call supplied the wrong number of arguments.
    ArityMismatch { expected: usize, found: usize },
    /// An operand had the wrong shape (e.g. non-bool `if` condition).
    TypeMismatch { expected: String, found: String },
    /// A struct field projection named a missing field.
    NoSuchField { name: String },
    /// A lambda escaped to a position where a data value was required.
    LambdaNotData,
    /// The host refused the state access (e.g. no provider mounted).
    State(String),
    /// A state blob failed to decode or did not match its expected type.
    Codec(CodecError),
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unbound { name, site } => {
                write!(f, "unbound variable `{name}` at {site}")
            }
            Self::NotCallable { found } => write!(f, "cannot call a value of shape {found}"),
            Self::ArityMismatch { expected, found } => {
                write!(f, "call arity mismatch: expected {expected} arguments, found {found}")
            }
            Self::TypeMismatch { expected, found } => {
                write!(f, "evaluation type mismatch: expected {expected}, found {found}")
            }
            Self::NoSuchField { name } => write!(f, "no field named `{name}`"),
            Self::LambdaNotData => {
                write!(f, "a lambda may not appear where a data value is required")
            }
            Self::State(msg) => write!(f, "state access failed: {msg}"),
            Self::Codec(err) => write!(f, "state blob unreadable: {err}"),
        }
    }
}

impl std::error::Error for EvalError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Codec(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CodecError> for EvalError {
    fn from(err: CodecError) -> Self {
        Self::Codec(err)
    }
}

/// Evaluate a closed expression.
pub fn eval(expr: &Expr, host: &dyn HostState) -> Result<Value, EvalError> {
    eval_in(expr, &Env::empty(), host)?.into_value()
}

/// Apply a lambda to argument values. This is how the runtime invokes a
/// reactive body (with no arguments).
pub fn eval_lambda(
    lambda: &Lambda,
    args: Vec<Value>,
    host: &dyn HostState,
) -> Result<Value, EvalError> {
    apply(lambda, &Env::empty(), args, host)?.into_value()
}

// ─── Environment ─────────────────────────────────────────────────────────────

/// Evaluation result: either plain data or a lambda closed over its
/// environment. Lambdas are first-class during evaluation but may not escape
/// into data positions.
#[derive(Clone)]
enum Evaluated {
    Val(Value),
    Fun { lambda: Lambda, env: Env },
}

impl Evaluated {
    fn into_value(self) -> Result<Value, EvalError> {
        match self {
            Self::Val(v) => Ok(v),
            Self::Fun { .. } => Err(EvalError::LambdaNotData),
        }
    }

    fn kind(&self) -> &'static str {
        match self {
            Self::Val(v) => v.kind(),
            Self::Fun { .. } => "lambda",
        }
    }
}

/// Immutable scope chain. Cheap to extend and clone; lambdas capture it.
#[derive(Clone)]
struct Env(Option<Rc<Frame>>);

struct Frame {
    name: String,
    value: Evaluated,
    parent: Env,
}

impl Env {
    const fn empty() -> Self {
        Self(None)
    }

    fn bind(&self, name: impl Into<String>, value: Evaluated) -> Self {
        Self(Some(Rc::new(Frame {
            name: name.into(),
            value,
            parent: self.clone(),
        })))
    }

    fn lookup(&self, name: &str) -> Option<Evaluated> {
        let mut cur = &self.0;
        while let Some(frame) = cur {
            if frame.name == name {
                return Some(frame.value.clone());
            }
            cur = &frame.parent.0;
        }
        None
    }
}

// ─── Evaluation ──────────────────────────────────────────────────────────────

fn eval_in(expr: &Expr, env: &Env, host: &dyn HostState) -> Result<Evaluated, EvalError> {
    match expr {
        Expr::Lit(v) => Ok(Evaluated::Val(v.clone())),
        Expr::Var { name, site } => env.lookup(name).ok_or_else(|| EvalError::Unbound {
            name: name.clone(),
            site: site.clone(),
        }),
        Expr::Let { name, value, body } => {
            let bound = eval_in(value, env, host)?;
            eval_in(body, &env.bind(name.clone(), bound), host)
        }
        Expr::Lambda(lambda) => Ok(Evaluated::Fun {
            lambda: lambda.clone(),
            env: env.clone(),
        }),
        Expr::Call { func, args } => match eval_in(func, env, host)? {
            Evaluated::Fun {
                lambda,
                env: closure_env,
            } => {
                let mut evaluated_args = Vec::with_capacity(args.len());
                for arg in args {
                    evaluated_args.push(eval_in(arg, env, host)?);
                }
                apply_evaluated(&lambda, &closure_env, evaluated_args, host)
            }
            other => Err(EvalError::NotCallable {
                found: other.kind().to_string(),
            }),
        },
        Expr::If {
            cond,
            then,
            otherwise,
        } => {
            let c = eval_in(cond, env, host)?;
            match c {
                Evaluated::Val(Value::Bool(true)) => eval_in(then, env, host),
                Evaluated::Val(Value::Bool(false)) => eval_in(otherwise, env, host),
                other => Err(EvalError::TypeMismatch {
                    expected: "bool".into(),
                    found: other.kind().to_string(),
                }),
            }
        }
        Expr::Field { target, name } => {
            let t = eval_in(target, env, host)?.into_value()?;
            match &t {
                Value::Struct(_) => t.field(name).cloned().map(Evaluated::Val).ok_or_else(|| {
                    EvalError::NoSuchField { name: name.clone() }
                }),
                other => Err(EvalError::TypeMismatch {
                    expected: "struct".into(),
                    found: other.kind().to_string(),
                }),
            }
        }
        Expr::StructLit(fields) => {
            let mut out = Vec::with_capacity(fields.len());
            for (name, e) in fields {
                out.push((name.clone(), eval_in(e, env, host)?.into_value()?));
            }
            Ok(Evaluated::Val(Value::Struct(out)))
        }
        Expr::UnionLit { tag, payload } => {
            let p = eval_in(payload, env, host)?.into_value()?;
            Ok(Evaluated::Val(Value::union(tag.clone(), p)))
        }
        Expr::ArrayLit(items) => {
            let mut out = Vec::with_capacity(items.len());
            for e in items {
                out.push(eval_in(e, env, host)?.into_value()?);
            }
            Ok(Evaluated::Val(Value::Array(out)))
        }
        Expr::OptionLit(inner) => match inner {
            None => Ok(Evaluated::Val(Value::none())),
            Some(e) => {
                let v = eval_in(e, env, host)?.into_value()?;
                Ok(Evaluated::Val(Value::some(v)))
            }
        },
        Expr::StateRead { key, ty } => {
            let k = expect_str(eval_in(key, env, host)?)?;
            host.state_read(&k, ty).map(Evaluated::Val)
        }
        Expr::StateHas { key } => {
            let k = expect_str(eval_in(key, env, host)?)?;
            host.state_has(&k).map(|b| Evaluated::Val(Value::Bool(b)))
        }
    }
}

fn expect_str(evaluated: Evaluated) -> Result<String, EvalError> {
    match evaluated {
        Evaluated::Val(Value::Str(s)) => Ok(s),
        other => Err(EvalError::TypeMismatch {
            expected: "str".into(),
            found: other.kind().to_string(),
        }),
    }
}

fn apply(
    lambda: &Lambda,
    env: &Env,
    args: Vec<Value>,
    host: &dyn HostState,
) -> Result<Evaluated, EvalError> {
    apply_evaluated(lambda, env, args.into_iter().map(Evaluated::Val).collect(), host)
}

fn apply_evaluated(
    lambda: &Lambda,
    env: &Env,
    args: Vec<Evaluated>,
    host: &dyn HostState,
) -> Result<Evaluated, EvalError> {
    if lambda.params.len() != args.len() {
        return Err(EvalError::ArityMismatch {
            expected: lambda.params.len(),
            found: args.len(),
        });
    }
    let mut call_env = env.clone();
    for (param, arg) in lambda.params.iter().zip(args) {
        call_env = call_env.bind(param.clone(), arg);
    }
    eval_in(&lambda.body, &call_env, host)
}
