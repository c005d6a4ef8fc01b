#![forbid(unsafe_code)]

//! Static scope analysis: the no-capture rule for reactive bodies.
//!
//! A reactive body's only visible inputs must be values it reads through the
//! tracked state accessors during its own execution. A reference to a
//! variable bound in an enclosing scope would smuggle in state the tracker
//! cannot see, so dependency sets would be wrong. The check runs once at
//! construction, before any render.
//!
//! This is a pure analysis over the body's free-variable set — a structured
//! result, not control flow borrowed from another subsystem.

use ahash::AHashSet;

use crate::expr::{Expr, Lambda, Site};

/// A reference to a variable not bound inside the checked body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureViolation {
    /// The offending variable name.
    pub name: String,
    /// Where the reference occurs.
    pub site: Site,
    /// The lambda whose construction failed.
    pub lambda_site: Site,
}

impl std::fmt::Display for CaptureViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "capture violation in reactive body at {}: `{}` (referenced at {}) is bound in an \
             enclosing scope; reactive bodies may only use their own bindings and tracked state \
             reads",
            self.lambda_site, self.name, self.site
        )
    }
}

impl std::error::Error for CaptureViolation {}

/// Collect every free variable of `expr` given the names currently `bound`,
/// in reference order.
#[must_use]
pub fn free_vars(expr: &Expr, bound: &[&str]) -> Vec<(String, Site)> {
    let mut scope: AHashSet<String> = bound.iter().map(|s| (*s).to_string()).collect();
    let mut out = Vec::new();
    walk(expr, &mut scope, &mut out);
    out
}

/// Verify that `lambda`'s body references nothing outside its own parameters
/// and inner bindings. Returns the first violation in reference order.
pub fn check_no_captures(lambda: &Lambda) -> Result<(), CaptureViolation> {
    let params: Vec<&str> = lambda.params.iter().map(String::as_str).collect();
    match free_vars(&lambda.body, &params).into_iter().next() {
        None => Ok(()),
        Some((name, site)) => Err(CaptureViolation {
            name,
            site,
            lambda_site: lambda.site.clone(),
        }),
    }
}

fn walk(expr: &Expr, scope: &mut AHashSet<String>, out: &mut Vec<(String, Site)>) {
    match expr {
        Expr::Lit(_) => {}
        Expr::Var { name, site } => {
            if !scope.contains(name) {
                out.push((name.clone(), site.clone()));
            }
        }
        Expr::Let { name, value, body } => {
            walk(value, scope, out);
            let shadowed = !scope.insert(name.clone());
            walk(body, scope, out);
            if !shadowed {
                scope.remove(name);
            }
        }
        Expr::Lambda(lambda) => {
            // Params bind only within this lambda's body.
            let introduced: Vec<&String> = lambda
                .params
                .iter()
                .filter(|p| scope.insert((*p).clone()))
                .collect();
            walk(&lambda.body, scope, out);
            for p in introduced {
                scope.remove(p);
            }
        }
        Expr::Call { func, args } => {
            walk(func, scope, out);
            for arg in args {
                walk(arg, scope, out);
            }
        }
        Expr::If {
            cond,
            then,
            otherwise,
        } => {
            walk(cond, scope, out);
            walk(then, scope, out);
            walk(otherwise, scope, out);
        }
        Expr::Field { target, .. } => walk(target, scope, out),
        Expr::StructLit(fields) => {
            for (_, e) in fields {
                walk(e, scope, out);
            }
        }
        Expr::UnionLit { payload, .. } => walk(payload, scope, out),
        Expr::ArrayLit(items) => {
            for e in items {
                walk(e, scope, out);
            }
        }
        Expr::OptionLit(inner) => {
            if let Some(e) = inner {
                walk(e, scope, out);
            }
        }
        Expr::StateRead { key, .. } | Expr::StateHas { key } => walk(key, scope, out),
    }
}
