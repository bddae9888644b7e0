//! Functions that conditions can be attached to

use std::fmt;
use std::sync::Arc;

use constrained_core::Value;
use tracing::trace;

use crate::errors::{ContractError, ContractResult};

/// Body of a [`ContractFn`]
pub type FunctionBody = dyn Fn(&[Value]) -> ContractResult<Value> + Send + Sync;

/// A named function with named positional parameters
///
/// Parameter names let preconditions refer to a specific argument.
/// Cloning is cheap and shares the body.
#[derive(Clone)]
pub struct ContractFn {
    name: String,
    params: Arc<[String]>,
    body: Arc<FunctionBody>,
}

impl ContractFn {
    pub fn new<P, F>(name: impl Into<String>, params: P, body: F) -> Self
    where
        P: IntoIterator,
        P::Item: Into<String>,
        F: Fn(&[Value]) -> ContractResult<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            params: params.into_iter().map(Into::into).collect(),
            body: Arc::new(body),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Position of the parameter called `name`
    pub fn param_index(&self, name: &str) -> Option<usize> {
        self.params.iter().position(|param| param == name)
    }

    /// Call the function after checking the argument count
    pub fn call(&self, args: &[Value]) -> ContractResult<Value> {
        if args.len() != self.arity() {
            return Err(ContractError::ArityMismatch {
                function: self.name.clone(),
                expected: self.arity(),
                actual: args.len(),
            });
        }
        trace!("Calling {} with {} arguments", self.name, args.len());
        (self.body)(args)
    }

    /// A function with the same signature whose body is `wrapper`
    ///
    /// The wrapper receives the original function and the arguments, and
    /// decides whether and how to call through.
    pub fn wrap<F>(&self, wrapper: F) -> ContractFn
    where
        F: Fn(&ContractFn, &[Value]) -> ContractResult<Value> + Send + Sync + 'static,
    {
        let inner = self.clone();
        ContractFn {
            name: self.name.clone(),
            params: self.params.clone(),
            body: Arc::new(move |args: &[Value]| wrapper(&inner, args)),
        }
    }
}

impl fmt::Debug for ContractFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractFn")
            .field("name", &self.name)
            .field("params", &self.params)
            .finish()
    }
}
