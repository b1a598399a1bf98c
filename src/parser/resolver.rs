//! Function name resolution.
//!
//! A function may be called before it is declared. Such calls are kept as
//! pending call sites, together with their argument expressions, and are
//! checked against the real signature once the declaration is parsed. Calls
//! still pending at the end of the input refer to a function that does not
//! exist.

use std::collections::HashMap;

use crate::{
    ast::{ast::Expression, statements::Argument, types::Type},
    errors::errors::{Error, ErrorImpl},
    Position,
};

/// What the parser knows about a declared function.
///
/// A signature is registered before the body is parsed so that the body can
/// call the function recursively.
#[derive(Debug, Clone, PartialEq)]
pub struct FnSignature {
    pub name: String,
    pub arg_types: Vec<Type>,
    pub return_type: Type,
}

/// One call to a function that was not declared yet.
#[derive(Debug, Clone, PartialEq)]
pub struct CallSite {
    pub position: Position,
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Default)]
pub struct PendingCalls {
    calls: HashMap<String, Vec<CallSite>>,
}

impl PendingCalls {
    /// Adds a call site for `name`.
    ///
    /// Every call to the same undeclared function must pass the same number
    /// of arguments as the first one did.
    pub fn record(&mut self, name: &str, call_site: CallSite) -> Result<(), Error> {
        let call_sites = self.calls.entry(name.to_string()).or_default();

        if let Some(first) = call_sites.first() {
            if first.arguments.len() != call_site.arguments.len() {
                return Err(Error::new(
                    ErrorImpl::ArgumentCountMismatch {
                        function: name.to_string(),
                        expected: first.arguments.len(),
                        received: call_site.arguments.len(),
                    },
                    call_site.position,
                ));
            }
        }

        call_sites.push(call_site);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.calls.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    /// Checks every recorded call of `name` against its declared arguments
    /// and forgets them. Errors are reported at `position`, the declaration.
    ///
    /// Returns the number of call sites that were resolved.
    pub fn reconcile(
        &mut self,
        name: &str,
        args: &[Argument],
        position: &Position,
    ) -> Result<usize, Error> {
        let Some(call_sites) = self.calls.remove(name) else {
            return Ok(0);
        };

        for call_site in &call_sites {
            if call_site.arguments.len() != args.len() {
                return Err(Error::new(
                    ErrorImpl::ArgumentCountMismatch {
                        function: name.to_string(),
                        expected: args.len(),
                        received: call_site.arguments.len(),
                    },
                    position.clone(),
                ));
            }

            for (index, (arg, expression)) in args.iter().zip(&call_site.arguments).enumerate() {
                arg.arg_type.verify(expression).map_err(|source| {
                    Error::new(
                        ErrorImpl::ArgumentTypeMismatch {
                            function: name.to_string(),
                            index,
                            expected: arg.arg_type,
                            source,
                        },
                        position.clone(),
                    )
                })?;
            }
        }

        log::debug!(
            "resolved {} forward call(s) to `{}`",
            call_sites.len(),
            name
        );

        Ok(call_sites.len())
    }

    /// The earliest call site whose function was never declared.
    pub fn first_unresolved(&self) -> Option<(&String, &CallSite)> {
        self.calls
            .iter()
            .filter_map(|(name, call_sites)| call_sites.first().map(|site| (name, site)))
            .min_by_key(|(_, site)| (site.position.line, site.position.column))
    }
}
