//! Type verification module.
//!
//! The verifier is a pure recursive predicate over expression trees. The
//! parser calls it at every expression boundary with the type the context
//! requires (a declaration's annotation, a parameter type, a function's
//! return type), so ill-typed programs never leave the front end.
//!
//! - `int32` accepts integer literals, `int32` identifiers and `+ - * /`
//!   combinations of those, plus prefix expressions other than `~ ++ --`
//! - `string` accepts string literals, `string` identifiers and `+`
//!   concatenations of those
//! - `void` accepts anything

pub mod verifier;
