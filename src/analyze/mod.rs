//! Static analysis over parsed source trees.
//!
//! Three cooperating pieces: [`matcher`] finds registration call sites,
//! [`values`] turns literal subtrees into plain values, and [`condition`]
//! pulls conditional-loading metadata out of conventionally named `META`
//! factories.

pub mod condition;
pub mod matcher;
pub mod values;
