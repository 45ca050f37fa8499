//! Supertraits for common effect combinations

use super::{DocumentStore, IdentityStore, PhysicalTimeEffects, RandomEffects};

/// Supertrait for the social engine
///
/// Combines everything a request needs: user lookup, document mutation,
/// timestamps and identifier generation.
pub trait SocialEffects:
    IdentityStore + DocumentStore + PhysicalTimeEffects + RandomEffects
{
}

/// Automatic implementation for types that satisfy the required bounds
impl<T> SocialEffects for T where
    T: IdentityStore + DocumentStore + PhysicalTimeEffects + RandomEffects
{
}
