use curve25519_core::{MontgomeryPoint, Scalar};

use crate::{SharedSecret, X25519Error};

/// Runs the Montgomery ladder to compute the shared `u`-coordinate.
/// `cu25519_shared_secret`: the raw ladder output, not yet checked for
/// the all-zero contributory-behavior case (see [`SharedSecret::was_contributory`]).
pub(crate) fn agree(scalar: &Scalar, their_public: &MontgomeryPoint) -> SharedSecret {
    SharedSecret(their_public.ladder(scalar).0)
}

/// `cu25519_shared_secret_checked`: rejects twist points and small-order
/// inputs instead of silently producing a weak shared secret.
pub(crate) fn agree_checked(
    scalar: &Scalar,
    their_public: &MontgomeryPoint,
) -> Result<SharedSecret, X25519Error> {
    their_public
        .ladder_checked(scalar)
        .map(|p| SharedSecret(p.0))
        .ok_or(X25519Error::SmallOrder)
}
