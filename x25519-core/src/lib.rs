// -*- mode: rust; -*-
//
// This file is part of x25519-core.
// See LICENSE for licensing information.

//! X25519 (RFC 7748) Diffie-Hellman key agreement on top of
//! `curve25519-core`'s Montgomery ladder, plus the Elligator2-masked key
//! generation used to make ephemeral public keys indistinguishable from
//! random bytes on the wire (`cu25519_elligator2_gen`).

#![forbid(unsafe_code)]

use curve25519_core::{ElligatorRepresentative, MontgomeryPoint, Scalar};
use rand_core::{CryptoRng, RngCore};
use subtle::{Choice, ConstantTimeEq};
use zeroize::Zeroize;

mod diffie_hellman;
pub mod error;

pub use error::X25519Error;

/// The Montgomery `u`-coordinate of the canonical base point, `9`.
const BASEPOINT: MontgomeryPoint = MontgomeryPoint([
    9, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
]);

/// A public key: the `u`-coordinate sent over the wire.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PublicKey(pub(crate) MontgomeryPoint);

impl PublicKey {
    pub fn from_bytes(bytes: [u8; 32]) -> PublicKey {
        PublicKey(MontgomeryPoint(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0 .0
    }
}

/// A long-lived secret scalar, clamped per RFC 7748 §5 on construction.
/// Zeroized on drop.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct StaticSecret(pub(crate) [u8; 32]);

impl StaticSecret {
    pub fn random_from_rng<R: RngCore + CryptoRng>(mut rng: R) -> StaticSecret {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        StaticSecret(bytes)
    }

    pub fn from_bytes(bytes: [u8; 32]) -> StaticSecret {
        StaticSecret(bytes)
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0
    }

    fn scalar(&self) -> Scalar {
        Scalar::from_clamped_bytes(self.0)
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(BASEPOINT.ladder(&self.scalar()))
    }

    pub fn diffie_hellman(&self, their_public: &PublicKey) -> SharedSecret {
        diffie_hellman::agree(&self.scalar(), &their_public.0)
    }

    /// `cu25519_shared_secret_checked`: as [`StaticSecret::diffie_hellman`],
    /// but rejects twist points and small-order inputs instead of
    /// returning a shared secret an attacker could have forced.
    pub fn diffie_hellman_checked(&self, their_public: &PublicKey) -> Result<SharedSecret, X25519Error> {
        diffie_hellman::agree_checked(&self.scalar(), &their_public.0)
    }
}

/// An ephemeral secret: same representation as [`StaticSecret`], but the
/// type forbids any operation other than a single consuming
/// `diffie_hellman` call, so a key exchange scalar can't accidentally be
/// reused across sessions.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct EphemeralSecret(pub(crate) [u8; 32]);

impl EphemeralSecret {
    pub fn random_from_rng<R: RngCore + CryptoRng>(mut rng: R) -> EphemeralSecret {
        let mut bytes = [0u8; 32];
        rng.fill_bytes(&mut bytes);
        EphemeralSecret(bytes)
    }

    fn scalar(&self) -> Scalar {
        Scalar::from_clamped_bytes(self.0)
    }

    pub fn public_key(&self) -> PublicKey {
        PublicKey(BASEPOINT.ladder(&self.scalar()))
    }

    pub fn diffie_hellman(self, their_public: &PublicKey) -> SharedSecret {
        diffie_hellman::agree(&self.scalar(), &their_public.0)
    }

    /// `cu25519_shared_secret_checked`, consuming form: see
    /// [`StaticSecret::diffie_hellman_checked`].
    pub fn diffie_hellman_checked(self, their_public: &PublicKey) -> Result<SharedSecret, X25519Error> {
        diffie_hellman::agree_checked(&self.scalar(), &their_public.0)
    }
}

/// A Diffie-Hellman shared secret. Not directly usable as symmetric key
/// material: callers must run it through a KDF (see `kdf25519`) before
/// using it for anything.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct SharedSecret(pub(crate) [u8; 32]);

impl SharedSecret {
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Rejects the all-zero shared secret produced when the peer sent a
    /// point on the curve's small-order subgroup (RFC 7748 §6.1's
    /// contributory-behavior check). Not checked automatically by
    /// [`StaticSecret::diffie_hellman`]/[`EphemeralSecret::diffie_hellman`]
    /// since some protocols intentionally tolerate it; callers that need
    /// the check call this explicitly.
    pub fn was_contributory(&self) -> Choice {
        !self.0.ct_eq(&[0u8; 32])
    }
}

/// A key pair suitable for Elligator2 representation: its public key has
/// a valid uniform representative, so it can be transmitted as
/// indistinguishable-from-random bytes via [`ElligatorKeyPair::representative`].
pub struct ElligatorKeyPair {
    secret: [u8; 32],
    representative: ElligatorRepresentative,
}

impl ElligatorKeyPair {
    /// `cu25519_elligator2_gen`: generates secret/public key pairs from
    /// fresh randomness until one whose public key has a valid Elligator2
    /// representative is found (on average two attempts, since roughly
    /// half of all curve points are representable).
    pub fn generate<R: RngCore + CryptoRng>(mut rng: R) -> ElligatorKeyPair {
        loop {
            let mut bytes = [0u8; 32];
            rng.fill_bytes(&mut bytes);
            let scalar = Scalar::from_clamped_bytes(bytes);
            let public = BASEPOINT.ladder(&scalar);
            let high_y = Choice::from((bytes[31] >> 7) & 1);
            if let Some(r) = curve25519_core::montgomery::point_to_representative(&public, high_y)
            {
                return ElligatorKeyPair {
                    secret: bytes,
                    representative: ElligatorRepresentative(r.as_bytes()),
                };
            }
        }
    }

    pub fn secret(&self) -> StaticSecret {
        StaticSecret(self.secret)
    }

    pub fn public_key(&self) -> PublicKey {
        let scalar = Scalar::from_clamped_bytes(self.secret);
        PublicKey(BASEPOINT.ladder(&scalar))
    }

    /// The uniform 32-byte representative to actually send on the wire.
    pub fn representative(&self) -> &ElligatorRepresentative {
        &self.representative
    }
}

/// `cu25519_elligator2_rev`: recovers the public key from a representative
/// received over the wire.
pub fn public_key_from_representative(rep: &ElligatorRepresentative) -> PublicKey {
    PublicKey(curve25519_core::montgomery::representative_to_point(rep))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_core::OsRng;

    #[test]
    fn diffie_hellman_agrees() {
        let alice = StaticSecret::random_from_rng(OsRng);
        let bob = StaticSecret::random_from_rng(OsRng);

        let alice_public = alice.public_key();
        let bob_public = bob.public_key();

        let alice_shared = alice.diffie_hellman(&bob_public);
        let bob_shared = bob.diffie_hellman(&alice_public);

        assert_eq!(alice_shared.as_bytes(), bob_shared.as_bytes());
    }

    #[test]
    fn representative_round_trips_through_elligator() {
        let keypair = ElligatorKeyPair::generate(OsRng);
        let recovered = public_key_from_representative(keypair.representative());
        assert_eq!(recovered, keypair.public_key());
    }

    #[test]
    fn elligator_dh_matches_a_direct_diffie_hellman_with_the_recovered_key() {
        let keypair = ElligatorKeyPair::generate(OsRng);
        let peer = StaticSecret::random_from_rng(OsRng);
        let peer_public = peer.public_key();

        let recovered_public = public_key_from_representative(keypair.representative());
        assert_eq!(recovered_public, keypair.public_key());

        let via_direct = keypair.secret().diffie_hellman(&peer_public);
        let via_recovered_on_peer_side = peer.diffie_hellman(&recovered_public);
        assert_eq!(via_direct.as_bytes(), via_recovered_on_peer_side.as_bytes());
    }

    #[test]
    fn checked_diffie_hellman_agrees_with_unchecked_for_honest_peers() {
        let alice = StaticSecret::random_from_rng(OsRng);
        let bob = StaticSecret::random_from_rng(OsRng);

        let alice_public = alice.public_key();
        let bob_public = bob.public_key();

        let checked = alice.diffie_hellman_checked(&bob_public).unwrap();
        let unchecked = alice.diffie_hellman(&bob_public);
        assert_eq!(checked.as_bytes(), unchecked.as_bytes());
        assert_eq!(checked.as_bytes(), bob.diffie_hellman_checked(&alice_public).unwrap().as_bytes());
    }

    #[test]
    fn checked_diffie_hellman_rejects_the_identity_public_key() {
        let alice = StaticSecret::random_from_rng(OsRng);
        let zero_public = PublicKey::from_bytes([0u8; 32]);
        assert_eq!(alice.diffie_hellman_checked(&zero_public), Err(X25519Error::SmallOrder));
    }

    /// RFC 7748 §6.1 Alice+Bob test vector.
    #[test]
    fn rfc7748_alice_and_bob() {
        fn from_hex(s: &str) -> [u8; 32] {
            hex::decode(s).unwrap().try_into().unwrap()
        }

        let alice_sk = StaticSecret::from_bytes(from_hex(
            "77076d0a7318a57d3c16c17251b26645df4c2f87ebc0992ab177fba51db92c2",
        ));
        let bob_sk = StaticSecret::from_bytes(from_hex(
            "5dab087e624a8a4b79e17f8b83800ee66f3bb1292618b6fd1c2f8b27ff88e0eb",
        ));

        let alice_pk = alice_sk.public_key();
        let bob_pk = bob_sk.public_key();

        assert_eq!(
            alice_pk.to_bytes(),
            from_hex("8520f0098930a754748b7ddcb43ef75a0dbf3a0d26381af4eba4a98eaa9b4e6a")
        );
        assert_eq!(
            bob_pk.to_bytes(),
            from_hex("de9edb7d7b7dc1b4d35b61c2ece435373f8343c85b78674dadfc7e146f882b4f")
        );

        let alice_shared = alice_sk.diffie_hellman(&bob_pk);
        let bob_shared = bob_sk.diffie_hellman(&alice_pk);
        let expected = from_hex("4a5d9d5ba4ce2de1728e3bf480350f25e07e21c947d19e3376f09b3c1e161742");

        assert_eq!(alice_shared.as_bytes(), &expected);
        assert_eq!(bob_shared.as_bytes(), &expected);
    }

    #[test]
    fn static_and_ephemeral_secrets_agree() {
        let alice = StaticSecret::random_from_rng(OsRng);
        let bob = EphemeralSecret::random_from_rng(OsRng);
        let bob_public = bob.public_key();

        let alice_shared = alice.diffie_hellman(&bob_public);
        let bob_shared = bob.diffie_hellman(&alice.public_key());

        assert_eq!(alice_shared.as_bytes(), bob_shared.as_bytes());
    }
}
