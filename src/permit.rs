//! Permit authorization: typed-data digests and signature recovery.
//!
//! A permit is an off-chain signed message that grants a spender a bounded
//! allowance over a specific asset, replacing a separate approval call.
//! The message is signed over a typed-data digest bound to the asset's
//! [`SigningDomain`] — its name, a version string, the chain id, and the
//! ledger address — so a signature can never be replayed against another
//! asset or another chain. Single use is enforced by the ledger's
//! per-owner nonce, which the message includes and the ledger bumps when
//! it records the allowance.
//!
//! Layout of the digest matches the original wire format: a Keccak-256
//! domain separator, a Keccak-256 struct hash over ABI-style 32-byte
//! words, and the `\x19\x01` prefix joining them. Signatures travel as
//! the classic `(v, r, s)` triple.

use k256::ecdsa::{RecoveryId, Signature as EcdsaSignature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use sha3::{Digest, Keccak256};

use crate::domain::{Address, Amount, Timestamp};
use crate::error::{EngineError, Result};
use crate::ledger::FungibleLedger;

/// Version string bound into every signing domain.
pub const DOMAIN_VERSION: &str = "1";

const EIP712_DOMAIN_TYPE: &[u8] =
    b"EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";
const PERMIT_TYPE: &[u8] =
    b"Permit(address owner,address spender,uint256 value,uint256 nonce,uint256 deadline)";

/// The signed payload of a permit.
///
/// `nonce` is the owner's ledger nonce at signing time; the ledger rejects
/// anything behind its counter as [`EngineError::NonceReuse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permit {
    /// The account granting the allowance and signing the message.
    pub owner: Address,
    /// The account allowed to move the owner's assets.
    pub spender: Address,
    /// The maximum amount the spender may move.
    pub value: Amount,
    /// The owner's asset-ledger nonce captured at signing time.
    pub nonce: u64,
    /// Last instant at which the permit is valid.
    pub deadline: Timestamp,
}

/// A recoverable ECDSA signature in `(v, r, s)` form.
///
/// `v` is the recovery id, accepted either raw (`0`/`1`) or with the
/// legacy `27`/`28` offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PermitSignature {
    /// Recovery id.
    pub v: u8,
    /// First signature scalar, big-endian.
    pub r: [u8; 32],
    /// Second signature scalar, big-endian.
    pub s: [u8; 32],
}

/// The typed-data signing domain of one asset ledger.
///
/// Binds permits to the asset's name, the [`DOMAIN_VERSION`], the chain
/// id, and the ledger address. The separator is hashed once at
/// construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningDomain {
    chain_id: u64,
    verifying_contract: Address,
    separator: [u8; 32],
}

impl SigningDomain {
    /// Creates the signing domain for a ledger.
    #[must_use]
    pub fn new(name: &str, chain_id: u64, verifying_contract: Address) -> Self {
        let separator = keccak256(&[
            &keccak256(&[EIP712_DOMAIN_TYPE]),
            &keccak256(&[name.as_bytes()]),
            &keccak256(&[DOMAIN_VERSION.as_bytes()]),
            &word_from_u64(chain_id),
            &word_from_address(verifying_contract),
        ]);
        Self {
            chain_id,
            verifying_contract,
            separator,
        }
    }

    /// Returns the chain id this domain is bound to.
    #[must_use]
    pub const fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// Returns the ledger address this domain is bound to.
    #[must_use]
    pub const fn verifying_contract(&self) -> Address {
        self.verifying_contract
    }

    /// Returns the cached domain separator.
    #[must_use]
    pub const fn separator(&self) -> [u8; 32] {
        self.separator
    }

    /// Computes the digest a permit must be signed over in this domain.
    #[must_use]
    pub fn digest(&self, permit: &Permit) -> [u8; 32] {
        let struct_hash = keccak256(&[
            &keccak256(&[PERMIT_TYPE]),
            &word_from_address(permit.owner),
            &word_from_address(permit.spender),
            &word_from_u128(permit.value.get()),
            &word_from_u64(permit.nonce),
            &word_from_u64(permit.deadline.get()),
        ]);
        keccak256(&[b"\x19\x01", &self.separator, &struct_hash])
    }
}

/// Converts an off-chain permit signature into an on-chain allowance.
///
/// The authorizer is the orchestrator's view of permits: it rebuilds the
/// signed message from the ledger's *current* nonce (the way a relayer
/// does) and hands it to the ledger, whose verification and nonce-bump/
/// allowance-write happen inside one call — there is no window in which a
/// verified permit exists with its nonce still unconsumed.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermitAuthorizer;

impl PermitAuthorizer {
    /// Validates the signature and records `value` as the spender's
    /// allowance over `owner`'s assets.
    ///
    /// # Errors
    ///
    /// - [`EngineError::Expired`] if `now` is past `deadline`.
    /// - [`EngineError::InvalidSignature`] if recovery fails or the signer
    ///   is not `owner` (including signatures over a stale nonce).
    /// - [`EngineError::NonceReuse`] if the ledger reports the nonce as
    ///   already consumed.
    pub fn authorize<L: FungibleLedger>(
        asset: &mut L,
        owner: Address,
        spender: Address,
        value: Amount,
        deadline: Timestamp,
        signature: &PermitSignature,
        now: Timestamp,
    ) -> Result<()> {
        let permit = Permit {
            owner,
            spender,
            value,
            nonce: asset.nonce_of(owner),
            deadline,
        };
        asset.permit(&permit, signature, now)
    }
}

/// Recovers the signer address from a digest and a `(v, r, s)` signature.
///
/// # Errors
///
/// Returns [`EngineError::InvalidSignature`] for an unknown recovery id,
/// malformed scalars, or a point that does not recover.
pub fn recover_signer(digest: &[u8; 32], signature: &PermitSignature) -> Result<Address> {
    let recovery_byte = match signature.v {
        0 | 1 => signature.v,
        27 | 28 => signature.v - 27,
        _ => return Err(EngineError::InvalidSignature),
    };
    let recovery = RecoveryId::from_byte(recovery_byte).ok_or(EngineError::InvalidSignature)?;
    let ecdsa = EcdsaSignature::from_scalars(signature.r, signature.s)
        .map_err(|_| EngineError::InvalidSignature)?;
    let key = VerifyingKey::recover_from_prehash(digest, &ecdsa, recovery)
        .map_err(|_| EngineError::InvalidSignature)?;
    Ok(address_of_key(&key))
}

/// Signs a permit in the given domain, producing the `(v, r, s)` triple.
///
/// This is the client-side half of the protocol; the engine itself only
/// ever recovers.
///
/// # Errors
///
/// Returns [`EngineError::InvalidSignature`] if the key fails to sign.
pub fn sign_permit(
    key: &SigningKey,
    domain: &SigningDomain,
    permit: &Permit,
) -> Result<PermitSignature> {
    let digest = domain.digest(permit);
    let (signature, recovery) = key
        .sign_prehash_recoverable(&digest)
        .map_err(|_| EngineError::InvalidSignature)?;
    let (r, s) = signature.split_bytes();
    Ok(PermitSignature {
        v: 27 + recovery.to_byte(),
        r: r.into(),
        s: s.into(),
    })
}

/// Returns the address belonging to a signing key.
#[must_use]
pub fn signer_address(key: &SigningKey) -> Address {
    address_of_key(key.verifying_key())
}

fn address_of_key(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    // Trailing 20 bytes of the Keccak-256 hash of the uncompressed key,
    // SEC1 tag byte excluded.
    let hash = keccak256(&[&point.as_bytes()[1..]]);
    let mut bytes = [0u8; 20];
    bytes.copy_from_slice(&hash[12..]);
    Address::from_bytes(bytes)
}

fn keccak256(chunks: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    for chunk in chunks {
        hasher.update(chunk);
    }
    hasher.finalize().into()
}

fn word_from_address(address: Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(&address.as_bytes());
    word
}

fn word_from_u128(value: u128) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[16..].copy_from_slice(&value.to_be_bytes());
    word
}

fn word_from_u64(value: u64) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&value.to_be_bytes());
    word
}
