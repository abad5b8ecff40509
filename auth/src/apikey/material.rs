use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Digest;
use sha2::Sha256;

/// Literal prefix carried by every issued key secret.
///
/// Keeps keys visually distinguishable from passwords and other tokens when
/// one shows up somewhere it should not.
pub const KEY_PREFIX: &str = "rct_";

/// Number of random bytes backing each key secret (256 bits of entropy).
pub const SECRET_BYTES: usize = 32;

/// Number of encoded characters, after the literal prefix, that are safe to
/// show alongside stored key metadata.
const DISPLAY_CHARS: usize = 8;

/// Freshly generated key material.
///
/// The secret is handed to the caller exactly once; only the lookup hash and
/// display prefix may be persisted.
#[derive(Debug, Clone)]
pub struct KeyMaterial {
    /// Full plaintext secret, e.g. `rct_dGhpcyBpcyBub3QgYSByZWFsIGtleQ`.
    pub secret: String,
    /// Deterministic one-way digest of the full secret, used to locate the
    /// stored record during validation.
    pub lookup_hash: String,
    /// Literal prefix plus the first encoded characters, safe for display.
    pub display_prefix: String,
}

/// API key material generator.
///
/// Secrets are URL-safe base64 over CSPRNG bytes. The lookup hash is a plain
/// SHA-256 digest rather than a salted memory-hard derivation: the secret
/// already carries 256 bits of entropy, so the digest only has to be one-way
/// and deterministic for storage lookups.
pub struct KeyGenerator;

impl KeyGenerator {
    /// Create a new key generator instance.
    pub fn new() -> Self {
        Self
    }

    /// Generate a fresh key secret together with its lookup hash and display
    /// prefix.
    pub fn generate(&self) -> KeyMaterial {
        let mut raw = [0u8; SECRET_BYTES];
        OsRng.fill_bytes(&mut raw);

        let secret = format!("{}{}", KEY_PREFIX, URL_SAFE_NO_PAD.encode(raw));
        let lookup_hash = self.lookup_hash(&secret);
        let display_prefix = display_prefix(&secret);

        KeyMaterial {
            secret,
            lookup_hash,
            display_prefix,
        }
    }

    /// Compute the deterministic lookup hash of a key secret.
    ///
    /// The digest covers the full secret, prefix included.
    pub fn lookup_hash(&self, secret: &str) -> String {
        let digest = Sha256::digest(secret.as_bytes());
        STANDARD_NO_PAD.encode(digest)
    }

    /// Check whether a candidate has the shape of an issued key.
    ///
    /// True only if the candidate starts with the literal prefix and the
    /// remainder decodes to exactly `SECRET_BYTES` bytes. This is a cheap
    /// pre-filter; callers apply it before any storage lookup so junk input
    /// never reaches the store.
    pub fn validate_format(&self, candidate: &str) -> bool {
        let encoded = match candidate.strip_prefix(KEY_PREFIX) {
            Some(rest) => rest,
            None => return false,
        };

        match URL_SAFE_NO_PAD.decode(encoded) {
            Ok(decoded) => decoded.len() == SECRET_BYTES,
            Err(_) => false,
        }
    }

    /// Mask a secret for safe display: display prefix, an ellipsis, and the
    /// last four characters.
    pub fn mask(&self, secret: &str) -> String {
        let tail_start = secret.chars().count().saturating_sub(4);
        let tail: String = secret.chars().skip(tail_start).collect();

        format!("{}...{}", display_prefix(secret), tail)
    }
}

impl Default for KeyGenerator {
    fn default() -> Self {
        Self::new()
    }
}

fn display_prefix(secret: &str) -> String {
    secret.chars().take(KEY_PREFIX.len() + DISPLAY_CHARS).collect()
}
