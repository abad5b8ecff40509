//! Credential primitives library
//!
//! Provides reusable credential infrastructure for services:
//! - Password hashing (Argon2id)
//! - API key generation, lookup hashing, and format validation
//!
//! Each service defines its own authentication traits and adapts these implementations.
//! This avoids coupling services through shared domain logic while reducing code duplication.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let record = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &record).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## API Keys
//! ```
//! use auth::KeyGenerator;
//!
//! let generator = KeyGenerator::new();
//! let material = generator.generate();
//!
//! // The secret is shown to the caller exactly once.
//! assert!(material.secret.starts_with("rct_"));
//! assert!(generator.validate_format(&material.secret));
//!
//! // Only the lookup hash is stored; recomputing it finds the record again.
//! assert_eq!(generator.lookup_hash(&material.secret), material.lookup_hash);
//! ```

pub mod apikey;
pub mod password;

// Re-export commonly used items
pub use apikey::KeyGenerator;
pub use apikey::KeyMaterial;
pub use apikey::KEY_PREFIX;
pub use password::PasswordError;
pub use password::PasswordHasher;
