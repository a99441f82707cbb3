//! Credential primitives library
//!
//! Provides the secret-handling building blocks used by the identity service:
//! - Password hashing (Argon2id, salted PHC strings)
//! - One-time token generation (activation and password-reset keys)
//!
//! Neither type holds state beyond its parameters, so both can be shared freely
//! between request handlers.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## One-time Tokens
//! ```
//! use auth::TokenGenerator;
//!
//! let generator = TokenGenerator::new();
//! let key = generator.generate().unwrap();
//! assert_eq!(key.len(), 43);
//! assert!(key.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
//! ```

pub mod password;
pub mod token;

// Re-export commonly used items
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::TokenError;
pub use token::TokenGenerator;
