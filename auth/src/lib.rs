//! Authentication primitives library
//!
//! Provides reusable authentication infrastructure:
//! - Password hashing (Argon2id)
//! - Opaque session token generation
//!
//! The service defines its own authentication flow and adapts these
//! implementations. Keeping the primitives here avoids coupling domain
//! logic to a particular hashing scheme or token shape.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("wrong_password", &hash));
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::SessionToken;
//!
//! let token = SessionToken::generate();
//! assert_eq!(token.as_str().len(), 32);
//! ```

pub mod password;
pub mod token;

// Re-export commonly used items
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use token::SessionToken;
