// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Username/password accounts with stateless bearer tokens.
//!
//! ## Auth Flow
//!
//! 1. `POST /api/auth/signup` stores an Argon2id digest of the password
//! 2. `POST /api/auth/signin` checks the password and returns an HS256 JWT
//! 3. Every later request sends `Authorization: Bearer <token>`
//! 4. The server:
//!    - Verifies the signature with its own secret
//!    - Rejects tokens at or past `exp`
//!    - Resolves `sub` (the username) to a stored identity
//!
//! ## Security
//!
//! - Plaintext passwords are never stored or logged
//! - Token failures all render one generic 401 body
//! - Unknown usernames and wrong passwords are indistinguishable, in body and in cost

pub mod claims;
pub mod error;
pub mod extractor;
pub mod password;
pub mod session;
pub mod token;

pub use claims::Claims;
pub use error::{AuthError, TokenError, Unauthenticated};
pub use extractor::{Auth, Session};
pub use password::{PasswordDigest, PasswordError, PasswordHasher};
pub use session::{establish, SessionContext};
pub use token::TokenService;
