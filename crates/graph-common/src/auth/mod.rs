//! Authentication utilities

mod jwt;

pub use jwt::{Claims, IdentityVerifier, JwtService, TokenType};
