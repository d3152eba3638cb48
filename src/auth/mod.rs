//! Authentication tokens
//!
//! - `token` - Access/refresh token pairs carrying the account's `user_level`

pub mod token;

pub use token::{Claims, TokenIssuer, TokenPair, TokenType, UserLevel};
