pub mod limits;
pub mod token;

pub use limits::{RateLimitHeaders, RateLimitSnapshot};
pub use token::TokenResponse;
