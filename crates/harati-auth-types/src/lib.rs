//! Session plumbing shared by Harati Store crates.
//!
//! Provides the session cookie builders, the `SessionCookies` extractor and
//! local inspection of provider-issued access tokens.

pub mod cookie;
pub mod session;
pub mod token;
