//! Auth integration for organizations.
//!
//! Authentication itself happens upstream. The authenticator places a
//! [`Principal`](crate::organizations::Principal) in the request extensions
//! and handlers extract it from there.

mod extractors;
