//! Application services for sign-in and request authentication.

mod sign_in;

pub use sign_in::{AuthServiceError, AuthServiceResult, SignInRequest, SignInService};
