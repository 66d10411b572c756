//! Password hashing, JWT issuing/verification and the request plumbing that
//! turns a bearer token into an [`AuthenticatedUser`].

pub mod extractors;
pub mod middleware;
pub mod password;
pub mod token;

pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::{hash_password, verify_password};
pub use token::{Claims, TokenSigner};
