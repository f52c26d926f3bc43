//! Session tokens, cookie sessions and admin privilege.

pub mod claims;
pub mod gate;
pub mod jwt;
pub mod provider;
pub mod secret;
pub mod session;

pub use claims::{Identity, NewSession, SessionClaims};
pub use gate::{AuthorizationGate, DbPrivilegeDirectory, PrivilegeDirectory, PrivilegeRecord};
pub use jwt::{SessionTokenCodec, TokenRejection};
pub use provider::{IdentityProvider, OAuthIdentityProvider, ProviderIdentity};
pub use secret::{DbSecretSource, MemorySecretSource, SecretSource, SigningSecret, StaticSecret};
pub use session::{Rejection, Session, SessionError, SessionManager, SessionOutcome};
