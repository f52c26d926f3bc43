pub mod executive;
pub mod session_user;

pub use executive::Executive;
pub use session_user::SessionUser;
