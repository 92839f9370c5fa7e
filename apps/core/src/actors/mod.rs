pub mod messages;
pub mod session;

pub use session::SessionHandle;
