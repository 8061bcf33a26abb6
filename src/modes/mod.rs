pub mod login;
pub mod play;

pub use login::{LoginEvent, LoginField, LoginForm};
pub use play::PlayMode;
