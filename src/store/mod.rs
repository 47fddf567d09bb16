pub mod auth;
pub mod ponto;
pub mod slack;
pub mod workday;

pub use auth::{AuthState, AuthStore};
pub use ponto::{PontoState, PontoStore};
pub use slack::{SlackState, SlackStore};
pub use workday::{WorkdayState, WorkdayStore};
