pub mod routes;
pub mod state;

pub use routes::{router, serve};
pub use state::AppState;
