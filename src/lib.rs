mod error;
mod gate;
mod qr;
mod routes;
mod types;

pub use error::*;
pub use gate::*;
pub use qr::*;
pub use routes::*;
pub use types::*;
