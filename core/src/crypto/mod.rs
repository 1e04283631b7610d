pub mod types;
pub mod kdf;
pub mod vault;
pub mod openpgp;

pub use types::*;
pub use kdf::*;
pub use vault::*;
pub use openpgp::*;
