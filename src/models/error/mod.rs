mod keystore;
pub use keystore::*;

mod token_manager;
pub use token_manager::*;
