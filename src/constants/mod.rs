mod logging;
pub use logging::*;

mod network;
pub use network::*;

mod solana_transaction;
pub use solana_transaction::*;

mod token;
pub use token::*;
