mod error;
pub use error::*;

mod account;
pub use account::*;

mod key_file;
pub use key_file::*;

mod request;
pub use request::*;

mod transaction;
pub use transaction::*;
