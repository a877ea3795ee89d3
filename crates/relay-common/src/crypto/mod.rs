//! Message content encryption

mod cipher;

pub use cipher::{CipherError, MessageCipher};
