//! Errors returned at the AEAD API boundary. No plaintext or key
//! material is ever exposed to the caller before a tag has verified.

use thiserror::Error;

#[derive(Error, Copy, Clone, Debug, Eq, PartialEq)]
pub enum AeadError {
    #[error("authentication tag did not verify")]
    BadTag,
    #[error("input too short to contain a valid record")]
    ShortInput,
}
