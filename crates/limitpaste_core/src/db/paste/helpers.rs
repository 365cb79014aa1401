//! Row encoding helpers shared by paste storage operations.

use crate::error::AppError;
use crate::models::paste::Paste;

pub(crate) fn deserialize_paste(bytes: &[u8]) -> Result<Paste, AppError> {
    Ok(bincode::deserialize(bytes)?)
}

pub(crate) fn serialize_paste(paste: &Paste) -> Result<Vec<u8>, AppError> {
    Ok(bincode::serialize(paste)?)
}
