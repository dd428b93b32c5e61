// Unless otherwise noted, this file is released and thus subject to the
// terms of the Mozilla Public License Version 2.0 (MPL2). Also, it is
// "Incompatible With Secondary Licenses", as defined by the MPL2.
// If a copy of the MPL2 was not distributed with this file, you can
// obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Errors from loading or producing a save state.
#[derive(Debug, Error)]
pub enum StateError {
    #[cfg(feature = "serde")]
    #[error("save state encoding failed: {0}")]
    Encoding(#[from] bincode::Error),
    #[error("save state I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// Serialize an object that can be loaded with [deserialize].
/// It is (optionally zstd-compressed) bincode.
#[cfg(all(feature = "serde", feature = "zstd"))]
pub fn serialize<T: serde::Serialize>(thing: &T, with_zstd: bool) -> Result<Vec<u8>, StateError> {
    if with_zstd {
        let mut dest = vec![];
        let mut writer = zstd::stream::Encoder::new(&mut dest, 3)?;
        bincode::serialize_into(&mut writer, thing)?;
        writer.finish()?;
        Ok(dest)
    } else {
        Ok(bincode::serialize(thing)?)
    }
}

/// Deserialize an object that was made with [serialize].
/// It is (optionally zstd-compressed) bincode.
#[cfg(all(feature = "serde", feature = "zstd"))]
pub fn deserialize<T: serde::de::DeserializeOwned>(
    state: &[u8],
    with_zstd: bool,
) -> Result<T, StateError> {
    if with_zstd {
        let decoder = zstd::stream::Decoder::new(state)?;
        Ok(bincode::deserialize_from(decoder)?)
    } else {
        Ok(bincode::deserialize(state)?)
    }
}

/// Serialize an object that can be loaded with [deserialize].
/// It is bincode; compression needs the `zstd` feature.
#[cfg(all(feature = "serde", not(feature = "zstd")))]
pub fn serialize<T: serde::Serialize>(thing: &T, _with_zstd: bool) -> Result<Vec<u8>, StateError> {
    Ok(bincode::serialize(thing)?)
}

/// Deserialize an object that was made with [serialize].
/// It is bincode; compression needs the `zstd` feature.
#[cfg(all(feature = "serde", not(feature = "zstd")))]
pub fn deserialize<T: serde::de::DeserializeOwned>(
    state: &[u8],
    _with_zstd: bool,
) -> Result<T, StateError> {
    Ok(bincode::deserialize(state)?)
}
