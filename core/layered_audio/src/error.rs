use thiserror::Error;

use crate::registry::{EntityId, HandleId};

pub type Result<T> = std::result::Result<T, AudioError>;

/// Broad classification of an [`AudioError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    NotFound,
    AlreadyExists,
    Decode,
    Unavailable,
}

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("clip index {index} out of range for collection '{collection}' ({len} clips)")]
    ClipIndexOutOfRange {
        collection: String,
        index: usize,
        len: usize,
    },

    #[error("layer index {index} out of range (max layers {max_layers})")]
    LayerIndexOutOfRange { index: usize, max_layers: usize },

    #[error("collection '{0}' has no clips")]
    EmptyCollection(String),

    #[error("a layered source needs at least one layer")]
    ZeroLayers,

    #[error("entity {0} already owns a layered source")]
    EntityAlreadyRegistered(EntityId),

    #[error("entity {0} has no layered source")]
    UnknownEntity(EntityId),

    #[error("no layered source for handle {0}")]
    UnknownHandle(HandleId),

    #[error("unsupported wav: {0}")]
    UnsupportedFormat(String),

    #[error("failed to decode wav: {0}")]
    Wav(#[from] hound::Error),

    #[error("audio command queue is full")]
    CommandQueueFull,
}

impl AudioError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ClipIndexOutOfRange { .. }
            | Self::LayerIndexOutOfRange { .. }
            | Self::EmptyCollection(_)
            | Self::ZeroLayers => ErrorKind::InvalidArgument,
            Self::UnknownEntity(_) | Self::UnknownHandle(_) => ErrorKind::NotFound,
            Self::EntityAlreadyRegistered(_) => ErrorKind::AlreadyExists,
            Self::UnsupportedFormat(_) | Self::Wav(_) => ErrorKind::Decode,
            Self::CommandQueueFull => ErrorKind::Unavailable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_errors_are_invalid_argument() {
        let err = AudioError::LayerIndexOutOfRange {
            index: 6,
            max_layers: 6,
        };
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
        assert_eq!(
            err.to_string(),
            "layer index 6 out of range (max layers 6)"
        );

        let err = AudioError::ClipIndexOutOfRange {
            collection: "footsteps".into(),
            index: 3,
            len: 2,
        };
        assert_eq!(err.kind(), ErrorKind::InvalidArgument);
    }

    #[test]
    fn lookup_errors_are_not_found() {
        assert_eq!(
            AudioError::UnknownEntity(EntityId(7)).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            AudioError::EntityAlreadyRegistered(EntityId(7)).kind(),
            ErrorKind::AlreadyExists
        );
    }
}
