/// Largest file sent in a single request. The remote service caps request
/// bodies, so anything above this goes through a multi-part session.
pub const SINGLE_PART_MAX_BYTES: u64 = 20 * 1024 * 1024;

/// Size of every part of a multi-part upload except possibly the last one.
pub const PART_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Transfer mode of an upload session, fixed when the session is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadMode {
    SinglePart,
    MultiPart { parts_total: u32 },
}

impl UploadMode {
    /// Mode for a file of `file_size` bytes using the service limits.
    pub fn for_size(file_size: u64) -> Self {
        Self::with_limits(file_size, SINGLE_PART_MAX_BYTES, PART_SIZE_BYTES)
    }

    /// Mode for a file of `file_size` bytes with an explicit threshold and part size.
    ///
    /// Files of exactly `threshold` bytes are still single-part.
    pub fn with_limits(file_size: u64, threshold: u64, part_size: u64) -> Self {
        if file_size <= threshold {
            return UploadMode::SinglePart;
        }
        let parts = file_size.div_ceil(part_size.max(1));
        UploadMode::MultiPart {
            parts_total: u32::try_from(parts).unwrap_or(u32::MAX),
        }
    }

    pub fn parts_total(&self) -> Option<u32> {
        match self {
            UploadMode::SinglePart => None,
            UploadMode::MultiPart { parts_total } => Some(*parts_total),
        }
    }

    pub fn is_multi_part(&self) -> bool {
        matches!(self, UploadMode::MultiPart { .. })
    }

    /// Wire name of the mode.
    pub fn as_str(&self) -> &'static str {
        match self {
            UploadMode::SinglePart => "single_part",
            UploadMode::MultiPart { .. } => "multi_part",
        }
    }
}
