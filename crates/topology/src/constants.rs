/// Smoothing group of a face with hard edges on every side.
pub const SMOOTHING_GROUP_NONE: i32 = 0;

/// First smoothing group id considered smooth.
pub const SMOOTH_RANGE_MIN: i32 = 1;

/// Last smoothing group id of the primary smooth range.
pub const SMOOTH_RANGE_MAX: i32 = 24;

/// Legacy hard range (25..=42). Older meshes tag hard faces with these ids,
/// so new groups never land in it.
pub const HARD_RANGE_MIN: i32 = 25;

/// End of the legacy hard range.
pub const HARD_RANGE_MAX: i32 = 42;

/// Sentinel for a missing vertex index.
pub const INVALID_INDEX: u32 = u32::MAX;

/// Minimum number of indices in a face.
pub const MIN_FACE_INDICES: usize = 3;
