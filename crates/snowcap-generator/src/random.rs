use uuid::Uuid;

/// Opaque, unordered identifiers backed by random v4 UUIDs.
///
/// There is no numeric form, so only string output is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomUuid;

impl RandomUuid {
    /// Returns a fresh UUID in its hyphenated lower-case form.
    pub fn next_id_string(&self) -> String {
        Uuid::new_v4().to_string()
    }
}
