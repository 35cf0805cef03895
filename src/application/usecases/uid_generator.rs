use rand::Rng;

/// Reserved by the platform to mean "assign a uid for me".
pub const AUTO_ASSIGN_UID: u32 = 0;

/// Exclusive upper bound: uids are positive signed 32-bit values.
pub const MAX_UID_EXCLUSIVE: u32 = i32::MAX as u32;

/// Returns a decimal uid in `[1, 2^31 - 1)`.
///
/// Draws from the calling thread's own generator, so concurrent requests never
/// share mutable random state.
pub fn new_uid() -> String {
    let uid = rand::thread_rng().gen_range(AUTO_ASSIGN_UID + 1..MAX_UID_EXCLUSIVE);
    uid.to_string()
}
