//! Small shared helpers.

/// Current unix timestamp in seconds.
pub fn current_timestamp() -> u64 {
	chrono::Utc::now().timestamp() as u64
}

/// Truncates a hex digest for log output: first 10 characters plus "..".
pub fn truncate_digest(digest: &str) -> String {
	if digest.len() <= 10 {
		digest.to_string()
	} else {
		format!("{}..", &digest[..10])
	}
}
