//! Per-user rolling conversation memory.
//!
//! Records live in a fixed number of shards, each behind its own mutex, so users hashed to
//! different shards never contend. Every read-modify-write of a record (the idle check, the
//! reset, the append) runs under its shard lock.

use std::{
	collections::{HashMap, VecDeque},
	sync::{Mutex, MutexGuard, PoisonError},
	time::Duration,
};

use ahash::RandomState;
use tokio::time::Instant;

/// Exchanges kept per user unless configured otherwise.
pub const WINDOW_SIZE: usize = 3;
/// Idle time after which a session starts over, unless configured otherwise.
pub const SESSION_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// One user question and the answer given to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
	pub user: String,
	pub bot: String,
}

#[derive(Debug, Clone)]
pub struct SessionRecord {
	pub user_id: String,
	/// Oldest first, at most the store's window size.
	pub history: VecDeque<Exchange>,
	pub last_activity: Instant,
}
impl SessionRecord {
	fn new(user_id: &str, now: Instant) -> Self {
		Self { user_id: user_id.to_string(), history: VecDeque::new(), last_activity: now }
	}

	/// Renders the last `max_turns` exchanges, oldest first, as `User:`/`Bot:` lines.
	pub fn history_text(&self, max_turns: usize) -> String {
		let skip = self.history.len().saturating_sub(max_turns);

		self.history
			.iter()
			.skip(skip)
			.map(|exchange| format!("User: {}\nBot: {}", exchange.user, exchange.bot))
			.collect::<Vec<_>>()
			.join("\n")
	}
}

pub struct SessionStore {
	shards: Box<[Mutex<HashMap<String, SessionRecord>>]>,
	hasher: RandomState,
	window_size: usize,
	timeout: Duration,
}
impl SessionStore {
	pub fn new(window_size: usize, timeout: Duration, shards: usize) -> Self {
		let shards = (0..shards.max(1)).map(|_| Mutex::new(HashMap::new())).collect();

		Self { shards, hasher: RandomState::new(), window_size: window_size.max(1), timeout }
	}

	pub fn from_config(cfg: &ragroute_config::Session) -> Self {
		Self::new(cfg.window_size, Duration::from_secs(cfg.timeout_secs), cfg.shards)
	}

	pub fn window_size(&self) -> usize {
		self.window_size
	}

	pub fn timeout(&self) -> Duration {
		self.timeout
	}

	/// Fetches the user's record, creating it on first use and starting it over when it has
	/// been idle for longer than the timeout.
	pub fn get(&self, user_id: &str) -> SessionRecord {
		self.with_record(user_id, |record| record.clone())
	}

	/// Appends an exchange, evicting the oldest ones beyond the window.
	pub fn append_turn(&self, user_id: &str, user_text: &str, bot_text: &str) {
		let window_size = self.window_size;

		self.with_record(user_id, |record| {
			record
				.history
				.push_back(Exchange { user: user_text.to_string(), bot: bot_text.to_string() });

			while record.history.len() > window_size {
				record.history.pop_front();
			}
		});
	}

	pub fn recent_history_text(&self, user_id: &str, max_turns: usize) -> String {
		self.with_record(user_id, |record| record.history_text(max_turns))
	}

	/// Drops every record idle for longer than the timeout and returns how many were dropped.
	pub fn sweep_idle(&self) -> usize {
		let now = Instant::now();
		let mut removed = 0;

		for shard in self.shards.iter() {
			let mut records = lock(shard);
			let before = records.len();

			records.retain(|_, record| !is_expired(record, now, self.timeout));

			removed += before - records.len();
		}

		removed
	}

	pub fn len(&self) -> usize {
		self.shards.iter().map(|shard| lock(shard).len()).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	fn with_record<T>(&self, user_id: &str, f: impl FnOnce(&mut SessionRecord) -> T) -> T {
		let now = Instant::now();
		let mut records = lock(self.shard(user_id));
		let record =
			records.entry(user_id.to_string()).or_insert_with(|| SessionRecord::new(user_id, now));

		if is_expired(record, now, self.timeout) {
			tracing::debug!(user_id, "Session idle past timeout; starting over.");

			*record = SessionRecord::new(user_id, now);
		}

		record.last_activity = now;

		f(record)
	}

	fn shard(&self, user_id: &str) -> &Mutex<HashMap<String, SessionRecord>> {
		let index = (self.hasher.hash_one(user_id) % self.shards.len() as u64) as usize;

		&self.shards[index]
	}
}

impl Default for SessionStore {
	fn default() -> Self {
		Self::new(WINDOW_SIZE, SESSION_TIMEOUT, 16)
	}
}

fn is_expired(record: &SessionRecord, now: Instant, timeout: Duration) -> bool {
	now.duration_since(record.last_activity) > timeout
}

// Records stay structurally valid if a holder panicked mid-update, so poisoning is ignored.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
	mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn history_text_renders_oldest_first() {
		let store = SessionStore::default();

		store.append_turn("u1", "경영학과 알려줘", "경영학과는 ...");
		store.append_turn("u1", "그건 어때?", "전망이 ...");

		assert_eq!(
			store.recent_history_text("u1", 3),
			"User: 경영학과 알려줘\nBot: 경영학과는 ...\nUser: 그건 어때?\nBot: 전망이 ..."
		);
		assert_eq!(store.recent_history_text("u1", 1), "User: 그건 어때?\nBot: 전망이 ...");
	}

	#[test]
	fn takes_window_and_timeout_from_config() {
		let cfg = ragroute_config::Session { window_size: 5, timeout_secs: 42, ..Default::default() };
		let store = SessionStore::from_config(&cfg);

		assert_eq!(store.window_size(), 5);
		assert_eq!(store.timeout(), Duration::from_secs(42));
	}

	#[test]
	fn unknown_user_gets_fresh_record() {
		let store = SessionStore::default();
		let record = store.get("nobody");

		assert_eq!(record.user_id, "nobody");
		assert!(record.history.is_empty());
		assert_eq!(store.len(), 1);
	}
}
