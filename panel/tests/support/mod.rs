//! Shared helpers for panel integration tests.
//!
//! Integration tests compile as separate crates under `panel/tests/`; this
//! module holds the seeded directory data and the adjustable clock they share.
#![allow(dead_code, reason = "each test crate uses a different subset")]

use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use panel::domain::{EpochMillis, UserId, UserRecord};

/// Fixed starting instant for every test clock.
pub const START_MS: i64 = 1_700_000_000_000;

const NAMES: [(&str, &str); 12] = [
    ("George", "Bluth"),
    ("Janet", "Weaver"),
    ("Emma", "Wong"),
    ("Eve", "Holt"),
    ("Charles", "Morris"),
    ("Tracey", "Ramos"),
    ("Michael", "Lawson"),
    ("Lindsay", "Ferguson"),
    ("Tobias", "Funke"),
    ("Byron", "Fields"),
    ("George", "Edwards"),
    ("Rachel", "Howell"),
];

/// Twelve records with ids 1..=12, shaped like the public demo directory.
pub fn seeded_records() -> Vec<UserRecord> {
    (1_u64..)
        .zip(NAMES)
        .map(|(id, (first, last))| UserRecord {
            id: UserId::new(id).expect("seed ids are positive"),
            first_name: first.to_owned(),
            last_name: last.to_owned(),
            email: format!("{}.{}@reqres.in", first.to_lowercase(), last.to_lowercase()),
            avatar_url: format!("https://reqres.in/img/faces/{id}-image.jpg"),
        })
        .collect()
}

/// Clock that only moves when told to.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl Default for MutableClock {
    fn default() -> Self {
        let start = Utc
            .timestamp_millis_opt(START_MS)
            .single()
            .expect("valid start instant");
        Self(Mutex::new(start))
    }
}

impl MutableClock {
    /// Move forward by `seconds`.
    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    /// Current instant as epoch milliseconds.
    pub fn now_millis(&self) -> EpochMillis {
        EpochMillis::from_datetime(*self.lock_clock())
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}
