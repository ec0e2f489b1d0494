use chrono::{DateTime, Days, NaiveDate, Utc};

use crate::error::Result;
use crate::model::{RecordId, Reminder, ReminderPatch};
use crate::repository::Repository;
use crate::store::KeyValueStore;

/// Open reminders due between `today` and `today + days` inclusive, soonest first.
pub fn upcoming<'a>(
    reminders: &'a Repository<Reminder>,
    vehicle_id: Option<&RecordId>,
    today: NaiveDate,
    days: u32,
) -> Vec<&'a Reminder> {
    let until = today
        .checked_add_days(Days::new(u64::from(days)))
        .unwrap_or(NaiveDate::MAX);

    let mut due: Vec<&Reminder> = reminders
        .all(vehicle_id)
        .into_iter()
        .filter(|r| !r.completed && r.date >= today && r.date <= until)
        .collect();
    due.sort_by_key(|r| r.date);
    due
}

/// Open reminders whose due date has passed.
pub fn overdue<'a>(reminders: &[&'a Reminder], today: NaiveDate) -> Vec<&'a Reminder> {
    reminders
        .iter()
        .copied()
        .filter(|r| !r.completed && r.date < today)
        .collect()
}

/// Mark a reminder done at `now`.
pub fn complete<B: KeyValueStore + ?Sized>(
    backend: &B,
    reminders: &mut Repository<Reminder>,
    id: &RecordId,
    now: DateTime<Utc>,
) -> Result<Reminder> {
    reminders.update(
        backend,
        id,
        ReminderPatch {
            completed: Some(true),
            ..Default::default()
        },
        now,
    )
}
