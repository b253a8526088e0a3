//! Daily birthday and anniversary pass.
//!
//! Given the member store and a date, this crate answers "who do we greet
//! today and at what number", producing ready-to-send message drafts. The
//! monthly completion log remembers which greetings were handled so the
//! pass can re-run all month without double-greeting anyone.

mod completions;
mod dates;
mod drafts;
mod today;

pub use completions::{
    mark_anniversary_done, mark_birthday_done, unmark_anniversary_done, unmark_birthday_done,
};
pub use dates::{first_name, matches_month_day, parse_roster_date};
pub use drafts::{
    REMINDER_ID_BASE, REMINDER_ID_MAX, ReminderDraft, ReminderKind, build_reminder_drafts,
};
pub use today::{
    AnniversaryGroup, anniversaries_on, anniversary_phone, birthday_phone, birthdays_on,
    household_head,
};
