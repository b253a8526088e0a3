pub mod export;
pub mod family;
pub mod household;
pub mod import;
pub mod init;
pub mod map;
pub mod member;
pub mod plot;
pub mod reminders;
pub mod serve;
pub mod summary;
