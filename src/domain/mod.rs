mod waitlist_email;
mod waitlist_entry;
mod waitlist_status;

pub use waitlist_email::WaitlistEmail;
pub use waitlist_entry::WaitlistEntry;
pub use waitlist_status::WaitlistStatus;
