//! Email adapter - alert delivery through the Resend API.

mod resend_mailer;

pub use resend_mailer::{ResendAlertMailer, ResendConfig};
