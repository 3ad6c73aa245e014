pub mod image;
pub use image::{ImageError, ImageService};

pub mod mailer;
pub use mailer::{MailError, MailerService};

pub mod reset_token;
pub use reset_token::{ResetTokenService, TokenError};
