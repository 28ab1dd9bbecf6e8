mod mock;
mod repository;

pub use mock::{MockOtpRepository, SharedOtpStore};
pub use repository::OtpRepository;
