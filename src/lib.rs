pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{DisclosureError, Result};
pub use models::announcement::{CompanyAnnouncement, FundAnnouncement};
pub use models::query::{CompanyQuery, FundQuery};
pub use models::settings::ClientSettings;
pub use services::attachment::AttachmentResolver;
pub use services::disclosure_service::DisclosureClient;
