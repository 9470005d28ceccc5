pub mod builder;
pub mod gateway;
pub mod models;
pub mod time;
pub mod token;

pub use builder::build_event_request;
pub use gateway::{event_body, parse_event_listing, CalendarGateway};
pub use models::{EventRequest, EventSummary, ReminderLead};
pub use token::{FileTokenStore, TokenManager, TokenStore};
