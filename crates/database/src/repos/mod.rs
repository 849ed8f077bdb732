//! Database repository implementations

pub mod campaign_repository;
pub mod donation_repository;
pub mod event_repository;
pub mod organization_repository;
pub mod user_repository;
pub mod volunteer_repository;

pub use campaign_repository::CampaignRepository;
pub use donation_repository::DonationRepository;
pub use event_repository::EventRepository;
pub use organization_repository::OrganizationRepository;
pub use user_repository::UserRepository;
pub use volunteer_repository::VolunteerRepository;
