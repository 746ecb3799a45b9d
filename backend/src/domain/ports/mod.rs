//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod donation_repository;
mod image_probe;
mod login_service;
mod payment_gateway;
mod post_catalogue;

#[cfg(test)]
pub use donation_repository::MockDonationRepository;
pub use donation_repository::{DonationRepository, DonationStoreError, MemoryDonationLedger};
#[cfg(test)]
pub use image_probe::MockImageProbe;
pub use image_probe::{FixtureImageProbe, ImageProbe, needs_probe};
pub use login_service::{ConfiguredLoginService, DisabledLoginService, LoginService};
#[cfg(test)]
pub use payment_gateway::MockPaymentGateway;
pub use payment_gateway::{
    FixturePaymentGateway, PaymentGateway, PaymentGatewayError, VerifiedCharge,
};
#[cfg(test)]
pub use post_catalogue::MockPostCatalogue;
pub use post_catalogue::{FixturePostCatalogue, PostCatalogue, PostCatalogueError};
