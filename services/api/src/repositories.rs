//! Repositories for database and cache operations

pub mod blog;
pub mod category;
pub mod draft;
pub mod product;
pub mod settings;
pub mod support;
pub mod vendor;

pub use blog::BlogRepository;
pub use category::CategoryRepository;
pub use draft::DraftRepository;
pub use product::ProductRepository;
pub use settings::SettingsRepository;
pub use support::SupportRepository;
pub use vendor::VendorRepository;
