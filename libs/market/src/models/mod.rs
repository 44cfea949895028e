//! Marketplace records as stored in PostgreSQL

pub mod admin;
pub mod blog;
pub mod category;
pub mod product;
pub mod settings;
pub mod support;
pub mod vendor;

pub use admin::{Admin, AdminProfile};
pub use blog::BlogPost;
pub use category::Category;
pub use product::{PLACEHOLDER_IMAGE_URL, Product, ProductCondition, ProductImage};
pub use settings::SiteSetting;
pub use support::{SupportRequest, SupportStatus};
pub use vendor::{Vendor, VendorInvite};
