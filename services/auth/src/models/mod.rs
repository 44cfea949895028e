//! Authentication service models

pub mod admin;

pub use admin::{
    CreateAdminRequest, LoginRequest, LoginResponse, LogoutRequest, NewAdmin,
    RefreshTokenRequest, RefreshTokenResponse,
};
