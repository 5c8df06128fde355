//! Async trait seams for the two external collaborators
mod directory;
mod vault;

pub use directory::DirectoryClient;
pub use vault::{SecretPage, VaultClient};
