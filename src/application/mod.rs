pub mod browser;
pub mod error;
pub mod preview;
pub mod publish;
pub mod repos;
pub mod sites;
pub mod webhook;
