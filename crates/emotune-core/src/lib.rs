//! Emotune core: accounts, the mood song table and the emotion
//! classifier boundary. Shared by the web server and the CLI.

pub mod accounts;
pub mod detector;
pub mod mood;
pub mod password;
