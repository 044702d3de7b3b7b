pub mod create;
pub mod daemon;
pub mod health;
pub mod init;
pub mod open;
pub mod version;

pub use create::Create;
pub use daemon::Daemon;
pub use health::Health;
pub use init::Init;
pub use open::Open;
pub use version::Version;
