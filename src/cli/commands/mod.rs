//! One module per subcommand.

pub mod add;
#[cfg(feature = "audit-log")]
pub mod audit_cmd;
pub mod delete;
pub mod init;
pub mod list;
pub mod login;
pub mod register;
pub mod update;
pub mod whoami;
