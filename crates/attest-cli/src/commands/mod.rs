pub mod checks;
pub mod init;
pub mod verify;
