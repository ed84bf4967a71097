pub mod commands;
pub mod device_commands;
pub mod runtime;

pub use commands::Cli;
pub use device_commands::DeviceCommandHandler;
