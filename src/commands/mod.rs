pub mod deploy;
pub mod validate;

pub use deploy::DeployCommand;
pub use validate::ValidateCommand;
