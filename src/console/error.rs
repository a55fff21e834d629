use hbnb_core::models::AttributeError;
use hbnb_core::storage::StorageError;
use thiserror::Error;

/// A failed command. The `Display` text is exactly what the console prints.
#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("** class name missing **")]
    ClassNameMissing,

    #[error("** class doesn't exist **")]
    ClassDoesNotExist,

    #[error("** instance id missing **")]
    InstanceIdMissing,

    #[error("** no instance found **")]
    NoInstanceFound,

    #[error("** attribute name missing **")]
    AttributeNameMissing,

    #[error("** value missing **")]
    ValueMissing,

    #[error("** attribute can't be updated **")]
    ReservedAttribute,

    #[error("** value can't be a list or a dictionary **")]
    InvalidValue,

    #[error("** {0} **")]
    Storage(#[from] StorageError),
}

impl From<AttributeError> for ConsoleError {
    fn from(e: AttributeError) -> Self {
        match e {
            AttributeError::Reserved(_) => Self::ReservedAttribute,
            AttributeError::NotScalar(_) => Self::InvalidValue,
        }
    }
}
