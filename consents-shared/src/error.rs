use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsentsErrorCategory {
    /// nothing to connect to, or a required value is missing
    Configuration,
    /// the host is missing tooling we need, like the psql client
    Environment,
    /// the database client ran and reported a failure
    Execution,
}

impl Display for ConsentsErrorCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConsentsErrorCategory::Configuration => f.write_str("Configuration Error"),
            ConsentsErrorCategory::Environment => f.write_str("Environment Error"),
            ConsentsErrorCategory::Execution => f.write_str("Execution Error"),
        }
    }
}

#[derive(Debug)]
pub struct ConsentsError {
    /// the category of error
    category: ConsentsErrorCategory,
    /// a message associated with this error
    message: String,
    /// an optional error that caused this one
    cause: Option<Box<dyn Error>>,
}

impl ConsentsError {
    fn new<MsgT: Into<String>>(category: ConsentsErrorCategory, message: MsgT) -> Self {
        Self {
            category,
            message: message.into(),
            cause: None
        }
    }

    pub fn configuration<MsgT: Into<String>>(msg: MsgT) -> Self {
        Self::new(ConsentsErrorCategory::Configuration, msg)
    }

    pub fn environment<MsgT: Into<String>>(msg: MsgT) -> Self {
        Self::new(ConsentsErrorCategory::Environment, msg)
    }

    pub fn execution<MsgT: Into<String>>(msg: MsgT) -> Self {
        Self::new(ConsentsErrorCategory::Execution, msg)
    }

    pub fn with_cause<B: Into<Box<dyn Error>>>(mut self, cause: B) -> Self {
        self.cause = Some(cause.into());
        self
    }

    pub fn category(&self) -> ConsentsErrorCategory {
        self.category
    }
    pub fn message(&self) -> &str {
        &self.message
    }
    pub fn inner_cause(&self) -> &Option<Box<dyn Error>> {
        &self.cause
    }
}

impl Display for ConsentsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_fmt(format_args!("{}: {}", self.category, self.message))?;
        if let Some(cause) = &self.cause {
            f.write_fmt(format_args!("\ncaused by: {}", cause))?;
        }

        Ok(())
    }
}

impl Error for ConsentsError {}

pub type ConsentsResult<T> = Result<T, ConsentsError>;
