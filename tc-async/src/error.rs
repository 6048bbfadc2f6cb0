use miette::Diagnostic;
use thiserror::Error;

use crate::invoke::MAX_ARITY;

#[derive(Debug, Error, Diagnostic)]
pub enum AsyncCallError {
    #[error("asynchronous call packages {got} arguments; at most {max} are supported")]
    #[diagnostic(
        code(tc_async::arity_limit),
        help("split the call or pass the extra arguments through a heap record")
    )]
    ArityLimit { got: usize, max: usize },

    #[error("target declares {expected} parameters but {got} arguments were packaged")]
    #[diagnostic(code(tc_async::arity_mismatch))]
    ArityMismatch { expected: usize, got: usize },

    #[error("failed to spawn a thread for asynchronous call #{id}")]
    #[diagnostic(
        code(tc_async::spawn),
        help("the process is out of thread resources; it cannot continue")
    )]
    Spawn {
        id: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid spawn configuration: {message}")]
    #[diagnostic(code(tc_async::config))]
    Config { message: String },

    #[error("malformed spawn configuration")]
    #[diagnostic(code(tc_async::config_parse))]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T, E = AsyncCallError> = std::result::Result<T, E>;

impl AsyncCallError {
    pub(crate) fn arity_limit(got: usize) -> Self {
        AsyncCallError::ArityLimit { got, max: MAX_ARITY }
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        AsyncCallError::Config {
            message: message.into(),
        }
    }
}

/// Report an unrecoverable runtime condition and terminate the process.
///
/// A half-issued asynchronous call cannot be undone, so resource exhaustion
/// on the spawn path ends here rather than returning to emitted code.
pub fn fatal(err: AsyncCallError) -> ! {
    log::error!("fatal asynchronous call failure: {err}");
    eprintln!("{:?}", miette::Report::new(err));
    std::process::abort()
}
