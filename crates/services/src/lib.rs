#![forbid(unsafe_code)]

pub mod celebration;
pub mod config;
pub mod error;
pub mod identity;
pub mod progress;
pub mod quiz;

pub use quiz_core::Clock;

pub use celebration::{Celebration, CelebrationHandle, CelebrationSettings, ConfettiBurst};
pub use config::QuizConfig;
pub use error::{ConfigError, IdentityError, ProgressSinkError, QuizError};
pub use identity::{
    AnonymousIdentity, Identity, IdentityProvider, IdentitySource, TokenIdentity,
    resolve_identity,
};
pub use progress::{
    HttpProgressSink, LogProgressSink, ProgressRecord, ProgressReporter, ProgressSink,
};
pub use quiz::{QuizPhase, QuizResults, QuizService};
