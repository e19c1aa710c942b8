#![forbid(unsafe_code)]

pub mod builder;
pub mod catalog;
pub mod filter;
pub mod model;
pub mod report;
pub mod runner;
pub mod time;

pub use builder::SessionBuilder;
pub use catalog::QuestionCatalog;
pub use filter::{apply_filter, facet_values};
pub use report::{ResultSummary, Tier, summarize};
pub use runner::{Advance, AnswerOutcome, RunnerState, SessionRunner};
pub use time::Clock;
