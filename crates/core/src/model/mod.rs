mod facet;
mod ids;
mod question;
mod session;

pub use ids::{ParseIdError, QuestionId};

pub use facet::{Facet, FacetChoice, FilterSelection};
pub use question::{MAX_OPTION_SLOTS, QuestionDraft, QuestionError, QuestionRecord};
pub use session::{
    Mistake, ScoreCard, Session, SessionQuestion, SessionSettings, SessionSettingsError,
};
