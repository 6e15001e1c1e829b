use crate::model::ClassificationSession;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display};

/// How far the three classifiers' top predictions coincide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, Serialize, Deserialize)]
pub enum AgreementLabel {
    #[strum(serialize = "Full agreement")]
    FullAgreement,
    #[strum(serialize = "Partial agreement")]
    PartialAgreement,
    #[strum(serialize = "Disagreement")]
    Disagreement,
}

impl AgreementLabel {
    /// CSS modifier used for badges.
    pub fn badge_class(self) -> &'static str {
        match self {
            AgreementLabel::FullAgreement => "badge-agree",
            AgreementLabel::PartialAgreement => "badge-partial",
            AgreementLabel::Disagreement => "badge-disagree",
        }
    }
}

pub fn classify(predictions: [&str; 3]) -> AgreementLabel {
    let [p0, p1, p2] = predictions;
    match (p0 == p1, p1 == p2, p0 == p2) {
        (true, true, _) => AgreementLabel::FullAgreement,
        (false, false, false) => AgreementLabel::Disagreement,
        _ => AgreementLabel::PartialAgreement,
    }
}

pub fn classify_session(session: &ClassificationSession) -> AgreementLabel {
    classify(session.predicted_categories())
}
