//! First-login onboarding gate.

use crate::Session;

/// The onboarding survey page.
pub const SURVEY_PATH: &str = "/survey";

/// Paths exempt from the survey redirect. Auth flows and the survey
/// itself must stay reachable or a first-time user could never
/// complete (or escape) onboarding.
const ALLOWED_PATHS: [&str; 5] = [
    "/signin",
    "/signup",
    "/google-signin",
    SURVEY_PATH,
    "/email-verify",
];

/// Outcome of one survey-gate evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurveyDecision {
    /// Render the requested content.
    Render,
    /// Block the requested content and navigate to [`SURVEY_PATH`].
    ///
    /// The caller is expected to issue the navigation *after* the
    /// current frame (the original issues it from a post-render
    /// effect), so one frame renders nothing.
    RedirectToSurvey,
}

/// Gate forcing exactly-once onboarding for new accounts.
///
/// Triggers only on the very first login (`login_count == 1`) of an
/// unsurveyed user. An account that skipped the survey and logs in
/// again (`login_count >= 2`) is never re-prompted through this
/// mechanism; that is deliberate product behavior, not an oversight.
///
/// # Example
///
/// ```
/// use artjourney_auth::{Session, SurveyDecision, SurveyGate};
/// use artjourney_types::{RoleCode, User};
///
/// let user = User {
///     id: "u".into(), email: "e".into(), name: "n".into(),
///     avatar: None, status: None,
///     login_count: 1, is_surveyed: false, token: "t".into(),
/// };
/// let session = Session::authenticated(user, RoleCode::Learner);
///
/// assert_eq!(SurveyGate::evaluate(&session, "/library"), SurveyDecision::RedirectToSurvey);
/// assert_eq!(SurveyGate::evaluate(&session, "/survey"), SurveyDecision::Render);
/// ```
pub struct SurveyGate;

impl SurveyGate {
    /// Evaluates the gate for one navigation.
    #[must_use]
    pub fn evaluate(session: &Session, path: &str) -> SurveyDecision {
        if Self::needs_survey(session) && !ALLOWED_PATHS.contains(&path) {
            SurveyDecision::RedirectToSurvey
        } else {
            SurveyDecision::Render
        }
    }

    /// Returns `true` for a first-login user who has not completed the
    /// survey.
    #[must_use]
    pub fn needs_survey(session: &Session) -> bool {
        session
            .user()
            .is_some_and(|user| user.is_first_login() && !user.is_surveyed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use artjourney_types::{RoleCode, User};

    fn session(login_count: u32, is_surveyed: bool) -> Session {
        let user = User {
            id: "u-1".into(),
            email: "u@example.com".into(),
            name: "U".into(),
            avatar: None,
            status: None,
            login_count,
            is_surveyed,
            token: "tok".into(),
        };
        Session::authenticated(user, RoleCode::Learner)
    }

    #[test]
    fn first_login_unsurveyed_is_redirected() {
        assert_eq!(
            SurveyGate::evaluate(&session(1, false), "/library"),
            SurveyDecision::RedirectToSurvey
        );
    }

    #[test]
    fn survey_path_itself_renders() {
        assert_eq!(
            SurveyGate::evaluate(&session(1, false), SURVEY_PATH),
            SurveyDecision::Render
        );
    }

    #[test]
    fn allow_listed_auth_paths_render() {
        for path in ["/signin", "/signup", "/google-signin", "/email-verify"] {
            assert_eq!(
                SurveyGate::evaluate(&session(1, false), path),
                SurveyDecision::Render,
                "path: {path}"
            );
        }
    }

    #[test]
    fn surveyed_first_login_renders() {
        assert_eq!(
            SurveyGate::evaluate(&session(1, true), "/library"),
            SurveyDecision::Render
        );
    }

    #[test]
    fn second_login_never_prompts_even_if_unsurveyed() {
        assert_eq!(
            SurveyGate::evaluate(&session(2, false), "/library"),
            SurveyDecision::Render
        );
        assert_eq!(
            SurveyGate::evaluate(&session(10, false), "/library"),
            SurveyDecision::Render
        );
    }

    #[test]
    fn anonymous_session_renders() {
        assert_eq!(
            SurveyGate::evaluate(&Session::anonymous(), "/library"),
            SurveyDecision::Render
        );
        assert!(!SurveyGate::needs_survey(&Session::anonymous()));
    }
}
