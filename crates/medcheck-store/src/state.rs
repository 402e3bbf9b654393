//! The application state store and its action handlers.
//!
//! All mutable state lives here and is touched only through the handlers
//! below. Handlers take `&mut self`, so mutations never interleave; the one
//! asynchronous operation (the analysis round-trip) is decomposed into
//! `begin_analysis` / `complete_analysis` / `fail_analysis` so that each
//! mutation batch is synchronous and all-or-nothing.

use std::collections::HashSet;

use chrono::Utc;
use medcheck_ai::{ClaimAnalyzer, ImageAttachment};
use medcheck_core::{
    Comment, CommunityPost, PatientQuestion, Role, TrendingTopic, User, Verdict, new_id,
};
use tracing::{info, warn};
use xxhash_rust::xxh3::Xxh3;

use crate::StoreError;

/// Verdict history retains at most this many entries, newest first.
pub const HISTORY_LIMIT: usize = 5;

/// The single user-facing notice for any analysis failure.
pub const ANALYSIS_FAILED_NOTICE: &str = "Analysis failed. Please try again.";

/// Active view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Hub,
    Wellness,
    Portal,
}

/// Sign-in form fields. Nothing is verified server-side; the store fabricates
/// an identity from whatever was submitted.
#[derive(Debug, Clone)]
pub struct SignInForm {
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Receipt for a claim admitted past validation and duplicate checks.
///
/// Returned by [`AppState::begin_analysis`] and consumed by
/// [`AppState::complete_analysis`] or [`AppState::fail_analysis`].
#[derive(Debug)]
pub struct AnalysisTicket {
    claim: String,
    fingerprint: u64,
}

impl AnalysisTicket {
    pub fn claim(&self) -> &str {
        &self.claim
    }
}

/// All mutable application state. Process-local; lost on exit.
#[derive(Debug, Default)]
pub struct AppState {
    pub(crate) session: Option<User>,
    pub(crate) active_tab: Tab,
    pub(crate) is_loading: bool,
    pub(crate) current_verdict: Option<Verdict>,
    pub(crate) history: Vec<Verdict>,
    pub(crate) trending: Vec<TrendingTopic>,
    pub(crate) posts: Vec<CommunityPost>,
    pub(crate) questions: Vec<PatientQuestion>,
    pub(crate) in_flight: HashSet<u64>,
    pub(crate) last_error: Option<String>,
}

impl AppState {
    /// An empty store: no session, no seed content.
    pub fn new() -> Self {
        Self::default()
    }

    // ── Session ──

    /// Fabricate a session identity from the submitted form. Always succeeds
    /// and replaces any existing session.
    ///
    /// Blank names fall back to a placeholder; professionals are marked
    /// verified and default to the Dermatology specialty.
    pub fn sign_in(&mut self, form: SignInForm) -> &User {
        let professional = form.role.is_professional();
        let name = if form.name.trim().is_empty() {
            if professional { "Dr. Sarah" } else { "Alex" }.to_string()
        } else {
            form.name
        };
        let role = match form.role {
            Role::Professional {
                license_number,
                specialty,
            } => Role::Professional {
                license_number,
                specialty: specialty.or_else(|| Some("Dermatology".to_string())),
            },
            Role::Patient => Role::Patient,
        };
        let user = User {
            id: new_id(),
            name,
            email: form.email,
            role,
            verified: professional,
        };
        info!(user = %user.name, professional, "signed in");
        &*self.session.insert(user)
    }

    // ── Analysis ──

    /// Admit a claim for analysis: validates the text-or-image rule, rejects
    /// a duplicate of an in-flight request, and raises the loading flag.
    pub fn begin_analysis(
        &mut self,
        claim_text: &str,
        image: Option<&ImageAttachment>,
    ) -> Result<AnalysisTicket, StoreError> {
        if claim_text.trim().is_empty() && image.is_none() {
            return Err(StoreError::EmptyClaim);
        }
        let fingerprint = request_fingerprint(claim_text, image);
        if !self.in_flight.insert(fingerprint) {
            warn!(claim = claim_text, "duplicate analysis rejected");
            return Err(StoreError::AlreadyInFlight);
        }
        self.is_loading = true;
        self.last_error = None;
        Ok(AnalysisTicket {
            claim: claim_text.to_string(),
            fingerprint,
        })
    }

    /// Apply a successful analysis in one synchronous mutation batch: set the
    /// current verdict, prepend it to the capped history, and, for patient
    /// sessions, queue a new OPEN portal question carrying the verdict.
    pub fn complete_analysis(&mut self, ticket: AnalysisTicket, verdict: Verdict) -> &Verdict {
        self.in_flight.remove(&ticket.fingerprint);
        self.is_loading = false;

        self.history.insert(0, verdict.clone());
        self.history.truncate(HISTORY_LIMIT);

        if let Some(user) = self.session.as_ref().filter(|u| !u.role.is_professional()) {
            let question = PatientQuestion {
                id: new_id(),
                user_id: user.id.clone(),
                user_name: user.name.clone(),
                text: ticket.claim,
                timestamp: Utc::now(),
                verdict: verdict.clone(),
                doctor_response: None,
            };
            info!(question = %question.id, "patient question queued for clinician review");
            self.questions.insert(0, question);
        }

        &*self.current_verdict.insert(verdict)
    }

    /// Record a failed analysis: release the in-flight slot, lower the
    /// loading flag, and surface the generic notice. Everything else is left
    /// unchanged.
    pub fn fail_analysis(&mut self, ticket: AnalysisTicket) {
        self.in_flight.remove(&ticket.fingerprint);
        self.is_loading = false;
        self.last_error = Some(ANALYSIS_FAILED_NOTICE.to_string());
    }

    /// Run the full submission pipeline against an analyzer.
    pub async fn submit_claim(
        &mut self,
        analyzer: &dyn ClaimAnalyzer,
        claim_text: &str,
        image: Option<&ImageAttachment>,
    ) -> Result<&Verdict, StoreError> {
        let ticket = self.begin_analysis(claim_text, image)?;
        match analyzer.analyze(claim_text, image).await {
            Ok(verdict) => Ok(self.complete_analysis(ticket, verdict)),
            Err(e) => {
                warn!(error = %e, claim = %ticket.claim(), "analysis failed");
                self.fail_analysis(ticket);
                Err(StoreError::Analysis(e))
            }
        }
    }

    // ── Community feed ──

    /// Prepend a wellness post authored by the active session user.
    pub fn post_experience(&mut self, content: &str) -> Result<&CommunityPost, StoreError> {
        let user = self.session.as_ref().ok_or(StoreError::NoSession)?;
        let post = CommunityPost {
            id: new_id(),
            author_id: user.id.clone(),
            author_name: user.name.clone(),
            is_professional: user.role.is_professional(),
            content: content.to_string(),
            likes: 0,
            timestamp: Utc::now(),
            comments: Vec::new(),
        };
        self.posts.insert(0, post);
        Ok(&self.posts[0])
    }

    /// Bump a post's like counter, returning the new count.
    pub fn like_post(&mut self, post_id: &str) -> Result<u32, StoreError> {
        let post = self
            .posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or_else(|| StoreError::PostNotFound(post_id.to_string()))?;
        post.likes += 1;
        Ok(post.likes)
    }

    /// Append a comment to a post.
    pub fn comment_on_post(
        &mut self,
        post_id: &str,
        content: &str,
    ) -> Result<&Comment, StoreError> {
        let author_name = self
            .session
            .as_ref()
            .ok_or(StoreError::NoSession)?
            .name
            .clone();
        let post = self
            .posts
            .iter_mut()
            .find(|p| p.id == post_id)
            .ok_or_else(|| StoreError::PostNotFound(post_id.to_string()))?;
        let idx = post.comments.len();
        post.comments.push(Comment {
            id: new_id(),
            author_name,
            content: content.to_string(),
            timestamp: Utc::now(),
        });
        Ok(&post.comments[idx])
    }

    // ── Clinician portal ──

    /// Attach a professional response to a patient question. The latest
    /// response wins, and the derived status becomes ANSWERED. When the
    /// currently displayed verdict matches the question's claim, the comment
    /// is attached there too so the open view updates in place.
    pub fn submit_clinician_response(
        &mut self,
        question_id: &str,
        response: &str,
    ) -> Result<(), StoreError> {
        let user = self.session.as_ref().ok_or(StoreError::NoSession)?;
        if !user.role.is_professional() {
            return Err(StoreError::NotProfessional);
        }

        let question = self
            .questions
            .iter_mut()
            .find(|q| q.id == question_id)
            .ok_or_else(|| StoreError::QuestionNotFound(question_id.to_string()))?;
        question.doctor_response = Some(response.to_string());

        let claim = question.verdict.claim.clone();
        if let Some(current) = self.current_verdict.as_mut()
            && current.claim == claim
        {
            current.doctor_comment = Some(response.to_string());
        }
        info!(question = question_id, "clinician response recorded");
        Ok(())
    }

    /// The question created for a claim, if any. Lets the verdict view thread
    /// a real question id to [`Self::submit_clinician_response`] instead of
    /// guessing one.
    pub fn find_question_by_claim(&self, claim: &str) -> Option<&PatientQuestion> {
        self.questions.iter().find(|q| q.verdict.claim == claim)
    }

    // ── View state ──

    pub fn set_active_tab(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    /// Re-display the verdict attached to a portal question.
    pub fn open_question_verdict(&mut self, question_id: &str) -> Result<&Verdict, StoreError> {
        let verdict = self
            .questions
            .iter()
            .find(|q| q.id == question_id)
            .ok_or_else(|| StoreError::QuestionNotFound(question_id.to_string()))?
            .verdict
            .clone();
        Ok(&*self.current_verdict.insert(verdict))
    }

    /// Re-display a verdict from the recent-inquiries list.
    pub fn open_history_entry(&mut self, index: usize) -> Result<&Verdict, StoreError> {
        let verdict = self
            .history
            .get(index)
            .ok_or(StoreError::HistoryEntryNotFound(index))?
            .clone();
        Ok(&*self.current_verdict.insert(verdict))
    }

    // ── Accessors ──

    pub fn session(&self) -> Option<&User> {
        self.session.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn current_verdict(&self) -> Option<&Verdict> {
        self.current_verdict.as_ref()
    }

    pub fn history(&self) -> &[Verdict] {
        &self.history
    }

    pub fn trending(&self) -> &[TrendingTopic] {
        &self.trending
    }

    pub fn posts(&self) -> &[CommunityPost] {
        &self.posts
    }

    pub fn questions(&self) -> &[PatientQuestion] {
        &self.questions
    }
}

/// Identity of an analysis request: claim text plus image payload.
fn request_fingerprint(claim_text: &str, image: Option<&ImageAttachment>) -> u64 {
    let mut hasher = Xxh3::new();
    hasher.update(claim_text.as_bytes());
    if let Some(image) = image {
        hasher.update(&[0]);
        hasher.update(image.media_type().as_bytes());
        hasher.update(&[0]);
        hasher.update(image.data().as_bytes());
    }
    hasher.digest()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use medcheck_ai::AnalysisError;
    use medcheck_core::{QuestionStatus, VerdictStatus};

    struct FixedAnalyzer {
        fail: bool,
    }

    #[async_trait]
    impl ClaimAnalyzer for FixedAnalyzer {
        async fn analyze(
            &self,
            claim_text: &str,
            _image: Option<&ImageAttachment>,
        ) -> Result<Verdict, AnalysisError> {
            if self.fail {
                return Err(AnalysisError::Schema("bad payload".into()));
            }
            Ok(verdict_for(claim_text))
        }
    }

    fn verdict_for(claim: &str) -> Verdict {
        Verdict {
            claim: claim.to_string(),
            summary: "Evidence is mixed.".into(),
            confidence_score: 55.0,
            status: VerdictStatus::Partial,
            evidence_count: 12,
            sources: vec![],
            definitions: vec![],
            related_claims: vec!["Zinc".into(), "Echinacea".into()],
            doctor_comment: None,
        }
    }

    fn patient_form() -> SignInForm {
        SignInForm {
            name: String::new(),
            email: "alex@example.org".into(),
            role: Role::Patient,
        }
    }

    fn professional_form() -> SignInForm {
        SignInForm {
            name: String::new(),
            email: "sarah@example.org".into(),
            role: Role::Professional {
                license_number: "GMC-7701".into(),
                specialty: None,
            },
        }
    }

    const OK: FixedAnalyzer = FixedAnalyzer { fail: false };
    const FAILING: FixedAnalyzer = FixedAnalyzer { fail: true };

    #[test]
    fn sign_in_applies_defaults() {
        let mut state = AppState::new();
        let user = state.sign_in(patient_form());
        assert_eq!(user.name, "Alex");
        assert!(!user.verified);

        let user = state.sign_in(professional_form());
        assert_eq!(user.name, "Dr. Sarah");
        assert!(user.verified);
        assert_eq!(
            user.role,
            Role::Professional {
                license_number: "GMC-7701".into(),
                specialty: Some("Dermatology".into()),
            }
        );
    }

    #[test]
    fn sign_in_keeps_submitted_name_and_specialty() {
        let mut state = AppState::new();
        let user = state.sign_in(SignInForm {
            name: "Dr. Priya Nair".into(),
            email: "priya@example.org".into(),
            role: Role::Professional {
                license_number: "GMC-9".into(),
                specialty: Some("Cardiology".into()),
            },
        });
        assert_eq!(user.name, "Dr. Priya Nair");
        assert_eq!(
            user.role,
            Role::Professional {
                license_number: "GMC-9".into(),
                specialty: Some("Cardiology".into()),
            }
        );
    }

    #[tokio::test]
    async fn patient_submit_creates_open_question() {
        let mut state = AppState::new();
        state.sign_in(patient_form());
        state
            .submit_claim(&OK, "Vitamin C cures colds", None)
            .await
            .unwrap();

        assert_eq!(state.questions().len(), 1);
        let q = &state.questions()[0];
        assert_eq!(q.status(), QuestionStatus::Open);
        assert_eq!(q.text, "Vitamin C cures colds");
        assert_eq!(q.verdict.claim, "Vitamin C cures colds");
        assert!(!state.is_loading());
        assert!(state.last_error().is_none());
    }

    #[tokio::test]
    async fn professional_submit_creates_no_question() {
        let mut state = AppState::new();
        state.sign_in(professional_form());
        state.submit_claim(&OK, "Retinol thins skin", None).await.unwrap();

        assert!(state.questions().is_empty());
        assert_eq!(state.history().len(), 1);
    }

    #[tokio::test]
    async fn history_caps_at_five_newest_first() {
        let mut state = AppState::new();
        state.sign_in(patient_form());
        for i in 1..=7 {
            state
                .submit_claim(&OK, &format!("claim {i}"), None)
                .await
                .unwrap();
        }

        assert_eq!(state.history().len(), HISTORY_LIMIT);
        assert_eq!(state.history()[0].claim, "claim 7");
        assert_eq!(state.history()[4].claim, "claim 3");
        // The portal list is not capped.
        assert_eq!(state.questions().len(), 7);
    }

    #[tokio::test]
    async fn failed_analysis_leaves_state_unchanged() {
        let mut state = AppState::new();
        state.sign_in(patient_form());
        state.submit_claim(&OK, "first claim", None).await.unwrap();

        let err = state
            .submit_claim(&FAILING, "second claim", None)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Analysis(_)));

        assert_eq!(state.history().len(), 1);
        assert_eq!(state.questions().len(), 1);
        assert_eq!(state.current_verdict().unwrap().claim, "first claim");
        assert_eq!(state.last_error(), Some(ANALYSIS_FAILED_NOTICE));
        assert!(!state.is_loading());
    }

    #[tokio::test]
    async fn retry_after_failure_is_admitted() {
        let mut state = AppState::new();
        state.sign_in(patient_form());
        state
            .submit_claim(&FAILING, "stubborn claim", None)
            .await
            .unwrap_err();
        state
            .submit_claim(&OK, "stubborn claim", None)
            .await
            .unwrap();
        assert!(state.last_error().is_none());
    }

    #[test]
    fn empty_submission_rejected_before_any_request() {
        let mut state = AppState::new();
        state.sign_in(patient_form());

        let err = state.begin_analysis("  ", None).unwrap_err();
        assert!(matches!(err, StoreError::EmptyClaim));
        assert!(!state.is_loading());
        assert!(state.history().is_empty());

        // An image alone satisfies the text-or-image rule.
        let image = ImageAttachment::from_user_input("data:image/png;base64,AAAA");
        assert!(state.begin_analysis("", Some(&image)).is_ok());
    }

    #[test]
    fn duplicate_in_flight_request_rejected() {
        let mut state = AppState::new();
        state.sign_in(patient_form());

        let ticket = state.begin_analysis("claim", None).unwrap();
        assert!(matches!(
            state.begin_analysis("claim", None),
            Err(StoreError::AlreadyInFlight)
        ));

        // A different claim is admitted while the first is pending.
        let other = state.begin_analysis("other claim", None).unwrap();
        state.fail_analysis(other);

        // Completing the original frees its slot for resubmission.
        state.complete_analysis(ticket, verdict_for("claim"));
        assert!(state.begin_analysis("claim", None).is_ok());
    }

    #[test]
    fn image_payload_distinguishes_requests() {
        let image = ImageAttachment::from_user_input("data:image/png;base64,AAAA");
        assert_ne!(
            request_fingerprint("claim", None),
            request_fingerprint("claim", Some(&image))
        );
    }

    #[tokio::test]
    async fn clinician_response_answers_question_latest_wins() {
        let mut state = AppState::new();
        state.sign_in(patient_form());
        state.submit_claim(&OK, "claim", None).await.unwrap();
        let question_id = state.questions()[0].id.clone();

        state.sign_in(professional_form());
        state
            .submit_clinician_response(&question_id, "Mostly harmless.")
            .unwrap();
        assert_eq!(state.questions()[0].status(), QuestionStatus::Answered);

        state
            .submit_clinician_response(&question_id, "Updated guidance.")
            .unwrap();
        assert_eq!(state.questions()[0].status(), QuestionStatus::Answered);
        assert_eq!(
            state.questions()[0].doctor_response.as_deref(),
            Some("Updated guidance.")
        );
    }

    #[tokio::test]
    async fn clinician_response_updates_displayed_verdict() {
        let mut state = AppState::new();
        state.sign_in(patient_form());
        state.submit_claim(&OK, "claim", None).await.unwrap();

        state.sign_in(professional_form());
        let question_id = state.find_question_by_claim("claim").unwrap().id.clone();
        state
            .submit_clinician_response(&question_id, "Agreed, evidence is thin.")
            .unwrap();

        assert_eq!(
            state.current_verdict().unwrap().doctor_comment.as_deref(),
            Some("Agreed, evidence is thin.")
        );
    }

    #[tokio::test]
    async fn clinician_response_skips_unrelated_displayed_verdict() {
        let mut state = AppState::new();
        state.sign_in(patient_form());
        state.submit_claim(&OK, "older claim", None).await.unwrap();
        state.submit_claim(&OK, "newer claim", None).await.unwrap();

        state.sign_in(professional_form());
        let older = state.find_question_by_claim("older claim").unwrap().id.clone();
        state.submit_clinician_response(&older, "Note.").unwrap();

        // The displayed verdict belongs to the newer claim; it is untouched.
        assert!(state.current_verdict().unwrap().doctor_comment.is_none());
    }

    #[tokio::test]
    async fn clinician_response_gated_on_role() {
        let mut state = AppState::new();
        state.sign_in(patient_form());
        state.submit_claim(&OK, "claim", None).await.unwrap();
        let question_id = state.questions()[0].id.clone();

        let err = state.submit_clinician_response(&question_id, "text").unwrap_err();
        assert!(matches!(err, StoreError::NotProfessional));

        state.sign_in(professional_form());
        let err = state.submit_clinician_response("missing", "text").unwrap_err();
        assert!(matches!(err, StoreError::QuestionNotFound(_)));
    }

    #[test]
    fn posting_requires_session() {
        let mut state = AppState::new();
        let err = state.post_experience("hello").unwrap_err();
        assert!(matches!(err, StoreError::NoSession));
    }

    #[test]
    fn post_prepends_with_zero_likes() {
        let mut state = AppState::with_seed_data();
        state.sign_in(patient_form());
        let post = state.post_experience("Ginger tea fixed my nausea.").unwrap();
        assert_eq!(post.likes, 0);
        assert!(post.comments.is_empty());

        assert_eq!(state.posts().len(), 2);
        assert_eq!(state.posts()[0].content, "Ginger tea fixed my nausea.");
    }

    #[test]
    fn likes_and_comments_accumulate() {
        let mut state = AppState::with_seed_data();
        state.sign_in(patient_form());
        let post_id = state.posts()[0].id.clone();

        assert_eq!(state.like_post(&post_id).unwrap(), 46);
        assert_eq!(state.like_post(&post_id).unwrap(), 47);

        let comment = state.comment_on_post(&post_id, "Trying this!").unwrap();
        assert_eq!(comment.author_name, "Alex");
        assert_eq!(state.posts()[0].comments.len(), 2);

        let err = state.like_post("missing").unwrap_err();
        assert!(matches!(err, StoreError::PostNotFound(_)));
    }

    #[tokio::test]
    async fn reopening_stored_verdicts() {
        let mut state = AppState::new();
        state.sign_in(patient_form());
        state.submit_claim(&OK, "older claim", None).await.unwrap();
        state.submit_claim(&OK, "newer claim", None).await.unwrap();

        let verdict = state.open_history_entry(1).unwrap();
        assert_eq!(verdict.claim, "older claim");
        assert_eq!(state.current_verdict().unwrap().claim, "older claim");
        assert!(matches!(
            state.open_history_entry(9),
            Err(StoreError::HistoryEntryNotFound(9))
        ));

        let question_id = state.find_question_by_claim("newer claim").unwrap().id.clone();
        let verdict = state.open_question_verdict(&question_id).unwrap();
        assert_eq!(verdict.claim, "newer claim");
    }

    #[test]
    fn tab_switching() {
        let mut state = AppState::new();
        assert_eq!(state.active_tab(), Tab::Hub);
        state.set_active_tab(Tab::Portal);
        assert_eq!(state.active_tab(), Tab::Portal);
    }
}
