// src/session.rs
//! Interactive session state machine.
//!
//! A `Session` is a plain value. Each transition takes it by value and hands
//! back the next session together with an optional notice for the operator.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::PipelineError;
use crate::pipeline::EmailGenerator;
use crate::types::{EmailDraft, JobInput, JobRecord, SenderProfile, DRAFT_FILE_NAME};

/// Everything the operator can type in: the sender profile plus both job inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormFields {
    #[serde(flatten)]
    pub sender: SenderProfile,
    pub job_url: String,
    pub manual_role: String,
    pub manual_experience: String,
    pub manual_skills: String,
    pub manual_description: String,
}

impl FormFields {
    /// The manual tab's four fields, taken verbatim.
    pub fn manual_job(&self) -> JobRecord {
        JobRecord::new(
            self.manual_role.clone(),
            self.manual_experience.clone(),
            self.manual_skills.clone(),
            self.manual_description.clone(),
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Idle,
    Drafted {
        job: JobRecord,
        links: Vec<String>,
        draft: EmailDraft,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmitSource {
    Url,
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Success,
    Validation,
    Error,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    fn new(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Result of one transition.
#[derive(Debug)]
pub struct Transition {
    pub session: Session,
    pub notice: Option<Notice>,
}

impl Transition {
    fn quiet(session: Session) -> Self {
        Self {
            session,
            notice: None,
        }
    }

    fn with_notice(session: Session, notice: Notice) -> Self {
        Self {
            session,
            notice: Some(notice),
        }
    }
}

/// The (possibly edited) draft, ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DraftDownload {
    pub file_name: &'static str,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Session {
    form: FormFields,
    phase: SessionPhase,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &FormFields {
        &self.form
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn is_drafted(&self) -> bool {
        matches!(self.phase, SessionPhase::Drafted { .. })
    }

    pub fn draft(&self) -> Option<&EmailDraft> {
        match &self.phase {
            SessionPhase::Drafted { draft, .. } => Some(draft),
            SessionPhase::Idle => None,
        }
    }

    /// Validate the sender, run the pipeline and land in `Drafted` or `Idle`.
    pub async fn submit(self, source: SubmitSource, generator: &dyn EmailGenerator) -> Transition {
        let Session { form, .. } = self;

        if let Some(field) = form.sender.missing_required_field() {
            let err = PipelineError::Validation { field };
            warn!("Submission rejected: {}", err);
            return Transition::with_notice(
                Session {
                    form,
                    phase: SessionPhase::Idle,
                },
                Notice::new(NoticeKind::Validation, err.to_string()),
            );
        }

        let input = match source {
            SubmitSource::Url => JobInput::Url(form.job_url.trim().to_string()),
            SubmitSource::Manual => JobInput::Manual(form.manual_job()),
        };

        match generator.generate(input, &form.sender).await {
            Ok(generated) => {
                info!("Session drafted an email ({:?} input)", source);
                Transition::with_notice(
                    Session {
                        form,
                        phase: SessionPhase::Drafted {
                            job: generated.job,
                            links: generated.links,
                            draft: generated.draft,
                        },
                    },
                    Notice::new(
                        NoticeKind::Success,
                        "Email successfully generated! You can edit it below.",
                    ),
                )
            }
            Err(err) => {
                warn!("Generation failed [{}]: {}", err.code(), err);
                let notice = match err {
                    PipelineError::Validation { .. } => {
                        Notice::new(NoticeKind::Validation, err.to_string())
                    }
                    other => Notice::new(NoticeKind::Error, format!("An error occurred: {}", other)),
                };
                Transition::with_notice(
                    Session {
                        form,
                        phase: SessionPhase::Idle,
                    },
                    notice,
                )
            }
        }
    }

    /// Every field back to its default, from any state.
    pub fn reset(self) -> Transition {
        Transition::quiet(Session::default())
    }

    /// Drop the draft and keep the form; a no-op when already idle.
    pub fn regenerate(self) -> Transition {
        Transition::quiet(Session {
            form: self.form,
            phase: SessionPhase::Idle,
        })
    }

    pub fn update_form(self, form: FormFields) -> Transition {
        Transition::quiet(Session {
            form,
            phase: self.phase,
        })
    }

    pub fn edit_draft(self, text: impl Into<String>) -> Transition {
        match self.phase {
            SessionPhase::Drafted { job, links, .. } => Transition::quiet(Session {
                form: self.form,
                phase: SessionPhase::Drafted {
                    job,
                    links,
                    draft: EmailDraft::new(text),
                },
            }),
            SessionPhase::Idle => Transition::with_notice(
                Session {
                    form: self.form,
                    phase: SessionPhase::Idle,
                },
                Notice::new(NoticeKind::Rejected, "There is no draft to edit yet"),
            ),
        }
    }

    /// Only a drafted session has anything to download.
    pub fn download(&self) -> Option<DraftDownload> {
        self.draft().map(|draft| DraftDownload {
            file_name: DRAFT_FILE_NAME,
            content: draft.as_str().to_string(),
        })
    }
}
