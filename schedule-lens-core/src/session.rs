//! Per-session state: idle until a file is submitted, then analyzed
//!
//! A session holds at most one analysis. Submitting a file always starts
//! from idle again, so nothing from a previous upload can leak into the
//! next one.

use crate::pipeline::{Analysis, Pipeline};
use crate::present::Page;
use crate::upload::{RawUpload, UploadError, UploadId};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Analyzed {
        upload: UploadId,
        filename: String,
        analysis: Analysis,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Session {
    state: SessionState,
    notice: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Identity of the upload currently shown, if any
    pub fn upload_id(&self) -> Option<&UploadId> {
        match &self.state {
            SessionState::Analyzed { upload, .. } => Some(upload),
            SessionState::Idle => None,
        }
    }

    pub fn reset(&mut self) {
        self.state = SessionState::Idle;
        self.notice = None;
    }

    /// Run one upload through the pipeline.
    ///
    /// Without a file the session stays idle and the "no file" notice is
    /// kept for display.
    pub fn submit(
        &mut self,
        pipeline: &Pipeline,
        upload: Option<RawUpload>,
    ) -> Result<Analysis, UploadError> {
        self.reset();

        let upload = match pipeline.policy().accept(upload) {
            Ok(upload) => upload,
            Err(err) => {
                self.notice = Some(err.to_string());
                return Err(err);
            }
        };

        let id = upload.id();
        debug!("Session analyzing upload {}", id);
        let analysis = pipeline.run(&upload);

        self.state = SessionState::Analyzed {
            upload: id,
            filename: upload.filename,
            analysis: analysis.clone(),
        };
        Ok(analysis)
    }

    /// View of the current state for the presenters
    pub fn page(&self) -> Page<'_> {
        match &self.state {
            SessionState::Idle => Page::Idle {
                notice: self.notice.as_deref(),
            },
            SessionState::Analyzed {
                filename, analysis, ..
            } => Page::Analyzed { filename, analysis },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Project, Task};
    use crate::parser::fixed::FixedParser;
    use std::sync::Arc;

    fn pipeline_for(project: Project) -> Pipeline {
        Pipeline::new(Arc::new(FixedParser::returning(project)))
    }

    #[test]
    fn test_new_session_is_idle() {
        let session = Session::new();
        assert_eq!(session.state(), &SessionState::Idle);
        assert!(session.upload_id().is_none());
        assert!(matches!(session.page(), Page::Idle { notice: None }));
    }

    #[test]
    fn test_submit_moves_to_analyzed() {
        let pipeline = pipeline_for(Project::new(vec![Task::named("Lotto A")], None));
        let upload = RawUpload::new("a.xml", b"a".to_vec());
        let expected_id = upload.id();

        let mut session = Session::new();
        assert!(session.submit(&pipeline, Some(upload)).unwrap().is_success());
        assert_eq!(session.upload_id(), Some(&expected_id));
        assert!(matches!(session.page(), Page::Analyzed { filename: "a.xml", .. }));
    }

    #[test]
    fn test_missing_file_keeps_session_idle() {
        let pipeline = pipeline_for(Project::default());
        let mut session = Session::new();

        assert_eq!(session.submit(&pipeline, None), Err(UploadError::NoFile));
        assert_eq!(session.state(), &SessionState::Idle);
        assert!(matches!(
            session.page(),
            Page::Idle {
                notice: Some("Nessun file caricato.")
            }
        ));
    }

    #[test]
    fn test_new_upload_replaces_previous_analysis() {
        let mut session = Session::new();

        let first = pipeline_for(Project::new(
            vec![Task::named("Primo"), Task::named("TUP 1").milestone().lasting(0.0)],
            None,
        ));
        session
            .submit(&first, Some(RawUpload::new("one.xml", b"1".to_vec())))
            .unwrap();

        let failing = Pipeline::new(Arc::new(FixedParser::failing("bad header")));
        let analysis = session
            .submit(&failing, Some(RawUpload::new("two.xml", b"2".to_vec())))
            .unwrap();
        assert!(!analysis.is_success());

        match session.state() {
            SessionState::Analyzed {
                filename, analysis, ..
            } => {
                assert_eq!(filename, "two.xml");
                assert!(analysis.extraction().is_none());
            }
            SessionState::Idle => panic!("expected analyzed state"),
        }
    }

    #[test]
    fn test_empty_submit_clears_previous_analysis() {
        let pipeline = pipeline_for(Project::default());
        let mut session = Session::new();
        session
            .submit(&pipeline, Some(RawUpload::new("a.xml", b"a".to_vec())))
            .unwrap();

        let _ = session.submit(&pipeline, None);
        assert_eq!(session.state(), &SessionState::Idle);

        session.reset();
        assert!(matches!(session.page(), Page::Idle { notice: None }));
    }
}
