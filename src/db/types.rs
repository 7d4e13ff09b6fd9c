use serde::{Deserialize, Serialize};
use sqlx::Type;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "userrole", rename_all = "lowercase")]
pub(crate) enum UserRole {
    Admin,
    Agent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "examstatus", rename_all = "lowercase")]
pub(crate) enum ExamStatus {
    Upcoming,
    Ongoing,
    Completed,
}

/// Lifecycle of a class/exam/subject results sheet. A missing status row is
/// read as `Upload`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "resultstatus", rename_all = "lowercase")]
pub(crate) enum ResultStatus {
    Upload,
    Review,
    Publish,
    Analyse,
    Archived,
}

impl ResultStatus {
    /// Whether a status row may move from `self` to `to`. Staying on the
    /// current status is always allowed.
    pub(crate) fn can_transition(self, to: ResultStatus) -> bool {
        use ResultStatus::{Analyse, Archived, Publish, Review, Upload};

        if self == to {
            return true;
        }
        matches!(
            (self, to),
            (Upload, Review)
                | (Upload, Publish)
                | (Upload, Analyse)
                | (Review, Upload)
                | (Review, Publish)
                | (Review, Analyse)
                | (Publish, Analyse)
                | (Analyse, Publish)
                | (_, Archived)
                | (Archived, Upload)
        )
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            ResultStatus::Upload => "upload",
            ResultStatus::Review => "review",
            ResultStatus::Publish => "publish",
            ResultStatus::Analyse => "analyse",
            ResultStatus::Archived => "archived",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn staying_on_current_status_is_allowed() {
        for status in [
            ResultStatus::Upload,
            ResultStatus::Review,
            ResultStatus::Publish,
            ResultStatus::Analyse,
            ResultStatus::Archived,
        ] {
            assert!(status.can_transition(status));
        }
    }

    #[test]
    fn upload_reaches_every_working_status() {
        assert!(ResultStatus::Upload.can_transition(ResultStatus::Review));
        assert!(ResultStatus::Upload.can_transition(ResultStatus::Publish));
        assert!(ResultStatus::Upload.can_transition(ResultStatus::Analyse));
        assert!(ResultStatus::Upload.can_transition(ResultStatus::Archived));
    }

    #[test]
    fn published_sheet_cannot_reopen_for_upload() {
        assert!(!ResultStatus::Publish.can_transition(ResultStatus::Upload));
        assert!(!ResultStatus::Publish.can_transition(ResultStatus::Review));
        assert!(ResultStatus::Publish.can_transition(ResultStatus::Analyse));
    }

    #[test]
    fn analyse_can_step_back_to_publish() {
        assert!(ResultStatus::Analyse.can_transition(ResultStatus::Publish));
        assert!(!ResultStatus::Analyse.can_transition(ResultStatus::Review));
    }

    #[test]
    fn archived_only_returns_through_upload() {
        assert!(ResultStatus::Archived.can_transition(ResultStatus::Upload));
        assert!(!ResultStatus::Archived.can_transition(ResultStatus::Review));
        assert!(!ResultStatus::Archived.can_transition(ResultStatus::Publish));
        assert!(!ResultStatus::Archived.can_transition(ResultStatus::Analyse));
    }
}
