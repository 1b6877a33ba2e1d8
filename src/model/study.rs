use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::choice::{Campus, Day, Level};
use super::validation::{
    Field, FieldErrors, ValidationError, require, validate_description, validate_image_src,
    validate_tags, validate_time, validate_time_range, validate_title,
};

/// A study listing as the backend stores it.
///
/// This is both the create/update request body and the `data` of a retrieve
/// response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Study {
    pub image_src: String,
    pub title: String,
    pub day: Day,
    pub start_time: String,
    pub end_time: String,
    pub campus: Campus,
    pub level: Level,
    pub tags: Vec<String>,
    pub description: String,
    pub is_recruiting: bool,
    pub semester: u8,
    pub year: i32,
}

/// Recruiting status and academic term of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recruitment {
    pub is_recruiting: bool,
    pub semester: u8,
    pub year: i32,
}

impl Recruitment {
    /// A newly opened, recruiting study in the term containing `date`.
    ///
    /// January to June is semester 1, July to December semester 2.
    pub fn opening_on(date: NaiveDate) -> Self {
        Self {
            is_recruiting: true,
            semester: if date.month() <= 6 { 1 } else { 2 },
            year: date.year(),
        }
    }

    /// The recruitment metadata already stored on `study`.
    pub fn of(study: &Study) -> Self {
        Self {
            is_recruiting: study.is_recruiting,
            semester: study.semester,
            year: study.year,
        }
    }
}

/// An unvalidated snapshot of the study form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudyDraft {
    pub image_src: Option<String>,
    pub title: String,
    pub day: Option<Day>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub campus: Option<Campus>,
    pub level: Option<Level>,
    pub tags: Vec<String>,
    pub description: String,
}

impl StudyDraft {
    /// Copies the editable fields of a stored study.
    pub fn from_study(study: &Study) -> Self {
        Self {
            image_src: Some(study.image_src.clone()),
            title: study.title.clone(),
            day: Some(study.day),
            start_time: Some(study.start_time.clone()),
            end_time: Some(study.end_time.clone()),
            campus: Some(study.campus),
            level: Some(study.level),
            tags: study.tags.clone(),
            description: study.description.clone(),
        }
    }

    /// Validates every field, collecting all errors at once.
    pub fn validate(&self) -> FieldErrors {
        match self.checked() {
            Ok(_) => FieldErrors::default(),
            Err(errors) => errors,
        }
    }

    /// Builds the wire payload, with `image_src` replacing the draft's image.
    pub fn into_study(
        self,
        image_src: String,
        recruitment: Recruitment,
    ) -> Result<Study, FieldErrors> {
        let checked = Self {
            image_src: Some(image_src),
            ..self
        }
        .checked()?;
        Ok(Study {
            image_src: checked.image_src,
            title: checked.title,
            day: checked.day,
            start_time: checked.start_time,
            end_time: checked.end_time,
            campus: checked.campus,
            level: checked.level,
            tags: checked.tags,
            description: checked.description,
            is_recruiting: recruitment.is_recruiting,
            semester: recruitment.semester,
            year: recruitment.year,
        })
    }

    fn checked(&self) -> Result<Checked, FieldErrors> {
        let mut errors = FieldErrors::default();

        let image = errors.check(Field::Image, validate_image_src(self.image_src.as_deref()));
        let title = errors.check(Field::Title, validate_title(&self.title));
        let start = errors.check(Field::StartTime, validate_time(self.start_time.as_deref()));
        let end = errors.check(Field::EndTime, validate_time(self.end_time.as_deref()));
        if let (Some(()), Some(()), Some(s), Some(e)) =
            (start, end, &self.start_time, &self.end_time)
        {
            errors.check(Field::EndTime, validate_time_range(s, e));
        }
        let day = errors.check(Field::Day, require(self.day, ValidationError::MissingDay));
        let campus = errors.check(
            Field::Campus,
            require(self.campus, ValidationError::MissingCampus),
        );
        let level = errors.check(
            Field::Level,
            require(self.level, ValidationError::MissingLevel),
        );
        let tags = errors.check(Field::Tags, validate_tags(&self.tags));
        let description = errors.check(
            Field::Description,
            validate_description(&self.description),
        );

        match (
            image,
            title,
            &self.image_src,
            &self.start_time,
            &self.end_time,
            day,
            campus,
            level,
            tags,
            description,
        ) {
            (
                Some(()),
                Some(()),
                Some(image_src),
                Some(start_time),
                Some(end_time),
                Some(day),
                Some(campus),
                Some(level),
                Some(()),
                Some(()),
            ) if errors.is_empty() => Ok(Checked {
                image_src: image_src.clone(),
                title: self.title.trim().to_string(),
                day,
                start_time: start_time.clone(),
                end_time: end_time.clone(),
                campus,
                level,
                tags: self.tags.clone(),
                description: self.description.clone(),
            }),
            _ => Err(errors),
        }
    }
}

/// Field values that passed validation.
struct Checked {
    image_src: String,
    title: String,
    day: Day,
    start_time: String,
    end_time: String,
    campus: Campus,
    level: Level,
    tags: Vec<String>,
    description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_draft() -> StudyDraft {
        StudyDraft {
            image_src: Some("file:///tmp/cover.png".into()),
            title: "Async Rust".into(),
            day: Some(Day::Wed),
            start_time: Some("19:00".into()),
            end_time: Some("21:00".into()),
            campus: Some(Campus::Yuljeon),
            level: Some(Level::Intermediate),
            tags: vec!["rust".into(), "tokio".into()],
            description: "Reading the async book together".into(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    mod recruitment {
        use super::*;

        #[test]
        fn spring_is_first_semester() {
            let r = Recruitment::opening_on(date(2026, 3, 2));
            assert_eq!(
                r,
                Recruitment {
                    is_recruiting: true,
                    semester: 1,
                    year: 2026
                }
            );
        }

        #[test]
        fn june_is_first_semester() {
            assert_eq!(Recruitment::opening_on(date(2026, 6, 30)).semester, 1);
        }

        #[test]
        fn july_is_second_semester() {
            assert_eq!(Recruitment::opening_on(date(2026, 7, 1)).semester, 2);
        }
    }

    mod validate {
        use super::*;

        #[test]
        fn valid_draft_has_no_errors() {
            assert!(valid_draft().validate().is_empty());
        }

        #[test]
        fn empty_draft_reports_every_field() {
            let errors = StudyDraft::default().validate();
            for field in [
                Field::Image,
                Field::Title,
                Field::StartTime,
                Field::EndTime,
                Field::Day,
                Field::Campus,
                Field::Level,
                Field::Tags,
                Field::Description,
            ] {
                assert!(errors.get(field).is_some(), "{field} should have an error");
            }
        }

        #[test]
        fn reversed_times_flag_end_time() {
            let draft = StudyDraft {
                start_time: Some("21:00".into()),
                end_time: Some("19:00".into()),
                ..valid_draft()
            };
            let errors = draft.validate();
            assert_eq!(errors.len(), 1);
            assert_eq!(
                errors.get(Field::EndTime),
                Some(&ValidationError::EndNotAfterStart)
            );
        }

        #[test]
        fn invalid_start_skips_range_check() {
            let draft = StudyDraft {
                start_time: Some("9:00".into()),
                ..valid_draft()
            };
            let errors = draft.validate();
            assert!(errors.get(Field::StartTime).is_some());
            assert!(errors.get(Field::EndTime).is_none());
        }
    }

    mod into_study {
        use super::*;

        #[test]
        fn replaces_image_and_applies_recruitment() {
            let recruitment = Recruitment::opening_on(date(2026, 10, 17));
            let study = valid_draft()
                .into_study("https://cdn.example/abc/".into(), recruitment)
                .unwrap();
            assert_eq!(study.image_src, "https://cdn.example/abc/");
            assert_eq!(study.title, "Async Rust");
            assert_eq!(study.day, Day::Wed);
            assert_eq!(study.tags, vec!["rust", "tokio"]);
            assert!(study.is_recruiting);
            assert_eq!(study.semester, 2);
            assert_eq!(study.year, 2026);
        }

        #[test]
        fn trims_title() {
            let draft = StudyDraft {
                title: "  Async Rust ".into(),
                ..valid_draft()
            };
            let study = draft
                .into_study("u".into(), Recruitment::opening_on(date(2026, 1, 1)))
                .unwrap();
            assert_eq!(study.title, "Async Rust");
        }

        #[test]
        fn invalid_draft_returns_errors() {
            let draft = StudyDraft {
                tags: vec![],
                ..valid_draft()
            };
            let errors = draft
                .into_study("u".into(), Recruitment::opening_on(date(2026, 1, 1)))
                .unwrap_err();
            assert_eq!(errors.get(Field::Tags), Some(&ValidationError::NoTags));
        }

        #[test]
        fn from_study_round_trips() {
            let study = valid_draft()
                .into_study("u".into(), Recruitment::opening_on(date(2026, 1, 1)))
                .unwrap();
            let again = StudyDraft::from_study(&study)
                .into_study(study.image_src.clone(), Recruitment::of(&study))
                .unwrap();
            assert_eq!(study, again);
        }
    }

    mod wire {
        use super::*;

        #[test]
        fn payload_field_names_and_literals() {
            let study = valid_draft()
                .into_study(
                    "https://cdn.example/abc/".into(),
                    Recruitment::opening_on(date(2026, 3, 2)),
                )
                .unwrap();
            let json = serde_json::to_string(&study).unwrap();
            insta::assert_snapshot!(json, @r#"{"imageSrc":"https://cdn.example/abc/","title":"Async Rust","day":"수","startTime":"19:00","endTime":"21:00","campus":"율전","level":"중급","tags":["rust","tokio"],"description":"Reading the async book together","isRecruiting":true,"semester":1,"year":2026}"#);
        }

        #[test]
        fn deserializes_backend_record() {
            let json = r#"{
                "imageSrc": "https://cdn.example/x/",
                "title": "Algorithms",
                "day": "토",
                "startTime": "10:00",
                "endTime": "12:00",
                "campus": "온라인",
                "level": "고급",
                "tags": ["ps"],
                "description": "weekly problems",
                "isRecruiting": false,
                "semester": 2,
                "year": 2025
            }"#;
            let study: Study = serde_json::from_str(json).unwrap();
            assert_eq!(study.day, Day::Sat);
            assert_eq!(study.campus, Campus::Online);
            assert_eq!(study.level, Level::Advanced);
            assert!(!study.is_recruiting);
        }
    }
}
