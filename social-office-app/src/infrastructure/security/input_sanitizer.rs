use crate::domain::NewItem;
use social_office_errors::AppError;

const MAX_TITLE_CHARS: usize = 120;
const MAX_DESCRIPTION_CHARS: usize = 2000;

pub struct InputSanitizer;

impl InputSanitizer {
    /// Normalizes a submission or rejects it.
    pub fn validate_submission(item: NewItem) -> Result<NewItem, AppError> {
        let title = Self::clean_title(&item.title);
        if title.is_empty() {
            return Err(AppError::InvalidInput("Title must not be empty".to_string()));
        }
        if title.chars().count() > MAX_TITLE_CHARS {
            return Err(AppError::InvalidInput(format!(
                "Title must be at most {MAX_TITLE_CHARS} characters"
            )));
        }

        let description = Self::clean_description(&item.description);
        if description.chars().count() > MAX_DESCRIPTION_CHARS {
            return Err(AppError::InvalidInput(format!(
                "Description must be at most {MAX_DESCRIPTION_CHARS} characters"
            )));
        }

        Ok(NewItem {
            kind: item.kind,
            title,
            description,
        })
    }

    fn clean_title(title: &str) -> String {
        title.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn clean_description(description: &str) -> String {
        description
            .trim()
            .chars()
            .filter(|c| !c.is_control() || *c == '\n' || *c == '\t')
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ItemKind;

    fn submission(title: &str, description: &str) -> NewItem {
        NewItem {
            kind: ItemKind::EventRequest,
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    #[test]
    fn test_valid_submission_is_normalized() {
        let item = InputSanitizer::validate_submission(submission(
            "  Friday   karaoke\tnight ",
            "  Bring snacks\u{7}\nand songs  ",
        ))
        .unwrap();
        assert_eq!(item.title, "Friday karaoke night");
        assert_eq!(item.description, "Bring snacks\nand songs");
        assert_eq!(item.kind, ItemKind::EventRequest);
    }

    #[test]
    fn test_empty_title_rejected() {
        assert!(InputSanitizer::validate_submission(submission("   ", "x")).is_err());
    }

    #[test]
    fn test_length_limits() {
        let long_title = "a".repeat(MAX_TITLE_CHARS + 1);
        assert!(InputSanitizer::validate_submission(submission(&long_title, "")).is_err());

        let exact_title = "ü".repeat(MAX_TITLE_CHARS);
        assert!(InputSanitizer::validate_submission(submission(&exact_title, "")).is_ok());

        let long_description = "b".repeat(MAX_DESCRIPTION_CHARS + 1);
        assert!(InputSanitizer::validate_submission(submission("ok", &long_description)).is_err());
    }
}
