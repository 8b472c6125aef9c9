use crate::errors::AppError;
use crate::models::library::NewResource;

/// Trims a new resource's text fields and rejects blank titles or subjects.
pub fn normalize_new_resource(mut new: NewResource) -> Result<NewResource, AppError> {
    new.title = new.title.trim().to_string();
    if new.title.is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }

    new.subject = new.subject.trim().to_lowercase();
    if new.subject.is_empty() {
        return Err(AppError::Validation("subject cannot be empty".to_string()));
    }

    new.resource_type = new.resource_type.trim().to_lowercase();
    if new.resource_type.is_empty() {
        new.resource_type = "link".to_string();
    }

    new.url = new
        .url
        .map(|u| u.trim().to_string())
        .filter(|u| !u.is_empty());
    if let Some(url) = &new.url {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(AppError::Validation(format!(
                "url must start with http:// or https://, got '{url}'"
            )));
        }
    }

    Ok(new)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_resource(title: &str, subject: &str, url: Option<&str>) -> NewResource {
        NewResource {
            title: title.to_string(),
            description: None,
            subject: subject.to_string(),
            url: url.map(str::to_string),
            resource_type: "Video".to_string(),
            grade_levels: vec![],
            created_by: None,
        }
    }

    #[test]
    fn test_normalizes_fields() {
        let r = normalize_new_resource(new_resource(" Fractions ", " Math ", Some(" "))).unwrap();
        assert_eq!(r.title, "Fractions");
        assert_eq!(r.subject, "math");
        assert_eq!(r.resource_type, "video");
        assert_eq!(r.url, None);
    }

    #[test]
    fn test_rejects_blank_title_and_subject() {
        assert!(normalize_new_resource(new_resource("", "math", None)).is_err());
        assert!(normalize_new_resource(new_resource("Fractions", " ", None)).is_err());
    }

    #[test]
    fn test_rejects_non_http_url() {
        let err =
            normalize_new_resource(new_resource("Fractions", "math", Some("ftp://x"))).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(normalize_new_resource(new_resource("F", "math", Some("https://x.org"))).is_ok());
    }
}
