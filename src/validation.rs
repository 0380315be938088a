use crate::models::task::TaskRequest;

pub const TITLE_MAX_CHARS: usize = 500;
pub const DESCRIPTION_MAX_CHARS: usize = 2000;

/// Checks a create/update body and returns the first violation as
/// `"<field>: <message>"`.
pub fn validate_task_request(request: &TaskRequest) -> Result<(), String> {
    match request.title.as_deref() {
        None => return Err("title: Title is required".to_string()),
        Some(title) if title.trim().is_empty() => {
            return Err("title: Title is required".to_string())
        }
        Some(title) if title.chars().count() > TITLE_MAX_CHARS => {
            return Err(format!(
                "title: Title must not exceed {} characters",
                TITLE_MAX_CHARS
            ))
        }
        Some(_) => {}
    }

    if let Some(description) = &request.description {
        if description.chars().count() > DESCRIPTION_MAX_CHARS {
            return Err(format!(
                "description: Description must not exceed {} characters",
                DESCRIPTION_MAX_CHARS
            ));
        }
    }

    Ok(())
}
