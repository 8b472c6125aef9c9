use crate::errors::AppError;
use crate::models::intake::IntakeForm;

pub const MIN_GPA: f64 = 0.0;
pub const MAX_GPA: f64 = 5.0;

/// Checks an intake submission before it is stored.
///
/// The roster is never rewritten; names and grade levels are kept exactly as
/// entered. Only empty names and out-of-range GPA targets are rejected.
pub fn validate_intake(form: &IntakeForm) -> Result<(), AppError> {
    if let Some(gpa) = form.target_gpa {
        if !gpa.is_finite() || !(MIN_GPA..=MAX_GPA).contains(&gpa) {
            return Err(AppError::Validation(format!(
                "target_gpa must be between {MIN_GPA:.1} and {MAX_GPA:.1}, got {gpa}"
            )));
        }
    }

    if let Some(pos) = form
        .students
        .iter()
        .position(|s| s.name.trim().is_empty())
    {
        return Err(AppError::Validation(format!(
            "student #{} has an empty name",
            pos + 1
        )));
    }

    Ok(())
}
