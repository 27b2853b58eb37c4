use crate::error::{ClientError, FieldErrors};

/// Collects per-field form errors
#[derive(Debug, Default)]
pub struct FormCheck {
    errors: FieldErrors,
}

impl FormCheck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required(&mut self, field: &str, value: &str, message: &str) -> &mut Self {
        if value.trim().is_empty() {
            self.fail(field, message);
        }
        self
    }

    pub fn email(&mut self, field: &str, value: &str, label: &str) -> &mut Self {
        let value = value.trim();
        if value.is_empty() {
            self.fail(field, &format!("{} is required", label));
        } else if !looks_like_email(value) {
            self.fail(field, "Please enter a valid email address");
        }
        self
    }

    pub fn fail(&mut self, field: &str, message: &str) -> &mut Self {
        self.errors.entry(field.to_string()).or_insert_with(|| message.to_string());
        self
    }

    pub fn finish(&mut self) -> Result<(), ClientError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ClientError::validation(std::mem::take(&mut self.errors)))
        }
    }
}

/// `local@domain.tld` with no whitespace: something before `@` and an inner dot after it
pub fn looks_like_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape() {
        assert!(looks_like_email("a@b.co"));
        assert!(looks_like_email("first.last@sub.example.org"));
        assert!(!looks_like_email("a@b"));
        assert!(!looks_like_email("@b.co"));
        assert!(!looks_like_email("a b@c.d"));
        assert!(!looks_like_email("a@b@c.d"));
        assert!(!looks_like_email("a@.com"));
    }

    #[test]
    fn form_check_reports_first_message_per_field() {
        let err = FormCheck::new()
            .required("name", " ", "Name is required")
            .fail("name", "other")
            .email("email", "nope", "Email")
            .finish()
            .unwrap_err();
        let fields = err.field_errors().unwrap();
        assert_eq!(fields["name"], "Name is required");
        assert_eq!(fields["email"], "Please enter a valid email address");
    }
}
