use validator::validate_email;

#[derive(Debug, Clone)]
pub struct ContactEmail(String);

impl ContactEmail {
    /// Accepts addresses with a plausible local part and a dotted domain,
    /// e.g. `jo@example.com` but not `jo@localhost`.
    pub fn parse(s: String) -> Result<ContactEmail, String> {
        let trimmed = s.trim();

        let has_dotted_domain = trimmed
            .rsplit_once('@')
            .map_or(false, |(_, domain)| domain.contains('.'));

        if validate_email(trimmed) && has_dotted_domain {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(format!("{} is not a valid contact email.", s))
        }
    }
}

impl AsRef<str> for ContactEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ContactEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
