#[derive(Debug)]
pub struct ContactName(String);

impl ContactName {
    pub fn parse(s: String) -> Result<ContactName, String> {
        let trimmed = s.trim();

        let is_empty = trimmed.is_empty();

        let is_too_long = trimmed.chars().count() > 256;

        // Characters with a meaning in email headers or HTML; ordinary
        // punctuation like `/`, `(` and `)` stays allowed.
        let forbidden_characters = ['"', '<', '>', '\\', '{', '}'];
        let contains_forbidden_characters = trimmed
            .chars()
            .any(|c| forbidden_characters.contains(&c));

        if is_empty || is_too_long || contains_forbidden_characters {
            Err("Invalid name".to_string())
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }
}

impl AsRef<str> for ContactName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
