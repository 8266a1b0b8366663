use secrecy::{ExposeSecret, Secret};

/// Client for the reCAPTCHA `siteverify` endpoint.
pub struct CaptchaVerifier {
    http_client: reqwest::Client,
    base_url: String,
    secret: Secret<String>,
    timeout: std::time::Duration,
}

/// Verdict returned by the verification service.
#[derive(Debug, serde::Deserialize)]
pub struct VerifyOutcome {
    pub success: bool,
    #[serde(rename = "error-codes", default)]
    pub error_codes: Vec<String>,
}

impl CaptchaVerifier {
    pub fn new(base_url: String, secret: Secret<String>, timeout: std::time::Duration) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            base_url,
            secret,
            timeout,
        }
    }

    /// Submits a client token for verification. Network failures, timeouts,
    /// non-2xx statuses and unparseable payloads all surface as `Err`; a
    /// well-formed `success: false` verdict is an `Ok` the caller inspects.
    pub async fn verify(&self, token: &str) -> Result<VerifyOutcome, reqwest::Error> {
        let url = format!("{}/siteverify", self.base_url);
        let outcome = self
            .http_client
            .post(&url)
            .timeout(self.timeout)
            .form(&[
                ("secret", self.secret.expose_secret().as_str()),
                ("response", token),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<VerifyOutcome>()
            .await?;
        Ok(outcome)
    }
}
