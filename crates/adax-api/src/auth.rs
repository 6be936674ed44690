use secrecy::SecretString;

/// Account credentials for the Adax cloud.
///
/// The cloud exchanges these for a short-lived bearer token via the
/// password grant. `client_id` is the account id shown in the Adax app;
/// `secret` is the generated API credential, never the login password.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub client_id: String,
    pub secret: SecretString,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            secret: SecretString::from(secret.into()),
        }
    }
}
