use std::path::PathBuf;

use chrono::Utc;
use reqwest::Client;

use crate::{
    config,
    types::{Account, Token, TokenResponse},
};

/// Cached OAuth token for one of the two accounts.
pub struct TokenManager {
    account: Account,
    token: Token,
}

impl TokenManager {
    pub fn new(account: Account, token: Token) -> Self {
        TokenManager { account, token }
    }

    pub async fn load(account: Account) -> Result<Self, String> {
        let path = Self::token_path(account);
        let content = async_fs::read_to_string(&path)
            .await
            .map_err(|e| e.to_string())?;
        let token: Token = serde_json::from_str(&content).map_err(|e| e.to_string())?;
        Ok(Self { account, token })
    }

    pub async fn persist(&self) -> Result<(), String> {
        let path = Self::token_path(self.account);
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent)
                .await
                .map_err(|e| e.to_string())?;
        }

        let json = serde_json::to_string_pretty(&self.token).map_err(|e| e.to_string())?;
        async_fs::write(path, json).await.map_err(|e| e.to_string())
    }

    /// Returns an access token, refreshing it first when it is about to expire.
    /// A failed refresh hands back the old token and lets the request fail.
    pub async fn get_valid_token(&mut self) -> String {
        if self.is_expired() {
            if let Ok(new_token) = self.refresh_token().await {
                self.token = new_token;
                let _ = self.persist().await;
            }
        }

        self.token.access_token.clone()
    }

    fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now + 240 >= self.token.obtained_at + self.token.expires_in
    }

    async fn refresh_token(&self) -> Result<Token, String> {
        let client_id = config::tidal_client_id()?;
        let client_secret = config::tidal_client_secret().unwrap_or_default();

        let client = Client::new();
        let res = client
            .post(format!("{}/token", config::tidal_auth_url()))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", self.token.refresh_token.as_str()),
                ("client_id", client_id.as_str()),
                ("client_secret", client_secret.as_str()),
                ("scope", config::TIDAL_SCOPE),
            ])
            .send()
            .await
            .map_err(|e| e.to_string())?
            .error_for_status()
            .map_err(|e| e.to_string())?;

        let refreshed: TokenResponse = res.json().await.map_err(|e| e.to_string())?;

        Ok(Token {
            access_token: refreshed.access_token,
            refresh_token: refreshed
                .refresh_token
                .unwrap_or_else(|| self.token.refresh_token.clone()),
            expires_in: refreshed.expires_in,
            obtained_at: Utc::now().timestamp() as u64,
            user_id: self.token.user_id.clone(),
            country_code: self.token.country_code.clone(),
        })
    }

    fn token_path(account: Account) -> PathBuf {
        let mut path = config::data_dir();
        path.push(format!("cache/token-{account}.json"));
        path
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }
}
