use std::time::Duration;

use chrono::Utc;
use reqwest::Client;
use tokio::time::{Instant, sleep};

use crate::{
    config, info,
    management::TokenManager,
    types::{Account, DeviceAuthorization, OAuthError, Token, TokenResponse},
    utils, warning,
};

const DEVICE_GRANT: &str = "urn:ietf:params:oauth:grant-type:device_code";

/// Runs the TIDAL device-code login for `account` and caches the token.
///
/// Prints the verification link (and tries to open it in the browser), then
/// polls the token endpoint at the advertised interval until the user has
/// approved the device or the code expires.
pub async fn login(account: Account) -> Result<Token, String> {
    let client_id = config::tidal_client_id()?;
    let client_secret = config::tidal_client_secret().unwrap_or_default();
    let auth_url = config::tidal_auth_url();
    let client = Client::new();

    let device = client
        .post(format!("{}/device_authorization", auth_url))
        .form(&[("client_id", client_id.as_str()), ("scope", config::TIDAL_SCOPE)])
        .send()
        .await
        .map_err(|e| e.to_string())?
        .error_for_status()
        .map_err(|e| e.to_string())?
        .json::<DeviceAuthorization>()
        .await
        .map_err(|e| e.to_string())?;

    let link = utils::ensure_scheme(
        device
            .verification_uri_complete
            .as_deref()
            .unwrap_or(&device.verification_uri),
    );
    info!(
        "Log in to the {} account at {} (code {})",
        account, link, device.user_code
    );
    if webbrowser::open(&link).is_err() {
        warning!(
            "Failed to open browser. Please navigate to the following URL manually:\n{}",
            link
        )
    }

    let deadline = Instant::now() + Duration::from_secs(device.expires_in);
    let interval = Duration::from_secs(device.interval.max(1));

    loop {
        if Instant::now() >= deadline {
            return Err("device code expired before the login was approved".to_string());
        }
        sleep(interval).await;

        let response = client
            .post(format!("{}/token", auth_url))
            .form(&[
                ("client_id", client_id.as_str()),
                ("client_secret", client_secret.as_str()),
                ("device_code", device.device_code.as_str()),
                ("grant_type", DEVICE_GRANT),
                ("scope", config::TIDAL_SCOPE),
            ])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if response.status().is_success() {
            let granted: TokenResponse = response.json().await.map_err(|e| e.to_string())?;
            let token = token_from_response(granted)?;

            let token_manager = TokenManager::new(account, token.clone());
            token_manager.persist().await?;
            return Ok(token);
        }

        let refused: OAuthError = response.json().await.map_err(|e| e.to_string())?;
        if matches!(refused.error.as_str(), "authorization_pending" | "slow_down") {
            continue;
        }
        return Err(refused.error_description.unwrap_or(refused.error));
    }
}

fn token_from_response(granted: TokenResponse) -> Result<Token, String> {
    let user = granted
        .user
        .ok_or_else(|| "token response did not identify the user".to_string())?;

    Ok(Token {
        access_token: granted.access_token,
        refresh_token: granted.refresh_token.unwrap_or_default(),
        expires_in: granted.expires_in,
        obtained_at: Utc::now().timestamp() as u64,
        user_id: user.user_id,
        country_code: user.country_code,
    })
}
