use crate::{error, success, tidal, types::Account};

pub async fn login(account: Account) {
    match tidal::auth::login(account).await {
        Ok(token) => success!(
            "Logged in the {} account (user {}, country {}).",
            account,
            token.user_id,
            token.country_code
        ),
        Err(e) => error!("Login of the {} account failed. Err: {}", account, e),
    }
}
