use std::fmt;

use log::warn;
use regex::Regex;

use crate::error::AuthError;

const COUNTRY_CODE_REGEX: &str = r"^[A-Z]{2}$";

/// Name the account is stored under in Spotizerr.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountName(String);

impl AccountName {
    pub fn parse(input: &str) -> Result<AccountName, AuthError> {
        let name = input.trim();
        if name.is_empty() {
            return Err(AuthError::EmptyInput("Account name"));
        }
        Ok(AccountName(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Spotify market of the account, e.g. `US` or `DE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region(String);

impl Region {
    /// Uppercases the input. Anything other than two letters is passed through
    /// to the server with a warning, since Spotizerr is the one that decides.
    pub fn parse(input: &str) -> Result<Region, AuthError> {
        let region = input.trim().to_uppercase();
        if region.is_empty() {
            return Err(AuthError::EmptyInput("Region"));
        }

        let region = Region(region);
        if !region.is_country_code() {
            warn!("'{region}' does not look like a 2-letter country code");
        }
        Ok(region)
    }

    pub fn is_country_code(&self) -> bool {
        Regex::new(COUNTRY_CODE_REGEX)
            .map(|r| r.is_match(&self.0))
            .unwrap_or(false)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
