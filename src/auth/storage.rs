use crate::error::{Error, Result};
use keyring::Entry;
use std::{io, io::Write};

/// The keyring service all of our passwords are stored under.
const KEYRING_SERVICE: &str = "tableauctl";

/// One keyring entry per user per server.
pub fn keyring_account(server_url: &str, username: &str) -> String {
    format!("{username}@{}", server_url.trim_end_matches('/'))
}

/// Retrieves a previously stored password from the user's keyring.
pub fn stored_password(server_url: &str, username: &str) -> Result<String> {
    let entry = Entry::new(KEYRING_SERVICE, &keyring_account(server_url, username))?;
    entry.get_password().map_err(|error| match error {
        keyring::Error::NoEntry => Error::Config(format!(
            "no password configured for {username} and none stored in the keyring"
        )),
        other => Error::CredentialStorage(other),
    })
}

/// Stores (or replaces) the password for this user and server.
pub fn store_password(server_url: &str, username: &str, password: &str) -> Result<()> {
    let entry = Entry::new(KEYRING_SERVICE, &keyring_account(server_url, username))?;
    entry.set_password(password)?;
    Ok(())
}

/// Quick and dirty function to read a line from the user.
pub fn interactive_prompt(prompt_type: &str) -> Result<String> {
    let mut response = String::new();
    print!("Please enter {prompt_type} for your Tableau account: ");
    io::stdout().flush()?;
    io::stdin().read_line(&mut response)?;

    // Remove newline
    Ok(response.trim_end_matches(['\r', '\n']).to_string())
}
