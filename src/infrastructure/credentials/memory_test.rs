use anyhow::Result;

use super::MemoryCredentials;
use crate::domain::models::CredentialProvider;

#[test]
fn it_starts_empty() {
    let credentials = MemoryCredentials::default();
    assert_eq!(credentials.get(), None);
}

#[test]
fn it_sets_and_clears() -> Result<()> {
    let credentials = MemoryCredentials::new(Some("old".to_string()));
    assert_eq!(credentials.get(), Some("old".to_string()));

    credentials.set("new")?;
    assert_eq!(credentials.get(), Some("new".to_string()));

    credentials.clear()?;
    assert_eq!(credentials.get(), None);

    return Ok(());
}
