use anyhow::Result;

use super::Sender;

#[test]
fn it_serializes_lowercase() -> Result<()> {
    assert_eq!(serde_json::to_string(&Sender::User)?, "\"user\"");
    assert_eq!(serde_json::to_string(&Sender::Assistant)?, "\"assistant\"");
    return Ok(());
}

#[test]
fn it_accepts_bot_as_assistant() -> Result<()> {
    let sender: Sender = serde_json::from_str("\"bot\"")?;
    assert_eq!(sender, Sender::Assistant);
    return Ok(());
}

#[test]
fn it_rejects_unknown_senders() {
    let res = serde_json::from_str::<Sender>("\"system\"");
    assert!(res.is_err());
}

#[test]
fn it_displays_assistant_name() {
    assert_eq!(Sender::Assistant.to_string(), "Solace");
}
