use super::SlashCommand;

#[test]
fn it_parse_empty_string() {
    let text = "";
    assert!(SlashCommand::parse(text).is_none());
}
#[test]
fn it_parse_space_only() {
    let text = " ";
    assert!(SlashCommand::parse(text).is_none());
}
#[test]
fn it_parse_single_slash() {
    let text = "/";
    assert!(SlashCommand::parse(text).is_none());
}
#[test]
fn it_parse_invalid_prefix() {
    let text = "!q";
    assert!(SlashCommand::parse(text).is_none());
}
#[test]
fn it_parse_plain_message() {
    let text = "I slept badly last night";
    assert!(SlashCommand::parse(text).is_none());
}
#[test]
fn it_parse_valid_prefix() {
    let text = "/q";
    let cmd = SlashCommand::parse(text);
    assert!(cmd.is_some());
    assert_eq!(cmd.unwrap().command, "/q");
}

#[test]
fn it_is_short_quit() {
    let cmd = SlashCommand::parse("/q").unwrap();
    assert!(cmd.is_quit());
}
#[test]
fn it_is_quit() {
    let cmd = SlashCommand::parse("/quit").unwrap();
    assert!(cmd.is_quit());
}
#[test]
fn it_is_exit() {
    let cmd = SlashCommand::parse("/exit").unwrap();
    assert!(cmd.is_quit());
}
#[test]
fn it_is_not_is_quit() {
    let cmd = SlashCommand::parse("/new").unwrap();
    assert!(!cmd.is_quit());
}

#[test]
fn it_is_short_new_session() {
    let cmd = SlashCommand::parse("/n").unwrap();
    assert!(cmd.is_new_session());
}
#[test]
fn it_is_new_session() {
    let cmd = SlashCommand::parse("/new").unwrap();
    assert!(cmd.is_new_session());
}

#[test]
fn it_is_short_session_list() {
    let cmd = SlashCommand::parse("/ls").unwrap();
    assert!(cmd.is_session_list());
}
#[test]
fn it_is_session_list() {
    let cmd = SlashCommand::parse("/sessions").unwrap();
    assert!(cmd.is_session_list());
}

#[test]
fn it_is_session_select_with_args() {
    let cmd = SlashCommand::parse("/select  2 ").unwrap();
    assert!(cmd.is_session_select());
    assert_eq!(cmd.args, vec!["2".to_string()]);
}
#[test]
fn it_is_short_session_select() {
    let cmd = SlashCommand::parse("/s abc-123").unwrap();
    assert!(cmd.is_session_select());
    assert_eq!(cmd.args, vec!["abc-123".to_string()]);
}

#[test]
fn it_is_clear() {
    let cmd = SlashCommand::parse("/clear").unwrap();
    assert!(cmd.is_clear());
    assert!(cmd.args.is_empty());
}

#[test]
fn it_is_short_help() {
    let cmd = SlashCommand::parse("/h").unwrap();
    assert!(cmd.is_help());
}
#[test]
fn it_is_help() {
    let cmd = SlashCommand::parse("/help").unwrap();
    assert!(cmd.is_help());
}
