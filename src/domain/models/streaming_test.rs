use super::parse_data_line;
use super::StreamingState;

#[test]
fn it_parses_data_lines() {
    assert_eq!(parse_data_line("data: Hello"), Some("Hello"));
    assert_eq!(parse_data_line("data:  world"), Some(" world"));
    assert_eq!(parse_data_line("data: "), Some(""));
}

#[test]
fn it_ignores_other_framing() {
    assert_eq!(parse_data_line(""), None);
    assert_eq!(parse_data_line(": keep-alive"), None);
    assert_eq!(parse_data_line("data:Hello"), None);
    assert_eq!(parse_data_line("event: done"), None);
    assert_eq!(parse_data_line(" data: Hello"), None);
}

#[test]
fn it_only_strips_the_leading_prefix() {
    assert_eq!(parse_data_line("data: data: twice"), Some("data: twice"));
}

#[test]
fn it_accumulates_payloads() {
    let mut state = StreamingState::default();
    state.begin("s-1", 3);

    assert!(state.is_active());
    assert_eq!(state.session_id(), Some("s-1"));
    assert_eq!(state.target(), Some(3));
    assert_eq!(state.push("Hello"), "Hello");
    assert_eq!(state.push(" world"), "Hello world");
    assert_eq!(state.buffer(), "Hello world");
}

#[test]
fn it_resets_on_finish() {
    let mut state = StreamingState::default();
    state.begin("s-1", 1);
    state.push("partial");

    assert_eq!(state.finish(), Some(1));
    assert_eq!(state, StreamingState::default());
    assert!(!state.is_active());
    assert_eq!(state.finish(), None);
}

#[test]
fn it_clears_buffer_between_exchanges() {
    let mut state = StreamingState::default();
    state.begin("s-1", 1);
    state.push("first");
    state.finish();

    state.begin("s-1", 3);
    assert_eq!(state.buffer(), "");
}
