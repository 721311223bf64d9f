use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

/// Builds an unsigned JWT whose payload carries the provided `exp` claim.
pub fn jwt_fixture(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        serde_json::json!({
            "sub": "1234",
            "exp": exp,
        })
        .to_string(),
    );

    return format!("{header}.{payload}.c2lnbmF0dXJl");
}

/// A token that expires far in the future.
pub fn valid_token() -> String {
    return jwt_fixture(4_102_444_800);
}

/// A token that expired at the start of 2001.
pub fn expired_token() -> String {
    return jwt_fixture(978_307_200);
}

pub fn stream_fixture() -> &'static str {
    return r#"
data: Hello
: keep-alive
data:  world
event: done
"#
    .trim_start();
}
