use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

pub const FLASH_COOKIE: &str = "carlot_flash";

/// Queue a one-shot message for the next rendered listing.
pub fn push(jar: CookieJar, message: &str) -> CookieJar {
    let mut messages = read(&jar);
    messages.push(message.to_string());
    let encoded = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(messages.iter().map(|m| ("m", m.as_str())))
        .finish();
    jar.add(build_cookie(encoded))
}

/// Drain the queued messages.
pub fn take(jar: CookieJar) -> (CookieJar, Vec<String>) {
    let messages = read(&jar);
    if messages.is_empty() {
        return (jar, messages);
    }
    (jar.remove(clear_cookie()), messages)
}

fn read(jar: &CookieJar) -> Vec<String> {
    let Some(cookie) = jar.get(FLASH_COOKIE) else {
        return Vec::new();
    };
    url::form_urlencoded::parse(cookie.value().as_bytes())
        .filter(|(k, _)| k == "m")
        .map(|(_, v)| v.into_owned())
        .collect()
}

fn build_cookie(value: String) -> Cookie<'static> {
    Cookie::build(Cookie::new(FLASH_COOKIE, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(Duration::minutes(5))
        .build()
}

fn clear_cookie() -> Cookie<'static> {
    Cookie::build(Cookie::new(FLASH_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
