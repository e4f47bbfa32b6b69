use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

static IPV4: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)$",
    )
    .unwrap()
});

// Full eight-group form and the two literals only; compressed forms are rejected.
static IPV6: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}$|^::1$|^::$").unwrap());

/// Reports whether `ip` looks like an address the lookup API accepts.
pub fn validate(ip: &str) -> bool {
    if ip.is_empty() {
        return false;
    }
    IPV4.is_match(ip) || IPV6.is_match(ip)
}

/// Like [`validate`], for untyped input. Anything but a string is invalid.
pub fn validate_value(value: &Value) -> bool {
    value.as_str().is_some_and(validate)
}
