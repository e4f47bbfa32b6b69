//! A numeric `IPMONSTER_API_KEY` is still loaded as a string key.

use ipmonster::Settings;

#[test]
fn numeric_environment_key_loads_as_text() {
    // SAFETY: this binary runs a single test, nothing else reads the environment concurrently.
    unsafe {
        std::env::set_var("IPMONSTER_API_KEY", "123456");
        std::env::set_var("IPMONSTER_TIMEOUT", "2500");
    }

    let settings = Settings::from_env().unwrap();
    assert_eq!(settings.api_key.as_deref(), Some("123456"));
    assert_eq!(settings.timeout, 2500);
}
