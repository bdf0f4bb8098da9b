//! Environment overrides.  Kept in its own test binary: it mutates the
//! process environment.

use std::fs;

use workday::Settings;

#[test]
fn environment_overrides_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("default.toml"),
        "[feed]\ntimeout_secs = 3\n",
    )
    .unwrap();

    std::env::set_var("WORKDAY_FEED__TIMEOUT_SECS", "4");
    std::env::set_var("WORKDAY_CALENDAR__TIMEZONE", "Asia/Hong_Kong");
    let settings = Settings::load_from(dir.path(), "test");
    std::env::remove_var("WORKDAY_FEED__TIMEOUT_SECS");
    std::env::remove_var("WORKDAY_CALENDAR__TIMEZONE");

    let settings = settings.unwrap();
    assert_eq!(settings.feed.timeout_secs, 4);
    assert_eq!(settings.calendar.timezone, "Asia/Hong_Kong");
}
