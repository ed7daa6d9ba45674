/// Whether the terminal advertises a dark background.
///
/// Reads the `COLORFGBG` convention (`"fg;bg"` or `"fg;default;bg"`, set by
/// rxvt, Konsole, iTerm2 and others). Unknown means light.
pub fn prefers_dark() -> bool {
    prefers_dark_from(std::env::var("COLORFGBG").ok().as_deref())
}

pub fn prefers_dark_from(colorfgbg: Option<&str>) -> bool {
    let Some(value) = colorfgbg else {
        return false;
    };
    let Some(bg) = value.rsplit(';').next().map(str::trim) else {
        return false;
    };
    match bg.parse::<u8>() {
        // ANSI 0-6 and 8 are the dark colours
        Ok(n) => n <= 6 || n == 8,
        Err(_) => false,
    }
}
