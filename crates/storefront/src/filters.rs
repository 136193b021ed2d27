//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use blife_core::models::review::MAX_RATING;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Renders a rating as five stars, rounding to the nearest whole star.
///
/// Usage in templates: `{{ review.rating|stars }}`
#[askama::filter_fn]
pub fn stars(rating: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(star_string(&rating.to_string()))
}

/// The part of an email address before the `@`.
///
/// Usage in templates: `{{ review.user_name|mailbox }}`
#[askama::filter_fn]
pub fn mailbox(email: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    let email = email.to_string();
    Ok(email.split('@').next().unwrap_or_default().to_string())
}

fn star_string(rating: &str) -> String {
    let max = usize::from(MAX_RATING);
    let filled = rating
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|r| r.is_finite() && *r > 0.0)
        .map_or(0, |r| {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let rounded = r.round() as usize;
            rounded.min(max)
        });
    format!("{}{}", "★".repeat(filled), "☆".repeat(max - filled))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_string() {
        assert_eq!(star_string("5"), "★★★★★");
        assert_eq!(star_string("4.5"), "★★★★★");
        assert_eq!(star_string("4.4"), "★★★★☆");
        assert_eq!(star_string("0"), "☆☆☆☆☆");
        assert_eq!(star_string("nope"), "☆☆☆☆☆");
        assert_eq!(star_string("9"), "★★★★★");
    }
}
